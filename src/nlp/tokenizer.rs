//! Word tokenization
//!
//! A deliberately simple tokenizer: lowercase runs of alphanumeric
//! characters. Term extraction for TF-IDF adds stopword removal, a minimum
//! token length and adjacent bigrams.

use super::stopwords::StopwordFilter;

/// Split text into lowercase alphanumeric words.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Extract index terms from a sentence.
///
/// Words shorter than two characters and stopwords are removed, then
/// n-grams up to `ngram_max` are generated over the remaining stream
/// (so a bigram may span a removed stopword).
pub fn terms(text: &str, stopwords: &StopwordFilter, ngram_max: usize) -> Vec<String> {
    let unigrams: Vec<String> = words(text)
        .into_iter()
        .filter(|w| w.chars().count() >= 2 && !stopwords.is_stopword(w))
        .collect();

    let mut terms = unigrams.clone();
    for n in 2..=ngram_max.max(1) {
        if unigrams.len() < n {
            break;
        }
        for window in unigrams.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}
