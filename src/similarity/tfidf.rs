//! Lexical similarity from TF-IDF vectors
//!
//! Terms are unigrams and bigrams of the stopword-filtered token stream.
//! Terms occurring in more than `max_df` of the sentences are dropped,
//! idf is smoothed (`ln((1 + n) / (1 + df)) + 1`) and every row is scaled
//! to unit length, so cosine similarity is a sparse dot product.

use rustc_hash::FxHashMap;

use super::SimilarityMatrix;
use crate::error::Result;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::terms;
use crate::pipeline::traits::SimilarityBuilder;
use crate::types::Sentence;

/// A sparse unit vector over vocabulary ids
#[derive(Debug, Clone, Default)]
pub struct TermVector {
    /// Non-zero dimensions: term id -> weight
    pub dimensions: FxHashMap<u32, f64>,
    /// L2 norm before normalization
    pub norm: f64,
}

impl TermVector {
    /// Create from raw weights, scaling to unit length
    pub fn from_dimensions(mut dimensions: FxHashMap<u32, f64>) -> Self {
        let norm = dimensions.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in dimensions.values_mut() {
                *value /= norm;
            }
        }
        Self { dimensions, norm }
    }

    /// Cosine similarity with another unit vector
    pub fn cosine_similarity(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.dimensions.len() <= other.dimensions.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .dimensions
            .iter()
            .filter_map(|(term, value)| large.dimensions.get(term).map(|o| value * o))
            .sum()
    }

    /// Check if the vector is empty
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }
}

/// Fits a vocabulary over one document's sentences and vectorizes them
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    stopwords: StopwordFilter,
    ngram_max: usize,
    max_df: f64,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self {
            stopwords: StopwordFilter::default(),
            ngram_max: 2,
            max_df: 0.9,
        }
    }
}

impl TfIdfVectorizer {
    /// Create a vectorizer with English stopwords, bigrams and max_df 0.9
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stopword filter
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    /// Set the longest n-gram
    pub fn with_ngram_max(mut self, ngram_max: usize) -> Self {
        self.ngram_max = ngram_max.max(1);
        self
    }

    /// Set the document-frequency cutoff as a fraction of sentences
    pub fn with_max_df(mut self, max_df: f64) -> Self {
        self.max_df = max_df;
        self
    }

    /// Vectorize every text against a vocabulary fitted on all of them.
    ///
    /// Texts whose terms were all pruned get an empty vector.
    pub fn fit_transform(&self, texts: &[&str]) -> Vec<TermVector> {
        let n = texts.len();
        let mut vocabulary: FxHashMap<String, u32> = FxHashMap::default();
        let mut counts: Vec<FxHashMap<u32, f64>> = Vec::with_capacity(n);
        let mut doc_freq: Vec<usize> = Vec::new();

        for text in texts {
            let mut tf: FxHashMap<u32, f64> = FxHashMap::default();
            for term in terms(text, &self.stopwords, self.ngram_max) {
                let next_id = vocabulary.len() as u32;
                let id = *vocabulary.entry(term).or_insert(next_id);
                if id as usize == doc_freq.len() {
                    doc_freq.push(0);
                }
                let count = tf.entry(id).or_insert(0.0);
                if *count == 0.0 {
                    doc_freq[id as usize] += 1;
                }
                *count += 1.0;
            }
            counts.push(tf);
        }

        let df_limit = self.max_df * n as f64;
        let idf: Vec<Option<f64>> = doc_freq
            .iter()
            .map(|&df| {
                if df as f64 > df_limit {
                    None
                } else {
                    Some(((1.0 + n as f64) / (1.0 + df as f64)).ln() + 1.0)
                }
            })
            .collect();

        counts
            .into_iter()
            .map(|tf| {
                let weighted = tf
                    .into_iter()
                    .filter_map(|(id, count)| idf[id as usize].map(|w| (id, count * w)))
                    .collect();
                TermVector::from_dimensions(weighted)
            })
            .collect()
    }
}

/// Lexical similarity builder
#[derive(Debug, Clone, Default)]
pub struct TfIdfSimilarity {
    vectorizer: TfIdfVectorizer,
}

impl TfIdfSimilarity {
    /// Create with the default vectorizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom vectorizer
    pub fn with_vectorizer(vectorizer: TfIdfVectorizer) -> Self {
        Self { vectorizer }
    }

    /// Similarity matrix over plain texts
    pub fn matrix(&self, texts: &[&str]) -> SimilarityMatrix {
        let vectors = self.vectorizer.fit_transform(texts);
        SimilarityMatrix::from_fn(vectors.len(), |i, j| vectors[i].cosine_similarity(&vectors[j]))
    }
}

impl SimilarityBuilder for TfIdfSimilarity {
    fn build(&self, sentences: &[Sentence]) -> Result<SimilarityMatrix> {
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        Ok(self.matrix(&texts))
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_vector_normalized() {
        let mut dims = FxHashMap::default();
        dims.insert(0, 3.0);
        dims.insert(1, 4.0);
        let v = TermVector::from_dimensions(dims);

        assert!((v.norm - 5.0).abs() < 1e-12);
        let length: f64 = v.dimensions.values().map(|x| x * x).sum::<f64>().sqrt();
        assert!((length - 1.0).abs() < 1e-12);
        assert!((v.cosine_similarity(&v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_related_sentences_score_higher() {
        let sim = TfIdfSimilarity::new();
        let m = sim.matrix(&[
            "Maternal mortality remains high in rural districts.",
            "Rural districts report high maternal mortality.",
            "Tax revenue funds the national road network.",
        ]);

        assert!(m.get(0, 1) > 0.3);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(0, 1), m.get(1, 0));
    }

    #[test]
    fn test_max_df_prunes_ubiquitous_terms() {
        let vectorizer = TfIdfVectorizer::new().with_stopwords(StopwordFilter::empty());
        let vectors = vectorizer.fit_transform(&["health alpha", "health beta", "health gamma"]);

        // "health" occurs in every sentence and is pruned; the rest are disjoint
        assert_eq!(vectors[0].cosine_similarity(&vectors[1]), 0.0);
        assert_eq!(vectors[0].dimensions.len(), 2);
    }

    #[test]
    fn test_all_terms_pruned_gives_empty_vectors() {
        let vectorizer = TfIdfVectorizer::new();
        let vectors = vectorizer.fit_transform(&["the and of", "it is the"]);
        assert!(vectors.iter().all(TermVector::is_empty));
    }

    #[test]
    fn test_single_sentence() {
        let m = TfIdfSimilarity::new().matrix(&["Only one sentence here."]);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(0, 0), 0.0);
    }
}
