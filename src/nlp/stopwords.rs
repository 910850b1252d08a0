//! English stopwords for TF-IDF term extraction
//!
//! The default list is the `stop-words` crate's English list. Tests and
//! callers tuning the lexical similarity can supply their own.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// Set of lowercase words excluded from term vectors
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    words: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::english()
    }
}

impl StopwordFilter {
    /// The English stopword list
    pub fn english() -> Self {
        Self {
            words: get(LANGUAGE::English).iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// A filter that keeps every word
    pub fn empty() -> Self {
        Self {
            words: FxHashSet::default(),
        }
    }

    /// Exactly the given words
    pub fn from_list(words: &[&str]) -> Self {
        Self::empty().with_extra(words)
    }

    /// Add words to the list
    pub fn with_extra(mut self, words: &[&str]) -> Self {
        self.words.extend(words.iter().map(|w| w.to_lowercase()));
        self
    }

    /// Whether `word` is a stopword, ignoring case
    pub fn is_stopword(&self, word: &str) -> bool {
        if word.chars().any(char::is_uppercase) {
            self.words.contains(&word.to_lowercase())
        } else {
            self.words.contains(word)
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
