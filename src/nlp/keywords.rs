//! Keyword matching for the goal and category heuristics
//!
//! Matching rules, applied per keyword:
//! - contains a space or a non-alphanumeric char (`"private sector"`, `"%"`):
//!   substring of the lowercased text
//! - three characters or fewer (`"per"`, `"gdp"`): whole word
//! - otherwise: prefix of some word, so stems like `"financ"` match
//!   "financing" and "finance"

use super::tokenizer::words;

/// Lowercased text with its word list, built once and queried many times
#[derive(Debug, Clone)]
pub struct KeywordText {
    lower: String,
    words: Vec<String>,
}

impl KeywordText {
    /// Prepare a text for keyword queries
    pub fn new(text: &str) -> Self {
        Self {
            lower: text.to_lowercase(),
            words: words(text),
        }
    }

    /// Whether a single keyword matches
    pub fn contains(&self, keyword: &str) -> bool {
        if keyword.contains(' ') || !keyword.chars().all(char::is_alphanumeric) {
            self.lower.contains(keyword)
        } else if keyword.chars().count() <= 3 {
            self.words.iter().any(|w| w == keyword)
        } else {
            self.words.iter().any(|w| w.starts_with(keyword))
        }
    }

    /// Whether any of the keywords matches
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }

    /// Whether the text contains at least one digit
    pub fn has_digit(&self) -> bool {
        self.lower.chars().any(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match() {
        let text = KeywordText::new("Financing reforms were reducing costs.");
        assert!(text.contains("financ"));
        assert!(text.contains("reduc"));
        assert!(!text.contains("fund"));
    }

    #[test]
    fn test_short_keywords_need_whole_word() {
        let text = KeywordText::new("Deaths per 1000 live births in the period.");
        assert!(text.contains("per"));

        let text = KeywordText::new("The period of performance.");
        assert!(!text.contains("per"));
    }

    #[test]
    fn test_symbol_and_phrase_keywords() {
        let text = KeywordText::new("Engage the Private Sector to reach 80% coverage.");
        assert!(text.contains("%"));
        assert!(text.contains("private sector"));
        assert!(text.has_digit());
        assert!(text.contains_any(&["budget", "coverage"]));
    }
}
