//! Sentence segmentation
//!
//! A regex-and-scanner heuristic tuned for policy documents extracted from
//! PDFs. Text is first cut at bullet markers, then at sentence punctuation
//! followed by whitespace and an uppercase letter, digit or opening quote.
//! Fragments are cleaned of leading glyphs and numbering and discarded when
//! too short or when they look like table-of-contents entries.

use regex::Regex;
use std::sync::OnceLock;

use super::keywords::KeywordText;
use super::normalize::collapse_whitespace;
use crate::summarizer::goals::GOAL_VERBS;
use crate::types::SummaryConfig;

static BULLET_RE: OnceLock<Regex> = OnceLock::new();
static LEADING_RE: OnceLock<Regex> = OnceLock::new();
static CONTENTS_RE: OnceLock<Regex> = OnceLock::new();

fn bullet_re() -> &'static Regex {
    BULLET_RE.get_or_init(|| {
        Regex::new(r"(?m)[•▪●◦\u{F0B7}]|(?:^|\s)o\s+").expect("bullet regex")
    })
}

fn leading_re() -> &'static Regex {
    LEADING_RE.get_or_init(|| {
        Regex::new(
            r"^(?:[\s•▪●◦\u{F0B7}*·>\-–—]+|\d+(?:\.\d+)+\.?\s+|\d+[.)]\s+|\([a-z0-9]{1,3}\)\s+)+",
        )
        .expect("leading marker regex")
    })
}

fn contents_re() -> &'static Regex {
    CONTENTS_RE.get_or_init(|| Regex::new(r"(?i)\bcontents\b").expect("contents regex"))
}

const SENTENCE_END: [char; 3] = ['.', '?', '!'];
const CLOSERS: [char; 6] = ['"', '\'', '”', '’', ')', ']'];
const OPENERS: [char; 4] = ['"', '\'', '“', '‘'];

/// Thresholds for discarding fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// Minimum sentence length in characters
    pub min_chars: usize,
    /// Minimum sentence length in words
    pub min_words: usize,
    /// A longer, digit-heavy fragment may be a TOC entry
    pub toc_min_chars: usize,
    pub toc_min_digits: usize,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self::from(&SummaryConfig::default())
    }
}

impl From<&SummaryConfig> for SegmenterConfig {
    fn from(cfg: &SummaryConfig) -> Self {
        Self {
            min_chars: cfg.min_sentence_chars,
            min_words: cfg.min_sentence_words,
            toc_min_chars: cfg.toc_min_chars,
            toc_min_digits: cfg.toc_min_digits,
        }
    }
}

/// Heuristic sentence segmenter
///
/// Deterministic: the same input always yields the same sentences.
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter {
    config: SegmenterConfig,
}

impl SentenceSegmenter {
    /// Create a segmenter with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom thresholds
    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Split text into cleaned sentences in document order
    pub fn segment(&self, text: &str) -> Vec<String> {
        let flat = text.replace('\n', " ");
        split_bullets(&flat)
            .into_iter()
            .flat_map(split_boundaries)
            .map(clean_fragment)
            .filter(|s| self.is_meaningful(s))
            .collect()
    }

    /// Whether a cleaned fragment is long enough and not TOC noise
    pub fn is_meaningful(&self, fragment: &str) -> bool {
        fragment.chars().count() >= self.config.min_chars
            && fragment.split_whitespace().count() >= self.config.min_words
            && !self.is_toc_fragment(fragment)
    }

    /// Table-of-contents heuristic
    ///
    /// Any fragment mentioning "contents", or a long digit-heavy fragment
    /// without a goal verb (page-number runs rather than numeric targets).
    pub fn is_toc_fragment(&self, fragment: &str) -> bool {
        if contents_re().is_match(fragment) {
            return true;
        }
        let digits = fragment.chars().filter(|c| c.is_ascii_digit()).count();
        fragment.chars().count() > self.config.toc_min_chars
            && digits >= self.config.toc_min_digits
            && !KeywordText::new(fragment).contains_any(GOAL_VERBS)
    }
}

/// Cut text at bullet glyphs and at letter bullets (" o ") that precede an
/// uppercase letter.
fn split_bullets(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for m in bullet_re().find_iter(text) {
        let is_letter_bullet = m.as_str().trim_start().starts_with('o');
        if is_letter_bullet {
            let next = text[m.end()..].chars().next();
            if !next.is_some_and(char::is_uppercase) {
                continue;
            }
        }
        if m.start() > start {
            chunks.push(&text[start..m.start()]);
        }
        start = m.end();
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

/// Cut a chunk after `.`, `?` or `!` (plus closing quotes/brackets) when
/// whitespace and an uppercase letter, digit or opening quote follow.
fn split_boundaries(chunk: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = chunk.char_indices().collect();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        if !SENTENCE_END.contains(&chars[i].1) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (SENTENCE_END.contains(&chars[j].1) || CLOSERS.contains(&chars[j].1)) {
            j += 1;
        }
        let end = chars.get(j).map_or(chunk.len(), |&(offset, _)| offset);

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        let has_space = k > j;
        let starts_sentence = chars.get(k).is_some_and(|&(_, c)| {
            c.is_uppercase() || c.is_ascii_digit() || OPENERS.contains(&c)
        });

        if has_space && starts_sentence {
            pieces.push(&chunk[start..end]);
            start = chars[k].0;
            i = k;
        } else {
            i = j;
        }
    }

    if start < chunk.len() {
        pieces.push(&chunk[start..]);
    }
    pieces
}

/// Strip leading bullets, dashes and numbering, then collapse whitespace.
fn clean_fragment(fragment: &str) -> String {
    let stripped = leading_re().replace(fragment, "");
    collapse_whitespace(&stripped)
}
