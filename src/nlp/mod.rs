//! Natural Language Processing components
//!
//! This module turns raw extracted text into a [`Document`]: normalized
//! lines, a resolved section layout and indexed sentences.

pub mod keywords;
pub mod normalize;
pub mod sections;
pub mod segmenter;
pub mod stopwords;
pub mod tokenizer;

use crate::types::{Document, Sentence, SummaryConfig};
use sections::{is_heading, SectionPartitioner};
use segmenter::{SegmenterConfig, SentenceSegmenter};

const MIN_TITLE_LETTERS: usize = 4;

/// Parse raw text into a document.
///
/// Sentences are numbered densely in document order and tagged with the
/// index of the section they were segmented from.
pub fn parse_document(text: &str, config: &SummaryConfig) -> Document {
    let text = normalize::truncate_tokens(text, config.max_tokens);
    let normalized = normalize::normalize_lines(&text);
    let segmenter = SentenceSegmenter::with_config(SegmenterConfig::from(config));

    let title = detect_title(&normalized, &segmenter);
    let layout = SectionPartitioner::new().layout(&normalized);

    let mut sentences = Vec::new();
    for (section_idx, section) in layout.sections().iter().enumerate() {
        for sentence in segmenter.segment(&section.body) {
            let index = sentences.len();
            sentences.push(Sentence::new(sentence, index, section_idx));
        }
    }

    Document {
        title,
        layout,
        sentences,
    }
}

/// First line with some substance that is not a TOC artifact.
pub fn detect_title(normalized: &str, segmenter: &SentenceSegmenter) -> Option<String> {
    normalized
        .lines()
        .map(str::trim)
        .find(|line| {
            line.chars().filter(|c| c.is_alphabetic()).count() >= MIN_TITLE_LETTERS
                && !segmenter.is_toc_fragment(line)
        })
        .map(|line| {
            if is_heading(line) {
                line.to_string()
            } else {
                line.trim_end_matches(['.', ':', ';']).to_string()
            }
        })
}
