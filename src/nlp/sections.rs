//! Section partitioning
//!
//! Groups lines under heading-like lines. A heading is either a numbered
//! heading (`"2.1 Service delivery"`: capitalized after the number, at most
//! 120 characters, not ending in sentence punctuation) or a short
//! all-uppercase line (`"KEY MESSAGES"`). A wrapped line that starts with a
//! year (`"2030 and expand ..."`) is body text.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{DocumentLayout, Section};

/// Title used for lines before the first heading and for the synthetic
/// single section of unsectioned documents
pub const DEFAULT_SECTION_TITLE: &str = "Document";

const MAX_NUMBERED_HEADING_CHARS: usize = 120;
const MAX_CAPS_HEADING_WORDS: usize = 12;
const MIN_CAPS_HEADING_LETTERS: usize = 4;
const YEAR_DIGITS: usize = 4;

static NUMBERED_HEADING_RE: OnceLock<Regex> = OnceLock::new();

fn numbered_heading_re() -> &'static Regex {
    NUMBERED_HEADING_RE.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)*)(\.?)\s+\p{Lu}").expect("numbered heading regex")
    })
}

fn is_numbered_heading(line: &str) -> bool {
    let Some(caps) = numbered_heading_re().captures(line) else {
        return false;
    };
    let number = &caps[1];
    // "2030 Targets" reads as a year, "2030. Targets" as a number
    let bare_year = caps[2].is_empty() && !number.contains('.') && number.len() == YEAR_DIGITS;

    !bare_year
        && line.chars().count() <= MAX_NUMBERED_HEADING_CHARS
        && !line.ends_with(['.', '?', '!'])
}

/// Whether a normalized line looks like a section heading
pub fn is_heading(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    if is_numbered_heading(line) {
        return true;
    }

    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    letters >= MIN_CAPS_HEADING_LETTERS
        && line.split_whitespace().count() < MAX_CAPS_HEADING_WORDS
        && line
            .chars()
            .all(|c| c.is_uppercase() || c == ' ' || c == '-')
}

/// Splits normalized multi-line text into titled sections
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionPartitioner;

impl SectionPartitioner {
    /// Create a new partitioner
    pub fn new() -> Self {
        Self
    }

    /// Partition text into (title, body) sections.
    ///
    /// Lines before the first heading form a section titled
    /// [`DEFAULT_SECTION_TITLE`]. Sections with an empty body are dropped,
    /// so the result may be empty.
    pub fn partition(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut title = DEFAULT_SECTION_TITLE.to_string();
        let mut body: Vec<&str> = Vec::new();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if is_heading(line) {
                flush(&mut sections, &title, &mut body);
                title = line.to_string();
            } else {
                body.push(line);
            }
        }
        flush(&mut sections, &title, &mut body);

        sections
    }

    /// Resolve the document layout.
    ///
    /// Without any detected heading, or when partitioning leaves no section
    /// with a body, the whole text becomes one synthetic section.
    pub fn layout(&self, text: &str) -> DocumentLayout {
        let has_heading = text.lines().any(is_heading);
        let sections = if has_heading {
            self.partition(text)
        } else {
            Vec::new()
        };

        if sections.is_empty() {
            DocumentLayout::Unsectioned(Section::new(DEFAULT_SECTION_TITLE, text))
        } else {
            DocumentLayout::Sectioned(sections)
        }
    }
}

fn flush(sections: &mut Vec<Section>, title: &str, body: &mut Vec<&str>) {
    if !body.is_empty() {
        sections.push(Section::new(title, body.join("\n")));
        body.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("1. Introduction"));
        assert!(is_heading("2.3 Health financing and the private sector"));
        assert!(is_heading("KEY MESSAGES"));
        assert!(is_heading("POLICY RECOMMENDATIONS - SUMMARY"));

        assert!(!is_heading("1. We will train two thousand nurses by the end of the plan."));
        assert!(!is_heading("WHO"));
        assert!(!is_heading("Health systems remain underfunded in most districts"));
        assert!(!is_heading("THIS IS A VERY LONG SHOUTED LINE THAT GOES ON FOR FAR TOO MANY WORDS TO BE A HEADING"));
        assert!(!is_heading("2025"));
    }

    #[test]
    fn test_numbered_heading_needs_capitalized_title() {
        assert!(is_heading("3 Financing"));
        assert!(is_heading("2030. Targets"));

        assert!(!is_heading("2030 and expand skilled birth attendance to every rural"));
        assert!(!is_heading("12 districts have already signed the compact"));
        assert!(!is_heading("2030 Targets for every district"));
    }

    #[test]
    fn test_wrapped_year_line_stays_in_body() {
        let text = "The ministry plans to reduce maternal mortality by half before\n\
                    2030 and expand skilled birth attendance to every rural\n\
                    district with a functioning clinic.";
        let layout = SectionPartitioner::new().layout(text);

        assert!(!layout.is_sectioned());
        assert_eq!(layout.sections()[0].body, text);
    }

    #[test]
    fn test_partition_groups_lines() {
        let text = "Preface line about the brief\n\
                    1. Background\n\
                    Maternal deaths remain high.\n\
                    Access is uneven.\n\
                    2. Goals\n\
                    Reduce mortality by half.";
        let sections = SectionPartitioner::new().partition(text);

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].title, DEFAULT_SECTION_TITLE);
        assert_eq!(sections[1].title, "1. Background");
        assert_eq!(sections[1].body, "Maternal deaths remain high.\nAccess is uneven.");
        assert_eq!(sections[2].title, "2. Goals");
    }

    #[test]
    fn test_empty_sections_dropped() {
        let text = "EXECUTIVE SUMMARY\nINTRODUCTION\nThe body of the introduction.";
        let sections = SectionPartitioner::new().partition(text);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "INTRODUCTION");
    }

    #[test]
    fn test_layout_falls_back_to_single_section() {
        let text = "Plain paragraph without any headings.\nAnother plain line.";
        match SectionPartitioner::new().layout(text) {
            DocumentLayout::Unsectioned(section) => {
                assert_eq!(section.title, DEFAULT_SECTION_TITLE);
                assert_eq!(section.body, text);
            }
            other => panic!("expected unsectioned layout, got {other:?}"),
        }
    }

    #[test]
    fn test_layout_headings_only_is_unsectioned() {
        let layout = SectionPartitioner::new().layout("OVERVIEW\nANNEXES");
        assert!(!layout.is_sectioned());
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_layout_sectioned() {
        let layout = SectionPartitioner::new().layout("OVERVIEW\nSome text here.\nGOALS\nMore text.");
        assert!(layout.is_sectioned());
        assert_eq!(layout.len(), 2);
    }
}
