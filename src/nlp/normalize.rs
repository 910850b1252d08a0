//! Text normalization
//!
//! Cleans text produced by PDF/OCR extraction: carriage returns, non-breaking
//! and zero-width spaces, runs of whitespace, page-number footers and lines
//! without any letters (bare page numbers, rules, dot leaders).

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

static PAGE_RE: OnceLock<Regex> = OnceLock::new();

/// A page footer: a whole line `Page N` / `Page N of M`, or a trailing
/// `Page N of M` glued to the end of a line
fn page_re() -> &'static Regex {
    PAGE_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*page\s+\d+(?:\s+of\s+\d+)?\s*$|\s*\bpage\s+\d+\s+of\s+\d+\s*$")
            .expect("page marker regex")
    })
}

/// Smallest share of the token budget kept when the cut moves back to a
/// line or sentence boundary
const MIN_KEPT_SHARE: usize = 2;

/// Normalize text while keeping line structure.
///
/// Every returned line is trimmed and whitespace-collapsed; empty and
/// letter-free lines are dropped. Always succeeds, returning an empty
/// string for empty input.
pub fn normalize_lines(text: &str) -> String {
    let cleaned = text
        .replace("\r\n", "\n")
        .replace(['\r', '\u{0c}'], "\n")
        .replace(['\u{a0}', '\u{2007}', '\u{202f}', '\t'], " ")
        .replace(['\u{200b}', '\u{feff}', '\u{ad}'], "");

    let mut lines = Vec::new();
    for line in cleaned.lines() {
        let stripped = page_re().replace_all(line, " ");
        let collapsed = collapse_whitespace(&stripped);
        if collapsed.chars().any(char::is_alphabetic) {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}

/// Normalize text into a single line.
pub fn normalize(text: &str) -> String {
    normalize_lines(text).replace('\n', " ")
}

/// Collapse any run of whitespace to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut text after `max_tokens` whitespace-separated tokens.
///
/// The cut moves back to the last line break, then to the last sentence
/// end, as long as at least half of the kept text survives; otherwise it
/// falls on the token boundary.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> Cow<'_, str> {
    let mut count = 0;
    let mut in_token = false;
    for (offset, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_token = false;
        } else if !in_token {
            in_token = true;
            count += 1;
            if count > max_tokens {
                let head = &text[..offset];
                let floor = offset / MIN_KEPT_SHARE;
                let cut = head
                    .rfind('\n')
                    .filter(|&at| at >= floor)
                    .or_else(|| last_sentence_end(head).filter(|&at| at >= floor))
                    .unwrap_or(offset);
                tracing::warn!(max_tokens, kept_bytes = cut, "input truncated to token limit");
                return Cow::Owned(text[..cut].to_string());
            }
        }
    }
    Cow::Borrowed(text)
}

/// Byte offset just past the last `.`, `!` or `?` followed by whitespace
fn last_sentence_end(text: &str) -> Option<usize> {
    let mut end = None;
    let mut chars = text.char_indices().peekable();
    while let Some((at, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?')
            && chars.peek().is_some_and(|&(_, next)| next.is_whitespace())
        {
            end = Some(at + ch.len_utf8());
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_special_spaces() {
        let text = "Health\u{a0}systems   need\tinvestment.\r\nSecond  line here.";
        assert_eq!(
            normalize_lines(text),
            "Health systems need investment.\nSecond line here."
        );
    }

    #[test]
    fn test_strips_page_markers() {
        let text = "Introduction to the brief Page 3 of 12\nPage 4\nBody text continues.";
        assert_eq!(
            normalize_lines(text),
            "Introduction to the brief\nBody text continues."
        );
    }

    #[test]
    fn test_page_references_in_prose_survive() {
        let text = "Details are given on page 3 of the annex.\nSee page 12 for the costing.";
        assert_eq!(normalize_lines(text), text);
    }

    #[test]
    fn test_drops_letter_free_lines() {
        let text = "First line.\n- 12 -\n.........\nLast line.";
        assert_eq!(normalize(text), "First line. Last line.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize_lines("   \n\n  "), "");
    }

    #[test]
    fn test_truncate_tokens() {
        let text = "one two three\nfour five six";
        assert_eq!(truncate_tokens(text, 10), text);
        assert_eq!(truncate_tokens(text, 4), "one two three");
        assert_eq!(truncate_tokens("a b c d", 2), "a b ");
    }

    #[test]
    fn test_truncate_title_then_long_paragraph() {
        let paragraph = "Clinics need more trained staff in every district. ".repeat(40);
        let text = format!("Rural Health Brief\n{paragraph}");
        let cut = truncate_tokens(&text, 100);

        assert!(cut.starts_with("Rural Health Brief\nClinics need"));
        assert!(cut.ends_with("district."));
        // twelve whole sentences of eight tokens after the three title tokens
        assert_eq!(cut.split_whitespace().count(), 3 + 12 * 8);
    }

    #[test]
    fn test_truncate_without_boundaries_cuts_at_token() {
        let text = format!("Brief\n{}", "word ".repeat(50));
        let cut = truncate_tokens(&text, 20);
        assert_eq!(cut.split_whitespace().count(), 20);
    }
}
