//! Summary assembly
//!
//! Turns a final selection into the public [`Summary`]: sentences in
//! document order with their category, statistics, the structured
//! (abstract + category groups) view and tone rendering.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::categories::{Categorizer, Category};
use crate::nlp::normalize::collapse_whitespace;
use crate::ranker::RankMethod;
use crate::types::{Document, Tone};

static PAREN_RE: OnceLock<Regex> = OnceLock::new();

fn paren_re() -> &'static Regex {
    PAREN_RE.get_or_init(|| Regex::new(r"\s*\([^()]{0,40}\)").expect("parenthetical regex"))
}

/// How the summary was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// No sentence could be extracted; nothing to summarize
    Empty,
    /// Too few sentences to rank; every sentence is returned
    Verbatim,
    /// Ranked and selected
    Ranked,
}

/// One sentence of the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedSentence {
    /// Index in the original document
    pub index: usize,
    /// Rendered text (tone applied)
    pub text: String,
    /// Final rank score
    pub score: f64,
    pub category: Category,
    pub is_goal: bool,
    /// Included by goal forcing rather than by MMR
    pub forced: bool,
}

/// Size statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub original_sentences: usize,
    pub summary_sentences: usize,
    /// Selected share of sentences in percent, one decimal
    pub compression_ratio: f64,
    pub original_chars: usize,
    pub summary_chars: usize,
}

/// Sentences of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub label: String,
    pub bullets: Vec<String>,
}

/// Abstract plus category-grouped bullets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredSummary {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub groups: Vec<CategoryGroup>,
}

/// The result of summarizing one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub kind: SummaryKind,
    pub title: Option<String>,
    /// Selected sentences in document order
    pub sentences: Vec<SelectedSentence>,
    pub stats: SummaryStats,
    pub structured: StructuredSummary,
    /// Indices of force-included goal sentences
    pub forced_goals: Vec<usize>,
    /// Ranking used; `None` when nothing was ranked
    pub rank_method: Option<RankMethod>,
    /// Every original sentence, for [`Summary::highlight`]
    #[serde(default, rename = "original_sentences")]
    original: Vec<String>,
}

impl Summary {
    /// The "nothing to summarize" result
    pub fn empty(title: Option<String>) -> Self {
        Self {
            kind: SummaryKind::Empty,
            title,
            sentences: Vec::new(),
            stats: SummaryStats::default(),
            structured: StructuredSummary::default(),
            forced_goals: Vec::new(),
            rank_method: None,
            original: Vec::new(),
        }
    }

    /// Whether no sentence was selected
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Selected indices in document order
    pub fn indices(&self) -> Vec<usize> {
        self.sentences.iter().map(|s| s.index).collect()
    }

    /// Selected texts in document order
    pub fn texts(&self) -> Vec<&str> {
        self.sentences.iter().map(|s| s.text.as_str()).collect()
    }

    /// Plain-text summary, one sentence per paragraph
    pub fn text(&self) -> String {
        self.texts().join("\n\n")
    }

    /// Every original sentence with whether it was selected
    pub fn highlight(&self) -> Vec<(&str, bool)> {
        let mut selected = self.sentences.iter().map(|s| s.index).peekable();
        self.original
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let hit = selected.peek() == Some(&i);
                if hit {
                    selected.next();
                }
                (text.as_str(), hit)
            })
            .collect()
    }
}

/// Easy-tone rendering: drop short parenthetical asides
pub fn simplify(text: &str) -> String {
    let stripped = paren_re().replace_all(text, "");
    collapse_whitespace(&stripped)
}

/// Render a sentence in the requested tone
pub fn render(text: &str, tone: Tone) -> String {
    match tone {
        Tone::Academic => text.to_string(),
        Tone::Easy => simplify(text),
    }
}

/// `100 * selected / original`, rounded to one decimal (0 for empty input)
pub fn compression_ratio(selected: usize, original: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1000.0 * selected as f64 / original as f64).round() / 10.0
}

/// Everything needed to assemble a summary
#[derive(Debug, Clone)]
pub struct Assembly<'a> {
    pub document: &'a Document,
    pub kind: SummaryKind,
    /// Selected indices in any order
    pub selection: Vec<usize>,
    pub scores: &'a [f64],
    pub goal_flags: &'a [bool],
    pub forced: Vec<usize>,
    pub rank_method: Option<RankMethod>,
}

/// Builds the public summary from a selection
#[derive(Debug, Clone)]
pub struct Assembler {
    categorizer: Categorizer,
    tone: Tone,
    abstract_sentences: usize,
}

impl Assembler {
    /// Create an assembler
    pub fn new(categorizer: Categorizer, tone: Tone, abstract_sentences: usize) -> Self {
        Self {
            categorizer,
            tone,
            abstract_sentences,
        }
    }

    /// Assemble the summary; the selection is sorted into document order.
    pub fn assemble(&self, input: Assembly<'_>) -> Summary {
        let document = input.document;
        let mut selection = input.selection;
        selection.sort_unstable();
        selection.dedup();
        selection.retain(|&i| i < document.len());

        let sentences: Vec<SelectedSentence> = selection
            .iter()
            .map(|&i| {
                let original = &document.sentences[i].text;
                let is_goal = input.goal_flags.get(i).copied().unwrap_or(false);
                SelectedSentence {
                    index: i,
                    text: render(original, self.tone),
                    score: input.scores.get(i).copied().unwrap_or(0.0),
                    category: self.categorizer.categorize(original, is_goal),
                    is_goal,
                    forced: input.forced.contains(&i),
                }
            })
            .collect();

        let stats = SummaryStats {
            original_sentences: document.len(),
            summary_sentences: sentences.len(),
            compression_ratio: compression_ratio(sentences.len(), document.len()),
            original_chars: document.sentences.iter().map(|s| s.text.chars().count()).sum(),
            summary_chars: sentences.iter().map(|s| s.text.chars().count()).sum(),
        };

        let structured = self.structure(&sentences);

        Summary {
            kind: input.kind,
            title: document.title.clone(),
            sentences,
            stats,
            structured,
            forced_goals: input.forced,
            rank_method: input.rank_method,
            original: document.sentences.iter().map(|s| s.text.clone()).collect(),
        }
    }

    fn structure(&self, sentences: &[SelectedSentence]) -> StructuredSummary {
        let abstract_text = sentences
            .iter()
            .take(self.abstract_sentences)
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let groups = Category::ALL
            .iter()
            .filter_map(|&category| {
                let bullets: Vec<String> = sentences
                    .iter()
                    .filter(|s| s.category == category)
                    .map(|s| s.text.clone())
                    .collect();
                (!bullets.is_empty()).then(|| CategoryGroup {
                    category,
                    label: category.label().to_string(),
                    bullets,
                })
            })
            .collect();

        StructuredSummary {
            abstract_text,
            groups,
        }
    }
}
