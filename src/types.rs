//! Core types shared by every pipeline stage
//!
//! Sentences are identified by their `index` everywhere downstream of
//! segmentation: similarity rows, graph nodes, rank scores and selections
//! are all keyed by it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Title keywords that mark a section as stating goals or principles
pub const GOAL_TITLE_KEYWORDS: &[&str] = &["goal", "objective", "principle"];

/// A cleaned sentence in original document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Whitespace-normalized sentence text
    pub text: String,
    /// Position in document order (0-based, dense)
    pub index: usize,
    /// Index of the section that owns this sentence
    pub section: usize,
}

impl Sentence {
    /// Create a new sentence
    pub fn new(text: impl Into<String>, index: usize, section: usize) -> Self {
        Self {
            text: text.into(),
            index,
            section,
        }
    }

    /// Number of whitespace-separated words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A titled block of body text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    /// Create a new section
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Whether the title names goals, objectives or principles
    pub fn is_goal_section(&self) -> bool {
        let title = self.title.to_lowercase();
        GOAL_TITLE_KEYWORDS.iter().any(|k| title.contains(k))
    }
}

/// How the document's sentence-bearing lines are grouped
///
/// Resolved once during parsing; downstream stages only ever see a
/// non-empty slice of sections through [`DocumentLayout::sections`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "sections", rename_all = "snake_case")]
pub enum DocumentLayout {
    /// Heading detection found at least one heading
    Sectioned(Vec<Section>),
    /// No headings; the whole document is one synthetic section
    Unsectioned(Section),
}

impl DocumentLayout {
    /// All sections in document order
    pub fn sections(&self) -> &[Section] {
        match self {
            DocumentLayout::Sectioned(sections) => sections,
            DocumentLayout::Unsectioned(section) => std::slice::from_ref(section),
        }
    }

    /// Whether real headings were detected
    pub fn is_sectioned(&self) -> bool {
        matches!(self, DocumentLayout::Sectioned(_))
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections().len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`
    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }
}

/// A parsed document: title, layout and segmented sentences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// First non-trivial, non-TOC line
    pub title: Option<String>,
    pub layout: DocumentLayout,
    pub sentences: Vec<Sentence>,
}

impl Document {
    /// Number of sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether segmentation produced no sentences
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Sentence texts in document order
    pub fn texts(&self) -> Vec<&str> {
        self.sentences.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Requested summary length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthChoice {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthChoice {
    /// Fraction of sentences to keep
    pub fn ratio(&self) -> f64 {
        match self {
            LengthChoice::Short => 0.10,
            LengthChoice::Medium => 0.20,
            LengthChoice::Long => 0.30,
        }
    }

    /// Upper bound on selected sentences
    pub fn max_sentences(&self) -> usize {
        match self {
            LengthChoice::Short => 6,
            LengthChoice::Medium => 12,
            LengthChoice::Long => 20,
        }
    }

    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "short" | "s" => LengthChoice::Short,
            "long" | "l" => LengthChoice::Long,
            _ => LengthChoice::Medium,
        }
    }
}

impl std::str::FromStr for LengthChoice {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(LengthChoice::parse(value))
    }
}

/// Output register; only affects rendering, never selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Academic,
    Easy,
}

impl std::str::FromStr for Tone {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match value.trim().to_lowercase().as_str() {
            "easy" | "simple" | "plain" => Tone::Easy,
            _ => Tone::Academic,
        })
    }
}

/// Sentence representation used for the similarity matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityStrategy {
    /// TF-IDF over unigrams and bigrams
    #[default]
    Lexical,
    /// Dense embeddings from a sentence encoder
    Semantic,
}

impl std::str::FromStr for SimilarityStrategy {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match value.trim().to_lowercase().as_str() {
            "semantic" | "sbert" | "embedding" | "embeddings" => SimilarityStrategy::Semantic,
            _ => SimilarityStrategy::Lexical,
        })
    }
}

/// Configuration for the whole summarization pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Summary length preset
    pub length: LengthChoice,
    /// Explicit ratio in (0, 1]; overrides the preset's ratio
    pub ratio: Option<f64>,
    pub tone: Tone,
    pub strategy: SimilarityStrategy,
    /// MMR trade-off (1 = relevance only, 0 = diversity only)
    pub lambda: f64,
    /// PageRank damping factor
    pub damping: f64,
    /// PageRank iteration cap
    pub max_iterations: usize,
    /// PageRank L1 convergence tolerance
    pub tolerance: f64,
    /// Minimum similarity for a graph edge
    pub similarity_threshold: f64,
    /// Weight added to every edge of the fully connected fallback graph
    pub epsilon_weight: f64,
    /// Shortest sentence kept, in characters
    pub min_sentence_chars: usize,
    /// Shortest sentence kept, in words
    pub min_sentence_words: usize,
    /// Length above which a digit-heavy line may be a TOC entry
    pub toc_min_chars: usize,
    /// Digit count at which a long line may be a TOC entry
    pub toc_min_digits: usize,
    /// Documents with at most this many sentences are returned verbatim
    pub trivial_threshold: usize,
    /// Distribute the target across sections before selecting
    pub section_quota: bool,
    /// Boost the first sentence of each section
    pub position_boost: bool,
    /// Boost for a section's first sentence, scaled by how early the section is
    pub early_section_boost: f64,
    /// Extra boost for the first sentence of goal/objective/principle sections
    pub goal_section_boost: f64,
    /// Importance multiplier for goal/objective/principle sections
    pub goal_title_weight: f64,
    /// Cap on force-included goal sentences
    pub max_forced_goals: usize,
    /// Share of the target reserved for goal sentences
    pub forced_goal_fraction: f64,
    /// Selected sentences joined into the abstract
    pub abstract_sentences: usize,
    /// Local sentence-encoder directory (semantic strategy)
    pub model_dir: Option<PathBuf>,
    /// Whitespace tokens accepted before input is truncated
    pub max_tokens: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            length: LengthChoice::Medium,
            ratio: None,
            tone: Tone::Academic,
            strategy: SimilarityStrategy::Lexical,
            lambda: 0.7,
            damping: 0.85,
            max_iterations: 200,
            tolerance: 1e-6,
            similarity_threshold: 0.1,
            epsilon_weight: 1e-6,
            min_sentence_chars: 20,
            min_sentence_words: 3,
            toc_min_chars: 80,
            toc_min_digits: 10,
            trivial_threshold: 3,
            section_quota: true,
            position_boost: true,
            early_section_boost: 0.1,
            goal_section_boost: 0.2,
            goal_title_weight: 1.5,
            max_forced_goals: 3,
            forced_goal_fraction: 0.25,
            abstract_sentences: 3,
            model_dir: None,
            max_tokens: 200_000,
        }
    }
}

impl SummaryConfig {
    /// Create a config with the given length preset
    pub fn with_length(mut self, length: LengthChoice) -> Self {
        self.length = length;
        self
    }

    /// Set an explicit summary ratio
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// Set the output tone
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set the similarity strategy
    pub fn with_strategy(mut self, strategy: SimilarityStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the MMR lambda
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Enable or disable section-aware quotas
    pub fn with_section_quota(mut self, enabled: bool) -> Self {
        self.section_quota = enabled;
        self
    }

    /// Enable or disable the positional boost
    pub fn with_position_boost(mut self, enabled: bool) -> Self {
        self.position_boost = enabled;
        self
    }

    /// Ratio in effect: the explicit ratio when valid, else the preset's
    pub fn effective_ratio(&self) -> f64 {
        match self.ratio {
            Some(r) if r.is_finite() && r > 0.0 && r <= 1.0 => r,
            _ => self.length.ratio(),
        }
    }

    /// Number of sentences to select from a document of `n` sentences
    ///
    /// `round(n * ratio)`, at least 1, at most the preset cap and `n`.
    pub fn target_count(&self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let raw = (n as f64 * self.effective_ratio()).round() as usize;
        raw.max(1).min(self.length.max_sentences()).min(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_count_medium() {
        let cfg = SummaryConfig::default();
        assert_eq!(cfg.target_count(40), 8);
        assert_eq!(cfg.target_count(0), 0);
        assert_eq!(cfg.target_count(2), 1);
    }

    #[test]
    fn test_target_count_capped() {
        let cfg = SummaryConfig::default().with_length(LengthChoice::Short);
        assert_eq!(cfg.target_count(51), 5);
        assert_eq!(cfg.target_count(500), 6);

        let cfg = SummaryConfig::default().with_length(LengthChoice::Long);
        assert_eq!(cfg.target_count(1000), 20);
    }

    #[test]
    fn test_invalid_ratio_falls_back() {
        let cfg = SummaryConfig::default().with_ratio(1.7);
        assert!((cfg.effective_ratio() - 0.20).abs() < 1e-12);

        let cfg = SummaryConfig::default().with_ratio(f64::NAN);
        assert!((cfg.effective_ratio() - 0.20).abs() < 1e-12);

        let cfg = SummaryConfig::default().with_ratio(0.5);
        assert_eq!(cfg.target_count(10), 5);
    }

    #[test]
    fn test_length_choice_parse() {
        assert_eq!("short".parse::<LengthChoice>().unwrap(), LengthChoice::Short);
        assert_eq!("LONG".parse::<LengthChoice>().unwrap(), LengthChoice::Long);
        assert_eq!("bogus".parse::<LengthChoice>().unwrap(), LengthChoice::Medium);
    }

    #[test]
    fn test_unsectioned_layout_has_one_section() {
        let layout = DocumentLayout::Unsectioned(Section::new("Document", "body"));
        assert_eq!(layout.len(), 1);
        assert!(!layout.is_sectioned());
        assert_eq!(layout.sections()[0].title, "Document");
    }

    #[test]
    fn test_goal_section_detection() {
        assert!(Section::new("3. Strategic Objectives", "").is_goal_section());
        assert!(Section::new("GUIDING PRINCIPLES", "").is_goal_section());
        assert!(!Section::new("Background", "").is_goal_section());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let cfg: SummaryConfig =
            serde_json::from_str(r#"{ "length": "long", "tone": "easy" }"#).unwrap();
        assert_eq!(cfg.length, LengthChoice::Long);
        assert_eq!(cfg.tone, Tone::Easy);
        assert!((cfg.lambda - 0.7).abs() < 1e-12);
        assert_eq!(cfg.max_iterations, 200);
    }
}
