//! Extractive summarization of policy briefs
//!
//! Text goes through normalization, section detection and sentence
//! segmentation, then a pairwise similarity matrix (TF-IDF or dense
//! embeddings) feeds a TextRank graph. Maximal Marginal Relevance picks
//! diverse, central sentences, per section when the document has headings,
//! and the best quantitative goal sentences are always kept. The selected
//! sentences are returned verbatim in document order, with statistics and
//! a category-grouped view.
//!
//! ```no_run
//! use briefrank::{Summarizer, SummaryConfig, LengthChoice};
//!
//! let text = std::fs::read_to_string("brief.txt")?;
//! let config = SummaryConfig::default().with_length(LengthChoice::Short);
//! let summary = Summarizer::lexical(config).summarize(&text)?;
//! println!("{}", summary.text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod nlp;
pub mod pagerank;
pub mod pipeline;
pub mod ranker;
pub mod similarity;
pub mod summarizer;
pub mod types;

pub use error::{Error, Result};
pub use pipeline::{PipelineObserver, SimilarityBuilder, StageTimingObserver, Summarizer};
pub use ranker::RankMethod;
pub use similarity::{Embedder, HashingEmbedder, ModelProvider, SimilarityMatrix};
pub use summarizer::{Category, StructuredSummary, Summary, SummaryKind, SummaryStats};
pub use types::{Document, LengthChoice, Sentence, SimilarityStrategy, SummaryConfig, Tone};

/// Summarize `text` with the strategy named in `config`.
///
/// Builds a fresh [`Summarizer`] per call; reuse one for repeated work,
/// especially with the semantic strategy whose model loads lazily.
pub fn summarize(text: &str, config: &SummaryConfig) -> Result<Summary> {
    Summarizer::from_config(config.clone(), None)?.summarize(text)
}
