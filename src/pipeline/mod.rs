//! Summarization pipeline
//!
//! - [`traits`]: the similarity stage trait
//! - [`observer`]: stage boundary hooks and timing reports
//! - [`runner`]: the [`Summarizer`] that runs every stage in order

pub mod observer;
pub mod runner;
pub mod traits;

pub use observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder,
    StageTimingObserver,
};
pub use runner::Summarizer;
pub use traits::{DynSimilarity, SimilarityBuilder};
