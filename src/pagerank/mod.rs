//! PageRank over the sentence graph
//!
//! Weighted power iteration; see [`PageRank`].

pub mod standard;

pub use standard::PageRank;

/// Outcome of one PageRank run
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// One score per sentence, summing to 1 when valid
    pub scores: Vec<f64>,
    pub iterations: usize,
    /// L1 change of the last iteration
    pub residual: f64,
    pub converged: bool,
}

impl PageRankResult {
    /// Whether every score is finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.scores.iter().all(|s| s.is_finite() && *s >= 0.0)
    }
}
