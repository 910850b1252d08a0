//! Weighted PageRank by power iteration
//!
//! The sentence graph is undirected, so each round pulls score from a
//! sentence's neighbors: `s'(i) = (1 - d) / n + d * (Σ_j w(i, j) s(j) / W(j)
//! + isolated / n)`, where `W(j)` is the weighted degree of `j` and
//! `isolated` is the score held by sentences without edges, spread evenly.

use super::PageRankResult;
use crate::graph::SentenceGraph;

/// Power-iteration settings
#[derive(Debug, Clone, PartialEq)]
pub struct PageRank {
    pub damping: f64,
    pub max_iterations: usize,
    /// Stop once the L1 change between rounds is at most this
    pub tolerance: f64,
}

impl Default for PageRank {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 200,
            tolerance: 1e-6,
        }
    }
}

impl PageRank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Rank every sentence of `graph`.
    ///
    /// Always returns scores; `converged` is false when the iteration cap
    /// was hit first.
    pub fn run(&self, graph: &SentenceGraph) -> PageRankResult {
        let n = graph.len();
        if n == 0 {
            return PageRankResult {
                scores: Vec::new(),
                iterations: 0,
                residual: 0.0,
                converged: true,
            };
        }

        let uniform = 1.0 / n as f64;
        let isolated = graph.isolated();
        let mut scores = vec![uniform; n];
        let mut next = vec![0.0; n];
        // score each sentence sends along one unit of edge weight
        let mut outflow = vec![0.0; n];
        let mut iterations = 0;
        let mut residual = f64::INFINITY;

        while iterations < self.max_iterations && residual > self.tolerance {
            iterations += 1;

            for (j, out) in outflow.iter_mut().enumerate() {
                let strength = graph.strength(j);
                *out = if strength > 0.0 { scores[j] / strength } else { 0.0 };
            }
            let stranded: f64 = isolated.iter().map(|&j| scores[j]).sum();
            let base = (1.0 - self.damping) * uniform + self.damping * stranded * uniform;

            for (i, slot) in next.iter_mut().enumerate() {
                let inflow: f64 = graph.edges(i).map(|(j, w)| w * outflow[j]).sum();
                *slot = base + self.damping * inflow;
            }

            residual = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
            std::mem::swap(&mut scores, &mut next);
        }

        let total: f64 = scores.iter().sum();
        if total > 0.0 && total.is_finite() {
            scores.iter_mut().for_each(|s| *s /= total);
        }

        PageRankResult {
            scores,
            iterations,
            residual,
            converged: residual <= self.tolerance,
        }
    }
}
