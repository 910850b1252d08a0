//! MMR-based sentence selection for summarization
//!
//! Implements Maximal Marginal Relevance (MMR) for selecting
//! diverse yet relevant sentences for extractive summarization.

use crate::similarity::SimilarityMatrix;

/// Configuration for sentence selection
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Lambda parameter for MMR (0 = diversity only, 1 = relevance only)
    pub lambda: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self { lambda: 0.7 }
    }
}

/// MMR-based sentence selector
#[derive(Debug, Clone, Default)]
pub struct SentenceSelector {
    config: SelectorConfig,
}

impl SentenceSelector {
    /// Create a new selector with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Set lambda (relevance vs diversity tradeoff)
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.lambda = lambda.clamp(0.0, 1.0);
        self
    }

    /// Select up to `k` candidates using MMR
    ///
    /// MMR formula: λ * rel(i) - (1-λ) * max_{j ∈ selected} sim(i, j)
    ///
    /// Indices are returned in pick order; every index is unique.
    pub fn select(
        &self,
        candidates: &[usize],
        scores: &[f64],
        similarity: &SimilarityMatrix,
        k: usize,
    ) -> Vec<usize> {
        self.select_seeded(candidates, scores, similarity, k, &[])
    }

    /// Select up to `k` new candidates given an existing selection.
    ///
    /// `seed` counts toward redundancy but is never returned. Relevance is
    /// min-max normalized over the remaining candidates; an all-equal score
    /// range is left unnormalized. Ties keep the lowest sentence index.
    pub fn select_seeded(
        &self,
        candidates: &[usize],
        scores: &[f64],
        similarity: &SimilarityMatrix,
        k: usize,
        seed: &[usize],
    ) -> Vec<usize> {
        let mut remaining: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&i| i < similarity.len() && !seed.contains(&i))
            .collect();
        remaining.sort_unstable();
        remaining.dedup();

        if remaining.is_empty() || k == 0 {
            return Vec::new();
        }

        let relevance = normalized_relevance(&remaining, scores);

        // Diversity component: max similarity to anything already selected
        let mut max_sim: Vec<f64> = remaining
            .iter()
            .map(|&i| seed.iter().map(|&s| similarity.get(i, s)).fold(0.0, f64::max))
            .collect();

        let lambda = self.config.lambda;
        let mut picked: Vec<bool> = vec![false; remaining.len()];
        let mut selected: Vec<usize> = Vec::with_capacity(k.min(remaining.len()));

        while selected.len() < k {
            let mut best: Option<usize> = None;
            let mut best_mmr = f64::NEG_INFINITY;

            for (pos, _) in remaining.iter().enumerate() {
                if picked[pos] {
                    continue;
                }
                let mmr = lambda * relevance[pos] - (1.0 - lambda) * max_sim[pos];
                if mmr > best_mmr {
                    best_mmr = mmr;
                    best = Some(pos);
                }
            }

            let Some(pos) = best else {
                break;
            };
            picked[pos] = true;
            let chosen = remaining[pos];
            selected.push(chosen);

            for (other, &idx) in remaining.iter().enumerate() {
                if !picked[other] {
                    max_sim[other] = max_sim[other].max(similarity.get(idx, chosen));
                }
            }
        }

        selected
    }
}

fn normalized_relevance(candidates: &[usize], scores: &[f64]) -> Vec<f64> {
    let raw: Vec<f64> = candidates
        .iter()
        .map(|&i| scores.get(i).copied().filter(|s| s.is_finite()).unwrap_or(0.0))
        .collect();
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range > f64::EPSILON {
        raw.iter().map(|s| (s - min) / range).collect()
    } else {
        raw
    }
}
