//! Sentence centrality ranking
//!
//! TextRank over the sentence similarity graph. Ranking never fails: when
//! PageRank does not converge or yields unusable scores, sentences are
//! scored by weighted degree (similarity row sums), and if the document
//! has no similarity mass at all, uniformly.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::{EdgeMode, GraphBuilder, SentenceGraph};
use crate::pagerank::PageRank;
use crate::similarity::SimilarityMatrix;
use crate::types::{Section, Sentence, SummaryConfig};

/// Which scoring produced the ranks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMethod {
    PageRank,
    /// Normalized similarity row sums
    Degree,
    Uniform,
}

/// Scores plus diagnostics of one ranking run
#[derive(Debug, Clone)]
pub struct RankOutput {
    /// One non-negative score per sentence index
    pub scores: Vec<f64>,
    pub method: RankMethod,
    pub edge_mode: EdgeMode,
    pub nodes: usize,
    /// Undirected edge count
    pub edges: usize,
    pub iterations: usize,
    pub converged: bool,
    pub residual: f64,
}

/// PageRank-based sentence ranker with degree fallback
#[derive(Debug, Clone)]
pub struct SentenceRanker {
    pagerank: PageRank,
    threshold: f64,
    epsilon: f64,
}

impl Default for SentenceRanker {
    fn default() -> Self {
        Self::from_config(&SummaryConfig::default())
    }
}

impl SentenceRanker {
    /// Create a ranker from the pipeline configuration
    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            pagerank: PageRank::new()
                .with_damping(config.damping)
                .with_max_iterations(config.max_iterations)
                .with_tolerance(config.tolerance),
            threshold: config.similarity_threshold,
            epsilon: config.epsilon_weight,
        }
    }

    /// Replace the PageRank settings
    pub fn with_pagerank(mut self, pagerank: PageRank) -> Self {
        self.pagerank = pagerank;
        self
    }

    /// Rank every sentence of the matrix
    pub fn rank(&self, matrix: &SimilarityMatrix) -> RankOutput {
        let builder = GraphBuilder::from_similarity(matrix, self.threshold, self.epsilon);
        let graph = SentenceGraph::from_builder(&builder);
        let result = self.pagerank.run(&graph);

        let sum: f64 = result.scores.iter().sum();
        let usable = result.converged && result.is_valid() && (matrix.is_empty() || sum > 0.0);

        let (scores, method) = if usable {
            (result.scores, RankMethod::PageRank)
        } else {
            warn!(
                iterations = result.iterations,
                residual = result.residual,
                "pagerank failed, falling back to degree scores"
            );
            degree_scores(matrix)
        };

        debug!(
            sentences = matrix.len(),
            edges = builder.edge_count(),
            ?method,
            "sentences ranked"
        );

        RankOutput {
            scores,
            method,
            edge_mode: graph.mode(),
            nodes: graph.len(),
            edges: builder.edge_count(),
            iterations: result.iterations,
            converged: result.converged,
            residual: result.residual,
        }
    }
}

/// Scores proportional to weighted degree, normalized to sum to 1.
///
/// Uniform when no sentence has any similarity mass.
pub fn degree_scores(matrix: &SimilarityMatrix) -> (Vec<f64>, RankMethod) {
    let n = matrix.len();
    let degrees: Vec<f64> = (0..n).map(|i| matrix.row_sum(i)).collect();
    let total: f64 = degrees.iter().sum();

    if total > 0.0 && total.is_finite() {
        (degrees.iter().map(|d| d / total).collect(), RankMethod::Degree)
    } else {
        if n > 0 {
            warn!(sentences = n, "no similarity mass, using uniform scores");
        }
        (vec![1.0 / n.max(1) as f64; n], RankMethod::Uniform)
    }
}

/// Multiplicative boost for the first sentence of each section
///
/// For section `s` of `S`, the first sentence's score is multiplied by
/// `1 + early * (S - s) / S`, plus `goal` more when the section title
/// names goals, objectives or principles. Scores are not renormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionBoost {
    pub early: f64,
    pub goal: f64,
}

impl PositionBoost {
    /// Boost weights from the configuration
    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            early: config.early_section_boost,
            goal: config.goal_section_boost,
        }
    }

    /// Boost per sentence index (0 for all but section openers)
    pub fn boosts(&self, sentences: &[Sentence], sections: &[Section]) -> Vec<f64> {
        let total = sections.len().max(1) as f64;
        let mut boosts = vec![0.0; sentences.len()];
        let mut seen = vec![false; sections.len()];

        for sentence in sentences {
            let s = sentence.section;
            if s >= sections.len() || seen[s] {
                continue;
            }
            seen[s] = true;

            let mut boost = self.early * (total - s as f64) / total;
            if sections[s].is_goal_section() {
                boost += self.goal;
            }
            if let Some(b) = boosts.get_mut(sentence.index) {
                *b = boost;
            }
        }
        boosts
    }

    /// Multiply scores in place
    pub fn apply(&self, scores: &mut [f64], sentences: &[Sentence], sections: &[Section]) {
        for (score, boost) in scores.iter_mut().zip(self.boosts(sentences, sections)) {
            *score *= 1.0 + boost;
        }
    }
}
