//! Compressed Sparse Row (CSR) sentence graph
//!
//! The frozen form of a [`GraphBuilder`]: each sentence's neighbors sit in
//! one contiguous slice, sorted by sentence index, next to its weighted
//! degree. Power iteration walks every slice once per round.

use super::builder::{EdgeMode, GraphBuilder};

/// Undirected weighted sentence graph in CSR layout
#[derive(Debug, Clone)]
pub struct SentenceGraph {
    /// Sentence `i` owns `targets[offsets[i]..offsets[i + 1]]`
    offsets: Vec<usize>,
    targets: Vec<u32>,
    weights: Vec<f64>,
    /// Sum of edge weights per sentence
    strength: Vec<f64>,
    mode: EdgeMode,
}

impl Default for SentenceGraph {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            targets: Vec::new(),
            weights: Vec::new(),
            strength: Vec::new(),
            mode: EdgeMode::Thresholded,
        }
    }
}

impl SentenceGraph {
    /// Freeze a builder; neighbor order is ascending sentence index.
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let n = builder.node_count();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();
        let mut strength = Vec::with_capacity(n);
        offsets.push(0);

        for (_, node) in builder.nodes() {
            let mut row: Vec<(u32, f64)> = node.edges.iter().map(|(&t, &w)| (t, w)).collect();
            row.sort_unstable_by_key(|&(t, _)| t);

            strength.push(row.iter().map(|&(_, w)| w).sum());
            for (target, weight) in row {
                targets.push(target);
                weights.push(weight);
            }
            offsets.push(targets.len());
        }

        Self {
            offsets,
            targets,
            weights,
            strength,
            mode: builder.mode(),
        }
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.strength.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strength.is_empty()
    }

    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    /// Neighbors of `sentence` with edge weights
    pub fn edges(&self, sentence: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.offsets[sentence]..self.offsets[sentence + 1];
        self.targets[span.clone()]
            .iter()
            .zip(&self.weights[span])
            .map(|(&t, &w)| (t as usize, w))
    }

    /// Weighted degree of `sentence`
    pub fn strength(&self, sentence: usize) -> f64 {
        self.strength[sentence]
    }

    /// Undirected edges, each counted once
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Sentences without any edge
    pub fn isolated(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.offsets[i] == self.offsets[i + 1])
            .collect()
    }
}
