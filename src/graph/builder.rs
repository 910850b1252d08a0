//! Graph builder with efficient edge handling
//!
//! This module provides a mutable graph builder that uses FxHashMap
//! for O(1) edge lookups during construction. Nodes are sentence indices.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::similarity::SimilarityMatrix;

/// How the edges of a similarity graph were produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Edges for pairs whose similarity exceeds the threshold
    #[default]
    Thresholded,
    /// No pair passed the threshold; every pair is linked with
    /// `similarity + epsilon`
    EpsilonFallback,
}

/// A node in the graph builder
#[derive(Debug, Clone, Default)]
pub struct BuilderNode {
    /// Adjacency list: target node ID -> edge weight
    pub edges: FxHashMap<u32, f64>,
}

/// A mutable undirected graph builder
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<BuilderNode>,
    mode: EdgeMode,
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with `n` isolated nodes
    pub fn with_nodes(n: usize) -> Self {
        Self {
            nodes: vec![BuilderNode::default(); n],
            mode: EdgeMode::Thresholded,
        }
    }

    /// Add `weight` to the undirected edge between two nodes
    ///
    /// Self-loops and unknown nodes are ignored.
    pub fn add_edge(&mut self, from: u32, to: u32, weight: f64) {
        if from == to || from as usize >= self.nodes.len() || to as usize >= self.nodes.len() {
            return;
        }
        *self.nodes[from as usize].edges.entry(to).or_insert(0.0) += weight;
        *self.nodes[to as usize].edges.entry(from).or_insert(0.0) += weight;
    }

    /// Build the sentence graph from a similarity matrix.
    ///
    /// Pairs with similarity strictly above `threshold` become edges. If
    /// that leaves a graph of two or more nodes without any edge, it is
    /// rebuilt fully connected with weight `similarity + epsilon` so
    /// ranking stays well-defined.
    pub fn from_similarity(matrix: &SimilarityMatrix, threshold: f64, epsilon: f64) -> Self {
        let n = matrix.len();
        let mut builder = Self::with_nodes(n);

        for i in 0..n {
            for j in (i + 1)..n {
                let sim = matrix.get(i, j);
                if sim > threshold {
                    builder.add_edge(i as u32, j as u32, sim);
                }
            }
        }

        if n > 1 && builder.edge_count() == 0 {
            warn!(
                sentences = n,
                threshold, "no similarity above threshold, using fully connected epsilon graph"
            );
            for i in 0..n {
                for j in (i + 1)..n {
                    builder.add_edge(i as u32, j as u32, matrix.get(i, j) + epsilon);
                }
            }
            builder.mode = EdgeMode::EpsilonFallback;
        }

        builder
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges (counting each undirected edge once)
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
    }

    /// How the edges were produced
    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
