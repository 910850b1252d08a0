//! Stage trait definitions for the pipeline.
//!
//! The similarity stage is the one seam with interchangeable strategies.
//! The runner is generic over it, so the default lexical pipeline is
//! statically dispatched; boxed trait objects are supported for choosing a
//! strategy at runtime.

use std::sync::Arc;

use crate::error::Result;
use crate::similarity::SimilarityMatrix;
use crate::types::Sentence;

/// Computes the pairwise similarity matrix over a document's sentences.
///
/// # Contract
///
/// - **Input**: sentences in index order (`sentences[i].index == i`).
/// - **Output**: an n×n [`SimilarityMatrix`], symmetric with values in
///   [0, 1] and a zero diagonal. n = 0 and n = 1 must not fail.
/// - **Deterministic**: the same sentences give the same matrix.
pub trait SimilarityBuilder {
    /// Build the similarity matrix.
    fn build(&self, sentences: &[Sentence]) -> Result<SimilarityMatrix>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "similarity"
    }
}

impl<T: SimilarityBuilder + ?Sized> SimilarityBuilder for Box<T> {
    fn build(&self, sentences: &[Sentence]) -> Result<SimilarityMatrix> {
        (**self).build(sentences)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: SimilarityBuilder + ?Sized> SimilarityBuilder for Arc<T> {
    fn build(&self, sentences: &[Sentence]) -> Result<SimilarityMatrix> {
        (**self).build(sentences)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Runtime-selected similarity strategy
pub type DynSimilarity = Box<dyn SimilarityBuilder + Send + Sync>;
