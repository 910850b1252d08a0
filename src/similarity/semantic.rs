//! Semantic similarity from sentence embeddings

use std::sync::Arc;

use tracing::debug;

use super::{l2_normalize, ModelProvider, SimilarityMatrix};
use crate::error::{Error, Result};
use crate::pipeline::traits::SimilarityBuilder;
use crate::types::Sentence;

/// Cosine similarity between L2-normalized sentence embeddings
#[derive(Debug, Clone)]
pub struct SemanticSimilarity {
    provider: Arc<ModelProvider>,
}

impl SemanticSimilarity {
    /// Create a builder drawing its model from `provider`
    pub fn new(provider: Arc<ModelProvider>) -> Self {
        Self { provider }
    }

    /// The shared model handle
    pub fn provider(&self) -> &Arc<ModelProvider> {
        &self.provider
    }

    /// Encode texts, checking the embedder's output shape
    pub fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.provider.get()?;
        let mut vectors = model.embed_batch(texts)?;
        if vectors.len() != texts.len() {
            return Err(Error::DimensionMismatch {
                expected: texts.len(),
                found: vectors.len(),
            });
        }

        let dim = model.dim();
        for vector in &mut vectors {
            if vector.len() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    found: vector.len(),
                });
            }
            l2_normalize(vector);
        }

        debug!(sentences = texts.len(), dim, "sentences embedded");
        Ok(vectors)
    }
}

impl SimilarityBuilder for SemanticSimilarity {
    fn build(&self, sentences: &[Sentence]) -> Result<SimilarityMatrix> {
        let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
        let vectors = self.embed(&texts)?;
        Ok(SimilarityMatrix::from_embeddings(&vectors))
    }

    fn name(&self) -> &'static str {
        "semantic"
    }
}
