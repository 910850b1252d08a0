//! Sentence encoders
//!
//! [`Embedder`] is the seam between the pipeline and whatever model turns
//! sentences into dense vectors. Implementations must be safe to share
//! across threads for concurrent read-only inference.

use std::hash::Hasher;
use twox_hash::XxHash64;

use crate::error::Result;
use crate::nlp::tokenizer::words;

/// Encodes sentences as fixed-size dense vectors
pub trait Embedder: Send + Sync {
    /// Length of every returned vector
    fn dim(&self) -> usize;

    /// Encode a batch, one vector per input text, in input order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Deterministic feature-hashing encoder
///
/// Words and adjacent word pairs are hashed into `dim` signed buckets.
/// No model files are needed, which makes it the embedder for tests and
/// for running the semantic strategy without a downloaded encoder.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
    seed: u64,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

impl HashingEmbedder {
    /// Create an embedder producing `dim`-sized vectors
    pub fn new(dim: usize) -> Self {
        Self {
            dim: dim.max(1),
            seed: 0,
        }
    }

    /// Use a different hash seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let mut hasher = XxHash64::with_seed(self.seed);
        hasher.write(feature.as_bytes());
        let h = hasher.finish();
        let idx = (h % self.dim as u64) as usize;
        let sign = if (h >> 63) == 0 { 1.0 } else { -1.0 };
        (idx, sign)
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let tokens = words(text);
        for token in &tokens {
            let (idx, sign) = self.bucket(token);
            v[idx] += sign;
        }
        for pair in tokens.windows(2) {
            let (idx, sign) = self.bucket(&pair.join(" "));
            v[idx] += 0.5 * sign;
        }
        super::l2_normalize(&mut v);
        v
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine;

    #[test]
    fn test_hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder::new(64);
        let a = embedder.embed_batch(&["Scale up community health workers."]).unwrap();
        let b = embedder.embed_batch(&["Scale up community health workers."]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].len(), 64);
    }

    #[test]
    fn test_hashing_embedder_unit_length() {
        let embedder = HashingEmbedder::default();
        let v = &embedder.embed_batch(&["Expand coverage of primary care."]).unwrap()[0];
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_words_increase_similarity() {
        let embedder = HashingEmbedder::new(256);
        let vs = embedder
            .embed_batch(&[
                "Rural clinics need more trained midwives.",
                "Rural clinics need more trained nurses.",
                "Tax revenue fell sharply last year.",
            ])
            .unwrap();
        assert!(cosine(&vs[0], &vs[1]) > cosine(&vs[0], &vs[2]));
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8);
        let v = &embedder.embed_batch(&[""]).unwrap()[0];
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
