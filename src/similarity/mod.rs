//! Pairwise sentence similarity
//!
//! Both strategies produce a [`SimilarityMatrix`]: symmetric, values in
//! [0, 1], zero diagonal. Lexical similarity comes from TF-IDF vectors,
//! semantic similarity from dense embeddings produced by an [`Embedder`]
//! obtained through a [`ModelProvider`].

#[cfg(feature = "candle")]
pub mod bert;
pub mod embedder;
pub mod provider;
pub mod semantic;
pub mod tfidf;

pub use embedder::{Embedder, HashingEmbedder};
pub use provider::ModelProvider;
pub use semantic::SemanticSimilarity;
pub use tfidf::{TermVector, TfIdfSimilarity, TfIdfVectorizer};

use rayon::prelude::*;

/// Matrices at least this large are filled in parallel
const PARALLEL_THRESHOLD: usize = 256;

/// Dense symmetric n×n similarity matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// All-zero matrix
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Build from a pair function evaluated on the upper triangle.
    ///
    /// Values are clamped to [0, 1] (non-finite values become 0) and
    /// mirrored, so the result is symmetric with a zero diagonal no matter
    /// what `f` returns.
    pub fn from_fn<F>(n: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> f64 + Sync,
    {
        let upper_row = |i: usize| -> Vec<f64> { ((i + 1)..n).map(|j| sanitize(f(i, j))).collect() };

        let rows: Vec<Vec<f64>> = if n >= PARALLEL_THRESHOLD {
            (0..n).into_par_iter().map(upper_row).collect()
        } else {
            (0..n).map(upper_row).collect()
        };

        let mut matrix = Self::zeros(n);
        for (i, row) in rows.into_iter().enumerate() {
            for (offset, value) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                matrix.values[i * n + j] = value;
                matrix.values[j * n + i] = value;
            }
        }
        matrix
    }

    /// Cosine similarity between dense vectors
    pub fn from_embeddings(vectors: &[Vec<f32>]) -> Self {
        Self::from_fn(vectors.len(), |i, j| cosine(&vectors[i], &vectors[j]))
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.n
    }

    /// Whether the matrix has no rows
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity of sentences `i` and `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Weighted degree of sentence `i`
    pub fn row_sum(&self, i: usize) -> f64 {
        self.row(i).iter().sum()
    }

    /// Largest off-diagonal value (0 for n < 2)
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Cosine similarity of two dense vectors (0 if either is all-zero)
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scale a vector to unit L2 norm in place (all-zero vectors are left alone)
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_symmetric_with_zero_diagonal() {
        let m = SimilarityMatrix::from_fn(4, |i, j| (i + j) as f64 / 10.0);
        for i in 0..4 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert!((m.get(1, 3) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_values_are_clamped() {
        let m = SimilarityMatrix::from_fn(3, |i, _| match i {
            0 => -0.5,
            1 => f64::NAN,
            _ => 2.0,
        });
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(1, 2), 0.0);
        assert!(m.values.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_single_and_empty() {
        let m = SimilarityMatrix::from_fn(1, |_, _| 1.0);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.max_value(), 0.0);

        assert!(SimilarityMatrix::from_fn(0, |_, _| 1.0).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let n = PARALLEL_THRESHOLD + 3;
        let m = SimilarityMatrix::from_fn(n, |i, j| ((i * 31 + j * 17) % 100) as f64 / 100.0);
        assert!((m.get(5, 200) - ((5 * 31 + 200 * 17) % 100) as f64 / 100.0).abs() < 1e-12);
        assert_eq!(m.get(200, 5), m.get(5, 200));
    }

    #[test]
    fn test_cosine_and_row_sum() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]];
        let m = SimilarityMatrix::from_embeddings(&vectors);
        assert!((m.get(0, 1) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert_eq!(m.get(0, 2), 0.0);
        assert!((m.row_sum(1) - m.get(0, 1)).abs() < 1e-12);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        let mut zero = vec![0.0f32; 3];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0; 3]);
    }
}
