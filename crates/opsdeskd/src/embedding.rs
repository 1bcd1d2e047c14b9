//! Embedding port.
//!
//! The engine only depends on this interface; the model behind it is
//! external. `HashEmbedder` is the local implementation used by the demo
//! binary and tests: a hashed bag-of-words, deterministic across runs.

use async_trait::async_trait;
use opsdesk_common::TriageError;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one text into a vector. Dimensionality must be consistent
    /// across all calls on one instance.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TriageError>;

    fn dimension(&self) -> usize;
}

/// Cosine similarity in [-1, 1]. Zero-norm input yields 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Deterministic local embedder: lowercased word tokens hashed into a
/// fixed-dimension bag, L2-normalized. Texts sharing vocabulary score
/// positive similarity, disjoint texts score near zero.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, TriageError> {
        let mut vector = vec![0.0f32; self.dim];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let slot = (hasher.finish() % self.dim as u64) as usize;
            vector[slot] += 1.0;
        }
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in vector.iter_mut() {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedding_is_deterministic() {
        let embedder = HashEmbedder::default();
        let a = embedder.embed("reset the user password").await.unwrap();
        let b = embedder.embed("reset the user password").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn related_texts_score_higher_than_unrelated() {
        let embedder = HashEmbedder::default();
        let query = embedder.embed("password reset locked account").await.unwrap();
        let related = embedder
            .embed("reset the password for a locked out account")
            .await
            .unwrap();
        let unrelated = embedder
            .embed("quarterly revenue projections spreadsheet")
            .await
            .unwrap();
        assert!(cosine_similarity(&query, &related) > cosine_similarity(&query, &unrelated));
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = [0.6f32, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }
}
