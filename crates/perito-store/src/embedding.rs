//! Embedding Model for Text Vectorization
//!
//! Real embeddings come from an external provider (see `perito-llm`). This
//! module provides an offline, deterministic model used by tests and by the
//! `mock` embedding configuration.
//!
//! # Architecture
//!
//! - **MockEmbeddingModel**: hashed bag-of-words vectors, unit length
//!
//! # Examples
//!
//! ```rust
//! use perito_store::embedding::MockEmbeddingModel;
//! use perito_domain::traits::EmbeddingProvider;
//!
//! let model = MockEmbeddingModel::new(384);
//! let embedding = model.embed("Rotura de tubería en cocina").unwrap();
//! assert_eq!(embedding.len(), 384);
//!
//! // Same text always produces same embedding
//! assert_eq!(embedding, model.embed("Rotura de tubería en cocina").unwrap());
//! ```

use perito_domain::traits::EmbeddingProvider;
use thiserror::Error;

/// Errors that can occur during embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Invalid input text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model inference error
    #[error("Model inference failed: {0}")]
    InferenceFailed(String),
}

/// Mock embedding model for offline use
///
/// Every lower-cased word is hashed into one of `dimension` buckets with a
/// hash-derived sign, and the resulting vector is normalized. The vectors are:
///
/// - **Deterministic**: Same text always produces same embedding, across runs
/// - **Normalized**: Unit length, ready for cosine distance
/// - **Lexical**: Texts sharing words end up closer than unrelated texts
#[derive(Debug, Clone)]
pub struct MockEmbeddingModel {
    dimension: usize,
}

impl MockEmbeddingModel {
    /// Create a new mock embedding model
    ///
    /// # Parameters
    ///
    /// - `dimension`: The embedding dimension (e.g., 384)
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// 64-bit FNV-1a; stable across Rust versions so persisted vectors stay valid
    fn hash_token(token: &str) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        token.bytes().fold(OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(PRIME)
        })
    }
}

impl EmbeddingProvider for MockEmbeddingModel {
    type Error = EmbeddingError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        if text.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Empty text cannot be embedded".to_string(),
            ));
        }
        if self.dimension == 0 {
            return Err(EmbeddingError::InferenceFailed(
                "Embedding dimension must be greater than 0".to_string(),
            ));
        }

        let lowered = text.to_lowercase();
        let mut tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        // Punctuation-only text still gets a vector
        if tokens.is_empty() {
            tokens.push(lowered.as_str());
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for token in tokens {
            let hash = Self::hash_token(token);
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 1 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        // Normalize to unit length for cosine distance
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut embedding {
                *value /= magnitude;
            }
        } else {
            // Every token cancelled out; fall back to a fixed direction
            embedding[0] = 1.0;
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_mock_embedding_deterministic() {
        let model = MockEmbeddingModel::new(384);

        let text = "Daños por agua en el bien asegurado";
        assert_eq!(model.embed(text).unwrap(), model.embed(text).unwrap());
    }

    #[test]
    fn test_mock_embedding_dimension() {
        let model = MockEmbeddingModel::new(128);

        let embedding = model.embed("cobertura").unwrap();
        assert_eq!(embedding.len(), 128);
        assert_eq!(model.dimension(), 128);
    }

    #[test]
    fn test_mock_embedding_normalized() {
        let model = MockEmbeddingModel::new(384);

        let embedding = model.embed("franquicia de la póliza").unwrap();
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 0.0001, "Embedding should be normalized");
    }

    #[test]
    fn test_shared_words_are_closer() {
        let model = MockEmbeddingModel::new(512);

        let query = model.embed("rotura de tubería").unwrap();
        let related = model.embed("la rotura de una tubería provoca daños por agua").unwrap();
        let unrelated = model.embed("robo con violencia en vivienda habitual").unwrap();

        assert!(cosine(&query, &related) > cosine(&query, &unrelated));
    }

    #[test]
    fn test_mock_embedding_empty_text() {
        let model = MockEmbeddingModel::new(384);

        let result = model.embed("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty text"));
    }

    #[test]
    fn test_punctuation_only_text_embeds() {
        let model = MockEmbeddingModel::new(64);
        let embedding = model.embed("----").unwrap();
        assert_eq!(embedding.len(), 64);
    }
}
