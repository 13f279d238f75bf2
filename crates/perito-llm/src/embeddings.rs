//! Ollama embeddings provider
//!
//! Computes chunk and query vectors with Ollama's `/api/embeddings`
//! endpoint. The store validates every vector against [`dimension`].
//!
//! [`dimension`]: perito_domain::traits::EmbeddingProvider::dimension

use crate::LlmError;
use perito_domain::traits::EmbeddingProvider;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

const EMBED_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Embedding provider backed by a local Ollama instance
pub struct OllamaEmbedder {
    endpoint: String,
    model: String,
    dimension: usize,
    client: Client,
}

impl OllamaEmbedder {
    /// Create an embedder for `model`, expecting vectors of `dimension`
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(EMBED_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            dimension,
            client,
        })
    }

    /// Model used for embeddings
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl EmbeddingProvider for OllamaEmbedder {
    type Error = LlmError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&EmbeddingRequest { model: &self.model, prompt: text })
            .send()
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Communication(format!("HTTP {}: {}", status, body)));
        }

        let embedding = response
            .json::<EmbeddingResponse>()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse embedding: {}", e)))?
            .embedding;

        if embedding.len() != self.dimension {
            return Err(LlmError::InvalidResponse(format!(
                "Expected {} dimensions from {}, got {}",
                self.dimension,
                self.model,
                embedding.len()
            )));
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

    #[test]
    fn test_embedder_creation() {
        let embedder = OllamaEmbedder::new("http://localhost:11434/", DEFAULT_EMBEDDING_MODEL, 768).unwrap();
        assert_eq!(embedder.endpoint, "http://localhost:11434");
        assert_eq!(embedder.model(), "nomic-embed-text");
        assert_eq!(embedder.dimension(), 768);
    }

    #[test]
    fn test_embedder_unreachable_endpoint() {
        let embedder = OllamaEmbedder::new("http://localhost:99999", DEFAULT_EMBEDDING_MODEL, 768).unwrap();
        assert!(matches!(embedder.embed("texto"), Err(LlmError::Communication(_))));
    }
}
