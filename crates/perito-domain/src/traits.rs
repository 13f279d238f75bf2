//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the retrieval logic and
//! infrastructure. Implementations live in other crates.

use crate::{ChunkMetadata, SearchResult};
use std::path::Path;

/// Embedding-backed similarity index over chunks
///
/// Implemented by the infrastructure layer (perito-store). Writers take
/// `&mut self`, so holding the index behind a read/write lock gives the
/// single-writer, many-readers discipline the index requires.
pub trait SimilarityIndex {
    /// Error type for index operations
    type Error;

    /// Embed and persist chunks; `texts` and `metadatas` are parallel slices
    ///
    /// Returns the number of chunks added.
    fn add(&mut self, texts: &[String], metadatas: &[ChunkMetadata]) -> Result<usize, Self::Error>;

    /// Return up to `k` chunks closest to `query`, ascending by score
    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>, Self::Error>;

    /// Metadata of every stored chunk, in insertion order
    ///
    /// `Ok(None)` means the index cannot enumerate its contents directly.
    fn all_metadata(&self) -> Result<Option<Vec<ChunkMetadata>>, Self::Error>;

    /// Discard every stored chunk
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Number of stored chunks
    fn chunk_count(&self) -> Result<usize, Self::Error>;
}

/// Trait for embedding providers
///
/// Implemented by perito-store (mock) and perito-llm (Ollama)
pub trait EmbeddingProvider {
    /// Error type for embedding operations
    type Error;

    /// Generate an embedding vector for the given text
    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error>;

    /// Dimension of the vectors produced by this provider
    fn dimension(&self) -> usize;
}

/// Trait for turning a source file into raw text
///
/// Implemented by the application layer (perito-rag)
pub trait TextExtractor {
    /// Error type for extraction
    type Error;

    /// Whether this extractor handles the given file
    fn supports(&self, path: &Path) -> bool;

    /// Extract the text content of a file
    fn extract(&self, path: &Path) -> Result<String, Self::Error>;
}

/// Trait for the report drafting service
///
/// Implemented by the infrastructure layer (perito-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text from a system prompt and a user prompt
    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model requests are sent to
    fn model_name(&self) -> &str;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<T> {
    type Error = T::Error;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<T: LlmProvider + ?Sized> LlmProvider for Box<T> {
    type Error = T::Error;

    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Self::Error> {
        (**self).generate(system_prompt, user_prompt)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
