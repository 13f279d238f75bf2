//! PeritoAI LLM Provider Layer
//!
//! Pluggable implementations of the `LlmProvider` and `EmbeddingProvider`
//! traits from `perito-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Ollama chat API, used to draft reports
//! - `OllamaEmbedder`: Ollama embeddings API, used by the chunk store
//!
//! All network providers are synchronous. Async callers run them on a
//! blocking thread.
//!
//! # Examples
//!
//! ```
//! use perito_llm::MockProvider;
//! use perito_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Informe generado");
//! let result = provider.generate("system", "user").unwrap();
//! assert_eq!(result, "Informe generado");
//! ```

#![warn(missing_docs)]

pub mod embeddings;
pub mod ollama;

use perito_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use embeddings::OllamaEmbedder;
pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
    ModelNotFound,
}

#[derive(Debug, Default)]
struct MockState {
    replies: Vec<(String, MockReply)>,
    call_count: usize,
    last_prompts: Option<(String, String)>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// configured reply is used when its key appears anywhere in the user
/// prompt; the first matching key wins.
///
/// # Examples
///
/// ```
/// use perito_llm::MockProvider;
/// use perito_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("sys", "any prompt").unwrap(), "Fixed response");
///
/// // Keyed responses
/// let mut provider = MockProvider::default();
/// provider.add_response("ROTURA", "informe de rotura");
/// assert_eq!(provider.generate("sys", "Causa: ROTURA DE TUBERIA").unwrap(), "informe de rotura");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock".to_string(),
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Set the model name reported by this provider
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a specific response for user prompts containing `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.state()
            .replies
            .push((key.into(), MockReply::Text(response.into())));
    }

    /// Configure to return a generic error for user prompts containing `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        self.state().replies.push((key.into(), MockReply::Error));
    }

    /// Configure to report the model as missing for user prompts containing `key`
    ///
    /// An empty key matches every prompt.
    pub fn add_model_not_found(&mut self, key: impl Into<String>) {
        self.state()
            .replies
            .push((key.into(), MockReply::ModelNotFound));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.state().call_count = 0;
    }

    /// System and user prompt of the most recent call
    pub fn last_prompts(&self) -> Option<(String, String)> {
        self.state().last_prompts.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, Self::Error> {
        let mut state = self.state();
        state.call_count += 1;
        state.last_prompts = Some((system_prompt.to_string(), user_prompt.to_string()));

        let reply = state
            .replies
            .iter()
            .find(|(key, _)| user_prompt.contains(key.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            Some(MockReply::ModelNotFound) => Err(LlmError::ModelNotAvailable(self.model.clone())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
