//! Error types for report assembly

use perito_rag::RagError;
use thiserror::Error;

/// Models suggested when the configured one is unavailable
pub const SUGGESTED_MODELS: &[&str] = &["llama3.1", "llama3.2", "mistral"];

/// Report assembly errors
#[derive(Error, Debug)]
pub enum ReportError {
    /// Rejected before any index or model call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The drafting model is not available on the provider
    #[error(
        "Model '{model}' not found or not available.\nError details: {details}\nPlease try one of these models: {}",
        SUGGESTED_MODELS.join(", ")
    )]
    ModelUnavailable {
        /// Configured model name
        model: String,
        /// Provider error text
        details: String,
    },

    /// Any other drafting failure
    #[error("Error generating report: {0}")]
    Generation(String),

    /// Context retrieval failed
    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RagError),

    /// Writing an exported report failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
