//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// CLI settings error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Engine configuration error
    #[error("Configuration error: {0}")]
    EngineConfig(#[from] perito_rag::ConfigError),

    /// Engine or server startup error
    #[error("{0}")]
    Server(#[from] perito_server::ServerError),

    /// Retrieval error
    #[error("{0}")]
    Rag(#[from] perito_rag::RagError),

    /// Report error
    #[error("{0}")]
    Report(#[from] perito_report::ReportError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
