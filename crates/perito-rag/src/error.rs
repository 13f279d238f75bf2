//! Error types for the retrieval core

use thiserror::Error;

/// Errors that can occur while indexing or retrieving documents
#[derive(Error, Debug)]
pub enum RagError {
    /// Similarity search failed, including the fallback retry
    #[error("Search error: {0}")]
    Search(String),

    /// Writing to or reading from the index failed
    #[error("Index error: {0}")]
    Index(String),

    /// Text extraction failed
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by text extractors
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The PDF could not be parsed
    #[error("Failed to extract text from PDF {path}: {reason}")]
    Pdf {
        /// File being read
        path: String,
        /// Parser message
        reason: String,
    },

    /// No extractor handles this file type
    #[error("Unsupported file type: {0}")]
    Unsupported(String),
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Failed to access config file {path}: {source}")]
    Io {
        /// Config path
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be produced
    #[error("Failed to serialize to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
