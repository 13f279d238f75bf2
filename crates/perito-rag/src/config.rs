//! Configuration for PeritoAI
//!
//! One TOML file drives every binary. Each section has defaults, so an
//! empty file is a valid configuration.
//!
//! ```toml
//! [paths]
//! policies_dir = "data/policies"
//! index_path = "data/index.db"
//!
//! [retrieval]
//! max_chunks_per_doc = 10
//!
//! [llm]
//! provider = "ollama"
//! model = "llama3.1"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PERITO_CONFIG";

/// Environment variable overriding the webhook verify token
pub const VERIFY_TOKEN_ENV_VAR: &str = "WHATSAPP_VERIFY_TOKEN";

/// Default webhook verify token
pub const DEFAULT_VERIFY_TOKEN: &str = "peritoai_verify_token";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeritoConfig {
    /// Document and index locations
    pub paths: PathsConfig,

    /// Chunker settings
    pub chunking: ChunkerConfig,

    /// Retrieval settings
    pub retrieval: RetrievalConfig,

    /// Embedding provider
    pub embedding: EmbeddingConfig,

    /// Report drafting model
    pub llm: LlmConfig,

    /// HTTP server
    pub server: ServerConfig,
}

/// Document and index locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of policy documents
    pub policies_dir: PathBuf,

    /// Directory of internal protocol documents
    pub protocols_dir: PathBuf,

    /// SQLite index file
    pub index_path: PathBuf,

    /// Where exported reports are written
    pub reports_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            policies_dir: PathBuf::from("data/policies"),
            protocols_dir: PathBuf::from("data/internal_protocol_coverage"),
            index_path: PathBuf::from("data/index.db"),
            reports_dir: PathBuf::from("data/reports"),
        }
    }
}

/// Chunker settings, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Target chunk length
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,
}

impl ChunkerConfig {
    /// Validate the chunker settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::Invalid(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Retrieval settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Chunks per document when assembling report context
    pub max_chunks_per_doc: usize,

    /// Results per document for plain searches
    pub default_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_chunks_per_doc: 10,
            default_k: 5,
        }
    }
}

/// Which backend serves a provider section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// In-process deterministic mock
    Mock,
    /// Ollama HTTP API
    Ollama,
}

/// Embedding provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend
    pub provider: ProviderKind,

    /// API endpoint (Ollama only)
    pub endpoint: String,

    /// Model name (Ollama only)
    pub model: String,

    /// Vector dimension
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            endpoint: "http://localhost:11434".to_string(),
            model: "nomic-embed-text".to_string(),
            dimension: 768,
        }
    }
}

/// Report drafting model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend
    pub provider: ProviderKind,

    /// API endpoint (Ollama only)
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            temperature: 0.3,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub bind_address: String,

    /// Bind port
    pub bind_port: u16,

    /// Token expected by the webhook verification handshake
    pub verify_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 8000,
            verify_token: DEFAULT_VERIFY_TOKEN.to_string(),
        }
    }
}

impl ServerConfig {
    /// `address:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

impl PeritoConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chunking.validate()?;

        if self.retrieval.max_chunks_per_doc == 0 {
            return Err(ConfigError::Invalid(
                "max_chunks_per_doc must be greater than 0".to_string(),
            ));
        }
        if self.retrieval.default_k == 0 {
            return Err(ConfigError::Invalid(
                "default_k must be greater than 0".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }
        if self.server.verify_token.is_empty() {
            return Err(ConfigError::Invalid(
                "verify_token must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment overrides on top of the loaded values
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(VERIFY_TOKEN_ENV_VAR) {
            if !token.is_empty() {
                self.server.verify_token = token;
            }
        }
    }
}
