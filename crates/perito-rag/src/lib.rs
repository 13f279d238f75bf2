//! PeritoAI Retrieval Core
//!
//! Indexes policy and protocol documents into chunks, retrieves the chunks
//! relevant to a claim from a user-selected set of documents, and formats
//! them as context for report drafting.
//!
//! # Architecture
//!
//! ```text
//! raw text → TextChunker → Indexer → SimilarityIndex (embed + persist)
//!
//! query + document ids → RetrievalEngine → assemble_context → context string
//! ```
//!
//! # Key Features
//!
//! - **Overlapping chunks**: char-based, lossless, boundary-aware
//! - **Fuzzy document ids**: `"HOGAR"` selects `"POLIZA_HOGAR_GLOBAL"`
//! - **Per-document balance**: every selected document gets its own quota
//! - **Degraded paths**: one unfiltered retry on search failure, broad-query catalog
//! - **Claim parsing**: labelled fields and a search query from pasted claim data
//!
//! # Example Usage
//!
//! ```no_run
//! use perito_rag::{MultiFormatExtractor, PeritoConfig, RagEngine};
//! use perito_store::SqliteStore;
//! use perito_store::embedding::MockEmbeddingModel;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PeritoConfig::default();
//! let store = SqliteStore::open(&config.paths.index_path, MockEmbeddingModel::new(768))?;
//! let mut engine = RagEngine::new(store, MultiFormatExtractor::new(), config);
//!
//! let report = engine.index_documents(true, true, true)?;
//! println!("Indexed {} chunks", report.chunks);
//!
//! let ids = vec!["POLIZA_HOGAR".to_string()];
//! let context = engine.get_documents_context(&ids, "daños por agua", 10)?;
//! println!("{}", context);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod catalog;
mod chunking;
mod claim_parser;
mod config;
mod context;
mod engine;
mod error;
mod extract;
mod indexer;
mod retrieval;

#[cfg(test)]
mod testing;

pub use catalog::{DocumentCatalog, BROAD_QUERIES, BROAD_QUERY_K};
pub use chunking::TextChunker;
pub use claim_parser::ClaimDataParser;
pub use config::{
    ChunkerConfig, EmbeddingConfig, LlmConfig, PathsConfig, PeritoConfig, ProviderKind,
    RetrievalConfig, ServerConfig, CONFIG_ENV_VAR, DEFAULT_VERIFY_TOKEN, VERIFY_TOKEN_ENV_VAR,
};
pub use context::{assemble_context, format_context, no_sections_found, NO_DOCUMENTS_SELECTED};
pub use engine::RagEngine;
pub use error::{ConfigError, ExtractError, RagError};
pub use extract::{MultiFormatExtractor, PdfTextExtractor, PlainTextExtractor};
pub use indexer::{ChunkBatch, IndexReport, Indexer};
pub use retrieval::RetrievalEngine;
