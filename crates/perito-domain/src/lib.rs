//! PeritoAI Domain Layer
//!
//! This crate contains the core value types and trait seams shared by every
//! other PeritoAI crate. It has no infrastructure dependencies: storage,
//! embedding, text extraction and report drafting live behind the traits in
//! [`traits`] and are implemented elsewhere.
//!
//! ## Key Concepts
//!
//! - **Document**: a source file (policy or protocol) identified by its filename stem
//! - **Chunk**: a bounded, overlapping slice of a document's extracted text
//! - **Search result**: a chunk plus its distance score (lower is better)
//! - **Parsed claim**: structured fields pulled out of an adjuster's pasted claim data
//!
//! ## Architecture
//!
//! - No infrastructure crates (only `uuid`, and `serde` behind a feature)
//! - Pure data and matching rules
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunk;
pub mod claim;
pub mod document;
pub mod search;
pub mod traits;

// Re-exports for convenience
pub use chunk::{ChunkId, ChunkMetadata};
pub use claim::ParsedClaim;
pub use document::{DocumentInfo, DocumentType};
pub use search::{ids_fuzzy_match, normalize_id, SearchResult};
