//! Chunk module - the unit stored in the similarity index

use crate::document::DocumentType;
use std::fmt;

/// Unique identifier for a stored chunk based on UUIDv7
///
/// Chunk ids are assigned at insert time. Re-indexing the same file creates
/// new chunks with new ids; the document id is what stays stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(u128);

impl ChunkId {
    /// Generate a new UUIDv7-based ChunkId
    ///
    /// # Examples
    ///
    /// ```
    /// use perito_domain::ChunkId;
    ///
    /// let id = ChunkId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ChunkId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Metadata attached to every chunk
///
/// Immutable once the chunk is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkMetadata {
    /// Owning document id (filename stem)
    pub document_id: String,

    /// Owning document type
    pub document_type: DocumentType,

    /// Source filename
    pub source: String,

    /// Source directory tag (see [`DocumentType::source_dir`])
    pub source_dir: String,

    /// Full path of the file the chunk was extracted from
    pub file_path: String,
}

impl ChunkMetadata {
    /// Create metadata, deriving the directory tag from the document type
    pub fn new(
        document_id: impl Into<String>,
        document_type: DocumentType,
        source: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            document_type,
            source: source.into(),
            source_dir: document_type.source_dir().to_string(),
            file_path: file_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_ids_are_unique() {
        assert_ne!(ChunkId::new(), ChunkId::new());
    }

    #[test]
    fn test_chunk_id_round_trips_through_value() {
        let id = ChunkId::new();
        assert_eq!(ChunkId::from_value(id.value()), id);
    }

    #[test]
    fn test_metadata_source_dir_follows_type() {
        let policy = ChunkMetadata::new("P1", DocumentType::Policy, "P1.pdf", "data/policies/P1.pdf");
        assert_eq!(policy.source_dir, "policies");
    }
}
