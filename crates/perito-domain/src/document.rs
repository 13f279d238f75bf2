//! Document identity and catalog entries

use crate::chunk::ChunkMetadata;
use std::fmt;
use std::path::Path;

/// Kind of source document
///
/// Each kind lives in its own directory subtree and is labelled differently
/// in the assembled context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DocumentType {
    /// An insurance contract (póliza)
    Policy,

    /// An internal coverage guideline (protocolo)
    Protocol,
}

impl DocumentType {
    /// Get the type name as stored in chunk metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Policy => "policy",
            DocumentType::Protocol => "protocol",
        }
    }

    /// Parse a type name, accepting the Spanish spellings as well
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "policy" | "póliza" | "poliza" => Some(DocumentType::Policy),
            "protocol" | "protocolo" => Some(DocumentType::Protocol),
            _ => None,
        }
    }

    /// Directory tag recorded on every chunk of this type
    pub fn source_dir(&self) -> &'static str {
        match self {
            DocumentType::Policy => "policies",
            DocumentType::Protocol => "internal_protocol_coverage",
        }
    }

    /// Label used in context headers
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Policy => "Póliza",
            DocumentType::Protocol => "Protocolo",
        }
    }

    /// Human-readable name for a document of this type
    ///
    /// Policies are shown by their raw id; protocols get a cleaned-up
    /// version of their filename.
    pub fn display_name(&self, document_id: &str, source: &str) -> String {
        match self {
            DocumentType::Policy => document_id.to_string(),
            DocumentType::Protocol => protocol_display_name(source),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a document id from a source filename
///
/// The id is the file stem with its case preserved, so re-indexing the same
/// file always yields the same id.
///
/// # Examples
///
/// ```
/// use perito_domain::document::document_id_from_filename;
///
/// assert_eq!(document_id_from_filename("POLIZA_HOGAR_GLOBAL.pdf"), "POLIZA_HOGAR_GLOBAL");
/// assert_eq!(document_id_from_filename("data/policies/Vida.PDF"), "Vida");
/// ```
pub fn document_id_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Format a protocol filename into a readable display name
///
/// Underscores become spaces and runs of whitespace collapse to one.
///
/// ```
/// use perito_domain::document::protocol_display_name;
///
/// assert_eq!(
///     protocol_display_name("21._Lluvia_y_nieve__-_Daños.pdf"),
///     "21. Lluvia y nieve - Daños"
/// );
/// ```
pub fn protocol_display_name(filename: &str) -> String {
    document_id_from_filename(filename)
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// One entry of the indexed document catalog
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentInfo {
    /// Document id (filename stem)
    pub id: String,

    /// Document type
    pub document_type: DocumentType,

    /// Name shown to users
    pub display_name: String,

    /// Source filename
    pub source: String,

    /// Source directory tag
    pub source_dir: String,
}

impl DocumentInfo {
    /// Build a catalog entry from the metadata of one of the document's chunks
    pub fn from_metadata(metadata: &ChunkMetadata) -> Self {
        Self {
            id: metadata.document_id.clone(),
            document_type: metadata.document_type,
            display_name: metadata
                .document_type
                .display_name(&metadata.document_id, &metadata.source),
            source: metadata.source.clone(),
            source_dir: metadata.source_dir.clone(),
        }
    }
}
