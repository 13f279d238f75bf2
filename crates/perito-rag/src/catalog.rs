//! Catalog of indexed documents
//!
//! The catalog is derived from chunk metadata. When the index can enumerate
//! its metadata directly that scan is authoritative; otherwise the catalog
//! is rebuilt from a handful of broad similarity queries, which can miss
//! documents that none of the queries reach.

use perito_domain::traits::SimilarityIndex;
use perito_domain::{ChunkMetadata, DocumentInfo, DocumentType};
use std::collections::HashSet;
use std::fmt::Display;
use tracing::{debug, warn};

/// Queries used when the index cannot enumerate its metadata
pub const BROAD_QUERIES: [&str; 6] = ["", "póliza", "seguro", "cobertura", "cláusula", "protocolo"];

/// Results requested per broad query
pub const BROAD_QUERY_K: usize = 500;

/// Indexed documents, one entry per document id in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCatalog {
    documents: Vec<DocumentInfo>,
}

impl DocumentCatalog {
    /// Build a catalog from chunk metadata; the first chunk of each document wins
    pub fn from_metadata<'a>(metadatas: impl IntoIterator<Item = &'a ChunkMetadata>) -> Self {
        let mut seen = HashSet::new();
        let documents = metadatas
            .into_iter()
            .filter(|meta| !meta.document_id.is_empty())
            .filter(|meta| seen.insert(meta.document_id.clone()))
            .map(DocumentInfo::from_metadata)
            .collect();
        Self { documents }
    }

    /// Degraded path: union the results of [`BROAD_QUERIES`]
    ///
    /// A failing query is skipped.
    pub fn from_broad_queries<I>(index: &I) -> Self
    where
        I: SimilarityIndex,
        I::Error: Display,
    {
        let mut metadatas = Vec::new();
        for query in BROAD_QUERIES {
            match index.search(query, BROAD_QUERY_K) {
                Ok(results) => metadatas.extend(results.into_iter().map(|r| r.metadata)),
                Err(e) => {
                    debug!(query = %query, error = %e, "Broad catalog query failed, skipping");
                }
            }
        }
        Self::from_metadata(&metadatas)
    }

    /// Load the catalog, scanning metadata when the index supports it
    pub fn load<I>(index: &I) -> Self
    where
        I: SimilarityIndex,
        I::Error: Display,
    {
        match index.all_metadata() {
            Ok(Some(metadatas)) => Self::from_metadata(&metadatas),
            Ok(None) => {
                debug!("Index cannot scan metadata, using broad queries");
                Self::from_broad_queries(index)
            }
            Err(e) => {
                warn!(error = %e, "Metadata scan failed, using broad queries");
                Self::from_broad_queries(index)
            }
        }
    }

    /// All catalog entries
    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    /// Consume the catalog, returning its entries
    pub fn into_documents(self) -> Vec<DocumentInfo> {
        self.documents
    }

    /// Document ids in catalog order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.id.as_str())
    }

    /// Sorted ids of policy documents
    pub fn policy_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .documents
            .iter()
            .filter(|d| d.document_type == DocumentType::Policy)
            .map(|d| d.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Find an entry by exact id
    pub fn get(&self, id: &str) -> Option<&DocumentInfo> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Display name for `id`, falling back to the id itself
    pub fn display_name(&self, id: &str) -> String {
        self.get(id)
            .map(|d| d.display_name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are indexed
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
