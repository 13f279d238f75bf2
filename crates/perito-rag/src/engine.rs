//! `RagEngine`: the retrieval core behind one explicitly constructed value
//!
//! The engine owns its index. Indexing takes `&mut self`; everything else
//! takes `&self`, so callers that share an engine behind a read/write lock
//! get one writer at a time and concurrent readers.

use crate::catalog::DocumentCatalog;
use crate::chunking::TextChunker;
use crate::claim_parser::ClaimDataParser;
use crate::config::PeritoConfig;
use crate::context::assemble_context;
use crate::error::RagError;
use crate::indexer::{IndexReport, Indexer};
use crate::retrieval::RetrievalEngine;
use perito_domain::traits::{SimilarityIndex, TextExtractor};
use perito_domain::{DocumentInfo, ParsedClaim, SearchResult};
use std::fmt::Display;
use tracing::info;

/// Indexing, catalog, retrieval and context assembly over one index
pub struct RagEngine<I, X> {
    index: I,
    indexer: Indexer<X>,
    parser: ClaimDataParser,
    config: PeritoConfig,
}

impl<I, X> RagEngine<I, X>
where
    I: SimilarityIndex,
    I::Error: Display,
    X: TextExtractor,
    X::Error: Display,
{
    /// Create an engine from an index, a text extractor and configuration
    pub fn new(index: I, extractor: X, config: PeritoConfig) -> Self {
        let chunker = TextChunker::new(config.chunking);
        Self {
            index,
            indexer: Indexer::new(extractor, chunker),
            parser: ClaimDataParser::new(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &PeritoConfig {
        &self.config
    }

    /// Underlying index
    pub fn index(&self) -> &I {
        &self.index
    }

    fn retrieval(&self) -> RetrievalEngine<'_, I> {
        RetrievalEngine::new(&self.index)
    }

    /// Index the configured policy and/or protocol directories
    pub fn index_documents(
        &mut self,
        overwrite: bool,
        include_policies: bool,
        include_protocols: bool,
    ) -> Result<IndexReport, RagError> {
        info!(overwrite, include_policies, include_protocols, "Indexing documents");
        self.indexer.index_all(
            &mut self.index,
            &self.config.paths,
            overwrite,
            include_policies,
            include_protocols,
        )
    }

    /// Catalog of indexed documents
    pub fn catalog(&self) -> DocumentCatalog {
        DocumentCatalog::load(&self.index)
    }

    /// Indexed documents, one entry per document id
    pub fn list_documents(&self) -> Vec<DocumentInfo> {
        self.catalog().into_documents()
    }

    /// Sorted ids of indexed policies
    pub fn policy_ids(&self) -> Vec<String> {
        self.catalog().policy_ids()
    }

    /// Search several documents, at most `k` chunks each
    pub fn search_by_document_ids(
        &self,
        query: &str,
        document_ids: &[String],
        k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        self.retrieval().search_by_document_ids(query, document_ids, k)
    }

    /// Search one policy document
    pub fn search_by_policy_id(
        &self,
        query: &str,
        policy_id: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        self.retrieval().search_by_policy_id(query, policy_id, k)
    }

    /// Formatted context from the selected documents
    pub fn get_documents_context(
        &self,
        document_ids: &[String],
        query: &str,
        max_chunks: usize,
    ) -> Result<String, RagError> {
        assemble_context(&self.retrieval(), document_ids, query, max_chunks)
    }

    /// Parse pasted claim data
    pub fn parse_claim(&self, raw_text: &str) -> ParsedClaim {
        self.parser.parse(raw_text)
    }

    /// Number of chunks in the index
    pub fn chunk_count(&self) -> Result<usize, RagError> {
        self.index
            .chunk_count()
            .map_err(|e| RagError::Index(e.to_string()))
    }
}
