//! Index builder: directory scan, extraction, chunking and metadata
//!
//! ```text
//! directory → extractor → chunker → (chunk, metadata) batch → SimilarityIndex::add
//! ```
//!
//! One unreadable file never aborts a batch: it is logged and skipped.

use crate::chunking::TextChunker;
use crate::config::PathsConfig;
use crate::error::RagError;
use perito_domain::document::document_id_from_filename;
use perito_domain::traits::{SimilarityIndex, TextExtractor};
use perito_domain::{ChunkMetadata, DocumentType};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of an indexing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    /// Policy documents processed
    pub policies: usize,

    /// Protocol documents processed
    pub protocols: usize,

    /// Chunks submitted to the index
    pub chunks: usize,
}

impl IndexReport {
    /// Documents processed across both directories
    pub fn documents(&self) -> usize {
        self.policies + self.protocols
    }
}

/// Chunks collected before being submitted in one `add` call
#[derive(Debug, Default)]
pub struct ChunkBatch {
    /// Chunk texts
    pub texts: Vec<String>,

    /// Metadata, parallel to `texts`
    pub metadatas: Vec<ChunkMetadata>,
}

impl ChunkBatch {
    /// Number of chunks in the batch
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether the batch holds no chunks
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Turns document directories into chunk batches
pub struct Indexer<X> {
    extractor: X,
    chunker: TextChunker,
}

impl<X> Indexer<X>
where
    X: TextExtractor,
    X::Error: Display,
{
    /// Create an indexer from an extractor and a chunker
    pub fn new(extractor: X, chunker: TextChunker) -> Self {
        Self { extractor, chunker }
    }

    /// Chunker used for every document
    pub fn chunker(&self) -> &TextChunker {
        &self.chunker
    }

    /// Supported files of `dir`, sorted by name
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, RagError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && self.extractor.supports(path))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Extract and chunk every supported file of `dir` into `batch`
    ///
    /// Returns the number of documents processed. A missing directory is
    /// created and counts as empty.
    pub fn collect_directory(
        &self,
        dir: &Path,
        document_type: DocumentType,
        batch: &mut ChunkBatch,
    ) -> Result<usize, RagError> {
        if !dir.exists() {
            info!(
                directory = %dir.display(),
                document_type = %document_type,
                "Document directory does not exist, creating it"
            );
            std::fs::create_dir_all(dir)?;
            return Ok(0);
        }

        let files = self.list_files(dir)?;
        if files.is_empty() {
            info!(directory = %dir.display(), "No documents found");
            return Ok(0);
        }

        let mut processed = 0;
        for path in files {
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!(document_type = %document_type, source = %source, "Processing document");

            let text = match self.extractor.extract(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!(source = %source, error = %e, "Skipping unreadable document");
                    continue;
                }
            };
            if text.trim().is_empty() {
                warn!(source = %source, "Skipping empty or unreadable document");
                continue;
            }

            let document_id = document_id_from_filename(&source);
            let file_path = path.display().to_string();
            for chunk in self.chunker.split(&text) {
                batch.texts.push(chunk);
                batch.metadatas.push(ChunkMetadata::new(
                    document_id.as_str(),
                    document_type,
                    source.as_str(),
                    file_path.as_str(),
                ));
            }
            processed += 1;
        }

        Ok(processed)
    }

    /// Index a single directory, submitting its chunks in one call
    pub fn index_directory<I>(
        &self,
        index: &mut I,
        dir: &Path,
        document_type: DocumentType,
    ) -> Result<usize, RagError>
    where
        I: SimilarityIndex,
        I::Error: Display,
    {
        let mut batch = ChunkBatch::default();
        let processed = self.collect_directory(dir, document_type, &mut batch)?;
        submit(index, &batch)?;
        Ok(processed)
    }

    /// Index the policy and/or protocol directories
    ///
    /// With `overwrite`, the index is cleared first. Without it, chunks are
    /// appended even when the same files were indexed before.
    pub fn index_all<I>(
        &self,
        index: &mut I,
        paths: &PathsConfig,
        overwrite: bool,
        include_policies: bool,
        include_protocols: bool,
    ) -> Result<IndexReport, RagError>
    where
        I: SimilarityIndex,
        I::Error: Display,
    {
        if overwrite {
            index
                .clear()
                .map_err(|e| RagError::Index(format!("failed to clear index: {}", e)))?;
            info!("Cleared existing index before rebuild");
        }

        let mut batch = ChunkBatch::default();
        let mut report = IndexReport::default();

        if include_policies {
            report.policies =
                self.collect_directory(&paths.policies_dir, DocumentType::Policy, &mut batch)?;
        }
        if include_protocols {
            report.protocols =
                self.collect_directory(&paths.protocols_dir, DocumentType::Protocol, &mut batch)?;
        }

        report.chunks = submit(index, &batch)?;

        if report.chunks == 0 {
            info!("No documents to index");
        } else {
            info!(
                policies = report.policies,
                protocols = report.protocols,
                chunks = report.chunks,
                "Indexing complete"
            );
        }
        Ok(report)
    }
}

fn submit<I>(index: &mut I, batch: &ChunkBatch) -> Result<usize, RagError>
where
    I: SimilarityIndex,
    I::Error: Display,
{
    if batch.is_empty() {
        return Ok(0);
    }
    index
        .add(&batch.texts, &batch.metadatas)
        .map_err(|e| RagError::Index(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkerConfig;
    use crate::extract::MultiFormatExtractor;

    fn indexer() -> Indexer<MultiFormatExtractor> {
        Indexer::new(
            MultiFormatExtractor::new(),
            TextChunker::new(ChunkerConfig { chunk_size: 50, chunk_overlap: 10 }),
        )
    }

    #[test]
    fn test_missing_directory_is_created() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("policies");

        let mut batch = ChunkBatch::default();
        let processed = indexer()
            .collect_directory(&dir, DocumentType::Policy, &mut batch)
            .unwrap();

        assert_eq!(processed, 0);
        assert!(dir.is_dir());
        assert!(batch.is_empty());
    }

    #[test]
    fn test_metadata_attached_to_every_chunk() {
        let root = tempfile::tempdir().unwrap();
        let text = "Artículo primero. ".repeat(10);
        std::fs::write(root.path().join("05_Danos_por_agua.txt"), &text).unwrap();

        let mut batch = ChunkBatch::default();
        let processed = indexer()
            .collect_directory(root.path(), DocumentType::Protocol, &mut batch)
            .unwrap();

        assert_eq!(processed, 1);
        assert!(batch.len() > 1);
        assert_eq!(batch.texts.len(), batch.metadatas.len());
        for meta in &batch.metadatas {
            assert_eq!(meta.document_id, "05_Danos_por_agua");
            assert_eq!(meta.document_type, DocumentType::Protocol);
            assert_eq!(meta.source, "05_Danos_por_agua.txt");
            assert_eq!(meta.source_dir, "internal_protocol_coverage");
        }
    }

    #[test]
    fn test_unsupported_and_empty_files_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("foto.jpg"), b"\xff\xd8").unwrap();
        std::fs::write(root.path().join("vacio.txt"), "   \n").unwrap();
        std::fs::write(root.path().join("POLIZA_VIDA.txt"), "Capital asegurado").unwrap();

        let mut batch = ChunkBatch::default();
        let processed = indexer()
            .collect_directory(root.path(), DocumentType::Policy, &mut batch)
            .unwrap();

        assert_eq!(processed, 1);
        assert_eq!(batch.metadatas[0].document_id, "POLIZA_VIDA");
    }

    #[test]
    fn test_report_documents() {
        let report = IndexReport { policies: 2, protocols: 3, chunks: 40 };
        assert_eq!(report.documents(), 5);
    }
}
