//! In-memory `SimilarityIndex` fake for unit tests

use perito_domain::traits::SimilarityIndex;
use perito_domain::{ChunkMetadata, DocumentType, SearchResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns every stored chunk ordered by its preset score, ignoring the query
pub(crate) struct FakeIndex {
    chunks: Vec<SearchResult>,
    scan_metadata: bool,
    fail_first: usize,
    search_calls: AtomicUsize,
    requested_k: AtomicUsize,
}

impl FakeIndex {
    pub(crate) fn new() -> Self {
        Self {
            chunks: Vec::new(),
            scan_metadata: true,
            fail_first: 0,
            search_calls: AtomicUsize::new(0),
            requested_k: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_chunk(
        mut self,
        document_id: &str,
        document_type: DocumentType,
        content: &str,
        score: f32,
    ) -> Self {
        let metadata = ChunkMetadata::new(
            document_id,
            document_type,
            format!("{}.pdf", document_id),
            format!("data/{}/{}.pdf", document_type.source_dir(), document_id),
        );
        self.chunks.push(SearchResult::new(content, metadata, score));
        self
    }

    pub(crate) fn without_metadata_scan(mut self) -> Self {
        self.scan_metadata = false;
        self
    }

    /// Make the first `n` searches fail
    pub(crate) fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_k(&self) -> usize {
        self.requested_k.load(Ordering::SeqCst)
    }
}

impl SimilarityIndex for FakeIndex {
    type Error = String;

    fn add(&mut self, texts: &[String], metadatas: &[ChunkMetadata]) -> Result<usize, Self::Error> {
        for (text, meta) in texts.iter().zip(metadatas) {
            self.chunks.push(SearchResult::new(text.clone(), meta.clone(), 0.5));
        }
        Ok(texts.len())
    }

    fn search(&self, _query: &str, k: usize) -> Result<Vec<SearchResult>, Self::Error> {
        let call = self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_k.store(k, Ordering::SeqCst);
        if call < self.fail_first {
            return Err("index unavailable".to_string());
        }

        let mut results = self.chunks.clone();
        results.sort_by(SearchResult::cmp_score);
        results.truncate(k);
        Ok(results)
    }

    fn all_metadata(&self) -> Result<Option<Vec<ChunkMetadata>>, Self::Error> {
        if !self.scan_metadata {
            return Ok(None);
        }
        Ok(Some(self.chunks.iter().map(|c| c.metadata.clone()).collect()))
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.chunks.clear();
        Ok(())
    }

    fn chunk_count(&self) -> Result<usize, Self::Error> {
        Ok(self.chunks.len())
    }
}
