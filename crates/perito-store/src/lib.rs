//! PeritoAI Storage Layer
//!
//! Implements the `SimilarityIndex` trait using SQLite + an HNSW vector index.
//!
//! # Architecture
//!
//! - SQLite for chunk text, metadata and embeddings (the durable copy)
//! - HNSW for vector similarity search, rebuilt from SQLite on open
//! - Pluggable embedding provider (mock for tests, Ollama in production)
//!
//! # Examples
//!
//! ```no_run
//! use perito_store::SqliteStore;
//! use perito_store::embedding::MockEmbeddingModel;
//!
//! let store = SqliteStore::open(":memory:", MockEmbeddingModel::new(384)).unwrap();
//! // Store is now ready for chunk operations
//! ```

#![warn(missing_docs)]

pub mod embedding;
pub mod vector_index;

use perito_domain::traits::{EmbeddingProvider, SimilarityIndex};
use perito_domain::{ChunkId, ChunkMetadata, DocumentType, SearchResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};
use vector_index::{VectorIndex, VectorIndexError};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Embedding provider error
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index error
    #[error("Vector index error: {0}")]
    VectorIndex(#[from] VectorIndexError),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection lock poisoned
    #[error("Lock error: {0}")]
    Lock(String),

    /// Embedding (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// SQLite-backed chunk store with an HNSW similarity index
///
/// Every chunk row carries its embedding, so the in-memory graph can be
/// rebuilt on open without calling the embedding provider again.
///
/// # Thread Safety
///
/// The connection sits behind a `Mutex` and the vector index has its own
/// lock, so a store can be shared across threads when `E` is `Sync`.
pub struct SqliteStore<E> {
    conn: Mutex<Connection>,
    index: VectorIndex,
    embedder: E,
}

impl<E> SqliteStore<E>
where
    E: EmbeddingProvider,
    E::Error: std::fmt::Display,
{
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use perito_store::SqliteStore;
    /// use perito_store::embedding::MockEmbeddingModel;
    ///
    /// let store = SqliteStore::open("data/index.db", MockEmbeddingModel::new(768)).unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, embedder: E) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        let store = Self {
            conn: Mutex::new(conn),
            index: VectorIndex::new(embedder.dimension()),
            embedder,
        };
        store.rebuild_index()?;
        Ok(store)
    }

    /// Embedding provider used by this store
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(format!("connection lock poisoned: {}", e)))
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, StoreError> {
        self.embedder
            .embed(text)
            .map_err(|e| StoreError::Embedding(e.to_string()))
    }

    /// Load every persisted embedding into the HNSW graph
    fn rebuild_index(&self) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare("SELECT id, embedding FROM chunks ORDER BY seq")?;
        let rows = stmt
            .query_map([], |row| {
                let id: Vec<u8> = row.get(0)?;
                let embedding: String = row.get(1)?;
                Ok((id, embedding))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut loaded = 0usize;
        for (id_bytes, embedding_json) in rows {
            let chunk_id = bytes_to_chunk_id(&id_bytes)?;
            let embedding: Vec<f32> = serde_json::from_str(&embedding_json)?;
            if embedding.len() != self.index.dimension() {
                warn!(
                    chunk_id = %chunk_id,
                    stored = embedding.len(),
                    expected = self.index.dimension(),
                    "Skipping chunk with mismatched embedding dimension"
                );
                continue;
            }
            self.index.add(chunk_id, &embedding)?;
            loaded += 1;
        }

        if loaded > 0 {
            info!(chunks = loaded, "Rebuilt vector index from database");
        }
        Ok(())
    }

    fn get_chunk(
        conn: &Connection,
        chunk_id: ChunkId,
    ) -> Result<Option<(String, ChunkMetadata)>, StoreError> {
        let row = conn
            .query_row(
                "SELECT content, document_id, document_type, source, source_dir, file_path
                 FROM chunks WHERE id = ?1",
                params![chunk_id_to_bytes(chunk_id)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(content, document_id, document_type, source, source_dir, file_path)| -> Result<_, StoreError> {
            let metadata = ChunkMetadata {
                document_id,
                document_type: parse_document_type(&document_type)?,
                source,
                source_dir,
                file_path,
            };
            Ok((content, metadata))
        })
        .transpose()
    }
}

impl<E> SimilarityIndex for SqliteStore<E>
where
    E: EmbeddingProvider,
    E::Error: std::fmt::Display,
{
    type Error = StoreError;

    fn add(&mut self, texts: &[String], metadatas: &[ChunkMetadata]) -> Result<usize, Self::Error> {
        if texts.len() != metadatas.len() {
            return Err(StoreError::InvalidData(format!(
                "{} texts but {} metadata records",
                texts.len(),
                metadatas.len()
            )));
        }
        if texts.is_empty() {
            return Ok(0);
        }

        // Embed everything first so a provider failure leaves the store untouched
        let embeddings = texts
            .iter()
            .map(|text| self.embed(text))
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<ChunkId> = texts.iter().map(|_| ChunkId::new()).collect();

        {
            let mut conn = self.lock_conn()?;
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO chunks (id, content, document_id, document_type, source, source_dir, file_path, embedding)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )?;
                for ((id, text), (metadata, embedding)) in
                    ids.iter().zip(texts).zip(metadatas.iter().zip(&embeddings))
                {
                    stmt.execute(params![
                        chunk_id_to_bytes(*id),
                        text,
                        &metadata.document_id,
                        metadata.document_type.as_str(),
                        &metadata.source,
                        &metadata.source_dir,
                        &metadata.file_path,
                        serde_json::to_string(embedding)?,
                    ])?;
                }
            }
            tx.commit()?;
        }

        for (id, embedding) in ids.iter().zip(&embeddings) {
            self.index.add(*id, embedding)?;
        }

        debug!(chunks = texts.len(), "Added chunks to store");
        Ok(texts.len())
    }

    fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>, Self::Error> {
        if k == 0 || self.index.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embed(query)?;
        let neighbours = self.index.search(&query_embedding, k)?;

        let conn = self.lock_conn()?;
        let mut results = Vec::with_capacity(neighbours.len());
        for (chunk_id, distance) in neighbours {
            match Self::get_chunk(&conn, chunk_id)? {
                Some((content, metadata)) => {
                    results.push(SearchResult::new(content, metadata, distance));
                }
                None => warn!(chunk_id = %chunk_id, "Indexed chunk missing from database"),
            }
        }

        results.sort_by(SearchResult::cmp_score);
        Ok(results)
    }

    fn all_metadata(&self) -> Result<Option<Vec<ChunkMetadata>>, Self::Error> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT document_id, document_type, source, source_dir, file_path
             FROM chunks ORDER BY seq",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let metadatas = rows
            .into_iter()
            .map(|(document_id, document_type, source, source_dir, file_path)| {
                Ok(ChunkMetadata {
                    document_id,
                    document_type: parse_document_type(&document_type)?,
                    source,
                    source_dir,
                    file_path,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(Some(metadatas))
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        let removed = self.lock_conn()?.execute("DELETE FROM chunks", [])?;
        self.index.clear()?;
        info!(chunks = removed, "Cleared chunk store");
        Ok(())
    }

    fn chunk_count(&self) -> Result<usize, Self::Error> {
        let count: i64 = self
            .lock_conn()?
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// Convert ChunkId to bytes for storage
fn chunk_id_to_bytes(id: ChunkId) -> Vec<u8> {
    id.value().to_be_bytes().to_vec()
}

/// Convert bytes to ChunkId
fn bytes_to_chunk_id(bytes: &[u8]) -> Result<ChunkId, StoreError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::InvalidData(format!("Expected 16 bytes for ChunkId, got {}", bytes.len()))
    })?;
    Ok(ChunkId::from_value(u128::from_be_bytes(arr)))
}

fn parse_document_type(s: &str) -> Result<DocumentType, StoreError> {
    DocumentType::parse(s)
        .ok_or_else(|| StoreError::InvalidData(format!("Unknown document type: {}", s)))
}
