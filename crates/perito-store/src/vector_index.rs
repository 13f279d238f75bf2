//! HNSW Vector Index for Semantic Search
//!
//! This module wraps the HNSW algorithm for nearest-neighbor search over
//! chunk embeddings.
//!
//! # Architecture
//!
//! - In-memory graph, rebuilt from SQLite when the store is opened
//! - Keyed by [`ChunkId`]; SQLite holds the chunk text and metadata
//! - Cosine distance: results are returned ascending (lower is closer)
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//! - **efConstruction**: Size of dynamic candidate list during construction (default: 200)
//! - **efSearch**: Size of dynamic candidate list during search (at least 64)

use hnsw_rs::prelude::*;
use perito_domain::ChunkId;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_MAX_ELEMENTS: usize = 1_000_000;

/// Minimum candidate list size used when searching
pub const DEFAULT_EF_SEARCH: usize = 64;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Internal HNSW or locking error
    #[error("HNSW error: {0}")]
    Internal(String),
}

struct IndexState {
    hnsw: Hnsw<'static, f32, DistCosine>,
    id_map: HashMap<usize, ChunkId>,
    next_id: usize,
}

impl IndexState {
    fn empty() -> Self {
        let nb_layer = 16.min((DEFAULT_MAX_ELEMENTS as f32).ln().trunc() as usize);

        Self {
            hnsw: Hnsw::<'static, f32, DistCosine>::new(
                DEFAULT_M,
                DEFAULT_MAX_ELEMENTS,
                nb_layer,
                DEFAULT_EF_CONSTRUCTION,
                DistCosine {},
            ),
            id_map: HashMap::new(),
            next_id: 0,
        }
    }
}

/// A wrapper around HNSW for chunk similarity search
///
/// # Examples
///
/// ```no_run
/// use perito_store::vector_index::VectorIndex;
/// use perito_domain::ChunkId;
///
/// let index = VectorIndex::new(384);
/// let embedding = vec![0.1; 384];
/// index.add(ChunkId::new(), &embedding).unwrap();
///
/// let results = index.search(&embedding, 5).unwrap();
/// ```
pub struct VectorIndex {
    dimension: usize,
    state: Mutex<IndexState>,
}

impl VectorIndex {
    /// Create a new vector index with the specified dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            state: Mutex::new(IndexState::empty()),
        }
    }

    /// Dimension every vector must have
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), VectorIndexError> {
        if vector.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, IndexState>, VectorIndexError> {
        self.state
            .lock()
            .map_err(|e| VectorIndexError::Internal(format!("index lock poisoned: {}", e)))
    }

    /// Add a chunk embedding to the index
    pub fn add(&self, chunk_id: ChunkId, embedding: &[f32]) -> Result<(), VectorIndexError> {
        self.check_dimension(embedding)?;

        let mut state = self.lock()?;
        let internal_id = state.next_id;
        state.next_id += 1;
        state.id_map.insert(internal_id, chunk_id);
        state.hnsw.insert((embedding, internal_id));

        Ok(())
    }

    /// Search for the k nearest chunks to the given embedding
    ///
    /// Returns `(ChunkId, distance)` pairs sorted by distance, closest first.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(ChunkId, f32)>, VectorIndexError> {
        self.check_dimension(query)?;

        let state = self.lock()?;
        if k == 0 || state.id_map.is_empty() {
            return Ok(Vec::new());
        }

        let ef_search = k.max(DEFAULT_EF_SEARCH);
        let mut results: Vec<(ChunkId, f32)> = state
            .hnsw
            .search(query, k, ef_search)
            .into_iter()
            .filter_map(|neighbour| {
                state
                    .id_map
                    .get(&neighbour.d_id)
                    .map(|&chunk_id| (chunk_id, neighbour.distance))
            })
            .collect();

        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(results)
    }

    /// Get the number of vectors in the index
    pub fn len(&self) -> usize {
        self.lock().map(|state| state.id_map.len()).unwrap_or(0)
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all vectors from the index
    pub fn clear(&self) -> Result<(), VectorIndexError> {
        let mut state = self.lock()?;
        *state = IndexState::empty();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_index_creation() {
        let index = VectorIndex::new(384);
        assert_eq!(index.dimension(), 384);
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::new(3);
        let results = index.search(&[1.0, 0.0, 0.0], 5).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = VectorIndex::new(384);
        let result = index.add(ChunkId::new(), &[0.1; 128]);
        assert!(matches!(result, Err(VectorIndexError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_clear() {
        let index = VectorIndex::new(3);
        index.add(ChunkId::new(), &[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(index.len(), 1);

        index.clear().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_distance_ordering() {
        let index = VectorIndex::new(3);

        let along_x = ChunkId::new();
        index.add(along_x, &[1.0, 0.0, 0.0]).unwrap();

        let along_y = ChunkId::new();
        index.add(along_y, &[0.0, 1.0, 0.0]).unwrap();

        let diagonal = ChunkId::new();
        index.add(diagonal, &[0.7071, 0.7071, 0.0]).unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 3).unwrap();

        // Closest first: exact, 45 degrees, orthogonal
        assert_eq!(results[0].0, along_x);
        assert!(results[0].1 < 0.01);

        assert_eq!(results[1].0, diagonal);
        assert!(results[1].1 < 0.5);

        assert_eq!(results[2].0, along_y);
        assert!(results[2].1 > 0.9);
    }
}
