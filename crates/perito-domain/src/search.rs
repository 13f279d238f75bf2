//! Search results and document-id matching

use crate::chunk::ChunkMetadata;
use std::cmp::Ordering;

/// A chunk returned by a similarity search
///
/// `score` is a distance: lower means more relevant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Chunk text
    pub content: String,

    /// Chunk metadata
    pub metadata: ChunkMetadata,

    /// Distance between the query and the chunk (ascending is better)
    pub score: f32,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata, score: f32) -> Self {
        Self {
            content: content.into(),
            metadata,
            score,
        }
    }

    /// Compare two results by score, best first
    ///
    /// Uses a total order so NaN scores sort last instead of poisoning the sort.
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}

/// Normalize a document id for matching (trim, upper case)
pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

/// Symmetric fuzzy containment match between two document ids
///
/// Both ids are normalized first. They match when they are equal or when
/// either one contains the other, so a partial id like `"HOGAR"` matches
/// `"POLIZA_HOGAR_GLOBAL"`. A blank id matches nothing.
///
/// Short ids can produce false positives (`"A"` matches `"CASA"`); there is
/// no minimum length.
///
/// # Examples
///
/// ```
/// use perito_domain::ids_fuzzy_match;
///
/// assert!(ids_fuzzy_match("HOGAR", "POLIZA_HOGAR_GLOBAL"));
/// assert!(ids_fuzzy_match("poliza_hogar_global", "HOGAR"));
/// assert!(!ids_fuzzy_match("HOGAR", "VIDA_BASICA"));
/// ```
pub fn ids_fuzzy_match(a: &str, b: &str) -> bool {
    let a = normalize_id(a);
    let b = normalize_id(b);
    matches_normalized(&a, &b)
}

/// Same as [`ids_fuzzy_match`] for ids that are already normalized
pub fn matches_normalized(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(b) || b.contains(a)
}
