//! Multi-document retrieval over a similarity index
//!
//! A single oversampled similarity search is filtered by fuzzy document-id
//! matching, then balanced so every requested id contributes at most
//! `k_per_doc` chunks from its best-matching document. If the search fails
//! it is retried once without grouping.

use crate::catalog::DocumentCatalog;
use crate::error::RagError;
use perito_domain::search::matches_normalized;
use perito_domain::traits::SimilarityIndex;
use perito_domain::{normalize_id, DocumentType, SearchResult};
use std::fmt::Display;
use tracing::{debug, warn};

/// Candidates requested per result when searching several documents
pub const MULTI_DOC_OVERSAMPLE: usize = 2;

/// Candidates requested per result when searching one policy
pub const SINGLE_DOC_OVERSAMPLE: usize = 3;

/// How many available ids a zero-result warning lists
const AVAILABLE_IDS_IN_WARNING: usize = 10;

/// Document-filtered similarity search over a borrowed index
pub struct RetrievalEngine<'a, I> {
    index: &'a I,
}

impl<'a, I> RetrievalEngine<'a, I>
where
    I: SimilarityIndex,
    I::Error: Display,
{
    /// Wrap an index
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Search several documents at once
    ///
    /// Results are ordered by the caller's `target_ids` and by ascending
    /// score within each document. An empty id list returns nothing without
    /// touching the index; zero matches is not an error.
    pub fn search_by_document_ids(
        &self,
        query: &str,
        target_ids: &[String],
        k_per_doc: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        let targets = normalize_targets(target_ids);
        if targets.is_empty() || k_per_doc == 0 {
            return Ok(Vec::new());
        }

        let limit = k_per_doc.saturating_mul(targets.len());
        let candidates = limit.saturating_mul(MULTI_DOC_OVERSAMPLE);
        debug!(candidates, documents = target_ids.len(), "Searching selected documents");

        let results = match self.index.search(query, candidates) {
            Ok(found) => balance_by_document(filter_matching(found, &targets), &targets, k_per_doc),
            Err(e) => {
                warn!(error = %e, "Search failed, retrying without grouping");
                let found = self.index.search(query, candidates).map_err(|retry| {
                    RagError::Search(format!("{} (fallback also failed: {})", e, retry))
                })?;
                let mut matching = filter_matching(found, &targets);
                matching.sort_by(SearchResult::cmp_score);
                matching.truncate(limit);
                matching
            }
        };

        if results.is_empty() {
            self.warn_no_results(&target_ids.join(", "));
        }
        Ok(results)
    }

    /// Search a single policy document
    ///
    /// Only chunks of `policy` documents whose id fuzzy-matches `policy_id`
    /// are kept, best `k` first.
    pub fn search_by_policy_id(
        &self,
        query: &str,
        policy_id: &str,
        k: usize,
    ) -> Result<Vec<SearchResult>, RagError> {
        let target = normalize_id(policy_id);
        if target.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let targets = [target];
        let candidates = k.saturating_mul(SINGLE_DOC_OVERSAMPLE);

        let is_policy = |r: &SearchResult| r.metadata.document_type == DocumentType::Policy;

        let results = match self.index.search(query, candidates) {
            Ok(found) => {
                let mut matching: Vec<_> = filter_matching(found, &targets)
                    .into_iter()
                    .filter(is_policy)
                    .collect();
                matching.sort_by(SearchResult::cmp_score);
                matching.truncate(k);
                matching
            }
            Err(e) => {
                warn!(error = %e, policy_id = %policy_id, "Search failed, retrying unfiltered");
                let found = self.index.search(query, candidates).map_err(|retry| {
                    RagError::Search(format!("{} (fallback also failed: {})", e, retry))
                })?;
                filter_matching(found, &targets)
                    .into_iter()
                    .filter(is_policy)
                    .take(k)
                    .collect()
            }
        };

        if results.is_empty() {
            self.warn_no_results(policy_id);
        }
        Ok(results)
    }

    fn warn_no_results(&self, requested: &str) {
        let catalog = DocumentCatalog::load(self.index);
        let available: Vec<&str> = catalog.ids().take(AVAILABLE_IDS_IN_WARNING).collect();
        warn!(
            requested = %requested,
            available = %available.join(", "),
            "No results found after filtering by document id"
        );
    }
}

/// Normalized, non-blank target ids
fn normalize_targets(target_ids: &[String]) -> Vec<String> {
    target_ids
        .iter()
        .map(|id| normalize_id(id))
        .filter(|id| !id.is_empty())
        .collect()
}

/// Whether a stored document id fuzzy-matches any normalized target
fn matches_any(document_id: &str, targets: &[String]) -> bool {
    let stored = normalize_id(document_id);
    targets.iter().any(|target| matches_normalized(&stored, target))
}

fn filter_matching(results: Vec<SearchResult>, targets: &[String]) -> Vec<SearchResult> {
    results
        .into_iter()
        .filter(|r| matches_any(&r.metadata.document_id, targets))
        .collect()
}

/// Group by stored document id, cap each group, and order groups by target
///
/// Each target emits the best-scoring matching group not already emitted,
/// so the output holds at most `k_per_doc * targets.len()` chunks.
fn balance_by_document(
    results: Vec<SearchResult>,
    targets: &[String],
    k_per_doc: usize,
) -> Vec<SearchResult> {
    // Groups in first-seen order, keyed by the stored id
    let mut groups: Vec<(String, Vec<SearchResult>)> = Vec::new();
    for result in results {
        let id = &result.metadata.document_id;
        match groups.iter_mut().find(|(key, _)| key == id) {
            Some((_, group)) => group.push(result),
            None => groups.push((id.clone(), vec![result])),
        }
    }
    for (_, group) in &mut groups {
        group.sort_by(SearchResult::cmp_score);
        group.truncate(k_per_doc);
    }

    let mut emitted = vec![false; groups.len()];
    let mut ordered = Vec::new();
    for target in targets {
        // Groups are non-empty and sorted, so the first entry is the best score
        let best = groups
            .iter()
            .enumerate()
            .filter(|(i, (id, _))| !emitted[*i] && matches_normalized(&normalize_id(id), target))
            .min_by(|(_, (_, a)), (_, (_, b))| a[0].cmp_score(&b[0]))
            .map(|(i, _)| i);

        if let Some(i) = best {
            emitted[i] = true;
            ordered.extend(groups[i].1.iter().cloned());
        }
    }
    ordered.truncate(k_per_doc.saturating_mul(targets.len()));
    ordered
}
