//! Context assembly for report prompts
//!
//! The rendered block is embedded verbatim in the report prompt:
//!
//! ```text
//!
//! [Póliza: POLIZA_HOGAR]
//!
//!   [Sección 1]
//!   ...chunk text...
//!   (Fuente: POLIZA_HOGAR.pdf)
//! ```

use crate::error::RagError;
use crate::retrieval::RetrievalEngine;
use perito_domain::traits::SimilarityIndex;
use perito_domain::SearchResult;
use std::fmt::Display;

/// Returned when no target documents are given
pub const NO_DOCUMENTS_SELECTED: &str = "No documents selected.";

/// Sentinel for a search that found nothing in the selected documents
pub fn no_sections_found(target_ids: &[String]) -> String {
    format!(
        "No relevant sections found in selected documents: {}.",
        target_ids.join(", ")
    )
}

/// Retrieve and format context for the given documents
///
/// Up to `max_chunks_per_doc` chunks are retrieved per document. With no
/// target ids the index is never searched.
pub fn assemble_context<I>(
    retrieval: &RetrievalEngine<'_, I>,
    target_ids: &[String],
    query: &str,
    max_chunks_per_doc: usize,
) -> Result<String, RagError>
where
    I: SimilarityIndex,
    I::Error: Display,
{
    if target_ids.is_empty() {
        return Ok(NO_DOCUMENTS_SELECTED.to_string());
    }

    let results = retrieval.search_by_document_ids(query, target_ids, max_chunks_per_doc)?;
    if results.is_empty() {
        return Ok(no_sections_found(target_ids));
    }
    Ok(format_context(&results))
}

/// Render results grouped by document, groups in first-seen order
pub fn format_context(results: &[SearchResult]) -> String {
    let mut groups: Vec<(&str, Vec<&SearchResult>)> = Vec::new();
    for result in results {
        let id = result.metadata.document_id.as_str();
        match groups.iter_mut().find(|(key, _)| *key == id) {
            Some((_, group)) => group.push(result),
            None => groups.push((id, vec![result])),
        }
    }

    let mut parts = Vec::new();
    for (document_id, group) in groups {
        let label = group[0].metadata.document_type.label();
        parts.push(format!("\n[{}: {}]", label, document_id));
        for (i, result) in group.iter().enumerate() {
            parts.push(format!(
                "  [Sección {}]\n  {}\n  (Fuente: {})",
                i + 1,
                result.content,
                result.metadata.source
            ));
        }
    }
    parts.join("\n\n")
}
