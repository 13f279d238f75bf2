//! Documents command implementation.

use crate::cli::DocumentsArgs;
use crate::error::Result;
use crate::output::Formatter;
use perito_domain::{DocumentInfo, DocumentType};
use perito_server::bootstrap::PeritoEngine;

/// Execute the documents command.
pub fn execute_documents(args: DocumentsArgs, engine: &PeritoEngine, formatter: &Formatter) -> Result<()> {
    let documents = filter_documents(
        engine.list_documents(),
        args.document_type.map(Into::into),
        args.search.as_deref(),
    );
    println!("{}", formatter.format_documents(&documents)?);
    Ok(())
}

/// Keep documents of `document_type` whose id or display name contains `search`
pub fn filter_documents(
    documents: Vec<DocumentInfo>,
    document_type: Option<DocumentType>,
    search: Option<&str>,
) -> Vec<DocumentInfo> {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

    documents
        .into_iter()
        .filter(|doc| document_type.map_or(true, |t| doc.document_type == t))
        .filter(|doc| match &needle {
            Some(needle) => {
                doc.id.to_lowercase().contains(needle)
                    || doc.display_name.to_lowercase().contains(needle)
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use perito_domain::ChunkMetadata;

    fn doc(id: &str, document_type: DocumentType) -> DocumentInfo {
        DocumentInfo::from_metadata(&ChunkMetadata::new(
            id,
            document_type,
            format!("{}.pdf", id),
            format!("data/{}.pdf", id),
        ))
    }

    fn catalog() -> Vec<DocumentInfo> {
        vec![
            doc("POLIZA_HOGAR", DocumentType::Policy),
            doc("05_Danos_por_agua", DocumentType::Protocol),
            doc("21_Lluvia_y_nieve", DocumentType::Protocol),
        ]
    }

    #[test]
    fn test_filter_by_type() {
        let protocols = filter_documents(catalog(), Some(DocumentType::Protocol), None);
        assert_eq!(protocols.len(), 2);
    }

    #[test]
    fn test_filter_by_display_name() {
        let found = filter_documents(catalog(), None, Some("lluvia y"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "21_Lluvia_y_nieve");
    }

    #[test]
    fn test_blank_search_keeps_all() {
        assert_eq!(filter_documents(catalog(), None, Some("  ")).len(), 3);
    }
}
