//! Command tests against an offline engine.

use perito_cli::cli::{ContextArgs, DocumentsArgs, IndexArgs, ReportArgs, SearchArgs};
use perito_cli::commands;
use perito_cli::{CliError, Formatter, OutputFormat};
use perito_rag::{PeritoConfig, ProviderKind};
use perito_server::bootstrap::{self, PeritoEngine};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn offline_config(root: &Path) -> PeritoConfig {
    let mut config = PeritoConfig::default();
    config.paths.policies_dir = root.join("policies");
    config.paths.protocols_dir = root.join("protocols");
    config.paths.index_path = root.join("db").join("index.db");
    config.paths.reports_dir = root.join("reports");
    config.embedding.provider = ProviderKind::Mock;
    config.embedding.dimension = 32;
    config.llm.provider = ProviderKind::Mock;
    config
}

fn indexed_engine(root: &TempDir) -> PeritoEngine {
    let policies = root.path().join("policies");
    let protocols = root.path().join("protocols");
    fs::create_dir_all(&policies).unwrap();
    fs::create_dir_all(&protocols).unwrap();
    fs::write(
        policies.join("POLIZA_HOGAR.txt"),
        "Cobertura de daños por agua: rotura de tuberías y filtraciones.",
    )
    .unwrap();
    fs::write(
        protocols.join("05_Danos_por_agua.txt"),
        "Protocolo de agua: localizar el origen de la fuga.",
    )
    .unwrap();

    let mut engine = bootstrap::build_engine(&offline_config(root.path())).unwrap();
    let formatter = Formatter::new(OutputFormat::Quiet, false);
    commands::execute_index(
        IndexArgs {
            overwrite: false,
            no_policies: false,
            no_protocols: false,
        },
        &mut engine,
        &formatter,
    )
    .unwrap();
    engine
}

#[test]
fn test_index_then_list() {
    let dir = tempfile::tempdir().unwrap();
    let engine = indexed_engine(&dir);

    assert_eq!(engine.list_documents().len(), 2);
    let formatter = Formatter::new(OutputFormat::Table, false);
    commands::execute_documents(
        DocumentsArgs {
            document_type: None,
            search: Some("agua".to_string()),
        },
        &engine,
        &formatter,
    )
    .unwrap();
}

#[test]
fn test_search_and_context() {
    let dir = tempfile::tempdir().unwrap();
    let engine = indexed_engine(&dir);
    let formatter = Formatter::new(OutputFormat::Json, false);

    commands::execute_search(
        SearchArgs {
            query: "rotura de tuberías".to_string(),
            documents: vec!["HOGAR".to_string()],
            policy: None,
            k: Some(2),
        },
        &engine,
        &formatter,
    )
    .unwrap();

    commands::execute_context(
        ContextArgs {
            query: "fuga".to_string(),
            documents: vec!["05_Danos_por_agua".to_string()],
            max_chunks: None,
        },
        &engine,
        &formatter,
    )
    .unwrap();
}

#[test]
fn test_blank_search_query_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = indexed_engine(&dir);
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let result = commands::execute_search(
        SearchArgs {
            query: "   ".to_string(),
            documents: vec!["HOGAR".to_string()],
            policy: None,
            k: None,
        },
        &engine,
        &formatter,
    );
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[test]
fn test_blank_context_query_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let engine = indexed_engine(&dir);
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let result = commands::execute_context(
        ContextArgs {
            query: String::new(),
            documents: vec!["HOGAR".to_string()],
            max_chunks: None,
        },
        &engine,
        &formatter,
    );
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
}

#[test]
fn test_report_with_export() {
    let dir = tempfile::tempdir().unwrap();
    let engine = indexed_engine(&dir);
    let generator = bootstrap::build_generator(engine.config()).unwrap();
    let formatter = Formatter::new(OutputFormat::Quiet, false);

    let notes = dir.path().join("notas.txt");
    fs::write(&notes, "Mancha de humedad en el techo del baño").unwrap();

    commands::execute_report(
        ReportArgs {
            notes,
            documents: vec!["POLIZA_HOGAR".to_string()],
            template: "completo".to_string(),
            claim_id: Some("S-001".to_string()),
            query: None,
            claim_file: None,
            perito_name: None,
            perito_license: None,
            perito_firm: None,
            export: true,
        },
        &engine,
        &generator,
        &formatter,
    )
    .unwrap();

    let exported: Vec<_> = fs::read_dir(dir.path().join("reports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(exported, vec!["informe_pericial_unknown_S-001.txt"]);
}
