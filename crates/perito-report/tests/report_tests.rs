//! Report generation against a real index

use perito_llm::MockProvider;
use perito_rag::{MultiFormatExtractor, PeritoConfig, RagEngine};
use perito_report::{ReportError, ReportGenerator, ReportRequest};
use perito_store::embedding::MockEmbeddingModel;
use perito_store::SqliteStore;
use tempfile::TempDir;

type Engine = RagEngine<SqliteStore<MockEmbeddingModel>, MultiFormatExtractor>;

fn indexed_engine() -> (TempDir, Engine) {
    let root = tempfile::tempdir().unwrap();
    let mut config = PeritoConfig::default();
    config.paths.policies_dir = root.path().join("policies");
    config.paths.protocols_dir = root.path().join("protocols");
    std::fs::create_dir_all(&config.paths.policies_dir).unwrap();
    std::fs::create_dir_all(&config.paths.protocols_dir).unwrap();

    std::fs::write(
        config.paths.policies_dir.join("POLIZA_HOGAR_GLOBAL.txt"),
        "Daños por agua: se cubren la rotura de tuberías y las filtraciones accidentales.",
    )
    .unwrap();
    std::fs::write(
        config.paths.protocols_dir.join("05_Danos_por_agua.txt"),
        "Protocolo: verificar el origen de la fuga antes de valorar los daños.",
    )
    .unwrap();

    let store = SqliteStore::open(":memory:", MockEmbeddingModel::new(64)).unwrap();
    let mut engine = RagEngine::new(store, MultiFormatExtractor::new(), config);
    engine.index_documents(true, true, true).unwrap();
    (root, engine)
}

#[test]
fn test_generate_report_end_to_end() {
    let (_root, engine) = indexed_engine();
    let generator = ReportGenerator::new(MockProvider::new("1. IDENTIFICACIÓN\nPóliza 515360"));

    let mut request = ReportRequest::new(
        "Mancha de humedad en el techo del baño",
        vec!["HOGAR".to_string(), "05_Danos_por_agua".to_string()],
    );
    request.claim_id = Some("SIN-2024-001".to_string());
    request.template_id = "simplificado".to_string();

    let output = generator.generate(&engine, &request).unwrap();
    assert_eq!(output.report_text, "1. IDENTIFICACIÓN\nPóliza 515360");
    assert_eq!(output.template_id, "simplificado");
    assert_eq!(output.claim_id.as_deref(), Some("SIN-2024-001"));

    let (system, user) = generator.provider().last_prompts().unwrap();
    assert!(system.contains("perito de seguros"));
    // Fuzzy id not in the catalog keeps its raw form; exact id gets a display name
    assert!(user.contains("SELECTED DOCUMENTS:\nHOGAR, 05 Danos por agua\n"));
    assert!(user.contains("[Póliza: POLIZA_HOGAR_GLOBAL]"));
    assert!(user.contains("[Protocolo: 05_Danos_por_agua]"));
    assert!(user.contains("Claim ID: SIN-2024-001"));
    assert!(user.contains("3. CONCLUSIÓN"));
}

#[test]
fn test_unknown_template_uses_completo() {
    let (_root, engine) = indexed_engine();
    let generator = ReportGenerator::new(MockProvider::new("informe"));

    let mut request = ReportRequest::new("notas de visita", vec!["POLIZA_HOGAR_GLOBAL".to_string()]);
    request.template_id = "desconocido".to_string();

    let output = generator.generate(&engine, &request).unwrap();
    assert_eq!(output.template_id, "completo");
    let (_, user) = generator.provider().last_prompts().unwrap();
    assert!(user.contains("5. TASACIÓN Y PROPUESTA"));
}

#[test]
fn test_invalid_input_never_calls_model() {
    let (_root, engine) = indexed_engine();
    let generator = ReportGenerator::new(MockProvider::new("informe"));

    let request = ReportRequest::new("notas", vec![]);
    assert!(matches!(
        generator.generate(&engine, &request),
        Err(ReportError::InvalidInput(_))
    ));

    let request = ReportRequest::new("   ", vec!["POLIZA_HOGAR_GLOBAL".to_string()]);
    assert!(matches!(
        generator.generate(&engine, &request),
        Err(ReportError::InvalidInput(_))
    ));
    assert_eq!(generator.provider().call_count(), 0);
}

#[test]
fn test_model_unavailable_is_reported() {
    let (_root, engine) = indexed_engine();
    let mut provider = MockProvider::default().with_model("gemma-x");
    provider.add_model_not_found("");
    let generator = ReportGenerator::new(provider);

    let request = ReportRequest::new("notas", vec!["POLIZA_HOGAR_GLOBAL".to_string()]);
    let err = generator.generate(&engine, &request).unwrap_err();
    assert!(matches!(err, ReportError::ModelUnavailable { ref model, .. } if model == "gemma-x"));
}

#[test]
fn test_missing_documents_still_drafts() {
    let (_root, engine) = indexed_engine();
    let generator = ReportGenerator::new(MockProvider::new("informe"));

    let request = ReportRequest::new("notas", vec!["NO_EXISTE".to_string()]);
    generator.generate(&engine, &request).unwrap();

    let (_, user) = generator.provider().last_prompts().unwrap();
    assert!(user.contains("No relevant sections found in selected documents: NO_EXISTE."));
}
