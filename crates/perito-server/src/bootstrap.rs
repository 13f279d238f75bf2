//! Construction of the engine and report generator from configuration

use crate::ServerError;
use perito_domain::traits::{EmbeddingProvider, LlmProvider};
use perito_llm::{LlmError, MockProvider, OllamaEmbedder, OllamaProvider};
use perito_rag::{EmbeddingConfig, LlmConfig, MultiFormatExtractor, PeritoConfig, ProviderKind, RagEngine};
use perito_report::ReportGenerator;
use perito_store::embedding::{EmbeddingError, MockEmbeddingModel};
use perito_store::SqliteStore;
use thiserror::Error;
use tracing::info;

/// Reply of the mock drafting provider
pub const MOCK_REPORT: &str = "INFORME PERICIAL (modo de prueba)\n\nIDENTIFICACIÓN\nBorrador generado sin modelo de lenguaje.";

/// Drafting provider chosen at runtime
pub type DynProvider = Box<dyn LlmProvider<Error = LlmError> + Send + Sync>;

/// Engine as assembled from configuration
pub type PeritoEngine = RagEngine<SqliteStore<Embedder>, MultiFormatExtractor>;

/// Report generator as assembled from configuration
pub type PeritoGenerator = ReportGenerator<DynProvider>;

/// Embedding errors from either backend
#[derive(Debug, Error)]
pub enum EmbedderError {
    /// Offline model
    #[error(transparent)]
    Mock(#[from] EmbeddingError),

    /// Ollama
    #[error(transparent)]
    Ollama(#[from] LlmError),
}

/// Embedding backend chosen at runtime
pub enum Embedder {
    /// Hash-based offline model
    Mock(MockEmbeddingModel),
    /// Ollama embeddings API
    Ollama(OllamaEmbedder),
}

impl EmbeddingProvider for Embedder {
    type Error = EmbedderError;

    fn embed(&self, text: &str) -> Result<Vec<f32>, Self::Error> {
        match self {
            Embedder::Mock(model) => Ok(model.embed(text)?),
            Embedder::Ollama(model) => Ok(model.embed(text)?),
        }
    }

    fn dimension(&self) -> usize {
        match self {
            Embedder::Mock(model) => model.dimension(),
            Embedder::Ollama(model) => model.dimension(),
        }
    }
}

/// Embedding backend for `config`
pub fn build_embedder(config: &EmbeddingConfig) -> Result<Embedder, ServerError> {
    match config.provider {
        ProviderKind::Mock => Ok(Embedder::Mock(MockEmbeddingModel::new(config.dimension))),
        ProviderKind::Ollama => Ok(Embedder::Ollama(OllamaEmbedder::new(
            config.endpoint.as_str(),
            config.model.as_str(),
            config.dimension,
        )?)),
    }
}

/// Drafting provider for `config`
pub fn build_provider(config: &LlmConfig) -> Result<DynProvider, ServerError> {
    match config.provider {
        ProviderKind::Mock => Ok(Box::new(MockProvider::new(MOCK_REPORT).with_model(config.model.as_str()))),
        ProviderKind::Ollama => Ok(Box::new(
            OllamaProvider::new(config.endpoint.as_str(), config.model.as_str())?
                .with_temperature(config.temperature),
        )),
    }
}

/// Open the index and assemble the engine
///
/// Blocking: opens SQLite and rebuilds the vector index.
pub fn build_engine(config: &PeritoConfig) -> Result<PeritoEngine, ServerError> {
    if let Some(parent) = config.paths.index_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let embedder = build_embedder(&config.embedding)?;
    let store = SqliteStore::open(&config.paths.index_path, embedder)?;
    info!(
        index = %config.paths.index_path.display(),
        embedding = ?config.embedding.provider,
        "Index opened"
    );
    Ok(RagEngine::new(store, MultiFormatExtractor::new(), config.clone()))
}

/// Assemble the report generator
pub fn build_generator(config: &PeritoConfig) -> Result<PeritoGenerator, ServerError> {
    let provider = build_provider(&config.llm)?;
    info!(model = provider.model_name(), "Report generator ready");
    Ok(ReportGenerator::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use perito_domain::traits::SimilarityIndex;

    fn mock_config(dir: &std::path::Path) -> PeritoConfig {
        let mut config = PeritoConfig::default();
        config.embedding.provider = ProviderKind::Mock;
        config.embedding.dimension = 32;
        config.llm.provider = ProviderKind::Mock;
        config.paths.index_path = dir.join("nested").join("index.db");
        config
    }

    #[test]
    fn test_build_mock_engine_creates_index_dir() {
        let dir = tempfile::tempdir().unwrap();
        let engine = build_engine(&mock_config(dir.path())).unwrap();

        assert!(dir.path().join("nested").is_dir());
        assert_eq!(engine.index().chunk_count().unwrap(), 0);
        assert_eq!(engine.index().embedder().dimension(), 32);
    }

    #[test]
    fn test_build_mock_generator() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = mock_config(dir.path());
        config.llm.model = "mock-drafter".to_string();

        let generator = build_generator(&config).unwrap();
        assert_eq!(generator.model_name(), "mock-drafter");
        assert_eq!(generator.draft("prompt").unwrap(), MOCK_REPORT);
    }

    #[test]
    fn test_mock_embedder_dispatch() {
        let embedder = build_embedder(&EmbeddingConfig {
            provider: ProviderKind::Mock,
            dimension: 16,
            ..EmbeddingConfig::default()
        })
        .unwrap();
        assert_eq!(embedder.embed("agua").unwrap().len(), 16);
        assert!(embedder.embed("").is_err());
    }
}
