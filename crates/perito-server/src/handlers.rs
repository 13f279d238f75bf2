//! HTTP request handlers for the PeritoAI API.
//!
//! Engine calls block (SQLite, embedding and drafting over blocking HTTP),
//! so every handler that touches the engine runs its work on
//! `spawn_blocking`. Indexing takes the write lock; everything else reads.

use crate::bootstrap::{PeritoEngine, PeritoGenerator};
use crate::webhook;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use perito_domain::{DocumentInfo, DocumentType, ParsedClaim, SearchResult};
use perito_rag::{ClaimDataParser, IndexReport, PeritoConfig, RagError};
use perito_report::{ReportError, ReportOutput, ReportRequest, TEMPLATES};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Retrieval engine; `None` when startup initialization failed
    pub engine: Option<Arc<RwLock<PeritoEngine>>>,
    /// Report generator; `None` when startup initialization failed
    pub generator: Option<Arc<PeritoGenerator>>,
    /// Active configuration
    pub config: Arc<PeritoConfig>,
}

impl AppState {
    /// Wrap an engine and generator for sharing across handlers
    pub fn new(
        engine: Option<PeritoEngine>,
        generator: Option<PeritoGenerator>,
        config: PeritoConfig,
    ) -> Self {
        Self {
            engine: engine.map(|e| Arc::new(RwLock::new(e))),
            generator: generator.map(Arc::new),
            config: Arc::new(config),
        }
    }

    /// Whether both the engine and the generator are available
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some() && self.generator.is_some()
    }

    fn engine(&self) -> Result<Arc<RwLock<PeritoEngine>>, AppError> {
        self.engine.clone().ok_or(AppError::NotInitialized)
    }

    fn generator(&self) -> Result<Arc<PeritoGenerator>, AppError> {
        self.generator.clone().ok_or(AppError::NotInitialized)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Human-readable status message
    pub message: String,
    /// Whether the engine and generator are available
    pub engine_initialized: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or incomplete request
    #[error("{0}")]
    BadRequest(String),

    /// Engine or generator unavailable
    #[error("RAG engine not initialized. Check the embedding and LLM configuration.")]
    NotInitialized,

    /// Retrieval failure
    #[error(transparent)]
    Rag(#[from] RagError),

    /// Report failure
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Internal server error
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Report(ReportError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Report(ReportError::ModelUnavailable { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Rag(_) | AppError::Report(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Run blocking engine work off the async executor
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("Worker task failed: {}", e)))?
}

/// Indexing request
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    /// Clear the index first
    #[serde(default)]
    pub overwrite: bool,
    /// Index the policies directory
    #[serde(default = "default_true")]
    pub include_policies: bool,
    /// Index the protocols directory
    #[serde(default = "default_true")]
    pub include_protocols: bool,
}

fn default_true() -> bool {
    true
}

/// Document catalog response
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentsResponse {
    /// Number of documents
    pub total: usize,
    /// Number of policies
    pub policies: usize,
    /// Number of protocols
    pub protocols: usize,
    /// Catalog entries
    pub documents: Vec<DocumentInfo>,
}

/// Search request
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Documents to search
    #[serde(default)]
    pub document_ids: Vec<String>,
    /// Single policy to search when no document ids are given
    #[serde(default)]
    pub policy_id: Option<String>,
    /// Results per document
    #[serde(default)]
    pub k: Option<usize>,
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matching chunks
    pub results: Vec<SearchResult>,
}

/// Context request
#[derive(Debug, Deserialize)]
pub struct ContextRequest {
    /// Documents to draw from
    pub document_ids: Vec<String>,
    /// Free-text query
    pub query: String,
    /// Chunks per document
    #[serde(default)]
    pub max_chunks: Option<usize>,
}

/// Context response
#[derive(Debug, Serialize, Deserialize)]
pub struct ContextResponse {
    /// Formatted context block
    pub context: String,
}

/// Claim parsing request
#[derive(Debug, Deserialize)]
pub struct ParseClaimRequest {
    /// Pasted claim data
    pub text: String,
}

/// Template summary
#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    /// Template id
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Description
    pub description: &'static str,
    /// Section titles
    pub sections: &'static [&'static str],
}

/// GET / - Root status
async fn root(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "PeritoAI API is running".to_string(),
        engine_initialized: state.is_initialized(),
    })
}

/// GET /health - Health check
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let initialized = state.is_initialized();
    let (status, message) = if initialized {
        ("healthy", "Service is operational")
    } else {
        ("unhealthy", "Engine not initialized")
    };

    Json(HealthResponse {
        status: status.to_string(),
        message: message.to_string(),
        engine_initialized: initialized,
    })
}

/// POST /api/index - Index the document directories
async fn index_documents(
    State(state): State<AppState>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<IndexReport>, AppError> {
    let engine = state.engine()?;
    info!(overwrite = request.overwrite, "Index request");

    let report = run_blocking(move || {
        let mut engine = engine.blocking_write();
        Ok(engine.index_documents(
            request.overwrite,
            request.include_policies,
            request.include_protocols,
        )?)
    })
    .await?;

    Ok(Json(report))
}

/// GET /api/documents - Document catalog
async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentsResponse>, AppError> {
    let engine = state.engine()?;
    let documents = run_blocking(move || Ok(engine.blocking_read().list_documents())).await?;

    let policies = documents
        .iter()
        .filter(|d| d.document_type == DocumentType::Policy)
        .count();
    Ok(Json(DocumentsResponse {
        total: documents.len(),
        policies,
        protocols: documents.len() - policies,
        documents,
    }))
}

/// POST /api/search - Similarity search within selected documents
async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::BadRequest("query cannot be empty".to_string()));
    }
    let engine = state.engine()?;
    let k = request.k.unwrap_or(state.config.retrieval.default_k);

    let results = run_blocking(move || {
        let engine = engine.blocking_read();
        let results = match (&request.policy_id, request.document_ids.is_empty()) {
            (Some(policy_id), true) => engine.search_by_policy_id(&request.query, policy_id, k)?,
            _ => engine.search_by_document_ids(&request.query, &request.document_ids, k)?,
        };
        Ok(results)
    })
    .await?;

    Ok(Json(SearchResponse { results }))
}

/// POST /api/context - Formatted context for the selected documents
async fn documents_context(
    State(state): State<AppState>,
    Json(request): Json<ContextRequest>,
) -> Result<Json<ContextResponse>, AppError> {
    if !request.document_ids.is_empty() && request.query.trim().is_empty() {
        return Err(AppError::BadRequest("query cannot be empty".to_string()));
    }
    let engine = state.engine()?;
    let max_chunks = request
        .max_chunks
        .unwrap_or(state.config.retrieval.max_chunks_per_doc);

    let context = run_blocking(move || {
        Ok(engine
            .blocking_read()
            .get_documents_context(&request.document_ids, &request.query, max_chunks)?)
    })
    .await?;

    Ok(Json(ContextResponse { context }))
}

/// POST /api/parse-claim - Structured fields from pasted claim data
async fn parse_claim(Json(request): Json<ParseClaimRequest>) -> Json<ParsedClaim> {
    Json(ClaimDataParser::new().parse(&request.text))
}

/// GET /api/templates - Available report templates
async fn list_templates() -> Json<Vec<TemplateInfo>> {
    Json(
        TEMPLATES
            .iter()
            .map(|t| TemplateInfo {
                id: t.id,
                name: t.name,
                description: t.description,
                sections: t.sections,
            })
            .collect(),
    )
}

/// POST /api/generate-report - Draft a report
async fn generate_report(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> Result<Json<ReportOutput>, AppError> {
    // Input errors win over a missing engine
    request.validate()?;
    let engine = state.engine()?;
    let generator = state.generator()?;
    info!(
        documents = request.document_ids.len(),
        claim_id = request.claim_id.as_deref().unwrap_or("N/A"),
        "Generating report"
    );

    let output = run_blocking(move || {
        let engine = engine.blocking_read();
        Ok(generator.generate(&*engine, &request)?)
    })
    .await?;

    Ok(Json(output))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/index", post(index_documents))
        .route("/api/documents", get(list_documents))
        .route("/api/search", post(search))
        .route("/api/context", post(documents_context))
        .route("/api/parse-claim", post(parse_claim))
        .route("/api/templates", get(list_templates))
        .route("/api/generate-report", post(generate_report))
        .route("/webhook", get(webhook::verify).post(webhook::receive))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt; // for oneshot

    fn uninitialized_state() -> AppState {
        AppState::new(None, None, PeritoConfig::default())
    }

    #[tokio::test]
    async fn test_health_check_uninitialized() {
        let app = create_router(uninitialized_state());

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "unhealthy");
        assert!(!health.engine_initialized);
    }

    #[tokio::test]
    async fn test_engine_routes_need_engine() {
        let app = create_router(uninitialized_state());

        let request = Request::builder()
            .uri("/api/documents")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_parse_claim_works_without_engine() {
        let app = create_router(uninitialized_state());

        let request = Request::builder()
            .method("POST")
            .uri("/api/parse-claim")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "Póliza: 515360"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_context_rejects_blank_query_before_engine() {
        let app = create_router(uninitialized_state());

        let request = Request::builder()
            .method("POST")
            .uri("/api/context")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"document_ids": ["HOGAR"], "query": " "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            AppError::Report(ReportError::InvalidInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Report(ReportError::ModelUnavailable {
                model: "m".into(),
                details: "d".into()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Report(ReportError::Generation("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Rag(RagError::Search("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
