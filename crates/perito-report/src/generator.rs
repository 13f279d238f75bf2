//! Report generation: retrieval context + prompt + drafting model

use crate::error::ReportError;
use crate::prompt::{PeritoInfo, PromptBuilder, SYSTEM_PROMPT};
use crate::templates::{get_template, DEFAULT_TEMPLATE_ID};
use perito_domain::traits::{LlmProvider, SimilarityIndex, TextExtractor};
use perito_domain::ParsedClaim;
use perito_llm::LlmError;
use perito_rag::RagEngine;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Chunks retrieved per selected document
pub const REPORT_CHUNKS_PER_DOC: usize = 10;

/// Chars of field notes used as the query when nothing better is available
const NOTES_QUERY_CHARS: usize = 500;

fn default_template_id() -> String {
    DEFAULT_TEMPLATE_ID.to_string()
}

/// Everything needed to draft one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Adjuster's notes from the site visit
    pub field_notes: String,

    /// Documents to draw context from
    pub document_ids: Vec<String>,

    /// Template id; unknown ids fall back to `completo`
    #[serde(default = "default_template_id")]
    pub template_id: String,

    /// Claim number
    #[serde(default)]
    pub claim_id: Option<String>,

    /// Explicit retrieval query
    #[serde(default)]
    pub query_context: Option<String>,

    /// Adjuster identity
    #[serde(default, alias = "perito_info")]
    pub perito: Option<PeritoInfo>,

    /// Structured claim data
    #[serde(default, alias = "parsed_claim_data")]
    pub parsed_claim: Option<ParsedClaim>,
}

impl ReportRequest {
    /// Request with the default template and no optional data
    pub fn new(field_notes: impl Into<String>, document_ids: Vec<String>) -> Self {
        Self {
            field_notes: field_notes.into(),
            document_ids,
            template_id: default_template_id(),
            claim_id: None,
            query_context: None,
            perito: None,
            parsed_claim: None,
        }
    }

    /// Reject requests that cannot produce a report
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.document_ids.iter().all(|id| id.trim().is_empty()) {
            return Err(ReportError::InvalidInput(
                "document_ids must be provided and cannot be empty".to_string(),
            ));
        }
        if self.field_notes.trim().is_empty() {
            return Err(ReportError::InvalidInput(
                "field_notes cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Retrieval query: explicit query, then the parsed claim's, then the notes
    pub fn retrieval_query(&self) -> String {
        if let Some(query) = self.query_context.as_deref().filter(|q| !q.trim().is_empty()) {
            return query.to_string();
        }
        if let Some(claim) = &self.parsed_claim {
            if !claim.search_query.trim().is_empty() {
                return claim.search_query.clone();
            }
        }
        self.field_notes.chars().take(NOTES_QUERY_CHARS).collect()
    }
}

/// A drafted report with the inputs it was drafted from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportOutput {
    /// Report text as returned by the model
    pub report_text: String,

    /// Documents the context came from
    pub document_ids: Vec<String>,

    /// Template actually used
    pub template_id: String,

    /// Claim number
    pub claim_id: Option<String>,

    /// Adjuster's notes
    pub field_notes: String,

    /// Adjuster identity
    pub perito: Option<PeritoInfo>,

    /// Structured claim data
    pub parsed_claim: Option<ParsedClaim>,
}

impl ReportOutput {
    /// Policy number from the parsed claim, if any
    pub fn policy_number(&self) -> Option<&str> {
        self.parsed_claim
            .as_ref()
            .and_then(|c| c.policy_number.as_deref())
    }
}

/// Drafts reports with an [`LlmProvider`]
pub struct ReportGenerator<P> {
    provider: P,
}

impl<P> ReportGenerator<P>
where
    P: LlmProvider<Error = LlmError>,
{
    /// Create a generator around a drafting provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Drafting provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Name of the drafting model
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Build the user prompt for a request
    ///
    /// Validates the request, retrieves context from the selected documents
    /// and resolves their display names from the catalog.
    pub fn build_prompt<I, X>(
        &self,
        engine: &RagEngine<I, X>,
        request: &ReportRequest,
    ) -> Result<String, ReportError>
    where
        I: SimilarityIndex,
        I::Error: Display,
        X: TextExtractor,
        X::Error: Display,
    {
        request.validate()?;

        let template = get_template(&request.template_id);
        if template.id != request.template_id {
            warn!(requested = %request.template_id, "Unknown template, using {}", template.id);
        }

        let query = request.retrieval_query();
        let context =
            engine.get_documents_context(&request.document_ids, &query, REPORT_CHUNKS_PER_DOC)?;

        let catalog = engine.catalog();
        let names = request
            .document_ids
            .iter()
            .map(|id| catalog.display_name(id))
            .collect();

        Ok(PromptBuilder::new(template, request.field_notes.as_str())
            .with_documents(names)
            .with_context(context)
            .with_claim_id(request.claim_id.clone())
            .with_perito(request.perito.clone())
            .with_parsed_claim(request.parsed_claim.clone())
            .build())
    }

    /// Send a prompt to the drafting model
    pub fn draft(&self, user_prompt: &str) -> Result<String, ReportError> {
        self.provider
            .generate(SYSTEM_PROMPT, user_prompt)
            .map_err(|e| match e {
                LlmError::ModelNotAvailable(details) => ReportError::ModelUnavailable {
                    model: self.provider.model_name().to_string(),
                    details,
                },
                other => ReportError::Generation(other.to_string()),
            })
    }

    /// Draft a complete report
    pub fn generate<I, X>(
        &self,
        engine: &RagEngine<I, X>,
        request: &ReportRequest,
    ) -> Result<ReportOutput, ReportError>
    where
        I: SimilarityIndex,
        I::Error: Display,
        X: TextExtractor,
        X::Error: Display,
    {
        let prompt = self.build_prompt(engine, request)?;
        let template = get_template(&request.template_id);

        info!(
            documents = request.document_ids.len(),
            template = template.id,
            model = self.model_name(),
            "Generating report"
        );
        debug!(prompt_chars = prompt.chars().count(), "Prompt built");

        let report_text = self.draft(&prompt)?;

        Ok(ReportOutput {
            report_text,
            document_ids: request.document_ids.clone(),
            template_id: template.id.to_string(),
            claim_id: request.claim_id.clone(),
            field_notes: request.field_notes.clone(),
            perito: request.perito.clone(),
            parsed_claim: request.parsed_claim.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perito_llm::MockProvider;

    #[test]
    fn test_validate_rejects_empty_ids() {
        let request = ReportRequest::new("notas", vec![]);
        assert!(matches!(request.validate(), Err(ReportError::InvalidInput(_))));

        let request = ReportRequest::new("notas", vec!["  ".to_string()]);
        assert!(matches!(request.validate(), Err(ReportError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_blank_notes() {
        let request = ReportRequest::new(" \n ", vec!["POLIZA".to_string()]);
        assert!(matches!(request.validate(), Err(ReportError::InvalidInput(_))));
    }

    #[test]
    fn test_query_precedence() {
        let mut request = ReportRequest::new("n".repeat(600), vec!["A".to_string()]);
        assert_eq!(request.retrieval_query().chars().count(), 500);

        request.parsed_claim = Some(ParsedClaim {
            search_query: "ROTURA DE TUBERIA".to_string(),
            ..ParsedClaim::default()
        });
        assert_eq!(request.retrieval_query(), "ROTURA DE TUBERIA");

        request.query_context = Some("filtraciones".to_string());
        assert_eq!(request.retrieval_query(), "filtraciones");

        request.query_context = Some("   ".to_string());
        assert_eq!(request.retrieval_query(), "ROTURA DE TUBERIA");
    }

    #[test]
    fn test_draft_maps_model_unavailable() {
        let mut provider = MockProvider::default().with_model("llama9");
        provider.add_model_not_found("");
        let generator = ReportGenerator::new(provider);

        match generator.draft("prompt") {
            Err(ReportError::ModelUnavailable { model, .. }) => assert_eq!(model, "llama9"),
            other => panic!("expected ModelUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_maps_other_failures() {
        let mut provider = MockProvider::default();
        provider.add_error("prompt");
        let generator = ReportGenerator::new(provider);

        let err = generator.draft("prompt").unwrap_err();
        assert!(matches!(err, ReportError::Generation(_)));
        assert!(err.to_string().contains("Mock error"));
    }

    #[test]
    fn test_model_unavailable_message_suggests_models() {
        let err = ReportError::ModelUnavailable {
            model: "llama9".to_string(),
            details: "404".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("'llama9'"));
        assert!(message.contains("llama3.1"));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: ReportRequest = serde_json::from_str(
            r#"{"field_notes": "notas", "document_ids": ["A"], "perito_info": {"nombre": "Ana"}}"#,
        )
        .unwrap();
        assert_eq!(request.template_id, "completo");
        assert_eq!(request.perito.unwrap().name.as_deref(), Some("Ana"));
        assert!(request.parsed_claim.is_none());
    }
}
