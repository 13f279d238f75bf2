//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use perito_domain::{DocumentInfo, ParsedClaim, SearchResult};
use perito_rag::IndexReport;
use perito_report::ReportTemplate;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Chars of chunk text shown in result tables
const EXCERPT_CHARS: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn table(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format the document catalog.
    pub fn format_documents(&self, documents: &[DocumentInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(documents)?),
            OutputFormat::Quiet => Ok(documents
                .iter()
                .map(|d| d.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if documents.is_empty() {
                    return Ok(self.colorize("No documents indexed.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Type", "ID", "Name", "Source"]);
                for doc in documents {
                    builder.push_record([
                        doc.document_type.label(),
                        doc.id.as_str(),
                        doc.display_name.as_str(),
                        doc.source.as_str(),
                    ]);
                }
                Ok(Self::table(builder))
            }
        }
    }

    /// Format search results.
    pub fn format_results(&self, results: &[SearchResult]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
            OutputFormat::Quiet => Ok(results
                .iter()
                .map(|r| r.content.as_str())
                .collect::<Vec<_>>()
                .join("\n---\n")),
            OutputFormat::Table => {
                if results.is_empty() {
                    return Ok(self.colorize("No results found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["#", "Document", "Score", "Excerpt"]);
                for (i, result) in results.iter().enumerate() {
                    builder.push_record([
                        (i + 1).to_string(),
                        result.metadata.document_id.clone(),
                        format!("{:.4}", result.score),
                        excerpt(&result.content),
                    ]);
                }
                Ok(Self::table(builder))
            }
        }
    }

    /// Format a parsed claim.
    pub fn format_claim(&self, claim: &ParsedClaim) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(claim)?),
            OutputFormat::Quiet => Ok(claim.search_query.clone()),
            OutputFormat::Table => {
                let fields = [
                    ("Póliza", &claim.policy_number),
                    ("DNI", &claim.dni),
                    ("Asegurado", &claim.insured_name),
                    ("Domicilio", &claim.address),
                    ("Referencia catastral", &claim.cadastral_reference),
                    ("Descripción", &claim.claim_description),
                    ("Motivo de alta", &claim.service_reason),
                    ("Causa", &claim.cause),
                ];
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (label, value) in fields {
                    builder.push_record([label, value.as_deref().unwrap_or("-")]);
                }
                builder.push_record(["Search query", claim.search_query.as_str()]);
                Ok(Self::table(builder))
            }
        }
    }

    /// Format an indexing outcome.
    pub fn format_index_report(&self, report: &IndexReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Quiet => Ok(report.chunks.to_string()),
            OutputFormat::Table => {
                if report.chunks == 0 {
                    return Ok(self.warning("No documents to index"));
                }
                Ok(self.success(&format!(
                    "Indexed {} policies and {} protocols ({} chunks)",
                    report.policies, report.protocols, report.chunks
                )))
            }
        }
    }

    /// Format the template list.
    pub fn format_templates(&self, templates: &[ReportTemplate]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json: Vec<serde_json::Value> = templates
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "id": t.id,
                            "name": t.name,
                            "description": t.description,
                            "sections": t.sections,
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Quiet => Ok(templates.iter().map(|t| t.id).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Sections"]);
                for t in templates {
                    builder.push_record([t.id.to_string(), t.name.to_string(), t.sections.join(", ")]);
                }
                Ok(Self::table(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Single-line excerpt of chunk text
fn excerpt(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut)
}
