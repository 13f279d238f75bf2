//! PeritoAI Report Assembly
//!
//! Turns field notes, selected documents and claim data into a drafted
//! insurance adjuster report (informe pericial):
//!
//! 1. Validate the request
//! 2. Retrieve context from the selected documents
//! 3. Build the prompt from a template
//! 4. Draft with an [`LlmProvider`](perito_domain::traits::LlmProvider)
//!
//! Drafted text can then be split into sections and exported as plain text.

#![warn(missing_docs)]

mod error;
mod export;
mod generator;
mod prompt;
mod templates;

pub use error::{ReportError, SUGGESTED_MODELS};
pub use export::{
    default_report_filename, export_text_report, render_text_report, MarkerSectionSplitter,
    ReportMetadata, ReportSection, SectionSplitter, DEFAULT_MARKERS, INTRODUCTION_TITLE,
    WHOLE_REPORT_TITLE,
};
pub use generator::{ReportGenerator, ReportOutput, ReportRequest, REPORT_CHUNKS_PER_DOC};
pub use prompt::{PeritoInfo, PromptBuilder, SYSTEM_PROMPT};
pub use templates::{get_template, template_ids, ReportTemplate, DEFAULT_TEMPLATE_ID, TEMPLATES};
