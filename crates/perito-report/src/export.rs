//! Report export: section splitting and plain-text rendering

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Title of text preceding the first recognised section
pub const INTRODUCTION_TITLE: &str = "INTRODUCCIÓN";

/// Title used when no section could be collected
pub const WHOLE_REPORT_TITLE: &str = "INFORME COMPLETO";

/// Default section markers
pub const DEFAULT_MARKERS: &[&str] = &[
    "IDENTIFICACIÓN",
    "ANTECEDENTES",
    "ANÁLISIS DE CAUSALIDAD",
    "ANÁLISIS DE COBERTURA",
    "TASACIÓN Y PROPUESTA",
    "CONCLUSIONES",
];

/// Lines this long or longer are never headers
const MAX_HEADER_CHARS: usize = 100;

/// One titled section of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    /// Section title
    pub title: String,
    /// Section body
    pub content: String,
}

/// Splits report text into titled sections
pub trait SectionSplitter {
    /// Split `report_text` into sections, in document order
    fn split(&self, report_text: &str) -> Vec<ReportSection>;
}

/// Splits on header lines containing one of a list of markers
///
/// A line shorter than 100 chars whose upper-cased form contains a marker
/// starts a section titled with that marker. A marker seen twice keeps its
/// first position and takes the later content.
#[derive(Debug, Clone)]
pub struct MarkerSectionSplitter {
    markers: Vec<String>,
}

impl MarkerSectionSplitter {
    /// Splitter with custom markers
    pub fn new(markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// Markers checked against each line
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    fn header_marker(&self, line: &str) -> Option<&str> {
        if line.chars().count() >= MAX_HEADER_CHARS {
            return None;
        }
        let upper = line.to_uppercase();
        self.markers
            .iter()
            .find(|marker| upper.contains(marker.as_str()))
            .map(String::as_str)
    }
}

impl Default for MarkerSectionSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS.iter().copied())
    }
}

fn store_section(sections: &mut Vec<ReportSection>, title: &str, lines: &[&str]) {
    if lines.is_empty() {
        return;
    }
    let content = lines.join("\n");
    match sections.iter_mut().find(|s| s.title == title) {
        Some(section) => section.content = content,
        None => sections.push(ReportSection {
            title: title.to_string(),
            content,
        }),
    }
}

impl SectionSplitter for MarkerSectionSplitter {
    fn split(&self, report_text: &str) -> Vec<ReportSection> {
        let mut sections = Vec::new();
        let mut title = INTRODUCTION_TITLE.to_string();
        let mut lines: Vec<&str> = Vec::new();

        for line in report_text.split('\n') {
            let line = line.trim();
            match self.header_marker(line) {
                Some(marker) => {
                    store_section(&mut sections, &title, &lines);
                    title = marker.to_string();
                    lines.clear();
                }
                None => lines.push(line),
            }
        }
        store_section(&mut sections, &title, &lines);

        if sections.is_empty() {
            sections.push(ReportSection {
                title: WHOLE_REPORT_TITLE.to_string(),
                content: report_text.to_string(),
            });
        }
        sections
    }
}

/// Header data printed above the sections
#[derive(Debug, Clone)]
pub struct ReportMetadata {
    /// Policy number
    pub policy_id: Option<String>,
    /// Claim number
    pub claim_id: Option<String>,
    /// Generation time
    pub generated_at: DateTime<Local>,
}

impl ReportMetadata {
    /// Metadata stamped with the current time
    pub fn now(policy_id: Option<String>, claim_id: Option<String>) -> Self {
        Self {
            policy_id,
            claim_id,
            generated_at: Local::now(),
        }
    }
}

/// Render sections as a plain-text document
pub fn render_text_report(title: &str, sections: &[ReportSection], metadata: &ReportMetadata) -> String {
    let rule = "=".repeat(title.chars().count().max(40));
    let mut out = String::new();

    out.push_str(&rule);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule);
    out.push_str("\n\n");

    if let Some(policy) = &metadata.policy_id {
        out.push_str(&format!("Póliza: {}\n", policy));
    }
    if let Some(claim) = &metadata.claim_id {
        out.push_str(&format!("Número de Siniestro: {}\n", claim));
    }
    out.push_str(&format!(
        "Fecha de Generación: {}\n\n",
        metadata.generated_at.format("%d/%m/%Y %H:%M")
    ));

    for section in sections {
        out.push_str(&section.title);
        out.push('\n');
        out.push_str(&"-".repeat(section.title.chars().count()));
        out.push('\n');
        out.push_str(section.content.trim());
        out.push_str("\n\n");
    }

    out.push_str(&format!(
        "Generado por PeritoAI - {}\n",
        metadata.generated_at.format("%d/%m/%Y")
    ));
    out
}

/// `informe_pericial_{policy|unknown}_{claim|timestamp}.txt`
pub fn default_report_filename(metadata: &ReportMetadata) -> String {
    let policy = metadata.policy_id.as_deref().unwrap_or("unknown");
    let suffix = match &metadata.claim_id {
        Some(claim) => claim.clone(),
        None => metadata.generated_at.format("%Y%m%d_%H%M%S").to_string(),
    };
    format!("informe_pericial_{}_{}.txt", policy, suffix)
}

/// Split, render and write a report into `dir`, returning the file path
pub fn export_text_report(
    dir: &Path,
    report_text: &str,
    splitter: &dyn SectionSplitter,
    metadata: &ReportMetadata,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let sections = splitter.split(report_text);
    let rendered = render_text_report("INFORME PERICIAL", &sections, metadata);

    let path = dir.join(default_report_filename(metadata));
    std::fs::write(&path, rendered)?;
    info!(path = %path.display(), sections = sections.len(), "Report exported");
    Ok(path)
}
