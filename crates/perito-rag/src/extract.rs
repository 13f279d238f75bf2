//! Text extractors for source documents
//!
//! - [`PdfTextExtractor`]: `.pdf` via `pdf-extract`
//! - [`PlainTextExtractor`]: `.txt` and `.md`
//! - [`MultiFormatExtractor`]: delegates to the first extractor that supports a file

use crate::error::ExtractError;
use perito_domain::traits::TextExtractor;
use std::path::Path;
use tracing::debug;

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Extracts text from PDF files
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    type Error = ExtractError;

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["pdf"])
    }

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        let file = path.display().to_string();

        // pdf-extract panics on some malformed files; treat that like any other parse failure
        let outcome = std::panic::catch_unwind(|| pdf_extract::extract_text(path));
        match outcome {
            Ok(Ok(text)) => {
                debug!(path = %file, chars = text.chars().count(), "Extracted PDF text");
                Ok(text)
            }
            Ok(Err(e)) => Err(ExtractError::Pdf {
                path: file,
                reason: e.to_string(),
            }),
            Err(_) => Err(ExtractError::Pdf {
                path: file,
                reason: "parser panicked".to_string(),
            }),
        }
    }
}

/// Reads UTF-8 text and markdown files as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    type Error = ExtractError;

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["txt", "md", "markdown"])
    }

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Delegates to the first registered extractor that supports a file
pub struct MultiFormatExtractor {
    extractors: Vec<Box<dyn TextExtractor<Error = ExtractError> + Send + Sync>>,
}

impl MultiFormatExtractor {
    /// Create an extractor handling PDF, plain text and markdown
    pub fn new() -> Self {
        Self {
            extractors: vec![Box::new(PdfTextExtractor), Box::new(PlainTextExtractor)],
        }
    }

    /// Register an additional extractor, tried after the built-in ones
    pub fn with_extractor(
        mut self,
        extractor: impl TextExtractor<Error = ExtractError> + Send + Sync + 'static,
    ) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }
}

impl Default for MultiFormatExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for MultiFormatExtractor {
    type Error = ExtractError;

    fn supports(&self, path: &Path) -> bool {
        self.extractors.iter().any(|e| e.supports(path))
    }

    fn extract(&self, path: &Path) -> Result<String, Self::Error> {
        self.extractors
            .iter()
            .find(|e| e.supports(path))
            .ok_or_else(|| ExtractError::Unsupported(path.display().to_string()))?
            .extract(path)
    }
}
