//! Claim data parser
//!
//! Pulls labelled fields out of claim data pasted by the adjuster from the
//! insurer's system. Labels are Spanish or English and matched
//! case-insensitively; anything not found stays `None`.

use perito_domain::ParsedClaim;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Chars of the description and service reason used in the search query
const QUERY_FIELD_CHARS: usize = 200;

/// Chars of raw text used as a last-resort search query
const QUERY_RAW_CHARS: usize = 500;

/// Maximum keywords returned by [`ClaimDataParser::extract_keywords`]
const MAX_KEYWORDS: usize = 10;

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => panic!("invalid built-in pattern {pattern:?}: {e}"),
    }
}

static POLICY_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:póliza|poliza|policy)[\s:]*(\d+)"));
static DNI_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:dni|nif)[\s:]*([A-Z0-9]{8,9})"));
static INSURED_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?i:asegurado|insured)[\s:]*([A-ZÁÉÍÓÚÑ \t]+)"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:domicilio|address|dirección)[\s:]*([^\n]+)"));
static CADASTRAL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\b(?i:referencia\s+catastral|catastral)[\s:]*([A-Z0-9 \t]+)"));
static DESCRIPTION_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:descripción\s+del\s+siniestro|description)[\s:]*"));
static SERVICE_REASON_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:motivo\s+de\s+alta|service\s+reason)[\s:]*"));
static CAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:causa|cause)[\s:]*([^\n]+)"));
static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\b[a-záéíóúñü]{4,}\b"));

const STOP_WORDS: &[&str] = &[
    "para", "esta", "este", "está", "están", "estos", "estas", "como", "pero", "sobre",
    "entre", "desde", "hasta", "cuando", "donde", "porque", "tiene", "tienen", "también",
    "sido", "ser", "hay", "muy", "según", "sus", "que", "del", "las", "los", "una", "por",
    "con", "todo", "toda", "todos", "otro", "otra", "dicho", "dicha",
];

/// Parses pasted claim data into a [`ParsedClaim`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimDataParser;

impl ClaimDataParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    /// Parse raw claim text; never fails
    ///
    /// # Examples
    ///
    /// ```
    /// use perito_rag::ClaimDataParser;
    ///
    /// let claim = ClaimDataParser::new().parse("Póliza: 515360\nCausa: ROTURA DE TUBERIA");
    /// assert_eq!(claim.policy_number.as_deref(), Some("515360"));
    /// assert_eq!(claim.search_query, "ROTURA DE TUBERIA");
    /// ```
    pub fn parse(&self, raw_text: &str) -> ParsedClaim {
        let text = raw_text.trim();

        let mut claim = ParsedClaim {
            policy_number: capture(&POLICY_RE, text),
            dni: capture(&DNI_RE, text).map(|dni| dni.to_uppercase()),
            insured_name: capture(&INSURED_RE, text),
            address: capture(&ADDRESS_RE, text),
            cadastral_reference: capture(&CADASTRAL_RE, text),
            claim_description: capture_block(&DESCRIPTION_LABEL_RE, text, &["motivo", "causa"]),
            service_reason: capture_block(&SERVICE_REASON_LABEL_RE, text, &["causa"]),
            cause: capture(&CAUSE_RE, text),
            search_query: String::new(),
            raw_text: raw_text.to_string(),
        };
        claim.search_query = build_search_query(&claim);
        claim
    }

    /// Distinct lower-cased words of 4+ letters, minus stop words, at most 10
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut seen = HashSet::new();

        KEYWORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| !STOP_WORDS.contains(word))
            .filter(|word| seen.insert(*word))
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect()
    }
}

/// First capture group, trimmed; empty captures count as missing
fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Multi-line value following a label
///
/// Collects non-empty lines after the label until a line that starts with
/// one of `stop_prefixes` (case-insensitive) or the end of the text.
fn capture_block(label: &Regex, text: &str, stop_prefixes: &[&str]) -> Option<String> {
    let start = label.find(text)?.end();

    let mut lines = Vec::new();
    for (i, line) in text[start..].split('\n').enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            break;
        }
        let lowered = line.to_lowercase();
        if i > 0 && stop_prefixes.iter().any(|stop| lowered.starts_with(stop)) {
            break;
        }
        lines.push(line);
    }

    let value = lines.join("\n").trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn build_search_query(claim: &ParsedClaim) -> String {
    let mut terms: Vec<&str> = Vec::new();
    if let Some(cause) = &claim.cause {
        terms.push(cause);
    }
    if let Some(description) = &claim.claim_description {
        terms.push(truncate_chars(description, QUERY_FIELD_CHARS));
    }
    if let Some(reason) = &claim.service_reason {
        terms.push(truncate_chars(reason, QUERY_FIELD_CHARS));
    }

    if terms.is_empty() {
        truncate_chars(&claim.raw_text, QUERY_RAW_CHARS).to_string()
    } else {
        terms.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CLAIM: &str = "Póliza: 515360
DNI: 30177374v
Asegurado: RAFAEL NUÑEZ LAMO
Domicilio: CALLE MAYOR 12, 3º B, MADRID
Referencia catastral: 9872023VH5797S0001WX
Descripción del siniestro: Rotura de bajante comunitaria
con filtraciones al techo del baño
Motivo de alta: Valoración de daños
en vivienda asegurada
Causa: ROTURA DE TUBERIA";

    #[test]
    fn test_parse_basic_example() {
        let text = "Póliza: 515360\nDNI: 30177374V\nAsegurado: RAFAEL NUÑEZ LAMO\nCausa: ROTURA DE TUBERIA";
        let claim = ClaimDataParser::new().parse(text);

        assert_eq!(claim.policy_number.as_deref(), Some("515360"));
        assert_eq!(claim.dni.as_deref(), Some("30177374V"));
        assert_eq!(claim.insured_name.as_deref(), Some("RAFAEL NUÑEZ LAMO"));
        assert_eq!(claim.cause.as_deref(), Some("ROTURA DE TUBERIA"));
        assert!(claim.search_query.starts_with("ROTURA DE TUBERIA"));
        assert_eq!(claim.raw_text, text);
        assert!(claim.address.is_none());
        assert!(claim.claim_description.is_none());
    }

    #[test]
    fn test_parse_full_claim() {
        let claim = ClaimDataParser::new().parse(FULL_CLAIM);

        assert_eq!(claim.dni.as_deref(), Some("30177374V"));
        assert_eq!(claim.address.as_deref(), Some("CALLE MAYOR 12, 3º B, MADRID"));
        assert_eq!(claim.cadastral_reference.as_deref(), Some("9872023VH5797S0001WX"));
        assert_eq!(
            claim.claim_description.as_deref(),
            Some("Rotura de bajante comunitaria\ncon filtraciones al techo del baño")
        );
        assert_eq!(
            claim.service_reason.as_deref(),
            Some("Valoración de daños\nen vivienda asegurada")
        );
        assert_eq!(
            claim.search_query,
            "ROTURA DE TUBERIA Rotura de bajante comunitaria\ncon filtraciones al techo del baño Valoración de daños\nen vivienda asegurada"
        );
    }

    #[test]
    fn test_description_runs_to_end_of_text() {
        let claim = ClaimDataParser::new().parse("Description: water leak\nin the kitchen");
        assert_eq!(claim.claim_description.as_deref(), Some("water leak\nin the kitchen"));
        assert_eq!(claim.search_query, "water leak\nin the kitchen");
    }

    #[test]
    fn test_search_query_truncates_long_fields() {
        let long = "x".repeat(300);
        let claim = ClaimDataParser::new().parse(&format!("Descripción del siniestro: {}", long));
        assert_eq!(claim.search_query.chars().count(), 200);
    }

    #[test]
    fn test_unlabelled_text_uses_raw_prefix() {
        let text = "ñ".repeat(600);
        let claim = ClaimDataParser::new().parse(&text);

        assert!(!claim.has_fields());
        assert_eq!(claim.search_query.chars().count(), 500);
    }

    #[test]
    fn test_empty_input() {
        let claim = ClaimDataParser::new().parse("");
        assert!(!claim.has_fields());
        assert_eq!(claim.search_query, "");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let claim = ClaimDataParser::new().parse("POLIZA 123456\ncause: storm damage");
        assert_eq!(claim.policy_number.as_deref(), Some("123456"));
        assert_eq!(claim.cause.as_deref(), Some("storm damage"));
    }

    #[test]
    fn test_labels_inside_words_are_ignored() {
        let claim = ClaimDataParser::new().parse("Daño significativo en fachada");
        assert!(claim.dni.is_none());
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = ClaimDataParser::new()
            .extract_keywords("Rotura de tubería para el baño, rotura con daños por agua en techo");

        assert_eq!(keywords, vec!["rotura", "tubería", "baño", "daños", "agua", "techo"]);
    }

    #[test]
    fn test_extract_keywords_limit() {
        let text = "alfa bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        let keywords = ClaimDataParser::new().extract_keywords(text);
        assert_eq!(keywords.len(), 10);
        assert_eq!(keywords[0], "alfa");
        assert_eq!(keywords[9], "juliet");
    }

    #[test]
    fn test_extract_keywords_empty() {
        assert!(ClaimDataParser::new().extract_keywords("").is_empty());
    }
}
