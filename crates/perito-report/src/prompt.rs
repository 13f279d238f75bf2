//! Prompt construction for report drafting

use crate::templates::ReportTemplate;
use perito_domain::ParsedClaim;
use serde::{Deserialize, Serialize};

/// Adjuster identity printed in the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeritoInfo {
    /// Full name
    #[serde(alias = "nombre")]
    pub name: Option<String>,

    /// Professional registration number (colegiado)
    #[serde(alias = "colegiado")]
    pub license_number: Option<String>,

    /// Firm or cabinet (empresa/gabinete)
    #[serde(alias = "empresa")]
    pub firm: Option<String>,
}

impl PeritoInfo {
    /// Labelled lines for the non-empty fields
    fn lines(&self) -> Vec<String> {
        let fields = [
            ("Nombre", &self.name),
            ("Colegiado", &self.license_number),
            ("Empresa/Gabinete", &self.firm),
        ];
        labelled_lines(&fields)
    }
}

fn labelled_lines(fields: &[(&str, &Option<String>)]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| format!("{}: {}", label, v))
        })
        .collect()
}

fn claim_lines(claim: &ParsedClaim) -> Vec<String> {
    let fields = [
        ("Póliza", &claim.policy_number),
        ("Asegurado", &claim.insured_name),
        ("DNI", &claim.dni),
        ("Domicilio", &claim.address),
        ("Causa", &claim.cause),
    ];
    labelled_lines(&fields)
}

/// Builds the user prompt sent alongside [`SYSTEM_PROMPT`]
pub struct PromptBuilder {
    template: &'static ReportTemplate,
    field_notes: String,
    document_names: Vec<String>,
    context: String,
    claim_id: Option<String>,
    perito: Option<PeritoInfo>,
    parsed_claim: Option<ParsedClaim>,
}

impl PromptBuilder {
    /// Create a builder for the given template and field notes
    pub fn new(template: &'static ReportTemplate, field_notes: impl Into<String>) -> Self {
        Self {
            template,
            field_notes: field_notes.into(),
            document_names: Vec::new(),
            context: String::new(),
            claim_id: None,
            perito: None,
            parsed_claim: None,
        }
    }

    /// Display names of the selected documents
    pub fn with_documents(mut self, names: Vec<String>) -> Self {
        self.document_names = names;
        self
    }

    /// Retrieved document sections
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Claim id, shown when no parsed claim fields are available
    pub fn with_claim_id(mut self, claim_id: Option<String>) -> Self {
        self.claim_id = claim_id;
        self
    }

    /// Adjuster identity
    pub fn with_perito(mut self, perito: Option<PeritoInfo>) -> Self {
        self.perito = perito;
        self
    }

    /// Structured claim data
    pub fn with_parsed_claim(mut self, claim: Option<ParsedClaim>) -> Self {
        self.parsed_claim = claim;
        self
    }

    fn claim_section(&self) -> String {
        let lines = self.parsed_claim.as_ref().map(claim_lines).unwrap_or_default();
        if lines.is_empty() {
            format!("Claim ID: {}", self.claim_id.as_deref().unwrap_or("N/A"))
        } else {
            lines.join("\n")
        }
    }

    fn perito_section(&self) -> String {
        let lines = self.perito.as_ref().map(PeritoInfo::lines).unwrap_or_default();
        if lines.is_empty() {
            "Not provided".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Build the complete user prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(
            "Generate an insurance adjuster report (Informe Pericial) based on the following information:\n\n",
        );

        prompt.push_str("SELECTED DOCUMENTS:\n");
        prompt.push_str(&self.document_names.join(", "));
        prompt.push_str("\n\n");

        prompt.push_str("CLAIM INFORMATION:\n");
        prompt.push_str(&self.claim_section());
        prompt.push_str("\n\n");

        prompt.push_str("PERITO INFORMATION:\n");
        prompt.push_str(&self.perito_section());
        prompt.push_str("\n\n");

        prompt.push_str("RELEVANT DOCUMENT SECTIONS:\n");
        prompt.push_str(&self.context);
        prompt.push_str("\n\n");

        prompt.push_str("FIELD NOTES FROM ADJUSTER VISIT:\n");
        prompt.push_str(&self.field_notes);
        prompt.push_str("\n\n");

        prompt.push_str(self.template.prompt_section);
        prompt.push_str("\n\n");

        prompt.push_str(IMPORTANT_REMINDER);
        prompt
    }
}

/// Adjuster persona sent as the system prompt
pub const SYSTEM_PROMPT: &str = r#"You are an expert insurance adjuster (perito de seguros) in Spain.
Your task is to generate professional insurance adjuster reports (Informes Periciales) in Spanish,
following Spanish insurance industry standards and regulations.

Key requirements:
1. Write all content in Professional Spanish using insurance industry terminology
2. Use proper Spanish insurance jargon such as:
   - "siniestro indemnizable" (indemnifiable claim)
   - "daños estéticos" (aesthetic damages)
   - "valor a nuevo" (replacement value)
   - "nexo causal" (causal link)
   - "cobertura" (coverage)
   - "póliza" (policy)
   - "asegurado" (insured)
   - "tomador" (policyholder)
   - "prima" (premium)
   - "franquicia" (deductible)
   - "peritaje" (expert appraisal)
   - "tasación" (valuation/assessment)
   - "daños materiales" (material damages)
   - "bien asegurado" (insured property)

3. Maintain a formal, professional, and objective tone
4. Structure the report according to Spanish insurance standards
5. Base all analysis on the provided policy documents and field notes
6. Be precise and technical in your assessment
7. Always justify your conclusions with evidence from the policy and field observations"#;

const IMPORTANT_REMINDER: &str = r#"IMPORTANT:
- Write everything in Professional Spanish
- Use proper insurance terminology throughout
- Be objective and technical
- Base all conclusions on the provided document clauses and field observations
- Reference specific documents when citing coverage or protocols
- Ensure the report follows Spanish insurance industry standards
- Follow the exact structure specified above"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::get_template;

    #[test]
    fn test_prompt_layout() {
        let prompt = PromptBuilder::new(get_template("simplificado"), "Mancha de humedad en techo")
            .with_documents(vec!["POLIZA_HOGAR".to_string(), "05 Agua".to_string()])
            .with_context("[Póliza: POLIZA_HOGAR]")
            .build();

        let order = [
            "SELECTED DOCUMENTS:\nPOLIZA_HOGAR, 05 Agua",
            "CLAIM INFORMATION:\nClaim ID: N/A",
            "PERITO INFORMATION:\nNot provided",
            "RELEVANT DOCUMENT SECTIONS:\n[Póliza: POLIZA_HOGAR]",
            "FIELD NOTES FROM ADJUSTER VISIT:\nMancha de humedad en techo",
            "1. CAUSA DEL SINIESTRO",
            "IMPORTANT:",
        ];
        let mut last = 0;
        for part in order {
            let pos = prompt.find(part).unwrap_or_else(|| panic!("missing {:?}", part));
            assert!(pos >= last, "{:?} out of order", part);
            last = pos;
        }
    }

    #[test]
    fn test_claim_id_used_without_parsed_fields() {
        let prompt = PromptBuilder::new(get_template("completo"), "notas")
            .with_claim_id(Some("SIN-2024-001".to_string()))
            .with_parsed_claim(Some(ParsedClaim::default()))
            .build();
        assert!(prompt.contains("CLAIM INFORMATION:\nClaim ID: SIN-2024-001\n"));
    }

    #[test]
    fn test_parsed_claim_fields_replace_claim_id() {
        let claim = ParsedClaim {
            policy_number: Some("515360".to_string()),
            cause: Some("ROTURA DE TUBERIA".to_string()),
            ..ParsedClaim::default()
        };
        let prompt = PromptBuilder::new(get_template("completo"), "notas")
            .with_claim_id(Some("SIN-1".to_string()))
            .with_parsed_claim(Some(claim))
            .build();

        assert!(prompt.contains("CLAIM INFORMATION:\nPóliza: 515360\nCausa: ROTURA DE TUBERIA\n"));
        assert!(!prompt.contains("SIN-1"));
    }

    #[test]
    fn test_perito_lines_skip_blank_fields() {
        let perito = PeritoInfo {
            name: Some("Ana García".to_string()),
            license_number: Some("  ".to_string()),
            firm: Some("Gabinete Norte".to_string()),
        };
        let prompt = PromptBuilder::new(get_template("completo"), "notas")
            .with_perito(Some(perito))
            .build();
        assert!(prompt.contains("PERITO INFORMATION:\nNombre: Ana García\nEmpresa/Gabinete: Gabinete Norte\n"));
    }
}
