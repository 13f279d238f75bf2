//! Report templates
//!
//! Each template fixes the section structure the model is asked to follow.

/// Template used when an unknown id is requested
pub const DEFAULT_TEMPLATE_ID: &str = "completo";

/// A report structure offered to the adjuster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTemplate {
    /// Stable identifier (`completo`, `simplificado`)
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Section titles, in order
    pub sections: &'static [&'static str],
    /// Instructions embedded in the user prompt
    pub prompt_section: &'static str,
}

/// All available templates
pub static TEMPLATES: [ReportTemplate; 2] = [COMPLETO, SIMPLIFICADO];

const COMPLETO: ReportTemplate = ReportTemplate {
    id: "completo",
    name: "Informe Completo (5 secciones)",
    description: "Estructura completa con análisis detallado de causalidad, cobertura y tasación",
    sections: &[
        "IDENTIFICACIÓN",
        "ANTECEDENTES",
        "ANÁLISIS DE CAUSALIDAD",
        "ANÁLISIS DE COBERTURA",
        "TASACIÓN Y PROPUESTA",
    ],
    prompt_section: r#"Generate a comprehensive insurance adjuster report (Informe Pericial) with the following structure:

1. IDENTIFICACIÓN (Identification)
   - Policy details (póliza)
   - Claim ID (número de siniestro)
   - Insured party information (asegurado)
   - Date of incident (fecha del siniestro)
   - Date of inspection (fecha de inspección)

2. ANTECEDENTES (Background)
   - Summary of the incident based on field notes
   - Description of damages observed
   - Initial assessment from the adjuster's visit

3. ANÁLISIS DE CAUSALIDAD (Causality Analysis)
   - Technical "Nexo Causal" (causal link) analysis
   - Evaluation of whether the damages are related to covered causes
   - Assessment of cause-effect relationship
   - Technical justification based on findings

4. ANÁLISIS DE COBERTURA (Coverage Analysis)
   - Comparison between observed damages and relevant clauses from selected documents
   - Review of applicable coverage sections from policies and protocols
   - Assessment of exclusions and limitations
   - Determination of what is covered and what is not
   - Reference to specific clauses from selected documents

5. TASACIÓN Y PROPUESTA (Valuation and Proposal)
   - Economic estimation of damages (valoración económica)
   - Detailed breakdown of costs
   - Consideration of deductibles (franquicia) if applicable
   - Final verdict on claim eligibility (siniestro indemnizable or not)
   - Recommended settlement amount (importe propuesto)
   - Justification of the proposed amount"#,
};

const SIMPLIFICADO: ReportTemplate = ReportTemplate {
    id: "simplificado",
    name: "Informe Simplificado (3 secciones)",
    description: "Estructura concisa para casos simples: causa, daños y conclusión",
    sections: &["CAUSA DEL SINIESTRO", "DAÑOS", "CONCLUSIÓN"],
    prompt_section: r#"Generate a concise insurance adjuster report (Informe Pericial) with the following structure:

1. CAUSA DEL SINIESTRO (Cause of the Claim)
   - Visit details: location, date, insured party information
   - Description of what happened based on field notes
   - Technical findings and verification during inspection
   - Details of the incident and circumstances
   - Any relevant observations about the cause

2. DAÑOS (Damages)
   - Detailed description of all damages observed
   - Affected areas and items
   - Extent and severity of damage
   - Specific locations and materials affected
   - Any damages to third parties if applicable

3. CONCLUSIÓN (Conclusion)
   - Coverage assessment based on selected documents
   - Reference to relevant policy clauses or protocols
   - Final verdict: whether the claim has coverage (TIENE COBERTURA) or not (NO TIENE COBERTURA)
   - Brief justification of the conclusion
   - Reference to applicable coverage guarantees"#,
};

/// Look up a template by id, falling back to `completo`
pub fn get_template(id: &str) -> &'static ReportTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .unwrap_or(&TEMPLATES[0])
}

/// Ids of all available templates
pub fn template_ids() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_templates() {
        assert_eq!(get_template("completo").sections.len(), 5);
        assert_eq!(get_template("simplificado").sections, &["CAUSA DEL SINIESTRO", "DAÑOS", "CONCLUSIÓN"]);
        assert_eq!(template_ids(), vec!["completo", "simplificado"]);
    }

    #[test]
    fn test_unknown_template_falls_back() {
        assert_eq!(get_template("inexistente").id, DEFAULT_TEMPLATE_ID);
        assert_eq!(get_template("").id, DEFAULT_TEMPLATE_ID);
    }

    #[test]
    fn test_prompt_sections_list_every_section() {
        for template in &TEMPLATES {
            for section in template.sections {
                assert!(template.prompt_section.contains(section), "{} missing {}", template.id, section);
            }
        }
    }
}
