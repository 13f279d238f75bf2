//! Structured claim data pasted by the adjuster

/// Fields extracted from raw claim text
///
/// Every field is optional: a label that is not found stays `None` and is
/// never guessed. `search_query` is derived once at parse time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParsedClaim {
    /// Policy number (digits)
    pub policy_number: Option<String>,

    /// DNI/NIF, upper-cased
    pub dni: Option<String>,

    /// Insured party name
    pub insured_name: Option<String>,

    /// Risk address (domicilio)
    pub address: Option<String>,

    /// Cadastral reference
    pub cadastral_reference: Option<String>,

    /// Claim description (descripción del siniestro)
    pub claim_description: Option<String>,

    /// Service reason (motivo de alta)
    pub service_reason: Option<String>,

    /// Cause (causa)
    pub cause: Option<String>,

    /// Query used to seed retrieval when the caller gives none
    pub search_query: String,

    /// Input text, verbatim
    pub raw_text: String,
}

impl ParsedClaim {
    /// Whether any labelled field was found
    pub fn has_fields(&self) -> bool {
        self.policy_number.is_some()
            || self.dni.is_some()
            || self.insured_name.is_some()
            || self.address.is_some()
            || self.cadastral_reference.is_some()
            || self.claim_description.is_some()
            || self.service_reason.is_some()
            || self.cause.is_some()
    }
}
