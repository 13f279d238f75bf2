//! Report and templates command implementations.

use crate::cli::ReportArgs;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use perito_rag::ClaimDataParser;
use perito_report::{
    export_text_report, MarkerSectionSplitter, PeritoInfo, ReportMetadata, ReportRequest, TEMPLATES,
};
use perito_server::bootstrap::{PeritoEngine, PeritoGenerator};
use std::fs;

/// Execute the report command.
pub fn execute_report(
    args: ReportArgs,
    engine: &PeritoEngine,
    generator: &PeritoGenerator,
    formatter: &Formatter,
) -> Result<()> {
    let request = build_request(&args)?;
    let output = generator.generate(engine, &request)?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
        _ => println!("{}", output.report_text),
    }

    if args.export {
        let metadata = ReportMetadata::now(
            output.policy_number().map(str::to_string),
            output.claim_id.clone(),
        );
        let path = export_text_report(
            &engine.config().paths.reports_dir,
            &output.report_text,
            &MarkerSectionSplitter::default(),
            &metadata,
        )?;
        eprintln!(
            "{}",
            formatter.success(&format!("Report exported to {}", path.display()))
        );
    }

    Ok(())
}

/// Assemble a report request from command arguments
pub fn build_request(args: &ReportArgs) -> Result<ReportRequest> {
    let field_notes = fs::read_to_string(&args.notes)?;
    if field_notes.trim().is_empty() {
        return Err(CliError::InvalidInput(format!(
            "Field notes file is empty: {}",
            args.notes.display()
        )));
    }

    let parsed_claim = match &args.claim_file {
        Some(path) => Some(ClaimDataParser::new().parse(&fs::read_to_string(path)?)),
        None => None,
    };

    let perito = PeritoInfo {
        name: args.perito_name.clone(),
        license_number: args.perito_license.clone(),
        firm: args.perito_firm.clone(),
    };

    let mut request = ReportRequest::new(field_notes, args.documents.clone());
    request.template_id = args.template.clone();
    request.claim_id = args.claim_id.clone();
    request.query_context = args.query.clone();
    request.perito = (perito != PeritoInfo::default()).then_some(perito);
    request.parsed_claim = parsed_claim;
    Ok(request)
}

/// Execute the templates command.
pub fn execute_templates(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_templates(&TEMPLATES)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn args(notes: &Path) -> ReportArgs {
        ReportArgs {
            notes: notes.to_path_buf(),
            documents: vec!["POLIZA_HOGAR".to_string()],
            template: "simplificado".to_string(),
            claim_id: Some("S-2024-001".to_string()),
            query: None,
            claim_file: None,
            perito_name: None,
            perito_license: None,
            perito_firm: None,
            export: false,
        }
    }

    #[test]
    fn test_build_request_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notas.txt");
        let claim = dir.path().join("siniestro.txt");
        fs::write(&notes, "Mancha de humedad en techo del baño").unwrap();
        fs::write(&claim, "Póliza: 515360\nCausa: ROTURA DE TUBERIA").unwrap();

        let mut args = args(&notes);
        args.claim_file = Some(claim);
        args.perito_name = Some("Ana Pérez".to_string());

        let request = build_request(&args).unwrap();
        assert_eq!(request.template_id, "simplificado");
        assert_eq!(request.claim_id.as_deref(), Some("S-2024-001"));
        assert_eq!(request.perito.unwrap().name.as_deref(), Some("Ana Pérez"));
        assert_eq!(
            request.parsed_claim.unwrap().policy_number.as_deref(),
            Some("515360")
        );
    }

    #[test]
    fn test_no_perito_fields_means_none() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notas.txt");
        fs::write(&notes, "Visita realizada").unwrap();

        let request = build_request(&args(&notes)).unwrap();
        assert!(request.perito.is_none());
        assert!(request.parsed_claim.is_none());
    }

    #[test]
    fn test_empty_notes_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notas.txt");
        fs::write(&notes, "   \n").unwrap();

        assert!(matches!(
            build_request(&args(&notes)),
            Err(CliError::InvalidInput(_))
        ));
    }
}
