//! Search and context command implementations.

use crate::cli::{ContextArgs, SearchArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::config::OutputFormat;
use perito_server::bootstrap::PeritoEngine;

/// Execute the search command.
pub fn execute_search(args: SearchArgs, engine: &PeritoEngine, formatter: &Formatter) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::InvalidInput("Query must not be empty".to_string()));
    }

    let k = args.k.unwrap_or(engine.config().retrieval.default_k);
    if k == 0 {
        return Err(CliError::InvalidInput("k must be at least 1".to_string()));
    }

    let results = match &args.policy {
        Some(policy_id) => engine.search_by_policy_id(query, policy_id, k)?,
        None => engine.search_by_document_ids(query, &args.documents, k)?,
    };
    println!("{}", formatter.format_results(&results)?);
    Ok(())
}

/// Execute the context command.
pub fn execute_context(args: ContextArgs, engine: &PeritoEngine, formatter: &Formatter) -> Result<()> {
    if !args.documents.is_empty() && args.query.trim().is_empty() {
        return Err(CliError::InvalidInput("Query must not be empty".to_string()));
    }
    let max_chunks = args
        .max_chunks
        .unwrap_or(engine.config().retrieval.max_chunks_per_doc);
    let context = engine.get_documents_context(&args.documents, &args.query, max_chunks)?;

    match formatter.format() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "context": context }))?);
        }
        _ => println!("{}", context),
    }
    Ok(())
}
