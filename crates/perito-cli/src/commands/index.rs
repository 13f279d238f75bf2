//! Index command implementation.

use crate::cli::IndexArgs;
use crate::error::Result;
use crate::output::Formatter;
use perito_server::bootstrap::PeritoEngine;

/// Execute the index command.
pub fn execute_index(args: IndexArgs, engine: &mut PeritoEngine, formatter: &Formatter) -> Result<()> {
    let report = engine.index_documents(args.overwrite, !args.no_policies, !args.no_protocols)?;
    println!("{}", formatter.format_index_report(&report)?);
    Ok(())
}
