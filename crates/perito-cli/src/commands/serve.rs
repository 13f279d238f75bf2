//! Serve command implementation.

use crate::error::Result;
use perito_rag::PeritoConfig;

/// Execute the serve command.
///
/// Owns the async runtime; every other command runs without one.
pub fn execute_serve(config: PeritoConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(perito_server::start_server(config))?;
    Ok(())
}
