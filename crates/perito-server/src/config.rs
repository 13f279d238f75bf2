//! Configuration file resolution for the server and CLI.
//!
//! The file is taken from an explicit path, then `PERITO_CONFIG`, then
//! `perito.toml` in the working directory. Only the last one may be
//! missing, in which case defaults apply.

use perito_rag::{ConfigError, PeritoConfig, CONFIG_ENV_VAR};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "perito.toml";

/// Config path named explicitly or through `PERITO_CONFIG`
fn requested_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    })
}

/// Load configuration and apply environment overrides
pub fn load_config(explicit: Option<&Path>) -> Result<PeritoConfig, ConfigError> {
    let mut config = match requested_path(explicit) {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration");
            PeritoConfig::from_file(&path)?
        }
        None => PeritoConfig::load_or_default(DEFAULT_CONFIG_PATH)?,
    };
    config.apply_env_overrides();
    Ok(config)
}
