pub mod organize;
pub mod report;
pub mod watch;

use anyhow::{Context, Result};
use shelver_core::{OrganizerConfig, load_config};
use std::path::Path;

/// Defaults, then the config file, then command-line overrides
pub fn load_settings(path: Option<&Path>, quiet_interval: Option<u64>) -> Result<OrganizerConfig> {
    let config = match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => OrganizerConfig::default(),
    };

    match quiet_interval {
        Some(secs) => config
            .with_quiet_interval_secs(secs)
            .context("Invalid --quiet-interval"),
        None => Ok(config),
    }
}
