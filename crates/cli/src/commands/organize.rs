use super::report::printing_sink;
use anyhow::{Context, Result};
use shelver_core::{OrganizerConfig, WatchedRoot};
use shelver_organizer::LoftyTagReader;
use shelver_watch::WatchSupervisor;
use std::sync::Arc;
use tracing::info;

/// Organize every pair once and exit.
///
/// Exits with an error if any file could not be organized, so scripted runs
/// notice.
pub async fn run(config: OrganizerConfig, roots: Vec<WatchedRoot>) -> Result<()> {
    println!("🎵 Organizing {} folder pair(s)...", roots.len());

    let supervisor = WatchSupervisor::new(config, roots, Arc::new(LoftyTagReader), printing_sink())
        .context("Invalid configuration")?;

    let reports = supervisor.run_once().await;
    let errors: usize = reports.iter().map(|r| r.errors.len()).sum();
    info!(pairs = reports.len(), errors, "Single pass complete");

    if errors > 0 {
        anyhow::bail!("{} file(s) could not be organized", errors);
    }

    Ok(())
}
