use super::report::printing_sink;
use anyhow::{Context, Result};
use shelver_core::{OrganizerConfig, WatchedRoot};
use shelver_organizer::LoftyTagReader;
use shelver_watch::WatchSupervisor;
use std::future::Future;
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Organize existing files, then keep watching until Ctrl+C.
///
/// Per-file errors never stop the watcher; they show up in each run's
/// summary. A running pass is allowed to finish before exit.
pub async fn run(config: OrganizerConfig, roots: Vec<WatchedRoot>) -> Result<()> {
    println!("👀 Starting watcher...");
    let quiet_interval = config.quiet_interval;

    let supervisor = WatchSupervisor::new(config, roots, Arc::new(LoftyTagReader), printing_sink())
        .context("Invalid configuration")?;

    for root in supervisor.roots() {
        println!("   Input:  {}", root.input.display());
        println!("   Output: {}", root.output.display());
    }
    println!("   Quiet interval: {}s", quiet_interval.as_secs());
    println!("   Press Ctrl+C to stop\n");

    let shutdown = CancellationToken::new();
    let mut watcher = tokio::spawn(supervisor.run(shutdown.clone()));

    let ended_early = tokio::select! {
        // Only ends on its own when a watcher could not be started
        finished = &mut watcher => Some(finished),
        signal = stop_on_signal(tokio::signal::ctrl_c(), shutdown.clone()) => {
            signal?;
            None
        }
    };
    let finished = match ended_early {
        Some(finished) => finished,
        None => watcher.await,
    };
    finished
        .context("Watcher task failed")?
        .context("Watcher failed")?;

    println!("✓ Stopped cleanly");
    Ok(())
}

/// Cancel `shutdown` once `signal` fires. A signal that cannot be listened
/// for is an error and leaves the token alone.
async fn stop_on_signal<F>(signal: F, shutdown: CancellationToken) -> Result<()>
where
    F: Future<Output = io::Result<()>>,
{
    signal.await.context("Failed to listen for Ctrl+C")?;
    println!("\n🛑 Stopping, letting any running pass finish...");
    shutdown.cancel();
    Ok(())
}
