use crate::notification::{Notification, watch_root};
use crate::scheduler::{DebounceScheduler, ReportSink, run_blocking};
use notify::RecommendedWatcher;
use shelver_core::{BatchReport, Error, OrganizerConfig, Result, WatchedRoot};
use shelver_organizer::{BatchProcessor, TagReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Owns every (input, output) pair and the scheduler that watches it.
pub struct WatchSupervisor {
    config: Arc<OrganizerConfig>,
    roots: Vec<WatchedRoot>,
    reader: Arc<dyn TagReader>,
    sink: ReportSink,
}

impl std::fmt::Debug for WatchSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSupervisor")
            .field("config", &self.config)
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl WatchSupervisor {
    /// Validate every root up front. No pair is silently skipped: one bad
    /// directory rejects the whole set.
    pub fn new(
        config: OrganizerConfig,
        roots: Vec<WatchedRoot>,
        reader: Arc<dyn TagReader>,
        sink: ReportSink,
    ) -> Result<Self> {
        let roots = validate_roots(roots)?;
        Ok(Self {
            config: Arc::new(config),
            roots,
            reader,
            sink,
        })
    }

    pub fn roots(&self) -> &[WatchedRoot] {
        &self.roots
    }

    fn processor(&self, root: &WatchedRoot) -> Arc<BatchProcessor> {
        Arc::new(BatchProcessor::new(
            root.clone(),
            Arc::clone(&self.config),
            Arc::clone(&self.reader),
        ))
    }

    /// One pass over every root, no watching
    pub async fn run_once(&self) -> Vec<BatchReport> {
        let mut reports = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let report = run_blocking(self.processor(root)).await;
            (self.sink)(root, &report);
            reports.push(report);
        }
        reports
    }

    /// Initial pass per root, then debounced watching until `shutdown`.
    ///
    /// The watcher is started before the initial pass so nothing written
    /// during it is missed; the pass's own moves are then recognised as
    /// echoes. On shutdown all watchers are dropped first, then every
    /// scheduler is awaited so in-flight batches complete.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let mut watchers: Vec<RecommendedWatcher> = Vec::with_capacity(self.roots.len());
        let mut tasks: Vec<JoinHandle<usize>> = Vec::with_capacity(self.roots.len());
        let stop = shutdown.child_token();

        for root in &self.roots {
            if stop.is_cancelled() {
                break;
            }

            let (tx, rx) = mpsc::unbounded_channel();
            let watcher = match watch_root(&root.input, tx) {
                Ok(w) => w,
                Err(e) => {
                    stop.cancel();
                    join_all(tasks).await;
                    return Err(e);
                }
            };
            watchers.push(watcher);

            let processor = self.processor(root);
            let report = run_blocking(Arc::clone(&processor)).await;
            (self.sink)(root, &report);

            tasks.push(self.spawn_scheduler(root, processor, report, rx, &stop));
            info!(input = %root.input.display(), output = %root.output.display(), "monitoring");
        }

        stop.cancelled().await;
        info!("shutting down watchers");
        drop(watchers);
        join_all(tasks).await;
        Ok(())
    }

    fn spawn_scheduler(
        &self,
        root: &WatchedRoot,
        processor: Arc<BatchProcessor>,
        initial: BatchReport,
        notifications: UnboundedReceiver<Notification>,
        shutdown: &CancellationToken,
    ) -> JoinHandle<usize> {
        let scheduler = DebounceScheduler::new(
            root.clone(),
            processor,
            self.config.quiet_interval,
            Arc::clone(&self.sink),
        )
        .with_previous_report(initial);
        tokio::spawn(scheduler.run(notifications, shutdown.clone()))
    }
}

async fn join_all(tasks: Vec<JoinHandle<usize>>) {
    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "scheduler task ended abnormally");
        }
    }
}

/// Every input and output must be an existing directory.
/// Paths are canonicalized so watcher events and walk paths agree.
fn validate_roots(roots: Vec<WatchedRoot>) -> Result<Vec<WatchedRoot>> {
    if roots.is_empty() {
        return Err(Error::Config(
            "At least one input/output pair is required".to_string(),
        ));
    }

    roots
        .into_iter()
        .map(|root| {
            Ok(WatchedRoot {
                input: existing_dir(&root.input, "input")?,
                output: existing_dir(&root.output, "output")?,
            })
        })
        .collect()
}

fn existing_dir(path: &Path, role: &str) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(Error::Config(format!(
            "Invalid {} directory: {}",
            role,
            path.display()
        )));
    }
    Ok(path.canonicalize()?)
}
