use crate::debounce::Debouncer;
use crate::notification::Notification;
use shelver_core::{BatchReport, WatchedRoot};
use shelver_organizer::BatchProcessor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// How often the scheduler checks whether the quiet interval has passed
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Anything that can reprocess a root synchronously
pub trait BatchRunner: Send + Sync + 'static {
    fn run_batch(&self) -> BatchReport;
}

impl BatchRunner for BatchProcessor {
    fn run_batch(&self) -> BatchReport {
        self.run()
    }
}

/// Receives every finished batch report, for printing or assertions
pub type ReportSink = Arc<dyn Fn(&WatchedRoot, &BatchReport) + Send + Sync>;

/// Run a batch on the blocking pool and wait for it.
///
/// A panicking batch is logged and turned into an error report so it cannot
/// take the watch loop down with it.
pub async fn run_blocking<B: BatchRunner>(runner: Arc<B>) -> BatchReport {
    match tokio::task::spawn_blocking(move || runner.run_batch()).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "batch task failed");
            let mut report = BatchReport::default();
            report.push_error(format!("ERROR: batch aborted: {}", e));
            report
        }
    }
}

/// Coalesces notifications for one root into debounced batch runs.
///
/// Batches for the same root never overlap: the loop awaits each one before
/// looking at the channel again, and anything that arrived meanwhile is
/// still queued there.
pub struct DebounceScheduler<B: BatchRunner> {
    root: WatchedRoot,
    runner: Arc<B>,
    debouncer: Debouncer,
    tick: Duration,
    sink: ReportSink,
    last_report: BatchReport,
}

impl<B: BatchRunner> DebounceScheduler<B> {
    pub fn new(root: WatchedRoot, runner: Arc<B>, quiet_interval: Duration, sink: ReportSink) -> Self {
        Self {
            root,
            runner,
            debouncer: Debouncer::new(quiet_interval),
            tick: DEFAULT_TICK,
            sink,
            last_report: BatchReport::default(),
        }
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Seed echo suppression with a batch that ran before the loop started
    pub fn with_previous_report(mut self, report: BatchReport) -> Self {
        self.last_report = report;
        self
    }

    /// Drive the loop until `shutdown` fires. Returns the number of batches run.
    ///
    /// Cancellation is only observed between batches, so a running batch
    /// always finishes.
    pub async fn run(
        mut self,
        mut notifications: UnboundedReceiver<Notification>,
        shutdown: CancellationToken,
    ) -> usize {
        let mut ticker = tokio::time::interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut source_open = true;
        let mut batches = 0;

        info!(input = %self.root.input.display(), "watching");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                received = notifications.recv(), if source_open => match received {
                    Some(notification) => self.observe(notification, Instant::now()),
                    None => {
                        debug!(input = %self.root.input.display(), "notification source closed");
                        source_open = false;
                    }
                },

                _ = ticker.tick() => {
                    if self.debouncer.is_due(Instant::now()) {
                        self.run_batch().await;
                        batches += 1;
                        // Whatever queued up during the batch schedules the next one
                        while let Ok(notification) = notifications.try_recv() {
                            self.observe(notification, Instant::now());
                        }
                    }
                }
            }
        }

        info!(input = %self.root.input.display(), batches, "stopped watching");
        batches
    }

    fn observe(&mut self, notification: Notification, now: Instant) {
        if notification.is_echo_of(&self.last_report, &self.root) {
            debug!(paths = ?notification.paths, "ignoring own move");
            return;
        }
        self.debouncer.record(now);
    }

    async fn run_batch(&mut self) {
        info!(
            input = %self.root.input.display(),
            quiet_secs = self.debouncer.quiet_interval().as_secs(),
            "changes settled, processing"
        );
        let report = run_blocking(Arc::clone(&self.runner)).await;
        self.debouncer.clear();
        (self.sink)(&self.root, &report);
        self.last_report = report;
    }
}
