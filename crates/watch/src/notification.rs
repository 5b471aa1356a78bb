use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use shelver_core::{BatchReport, Error, Result, WatchedRoot};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

/// A change under a watched root. Any notification counts as activity;
/// the paths only matter for recognising our own moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub paths: Vec<PathBuf>,
    /// Something disappeared from at least the first path (delete, or a
    /// rename away)
    pub removal: bool,
}

impl Notification {
    pub fn activity(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            removal: false,
        }
    }

    pub fn removal(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            removal: true,
        }
    }

    /// Access events are dropped: reading tags opens files, and that must
    /// not count as activity.
    pub fn from_event(event: Event) -> Option<Self> {
        if matches!(event.kind, EventKind::Access(_)) {
            return None;
        }
        let removal = matches!(
            event.kind,
            EventKind::Remove(_)
                | EventKind::Modify(ModifyKind::Name(RenameMode::From | RenameMode::Both))
        );
        Some(Self {
            paths: event.paths,
            removal,
        })
    }

    /// True when every path is one `report`'s batch touched itself: a source
    /// it moved away or pruned (removals only), a destination it wrote or a
    /// directory it created for one, or anything under an output root nested
    /// inside the input.
    pub fn is_echo_of(&self, report: &BatchReport, root: &WatchedRoot) -> bool {
        let nested_output = root.output != root.input && root.output.starts_with(&root.input);
        !self.paths.is_empty()
            && self.paths.iter().all(|p| {
                (nested_output && p.starts_with(&root.output))
                    || (self.removal && report.vacated_contains(p))
                    || report.placed_covers(p, &root.output)
            })
    }
}

/// Watch `input` recursively, forwarding every event into `tx`.
///
/// Delivery stops when the returned watcher is dropped.
pub fn watch_root(input: &Path, tx: UnboundedSender<Notification>) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if let Some(notification) = Notification::from_event(event) {
                // Receiver gone means the scheduler has shut down
                let _ = tx.send(notification);
            }
        }
        Err(e) => warn!(error = %e, "watch error"),
    })
    .map_err(|e| Error::Watch(e.to_string()))?;

    watcher
        .watch(input, RecursiveMode::Recursive)
        .map_err(|e| Error::Watch(format!("{}: {}", input.display(), e)))?;

    Ok(watcher)
}
