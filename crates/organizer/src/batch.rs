use crate::classify::classify;
use crate::mover;
use crate::prune::prune_empty_dirs;
use crate::tags::TagReader;
use shelver_core::{
    BatchReport, Disposition, Error, MoveOutcome, OrganizerConfig, QuarantineKind, WatchedRoot,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Runs classify, move and prune over every file under one input root.
///
/// Cheap to clone; all state lives on disk.
#[derive(Clone)]
pub struct BatchProcessor {
    root: WatchedRoot,
    config: Arc<OrganizerConfig>,
    reader: Arc<dyn TagReader>,
}

impl std::fmt::Debug for BatchProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchProcessor")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl BatchProcessor {
    pub fn new(root: WatchedRoot, config: Arc<OrganizerConfig>, reader: Arc<dyn TagReader>) -> Self {
        Self {
            root,
            config,
            reader,
        }
    }

    pub fn root(&self) -> &WatchedRoot {
        &self.root
    }

    /// Process every regular file under the input root once.
    ///
    /// Never aborts: each per-file failure becomes a report entry and the
    /// walk moves on.
    pub fn run(&self) -> BatchReport {
        let mut report = BatchReport::default();
        info!(input = %self.root.input.display(), "processing");

        // Collect first so moves and pruning don't disturb the walk
        for path in self.scan(&mut report) {
            self.process_file(&path, &mut report);
        }

        info!(
            input = %self.root.input.display(),
            organized = report.organized,
            quarantined = report.quarantined,
            unchanged = report.unchanged,
            errors = report.errors.len(),
            "batch finished"
        );
        report
    }

    fn scan(&self, report: &mut BatchReport) -> Vec<PathBuf> {
        let skip = self.skipped_dirs();
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root.input)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !skip.iter().any(|dir| dir == entry.path()));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| self.root.input.display().to_string());
                    let error = Error::Walk(format!("{}: {}", path, e));
                    warn!(error = %error, "skipping entry");
                    report.push_error(format!("ERROR walking {}", error));
                }
            }
        }

        files
    }

    /// Directories under the input root that hold our own output, as seen
    /// from inside the walk. A nested output root is skipped whole; when
    /// output and input are the same, only the quarantine folders are.
    fn skipped_dirs(&self) -> Vec<PathBuf> {
        let (Ok(input), Ok(output)) = (self.root.input.canonicalize(), self.root.output.canonicalize())
        else {
            return Vec::new();
        };
        let Ok(relative) = output.strip_prefix(&input) else {
            return Vec::new();
        };

        if relative.as_os_str().is_empty() {
            [QuarantineKind::Invalid, QuarantineKind::Corrupt]
                .into_iter()
                .map(|kind| self.root.input.join(self.config.quarantine_folder(kind)))
                .collect()
        } else {
            vec![self.root.input.join(relative)]
        }
    }

    fn process_file(&self, path: &Path, report: &mut BatchReport) {
        let disposition = classify(path, &self.config, self.reader.as_ref());
        debug!(path = %path.display(), ?disposition, "classified");

        match &disposition {
            Disposition::QuarantineMissingMetadata => report.push_error(format!(
                "ERROR: Missing metadata (title, artist or album) for: {}",
                path.display()
            )),
            Disposition::QuarantineCorrupt { reason } => report.push_error(format!(
                "ERROR: Could not read metadata: {} ({})",
                path.display(),
                reason
            )),
            _ => {}
        }

        match mover::execute(path, &disposition, &self.root.output, &self.config) {
            Ok(MoveOutcome::Organized(dest)) => {
                info!(from = %path.display(), to = %dest.display(), "organized");
                report.organized += 1;
                report.vacated.push(path.to_path_buf());
                report.placed.push(dest);
                if let Some(parent) = path.parent() {
                    let pruned = prune_empty_dirs(parent, &self.root.input, &self.config);
                    for dir in &pruned {
                        debug!(dir = %dir.display(), "removed empty directory");
                    }
                    report.vacated.extend(pruned);
                }
            }
            Ok(MoveOutcome::Quarantined(kind, dest)) => {
                info!(from = %path.display(), to = %dest.display(), ?kind, "quarantined");
                report.quarantined += 1;
                report.vacated.push(path.to_path_buf());
                report.placed.push(dest);
            }
            Ok(MoveOutcome::Unchanged) => {
                report.unchanged += 1;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "move failed");
                report.push_error(format!("ERROR moving {}: {}", path.display(), e));
            }
        }
    }
}
