use shelver_core::OrganizerConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Remove `start` and its now-empty ancestors.
///
/// Stops at `stop_at`, at any directory whose basename is protected, outside
/// `stop_at`, or at the first directory that cannot be removed. Best-effort:
/// failures just end the walk. Returns the directories actually removed.
pub fn prune_empty_dirs(start: &Path, stop_at: &Path, config: &OrganizerConfig) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    let mut current = start.to_path_buf();

    loop {
        if current == stop_at || !current.starts_with(stop_at) {
            break;
        }

        let protected = current
            .file_name()
            .map(|name| config.is_protected(&name.to_string_lossy()))
            .unwrap_or(true);
        if protected {
            break;
        }

        // remove_dir refuses non-empty directories, which is the stop signal
        if fs::remove_dir(&current).is_err() {
            break;
        }
        removed.push(current.clone());

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    removed
}
