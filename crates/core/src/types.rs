use std::path::{Path, PathBuf};

/// Tags as returned by a tag reader. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Raw track number, possibly in `N/M` form
    pub track_number: Option<String>,
    pub has_lyrics: bool,
}

/// One audio file as seen during a single classification.
///
/// Never cached across passes; rebuilt from disk every time.
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: PathBuf,
    pub extension: Option<String>,
    pub tags: Option<TrackTags>,
}

impl AudioFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        Self {
            path,
            extension,
            tags: None,
        }
    }

    /// Get the filename component, lossily converted
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn has_lyrics(&self) -> bool {
        self.tags.as_ref().is_some_and(|t| t.has_lyrics)
    }
}

/// Holding folders for files that cannot be organized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuarantineKind {
    Invalid,
    Corrupt,
}

/// What should happen to a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Organize {
        artist: String,
        album: String,
        filename: String,
    },
    QuarantineInvalidType,
    QuarantineMissingMetadata,
    QuarantineCorrupt {
        reason: String,
    },
}

impl Disposition {
    /// Quarantine folder this disposition routes to, if any.
    ///
    /// Missing tags share the corrupt folder with unreadable files.
    pub fn quarantine_kind(&self) -> Option<QuarantineKind> {
        match self {
            Disposition::Organize { .. } => None,
            Disposition::QuarantineInvalidType => Some(QuarantineKind::Invalid),
            Disposition::QuarantineMissingMetadata | Disposition::QuarantineCorrupt { .. } => {
                Some(QuarantineKind::Corrupt)
            }
        }
    }
}

/// Result of executing a disposition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Organized(PathBuf),
    Quarantined(QuarantineKind, PathBuf),
    /// Source already sits at its canonical path
    Unchanged,
}

/// An (input, output) directory pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedRoot {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl WatchedRoot {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// Everything one batch run has to say about itself
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub errors: Vec<String>,
    pub organized: usize,
    pub quarantined: usize,
    pub unchanged: usize,
    /// Paths the run moved away from or pruned, so their removal events
    /// can be recognised as our own.
    pub vacated: Vec<PathBuf>,
    /// Destinations the run moved files into
    pub placed: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn vacated_contains(&self, path: &Path) -> bool {
        self.vacated.iter().any(|p| p == path)
    }

    /// True when `path` is a destination this run wrote, or a directory
    /// strictly inside `output` that leads to one.
    pub fn placed_covers(&self, path: &Path, output: &Path) -> bool {
        self.placed.iter().any(|dest| {
            dest == path || (path != output && path.starts_with(output) && dest.starts_with(path))
        })
    }

    /// Total files touched or inspected
    pub fn files_seen(&self) -> usize {
        self.organized + self.quarantined + self.unchanged
    }
}
