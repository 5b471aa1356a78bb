//! Test doubles shared by the module tests.

use crate::tags::TagReader;
use shelver_core::{Error, Result, TrackTags};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Tag reader that answers from fixtures keyed by file name.
/// Unknown files read as failures.
#[derive(Debug, Default)]
pub struct FakeTagReader {
    tags: HashMap<String, TrackTags>,
    failures: HashSet<String>,
    reads: AtomicUsize,
}

impl FakeTagReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, file_name: &str, tags: TrackTags) -> Self {
        self.tags.insert(file_name.to_string(), tags);
        self
    }

    pub fn with_song(
        self,
        file_name: &str,
        title: &str,
        artist: &str,
        album: &str,
        track: Option<&str>,
    ) -> Self {
        self.with_tags(
            file_name,
            TrackTags {
                title: Some(title.to_string()),
                artist: Some(artist.to_string()),
                album: Some(album.to_string()),
                track_number: track.map(str::to_string),
                has_lyrics: false,
            },
        )
    }

    pub fn with_failure(mut self, file_name: &str) -> Self {
        self.failures.insert(file_name.to_string());
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl TagReader for FakeTagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackTags> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.failures.contains(&name) {
            return Err(Error::TagRead {
                path: path.to_path_buf(),
                reason: "unrecognized container".to_string(),
            });
        }

        self.tags.get(&name).cloned().ok_or_else(|| Error::TagRead {
            path: path.to_path_buf(),
            reason: "no fixture".to_string(),
        })
    }
}
