use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::ItemKey;
use shelver_core::{Error, Result, TrackTags};
use std::path::Path;

/// Reads embedded tags from an audio file.
///
/// An `Err` means the container itself could not be read. A readable file
/// with no tags returns `TrackTags::default()`.
pub trait TagReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> Result<TrackTags>;
}

/// Tag reader backed by lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<TrackTags> {
        let read_error = |reason: String| Error::TagRead {
            path: path.to_path_buf(),
            reason,
        };

        let probe = Probe::open(path)
            .map_err(|e| read_error(e.to_string()))?
            .guess_file_type()
            .map_err(|e| read_error(e.to_string()))?;
        let tagged_file = probe.read().map_err(|e| read_error(e.to_string()))?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            return Ok(TrackTags::default());
        };

        // Prefer the raw item so "N/M" forms survive; fall back to the parsed number
        let track_number = tag
            .get_string(&ItemKey::TrackNumber)
            .map(str::to_string)
            .or_else(|| tag.track().map(|n| n.to_string()));

        Ok(TrackTags {
            title: non_empty(tag.title().map(|s| s.to_string())),
            artist: non_empty(tag.artist().map(|s| s.to_string())),
            album: non_empty(tag.album().map(|s| s.to_string())),
            track_number,
            has_lyrics: tag.get_string(&ItemKey::Lyrics).is_some(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lofty::config::WriteOptions;
    use lofty::tag::{Tag, TagType};
    use std::fs;
    use tempfile::TempDir;

    /// A few silent MPEG-1 Layer III frames (128 kbps, 44.1 kHz), no tags
    fn write_mpeg_frames(path: &Path) {
        let mut frame = vec![0u8; 417];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x64]);
        fs::write(path, frame.repeat(8)).unwrap();
    }

    #[test]
    fn test_lofty_reader_rejects_unknown_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.bin");
        fs::write(&path, b"definitely not an mpeg stream").unwrap();

        let result = LoftyTagReader.read_tags(&path);
        assert!(matches!(result, Err(Error::TagRead { .. })));
    }

    #[test]
    fn test_lofty_reader_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = LoftyTagReader.read_tags(&dir.path().join("gone.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn test_lofty_reader_reads_id3v2_tags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tagged.mp3");
        write_mpeg_frames(&path);

        let mut tag = Tag::new(TagType::Id3v2);
        tag.set_title("My Song".to_string());
        tag.set_artist("A/B".to_string());
        tag.set_album("Best Of".to_string());
        tag.set_track(3);
        tag.set_track_total(12);
        tag.insert_text(ItemKey::Lyrics, "la la la".to_string());
        tag.save_to_path(&path, WriteOptions::default()).unwrap();

        let tags = LoftyTagReader.read_tags(&path).unwrap();
        assert_eq!(tags.title.as_deref(), Some("My Song"));
        assert_eq!(tags.artist.as_deref(), Some("A/B"));
        assert_eq!(tags.album.as_deref(), Some("Best Of"));
        assert_eq!(tags.track_number.as_deref(), Some("3"));
        assert!(tags.has_lyrics);
    }

    #[test]
    fn test_lofty_reader_untagged_file_has_no_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bare.mp3");
        write_mpeg_frames(&path);

        let tags = LoftyTagReader.read_tags(&path).unwrap();
        assert_eq!(tags, TrackTags::default());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
