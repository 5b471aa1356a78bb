use crate::path::build_filename;
use crate::sanitize::normalize_component;
use crate::tags::TagReader;
use shelver_core::{AudioFile, Disposition, OrganizerConfig};
use std::path::Path;
use tracing::debug;

/// Decide what should happen to one file. Inspects only, never moves.
///
/// Order matters: the extension check runs before any metadata read, so an
/// unsupported file is never opened.
pub fn classify(path: &Path, config: &OrganizerConfig, reader: &dyn TagReader) -> Disposition {
    let mut file = AudioFile::new(path);

    let Some(ext) = file
        .extension
        .clone()
        .filter(|e| config.is_supported_extension(e))
    else {
        return Disposition::QuarantineInvalidType;
    };

    let tags = match reader.read_tags(path) {
        Ok(tags) => tags,
        Err(e) => {
            return Disposition::QuarantineCorrupt {
                reason: e.to_string(),
            };
        }
    };
    file.tags = Some(tags.clone());

    let (Some(title), Some(artist), Some(album)) = (
        tags.title.as_deref().map(normalize_component),
        tags.artist.as_deref().map(normalize_component),
        tags.album.as_deref().map(normalize_component),
    ) else {
        return Disposition::QuarantineMissingMetadata;
    };

    if ![&title, &artist, &album]
        .iter()
        .all(|c| is_usable_component(c))
    {
        return Disposition::QuarantineMissingMetadata;
    }

    debug!(
        path = %path.display(),
        lyrics = file.has_lyrics(),
        "classified for organizing"
    );

    Disposition::Organize {
        filename: build_filename(&title, tags.track_number.as_deref(), &ext),
        artist,
        album,
    }
}

/// A sanitized tag is only usable as a path component if something is left
/// of it and it cannot walk out of its parent.
fn is_usable_component(component: &str) -> bool {
    !component.is_empty() && component != "." && component != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeTagReader;
    use shelver_core::TrackTags;

    fn organize(artist: &str, album: &str, filename: &str) -> Disposition {
        Disposition::Organize {
            artist: artist.into(),
            album: album.into(),
            filename: filename.into(),
        }
    }

    #[test]
    fn test_classify_unsupported_extension_skips_read() {
        let reader = FakeTagReader::new();
        let config = OrganizerConfig::default();

        let result = classify(Path::new("/in/readme.txt"), &config, &reader);
        assert_eq!(result, Disposition::QuarantineInvalidType);

        let result = classify(Path::new("/in/noext"), &config, &reader);
        assert_eq!(result, Disposition::QuarantineInvalidType);

        assert_eq!(reader.reads(), 0, "Tag reader must not run for invalid types");
    }

    #[test]
    fn test_classify_read_failure_is_corrupt() {
        let reader = FakeTagReader::new().with_failure("bad.mp3");
        let result = classify(Path::new("/in/bad.mp3"), &OrganizerConfig::default(), &reader);
        assert!(matches!(result, Disposition::QuarantineCorrupt { .. }));
    }

    #[test]
    fn test_classify_missing_fields() {
        let config = OrganizerConfig::default();
        let reader = FakeTagReader::new()
            .with_tags(
                "no_album.mp3",
                TrackTags {
                    title: Some("t".into()),
                    artist: Some("a".into()),
                    ..Default::default()
                },
            )
            .with_tags("nothing.m4a", TrackTags::default());

        assert_eq!(
            classify(Path::new("/in/no_album.mp3"), &config, &reader),
            Disposition::QuarantineMissingMetadata
        );
        assert_eq!(
            classify(Path::new("/in/nothing.m4a"), &config, &reader),
            Disposition::QuarantineMissingMetadata
        );
    }

    #[test]
    fn test_classify_fields_empty_after_sanitizing() {
        let reader = FakeTagReader::new()
            .with_song("slashes.mp3", "Song", "///", "Album", None)
            .with_song("dots.mp3", "Song", "..", "Album", None);
        let config = OrganizerConfig::default();

        assert_eq!(
            classify(Path::new("/in/slashes.mp3"), &config, &reader),
            Disposition::QuarantineMissingMetadata
        );
        assert_eq!(
            classify(Path::new("/in/dots.mp3"), &config, &reader),
            Disposition::QuarantineMissingMetadata
        );
    }

    #[test]
    fn test_classify_organize_with_track() {
        let reader = FakeTagReader::new().with_song("x.mp3", "My Song", "A/B", "Best Of", Some("3/12"));
        let result = classify(Path::new("/in/x.mp3"), &OrganizerConfig::default(), &reader);
        assert_eq!(result, organize("Ab", "Best Of", "03 My Song.mp3"));
    }

    #[test]
    fn test_classify_organize_normalizes_case_and_extension() {
        let reader = FakeTagReader::new().with_song("LOUD.MP3", "LOUD SONG", "the band", "live: at home", None);
        let result = classify(Path::new("/in/LOUD.MP3"), &OrganizerConfig::default(), &reader);
        assert_eq!(result, organize("The Band", "Live At Home", "Loud Song.mp3"));
    }

    #[test]
    fn test_classify_non_numeric_track_is_not_an_error() {
        let reader = FakeTagReader::new().with_song("x.wma", "Song", "Artist", "Album", Some("B2"));
        let result = classify(Path::new("/in/x.wma"), &OrganizerConfig::default(), &reader);
        assert_eq!(result, organize("Artist", "Album", "Song.wma"));
    }

    #[test]
    fn test_classify_respects_configured_extensions() {
        let mut config = OrganizerConfig::default();
        config.supported_extensions.insert("flac".into());
        let reader = FakeTagReader::new().with_song("x.flac", "Song", "Artist", "Album", None);

        let result = classify(Path::new("/in/x.flac"), &config, &reader);
        assert_eq!(result, organize("Artist", "Album", "Song.flac"));
    }
}
