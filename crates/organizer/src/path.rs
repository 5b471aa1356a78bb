use std::path::PathBuf;

/// Zero-padded track prefix (`"03 "`) from a raw track number.
///
/// Accepts `N` or `N/M`. Anything that is not plain digits before the slash
/// yields no prefix; that is a valid state, not an error.
pub fn track_prefix(track: Option<&str>) -> Option<String> {
    let raw = track?.split('/').next()?.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u32 = raw.parse().ok()?;
    Some(format!("{:02} ", number))
}

/// `[NN ]Title.ext`
pub fn build_filename(title: &str, track: Option<&str>, ext: &str) -> String {
    let prefix = track_prefix(track).unwrap_or_default();
    format!("{}{}.{}", prefix, title, ext)
}

/// Canonical path of a track relative to the output root.
///
/// Never touches the filesystem. Components must already be sanitized.
pub fn resolve_destination(
    artist: &str,
    album: &str,
    title: &str,
    track: Option<&str>,
    ext: &str,
) -> PathBuf {
    PathBuf::from(artist)
        .join(album)
        .join(build_filename(title, track, ext))
}
