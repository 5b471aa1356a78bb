use shelver_core::{Disposition, Error, MoveOutcome, OrganizerConfig, QuarantineKind, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a file ends up for a given disposition.
pub fn destination_for(
    source: &Path,
    disposition: &Disposition,
    output_root: &Path,
    config: &OrganizerConfig,
) -> Result<PathBuf> {
    let kind = match disposition {
        Disposition::Organize {
            artist,
            album,
            filename,
        } => return Ok(output_root.join(artist).join(album).join(filename)),
        Disposition::QuarantineInvalidType => QuarantineKind::Invalid,
        Disposition::QuarantineMissingMetadata | Disposition::QuarantineCorrupt { .. } => {
            QuarantineKind::Corrupt
        }
    };

    let filename = source.file_name().ok_or_else(|| Error::Move {
        from: source.to_path_buf(),
        to: output_root.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
    })?;

    Ok(output_root.join(config.quarantine_folder(kind)).join(filename))
}

/// Carry out a disposition.
///
/// Any existing file at the destination is removed before the move
/// (last-write-wins). A failure leaves the source where it was.
pub fn execute(
    source: &Path,
    disposition: &Disposition,
    output_root: &Path,
    config: &OrganizerConfig,
) -> Result<MoveOutcome> {
    let dest = destination_for(source, disposition, output_root, config)?;
    let move_error = |e: io::Error| Error::Move {
        from: source.to_path_buf(),
        to: dest.clone(),
        source: e,
    };

    if is_same_file(source, &dest) {
        debug!(path = %source.display(), "already at canonical path");
        return Ok(MoveOutcome::Unchanged);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(move_error)?;
    }

    if fs::symlink_metadata(&dest).is_ok() {
        fs::remove_file(&dest).map_err(move_error)?;
    }

    relocate(source, &dest).map_err(move_error)?;

    Ok(match disposition.quarantine_kind() {
        Some(kind) => MoveOutcome::Quarantined(kind, dest),
        None => MoveOutcome::Organized(dest),
    })
}

/// Only compare if destination exists to avoid canonicalization errors
fn is_same_file(source: &Path, dest: &Path) -> bool {
    if !dest.exists() {
        return false;
    }
    matches!(
        (source.canonicalize(), dest.canonicalize()),
        (Ok(src_canon), Ok(dst_canon)) if src_canon == dst_canon
    )
}

/// Rename, falling back to copy + remove across filesystems.
///
/// The source is removed only after the copy has fully landed.
fn relocate(source: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(from = %source.display(), to = %dest.display(), "cross-device move, copying");
            if let Err(copy_err) = fs::copy(source, dest) {
                let _ = fs::remove_file(dest);
                return Err(copy_err);
            }
            if let Err(remove_err) = fs::remove_file(source) {
                warn!(path = %source.display(), "copied but could not remove source");
                return Err(remove_err);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}
