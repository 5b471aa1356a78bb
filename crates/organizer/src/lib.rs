// Classify-and-relocate pipeline: sanitize tags, resolve the canonical path,
// move or quarantine, prune what was left empty.

pub mod batch;
pub mod classify;
pub mod mover;
pub mod path;
pub mod prune;
pub mod sanitize;
pub mod tags;

#[cfg(test)]
mod testing;

pub use batch::BatchProcessor;
pub use classify::classify;
pub use path::{resolve_destination, track_prefix};
pub use prune::prune_empty_dirs;
pub use sanitize::{sanitize, title_case};
pub use tags::{LoftyTagReader, TagReader};
