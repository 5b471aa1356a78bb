pub mod config;
pub mod error;
pub mod types;

pub use config::{OrganizerConfig, load_config};
pub use error::{Error, Result};
pub use types::*;
