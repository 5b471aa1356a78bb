// Debounced watching: one scheduler per (input, output) pair, each turning
// bursts of filesystem notifications into a single batch run.

pub mod debounce;
pub mod notification;
pub mod scheduler;
pub mod supervisor;

pub use debounce::{DebounceState, Debouncer};
pub use notification::{Notification, watch_root};
pub use scheduler::{BatchRunner, DebounceScheduler, ReportSink, run_blocking};
pub use supervisor::WatchSupervisor;
