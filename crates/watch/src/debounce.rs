use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    /// Nothing has changed since the last batch
    Idle,
    /// Activity seen, waiting for the quiet interval to pass
    PendingQuietCheck { last_activity: Instant },
}

/// Two-state debounce machine. The clock is always passed in, so it can be
/// driven by a paused tokio clock or by plain arithmetic in tests.
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: DebounceState,
    quiet_interval: Duration,
}

impl Debouncer {
    pub fn new(quiet_interval: Duration) -> Self {
        Self {
            state: DebounceState::Idle,
            quiet_interval,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet_interval
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::PendingQuietCheck { .. })
    }

    /// Any activity restarts the quiet interval
    pub fn record(&mut self, now: Instant) {
        self.state = DebounceState::PendingQuietCheck { last_activity: now };
    }

    pub fn is_due(&self, now: Instant) -> bool {
        match self.state {
            DebounceState::Idle => false,
            DebounceState::PendingQuietCheck { last_activity } => {
                now.saturating_duration_since(last_activity) >= self.quiet_interval
            }
        }
    }

    pub fn clear(&mut self) {
        self.state = DebounceState::Idle;
    }
}
