// src/scheduler.rs
use std::time::{Duration, Instant};

use tracing::debug;

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Decides when the next automatic reload is due.
///
/// Holds no timer of its own: callers feed it the current time, the GUI from
/// a periodic subscription and tests from a fake clock. Runs only while it is
/// enabled and a document id is present.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    interval: Duration,
    enabled: bool,
    has_source: bool,
    next_due: Option<Instant>,
}

impl RefreshScheduler {
    pub fn new(interval: Duration) -> Self {
        RefreshScheduler {
            interval,
            enabled: false,
            has_source: false,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.enabled = enabled;
        self.rearm(now);
    }

    /// The source changed: drop the pending tick and start over from `now`.
    pub fn source_changed(&mut self, has_source: bool, now: Instant) {
        self.has_source = has_source;
        self.rearm(now);
    }

    /// True when a reload is due at `now`. Intervals missed entirely are
    /// skipped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_due = Some(next);
        true
    }

    fn rearm(&mut self, now: Instant) {
        self.next_due = if self.enabled && self.has_source {
            Some(now + self.interval)
        } else {
            None
        };
        debug!(
            enabled = self.enabled,
            has_source = self.has_source,
            active = self.is_active(),
            "refresh schedule changed"
        );
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        RefreshScheduler::new(REFRESH_INTERVAL)
    }
}
