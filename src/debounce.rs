// ⏱️ Query Debouncer - One pending recomputation per input field
//
// Text inputs reschedule a deferred query evaluation on every keystroke;
// only the evaluation for the last keystroke in a burst runs. There is
// nothing asynchronous to cancel - evaluation itself is synchronous - the
// only thing ever cancelled is the scheduling of the next run. Callers
// supply the clock, so behavior is deterministic under test.

use std::time::{Duration, Instant};

/// Quiet period between the last keystroke and the query re-run
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(150);

// ============================================================================
// QUERY DEBOUNCER
// ============================================================================

/// Single-deadline scheduler: at most one evaluation is ever in flight
/// per input field.
#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl QueryDebouncer {
    pub fn new(quiet: Duration) -> Self {
        QueryDebouncer { quiet, deadline: None }
    }

    /// Record a keystroke: replaces any pending deadline with a fresh one
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// True exactly once when the quiet period has elapsed; the pending
    /// deadline is consumed so the evaluation runs a single time.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending evaluation without running it
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

// ============================================================================
// TESTS
// ============================================================================
