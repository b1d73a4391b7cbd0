#![forbid(unsafe_code)]

//! Trailing-edge debounce for viewport resize.
//!
//! A resize burst should recompute placement once, after the window settles.
//! [`ResizeDebouncer::signal`] records a resize at host time `now`; every new
//! signal invalidates the pending deadline and schedules a fresh one.
//! [`ResizeDebouncer::poll`] fires the recomputation once the deadline has
//! passed. With debouncing disabled every signal is immediate.
//!
//! Time is supplied by the host, so the debouncer is deterministic under test.

use web_time::Duration;

/// Outcome of a resize signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeSignal {
    /// Recompute now.
    Immediate,
    /// Recompute at the returned deadline unless invalidated first.
    Scheduled(Duration),
}

/// Latest-wins resize debouncer.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    enabled: bool,
    delay: Duration,
    deadline: Option<Duration>,
    fired: u64,
    invalidated: u64,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(enabled: bool, delay: Duration) -> Self {
        Self {
            enabled,
            delay,
            deadline: None,
            fired: 0,
            invalidated: 0,
        }
    }

    /// Record a resize at `now`.
    pub fn signal(&mut self, now: Duration) -> ResizeSignal {
        if !self.enabled {
            self.fired += 1;
            return ResizeSignal::Immediate;
        }
        if self.deadline.is_some() {
            self.invalidated += 1;
        }
        let deadline = now.saturating_add(self.delay);
        self.deadline = Some(deadline);
        ResizeSignal::Scheduled(deadline)
    }

    /// Fire the pending recomputation if its deadline has passed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.fired += 1;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending recomputation without firing it.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            self.invalidated += 1;
        }
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Recomputations fired so far.
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }

    /// Pending recomputations superseded or cancelled.
    #[must_use]
    pub const fn invalidated(&self) -> u64 {
        self.invalidated
    }
}
