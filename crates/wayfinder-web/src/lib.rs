#![forbid(unsafe_code)]

//! `wayfinder-web` provides host-driven building blocks for Wayfinder.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes input and geometry.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. [`VirtualDom`] is a complete
//! in-memory [`DomHost`](wayfinder_core::DomHost) used by tests and headless
//! embeddings; browser bindings implement the same trait.

pub mod step_parser;
pub mod virtual_dom;

use core::time::Duration;

pub use step_parser::{StepParseError, parse_steps_json};
pub use virtual_dom::VirtualDom;

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt` and return the new value.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        self.now = self.now.saturating_add(dt);
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        assert_eq!(c.now(), Duration::from_millis(10));

        assert_eq!(
            c.advance(Duration::from_millis(5)),
            Duration::from_millis(15)
        );

        // Saturation: don't panic or wrap.
        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now(), Duration::MAX);
    }
}
