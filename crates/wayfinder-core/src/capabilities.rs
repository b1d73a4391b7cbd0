#![forbid(unsafe_code)]

//! Platform capability state.
//!
//! Touch support cannot be probed reliably up front, so it is latched the
//! first time the host reports a touch. [`TouchCapability`] is a cheap,
//! cloneable handle to that single flag: the controller owns one and hands
//! clones to the components that need to read it (the standalone trigger
//! manager ignores hover while touch is active).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, latched touch-capability flag.
#[derive(Debug, Clone, Default)]
pub struct TouchCapability {
    detected: Arc<AtomicBool>,
}

impl TouchCapability {
    /// Create a handle with touch not yet detected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch. Returns `true` only for the first call.
    pub fn mark_touch(&self) -> bool {
        !self.detected.swap(true, Ordering::AcqRel)
    }

    /// Whether any touch input has been seen.
    #[inline]
    #[must_use]
    pub fn is_touch(&self) -> bool {
        self.detected.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latches_once() {
        let caps = TouchCapability::new();
        assert!(!caps.is_touch());
        assert!(caps.mark_touch());
        assert!(!caps.mark_touch());
        assert!(caps.is_touch());
    }

    #[test]
    fn clones_share_state() {
        let caps = TouchCapability::new();
        let reader = caps.clone();
        caps.mark_touch();
        assert!(reader.is_touch());
    }
}
