#![forbid(unsafe_code)]

//! Scroll targets for revealing a step.

use serde::{Deserialize, Serialize};
use wayfinder_core::{AnchorRule, Point, Rect};

/// When the controller asks the host to scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollPolicy {
    /// Never scroll.
    Disabled,
    /// Only when the first step is shown.
    FirstStepOnly,
    /// Whenever a new step is shown.
    #[default]
    EveryStep,
}

impl ScrollPolicy {
    /// Whether step `index` should scroll under this policy.
    #[must_use]
    pub const fn applies_to(self, index: usize) -> bool {
        match self {
            Self::Disabled => false,
            Self::FirstStepOnly => index == 0,
            Self::EveryStep => true,
        }
    }
}

/// Vertical scroll offset that brings the step into view.
///
/// Top rules scroll to the popup (it sits above the target); every other rule
/// scrolls to the target itself. `offset` keeps a little breathing room above.
#[must_use]
pub fn scroll_target(rule: AnchorRule, target: Rect, popup: Point, offset: f64) -> f64 {
    let anchor = if rule.is_top() { popup.y } else { target.y };
    (anchor - offset).floor().max(0.0)
}

/// Whether scrolling to `target_y` would move the page at all.
#[must_use]
pub fn needs_scroll(current: Point, target_y: f64) -> bool {
    (current.y - target_y).abs() >= 1.0
}
