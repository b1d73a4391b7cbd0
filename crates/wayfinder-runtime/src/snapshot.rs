#![forbid(unsafe_code)]

//! What the render layer receives.

use serde::Serialize;
use wayfinder_core::{AnchorRule, Progress, Rect, Step, StepRegistry};
use wayfinder_layout::PlacementMode;

use crate::config::{ButtonFlags, DisplayMode, TourConfig};

/// Popup button labels. `None` hides the button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buttons {
    pub primary: String,
    pub secondary: Option<String>,
    pub skip: Option<String>,
}

impl Buttons {
    /// Buttons for main-sequence step `index`.
    #[must_use]
    pub fn for_step(config: &TourConfig, registry: &StepRegistry, index: usize) -> Self {
        let locale = &config.locale;
        let flags = config.buttons;
        let primary = match config.mode {
            DisplayMode::Single => locale.close.clone(),
            DisplayMode::Continuous | DisplayMode::Guided => {
                let label = if registry.is_last(index) {
                    &locale.last
                } else {
                    &locale.next
                };
                if config.mode == DisplayMode::Continuous && flags.contains(ButtonFlags::PROGRESS)
                {
                    format!("{label} ({}/{})", index + 1, registry.len())
                } else {
                    label.clone()
                }
            }
        };
        let secondary = (flags.contains(ButtonFlags::BACK)
            && index > 0
            && config.mode == DisplayMode::Continuous)
            .then(|| locale.back.clone());
        let skip = flags
            .contains(ButtonFlags::SKIP)
            .then(|| locale.skip.clone());
        Self {
            primary,
            secondary,
            skip,
        }
    }

    /// Standalone popups only close.
    #[must_use]
    pub fn standalone(config: &TourConfig) -> Self {
        Self {
            primary: config.locale.close.clone(),
            secondary: None,
            skip: None,
        }
    }
}

/// Everything needed to draw the current marker or popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub mode: PlacementMode,
    /// Main-sequence index; `None` for a standalone popup.
    pub index: Option<usize>,
    pub step: Step,
    pub x: f64,
    pub y: f64,
    /// Measured target; `None` until the first placement.
    pub target: Option<Rect>,
    /// Anchor rule after auto-flip.
    pub anchor: AnchorRule,
    pub buttons: Buttons,
    /// Entry animation allowed (false on the first frame after a transition).
    pub animate: bool,
    pub overlay: bool,
    /// Spotlight cut-out around the target.
    pub hole: Option<Rect>,
    pub allow_clicks_thru_hole: bool,
    pub progress: Option<Progress>,
}

/// Result of a render consult.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub snapshot: Option<RenderSnapshot>,
    /// Vertical scroll offset the host should move to.
    pub scroll_to: Option<f64>,
}
