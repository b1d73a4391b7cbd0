#![forbid(unsafe_code)]

//! Tour state and phases.
//!
//! [`TourState`] is plain data owned by the controller. Transitions build a
//! candidate state, hand `(previous, candidate)` to the lifecycle planner and
//! only then commit, so the state never changes without its events.

use serde::Serialize;
use wayfinder_core::{Point, Step, StepRegistry};
use wayfinder_layout::OFFSCREEN;

/// Cause of the last transition, carried on every lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Action {
    #[default]
    #[serde(rename = "init")]
    Init,
    #[serde(rename = "start")]
    Start,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "next")]
    Next,
    #[serde(rename = "back")]
    Back,
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "esc")]
    Esc,
    #[serde(rename = "skip")]
    Skip,
    #[serde(rename = "jump")]
    Jump,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "beacon:click")]
    BeaconClick,
    #[serde(rename = "beacon:hover")]
    BeaconHover,
    #[serde(rename = "overlay")]
    Overlay,
    #[serde(rename = "standalone")]
    Standalone,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Next => "next",
            Self::Back => "back",
            Self::Close => "close",
            Self::Esc => "esc",
            Self::Skip => "skip",
            Self::Jump => "jump",
            Self::Reset => "reset",
            Self::BeaconClick => "beacon:click",
            Self::BeaconHover => "beacon:hover",
            Self::Overlay => "overlay",
            Self::Standalone => "standalone",
        }
    }
}

/// Named controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourPhase {
    /// Not running and no standalone popup.
    Idle,
    /// Running with the marker shown.
    RunningMarker,
    /// Running with the popup shown.
    RunningPopup,
    /// Main sequence suspended behind an ad-hoc popup.
    StandalonePopup,
    /// Walked past the last step.
    Finished,
}

/// The open standalone popup.
#[derive(Debug, Clone, PartialEq)]
pub struct StandaloneState {
    /// Registered trigger id.
    pub trigger: usize,
    pub step: Step,
}

/// A start request deferred while a standalone popup was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStart {
    pub autorun: bool,
    pub index: usize,
}

/// Controller-owned tour state.
#[derive(Debug, Clone, PartialEq)]
pub struct TourState {
    /// Current step pointer; may point past the last step.
    pub index: usize,
    pub is_running: bool,
    /// Popup (true) or marker (false).
    pub show_popup: bool,
    /// Placement must be recomputed before the next paint.
    pub should_redraw: bool,
    pub action: Action,
    pub standalone: Option<StandaloneState>,
    /// Last placement; [`OFFSCREEN`] until placed.
    pub position: Point,
    /// Finished through an explicit skip.
    pub skipped: bool,
    /// The caller started the tour and has not stopped it.
    pub run_requested: bool,
    /// Popups open automatically on step change.
    pub autorun: bool,
    /// `is_running` saved when a standalone popup suspended the sequence.
    pub suspended_running: Option<bool>,
    pub pending_start: Option<PendingStart>,
}

impl Default for TourState {
    fn default() -> Self {
        Self {
            index: 0,
            is_running: false,
            show_popup: false,
            should_redraw: false,
            action: Action::Init,
            standalone: None,
            position: OFFSCREEN,
            skipped: false,
            run_requested: false,
            autorun: false,
            suspended_running: None,
            pending_start: None,
        }
    }
}

impl TourState {
    /// Named phase for this state.
    #[must_use]
    pub fn phase(&self, registry: &StepRegistry) -> TourPhase {
        if self.standalone.is_some() {
            TourPhase::StandalonePopup
        } else if self.is_running {
            if self.show_popup {
                TourPhase::RunningPopup
            } else {
                TourPhase::RunningMarker
            }
        } else if !registry.is_empty() && self.index >= registry.len() {
            TourPhase::Finished
        } else {
            TourPhase::Idle
        }
    }

    /// Whether the placement has never been computed since the last transition.
    #[inline]
    #[must_use]
    pub fn is_unplaced(&self) -> bool {
        self.position == OFFSCREEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> StepRegistry {
        StepRegistry::new(vec![Step::new("#a"), Step::new("#b")])
    }

    #[test]
    fn default_is_idle_and_unplaced() {
        let state = TourState::default();
        assert_eq!(state.phase(&registry()), TourPhase::Idle);
        assert!(state.is_unplaced());
        assert_eq!(state.action, Action::Init);
    }

    #[test]
    fn phases() {
        let reg = registry();
        let mut state = TourState {
            is_running: true,
            ..TourState::default()
        };
        assert_eq!(state.phase(&reg), TourPhase::RunningMarker);
        state.show_popup = true;
        assert_eq!(state.phase(&reg), TourPhase::RunningPopup);
        state.standalone = Some(StandaloneState {
            trigger: 0,
            step: Step::new("#help"),
        });
        assert_eq!(state.phase(&reg), TourPhase::StandalonePopup);
        let finished = TourState {
            index: 2,
            ..TourState::default()
        };
        assert_eq!(finished.phase(&reg), TourPhase::Finished);
    }

    #[test]
    fn empty_registry_never_finishes() {
        let state = TourState {
            index: 3,
            ..TourState::default()
        };
        assert_eq!(state.phase(&StepRegistry::default()), TourPhase::Idle);
    }

    #[test]
    fn action_names() {
        assert_eq!(Action::BeaconClick.as_str(), "beacon:click");
        assert_eq!(
            serde_json::to_value(Action::Esc).unwrap(),
            serde_json::json!("esc")
        );
    }
}
