#![forbid(unsafe_code)]

//! Lifecycle events and the transition planner.
//!
//! External integrators observe the tour through a single callback sink.
//! The events a transition produces, and their order, are decided by
//! [`plan`], a pure function of the previous state, the candidate state, the
//! registry and a [`TransitionIntent`]. The controller emits the planned
//! events through the [`Dispatcher`] before committing the candidate.
//!
//! # Ordering rules
//!
//! 1. Standalone on fires `standalone:before`, off fires `standalone:after`;
//!    switching triggers fires `after` for the old one first.
//! 2. A requested run newly entering the running state at index 0 fires
//!    `step:before(0)`, then `beacon:before(0)` if the popup is not shown.
//! 3. An index change while running fires `step:after` for the step left.
//! 4. A requested step whose target did not resolve fires
//!    `error:target_not_found` and nothing after it.
//! 5. A requested run arriving at a new index (or newly running) fires
//!    `step:before` unless rule 2 already did.
//! 6. While running, a visibility flip, an index change or a requested
//!    entry into running fires exactly one of `tooltip:before` /
//!    `beacon:before`, never repeating a `beacon:before` from rule 2.
//! 7. Walking onto an index with no step while not running fires
//!    `finished` carrying the skipped flag.
//!
//! The sink must not re-enter the controller synchronously.

use serde::Serialize;
use wayfinder_core::{Step, StepRegistry};

use crate::state::{Action, StandaloneState, TourState};

/// Closed lifecycle event vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    #[serde(rename = "step:before")]
    StepBefore,
    #[serde(rename = "beacon:before")]
    BeaconBefore,
    #[serde(rename = "tooltip:before")]
    TooltipBefore,
    #[serde(rename = "step:after")]
    StepAfter,
    #[serde(rename = "standalone:before")]
    StandaloneBefore,
    #[serde(rename = "standalone:after")]
    StandaloneAfter,
    #[serde(rename = "beacon:trigger")]
    BeaconTrigger,
    #[serde(rename = "overlay:click")]
    OverlayClick,
    #[serde(rename = "hole:click")]
    HoleClick,
    #[serde(rename = "error:target_not_found")]
    TargetNotFound,
    #[serde(rename = "finished")]
    Finished,
}

impl EventKind {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StepBefore => "step:before",
            Self::BeaconBefore => "beacon:before",
            Self::TooltipBefore => "tooltip:before",
            Self::StepAfter => "step:after",
            Self::StandaloneBefore => "standalone:before",
            Self::StandaloneAfter => "standalone:after",
            Self::BeaconTrigger => "beacon:trigger",
            Self::OverlayClick => "overlay:click",
            Self::HoleClick => "hole:click",
            Self::TargetNotFound => "error:target_not_found",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload delivered to the sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Main-sequence index; `None` for standalone events.
    pub index: Option<usize>,
    pub step: Option<Step>,
    pub action: Action,
    pub skipped: bool,
}

impl TourEvent {
    /// Event for main-sequence step `index`.
    #[must_use]
    pub fn for_step(
        kind: EventKind,
        index: usize,
        registry: &StepRegistry,
        state: &TourState,
    ) -> Self {
        Self {
            kind,
            index: Some(index),
            step: registry.get(index).cloned(),
            action: state.action,
            skipped: state.skipped,
        }
    }

    /// Event for a standalone popup.
    #[must_use]
    pub fn for_standalone(kind: EventKind, standalone: &StandaloneState) -> Self {
        Self {
            kind,
            index: None,
            step: Some(standalone.step.clone()),
            action: Action::Standalone,
            skipped: false,
        }
    }
}

/// What the caller asked for, as opposed to what the state diff shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionIntent {
    /// The transition belongs to a tour run the caller requested.
    pub requested_run: bool,
    /// The candidate index's target resolved.
    pub target_found: bool,
}

impl TransitionIntent {
    /// A run-driven transition.
    #[must_use]
    pub const fn run(target_found: bool) -> Self {
        Self {
            requested_run: true,
            target_found,
        }
    }

    /// A transition that must not produce step events.
    #[must_use]
    pub const fn passive() -> Self {
        Self {
            requested_run: false,
            target_found: true,
        }
    }
}

/// Ordered events for `prev → next`.
#[must_use]
pub fn plan(
    prev: &TourState,
    next: &TourState,
    registry: &StepRegistry,
    intent: TransitionIntent,
) -> Vec<TourEvent> {
    let mut events = Vec::new();

    // Rule 1
    match (&prev.standalone, &next.standalone) {
        (None, Some(open)) => {
            events.push(TourEvent::for_standalone(EventKind::StandaloneBefore, open));
        }
        (Some(closed), None) => {
            events.push(TourEvent::for_standalone(EventKind::StandaloneAfter, closed));
        }
        (Some(old), Some(new)) if old.trigger != new.trigger => {
            events.push(TourEvent::for_standalone(EventKind::StandaloneAfter, old));
            events.push(TourEvent::for_standalone(EventKind::StandaloneBefore, new));
        }
        _ => {}
    }

    let index_changed = prev.index != next.index;
    let newly_running = !prev.is_running && next.is_running;
    let mut step_announced = false;
    let mut beacon_announced = false;

    // Rule 2
    if intent.requested_run && newly_running && next.index == 0 {
        events.push(TourEvent::for_step(EventKind::StepBefore, 0, registry, next));
        step_announced = true;
        if !next.show_popup {
            events.push(TourEvent::for_step(EventKind::BeaconBefore, 0, registry, next));
            beacon_announced = true;
        }
    }

    // Rule 3
    if prev.is_running && index_changed && registry.get(prev.index).is_some() {
        events.push(TourEvent::for_step(
            EventKind::StepAfter,
            prev.index,
            registry,
            next,
        ));
    }

    // Rule 4
    if intent.requested_run && registry.get(next.index).is_some() && !intent.target_found {
        events.push(TourEvent::for_step(
            EventKind::TargetNotFound,
            next.index,
            registry,
            next,
        ));
        return events;
    }

    // Rule 5
    if next.is_running
        && intent.requested_run
        && (index_changed || newly_running)
        && !step_announced
    {
        events.push(TourEvent::for_step(
            EventKind::StepBefore,
            next.index,
            registry,
            next,
        ));
    }

    // Rule 6
    let visibility_flipped = prev.show_popup != next.show_popup;
    if next.is_running
        && (visibility_flipped || index_changed || (newly_running && intent.requested_run))
    {
        if next.show_popup {
            events.push(TourEvent::for_step(
                EventKind::TooltipBefore,
                next.index,
                registry,
                next,
            ));
        } else if !beacon_announced {
            events.push(TourEvent::for_step(
                EventKind::BeaconBefore,
                next.index,
                registry,
                next,
            ));
        }
    }

    // Rule 7
    if !next.is_running
        && index_changed
        && !registry.is_empty()
        && registry.get(next.index).is_none()
    {
        events.push(TourEvent {
            kind: EventKind::Finished,
            index: Some(next.index),
            step: None,
            action: next.action,
            skipped: next.skipped,
        });
    }

    events
}

/// Boxed event sink.
pub type EventSink = Box<dyn FnMut(TourEvent)>;

/// Fire-and-forget delivery to at most one sink.
#[derive(Default)]
pub struct Dispatcher {
    sink: Option<EventSink>,
    emitted: u64,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("has_sink", &self.sink.is_some())
            .field("emitted", &self.emitted)
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the sink, replacing any previous one.
    pub fn set_sink(&mut self, sink: impl FnMut(TourEvent) + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Remove the sink; later emissions are dropped.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Total events emitted (delivered or dropped).
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Deliver one event synchronously.
    pub fn emit(&mut self, event: TourEvent) {
        self.emitted += 1;
        tracing::debug!(
            target: "wayfinder.lifecycle",
            kind = event.kind.as_str(),
            index = ?event.index,
            action = event.action.as_str(),
            "emit"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink(event);
        }
    }

    /// Deliver planned events in order.
    pub fn emit_all(&mut self, events: impl IntoIterator<Item = TourEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}
