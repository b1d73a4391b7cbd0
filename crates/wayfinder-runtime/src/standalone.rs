#![forbid(unsafe_code)]

//! Standalone trigger manager.
//!
//! Ad-hoc popups hang off registered trigger elements outside the main
//! sequence. The manager only decides: given an activation on an element, it
//! answers whether to show that trigger's popup, hide it, or ignore the input.
//! The controller applies the decision through its normal transition path.
//!
//! Hover activations are ignored once touch has been detected, so a tap does
//! not fire both an emulated hover and a click.

use wayfinder_core::{DomEventKind, ElementId, Step, TouchCapability, TriggerEvent};

/// A registered ad-hoc trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct StandaloneTrigger {
    pub id: usize,
    pub step: Step,
    pub element: ElementId,
}

impl StandaloneTrigger {
    /// Listener kinds this trigger needs.
    #[must_use]
    pub fn listener_kinds(&self) -> &'static [DomEventKind] {
        match self.step.trigger {
            TriggerEvent::Click => &[DomEventKind::Click],
            TriggerEvent::Hover => &[DomEventKind::MouseEnter, DomEventKind::MouseLeave],
        }
    }
}

/// What an activation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    Show(usize),
    Hide(usize),
    Ignore,
}

/// Registered triggers and which one is open.
#[derive(Debug, Clone, Default)]
pub struct TriggerManager {
    triggers: Vec<StandaloneTrigger>,
    next_id: usize,
    open: Option<usize>,
    caps: TouchCapability,
}

impl TriggerManager {
    #[must_use]
    pub fn new(caps: TouchCapability) -> Self {
        Self {
            caps,
            ..Self::default()
        }
    }

    /// Register a trigger element; returns its id.
    pub fn register(&mut self, step: Step, element: ElementId) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.triggers.push(StandaloneTrigger { id, step, element });
        id
    }

    /// Forget a trigger. Clears the open marker if it was open.
    pub fn unregister(&mut self, id: usize) -> Option<StandaloneTrigger> {
        let pos = self.triggers.iter().position(|t| t.id == id)?;
        if self.open == Some(id) {
            self.open = None;
        }
        Some(self.triggers.remove(pos))
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&StandaloneTrigger> {
        self.triggers.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub const fn open(&self) -> Option<usize> {
        self.open
    }

    pub fn set_open(&mut self, id: Option<usize>) {
        self.open = id;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
        self.open = None;
    }

    /// Decide what an input on `element` does.
    #[must_use]
    pub fn activate(&self, element: ElementId, kind: DomEventKind) -> TriggerDecision {
        let Some(trigger) = self.triggers.iter().find(|t| t.element == element) else {
            return TriggerDecision::Ignore;
        };
        let id = trigger.id;
        let is_open = self.open == Some(id);
        match (trigger.step.trigger, kind) {
            (TriggerEvent::Click, DomEventKind::Click) => {
                if is_open {
                    TriggerDecision::Hide(id)
                } else {
                    TriggerDecision::Show(id)
                }
            }
            (TriggerEvent::Hover, DomEventKind::MouseEnter | DomEventKind::MouseLeave)
                if self.caps.is_touch() =>
            {
                tracing::debug!(
                    target: "wayfinder.controller",
                    trigger = id,
                    "hover ignored on touch device"
                );
                TriggerDecision::Ignore
            }
            (TriggerEvent::Hover, DomEventKind::MouseEnter) if !is_open => {
                TriggerDecision::Show(id)
            }
            (TriggerEvent::Hover, DomEventKind::MouseLeave) if is_open => {
                TriggerDecision::Hide(id)
            }
            _ => TriggerDecision::Ignore,
        }
    }
}
