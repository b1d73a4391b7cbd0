#![forbid(unsafe_code)]

//! Step descriptors and the Step Registry.
//!
//! A [`Step`] is one entry of the tour, anchored to a CSS selector. Steps are
//! identified by their position in the ordered list, never by a stable id.
//!
//! Raw step records arrive from the embedding application as loosely-typed
//! JSON. [`validate_step`] / [`validate_steps`] apply the structural contract
//! (a plain record with a non-empty string `selector`), and
//! [`StepRegistry::from_value`] builds the ordered registry, excluding and
//! reporting anything invalid rather than failing.
//!
//! # Invariants
//!
//! 1. Every step held by a [`StepRegistry`] has a non-empty selector.
//! 2. Invalid records are never fatal: they are logged under the
//!    `wayfinder.registry` target and returned as issues.
//! 3. Target resolution failing is an expected transient condition (the
//!    element is not mounted yet) and is reported as a warning only.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dom::{DomHost, ElementId};
use crate::error::StepError;

/// Geometric strategy used to position a popup relative to its target.
///
/// Exposed as an explicit step field (`position`), never inferred from the
/// selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnchorRule {
    /// Above the target, horizontally centred.
    #[default]
    Top,
    /// Above the target, aligned to its left edge.
    TopLeft,
    /// Above the target, aligned to its right edge.
    TopRight,
    /// Below the target, horizontally centred.
    Bottom,
    /// Below the target, aligned to its left edge.
    BottomLeft,
    /// Below the target, aligned to its right edge.
    BottomRight,
    /// Beside the target on its left.
    Left,
    /// Beside the target on its right.
    Right,
    /// Centred over the target.
    Center,
    /// Centred over a synthetic placeholder whose geometry is already
    /// page-relative.
    Virtual,
}

impl AnchorRule {
    /// Rule anchors above the target.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    /// Rule anchors below the target.
    #[must_use]
    pub const fn is_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Kebab-case name as used in step records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
            Self::Virtual => "virtual",
        }
    }
}

/// How a step's marker opens its popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEvent {
    #[default]
    Click,
    Hover,
}

/// One tour step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// CSS selector of the target element.
    pub selector: String,
    /// Anchor rule for the popup and marker.
    #[serde(default)]
    pub position: AnchorRule,
    /// Target is `position: fixed`; placement skips scroll correction.
    #[serde(default)]
    pub is_fixed: bool,
    /// Clicks inside the overlay hole reach the target.
    #[serde(default)]
    pub allow_clicks_thru_hole: bool,
    /// Marker activation event.
    #[serde(default, rename = "type")]
    pub trigger: TriggerEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Arbitrary display fields passed through to the render layer.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Step {
    /// Create a step for `selector` with default display settings.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            position: AnchorRule::default(),
            is_fixed: false,
            allow_clicks_thru_hole: false,
            trigger: TriggerEvent::default(),
            title: None,
            text: None,
            extra: Map::new(),
        }
    }

    /// Set the anchor rule.
    #[must_use]
    pub fn position(mut self, rule: AnchorRule) -> Self {
        self.position = rule;
        self
    }

    /// Set the marker trigger.
    #[must_use]
    pub fn trigger(mut self, trigger: TriggerEvent) -> Self {
        self.trigger = trigger;
        self
    }

    /// Mark the target as fixed-position.
    #[must_use]
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.is_fixed = fixed;
        self
    }

    /// Set the popup title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the popup body text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Structural check for an already-typed step.
    pub fn check(&self) -> Result<(), StepError> {
        if self.selector.trim().is_empty() {
            Err(StepError::EmptySelector)
        } else {
            Ok(())
        }
    }

    /// Selector with surrounding whitespace trimmed and inner runs collapsed.
    #[must_use]
    pub fn sanitized_selector(&self) -> String {
        sanitize_selector(&self.selector)
    }

    /// First live element matching this step, or `None`.
    ///
    /// Invalid steps never resolve. A miss is logged as a warning; callers
    /// treat it as "not mounted yet".
    pub fn resolve<H: DomHost + ?Sized>(&self, host: &H) -> Option<ElementId> {
        if self.check().is_err() {
            tracing::warn!(
                target: "wayfinder.registry",
                selector = %self.selector,
                "cannot resolve invalid step"
            );
            return None;
        }
        let selector = self.sanitized_selector();
        let found = host.query_selector(&selector);
        if found.is_none() {
            tracing::warn!(
                target: "wayfinder.registry",
                selector = %selector,
                "target not mounted"
            );
        }
        found
    }
}

/// Normalize whitespace in a selector before it is queried.
#[must_use]
pub fn sanitize_selector(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Structural check for a raw step record.
pub fn check_step(value: &Value) -> Result<(), StepError> {
    let Value::Object(map) = value else {
        return Err(StepError::NotARecord);
    };
    match map.get("selector") {
        None => Err(StepError::MissingSelector),
        Some(Value::String(s)) if s.trim().is_empty() => Err(StepError::EmptySelector),
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(StepError::SelectorNotString),
    }
}

/// `true` iff `value` is a plain record with a non-empty string `selector`.
///
/// Failures are reported through `tracing`, never raised.
pub fn validate_step(value: &Value) -> bool {
    match check_step(value) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(target: "wayfinder.registry", error = %err, "invalid step");
            false
        }
    }
}

/// Accepts a single valid step, or a non-empty sequence of valid steps.
///
/// Every element of a sequence is checked (and reported), not just the first
/// failure.
pub fn validate_steps(value: &Value) -> bool {
    match value {
        Value::Array(items) if items.is_empty() => {
            tracing::warn!(
                target: "wayfinder.registry",
                error = %StepError::EmptySequence,
                "invalid steps"
            );
            false
        }
        Value::Array(items) => items
            .iter()
            .map(validate_step)
            .fold(true, |all, ok| all && ok),
        other => validate_step(other),
    }
}

/// Completion summary for the current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
    /// Rounded, clamped to 100.
    pub percentage: u8,
}

/// Ordered, validated step list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRegistry {
    steps: Vec<Step>,
}

impl StepRegistry {
    /// Build from typed steps; steps failing [`Step::check`] are excluded.
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        let steps = steps
            .into_iter()
            .enumerate()
            .filter_map(|(index, step)| match step.check() {
                Ok(()) => Some(step),
                Err(err) => {
                    tracing::warn!(
                        target: "wayfinder.registry",
                        index,
                        error = %err,
                        "excluding invalid step"
                    );
                    None
                }
            })
            .collect();
        Self { steps }
    }

    /// Build from a raw record or array of records.
    ///
    /// Returns the registry of valid steps plus `(input_index, error)` for each
    /// excluded entry.
    pub fn from_value(value: &Value) -> (Self, Vec<(usize, StepError)>) {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        let mut issues = Vec::new();
        if items.is_empty() {
            tracing::warn!(
                target: "wayfinder.registry",
                error = %StepError::EmptySequence,
                "no steps supplied"
            );
            issues.push((0, StepError::EmptySequence));
        }
        let mut steps = Vec::with_capacity(items.len());
        for (index, raw) in items.into_iter().enumerate() {
            let parsed = check_step(raw).and_then(|()| {
                serde_json::from_value::<Step>(raw.clone())
                    .map_err(|e| StepError::Malformed(e.to_string()))
            });
            match parsed {
                Ok(step) => steps.push(step),
                Err(err) => {
                    tracing::warn!(
                        target: "wayfinder.registry",
                        index,
                        error = %err,
                        "excluding invalid step"
                    );
                    issues.push((index, err));
                }
            }
        }
        (Self { steps }, issues)
    }

    /// Step at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the registry holds no steps.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether `index` is the final step.
    #[inline]
    #[must_use]
    pub fn is_last(&self, index: usize) -> bool {
        !self.steps.is_empty() && index == self.steps.len() - 1
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Resolve the target of the step at `index`.
    pub fn resolve<H: DomHost + ?Sized>(&self, index: usize, host: &H) -> Option<ElementId> {
        self.get(index).and_then(|step| step.resolve(host))
    }

    /// Progress summary for `index`.
    #[must_use]
    pub fn progress(&self, index: usize) -> Progress {
        let total = self.steps.len();
        let percentage = if total == 0 {
            0
        } else {
            ((index as f64 / total as f64) * 100.0).round().min(100.0) as u8
        };
        Progress {
            index,
            total,
            percentage,
        }
    }
}
