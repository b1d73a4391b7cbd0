#![forbid(unsafe_code)]

//! Anchored placement for popups and markers.
//!
//! [`PlacementEngine`] computes where a popup (or the smaller marker) should
//! be drawn relative to its target. Each [`AnchorRule`] is a pure function of
//! the measured target rect, a fixed component size estimate, a fixed padding
//! and the viewport; the result is rounded up and clamped so content stays
//! visible.
//!
//! # Coordinate spaces
//!
//! [`measure`] translates the target's viewport-relative client rect into the
//! offset parent's space. With the default offset parent (the body) the window
//! scroll offset is added so the result is page-relative; `virtual` targets
//! and fixed-position steps skip that correction.
//!
//! # Auto-flip
//!
//! In popup mode, side rules flip when the popup would leave the layout
//! viewport (`left*` → `top`, `right*` → `bottom`) and top rules flip to the
//! matching bottom rule when the popup would start above the document. The
//! layout viewport is floored at [`MIN_LAYOUT_VIEWPORT`] so tiny windows do
//! not force degenerate flips.
//!
//! # Invariants
//!
//! 1. [`prevent_overflow`] is idempotent.
//! 2. When `bound > size + 2 * OVERFLOW_MARGIN`, its output satisfies
//!    `OVERFLOW_MARGIN <= value` and `value + size <= bound - OVERFLOW_MARGIN`.
//! 3. The engine never produces coordinates without a measured target;
//!    [`OFFSCREEN`] is the only position reported before the first placement.

use serde::{Deserialize, Serialize};
use wayfinder_core::{AnchorRule, DomHost, ElementId, Point, Rect, Size, Step};

/// Minimum distance kept between placed content and the window/document edge.
pub const OVERFLOW_MARGIN: f64 = 15.0;

/// Floor applied to the viewport when evaluating anchor rules.
pub const MIN_LAYOUT_VIEWPORT: Size = Size::new(1280.0, 768.0);

/// "Not placed yet" sentinel, distinct from the origin.
pub const OFFSCREEN: Point = Point::new(-1000.0, -1000.0);

/// Which component is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// The small trigger marker.
    Marker,
    /// The expanded popup.
    Popup,
}

/// Component size estimates and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Estimated popup size.
    pub popup_size: Size,
    /// Marker size.
    pub marker_size: Size,
    /// Gap between target and popup.
    pub padding: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            popup_size: Size::new(360.0, 220.0),
            marker_size: Size::new(36.0, 36.0),
            padding: 15.0,
        }
    }
}

/// Window and document metrics at placement time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Inner window size.
    pub size: Size,
    /// Full scrollable document height.
    pub document_height: f64,
    /// Current scroll offset.
    pub scroll: Point,
}

impl Viewport {
    /// Read current metrics from the host.
    pub fn from_host<H: DomHost + ?Sized>(host: &H) -> Self {
        let size = host.viewport_size();
        Self {
            size,
            document_height: host.document_height().max(size.height),
            scroll: host.scroll_offset(),
        }
    }

    /// Viewport used for rule evaluation, floored at [`MIN_LAYOUT_VIEWPORT`].
    #[must_use]
    pub fn layout_size(&self) -> Size {
        self.size.max(MIN_LAYOUT_VIEWPORT)
    }
}

/// Clamp axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of a placement computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top-left corner of the placed component.
    pub position: Point,
    /// Rule actually used after auto-flip.
    pub rule: AnchorRule,
    /// Size the computation assumed.
    pub size: Size,
}

/// Measure `target` in the offset parent's coordinate space.
///
/// `offset_parent = None` means the document body. Returns `None` when the
/// target has been removed from the host. A custom offset parent that has
/// disappeared falls back to the body.
pub fn measure<H: DomHost + ?Sized>(
    host: &H,
    target: ElementId,
    offset_parent: Option<ElementId>,
    step: &Step,
) -> Option<Rect> {
    let client = host.client_rect(target)?;
    if let Some(parent) = offset_parent {
        if let Some(parent_rect) = host.client_rect(parent) {
            return Some(client.relative_to(parent_rect.origin()));
        }
        tracing::warn!(
            target: "wayfinder.placement",
            %parent,
            "offset parent vanished, measuring against the body"
        );
    }
    if step.position == AnchorRule::Virtual || step.is_fixed {
        return Some(client);
    }
    let scroll = host.scroll_offset();
    Some(client.translate(scroll.x, scroll.y))
}

/// Page-space origin of the coordinates [`measure`] reports.
///
/// Zero for the body; a live offset parent contributes its client origin
/// plus the page scroll.
pub fn page_origin<H: DomHost + ?Sized>(host: &H, offset_parent: Option<ElementId>) -> Point {
    match offset_parent.and_then(|parent| host.client_rect(parent)) {
        Some(parent) => {
            let scroll = host.scroll_offset();
            Point::new(parent.x + scroll.x, parent.y + scroll.y)
        }
        None => Point::ZERO,
    }
}

/// Raw (unclamped) top-left corner for `rule` around `target`.
#[must_use]
pub fn anchor_point(
    rule: AnchorRule,
    target: Rect,
    size: Size,
    padding: f64,
    mode: PlacementMode,
) -> Point {
    let popup = mode == PlacementMode::Popup;
    let (w, h) = (size.width, size.height);

    let x = match rule {
        AnchorRule::Left => {
            if popup {
                target.x - (w + padding)
            } else {
                target.x - w / 2.0
            }
        }
        AnchorRule::Right => {
            if popup {
                target.right() + padding
            } else {
                target.right() - w / 2.0
            }
        }
        AnchorRule::TopLeft | AnchorRule::BottomLeft => {
            if popup {
                target.x - padding
            } else {
                target.x - w / 2.0
            }
        }
        AnchorRule::TopRight | AnchorRule::BottomRight => {
            if popup {
                target.right() - (w - padding)
            } else {
                target.right() - w / 2.0
            }
        }
        AnchorRule::Top | AnchorRule::Bottom | AnchorRule::Center | AnchorRule::Virtual => {
            target.center_x() - w / 2.0
        }
    };

    let y = if rule.is_top() {
        if popup {
            target.y - (h + padding)
        } else {
            target.y - h / 2.0
        }
    } else if rule.is_bottom() {
        if popup {
            target.bottom() + padding
        } else {
            target.bottom() - h / 2.0
        }
    } else if matches!(rule, AnchorRule::Center | AnchorRule::Virtual) {
        target.center_y() - h / 2.0
    } else {
        target.y
    };

    Point::new(x, y)
}

/// Keep `value` (the leading edge of a component of `size`) on-screen.
///
/// X is bounded by the window width, Y by the full document height since the
/// popup may sit below the fold. When the bound is too small to honour both
/// margins the leading margin wins.
#[must_use]
pub fn prevent_overflow(value: f64, axis: Axis, size: Size, viewport: &Viewport) -> f64 {
    let (bound, extent) = match axis {
        Axis::X => (viewport.size.width, size.width),
        Axis::Y => (viewport.document_height, size.height),
    };
    let max = bound - extent - OVERFLOW_MARGIN;
    value.min(max).max(OVERFLOW_MARGIN)
}

/// Computes popup and marker positions.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: PlacementConfig,
}

impl PlacementEngine {
    /// Create an engine with the given size estimates.
    #[must_use]
    pub fn new(config: PlacementConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Size assumed for `mode`.
    #[must_use]
    pub const fn component_size(&self, mode: PlacementMode) -> Size {
        match mode {
            PlacementMode::Marker => self.config.marker_size,
            PlacementMode::Popup => self.config.popup_size,
        }
    }

    /// Apply auto-flip to the requested rule.
    #[must_use]
    pub fn resolve_rule(
        &self,
        rule: AnchorRule,
        target: Rect,
        viewport: &Viewport,
        mode: PlacementMode,
    ) -> AnchorRule {
        if mode == PlacementMode::Marker {
            return rule;
        }
        let size = self.config.popup_size;
        let padding = self.config.padding;
        let layout = viewport.layout_size();

        let rule = match rule {
            AnchorRule::Left if target.x - (size.width + padding) < 0.0 => AnchorRule::Top,
            AnchorRule::Right if target.right() + size.width + padding > layout.width => {
                AnchorRule::Bottom
            }
            other => other,
        };

        if rule.is_top() && target.y - (size.height + padding) < 0.0 {
            match rule {
                AnchorRule::TopLeft => AnchorRule::BottomLeft,
                AnchorRule::TopRight => AnchorRule::BottomRight,
                _ => AnchorRule::Bottom,
            }
        } else {
            rule
        }
    }

    /// Place a component of `mode` around `target` using `rule`.
    #[must_use]
    pub fn compute(
        &self,
        target: Rect,
        rule: AnchorRule,
        viewport: &Viewport,
        mode: PlacementMode,
    ) -> Placement {
        let size = self.component_size(mode);
        let resolved = self.resolve_rule(rule, target, viewport, mode);
        let raw = anchor_point(resolved, target, size, self.config.padding, mode);
        let position = Point::new(
            prevent_overflow(raw.x.ceil(), Axis::X, size, viewport),
            prevent_overflow(raw.y.ceil(), Axis::Y, size, viewport),
        );
        tracing::trace!(
            target: "wayfinder.placement",
            requested = rule.as_str(),
            resolved = resolved.as_str(),
            x = position.x,
            y = position.y,
            "placed"
        );
        Placement {
            position,
            rule: resolved,
            size,
        }
    }
}
