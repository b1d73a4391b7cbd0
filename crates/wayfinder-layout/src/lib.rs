#![forbid(unsafe_code)]

//! Placement engine for Wayfinder.
//!
//! # Role in Wayfinder
//! `wayfinder-layout` turns a target element's geometry and an
//! [`AnchorRule`](wayfinder_core::AnchorRule) into absolute popup/marker
//! coordinates that stay on-screen. It is a pure geometry layer: it reads the
//! host through [`DomHost`](wayfinder_core::DomHost) only to measure, and
//! never mutates anything.
//!
//! # Primary responsibilities
//! - **Measurement**: target rect in offset-parent space with scroll correction.
//! - **Anchor rules**: per-rule formulas for popup and marker modes.
//! - **Auto-flip**: side and top rules fall back when the popup cannot fit.
//! - **Overflow clamping**: [`prevent_overflow`] keeps content inside the
//!   window horizontally and the document vertically.
//! - **Scroll targets**: where the page should scroll to reveal a step.

pub mod placement;
pub mod scroll;

pub use placement::{
    Axis, MIN_LAYOUT_VIEWPORT, OFFSCREEN, OVERFLOW_MARGIN, Placement, PlacementConfig,
    PlacementEngine, PlacementMode, Viewport, anchor_point, measure, page_origin,
    prevent_overflow,
};
pub use scroll::{ScrollPolicy, needs_scroll, scroll_target};
