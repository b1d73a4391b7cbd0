#![forbid(unsafe_code)]

//! Core: step model, geometry, host DOM abstraction and capability state.
//!
//! # Role in Wayfinder
//! `wayfinder-core` is the data layer. It owns the [`Step`](step::Step)
//! descriptor and the [`StepRegistry`](step::StepRegistry) that validates and
//! resolves steps, the geometric primitives the placement engine works in, and
//! the [`DomHost`](dom::DomHost) trait through which every other crate talks to
//! the live document.
//!
//! # Primary responsibilities
//! - **Step Registry**: validation of raw step records and target resolution.
//! - **Geometry**: `Point`, `Size` and `Rect` in CSS pixels.
//! - **Host abstraction**: element queries, geometry reads, listener binding.
//! - **Input events**: normalized host events delivered to the controller.
//! - **Capabilities**: latched touch detection shared across components.
//!
//! # How it fits in the system
//! The placement engine (`wayfinder-layout`) consumes geometry and steps; the
//! runtime (`wayfinder-runtime`) drives the tour state machine over the
//! registry and host; `wayfinder-web` provides host implementations.

pub mod capabilities;
pub mod dom;
pub mod error;
pub mod event;
pub mod geometry;
pub mod step;

pub use capabilities::TouchCapability;
pub use dom::{DomEventKind, DomHost, ElementId, ListenTarget, ListenerHandle};
pub use error::StepError;
pub use event::{HostEvent, KeyCode};
pub use geometry::{Point, Rect, Size};
pub use step::{
    AnchorRule, Progress, Step, StepRegistry, TriggerEvent, check_step, validate_step, validate_steps,
};
