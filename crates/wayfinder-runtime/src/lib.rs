#![forbid(unsafe_code)]

//! Wayfinder runtime.
//!
//! # Role in Wayfinder
//! `wayfinder-runtime` is the orchestrator. It owns the tour state machine
//! ([`Tour`]), turns every state change into ordered lifecycle events, binds
//! and unbinds host listeners, and produces the [`RenderFrame`] the embedding
//! layer paints.
//!
//! # Key Components
//!
//! - [`Tour`] - controller over a shared [`DomHost`](wayfinder_core::DomHost)
//! - [`TourConfig`] - TOML/JSON configuration with validation
//! - [`TourEvent`] / [`EventKind`] - lifecycle callbacks
//! - [`ListenerRegistry`] - keyed listeners with symmetric teardown
//! - [`ResizeDebouncer`] - trailing-edge resize coalescing on host time
//! - [`TriggerManager`] - standalone popup triggers
//!
//! # How it fits in the system
//! The runtime reads steps and geometry from `wayfinder-core`, asks
//! `wayfinder-layout` where to put things, and is driven by a host such as
//! `wayfinder-web`'s `VirtualDom`.

pub mod config;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod listeners;
pub mod resize_debounce;
pub mod snapshot;
pub mod standalone;
pub mod state;

pub use config::{
    ButtonFlags, ConfigError, DisplayMode, Locale, OverlayConfig, ResizeConfig, ScrollConfig,
    TourConfig,
};
pub use controller::{ISSUE_CAPACITY, Tour};
pub use error::{Recovery, TourError};
pub use lifecycle::{Dispatcher, EventKind, EventSink, TourEvent, TransitionIntent, plan};
pub use listeners::{ListenerRecord, ListenerRegistry};
pub use resize_debounce::{ResizeDebouncer, ResizeSignal};
pub use snapshot::{Buttons, RenderFrame, RenderSnapshot};
pub use standalone::{StandaloneTrigger, TriggerDecision, TriggerManager};
pub use state::{Action, PendingStart, StandaloneState, TourPhase, TourState};
