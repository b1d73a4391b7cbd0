#![forbid(unsafe_code)]

//! Wayfinder public facade crate.
//!
//! Re-exports the types an embedding needs from the internal crates, a
//! unified [`Error`], and a couple of loading helpers.
//!
//! ```no_run
//! use std::rc::Rc;
//! use wayfinder::prelude::*;
//!
//! let dom = Rc::new(VirtualDom::default());
//! let steps = r##"[{ "selector": "#hero" }, { "selector": "#menu", "position": "right" }]"##;
//! let mut tour = wayfinder::tour_from_json(dom, steps, TourConfig::default())?;
//! tour.set_sink(|event| println!("{}", event.kind));
//! tour.start(true, None, None);
//! let frame = tour.render();
//! # Ok::<(), wayfinder::Error>(())
//! ```

mod error;

use std::path::Path;
use std::rc::Rc;

pub use error::{Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use wayfinder_core::{
    AnchorRule, DomEventKind, DomHost, ElementId, HostEvent, KeyCode, ListenTarget, ListenerHandle,
    Point, Progress, Rect, Size, Step, StepError, StepRegistry, TouchCapability, TriggerEvent,
};

// --- Layout re-exports -----------------------------------------------------

pub use wayfinder_layout::{Placement, PlacementConfig, PlacementMode, ScrollPolicy, Viewport};

// --- Runtime re-exports ----------------------------------------------------

pub use wayfinder_runtime::{
    Action, ButtonFlags, Buttons, ConfigError, DisplayMode, EventKind, Recovery, RenderFrame,
    RenderSnapshot, Tour, TourConfig, TourError, TourEvent, TourPhase,
};

// --- Web re-exports --------------------------------------------------------

#[cfg(feature = "web")]
pub use wayfinder_web::{DeterministicClock, VirtualDom, parse_steps_json};

// --- Helpers ---------------------------------------------------------------

/// Load and validate a config file. `.json` files are read as JSON, anything
/// else as TOML.
pub fn load_config(path: impl AsRef<Path>) -> Result<TourConfig> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        TourConfig::from_json_file(path)?
    } else {
        TourConfig::from_toml_file(path)?
    };
    Ok(config.validated()?)
}

/// Build a tour from a JSON step record or array.
///
/// Malformed JSON is an error. Structurally invalid steps are excluded and
/// recorded on the tour (see [`Tour::take_issues`]).
pub fn tour_from_json<H: DomHost>(
    host: Rc<H>,
    steps_json: &str,
    config: TourConfig,
) -> Result<Tour<H>> {
    let value: serde_json::Value = serde_json::from_str(steps_json)?;
    Ok(Tour::from_value(host, &value, config))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Action, AnchorRule, DisplayMode, Error, EventKind, HostEvent, KeyCode, Rect, RenderFrame,
        Result, Step, StepRegistry, Tour, TourConfig, TourEvent, TourPhase, TriggerEvent,
    };

    #[cfg(feature = "web")]
    pub use crate::{DeterministicClock, VirtualDom};

    pub use crate::{core, layout, runtime};
}

pub use wayfinder_core as core;
pub use wayfinder_layout as layout;
pub use wayfinder_runtime as runtime;
#[cfg(feature = "web")]
pub use wayfinder_web as web;
