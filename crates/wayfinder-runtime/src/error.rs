#![forbid(unsafe_code)]

//! Tour error taxonomy.
//!
//! Nothing here is ever raised to the embedding application as a panic or a
//! failed transition. Every [`TourError`] is recovered inside the controller
//! according to its [`Recovery`] and kept in a bounded issue log the host can
//! drain with `Tour::take_issues`.

use std::fmt;

use wayfinder_core::StepError;

use crate::config::ConfigError;

/// How the controller recovers from an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recovery {
    /// The step is left out of iteration.
    ExcludeStep,
    /// Running is cleared; the caller may retry, jump or reset.
    HaltRunning,
    /// The standalone popup keeps precedence; the main sequence waits.
    PreferStandalone,
    /// The offending configuration is replaced by defaults.
    UseDefaults,
    /// The request is dropped.
    Ignore,
}

/// A locally recovered tour issue.
#[derive(Debug)]
pub enum TourError {
    /// A structurally malformed step descriptor.
    InvalidStep { index: usize, source: StepError },
    /// A valid step whose selector matches nothing in the document.
    TargetNotFound { index: usize, selector: String },
    /// A main-sequence request collided with an open standalone popup.
    StateConflict { detail: String },
    /// Configuration failed to load or validate.
    Config(ConfigError),
    /// The controller was torn down and accepts no further work.
    TornDown,
}

impl TourError {
    /// Recovery applied by the controller.
    #[must_use]
    pub const fn recovery(&self) -> Recovery {
        match self {
            Self::InvalidStep { .. } => Recovery::ExcludeStep,
            Self::TargetNotFound { .. } => Recovery::HaltRunning,
            Self::StateConflict { .. } => Recovery::PreferStandalone,
            Self::Config(_) => Recovery::UseDefaults,
            Self::TornDown => Recovery::Ignore,
        }
    }
}

impl fmt::Display for TourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep { index, source } => write!(f, "invalid step {index}: {source}"),
            Self::TargetNotFound { index, selector } => {
                write!(f, "target not found for step {index} ({selector})")
            }
            Self::StateConflict { detail } => write!(f, "state conflict: {detail}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::TornDown => f.write_str("tour has been torn down"),
        }
    }
}

impl std::error::Error for TourError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidStep { source, .. } => Some(source),
            Self::Config(e) => Some(e),
            Self::TargetNotFound { .. } | Self::StateConflict { .. } | Self::TornDown => None,
        }
    }
}

impl From<ConfigError> for TourError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
