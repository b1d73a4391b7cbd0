#![forbid(unsafe_code)]

//! Top-level error type.

use std::fmt;

use wayfinder_runtime::{ConfigError, Recovery, TourError};

/// Errors surfaced by the facade helpers.
#[derive(Debug)]
pub enum Error {
    /// A tour-level problem (invalid step, missing target, conflict, config).
    Tour(TourError),
    /// Step or config text that is not valid JSON/TOML.
    Parse(String),
    /// I/O failure reading a file.
    Io(std::io::Error),
}

impl Error {
    /// Local recovery for tour-level errors; `None` when the caller must act.
    #[must_use]
    pub const fn recovery(&self) -> Option<Recovery> {
        match self {
            Self::Tour(e) => Some(e.recovery()),
            Self::Parse(_) | Self::Io(_) => None,
        }
    }

    /// Whether the tour can carry on without caller intervention.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.recovery().is_some()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tour(e) => write!(f, "{e}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tour(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Parse(_) => None,
        }
    }
}

impl From<TourError> for Error {
    fn from(err: TourError) -> Self {
        Self::Tour(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => Self::Io(e),
            ConfigError::Toml(e) => Self::Parse(e.to_string()),
            ConfigError::Json(e) => Self::Parse(e.to_string()),
            other @ ConfigError::Validation(_) => Self::Tour(TourError::Config(other)),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(feature = "web")]
impl From<wayfinder_web::StepParseError> for Error {
    fn from(err: wayfinder_web::StepParseError) -> Self {
        match err {
            wayfinder_web::StepParseError::Json(msg) => Self::Parse(msg),
        }
    }
}

/// Standard result type for Wayfinder APIs.
pub type Result<T> = std::result::Result<T, Error>;
