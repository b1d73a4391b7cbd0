#![forbid(unsafe_code)]

//! Tour configuration as data.
//!
//! [`TourConfig`] collects every recognised option in one serializable struct
//! so a tour can be configured from a TOML or JSON file without code changes.
//! Missing fields fall back to defaults, and [`TourConfig::validate`] reports
//! every out-of-range value at once.
//!
//! # Example (TOML)
//!
//! ```toml
//! run = true
//! autostart = true
//! mode = "continuous"
//! buttons = "BACK | SKIP | PROGRESS"
//!
//! [resize]
//! debounce = true
//! delay_ms = 200
//!
//! [scroll]
//! policy = "first-step-only"
//! offset = 40.0
//!
//! [locale]
//! next = "Weiter"
//! ```

use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use wayfinder_layout::{PlacementConfig, ScrollPolicy};

/// How popups advance through the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Each popup only closes; the next marker appears.
    #[default]
    Single,
    /// Popups chain with Next/Back and keyboard navigation.
    Continuous,
    /// Next opens the following marker rather than its popup.
    Guided,
}

bitflags! {
    /// Optional popup buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ButtonFlags: u8 {
        const BACK = 1 << 0;
        const SKIP = 1 << 1;
        const PROGRESS = 1 << 2;
    }
}

impl Default for ButtonFlags {
    fn default() -> Self {
        Self::BACK
    }
}

/// Resize handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Collapse resize bursts into one trailing recomputation.
    pub debounce: bool,
    /// Quiet period before the trailing recomputation.
    pub delay_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            debounce: false,
            delay_ms: 200,
        }
    }
}

/// Scroll-on-step-change handling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub policy: ScrollPolicy,
    /// Space kept above the scrolled-to element.
    pub offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            policy: ScrollPolicy::EveryStep,
            offset: 20.0,
        }
    }
}

/// Button labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locale {
    pub back: String,
    pub close: String,
    pub last: String,
    pub next: String,
    pub skip: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            back: "Back".into(),
            close: "Close".into(),
            last: "Last".into(),
            next: "Next".into(),
            skip: "Skip".into(),
        }
    }
}

/// Overlay and spotlight hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Dim the page behind an open popup.
    pub show: bool,
    /// Clicking the overlay closes the popup back to its marker.
    pub close_on_click: bool,
    /// Let clicks inside the hole reach the target for every step.
    pub allow_clicks_thru_hole: bool,
    /// Space between the target and the hole edge.
    pub hole_padding: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            show: true,
            close_on_click: false,
            allow_clicks_thru_hole: false,
            hole_padding: 5.0,
        }
    }
}

/// Complete tour configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Start the tour when the controller is mounted.
    pub run: bool,
    /// Open the popup immediately instead of showing the marker.
    pub autostart: bool,
    /// Index the tour starts from.
    pub start_index: usize,
    pub mode: DisplayMode,
    /// Bind Escape/Tab/Space/Enter in continuous mode.
    pub keyboard_navigation: bool,
    pub resize: ResizeConfig,
    pub scroll: ScrollConfig,
    /// Selector of the coordinate-space ancestor; `None` means the body.
    pub offset_parent: Option<String>,
    pub buttons: ButtonFlags,
    pub locale: Locale,
    pub overlay: OverlayConfig,
    pub placement: PlacementConfig,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            run: false,
            autostart: false,
            start_index: 0,
            mode: DisplayMode::Single,
            keyboard_navigation: true,
            resize: ResizeConfig::default(),
            scroll: ScrollConfig::default(),
            offset_parent: None,
            buttons: ButtonFlags::default(),
            locale: Locale::default(),
            overlay: OverlayConfig::default(),
            placement: PlacementConfig::default(),
        }
    }
}

impl TourConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all values are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.resize.debounce && self.resize.delay_ms == 0 {
            errors.push("resize.delay_ms must be > 0 when resize.debounce is set".into());
        }

        if !self.scroll.offset.is_finite() || self.scroll.offset < 0.0 {
            errors.push(format!(
                "scroll.offset must be finite and >= 0, got {}",
                self.scroll.offset
            ));
        }

        if let Some(parent) = &self.offset_parent
            && parent.trim().is_empty()
        {
            errors.push("offset_parent must not be blank".into());
        }

        let p = &self.placement;
        for (name, size) in [("popup_size", p.popup_size), ("marker_size", p.marker_size)] {
            if !(size.width > 0.0 && size.height > 0.0) {
                errors.push(format!(
                    "placement.{name} must be positive, got {}x{}",
                    size.width, size.height
                ));
            }
        }
        if !p.padding.is_finite() || p.padding < 0.0 {
            errors.push(format!("placement.padding must be >= 0, got {}", p.padding));
        }

        if !self.overlay.hole_padding.is_finite() || self.overlay.hole_padding < 0.0 {
            errors.push(format!(
                "overlay.hole_padding must be >= 0, got {}",
                self.overlay.hole_padding
            ));
        }

        let l = &self.locale;
        for (name, label) in [
            ("back", &l.back),
            ("close", &l.close),
            ("last", &l.last),
            ("next", &l.next),
            ("skip", &l.skip),
        ] {
            if label.trim().is_empty() {
                errors.push(format!("locale.{name} must not be empty"));
            }
        }

        errors
    }

    /// Parse and validate in one step.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`TourConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
