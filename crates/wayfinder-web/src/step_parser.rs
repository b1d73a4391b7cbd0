#![forbid(unsafe_code)]

//! JSON step parsing for host embeddings.
//!
//! [`parse_steps_json`] accepts the raw JSON an embedding passes across the
//! host boundary (a single step record or an array of them) and builds a
//! [`StepRegistry`]. Only unparseable JSON is an error; structurally invalid
//! steps are excluded and returned as issues, matching the registry's
//! never-fatal contract.

use wayfinder_core::{StepError, StepRegistry};

/// Errors from parsing step JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepParseError {
    /// Malformed JSON.
    Json(String),
}

impl core::fmt::Display for StepParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
        }
    }
}

impl std::error::Error for StepParseError {}

/// Parse a step record or array of records.
///
/// Returns the registry of valid steps and `(input_index, error)` for every
/// excluded entry.
pub fn parse_steps_json(
    input: &str,
) -> Result<(StepRegistry, Vec<(usize, StepError)>), StepParseError> {
    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|e| StepParseError::Json(e.to_string()))?;
    let (registry, issues) = StepRegistry::from_value(&value);
    tracing::debug!(
        target: "wayfinder.registry",
        valid = registry.len(),
        excluded = issues.len(),
        "parsed steps"
    );
    Ok((registry, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wayfinder_core::AnchorRule;

    #[test]
    fn parses_array() {
        let (registry, issues) = parse_steps_json(
            r##"[
                {"selector": "#a", "position": "right", "title": "Hello"},
                {"selector": "#b", "allowClicksThruHole": true}
            ]"##,
        )
        .unwrap();
        assert!(issues.is_empty());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).unwrap().position, AnchorRule::Right);
        assert_eq!(registry.get(0).unwrap().title.as_deref(), Some("Hello"));
        assert!(registry.get(1).unwrap().allow_clicks_thru_hole);
    }

    #[test]
    fn parses_single_record() {
        let (registry, _) = parse_steps_json(r##"{"selector": ".intro"}"##).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn invalid_steps_are_issues_not_errors() {
        let (registry, issues) =
            parse_steps_json(r##"[{"selector": "#a"}, {"title": "no selector"}, 7]"##).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            issues,
            vec![(1, StepError::MissingSelector), (2, StepError::NotARecord)]
        );
    }

    #[test]
    fn malformed_json_is_error() {
        let err = parse_steps_json("[{").unwrap_err();
        assert!(matches!(err, StepParseError::Json(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
    }
}
