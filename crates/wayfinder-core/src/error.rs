#![forbid(unsafe_code)]

//! Step validation errors.

use std::fmt;

/// Why a raw step record (or sequence) was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    /// The value is not a plain record (array, null, scalar).
    NotARecord,
    /// The record has no `selector` field.
    MissingSelector,
    /// `selector` is present but not a string.
    SelectorNotString,
    /// `selector` is an empty (or whitespace-only) string.
    EmptySelector,
    /// A sequence of steps was empty.
    EmptySequence,
    /// The record passed validation but its fields failed to deserialize.
    Malformed(String),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARecord => write!(f, "step is not a plain record"),
            Self::MissingSelector => write!(f, "step has no selector"),
            Self::SelectorNotString => write!(f, "step selector is not a string"),
            Self::EmptySelector => write!(f, "step selector is empty"),
            Self::EmptySequence => write!(f, "step sequence is empty"),
            Self::Malformed(msg) => write!(f, "step is malformed: {msg}"),
        }
    }
}

impl std::error::Error for StepError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert!(StepError::EmptySelector.to_string().contains("empty"));
        assert!(
            StepError::Malformed("bad position".into())
                .to_string()
                .contains("bad position")
        );
    }
}
