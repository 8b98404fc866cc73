//! Load-time error taxonomy
//!
//! Two severities, neither fatal to the process:
//! - `LoadError`: the whole payload is unusable. The load returns `Err` and
//!   the previously rendered frame stays untouched.
//! - `RecordError`: one record is unusable or collides with another. The
//!   record is dropped, the rest of the load proceeds, and the error is
//!   collected into the load outcome for the host to report.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// LoadError
// =============================================================================

/// Payload-level failure: invalid JSON or an unrecognized top-level shape
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The payload text is not valid JSON
    Parse(String),
    /// Valid JSON, but neither a record array nor a `{bookendYears, alignments}` envelope
    UnexpectedShape(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(msg) => write!(f, "Payload parse failed: {}", msg),
            LoadError::UnexpectedShape(msg) => write!(f, "Unexpected payload shape: {}", msg),
        }
    }
}

impl std::error::Error for LoadError {}

// =============================================================================
// RecordError
// =============================================================================

/// Per-record failure collected during a load (non-fatal)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordError {
    /// A required field is missing or has an unusable value; the record is dropped
    #[serde(rename_all = "camelCase")]
    MalformedRecord { index: usize, field: String },
    /// Two records collide under the identity key; the first occurrence wins
    #[serde(rename_all = "camelCase")]
    DuplicateKey { key: String },
}

impl RecordError {
    pub fn malformed(index: usize, field: &str) -> Self {
        RecordError::MalformedRecord {
            index,
            field: field.to_string(),
        }
    }

    pub fn duplicate(key: impl fmt::Display) -> Self {
        RecordError::DuplicateKey {
            key: key.to_string(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::MalformedRecord { index, field } => {
                write!(f, "Record {} is missing required field '{}'", index, field)
            }
            RecordError::DuplicateKey { key } => {
                write!(f, "Duplicate identity key: {}", key)
            }
        }
    }
}

impl std::error::Error for RecordError {}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_the_field() {
        let err = RecordError::malformed(3, "similarity");
        assert_eq!(
            err.to_string(),
            "Record 3 is missing required field 'similarity'"
        );
    }

    #[test]
    fn test_duplicate_display_carries_the_key() {
        let err = RecordError::duplicate("1~2@0.8000");
        assert_eq!(err.to_string(), "Duplicate identity key: 1~2@0.8000");
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::Parse("EOF while parsing a value".to_string());
        assert!(err.to_string().starts_with("Payload parse failed"));
    }
}
