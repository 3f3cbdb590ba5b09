//! Diff errors.

use crate::fieldpath::FieldName;
use thiserror::Error;

/// DiffError aborts a whole diff pass; partial results are never returned
/// alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// The diff policy itself is wrong. Always a programming error.
    #[error("{path}: invalid diff configuration: {message}")]
    Configuration { path: String, message: String },

    #[error("{path}: type mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

impl DiffError {
    /// Creates a configuration error.
    pub fn configuration(path: &FieldName, message: impl Into<String>) -> Self {
        DiffError::Configuration {
            path: render(path),
            message: message.into(),
        }
    }

    /// Creates a shape mismatch error.
    pub fn shape_mismatch(
        path: &FieldName,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        DiffError::ShapeMismatch {
            path: render(path),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns true for the programming-error class.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DiffError::Configuration { .. })
    }
}

fn render(path: &FieldName) -> String {
    if path.is_empty() {
        "<resource>".to_string()
    } else {
        path.to_string()
    }
}
