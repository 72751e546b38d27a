//! Error types for editor operations.

use shared::{ObjectId, ShapeError};
use thiserror::Error;

/// Result type alias for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur while editing or (de)serializing a scene.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Scene document failed structural validation.
    #[error("invalid scene document: {0}")]
    InvalidDocument(String),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Shape parameters could not be decoded.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// No object with this id exists in the scene.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    /// The transform gizmo collaborator is not ready.
    #[error("transform gizmo unavailable: {0}")]
    GizmoUnavailable(String),

    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Create an invalid document error.
    #[must_use]
    pub fn invalid_document(details: impl Into<String>) -> Self {
        Self::InvalidDocument(details.into())
    }

    /// Create a gizmo unavailable error.
    #[must_use]
    pub fn gizmo_unavailable(details: impl Into<String>) -> Self {
        Self::GizmoUnavailable(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EditorError::invalid_document("objects is not an array");
        assert!(format!("{err}").contains("objects is not an array"));

        let err = EditorError::ObjectNotFound("abc".to_string());
        assert!(format!("{err}").contains("abc"));

        let err: EditorError = ShapeError::UnknownType("torus".to_string()).into();
        assert!(format!("{err}").contains("torus"));
    }
}
