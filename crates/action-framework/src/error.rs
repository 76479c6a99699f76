//! # Framework Errors
//!
//! This module defines the common error types used throughout the action framework.
//! By centralizing error definitions, every service, collection and client reports
//! failures the same way, and the HTTP gateway only has to map one enum to status codes.

use serde::Serialize;
use std::fmt;

/// The rule a parameter violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    Required,
    String,
    Email,
    Number,
    Boolean,
    Empty,
    MinLength,
    MaxLength,
}

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

/// Every violation found while validating one parameter bag.
///
/// The validator collects all of them instead of stopping at the first, so a
/// client gets the complete list in a single response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns true if any violation names `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StorageError {
    /// A unique field already holds this value in another document. The value is
    /// kept out of the message.
    #[error("Duplicate value for unique field '{field}'")]
    Conflict { field: String, value: String },
    /// The backend could not be reached (closed actor, dropped connection, ...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// The field a conflict is about, without the offending value.
    pub fn conflict_field(&self) -> Option<&str> {
        match self {
            StorageError::Conflict { field, .. } => Some(field),
            StorageError::Unavailable(_) => None,
        }
    }
}

/// Errors that can occur while dispatching an action.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Parameters validation error: {0}")]
    Validation(ValidationErrors),
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("No route for {method} {path}")]
    NoRoute { method: String, path: String },
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FrameworkError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        FrameworkError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<ValidationErrors> for FrameworkError {
    fn from(errors: ValidationErrors) -> Self {
        FrameworkError::Validation(errors)
    }
}

impl From<StorageError> for FrameworkError {
    fn from(e: StorageError) -> Self {
        match e {
            conflict @ StorageError::Conflict { .. } => {
                FrameworkError::Conflict(conflict.to_string())
            }
            StorageError::Unavailable(reason) => FrameworkError::StorageUnavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_conflict_maps_to_conflict() {
        let err: FrameworkError = StorageError::Conflict {
            field: "email".into(),
            value: "a@b.io".into(),
        }
        .into();
        assert_eq!(
            err,
            FrameworkError::Conflict("Duplicate value for unique field 'email'".into())
        );
    }

    #[test]
    fn test_conflict_field_omits_value() {
        let err = StorageError::Conflict {
            field: "email".into(),
            value: "a@b.io".into(),
        };
        assert_eq!(err.conflict_field(), Some("email"));
        assert_eq!(StorageError::Unavailable("closed".into()).conflict_field(), None);
    }

    #[test]
    fn test_validation_errors_display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::new("name", Rule::Required, "name is required"));
        errors.push(ValidationError::new("city", Rule::Required, "city is required"));
        assert_eq!(errors.to_string(), "name is required; city is required");
        assert!(errors.has_field("city"));
        assert!(!errors.has_field("zip"));
    }
}
