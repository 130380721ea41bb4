//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Message for a missing required field
pub const REQUIRED: &str = "This field is required.";

/// Message for an explicit `null`
pub const NULL: &str = "This field may not be null.";

/// Message for a blank text field
pub const BLANK: &str = "This field may not be blank.";

/// Message for an unknown choice in a filter
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Validation messages collected per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Turn collected messages into an error, if there are any
    pub fn check(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Domain-specific errors
///
/// These errors describe rejected input. They are independent of the
/// web/infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// One or more payload fields failed validation
    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    /// A single date query parameter is malformed
    #[error("{0} parameter should be in format YYYY-MM-DD")]
    InvalidDateParameter(&'static str),

    /// Date range parameters are incomplete or malformed
    #[error("'start' and 'end' parameters should be passed both and have format YYYY-MM-DD")]
    InvalidDateRange,
}

impl DomainError {
    /// Create a validation error for a single field
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    /// Field-level messages, when this is a validation error
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
