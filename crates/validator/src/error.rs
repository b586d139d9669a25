//! Validation output and errors
//!
//! [`FieldErrors`] is data: the ordered failures of a record, meant for the
//! people who filled it in. [`ValidateError`] wraps it alongside the errors
//! that mean the schema itself is wrong.

use std::fmt;

use serde::Serialize;
use tagrule_expression::{Failure, SyntaxError, UsageError};
use thiserror::Error;

// ============================================================================
// FIELD ERRORS
// ============================================================================

/// One failure, located by path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path of display names, e.g. `items[1].name`
    pub path: String,
    /// Code of the rule that failed
    pub code: String,
    /// Message as reported by the rule
    pub message: String,
}

impl FieldError {
    /// Locate a rule failure at `path`
    pub fn new(path: impl Into<String>, failure: Failure) -> Self {
        Self {
            path: path.into(),
            code: failure.code.into_owned(),
            message: failure.message.into_owned(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Every failure in a record, in traversal order
///
/// Displays as a JSON array of messages:
/// `["'firstName' must be a valid name","'email' is required"]`.
/// Serializes with full detail (`path`, `code`, `message` per entry).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error
    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    /// Number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if there are no errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages in order
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    /// Errors whose path is exactly `path`
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path == path)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.messages()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl std::error::Error for FieldErrors {}

impl FromIterator<FieldError> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// ============================================================================
// SYNTAX REPORT
// ============================================================================

/// A field whose rule text does not parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path}: {error} in rule \"{rule}\"")]
pub struct RuleSyntaxError {
    /// Schema path of the field
    pub path: String,
    /// The rule text
    pub rule: String,
    /// What the parser rejected
    #[source]
    pub error: SyntaxError,
}

/// Every syntax error in a schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxReport {
    errors: Vec<RuleSyntaxError>,
}

impl SyntaxReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a syntax error
    pub fn push(&mut self, error: RuleSyntaxError) {
        self.errors.push(error);
    }

    /// Reported errors in schema order
    pub fn errors(&self) -> &[RuleSyntaxError] {
        &self.errors
    }

    /// Number of errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check if the schema parsed cleanly
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when empty
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for SyntaxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxReport {}

// ============================================================================
// VALIDATE ERROR
// ============================================================================

/// Why a record did not validate
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidateError {
    /// The record broke one or more rules
    #[error("{0}")]
    Invalid(FieldErrors),

    /// Rule text in the schema does not parse
    #[error("{0}")]
    Syntax(SyntaxReport),

    /// A rule was applied to a field it cannot handle
    #[error("{path}: {source}")]
    Misuse {
        /// Path of the field being validated
        path: String,
        /// The rule's complaint
        source: UsageError,
    },

    /// A value the schema describes as a record is something else
    #[error("expected an object at {}, found {found}", describe_path(.path))]
    NotARecord {
        /// Where the value was found; empty for the root
        path: String,
        /// Kind of value found
        found: &'static str,
    },
}

impl ValidateError {
    /// Get error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "VALIDATE:INVALID",
            Self::Syntax(_) => "VALIDATE:SYNTAX",
            Self::Misuse { .. } => "VALIDATE:MISUSE",
            Self::NotARecord { .. } => "VALIDATE:NOT_A_RECORD",
        }
    }

    /// Failures, when this is a plain validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }

    /// Check if the record itself is at fault rather than the schema
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<SyntaxReport> for ValidateError {
    fn from(report: SyntaxReport) -> Self {
        Self::Syntax(report)
    }
}

impl From<RuleSyntaxError> for ValidateError {
    fn from(error: RuleSyntaxError) -> Self {
        Self::Syntax(SyntaxReport {
            errors: vec![error],
        })
    }
}

fn describe_path(path: &str) -> String {
    if path.is_empty() {
        "the root".to_string()
    } else {
        format!("'{path}'")
    }
}
