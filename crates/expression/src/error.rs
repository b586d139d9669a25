//! Error types for rule parsing and evaluation
//!
//! Three classes never mix:
//!
//! - [`SyntaxError`]: the rule text is malformed. Every variant carries the
//!   byte offset of the offending token.
//! - [`Failure`]: a rule legitimately rejected a value. Failures are data,
//!   collected into an [`Outcome`](crate::Outcome) rather than raised.
//! - [`UsageError`]: a rule was applied where it cannot work (wrong value
//!   type, unknown sibling field). This is a defect in the schema.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SYNTAX ERROR
// ============================================================================

/// Malformed rule text
///
/// `offset` is always a byte offset into the rule string.
#[non_exhaustive]
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The lexer rejected the input
    #[error("{message}")]
    Lex { message: String, offset: usize },

    /// `&` or `|` without a right operand
    #[error("dangling operator '{operator}' at {offset}")]
    DanglingOperator { operator: char, offset: usize },

    /// Operator where an operand was expected
    #[error("duplicate operator '{operator}' at {offset}")]
    DuplicateOperator { operator: char, offset: usize },

    /// Token that cannot start or continue an expression
    #[error("bad '{token}' at {offset}")]
    UnexpectedToken { token: String, offset: usize },

    /// Rule call directly after a complete operand
    #[error("unexpected rule '{name}' at {offset}, missing '&' or '|'")]
    UnexpectedFunction { name: String, offset: usize },

    /// `(` directly after a complete operand
    #[error("missing operator before '(' at {offset}")]
    MissingOperator { offset: usize },

    /// `()` with nothing inside
    #[error("empty parentheses at {offset}")]
    EmptyGroup { offset: usize },

    /// Name not present in the rule registry
    #[error("'{name}' is not a valid rule")]
    UnknownRule { name: String, offset: usize },

    /// Non-literal where a rule parameter was expected
    #[error("'{token}' is not a function parameter at {offset}")]
    BadParameter { token: String, offset: usize },

    /// Two parameters without a comma between them
    #[error("missing ',' before '{token}' at {offset}")]
    MissingComma { token: String, offset: usize },

    /// Parentheses nested past the configured limit
    #[error("parentheses nested deeper than {limit} at {offset}")]
    TooDeep { limit: usize, offset: usize },

    /// More rule calls than the configured limit
    #[error("more than {limit} rule calls at {offset}")]
    TooManyTerms { limit: usize, offset: usize },
}

impl SyntaxError {
    /// Byte offset of the offending token
    pub fn offset(&self) -> usize {
        match self {
            Self::Lex { offset, .. }
            | Self::DanglingOperator { offset, .. }
            | Self::DuplicateOperator { offset, .. }
            | Self::UnexpectedToken { offset, .. }
            | Self::UnexpectedFunction { offset, .. }
            | Self::MissingOperator { offset }
            | Self::EmptyGroup { offset }
            | Self::UnknownRule { offset, .. }
            | Self::BadParameter { offset, .. }
            | Self::MissingComma { offset, .. }
            | Self::TooDeep { offset, .. }
            | Self::TooManyTerms { offset, .. } => *offset,
        }
    }

    /// Get error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            Self::Lex { .. } => "RULE:LEX",
            Self::DanglingOperator { .. } => "RULE:DANGLING_OPERATOR",
            Self::DuplicateOperator { .. } => "RULE:DUPLICATE_OPERATOR",
            Self::UnexpectedToken { .. } => "RULE:UNEXPECTED_TOKEN",
            Self::UnexpectedFunction { .. } => "RULE:UNEXPECTED_FUNCTION",
            Self::MissingOperator { .. } => "RULE:MISSING_OPERATOR",
            Self::EmptyGroup { .. } => "RULE:EMPTY_GROUP",
            Self::UnknownRule { .. } => "RULE:UNKNOWN_RULE",
            Self::BadParameter { .. } => "RULE:BAD_PARAMETER",
            Self::MissingComma { .. } => "RULE:MISSING_COMMA",
            Self::TooDeep { .. } => "RULE:TOO_DEEP",
            Self::TooManyTerms { .. } => "RULE:TOO_MANY_TERMS",
        }
    }
}

// ============================================================================
// FAILURE
// ============================================================================

/// One validation failure reported by a rule.
///
/// Uses `Cow<'static, str>` so static codes never allocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Stable code for programmatic handling, e.g. `"required"`
    pub code: Cow<'static, str>,
    /// Human-readable message
    pub message: Cow<'static, str>,
}

impl Failure {
    /// Create a failure with a code and message
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Failure {}

// ============================================================================
// RULE ERROR
// ============================================================================

/// What a rule function returns when it does not pass
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The value was rejected
    #[error("{0}")]
    Failed(Failure),

    /// The value was rejected for several reasons; flattened by the evaluator
    #[error("{} failures", .0.len())]
    Many(Vec<Failure>),

    /// The rule cannot be applied here; aborts validation of the record
    #[error("{0}")]
    Misuse(String),
}

impl RuleError {
    /// Create a single failure
    pub fn fail(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Failed(Failure::new(code, message))
    }

    /// Create a misuse error
    pub fn misuse(message: impl Into<String>) -> Self {
        Self::Misuse(message.into())
    }

    /// Check if this is a programmer error rather than a validation failure
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::Misuse(_))
    }
}

impl From<Failure> for RuleError {
    fn from(failure: Failure) -> Self {
        Self::Failed(failure)
    }
}

/// Result of running a single rule
pub type RuleResult = Result<(), RuleError>;

// ============================================================================
// USAGE ERROR
// ============================================================================

/// A rule was applied to a field it cannot handle
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rule '{rule}' on field '{field}': {message}")]
pub struct UsageError {
    /// Rule that reported the misuse
    pub rule: String,
    /// Field being validated
    pub field: String,
    /// What went wrong
    pub message: String,
}

impl UsageError {
    /// Create a usage error
    pub fn new(
        rule: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// EXPRESSION ERROR
// ============================================================================

/// Parse-or-execute error returned by [`RuleEngine::evaluate`](crate::RuleEngine::evaluate)
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    /// Rule text did not parse
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A rule was misused while executing
    #[error(transparent)]
    Usage(#[from] UsageError),
}

impl ExpressionError {
    /// Get error code for categorization
    pub fn code(&self) -> &'static str {
        match self {
            Self::Syntax(err) => err.code(),
            Self::Usage(_) => "RULE:USAGE",
        }
    }
}

/// Result type for parsing
pub type ParseResult<T> = Result<T, SyntaxError>;

/// Result type for parse-and-execute
pub type ExpressionResult<T> = Result<T, ExpressionError>;
