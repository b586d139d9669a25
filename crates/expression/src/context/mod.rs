//! Execution context for rule evaluation
//!
//! The evaluator never inspects records itself. It reads fields through the
//! [`FieldAccess`] capability supplied by the host, wrapped in an
//! [`ExecutionContext`] for the field being validated. Each rule call then
//! sees a [`RuleContext`]: the execution context plus the parameters of that
//! one call.

use std::borrow::Cow;

use serde_json::Value;

use crate::error::RuleError;

static NULL: Value = Value::Null;

/// Read access to the fields of a record
///
/// `value` and `display_name` return `None` for names the record does not
/// declare. A declared field with no data reads as `Value::Null`.
pub trait FieldAccess {
    /// Current value of `field`
    fn value(&self, field: &str) -> Option<&Value>;

    /// Name used for `field` in messages; `None` if the field is unknown
    fn display_name(&self, field: &str) -> Option<Cow<'_, str>>;

    /// Whether `field` holds its zero value; `None` if the field is unknown
    fn is_empty(&self, field: &str) -> Option<bool> {
        self.value(field).map(is_zero_value)
    }
}

/// Check if a value is the zero value of its kind
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are zero values.
pub fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Human-readable name of a value's kind for diagnostics
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// EXECUTION CONTEXT
// ============================================================================

/// Per-field evaluation context
pub struct ExecutionContext<'a> {
    field: &'a str,
    display_name: Cow<'a, str>,
    record: &'a dyn FieldAccess,
    locale: Cow<'a, str>,
}

impl<'a> ExecutionContext<'a> {
    /// Create a context for `field` of `record`
    ///
    /// The display name defaults to what the record reports, falling back to
    /// the field name itself.
    pub fn new(field: &'a str, record: &'a dyn FieldAccess) -> Self {
        let display_name = record
            .display_name(field)
            .unwrap_or(Cow::Borrowed(field));
        Self {
            field,
            display_name,
            record,
            locale: Cow::Borrowed("en"),
        }
    }

    /// Override the display name
    #[must_use = "builder methods must be chained or built"]
    pub fn with_display_name(mut self, name: impl Into<Cow<'a, str>>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set the locale tag passed to rules
    #[must_use = "builder methods must be chained or built"]
    pub fn with_locale(mut self, locale: impl Into<Cow<'a, str>>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Field being validated
    pub fn field(&self) -> &'a str {
        self.field
    }

    /// Name of the field as shown in messages
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Locale tag
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The record being validated
    pub fn record(&self) -> &'a dyn FieldAccess {
        self.record
    }
}

impl std::fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("field", &self.field)
            .field("display_name", &self.display_name)
            .field("locale", &self.locale)
            .finish()
    }
}

// ============================================================================
// RULE CONTEXT
// ============================================================================

/// What a rule function sees: the field context plus this call's parameters
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    exec: &'a ExecutionContext<'a>,
    params: &'a [String],
}

impl<'a> RuleContext<'a> {
    /// Create a context for one rule call
    pub fn new(exec: &'a ExecutionContext<'a>, params: &'a [String]) -> Self {
        Self { exec, params }
    }

    /// Field being validated
    pub fn field(&self) -> &'a str {
        self.exec.field()
    }

    /// Display name of the field being validated
    pub fn display_name(&self) -> &'a str {
        self.exec.display_name()
    }

    /// Locale tag
    pub fn locale(&self) -> &'a str {
        self.exec.locale()
    }

    /// The record being validated
    pub fn record(&self) -> &'a dyn FieldAccess {
        self.exec.record()
    }

    /// Current value of the field; `null` when the record has none
    pub fn value(&self) -> &'a Value {
        self.exec.record().value(self.exec.field()).unwrap_or(&NULL)
    }

    /// Whether the field holds its zero value
    pub fn is_empty(&self) -> bool {
        is_zero_value(self.value())
    }

    /// Parameters of this call in their literal form
    pub fn params(&self) -> &'a [String] {
        self.params
    }

    /// Parameter `index` in its literal form
    pub fn param(&self, index: usize) -> Option<&'a str> {
        self.params.get(index).map(String::as_str)
    }

    /// Parameter `index` with surrounding quotes removed
    pub fn param_unquoted(&self, index: usize) -> Option<&'a str> {
        self.param(index).map(unquote)
    }

    /// Value of a sibling field named by a rule parameter
    ///
    /// An unknown sibling is a schema defect and reported as misuse.
    pub fn sibling(&self, name: &str) -> Result<&'a Value, RuleError> {
        self.exec
            .record()
            .value(name)
            .ok_or_else(|| unknown_field(name))
    }

    /// Whether a sibling field holds its zero value
    pub fn sibling_is_empty(&self, name: &str) -> Result<bool, RuleError> {
        self.exec
            .record()
            .is_empty(name)
            .ok_or_else(|| unknown_field(name))
    }

    /// Display name of a sibling field
    pub fn sibling_display_name(&self, name: &str) -> Result<Cow<'a, str>, RuleError> {
        self.exec
            .record()
            .display_name(name)
            .ok_or_else(|| unknown_field(name))
    }
}

fn unknown_field(name: &str) -> RuleError {
    RuleError::misuse(format!("'{name}' is not a valid field"))
}

/// Strip one pair of matching single or double quotes
pub fn unquote(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}
