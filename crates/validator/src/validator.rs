//! Record validation
//!
//! The validator walks a schema alongside JSON data. Fields are visited in
//! declaration order; a field with rule text is evaluated, then a field with
//! a nested schema is descended into (an object, or each object of an
//! array). Failures are collected across the whole record; syntax errors and
//! rule misuse abort it.

use std::sync::Arc;

use serde_json::{Map, Value};
use tagrule_expression::context::value_kind;
use tagrule_expression::{ExecutionContext, Observer, RuleContext, RuleEngine, RuleRegistry, RuleResult};
use tracing::debug;

use crate::config::ValidatorConfig;
use crate::error::{FieldError, FieldErrors, RuleSyntaxError, SyntaxReport, ValidateError};
use crate::record::JsonRecord;
use crate::rules::default_rules;
use crate::schema::RecordSchema;

// ============================================================================
// VALIDATOR
// ============================================================================

/// Validates JSON records against the rule annotations of a schema
///
/// Cheap to share: parsed rules are cached inside, keyed by rule text.
#[derive(Debug)]
pub struct Validator {
    engine: RuleEngine,
    config: ValidatorConfig,
}

impl Validator {
    /// Validator with the built-in rules and default configuration
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a validator
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// The underlying rule engine
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Validate `data` against `schema`
    ///
    /// `data` is a record (object) or an array of records. Every rule is
    /// checked for syntax before any is run.
    pub fn validate(&self, schema: &RecordSchema, data: &Value) -> Result<(), ValidateError> {
        self.check_syntax(schema)?;

        let mut walk = Walk::new(self, true);
        walk.root(schema, data)?;
        debug!(
            fields = walk.evaluated,
            errors = walk.errors.len(),
            "Record validated"
        );

        if walk.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidateError::Invalid(walk.errors))
        }
    }

    /// Parse every rule in `schema`, reporting all syntax errors at once
    ///
    /// Paths in the report join display names with `.`; array positions are
    /// not known without data and are left out.
    pub fn check_syntax(&self, schema: &RecordSchema) -> Result<(), SyntaxReport> {
        let mut report = SyntaxReport::new();
        self.collect_syntax(schema, "", &mut report);
        if !report.is_empty() {
            debug!(errors = report.len(), "Schema has rule syntax errors");
        }
        report.into_result()
    }

    /// Check syntax, then run every rule against `sample` without collecting
    /// failures. Surfaces rules that cannot work on the fields they annotate.
    pub fn dry_run(&self, schema: &RecordSchema, sample: &Value) -> Result<(), ValidateError> {
        self.check_syntax(schema)?;
        Walk::new(self, false).root(schema, sample)
    }

    fn collect_syntax(&self, schema: &RecordSchema, prefix: &str, report: &mut SyntaxReport) {
        for field in schema.fields() {
            let path = join_path(prefix, field.display_name(&self.config.name_tag));
            if let Some(rule) = field.tag_value(&self.config.tag)
                && let Err(error) = self.engine.parse(rule)
            {
                report.push(RuleSyntaxError {
                    path: path.clone(),
                    rule: rule.to_string(),
                    error,
                });
            }
            if let Some(nested) = field.nested_schema() {
                self.collect_syntax(nested, &path, report);
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`Validator`]
///
/// Starts from the built-in rules; rules added here replace built-ins of the
/// same name.
pub struct ValidatorBuilder {
    config: ValidatorConfig,
    rules: RuleRegistry,
    observer: Option<Arc<dyn Observer>>,
}

impl ValidatorBuilder {
    /// Builder with the built-in rules and default configuration
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
            rules: default_rules(),
            observer: None,
        }
    }

    /// Replace the configuration
    #[must_use = "builder methods must be chained or built"]
    pub fn config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Add or replace one rule
    #[must_use = "builder methods must be chained or built"]
    pub fn rule<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        self.rules.register(name, rule);
        self
    }

    /// Merge a set of rules over the current ones
    #[must_use = "builder methods must be chained or built"]
    pub fn rules(mut self, overrides: &RuleRegistry) -> Self {
        self.rules.merge(overrides);
        self
    }

    /// Report parse and evaluation events to `observer`
    #[must_use = "builder methods must be chained or built"]
    pub fn observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the validator
    pub fn build(self) -> Validator {
        let mut engine = RuleEngine::new(self.rules).with_limits(self.config.limits);
        if let Some(observer) = self.observer {
            engine = engine.with_observer(observer);
        }
        Validator {
            engine,
            config: self.config,
        }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ValidatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorBuilder")
            .field("config", &self.config)
            .field("rules", &self.rules)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

// ============================================================================
// TRAVERSAL
// ============================================================================

/// One pass over a record
struct Walk<'v> {
    validator: &'v Validator,
    collect: bool,
    errors: FieldErrors,
    evaluated: usize,
}

impl<'v> Walk<'v> {
    fn new(validator: &'v Validator, collect: bool) -> Self {
        Self {
            validator,
            collect,
            errors: FieldErrors::new(),
            evaluated: 0,
        }
    }

    /// The top level must be a record or an array of them
    fn root(&mut self, schema: &RecordSchema, data: &Value) -> Result<(), ValidateError> {
        self.value(schema, data, "")
    }

    fn value(&mut self, schema: &RecordSchema, value: &Value, path: &str) -> Result<(), ValidateError> {
        match value {
            Value::Object(map) => self.record(schema, map, path),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_null() {
                        self.value(schema, item, &format!("{path}[{i}]"))?;
                    }
                }
                Ok(())
            }
            other => Err(ValidateError::NotARecord {
                path: path.to_string(),
                found: value_kind(other),
            }),
        }
    }

    fn record(
        &mut self,
        schema: &RecordSchema,
        map: &Map<String, Value>,
        prefix: &str,
    ) -> Result<(), ValidateError> {
        let validator = self.validator;
        let config = &validator.config;
        let record = JsonRecord::new(schema, map, &config.name_tag);

        for field in schema.fields() {
            let display = field.display_name(&config.name_tag);
            let path = join_path(prefix, display);

            if let Some(rule) = field.tag_value(&config.tag) {
                self.field(&record, field.name(), display, rule, &path)?;
            }

            if let Some(nested) = field.nested_schema() {
                let value = record.field_value(field);
                if !value.is_null() {
                    self.value(nested, value, &path)?;
                }
            }
        }
        Ok(())
    }

    fn field(
        &mut self,
        record: &JsonRecord<'_>,
        name: &str,
        display: &str,
        rule: &str,
        path: &str,
    ) -> Result<(), ValidateError> {
        let validator = self.validator;
        let tree = validator.engine.parse(rule).map_err(|error| RuleSyntaxError {
            path: path.to_string(),
            rule: rule.to_string(),
            error,
        })?;

        let ctx = ExecutionContext::new(name, record)
            .with_display_name(display)
            .with_locale(validator.config.locale.as_str());
        let outcome = validator
            .engine
            .execute(&tree, &ctx)
            .map_err(|source| ValidateError::Misuse {
                path: path.to_string(),
                source,
            })?;
        self.evaluated += 1;

        if self.collect {
            for failure in outcome.into_failures() {
                self.errors.push(FieldError::new(path, failure));
            }
        }
        Ok(())
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tagrule_expression::RuleError;

    fn user_schema() -> RecordSchema {
        RecordSchema::new()
            .field(FieldSchema::new("FirstName").json("firstName,omitempty").validate("name"))
            .field(FieldSchema::new("LastName").json("lastName,omitempty").validate("name"))
            .field(FieldSchema::new("EmailAddress").json("emailAddress,omitempty").validate("email"))
            .field(
                FieldSchema::new("PhoneNumber")
                    .json("phoneNumber,omitempty")
                    .validate("number:11,15"),
            )
    }

    #[test]
    fn test_collects_every_failure_in_order() {
        let err = Validator::new().validate(&user_schema(), &json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"["'firstName' must be a valid name","'lastName' must be a valid name","'emailAddress' must be a valid email address","'phoneNumber' must contain only numbers"]"#
        );
    }

    #[test]
    fn test_valid_record() {
        let data = json!({
            "firstName": "First",
            "lastName": "Last",
            "emailAddress": "email@address.com",
            "phoneNumber": "15551234567"
        });
        assert_eq!(Validator::new().validate(&user_schema(), &data), Ok(()));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "a"), "a");
        assert_eq!(join_path("a[0]", "b"), "a[0].b");
    }

    #[test]
    fn test_custom_rule_overrides_builtin() {
        let validator = Validator::builder()
            .rule("name", |ctx| {
                if ctx.value().as_str() == Some("ok") {
                    Ok(())
                } else {
                    Err(RuleError::fail("name", "custom name rule"))
                }
            })
            .build();
        let schema = RecordSchema::new().field(FieldSchema::new("n").validate("name"));

        assert_eq!(validator.validate(&schema, &json!({ "n": "ok" })), Ok(()));
        assert_eq!(
            validator
                .validate(&schema, &json!({ "n": "Ada" }))
                .unwrap_err()
                .to_string(),
            r#"["custom name rule"]"#
        );
    }

    #[test]
    fn test_configured_tags() {
        let validator = Validator::builder()
            .config(ValidatorConfig::default().with_tag("check").with_name_tag("label"))
            .build();
        let schema = RecordSchema::new().field(
            FieldSchema::new("zip")
                .tag("label", "Postal code")
                .tag("check", "required")
                .validate("email"),
        );
        let err = validator.validate(&schema, &json!({})).unwrap_err();
        assert_eq!(err.to_string(), r#"["'Postal code' is required"]"#);
    }
}
