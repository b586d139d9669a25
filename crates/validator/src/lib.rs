#![warn(missing_docs)]
//! # tagrule-validator
//!
//! Validates JSON records against rule expressions attached to the fields
//! of a schema, the way struct tags drive validation elsewhere.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use tagrule_validator::prelude::*;
//!
//! let schema = RecordSchema::new()
//!     .field(FieldSchema::new("Email").json("email").validate("required & email"))
//!     .field(FieldSchema::new("Phone").json("phone").validate("empty | number:11,15"));
//!
//! let validator = Validator::new();
//! assert!(validator.validate(&schema, &json!({ "email": "ada@example.com" })).is_ok());
//!
//! let err = validator.validate(&schema, &json!({ "phone": "12" })).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     r#"["'email' is required","'phone' must be 11 to 15 digits"]"#
//! );
//! ```
//!
//! ## Rules
//!
//! Rule text combines named rules with `&` and `|` and groups with
//! parentheses; see [`tagrule_expression`] for the grammar and [`rules`] for
//! the built-in rule set. Custom rules are added through
//! [`ValidatorBuilder::rule`].
//!
//! ## Errors
//!
//! [`ValidateError::Invalid`] carries the failures users should see. The
//! other variants mean the schema is wrong: rule text that does not parse,
//! or a rule applied to a field it cannot handle. [`Validator::check_syntax`]
//! and [`Validator::dry_run`] find those ahead of time.

pub mod config;
pub mod error;
pub mod prelude;
pub mod record;
pub mod rules;
pub mod schema;
pub mod validator;

pub use config::ValidatorConfig;
pub use error::{FieldError, FieldErrors, RuleSyntaxError, SyntaxReport, ValidateError};
pub use record::JsonRecord;
pub use rules::default_rules;
pub use schema::{FieldSchema, RecordSchema};
pub use validator::{Validator, ValidatorBuilder};
