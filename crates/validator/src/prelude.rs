//! Prelude module for convenient imports.
//!
//! ```rust
//! use tagrule_validator::prelude::*;
//!
//! let validator = Validator::builder()
//!     .rule("even", |ctx| match ctx.value().as_i64() {
//!         Some(n) if n % 2 == 0 => Ok(()),
//!         _ => Err(RuleError::fail("even", format!("'{}' must be even", ctx.display_name()))),
//!     })
//!     .build();
//! # let _ = validator;
//! ```

// ============================================================================
// VALIDATION: schema, validator, output
// ============================================================================

pub use crate::{
    FieldError, FieldErrors, FieldSchema, RecordSchema, SyntaxReport, ValidateError, Validator,
    ValidatorBuilder, ValidatorConfig, default_rules,
};

// ============================================================================
// RULES: what custom rules are written against
// ============================================================================

pub use tagrule_expression::{
    Failure, FieldAccess, Observer, RuleContext, RuleError, RuleRegistry, RuleResult,
    TracingObserver,
};
