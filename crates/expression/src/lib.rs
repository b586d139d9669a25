#![warn(clippy::all)]
#![warn(missing_docs)]
//! # tagrule-expression
//!
//! Boolean rule expressions over record fields.
//!
//! A rule string such as `required & (email | eq:'n/a')` names registered
//! rule functions, optionally with parameters, and combines them with `&`
//! and `|`. Strings are parsed once into a [`RuleTree`] and cached by exact
//! text; trees are then evaluated against one field of a record at a time.
//!
//! - Rule calls: `name` or `name:param1,param2`
//! - Parameters: numbers (`12`, `-1.5e3`, `0x1F`), booleans, quoted strings
//! - Operators: `&` (and), `|` (or), left-associative, equal precedence
//! - Grouping: `( ... )`
//! - Evaluation short-circuits left to right; `|` reports only the failures
//!   of its right operand
//!
//! The evaluator reads records only through [`FieldAccess`], implemented by
//! the host.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::borrow::Cow;
//! use serde_json::{Value, json};
//! use tagrule_expression::prelude::*;
//!
//! struct Age(Value);
//!
//! impl FieldAccess for Age {
//!     fn value(&self, field: &str) -> Option<&Value> {
//!         (field == "age").then_some(&self.0)
//!     }
//!
//!     fn display_name(&self, field: &str) -> Option<Cow<'_, str>> {
//!         (field == "age").then_some(Cow::Borrowed("age"))
//!     }
//! }
//!
//! let registry = RuleRegistry::new().with("adult", |ctx| match ctx.value().as_u64() {
//!     Some(years) if years >= 18 => Ok(()),
//!     _ => Err(RuleError::fail("adult", format!("'{}' must be 18 or older", ctx.display_name()))),
//! });
//! let engine = RuleEngine::new(registry);
//!
//! let record = Age(json!(12));
//! let ctx = ExecutionContext::new("age", &record);
//! let outcome = engine.evaluate("adult", &ctx).unwrap();
//! assert_eq!(outcome.messages(), ["'age' must be 18 or older"]);
//! ```

pub mod cache;
pub mod context;
pub mod core;
pub mod engine;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod observer;
pub mod parser;
pub mod registry;

// Re-exports
pub use cache::{CacheStats, ParseCache};
pub use context::{ExecutionContext, FieldAccess, RuleContext};
pub use crate::core::ast::{Node, Operator, Params, RuleCall, RuleTree};
pub use crate::core::span::Span;
pub use crate::core::token::{Token, TokenKind};
pub use engine::RuleEngine;
pub use error::{
    ExpressionError, ExpressionResult, Failure, ParseResult, RuleError, RuleResult, SyntaxError,
    UsageError,
};
pub use eval::{Evaluator, Outcome};
pub use lexer::Lexer;
pub use observer::{NoopObserver, Observer, TracingObserver};
pub use parser::{ParseLimits, Parser, parse};
pub use registry::{RuleFn, RuleRegistry, rule_fn};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ExecutionContext, ExpressionError, ExpressionResult, Failure, FieldAccess, Observer,
        Outcome, ParseLimits, RuleContext, RuleEngine, RuleError, RuleFn, RuleRegistry,
        RuleResult, RuleTree, SyntaxError, TracingObserver, UsageError, rule_fn,
    };
}
