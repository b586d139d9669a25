//! Parse and evaluation hooks
//!
//! The parser and evaluator report what they do to an [`Observer`] handed to
//! them at construction. [`NoopObserver`] is the default; [`TracingObserver`]
//! forwards every hook to `tracing`.

use tracing::{debug, trace};

use crate::core::ast::{RuleCall, RuleTree};
use crate::core::token::Token;
use crate::error::{RuleResult, SyntaxError};

/// Receives parser and evaluator events
///
/// Every hook has an empty default body, so implementors override only what
/// they need.
pub trait Observer: Send + Sync {
    /// A token was pulled from the lexer
    fn on_token(&self, _token: &Token<'_>) {}

    /// A rule string parsed successfully
    fn on_parsed(&self, _tree: &RuleTree) {}

    /// A rule string failed to parse
    fn on_syntax_error(&self, _source: &str, _error: &SyntaxError) {}

    /// A rule function returned
    fn on_rule(&self, _call: &RuleCall, _field: &str, _result: &RuleResult) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Observer that emits `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_token(&self, token: &Token<'_>) {
        trace!(kind = %token.kind, text = %token.text, offset = token.offset(), "token");
    }

    fn on_parsed(&self, tree: &RuleTree) {
        debug!(rule = tree.source(), shape = %tree, calls = tree.rule_count(), "rule parsed");
    }

    fn on_syntax_error(&self, source: &str, error: &SyntaxError) {
        debug!(rule = source, offset = error.offset(), code = error.code(), %error, "rule rejected");
    }

    fn on_rule(&self, call: &RuleCall, field: &str, result: &RuleResult) {
        let outcome = match result {
            Ok(()) => "passed",
            Err(err) if err.is_misuse() => "misused",
            Err(_) => "failed",
        };
        trace!(rule = %call, field, outcome, "rule evaluated");
    }
}
