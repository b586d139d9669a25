//! Rule tree evaluation
//!
//! Evaluation is strict left-to-right and depth-first. `&` stops at the first
//! failing operand; `|` stops at the first passing one and otherwise reports
//! only its right operand's failures.

use std::sync::Arc;

use crate::context::{ExecutionContext, RuleContext};
use crate::core::ast::{Node, RuleCall, RuleTree};
use crate::error::{Failure, RuleError, UsageError};
use crate::observer::{NoopObserver, Observer};

/// Result of evaluating a rule tree against one field
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every required rule passed
    Passed,
    /// Leaf failures in the order they were produced, never empty
    Failed(Vec<Failure>),
}

impl Outcome {
    /// Check if evaluation passed
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if evaluation failed
    pub fn is_failed(&self) -> bool {
        !self.is_passed()
    }

    /// Failures, empty when passed
    pub fn failures(&self) -> &[Failure] {
        match self {
            Self::Passed => &[],
            Self::Failed(failures) => failures,
        }
    }

    /// Consume into the failure list
    pub fn into_failures(self) -> Vec<Failure> {
        match self {
            Self::Passed => Vec::new(),
            Self::Failed(failures) => failures,
        }
    }

    /// Failure messages in order
    pub fn messages(&self) -> Vec<&str> {
        self.failures().iter().map(|f| f.message.as_ref()).collect()
    }
}

/// Evaluator for parsed rule trees
#[derive(Clone)]
pub struct Evaluator {
    observer: Arc<dyn Observer>,
}

impl Evaluator {
    /// Create an evaluator that reports nothing
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    /// Create an evaluator reporting each rule call to `observer`
    pub fn with_observer(observer: Arc<dyn Observer>) -> Self {
        Self { observer }
    }

    /// Evaluate a tree; an empty tree always passes
    pub fn execute(
        &self,
        tree: &RuleTree,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Outcome, UsageError> {
        match tree.root() {
            Some(node) => self.execute_node(node, ctx),
            None => Ok(Outcome::Passed),
        }
    }

    /// Evaluate a subtree
    pub fn execute_node(
        &self,
        node: &Node,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Outcome, UsageError> {
        match node {
            Node::Rule(call) => self.invoke(call, ctx),
            Node::And(left, right) => {
                let outcome = self.execute_node(left, ctx)?;
                if outcome.is_failed() {
                    return Ok(outcome);
                }
                self.execute_node(right, ctx)
            }
            Node::Or(left, right) => {
                let outcome = self.execute_node(left, ctx)?;
                if outcome.is_passed() {
                    return Ok(outcome);
                }
                self.execute_node(right, ctx)
            }
        }
    }

    /// Run one rule with its own parameters
    fn invoke(&self, call: &RuleCall, ctx: &ExecutionContext<'_>) -> Result<Outcome, UsageError> {
        let rule_ctx = RuleContext::new(ctx, call.params());
        let result = (call.rule())(&rule_ctx);
        self.observer.on_rule(call, ctx.field(), &result);

        match result {
            Ok(()) => Ok(Outcome::Passed),
            Err(RuleError::Failed(failure)) => Ok(Outcome::Failed(vec![failure])),
            // An empty list carries no failure to report.
            Err(RuleError::Many(failures)) if failures.is_empty() => Ok(Outcome::Passed),
            Err(RuleError::Many(failures)) => Ok(Outcome::Failed(failures)),
            Err(RuleError::Misuse(message)) => {
                Err(UsageError::new(call.name(), ctx.field(), message))
            }
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FieldAccess;
    use crate::parser::parse;
    use crate::registry::RuleRegistry;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::borrow::Cow;

    struct NoFields;

    impl FieldAccess for NoFields {
        fn value(&self, _field: &str) -> Option<&Value> {
            None
        }

        fn display_name(&self, _field: &str) -> Option<Cow<'_, str>> {
            None
        }
    }

    /// Registry whose rules log their name (and first parameter) when run
    fn logging_registry(log: &Arc<Mutex<Vec<String>>>) -> RuleRegistry {
        let mut registry = RuleRegistry::new();
        for (name, passes) in [("t", true), ("f", false), ("g", false)] {
            let log = Arc::clone(log);
            registry.register(name, move |ctx| {
                let entry = match ctx.param(0) {
                    Some(p) => format!("{name}:{p}"),
                    None => name.to_string(),
                };
                log.lock().push(entry);
                if passes {
                    Ok(())
                } else {
                    Err(RuleError::fail(name, format!("{name} failed")))
                }
            });
        }
        registry
            .with("many", |_| {
                Err(RuleError::Many(vec![
                    Failure::new("one", "first"),
                    Failure::new("two", "second"),
                ]))
            })
            .with("none", |_| Err(RuleError::Many(Vec::new())))
            .with("misuse", |_| Err(RuleError::misuse("wrong type")))
    }

    fn run(source: &str) -> (Result<Outcome, UsageError>, Vec<String>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tree = parse(source, &logging_registry(&log)).unwrap();
        let ctx = ExecutionContext::new("field", &NoFields);
        let outcome = Evaluator::new().execute(&tree, &ctx);
        let calls = log.lock().clone();
        (outcome, calls)
    }

    #[test]
    fn test_and_fails_when_either_side_fails() {
        let (outcome, calls) = run("t & f");
        assert_eq!(outcome.unwrap().messages(), ["f failed"]);
        assert_eq!(calls, ["t", "f"]);
    }

    #[test]
    fn test_and_short_circuits_on_left_failure() {
        let (outcome, calls) = run("f & t");
        assert_eq!(outcome.unwrap().messages(), ["f failed"]);
        assert_eq!(calls, ["f"]);
    }

    #[test]
    fn test_or_takes_right_branch() {
        let (outcome, calls) = run("t & (f | t)");
        assert!(outcome.unwrap().is_passed());
        assert_eq!(calls, ["t", "f", "t"]);
    }

    #[test]
    fn test_or_short_circuits_on_left_pass() {
        let (outcome, calls) = run("t | f");
        assert!(outcome.unwrap().is_passed());
        assert_eq!(calls, ["t"]);
    }

    #[test]
    fn test_or_reports_only_right_failure() {
        let (outcome, calls) = run("f | g");
        assert_eq!(outcome.unwrap().messages(), ["g failed"]);
        assert_eq!(calls, ["f", "g"]);
    }

    #[test]
    fn test_params_are_scoped_to_each_call() {
        let (_, calls) = run("f:1 | f | f:2 | f");
        assert_eq!(calls, ["f:1", "f", "f:2", "f"]);
    }

    #[test]
    fn test_many_is_flattened() {
        let (outcome, _) = run("t & many");
        let outcome = outcome.unwrap();
        assert_eq!(outcome.messages(), ["first", "second"]);
        assert_eq!(outcome.failures()[1].code, "two");
    }

    #[test]
    fn test_empty_many_passes() {
        let (outcome, _) = run("none");
        assert_eq!(outcome.unwrap(), Outcome::Passed);
    }

    #[test]
    fn test_empty_tree_passes() {
        let (outcome, calls) = run("");
        assert_eq!(outcome.unwrap(), Outcome::Passed);
        assert!(calls.is_empty());
    }

    #[test]
    fn test_misuse_aborts_evaluation() {
        let (outcome, calls) = run("misuse | t");
        assert_eq!(
            outcome.unwrap_err(),
            UsageError::new("misuse", "field", "wrong type")
        );
        assert!(calls.is_empty());
    }

    #[test]
    fn test_misuse_skipped_by_short_circuit() {
        let (outcome, _) = run("t | misuse");
        assert!(outcome.unwrap().is_passed());
    }
}
