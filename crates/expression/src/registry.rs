//! Rule function registry
//!
//! Maps rule names to functions. The parser resolves names against a registry
//! once; resolved trees keep the function itself.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::RuleContext;
use crate::error::RuleResult;

/// A shareable rule function
pub type RuleFn = Arc<dyn Fn(&RuleContext<'_>) -> RuleResult + Send + Sync>;

/// Wrap a closure as a [`RuleFn`]
pub fn rule_fn<F>(rule: F) -> RuleFn
where
    F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
{
    Arc::new(rule)
}

/// Registry of named rule functions
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleFn>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, replacing any rule with the same name
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F) -> &mut Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        self.rules.insert(name.into(), rule_fn(rule));
        self
    }

    /// Register an already-shared rule function
    pub fn register_fn(&mut self, name: impl Into<String>, rule: RuleFn) -> &mut Self {
        self.rules.insert(name.into(), rule);
        self
    }

    /// Builder form of [`register`](Self::register)
    #[must_use = "builder methods must be chained or built"]
    pub fn with<F>(mut self, name: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> RuleResult + Send + Sync + 'static,
    {
        self.register(name, rule);
        self
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<RuleFn> {
        self.rules.get(name).cloned()
    }

    /// Check if a rule is registered
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Copy every rule from `overrides` into this registry; on duplicate
    /// names the override wins.
    pub fn merge(&mut self, overrides: &RuleRegistry) -> &mut Self {
        for (name, rule) in &overrides.rules {
            self.rules.insert(name.clone(), Arc::clone(rule));
        }
        self
    }

    /// Builder form of [`merge`](Self::merge)
    #[must_use = "builder methods must be chained or built"]
    pub fn merged(mut self, overrides: &RuleRegistry) -> Self {
        self.merge(overrides);
        self
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
