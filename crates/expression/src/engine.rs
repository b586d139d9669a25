//! Rule engine: registry, parse cache and evaluator behind one handle
//!
//! The engine is `Send + Sync`; one instance is meant to be shared by every
//! thread validating records against the same rule set.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::{CacheStats, ParseCache};
use crate::context::ExecutionContext;
use crate::core::ast::RuleTree;
use crate::error::{ExpressionResult, ParseResult, UsageError};
use crate::eval::{Evaluator, Outcome};
use crate::observer::{NoopObserver, Observer};
use crate::parser::{ParseLimits, Parser};
use crate::registry::RuleRegistry;

/// Parses, caches and evaluates rule strings
pub struct RuleEngine {
    registry: Arc<RuleRegistry>,
    cache: ParseCache,
    limits: ParseLimits,
    observer: Arc<dyn Observer>,
    evaluator: Evaluator,
}

impl RuleEngine {
    /// Create an engine over `registry` with default limits and no observer
    pub fn new(registry: RuleRegistry) -> Self {
        let observer: Arc<dyn Observer> = Arc::new(NoopObserver);
        debug!(rules = registry.len(), "Created rule engine");

        Self {
            registry: Arc::new(registry),
            cache: ParseCache::new(),
            limits: ParseLimits::default(),
            evaluator: Evaluator::with_observer(Arc::clone(&observer)),
            observer,
        }
    }

    /// Apply parse limits
    #[must_use = "builder methods must be chained or built"]
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Report parser and evaluator events to `observer`
    #[must_use = "builder methods must be chained or built"]
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.evaluator = Evaluator::with_observer(Arc::clone(&observer));
        self.observer = observer;
        self
    }

    /// The rule registry names are resolved against
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Active parse limits
    pub fn limits(&self) -> ParseLimits {
        self.limits
    }

    /// Parse `source`, reusing the cached tree when the exact text was seen
    /// before
    pub fn parse(&self, source: &str) -> ParseResult<Arc<RuleTree>> {
        self.cache
            .get_or_parse(source, |text| self.parse_uncached(text))
    }

    /// Parse `source` without touching the cache
    pub fn parse_uncached(&self, source: &str) -> ParseResult<RuleTree> {
        trace!(rule = source, "Parsing rule");
        Parser::new(source, &self.registry, self.observer.as_ref())
            .with_limits(self.limits)
            .parse()
    }

    /// Evaluate a parsed tree against a field
    pub fn execute(
        &self,
        tree: &RuleTree,
        ctx: &ExecutionContext<'_>,
    ) -> Result<Outcome, UsageError> {
        self.evaluator.execute(tree, ctx)
    }

    /// Parse (cached) and evaluate `source` against a field
    pub fn evaluate(&self, source: &str, ctx: &ExecutionContext<'_>) -> ExpressionResult<Outcome> {
        let tree = self.parse(source)?;
        let outcome = self.execute(&tree, ctx)?;
        trace!(rule = source, field = ctx.field(), passed = outcome.is_passed(), "Rule evaluated");
        Ok(outcome)
    }

    /// Parse cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(RuleRegistry::new())
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("registry", &self.registry)
            .field("limits", &self.limits)
            .field("cache", &self.cache.stats())
            .finish()
    }
}
