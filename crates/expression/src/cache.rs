//! Parse cache keyed by exact rule text
//!
//! Rule strings come from a static schema, so the cache only grows: entries
//! are never evicted or invalidated. Only successful parses are stored.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use crate::core::ast::RuleTree;
use crate::error::ParseResult;

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Distinct rule strings cached
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Times the parser actually ran
    pub parses: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.parses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Concurrent, append-only map from rule text to its parsed tree
#[derive(Debug, Default)]
pub struct ParseCache {
    trees: DashMap<String, Arc<RuleTree>>,
    hits: AtomicU64,
    parses: AtomicU64,
}

impl ParseCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tree for `source`, parsing and inserting it on a miss.
    ///
    /// The parse runs outside any lock. Two threads missing on the same text
    /// may both parse it; insertion is atomic and the first tree stored is
    /// the one every caller gets back.
    pub fn get_or_parse<F>(&self, source: &str, parse: F) -> ParseResult<Arc<RuleTree>>
    where
        F: FnOnce(&str) -> ParseResult<RuleTree>,
    {
        if let Some(tree) = self.trees.get(source) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(tree.value()));
        }

        self.parses.fetch_add(1, Ordering::Relaxed);
        let parsed = Arc::new(parse(source)?);

        let entry = self
            .trees
            .entry(source.to_owned())
            .or_insert_with(|| Arc::clone(&parsed));
        if !Arc::ptr_eq(entry.value(), &parsed) {
            debug!(rule = source, "concurrent parse lost the insert race");
        }
        Ok(Arc::clone(entry.value()))
    }

    /// Cached tree for `source`, if any
    pub fn get(&self, source: &str) -> Option<Arc<RuleTree>> {
        self.trees.get(source).map(|tree| Arc::clone(tree.value()))
    }

    /// Check if `source` is cached
    pub fn contains(&self, source: &str) -> bool {
        self.trees.contains_key(source)
    }

    /// Number of cached rule strings
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.trees.len(),
            hits: self.hits.load(Ordering::Relaxed),
            parses: self.parses.load(Ordering::Relaxed),
        }
    }
}
