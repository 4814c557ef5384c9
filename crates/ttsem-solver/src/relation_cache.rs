//! Pass-scoped memo of compatibility results.
//!
//! Entries are only valid for the analysis pass that produced them. The
//! cache remembers that pass; the first access under a newer timestamp drops
//! every entry, so starting a pass invalidates the whole cache without the
//! caller walking anything.

use crate::compat::CompatibilityLevel;
use crate::types::TypeId;
use rustc_hash::FxHashMap;
use tracing::trace;
use ttsem_common::{AnalysisContext, CompilationTimestamp};

/// Everything that influences the outcome of one query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RelationKey {
    pub expected: TypeId,
    pub actual: TypeId,
    pub strict_structural: bool,
    pub expected_is_elem: bool,
    pub actual_is_elem: bool,
    /// Erroneous flags of both sides when the query ran; a declaration
    /// marked erroneous later in the pass must not see the older outcome.
    pub expected_erroneous: bool,
    pub actual_erroneous: bool,
}

/// The outcome of a query plus the explanation that goes with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedRelation {
    pub level: CompatibilityLevel,
    pub needs_conversion: bool,
    pub subtype_error: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelationCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

#[derive(Debug, Default)]
pub struct RelationCache {
    pass: Option<CompilationTimestamp>,
    entries: FxHashMap<RelationKey, CachedRelation>,
    stats: RelationCacheStats,
}

impl RelationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop entries computed in an older pass.
    fn sync(&mut self, ctx: &AnalysisContext) {
        match self.pass {
            Some(pass) if !pass.is_less(ctx.current_pass) => {}
            _ => {
                if !self.entries.is_empty() {
                    trace!(
                        target: "ttsem::solver::cache",
                        dropped = self.entries.len(),
                        pass = ctx.current_pass.value(),
                        "relation cache invalidated by new pass"
                    );
                    self.stats.invalidations += 1;
                }
                self.entries.clear();
                self.pass = Some(ctx.current_pass);
            }
        }
    }

    pub fn lookup(&mut self, ctx: &AnalysisContext, key: &RelationKey) -> Option<CachedRelation> {
        self.sync(ctx);
        match self.entries.get(key) {
            Some(hit) => {
                self.stats.hits += 1;
                Some(hit.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, ctx: &AnalysisContext, key: RelationKey, value: CachedRelation) {
        self.sync(ctx);
        self.entries.insert(key, value);
    }

    /// Forget everything, e.g. after an option change.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> RelationCacheStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../tests/relation_cache_tests.rs"]
mod relation_cache_tests;
