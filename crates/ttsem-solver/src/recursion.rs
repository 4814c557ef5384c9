//! Bounds for recursive walks over type declarations.
//!
//! Field and element types may lead back to the declaration being walked.
//! The structural compatibility stage keeps the `(expected, actual)` pairs of
//! the current path in a [`RecursionGuard`]; meeting a pair again ends that
//! branch. Template and value checks only need a nesting bound, which
//! [`DepthCounter`] provides.

use rustc_hash::FxHashSet;
use std::hash::Hash;
use ttsem_common::limits::MAX_TEMPLATE_CHECK_DEPTH;

/// Limit presets, one per kind of walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionProfile {
    /// Field-by-field compatibility of structured types.
    StructuralCompat,
    /// Checking a template or literal value against its type.
    TemplateCheck,
}

impl RecursionProfile {
    pub const fn max_depth(self) -> u32 {
        match self {
            Self::StructuralCompat => 100,
            Self::TemplateCheck => MAX_TEMPLATE_CHECK_DEPTH,
        }
    }

    /// Total number of steps one top-level query may take.
    pub const fn max_steps(self) -> u32 {
        match self {
            Self::StructuralCompat => 100_000,
            Self::TemplateCheck => u32::MAX,
        }
    }
}

/// Outcome of [`RecursionGuard::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursionResult {
    Entered,
    /// The key is already on the current path.
    Cycle,
    DepthExceeded,
    IterationExceeded,
}

/// Path-scoped visited set with depth and step limits.
///
/// Every `Entered` must be paired with a `leave` of the same key.
pub struct RecursionGuard<K: Hash + Eq + Copy> {
    path: FxHashSet<K>,
    steps: u32,
    max_depth: u32,
    max_steps: u32,
}

impl<K: Hash + Eq + Copy> RecursionGuard<K> {
    pub fn new(max_depth: u32, max_steps: u32) -> Self {
        Self {
            path: FxHashSet::default(),
            steps: 0,
            max_depth,
            max_steps,
        }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth(), profile.max_steps())
    }

    pub fn enter(&mut self, key: K) -> RecursionResult {
        self.steps = self.steps.saturating_add(1);
        if self.steps > self.max_steps {
            return RecursionResult::IterationExceeded;
        }
        if self.depth() >= self.max_depth {
            return RecursionResult::DepthExceeded;
        }
        if !self.path.insert(key) {
            return RecursionResult::Cycle;
        }
        RecursionResult::Entered
    }

    pub fn leave(&mut self, key: K) {
        let removed = self.path.remove(&key);
        debug_assert!(removed, "RecursionGuard::leave without a matching enter");
    }

    /// Length of the current path.
    #[inline]
    pub fn depth(&self) -> u32 {
        u32::try_from(self.path.len()).unwrap_or(u32::MAX)
    }

    /// Start a new top-level query.
    pub fn reset(&mut self) {
        self.path.clear();
        self.steps = 0;
    }
}

/// Nesting bound without cycle detection; template trees legitimately
/// revisit the same element type.
pub struct DepthCounter {
    depth: u32,
    max_depth: u32,
}

impl DepthCounter {
    pub fn new(max_depth: u32) -> Self {
        Self { depth: 0, max_depth }
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self::new(profile.max_depth())
    }

    /// Go one level deeper. On `false` the caller must not call `leave`.
    #[inline]
    pub fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub fn leave(&mut self) {
        debug_assert!(self.depth > 0, "DepthCounter::leave at depth 0");
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod recursion_tests;
