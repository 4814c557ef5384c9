//! Logical timestamps for incremental checking.
//!
//! Each analysis pass runs under a single [`CompilationTimestamp`] obtained
//! from a [`TimestampSource`]. Checkable nodes own a [`CheckStamp`] recording
//! the pass that last checked them; a check call is skipped when that pass is
//! not older than the current one. Starting a new pass with a strictly
//! greater timestamp invalidates every memoized check at once, without
//! walking the tree.

use std::cell::Cell;
use std::fmt;

/// Monotonic logical time of one analysis pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompilationTimestamp(u64);

impl CompilationTimestamp {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_less(self, other: Self) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for CompilationTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing timestamps, one per analysis pass.
#[derive(Debug, Default)]
pub struct TimestampSource {
    last: u64,
}

impl TimestampSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new pass.
    pub fn next(&mut self) -> CompilationTimestamp {
        self.last = self.last.saturating_add(1);
        CompilationTimestamp(self.last)
    }

    /// Timestamp of the most recent pass, if any pass was started.
    pub fn current(&self) -> Option<CompilationTimestamp> {
        (self.last > 0).then_some(CompilationTimestamp(self.last))
    }
}

/// Explicit per-pass state threaded through every check call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisContext {
    pub current_pass: CompilationTimestamp,
}

impl AnalysisContext {
    pub const fn new(current_pass: CompilationTimestamp) -> Self {
        Self { current_pass }
    }
}

/// Per-node memo of the last check and its outcome.
///
/// Interior mutability lets immutable declaration nodes record that they
/// have been checked; nothing else about the node changes.
#[derive(Clone, Debug, Default)]
pub struct CheckStamp {
    last_checked: Cell<Option<CompilationTimestamp>>,
    erroneous: Cell<bool>,
}

impl CheckStamp {
    pub const fn new() -> Self {
        Self {
            last_checked: Cell::new(None),
            erroneous: Cell::new(false),
        }
    }

    /// Whether the node still has to be checked in the pass of `ctx`.
    #[inline]
    pub fn needs_check(&self, ctx: &AnalysisContext) -> bool {
        match self.last_checked.get() {
            Some(last) => last.is_less(ctx.current_pass),
            None => true,
        }
    }

    /// Claim the check for this pass.
    ///
    /// Returns `false` when the node was already checked in this (or a
    /// later) pass; the caller must then skip the check. On `true` the
    /// erroneous marker from any previous pass is cleared.
    pub fn begin(&self, ctx: &AnalysisContext) -> bool {
        if !self.needs_check(ctx) {
            return false;
        }
        self.last_checked.set(Some(ctx.current_pass));
        self.erroneous.set(false);
        true
    }

    #[inline]
    pub fn last_checked(&self) -> Option<CompilationTimestamp> {
        self.last_checked.get()
    }

    #[inline]
    pub fn is_erroneous(&self) -> bool {
        self.erroneous.get()
    }

    #[inline]
    pub fn set_erroneous(&self, erroneous: bool) {
        self.erroneous.set(erroneous);
    }
}

#[cfg(test)]
#[path = "../tests/timestamp_tests.rs"]
mod timestamp_tests;
