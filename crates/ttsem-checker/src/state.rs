//! Checker state shared by every check.
//!
//! `SemanticChecker` borrows the type store for the whole pass and owns the
//! compatibility resolver so that its relation cache survives between
//! checks of the same pass. The individual checks live in sibling modules,
//! each adding an `impl` block:
//!
//! - `declarations` - type declarations and their subtype constraints
//! - `assignments` - referenced values and expression results
//! - `templates` - template trees against their governing type
//! - `redirects` - parameter redirects of `getcall` / `getreply`
//! - `error_reporter` - diagnostic emission helpers

use crate::options::CheckerOptions;
use ttsem_common::{AnalysisContext, DiagnosticCollector, DiagnosticSink, TypeKind};
use ttsem_solver::{CompatChecker, DepthCounter, RecursionProfile, TypeId, TypeStore};

pub struct SemanticChecker<'a, S: DiagnosticSink = DiagnosticCollector> {
    pub(crate) store: &'a TypeStore,
    pub(crate) compat: CompatChecker<'a>,
    pub(crate) options: CheckerOptions,
    pub(crate) ctx: AnalysisContext,
    pub(crate) sink: S,
    pub(crate) error_count: usize,
    /// Nesting of the value or template currently walked.
    pub(crate) depth: DepthCounter,
}

impl<'a> SemanticChecker<'a, DiagnosticCollector> {
    /// Checker that collects its diagnostics in memory.
    pub fn new(store: &'a TypeStore, ctx: AnalysisContext, options: CheckerOptions) -> Self {
        Self::with_sink(store, ctx, options, DiagnosticCollector::new())
    }

    pub fn diagnostics(&self) -> &DiagnosticCollector {
        &self.sink
    }
}

impl<'a, S: DiagnosticSink> SemanticChecker<'a, S> {
    pub fn with_sink(
        store: &'a TypeStore,
        ctx: AnalysisContext,
        options: CheckerOptions,
        sink: S,
    ) -> Self {
        Self {
            store,
            compat: CompatChecker::with_options(store, ctx, options.compat_options()),
            options,
            ctx,
            sink,
            error_count: 0,
            depth: DepthCounter::with_profile(RecursionProfile::TemplateCheck),
        }
    }

    #[inline]
    pub fn store(&self) -> &'a TypeStore {
        self.store
    }

    #[inline]
    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    #[inline]
    pub fn context(&self) -> AnalysisContext {
        self.ctx
    }

    /// Start another pass. Declarations checked in an older pass are checked
    /// again and the resolver forgets its cached relations.
    pub fn set_context(&mut self, ctx: AnalysisContext) {
        self.ctx = ctx;
        self.compat.set_context(ctx);
    }

    pub fn set_strict_structural(&mut self, strict: bool) {
        self.options.strict_structural = strict;
        self.compat.set_strict_structural(strict);
    }

    pub fn compat(&mut self) -> &mut CompatChecker<'a> {
        &mut self.compat
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Number of error diagnostics reported so far (warnings excluded).
    #[inline]
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    // -------------------------------------------------------------------------
    // Small type queries shared by the checks
    // -------------------------------------------------------------------------

    /// Resolved kind of `id`; `Undefined` when the alias chain is broken.
    pub(crate) fn kind_of(&self, id: TypeId) -> TypeKind {
        self.store.resolved_kind(id).0
    }

    /// Whether checks against `id` should stay silent.
    pub(crate) fn is_silenced(&self, id: TypeId) -> bool {
        self.store.is_erroneous(id) || self.store.resolve_alias(id).is_err()
    }
}
