//! Type compatibility resolver.
//!
//! Decides whether a value of one declared type may be used where another
//! is expected. A query runs up to three stages:
//!
//! 1. **Kind stage**: the asymmetric table in [`crate::kind_rules`], applied
//!    to the alias-resolved declarations.
//! 2. **Structural stage** (only with `strict_structural`): field-by-field
//!    recursion into structured and list kinds, guarded by a visited set of
//!    `(expected, actual)` pairs. A pair met again on the current path is
//!    assumed compatible, so self-referential declarations terminate.
//! 3. **Subtype stage**: when both sides carry a constraint, the restriction
//!    intersector must find a common value.
//!
//! Erroneous or unresolvable declarations are compatible with everything so
//! that one bad declaration does not cascade into many diagnostics.

use crate::kind_rules::is_compatible_kind;
use crate::query_trace;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::relation_cache::{CachedRelation, RelationCache, RelationCacheStats, RelationKey};
use crate::restriction::intersects;
use crate::types::{TypeId, TypeRef, TypeStore};
use std::fmt;
use tracing::{debug, error, trace, warn};
use ttsem_common::{AnalysisContext, TypeKind};

// =============================================================================
// Results
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompatibilityLevel {
    IncompatibleType,
    IncompatibleSubtype,
    Compatible,
}

impl CompatibilityLevel {
    #[inline]
    pub fn is_compatible(self) -> bool {
        matches!(self, Self::Compatible)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncompatibleType => "incompatible_type",
            Self::IncompatibleSubtype => "incompatible_subtype",
            Self::Compatible => "compatible",
        }
    }
}

/// Per-query accumulator of explanation details.
///
/// `left` is the expected type, `right` the actual one. `str1_elem` /
/// `str2_elem` mark a side that stands for a single string element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeCompatibilityInfo {
    pub left: TypeId,
    pub right: TypeId,
    pub left_name: String,
    pub right_name: String,
    pub needs_conversion: bool,
    pub subtype_error: Option<String>,
    /// Structural mismatch explanation.
    pub error: Option<String>,
    pub str1_elem: bool,
    pub str2_elem: bool,
}

impl TypeCompatibilityInfo {
    pub fn new(store: &TypeStore, left: TypeId, right: TypeId) -> Self {
        Self {
            left,
            right,
            left_name: store.name(left).to_string(),
            right_name: store.name(right).to_string(),
            needs_conversion: false,
            subtype_error: None,
            error: None,
            str1_elem: false,
            str2_elem: false,
        }
    }

    #[must_use]
    pub fn with_string_elements(mut self, str1_elem: bool, str2_elem: bool) -> Self {
        self.str1_elem = str1_elem;
        self.str2_elem = str2_elem;
        self
    }

    fn clear_outcome(&mut self) {
        self.needs_conversion = false;
        self.subtype_error = None;
        self.error = None;
    }

    fn apply(&mut self, cached: &CachedRelation) {
        self.needs_conversion = cached.needs_conversion;
        self.subtype_error = cached.subtype_error.clone();
        self.error = cached.error.clone();
    }

    fn mismatch_detail(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => format!(
                "`{}' and `{}' are not compatible",
                self.left_name, self.right_name
            ),
        }
    }
}

impl fmt::Display for TypeCompatibilityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type mismatch: `{}' and `{}' are not compatible",
            self.left_name, self.right_name
        )?;
        if let Some(error) = &self.error {
            write!(f, ": {error}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompatOptions {
    /// Require field-by-field compatibility of structured types instead of
    /// accepting any two declarations of the same kind family.
    pub strict_structural: bool,
}

// =============================================================================
// CompatChecker
// =============================================================================

pub struct CompatChecker<'a> {
    store: &'a TypeStore,
    ctx: AnalysisContext,
    strict_structural: bool,
    guard: RecursionGuard<(TypeId, TypeId)>,
    cache: RelationCache,
}

impl<'a> CompatChecker<'a> {
    pub fn new(store: &'a TypeStore, ctx: AnalysisContext) -> Self {
        Self::with_options(store, ctx, CompatOptions::default())
    }

    pub fn with_options(store: &'a TypeStore, ctx: AnalysisContext, options: CompatOptions) -> Self {
        Self {
            store,
            ctx,
            strict_structural: options.strict_structural,
            guard: RecursionGuard::with_profile(RecursionProfile::StructuralCompat),
            cache: RelationCache::new(),
        }
    }

    /// Configure strict structural compatibility.
    pub fn set_strict_structural(&mut self, strict: bool) {
        if self.strict_structural != strict {
            self.strict_structural = strict;
            self.cache.clear();
        }
    }

    #[inline]
    pub fn strict_structural(&self) -> bool {
        self.strict_structural
    }

    /// Move to another analysis pass; results of older passes are dropped on
    /// the next query.
    pub fn set_context(&mut self, ctx: AnalysisContext) {
        self.ctx = ctx;
    }

    #[inline]
    pub fn context(&self) -> AnalysisContext {
        self.ctx
    }

    #[inline]
    pub fn store(&self) -> &'a TypeStore {
        self.store
    }

    pub fn cache_stats(&self) -> RelationCacheStats {
        self.cache.stats()
    }

    /// Classify whether `actual` may be used where `expected` is required,
    /// filling `info` with the explanation.
    pub fn get_compatibility(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        info: &mut TypeCompatibilityInfo,
    ) -> CompatibilityLevel {
        if info.left != expected || info.right != actual {
            error!(
                target: "ttsem::solver",
                ?expected,
                ?actual,
                info_left = ?info.left,
                info_right = ?info.right,
                "compatibility info does not describe the queried pair"
            );
            debug_assert_eq!(
                (info.left, info.right),
                (expected, actual),
                "TypeCompatibilityInfo must be created for the queried pair"
            );
            info.left = expected;
            info.right = actual;
        }

        let trace_enabled = query_trace::enabled();
        let query_id = trace_enabled.then(query_trace::next_query_id);
        if let Some(query_id) = query_id {
            query_trace::relation_start(
                query_id,
                "get_compatibility",
                expected,
                actual,
                self.strict_structural,
            );
        }

        let key = RelationKey {
            expected,
            actual,
            strict_structural: self.strict_structural,
            expected_is_elem: info.str1_elem,
            actual_is_elem: info.str2_elem,
            expected_erroneous: self.store.is_erroneous(expected),
            actual_erroneous: self.store.is_erroneous(actual),
        };
        if let Some(cached) = self.cache.lookup(&self.ctx, &key) {
            info.apply(&cached);
            if let Some(query_id) = query_id {
                query_trace::relation_end(query_id, "get_compatibility", cached.level.as_str(), true);
            }
            return cached.level;
        }

        info.clear_outcome();
        self.guard.reset();
        let level = self.compatibility(expected, actual, info);
        debug!(
            target: "ttsem::solver",
            expected = %info.left_name,
            actual = %info.right_name,
            level = level.as_str(),
            "type compatibility"
        );

        self.cache.insert(
            &self.ctx,
            key,
            CachedRelation {
                level,
                needs_conversion: info.needs_conversion,
                subtype_error: info.subtype_error.clone(),
                error: info.error.clone(),
            },
        );
        if let Some(query_id) = query_id {
            query_trace::relation_end(query_id, "get_compatibility", level.as_str(), false);
        }
        level
    }

    /// Shorthand for `get_compatibility(..) == Compatible`.
    pub fn is_compatible(&mut self, expected: TypeId, actual: TypeId) -> bool {
        let mut info = TypeCompatibilityInfo::new(self.store, expected, actual);
        self.get_compatibility(expected, actual, &mut info).is_compatible()
    }

    /// Resolved tags are identical; no dialect widening applies.
    pub fn is_strongly_compatible(&self, expected: TypeId, actual: TypeId) -> bool {
        let (Ok(e), Ok(a)) = (
            self.store.resolve_alias(expected),
            self.store.resolve_alias(actual),
        ) else {
            return true;
        };
        if self.store.is_erroneous(expected) || self.store.is_erroneous(actual) {
            return true;
        }
        self.store.get(e).kind == self.store.get(a).kind
    }

    /// Resolved tags agree once dialect twins are folded together.
    pub fn is_identical(&self, expected: TypeId, actual: TypeId) -> bool {
        let (Ok(e), Ok(a)) = (
            self.store.resolve_alias(expected),
            self.store.resolve_alias(actual),
        ) else {
            return true;
        };
        if self.store.is_erroneous(expected) || self.store.is_erroneous(actual) {
            return true;
        }
        self.store.get(e).kind.ttcn3_view() == self.store.get(a).kind.ttcn3_view()
    }

    // -------------------------------------------------------------------------
    // Stages
    // -------------------------------------------------------------------------

    fn compatibility(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        info: &mut TypeCompatibilityInfo,
    ) -> CompatibilityLevel {
        let store = self.store;
        if expected == actual && !info.str1_elem && !info.str2_elem {
            return CompatibilityLevel::Compatible;
        }

        let (Ok(expected_last), Ok(actual_last)) =
            (store.resolve_alias(expected), store.resolve_alias(actual))
        else {
            trace!(target: "ttsem::solver", ?expected, ?actual, "unresolved alias, assuming compatible");
            return CompatibilityLevel::Compatible;
        };
        if store.is_erroneous(expected) || store.is_erroneous(actual) {
            return CompatibilityLevel::Compatible;
        }

        let e = store.get(expected_last);
        let a = store.get(actual_last);
        if !is_compatible_kind(e.kind, a.kind, e.dialect, a.dialect) {
            trace!(
                target: "ttsem::solver",
                expected_kind = %e.kind,
                actual_kind = %a.kind,
                "kind mismatch"
            );
            return CompatibilityLevel::IncompatibleType;
        }

        if self.strict_structural && expected_last != actual_last {
            let level = self.structural(expected_last, actual_last, info);
            if !level.is_compatible() {
                return level;
            }
        }

        self.subtype_stage(expected, actual, info)
    }

    fn subtype_stage(
        &self,
        expected: TypeId,
        actual: TypeId,
        info: &mut TypeCompatibilityInfo,
    ) -> CompatibilityLevel {
        let (Some(expected_sub), Some(actual_sub)) = (
            self.store.effective_subtype(expected),
            self.store.effective_subtype(actual),
        ) else {
            return CompatibilityLevel::Compatible;
        };
        match intersects(expected_sub, actual_sub, info.str1_elem, info.str2_elem) {
            Ok(()) => CompatibilityLevel::Compatible,
            Err(message) => {
                info.subtype_error = Some(message);
                CompatibilityLevel::IncompatibleSubtype
            }
        }
    }

    fn structural(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        info: &mut TypeCompatibilityInfo,
    ) -> CompatibilityLevel {
        let key = (expected, actual);
        match self.guard.enter(key) {
            RecursionResult::Entered => {}
            RecursionResult::Cycle => {
                trace!(target: "ttsem::solver", ?expected, ?actual, "pair already on path");
                return CompatibilityLevel::Compatible;
            }
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                warn!(
                    target: "ttsem::solver",
                    ?expected,
                    ?actual,
                    depth = self.guard.depth(),
                    "structural compatibility limit reached, assuming compatible"
                );
                return CompatibilityLevel::Compatible;
            }
        }

        let level = self.structural_members(expected, actual, info);
        self.guard.leave(key);

        let kind = self.store.get(expected).kind;
        if level.is_compatible() && (kind.is_structured() || kind.is_list()) {
            info.needs_conversion = true;
        }
        level
    }

    fn structural_members(
        &mut self,
        expected: TypeId,
        actual: TypeId,
        info: &mut TypeCompatibilityInfo,
    ) -> CompatibilityLevel {
        let store = self.store;
        let e = store.get(expected);
        let a = store.get(actual);

        match e.kind {
            k if k.is_record_like() => {
                if e.fields.len() != a.fields.len() {
                    info.error = Some(format!(
                        "The number of fields in record/SEQUENCE types must be the same ({} and {})",
                        e.fields.len(),
                        a.fields.len()
                    ));
                    return CompatibilityLevel::IncompatibleType;
                }
                for (fe, fa) in e.fields.iter().zip(&a.fields) {
                    if fe.optional != fa.optional {
                        info.error = Some(format!(
                            "The optionality of fields in record/SEQUENCE types must be the same (field `{}')",
                            fe.name
                        ));
                        return CompatibilityLevel::IncompatibleType;
                    }
                    let level = self.member(&fe.ty, &fa.ty, &fe.name, info);
                    if !level.is_compatible() {
                        return level;
                    }
                }
                CompatibilityLevel::Compatible
            }
            k if k.is_set_like() => {
                if e.fields.len() != a.fields.len() {
                    info.error = Some(format!(
                        "The number of fields in set/SET types must be the same ({} and {})",
                        e.fields.len(),
                        a.fields.len()
                    ));
                    return CompatibilityLevel::IncompatibleType;
                }
                for fa in &a.fields {
                    let Some(fe) = e.field(&fa.name) else {
                        info.error = Some(format!(
                            "Field `{}' of `{}' has no counterpart in `{}'",
                            fa.name, a.name, e.name
                        ));
                        return CompatibilityLevel::IncompatibleType;
                    };
                    if fe.optional != fa.optional {
                        info.error = Some(format!(
                            "The optionality of fields in set/SET types must be the same (field `{}')",
                            fe.name
                        ));
                        return CompatibilityLevel::IncompatibleType;
                    }
                    let level = self.member(&fe.ty, &fa.ty, &fe.name, info);
                    if !level.is_compatible() {
                        return level;
                    }
                }
                CompatibilityLevel::Compatible
            }
            k if k.is_union_like() => {
                for fa in &a.fields {
                    let Some(fe) = e.field(&fa.name) else {
                        info.error = Some(format!(
                            "Alternative `{}' of `{}' is missing from `{}'",
                            fa.name, a.name, e.name
                        ));
                        return CompatibilityLevel::IncompatibleType;
                    };
                    let level = self.member(&fe.ty, &fa.ty, &fe.name, info);
                    if !level.is_compatible() {
                        return level;
                    }
                }
                CompatibilityLevel::Compatible
            }
            k if k.is_enumerated() => {
                for item in &a.enumerators {
                    if e.enumerator(&item.name).is_none() {
                        info.error = Some(format!(
                            "Enumerated value `{}' of `{}' is missing from `{}'",
                            item.name, a.name, e.name
                        ));
                        return CompatibilityLevel::IncompatibleType;
                    }
                }
                CompatibilityLevel::Compatible
            }
            TypeKind::RecordOf | TypeKind::SetOf | TypeKind::Array => {
                if e.kind == TypeKind::Array && e.dimension != a.dimension {
                    info.error = Some(format!(
                        "The dimensions of array types must be the same ({} and {})",
                        dimension_text(e.dimension),
                        dimension_text(a.dimension)
                    ));
                    return CompatibilityLevel::IncompatibleType;
                }
                match (&e.element, &a.element) {
                    (Some(ee), Some(ae)) => self.member(ee, ae, "element type", info),
                    _ => CompatibilityLevel::Compatible,
                }
            }
            _ => CompatibilityLevel::Compatible,
        }
    }

    /// Compatibility of one field, alternative or element type pair.
    fn member(
        &mut self,
        expected: &TypeRef,
        actual: &TypeRef,
        label: &str,
        info: &mut TypeCompatibilityInfo,
    ) -> CompatibilityLevel {
        let store = self.store;
        let (Ok(fe), Ok(fa)) = (store.resolve_ref(expected), store.resolve_ref(actual)) else {
            return CompatibilityLevel::Compatible;
        };
        let mut nested = TypeCompatibilityInfo::new(store, fe, fa);
        let level = self.compatibility(fe, fa, &mut nested);
        info.needs_conversion |= nested.needs_conversion;
        match level {
            CompatibilityLevel::Compatible => {}
            CompatibilityLevel::IncompatibleSubtype => {
                info.subtype_error = nested.subtype_error.take();
            }
            CompatibilityLevel::IncompatibleType => {
                info.error = Some(format!("{label}: {}", nested.mismatch_detail()));
            }
        }
        level
    }
}

fn dimension_text(dimension: Option<usize>) -> String {
    dimension.map_or_else(|| "?".to_string(), |d| d.to_string())
}

#[cfg(test)]
#[path = "../tests/compat_tests.rs"]
mod compat_tests;
