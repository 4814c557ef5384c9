//! Type declaration checks.
//!
//! Each declaration is checked at most once per pass: its `CheckStamp` is
//! claimed before anything is reported, so a declaration reached again
//! through another declaration reuses the outcome. A declaration with any
//! error is marked erroneous, which makes it compatible with everything
//! from then on.

use crate::state::SemanticChecker;
use rustc_hash::FxHashSet;
use tracing::debug;
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{DiagnosticSink, Location, TypeKind};
use ttsem_solver::{ResolveError, SubtypeConstraint, TypeId, TypeNode, TypeRef};

impl<'a, S: DiagnosticSink> SemanticChecker<'a, S> {
    /// Check every user declaration of the store. Returns how many of them
    /// are erroneous afterwards.
    pub fn check_declarations(&mut self) -> usize {
        let store = self.store;
        let mut erroneous = 0;
        for id in store.declarations() {
            if !self.check_type(id) {
                erroneous += 1;
            }
        }
        erroneous
    }

    /// Check one declaration. Returns `false` when it is erroneous.
    pub fn check_type(&mut self, id: TypeId) -> bool {
        let store = self.store;
        let node = store.get(id);
        if node.builtin {
            return true;
        }
        if !node.stamp.begin(&self.ctx) {
            return !node.is_erroneous();
        }

        let errors_before = self.error_count;
        let location = &node.location;

        if node.kind == TypeKind::Referenced {
            match store.resolve_alias(id) {
                Ok(_) => {}
                Err(ResolveError::Unresolved(name)) => {
                    self.report_at(location, diagnostic_codes::UNRESOLVED_TYPE_REFERENCE, &[&name]);
                }
                Err(ResolveError::Circular(chain)) => {
                    let chain = chain.join(" -> ");
                    self.report_at(location, diagnostic_codes::CIRCULAR_TYPE_REFERENCE, &[&chain]);
                }
            }
        }

        let component_refs = node
            .fields
            .iter()
            .map(|field| &field.ty)
            .chain(node.element.iter())
            .chain(node.parameters.iter().map(|param| &param.ty));
        for reference in component_refs {
            self.check_reference(location, reference);
        }

        self.check_member_names(node);

        if let Some(subtype) = &node.subtype {
            self.check_subtype(id, node, subtype);
        }

        let erroneous = self.error_count > errors_before;
        node.stamp.set_erroneous(erroneous);
        debug!(
            target: "ttsem::checker",
            name = %node.name,
            kind = node.kind.display_name(),
            erroneous,
            "declaration checked"
        );
        !erroneous
    }

    fn check_reference(&mut self, location: &Location, reference: &TypeRef) {
        if let Err(ResolveError::Unresolved(name)) = self.store.resolve_ref(reference) {
            self.report_at(location, diagnostic_codes::UNRESOLVED_TYPE_REFERENCE, &[&name]);
        }
    }

    fn check_member_names(&mut self, node: &TypeNode) {
        let mut seen = FxHashSet::default();
        for field in &node.fields {
            if !seen.insert(field.name.as_str()) {
                self.report_at(
                    &node.location,
                    diagnostic_codes::DUPLICATE_FIELD_NAME,
                    &[&field.name, &node.name],
                );
            }
        }

        seen.clear();
        for enumerator in &node.enumerators {
            if !seen.insert(enumerator.name.as_str()) {
                self.report_at(
                    &node.location,
                    diagnostic_codes::DUPLICATE_ENUMERATOR,
                    &[&enumerator.name, &node.name],
                );
            }
        }
    }

    fn check_subtype(&mut self, id: TypeId, node: &TypeNode, subtype: &SubtypeConstraint) {
        let store = self.store;
        let location = &node.location;
        let kind = self.kind_of(id);
        if kind == TypeKind::Undefined {
            // Broken alias chain, already reported.
            return;
        }
        if !subtype_applies(kind, subtype) {
            self.report_at(location, diagnostic_codes::SUBTYPE_NOT_APPLICABLE, &[&node.name]);
            return;
        }
        if let Some((lower, upper)) = inverted_bounds(subtype) {
            self.report_at(
                location,
                diagnostic_codes::SUBTYPE_LOWER_GREATER_THAN_UPPER,
                &[&lower, &upper],
            );
            return;
        }
        if subtype.is_empty() {
            self.report_at(location, diagnostic_codes::EMPTY_SUBTYPE, &[&node.name]);
        }

        // An alias may only narrow the restriction of the type it names.
        if node.kind == TypeKind::Referenced
            && let Some(target) = node.target.as_ref()
            && let Ok(parent) = store.resolve_ref(target)
            && let Some(parent_subtype) = store.effective_subtype(parent)
            && !subtype.is_subset_of(parent_subtype)
        {
            let own = subtype.to_string();
            let inherited = parent_subtype.to_string();
            self.report_at(
                location,
                diagnostic_codes::SUBTYPE_NOT_A_SUBSET,
                &[&own, &node.name, &inherited, store.name(parent)],
            );
        }
    }
}

/// Whether a constraint of this shape may restrict a type of `kind`.
fn subtype_applies(kind: TypeKind, subtype: &SubtypeConstraint) -> bool {
    let restrictable = !matches!(
        kind,
        TypeKind::Undefined
            | TypeKind::Null
            | TypeKind::Port
            | TypeKind::Signature
            | TypeKind::Component
            | TypeKind::Default
            | TypeKind::Address
            | TypeKind::Any
            | TypeKind::ObjectClassField
    );
    restrictable
        && match subtype {
            SubtypeConstraint::ValueSet(_) => true,
            SubtypeConstraint::Range(_) => kind.is_ordered(),
            SubtypeConstraint::LengthSet(_) => kind.supports_length(),
        }
}

/// The first pair of bounds that is out of order, rendered for the message.
fn inverted_bounds(subtype: &SubtypeConstraint) -> Option<(String, String)> {
    match subtype {
        SubtypeConstraint::ValueSet(_) => None,
        SubtypeConstraint::Range(range) => {
            if range.is_well_formed() {
                return None;
            }
            let lower = range.min.as_ref()?.value.to_string();
            let upper = range.max.as_ref()?.value.to_string();
            Some((lower, upper))
        }
        SubtypeConstraint::LengthSet(ranges) => ranges
            .iter()
            .find(|r| !r.is_well_formed())
            .and_then(|r| Some((r.min.to_string(), r.max?.to_string()))),
    }
}
