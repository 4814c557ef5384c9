//! Template trees checked against their governing type.
//!
//! The walk follows the template, not the type: every nested template is
//! checked against the member type it stands for. Matching mechanisms are
//! only accepted on kinds where they can ever succeed, and `omit` /
//! `ifpresent` only where the template describes an optional field.

use crate::state::SemanticChecker;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use tracing::warn;
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{Dialect, DiagnosticSink, Location, TypeKind};
use ttsem_runtime::{LengthRestriction, Template, TemplateSelector, ValueRange};
use ttsem_solver::{TypeId, TypeNode, is_compatible_kind};

impl<'a, S: DiagnosticSink> SemanticChecker<'a, S> {
    /// Check `template` against `ty`. `optional` is set when the template
    /// stands for an optional field. Returns `false` when anything was
    /// reported.
    pub fn check_template(
        &mut self,
        location: &Location,
        ty: TypeId,
        template: &Template,
        optional: bool,
    ) -> bool {
        if !self.depth.enter() {
            warn!(
                target: "ttsem::checker",
                depth = self.depth.depth(),
                "template nesting too deep; check abandoned"
            );
            return false;
        }
        let errors_before = self.error_count;
        self.check_template_inner(location, ty, template, optional);
        self.depth.leave();
        self.error_count == errors_before
    }

    fn check_template_inner(
        &mut self,
        location: &Location,
        ty: TypeId,
        template: &Template,
        optional: bool,
    ) {
        if self.is_silenced(ty) {
            return;
        }
        let store = self.store;
        let Ok(resolved) = store.resolve_alias(ty) else {
            return;
        };
        let node = store.get(resolved);
        let kind = node.kind;
        let type_name = store.name(ty);

        if template.is_if_present() && !optional {
            self.report_at(location, diagnostic_codes::IFPRESENT_NOT_ALLOWED, &[]);
        }
        if let Some(length) = template.length_restriction() {
            self.check_length_restriction(location, kind, type_name, length);
        }

        match template.selector() {
            TemplateSelector::Uninitialized | TemplateSelector::Any | TemplateSelector::AnyOrOmit => {}
            TemplateSelector::Omit => {
                if !optional {
                    self.report_at(location, diagnostic_codes::OMIT_NOT_ALLOWED, &[]);
                }
            }
            TemplateSelector::Specific(value) => {
                self.check_value(location, ty, value);
            }
            TemplateSelector::Record { fields, .. } => {
                if !(kind.is_record_like() || kind.is_set_like()) {
                    self.report_not_allowed(location, "Record template", type_name);
                    return;
                }
                let mut given = FxHashSet::default();
                for field in fields {
                    let Some(info) = node.field(&field.name) else {
                        self.report_at(
                            location,
                            diagnostic_codes::UNKNOWN_FIELD,
                            &[&field.name, type_name],
                        );
                        continue;
                    };
                    given.insert(info.name.as_str());
                    if let Ok(field_ty) = store.resolve_ref(&info.ty) {
                        self.check_template(location, field_ty, &field.template, info.optional);
                    }
                }
                for info in &node.fields {
                    if !given.contains(info.name.as_str()) {
                        self.report_at(
                            location,
                            diagnostic_codes::MISSING_FIELD,
                            &[&info.name, type_name],
                        );
                    }
                }
            }
            TemplateSelector::Union {
                alternative,
                template: inner,
                ..
            } => {
                if !kind.is_union_like() {
                    self.report_not_allowed(location, "Union template", type_name);
                    return;
                }
                match store.field_type(resolved, alternative) {
                    Some(alt_ty) => {
                        self.check_template(location, alt_ty, inner, false);
                    }
                    None => self.report_at(
                        location,
                        diagnostic_codes::UNKNOWN_ALTERNATIVE,
                        &[alternative, type_name],
                    ),
                }
            }
            TemplateSelector::Elements { items, .. } => {
                if !kind.is_list() {
                    self.report_not_allowed(location, "List template", type_name);
                    return;
                }
                self.check_array_dimension(location, node, type_name, items);
                if let Some(element_ty) = store.element_type(resolved) {
                    for item in items {
                        self.check_template(location, element_ty, item, false);
                    }
                }
            }
            TemplateSelector::ValueList(items) | TemplateSelector::ComplementedList(items) => {
                for item in items {
                    self.check_template(location, ty, item, optional);
                }
            }
            TemplateSelector::Range(range) => {
                if !kind.is_ordered() {
                    self.report_at(location, diagnostic_codes::RANGE_NOT_ALLOWED, &[type_name]);
                    return;
                }
                self.check_range(location, kind, node.dialect, type_name, range);
            }
            TemplateSelector::DecodeMatch { target, inner } => {
                if !kind.is_string() {
                    self.report_not_allowed(location, "Decoded content match", type_name);
                    return;
                }
                if let Some(target_ty) = store.lookup(&target.name) {
                    self.check_template(location, target_ty, inner, false);
                }
            }
            TemplateSelector::Pattern(_) => {
                if !kind.is_character_string() {
                    self.report_at(location, diagnostic_codes::PATTERN_NOT_ALLOWED, &[type_name]);
                }
            }
        }
    }

    fn report_not_allowed(&mut self, location: &Location, what: &str, type_name: &str) {
        self.report_at(
            location,
            diagnostic_codes::TEMPLATE_NOT_ALLOWED,
            &[what, type_name],
        );
    }

    fn check_length_restriction(
        &mut self,
        location: &Location,
        kind: TypeKind,
        type_name: &str,
        length: LengthRestriction,
    ) {
        if !kind.supports_length() {
            self.report_at(
                location,
                diagnostic_codes::LENGTH_RESTRICTION_NOT_ALLOWED,
                &[type_name],
            );
            return;
        }
        if let LengthRestriction::Range {
            min,
            max: Some(max),
        } = length
            && min > max
        {
            let (min, max) = (min.to_string(), max.to_string());
            self.report_at(
                location,
                diagnostic_codes::LENGTH_LOWER_GREATER_THAN_UPPER,
                &[&min, &max],
            );
        }
    }

    /// An array template may not list more fixed elements than the array
    /// has; `*` items stand for any number of elements and are not counted.
    fn check_array_dimension(
        &mut self,
        location: &Location,
        node: &TypeNode,
        type_name: &str,
        items: &[Template],
    ) {
        let Some(dimension) = node.dimension.filter(|_| node.kind == TypeKind::Array) else {
            return;
        };
        let fixed = items
            .iter()
            .filter(|item| !matches!(item.selector(), TemplateSelector::AnyOrOmit))
            .count();
        if fixed > dimension {
            let (expected, found) = (dimension.to_string(), fixed.to_string());
            self.report_at(
                location,
                diagnostic_codes::ELEMENT_COUNT_MISMATCH,
                &[type_name, &expected, &found],
            );
        }
    }

    fn check_range(
        &mut self,
        location: &Location,
        kind: TypeKind,
        dialect: Dialect,
        type_name: &str,
        range: &ValueRange,
    ) {
        let mut bounds_ok = true;
        for bound in range.min.iter().chain(range.max.iter()) {
            if !is_compatible_kind(kind, bound.value.kind(), dialect, Dialect::Ttcn3) {
                self.report_at(location, diagnostic_codes::INCOMPATIBLE_VALUE, &[type_name]);
                bounds_ok = false;
            }
        }
        if bounds_ok
            && let (Some(min), Some(max)) = (&range.min, &range.max)
            && let Ok(Ordering::Greater) = min.value.compare(&max.value)
        {
            self.report_at(location, diagnostic_codes::RANGE_LOWER_GREATER_THAN_UPPER, &[]);
        }
    }
}
