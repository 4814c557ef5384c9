//! Values used where a type is expected.
//!
//! Covers three situations: a reference to a declared value or template
//! (the resolver decides), an expression whose result kind is known but
//! whose value is not (the kind table decides), and a literal value (kind
//! table, enumerators, fields and the subtype in force).

use crate::state::SemanticChecker;
use tracing::{debug, warn};
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{Dialect, DiagnosticSink, Location, TypeKind};
use ttsem_runtime::{Value, ValueData};
use ttsem_solver::{
    CompatibilityLevel, ConstraintValue, TypeCompatibilityInfo, TypeId, is_compatible_kind,
};

/// What the context accepts in place of the checked reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Expectation {
    #[default]
    Value,
    Template,
}

impl Expectation {
    /// The noun used in "a {value|value or template} of type ... was expected".
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Template => "value or template",
        }
    }
}

/// A reference to a declared value, template or string element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueReference {
    pub location: Location,
    pub ty: TypeId,
    /// The reference selects one element of a string (`s[i]`).
    pub is_string_element: bool,
}

impl ValueReference {
    pub fn new(location: Location, ty: TypeId) -> Self {
        Self {
            location,
            ty,
            is_string_element: false,
        }
    }

    #[must_use]
    pub fn string_element(mut self) -> Self {
        self.is_string_element = true;
        self
    }
}

impl<'a, S: DiagnosticSink> SemanticChecker<'a, S> {
    /// Check that the referenced value may be used where `expected` is
    /// required. Returns `false` when the reference must be treated as
    /// erroneous.
    pub fn check_referenced_value(
        &mut self,
        expected: TypeId,
        reference: &ValueReference,
        expectation: Expectation,
    ) -> bool {
        let actual = reference.ty;
        // Declaration errors decide whether the pair is compared at all.
        self.check_type(expected);
        self.check_type(actual);

        let mut info = TypeCompatibilityInfo::new(self.store, expected, actual)
            .with_string_elements(false, reference.is_string_element);
        let level = self.compat.get_compatibility(expected, actual, &mut info);
        let location = &reference.location;

        if level.is_compatible() {
            if info.needs_conversion {
                self.report_type_compatibility(location, &info.left_name, &info.right_name);
            }
            return true;
        }

        debug!(
            target: "ttsem::checker",
            expected = %info.left_name,
            actual = %info.right_name,
            level = level.as_str(),
            "referenced value rejected"
        );
        match self.kind_of(expected) {
            // A port reference is already reported where the port is used.
            TypeKind::Port => {}
            TypeKind::Signature => {
                if expectation == Expectation::Template {
                    self.report_at(
                        location,
                        diagnostic_codes::SIGNATURE_TEMPLATE_TYPE_MISMATCH,
                        &[&info.left_name, &info.right_name],
                    );
                }
            }
            kind if kind.is_structured() || kind.is_list() => {
                if let (CompatibilityLevel::IncompatibleSubtype, Some(error)) =
                    (level, info.subtype_error.as_deref())
                {
                    self.report_at(location, diagnostic_codes::SUBTYPE_MISMATCH, &[error]);
                } else {
                    let explanation = info.to_string();
                    self.report_at(
                        location,
                        diagnostic_codes::STRUCTURED_TYPE_MISMATCH,
                        &[&explanation],
                    );
                }
            }
            _ => {
                if let (CompatibilityLevel::IncompatibleSubtype, Some(error)) =
                    (level, info.subtype_error.as_deref())
                {
                    self.report_at(location, diagnostic_codes::SUBTYPE_MISMATCH, &[error]);
                } else {
                    self.report_at(
                        location,
                        diagnostic_codes::TYPE_MISMATCH,
                        &[expectation.describe(), &info.left_name, &info.right_name],
                    );
                }
            }
        }
        false
    }

    /// Check an expression that cannot be folded: only its result kind is
    /// known.
    pub fn check_expression_result(
        &mut self,
        location: &Location,
        expected: TypeId,
        result_kind: TypeKind,
    ) -> bool {
        if self.is_silenced(expected) {
            return true;
        }
        let (kind, dialect) = self.store.resolved_kind(expected);
        if is_compatible_kind(kind, result_kind, dialect, Dialect::Ttcn3) {
            return true;
        }
        let name = self.store.name(expected);
        self.report_at(location, diagnostic_codes::INCOMPATIBLE_VALUE, &[name]);
        false
    }

    /// Check a literal value against the type it is assigned to.
    pub fn check_value(&mut self, location: &Location, ty: TypeId, value: &Value) -> bool {
        if !self.depth.enter() {
            warn!(
                target: "ttsem::checker",
                depth = self.depth.depth(),
                "value nesting too deep; check abandoned"
            );
            return false;
        }
        let ok = self.check_value_inner(location, ty, value);
        self.depth.leave();
        ok
    }

    fn check_value_inner(&mut self, location: &Location, ty: TypeId, value: &Value) -> bool {
        if self.is_silenced(ty) || !value.is_bound() {
            return true;
        }
        let (kind, dialect) = self.store.resolved_kind(ty);
        if !is_compatible_kind(kind, value.kind(), dialect, Dialect::Ttcn3) {
            let name = self.store.name(ty);
            self.report_at(location, diagnostic_codes::INCOMPATIBLE_VALUE, &[name]);
            return false;
        }
        let Ok(data) = value.data("check") else {
            return true;
        };

        let mut ok = true;
        match data {
            ValueData::Enumerated { name, .. } => {
                let Ok(resolved) = self.store.resolve_alias(ty) else {
                    return true;
                };
                if self.store.get(resolved).enumerator(name).is_none() {
                    let type_name = self.store.name(ty);
                    self.report_at(
                        location,
                        diagnostic_codes::UNKNOWN_ENUMERATOR,
                        &[name, type_name],
                    );
                    ok = false;
                }
            }
            ValueData::Record(fields) => {
                for field in fields {
                    let Some(field_ty) = self.store.field_type(ty, &field.name) else {
                        let type_name = self.store.name(ty);
                        self.report_at(
                            location,
                            diagnostic_codes::UNKNOWN_FIELD,
                            &[&field.name, type_name],
                        );
                        ok = false;
                        continue;
                    };
                    if let Some(inner) = &field.value {
                        ok &= self.check_value(location, field_ty, inner);
                    }
                }
            }
            ValueData::Union { alternative, value } => match self.store.field_type(ty, alternative) {
                Some(alt_ty) => ok &= self.check_value(location, alt_ty, value),
                None => {
                    let type_name = self.store.name(ty);
                    self.report_at(
                        location,
                        diagnostic_codes::UNKNOWN_ALTERNATIVE,
                        &[alternative, type_name],
                    );
                    ok = false;
                }
            },
            ValueData::List(elements) => {
                if let Some(element_ty) = self.store.element_type(ty) {
                    for element in elements {
                        ok &= self.check_value(location, element_ty, element);
                    }
                }
            }
            _ => {}
        }

        if ok
            && let Some(subtype) = self.store.effective_subtype(ty)
            && let Some(literal) = constraint_literal(data)
            && !subtype.admits(&literal)
        {
            let message = format!(
                "{value} is not a valid value for type `{}' which has subtype {subtype}",
                self.store.name(ty)
            );
            self.report_at(location, diagnostic_codes::SUBTYPE_MISMATCH, &[&message]);
            ok = false;
        }
        ok
    }
}

/// The constraint literal a runtime value corresponds to, for the kinds a
/// subtype constraint can name.
fn constraint_literal(data: &ValueData) -> Option<ConstraintValue> {
    match data {
        ValueData::Boolean(b) => Some(ConstraintValue::Boolean(*b)),
        ValueData::Integer(i) => Some(ConstraintValue::Integer(*i)),
        ValueData::Real(r) => Some(ConstraintValue::Real(*r)),
        ValueData::Charstring(s) => Some(ConstraintValue::String(s.clone())),
        ValueData::Enumerated { name, .. } => Some(ConstraintValue::Enumerated(name.clone())),
        _ => None,
    }
}
