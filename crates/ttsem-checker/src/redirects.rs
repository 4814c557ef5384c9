//! Parameter redirects of `getcall`, `getreply` and `catch`.
//!
//! A redirect assigns signature parameters to variables by name. When the
//! redirect is valid the checker stores one variable entry per signature
//! parameter, in parameter order, so the runtime can copy values
//! positionally.

use crate::assignments::{Expectation, ValueReference};
use crate::state::SemanticChecker;
use rustc_hash::FxHashMap;
use tracing::debug;
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{CheckStamp, DiagnosticSink, Location, TypeKind};
use ttsem_solver::{ParamDirection, TypeId};

/// `parameter := variable` inside a `-> param (...)` clause.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterAssignment {
    pub parameter: String,
    pub variable: String,
    /// Declared type of the variable, when known.
    pub variable_type: Option<TypeId>,
    pub location: Location,
}

impl ParameterAssignment {
    pub fn new(
        parameter: impl Into<String>,
        variable: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            variable: variable.into(),
            variable_type: None,
            location,
        }
    }

    #[must_use]
    pub fn with_variable_type(mut self, ty: TypeId) -> Self {
        self.variable_type = Some(ty);
        self
    }
}

/// Slot for one signature parameter; `None` when it is not redirected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableEntry {
    pub parameter: String,
    pub variable: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterRedirect {
    pub location: Location,
    pub assignments: Vec<ParameterAssignment>,
    stamp: CheckStamp,
    entries: Option<Vec<VariableEntry>>,
}

impl ParameterRedirect {
    pub fn new(location: Location, assignments: Vec<ParameterAssignment>) -> Self {
        Self {
            location,
            assignments,
            stamp: CheckStamp::new(),
            entries: None,
        }
    }

    /// Variable entries built by the last successful check.
    pub fn entries(&self) -> Option<&[VariableEntry]> {
        self.entries.as_deref()
    }

    #[inline]
    pub fn is_erroneous(&self) -> bool {
        self.stamp.is_erroneous()
    }
}

impl<'a, S: DiagnosticSink> SemanticChecker<'a, S> {
    /// Check a parameter redirect against the signature it belongs to.
    ///
    /// `is_out` selects the reply side (`getreply`, `catch`), where only
    /// `out` and `inout` parameters carry values; otherwise the call side,
    /// where only `in` and `inout` parameters do.
    pub fn check_parameter_redirect(
        &mut self,
        signature: TypeId,
        redirect: &mut ParameterRedirect,
        is_out: bool,
    ) -> bool {
        if !redirect.stamp.begin(&self.ctx) {
            return !redirect.stamp.is_erroneous();
        }
        redirect.entries = None;
        if self.is_silenced(signature) {
            return true;
        }

        let store = self.store;
        let signature_name = store.name(signature);
        let Ok(resolved) = store.resolve_alias(signature) else {
            return true;
        };
        let node = store.get(resolved);
        let errors_before = self.error_count;

        if node.kind != TypeKind::Signature {
            self.report_at(
                &redirect.location,
                diagnostic_codes::NOT_A_SIGNATURE,
                &[signature_name],
            );
        } else if node.parameters.is_empty() {
            self.report_at(
                &redirect.location,
                diagnostic_codes::SIGNATURE_WITHOUT_PARAMETERS,
                &[signature_name],
            );
        } else {
            let mut first_given: FxHashMap<&str, &Location> = FxHashMap::default();
            for assignment in &redirect.assignments {
                let name = assignment.parameter.as_str();
                if let Some(first) = first_given.get(name) {
                    self.report_at(
                        &assignment.location,
                        diagnostic_codes::DUPLICATE_REDIRECT,
                        &[name],
                    );
                    self.report_at(first, diagnostic_codes::REDIRECT_ALREADY_GIVEN, &[name]);
                    continue;
                }
                first_given.insert(name, &assignment.location);

                let Some(parameter) = node.parameter(name) else {
                    self.report_at(
                        &assignment.location,
                        diagnostic_codes::NO_SUCH_PARAMETER,
                        &[signature_name, name],
                    );
                    continue;
                };
                match (is_out, parameter.direction) {
                    (true, ParamDirection::In) => self.report_at(
                        &assignment.location,
                        diagnostic_codes::PARAMETER_HAS_IN_DIRECTION,
                        &[name, signature_name],
                    ),
                    (false, ParamDirection::Out) => self.report_at(
                        &assignment.location,
                        diagnostic_codes::PARAMETER_HAS_OUT_DIRECTION,
                        &[name, signature_name],
                    ),
                    _ => {
                        if let Some(variable_ty) = assignment.variable_type
                            && let Ok(parameter_ty) = store.resolve_ref(&parameter.ty)
                        {
                            let source =
                                ValueReference::new(assignment.location.clone(), parameter_ty);
                            self.check_referenced_value(variable_ty, &source, Expectation::Value);
                        }
                    }
                }
            }
        }

        let ok = self.error_count == errors_before;
        redirect.stamp.set_erroneous(!ok);
        if ok {
            let entries = node
                .parameters
                .iter()
                .map(|parameter| VariableEntry {
                    parameter: parameter.name.clone(),
                    variable: redirect
                        .assignments
                        .iter()
                        .find(|a| a.parameter == parameter.name)
                        .map(|a| a.variable.clone()),
                })
                .collect();
            redirect.entries = Some(entries);
        }
        debug!(
            target: "ttsem::checker",
            signature = signature_name,
            is_out,
            ok,
            "parameter redirect checked"
        );
        ok
    }
}
