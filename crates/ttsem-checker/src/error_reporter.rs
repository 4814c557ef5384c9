//! Diagnostic emission helpers.

use crate::options::Severity;
use crate::state::SemanticChecker;
use tracing::trace;
use ttsem_common::diagnostics::{diagnostic_codes, get_message_template};
use ttsem_common::{Diagnostic, DiagnosticSink, Location, format_message};

impl<'a, S: DiagnosticSink> SemanticChecker<'a, S> {
    /// Emit a diagnostic, keeping the error count current.
    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        trace!(
            target: "ttsem::checker",
            code = diagnostic.code,
            message = %diagnostic.message_text,
            "diagnostic"
        );
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.sink.report(diagnostic);
    }

    /// Emit the message registered for `code`, in the table's category.
    pub(crate) fn report_at(&mut self, location: &Location, code: u32, args: &[&str]) {
        self.emit(Diagnostic::from_code(location.clone(), code, args));
    }

    /// Emit the message registered for `code` as an error regardless of the
    /// table's category.
    pub(crate) fn error_at(&mut self, location: &Location, code: u32, args: &[&str]) {
        let template = get_message_template(code).unwrap_or("{0}");
        self.emit(Diagnostic::error(
            location.clone(),
            format_message(template, args),
            code,
        ));
    }

    /// Report a compatible assignment that needs a conversion, at the
    /// configured severity.
    pub(crate) fn report_type_compatibility(
        &mut self,
        location: &Location,
        expected: &str,
        actual: &str,
    ) {
        let code = diagnostic_codes::TYPE_COMPATIBILITY;
        match self.options.type_compatibility {
            Severity::Ignore => {}
            Severity::Warning => self.report_at(location, code, &[expected, actual]),
            Severity::Error => self.error_at(location, code, &[expected, actual]),
        }
    }
}
