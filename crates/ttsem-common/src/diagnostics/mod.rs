//! Diagnostic types, message lookup and the sink the checkers report to.
//!
//! Message templates live in `data.rs` and use `{0}`, `{1}`, ... placeholders
//! filled in by [`format_message`].

use serde::Serialize;
use std::fmt;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Message = 2,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Message => "message",
        })
    }
}

/// Where a diagnostic is attached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub file: String,
    pub start: u32,
    pub length: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, start: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            start,
            length,
        }
    }

    /// A location naming only a file (or a logical unit such as a type name).
    pub fn file(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.length == 0 && self.start == 0 {
            f.write_str(&self.file)
        } else {
            write!(f, "{}:{}", self.file, self.start)
        }
    }
}

/// Related information for a diagnostic (e.g., where a duplicate was first given).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub location: Location,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

/// A semantic diagnostic with optional related information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub location: Location,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        category: DiagnosticCategory,
        location: Location,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            location,
            message_text: message.into(),
            category,
            code,
            related_information: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(location: Location, message: impl Into<String>, code: u32) -> Self {
        Self::new(DiagnosticCategory::Error, location, message, code)
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(location: Location, message: impl Into<String>, code: u32) -> Self {
        Self::new(DiagnosticCategory::Warning, location, message, code)
    }

    /// Build a diagnostic from the message table, using the table's category.
    #[must_use]
    pub fn from_code(location: Location, code: u32, args: &[&str]) -> Self {
        let (category, template) = match get_diagnostic_message(code) {
            Some(m) => (m.category, m.message),
            None => (DiagnosticCategory::Error, "{0}"),
        };
        Self::new(category, location, format_message(template, args), code)
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, location: Location, message: impl Into<String>) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            location,
            message_text: message.into(),
            category: DiagnosticCategory::Message,
            code: 0,
        });
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} TT{}: {}",
            self.location, self.category, self.code, self.message_text
        )
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

// =============================================================================
// Sink
// =============================================================================

/// Receiver of semantic diagnostics.
///
/// Reporting never aborts analysis; the caller marks the offending node
/// erroneous and carries on.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    fn error(&mut self, location: &Location, code: u32, message: String) {
        self.report(Diagnostic::error(location.clone(), message, code));
    }

    fn warning(&mut self, location: &Location, code: u32, message: String) {
        self.report(Diagnostic::warning(location.clone(), message, code));
    }
}

/// Sink that keeps every diagnostic in report order.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Warning)
            .count()
    }

    pub fn has_code(&self, code: u32) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

#[cfg(test)]
#[path = "../../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
