use colored::Colorize;

use crate::cli::driver::{MatchOutcome, RunReport};
use ttsem_common::diagnostics::DiagnosticRelatedInformation;
use ttsem_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Diagnostics first, then one line per match, then the summary.
    pub fn render(&self, report: &RunReport) -> String {
        let mut lines: Vec<String> = report
            .diagnostics
            .iter()
            .map(|d| self.format_diagnostic(d))
            .collect();
        lines.extend(report.matches.iter().map(|m| self.format_match(m)));
        lines.push(self.format_summary(report));
        lines.join("\n")
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        if diagnostic.location.file.is_empty() {
            output.push_str("<unknown>");
        } else {
            output.push_str(&diagnostic.location.to_string());
        }

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{}: {} - {}", prefix, related.location, related.message_text)
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.to_string();
        if !self.color {
            return label;
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let code = format!("TT{code}");
        if self.color {
            code.dimmed().to_string()
        } else {
            code
        }
    }

    pub fn format_match(&self, outcome: &MatchOutcome) -> String {
        let verdict = match (outcome.matched, &outcome.error) {
            (_, Some(error)) => format!("error: {error}"),
            (Some(true), None) => "matched".to_string(),
            (Some(false), None) => "did not match".to_string(),
            (None, None) => "not evaluated".to_string(),
        };
        let mut line = format!("{} - {verdict}", outcome.name);
        if let Some(expected) = outcome.expected
            && outcome.is_failure()
            && outcome.error.is_none()
        {
            line.push_str(if expected {
                " (expected a match)"
            } else {
                " (expected no match)"
            });
        }
        if self.color && outcome.is_failure() {
            line.red().to_string()
        } else {
            line
        }
    }

    fn format_summary(&self, report: &RunReport) -> String {
        let errors = report.error_count();
        let warnings = report.diagnostics.len() - errors;
        let failed = report.failed_matches();
        let summary = format!(
            "Found {errors} error{}, {warnings} other diagnostic{} and {failed} failed match{}.",
            plural(errors, "s"),
            plural(warnings, "s"),
            plural(failed, "es"),
        );
        if self.color && !report.is_success() {
            summary.red().bold().to_string()
        } else {
            summary
        }
    }
}

fn plural(count: usize, suffix: &'static str) -> &'static str {
    if count == 1 { "" } else { suffix }
}

#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
