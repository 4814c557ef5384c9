//! Runs a check document: declaration checks, the listed semantic checks and
//! the template matches.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info_span};
use ttsem_checker::{
    CheckerOptions, Expectation, ParameterAssignment, ParameterRedirect, SemanticChecker,
    ValueReference,
};
use ttsem_common::{AnalysisContext, Diagnostic, Location, TimestampSource};
use ttsem_runtime::{MatchingContext, RawCodec};
use ttsem_solver::TypeStore;

use crate::cli::config::{CheckDocument, CheckEntry, MatchEntry};
use crate::cli::document;

/// Outcome of one `matches` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub name: String,
    /// `None` when matching failed with an error.
    pub matched: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchOutcome {
    /// An error, or an outcome other than the expected one.
    pub fn is_failure(&self) -> bool {
        match (self.matched, self.expected) {
            (None, _) => true,
            (Some(matched), Some(expected)) => matched != expected,
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub diagnostics: Vec<Diagnostic>,
    pub matches: Vec<MatchOutcome>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn failed_matches(&self) -> usize {
        self.matches.iter().filter(|m| m.is_failure()).count()
    }

    pub fn is_success(&self) -> bool {
        self.error_count() == 0 && self.failed_matches() == 0
    }
}

/// Run every check and match of `document` in a single analysis pass.
pub fn run(document: &CheckDocument, options: CheckerOptions) -> Result<RunReport> {
    let store = document::build_store(document)?;
    let mut clock = TimestampSource::new();
    let ctx = AnalysisContext::new(clock.next());

    let mut checker = SemanticChecker::new(&store, ctx, options);
    let erroneous = checker.check_declarations();
    debug!(erroneous, "declarations checked");

    for (index, check) in document.checks.iter().enumerate() {
        let label = check
            .name()
            .map_or_else(|| format!("checks[{index}]"), str::to_string);
        let _span = info_span!("check", %label).entered();
        run_check(&mut checker, &store, Location::file(label.as_str()), check)
            .with_context(|| format!("in check `{label}'"))?;
    }

    let diagnostics = checker.into_sink().into_diagnostics();

    let codec = RawCodec;
    let matching = MatchingContext::new(options.legacy_matching).with_codec(&codec);
    let matches = document
        .matches
        .iter()
        .enumerate()
        .map(|(index, entry)| run_match(&store, &matching, index, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(RunReport {
        diagnostics,
        matches,
    })
}

fn run_check(
    checker: &mut SemanticChecker<'_>,
    store: &TypeStore,
    location: Location,
    check: &CheckEntry,
) -> Result<bool> {
    let ok = match check {
        CheckEntry::Reference {
            expected,
            actual,
            template,
            string_element,
            ..
        } => {
            let expected = document::lookup_type(store, expected)?;
            let mut reference = ValueReference::new(location, document::lookup_type(store, actual)?);
            if *string_element {
                reference = reference.string_element();
            }
            let expectation = if *template {
                Expectation::Template
            } else {
                Expectation::Value
            };
            checker.check_referenced_value(expected, &reference, expectation)
        }
        CheckEntry::Expression {
            expected,
            result_kind,
            ..
        } => {
            let expected = document::lookup_type(store, expected)?;
            checker.check_expression_result(&location, expected, *result_kind)
        }
        CheckEntry::Value { ty, value, .. } => {
            let ty = document::lookup_type(store, ty)?;
            let value = document::value(store, ty, value)?;
            checker.check_value(&location, ty, &value)
        }
        CheckEntry::Template {
            ty,
            template,
            optional,
            ..
        } => {
            let ty = document::lookup_type(store, ty)?;
            let template = document::template(store, ty, template)?;
            checker.check_template(&location, ty, &template, *optional)
        }
        CheckEntry::Redirect {
            signature,
            reply,
            assignments,
            ..
        } => {
            let signature = document::lookup_type(store, signature)?;
            let assignments = assignments
                .iter()
                .map(|a| -> Result<ParameterAssignment> {
                    let assignment =
                        ParameterAssignment::new(a.parameter.as_str(), a.variable.as_str(), location.clone());
                    Ok(match &a.variable_type {
                        Some(ty) => assignment.with_variable_type(document::lookup_type(store, ty)?),
                        None => assignment,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let mut redirect = ParameterRedirect::new(location, assignments);
            checker.check_parameter_redirect(signature, &mut redirect, *reply)
        }
    };
    debug!(ok, "check done");
    Ok(ok)
}

fn run_match(
    store: &TypeStore,
    matching: &MatchingContext<'_>,
    index: usize,
    entry: &MatchEntry,
) -> Result<MatchOutcome> {
    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| format!("matches[{index}]"));
    let ty = document::lookup_type(store, &entry.ty)?;
    let template = document::template(store, ty, &entry.template)
        .with_context(|| format!("in the template of `{name}'"))?;
    let value = document::value(store, ty, &entry.value)
        .with_context(|| format!("in the value of `{name}'"))?;

    let result = template.matches_in(&value, matching);
    debug!(%name, %template, %value, ?result, "match evaluated");
    Ok(match result {
        Ok(matched) => MatchOutcome {
            name,
            matched: Some(matched),
            expected: entry.expect,
            error: None,
        },
        Err(err) => MatchOutcome {
            name,
            matched: None,
            expected: entry.expect,
            error: Some(err.to_string()),
        },
    })
}

#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
