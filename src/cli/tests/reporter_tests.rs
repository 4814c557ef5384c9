use super::*;
use ttsem_common::Location;
use ttsem_common::diagnostics::diagnostic_codes;

fn report() -> RunReport {
    RunReport {
        diagnostics: vec![
            Diagnostic::from_code(
                Location::file("checks[0]"),
                diagnostic_codes::TYPE_MISMATCH,
                &["value", "integer", "charstring"],
            ),
            Diagnostic::warning(Location::new("Point", 4, 2), "Something odd", 9)
                .with_related(Location::file("Other"), "declared here"),
        ],
        matches: vec![
            MatchOutcome {
                name: "ok".to_string(),
                matched: Some(true),
                expected: Some(true),
                error: None,
            },
            MatchOutcome {
                name: "surprise".to_string(),
                matched: Some(true),
                expected: Some(false),
                error: None,
            },
            MatchOutcome {
                name: "broken".to_string(),
                matched: None,
                expected: None,
                error: Some("Using an unbound value in matching".to_string()),
            },
        ],
    }
}

#[test]
fn renders_plain_report() {
    let output = Reporter::new(false).render(&report());
    let expected = format!(
        "checks[0] - error TT{}: Type mismatch: a value of type `integer' was expected instead of `charstring'\n\
         Point:4 - warning TT9: Something odd\n  Related: Other - declared here\n\
         ok - matched\n\
         surprise - matched (expected no match)\n\
         broken - error: Using an unbound value in matching\n\
         Found 1 error, 1 other diagnostic and 2 failed matches.",
        diagnostic_codes::TYPE_MISMATCH
    );
    assert_eq!(output, expected);
}

#[test]
fn renders_empty_report() {
    let output = Reporter::new(false).render(&RunReport::default());
    assert_eq!(output, "Found 0 errors, 0 other diagnostics and 0 failed matches.");
}

#[test]
fn colored_output_keeps_the_text() {
    colored::control::set_override(true);
    let output = Reporter::new(true).render(&report());
    colored::control::unset_override();
    assert!(output.contains("\u{1b}["));
    assert!(output.contains("Something odd"));
}
