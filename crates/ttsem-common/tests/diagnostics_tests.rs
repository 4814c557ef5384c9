use super::*;

#[test]
fn test_format_message_fills_placeholders() {
    let text = format_message(diagnostic_messages::TYPE_MISMATCH, &["value", "integer", "charstring"]);
    assert_eq!(
        text,
        "Type mismatch: a value of type `integer' was expected instead of `charstring'"
    );
}

#[test]
fn test_from_code_uses_table_category() {
    let warning = Diagnostic::from_code(
        Location::file("m.ttcn"),
        diagnostic_codes::REDIRECT_ALREADY_GIVEN,
        &["p"],
    );
    assert_eq!(warning.category, DiagnosticCategory::Warning);
    assert_eq!(
        warning.message_text,
        "A variable entry for parameter `p' is already given here"
    );

    let error = Diagnostic::from_code(Location::file("m.ttcn"), diagnostic_codes::DUPLICATE_REDIRECT, &["p"]);
    assert!(error.is_error());
}

#[test]
fn test_every_code_is_unique() {
    let mut codes: Vec<u32> = DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
    let total = codes.len();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), total);
}

#[test]
fn test_lookup_unknown_code() {
    assert!(get_diagnostic_message(9999).is_none());
    assert_eq!(
        get_message_template(diagnostic_codes::OMIT_NOT_ALLOWED),
        Some("`omit' value is not allowed in this context")
    );
}

#[test]
fn test_collector_counts_by_category() {
    let mut collector = DiagnosticCollector::new();
    let loc = Location::new("a.ttcn", 10, 3);
    collector.error(&loc, 1, "first".to_string());
    collector.warning(&loc, 2, "second".to_string());
    collector.error(&loc, 3, "third".to_string());

    assert_eq!(collector.error_count(), 2);
    assert_eq!(collector.warning_count(), 1);
    assert!(collector.has_code(2));
    assert!(!collector.has_code(4));
    assert_eq!(collector.diagnostics()[1].message_text, "second");
}

#[test]
fn test_sink_through_mutable_reference() {
    fn report_into(mut sink: impl DiagnosticSink) {
        sink.error(&Location::file("x"), 7, "boom".to_string());
    }
    let mut collector = DiagnosticCollector::new();
    report_into(&mut collector);
    assert_eq!(collector.diagnostics().len(), 1);
}

#[test]
fn test_display_and_related_information() {
    let diag = Diagnostic::error(Location::new("a.ttcn", 4, 1), "bad", 1001)
        .with_related(Location::new("a.ttcn", 1, 1), "declared here");
    assert_eq!(diag.to_string(), "a.ttcn:4: error TT1001: bad");
    assert_eq!(diag.related_information.len(), 1);
    assert_eq!(diag.related_information[0].category, DiagnosticCategory::Message);
    assert_eq!(Location::file("T").to_string(), "T");
}

#[test]
fn test_diagnostic_serializes_without_empty_related() {
    let diag = Diagnostic::warning(Location::file("f"), "w", 1004);
    let json = serde_json::to_value(&diag).unwrap();
    assert!(json.get("related_information").is_none());
    assert_eq!(json["category"], "Warning");
}
