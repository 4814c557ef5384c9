use super::*;
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{AnalysisContext, CompilationTimestamp, DiagnosticCategory, Location, TypeKind};
use ttsem_runtime::{RecordField, Value};
use ttsem_solver::{ConstraintValue, LengthRange, Limit, SubtypeConstraint, TypeId, TypeNode, TypeStore};

fn ctx(pass: u64) -> AnalysisContext {
    AnalysisContext::new(CompilationTimestamp::new(pass))
}

fn at(start: u32) -> Location {
    Location::new("test.ttcn", start, 1)
}

fn reference(ty: TypeId) -> ValueReference {
    ValueReference::new(at(10), ty)
}

fn int_range(min: i64, max: i64) -> SubtypeConstraint {
    SubtypeConstraint::range(
        Some(Limit::inclusive(ConstraintValue::Integer(min))),
        Some(Limit::inclusive(ConstraintValue::Integer(max))),
    )
}

fn messages(checker: &SemanticChecker<'_>) -> Vec<String> {
    checker
        .diagnostics()
        .diagnostics()
        .iter()
        .map(|d| d.message_text.clone())
        .collect()
}

#[test]
fn test_kind_mismatch_names_both_types() {
    let store = TypeStore::new();
    let int = store.builtin(TypeKind::Integer).unwrap();
    let cs = store.builtin(TypeKind::Charstring).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_referenced_value(int, &reference(cs), Expectation::Value));
    assert!(!checker.check_referenced_value(int, &reference(cs), Expectation::Template));
    assert_eq!(
        messages(&checker),
        vec![
            "Type mismatch: a value of type `integer' was expected instead of `charstring'",
            "Type mismatch: a value or template of type `integer' was expected instead of `charstring'",
        ]
    );
    assert_eq!(checker.error_count(), 2);
    assert!(checker.diagnostics().has_code(diagnostic_codes::TYPE_MISMATCH));
}

#[test]
fn test_compatible_reference_reports_nothing() {
    let mut store = TypeStore::new();
    let my_int = store.insert(TypeNode::alias("MyInt", "integer"));
    let int = store.builtin(TypeKind::Integer).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_referenced_value(int, &reference(my_int), Expectation::Value));
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_subtype_conflict_reports_the_intersector_text() {
    let mut store = TypeStore::new();
    let small = store.insert(TypeNode::alias("Small", "integer").with_subtype(int_range(1, 10)));
    let large = store.insert(TypeNode::alias("Large", "integer").with_subtype(int_range(20, 30)));
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_referenced_value(small, &reference(large), Expectation::Value));
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::SUBTYPE_MISMATCH);
    assert_eq!(
        diagnostics[0].message_text,
        "Subtype mismatch: subtype (1 .. 10) has no common value with subtype (20 .. 30)"
    );
}

#[test]
fn test_structured_mismatch_reports_the_structural_explanation() {
    let mut store = TypeStore::new();
    let r1 = store.insert(TypeNode::new("R1", TypeKind::Record).with_field("a", "integer", false));
    let r2 = store.insert(TypeNode::new("R2", TypeKind::Record).with_field("a", "charstring", false));
    let options = CheckerOptions {
        strict_structural: true,
        ..CheckerOptions::default()
    };
    let mut checker = SemanticChecker::new(&store, ctx(1), options);

    assert!(!checker.check_referenced_value(r1, &reference(r2), Expectation::Value));
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics[0].code, diagnostic_codes::STRUCTURED_TYPE_MISMATCH);
    assert_eq!(
        diagnostics[0].message_text,
        "Type mismatch: `R1' and `R2' are not compatible: a: `integer' and `charstring' are not compatible"
    );
}

#[test]
fn test_structural_conversion_severity() {
    let mut store = TypeStore::new();
    let p1 = store.insert(TypeNode::new("P1", TypeKind::Record).with_field("x", "integer", false));
    let p2 = store.insert(TypeNode::new("P2", TypeKind::Record).with_field("y", "integer", false));

    let run = |severity: Severity| {
        let options = CheckerOptions {
            strict_structural: true,
            type_compatibility: severity,
            legacy_matching: false,
        };
        let mut checker = SemanticChecker::new(&store, ctx(1), options);
        assert!(checker.check_referenced_value(p1, &reference(p2), Expectation::Value));
        checker.into_sink().into_diagnostics()
    };

    let warned = run(Severity::Warning);
    assert_eq!(warned.len(), 1);
    assert_eq!(warned[0].category, DiagnosticCategory::Warning);
    assert_eq!(warned[0].message_text, "Type compatibility between `P1' and `P2'");

    let errored = run(Severity::Error);
    assert_eq!(errored[0].category, DiagnosticCategory::Error);

    assert!(run(Severity::Ignore).is_empty());
}

#[test]
fn test_nominal_mode_never_asks_for_conversion() {
    let mut store = TypeStore::new();
    let p1 = store.insert(TypeNode::new("P1", TypeKind::Record).with_field("x", "integer", false));
    let p2 = store.insert(TypeNode::new("P2", TypeKind::Record).with_field("y", "integer", false));
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_referenced_value(p1, &reference(p2), Expectation::Value));
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_port_mismatch_is_silent_and_signature_only_reports_for_templates() {
    let mut store = TypeStore::new();
    let port = store.insert(TypeNode::new("P", TypeKind::Port));
    let sig = store.insert(TypeNode::new("S", TypeKind::Signature));
    let int = store.builtin(TypeKind::Integer).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_referenced_value(port, &reference(int), Expectation::Value));
    assert!(!checker.check_referenced_value(sig, &reference(int), Expectation::Value));
    assert!(checker.diagnostics().is_empty());

    assert!(!checker.check_referenced_value(sig, &reference(int), Expectation::Template));
    assert_eq!(
        messages(&checker),
        vec!["Type mismatch: a signature template of type `S' was expected instead of `integer'"]
    );
}

#[test]
fn test_expression_result_kind() {
    let store = TypeStore::new();
    let ucs = store.builtin(TypeKind::UniversalCharstring).unwrap();
    let int = store.builtin(TypeKind::Integer).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_expression_result(&at(1), ucs, TypeKind::Charstring));
    assert!(!checker.check_expression_result(&at(2), int, TypeKind::Real));
    assert_eq!(messages(&checker), vec!["Incompatible value: `integer' was expected"]);
}

#[test]
fn test_literal_values() {
    let mut store = TypeStore::new();
    let color = store.insert(
        TypeNode::new("Color", TypeKind::Enumerated)
            .with_enumerator("red", 0)
            .with_enumerator("blue", 1),
    );
    let small = store.insert(TypeNode::alias("Small", "integer").with_subtype(int_range(1, 10)));
    let point = store.insert(
        TypeNode::new("Point", TypeKind::Record)
            .with_field("x", "Small", false)
            .with_field("label", "charstring", true),
    );
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());
    let loc = at(3);

    assert!(checker.check_value(&loc, color, &Value::enumerated(TypeKind::Enumerated, "blue", 1)));
    assert!(!checker.check_value(&loc, color, &Value::enumerated(TypeKind::Enumerated, "green", 2)));
    assert!(checker.check_value(&loc, small, &Value::integer(5)));
    assert!(!checker.check_value(&loc, small, &Value::integer(11)));
    let good = Value::record(
        TypeKind::Record,
        vec![
            RecordField::present("x", Value::integer(2)),
            RecordField::omitted("label"),
        ],
    );
    assert!(checker.check_value(&loc, point, &good));
    let bad = Value::record(TypeKind::Record, vec![RecordField::present("z", Value::integer(2))]);
    assert!(!checker.check_value(&loc, point, &bad));

    assert_eq!(
        messages(&checker),
        vec![
            "There is no enumerated value `green' in type `Color'",
            "11 is not a valid value for type `Small' which has subtype (1 .. 10)",
            "Reference to non-existent field `z' in record template for type `Point'",
        ]
    );
}

#[test]
fn test_erroneous_types_silence_the_check() {
    let mut store = TypeStore::new();
    let broken = store.insert(TypeNode::alias("Broken", "NoSuchType"));
    let int = store.builtin(TypeKind::Integer).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_referenced_value(int, &reference(broken), Expectation::Value));
    assert!(checker.check_expression_result(&at(1), broken, TypeKind::Boolean));
    assert_eq!(messages(&checker), vec!["There is no local or imported definition with name `NoSuchType'"]);
}

#[test]
fn test_reference_checks_declarations_first() {
    let mut store = TypeStore::new();
    let bad_int = store.insert(
        TypeNode::alias("BadInt", "integer")
            .with_subtype(SubtypeConstraint::lengths([LengthRange::exact(1)])),
    );
    let cs = store.builtin(TypeKind::Charstring).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_referenced_value(bad_int, &reference(cs), Expectation::Value));
    assert!(store.is_erroneous(bad_int));
    checker.check_declarations();
    assert!(checker.check_referenced_value(bad_int, &reference(cs), Expectation::Value));

    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, diagnostic_codes::SUBTYPE_NOT_APPLICABLE);
}

#[test]
fn test_declaration_checked_after_a_query_silences_later_queries() {
    let mut store = TypeStore::new();
    let bad_int = store.insert(
        TypeNode::alias("BadInt", "integer")
            .with_subtype(SubtypeConstraint::lengths([LengthRange::exact(1)])),
    );
    let cs = store.builtin(TypeKind::Charstring).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.compat().is_compatible(bad_int, cs));
    checker.check_type(bad_int);
    assert!(checker.compat().is_compatible(bad_int, cs));
}

#[test]
fn test_severity_parsing() {
    assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
    assert_eq!(" Error ".parse::<Severity>(), Ok(Severity::Error));
    assert_eq!("off".parse::<Severity>(), Ok(Severity::Ignore));
    let err = "loud".parse::<Severity>().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown severity `loud' (expected ignore, warning or error)"
    );
}
