use super::*;
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{AnalysisContext, CompilationTimestamp, DiagnosticCategory, Location, TypeKind};
use ttsem_solver::{ConstraintValue, LengthRange, Limit, SubtypeConstraint, TypeNode, TypeStore};

fn ctx(pass: u64) -> AnalysisContext {
    AnalysisContext::new(CompilationTimestamp::new(pass))
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
fn test_valid_declarations_pass() {
    let mut store = TypeStore::new();
    store.insert(TypeNode::alias("Small", "integer").with_subtype(int_range(1, 10)));
    store.insert(
        TypeNode::new("Point", TypeKind::Record)
            .with_field("x", "Small", false)
            .with_field("next", "Point", true),
    );
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());
    assert_eq!(checker.check_declarations(), 0);
    assert!(checker.diagnostics().is_empty());
}

#[test]
fn test_unresolved_and_circular_aliases() {
    let mut store = TypeStore::new();
    let dangling = store.insert(TypeNode::alias("Dangling", "Nowhere"));
    let a = store.insert(TypeNode::alias("A", "B"));
    store.insert(TypeNode::alias("B", "A"));
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_type(dangling));
    assert!(!checker.check_type(a));
    assert_eq!(
        messages(&checker),
        vec![
            "There is no local or imported definition with name `Nowhere'",
            "Circular type reference chain: A -> B -> A",
        ]
    );
    assert!(store.get(dangling).is_erroneous());
}

#[test]
fn test_unresolved_member_types() {
    let mut store = TypeStore::new();
    let rec = store.insert(TypeNode::new("R", TypeKind::Record).with_field("f", "Missing", false));
    let list = store.insert(TypeNode::new("L", TypeKind::RecordOf).with_element("AlsoMissing"));
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_type(rec));
    assert!(!checker.check_type(list));
    assert_eq!(checker.error_count(), 2);
    assert_eq!(
        checker.diagnostics().diagnostics()[1].location,
        Location::file("L")
    );
}

#[test]
fn test_duplicate_members() {
    let mut store = TypeStore::new();
    let rec = store.insert(
        TypeNode::new("R", TypeKind::Record)
            .with_field("a", "integer", false)
            .with_field("a", "boolean", false),
    );
    let color = store.insert(
        TypeNode::new("Color", TypeKind::Enumerated)
            .with_enumerator("red", 0)
            .with_enumerator("red", 1),
    );
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    checker.check_type(rec);
    checker.check_type(color);
    assert_eq!(
        messages(&checker),
        vec![
            "Duplicate field name `a' in type `R'",
            "Duplicate enumeration identifier `red' in type `Color'",
        ]
    );
}

#[test]
fn test_subtype_applicability() {
    let mut store = TypeStore::new();
    let on_bool = store.insert(
        TypeNode::alias("B", "boolean").with_subtype(int_range(0, 1)),
    );
    let on_port = store.insert(
        TypeNode::new("P", TypeKind::Port)
            .with_subtype(SubtypeConstraint::values([ConstraintValue::Integer(1)])),
    );
    let on_string = store.insert(
        TypeNode::alias("S", "charstring").with_subtype(SubtypeConstraint::lengths([LengthRange::exact(3)])),
    );
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_type(on_bool));
    assert!(!checker.check_type(on_port));
    assert!(checker.check_type(on_string));
    assert_eq!(
        messages(&checker),
        vec![
            "TTCN-3 subtype constraints are not applicable to type `B'",
            "TTCN-3 subtype constraints are not applicable to type `P'",
        ]
    );
}

#[test]
fn test_inverted_bounds() {
    let mut store = TypeStore::new();
    let range = store.insert(TypeNode::alias("R", "integer").with_subtype(int_range(10, 1)));
    let length = store.insert(
        TypeNode::alias("L", "octetstring")
            .with_subtype(SubtypeConstraint::lengths([LengthRange::between(5, Some(2))])),
    );
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_type(range));
    assert!(!checker.check_type(length));
    assert_eq!(
        messages(&checker),
        vec![
            "The lower boundary `10' is greater than the upper boundary `1'",
            "The lower boundary `5' is greater than the upper boundary `2'",
        ]
    );
}

#[test]
fn test_alias_must_narrow_its_parent() {
    let mut store = TypeStore::new();
    store.insert(TypeNode::alias("Small", "integer").with_subtype(int_range(1, 10)));
    let narrower = store.insert(TypeNode::alias("Smaller", "Small").with_subtype(int_range(2, 5)));
    let wider = store.insert(TypeNode::alias("Wider", "Small").with_subtype(int_range(0, 20)));
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_type(narrower));
    assert!(!checker.check_type(wider));
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics[0].code, diagnostic_codes::SUBTYPE_NOT_A_SUBSET);
    assert_eq!(
        diagnostics[0].message_text,
        "The subtype restriction (0 .. 20) of type `Wider' is not a subset of the restriction (1 .. 10) of its parent type `Small'"
    );
}

#[test]
fn test_empty_subtype_is_only_a_warning() {
    let mut store = TypeStore::new();
    let empty = store.insert(
        TypeNode::alias("Nothing", "integer").with_subtype(SubtypeConstraint::values(Vec::<ConstraintValue>::new())),
    );
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(checker.check_type(empty));
    let diagnostics = checker.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, DiagnosticCategory::Warning);
    assert_eq!(diagnostics[0].message_text, "The subtype of type `Nothing' is an empty set");
}

#[test]
fn test_declarations_are_checked_once_per_pass() {
    let mut store = TypeStore::new();
    let dangling = store.insert(TypeNode::alias("Dangling", "Nowhere"));
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.check_type(dangling));
    assert!(!checker.check_type(dangling));
    assert_eq!(checker.check_declarations(), 1);
    assert_eq!(checker.error_count(), 1);

    checker.set_context(ctx(2));
    assert!(!checker.check_type(dangling));
    assert_eq!(checker.error_count(), 2);
}

#[test]
fn test_erroneous_declaration_becomes_universally_compatible() {
    let mut store = TypeStore::new();
    let bad = store.insert(
        TypeNode::new("Bad", TypeKind::Record)
            .with_field("a", "integer", false)
            .with_field("a", "integer", false),
    );
    let int = store.builtin(TypeKind::Integer).unwrap();
    let mut checker = SemanticChecker::new(&store, ctx(1), CheckerOptions::default());

    assert!(!checker.compat().is_compatible(bad, int));
    assert!(!checker.check_type(bad));
    checker.set_context(ctx(2));
    assert!(checker.compat().is_compatible(bad, int));
}
