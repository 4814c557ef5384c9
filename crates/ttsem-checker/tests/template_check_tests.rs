use super::*;
use ttsem_common::diagnostics::diagnostic_codes;
use ttsem_common::{AnalysisContext, CompilationTimestamp, Location, TypeKind};
use ttsem_runtime::{
    DecodeTarget, FieldTemplate, LengthRestriction, PatternCompiler, RangeBound, Template, TemplateSelector,
    Value, ValueRange, WildcardPatternCompiler,
};
use ttsem_solver::{TypeId, TypeNode, TypeStore};

fn ctx() -> AnalysisContext {
    AnalysisContext::new(CompilationTimestamp::new(1))
}

fn loc() -> Location {
    Location::new("t.ttcn", 40, 8)
}

fn int(v: i64) -> Template {
    Template::specific(Value::integer(v))
}

fn check(store: &TypeStore, ty: TypeId, template: &Template, optional: bool) -> Vec<String> {
    let mut checker = SemanticChecker::new(store, ctx(), CheckerOptions::default());
    let ok = checker.check_template(&loc(), ty, template, optional);
    let messages: Vec<String> = checker
        .diagnostics()
        .diagnostics()
        .iter()
        .map(|d| d.message_text.clone())
        .collect();
    assert_eq!(ok, messages.is_empty(), "{messages:?}");
    messages
}

fn point_store() -> (TypeStore, TypeId) {
    let mut store = TypeStore::new();
    let point = store.insert(
        TypeNode::new("Point", TypeKind::Record)
            .with_field("x", "integer", false)
            .with_field("label", "charstring", true),
    );
    (store, point)
}

#[test]
fn test_omit_and_ifpresent_need_an_optional_context() {
    let store = TypeStore::new();
    let int_ty = store.builtin(TypeKind::Integer).unwrap();

    assert!(check(&store, int_ty, &Template::omit(), true).is_empty());
    assert!(check(&store, int_ty, &Template::any().with_if_present(true), true).is_empty());
    assert_eq!(
        check(&store, int_ty, &Template::omit(), false),
        vec!["`omit' value is not allowed in this context"]
    );
    assert_eq!(
        check(&store, int_ty, &Template::any().with_if_present(true), false),
        vec!["`ifpresent' is not allowed here"]
    );
}

#[test]
fn test_record_template_fields() {
    let (store, point) = point_store();
    let good = Template::record(
        TypeKind::Record,
        vec![
            FieldTemplate::new("x", int(1)),
            FieldTemplate::new("label", Template::omit()),
        ],
    );
    assert!(check(&store, point, &good, false).is_empty());

    let bad = Template::record(
        TypeKind::Record,
        vec![
            FieldTemplate::new("x", Template::omit()),
            FieldTemplate::new("z", int(1)),
        ],
    );
    assert_eq!(
        check(&store, point, &bad, false),
        vec![
            "`omit' value is not allowed in this context",
            "Reference to non-existent field `z' in record template for type `Point'",
            "Field `label' is missing from template for record type `Point'",
        ]
    );
}

#[test]
fn test_union_template_alternatives() {
    let mut store = TypeStore::new();
    let u = store.insert(
        TypeNode::new("U", TypeKind::Union)
            .with_field("i", "integer", false)
            .with_field("s", "charstring", false),
    );
    assert!(check(&store, u, &Template::union(TypeKind::Union, "i", int(3)), false).is_empty());
    assert_eq!(
        check(&store, u, &Template::union(TypeKind::Union, "f", int(3)), false),
        vec!["Reference to non-existent union field `f' in type `U'"]
    );
    assert_eq!(
        check(&store, u, &Template::union(TypeKind::Union, "s", int(3)), false),
        vec!["Incompatible value: `charstring' was expected"]
    );
}

#[test]
fn test_structured_selector_on_the_wrong_kind() {
    let store = TypeStore::new();
    let int_ty = store.builtin(TypeKind::Integer).unwrap();
    assert_eq!(
        check(&store, int_ty, &Template::elements(TypeKind::RecordOf, vec![int(1)]), false),
        vec!["List template cannot be used for type `integer'"]
    );
}

#[test]
fn test_array_element_count() {
    let mut store = TypeStore::new();
    let arr = store.insert(
        TypeNode::new("Pair", TypeKind::Array)
            .with_element("integer")
            .with_dimension(2),
    );
    let star = Template::elements(TypeKind::Array, vec![int(1), Template::any_or_omit(), int(2)]);
    assert!(check(&store, arr, &star, false).is_empty());

    let too_many = Template::elements(TypeKind::Array, vec![int(1), int(2), int(3)]);
    assert_eq!(
        check(&store, arr, &too_many, false),
        vec!["Too many elements in the template for type `Pair': 2 was expected instead of 3"]
    );
}

#[test]
fn test_range_needs_an_ordered_kind() {
    let store = TypeStore::new();
    let boolean = store.builtin(TypeKind::Boolean).unwrap();
    let int_ty = store.builtin(TypeKind::Integer).unwrap();
    let range = Template::range(Some(RangeBound::inclusive(Value::integer(1))), None).unwrap();

    assert!(check(&store, int_ty, &range, false).is_empty());
    assert_eq!(
        check(&store, boolean, &range, false),
        vec!["Value range match cannot be used for type `boolean'"]
    );
}

#[test]
fn test_inverted_range_built_directly() {
    let store = TypeStore::new();
    let int_ty = store.builtin(TypeKind::Integer).unwrap();
    let inverted = Template::new(TemplateSelector::Range(ValueRange {
        min: Some(RangeBound::inclusive(Value::integer(9))),
        max: Some(RangeBound::inclusive(Value::integer(2))),
    }));
    assert_eq!(
        check(&store, int_ty, &inverted, false),
        vec!["The lower boundary of the value range is greater than the upper boundary"]
    );
}

#[test]
fn test_length_restriction_applicability() {
    let store = TypeStore::new();
    let cs = store.builtin(TypeKind::Charstring).unwrap();
    let int_ty = store.builtin(TypeKind::Integer).unwrap();

    let any_len = Template::any().with_length(LengthRestriction::Range { min: 1, max: Some(4) });
    assert!(check(&store, cs, &any_len, false).is_empty());
    assert_eq!(
        check(&store, int_ty, &any_len, false),
        vec!["Length restriction cannot be used in a template of type `integer'"]
    );

    let inverted = Template::any().with_length(LengthRestriction::Range { min: 5, max: Some(2) });
    assert_eq!(
        check(&store, cs, &inverted, false),
        vec!["The lower boundary of the length restriction (5) is greater than the upper boundary (2)"]
    );
}

#[test]
fn test_pattern_only_on_character_strings() {
    let store = TypeStore::new();
    let cs = store.builtin(TypeKind::Charstring).unwrap();
    let os = store.builtin(TypeKind::Octetstring).unwrap();
    let pattern = Template::pattern(WildcardPatternCompiler.compile("ab*", false).unwrap());

    assert!(check(&store, cs, &pattern, false).is_empty());
    assert_eq!(
        check(&store, os, &pattern, false),
        vec!["Character string pattern cannot be used for type `octetstring'"]
    );
}

#[test]
fn test_value_lists_inherit_the_context() {
    let (store, point) = point_store();
    let label_ty = store.lookup("charstring").unwrap();
    let list = Template::value_list(vec![Template::omit(), Template::specific(Value::charstring("a"))]);

    assert!(check(&store, label_ty, &list, true).is_empty());
    assert_eq!(
        check(&store, label_ty, &list, false),
        vec!["`omit' value is not allowed in this context"]
    );
    let complemented = Template::complemented_list(vec![int(1)]);
    assert_eq!(
        check(&store, point, &complemented, false),
        vec!["Incompatible value: `Point' was expected"]
    );
}

#[test]
fn test_decoded_content_match() {
    let mut store = TypeStore::new();
    let os = store.builtin(TypeKind::Octetstring).unwrap();
    let int_ty = store.builtin(TypeKind::Integer).unwrap();
    store.insert(TypeNode::alias("Counter", "integer"));

    let target = DecodeTarget::new("Counter", TypeKind::Integer);
    let decmatch = Template::decode_match(target.clone(), int(5));
    assert!(check(&store, os, &decmatch, false).is_empty());

    let wrong_inner = Template::decode_match(target.clone(), Template::specific(Value::boolean(true)));
    assert_eq!(
        check(&store, os, &wrong_inner, false),
        vec!["Incompatible value: `Counter' was expected"]
    );
    assert_eq!(
        check(&store, int_ty, &decmatch, false),
        vec!["Decoded content match cannot be used for type `integer'"]
    );
}

#[test]
fn test_codes_for_template_errors() {
    let (store, point) = point_store();
    let mut checker = SemanticChecker::new(&store, ctx(), CheckerOptions::default());
    checker.check_template(&loc(), point, &Template::union(TypeKind::Union, "x", int(1)), false);
    assert!(checker.diagnostics().has_code(diagnostic_codes::TEMPLATE_NOT_ALLOWED));
    assert_eq!(checker.diagnostics().diagnostics()[0].location, loc());
}
