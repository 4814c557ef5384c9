use super::*;
use crate::pattern::{PatternCompiler, WildcardPatternCompiler};

fn int(v: i64) -> Template {
    Template::specific(Value::integer(v))
}

fn int_range(min: Option<RangeBound>, max: Option<RangeBound>) -> Template {
    Template::range(min, max).unwrap()
}

#[test]
fn test_range_rejects_inverted_bounds() {
    let err = Template::range(
        Some(RangeBound::inclusive(Value::integer(5))),
        Some(RangeBound::inclusive(Value::integer(1))),
    )
    .unwrap_err();
    assert!(matches!(err, MatchError::InvalidRange(_)));

    let mut range = int_range(None, Some(RangeBound::inclusive(Value::integer(3))));
    assert_eq!(
        range.set_min(RangeBound::inclusive(Value::integer(4))),
        Err(MatchError::InvalidRange(
            "The lower limit of the range is greater than the upper limit".to_string()
        ))
    );
    assert!(range.set_min(RangeBound::inclusive(Value::integer(3))).is_ok());
}

#[test]
fn test_bounds_only_on_ranges() {
    let mut any = Template::any();
    assert!(any.set_max(RangeBound::inclusive(Value::integer(1))).is_err());
}

#[test]
fn test_character_bounds_must_be_single_characters() {
    let err = Template::range(Some(RangeBound::inclusive(Value::charstring("ab"))), None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The length of the lower bound in a charstring value range template must be 1 instead of 2"
    );
}

#[test]
fn test_list_item() {
    let list = Template::value_list(vec![int(1), int(2)]);
    assert_eq!(list.list_item(1).unwrap().to_string(), "2");
    assert_eq!(list.list_item(2).unwrap_err(), MatchError::ListIndex { index: 2, len: 2 });
    assert_eq!(int(1).list_item(0).unwrap_err(), MatchError::NotAList);
}

#[test]
fn test_value_of_requires_a_specific_mandatory_template() {
    assert_eq!(int(4).value_of(), Ok(Value::integer(4)));
    assert_eq!(int(4).with_if_present(true).value_of(), Err(MatchError::NonSpecificValue));
    assert_eq!(Template::any().value_of(), Err(MatchError::NonSpecificValue));
    assert_eq!(Template::uninitialized().value_of(), Err(MatchError::UninitializedTemplate));
}

#[test]
fn test_value_of_builds_structured_values() {
    let template = Template::record(
        TypeKind::Record,
        vec![
            FieldTemplate::new("a", int(1)),
            FieldTemplate::new("b", Template::omit()),
            FieldTemplate::new("c", Template::elements(TypeKind::RecordOf, vec![int(2), int(3)])),
        ],
    );
    let value = template.value_of().unwrap();
    assert_eq!(value.to_string(), "{ a := 1, b := omit, c := { 2, 3 } }");

    let with_any = Template::record(TypeKind::Record, vec![FieldTemplate::new("a", Template::any())]);
    assert_eq!(with_any.value_of(), Err(MatchError::NonSpecificValue));
}

#[test]
fn test_length_of_specific_and_lists() {
    let s = |text: &str| Template::specific(Value::charstring(text));
    assert_eq!(s("abc").length_of(), Ok(TemplateLength::Exact(3)));
    assert_eq!(
        Template::value_list(vec![s("ab"), s("cd")]).length_of(),
        Ok(TemplateLength::Exact(2))
    );
    assert_eq!(
        Template::value_list(vec![s("ab"), s("cde")]).length_of(),
        Err(MatchError::AmbiguousLength(
            "containing a value list with different lengths".to_string()
        ))
    );
}

#[test]
fn test_length_of_unbounded_templates() {
    assert_eq!(Template::any().length_of(), Ok(TemplateLength::Unbounded { min: 0 }));
    assert_eq!(
        Template::any().with_length(LengthRestriction::Single(4)).length_of(),
        Ok(TemplateLength::Exact(4))
    );
    assert_eq!(
        Template::any()
            .with_length(LengthRestriction::Range { min: 2, max: Some(2) })
            .length_of(),
        Ok(TemplateLength::Exact(2))
    );
    let elements = Template::elements(TypeKind::RecordOf, vec![int(1), Template::any_or_omit(), int(2)]);
    assert_eq!(elements.length_of(), Ok(TemplateLength::Unbounded { min: 2 }));
}

#[test]
fn test_length_of_rejects_non_specific_templates() {
    assert_eq!(Template::omit().length_of(), Err(MatchError::LengthOfNonSpecific("omit value")));
    assert_eq!(
        Template::complemented_list(vec![int(1)]).length_of(),
        Err(MatchError::LengthOfNonSpecific("complemented list"))
    );
    assert_eq!(
        Template::any().with_if_present(true).length_of(),
        Err(MatchError::IfPresentLength)
    );
    assert_eq!(Template::uninitialized().length_of(), Err(MatchError::UninitializedTemplate));
}

#[test]
fn test_log_notation() {
    assert_eq!(Template::any().to_string(), "?");
    assert_eq!(Template::any_or_omit().to_string(), "*");
    assert_eq!(Template::omit().to_string(), "omit");
    assert_eq!(Template::uninitialized().to_string(), "<uninitialized template>");
    assert_eq!(
        Template::complemented_list(vec![int(1), int(2)]).to_string(),
        "complement(1, 2)"
    );
    assert_eq!(
        int_range(Some(RangeBound::exclusive(Value::integer(1))), None).to_string(),
        "(!1 .. infinity)"
    );
    assert_eq!(int_range(None, None).to_string(), "(-infinity .. infinity)");
    assert_eq!(
        Template::any()
            .with_length(LengthRestriction::Range { min: 1, max: None })
            .with_if_present(true)
            .to_string(),
        "? length (1 .. infinity) ifpresent"
    );
    assert_eq!(
        Template::union(TypeKind::Union, "i", int(5)).to_string(),
        "{ i := 5 }"
    );
    let pattern = WildcardPatternCompiler.compile("a*", true).unwrap();
    assert_eq!(Template::pattern(pattern).to_string(), "pattern @nocase \"a*\"");
}
