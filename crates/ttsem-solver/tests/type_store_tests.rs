use super::*;
use crate::restriction::{ConstraintValue, Limit};

#[test]
fn test_builtins_are_registered_by_keyword() {
    let store = TypeStore::new();
    let int = store.lookup("integer").unwrap();
    assert_eq!(store.get(int).kind, TypeKind::Integer);
    assert!(store.get(int).builtin);
    assert_eq!(store.builtin(TypeKind::Integer), Some(int));
    assert_eq!(store.get(store.builtin(TypeKind::IntegerAsn).unwrap()).dialect, Dialect::Asn1);
    assert!(store.builtin(TypeKind::Record).is_none());
    assert_eq!(store.declarations().count(), 0);
}

#[test]
fn test_later_declaration_shadows_by_name() {
    let mut store = TypeStore::new();
    let first = store.insert(TypeNode::new("T", TypeKind::Record));
    let second = store.insert(TypeNode::new("T", TypeKind::Set));
    assert_ne!(first, second);
    assert_eq!(store.lookup("T"), Some(second));
    assert_eq!(store.get(first).kind, TypeKind::Record);
}

#[test]
fn test_alias_chain_resolves_to_the_concrete_type() {
    let mut store = TypeStore::new();
    let a = store.insert(TypeNode::alias("A", "B"));
    let b = store.insert(TypeNode::alias("B", "integer"));
    let int = store.lookup("integer").unwrap();
    assert_eq!(store.resolve_alias(a), Ok(int));
    assert_eq!(store.resolve_alias(b), Ok(int));
    assert_eq!(store.resolved_kind(a), (TypeKind::Integer, Dialect::Ttcn3));
}

#[test]
fn test_unresolved_alias() {
    let mut store = TypeStore::new();
    let a = store.insert(TypeNode::alias("A", "Missing"));
    assert_eq!(
        store.resolve_alias(a),
        Err(ResolveError::Unresolved("Missing".to_string()))
    );
    assert_eq!(store.resolved_kind(a).0, TypeKind::Undefined);
}

#[test]
fn test_circular_alias_is_reported_with_its_chain() {
    let mut store = TypeStore::new();
    let a = store.insert(TypeNode::alias("A", "B"));
    store.insert(TypeNode::alias("B", "A"));
    match store.resolve_alias(a) {
        Err(ResolveError::Circular(chain)) => {
            assert_eq!(chain, vec!["A".to_string(), "B".to_string(), "A".to_string()]);
        }
        other => panic!("expected a circular chain, got {other:?}"),
    }
}

#[test]
fn test_effective_subtype_follows_aliases() {
    let mut store = TypeStore::new();
    let range = SubtypeConstraint::range(Some(Limit::inclusive(ConstraintValue::Integer(0))), None);
    let base = store.insert(TypeNode::alias("Natural", "integer").with_subtype(range.clone()));
    let derived = store.insert(TypeNode::alias("Count", "Natural"));
    let int = store.lookup("integer").unwrap();
    assert_eq!(store.effective_subtype(base), Some(&range));
    assert_eq!(store.effective_subtype(derived), Some(&range));
    assert_eq!(store.effective_subtype(int), None);
}

#[test]
fn test_erroneous_flag_is_seen_through_aliases() {
    let mut store = TypeStore::new();
    let bad = store.insert(TypeNode::new("Bad", TypeKind::Union));
    let alias = store.insert(TypeNode::alias("Alias", "Bad"));
    assert!(!store.is_erroneous(alias));
    store.get(bad).stamp.set_erroneous(true);
    assert!(store.is_erroneous(alias));
}

#[test]
fn test_component_lookups() {
    let mut store = TypeStore::new();
    let rec = store.insert(
        TypeNode::new("Msg", TypeKind::Record)
            .with_field("id", "integer", false)
            .with_field("body", "Body", true),
    );
    let body = store.insert(TypeNode::new("Body", TypeKind::RecordOf).with_element("octetstring"));
    let alias = store.insert(TypeNode::alias("MsgAlias", "Msg"));
    assert_eq!(store.field_type(alias, "body"), Some(body));
    assert_eq!(store.field_type(rec, "nope"), None);
    assert_eq!(store.element_type(body), store.lookup("octetstring"));
    assert!(store.get(rec).field("body").unwrap().optional);
}

#[test]
fn test_signature_parameters() {
    let node = TypeNode::new("Sig", TypeKind::Signature)
        .with_parameter("p1", "integer", ParamDirection::In)
        .with_parameter("p2", "charstring", ParamDirection::InOut);
    assert!(node.parameter("p2").unwrap().direction.is_outgoing());
    assert!(node.parameter("p2").unwrap().direction.is_incoming());
    assert!(!node.parameter("p1").unwrap().direction.is_outgoing());
    assert!(node.parameter("p3").is_none());
    assert_eq!(ParamDirection::InOut.to_string(), "inout");
}
