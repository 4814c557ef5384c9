use super::*;

fn int(v: i64) -> ConstraintValue {
    ConstraintValue::Integer(v)
}

fn int_range(min: Option<(i64, bool)>, max: Option<(i64, bool)>) -> SubtypeConstraint {
    let to_limit = |(v, exclusive): (i64, bool)| Limit {
        value: int(v),
        exclusive,
    };
    SubtypeConstraint::range(min.map(to_limit), max.map(to_limit))
}

fn real_range(min: f64, min_excl: bool, max: f64, max_excl: bool) -> SubtypeConstraint {
    SubtypeConstraint::range(
        Some(Limit {
            value: ConstraintValue::Real(min),
            exclusive: min_excl,
        }),
        Some(Limit {
            value: ConstraintValue::Real(max),
            exclusive: max_excl,
        }),
    )
}

fn text(s: &str) -> ConstraintValue {
    ConstraintValue::String(s.to_string())
}

// -----------------------------------------------------------------------------
// Value sets
// -----------------------------------------------------------------------------

#[test]
fn test_value_sets_intersect_on_common_member() {
    let a = SubtypeConstraint::values([int(1), int(2), int(3)]);
    let b = SubtypeConstraint::values([int(3), int(4)]);
    let c = SubtypeConstraint::values([int(7)]);
    assert!(intersects(&a, &b, false, false).is_ok());
    assert!(intersects(&a, &c, false, false).is_err());
}

#[test]
fn test_value_set_against_range() {
    let set = SubtypeConstraint::values([int(0), int(20)]);
    assert!(set.is_compatible(&int_range(Some((10, false)), Some((20, false)))));
    assert!(!set.is_compatible(&int_range(Some((1, false)), Some((19, false)))));
    // Symmetric in argument order.
    assert!(!int_range(Some((1, false)), Some((19, false))).is_compatible(&set));
}

#[test]
fn test_value_set_against_length_set() {
    let set = SubtypeConstraint::values([text("ab"), text("abcd")]);
    let three = SubtypeConstraint::lengths([LengthRange::exact(3)]);
    let four_up = SubtypeConstraint::lengths([LengthRange::between(4, None)]);
    assert!(!set.is_compatible(&three));
    assert!(set.is_compatible(&four_up));
}

// -----------------------------------------------------------------------------
// Ranges
// -----------------------------------------------------------------------------

#[test]
fn test_integer_ranges_use_successor_for_exclusive_bounds() {
    // (1 .. !5) and (!4 .. 10): 1..4 vs 5..10 -> disjoint.
    let a = int_range(Some((1, false)), Some((5, true)));
    let b = int_range(Some((4, true)), Some((10, false)));
    assert!(!a.is_compatible(&b));

    // (1 .. 5) and (!4 .. 10): share 5.
    let a = int_range(Some((1, false)), Some((5, false)));
    assert!(a.is_compatible(&b));
}

#[test]
fn test_integer_exclusive_bounds_adjacent_values() {
    // (!1 .. !3) contains exactly 2.
    let a = int_range(Some((1, true)), Some((3, true)));
    let b = SubtypeConstraint::values([int(2)]);
    let c = SubtypeConstraint::values([int(1), int(3)]);
    assert!(a.is_compatible(&b));
    assert!(!a.is_compatible(&c));
    // (!1 .. !2) is empty over the integers.
    assert!(int_range(Some((1, true)), Some((2, true))).is_empty());
}

#[test]
fn test_real_ranges_equal_exclusive_bound_does_not_meet() {
    let a = real_range(0.0, false, 1.0, true);
    let b = real_range(1.0, false, 2.0, false);
    assert!(!a.is_compatible(&b));

    let c = real_range(0.0, false, 1.0, false);
    assert!(c.is_compatible(&b));

    // Continuous domain: (!1.0 .. !2.0) is not empty.
    assert!(!real_range(1.0, true, 2.0, true).is_empty());
}

#[test]
fn test_unbounded_ranges_always_meet() {
    let everything = int_range(None, None);
    let upper = int_range(Some((100, false)), None);
    let lower = int_range(None, Some((-100, false)));
    assert!(everything.is_compatible(&upper));
    assert!(everything.is_compatible(&lower));
    assert!(!upper.is_compatible(&lower));
}

#[test]
fn test_exclusive_bound_at_domain_edge_is_empty() {
    let range = int_range(Some((i64::MAX, true)), None);
    assert!(range.is_empty());
    assert!(!range.is_compatible(&int_range(None, None)));
}

// -----------------------------------------------------------------------------
// Length sets
// -----------------------------------------------------------------------------

#[test]
fn test_length_sets_intersect() {
    let a = SubtypeConstraint::lengths([LengthRange::between(1, Some(3))]);
    let b = SubtypeConstraint::lengths([LengthRange::exact(3), LengthRange::exact(8)]);
    let c = SubtypeConstraint::lengths([LengthRange::between(4, None)]);
    assert!(a.is_compatible(&b));
    assert!(!a.is_compatible(&c));
    assert!(b.is_compatible(&c));
}

// -----------------------------------------------------------------------------
// String element projection
// -----------------------------------------------------------------------------

#[test]
fn test_element_projection_on_length_set() {
    let len_three = SubtypeConstraint::lengths([LengthRange::exact(3)]);
    let up_to_two = SubtypeConstraint::lengths([LengthRange::between(0, Some(2))]);

    let err = intersects(&up_to_two, &len_three, true, false).unwrap_err();
    assert_eq!(
        err,
        "Subtype mismatch: string element has no common value with subtype length(3)"
    );
    assert!(intersects(&len_three, &up_to_two, true, false).is_ok());

    let err = intersects(&len_three, &up_to_two, false, true).unwrap_err();
    assert_eq!(
        err,
        "Subtype mismatch: subtype length(3) has no common value with string element"
    );
}

#[test]
fn test_both_elements_need_no_check() {
    let len_three = SubtypeConstraint::lengths([LengthRange::exact(3)]);
    assert!(intersects(&len_three, &len_three, true, true).is_ok());
}

#[test]
fn test_element_projection_on_value_set() {
    let singles = SubtypeConstraint::values([text("a"), text("bc")]);
    let pairs = SubtypeConstraint::values([text("ab"), text("bc")]);
    assert!(singles.is_compatible_with_elem());
    assert!(!pairs.is_compatible_with_elem());
}

#[test]
fn test_mismatch_message_embeds_both_constraints() {
    let a = int_range(Some((1, false)), Some((5, false)));
    let b = int_range(Some((10, true)), None);
    let err = intersects(&a, &b, false, false).unwrap_err();
    assert_eq!(
        err,
        "Subtype mismatch: subtype (1 .. 5) has no common value with subtype (!10 .. infinity)"
    );
}

// -----------------------------------------------------------------------------
// Alphabet ranges
// -----------------------------------------------------------------------------

#[test]
fn test_alphabet_range_checks_every_character() {
    let alphabet = SubtypeConstraint::range(
        Some(Limit::inclusive(ConstraintValue::Char('a'))),
        Some(Limit::inclusive(ConstraintValue::Char('f'))),
    );
    assert!(alphabet.admits(&text("cafe")));
    assert!(!alphabet.admits(&text("cafes")));
    assert!(alphabet.is_compatible(&SubtypeConstraint::values([text("bead")])));
    assert!(!alphabet.is_compatible(&SubtypeConstraint::values([text("zz")])));
}

// -----------------------------------------------------------------------------
// Narrowing
// -----------------------------------------------------------------------------

#[test]
fn test_range_narrowing() {
    let parent = int_range(Some((0, false)), Some((100, false)));
    assert!(int_range(Some((10, false)), Some((20, false))).is_subset_of(&parent));
    assert!(int_range(Some((-1, true)), Some((100, false))).is_subset_of(&parent));
    assert!(!int_range(Some((-1, false)), Some((100, false))).is_subset_of(&parent));
    assert!(!int_range(None, Some((5, false))).is_subset_of(&parent));
}

#[test]
fn test_value_set_narrowing() {
    let parent = SubtypeConstraint::values([int(1), int(2), int(3)]);
    assert!(SubtypeConstraint::values([int(1), int(3)]).is_subset_of(&parent));
    assert!(!SubtypeConstraint::values([int(4)]).is_subset_of(&parent));
    assert!(int_range(Some((1, false)), Some((3, false))).is_subset_of(&parent));
    assert!(!int_range(Some((1, false)), Some((4, false))).is_subset_of(&parent));
}

#[test]
fn test_length_set_narrowing_merges_parent_ranges() {
    let parent = SubtypeConstraint::lengths([LengthRange::between(1, Some(3)), LengthRange::between(4, Some(6))]);
    assert!(SubtypeConstraint::lengths([LengthRange::between(2, Some(5))]).is_subset_of(&parent));
    assert!(!SubtypeConstraint::lengths([LengthRange::between(2, Some(7))]).is_subset_of(&parent));
    assert!(!SubtypeConstraint::lengths([LengthRange::between(0, None)]).is_subset_of(&parent));
}

#[test]
fn test_well_formedness() {
    assert!(!int_range(Some((5, false)), Some((1, false))).is_well_formed());
    assert!(int_range(Some((1, false)), Some((1, false))).is_well_formed());
    assert!(!SubtypeConstraint::lengths([LengthRange::between(4, Some(2))]).is_well_formed());
}

#[test]
fn test_display_forms() {
    assert_eq!(
        SubtypeConstraint::values([int(1), text("x")]).to_string(),
        "(1, \"x\")"
    );
    assert_eq!(int_range(None, Some((3, true))).to_string(), "(-infinity .. !3)");
    assert_eq!(
        SubtypeConstraint::lengths([LengthRange::between(1, Some(2)), LengthRange::exact(5)]).to_string(),
        "length(1 .. 2, 5)"
    );
}
