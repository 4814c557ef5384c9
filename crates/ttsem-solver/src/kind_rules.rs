//! Kind-level compatibility table.
//!
//! `is_compatible_kind(expected, actual, ..)` answers whether a value whose
//! kind is `actual` may be used where `expected` is required. The relation is
//! asymmetric: `ANY` accepts an octetstring, an octetstring accepts `ANY`
//! only in the TTCN-3 dialect, and the character string kinds form a widening
//! order from the 7-bit subsets up to the universal kinds.
//!
//! `Referenced` and `ObjectClassField` never match at this level; callers
//! resolve aliases first.

use ttsem_common::{Dialect, TypeKind};

/// Kinds that only accept their own tag.
const fn is_rigid(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Null
            | TypeKind::Boolean
            | TypeKind::Real
            | TypeKind::Hexstring
            | TypeKind::RecordOf
            | TypeKind::SetOf
            | TypeKind::Verdict
            | TypeKind::Default
            | TypeKind::Component
            | TypeKind::Signature
            | TypeKind::Port
            | TypeKind::Array
            | TypeKind::Function
            | TypeKind::Altstep
            | TypeKind::Testcase
            | TypeKind::AnyType
    )
}

/// Character strings restricted to (a subset of) the 7-bit alphabet.
const fn is_narrow_string(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::Charstring
            | TypeKind::NumericString
            | TypeKind::PrintableString
            | TypeKind::Ia5String
            | TypeKind::VisibleString
            | TypeKind::UtcTime
            | TypeKind::GeneralizedTime
    )
}

/// Full universal character set strings.
const fn is_universal_string(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::UniversalCharstring
            | TypeKind::Utf8String
            | TypeKind::BmpString
            | TypeKind::UniversalString
    )
}

/// Strings over registered character sets with escape sequences.
const fn is_registered_string(kind: TypeKind) -> bool {
    matches!(
        kind,
        TypeKind::TeletexString
            | TypeKind::VideotexString
            | TypeKind::GraphicString
            | TypeKind::ObjectDescriptor
            | TypeKind::GeneralString
    )
}

/// Whether a value of kind `actual` may be used where `expected` is required.
///
/// `expected_dialect` / `actual_dialect` gate the asymmetric octetstring/ANY
/// and object identifier rules.
pub fn is_compatible_kind(
    expected: TypeKind,
    actual: TypeKind,
    expected_dialect: Dialect,
    actual_dialect: Dialect,
) -> bool {
    if expected == TypeKind::Undefined || actual == TypeKind::Undefined {
        return true;
    }

    match expected {
        k if is_rigid(k) => k == actual,
        TypeKind::Octetstring => {
            actual == TypeKind::Octetstring
                || (!expected_dialect.is_asn1() && actual == TypeKind::Any)
        }
        TypeKind::Any => matches!(actual, TypeKind::Any | TypeKind::Octetstring),
        TypeKind::UniversalCharstring => {
            is_universal_string(actual) || is_registered_string(actual) || is_narrow_string(actual)
        }
        TypeKind::Utf8String | TypeKind::BmpString | TypeKind::UniversalString => {
            is_universal_string(actual) || is_narrow_string(actual)
        }
        k if is_registered_string(k) => {
            is_registered_string(actual)
                || is_narrow_string(actual)
                || actual == TypeKind::UniversalCharstring
        }
        k if is_narrow_string(k) => is_narrow_string(actual),
        TypeKind::Bitstring | TypeKind::BitstringAsn => {
            matches!(actual, TypeKind::Bitstring | TypeKind::BitstringAsn)
        }
        TypeKind::Integer | TypeKind::IntegerAsn => {
            matches!(actual, TypeKind::Integer | TypeKind::IntegerAsn)
        }
        TypeKind::ObjectIdentifier => {
            actual == TypeKind::ObjectIdentifier
                || (!expected_dialect.is_asn1() && actual == TypeKind::RelativeOid)
        }
        TypeKind::RelativeOid => {
            actual == TypeKind::RelativeOid
                || (!actual_dialect.is_asn1() && actual == TypeKind::ObjectIdentifier)
        }
        TypeKind::Enumerated | TypeKind::EnumeratedAsn => actual.is_enumerated(),
        TypeKind::Union | TypeKind::Choice | TypeKind::OpenType => {
            matches!(actual, TypeKind::Union | TypeKind::Choice | TypeKind::OpenType)
        }
        TypeKind::Record | TypeKind::Sequence => actual.is_record_like(),
        TypeKind::Set | TypeKind::SetAsn => actual.is_set_like(),
        TypeKind::Address => actual == TypeKind::Address,
        TypeKind::Referenced | TypeKind::ObjectClassField => false,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/kind_rules_tests.rs"]
mod kind_rules_tests;
