//! Type kind taxonomy.
//!
//! Every declared type carries exactly one [`TypeKind`] tag and the
//! [`Dialect`] it was declared in. Several tags exist twice, once per
//! dialect (`Integer` / `IntegerAsn`, `Record` / `Sequence`, ...); the
//! compatibility rules fold those pairs together, but the tag itself is
//! preserved so that strong compatibility can tell them apart.
//!
//! Classification helpers (`is_string`, `is_structured`, ...) are backed by a
//! [`KindTraits`] bitset so callers can test several properties at once.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source dialect a declaration belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// The test specification language itself.
    #[default]
    Ttcn3,
    /// Types imported from the abstract syntax notation modules.
    Asn1,
}

impl Dialect {
    #[inline]
    pub const fn is_asn1(self) -> bool {
        matches!(self, Self::Asn1)
    }
}

/// Closed enumeration of type categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    /// Error kind; compatible with everything.
    Undefined,
    Null,
    Boolean,
    Integer,
    IntegerAsn,
    Real,
    Bitstring,
    BitstringAsn,
    Hexstring,
    Octetstring,
    Charstring,
    UniversalCharstring,
    Utf8String,
    NumericString,
    PrintableString,
    TeletexString,
    VideotexString,
    Ia5String,
    GraphicString,
    VisibleString,
    GeneralString,
    UniversalString,
    BmpString,
    UtcTime,
    GeneralizedTime,
    ObjectDescriptor,
    ObjectIdentifier,
    RelativeOid,
    Enumerated,
    EnumeratedAsn,
    /// TTCN-3 `union`.
    Union,
    /// ASN.1 `CHOICE`.
    Choice,
    OpenType,
    AnyType,
    /// TTCN-3 `record`.
    Record,
    /// ASN.1 `SEQUENCE`.
    Sequence,
    /// TTCN-3 `set`.
    Set,
    /// ASN.1 `SET`.
    SetAsn,
    RecordOf,
    SetOf,
    Array,
    Verdict,
    Default,
    Component,
    Port,
    Signature,
    Function,
    Altstep,
    Testcase,
    /// ASN.1 `ANY`.
    Any,
    Address,
    /// Named alias of another type; resolved before any rule applies.
    Referenced,
    ObjectClassField,
}

bitflags! {
    /// Static properties of a [`TypeKind`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KindTraits: u16 {
        /// Values are strings of characters.
        const CHARACTER_STRING = 1 << 0;
        /// Values are strings of bits, hex digits or octets.
        const BINARY_STRING = 1 << 1;
        /// Values have named fields or alternatives.
        const STRUCTURED = 1 << 2;
        /// Values are homogeneous element sequences.
        const LIST = 1 << 3;
        /// Values are totally ordered, so value ranges make sense.
        const ORDERED = 1 << 4;
        /// Values have a length, so length restrictions make sense.
        const HAS_LENGTH = 1 << 5;
        /// No runtime values exist for the kind.
        const NO_VALUES = 1 << 6;
        /// The tag only makes sense in the alternate dialect.
        const ASN1_ONLY = 1 << 7;
    }
}

impl TypeKind {
    /// All kinds, in declaration order.
    pub const ALL: &'static [TypeKind] = &[
        Self::Undefined,
        Self::Null,
        Self::Boolean,
        Self::Integer,
        Self::IntegerAsn,
        Self::Real,
        Self::Bitstring,
        Self::BitstringAsn,
        Self::Hexstring,
        Self::Octetstring,
        Self::Charstring,
        Self::UniversalCharstring,
        Self::Utf8String,
        Self::NumericString,
        Self::PrintableString,
        Self::TeletexString,
        Self::VideotexString,
        Self::Ia5String,
        Self::GraphicString,
        Self::VisibleString,
        Self::GeneralString,
        Self::UniversalString,
        Self::BmpString,
        Self::UtcTime,
        Self::GeneralizedTime,
        Self::ObjectDescriptor,
        Self::ObjectIdentifier,
        Self::RelativeOid,
        Self::Enumerated,
        Self::EnumeratedAsn,
        Self::Union,
        Self::Choice,
        Self::OpenType,
        Self::AnyType,
        Self::Record,
        Self::Sequence,
        Self::Set,
        Self::SetAsn,
        Self::RecordOf,
        Self::SetOf,
        Self::Array,
        Self::Verdict,
        Self::Default,
        Self::Component,
        Self::Port,
        Self::Signature,
        Self::Function,
        Self::Altstep,
        Self::Testcase,
        Self::Any,
        Self::Address,
        Self::Referenced,
        Self::ObjectClassField,
    ];

    pub const fn traits(self) -> KindTraits {
        const CHARS: KindTraits = KindTraits::CHARACTER_STRING
            .union(KindTraits::ORDERED)
            .union(KindTraits::HAS_LENGTH);
        const ASN_CHARS: KindTraits = CHARS.union(KindTraits::ASN1_ONLY);
        const BINARY: KindTraits = KindTraits::BINARY_STRING.union(KindTraits::HAS_LENGTH);
        match self {
            Self::Integer | Self::Real => KindTraits::ORDERED,
            Self::IntegerAsn => KindTraits::ORDERED.union(KindTraits::ASN1_ONLY),
            Self::Bitstring | Self::Hexstring | Self::Octetstring => BINARY,
            Self::BitstringAsn => BINARY.union(KindTraits::ASN1_ONLY),
            Self::Charstring | Self::UniversalCharstring => CHARS,
            Self::Utf8String
            | Self::NumericString
            | Self::PrintableString
            | Self::TeletexString
            | Self::VideotexString
            | Self::Ia5String
            | Self::GraphicString
            | Self::VisibleString
            | Self::GeneralString
            | Self::UniversalString
            | Self::BmpString
            | Self::UtcTime
            | Self::GeneralizedTime
            | Self::ObjectDescriptor => ASN_CHARS,
            Self::Union | Self::Record | Self::Set | Self::AnyType => KindTraits::STRUCTURED,
            Self::Choice | Self::Sequence | Self::SetAsn | Self::OpenType => {
                KindTraits::STRUCTURED.union(KindTraits::ASN1_ONLY)
            }
            Self::RecordOf | Self::SetOf | Self::Array => {
                KindTraits::LIST.union(KindTraits::HAS_LENGTH)
            }
            Self::EnumeratedAsn | Self::Any | Self::ObjectClassField => KindTraits::ASN1_ONLY,
            Self::Port | Self::Signature => KindTraits::NO_VALUES,
            Self::Undefined
            | Self::Null
            | Self::Boolean
            | Self::ObjectIdentifier
            | Self::RelativeOid
            | Self::Enumerated
            | Self::Verdict
            | Self::Default
            | Self::Component
            | Self::Function
            | Self::Altstep
            | Self::Testcase
            | Self::Address
            | Self::Referenced => KindTraits::empty(),
        }
    }

    #[inline]
    pub const fn is_character_string(self) -> bool {
        self.traits().contains(KindTraits::CHARACTER_STRING)
    }

    #[inline]
    pub const fn is_binary_string(self) -> bool {
        self.traits().contains(KindTraits::BINARY_STRING)
    }

    /// Character or binary string.
    #[inline]
    pub const fn is_string(self) -> bool {
        self.traits()
            .intersects(KindTraits::CHARACTER_STRING.union(KindTraits::BINARY_STRING))
    }

    #[inline]
    pub const fn is_structured(self) -> bool {
        self.traits().contains(KindTraits::STRUCTURED)
    }

    #[inline]
    pub const fn is_list(self) -> bool {
        self.traits().contains(KindTraits::LIST)
    }

    #[inline]
    pub const fn is_ordered(self) -> bool {
        self.traits().contains(KindTraits::ORDERED)
    }

    #[inline]
    pub const fn supports_length(self) -> bool {
        self.traits().contains(KindTraits::HAS_LENGTH)
    }

    /// Union-like kinds: exactly one alternative is present in a value.
    #[inline]
    pub const fn is_union_like(self) -> bool {
        matches!(self, Self::Union | Self::Choice | Self::OpenType | Self::AnyType)
    }

    /// Record-like kinds: fields are matched by position.
    #[inline]
    pub const fn is_record_like(self) -> bool {
        matches!(self, Self::Record | Self::Sequence)
    }

    /// Set-like kinds: fields are matched by name.
    #[inline]
    pub const fn is_set_like(self) -> bool {
        matches!(self, Self::Set | Self::SetAsn)
    }

    #[inline]
    pub const fn is_enumerated(self) -> bool {
        matches!(self, Self::Enumerated | Self::EnumeratedAsn)
    }

    /// The TTCN-3 view of the kind: dialect twins collapse to the TTCN-3 tag.
    pub const fn ttcn3_view(self) -> TypeKind {
        match self {
            Self::IntegerAsn => Self::Integer,
            Self::BitstringAsn => Self::Bitstring,
            Self::EnumeratedAsn => Self::Enumerated,
            Self::Choice | Self::OpenType => Self::Union,
            Self::Sequence => Self::Record,
            Self::SetAsn => Self::Set,
            Self::Utf8String
            | Self::TeletexString
            | Self::VideotexString
            | Self::GraphicString
            | Self::GeneralString
            | Self::UniversalString
            | Self::BmpString
            | Self::ObjectDescriptor => Self::UniversalCharstring,
            Self::NumericString
            | Self::PrintableString
            | Self::Ia5String
            | Self::VisibleString
            | Self::UtcTime
            | Self::GeneralizedTime => Self::Charstring,
            Self::Any => Self::Octetstring,
            other => other,
        }
    }

    /// Keyword used for the kind in messages and log output.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Undefined => "<undefined>",
            Self::Null => "NULL",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::IntegerAsn => "INTEGER",
            Self::Real => "float",
            Self::Bitstring => "bitstring",
            Self::BitstringAsn => "BIT STRING",
            Self::Hexstring => "hexstring",
            Self::Octetstring => "octetstring",
            Self::Charstring => "charstring",
            Self::UniversalCharstring => "universal charstring",
            Self::Utf8String => "UTF8String",
            Self::NumericString => "NumericString",
            Self::PrintableString => "PrintableString",
            Self::TeletexString => "TeletexString",
            Self::VideotexString => "VideotexString",
            Self::Ia5String => "IA5String",
            Self::GraphicString => "GraphicString",
            Self::VisibleString => "VisibleString",
            Self::GeneralString => "GeneralString",
            Self::UniversalString => "UniversalString",
            Self::BmpString => "BMPString",
            Self::UtcTime => "UTCTime",
            Self::GeneralizedTime => "GeneralizedTime",
            Self::ObjectDescriptor => "ObjectDescriptor",
            Self::ObjectIdentifier => "objid",
            Self::RelativeOid => "RELATIVE-OID",
            Self::Enumerated => "enumerated",
            Self::EnumeratedAsn => "ENUMERATED",
            Self::Union => "union",
            Self::Choice => "CHOICE",
            Self::OpenType => "open type",
            Self::AnyType => "anytype",
            Self::Record => "record",
            Self::Sequence => "SEQUENCE",
            Self::Set => "set",
            Self::SetAsn => "SET",
            Self::RecordOf => "record of",
            Self::SetOf => "set of",
            Self::Array => "array",
            Self::Verdict => "verdicttype",
            Self::Default => "default",
            Self::Component => "component",
            Self::Port => "port",
            Self::Signature => "signature",
            Self::Function => "function",
            Self::Altstep => "altstep",
            Self::Testcase => "testcase",
            Self::Any => "ANY",
            Self::Address => "address",
            Self::Referenced => "referenced",
            Self::ObjectClassField => "object class field",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
#[path = "../tests/kind_tests.rs"]
mod kind_tests;
