// Diagnostic message table.
//
// Codes are grouped by the phase that reports them:
// 1xxx type compatibility, 2xxx type declarations, 3xxx templates,
// 4xxx communication redirects.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const TYPE_MISMATCH: u32 = 1001;
    pub const SIGNATURE_TEMPLATE_TYPE_MISMATCH: u32 = 1002;
    pub const INCOMPATIBLE_VALUE: u32 = 1003;
    pub const TYPE_COMPATIBILITY: u32 = 1004;
    pub const STRUCTURED_TYPE_MISMATCH: u32 = 1005;
    pub const SUBTYPE_MISMATCH: u32 = 1006;

    pub const SUBTYPE_NOT_APPLICABLE: u32 = 2001;
    pub const SUBTYPE_LOWER_GREATER_THAN_UPPER: u32 = 2002;
    pub const SUBTYPE_NOT_A_SUBSET: u32 = 2003;
    pub const UNRESOLVED_TYPE_REFERENCE: u32 = 2004;
    pub const CIRCULAR_TYPE_REFERENCE: u32 = 2005;
    pub const DUPLICATE_FIELD_NAME: u32 = 2006;
    pub const DUPLICATE_ENUMERATOR: u32 = 2007;
    pub const EMPTY_SUBTYPE: u32 = 2008;

    pub const OMIT_NOT_ALLOWED: u32 = 3001;
    pub const IFPRESENT_NOT_ALLOWED: u32 = 3002;
    pub const RANGE_NOT_ALLOWED: u32 = 3003;
    pub const PATTERN_NOT_ALLOWED: u32 = 3004;
    pub const LENGTH_RESTRICTION_NOT_ALLOWED: u32 = 3005;
    pub const RANGE_LOWER_GREATER_THAN_UPPER: u32 = 3006;
    pub const LENGTH_LOWER_GREATER_THAN_UPPER: u32 = 3007;
    pub const UNKNOWN_FIELD: u32 = 3008;
    pub const UNKNOWN_ALTERNATIVE: u32 = 3009;
    pub const ELEMENT_COUNT_MISMATCH: u32 = 3010;
    pub const MISSING_FIELD: u32 = 3011;
    pub const TEMPLATE_NOT_ALLOWED: u32 = 3012;
    pub const UNKNOWN_ENUMERATOR: u32 = 3013;

    pub const DUPLICATE_REDIRECT: u32 = 4001;
    pub const REDIRECT_ALREADY_GIVEN: u32 = 4002;
    pub const SIGNATURE_WITHOUT_PARAMETERS: u32 = 4003;
    pub const PARAMETER_HAS_IN_DIRECTION: u32 = 4004;
    pub const PARAMETER_HAS_OUT_DIRECTION: u32 = 4005;
    pub const NO_SUCH_PARAMETER: u32 = 4006;
    pub const NOT_A_SIGNATURE: u32 = 4007;
}

pub mod diagnostic_messages {
    pub const TYPE_MISMATCH: &str = "Type mismatch: a {0} of type `{1}' was expected instead of `{2}'";
    pub const SIGNATURE_TEMPLATE_TYPE_MISMATCH: &str =
        "Type mismatch: a signature template of type `{0}' was expected instead of `{1}'";
    pub const INCOMPATIBLE_VALUE: &str = "Incompatible value: `{0}' was expected";
    pub const TYPE_COMPATIBILITY: &str = "Type compatibility between `{0}' and `{1}'";
    pub const STRUCTURED_TYPE_MISMATCH: &str = "{0}";
    pub const SUBTYPE_MISMATCH: &str = "{0}";

    pub const SUBTYPE_NOT_APPLICABLE: &str =
        "TTCN-3 subtype constraints are not applicable to type `{0}'";
    pub const SUBTYPE_LOWER_GREATER_THAN_UPPER: &str =
        "The lower boundary `{0}' is greater than the upper boundary `{1}'";
    pub const SUBTYPE_NOT_A_SUBSET: &str =
        "The subtype restriction {0} of type `{1}' is not a subset of the restriction {2} of its parent type `{3}'";
    pub const UNRESOLVED_TYPE_REFERENCE: &str =
        "There is no local or imported definition with name `{0}'";
    pub const CIRCULAR_TYPE_REFERENCE: &str = "Circular type reference chain: {0}";
    pub const DUPLICATE_FIELD_NAME: &str = "Duplicate field name `{0}' in type `{1}'";
    pub const DUPLICATE_ENUMERATOR: &str = "Duplicate enumeration identifier `{0}' in type `{1}'";
    pub const EMPTY_SUBTYPE: &str = "The subtype of type `{0}' is an empty set";

    pub const OMIT_NOT_ALLOWED: &str = "`omit' value is not allowed in this context";
    pub const IFPRESENT_NOT_ALLOWED: &str = "`ifpresent' is not allowed here";
    pub const RANGE_NOT_ALLOWED: &str = "Value range match cannot be used for type `{0}'";
    pub const PATTERN_NOT_ALLOWED: &str = "Character string pattern cannot be used for type `{0}'";
    pub const LENGTH_RESTRICTION_NOT_ALLOWED: &str =
        "Length restriction cannot be used in a template of type `{0}'";
    pub const RANGE_LOWER_GREATER_THAN_UPPER: &str =
        "The lower boundary of the value range is greater than the upper boundary";
    pub const LENGTH_LOWER_GREATER_THAN_UPPER: &str =
        "The lower boundary of the length restriction ({0}) is greater than the upper boundary ({1})";
    pub const UNKNOWN_FIELD: &str = "Reference to non-existent field `{0}' in record template for type `{1}'";
    pub const UNKNOWN_ALTERNATIVE: &str =
        "Reference to non-existent union field `{0}' in type `{1}'";
    pub const ELEMENT_COUNT_MISMATCH: &str =
        "Too many elements in the template for type `{0}': {1} was expected instead of {2}";
    pub const MISSING_FIELD: &str = "Field `{0}' is missing from template for record type `{1}'";
    pub const TEMPLATE_NOT_ALLOWED: &str = "{0} cannot be used for type `{1}'";
    pub const UNKNOWN_ENUMERATOR: &str = "There is no enumerated value `{0}' in type `{1}'";

    pub const DUPLICATE_REDIRECT: &str = "Duplicate redirect for parameter `{0}'";
    pub const REDIRECT_ALREADY_GIVEN: &str =
        "A variable entry for parameter `{0}' is already given here";
    pub const SIGNATURE_WITHOUT_PARAMETERS: &str =
        "Parameter redirect cannot be used because signature `{0}' does not have parameters";
    pub const PARAMETER_HAS_IN_DIRECTION: &str =
        "Parameter `{0}' of signature `{1}' has `in' direction";
    pub const PARAMETER_HAS_OUT_DIRECTION: &str =
        "Parameter `{0}' of signature `{1}' has `out' direction";
    pub const NO_SUCH_PARAMETER: &str = "Signature `{0}' does not have parameter named `{1}'";
    pub const NOT_A_SIGNATURE: &str = "Type `{0}' is not a signature type";
}

macro_rules! message {
    ($name:ident, $category:ident) => {
        DiagnosticMessage {
            code: diagnostic_codes::$name,
            category: DiagnosticCategory::$category,
            message: diagnostic_messages::$name,
        }
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    message!(TYPE_MISMATCH, Error),
    message!(SIGNATURE_TEMPLATE_TYPE_MISMATCH, Error),
    message!(INCOMPATIBLE_VALUE, Error),
    message!(TYPE_COMPATIBILITY, Warning),
    message!(STRUCTURED_TYPE_MISMATCH, Error),
    message!(SUBTYPE_MISMATCH, Error),
    message!(SUBTYPE_NOT_APPLICABLE, Error),
    message!(SUBTYPE_LOWER_GREATER_THAN_UPPER, Error),
    message!(SUBTYPE_NOT_A_SUBSET, Error),
    message!(UNRESOLVED_TYPE_REFERENCE, Error),
    message!(CIRCULAR_TYPE_REFERENCE, Error),
    message!(DUPLICATE_FIELD_NAME, Error),
    message!(DUPLICATE_ENUMERATOR, Error),
    message!(EMPTY_SUBTYPE, Warning),
    message!(OMIT_NOT_ALLOWED, Error),
    message!(IFPRESENT_NOT_ALLOWED, Error),
    message!(RANGE_NOT_ALLOWED, Error),
    message!(PATTERN_NOT_ALLOWED, Error),
    message!(LENGTH_RESTRICTION_NOT_ALLOWED, Error),
    message!(RANGE_LOWER_GREATER_THAN_UPPER, Error),
    message!(LENGTH_LOWER_GREATER_THAN_UPPER, Error),
    message!(UNKNOWN_FIELD, Error),
    message!(UNKNOWN_ALTERNATIVE, Error),
    message!(ELEMENT_COUNT_MISMATCH, Error),
    message!(MISSING_FIELD, Error),
    message!(TEMPLATE_NOT_ALLOWED, Error),
    message!(UNKNOWN_ENUMERATOR, Error),
    message!(DUPLICATE_REDIRECT, Error),
    message!(REDIRECT_ALREADY_GIVEN, Warning),
    message!(SIGNATURE_WITHOUT_PARAMETERS, Error),
    message!(PARAMETER_HAS_IN_DIRECTION, Error),
    message!(PARAMETER_HAS_OUT_DIRECTION, Error),
    message!(NO_SUCH_PARAMETER, Error),
    message!(NOT_A_SIGNATURE, Error),
];
