//! Contract violations raised by the value model and the matching engine.
//!
//! These are defects in the caller (generated code or a hand-written test
//! harness), not in the specification under test, and are never recovered
//! silently. Decode failures are not errors; they are an ordinary no-match.

use std::fmt;
use ttsem_common::TypeKind;
use ttsem_common::limits::MAX_MATCH_DEPTH;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchError {
    UninitializedTemplate,
    /// `value_of()` on anything but an exact, mandatory template.
    NonSpecificValue,
    /// `length_of()` cannot settle on a single number.
    AmbiguousLength(String),
    /// `length_of()` on omit, complemented lists, patterns and the like.
    LengthOfNonSpecific(&'static str),
    IfPresentLength,
    /// An operation other than the bound check on an unbound value.
    UnboundValue(&'static str),
    UnorderedDomain(TypeKind),
    LengthNotApplicable(TypeKind),
    MissingCodec,
    InvalidRange(String),
    ListIndex { index: usize, len: usize },
    NotAList,
    TypeMismatch { expected: &'static str, found: TypeKind },
    DepthExceeded,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninitializedTemplate => {
                f.write_str("Matching with an uninitialized/unsupported template")
            }
            Self::NonSpecificValue => {
                f.write_str("Performing a valueof or send operation on a non-specific template")
            }
            Self::AmbiguousLength(reason) => {
                write!(f, "Performing lengthof() operation on a template {reason}")
            }
            Self::LengthOfNonSpecific(what) => {
                write!(f, "Performing lengthof() operation on a template containing {what}")
            }
            Self::IfPresentLength => f.write_str(
                "Performing lengthof() operation on a template which has an ifpresent attribute",
            ),
            Self::UnboundValue(operation) => write!(f, "Using an unbound value in {operation}"),
            Self::UnorderedDomain(kind) => {
                write!(f, "Value range match cannot be used for type `{kind}'")
            }
            Self::LengthNotApplicable(kind) => {
                write!(f, "Length restriction cannot be used for type `{kind}'")
            }
            Self::MissingCodec => f.write_str("No codec is available for decoded content matching"),
            Self::InvalidRange(message) => f.write_str(message),
            Self::ListIndex { index, len } => write!(
                f,
                "Index overflow in a list template: index {index} with {len} elements"
            ),
            Self::NotAList => f.write_str("Accessing a list element of a non-list template"),
            Self::TypeMismatch { expected, found } => write!(
                f,
                "Matching a {expected} template with a value of type `{found}'"
            ),
            Self::DepthExceeded => {
                write!(f, "Template nesting exceeds {MAX_MATCH_DEPTH} levels")
            }
        }
    }
}

impl std::error::Error for MatchError {}
