//! Runtime side of ttsem: values, templates and template matching.
//!
//! The matching engine never consults the type compatibility resolver; by
//! the time a template is matched its type has been checked statically.

pub mod codec;
pub mod error;
pub mod matching;
pub mod pattern;
pub mod template;
pub mod value;

pub use codec::{Codec, DecodeError, DecodeTarget, RawCodec};
pub use error::MatchError;
pub use matching::MatchingContext;
pub use pattern::{CompiledPattern, PatternCompiler, PatternError, WildcardPatternCompiler};
pub use template::{
    FieldTemplate, LengthRestriction, RangeBound, StringPattern, Template, TemplateLength, TemplateSelector,
    ValueRange,
};
pub use value::{RecordField, Value, ValueData, Verdict};
