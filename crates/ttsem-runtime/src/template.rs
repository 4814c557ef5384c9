//! Template model.
//!
//! A [`Template`] is a selector plus two independent modifiers: the
//! `ifpresent` flag and an optional length restriction. Structured templates
//! (`Record`, `Union`, `Elements`) hold full templates for their members, so
//! every member may use any selector.
//!
//! Matching lives in [`crate::matching`]; this module covers construction,
//! inspection (`value_of`, `length_of`, `list_item`) and log rendering.

use crate::codec::DecodeTarget;
use crate::error::MatchError;
use crate::pattern::CompiledPattern;
use crate::value::{RecordField, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use ttsem_common::TypeKind;

// =============================================================================
// Parts
// =============================================================================

/// One end of a value range.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeBound {
    pub value: Value,
    pub exclusive: bool,
}

impl RangeBound {
    pub fn inclusive(value: Value) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: Value) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// `(min .. max)`; an absent end is unbounded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueRange {
    pub min: Option<RangeBound>,
    pub max: Option<RangeBound>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthRestriction {
    Single(usize),
    Range { min: usize, max: Option<usize> },
}

impl LengthRestriction {
    pub fn contains(self, length: usize) -> bool {
        match self {
            Self::Single(n) => length == n,
            Self::Range { min, max } => length >= min && max.is_none_or(|max| length <= max),
        }
    }
}

impl fmt::Display for LengthRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(n) => write!(f, "length ({n})"),
            Self::Range { min, max: Some(max) } => write!(f, "length ({min} .. {max})"),
            Self::Range { min, max: None } => write!(f, "length ({min} .. infinity)"),
        }
    }
}

/// Template for one record or set field.
#[derive(Clone, Debug)]
pub struct FieldTemplate {
    pub name: String,
    pub template: Template,
}

impl FieldTemplate {
    pub fn new(name: impl Into<String>, template: Template) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}

/// A compiled string pattern together with its text for logging.
#[derive(Clone, Debug)]
pub struct StringPattern {
    pub compiled: Arc<dyn CompiledPattern>,
}

#[derive(Clone, Debug)]
pub enum TemplateSelector {
    Uninitialized,
    Omit,
    Any,
    AnyOrOmit,
    Specific(Value),
    Record { kind: TypeKind, fields: Vec<FieldTemplate> },
    Union { kind: TypeKind, alternative: String, template: Box<Template> },
    /// Record-of, set-of and array templates; `AnyOrOmit` elements stand for
    /// any number of elements.
    Elements { kind: TypeKind, items: Vec<Template> },
    ValueList(Vec<Template>),
    ComplementedList(Vec<Template>),
    Range(ValueRange),
    DecodeMatch { target: DecodeTarget, inner: Box<Template> },
    Pattern(StringPattern),
}

/// Outcome of [`Template::length_of`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateLength {
    Exact(usize),
    /// The template admits any length of at least `min`.
    Unbounded { min: usize },
}

// =============================================================================
// Template
// =============================================================================

#[derive(Clone, Debug)]
pub struct Template {
    selector: TemplateSelector,
    if_present: bool,
    length: Option<LengthRestriction>,
}

impl Default for Template {
    fn default() -> Self {
        Self::uninitialized()
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Self::specific(value)
    }
}

impl Template {
    pub fn new(selector: TemplateSelector) -> Self {
        Self {
            selector,
            if_present: false,
            length: None,
        }
    }

    pub fn uninitialized() -> Self {
        Self::new(TemplateSelector::Uninitialized)
    }

    pub fn omit() -> Self {
        Self::new(TemplateSelector::Omit)
    }

    pub fn any() -> Self {
        Self::new(TemplateSelector::Any)
    }

    pub fn any_or_omit() -> Self {
        Self::new(TemplateSelector::AnyOrOmit)
    }

    pub fn specific(value: Value) -> Self {
        Self::new(TemplateSelector::Specific(value))
    }

    pub fn value_list(items: Vec<Template>) -> Self {
        Self::new(TemplateSelector::ValueList(items))
    }

    pub fn complemented_list(items: Vec<Template>) -> Self {
        Self::new(TemplateSelector::ComplementedList(items))
    }

    pub fn record(kind: TypeKind, fields: Vec<FieldTemplate>) -> Self {
        Self::new(TemplateSelector::Record { kind, fields })
    }

    pub fn union(kind: TypeKind, alternative: impl Into<String>, template: Template) -> Self {
        Self::new(TemplateSelector::Union {
            kind,
            alternative: alternative.into(),
            template: Box::new(template),
        })
    }

    pub fn elements(kind: TypeKind, items: Vec<Template>) -> Self {
        Self::new(TemplateSelector::Elements { kind, items })
    }

    pub fn decode_match(target: DecodeTarget, inner: Template) -> Self {
        Self::new(TemplateSelector::DecodeMatch {
            target,
            inner: Box::new(inner),
        })
    }

    pub fn pattern(compiled: Arc<dyn CompiledPattern>) -> Self {
        Self::new(TemplateSelector::Pattern(StringPattern { compiled }))
    }

    /// Value range; fails when `min` lies above `max`.
    pub fn range(min: Option<RangeBound>, max: Option<RangeBound>) -> Result<Self, MatchError> {
        let mut template = Self::new(TemplateSelector::Range(ValueRange::default()));
        if let Some(min) = min {
            template.set_min(min)?;
        }
        if let Some(max) = max {
            template.set_max(max)?;
        }
        Ok(template)
    }

    #[must_use]
    pub fn with_if_present(mut self, if_present: bool) -> Self {
        self.if_present = if_present;
        self
    }

    #[must_use]
    pub fn with_length(mut self, length: LengthRestriction) -> Self {
        self.length = Some(length);
        self
    }

    #[inline]
    pub fn selector(&self) -> &TemplateSelector {
        &self.selector
    }

    #[inline]
    pub fn is_if_present(&self) -> bool {
        self.if_present
    }

    #[inline]
    pub fn length_restriction(&self) -> Option<LengthRestriction> {
        self.length
    }

    pub fn set_if_present(&mut self, if_present: bool) {
        self.if_present = if_present;
    }

    pub fn set_length(&mut self, length: Option<LengthRestriction>) {
        self.length = length;
    }

    // -------------------------------------------------------------------------
    // Range bounds
    // -------------------------------------------------------------------------

    pub fn set_min(&mut self, bound: RangeBound) -> Result<(), MatchError> {
        check_bound_length(&bound, "lower")?;
        let TemplateSelector::Range(range) = &mut self.selector else {
            return Err(MatchError::InvalidRange(
                "Template is not a range when setting the lower limit".to_string(),
            ));
        };
        if let Some(max) = &range.max
            && bound.value.compare(&max.value)? == Ordering::Greater
        {
            return Err(MatchError::InvalidRange(
                "The lower limit of the range is greater than the upper limit".to_string(),
            ));
        }
        range.min = Some(bound);
        Ok(())
    }

    pub fn set_max(&mut self, bound: RangeBound) -> Result<(), MatchError> {
        check_bound_length(&bound, "upper")?;
        let TemplateSelector::Range(range) = &mut self.selector else {
            return Err(MatchError::InvalidRange(
                "Template is not a range when setting the upper limit".to_string(),
            ));
        };
        if let Some(min) = &range.min
            && bound.value.compare(&min.value)? == Ordering::Less
        {
            return Err(MatchError::InvalidRange(
                "The upper limit of the range is smaller than the lower limit".to_string(),
            ));
        }
        range.max = Some(bound);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Item `index` of a value list or complemented list.
    pub fn list_item(&self, index: usize) -> Result<&Template, MatchError> {
        match &self.selector {
            TemplateSelector::ValueList(items) | TemplateSelector::ComplementedList(items) => items
                .get(index)
                .ok_or(MatchError::ListIndex {
                    index,
                    len: items.len(),
                }),
            _ => Err(MatchError::NotAList),
        }
    }

    /// The single value this template stands for.
    ///
    /// Only exact, mandatory templates have one: a specific value, or a
    /// structured template whose members all have one (omit is allowed for
    /// record fields).
    pub fn value_of(&self) -> Result<Value, MatchError> {
        if self.if_present {
            return Err(MatchError::NonSpecificValue);
        }
        match &self.selector {
            TemplateSelector::Specific(value) => {
                if !value.is_bound() {
                    return Err(MatchError::UnboundValue("valueof"));
                }
                Ok(value.clone())
            }
            TemplateSelector::Record { kind, fields } => {
                let mut values = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = match field.template.selector {
                        TemplateSelector::Omit => None,
                        _ => Some(field.template.value_of()?),
                    };
                    values.push(RecordField {
                        name: field.name.clone(),
                        value,
                    });
                }
                Ok(Value::record(*kind, values))
            }
            TemplateSelector::Union {
                kind,
                alternative,
                template,
            } => Ok(Value::union(*kind, alternative.clone(), template.value_of()?)),
            TemplateSelector::Elements { kind, items } => {
                let elements = items
                    .iter()
                    .map(Template::value_of)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(*kind, elements))
            }
            TemplateSelector::Uninitialized => Err(MatchError::UninitializedTemplate),
            _ => Err(MatchError::NonSpecificValue),
        }
    }

    /// Number of elements every matching value has.
    ///
    /// `Unbounded` is returned for templates that accept arbitrarily long
    /// values unless the length restriction pins the length down.
    pub fn length_of(&self) -> Result<TemplateLength, MatchError> {
        if self.if_present {
            return Err(MatchError::IfPresentLength);
        }
        let (min_length, has_any_or_none) = match &self.selector {
            TemplateSelector::Specific(value) => (value.length()?, false),
            TemplateSelector::Elements { items, .. } => {
                let fixed = items
                    .iter()
                    .filter(|item| !matches!(item.selector, TemplateSelector::AnyOrOmit))
                    .count();
                (fixed, fixed != items.len())
            }
            TemplateSelector::Any | TemplateSelector::AnyOrOmit | TemplateSelector::Range(_) => (0, true),
            TemplateSelector::ValueList(items) => {
                let Some((first, rest)) = items.split_first() else {
                    return Err(MatchError::AmbiguousLength("containing an empty list".to_string()));
                };
                let expected = first.length_of()?;
                for item in rest {
                    if item.length_of()? != expected {
                        return Err(MatchError::AmbiguousLength(
                            "containing a value list with different lengths".to_string(),
                        ));
                    }
                }
                match expected {
                    TemplateLength::Exact(n) => (n, false),
                    TemplateLength::Unbounded { min } => (min, true),
                }
            }
            TemplateSelector::Omit => return Err(MatchError::LengthOfNonSpecific("omit value")),
            TemplateSelector::ComplementedList(_) => {
                return Err(MatchError::LengthOfNonSpecific("complemented list"));
            }
            TemplateSelector::Pattern(_) => return Err(MatchError::LengthOfNonSpecific("a pattern")),
            TemplateSelector::DecodeMatch { .. } => {
                return Err(MatchError::LengthOfNonSpecific("a decoded content match"));
            }
            TemplateSelector::Record { kind, .. } | TemplateSelector::Union { kind, .. } => {
                return Err(MatchError::LengthNotApplicable(*kind));
            }
            TemplateSelector::Uninitialized => return Err(MatchError::UninitializedTemplate),
        };
        self.restrict_length(min_length, has_any_or_none)
    }

    /// Combine the selector's own length with the length restriction.
    fn restrict_length(&self, min_length: usize, has_any_or_none: bool) -> Result<TemplateLength, MatchError> {
        match self.length {
            None if has_any_or_none => Ok(TemplateLength::Unbounded { min: min_length }),
            None => Ok(TemplateLength::Exact(min_length)),
            Some(LengthRestriction::Single(n)) => {
                if n < min_length || (!has_any_or_none && n != min_length) {
                    return Err(MatchError::AmbiguousLength(format!(
                        "with {min_length} elements and a length restriction of {n}"
                    )));
                }
                Ok(TemplateLength::Exact(n))
            }
            Some(LengthRestriction::Range { min, max }) => {
                if max.is_some_and(|max| max < min_length) {
                    return Err(MatchError::AmbiguousLength(format!(
                        "with at least {min_length} elements and a length restriction of {}",
                        self.length.map(|l| l.to_string()).unwrap_or_default()
                    )));
                }
                if !has_any_or_none {
                    return Ok(TemplateLength::Exact(min_length));
                }
                let lower = min.max(min_length);
                match max {
                    Some(max) if max == lower => Ok(TemplateLength::Exact(max)),
                    _ => Ok(TemplateLength::Unbounded { min: lower }),
                }
            }
        }
    }
}

fn check_bound_length(bound: &RangeBound, which: &str) -> Result<(), MatchError> {
    if let Ok(text) = bound.value.as_str() {
        let length = text.chars().count();
        if length != 1 {
            return Err(MatchError::InvalidRange(format!(
                "The length of the {which} bound in a charstring value range template must be 1 instead of {length}"
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Log notation
// =============================================================================

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Template]) -> fmt::Result {
    f.write_str("(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

fn write_bound(f: &mut fmt::Formatter<'_>, bound: Option<&RangeBound>, infinity: &str) -> fmt::Result {
    match bound {
        Some(bound) => {
            if bound.exclusive {
                f.write_str("!")?;
            }
            write!(f, "{}", bound.value)
        }
        None => f.write_str(infinity),
    }
}

impl fmt::Display for TemplateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("<uninitialized template>"),
            Self::Omit => f.write_str("omit"),
            Self::Any => f.write_str("?"),
            Self::AnyOrOmit => f.write_str("*"),
            Self::Specific(value) => write!(f, "{value}"),
            Self::Record { fields, .. } => {
                if fields.is_empty() {
                    return f.write_str("{ }");
                }
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} := {}", field.name, field.template)?;
                }
                f.write_str(" }")
            }
            Self::Union {
                alternative,
                template,
                ..
            } => write!(f, "{{ {alternative} := {template} }}"),
            Self::Elements { items, .. } => {
                if items.is_empty() {
                    return f.write_str("{ }");
                }
                f.write_str("{ ")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" }")
            }
            Self::ValueList(items) => write_list(f, items),
            Self::ComplementedList(items) => {
                f.write_str("complement")?;
                write_list(f, items)
            }
            Self::Range(range) => {
                f.write_str("(")?;
                write_bound(f, range.min.as_ref(), "-infinity")?;
                f.write_str(" .. ")?;
                write_bound(f, range.max.as_ref(), "infinity")?;
                f.write_str(")")
            }
            Self::DecodeMatch { target, inner } => write!(f, "decmatch {target}: {inner}"),
            Self::Pattern(pattern) => {
                f.write_str("pattern ")?;
                if pattern.compiled.is_case_insensitive() {
                    f.write_str("@nocase ")?;
                }
                write!(f, "\"{}\"", pattern.compiled.source())
            }
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector)?;
        if let Some(length) = self.length {
            write!(f, " {length}")?;
        }
        if self.if_present {
            f.write_str(" ifpresent")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/template_tests.rs"]
mod template_tests;
