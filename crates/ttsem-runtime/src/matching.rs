//! Template matching engine.
//!
//! `Template::matches` evaluates a template tree against a value. Matching
//! never mutates the template and keeps no cache; shared constant templates
//! are safe to use from any number of match calls.
//!
//! Evaluation order for one node:
//! 1. uninitialized templates and unbound values are contract errors,
//! 2. the length restriction filters on the value's length,
//! 3. the selector decides.

use crate::codec::Codec;
use crate::error::MatchError;
use crate::template::{Template, TemplateSelector, ValueRange};
use crate::value::{Value, ValueData};
use std::cmp::Ordering;
use tracing::{debug, trace};
use ttsem_common::limits::MAX_MATCH_DEPTH;

/// Per-call matching switches and capabilities.
#[derive(Clone, Copy, Default)]
pub struct MatchingContext<'a> {
    legacy: bool,
    codec: Option<&'a dyn Codec>,
}

impl<'a> MatchingContext<'a> {
    pub fn new(legacy: bool) -> Self {
        Self { legacy, codec: None }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: &'a dyn Codec) -> Self {
        self.codec = Some(codec);
        self
    }

    #[inline]
    pub fn legacy(&self) -> bool {
        self.legacy
    }
}

impl std::fmt::Debug for MatchingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingContext")
            .field("legacy", &self.legacy)
            .field("has_codec", &self.codec.is_some())
            .finish()
    }
}

impl Template {
    /// Match without a codec; decoded content matches report `MissingCodec`.
    pub fn matches(&self, value: &Value, legacy: bool) -> Result<bool, MatchError> {
        self.matches_in(value, &MatchingContext::new(legacy))
    }

    pub fn matches_in(&self, value: &Value, ctx: &MatchingContext<'_>) -> Result<bool, MatchError> {
        self.match_at(value, ctx, 0)
    }

    /// Whether the template accepts an absent (omitted) value.
    ///
    /// In legacy mode `omit` may hide inside value lists and complemented
    /// lists; in modern mode a list never accepts omit.
    pub fn match_omit(&self, legacy: bool) -> bool {
        if self.is_if_present() {
            return true;
        }
        match self.selector() {
            TemplateSelector::Omit | TemplateSelector::AnyOrOmit => true,
            TemplateSelector::ValueList(items) if legacy => items.iter().any(|t| t.match_omit(legacy)),
            TemplateSelector::ComplementedList(items) if legacy => {
                !items.iter().any(|t| t.match_omit(legacy))
            }
            _ => false,
        }
    }

    /// `ispresent` of a template: `ifpresent` always counts as present.
    pub fn is_present(&self, legacy: bool) -> bool {
        if self.is_if_present() {
            return true;
        }
        if matches!(self.selector(), TemplateSelector::Uninitialized) {
            return false;
        }
        !self.match_omit(legacy)
    }

    fn match_at(&self, value: &Value, ctx: &MatchingContext<'_>, depth: u32) -> Result<bool, MatchError> {
        if depth >= MAX_MATCH_DEPTH {
            return Err(MatchError::DepthExceeded);
        }
        if matches!(self.selector(), TemplateSelector::Uninitialized) {
            return Err(MatchError::UninitializedTemplate);
        }
        let data = value.data("matching")?;

        if let Some(length) = self.length_restriction() {
            let actual = value.length()?;
            if !length.contains(actual) {
                trace!(target: "ttsem::runtime", actual, %length, "length restriction rejected value");
                return Ok(false);
            }
        }

        match self.selector() {
            TemplateSelector::Uninitialized => Err(MatchError::UninitializedTemplate),
            TemplateSelector::Omit => Ok(false),
            TemplateSelector::Any | TemplateSelector::AnyOrOmit => Ok(true),
            TemplateSelector::Specific(expected) => value.equals(expected),
            TemplateSelector::ValueList(items) => {
                for item in items {
                    if item.match_at(value, ctx, depth + 1)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            TemplateSelector::ComplementedList(items) => {
                for item in items {
                    if item.match_at(value, ctx, depth + 1)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            TemplateSelector::Range(range) => match_range(range, value),
            TemplateSelector::Record { fields, .. } => {
                let ValueData::Record(actual_fields) = data else {
                    return Err(MatchError::TypeMismatch {
                        expected: "record",
                        found: value.kind(),
                    });
                };
                for field in fields {
                    let Some(actual) = actual_fields.iter().find(|f| f.name == field.name) else {
                        return Err(MatchError::TypeMismatch {
                            expected: "record field",
                            found: value.kind(),
                        });
                    };
                    let matched = match &actual.value {
                        Some(inner) => field.template.match_at(inner, ctx, depth + 1)?,
                        None => field.template.match_omit(ctx.legacy),
                    };
                    if !matched {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            TemplateSelector::Union {
                alternative,
                template,
                ..
            } => {
                let ValueData::Union {
                    alternative: selected,
                    value: inner,
                } = data
                else {
                    return Err(MatchError::TypeMismatch {
                        expected: "union",
                        found: value.kind(),
                    });
                };
                if selected != alternative || !inner.is_bound() {
                    return Ok(false);
                }
                template.match_at(inner, ctx, depth + 1)
            }
            TemplateSelector::Elements { items, .. } => {
                let ValueData::List(elements) = data else {
                    return Err(MatchError::TypeMismatch {
                        expected: "list",
                        found: value.kind(),
                    });
                };
                match_elements(items, elements, ctx, depth + 1)
            }
            TemplateSelector::DecodeMatch { target, inner } => {
                let codec = ctx.codec.ok_or(MatchError::MissingCodec)?;
                let raw = value.raw_bytes()?;
                match codec.decode(&raw, target) {
                    Ok(decoded) => inner.match_at(&decoded, ctx, depth + 1),
                    Err(err) => {
                        debug!(target: "ttsem::runtime", %target, error = %err, "operand does not decode");
                        Ok(false)
                    }
                }
            }
            TemplateSelector::Pattern(pattern) => Ok(pattern.compiled.matches(value.as_str()?)),
        }
    }
}

fn is_wildcard(item: &Template) -> bool {
    matches!(item.selector(), TemplateSelector::AnyOrOmit) && item.length_restriction().is_none()
}

/// Match element templates against element values. A bare `*` element
/// absorbs any number of values.
fn match_elements(
    items: &[Template],
    values: &[Value],
    ctx: &MatchingContext<'_>,
    depth: u32,
) -> Result<bool, MatchError> {
    if !items.iter().any(is_wildcard) {
        if items.len() != values.len() {
            return Ok(false);
        }
        for (item, value) in items.iter().zip(values) {
            if !item.match_at(value, ctx, depth)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    // reachable[j]: the items seen so far can consume exactly the first j values.
    let mut reachable = vec![false; values.len() + 1];
    reachable[0] = true;
    for item in items {
        let mut next = vec![false; values.len() + 1];
        if is_wildcard(item) {
            let mut seen = false;
            for (slot, &before) in next.iter_mut().zip(&reachable) {
                seen |= before;
                *slot = seen;
            }
        } else {
            for (j, value) in values.iter().enumerate() {
                if reachable[j] && item.match_at(value, ctx, depth)? {
                    next[j + 1] = true;
                }
            }
        }
        reachable = next;
    }
    Ok(reachable[values.len()])
}

fn match_range(range: &ValueRange, value: &Value) -> Result<bool, MatchError> {
    let kind = value.kind();
    if kind.is_character_string() {
        let low = range.min.as_ref().map(|b| bound_char(&b.value).map(|c| (c, b.exclusive))).transpose()?;
        let high = range.max.as_ref().map(|b| bound_char(&b.value).map(|c| (c, b.exclusive))).transpose()?;
        let within = |c: char| {
            let above = low.is_none_or(|(min, exclusive)| if exclusive { c > min } else { c >= min });
            let below = high.is_none_or(|(max, exclusive)| if exclusive { c < max } else { c <= max });
            above && below
        };
        return Ok(value.as_str()?.chars().all(within));
    }
    if !kind.is_ordered() {
        return Err(MatchError::UnorderedDomain(kind));
    }

    let lower = match &range.min {
        None => true,
        Some(bound) => {
            let ord = bound.value.compare(value)?;
            if bound.exclusive {
                ord == Ordering::Less
            } else {
                ord != Ordering::Greater
            }
        }
    };
    let upper = match &range.max {
        None => true,
        Some(bound) => {
            let ord = bound.value.compare(value)?;
            if bound.exclusive {
                ord == Ordering::Greater
            } else {
                ord != Ordering::Less
            }
        }
    };
    Ok(lower && upper)
}

fn bound_char(bound: &Value) -> Result<char, MatchError> {
    let text = bound.as_str()?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(MatchError::InvalidRange(format!(
            "Character range bound {bound} must be a single character"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/matching_tests.rs"]
mod matching_tests;
