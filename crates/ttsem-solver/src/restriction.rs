//! Subtype constraints and the restriction intersector.
//!
//! A constraint narrows the values of a type beyond its kind: an explicit
//! value set, a range over an ordered domain (integers, reals, or the
//! alphabet of a character string), or a set of permitted lengths.
//!
//! Two questions are answered here:
//! - [`intersects`]: do two constraints admit at least one common value?
//!   Used by the compatibility resolver's subtype stage.
//! - [`SubtypeConstraint::is_subset_of`]: does a constraint only narrow its
//!   parent's? Used when checking declarations.
//!
//! Exclusive bounds narrow by one unit when every bound involved is an
//! integer. For reals and characters an exclusive bound equal to the other
//! side's bound means the ranges do not meet.

use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

// =============================================================================
// Values and bounds
// =============================================================================

/// A literal appearing inside a constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstraintValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Char(char),
    String(String),
    Enumerated(String),
}

impl ConstraintValue {
    /// Ordering between comparable literals; `None` for unrelated domains.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        use ConstraintValue::{Char, Integer, Real, String};
        match (self, other) {
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Real(a), Real(b)) => a.partial_cmp(b),
            (Integer(a), Real(b)) => (*a as f64).partial_cmp(b),
            (Real(a), Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Char(a), Char(b)) => Some(a.cmp(b)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Char(a), String(b)) => single_char(b).map(|b| a.cmp(&b)),
            (String(a), Char(b)) => single_char(a).map(|a| a.cmp(b)),
            _ => None,
        }
    }

    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Enumerated(a), Self::Enumerated(b)) => a == b,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }

    /// Character count of string-like literals.
    fn string_length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::Char(_) => Some(1),
            _ => None,
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r:?}"),
            Self::Char(c) => write!(f, "\"{c}\""),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Enumerated(name) => f.write_str(name),
        }
    }
}

/// One end of a range.
#[derive(Clone, Debug, PartialEq)]
pub struct Limit {
    pub value: ConstraintValue,
    pub exclusive: bool,
}

impl Limit {
    pub fn inclusive(value: ConstraintValue) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: ConstraintValue) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

/// `(min .. max)`; an absent end is unbounded.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct RangeConstraint {
    pub min: Option<Limit>,
    pub max: Option<Limit>,
}

impl RangeConstraint {
    pub fn new(min: Option<Limit>, max: Option<Limit>) -> Self {
        Self { min, max }
    }

    /// Ranges over characters restrict the alphabet of a string type.
    pub fn is_alphabet(&self) -> bool {
        self.bounds()
            .any(|v| matches!(v, ConstraintValue::Char(_) | ConstraintValue::String(_)))
    }

    fn bounds(&self) -> impl Iterator<Item = &ConstraintValue> {
        self.min
            .iter()
            .chain(self.max.iter())
            .map(|limit| &limit.value)
    }

    fn is_integer(&self) -> bool {
        self.bounds()
            .all(|v| matches!(v, ConstraintValue::Integer(_)))
    }

    /// `min <= max` when both ends are present and comparable.
    pub fn is_well_formed(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => !matches!(min.value.compare(&max.value), Some(Ordering::Greater)),
            _ => true,
        }
    }

    /// Whether the range admits no value at all.
    pub fn is_empty(&self) -> bool {
        !self.overlaps(&RangeConstraint::default())
    }

    /// Membership of a single scalar (not applied per character).
    pub fn contains_scalar(&self, value: &ConstraintValue) -> bool {
        let above_min = match &self.min {
            None => true,
            Some(min) => match value.compare(&min.value) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => !min.exclusive,
                Some(Ordering::Less) => false,
                None => true,
            },
        };
        let below_max = match &self.max {
            None => true,
            Some(max) => match value.compare(&max.value) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => !max.exclusive,
                Some(Ordering::Greater) => false,
                None => true,
            },
        };
        above_min && below_max
    }

    /// Membership of a literal; strings against an alphabet range are
    /// checked character by character.
    pub fn contains(&self, value: &ConstraintValue) -> bool {
        match value {
            ConstraintValue::String(s) if self.is_alphabet() => s
                .chars()
                .all(|c| self.contains_scalar(&ConstraintValue::Char(c))),
            _ => self.contains_scalar(value),
        }
    }

    /// Whether the two ranges share a value.
    pub fn overlaps(&self, other: &RangeConstraint) -> bool {
        if self.is_integer() && other.is_integer() {
            let (lo_a, hi_a) = self.integer_bounds();
            let (lo_b, hi_b) = other.integer_bounds();
            let (Some(lo_a), Some(hi_a), Some(lo_b), Some(hi_b)) = (lo_a, hi_a, lo_b, hi_b) else {
                return false;
            };
            return lo_a.max(lo_b) <= hi_a.min(hi_b);
        }

        let lower = tighter_lower(self.min.as_ref(), other.min.as_ref());
        let upper = tighter_upper(self.max.as_ref(), other.max.as_ref());
        match (lower, upper) {
            (Some(lo), Some(hi)) => match lo.value.compare(&hi.value) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => !lo.exclusive && !hi.exclusive,
                Some(Ordering::Greater) => false,
                None => true,
            },
            _ => true,
        }
    }

    /// Inclusive integer bounds; `None` marks an empty side after
    /// narrowing an exclusive bound past the end of the domain.
    fn integer_bounds(&self) -> (Option<i64>, Option<i64>) {
        let lo = match &self.min {
            None => Some(i64::MIN),
            Some(Limit {
                value: ConstraintValue::Integer(v),
                exclusive,
            }) => {
                if *exclusive {
                    v.checked_add(1)
                } else {
                    Some(*v)
                }
            }
            Some(_) => Some(i64::MIN),
        };
        let hi = match &self.max {
            None => Some(i64::MAX),
            Some(Limit {
                value: ConstraintValue::Integer(v),
                exclusive,
            }) => {
                if *exclusive {
                    v.checked_sub(1)
                } else {
                    Some(*v)
                }
            }
            Some(_) => Some(i64::MAX),
        };
        (lo, hi)
    }

    /// Whether every value of `self` is also admitted by `parent`.
    fn within(&self, parent: &RangeConstraint) -> bool {
        if self.is_integer() && parent.is_integer() {
            let (Some(lo), Some(hi)) = self.integer_bounds() else {
                return true;
            };
            let (Some(p_lo), Some(p_hi)) = parent.integer_bounds() else {
                return lo > hi;
            };
            return lo > hi || (p_lo <= lo && hi <= p_hi);
        }
        let min_ok = match (&parent.min, &self.min) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(p), Some(c)) => match c.value.compare(&p.value) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => c.exclusive || !p.exclusive,
                Some(Ordering::Less) => false,
                None => true,
            },
        };
        let max_ok = match (&parent.max, &self.max) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(p), Some(c)) => match c.value.compare(&p.value) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => c.exclusive || !p.exclusive,
                Some(Ordering::Greater) => false,
                None => true,
            },
        };
        min_ok && max_ok
    }

    /// All members of a finite integer range, if there are at most `limit`.
    fn enumerate_integers(&self, limit: usize) -> Option<Vec<i64>> {
        if !self.is_integer() || self.min.is_none() || self.max.is_none() {
            return None;
        }
        let (Some(lo), Some(hi)) = self.integer_bounds() else {
            return Some(Vec::new());
        };
        if lo > hi {
            return Some(Vec::new());
        }
        let count = (hi as i128 - lo as i128 + 1) as u128;
        if count > limit as u128 {
            return None;
        }
        Some((lo..=hi).collect())
    }
}

fn tighter_lower<'a>(a: Option<&'a Limit>, b: Option<&'a Limit>) -> Option<&'a Limit> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => match a.value.compare(&b.value) {
            Some(Ordering::Greater) => Some(a),
            Some(Ordering::Less) => Some(b),
            _ if a.exclusive => Some(a),
            _ => Some(b),
        },
    }
}

fn tighter_upper<'a>(a: Option<&'a Limit>, b: Option<&'a Limit>) -> Option<&'a Limit> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => match a.value.compare(&b.value) {
            Some(Ordering::Less) => Some(a),
            Some(Ordering::Greater) => Some(b),
            _ if a.exclusive => Some(a),
            _ => Some(b),
        },
    }
}

impl fmt::Display for RangeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        match &self.min {
            Some(min) => {
                if min.exclusive {
                    f.write_str("!")?;
                }
                write!(f, "{}", min.value)?;
            }
            None => f.write_str("-infinity")?,
        }
        f.write_str(" .. ")?;
        match &self.max {
            Some(max) => {
                if max.exclusive {
                    f.write_str("!")?;
                }
                write!(f, "{}", max.value)?;
            }
            None => f.write_str("infinity")?,
        }
        f.write_str(")")
    }
}

/// Permitted lengths `min ..= max`; an absent `max` is unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl LengthRange {
    pub const fn exact(length: usize) -> Self {
        Self {
            min: length,
            max: Some(length),
        }
    }

    pub const fn between(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && self.max.is_none_or(|max| length <= max)
    }

    pub fn is_well_formed(&self) -> bool {
        self.max.is_none_or(|max| self.min <= max)
    }

    fn overlaps(&self, other: &LengthRange) -> bool {
        let lo = self.min.max(other.min);
        match (self.max, other.max) {
            (None, None) => true,
            (Some(a), None) => lo <= a,
            (None, Some(b)) => lo <= b,
            (Some(a), Some(b)) => lo <= a.min(b),
        }
    }
}

impl fmt::Display for LengthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{} .. {max}", self.min),
            None => write!(f, "{} .. infinity", self.min),
        }
    }
}

pub type LengthRanges = SmallVec<[LengthRange; 2]>;

// =============================================================================
// SubtypeConstraint
// =============================================================================

/// Restriction attached to a type declaration.
#[derive(Clone, Debug, PartialEq)]
pub enum SubtypeConstraint {
    ValueSet(Vec<ConstraintValue>),
    Range(RangeConstraint),
    LengthSet(LengthRanges),
}

/// Largest integer range expanded into values when comparing against a set.
const MAX_EXPANDED_RANGE: usize = 4096;

impl SubtypeConstraint {
    pub fn values(values: impl IntoIterator<Item = ConstraintValue>) -> Self {
        Self::ValueSet(values.into_iter().collect())
    }

    pub fn range(min: Option<Limit>, max: Option<Limit>) -> Self {
        Self::Range(RangeConstraint::new(min, max))
    }

    pub fn lengths(ranges: impl IntoIterator<Item = LengthRange>) -> Self {
        Self::LengthSet(ranges.into_iter().collect())
    }

    /// Bounds are ordered, both for ranges and for every length range.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Self::ValueSet(_) => true,
            Self::Range(range) => range.is_well_formed(),
            Self::LengthSet(ranges) => ranges.iter().all(LengthRange::is_well_formed),
        }
    }

    /// Whether the constraint admits nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::ValueSet(values) => values.is_empty(),
            Self::Range(range) => range.is_empty(),
            Self::LengthSet(ranges) => ranges.iter().all(|r| !r.is_well_formed()),
        }
    }

    /// Whether a value satisfies the constraint; literals from an unrelated
    /// domain are not refuted.
    pub fn admits(&self, value: &ConstraintValue) -> bool {
        match self {
            Self::ValueSet(values) => values.iter().any(|v| v.same_value(value)),
            Self::Range(range) => range.contains(value),
            Self::LengthSet(ranges) => match value.string_length() {
                Some(len) => ranges.iter().any(|r| r.contains(len)),
                None => true,
            },
        }
    }

    /// Whether the constraint admits some one-element string.
    pub fn is_compatible_with_elem(&self) -> bool {
        match self {
            Self::ValueSet(values) => {
                let mut saw_string = false;
                for value in values {
                    if let Some(len) = value.string_length() {
                        saw_string = true;
                        if len == 1 {
                            return true;
                        }
                    }
                }
                !saw_string
            }
            Self::Range(range) => !range.is_empty(),
            Self::LengthSet(ranges) => ranges.iter().any(|r| r.contains(1)),
        }
    }

    /// Whether the two constraints admit at least one common value.
    ///
    /// Constraints over different dimensions (an alphabet against a length
    /// set, say) cannot refute each other and are treated as intersecting.
    pub fn is_compatible(&self, other: &SubtypeConstraint) -> bool {
        match (self, other) {
            (Self::ValueSet(a), Self::ValueSet(b)) => {
                a.iter().any(|x| b.iter().any(|y| x.same_value(y)))
            }
            (Self::Range(a), Self::Range(b)) => {
                if a.is_alphabet() || b.is_alphabet() {
                    // Empty string is a member of every alphabet-restricted type.
                    true
                } else {
                    a.overlaps(b)
                }
            }
            (Self::LengthSet(a), Self::LengthSet(b)) => {
                a.iter().any(|x| b.iter().any(|y| x.overlaps(y)))
            }
            (Self::ValueSet(values), other) | (other, Self::ValueSet(values)) => {
                values.iter().any(|v| other.admits(v))
            }
            (Self::Range(_), Self::LengthSet(_)) | (Self::LengthSet(_), Self::Range(_)) => true,
        }
    }

    /// Whether every value admitted by `self` is admitted by `parent`.
    pub fn is_subset_of(&self, parent: &SubtypeConstraint) -> bool {
        match (self, parent) {
            (Self::ValueSet(values), parent) => values.iter().all(|v| parent.admits(v)),
            (Self::Range(child), Self::Range(parent)) => {
                if child.is_alphabet() != parent.is_alphabet() {
                    return true;
                }
                child.within(parent)
            }
            (Self::Range(child), Self::ValueSet(values)) => {
                match child.enumerate_integers(MAX_EXPANDED_RANGE) {
                    Some(members) => members.iter().all(|m| {
                        values
                            .iter()
                            .any(|v| v.same_value(&ConstraintValue::Integer(*m)))
                    }),
                    None => false,
                }
            }
            (Self::LengthSet(child), Self::LengthSet(parent)) => {
                let merged = merge_length_ranges(parent);
                child.iter().filter(|r| r.is_well_formed()).all(|r| {
                    merged.iter().any(|p| {
                        p.min <= r.min
                            && match (p.max, r.max) {
                                (None, _) => true,
                                (Some(_), None) => false,
                                (Some(pm), Some(rm)) => rm <= pm,
                            }
                    })
                })
            }
            (Self::LengthSet(_), _) => true,
            (Self::Range(_), Self::LengthSet(_)) => true,
        }
    }
}

/// Sort and coalesce overlapping or adjacent ranges.
fn merge_length_ranges(ranges: &[LengthRange]) -> Vec<LengthRange> {
    let mut sorted: Vec<LengthRange> = ranges.iter().copied().filter(LengthRange::is_well_formed).collect();
    sorted.sort_by_key(|r| r.min);
    let mut merged: Vec<LengthRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut() {
            match last.max {
                None => continue,
                Some(max) if range.min <= max.saturating_add(1) => {
                    last.max = match range.max {
                        None => None,
                        Some(m) => Some(m.max(max)),
                    };
                    continue;
                }
                Some(_) => {}
            }
        }
        merged.push(range);
    }
    merged
}

impl fmt::Display for SubtypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueSet(values) => {
                f.write_str("(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            Self::Range(range) => write!(f, "{range}"),
            Self::LengthSet(ranges) => {
                f.write_str("length(")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{range}")?;
                }
                f.write_str(")")
            }
        }
    }
}

// =============================================================================
// Intersector
// =============================================================================

/// Decide whether `a` and `b` share a value.
///
/// `a_single_elem` / `b_single_elem` mark a side that stands for one element
/// of a string (`s[i]`). When only one side is an element, the other side is
/// projected to "admits a one-element string"; when both are, there is
/// nothing to check.
pub fn intersects(
    a: &SubtypeConstraint,
    b: &SubtypeConstraint,
    a_single_elem: bool,
    b_single_elem: bool,
) -> Result<(), String> {
    match (a_single_elem, b_single_elem) {
        (true, true) => Ok(()),
        (true, false) => {
            if b.is_compatible_with_elem() {
                Ok(())
            } else {
                Err(format!(
                    "Subtype mismatch: string element has no common value with subtype {b}"
                ))
            }
        }
        (false, true) => {
            if a.is_compatible_with_elem() {
                Ok(())
            } else {
                Err(format!(
                    "Subtype mismatch: subtype {a} has no common value with string element"
                ))
            }
        }
        (false, false) => {
            if a.is_compatible(b) {
                Ok(())
            } else {
                Err(format!(
                    "Subtype mismatch: subtype {a} has no common value with subtype {b}"
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/restriction_tests.rs"]
mod restriction_tests;
