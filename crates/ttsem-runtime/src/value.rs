//! Runtime values.
//!
//! A [`Value`] is a kind tag plus optional data; `None` means unbound. Every
//! query except [`Value::is_bound`] fails with [`MatchError::UnboundValue`]
//! on an unbound value.

use crate::error::MatchError;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use ttsem_common::TypeKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    None,
    Pass,
    Inconc,
    Fail,
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Pass => "pass",
            Self::Inconc => "inconc",
            Self::Fail => "fail",
            Self::Error => "error",
        })
    }
}

/// One field of a record or set value; `value: None` is an omitted
/// optional field.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordField {
    pub name: String,
    pub value: Option<Value>,
}

impl RecordField {
    pub fn present(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }

    pub fn omitted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ValueData {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Verdict(Verdict),
    Bitstring(Vec<bool>),
    /// One nibble per element.
    Hexstring(Vec<u8>),
    Octetstring(Vec<u8>),
    /// Every character string kind, narrow or universal.
    Charstring(String),
    Enumerated { name: String, ordinal: i64 },
    ObjectId(SmallVec<[u64; 8]>),
    Record(Vec<RecordField>),
    Union { alternative: String, value: Box<Value> },
    /// Record-of, set-of and array elements.
    List(Vec<Value>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    kind: TypeKind,
    data: Option<ValueData>,
}

impl Value {
    pub fn new(kind: TypeKind, data: ValueData) -> Self {
        Self {
            kind,
            data: Some(data),
        }
    }

    pub fn unbound(kind: TypeKind) -> Self {
        Self { kind, data: None }
    }

    pub fn null() -> Self {
        Self::new(TypeKind::Null, ValueData::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(TypeKind::Boolean, ValueData::Boolean(value))
    }

    pub fn integer(value: i64) -> Self {
        Self::new(TypeKind::Integer, ValueData::Integer(value))
    }

    pub fn real(value: f64) -> Self {
        Self::new(TypeKind::Real, ValueData::Real(value))
    }

    pub fn verdict(value: Verdict) -> Self {
        Self::new(TypeKind::Verdict, ValueData::Verdict(value))
    }

    pub fn charstring(value: impl Into<String>) -> Self {
        Self::new(TypeKind::Charstring, ValueData::Charstring(value.into()))
    }

    pub fn universal_charstring(value: impl Into<String>) -> Self {
        Self::new(TypeKind::UniversalCharstring, ValueData::Charstring(value.into()))
    }

    pub fn octetstring(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(TypeKind::Octetstring, ValueData::Octetstring(bytes.into()))
    }

    pub fn bitstring(bits: impl IntoIterator<Item = bool>) -> Self {
        Self::new(TypeKind::Bitstring, ValueData::Bitstring(bits.into_iter().collect()))
    }

    /// Nibbles above 0xF are truncated to their low four bits.
    pub fn hexstring(nibbles: impl IntoIterator<Item = u8>) -> Self {
        Self::new(
            TypeKind::Hexstring,
            ValueData::Hexstring(nibbles.into_iter().map(|n| n & 0x0F).collect()),
        )
    }

    pub fn enumerated(kind: TypeKind, name: impl Into<String>, ordinal: i64) -> Self {
        Self::new(
            kind,
            ValueData::Enumerated {
                name: name.into(),
                ordinal,
            },
        )
    }

    pub fn objid(components: impl IntoIterator<Item = u64>) -> Self {
        Self::new(TypeKind::ObjectIdentifier, ValueData::ObjectId(components.into_iter().collect()))
    }

    pub fn record(kind: TypeKind, fields: Vec<RecordField>) -> Self {
        Self::new(kind, ValueData::Record(fields))
    }

    pub fn union(kind: TypeKind, alternative: impl Into<String>, value: Value) -> Self {
        Self::new(
            kind,
            ValueData::Union {
                alternative: alternative.into(),
                value: Box::new(value),
            },
        )
    }

    pub fn list(kind: TypeKind, elements: Vec<Value>) -> Self {
        Self::new(kind, ValueData::List(elements))
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    /// The payload, or `UnboundValue` naming `operation`.
    pub fn data(&self, operation: &'static str) -> Result<&ValueData, MatchError> {
        self.data.as_ref().ok_or(MatchError::UnboundValue(operation))
    }

    // -------------------------------------------------------------------------
    // Equality and ordering
    // -------------------------------------------------------------------------

    /// Deep value equality. Kinds are not compared; a charstring equals a
    /// universal charstring with the same characters.
    pub fn equals(&self, other: &Value) -> Result<bool, MatchError> {
        let a = self.data("comparison")?;
        let b = other.data("comparison")?;
        match (a, b) {
            (ValueData::Record(x), ValueData::Record(y)) => {
                if x.len() != y.len() {
                    return Ok(false);
                }
                for (fx, fy) in x.iter().zip(y) {
                    if fx.name != fy.name {
                        return Ok(false);
                    }
                    match (&fx.value, &fy.value) {
                        (Some(vx), Some(vy)) => {
                            if !vx.equals(vy)? {
                                return Ok(false);
                            }
                        }
                        (None, None) => {}
                        _ => return Ok(false),
                    }
                }
                Ok(true)
            }
            (
                ValueData::Union {
                    alternative: alt_a,
                    value: va,
                },
                ValueData::Union {
                    alternative: alt_b,
                    value: vb,
                },
            ) => Ok(alt_a == alt_b && va.equals(vb)?),
            (ValueData::List(x), ValueData::List(y)) => {
                if x.len() != y.len() {
                    return Ok(false);
                }
                for (ex, ey) in x.iter().zip(y) {
                    if !ex.equals(ey)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (ValueData::Enumerated { ordinal: oa, .. }, ValueData::Enumerated { ordinal: ob, .. }) => {
                Ok(oa == ob)
            }
            // `not_a_number` equals itself.
            (ValueData::Real(x), ValueData::Real(y)) => Ok(x == y || (x.is_nan() && y.is_nan())),
            _ => Ok(a == b),
        }
    }

    /// Ordering over the ordered domains: integers and reals (mixed freely)
    /// and character strings.
    pub fn compare(&self, other: &Value) -> Result<Ordering, MatchError> {
        let a = self.data("ordering")?;
        let b = other.data("ordering")?;
        let unordered = || MatchError::UnorderedDomain(self.kind);
        match (a, b) {
            (ValueData::Integer(x), ValueData::Integer(y)) => Ok(x.cmp(y)),
            (ValueData::Real(x), ValueData::Real(y)) => x.partial_cmp(y).ok_or_else(unordered),
            (ValueData::Integer(x), ValueData::Real(y)) => (*x as f64).partial_cmp(y).ok_or_else(unordered),
            (ValueData::Real(x), ValueData::Integer(y)) => x.partial_cmp(&(*y as f64)).ok_or_else(unordered),
            (ValueData::Charstring(x), ValueData::Charstring(y)) => Ok(x.cmp(y)),
            _ => Err(unordered()),
        }
    }

    // -------------------------------------------------------------------------
    // Length and element access
    // -------------------------------------------------------------------------

    pub fn length(&self) -> Result<usize, MatchError> {
        match self.data("lengthof")? {
            ValueData::Charstring(s) => Ok(s.chars().count()),
            ValueData::Bitstring(bits) => Ok(bits.len()),
            ValueData::Hexstring(nibbles) => Ok(nibbles.len()),
            ValueData::Octetstring(bytes) => Ok(bytes.len()),
            ValueData::List(elements) => Ok(elements.len()),
            _ => Err(MatchError::LengthNotApplicable(self.kind)),
        }
    }

    /// Element `index` of a string or list value. String elements keep the
    /// kind of their string.
    pub fn element(&self, index: usize) -> Result<Value, MatchError> {
        let len = self.length()?;
        let overflow = MatchError::ListIndex { index, len };
        let data = match self.data("indexing")? {
            ValueData::Charstring(s) => {
                ValueData::Charstring(s.chars().nth(index).ok_or(overflow)?.to_string())
            }
            ValueData::Bitstring(bits) => ValueData::Bitstring(vec![*bits.get(index).ok_or(overflow)?]),
            ValueData::Hexstring(nibbles) => {
                ValueData::Hexstring(vec![*nibbles.get(index).ok_or(overflow)?])
            }
            ValueData::Octetstring(bytes) => {
                ValueData::Octetstring(vec![*bytes.get(index).ok_or(overflow)?])
            }
            ValueData::List(elements) => return elements.get(index).cloned().ok_or(overflow),
            _ => return Err(MatchError::LengthNotApplicable(self.kind)),
        };
        Ok(Value::new(self.kind, data))
    }

    /// A named field of a record value: `Ok(None)` when omitted.
    pub fn field(&self, name: &str) -> Result<Option<&Value>, MatchError> {
        match self.data("field access")? {
            ValueData::Record(fields) => fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.value.as_ref())
                .ok_or(MatchError::TypeMismatch {
                    expected: "record field",
                    found: self.kind,
                }),
            _ => Err(MatchError::TypeMismatch {
                expected: "record",
                found: self.kind,
            }),
        }
    }

    /// The characters of a character string value.
    pub fn as_str(&self) -> Result<&str, MatchError> {
        match self.data("string access")? {
            ValueData::Charstring(s) => Ok(s),
            _ => Err(MatchError::TypeMismatch {
                expected: "character string",
                found: self.kind,
            }),
        }
    }

    /// Encoded form handed to a codec: octets as-is, bits and nibbles packed
    /// most significant first, character strings as UTF-8.
    pub fn raw_bytes(&self) -> Result<Vec<u8>, MatchError> {
        match self.data("decoding")? {
            ValueData::Octetstring(bytes) => Ok(bytes.clone()),
            ValueData::Charstring(s) => Ok(s.as_bytes().to_vec()),
            ValueData::Bitstring(bits) => Ok(bits
                .chunks(8)
                .map(|chunk| {
                    chunk
                        .iter()
                        .enumerate()
                        .fold(0u8, |acc, (i, bit)| acc | (u8::from(*bit) << (7 - i)))
                })
                .collect()),
            ValueData::Hexstring(nibbles) => Ok(nibbles
                .chunks(2)
                .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
                .collect()),
            _ => Err(MatchError::TypeMismatch {
                expected: "decoded content",
                found: self.kind,
            }),
        }
    }
}

// =============================================================================
// Log notation
// =============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(data) = &self.data else {
            return f.write_str("<unbound>");
        };
        match data {
            ValueData::Null => f.write_str("NULL"),
            ValueData::Boolean(b) => write!(f, "{b}"),
            ValueData::Integer(i) => write!(f, "{i}"),
            ValueData::Real(r) if r.is_finite() && r.fract() == 0.0 => write!(f, "{r:.1}"),
            ValueData::Real(r) => write!(f, "{r}"),
            ValueData::Verdict(v) => write!(f, "{v}"),
            ValueData::Bitstring(bits) => {
                f.write_str("'")?;
                for bit in bits {
                    f.write_str(if *bit { "1" } else { "0" })?;
                }
                f.write_str("'B")
            }
            ValueData::Hexstring(nibbles) => {
                f.write_str("'")?;
                for nibble in nibbles {
                    write!(f, "{nibble:X}")?;
                }
                f.write_str("'H")
            }
            ValueData::Octetstring(bytes) => {
                f.write_str("'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'O")
            }
            ValueData::Charstring(s) => write!(f, "\"{s}\""),
            ValueData::Enumerated { name, .. } => f.write_str(name),
            ValueData::ObjectId(components) => {
                f.write_str("objid {")?;
                for c in components {
                    write!(f, " {c}")?;
                }
                f.write_str(" }")
            }
            ValueData::Record(fields) => {
                if fields.is_empty() {
                    return f.write_str("{ }");
                }
                f.write_str("{ ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match &field.value {
                        Some(value) => write!(f, "{} := {value}", field.name)?,
                        None => write!(f, "{} := omit", field.name)?,
                    }
                }
                f.write_str(" }")
            }
            ValueData::Union { alternative, value } => write!(f, "{{ {alternative} := {value} }}"),
            ValueData::List(elements) => {
                if elements.is_empty() {
                    return f.write_str("{ }");
                }
                f.write_str("{ ")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod value_tests;
