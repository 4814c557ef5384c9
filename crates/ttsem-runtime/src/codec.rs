//! Codec capability consumed by decoded content matching.
//!
//! Byte-level encoding rules belong to the host; the matching engine only
//! needs `decode`. A decode failure is an expected outcome and turns into a
//! no-match.

use crate::value::{Value, ValueData};
use std::fmt;
use ttsem_common::TypeKind;

/// Type a `decmatch` template decodes its operand into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeTarget {
    pub name: String,
    pub kind: TypeKind,
}

impl DecodeTarget {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl fmt::Display for DecodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    Truncated { needed: usize, available: usize },
    TrailingBytes(usize),
    Malformed(String),
    Unsupported(TypeKind),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { needed, available } => {
                write!(f, "needed {needed} bytes but only {available} are available")
            }
            Self::TrailingBytes(count) => write!(f, "{count} bytes left over after decoding"),
            Self::Malformed(reason) => write!(f, "malformed input: {reason}"),
            Self::Unsupported(kind) => write!(f, "no decoding rule for type `{kind}'"),
        }
    }
}

impl std::error::Error for DecodeError {}

pub trait Codec {
    fn decode(&self, raw: &[u8], target: &DecodeTarget) -> Result<Value, DecodeError>;
}

impl<C: Codec + ?Sized> Codec for &C {
    fn decode(&self, raw: &[u8], target: &DecodeTarget) -> Result<Value, DecodeError> {
        (**self).decode(raw, target)
    }
}

/// Minimal raw encoding: octetstrings as-is, character strings as UTF-8,
/// booleans as one byte, integers as big-endian two's complement of one to
/// eight bytes, bitstrings as packed bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
    fn decode(&self, raw: &[u8], target: &DecodeTarget) -> Result<Value, DecodeError> {
        match target.kind.ttcn3_view() {
            TypeKind::Octetstring => Ok(Value::octetstring(raw)),
            kind if kind.is_character_string() => {
                let text = std::str::from_utf8(raw)
                    .map_err(|err| DecodeError::Malformed(err.to_string()))?;
                if kind == TypeKind::Charstring && !text.is_ascii() {
                    return Err(DecodeError::Malformed(
                        "charstring contains non-ASCII characters".to_string(),
                    ));
                }
                Ok(Value::new(target.kind, ValueData::Charstring(text.to_string())))
            }
            TypeKind::Boolean => match raw {
                [] => Err(DecodeError::Truncated {
                    needed: 1,
                    available: 0,
                }),
                [0] => Ok(Value::boolean(false)),
                [1] => Ok(Value::boolean(true)),
                [b] => Err(DecodeError::Malformed(format!("boolean byte {b:#04x}"))),
                [_, rest @ ..] => Err(DecodeError::TrailingBytes(rest.len())),
            },
            TypeKind::Integer => {
                if raw.is_empty() {
                    return Err(DecodeError::Truncated {
                        needed: 1,
                        available: 0,
                    });
                }
                if raw.len() > 8 {
                    return Err(DecodeError::Malformed(format!(
                        "integer of {} bytes does not fit 64 bits",
                        raw.len()
                    )));
                }
                let fill = if raw[0] & 0x80 != 0 { 0xFF } else { 0x00 };
                let mut bytes = [fill; 8];
                bytes[8 - raw.len()..].copy_from_slice(raw);
                Ok(Value::integer(i64::from_be_bytes(bytes)))
            }
            TypeKind::Bitstring => Ok(Value::bitstring(
                raw.iter()
                    .flat_map(|byte| (0..8).rev().map(move |i| byte & (1 << i) != 0)),
            )),
            _ => Err(DecodeError::Unsupported(target.kind)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/codec_tests.rs"]
mod codec_tests;
