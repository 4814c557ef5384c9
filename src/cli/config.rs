//! Check documents.
//!
//! A check document is a JSON file describing a set of type declarations,
//! the semantic checks to run against them and the template matches to
//! evaluate:
//!
//! ```json
//! {
//!   "options": { "strictStructural": "true", "typeCompatibility": "error" },
//!   "types": [
//!     { "name": "Small", "aliasOf": "integer",
//!       "subtype": { "range": { "min": 1, "max": 10 } } },
//!     { "name": "Point", "kind": "record",
//!       "fields": [{ "name": "x", "type": "Small" },
//!                  { "name": "label", "type": "charstring", "optional": true }] }
//!   ],
//!   "checks": [
//!     { "check": "reference", "expected": "Small", "actual": "integer" }
//!   ],
//!   "matches": [
//!     { "type": "Point", "template": { "fields": { "x": "?", "label": "*" } },
//!       "value": { "x": 3, "label": null }, "expect": true }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use ttsem_checker::{CheckerOptions, Severity};
use ttsem_common::{Dialect, TypeKind};
use ttsem_solver::ParamDirection;

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles cases where documents are generated by tools that quote every
/// scalar, e.g. `"strictStructural": "true"`.
pub fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{}'. Expected true, false, 'true', or 'false'",
                    s
                ))),
            }
        }
    }
}

fn deserialize_severity<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    Option::<String>::deserialize(deserializer)?
        .map(|s| s.parse::<Severity>().map_err(Error::custom))
        .transpose()
}

// =============================================================================
// Document
// =============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckDocument {
    #[serde(default)]
    pub options: DocumentOptions,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub checks: Vec<CheckEntry>,
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOptions {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub strict_structural: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_severity")]
    pub type_compatibility: Option<Severity>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub legacy_matching: Option<bool>,
}

impl DocumentOptions {
    /// Options with every unset entry taken from `base`.
    pub fn apply_to(&self, base: CheckerOptions) -> CheckerOptions {
        CheckerOptions {
            strict_structural: self.strict_structural.unwrap_or(base.strict_structural),
            type_compatibility: self.type_compatibility.unwrap_or(base.type_compatibility),
            legacy_matching: self.legacy_matching.unwrap_or(base.legacy_matching),
        }
    }
}

// =============================================================================
// Type declarations
// =============================================================================

/// A user type: either a new type of `kind` or an alias of another type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: Option<TypeKind>,
    #[serde(default)]
    pub alias_of: Option<String>,
    #[serde(default)]
    pub dialect: Dialect,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub enumerators: Vec<EnumeratorDecl>,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default)]
    pub subtype: Option<SubtypeDecl>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub optional: bool,
}

/// `{"name": "red"}` or `{"name": "red", "value": 3}`; without a value the
/// enumerator takes its position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumeratorDecl {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub direction: DirectionDecl,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DirectionDecl {
    #[default]
    In,
    Out,
    InOut,
}

impl From<DirectionDecl> for ParamDirection {
    fn from(direction: DirectionDecl) -> Self {
        match direction {
            DirectionDecl::In => ParamDirection::In,
            DirectionDecl::Out => ParamDirection::Out,
            DirectionDecl::InOut => ParamDirection::InOut,
        }
    }
}

/// Subtype constraint of a declaration. Literals are plain JSON scalars
/// interpreted against the declaration's resolved kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubtypeDecl {
    Values(Vec<serde_json::Value>),
    Range(RangeDecl),
    Lengths(Vec<LengthDecl>),
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RangeDecl {
    #[serde(default)]
    pub min: Option<serde_json::Value>,
    #[serde(default)]
    pub max: Option<serde_json::Value>,
    #[serde(default)]
    pub min_exclusive: bool,
    #[serde(default)]
    pub max_exclusive: bool,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthDecl {
    pub min: usize,
    /// Absent means unbounded; equal to `min` for a fixed length.
    #[serde(default)]
    pub max: Option<usize>,
}

// =============================================================================
// Checks and matches
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "check", rename_all = "camelCase")]
pub enum CheckEntry {
    /// A reference of type `actual` used where `expected` is required.
    #[serde(rename_all = "camelCase")]
    Reference {
        #[serde(default)]
        name: Option<String>,
        expected: String,
        actual: String,
        #[serde(default)]
        template: bool,
        #[serde(default)]
        string_element: bool,
    },
    /// An expression whose result kind is known but whose value is not.
    #[serde(rename_all = "camelCase")]
    Expression {
        #[serde(default)]
        name: Option<String>,
        expected: String,
        result_kind: TypeKind,
    },
    #[serde(rename_all = "camelCase")]
    Value {
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "type")]
        ty: String,
        value: serde_json::Value,
    },
    #[serde(rename_all = "camelCase")]
    Template {
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "type")]
        ty: String,
        template: serde_json::Value,
        #[serde(default)]
        optional: bool,
    },
    /// Parameter redirect of a `getcall` (`reply: false`) or `getreply`.
    #[serde(rename_all = "camelCase")]
    Redirect {
        #[serde(default)]
        name: Option<String>,
        signature: String,
        #[serde(default)]
        reply: bool,
        assignments: Vec<RedirectDecl>,
    },
}

impl CheckEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Reference { name, .. }
            | Self::Expression { name, .. }
            | Self::Value { name, .. }
            | Self::Template { name, .. }
            | Self::Redirect { name, .. } => name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectDecl {
    pub parameter: String,
    pub variable: String,
    #[serde(default)]
    pub variable_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ty: String,
    pub template: serde_json::Value,
    pub value: serde_json::Value,
    /// Expected outcome; a differing outcome fails the run.
    #[serde(default)]
    pub expect: Option<bool>,
}

// =============================================================================
// Loading
// =============================================================================

pub fn parse_document(source: &str) -> Result<CheckDocument> {
    serde_json::from_str(source).context("failed to parse check document")
}

pub fn load_document(path: &Path) -> Result<CheckDocument> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read check document {}", path.display()))?;
    parse_document(&source).with_context(|| format!("in {}", path.display()))
}
