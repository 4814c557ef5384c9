//! Conversion of check document descriptions into semantic objects.
//!
//! Values are written as plain JSON read against their governing type:
//! numbers for integers and floats, strings for character strings and
//! enumerators, `"0110"` for bitstrings, hex digits for hexstrings and
//! octetstrings, objects for records (`null` marks an omitted field) and
//! single-key objects for unions.
//!
//! Templates accept the same shorthand for specific values plus:
//! - `"?"`, `"*"` and `"omit"`
//! - arrays, read as element lists where `"*"` stands for any number of elements
//! - objects with one matching key: `value`, `list`, `complement`, `range`,
//!   `pattern` (with optional `nocase`), `decmatch`, `fields`, `elements`,
//!   `any`, `anyOrOmit` or `omit`, optionally combined with the `ifpresent`
//!   and `length` modifiers

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value as Json};
use tracing::debug;
use ttsem_common::TypeKind;
use ttsem_runtime::{
    DecodeTarget, FieldTemplate, LengthRestriction, PatternCompiler, RangeBound, RecordField,
    Template, Value, ValueData, Verdict, WildcardPatternCompiler,
};
use ttsem_solver::{
    ConstraintValue, LengthRange, Limit, SubtypeConstraint, TypeId, TypeNode, TypeStore,
};

use crate::cli::config::{CheckDocument, LengthDecl, RangeDecl, SubtypeDecl, TypeDecl};

// =============================================================================
// Type store
// =============================================================================

/// Build the type store for a document.
///
/// Constraint literals depend on the resolved kind of their declaration,
/// which for aliases is only known once every declaration is registered.
/// The store is therefore built twice: once without constraints to learn
/// the kinds, then for real.
pub fn build_store(document: &CheckDocument) -> Result<TypeStore> {
    let mut shape = TypeStore::new();
    for decl in &document.types {
        shape.insert(declaration_node(decl)?);
    }

    let mut store = TypeStore::new();
    for decl in &document.types {
        let mut node = declaration_node(decl)?;
        if let Some(subtype) = &decl.subtype {
            let kind = shape
                .lookup(&decl.name)
                .map_or(TypeKind::Undefined, |id| shape.resolved_kind(id).0);
            let constraint = subtype_constraint(subtype, kind)
                .with_context(|| format!("in the subtype of `{}'", decl.name))?;
            node = node.with_subtype(constraint);
        }
        store.insert(node);
    }
    debug!(types = document.types.len(), "built type store");
    Ok(store)
}

fn declaration_node(decl: &TypeDecl) -> Result<TypeNode> {
    let mut node = match (&decl.alias_of, decl.kind) {
        (Some(target), None | Some(TypeKind::Referenced)) => {
            TypeNode::alias(decl.name.as_str(), target.as_str())
        }
        (None, Some(kind)) if kind != TypeKind::Referenced => {
            TypeNode::new(decl.name.as_str(), kind)
        }
        (Some(_), Some(kind)) => {
            bail!("type `{}' is an alias and cannot also be of kind `{kind}'", decl.name)
        }
        _ => bail!("type `{}' needs either `kind' or `aliasOf'", decl.name),
    };
    node = node.with_dialect(decl.dialect);
    for field in &decl.fields {
        node = node.with_field(field.name.as_str(), field.ty.as_str(), field.optional);
    }
    if let Some(element) = &decl.element {
        node = node.with_element(element.as_str());
    }
    if let Some(dimension) = decl.dimension {
        node = node.with_dimension(dimension);
    }
    for (index, enumerator) in decl.enumerators.iter().enumerate() {
        node = node.with_enumerator(
            enumerator.name.as_str(),
            enumerator.value.unwrap_or(index as i64),
        );
    }
    for param in &decl.parameters {
        node = node.with_parameter(param.name.as_str(), param.ty.as_str(), param.direction.into());
    }
    Ok(node)
}

fn subtype_constraint(decl: &SubtypeDecl, kind: TypeKind) -> Result<SubtypeConstraint> {
    Ok(match decl {
        SubtypeDecl::Values(values) => SubtypeConstraint::values(
            values
                .iter()
                .map(|v| constraint_value(v, kind, false))
                .collect::<Result<Vec<_>>>()?,
        ),
        SubtypeDecl::Range(RangeDecl {
            min,
            max,
            min_exclusive,
            max_exclusive,
        }) => {
            let limit = |bound: &Option<Json>, exclusive: bool| -> Result<Option<Limit>> {
                let Some(bound) = bound else {
                    return Ok(None);
                };
                let value = constraint_value(bound, kind, true)?;
                Ok(Some(if exclusive {
                    Limit::exclusive(value)
                } else {
                    Limit::inclusive(value)
                }))
            };
            SubtypeConstraint::range(limit(min, *min_exclusive)?, limit(max, *max_exclusive)?)
        }
        SubtypeDecl::Lengths(lengths) => SubtypeConstraint::lengths(
            lengths
                .iter()
                .map(|&LengthDecl { min, max }| LengthRange::between(min, max)),
        ),
    })
}

/// A constraint literal. Inside a range, one-character strings are
/// character bounds of an alphabet restriction.
fn constraint_value(json: &Json, kind: TypeKind, in_range: bool) -> Result<ConstraintValue> {
    Ok(match json {
        Json::Bool(b) => ConstraintValue::Boolean(*b),
        Json::Number(n) => match n.as_i64() {
            Some(i) if kind != TypeKind::Real => ConstraintValue::Integer(i),
            _ => ConstraintValue::Real(
                n.as_f64()
                    .ok_or_else(|| anyhow!("number {n} is out of range"))?,
            ),
        },
        Json::String(s) if kind.is_enumerated() => ConstraintValue::Enumerated(s.clone()),
        Json::String(s) if in_range && s.chars().count() == 1 => {
            ConstraintValue::Char(s.chars().next().unwrap_or_default())
        }
        Json::String(s) => ConstraintValue::String(s.clone()),
        other => bail!("`{other}' cannot be used in a subtype constraint"),
    })
}

// =============================================================================
// Values
// =============================================================================

/// The declaration a document refers to by name.
pub fn lookup_type(store: &TypeStore, name: &str) -> Result<TypeId> {
    store
        .lookup(name)
        .ok_or_else(|| anyhow!("unknown type `{name}'"))
}

/// Read a value of type `ty`.
pub fn value(store: &TypeStore, ty: TypeId, json: &Json) -> Result<Value> {
    let resolved = store.resolve_alias(ty)?;
    let node = store.get(resolved);
    let kind = node.kind;
    let name = store.name(ty);

    let data = match kind {
        TypeKind::Null => match json {
            Json::Null => ValueData::Null,
            _ => bail!("expected NULL for type `{name}'"),
        },
        TypeKind::Boolean => ValueData::Boolean(
            json.as_bool()
                .ok_or_else(|| anyhow!("expected a boolean for type `{name}'"))?,
        ),
        TypeKind::Integer | TypeKind::IntegerAsn => ValueData::Integer(
            json.as_i64()
                .ok_or_else(|| anyhow!("expected an integer for type `{name}'"))?,
        ),
        TypeKind::Real => ValueData::Real(
            json.as_f64()
                .ok_or_else(|| anyhow!("expected a number for type `{name}'"))?,
        ),
        TypeKind::Verdict => ValueData::Verdict(verdict(expect_str(json, name)?)?),
        TypeKind::Bitstring | TypeKind::BitstringAsn => {
            ValueData::Bitstring(bits(expect_str(json, name)?)?)
        }
        TypeKind::Hexstring => ValueData::Hexstring(nibbles(expect_str(json, name)?)?),
        TypeKind::Octetstring => ValueData::Octetstring(octets(expect_str(json, name)?)?),
        TypeKind::ObjectIdentifier | TypeKind::RelativeOid => {
            let components = json
                .as_array()
                .ok_or_else(|| anyhow!("expected an array of components for type `{name}'"))?
                .iter()
                .map(|c| c.as_u64().ok_or_else(|| anyhow!("invalid component `{c}'")))
                .collect::<Result<_>>()?;
            ValueData::ObjectId(components)
        }
        TypeKind::Enumerated | TypeKind::EnumeratedAsn => {
            let enumerator = expect_str(json, name)?;
            // Unknown names are kept so the checker can report them.
            let ordinal = node.enumerator(enumerator).map_or(-1, |e| e.value);
            ValueData::Enumerated {
                name: enumerator.to_string(),
                ordinal,
            }
        }
        kind if kind.is_character_string() => ValueData::Charstring(expect_str(json, name)?.to_string()),
        kind if kind.is_record_like() || kind.is_set_like() => {
            let object = expect_object(json, name)?;
            let mut fields = Vec::with_capacity(object.len());
            for (field, field_json) in object {
                let field_ty = store
                    .field_type(resolved, field)
                    .ok_or_else(|| anyhow!("type `{name}' has no field `{field}'"))?;
                fields.push(match field_json {
                    Json::Null => RecordField::omitted(field.as_str()),
                    _ => RecordField::present(field.as_str(), value(store, field_ty, field_json)?),
                });
            }
            ValueData::Record(fields)
        }
        kind if kind.is_union_like() => {
            let (alternative, inner) = single_entry(json, name)?;
            let alt_ty = store
                .field_type(resolved, alternative)
                .ok_or_else(|| anyhow!("type `{name}' has no alternative `{alternative}'"))?;
            return Ok(Value::union(kind, alternative.as_str(), value(store, alt_ty, inner)?));
        }
        kind if kind.is_list() => {
            let element_ty = store
                .element_type(resolved)
                .ok_or_else(|| anyhow!("type `{name}' has no element type"))?;
            let elements = json
                .as_array()
                .ok_or_else(|| anyhow!("expected an array for type `{name}'"))?
                .iter()
                .map(|element| value(store, element_ty, element))
                .collect::<Result<Vec<_>>>()?;
            ValueData::List(elements)
        }
        other => bail!("values of kind `{other}' cannot be written in a check document"),
    };
    Ok(Value::new(kind, data))
}

fn expect_str<'j>(json: &'j Json, ty: &str) -> Result<&'j str> {
    json.as_str()
        .ok_or_else(|| anyhow!("expected a string for type `{ty}'"))
}

fn expect_object<'j>(json: &'j Json, ty: &str) -> Result<&'j Map<String, Json>> {
    json.as_object()
        .ok_or_else(|| anyhow!("expected an object for type `{ty}'"))
}

fn single_entry<'j>(json: &'j Json, ty: &str) -> Result<(&'j String, &'j Json)> {
    let object = expect_object(json, ty)?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => bail!("a value of union type `{ty}' names exactly one alternative"),
    }
}

fn verdict(text: &str) -> Result<Verdict> {
    Ok(match text {
        "none" => Verdict::None,
        "pass" => Verdict::Pass,
        "inconc" => Verdict::Inconc,
        "fail" => Verdict::Fail,
        "error" => Verdict::Error,
        other => bail!("unknown verdict `{other}'"),
    })
}

fn bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(anyhow!("invalid bit `{other}' in \"{text}\"")),
        })
        .collect()
}

fn nibbles(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| anyhow!("invalid hex digit `{c}' in \"{text}\""))
        })
        .collect()
}

fn octets(text: &str) -> Result<Vec<u8>> {
    let digits = nibbles(text)?;
    if digits.len() % 2 != 0 {
        bail!("octetstring \"{text}\" has an odd number of hex digits");
    }
    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

// =============================================================================
// Templates
// =============================================================================

const MODIFIERS: &[&str] = &["ifpresent", "length", "nocase"];

/// Read a template of type `ty`.
pub fn template(store: &TypeStore, ty: TypeId, json: &Json) -> Result<Template> {
    let resolved = store.resolve_alias(ty)?;
    let kind = store.get(resolved).kind;
    let name = store.name(ty);

    match json {
        Json::String(s) if s == "?" => return Ok(Template::any()),
        Json::String(s) if s == "*" => return Ok(Template::any_or_omit()),
        Json::String(s) if s == "omit" => return Ok(Template::omit()),
        Json::Array(items) => return elements(store, resolved, kind, name, items),
        Json::Object(object) if !(kind.is_record_like() || kind.is_set_like() || kind.is_union_like())
            || object.keys().any(|k| is_form_key(k)) =>
        {
            return template_form(store, ty, resolved, kind, object);
        }
        _ => {}
    }

    // Structured shorthand: `{"x": 1}` is a record or union template of its
    // fields; anything else is a specific value.
    match json {
        Json::Object(object) => fields(store, resolved, kind, name, object),
        _ => Ok(Template::specific(value(store, ty, json)?)),
    }
}

fn is_form_key(key: &str) -> bool {
    matches!(
        key,
        "value"
            | "list"
            | "complement"
            | "range"
            | "pattern"
            | "decmatch"
            | "fields"
            | "elements"
            | "any"
            | "anyOrOmit"
            | "omit"
    ) || MODIFIERS.contains(&key)
}

fn template_form(
    store: &TypeStore,
    ty: TypeId,
    resolved: TypeId,
    kind: TypeKind,
    object: &Map<String, Json>,
) -> Result<Template> {
    let name = store.name(ty);
    let mut forms = object.iter().filter(|(k, _)| !MODIFIERS.contains(&k.as_str()));
    let (form, body) = match (forms.next(), forms.next()) {
        (Some(entry), None) => entry,
        (None, _) => bail!("template for type `{name}' has modifiers but no matching mechanism"),
        (Some(_), Some(_)) => bail!("template for type `{name}' names more than one matching mechanism"),
    };

    let mut result = match form.as_str() {
        "value" => Template::specific(value(store, ty, body)?),
        "any" => Template::any(),
        "anyOrOmit" => Template::any_or_omit(),
        "omit" => Template::omit(),
        "list" => Template::value_list(template_items(store, ty, body)?),
        "complement" => Template::complemented_list(template_items(store, ty, body)?),
        "range" => {
            let range: RangeDecl =
                serde_json::from_value(body.clone()).context("invalid value range")?;
            let bound = |bound: &Option<Json>, exclusive: bool| -> Result<Option<RangeBound>> {
                let Some(bound) = bound else {
                    return Ok(None);
                };
                let value = value(store, ty, bound)?;
                Ok(Some(if exclusive {
                    RangeBound::exclusive(value)
                } else {
                    RangeBound::inclusive(value)
                }))
            };
            Template::range(
                bound(&range.min, range.min_exclusive)?,
                bound(&range.max, range.max_exclusive)?,
            )?
        }
        "pattern" => {
            let text = body
                .as_str()
                .ok_or_else(|| anyhow!("a pattern is written as a string"))?;
            let nocase = object.get("nocase").and_then(Json::as_bool).unwrap_or(false);
            Template::pattern(WildcardPatternCompiler.compile(text, nocase)?)
        }
        "decmatch" => {
            let target_name = body
                .get("type")
                .and_then(Json::as_str)
                .ok_or_else(|| anyhow!("decmatch needs the `type' to decode into"))?;
            let target_ty = lookup_type(store, target_name)?;
            let inner = body
                .get("template")
                .ok_or_else(|| anyhow!("decmatch needs a `template' for the decoded value"))?;
            let target = DecodeTarget::new(target_name, store.resolved_kind(target_ty).0);
            Template::decode_match(target, template(store, target_ty, inner)?)
        }
        "fields" => fields(store, resolved, kind, name, expect_object(body, name)?)?,
        "elements" => {
            let items = body
                .as_array()
                .ok_or_else(|| anyhow!("`elements' is written as an array"))?;
            elements(store, resolved, kind, name, items)?
        }
        other => bail!("unknown matching mechanism `{other}'"),
    };

    if let Some(if_present) = object.get("ifpresent") {
        result = result.with_if_present(if_present.as_bool().unwrap_or(false));
    }
    if let Some(length) = object.get("length") {
        result = result.with_length(length_restriction(length)?);
    }
    Ok(result)
}

fn template_items(store: &TypeStore, ty: TypeId, body: &Json) -> Result<Vec<Template>> {
    body.as_array()
        .ok_or_else(|| anyhow!("a template list is written as an array"))?
        .iter()
        .map(|item| template(store, ty, item))
        .collect()
}

fn length_restriction(json: &Json) -> Result<LengthRestriction> {
    if let Some(n) = json.as_u64() {
        return Ok(LengthRestriction::Single(n as usize));
    }
    let decl: LengthDecl = serde_json::from_value(json.clone())
        .context("a length restriction is a number or {\"min\": .., \"max\": ..}")?;
    Ok(LengthRestriction::Range {
        min: decl.min,
        max: decl.max,
    })
}

fn fields(
    store: &TypeStore,
    resolved: TypeId,
    kind: TypeKind,
    name: &str,
    object: &Map<String, Json>,
) -> Result<Template> {
    if kind.is_union_like() {
        let mut entries = object.iter();
        let (Some((alternative, body)), None) = (entries.next(), entries.next()) else {
            bail!("a union template for type `{name}' names exactly one alternative");
        };
        let alt_ty = store
            .field_type(resolved, alternative)
            .ok_or_else(|| anyhow!("type `{name}' has no alternative `{alternative}'"))?;
        return Ok(Template::union(kind, alternative.as_str(), template(store, alt_ty, body)?));
    }

    let mut result = Vec::with_capacity(object.len());
    for (field, body) in object {
        let field_ty = store
            .field_type(resolved, field)
            .ok_or_else(|| anyhow!("type `{name}' has no field `{field}'"))?;
        result.push(FieldTemplate::new(field.as_str(), template(store, field_ty, body)?));
    }
    Ok(Template::record(kind, result))
}

fn elements(
    store: &TypeStore,
    resolved: TypeId,
    kind: TypeKind,
    name: &str,
    items: &[Json],
) -> Result<Template> {
    let element_ty = store
        .element_type(resolved)
        .ok_or_else(|| anyhow!("type `{name}' is not a list type"))?;
    let items = items
        .iter()
        .map(|item| template(store, element_ty, item))
        .collect::<Result<Vec<_>>>()?;
    Ok(Template::elements(kind, items))
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod document_tests;
