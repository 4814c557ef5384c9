//! Type declarations and the arena that owns them.
//!
//! A [`TypeNode`] is created once per declaration and never mutated
//! afterwards; re-analysis of a changed declaration inserts a new node under
//! the same name. Component types (fields, elements, alias targets) are
//! referenced through [`TypeRef`], which may name a type that is declared
//! later or that refers back to the declaring type. Names are resolved lazily
//! through the store's name index.

use crate::restriction::SubtypeConstraint;
use indexmap::IndexMap;
use std::fmt;
use ttsem_common::limits::MAX_ALIAS_CHAIN;
use ttsem_common::{CheckStamp, Dialect, Location, TypeKind};

// =============================================================================
// Identifiers
// =============================================================================

/// Index of a [`TypeNode`] inside a [`TypeStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Reference from one declaration to another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Id(TypeId),
    /// Resolved on demand; may be a forward or circular reference.
    Name(String),
}

impl From<TypeId> for TypeRef {
    fn from(id: TypeId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

// =============================================================================
// Declaration parts
// =============================================================================

/// Field of a record/set, or alternative of a union.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeRef,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamDirection {
    In,
    Out,
    InOut,
}

impl ParamDirection {
    /// Whether a value flows back to the caller through this parameter.
    #[inline]
    pub const fn is_outgoing(self) -> bool {
        matches!(self, Self::Out | Self::InOut)
    }

    /// Whether a value flows from the caller through this parameter.
    #[inline]
    pub const fn is_incoming(self) -> bool {
        matches!(self, Self::In | Self::InOut)
    }
}

impl fmt::Display for ParamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
            Self::InOut => "inout",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SignatureParameter {
    pub name: String,
    pub ty: TypeRef,
    pub direction: ParamDirection,
}

// =============================================================================
// TypeNode
// =============================================================================

/// One type declaration.
#[derive(Clone, Debug)]
pub struct TypeNode {
    pub name: String,
    pub kind: TypeKind,
    pub dialect: Dialect,
    /// Record/set fields or union alternatives, in declaration order.
    pub fields: Vec<FieldInfo>,
    /// Element type of `record of`, `set of` and arrays.
    pub element: Option<TypeRef>,
    /// Number of elements of an array type.
    pub dimension: Option<usize>,
    pub enumerators: Vec<Enumerator>,
    pub parameters: Vec<SignatureParameter>,
    pub subtype: Option<SubtypeConstraint>,
    /// Aliased type of a `Referenced` declaration.
    pub target: Option<TypeRef>,
    /// Builtin types are pre-registered and never checked.
    pub builtin: bool,
    /// Where declaration diagnostics are attached.
    pub location: Location,
    pub stamp: CheckStamp,
}

impl TypeNode {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        Self {
            location: Location::file(name.clone()),
            name,
            kind,
            dialect: Dialect::Ttcn3,
            fields: Vec::new(),
            element: None,
            dimension: None,
            enumerators: Vec::new(),
            parameters: Vec::new(),
            subtype: None,
            target: None,
            builtin: false,
            stamp: CheckStamp::new(),
        }
    }

    /// Named alias of `target`, optionally narrowed by its own subtype.
    pub fn alias(name: impl Into<String>, target: impl Into<TypeRef>) -> Self {
        let mut node = Self::new(name, TypeKind::Referenced);
        node.target = Some(target.into());
        node
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, ty: impl Into<TypeRef>, optional: bool) -> Self {
        self.fields.push(FieldInfo {
            name: name.into(),
            ty: ty.into(),
            optional,
        });
        self
    }

    #[must_use]
    pub fn with_element(mut self, ty: impl Into<TypeRef>) -> Self {
        self.element = Some(ty.into());
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    #[must_use]
    pub fn with_enumerator(mut self, name: impl Into<String>, value: i64) -> Self {
        self.enumerators.push(Enumerator {
            name: name.into(),
            value,
        });
        self
    }

    #[must_use]
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
        direction: ParamDirection,
    ) -> Self {
        self.parameters.push(SignatureParameter {
            name: name.into(),
            ty: ty.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: SubtypeConstraint) -> Self {
        self.subtype = Some(subtype);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn parameter(&self, name: &str) -> Option<&SignatureParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn enumerator(&self, name: &str) -> Option<&Enumerator> {
        self.enumerators.iter().find(|e| e.name == name)
    }

    #[inline]
    pub fn is_erroneous(&self) -> bool {
        self.stamp.is_erroneous()
    }
}

// =============================================================================
// Alias resolution errors
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// A name that no declaration carries.
    Unresolved(String),
    /// Alias chain that leads back to itself; holds the names in order.
    Circular(Vec<String>),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(name) => write!(f, "unresolved type reference `{name}'"),
            Self::Circular(chain) => write!(f, "circular type reference chain: {}", chain.join(" -> ")),
        }
    }
}

impl std::error::Error for ResolveError {}

// =============================================================================
// TypeStore
// =============================================================================

/// Builtin kinds registered under their keyword on store creation.
const BUILTIN_KINDS: &[(TypeKind, Dialect)] = &[
    (TypeKind::Null, Dialect::Asn1),
    (TypeKind::Boolean, Dialect::Ttcn3),
    (TypeKind::Integer, Dialect::Ttcn3),
    (TypeKind::IntegerAsn, Dialect::Asn1),
    (TypeKind::Real, Dialect::Ttcn3),
    (TypeKind::Bitstring, Dialect::Ttcn3),
    (TypeKind::BitstringAsn, Dialect::Asn1),
    (TypeKind::Hexstring, Dialect::Ttcn3),
    (TypeKind::Octetstring, Dialect::Ttcn3),
    (TypeKind::Charstring, Dialect::Ttcn3),
    (TypeKind::UniversalCharstring, Dialect::Ttcn3),
    (TypeKind::Utf8String, Dialect::Asn1),
    (TypeKind::NumericString, Dialect::Asn1),
    (TypeKind::PrintableString, Dialect::Asn1),
    (TypeKind::TeletexString, Dialect::Asn1),
    (TypeKind::VideotexString, Dialect::Asn1),
    (TypeKind::Ia5String, Dialect::Asn1),
    (TypeKind::GraphicString, Dialect::Asn1),
    (TypeKind::VisibleString, Dialect::Asn1),
    (TypeKind::GeneralString, Dialect::Asn1),
    (TypeKind::UniversalString, Dialect::Asn1),
    (TypeKind::BmpString, Dialect::Asn1),
    (TypeKind::UtcTime, Dialect::Asn1),
    (TypeKind::GeneralizedTime, Dialect::Asn1),
    (TypeKind::ObjectDescriptor, Dialect::Asn1),
    (TypeKind::ObjectIdentifier, Dialect::Ttcn3),
    (TypeKind::RelativeOid, Dialect::Asn1),
    (TypeKind::Verdict, Dialect::Ttcn3),
    (TypeKind::Default, Dialect::Ttcn3),
    (TypeKind::Any, Dialect::Asn1),
];

/// Arena of type declarations with a name index.
#[derive(Clone, Debug)]
pub struct TypeStore {
    nodes: Vec<TypeNode>,
    by_name: IndexMap<String, TypeId>,
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeStore {
    /// Create a store with every builtin type registered under its keyword.
    pub fn new() -> Self {
        let mut store = Self {
            nodes: Vec::with_capacity(BUILTIN_KINDS.len() + 32),
            by_name: IndexMap::new(),
        };
        for &(kind, dialect) in BUILTIN_KINDS {
            let mut node = TypeNode::new(kind.display_name(), kind).with_dialect(dialect);
            node.builtin = true;
            store.insert(node);
        }
        store
    }

    /// Register a declaration. A later declaration with the same name
    /// shadows the earlier one for name lookups.
    pub fn insert(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.by_name.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    pub fn try_get(&self, id: TypeId) -> Option<&TypeNode> {
        self.nodes.get(id.index())
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// The builtin declaration for `kind`, if the kind has one.
    pub fn builtin(&self, kind: TypeKind) -> Option<TypeId> {
        self.lookup(kind.display_name())
            .filter(|id| self.get(*id).builtin)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// User declarations in registration order (builtins excluded).
    pub fn declarations(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.by_name
            .values()
            .copied()
            .filter(|id| !self.get(*id).builtin)
    }

    pub fn name(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    pub fn resolve_ref(&self, reference: &TypeRef) -> Result<TypeId, ResolveError> {
        match reference {
            TypeRef::Id(id) if id.index() < self.nodes.len() => Ok(*id),
            TypeRef::Id(id) => Err(ResolveError::Unresolved(id.to_string())),
            TypeRef::Name(name) => self
                .lookup(name)
                .ok_or_else(|| ResolveError::Unresolved(name.clone())),
        }
    }

    /// Follow `Referenced` aliases down to a concrete declaration.
    pub fn resolve_alias(&self, id: TypeId) -> Result<TypeId, ResolveError> {
        let mut current = id;
        let mut chain: Vec<TypeId> = Vec::new();
        loop {
            let node = self.get(current);
            if node.kind != TypeKind::Referenced {
                return Ok(current);
            }
            if chain.contains(&current) || chain.len() as u32 >= MAX_ALIAS_CHAIN {
                chain.push(current);
                return Err(ResolveError::Circular(
                    chain.iter().map(|id| self.name(*id).to_string()).collect(),
                ));
            }
            chain.push(current);
            let Some(target) = node.target.as_ref() else {
                return Err(ResolveError::Unresolved(node.name.clone()));
            };
            current = self.resolve_ref(target)?;
        }
    }

    /// Resolved kind and dialect, or `Undefined` if the alias chain is broken.
    pub fn resolved_kind(&self, id: TypeId) -> (TypeKind, Dialect) {
        match self.resolve_alias(id) {
            Ok(last) => {
                let node = self.get(last);
                (node.kind, node.dialect)
            }
            Err(_) => (TypeKind::Undefined, Dialect::Ttcn3),
        }
    }

    /// The constraint in force for `id`: its own, or the nearest one along
    /// the alias chain.
    pub fn effective_subtype(&self, id: TypeId) -> Option<&SubtypeConstraint> {
        let mut current = id;
        for _ in 0..MAX_ALIAS_CHAIN {
            let node = self.get(current);
            if let Some(subtype) = node.subtype.as_ref() {
                return Some(subtype);
            }
            if node.kind != TypeKind::Referenced {
                return None;
            }
            current = self.resolve_ref(node.target.as_ref()?).ok()?;
        }
        None
    }

    /// Whether `id` or anything on its alias chain has been marked erroneous.
    pub fn is_erroneous(&self, id: TypeId) -> bool {
        let mut current = id;
        for _ in 0..MAX_ALIAS_CHAIN {
            let node = self.get(current);
            if node.is_erroneous() {
                return true;
            }
            if node.kind != TypeKind::Referenced {
                return false;
            }
            match node.target.as_ref().map(|t| self.resolve_ref(t)) {
                Some(Ok(next)) => current = next,
                _ => return false,
            }
        }
        false
    }

    /// Element type of a list kind, resolved.
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        let last = self.resolve_alias(id).ok()?;
        self.resolve_ref(self.get(last).element.as_ref()?).ok()
    }

    /// Type of a named field or alternative, resolved.
    pub fn field_type(&self, id: TypeId, field: &str) -> Option<TypeId> {
        let last = self.resolve_alias(id).ok()?;
        self.resolve_ref(&self.get(last).field(field)?.ty).ok()
    }
}

#[cfg(test)]
#[path = "../tests/type_store_tests.rs"]
mod type_store_tests;
