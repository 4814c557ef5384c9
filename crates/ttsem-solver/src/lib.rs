//! Type store and compatibility resolution for ttsem.
//!
//! This crate owns the declaration arena ([`TypeStore`]) and answers the
//! question "may a value of type B be used where type A is expected?":
//!
//! - [`kind_rules`]: the asymmetric kind-level table.
//! - [`restriction`]: subtype constraints and their intersection.
//! - [`compat`]: the staged resolver with per-pass memoization.

pub mod compat;
pub mod kind_rules;
pub mod recursion;
pub mod relation_cache;
pub mod restriction;
pub mod types;

mod query_trace;

pub use compat::{CompatChecker, CompatOptions, CompatibilityLevel, TypeCompatibilityInfo};
pub use kind_rules::is_compatible_kind;
pub use recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
pub use relation_cache::{RelationCache, RelationCacheStats};
pub use restriction::{
    ConstraintValue, LengthRange, LengthRanges, Limit, RangeConstraint, SubtypeConstraint, intersects,
};
pub use types::{
    Enumerator, FieldInfo, ParamDirection, ResolveError, SignatureParameter, TypeId, TypeNode, TypeRef,
    TypeStore,
};
