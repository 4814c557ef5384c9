//! Centralized limits and thresholds.
//!
//! Recursion limits for structural compatibility live in
//! `ttsem_solver::recursion::RecursionProfile`; the constants here cover the
//! checker and runtime sides.

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum nesting depth when checking a template against its type.
///
/// Templates mirror the structure of the value they describe, so a template
/// nested deeper than this is treated as erroneous rather than walked.
pub const MAX_TEMPLATE_CHECK_DEPTH: u32 = 256;

/// Maximum number of alias hops followed when resolving a referenced type.
///
/// Alias chains longer than this are reported as circular.
pub const MAX_ALIAS_CHAIN: u32 = 64;

/// Maximum nesting depth of a runtime match.
///
/// Runtime values are finite trees, so the limit only guards against
/// pathological templates built by hand.
pub const MAX_MATCH_DEPTH: u32 = 1024;
