//! Structured query tracing for compatibility queries.
//!
//! Events use target `ttsem::query_json` and are intended to be consumed with:
//! `TTSEM_LOG=ttsem::query_json=trace TTSEM_LOG_FORMAT=json`.
//!
//! Environment:
//! - `TTSEM_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "ttsem::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("TTSEM_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

#[inline]
pub(crate) fn relation_start(query_id: u64, op: &'static str, expected: TypeId, actual: TypeId, strict: bool) {
    trace!(
        target: "ttsem::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        expected_type_id = expected.0,
        actual_type_id = actual.0,
        strict_structural = strict
    );
}

#[inline]
pub(crate) fn relation_end(query_id: u64, op: &'static str, result: &'static str, cache_hit: bool) {
    trace!(
        target: "ttsem::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        result,
        cache_hit
    );
}
