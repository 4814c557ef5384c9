//! Tracing configuration for debugging checks and matches.
//!
//! Supports three output formats controlled by `TTSEM_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`, handy for
//!   following nested compatibility queries
//! - `json`: One JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Human-readable tree
//! TTSEM_LOG=debug TTSEM_LOG_FORMAT=tree ttsem checks.json
//!
//! # JSON, including the structured query trace
//! TTSEM_LOG=ttsem::query_json=trace TTSEM_LOG_FORMAT=json ttsem checks.json
//!
//! # Fine-grained filtering
//! TTSEM_LOG="ttsem::solver=trace,ttsem::checker=debug" ttsem checks.json
//! ```
//!
//! The subscriber is only initialised when `TTSEM_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal runs.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    #[default]
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a `TTSEM_LOG_FORMAT` value; unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("TTSEM_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `TTSEM_LOG`, falling back to `RUST_LOG`.
///
/// `TTSEM_LOG` takes precedence when both are set. Values use the same
/// syntax as `RUST_LOG` (e.g. `debug`, `ttsem::solver=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TTSEM_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TTSEM_LOG` nor `RUST_LOG` is set. All output
/// goes to stderr so it never mixes with the report on stdout.
pub fn init_tracing() {
    let has_ttsem_log = std::env::var("TTSEM_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_ttsem_log && !has_rust_log {
        return;
    }

    let filter = build_filter();

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
