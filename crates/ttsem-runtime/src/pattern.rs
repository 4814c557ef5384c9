//! String pattern capability.
//!
//! The matching engine only sees [`CompiledPattern::matches`]. The default
//! [`WildcardPatternCompiler`] understands the TTCN-3 wildcards `?` (one
//! character) and `*` (any run of characters) plus bracketed sets, which is
//! enough for the driver; hosts with a full pattern engine plug in their own
//! compiler.

use globset::GlobBuilder;
use std::fmt;
use std::sync::Arc;

pub trait CompiledPattern: fmt::Debug + Send + Sync {
    fn matches(&self, value: &str) -> bool;
    /// Pattern text as written.
    fn source(&self) -> &str;
    fn is_case_insensitive(&self) -> bool;
}

pub trait PatternCompiler {
    fn compile(&self, text: &str, case_insensitive: bool) -> Result<Arc<dyn CompiledPattern>, PatternError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pattern \"{}\": {}", self.pattern, self.message)
    }
}

impl std::error::Error for PatternError {}

#[derive(Clone, Copy, Debug, Default)]
pub struct WildcardPatternCompiler;

impl PatternCompiler for WildcardPatternCompiler {
    fn compile(&self, text: &str, case_insensitive: bool) -> Result<Arc<dyn CompiledPattern>, PatternError> {
        // '*' must cross '/' since the operand is text, not a path.
        let glob = GlobBuilder::new(text)
            .case_insensitive(case_insensitive)
            .literal_separator(false)
            .backslash_escape(true)
            .build()
            .map_err(|err| PatternError {
                pattern: text.to_string(),
                message: err.kind().to_string(),
            })?;
        Ok(Arc::new(WildcardPattern {
            source: text.to_string(),
            case_insensitive,
            matcher: glob.compile_matcher(),
        }))
    }
}

#[derive(Debug)]
struct WildcardPattern {
    source: String,
    case_insensitive: bool,
    matcher: globset::GlobMatcher,
}

impl CompiledPattern for WildcardPattern {
    fn matches(&self, value: &str) -> bool {
        self.matcher.is_match(value)
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }
}

#[cfg(test)]
#[path = "../tests/pattern_tests.rs"]
mod pattern_tests;
