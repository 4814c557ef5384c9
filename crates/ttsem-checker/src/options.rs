//! Checker configuration.

use std::fmt;
use std::str::FromStr;
use ttsem_solver::CompatOptions;

/// How a compatible-but-converting assignment is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    Ignore,
    #[default]
    Warning,
    Error,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ignore => "ignore",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSeverityError(pub String);

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown severity `{}' (expected ignore, warning or error)",
            self.0
        )
    }
}

impl std::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" | "off" => Ok(Self::Ignore),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Switches that change what the checker accepts or how loudly it says so.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Compare structured types member by member instead of by declaration.
    pub strict_structural: bool,
    /// Severity of the "Type compatibility between ..." diagnostic.
    pub type_compatibility: Severity,
    /// Pre-2017 omit semantics for value lists and complemented lists.
    pub legacy_matching: bool,
}

impl CheckerOptions {
    pub fn compat_options(&self) -> CompatOptions {
        CompatOptions {
            strict_structural: self.strict_structural,
        }
    }
}
