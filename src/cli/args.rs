use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use ttsem_checker::Severity;

/// CLI arguments for the ttsem binary.
#[derive(Parser, Debug)]
#[command(
    name = "ttsem",
    version,
    about = "Type compatibility checks and template matching for TTCN-3 / ASN.1 check documents"
)]
pub struct CliArgs {
    /// Check document (JSON) to run.
    pub document: PathBuf,

    // ==================== Checker Options ====================
    /// Require structural equivalence between distinct structured declarations.
    #[arg(long = "strictStructural", alias = "strict-structural")]
    pub strict_structural: Option<bool>,

    /// How to report values accepted only through structural conversion.
    #[arg(long = "typeCompatibility", alias = "type-compatibility", value_enum, ignore_case = true)]
    pub type_compatibility: Option<SeverityArg>,

    /// Use the legacy matching rules for omitted fields and value lists.
    #[arg(long = "legacyMatching", alias = "legacy-matching")]
    pub legacy_matching: Option<bool>,

    // ==================== Output ====================
    /// Output format of the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable color in the text report. Defaults to on when stdout is a terminal.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Ignore,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Ignore => Severity::Ignore,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
