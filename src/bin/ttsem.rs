#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use ttsem::cli::args::{CliArgs, OutputFormat};
use ttsem::cli::reporter::Reporter;
use ttsem::cli::{config, driver, resolve_options};

const EXIT_SUCCESS: i32 = 0;
/// Error diagnostics were reported or a match did not give the expected outcome.
const EXIT_CHECKS_FAILED: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if TTSEM_LOG or RUST_LOG is set (zero cost otherwise).
    // Supports TTSEM_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    ttsem::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let document = config::load_document(&args.document)?;
    let options = resolve_options(&args, &document);
    let report = driver::run(&document, options)
        .with_context(|| format!("failed to run {}", args.document.display()))?;

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let pretty = args
                .pretty
                .unwrap_or_else(|| std::io::stdout().is_terminal());
            println!("{}", Reporter::new(pretty).render(&report));
        }
    }

    if !report.is_success() {
        eprintln!(
            "{} error(s), {} failed match(es)",
            report.error_count(),
            report.failed_matches()
        );
        std::process::exit(EXIT_CHECKS_FAILED);
    }
    std::process::exit(EXIT_SUCCESS);
}
