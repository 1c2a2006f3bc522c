use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use pdftext_core::{ExtractionResult, extract};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::Settings;

/// Extract page text from a PDF and print it as a JSON object.
///
/// Every outcome, argument errors included, is reported as one JSON line on
/// stdout with exit code 0 or 1, so clap's own help/version flags and its
/// exit code 2 are disabled.
#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// PDF file to read instead of standard input ("-" also means stdin)
    input: Option<PathBuf>,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let settings = Settings::resolve();
    init_tracing(settings.log_filter.as_deref());

    let result = match Cli::try_parse() {
        Ok(cli) => match read_input(cli.input.as_deref()) {
            Ok(bytes) => extract(&bytes, &settings.backend(), &settings.extract_options()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                ExtractionResult::failure(format!("{e:#}"))
            }
        },
        Err(e) => {
            tracing::warn!(kind = ?e.kind(), "rejected command line");
            ExtractionResult::failure(usage_error(&e))
        }
    };

    if let Err(e) = emit(&result) {
        eprintln!("pdftext: failed to write result: {e:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::from(result.exit_code())
}

/// Diagnostics go to stderr; stdout carries only the JSON payload.
/// `RUST_LOG` wins over the configured filter; with neither, logging is off.
fn init_tracing(configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("off")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// First line of clap's report, without its `error: ` prefix or usage block.
fn usage_error(e: &clap::Error) -> String {
    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).trim().to_string()
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        _ => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .lock()
                .read_to_end(&mut bytes)
                .context("failed to read standard input")?;
            Ok(bytes)
        }
    }
}

fn emit(result: &ExtractionResult) -> anyhow::Result<()> {
    let json = result.to_json().context("failed to serialize result")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}
