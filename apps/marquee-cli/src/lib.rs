//! # Marquee CLI
//!
//! A thin caller around `marquee-core`: reads carts as JSON, prints quotes as
//! JSON. All pricing happens in the core crate.
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Load configuration (file, environment)
//! 3. Initialize tracing (stderr)
//! 4. Apply command-line overrides
//! 5. Read input, price, write output

pub mod cli;
pub mod config;
pub mod error;
pub mod quote;

use std::io::Write;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::MarqueeConfig;
use crate::error::{CliError, CliResult};
use crate::quote::{build_quote, price_line, raw_lines, read_input};

/// Runs one command against an already-loaded configuration, writing JSON
/// to stdout.
pub fn run(cli: &Cli, config: &MarqueeConfig) -> CliResult<()> {
    let stdout = std::io::stdout();
    run_with(cli, config, &mut stdout.lock())
}

/// Runs one command, writing JSON to `out`.
pub fn run_with<W: Write>(cli: &Cli, config: &MarqueeConfig, out: &mut W) -> CliResult<()> {
    match &cli.command {
        Command::Quote { input } => {
            let value = read_input(input.as_deref())?;
            let raw = raw_lines(&value)?;
            let quote = build_quote(&raw, &config.pricing)?;
            write_json(out, &quote, config.output.pretty)
        }
        Command::Line { input } => {
            let value = read_input(input.as_deref())?;
            if !value.is_object() {
                return Err(CliError::InvalidInput(
                    "expected a single line item object".to_string(),
                ));
            }
            let raw = marquee_core::RawLineItem::from_value(&value);
            let line = price_line(&raw, &config.pricing)?;
            write_json(out, &line, config.output.pretty)
        }
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over the configured directive.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
