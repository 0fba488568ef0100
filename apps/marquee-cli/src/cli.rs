//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marquee_core::TotalPolicy;

/// Price box office carts from JSON.
#[derive(Debug, Parser)]
#[command(name = "marquee", version, about)]
pub struct Cli {
    /// Config file (default: platform config dir / marquee.toml)
    #[arg(long, global = true, env = "MARQUEE_CONFIG")]
    pub config: Option<PathBuf>,

    /// How the order total is derived: order-wide-flag | per-line-sum
    #[arg(long, global = true)]
    pub policy: Option<TotalPolicy>,

    /// Reject carts with missing, malformed or out-of-range fields
    #[arg(long, global = true)]
    pub strict: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a whole cart: a JSON array of line items, or {"items": [...]}
    Quote {
        /// Input file; stdin when omitted or "-"
        input: Option<PathBuf>,
    },
    /// Price a single line item
    Line {
        /// Input file; stdin when omitted or "-"
        input: Option<PathBuf>,
    },
}
