//! # Marquee CLI Entry Point
//!
//! ```text
//! $ echo '[{"unitPrice":100,"quantity":2,"taxRate":18}]' | marquee quote --pretty
//! {
//!   "quoteId": "…",
//!   "computedAt": "…",
//!   "policy": "order-wide-flag",
//!   "lines": [ { "lineTotal": 200.0, "taxAmount": 36.0, … } ],
//!   "totals": { "subtotal": 200.0, "tax": 36.0, "total": 236.0, "totalDiscount": 0.0 },
//!   "coercions": []
//! }
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use marquee_cli::cli::Cli;
use marquee_cli::config::{default_log_level, MarqueeConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config decides the log level, so it loads before tracing exists
    let loaded = MarqueeConfig::load(cli.config.clone());
    let level = loaded
        .as_ref()
        .map(|config| config.log.level.clone())
        .unwrap_or_else(|_| default_log_level());
    marquee_cli::init_tracing(&level);

    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "Configuration rejected");
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli(&cli);

    info!(
        policy = %config.pricing.total_policy,
        strict = config.pricing.strict,
        "Configuration loaded"
    );

    match marquee_cli::run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Pricing failed");
            ExitCode::FAILURE
        }
    }
}
