//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --policy per-line-sum --strict --pretty                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     MARQUEE_TOTAL_POLICY=per-line-sum                                  │
//! │     MARQUEE_STRICT=true                                                │
//! │     MARQUEE_PRETTY=true                                                │
//! │     MARQUEE_LOG_LEVEL=debug                                            │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/marquee/marquee.toml (Linux)                             │
//! │     ~/Library/Application Support/com.marquee.marquee/marquee.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     order-wide-flag, lenient, compact JSON, info                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # marquee.toml
//! [pricing]
//! total_policy = "order-wide-flag"  # order-wide-flag | per-line-sum
//! strict = false
//!
//! [output]
//! pretty = true
//!
//! [log]
//! level = "info"
//! ```

use std::path::PathBuf;

use marquee_core::TotalPolicy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::error::{CliError, CliResult};

/// Pricing behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    #[serde(default)]
    pub total_policy: TotalPolicy,

    /// Validate input instead of defaulting bad fields to zero.
    #[serde(default)]
    pub strict: bool,
}

/// Output formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub pretty: bool,
}

/// Logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Default log directive.
pub fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            level: default_log_level(),
        }
    }
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarqueeConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl MarqueeConfig {
    /// Loads configuration with the following priority:
    /// 1. Environment variables (highest)
    /// 2. Config file (marquee.toml)
    /// 3. Default values (lowest)
    ///
    /// Command-line flags are layered on afterwards with [`Self::apply_cli`].
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else if explicit {
                return Err(CliError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; absent sections take their defaults.
    pub fn from_toml_str(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        if self.log.level.trim().is_empty() {
            return Err(CliError::Config("log.level must not be empty".into()));
        }

        Ok(())
    }

    /// Applies `MARQUEE_*` overrides read through `lookup`.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(policy) = lookup("MARQUEE_TOTAL_POLICY") {
            match policy.parse() {
                Ok(parsed) => {
                    debug!(policy = %policy, "Overriding total policy from environment");
                    self.pricing.total_policy = parsed;
                }
                Err(_) => warn!(policy = %policy, "Unknown total policy in environment"),
            }
        }

        if let Some(strict) = lookup("MARQUEE_STRICT") {
            match parse_flag(&strict) {
                Some(flag) => self.pricing.strict = flag,
                None => warn!(value = %strict, "Invalid MARQUEE_STRICT"),
            }
        }

        if let Some(pretty) = lookup("MARQUEE_PRETTY") {
            match parse_flag(&pretty) {
                Some(flag) => self.output.pretty = flag,
                None => warn!(value = %pretty, "Invalid MARQUEE_PRETTY"),
            }
        }

        if let Some(level) = lookup("MARQUEE_LOG_LEVEL") {
            self.log.level = level;
        }
    }

    /// Applies command-line flags. Boolean flags can only switch a setting on.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(policy) = cli.policy {
            self.pricing.total_policy = policy;
        }
        self.pricing.strict |= cli.strict;
        self.output.pretty |= cli.pretty;
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "marquee", "marquee")
            .map(|dirs| dirs.config_dir().join("marquee.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = MarqueeConfig::default();
        assert_eq!(config.pricing.total_policy, TotalPolicy::OrderWideFlag);
        assert!(!config.pricing.strict);
        assert!(!config.output.pretty);
        assert_eq!(config.log.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = MarqueeConfig::from_toml_str(
            r#"
            [pricing]
            total_policy = "per-line-sum"
            strict = true

            [output]
            pretty = true
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.total_policy, TotalPolicy::PerLineSum);
        assert!(config.pricing.strict);
        assert!(config.output.pretty);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(MarqueeConfig::from_toml_str("").unwrap(), MarqueeConfig::default());
    }

    #[test]
    fn test_bad_toml_policy_is_config_error() {
        let err = MarqueeConfig::from_toml_str("[pricing]\ntotal_policy = \"sometimes\"").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = MarqueeConfig::default();
        config.apply_env_overrides(env(&[
            ("MARQUEE_TOTAL_POLICY", "per_line_sum"),
            ("MARQUEE_STRICT", "yes"),
            ("MARQUEE_PRETTY", "1"),
            ("MARQUEE_LOG_LEVEL", "debug"),
        ]));

        assert_eq!(config.pricing.total_policy, TotalPolicy::PerLineSum);
        assert!(config.pricing.strict);
        assert!(config.output.pretty);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = MarqueeConfig::default();
        config.apply_env_overrides(env(&[
            ("MARQUEE_TOTAL_POLICY", "sometimes"),
            ("MARQUEE_STRICT", "maybe"),
        ]));
        assert_eq!(config, MarqueeConfig::default());
    }

    #[test]
    fn test_cli_flags_win() {
        let mut config = MarqueeConfig::from_toml_str("[pricing]\ntotal_policy = \"per-line-sum\"").unwrap();
        let cli = Cli::try_parse_from(["marquee", "quote", "--policy", "order-wide-flag", "--pretty"]).unwrap();
        config.apply_cli(&cli);

        assert_eq!(config.pricing.total_policy, TotalPolicy::OrderWideFlag);
        assert!(config.output.pretty);
        assert!(!config.pricing.strict);
    }

    #[test]
    fn test_empty_log_level_rejected() {
        let mut config = MarqueeConfig::default();
        config.log.level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join(format!("marquee-missing-{}.toml", uuid::Uuid::new_v4()));
        assert!(matches!(MarqueeConfig::load(Some(path)), Err(CliError::Config(_))));
    }
}
