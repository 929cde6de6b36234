//! Configuration loading from hackstats.toml
//!
//! Hackstats configuration can be specified in a `hackstats.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use hackstats_stats::{DEFAULT_CONFIDENCE_LEVEL, Tail};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up by [`HackConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "hackstats.toml";

/// Hackstats configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HackConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for scenario execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Trials per simulation; each scenario has its own default when unset
    #[serde(default)]
    pub iterations: Option<usize>,
    /// Seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// Spread trials over the Rayon pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Rayon pool size (all cores when unset)
    #[serde(default)]
    pub threads: Option<usize>,
    /// Tail override for every p-value; each scenario has its own default when unset
    #[serde(default)]
    pub tail: Option<Tail>,
    /// Confidence level for percentile intervals (e.g., 0.95 for 95%)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            iterations: None,
            seed: None,
            parallel: default_parallel(),
            threads: None,
            tail: None,
            confidence_level: default_confidence_level(),
        }
    }
}

fn default_parallel() -> bool {
    true
}
fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write the report here instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl HackConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable configuration");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Hackstats Configuration

[runner]
# Trials per simulation (uncomment to override every scenario's default)
# iterations = 10000
# Seed for reproducible runs (uncomment to enable)
# seed = 42
# Spread trials over all cores
parallel = true
# Worker threads (uncomment to limit)
# threads = 4
# Tail for every p-value: "greater", "greater-equal", "less", "less-equal"
# tail = "greater"
# Confidence level for percentile intervals (0.0 to 1.0)
confidence_level = 0.95

[output]
# Default output format: human, json, csv
format = "human"
# Report file (uncomment to write there instead of stdout)
# path = "target/hackstats/report.json"
"#
        .to_string()
    }
}
