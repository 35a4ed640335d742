//! CLI configuration loading and validation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete CLI configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AclConfig {
    #[serde(default)]
    pub rules: RulesSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RulesSection {
    #[serde(default = "default_rules_path")]
    pub path: PathBuf,
    /// Emit `{"data": ...}` when dumping
    #[serde(default)]
    pub wrap_output: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
            wrap_output: false,
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_rules_path() -> PathBuf { PathBuf::from("rules.json") }
fn default_log_level() -> String { "info".to_string() }

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AclConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read configuration file {}", path.as_ref().display())
        })?;
        let config: AclConfig = toml::from_str(&contents)
            .context("Failed to parse configuration file")?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.rules.path.as_os_str().is_empty() {
            anyhow::bail!("Rules path must not be empty");
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            anyhow::bail!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            );
        }

        Ok(())
    }
}
