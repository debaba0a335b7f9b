//! Configuration management: a small TOML file controlling data locations,
//! the consume policy, and logging.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::inventory::ConsumePolicy;

/// Top-level configuration for the hideout service core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HideoutConfig {
    /// Where the profile store lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Where template seed JSON files live.
    #[serde(default = "default_seeds_dir")]
    pub seeds_dir: String,
    /// How multi-item consumption treats partial failure. `atomic` verifies
    /// first and consumes nothing on shortfall; `legacy` reproduces the
    /// historical attempt-all, no-rollback behavior.
    #[serde(default)]
    pub consume_policy: ConsumePolicy,
    /// Default log filter when RUST_LOG is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> String {
    "data/profiles".to_string()
}

fn default_seeds_dir() -> String {
    "data/seeds".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HideoutConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            seeds_dir: default_seeds_dir(),
            consume_policy: ConsumePolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl HideoutConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Write a default configuration file, refusing to clobber an existing one.
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            anyhow::bail!("config already exists: {}", path.display());
        }
        let config = Self::default();
        let contents = toml::to_string_pretty(&config)?;
        std::fs::write(path, contents)
            .with_context(|| format!("writing config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_atomic() {
        let config = HideoutConfig::default();
        assert_eq!(config.consume_policy, ConsumePolicy::Atomic);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn load_roundtrip_and_partial_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hideout.toml");

        let written = HideoutConfig::create_default(&path).expect("create");
        let loaded = HideoutConfig::load(&path).expect("load");
        assert_eq!(written, loaded);

        // A second create must refuse to clobber.
        assert!(HideoutConfig::create_default(&path).is_err());

        // Partial files fill in defaults.
        let partial = dir.path().join("partial.toml");
        std::fs::write(&partial, "consume_policy = \"legacy\"\n").expect("write");
        let loaded = HideoutConfig::load(&partial).expect("load partial");
        assert_eq!(loaded.consume_policy, ConsumePolicy::Legacy);
        assert_eq!(loaded.data_dir, "data/profiles");
    }
}
