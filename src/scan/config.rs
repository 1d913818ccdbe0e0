//! Scan configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const CONFIG_FILE: &str = "packtrace.toml";

/// Configuration for package scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Content hashes always omitted from verification codes, e.g. the
    /// hash of a previously generated provenance document
    #[serde(default)]
    pub excluded_hashes: Vec<String>,

    /// Category tag used for generated package identifiers
    #[serde(default = "default_category")]
    pub identifier_category: String,
}

fn default_category() -> String {
    "Package".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excluded_hashes: Vec::new(),
            identifier_category: default_category(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from `packtrace.toml` in the given directory,
    /// or return defaults when no file exists.
    pub fn load_or_default(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: ScanConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `packtrace.toml` in the given directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let config_path = dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// The excluded hashes as a set, for the fingerprinting core.
    pub fn excluded_set(&self) -> HashSet<String> {
        self.excluded_hashes.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert!(config.excluded_hashes.is_empty());
        assert_eq!(config.identifier_category, "Package");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ScanConfig::load_or_default(dir.path()).unwrap();
        assert!(config.excluded_hashes.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = ScanConfig::default();
        config.excluded_hashes.push("abc123".to_string());
        config.identifier_category = "Component".to_string();
        config.save(dir.path()).unwrap();

        let reloaded = ScanConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(reloaded.excluded_hashes, vec!["abc123".to_string()]);
        assert_eq!(reloaded.identifier_category, "Component");
    }
}
