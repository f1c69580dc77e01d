//! Scan configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling which files are scanned and how hooks are exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Literal path fragments; a file whose path contains one is skipped
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Extension of the files to scan
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Drop hooks whose summary points at documentation elsewhere
    #[serde(default = "default_true")]
    pub ignore_reused_hooks: bool,

    /// Export paths relative to the input directory
    #[serde(default = "default_true")]
    pub relative_paths: bool,
}

fn default_exclude() -> Vec<String> {
    vec!["/wp-content/".to_string()]
}

fn default_extension() -> String {
    "php".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            extension: default_extension(),
            ignore_reused_hooks: default_true(),
            relative_paths: default_true(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: ScanConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Load the given file, or return defaults when no file is given
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
