use std::path::{Path, PathBuf};

use anyhow::Context;
use cairn_types::{CommitRangeSpec, ModelError, RefName};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "cairn.toml";

/// Settings read from `cairn.toml`.
///
/// Ref names are validated while the file is parsed, so a bad configured
/// ref fails at load time rather than at first use.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Default bounds for `range` and `resolve`.
    pub range: RangeDefaults,
    /// Default output format.
    pub output: OutputFormat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeDefaults {
    /// Empty means the beginning of history.
    pub from: RefName,
    pub to: RefName,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self {
            from: RefName::default(),
            to: RefName::head(),
        }
    }
}

impl CliConfig {
    /// Load from `path`, or from `./cairn.toml` if present, or defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE}; using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse config text.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The configured default range.
    pub fn default_spec(&self) -> Result<CommitRangeSpec, ModelError> {
        CommitRangeSpec::new(self.range.from.clone(), self.range.to.clone())
    }
}
