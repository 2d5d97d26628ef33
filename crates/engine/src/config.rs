//! Engine configuration via `dtoforge.toml`
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Applications that want to tune limits load the
//! file once and hand the result to `TypeCache::with_config` or
//! `TypeCache::update_config`.

use dtoforge_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "dtoforge.toml";

/// Default maximum number of resolved properties per contract.
pub const DEFAULT_MAX_PROPERTIES: usize = 1024;

/// Default maximum lattice depth.
pub const DEFAULT_MAX_LATTICE_DEPTH: usize = 64;

/// Structural limits enforced by the validator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Maximum resolved properties for one contract (default: 1024)
    #[serde(default = "default_max_properties")]
    pub max_properties: usize,
    /// Maximum length of a parent chain, counting the contract (default: 64)
    #[serde(default = "default_max_lattice_depth")]
    pub max_lattice_depth: usize,
}

fn default_max_properties() -> usize {
    DEFAULT_MAX_PROPERTIES
}

fn default_max_lattice_depth() -> usize {
    DEFAULT_MAX_LATTICE_DEPTH
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_properties: DEFAULT_MAX_PROPERTIES,
            max_lattice_depth: DEFAULT_MAX_LATTICE_DEPTH,
        }
    }
}

/// JSON codec behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodecConfig {
    /// Match JSON field names to property names ignoring ASCII case.
    #[serde(default)]
    pub case_insensitive: bool,
    /// Fail decoding when a JSON field names no property.
    #[serde(default)]
    pub reject_unknown_fields: bool,
}

/// Engine configuration loaded from `dtoforge.toml`.
///
/// # Example
///
/// ```toml
/// trace_synthesis = false
///
/// [limits]
/// max_properties = 1024
/// max_lattice_depth = 64
///
/// [codec]
/// case_insensitive = true
/// reject_unknown_fields = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Log every synthesis at info level instead of debug.
    #[serde(default)]
    pub trace_synthesis: bool,
    /// Structural limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// JSON codec behavior.
    #[serde(default)]
    pub codec: CodecConfig,
}

impl EngineConfig {
    /// Check that limits are usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_properties == 0 {
            return Err(Error::InvalidConfig(
                "limits.max_properties must be greater than 0".to_string(),
            ));
        }
        if self.limits.max_lattice_depth == 0 {
            return Err(Error::InvalidConfig(
                "limits.max_lattice_depth must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# dtoforge engine configuration
#
# Log each type synthesis at info level (default: false, logs at debug)
trace_synthesis = false

[limits]
# Maximum number of resolved properties per contract
max_properties = 1024
# Maximum parent chain length, counting the contract itself
max_lattice_depth = 64

[codec]
# Match JSON field names ignoring ASCII case
case_insensitive = false
# Reject JSON fields that name no property
reject_unknown_fields = false
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            Error::InvalidConfig(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        debug!(target: "dtoforge::config", path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
            debug!(target: "dtoforge::config", path = %path.display(), "Wrote default engine config");
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
