//! Configuration file support for optic.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/optic/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied to absent contact-lens conversion fields
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversionConfig {
    #[serde(default)]
    pub default_cylinder: f64,

    #[serde(default)]
    pub default_axis: f64,

    #[serde(default = "default_vertex_distance_mm")]
    pub default_vertex_distance_mm: f64,

    #[serde(default)]
    pub default_addition: f64,

    /// Spherical conversion compensates only above this absolute power (D)
    #[serde(default = "default_compensation_threshold")]
    pub compensation_threshold: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            default_cylinder: 0.0,
            default_axis: 0.0,
            default_vertex_distance_mm: default_vertex_distance_mm(),
            default_addition: 0.0,
            compensation_threshold: default_compensation_threshold(),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_vertex_distance_mm() -> f64 {
    12.0
}

fn default_compensation_threshold() -> f64 {
    4.0
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            path => {
                tracing::debug!("No config file found at {:?}, using defaults", path);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("optic").join("config.toml"))
    }

    /// Reject settings no conversion could use
    pub fn validate(&self) -> Result<()> {
        let c = &self.conversion;
        let values = [
            ("default_cylinder", c.default_cylinder),
            ("default_axis", c.default_axis),
            ("default_vertex_distance_mm", c.default_vertex_distance_mm),
            ("default_addition", c.default_addition),
            ("compensation_threshold", c.compensation_threshold),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(Error::Config(format!("{} must be a finite number", name)));
            }
        }
        if c.default_vertex_distance_mm < 0.0 {
            return Err(Error::Config(
                "default_vertex_distance_mm must not be negative".into(),
            ));
        }
        if c.compensation_threshold < 0.0 {
            return Err(Error::Config(
                "compensation_threshold must not be negative".into(),
            ));
        }
        Ok(())
    }
}
