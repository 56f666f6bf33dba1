use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_OPERATOR_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

/// Parameters of the assembly enumeration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnumerationConfig {
    /// Maximum deviation, in fractional units, for an interface operator to be
    /// matched to a space-group operator plus a whole lattice translation.
    pub operator_tolerance: f64,
    /// Refuse to enumerate crystals with more interface clusters than this.
    pub max_interface_clusters: Option<usize>,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            operator_tolerance: DEFAULT_OPERATOR_TOLERANCE,
            max_interface_clusters: None,
        }
    }
}

impl EnumerationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.operator_tolerance > 0.0 && self.operator_tolerance < 0.5) {
            return Err(ConfigError::InvalidParameter {
                name: "operator_tolerance",
                reason: format!(
                    "must lie in (0, 0.5), got {}",
                    self.operator_tolerance
                ),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct EnumerationConfigBuilder {
    operator_tolerance: Option<f64>,
    max_interface_clusters: Option<usize>,
}

impl EnumerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operator_tolerance(mut self, tolerance: f64) -> Self {
        self.operator_tolerance = Some(tolerance);
        self
    }
    pub fn max_interface_clusters(mut self, limit: usize) -> Self {
        self.max_interface_clusters = Some(limit);
        self
    }

    pub fn build(self) -> Result<EnumerationConfig, ConfigError> {
        let config = EnumerationConfig {
            operator_tolerance: self
                .operator_tolerance
                .unwrap_or(DEFAULT_OPERATOR_TOLERANCE),
            max_interface_clusters: self.max_interface_clusters,
        };
        config.validate()?;
        Ok(config)
    }
}
