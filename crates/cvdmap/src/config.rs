//! Optimizer configuration.
//!
//! Configuration is plain YAML; every key is optional:
//!
//! ```yaml
//! iterations: 2
//! cvd_type: deuteranomaly   # or protanomaly
//! severity: 100             # integer, 0..=100
//! ```
//!
//! Parsing goes through a raw, all-optional mirror of the config and is
//! validated afterwards, so a malformed document is a [`Error::Config`]
//! and an out-of-domain value is an [`Error::InvalidParameter`].

use std::path::Path;

use cvdmap_color::{CvdType, Severity};
use cvdmap_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of optimizer rounds.
pub const DEFAULT_ITERATIONS: usize = 2;

/// Settings of the iterative optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizerConfig {
    /// Number of {linearize, simulate, restore} rounds, at least 1.
    pub iterations: usize,
    /// Simulated deficiency.
    pub cvd_type: CvdType,
    /// Simulated severity.
    pub severity: Severity,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            cvd_type: CvdType::default(),
            severity: Severity::FULL,
        }
    }
}

impl OptimizerConfig {
    /// Creates a validated config.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `iterations == 0`.
    pub fn new(iterations: usize, cvd_type: CvdType, severity: Severity) -> Result<Self> {
        let config = Self {
            iterations,
            cvd_type,
            severity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants not enforced by the field types.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::invalid_parameter("iterations", "must be at least 1"));
        }
        Ok(())
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&content)
    }

    /// Loads configuration from a YAML string. Missing keys take defaults.
    ///
    /// ```rust
    /// use cvdmap::OptimizerConfig;
    /// use cvdmap_color::CvdType;
    ///
    /// let config = OptimizerConfig::from_yaml_str("cvd_type: protanomaly\nseverity: 60").unwrap();
    /// assert_eq!(config.cvd_type, CvdType::Protanomaly);
    /// assert_eq!(config.severity.get(), 60);
    /// assert_eq!(config.iterations, 2);
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: RawOptimizerConfig = if yaml.trim().is_empty() {
            RawOptimizerConfig::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| Error::config(e.to_string()))?
        };
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawOptimizerConfig) -> Result<Self> {
        let defaults = Self::default();
        let cvd_type = match raw.cvd_type {
            Some(name) => name.parse()?,
            None => defaults.cvd_type,
        };
        let severity = match raw.severity {
            Some(v) => Severity::try_from(v)?,
            None => defaults.severity,
        };
        let iterations = match raw.iterations {
            Some(n) => usize::try_from(n).map_err(|_| {
                Error::invalid_parameter("iterations", format!("{n} is not a valid count"))
            })?,
            None => defaults.iterations,
        };
        Self::new(iterations, cvd_type, severity)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptimizerConfig {
    iterations: Option<i64>,
    cvd_type: Option<String>,
    severity: Option<f64>,
}
