// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Firmware configuration
//!
//! Maps to `sigil_firmware.toml`:
//!
//! ```toml
//! [loop]
//! inferences_per_cycle = 100
//! ```
//!
//! The device build uses [`FirmwareConfig::default`], the host simulator can
//! load a file through [`load_config`]. Every load path runs
//! [`FirmwareConfig::validate`] before the config reaches bring-up.

use serde::Deserialize;

/// Inference counter wrap point the original sketch tuned per device
pub const DEFAULT_INFERENCES_PER_CYCLE: u32 = 100;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FirmwareConfig {
    /// Superloop settings, the `[loop]` TOML section
    #[serde(rename = "loop")]
    pub superloop: LoopConfig,
}

/// Superloop configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoopConfig {
    /// Iterations before the inference counter wraps to zero
    pub inferences_per_cycle: u32,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self { superloop: LoopConfig::default() }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { inferences_per_cycle: DEFAULT_INFERENCES_PER_CYCLE }
    }
}

impl FirmwareConfig {
    /// Check the configuration for values bring-up cannot work with
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.superloop.inferences_per_cycle == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "loop.inferences_per_cycle",
                reason: "must be at least 1, the counter wraps on reaching it",
            });
        }
        Ok(())
    }
}

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A field holds a value outside its valid range
    InvalidValue {
        /// Dotted TOML path of the field
        field: &'static str,
        /// Why the value is rejected
        reason: &'static str,
    },
}

impl core::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for ConfigValidationError {}

#[cfg(any(test, feature = "std"))]
pub use self::loader::{load_config, ConfigError};

#[cfg(any(test, feature = "std"))]
mod loader {
    use std::fs;
    use std::path::Path;
    use std::string::{String, ToString};

    use super::{ConfigValidationError, FirmwareConfig};

    /// Errors raised while loading a configuration file
    #[derive(Debug, thiserror::Error)]
    pub enum ConfigError {
        /// File could not be read
        #[error("Failed to read config file {path}: {source}")]
        Io {
            /// Path that was given
            path: String,
            /// Underlying I/O error
            source: std::io::Error,
        },
        /// File is not valid TOML for the expected schema
        #[error("Failed to parse config file {path}: {source}")]
        Parse {
            /// Path that was given
            path: String,
            /// Underlying TOML error
            source: toml::de::Error,
        },
        /// File parsed but holds an unusable value
        #[error(transparent)]
        Validation(#[from] ConfigValidationError),
    }

    /// Load and validate a firmware configuration from a TOML file
    pub fn load_config(path: &Path) -> Result<FirmwareConfig, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: FirmwareConfig =
            toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn defaults_match_the_sketch_constant() {
        let config = FirmwareConfig::default();
        assert_eq!(config.superloop.inferences_per_cycle, 100);
        config.validate().unwrap();
    }

    #[test]
    fn zero_wrap_point_is_rejected() {
        let config = FirmwareConfig {
            superloop: LoopConfig { inferences_per_cycle: 0 },
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigValidationError::InvalidValue { field, .. }
            if field == "loop.inferences_per_cycle"));
    }

    #[test]
    fn toml_file_loads_and_overrides_the_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loop]\ninferences_per_cycle = 25").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.superloop.inferences_per_cycle, 25);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config, FirmwareConfig::default());
    }

    #[test]
    fn invalid_file_value_fails_the_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loop]\ninferences_per_cycle = 0").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn unparseable_file_is_reported_with_its_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[loop").unwrap();
        let err = load_config(file.path()).unwrap_err();
        let msg = std::format!("{}", err);
        assert!(msg.contains("parse"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(std::path::Path::new("/nonexistent/sigil.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
