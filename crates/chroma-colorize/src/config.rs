//! Colorizer settings.
//!
//! Settings are plain data, loadable from YAML:
//!
//! ```yaml
//! model_size: 256
//! filter: lanczos3
//! intent: perceptual
//! opaque: true
//! profile_dir: /usr/share/color/icc
//! ```
//!
//! Every key is optional. Unknown keys are rejected.

use chroma_icc::{Intent, ProfileDirectory, ProfileSet, ProfileSource};
use chroma_ops::{Filter, NormalizeOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Side length of the square model input.
pub const DEFAULT_MODEL_SIZE: u32 = 256;

/// Error loading a [`ColorizeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading the config file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file not found.
    #[error("config file not found: {path}")]
    NotFound {
        /// Path that was searched.
        path: PathBuf,
    },

    /// A value parsed but is out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The built-in profiles could not be created.
    #[error("builtin profiles: {0}")]
    Profiles(#[from] chroma_icc::IccError),
}

/// Colorizer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorizeConfig {
    /// Side length of the model input and prediction planes.
    pub model_size: u32,
    /// Resampling filter for every normalization.
    pub filter: Filter,
    /// Rendering intent for every RGB/Lab transform.
    pub intent: Intent,
    /// Composite over black and drop alpha when normalizing.
    pub opaque: bool,
    /// Directory of `<name>.icc` profiles; built-in profiles when absent.
    pub profile_dir: Option<PathBuf>,
}

impl Default for ColorizeConfig {
    fn default() -> Self {
        Self {
            model_size: DEFAULT_MODEL_SIZE,
            filter: Filter::Lanczos3,
            intent: Intent::Perceptual,
            opaque: true,
            profile_dir: None,
        }
    }
}

impl ColorizeConfig {
    /// Loads settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Loads settings from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_size == 0 {
            return Err(ConfigError::Invalid {
                field: "model_size",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Normalization options derived from these settings.
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            filter: self.filter,
            opaque: self.opaque,
        }
    }

    /// Opens the configured profile source.
    ///
    /// A directory is not checked here; missing files surface when a
    /// transform is first built.
    pub fn profile_source(&self) -> Result<Box<dyn ProfileSource>, ConfigError> {
        match &self.profile_dir {
            Some(dir) => Ok(Box::new(ProfileDirectory::new(dir.clone()))),
            None => Ok(Box::new(ProfileSet::builtin()?)),
        }
    }
}
