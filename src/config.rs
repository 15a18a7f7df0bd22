//! Converter configuration.
//!
//! Settings come from built-in defaults, optionally overridden by a YAML file
//! and finally by command-line flags. The resulting struct is immutable input
//! to the conversion.

use crate::constants::{DEFAULT_CATALOG_FIELDS, NAME_FIELD};
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration for one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// SoFiA parameter file of the run to convert
    pub sofia_input: Option<PathBuf>,

    /// Catalogue used when the parameter file enables none
    pub sofia_catalog: Option<PathBuf>,

    /// Catalogue columns to read, in output order
    pub catalog_fields: Vec<String>,

    /// General settings
    pub general: GeneralConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Print debug information while converting
    pub verbose: bool,

    /// Directory SoFiA ran in; used when the parameter file sets no output directory
    pub directory: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            directory: PathBuf::from("."),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            sofia_input: None,
            sofia_catalog: None,
            catalog_fields: DEFAULT_CATALOG_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            general: GeneralConfig::default(),
        }
    }
}

impl ConverterConfig {
    /// Load settings from a YAML file; keys it omits keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConvertError::configuration(format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the default configuration as a starting point for users
    pub fn write_example(path: &Path) -> Result<()> {
        let text = Self::default().to_yaml()?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Reject field lists the catalogue parser cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.catalog_fields.is_empty() {
            return Err(ConvertError::configuration(
                "catalog_fields must name at least one column",
            ));
        }
        if !self.catalog_fields.iter().any(|field| field == NAME_FIELD) {
            return Err(ConvertError::configuration(format!(
                "catalog_fields must include '{NAME_FIELD}', which keys the catalogue"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(field) = self.catalog_fields.iter().find(|field| !seen.insert(*field)) {
            return Err(ConvertError::configuration(format!(
                "catalog_fields lists '{field}' more than once"
            )));
        }
        Ok(())
    }

    pub fn with_sofia_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.sofia_input = Some(path.into());
        self
    }

    pub fn with_sofia_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.sofia_catalog = Some(path.into());
        self
    }

    pub fn with_catalog_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.general.directory = directory.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.general.verbose = verbose;
        self
    }
}
