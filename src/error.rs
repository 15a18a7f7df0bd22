//! Error handling for SoFiA to HDF5 conversion.
//!
//! Provides error types with context for catalogue schema problems,
//! header translation, FITS decoding and container writing failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "SOFIA_CATALOGUE: We cannot find the required column for {field} in the sofia catalogue.\n\
         SOFIA_CATALOGUE: This can happen because a) you have tampered with the sofiainput.txt file in the Support directory,\n\
         SOFIA_CATALOGUE: b) you are using an updated version of SoFiA2."
    )]
    Schema { field: String },

    #[error("No column header line (starting with '# name' or '# id') found in catalogue: {path}")]
    MissingCatalogHeader { path: PathBuf },

    #[error("Header keyword {key} has a {kind} value which cannot be stored as an attribute")]
    UnsupportedHeaderValue { key: String, kind: &'static str },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid FITS file: {path} - {reason}")]
    Fits { path: PathBuf, reason: String },

    #[error("Invalid data array: {reason}")]
    InvalidArray { reason: String },

    #[error("Container write failed for file: {path} - {reason}")]
    Container { path: PathBuf, reason: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[cfg(feature = "hdf5")]
    #[error("HDF5 error: {0}")]
    Hdf5(#[from] hdf5::Error),
}

impl ConvertError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a schema error for a missing catalogue column
    pub fn schema(field: impl Into<String>) -> Self {
        Self::Schema {
            field: field.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
