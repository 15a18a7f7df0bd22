//! sofia2hdf5 Library
//!
//! Converts the products of a SoFiA source-finding run into one HDF5
//! container that viewers such as CARTA can open.
//!
//! This library provides tools for:
//! - Reading SoFiA parameter listings
//! - Parsing fixed-width SoFiA catalogues, reconciling the velocity column
//! - Reading FITS primary HDUs and translating their headers into attributes
//! - Laying out cube, mask and catalogue as sections of one document
//! - Writing that document atomically, replacing any earlier container

pub mod array;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod container;
pub mod error;
pub mod fits;
pub mod header;
pub mod models;
pub mod parameters;
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use catalog::{CatalogParser, VelocityVariant};
pub use config::ConverterConfig;
pub use container::{ContainerWriter, Document, DocumentStore};
pub use error::{ConvertError, Result};
pub use models::{Catalog, CatalogType, ConversionSummary, SourceRecord};
pub use processor::Converter;

#[cfg(feature = "hdf5")]
pub use container::Hdf5Store;
