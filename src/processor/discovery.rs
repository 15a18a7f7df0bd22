//! Input discovery for a SoFiA run
//!
//! Works out, from the parameter listing and the configuration, which files a
//! conversion reads and where the container goes. SoFiA names its products
//! after a base name in its output directory:
//!
//! ```text
//! <directory>/
//!   <base>_cat.txt | <base>_cat.xml | <base>_cat.sql
//!   <base>_mask.fits | <base>_mask-2d.fits | <base>_mask-raw.fits
//!   <base>.hdf5          (written here)
//! ```

use crate::config::ConverterConfig;
use crate::constants::{CONTAINER_EXTENSION, parameter_keys};
use crate::error::{ConvertError, Result};
use crate::models::CatalogType;
use crate::parameters::ParameterMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Catalogue chosen for the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub path: PathBuf,
    pub catalog_type: CatalogType,
}

/// Every path one conversion touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionInputs {
    pub working_directory: PathBuf,
    pub base_name: String,
    pub output_path: PathBuf,
    pub cube: PathBuf,
    pub catalog: Option<CatalogSource>,
    pub mask: Option<PathBuf>,
    /// SoFiA also wrote Karma annotations, which the container cannot hold
    pub karma: bool,
}

impl ConversionInputs {
    pub fn resolve(parameters: &ParameterMap, config: &ConverterConfig) -> Result<Self> {
        let input_data = parameters.text(parameter_keys::INPUT_DATA).ok_or_else(|| {
            ConvertError::configuration(format!(
                "parameter file does not set '{}'",
                parameter_keys::INPUT_DATA
            ))
        })?;

        let working_directory = working_directory(parameters, config);
        let base_name = base_name(parameters, input_data)?;
        let output_path = working_directory.join(format!("{base_name}.{CONTAINER_EXTENSION}"));
        let cube = working_directory.join(input_data);
        let catalog = select_catalog(&working_directory, &base_name, parameters, config);
        let mask = select_mask(&working_directory, &base_name, parameters);

        let inputs = Self {
            karma: parameters.flag(parameter_keys::WRITE_KARMA),
            working_directory,
            base_name,
            output_path,
            cube,
            catalog,
            mask,
        };
        debug!("Resolved conversion inputs: {:?}", inputs);
        Ok(inputs)
    }
}

/// `output.directory` when set, resolved against the configured directory
fn working_directory(parameters: &ParameterMap, config: &ConverterConfig) -> PathBuf {
    match parameters.text(parameter_keys::OUTPUT_DIRECTORY) {
        Some(directory) => config.general.directory.join(directory),
        None => config.general.directory.clone(),
    }
}

/// `output.filename` when set, otherwise the file stem of the input cube
fn base_name(parameters: &ParameterMap, input_data: &str) -> Result<String> {
    if let Some(name) = parameters.text(parameter_keys::OUTPUT_FILENAME) {
        return Ok(name.to_string());
    }

    Path::new(input_data)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            ConvertError::configuration(format!(
                "cannot derive an output name from input.data '{input_data}'"
            ))
        })
}

/// First enabled catalogue in ASCII, XML, SQL order, else the configured one
fn select_catalog(
    directory: &Path,
    base_name: &str,
    parameters: &ParameterMap,
    config: &ConverterConfig,
) -> Option<CatalogSource> {
    let candidates = [
        (parameter_keys::WRITE_CAT_ASCII, CatalogType::Ascii),
        (parameter_keys::WRITE_CAT_XML, CatalogType::Xml),
        (parameter_keys::WRITE_CAT_SQL, CatalogType::Sql),
    ];

    for (key, catalog_type) in candidates {
        if parameters.flag(key) {
            return Some(CatalogSource {
                path: directory.join(format!("{base_name}_cat.{}", catalog_type.extension())),
                catalog_type,
            });
        }
    }

    config.sofia_catalog.as_ref().map(|path| CatalogSource {
        path: config.general.directory.join(path),
        catalog_type: CatalogType::from_path(path).unwrap_or(CatalogType::Ascii),
    })
}

/// First enabled mask in full, 2-D, raw order
fn select_mask(directory: &Path, base_name: &str, parameters: &ParameterMap) -> Option<PathBuf> {
    let candidates = [
        (parameter_keys::WRITE_MASK, "mask"),
        (parameter_keys::WRITE_MASK_2D, "mask-2d"),
        (parameter_keys::WRITE_RAW_MASK, "mask-raw"),
    ];

    candidates
        .into_iter()
        .find(|(key, _)| parameters.flag(key))
        .map(|(_, suffix)| directory.join(format!("{base_name}_{suffix}.fits")))
}
