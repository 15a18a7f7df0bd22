//! Conversion of one SoFiA run into a container.
//!
//! Reads the parameter listing, discovers the cube, catalogue and mask that
//! SoFiA produced, attaches them to a [`ContainerWriter`] and writes the
//! result (or only lays it out for a dry run).

pub mod discovery;

#[cfg(test)]
mod tests;

use self::discovery::{CatalogSource, ConversionInputs};

use crate::catalog::{CatalogParser, VelocityVariant};
use crate::config::ConverterConfig;
use crate::container::{ContainerWriter, Document, DocumentStore};
use crate::error::{ConvertError, Result};
use crate::fits::FitsImage;
use crate::models::{CatalogType, ConversionSummary, SectionSummary};
use crate::parameters::ParameterMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Drives a single conversion from a resolved configuration
#[derive(Debug, Clone)]
pub struct Converter {
    config: ConverterConfig,
}

/// Writer with everything attached, plus what the catalogue contributed
struct Assembly {
    writer: ContainerWriter,
    sources: usize,
    velocity: Option<VelocityVariant>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert the run and write the container through `store`
    pub fn convert(&self, store: &dyn DocumentStore) -> Result<ConversionSummary> {
        let assembly = self.assemble()?;
        let document = assembly.writer.write(store)?;
        Ok(summarize(&assembly, &document, true))
    }

    /// Build the container layout without writing anything
    pub fn plan(&self) -> Result<ConversionSummary> {
        let assembly = self.assemble()?;
        let document = assembly.writer.layout()?;
        Ok(summarize(&assembly, &document, false))
    }

    fn assemble(&self) -> Result<Assembly> {
        self.config.validate()?;

        let input = self.config.sofia_input.as_ref().ok_or_else(|| {
            ConvertError::configuration("no SoFiA parameter file was given")
        })?;
        let parameters = ParameterMap::load(input)?;
        let inputs = ConversionInputs::resolve(&parameters, &self.config)?;

        let mut assembly = Assembly {
            writer: ContainerWriter::new(&inputs.output_path, &inputs.base_name),
            sources: 0,
            velocity: None,
        };

        if !inputs.cube.is_file() {
            return Err(ConvertError::configuration(format!(
                "input cube not found: {}",
                inputs.cube.display()
            )));
        }
        info!(
            "Adding cube {} to {}",
            inputs.cube.display(),
            inputs.output_path.display()
        );
        let cube = FitsImage::open(&inputs.cube)?;
        assembly.writer.attach_cube(cube.data, cube.header);

        if inputs.karma {
            warn!(
                "Karma annotations were produced but cannot be stored; they are not added to {}",
                inputs.output_path.display()
            );
        }

        if let Some(source) = &inputs.catalog {
            self.add_catalog(&mut assembly, source)?;
        }

        if let Some(mask) = &inputs.mask {
            add_mask(&mut assembly.writer, mask)?;
        }

        Ok(assembly)
    }

    fn add_catalog(&self, assembly: &mut Assembly, source: &CatalogSource) -> Result<()> {
        if !source.path.is_file() {
            warn!(
                "{} catalogue {} does not exist; continuing without a catalogue",
                source.catalog_type,
                source.path.display()
            );
            return Ok(());
        }

        match source.catalog_type {
            CatalogType::Ascii => {
                info!("Adding {} catalogue {}", source.catalog_type, source.path.display());
                let catalog = CatalogParser::new()
                    .with_fields(self.config.catalog_fields.iter().cloned())
                    .parse_file(&source.path)?;

                assembly.sources = catalog.len();
                assembly.velocity = catalog.velocity();
                assembly
                    .writer
                    .attach_catalog(catalog, source.catalog_type, &source.path);
            }
            CatalogType::Xml | CatalogType::Sql => {
                warn!(
                    "{} catalogues are not supported; {} is not added",
                    source.catalog_type,
                    source.path.display()
                );
            }
        }
        Ok(())
    }
}

fn add_mask(writer: &mut ContainerWriter, path: &Path) -> Result<()> {
    if !path.is_file() {
        warn!("Mask {} does not exist; continuing without a mask", path.display());
        return Ok(());
    }

    info!("Adding mask {}", path.display());
    let mask = FitsImage::open(path)?;
    writer.attach_mask(mask.data, mask.header);
    Ok(())
}

fn summarize(assembly: &Assembly, document: &Document, written: bool) -> ConversionSummary {
    let sections = document
        .sections()
        .iter()
        .map(|section| SectionSummary {
            name: section.name.clone(),
            attributes: section.attributes.len(),
            datasets: section
                .dataset_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    debug!("Conversion of {} finished (written: {})", assembly.writer.name(), written);

    ConversionSummary {
        output_path: assembly.writer.path().to_path_buf(),
        sections,
        sources_written: assembly.sources,
        velocity: assembly.velocity,
        written,
    }
}
