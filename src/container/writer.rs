//! Container assembly and atomic replacement of the output file

use super::layout::{Dataset, Document, Section};
use crate::array::DataArray;
use crate::constants::{
    CATALOGUE_HEADER_DATASET, CATALOGUE_NAME_ATTRIBUTE, CATALOGUE_SECTION,
    CATALOGUE_TYPE_ATTRIBUTE, CUBE_DATASET, CUBE_SECTION, MASK_DATASET, MASK_SECTION,
};
use crate::error::{ConvertError, Result};
use crate::header::{AttributeValue, Header, translate_header};
use crate::models::{Catalog, CatalogType};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Serialises a complete [`Document`] into a new file
pub trait DocumentStore {
    /// Write every section of `document` into the file at `path`, which the
    /// caller has already created empty
    fn store(&self, document: &Document, path: &Path) -> Result<()>;
}

struct ImageInput {
    data: DataArray,
    header: Header,
}

struct CatalogInput {
    catalog: Catalog,
    catalog_type: CatalogType,
    filename: PathBuf,
}

/// Collects the pieces of one output container and writes them in one go
pub struct ContainerWriter {
    path: PathBuf,
    name: String,
    cube: Option<ImageInput>,
    mask: Option<ImageInput>,
    catalog: Option<CatalogInput>,
}

impl ContainerWriter {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            cube: None,
            mask: None,
            catalog: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attach_cube(&mut self, data: DataArray, header: Header) {
        self.cube = Some(ImageInput { data, header });
    }

    pub fn attach_mask(&mut self, data: DataArray, header: Header) {
        self.mask = Some(ImageInput { data, header });
    }

    pub fn attach_catalog(
        &mut self,
        catalog: Catalog,
        catalog_type: CatalogType,
        filename: impl Into<PathBuf>,
    ) {
        self.catalog = Some(CatalogInput {
            catalog,
            catalog_type,
            filename: filename.into(),
        });
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// Build the full document from whatever has been attached
    pub fn layout(&self) -> Result<Document> {
        let cube = self.cube.as_ref().ok_or_else(|| {
            ConvertError::configuration(format!(
                "no data cube attached to container {}",
                self.path.display()
            ))
        })?;

        let mut document = Document::new();
        document.push(image_section(CUBE_SECTION, CUBE_DATASET, cube)?);

        if let Some(mask) = &self.mask {
            document.push(image_section(MASK_SECTION, MASK_DATASET, mask)?);
        }

        if let Some(catalog) = &self.catalog {
            document.push(catalog_section(catalog));
        }

        debug!(
            "Container {} laid out with sections {:?}",
            self.name,
            document.section_names()
        );
        Ok(document)
    }

    /// Lay out the document and write it, replacing any existing file
    pub fn write(&self, store: &dyn DocumentStore) -> Result<Document> {
        let document = self.layout()?;

        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if self.path.exists() {
            warn!("Replacing existing container {}", self.path.display());
        }

        let temp_file = tempfile::Builder::new()
            .prefix(".sofia2hdf5-")
            .suffix(".tmp")
            .tempfile_in(directory)
            .map_err(ConvertError::Io)?;

        store.store(&document, temp_file.path())?;

        temp_file
            .persist(&self.path)
            .map_err(|e| ConvertError::Container {
                path: self.path.clone(),
                reason: e.error.to_string(),
            })?;

        info!(
            "Wrote {} with sections {}",
            self.path.display(),
            document.section_names().join(", ")
        );
        Ok(document)
    }
}

fn image_section(name: &str, dataset: &str, input: &ImageInput) -> Result<Section> {
    let mut section = Section::new(name);
    section.attributes = translate_header(&input.header)?;
    section
        .datasets
        .push(Dataset::array(dataset, input.data.to_little_endian()));
    Ok(section)
}

/// The `Header` dataset and the per-field datasets follow the catalogue's
/// field list after velocity substitution. The reconciled `v_sofia` velocity
/// is only an alias on each record and is not written as a column.
fn catalog_section(input: &CatalogInput) -> Section {
    let mut section = Section::new(CATALOGUE_SECTION);
    section.attributes.insert(
        CATALOGUE_TYPE_ATTRIBUTE,
        AttributeValue::String(input.catalog_type.as_str().to_string()),
    );
    section.attributes.insert(
        CATALOGUE_NAME_ATTRIBUTE,
        AttributeValue::String(input.filename.display().to_string()),
    );

    let fields = input.catalog.field_names();
    if fields.is_empty() {
        debug!("Catalogue {} has no sources", input.filename.display());
        return section;
    }

    section
        .datasets
        .push(Dataset::strings(CATALOGUE_HEADER_DATASET, fields.iter().copied()));
    for field in &fields {
        section
            .datasets
            .push(Dataset::strings(*field, input.catalog.column(field)));
    }

    section
}
