//! Core data structures for SoFiA conversion.
//!
//! Defines the parsed source catalogue, its records and the summary
//! returned after a conversion run.

use crate::catalog::VelocityVariant;
use crate::constants::VELOCITY_ALIAS;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Catalogue formats SoFiA can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogType {
    Ascii,
    Xml,
    Sql,
}

impl CatalogType {
    /// Name stored in the container's `type` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogType::Ascii => "ASCII",
            CatalogType::Xml => "XML",
            CatalogType::Sql => "SQL",
        }
    }

    /// File extension SoFiA uses for this catalogue type
    pub fn extension(&self) -> &'static str {
        match self {
            CatalogType::Ascii => "txt",
            CatalogType::Xml => "xml",
            CatalogType::Sql => "sql",
        }
    }

    /// Detect the catalogue type from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        match extension.as_str() {
            "txt" | "ascii" => Some(CatalogType::Ascii),
            "xml" => Some(CatalogType::Xml),
            "sql" => Some(CatalogType::Sql),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalogue row, fields kept in the order they were requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    fields: Vec<(String, String)>,
    velocity_field: Option<String>,
}

impl SourceRecord {
    pub fn new(fields: Vec<(String, String)>, velocity_field: Option<String>) -> Self {
        Self {
            fields,
            velocity_field,
        }
    }

    /// Look up a field value; `v_sofia` resolves to the reconciled velocity column
    pub fn get(&self, field: &str) -> Option<&str> {
        if field == VELOCITY_ALIAS {
            return self.velocity();
        }
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Value of whichever velocity variant the catalogue declared
    pub fn velocity(&self) -> Option<&str> {
        let field = self.velocity_field.as_deref()?;
        self.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parsed source catalogue keyed by source name in file order
#[derive(Debug, Clone)]
pub struct Catalog {
    sources: IndexMap<String, SourceRecord>,
    catalog_type: CatalogType,
    filename: PathBuf,
    velocity: Option<VelocityVariant>,
}

impl Catalog {
    pub fn new(
        catalog_type: CatalogType,
        filename: PathBuf,
        velocity: Option<VelocityVariant>,
    ) -> Self {
        Self {
            sources: IndexMap::new(),
            catalog_type,
            filename,
            velocity,
        }
    }

    /// Insert a record. A name seen before replaces the old record but keeps
    /// its position; returns true when that happened.
    pub fn insert(&mut self, name: String, record: SourceRecord) -> bool {
        self.sources.insert(name, record).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&SourceRecord> {
        self.sources.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceRecord)> {
        self.sources
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Field names of the first record, which define the written column set
    pub fn field_names(&self) -> Vec<&str> {
        self.sources
            .values()
            .next()
            .map(|record| record.field_names().collect())
            .unwrap_or_default()
    }

    /// All values of one field in catalogue order
    pub fn column(&self, field: &str) -> Vec<&str> {
        self.sources
            .values()
            .map(|record| record.get(field).unwrap_or_default())
            .collect()
    }

    pub fn catalog_type(&self) -> CatalogType {
        self.catalog_type
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn velocity(&self) -> Option<VelocityVariant> {
        self.velocity
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Section of a produced (or planned) container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub name: String,
    pub attributes: usize,
    pub datasets: Vec<String>,
}

/// Result of one conversion run
#[derive(Debug, Default)]
pub struct ConversionSummary {
    pub output_path: PathBuf,
    pub sections: Vec<SectionSummary>,
    pub sources_written: usize,
    pub velocity: Option<VelocityVariant>,
    /// False for dry runs, where the layout was built but nothing was stored
    pub written: bool,
}

impl ConversionSummary {
    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.name.as_str())
            .collect()
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|section| section.name == name)
    }
}
