//! Fixed-width SoFiA catalogue reader

use super::columns::ColumnSchema;
use super::velocity::{VelocityVariant, reconcile_fields};
use crate::constants::{DEFAULT_CATALOG_FIELDS, NAME_FIELD};
use crate::error::{ConvertError, Result};
use crate::models::{Catalog, CatalogType, SourceRecord};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Reads SoFiA ASCII catalogues into a [`Catalog`]
#[derive(Debug, Clone)]
pub struct CatalogParser {
    fields: Vec<String>,
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Header state established once the column line has been seen
struct ActiveSchema {
    schema: ColumnSchema,
    fields: Vec<String>,
}

impl CatalogParser {
    /// Parser requesting the standard SoFiA column set
    pub fn new() -> Self {
        Self {
            fields: DEFAULT_CATALOG_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
        }
    }

    /// Request a custom set of fields, in output order
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Parse a catalogue file from disk
    pub fn parse_file(&self, path: &Path) -> Result<Catalog> {
        let file = File::open(path).map_err(ConvertError::Io)?;
        let reader = BufReader::new(file);
        let lines = reader
            .lines()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(ConvertError::Io)?;

        let catalog = self.parse_lines(lines.iter().map(String::as_str), path)?;
        info!(
            "Read {} sources from {} (velocity column: {})",
            catalog.len(),
            path.display(),
            catalog
                .velocity()
                .map(|variant| variant.column())
                .unwrap_or("none")
        );
        Ok(catalog)
    }

    /// Parse catalogue text; `path` is recorded as the catalogue's origin
    pub fn parse_str(&self, text: &str, path: &Path) -> Result<Catalog> {
        self.parse_lines(text.lines(), path)
    }

    fn parse_lines<'a, I>(&self, lines: I, path: &Path) -> Result<Catalog>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut active: Option<ActiveSchema> = None;
        let mut catalog: Option<Catalog> = None;

        for (line_num, line) in lines.into_iter().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed == "#" {
                continue;
            }

            if trimmed.starts_with('#') {
                if active.is_some() {
                    continue;
                }
                if let Some(schema) = ColumnSchema::from_header_line(line) {
                    debug!("Catalogue column header on line {}", line_num + 1);
                    let (header, velocity) = self.activate(schema)?;
                    catalog = Some(Catalog::new(
                        CatalogType::Ascii,
                        path.to_path_buf(),
                        velocity,
                    ));
                    active = Some(header);
                }
                continue;
            }

            let (Some(header), Some(catalog)) = (active.as_ref(), catalog.as_mut()) else {
                return Err(ConvertError::MissingCatalogHeader {
                    path: path.to_path_buf(),
                });
            };

            let (name, record) = header.read_row(line);
            if catalog.insert(name.clone(), record) {
                debug!(
                    "Source {} on line {} replaces an earlier entry",
                    name,
                    line_num + 1
                );
            }
        }

        catalog.ok_or_else(|| ConvertError::MissingCatalogHeader {
            path: path.to_path_buf(),
        })
    }

    fn activate(&self, schema: ColumnSchema) -> Result<(ActiveSchema, Option<VelocityVariant>)> {
        let mut fields = self.fields.clone();
        let velocity = reconcile_fields(&mut fields, &schema)?;

        if !schema.contains(NAME_FIELD) {
            return Err(ConvertError::schema(NAME_FIELD));
        }

        Ok((ActiveSchema { schema, fields }, velocity))
    }
}

impl ActiveSchema {
    fn read_row(&self, line: &str) -> (String, SourceRecord) {
        let chars: Vec<char> = line.chars().collect();
        let slice = |label: &str| {
            self.schema
                .column(label)
                .map(|column| column.slice(&chars))
                .unwrap_or_default()
        };

        let name = slice(NAME_FIELD)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        let values = self
            .fields
            .iter()
            .map(|field| {
                let value = if field == NAME_FIELD {
                    name.clone()
                } else {
                    slice(field.as_str())
                };
                (field.clone(), value)
            })
            .collect();

        let velocity = self
            .fields
            .iter()
            .find(|field| VelocityVariant::from_column(field.as_str()).is_some())
            .cloned();

        (name, SourceRecord::new(values, velocity))
    }
}
