//! JSON document store shared by the unit tests
//!
//! Writes the laid-out document as JSON so tests can read back exactly what
//! a real store would have received.

use super::layout::Document;
use super::writer::DocumentStore;
use crate::error::{ConvertError, Result};
use std::fs;
use std::path::Path;

pub struct JsonStore;

impl DocumentStore for JsonStore {
    fn store(&self, document: &Document, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(document).map_err(|e| ConvertError::Container {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }
}

pub fn read_document(path: &Path) -> Document {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}
