//! In-memory shape of an output container.
//!
//! A [`Document`] is a list of named sections, each carrying an attribute set
//! and a list of datasets. Stores turn it into a file in one pass.

use crate::array::DataArray;
use crate::header::AttributeSet;
use serde::{Deserialize, Serialize};

/// Content of one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatasetData {
    /// Numeric n-dimensional samples, always little-endian
    Array(DataArray),
    /// One-dimensional list of strings
    Strings(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub data: DatasetData,
}

impl Dataset {
    pub fn array(name: impl Into<String>, array: DataArray) -> Self {
        Self {
            name: name.into(),
            data: DatasetData::Array(array),
        }
    }

    pub fn strings<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            data: DatasetData::Strings(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Shape of the stored data
    pub fn shape(&self) -> Vec<usize> {
        match &self.data {
            DatasetData::Array(array) => array.shape().to_vec(),
            DatasetData::Strings(values) => vec![values.len()],
        }
    }
}

/// Top-level group of a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub attributes: AttributeSet,
    pub datasets: Vec<Dataset>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: AttributeSet::new(),
            datasets: Vec::new(),
        }
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|dataset| dataset.name == name)
    }

    pub fn dataset_names(&self) -> Vec<&str> {
        self.datasets
            .iter()
            .map(|dataset| dataset.name.as_str())
            .collect()
    }
}

/// Complete container content, built before anything touches the disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    sections: Vec<Section>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.name.as_str())
            .collect()
    }
}
