//! HDF5 serialisation of a container document

use super::layout::{Dataset, DatasetData, Document};
use super::writer::DocumentStore;
use crate::array::{DataArray, ElementType, Sample};
use crate::error::{ConvertError, Result};
use crate::header::AttributeValue;
use hdf5::types::{H5Type, VarLenUnicode};
use hdf5::{File, Group};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[cfg(target_endian = "big")]
compile_error!("Hdf5Store writes native-order datasets and requires a little-endian target");

/// Writes documents as HDF5 files: sections become groups, attributes become
/// scalar group attributes and datasets are stored contiguously
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5Store;

impl DocumentStore for Hdf5Store {
    fn store(&self, document: &Document, path: &Path) -> Result<()> {
        let file = File::create(path)?;

        for section in document.sections() {
            let group = file.create_group(&section.name)?;

            for (key, value) in section.attributes.iter() {
                write_attribute(&group, key, value, path)?;
            }
            for dataset in &section.datasets {
                write_dataset(&group, dataset, path)?;
            }
            debug!(
                "HDF5 group '{}': {} attributes, {} datasets",
                section.name,
                section.attributes.len(),
                section.datasets.len()
            );
        }

        file.close()?;
        Ok(())
    }
}

fn write_attribute(group: &Group, key: &str, value: &AttributeValue, path: &Path) -> Result<()> {
    match value {
        AttributeValue::String(text) => {
            let text = to_var_len_unicode(text, path)?;
            group
                .new_attr::<VarLenUnicode>()
                .create(key)?
                .write_scalar(&text)?;
        }
        AttributeValue::Flag(flag) => {
            group.new_attr::<u8>().create(key)?.write_scalar(flag)?;
        }
        AttributeValue::Integer(number) => {
            group.new_attr::<i64>().create(key)?.write_scalar(number)?;
        }
        AttributeValue::Real(number) => {
            group.new_attr::<f64>().create(key)?.write_scalar(number)?;
        }
    }
    Ok(())
}

fn write_dataset(group: &Group, dataset: &Dataset, path: &Path) -> Result<()> {
    match &dataset.data {
        DatasetData::Array(array) => match array.element() {
            ElementType::U8 => write_samples::<u8>(group, &dataset.name, array),
            ElementType::I16 => write_samples::<i16>(group, &dataset.name, array),
            ElementType::I32 => write_samples::<i32>(group, &dataset.name, array),
            ElementType::I64 => write_samples::<i64>(group, &dataset.name, array),
            ElementType::F32 => write_samples::<f32>(group, &dataset.name, array),
            ElementType::F64 => write_samples::<f64>(group, &dataset.name, array),
        },
        DatasetData::Strings(values) => {
            let values = values
                .iter()
                .map(|value| to_var_len_unicode(value, path))
                .collect::<Result<Vec<_>>>()?;
            group
                .new_dataset::<VarLenUnicode>()
                .shape(values.len())
                .create(dataset.name.as_str())?
                .write_raw(&values)?;
            Ok(())
        }
    }
}

/// Samples are decoded to native `T` and stored with HDF5's native datatype
/// for `T`, so the on-disk byte order is the host's, which the guard above
/// restricts to little-endian.
fn write_samples<T: Sample + H5Type>(group: &Group, name: &str, array: &DataArray) -> Result<()> {
    let samples = array.samples::<T>()?;
    group
        .new_dataset::<T>()
        .shape(array.shape().to_vec())
        .create(name)?
        .write_raw(&samples)?;
    Ok(())
}

fn to_var_len_unicode(value: &str, path: &Path) -> Result<VarLenUnicode> {
    VarLenUnicode::from_str(value).map_err(|e| ConvertError::Container {
        path: path.to_path_buf(),
        reason: format!("invalid string value {value:?}: {e}"),
    })
}
