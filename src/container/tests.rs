//! Container layout and writer tests

use super::json_store::{JsonStore, read_document};
use super::*;
use crate::array::{ByteOrder, DataArray, ElementType};
use crate::catalog::CatalogParser;
use crate::error::{ConvertError, Result};
use crate::header::{AttributeValue, Header};
use crate::models::{Catalog, CatalogType};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cube() -> (DataArray, Header) {
    let bytes: Vec<u8> = [1.0f32, 2.0, 3.0, 4.0]
        .iter()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    let data = DataArray::new(ElementType::F32, ByteOrder::Big, vec![1, 2, 2], bytes).unwrap();

    let mut header = Header::new();
    header.push("SIMPLE", true);
    header.push("BITPIX", -32i64);
    header.push("HISTORY", "smoothed");
    header.push("BUNIT", "Jy/beam");
    (data, header)
}

fn mask() -> (DataArray, Header) {
    let data = DataArray::new(ElementType::I32, ByteOrder::Big, vec![1, 2, 2], {
        [0i32, 1, 1, 0].iter().flat_map(|v| v.to_be_bytes()).collect()
    })
    .unwrap();
    let mut header = Header::new();
    header.push("SIMPLE", true);
    header.push("BITPIX", 32i64);
    (data, header)
}

fn catalog() -> Catalog {
    let text = "\
# SoFiA catalogue
#    name   v_app   f_sum
   \"J 1\"   100.0    12.5
      J2   200.0     3.0
";
    CatalogParser::new()
        .with_fields(["name", "v_app", "f_sum"])
        .parse_str(text, Path::new("galaxy_cat.txt"))
        .unwrap()
}

#[test]
fn test_layout_requires_cube() {
    let writer = ContainerWriter::new("out.hdf5", "out");
    match writer.layout().unwrap_err() {
        ConvertError::Configuration { message } => assert!(message.contains("no data cube")),
        other => panic!("Expected Configuration error, got {other:?}"),
    }
}

#[test]
fn test_cube_section_is_little_endian_with_attributes() {
    let (data, header) = cube();
    let mut writer = ContainerWriter::new("out.hdf5", "out");
    writer.attach_cube(data, header);

    let document = writer.layout().unwrap();
    assert_eq!(document.section_names(), vec!["0"]);

    let section = document.section("0").unwrap();
    assert_eq!(
        section.attributes.keys().collect::<Vec<_>>(),
        vec!["SIMPLE", "BITPIX", "BUNIT"]
    );
    assert_eq!(section.attributes.get("SIMPLE"), Some(&AttributeValue::Flag(1)));

    let dataset = section.dataset("DATA").unwrap();
    assert_eq!(dataset.shape(), vec![1, 2, 2]);
    match &dataset.data {
        DatasetData::Array(array) => {
            assert_eq!(array.byte_order(), ByteOrder::Little);
            assert_eq!(&array.bytes()[..4], &1.0f32.to_le_bytes());
            assert_eq!(array.samples::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        }
        other => panic!("Expected array dataset, got {other:?}"),
    }
}

#[test]
fn test_mask_and_catalogue_sections() {
    let (data, header) = cube();
    let (mask_data, mask_header) = mask();
    let mut writer = ContainerWriter::new("galaxy.hdf5", "galaxy");
    writer.attach_cube(data, header);
    writer.attach_mask(mask_data, mask_header);
    writer.attach_catalog(catalog(), CatalogType::Ascii, "galaxy_cat.txt");

    let document = writer.layout().unwrap();
    assert_eq!(document.section_names(), vec!["0", "1", "Catalogue"]);
    assert_eq!(document.section("1").unwrap().dataset_names(), vec!["MASK"]);

    let catalogue = document.section("Catalogue").unwrap();
    assert_eq!(
        catalogue.attributes.get("type"),
        Some(&AttributeValue::String("ASCII".to_string()))
    );
    assert_eq!(
        catalogue.attributes.get("name"),
        Some(&AttributeValue::String("galaxy_cat.txt".to_string()))
    );
    assert_eq!(
        catalogue.dataset_names(),
        vec!["Header", "name", "v_app", "f_sum"]
    );
    assert_eq!(
        catalogue.dataset("Header").unwrap().data,
        DatasetData::Strings(vec!["name".into(), "v_app".into(), "f_sum".into()])
    );
    assert_eq!(
        catalogue.dataset("name").unwrap().data,
        DatasetData::Strings(vec!["J_1".into(), "J2".into()])
    );
    assert_eq!(
        catalogue.dataset("v_app").unwrap().data,
        DatasetData::Strings(vec!["100.0".into(), "200.0".into()])
    );
}

#[test]
fn test_empty_catalogue_has_only_attributes() {
    let empty = CatalogParser::new()
        .with_fields(["name", "v_app"])
        .parse_str("#  name  v_app\n", Path::new("empty_cat.txt"))
        .unwrap();
    let (data, header) = cube();
    let mut writer = ContainerWriter::new("out.hdf5", "out");
    writer.attach_cube(data, header);
    writer.attach_catalog(empty, CatalogType::Ascii, "empty_cat.txt");

    let document = writer.layout().unwrap();
    let catalogue = document.section("Catalogue").unwrap();
    assert!(catalogue.datasets.is_empty());
    assert_eq!(catalogue.attributes.len(), 2);
}

#[test]
fn test_write_creates_file_without_leftovers() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("galaxy.hdf5");

    let (data, header) = cube();
    let mut writer = ContainerWriter::new(&path, "galaxy");
    writer.attach_cube(data, header);

    let document = writer.write(&JsonStore).unwrap();

    assert!(path.exists());
    assert_eq!(read_document(&path), document);
    let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_rewrite_replaces_previous_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("galaxy.hdf5");

    let (data, header) = cube();
    let (mask_data, mask_header) = mask();
    let mut first = ContainerWriter::new(&path, "galaxy");
    first.attach_cube(data.clone(), header.clone());
    first.attach_mask(mask_data, mask_header);
    first.attach_catalog(catalog(), CatalogType::Ascii, "galaxy_cat.txt");
    first.write(&JsonStore).unwrap();
    assert_eq!(read_document(&path).section_names(), vec!["0", "1", "Catalogue"]);

    let mut second = ContainerWriter::new(&path, "galaxy");
    second.attach_cube(data, header);
    second.write(&JsonStore).unwrap();
    let written = read_document(&path);
    assert_eq!(written.section_names(), vec!["0"]);

    // Same content twice gives the same layout
    second.write(&JsonStore).unwrap();
    assert_eq!(read_document(&path), written);
}

#[test]
fn test_failed_store_leaves_target_untouched() {
    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn store(&self, _document: &Document, path: &Path) -> Result<()> {
            Err(ConvertError::Container {
                path: path.to_path_buf(),
                reason: "disk full".to_string(),
            })
        }
    }

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("galaxy.hdf5");
    fs::write(&path, b"previous").unwrap();

    let (data, header) = cube();
    let mut writer = ContainerWriter::new(&path, "galaxy");
    writer.attach_cube(data, header);

    assert!(writer.write(&FailingStore).is_err());
    assert_eq!(fs::read(&path).unwrap(), b"previous");
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[cfg(feature = "hdf5")]
#[test]
fn test_hdf5_store_writes_groups_attributes_and_datasets() {
    use hdf5::types::VarLenUnicode;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("galaxy.hdf5");

    let (data, header) = cube();
    let (mask_data, mask_header) = mask();
    let mut writer = ContainerWriter::new(&path, "galaxy");
    writer.attach_cube(data, header);
    writer.attach_mask(mask_data, mask_header);
    writer.attach_catalog(catalog(), CatalogType::Ascii, "galaxy_cat.txt");
    writer.write(&Hdf5Store).unwrap();

    let file = hdf5::File::open(&path).unwrap();
    let mut groups = file.member_names().unwrap();
    groups.sort();
    assert_eq!(groups, vec!["0", "1", "Catalogue"]);

    let cube = file.group("0").unwrap();
    let simple = cube.attr("SIMPLE").unwrap();
    assert!(simple.dtype().unwrap().is::<u8>());
    assert_eq!(simple.read_scalar::<u8>().unwrap(), 1);
    assert!(!cube.attr_names().unwrap().contains(&"HISTORY".to_string()));
    let bunit: VarLenUnicode = cube.attr("BUNIT").unwrap().read_scalar().unwrap();
    assert_eq!(bunit.as_str(), "Jy/beam");

    let values = cube.dataset("DATA").unwrap();
    assert!(values.dtype().unwrap().is::<f32>());
    assert_eq!(values.shape(), vec![1, 2, 2]);
    assert_eq!(values.read_raw::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);

    let mask = file.group("1").unwrap().dataset("MASK").unwrap();
    assert_eq!(mask.read_raw::<i32>().unwrap(), vec![0, 1, 1, 0]);

    let catalogue = file.group("Catalogue").unwrap();
    let strings = |name: &str| -> Vec<String> {
        catalogue
            .dataset(name)
            .unwrap()
            .read_raw::<VarLenUnicode>()
            .unwrap()
            .iter()
            .map(|value| value.as_str().to_string())
            .collect()
    };
    assert_eq!(strings("Header"), vec!["name", "v_app", "f_sum"]);
    assert_eq!(strings("name"), vec!["J_1", "J2"]);
    assert_eq!(strings("v_app"), vec!["100.0", "200.0"]);
    assert_eq!(strings("f_sum"), vec!["12.5", "3.0"]);
}
