//! Application constants for the SoFiA to HDF5 converter
//!
//! Fixed names of the output container layout, the parameter keys read from
//! the SoFiA input listing and the default catalogue column set.

// =============================================================================
// Container Layout
// =============================================================================

/// Section holding the data cube
pub const CUBE_SECTION: &str = "0";

/// Section holding the mask cube
pub const MASK_SECTION: &str = "1";

/// Section holding the source catalogue (British spelling is expected by viewers)
pub const CATALOGUE_SECTION: &str = "Catalogue";

/// Dataset name of the cube array inside the cube section
pub const CUBE_DATASET: &str = "DATA";

/// Dataset name of the mask array inside the mask section
pub const MASK_DATASET: &str = "MASK";

/// Dataset listing the catalogue field names
pub const CATALOGUE_HEADER_DATASET: &str = "Header";

/// Catalogue section attribute carrying the catalogue type
pub const CATALOGUE_TYPE_ATTRIBUTE: &str = "type";

/// Catalogue section attribute carrying the originating file name
pub const CATALOGUE_NAME_ATTRIBUTE: &str = "name";

/// Output file extension
pub const CONTAINER_EXTENSION: &str = "hdf5";

// =============================================================================
// Header Translation
// =============================================================================

/// Header keywords never stored as attributes; CARTA mishandles them
pub const EXCLUDED_HEADER_KEYS: &[&str] = &["HISTORY", "COMMENT"];

// =============================================================================
// Catalogue Columns
// =============================================================================

/// Placeholder velocity column in the requested field list
pub const VELOCITY_PLACEHOLDER: &str = "v_app";

/// Canonical alias under which the resolved velocity is exposed
pub const VELOCITY_ALIAS: &str = "v_sofia";

/// Column that keys the catalogue
pub const NAME_FIELD: &str = "name";

/// Fields read from a SoFiA catalogue when the caller does not ask for others
pub const DEFAULT_CATALOG_FIELDS: &[&str] = &[
    "id", "x", "x_min", "x_max", "y", "y_min", "y_max", "z", "z_min", "z_max", "ra", "dec",
    "v_app", "f_sum", "kin_pa", "w50", "err_f_sum", "err_x", "err_y", "err_z", "rms", "n_pix",
    "name",
];

// =============================================================================
// SoFiA Parameter Keys
// =============================================================================

/// Parameter keys that always exist after loading, unset when absent in the file
pub const REQUIRED_PARAMETER_KEYS: &[&str] = &[
    "output.writekarma",
    "output.directory",
    "output.filename",
    "output.writecatascii",
    "output.writecatxml",
    "output.writecatsql",
    "output.writenoise",
    "output.writefiltered",
    "output.writemask",
    "output.writemask2d",
    "output.writerawmask",
    "output.writemoments",
    "output.writecubelets",
    "output.writepv",
    "output.margincubelets",
    "output.thresholdmom12",
    "output.overwrite",
];

pub mod parameter_keys {
    pub const INPUT_DATA: &str = "input.data";
    pub const OUTPUT_DIRECTORY: &str = "output.directory";
    pub const OUTPUT_FILENAME: &str = "output.filename";
    pub const WRITE_KARMA: &str = "output.writekarma";
    pub const WRITE_CAT_ASCII: &str = "output.writecatascii";
    pub const WRITE_CAT_XML: &str = "output.writecatxml";
    pub const WRITE_CAT_SQL: &str = "output.writecatsql";
    pub const WRITE_MASK: &str = "output.writemask";
    pub const WRITE_MASK_2D: &str = "output.writemask2d";
    pub const WRITE_RAW_MASK: &str = "output.writerawmask";
}

/// Example configuration file written by `--print-example`
pub const EXAMPLE_CONFIG_NAME: &str = "sofia2hdf5.yml";
