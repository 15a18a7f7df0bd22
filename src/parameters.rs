//! SoFiA parameter file reader.
//!
//! SoFiA writes its run configuration as `key = value` lines. Keys are
//! case-insensitive and stored lower-cased. A fixed set of output keys is
//! always present after loading so that presence checks never fail; keys
//! missing from the file hold [`ParameterValue::Unset`].

use crate::constants::REQUIRED_PARAMETER_KEYS;
use crate::error::{ConvertError, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Value of one SoFiA parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Text(String),
    /// Required key that the file did not mention
    Unset,
}

/// Parsed SoFiA parameter listing, immutable once loaded
#[derive(Debug, Clone, Default)]
pub struct ParameterMap {
    values: HashMap<String, ParameterValue>,
}

impl ParameterMap {
    /// Load a parameter file from disk
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConvertError::configuration(format!(
                "SoFiA parameter file not found: {}",
                path.display()
            )));
        }

        let file = File::open(path).map_err(ConvertError::Io)?;
        let reader = BufReader::new(file);
        let lines = reader
            .lines()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(ConvertError::Io)?;

        let parameters = Self::parse_lines(lines.iter().map(String::as_str));
        debug!(
            "Loaded {} parameters from {}",
            parameters.values.len(),
            path.display()
        );
        Ok(parameters)
    }

    /// Parse parameter text
    pub fn parse(text: &str) -> Self {
        Self::parse_lines(text.lines())
    }

    fn parse_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values = HashMap::new();

        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                debug!("Ignoring parameter line without '=': {}", trimmed);
                continue;
            };

            let key = key.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            values.insert(key, ParameterValue::Text(value.trim().to_string()));
        }

        for key in REQUIRED_PARAMETER_KEYS {
            values
                .entry(key.to_string())
                .or_insert(ParameterValue::Unset);
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(&key.to_lowercase())
    }

    /// Text of a parameter; unset and empty values yield `None`
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ParameterValue::Text(value) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    /// Interpret a parameter as a switch: `true`, `yes`, `t` and `1` are on
    pub fn flag(&self, key: &str) -> bool {
        self.text(key).is_some_and(|value| {
            matches!(
                value.to_lowercase().as_str(),
                "true" | "yes" | "t" | "1"
            )
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LISTING: &str = "\
# SoFiA 2 parameter file
pipeline.verbose      =  false

input.data            =  cube.fits
Output.Directory      =
output.filename       =  galaxy
output.writeCatASCII  =  true
output.writeMask      =  FALSE
output.writeMoments   =  yes
scfind.kernelsXY      =  0, 3, 6
not a parameter line
";

    #[test]
    fn test_keys_lower_cased() {
        let parameters = ParameterMap::parse(LISTING);
        assert_eq!(parameters.text("input.data"), Some("cube.fits"));
        assert_eq!(parameters.text("output.writecatascii"), Some("true"));
        assert_eq!(parameters.text("OUTPUT.WRITECATASCII"), Some("true"));
        assert_eq!(parameters.text("scfind.kernelsxy"), Some("0, 3, 6"));
    }

    #[test]
    fn test_required_keys_default_to_unset() {
        let parameters = ParameterMap::parse(LISTING);
        for key in REQUIRED_PARAMETER_KEYS {
            assert!(parameters.contains_key(key), "missing {key}");
        }
        assert_eq!(
            parameters.get("output.writekarma"),
            Some(&ParameterValue::Unset)
        );
        assert!(!parameters.flag("output.writekarma"));
        assert!(!parameters.contains_key("output.unknown"));
    }

    #[test]
    fn test_flags() {
        let parameters = ParameterMap::parse(LISTING);
        assert!(parameters.flag("output.writecatascii"));
        assert!(parameters.flag("output.writemoments"));
        assert!(!parameters.flag("output.writemask"));
        assert!(!parameters.flag("pipeline.verbose"));
    }

    #[test]
    fn test_empty_value_reads_as_none() {
        let parameters = ParameterMap::parse(LISTING);
        assert_eq!(
            parameters.get("output.directory"),
            Some(&ParameterValue::Text(String::new()))
        );
        assert_eq!(parameters.text("output.directory"), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{LISTING}").unwrap();

        let parameters = ParameterMap::load(temp_file.path()).unwrap();
        assert_eq!(parameters.text("output.filename"), Some("galaxy"));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let result = ParameterMap::load(Path::new("/nonexistent/sofia.par"));
        assert!(matches!(result, Err(ConvertError::Configuration { .. })));
    }
}
