//! FITS header entries and their translation into container attributes.
//!
//! Header values are a closed set of kinds. String, logical and numeric
//! values become attributes; logicals are stored as unsigned bytes because
//! HDF5 has no boolean type. `HISTORY` and `COMMENT` cards are never stored
//! since CARTA mishandles them as attributes.

use crate::constants::EXCLUDED_HEADER_KEYS;
use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Value of a single header card
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    String(String),
    Logical(bool),
    Integer(i64),
    Real(f64),
    Complex(f64, f64),
    /// Keyword present with an empty value field
    Undefined,
}

impl HeaderValue {
    pub fn kind(&self) -> &'static str {
        match self {
            HeaderValue::String(_) => "string",
            HeaderValue::Logical(_) => "logical",
            HeaderValue::Integer(_) => "integer",
            HeaderValue::Real(_) => "real",
            HeaderValue::Complex(_, _) => "complex",
            HeaderValue::Undefined => "undefined",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            HeaderValue::Integer(value) => Some(*value),
            HeaderValue::Real(value) if value.fract() == 0.0 => Some(*value as i64),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            HeaderValue::Integer(value) => Some(*value as f64),
            HeaderValue::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_logical(&self) -> Option<bool> {
        match self {
            HeaderValue::Logical(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(value: &str) -> Self {
        HeaderValue::String(value.to_string())
    }
}

impl From<bool> for HeaderValue {
    fn from(value: bool) -> Self {
        HeaderValue::Logical(value)
    }
}

impl From<i64> for HeaderValue {
    fn from(value: i64) -> Self {
        HeaderValue::Integer(value)
    }
}

impl From<f64> for HeaderValue {
    fn from(value: f64) -> Self {
        HeaderValue::Real(value)
    }
}

/// Ordered header cards as read from a FITS HDU
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    entries: Vec<(String, HeaderValue)>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<HeaderValue>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value recorded under `key`
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<HeaderValue>> FromIterator<(K, V)> for Header {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut header = Header::new();
        for (key, value) in iter {
            header.push(key, value);
        }
        header
    }
}

/// Typed value of a container attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    String(String),
    /// Unsigned byte standing in for a boolean (1 = true, 0 = false)
    Flag(u8),
    Integer(i64),
    Real(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(value) => write!(f, "'{value}'"),
            AttributeValue::Flag(value) => write!(f, "{value}u8"),
            AttributeValue::Integer(value) => write!(f, "{value}"),
            AttributeValue::Real(value) => write!(f, "{value}"),
        }
    }
}

/// Ordered, uniquely keyed attributes of one container section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSet {
    entries: Vec<(String, AttributeValue)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute; an existing key keeps its position and takes the new value
    pub fn insert(&mut self, key: impl Into<String>, value: AttributeValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Translate header cards into section attributes, preserving header order
pub fn translate_header(header: &Header) -> Result<AttributeSet> {
    let mut attributes = AttributeSet::new();
    let mut dropped = 0usize;

    for (key, value) in header.iter() {
        if EXCLUDED_HEADER_KEYS.contains(&key) {
            dropped += 1;
            continue;
        }

        let attribute = match value {
            HeaderValue::String(text) => AttributeValue::String(text.clone()),
            HeaderValue::Logical(flag) => AttributeValue::Flag(u8::from(*flag)),
            HeaderValue::Integer(number) => AttributeValue::Integer(*number),
            HeaderValue::Real(number) => AttributeValue::Real(*number),
            HeaderValue::Complex(_, _) | HeaderValue::Undefined => {
                return Err(ConvertError::UnsupportedHeaderValue {
                    key: key.to_string(),
                    kind: value.kind(),
                });
            }
        };
        attributes.insert(key, attribute);
    }

    debug!(
        "Translated {} header cards into {} attributes ({} HISTORY/COMMENT cards dropped)",
        header.len(),
        attributes.len(),
        dropped
    );

    Ok(attributes)
}
