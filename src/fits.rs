//! Minimal FITS primary HDU reader.
//!
//! Reads the header cards and the raw data unit of the primary HDU, which is
//! where SoFiA puts both the input cube and its masks. Samples are kept in the
//! big-endian order FITS mandates; byte order is normalised when the container
//! layout is built.

use crate::array::{ByteOrder, DataArray, ElementType};
use crate::error::{ConvertError, Result};
use crate::header::{Header, HeaderValue};
use std::path::Path;
use tracing::{debug, info, warn};

pub const BLOCK_SIZE: usize = 2880;
pub const CARD_SIZE: usize = 80;

const MAX_AXES: i64 = 999;

/// Header and data of a FITS primary HDU
#[derive(Debug, Clone)]
pub struct FitsImage {
    pub header: Header,
    pub data: DataArray,
}

impl FitsImage {
    /// Read the primary HDU of a FITS file
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening FITS file '{}'", path.display());
        let bytes = std::fs::read(path).map_err(ConvertError::Io)?;
        Self::from_bytes(&bytes, path)
    }

    /// Decode an in-memory FITS file; `path` is only used in error messages
    pub fn from_bytes(bytes: &[u8], path: &Path) -> Result<Self> {
        let fail = |reason: String| ConvertError::Fits {
            path: path.to_path_buf(),
            reason,
        };

        let (header, data_offset) = read_header(bytes).map_err(fail)?;

        match header.get("SIMPLE") {
            Some(HeaderValue::Logical(true)) => {}
            _ => {
                return Err(fail(
                    "missing 'SIMPLE = T'; file does not appear to be a FITS file".to_string(),
                ));
            }
        }

        let bitpix = header
            .get("BITPIX")
            .and_then(HeaderValue::as_integer)
            .ok_or_else(|| fail("missing BITPIX keyword".to_string()))?;
        let element = ElementType::from_bitpix(bitpix)
            .ok_or_else(|| fail(format!("invalid BITPIX value {bitpix}")))?;

        let naxis = header
            .get("NAXIS")
            .and_then(HeaderValue::as_integer)
            .ok_or_else(|| fail("missing NAXIS keyword".to_string()))?;
        if !(1..=MAX_AXES).contains(&naxis) {
            return Err(fail(format!(
                "primary HDU has NAXIS = {naxis}; an image with 1 to {MAX_AXES} axes is required"
            )));
        }

        // FITS lists the fastest varying axis first; row-major order wants it last.
        let mut shape = Vec::with_capacity(naxis as usize);
        for axis in (1..=naxis).rev() {
            let key = format!("NAXIS{axis}");
            let length = header
                .get(&key)
                .and_then(HeaderValue::as_integer)
                .filter(|length| *length >= 0)
                .ok_or_else(|| fail(format!("missing or invalid {key} keyword")))?;
            shape.push(length as usize);
        }

        let data_size = shape
            .iter()
            .try_fold(element.size(), |total, &axis| total.checked_mul(axis))
            .ok_or_else(|| fail(format!("data unit of shape {shape:?} is too large")))?;
        let data_end = data_offset
            .checked_add(data_size)
            .ok_or_else(|| fail(format!("data unit of {data_size} bytes is too large")))?;
        let available = bytes.len().saturating_sub(data_offset);
        if bytes.len() < data_end {
            return Err(fail(format!(
                "data unit truncated: expected {data_size} bytes, found {available}"
            )));
        }

        check_scaling(&header, path);

        debug!(
            "FITS data: {} with shape {:?} ({} bytes)",
            element.name(),
            shape,
            data_size
        );

        let data = DataArray::new(
            element,
            ByteOrder::Big,
            shape,
            bytes[data_offset..data_end].to_vec(),
        )?;

        Ok(Self { header, data })
    }
}

/// Parse header blocks until `END`; returns the header and the data offset
fn read_header(bytes: &[u8]) -> std::result::Result<(Header, usize), String> {
    let mut header = Header::new();
    let mut offset = 0;

    loop {
        let block = bytes
            .get(offset..offset + BLOCK_SIZE)
            .ok_or_else(|| "file ended unexpectedly while reading header".to_string())?;
        offset += BLOCK_SIZE;

        for card in block.chunks_exact(CARD_SIZE) {
            if !card.is_ascii() {
                return Err("header contains non-ASCII characters".to_string());
            }
            // ASCII was checked above
            let card = std::str::from_utf8(card).map_err(|e| e.to_string())?;

            let keyword = card[..8].trim_end();
            if keyword == "END" {
                return Ok((header, offset));
            }
            if let Some(value) = parse_card(keyword, card) {
                header.push(keyword, value);
            }
        }
    }
}

/// Decode the value of one 80-character card
fn parse_card(keyword: &str, card: &str) -> Option<HeaderValue> {
    match keyword {
        "" => None,
        "COMMENT" | "HISTORY" => Some(HeaderValue::String(card[8..].trim_end().to_string())),
        _ if &card[8..10] == "= " => Some(parse_value(&card[10..])),
        _ => {
            debug!("Skipping header card without value indicator: {}", keyword);
            None
        }
    }
}

/// Decode the value field of a card (everything after `= `)
pub fn parse_value(field: &str) -> HeaderValue {
    let field = field.trim_start();

    if let Some(quoted) = field.strip_prefix('\'') {
        return HeaderValue::String(parse_quoted(quoted));
    }

    let value = field.split('/').next().unwrap_or_default().trim();

    match value {
        "" => HeaderValue::Undefined,
        "T" => HeaderValue::Logical(true),
        "F" => HeaderValue::Logical(false),
        _ => parse_number(value).unwrap_or_else(|| HeaderValue::String(value.to_string())),
    }
}

fn parse_number(value: &str) -> Option<HeaderValue> {
    if let Ok(integer) = value.parse::<i64>() {
        return Some(HeaderValue::Integer(integer));
    }
    if let Some(real) = parse_real(value) {
        return Some(HeaderValue::Real(real));
    }

    let inner = value.strip_prefix('(')?.strip_suffix(')')?;
    let (re, im) = inner.split_once(',')?;
    Some(HeaderValue::Complex(parse_real(re.trim())?, parse_real(im.trim())?))
}

fn parse_real(value: &str) -> Option<f64> {
    value.replace(['D', 'd'], "E").parse::<f64>().ok()
}

/// Read a quoted string body; `''` is an escaped quote, trailing blanks are insignificant
fn parse_quoted(body: &str) -> String {
    let mut text = String::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                text.push('\'');
                continue;
            }
            break;
        }
        text.push(c);
    }

    text.trim_end().to_string()
}

fn check_scaling(header: &Header, path: &Path) {
    let bscale = header
        .get("BSCALE")
        .and_then(HeaderValue::as_real)
        .unwrap_or(1.0);
    let bzero = header
        .get("BZERO")
        .and_then(HeaderValue::as_real)
        .unwrap_or(0.0);

    if bscale != 1.0 || bzero != 0.0 {
        warn!(
            "{} declares BSCALE = {} and BZERO = {}; samples are stored unscaled",
            path.display(),
            bscale,
            bzero
        );
    }
}
