//! Raw n-dimensional sample arrays.
//!
//! Cube and mask data are carried as raw bytes plus an element type, shape
//! and byte order. FITS stores big-endian samples; the container always
//! receives little-endian ones, so conversion happens once when the document
//! layout is built.

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};

/// Sample types a FITS image can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    U8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl ElementType {
    /// Map a FITS `BITPIX` value to an element type
    pub fn from_bitpix(bitpix: i64) -> Option<Self> {
        match bitpix {
            8 => Some(ElementType::U8),
            16 => Some(ElementType::I16),
            32 => Some(ElementType::I32),
            64 => Some(ElementType::I64),
            -32 => Some(ElementType::F32),
            -64 => Some(ElementType::F64),
            _ => None,
        }
    }

    /// Size of one sample in bytes
    pub fn size(&self) -> usize {
        match self {
            ElementType::U8 => 1,
            ElementType::I16 => 2,
            ElementType::I32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::F64 => 8,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::I16 => "int16",
            ElementType::I32 => "int32",
            ElementType::I64 => "int64",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::Big
        } else {
            ByteOrder::Little
        }
    }
}

/// Sample data with explicit type, row-major shape and byte order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataArray {
    element: ElementType,
    byte_order: ByteOrder,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

impl DataArray {
    /// Wrap raw sample bytes, checking they match the shape
    pub fn new(
        element: ElementType,
        byte_order: ByteOrder,
        shape: Vec<usize>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let expected = shape
            .iter()
            .try_fold(element.size(), |total, &axis| total.checked_mul(axis))
            .ok_or_else(|| ConvertError::InvalidArray {
                reason: format!("shape {shape:?} overflows the addressable size"),
            })?;

        if bytes.len() != expected {
            return Err(ConvertError::InvalidArray {
                reason: format!(
                    "shape {:?} of {} needs {} bytes, got {}",
                    shape,
                    element.name(),
                    expected,
                    bytes.len()
                ),
            });
        }

        Ok(Self {
            element,
            byte_order,
            shape,
            bytes,
        })
    }

    pub fn element(&self) -> ElementType {
        self.element
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.bytes.len() / self.element.size()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Same samples in little-endian order, whatever the source order was
    pub fn to_little_endian(&self) -> DataArray {
        let mut bytes = self.bytes.clone();
        if self.byte_order == ByteOrder::Big && self.element.size() > 1 {
            for sample in bytes.chunks_exact_mut(self.element.size()) {
                sample.reverse();
            }
        }

        DataArray {
            element: self.element,
            byte_order: ByteOrder::Little,
            shape: self.shape.clone(),
            bytes,
        }
    }

    /// Decode samples into native values, honouring the stored byte order
    pub fn samples<T: Sample>(&self) -> Result<Vec<T>> {
        if T::ELEMENT != self.element {
            return Err(ConvertError::InvalidArray {
                reason: format!(
                    "cannot read {} samples as {}",
                    self.element.name(),
                    T::ELEMENT.name()
                ),
            });
        }

        Ok(self
            .bytes
            .chunks_exact(self.element.size())
            .map(|chunk| T::decode(chunk, self.byte_order))
            .collect())
    }
}

/// Native sample types a [`DataArray`] can be decoded into
pub trait Sample: Copy {
    const ELEMENT: ElementType;

    fn decode(bytes: &[u8], order: ByteOrder) -> Self;
}

macro_rules! impl_sample {
    ($ty:ty, $element:expr) => {
        impl Sample for $ty {
            const ELEMENT: ElementType = $element;

            fn decode(bytes: &[u8], order: ByteOrder) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                match order {
                    ByteOrder::Big => <$ty>::from_be_bytes(raw),
                    ByteOrder::Little => <$ty>::from_le_bytes(raw),
                }
            }
        }
    };
}

impl_sample!(u8, ElementType::U8);
impl_sample!(i16, ElementType::I16);
impl_sample!(i32, ElementType::I32);
impl_sample!(i64, ElementType::I64);
impl_sample!(f32, ElementType::F32);
impl_sample!(f64, ElementType::F64);
