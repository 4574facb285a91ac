//! Typed transfer arrays.
//!
//! [`DataElements`] is the "opaque per-pixel buffer" exchanged between
//! sample models and color models: the samples of one pixel (or a run of
//! pixels) in the model's transfer type. Packed sample models put a whole
//! pixel into a single element; component sample models use one element
//! per band.
//!
//! Integer accessors follow the storage conventions of [`DataType`]:
//! `Byte`/`UShort` widen without sign, `Short` sign-extends, floats truncate
//! toward zero. Narrowing writes keep the low bits.

use crate::error::{Error, Result};
use crate::format::DataType;

/// A typed array of primitive pixel elements.
#[derive(Debug, Clone, PartialEq)]
pub enum DataElements {
    /// Unsigned 8-bit elements.
    Byte(Vec<u8>),
    /// Unsigned 16-bit elements.
    UShort(Vec<u16>),
    /// Signed 16-bit elements.
    Short(Vec<i16>),
    /// 32-bit integer elements.
    Int(Vec<i32>),
    /// 32-bit float elements.
    Float(Vec<f32>),
    /// 64-bit float elements.
    Double(Vec<f64>),
}

macro_rules! each_vec {
    ($self:expr, $v:ident => $body:expr) => {
        match $self {
            DataElements::Byte($v) => $body,
            DataElements::UShort($v) => $body,
            DataElements::Short($v) => $body,
            DataElements::Int($v) => $body,
            DataElements::Float($v) => $body,
            DataElements::Double($v) => $body,
        }
    };
}

impl DataElements {
    /// Allocates `len` zeroed elements of `data_type`.
    pub fn new(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::Byte => Self::Byte(vec![0; len]),
            DataType::UShort => Self::UShort(vec![0; len]),
            DataType::Short => Self::Short(vec![0; len]),
            DataType::Int => Self::Int(vec![0; len]),
            DataType::Float => Self::Float(vec![0.0; len]),
            DataType::Double => Self::Double(vec![0.0; len]),
        }
    }

    /// Returns `reuse` if it has the right kind and at least `len` elements,
    /// otherwise allocates a new array.
    ///
    /// # Errors
    ///
    /// A `reuse` array of another kind is a [`Error::DataTypeMismatch`]; one
    /// that is too short is an [`Error::ArrayTooShort`].
    pub fn reuse(reuse: Option<DataElements>, data_type: DataType, len: usize) -> Result<Self> {
        match reuse {
            None => Ok(Self::new(data_type, len)),
            Some(elems) => {
                if elems.data_type() != data_type {
                    return Err(Error::type_mismatch(data_type, elems.data_type()));
                }
                Error::check_len(len, elems.len())?;
                Ok(elems)
            }
        }
    }

    /// Element kind.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Byte(_) => DataType::Byte,
            Self::UShort(_) => DataType::UShort,
            Self::Short(_) => DataType::Short,
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        each_vec!(self, v => v.len())
    }

    /// True if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails unless this array is of `data_type` and holds at least `len` elements.
    pub fn expect(&self, data_type: DataType, len: usize) -> Result<()> {
        if self.data_type() != data_type {
            return Err(Error::type_mismatch(data_type, self.data_type()));
        }
        Error::check_len(len, self.len())
    }

    /// Element `i` as an integer.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    #[inline]
    pub fn get_int(&self, i: usize) -> i32 {
        match self {
            Self::Byte(v) => v[i] as i32,
            Self::UShort(v) => v[i] as i32,
            Self::Short(v) => v[i] as i32,
            Self::Int(v) => v[i],
            Self::Float(v) => v[i] as i32,
            Self::Double(v) => v[i] as i32,
        }
    }

    /// Writes element `i` from an integer, keeping the low bits for narrow kinds.
    #[inline]
    pub fn set_int(&mut self, i: usize, value: i32) {
        match self {
            Self::Byte(v) => v[i] = value as u8,
            Self::UShort(v) => v[i] = value as u16,
            Self::Short(v) => v[i] = value as i16,
            Self::Int(v) => v[i] = value,
            Self::Float(v) => v[i] = value as f32,
            Self::Double(v) => v[i] = value as f64,
        }
    }

    /// Element `i` as `f32`.
    #[inline]
    pub fn get_f32(&self, i: usize) -> f32 {
        match self {
            Self::Float(v) => v[i],
            Self::Double(v) => v[i] as f32,
            _ => self.get_int(i) as f32,
        }
    }

    /// Writes element `i` from an `f32`; integer kinds truncate.
    #[inline]
    pub fn set_f32(&mut self, i: usize, value: f32) {
        match self {
            Self::Float(v) => v[i] = value,
            Self::Double(v) => v[i] = value as f64,
            _ => self.set_int(i, value as i32),
        }
    }

    /// Element `i` as `f64`.
    #[inline]
    pub fn get_f64(&self, i: usize) -> f64 {
        match self {
            Self::Float(v) => v[i] as f64,
            Self::Double(v) => v[i],
            _ => self.get_int(i) as f64,
        }
    }

    /// Writes element `i` from an `f64`; integer kinds truncate.
    #[inline]
    pub fn set_f64(&mut self, i: usize, value: f64) {
        match self {
            Self::Float(v) => v[i] = value as f32,
            Self::Double(v) => v[i] = value,
            _ => self.set_int(i, value as i32),
        }
    }

    /// Sets every element to zero.
    pub fn fill_zero(&mut self) {
        match self {
            Self::Byte(v) => v.fill(0),
            Self::UShort(v) => v.fill(0),
            Self::Short(v) => v.fill(0),
            Self::Int(v) => v.fill(0),
            Self::Float(v) => v.fill(0.0),
            Self::Double(v) => v.fill(0.0),
        }
    }

    /// Copies `count` elements starting at `src_start` out of `src` into
    /// `self` at `dst_start`. Both arrays must be of the same kind.
    pub fn copy_from(
        &mut self,
        dst_start: usize,
        src: &DataElements,
        src_start: usize,
        count: usize,
    ) -> Result<()> {
        Error::check_len(dst_start + count, self.len())?;
        Error::check_len(src_start + count, src.len())?;
        let (dst_range, src_range) = (dst_start..dst_start + count, src_start..src_start + count);
        match (self, src) {
            (Self::Byte(d), Self::Byte(s)) => d[dst_range].copy_from_slice(&s[src_range]),
            (Self::UShort(d), Self::UShort(s)) => d[dst_range].copy_from_slice(&s[src_range]),
            (Self::Short(d), Self::Short(s)) => d[dst_range].copy_from_slice(&s[src_range]),
            (Self::Int(d), Self::Int(s)) => d[dst_range].copy_from_slice(&s[src_range]),
            (Self::Float(d), Self::Float(s)) => d[dst_range].copy_from_slice(&s[src_range]),
            (Self::Double(d), Self::Double(s)) => d[dst_range].copy_from_slice(&s[src_range]),
            (d, s) => return Err(Error::type_mismatch(d.data_type(), s.data_type())),
        }
        Ok(())
    }

    /// Byte elements, if this is a `Byte` array.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Byte(v) => Some(v),
            _ => None,
        }
    }

    /// UShort elements, if this is a `UShort` array.
    pub fn as_ushorts(&self) -> Option<&[u16]> {
        match self {
            Self::UShort(v) => Some(v),
            _ => None,
        }
    }

    /// Short elements, if this is a `Short` array.
    pub fn as_shorts(&self) -> Option<&[i16]> {
        match self {
            Self::Short(v) => Some(v),
            _ => None,
        }
    }

    /// Int elements, if this is an `Int` array.
    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Float elements, if this is a `Float` array.
    pub fn as_floats(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Double elements, if this is a `Double` array.
    pub fn as_doubles(&self) -> Option<&[f64]> {
        match self {
            Self::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for DataElements {
    fn from(v: Vec<u8>) -> Self {
        Self::Byte(v)
    }
}

impl From<Vec<u16>> for DataElements {
    fn from(v: Vec<u16>) -> Self {
        Self::UShort(v)
    }
}

impl From<Vec<i16>> for DataElements {
    fn from(v: Vec<i16>) -> Self {
        Self::Short(v)
    }
}

impl From<Vec<i32>> for DataElements {
    fn from(v: Vec<i32>) -> Self {
        Self::Int(v)
    }
}

impl From<Vec<f32>> for DataElements {
    fn from(v: Vec<f32>) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<f64>> for DataElements {
    fn from(v: Vec<f64>) -> Self {
        Self::Double(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_conventions() {
        let mut e = DataElements::new(DataType::Byte, 2);
        e.set_int(0, 0x1ff);
        assert_eq!(e.get_int(0), 0xff);

        let mut s = DataElements::new(DataType::Short, 1);
        s.set_int(0, -5);
        assert_eq!(s.get_int(0), -5);

        let mut u = DataElements::new(DataType::UShort, 1);
        u.set_int(0, -1);
        assert_eq!(u.get_int(0), 0xffff);

        let f = DataElements::Float(vec![2.9]);
        assert_eq!(f.get_int(0), 2);
    }

    #[test]
    fn test_reuse() {
        let reused = DataElements::reuse(Some(DataElements::Byte(vec![7; 4])), DataType::Byte, 3).unwrap();
        assert_eq!(reused.as_bytes(), Some(&[7u8, 7, 7, 7][..]));

        let err = DataElements::reuse(Some(DataElements::Int(vec![0; 4])), DataType::Byte, 3).unwrap_err();
        assert!(matches!(err, Error::DataTypeMismatch { .. }));

        let err = DataElements::reuse(Some(DataElements::Byte(vec![0; 2])), DataType::Byte, 3).unwrap_err();
        assert!(matches!(err, Error::ArrayTooShort { expected: 3, got: 2 }));
    }

    #[test]
    fn test_copy_from() {
        let mut dst = DataElements::new(DataType::UShort, 4);
        let src = DataElements::UShort(vec![1, 2, 3]);
        dst.copy_from(1, &src, 1, 2).unwrap();
        assert_eq!(dst.as_ushorts(), Some(&[0u16, 2, 3, 0][..]));

        let other = DataElements::Int(vec![1]);
        assert!(dst.copy_from(0, &other, 0, 1).is_err());
    }
}
