//! Backing storage for rasters.
//!
//! A [`DataBuffer`] is a flat, typed, possibly multi-bank array of primitive
//! elements. Each bank has an offset; element indices passed to the
//! accessors are relative to it. All banks expose the same logical size.
//!
//! Rasters never own a buffer directly. They hold a [`SharedDataBuffer`], a
//! reference-counted handle, so that parent rasters, child views and images
//! built on the same storage all observe each other's writes. No copy on
//! write, no transactions: aliasing is the point.
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_core::{DataBuffer, DataType, SharedDataBuffer};
//!
//! let shared = SharedDataBuffer::new(DataBuffer::new(DataType::Byte, 16, 1));
//! let alias = shared.clone();
//!
//! shared.write().set_elem(0, 3, 200);
//! assert_eq!(alias.read().elem(0, 3), 200);
//! ```

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::elements::DataElements;
use crate::error::{Error, Result};
use crate::format::DataType;

#[derive(Debug, Clone, PartialEq)]
enum Banks {
    Byte(Vec<Vec<u8>>),
    UShort(Vec<Vec<u16>>),
    Short(Vec<Vec<i16>>),
    Int(Vec<Vec<i32>>),
    Float(Vec<Vec<f32>>),
    Double(Vec<Vec<f64>>),
}

macro_rules! each_bank {
    ($banks:expr, $b:ident => $body:expr) => {
        match $banks {
            Banks::Byte($b) => $body,
            Banks::UShort($b) => $body,
            Banks::Short($b) => $body,
            Banks::Int($b) => $body,
            Banks::Float($b) => $body,
            Banks::Double($b) => $body,
        }
    };
}

/// Typed multi-bank element storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBuffer {
    banks: Banks,
    size: usize,
    offsets: Vec<usize>,
}

impl DataBuffer {
    /// Allocates `num_banks` zeroed banks of `size` elements each.
    pub fn new(data_type: DataType, size: usize, num_banks: usize) -> Self {
        let n = num_banks.max(1);
        let banks = match data_type {
            DataType::Byte => Banks::Byte(vec![vec![0; size]; n]),
            DataType::UShort => Banks::UShort(vec![vec![0; size]; n]),
            DataType::Short => Banks::Short(vec![vec![0; size]; n]),
            DataType::Int => Banks::Int(vec![vec![0; size]; n]),
            DataType::Float => Banks::Float(vec![vec![0.0; size]; n]),
            DataType::Double => Banks::Double(vec![vec![0.0; size]; n]),
        };
        Self {
            banks,
            size,
            offsets: vec![0; n],
        }
    }

    /// Wraps one array as a single-bank buffer with offset 0.
    pub fn from_elements(elements: DataElements) -> Self {
        let size = elements.len();
        let banks = match elements {
            DataElements::Byte(v) => Banks::Byte(vec![v]),
            DataElements::UShort(v) => Banks::UShort(vec![v]),
            DataElements::Short(v) => Banks::Short(vec![v]),
            DataElements::Int(v) => Banks::Int(vec![v]),
            DataElements::Float(v) => Banks::Float(vec![v]),
            DataElements::Double(v) => Banks::Double(vec![v]),
        };
        Self {
            banks,
            size,
            offsets: vec![0],
        }
    }

    /// Builds a multi-bank buffer from arrays of one kind.
    ///
    /// The logical size is the shortest bank.
    pub fn from_banks(banks: Vec<DataElements>) -> Result<Self> {
        let Some(first) = banks.first() else {
            return Err(Error::invalid_argument("data buffer needs at least one bank"));
        };
        let data_type = first.data_type();
        let size = banks.iter().map(DataElements::len).min().unwrap_or(0);
        let n = banks.len();

        macro_rules! collect {
            ($variant:ident) => {{
                let mut out = Vec::with_capacity(n);
                for bank in banks {
                    match bank {
                        DataElements::$variant(v) => out.push(v),
                        other => return Err(Error::type_mismatch(data_type, other.data_type())),
                    }
                }
                Banks::$variant(out)
            }};
        }

        let banks = match data_type {
            DataType::Byte => collect!(Byte),
            DataType::UShort => collect!(UShort),
            DataType::Short => collect!(Short),
            DataType::Int => collect!(Int),
            DataType::Float => collect!(Float),
            DataType::Double => collect!(Double),
        };
        Ok(Self {
            banks,
            size,
            offsets: vec![0; n],
        })
    }

    /// Sets per-bank offsets, shrinking the logical size so that
    /// `offset + size` fits in every bank.
    pub fn with_offsets(mut self, offsets: &[usize]) -> Result<Self> {
        if offsets.len() != self.num_banks() {
            return Err(Error::invalid_argument(format!(
                "expected {} bank offset(s), got {}",
                self.num_banks(),
                offsets.len()
            )));
        }
        let lens: Vec<usize> = each_bank!(&self.banks, b => b.iter().map(Vec::len).collect());
        let mut size = usize::MAX;
        for (len, &off) in lens.iter().zip(offsets) {
            if off > *len {
                return Err(Error::invalid_argument(format!(
                    "bank offset {off} exceeds bank length {len}"
                )));
            }
            size = size.min(len - off);
        }
        self.size = size;
        self.offsets = offsets.to_vec();
        Ok(self)
    }

    /// Element kind.
    pub fn data_type(&self) -> DataType {
        match self.banks {
            Banks::Byte(_) => DataType::Byte,
            Banks::UShort(_) => DataType::UShort,
            Banks::Short(_) => DataType::Short,
            Banks::Int(_) => DataType::Int,
            Banks::Float(_) => DataType::Float,
            Banks::Double(_) => DataType::Double,
        }
    }

    /// Logical number of elements per bank.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of banks.
    pub fn num_banks(&self) -> usize {
        self.offsets.len()
    }

    /// Offset of `bank`.
    pub fn offset(&self, bank: usize) -> usize {
        self.offsets[bank]
    }

    /// All bank offsets.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Element `i` of `bank` as an integer.
    ///
    /// # Panics
    ///
    /// Panics if `bank` or `i + offset(bank)` is out of range.
    #[inline]
    pub fn elem(&self, bank: usize, i: usize) -> i32 {
        let i = i + self.offsets[bank];
        match &self.banks {
            Banks::Byte(b) => b[bank][i] as i32,
            Banks::UShort(b) => b[bank][i] as i32,
            Banks::Short(b) => b[bank][i] as i32,
            Banks::Int(b) => b[bank][i],
            Banks::Float(b) => b[bank][i] as i32,
            Banks::Double(b) => b[bank][i] as i32,
        }
    }

    /// Writes element `i` of `bank`, keeping the low bits for narrow kinds.
    #[inline]
    pub fn set_elem(&mut self, bank: usize, i: usize, value: i32) {
        let i = i + self.offsets[bank];
        match &mut self.banks {
            Banks::Byte(b) => b[bank][i] = value as u8,
            Banks::UShort(b) => b[bank][i] = value as u16,
            Banks::Short(b) => b[bank][i] = value as i16,
            Banks::Int(b) => b[bank][i] = value,
            Banks::Float(b) => b[bank][i] = value as f32,
            Banks::Double(b) => b[bank][i] = value as f64,
        }
    }

    /// Element `i` of `bank` as `f32`.
    #[inline]
    pub fn elem_f32(&self, bank: usize, i: usize) -> f32 {
        let j = i + self.offsets[bank];
        match &self.banks {
            Banks::Float(b) => b[bank][j],
            Banks::Double(b) => b[bank][j] as f32,
            _ => self.elem(bank, i) as f32,
        }
    }

    /// Writes element `i` of `bank` from an `f32`; integer kinds truncate.
    #[inline]
    pub fn set_elem_f32(&mut self, bank: usize, i: usize, value: f32) {
        let j = i + self.offsets[bank];
        match &mut self.banks {
            Banks::Float(b) => b[bank][j] = value,
            Banks::Double(b) => b[bank][j] = value as f64,
            _ => self.set_elem(bank, i, value as i32),
        }
    }

    /// Element `i` of `bank` as `f64`.
    #[inline]
    pub fn elem_f64(&self, bank: usize, i: usize) -> f64 {
        let j = i + self.offsets[bank];
        match &self.banks {
            Banks::Float(b) => b[bank][j] as f64,
            Banks::Double(b) => b[bank][j],
            _ => self.elem(bank, i) as f64,
        }
    }

    /// Writes element `i` of `bank` from an `f64`; integer kinds truncate.
    #[inline]
    pub fn set_elem_f64(&mut self, bank: usize, i: usize, value: f64) {
        let j = i + self.offsets[bank];
        match &mut self.banks {
            Banks::Float(b) => b[bank][j] = value as f32,
            Banks::Double(b) => b[bank][j] = value,
            _ => self.set_elem(bank, i, value as i32),
        }
    }

    /// Copies the logical contents of `bank` into a transfer array.
    pub fn bank_elements(&self, bank: usize) -> DataElements {
        let range = self.offsets[bank]..self.offsets[bank] + self.size;
        match &self.banks {
            Banks::Byte(b) => DataElements::Byte(b[bank][range].to_vec()),
            Banks::UShort(b) => DataElements::UShort(b[bank][range].to_vec()),
            Banks::Short(b) => DataElements::Short(b[bank][range].to_vec()),
            Banks::Int(b) => DataElements::Int(b[bank][range].to_vec()),
            Banks::Float(b) => DataElements::Float(b[bank][range].to_vec()),
            Banks::Double(b) => DataElements::Double(b[bank][range].to_vec()),
        }
    }
}

/// Reference-counted, lock-protected [`DataBuffer`] shared by raster views.
///
/// Cloning the handle aliases the storage; use [`deep_clone`](Self::deep_clone)
/// for an independent copy. Lock poisoning is ignored: a panic in another
/// thread cannot leave elements torn, only partially updated.
#[derive(Debug, Clone)]
pub struct SharedDataBuffer(Arc<RwLock<DataBuffer>>);

impl SharedDataBuffer {
    /// Wraps a buffer.
    pub fn new(buffer: DataBuffer) -> Self {
        Self(Arc::new(RwLock::new(buffer)))
    }

    /// Shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, DataBuffer> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, DataBuffer> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// True if both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copies the storage into a new, unaliased handle.
    pub fn deep_clone(&self) -> Self {
        Self::new(self.read().clone())
    }

    /// Element kind of the shared buffer.
    pub fn data_type(&self) -> DataType {
        self.read().data_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_access() {
        let mut buf = DataBuffer::new(DataType::UShort, 8, 3);
        assert_eq!(buf.num_banks(), 3);
        assert_eq!(buf.size(), 8);
        buf.set_elem(2, 7, 0x1_2345);
        assert_eq!(buf.elem(2, 7), 0x2345);
        assert_eq!(buf.elem(1, 7), 0);
    }

    #[test]
    fn test_offsets() {
        let buf = DataBuffer::from_elements(DataElements::Byte(vec![1, 2, 3, 4, 5]))
            .with_offsets(&[2])
            .unwrap();
        assert_eq!(buf.size(), 3);
        assert_eq!(buf.elem(0, 0), 3);
        assert_eq!(buf.bank_elements(0), DataElements::Byte(vec![3, 4, 5]));
        assert!(DataBuffer::new(DataType::Byte, 4, 1).with_offsets(&[5]).is_err());
    }

    #[test]
    fn test_float_access() {
        let mut buf = DataBuffer::new(DataType::Float, 2, 1);
        buf.set_elem_f32(0, 1, 0.25);
        assert_eq!(buf.elem_f64(0, 1), 0.25);
        assert_eq!(buf.elem(0, 1), 0);
    }

    #[test]
    fn test_from_banks_rejects_mixed_kinds() {
        let err = DataBuffer::from_banks(vec![
            DataElements::Byte(vec![0; 4]),
            DataElements::Int(vec![0; 4]),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DataTypeMismatch { .. }));

        let ok = DataBuffer::from_banks(vec![
            DataElements::Short(vec![0; 4]),
            DataElements::Short(vec![0; 6]),
        ])
        .unwrap();
        assert_eq!(ok.size(), 4);
        assert_eq!(ok.num_banks(), 2);
    }

    #[test]
    fn test_shared_aliasing() {
        let a = SharedDataBuffer::new(DataBuffer::new(DataType::Int, 4, 1));
        let b = a.clone();
        let c = a.deep_clone();
        a.write().set_elem(0, 0, 42);
        assert_eq!(b.read().elem(0, 0), 42);
        assert_eq!(c.read().elem(0, 0), 0);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
