//! Primitive storage kinds for pixel samples.
//!
//! Every data buffer, sample model and color model is parameterized by one
//! [`DataType`]. The same enum doubles as the *transfer type*: the element
//! kind used to move one pixel's samples around as an array.
//!
//! | Variant | Storage | Bits | Component semantics |
//! |---------|---------|------|---------------------|
//! | `Byte` | `u8` | 8 | unsigned, any bit width up to 8 |
//! | `UShort` | `u16` | 16 | unsigned, any bit width up to 16 |
//! | `Short` | `i16` | 16 | signed, full range maps to `0..=32767` |
//! | `Int` | `i32` | 32 | unsigned, any bit width up to 32 |
//! | `Float` | `f32` | 32 | normalized value stored directly |
//! | `Double` | `f64` | 64 | normalized value stored directly |

use std::fmt;

/// Primitive element kind of a data buffer or transfer array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Unsigned 8-bit.
    Byte,
    /// Unsigned 16-bit.
    UShort,
    /// Signed 16-bit.
    Short,
    /// 32-bit integer, treated as unsigned by color models.
    Int,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
}

impl DataType {
    /// All data types in declaration order.
    pub const ALL: [DataType; 6] = [
        Self::Byte,
        Self::UShort,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::Double,
    ];

    /// Size of one element in bits.
    #[inline]
    pub const fn size_bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::UShort | Self::Short => 16,
            Self::Int | Self::Float => 32,
            Self::Double => 64,
        }
    }

    /// Size of one element in bytes.
    #[inline]
    pub const fn size_bytes(self) -> usize {
        (self.size_bits() / 8) as usize
    }

    /// True for `Byte`, `UShort` and `Int`: the kinds that support
    /// arbitrary per-component bit widths and unnormalized access.
    #[inline]
    pub const fn is_unsigned_integral(self) -> bool {
        matches!(self, Self::Byte | Self::UShort | Self::Int)
    }

    /// True for `Short`, `Float` and `Double`, which color models only
    /// handle in normalized form.
    #[inline]
    pub const fn is_signed(self) -> bool {
        !self.is_unsigned_integral()
    }

    /// True for `Float` and `Double`.
    #[inline]
    pub const fn is_floating_point(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }

    /// Smallest unsigned kind that can hold a `bits`-wide pixel.
    ///
    /// ```rust
    /// use pixfmt_core::DataType;
    ///
    /// assert_eq!(DataType::for_pixel_bits(4), Some(DataType::Byte));
    /// assert_eq!(DataType::for_pixel_bits(15), Some(DataType::UShort));
    /// assert_eq!(DataType::for_pixel_bits(24), Some(DataType::Int));
    /// assert_eq!(DataType::for_pixel_bits(33), None);
    /// ```
    pub const fn for_pixel_bits(bits: u32) -> Option<DataType> {
        match bits {
            0..=8 => Some(Self::Byte),
            9..=16 => Some(Self::UShort),
            17..=32 => Some(Self::Int),
            _ => None,
        }
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::UShort => "ushort",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Largest unsigned value representable in `bits` bits (`2^bits - 1`).
///
/// Saturates at `u32::MAX` for 32 bits and above.
#[inline]
pub const fn max_unsigned(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(DataType::Byte.size_bits(), 8);
        assert_eq!(DataType::Short.size_bytes(), 2);
        assert_eq!(DataType::Double.size_bytes(), 8);
    }

    #[test]
    fn test_signedness() {
        let unsigned: Vec<_> = DataType::ALL
            .iter()
            .filter(|t| t.is_unsigned_integral())
            .collect();
        assert_eq!(unsigned, [&DataType::Byte, &DataType::UShort, &DataType::Int]);
        assert!(DataType::Short.is_signed());
        assert!(!DataType::Short.is_floating_point());
    }

    #[test]
    fn test_max_unsigned() {
        assert_eq!(max_unsigned(1), 1);
        assert_eq!(max_unsigned(8), 255);
        assert_eq!(max_unsigned(31), 0x7fff_ffff);
        assert_eq!(max_unsigned(32), u32::MAX);
    }
}
