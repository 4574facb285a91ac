//! Error types shared by every pixfmt crate.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of the pixel-format layer:
//! - Construction-time validation (bit depths, array lengths, masks, geometry)
//! - Capability errors (an operation a color model does not support in its configuration)
//! - Bounds errors (coordinates or band indices outside a raster / sample model)
//! - Element-kind mismatches between transfer arrays and models
//!
//! Dividing by a zero alpha is never an error anywhere in the workspace: such
//! pixels produce zero color components.
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_core::{Error, Result};
//!
//! fn check_pixel(x: i32, y: i32, width: i32, height: i32) -> Result<()> {
//!     if x < 0 || y < 0 || x >= width || y >= height {
//!         return Err(Error::out_of_bounds(x, y, width, height));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_pixel(4, 0, 4, 4).unwrap_err().is_bounds_error());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - derive macro for the error implementation
//!
//! # Used By
//!
//! - `pixfmt-raster` - sample model and raster validation
//! - `pixfmt-color` - color model construction and capability checks
//! - `pixfmt-image` - image construction

use thiserror::Error;

use crate::format::DataType;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the pixel-format layer.
///
/// # Categories
///
/// - **Construction errors**: [`InvalidArgument`](Error::InvalidArgument),
///   [`RasterFormat`](Error::RasterFormat), [`Incompatible`](Error::Incompatible)
/// - **Capability errors**: [`Unsupported`](Error::Unsupported)
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds), [`InvalidBand`](Error::InvalidBand)
/// - **Array errors**: [`DataTypeMismatch`](Error::DataTypeMismatch), [`ArrayTooShort`](Error::ArrayTooShort)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Pixel coordinates are outside the addressed region.
    ///
    /// `x`/`y` are given in the coordinate space of whatever reported the
    /// error (raster space for rasters, zero-based for sample models).
    #[error("coordinate ({x}, {y}) out of bounds for {width}x{height} region")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i32,
        /// Y coordinate that was out of bounds
        y: i32,
        /// Region width
        width: i32,
        /// Region height
        height: i32,
    },

    /// Band index is not in `[0, num_bands)`.
    #[error("band {band} out of range for {num_bands} band(s)")]
    InvalidBand {
        /// Requested band
        band: usize,
        /// Number of bands available
        num_bands: usize,
    },

    /// Raster geometry is invalid: non-positive size, coordinate overflow,
    /// or a child region outside its parent.
    #[error("raster format: {0}")]
    RasterFormat(String),

    /// A constructor or operation received an invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A raster or sample model cannot be paired with a color model.
    #[error("incompatible: {0}")]
    Incompatible(String),

    /// The operation is not supported by this model configuration.
    ///
    /// The model itself is valid; the caller asked for the wrong operation
    /// (e.g. unnormalized components on a non-standard scale model).
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// A transfer array holds the wrong primitive element kind.
    #[error("data type mismatch: expected {expected}, got {got}")]
    DataTypeMismatch {
        /// Element kind the model works with
        expected: DataType,
        /// Element kind that was supplied
        got: DataType,
    },

    /// A caller supplied array is shorter than required.
    #[error("array too short: need {expected} element(s), got {got}")]
    ArrayTooShort {
        /// Required length
        expected: usize,
        /// Supplied length
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::OutOfBounds`].
    #[inline]
    pub fn out_of_bounds(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidBand`].
    #[inline]
    pub fn invalid_band(band: usize, num_bands: usize) -> Self {
        Self::InvalidBand { band, num_bands }
    }

    /// Creates an [`Error::RasterFormat`].
    pub fn raster_format(msg: impl Into<String>) -> Self {
        Self::RasterFormat(msg.into())
    }

    /// Creates an [`Error::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an [`Error::Incompatible`].
    pub fn incompatible(msg: impl Into<String>) -> Self {
        Self::Incompatible(msg.into())
    }

    /// Creates an [`Error::Unsupported`].
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Creates an [`Error::DataTypeMismatch`].
    #[inline]
    pub fn type_mismatch(expected: DataType, got: DataType) -> Self {
        Self::DataTypeMismatch { expected, got }
    }

    /// Returns `Ok(())` if `got >= expected`, else [`Error::ArrayTooShort`].
    #[inline]
    pub fn check_len(expected: usize, got: usize) -> Result<()> {
        if got < expected {
            Err(Self::ArrayTooShort { expected, got })
        } else {
            Ok(())
        }
    }

    /// Returns true for coordinate and band errors.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::InvalidBand { .. })
    }

    /// Returns true for capability errors.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }

    /// Returns true for errors that prevent an object from being constructed.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::RasterFormat(_) | Self::Incompatible(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::out_of_bounds(100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("80x60"));

        let err = Error::unsupported("This ColorModel does not support the unnormalized form");
        assert!(err.to_string().contains("unnormalized"));

        let err = Error::type_mismatch(DataType::Byte, DataType::Float);
        assert_eq!(err.to_string(), "data type mismatch: expected byte, got float");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::out_of_bounds(0, 0, 0, 0).is_bounds_error());
        assert!(Error::invalid_band(3, 3).is_bounds_error());
        assert!(Error::unsupported("x").is_unsupported());
        assert!(Error::raster_format("x").is_construction_error());
        assert!(Error::incompatible("x").is_construction_error());
        assert!(!Error::unsupported("x").is_construction_error());
    }

    #[test]
    fn test_check_len() {
        assert!(Error::check_len(3, 3).is_ok());
        assert_eq!(
            Error::check_len(4, 3),
            Err(Error::ArrayTooShort {
                expected: 4,
                got: 3
            })
        );
    }
}
