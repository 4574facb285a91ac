//! # pixfmt-core
//!
//! Core types for the pixel-format layer.
//!
//! This crate provides the vocabulary shared by every other pixfmt crate:
//!
//! - [`DataType`] - primitive storage kinds (byte, ushort, short, int, float, double)
//! - [`DataElements`] - typed per-pixel transfer arrays
//! - [`DataBuffer`], [`SharedDataBuffer`] - multi-bank backing storage and its shared handle
//! - [`ColorSpace`] - the contract color models need from a color space, plus built-ins
//! - [`Transparency`] - opaque / bitmask / translucent classes
//! - [`Rect`] - integer rectangles in raster space
//! - [`Error`], [`Result`] - the workspace-wide error type
//! - [`config`] - process-wide settings
//!
//! ## Crate Structure
//!
//! ```text
//! pixfmt-core (this crate)
//!    ^
//!    |
//!    +-- pixfmt-lut (gamma and gray lookup tables)
//!    +-- pixfmt-raster (sample models, rasters)
//!    +-- pixfmt-color (component, direct and indexed color models)
//!    +-- pixfmt-image (images binding a raster to a color model)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod colorspace;
pub mod config;
pub mod elements;
pub mod error;
pub mod format;
pub mod rect;
pub mod transfer;
pub mod transparency;

// Re-exports for convenience
pub use buffer::{DataBuffer, SharedDataBuffer};
pub use colorspace::{BuiltinSpace, ColorSpace, ColorSpaceRef, ColorSpaceType};
pub use config::{settings, Settings};
pub use elements::DataElements;
pub use error::{Error, Result};
pub use format::{max_unsigned, DataType};
pub use rect::Rect;
pub use transparency::Transparency;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use pixfmt_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::{DataBuffer, SharedDataBuffer};
    pub use crate::colorspace::{
        BuiltinSpace, ColorSpace, ColorSpaceRef, ColorSpaceType, GraySpace,
    };
    pub use crate::elements::DataElements;
    pub use crate::error::{Error, Result};
    pub use crate::format::DataType;
    pub use crate::rect::Rect;
    pub use crate::transparency::Transparency;
}
