//! # pixfmt-color
//!
//! Color models: how the samples of one pixel map to color and alpha.
//!
//! # Overview
//!
//! | Model | Pixel | Notes |
//! |-------|-------|-------|
//! | [`ComponentColorModel`] | one sample per component | any color space and data type |
//! | [`DirectColorModel`] | bit fields of one integer | RGB spaces only |
//! | [`IndexColorModel`] | palette index | nearest-color search on encode |
//!
//! [`ColorModel`] is the closed union used by images. Every model converts
//! to and from 8-bit non-premultiplied sRGB ARGB (`0xAARRGGBB`), exposes
//! unnormalized and normalized components, and can rewrite a raster
//! between premultiplied and non-premultiplied alpha.
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_color::DirectColorModel;
//!
//! let rgb565 = DirectColorModel::new(16, 0xf800, 0x07e0, 0x001f, 0)?;
//! assert_eq!(rgb565.rgb(0xf800)?, 0xffff0000);
//! assert_eq!(rgb565.components(0xffff)?, vec![31, 63, 31]);
//! # Ok::<(), pixfmt_core::Error>(())
//! ```
//!
//! # Dependencies
//!
//! - `pixfmt-core` - color spaces, element arrays, errors, settings
//! - `pixfmt-lut` - gamma and gray tables for the fast paths
//! - `pixfmt-raster` - compatibility checks and raster coercion
//! - `tracing` - construction events
//!
//! # Used By
//!
//! - `pixfmt-image` - per-image color interpretation

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod component;
pub mod direct;
pub mod index;
pub mod model;

pub use component::ComponentColorModel;
pub use direct::DirectColorModel;
pub use index::{IndexColorModel, ValidBits};
pub use model::{ColorModel, ModelInfo};

/// Common imports.
pub mod prelude {
    pub use crate::component::ComponentColorModel;
    pub use crate::direct::DirectColorModel;
    pub use crate::index::{IndexColorModel, ValidBits};
    pub use crate::model::{ColorModel, ModelInfo};
}
