//! # pixfmt-image
//!
//! Images: a [`ColorModel`](pixfmt_color::ColorModel) bound to a compatible
//! [`WritableRaster`](pixfmt_raster::WritableRaster).
//!
//! # Overview
//!
//! - [`Image`] - validated pair with default-ARGB pixel access, aliasing
//!   sub-images and deep copies
//! - [`ImageType`] - canonical tags for the standard combinations, used to
//!   select specialized paths
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_image::{Image, ImageType};
//!
//! let src = Image::new(8, 8, ImageType::IntRgb)?;
//! src.set_rgb(3, 3, 0xff336699)?;
//!
//! let dst = Image::new(8, 8, ImageType::ThreeByteBgr)?;
//! src.copy_to(&dst)?;
//! assert_eq!(dst.rgb(3, 3)?, 0xff336699);
//! # Ok::<(), pixfmt_core::Error>(())
//! ```
//!
//! # Dependencies
//!
//! - `pixfmt-core` - errors, data types, rectangles
//! - `pixfmt-raster` - image storage
//! - `pixfmt-color` - pixel interpretation
//! - `tracing` - construction and bulk-copy events

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod image;
pub mod image_type;

pub use image::Image;
pub use image_type::ImageType;

/// Common imports.
pub mod prelude {
    pub use crate::image::Image;
    pub use crate::image_type::ImageType;
    pub use pixfmt_color::prelude::*;
    pub use pixfmt_core::prelude::*;
}
