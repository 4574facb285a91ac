//! # pixfmt-raster
//!
//! Sample models and rasters: where each sample of each pixel lives.
//!
//! # Overview
//!
//! - [`SampleModel`] - closed set of layouts (interleaved, banded,
//!   single-pixel packed, multi-pixel packed) sharing the [`SampleLayout`]
//!   accessors
//! - [`Raster`] / [`WritableRaster`] - positioned views binding a sample
//!   model to a [`SharedDataBuffer`](pixfmt_core::SharedDataBuffer);
//!   children alias their parent's storage
//! - [`factory`] - constructors for the common layouts
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_core::DataType;
//! use pixfmt_raster::factory;
//!
//! let raster = factory::packed(DataType::Int, 4, 4, &[0xff0000, 0xff00, 0xff], None)?;
//! raster.set_pixel(0, 0, &[10, 20, 30])?;
//! assert_eq!(raster.data_buffer().read().elem(0, 0), 0x000A141E);
//! # Ok::<(), pixfmt_core::Error>(())
//! ```
//!
//! # Dependencies
//!
//! - `pixfmt-core` - storage, element arrays, errors
//! - `tracing` - trace spans on bulk copies
//!
//! # Used By
//!
//! - `pixfmt-color` - compatibility checks and raster coercion
//! - `pixfmt-image` - image storage

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod factory;
pub mod raster;
pub mod sample_model;

pub use raster::{Raster, WritableRaster};
pub use sample_model::{
    mask_field, ComponentSampleModel, MultiPixelPackedSampleModel, SampleLayout, SampleModel,
    SinglePixelPackedSampleModel,
};
