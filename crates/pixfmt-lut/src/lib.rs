//! # pixfmt-lut
//!
//! Lookup tables used by the color models' fast paths.
//!
//! # Table Families
//!
//! - [`gamma`] - linear RGB <-> sRGB tables at 8 and 16 bits, one set per process
//! - [`gray`] - per-color-space gray tables ([`GrayLuts`]), cached by space identity
//!
//! Every table is built lazily on first use. Two threads racing to build
//! the same table may both compute it; exactly one result is published and
//! readers never observe a partially filled table.
//!
//! # Dependencies
//!
//! - `pixfmt-core` - color space contract and sRGB curves
//! - [`tracing`] - table construction events
//!
//! # Used By
//!
//! - `pixfmt-color` - component and direct color models

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod gamma;
pub mod gray;

pub use gray::{gray_luts, GrayLuts};
