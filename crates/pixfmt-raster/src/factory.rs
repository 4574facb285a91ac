//! Raster factories for the common layouts.
//!
//! Every factory allocates fresh zeroed storage unless a buffer is passed
//! in, and places the raster at `origin` (default `(0, 0)`).
//!
//! | Factory | Layout |
//! |---------|--------|
//! | [`interleaved`] / [`interleaved_with`] | pixel-interleaved, one bank |
//! | [`banded`] / [`banded_with`] | one bank per band |
//! | [`packed`] | one pixel per element, bands as bitfields |
//! | [`packed_bits`] | equal-width bitfields, or sub-element pixels for one band |
//! | [`writable`] / [`read_only`] | any sample model |

use pixfmt_core::{DataBuffer, DataType, Error, Result, SharedDataBuffer};
use tracing::trace;

use crate::raster::{Raster, WritableRaster};
use crate::sample_model::{
    check_dimensions, ComponentSampleModel, MultiPixelPackedSampleModel, SampleLayout, SampleModel,
    SinglePixelPackedSampleModel,
};

fn check_origin(width: i32, height: i32, origin: (i32, i32)) -> Result<()> {
    check_dimensions(width, height)?;
    if origin.0 as i64 + width as i64 > i32::MAX as i64 || origin.1 as i64 + height as i64 > i32::MAX as i64 {
        return Err(Error::raster_format(format!(
            "origin ({}, {}) plus size {width}x{height} overflows",
            origin.0, origin.1
        )));
    }
    Ok(())
}

fn check_interleaved_type(data_type: DataType) -> Result<()> {
    match data_type {
        DataType::Byte | DataType::UShort => Ok(()),
        other => Err(Error::invalid_argument(format!("unsupported data type {other}"))),
    }
}

/// A pixel-interleaved byte or ushort raster with `bands` samples per pixel
/// in band order.
pub fn interleaved(
    data_type: DataType,
    width: i32,
    height: i32,
    bands: usize,
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    if bands == 0 {
        return Err(Error::invalid_argument("number of bands must be greater than 0"));
    }
    check_dimensions(width, height)?;
    let scanline = (width as usize)
        .checked_mul(bands)
        .filter(|&s| s <= i32::MAX as usize)
        .ok_or_else(|| Error::invalid_argument(format!("width ({width}) times bands ({bands}) is too large")))?;
    interleaved_with(data_type, width, height, scanline, bands, (0..bands).collect(), origin)
}

/// A pixel-interleaved byte or ushort raster with explicit strides and band offsets.
pub fn interleaved_with(
    data_type: DataType,
    width: i32,
    height: i32,
    scanline_stride: usize,
    pixel_stride: usize,
    band_offsets: Vec<usize>,
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    check_interleaved_type(data_type)?;
    let origin = origin.unwrap_or((0, 0));
    check_origin(width, height, origin)?;
    let sm = ComponentSampleModel::pixel_interleaved(
        data_type,
        width,
        height,
        pixel_stride,
        scanline_stride,
        band_offsets,
    )?;
    writable(SampleModel::Interleaved(sm), None, Some(origin))
}

/// A banded raster with one bank per band.
pub fn banded(
    data_type: DataType,
    width: i32,
    height: i32,
    bands: usize,
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    if bands == 0 {
        return Err(Error::invalid_argument("number of bands must be greater than 0"));
    }
    banded_with(data_type, width, height, width.max(0) as usize, (0..bands).collect(), vec![0; bands], origin)
}

/// A banded raster with explicit banks and offsets.
pub fn banded_with(
    data_type: DataType,
    width: i32,
    height: i32,
    scanline_stride: usize,
    bank_indices: Vec<usize>,
    band_offsets: Vec<usize>,
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    match data_type {
        DataType::Byte | DataType::UShort | DataType::Int => {}
        other => return Err(Error::invalid_argument(format!("unsupported data type {other}"))),
    }
    let origin = origin.unwrap_or((0, 0));
    check_origin(width, height, origin)?;
    let sm = ComponentSampleModel::banded(data_type, width, height, scanline_stride, bank_indices, band_offsets)?;
    writable(SampleModel::Banded(sm), None, Some(origin))
}

/// A single-pixel-packed raster with one band per mask.
pub fn packed(
    data_type: DataType,
    width: i32,
    height: i32,
    masks: &[u32],
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    let origin = origin.unwrap_or((0, 0));
    check_origin(width, height, origin)?;
    let sm = SinglePixelPackedSampleModel::new(data_type, width, height, masks)?;
    writable(SampleModel::SinglePixelPacked(sm), None, Some(origin))
}

/// A packed raster of `bands` fields of `bits_per_band` bits each.
///
/// Several bands are laid out most significant first in one element per
/// pixel. A single band packs several pixels into each element.
pub fn packed_bits(
    data_type: DataType,
    width: i32,
    height: i32,
    bands: usize,
    bits_per_band: u32,
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    if bands == 0 {
        return Err(Error::invalid_argument(format!(
            "number of bands ({bands}) must be greater than 0"
        )));
    }
    if bits_per_band == 0 {
        return Err(Error::invalid_argument(format!(
            "bits per band ({bits_per_band}) must be greater than 0"
        )));
    }
    if bands == 1 {
        let origin = origin.unwrap_or((0, 0));
        check_origin(width, height, origin)?;
        let sm = MultiPixelPackedSampleModel::new(data_type, width, height, bits_per_band)?;
        return writable(SampleModel::MultiPixelPacked(sm), None, Some(origin));
    }

    let total = bands as u64 * bits_per_band as u64;
    if total > data_type.size_bits() as u64 {
        return Err(Error::invalid_argument(format!(
            "bits per band ({bits_per_band}) * bands is greater than data type size"
        )));
    }
    let mask = pixfmt_core::max_unsigned(bits_per_band);
    let masks: Vec<u32> = (0..bands as u32)
        .map(|i| mask << ((bands as u32 - 1 - i) * bits_per_band))
        .collect();
    packed(data_type, width, height, &masks, origin)
}

/// A writable raster over `buffer`, or over new storage sized for
/// `sample_model`.
pub fn writable(
    sample_model: SampleModel,
    buffer: Option<DataBuffer>,
    origin: Option<(i32, i32)>,
) -> Result<WritableRaster> {
    let buffer = buffer.unwrap_or_else(|| sample_model.create_data_buffer());
    trace!(
        layout = sample_model.kind(),
        width = sample_model.width(),
        height = sample_model.height(),
        bands = sample_model.num_bands(),
        "factory::writable"
    );
    WritableRaster::new(sample_model, SharedDataBuffer::new(buffer), origin.unwrap_or((0, 0)))
}

/// A read-only raster over `buffer`, or over new storage sized for
/// `sample_model`.
pub fn read_only(
    sample_model: SampleModel,
    buffer: Option<DataBuffer>,
    origin: Option<(i32, i32)>,
) -> Result<Raster> {
    writable(sample_model, buffer, origin).map(Raster::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfmt_core::DataElements;

    #[test]
    fn test_interleaved_layout() {
        let r = interleaved(DataType::Byte, 5, 3, 4, Some((2, 2))).unwrap();
        assert_eq!(r.bounds(), pixfmt_core::Rect::new(2, 2, 5, 3));
        let csm = r.sample_model().as_component().unwrap();
        assert_eq!(csm.pixel_stride(), 4);
        assert_eq!(csm.scanline_stride(), 20);
        assert_eq!(csm.band_offsets(), &[0, 1, 2, 3]);
        assert!(interleaved(DataType::Int, 2, 2, 1, None).is_err());
        assert!(interleaved(DataType::Byte, 2, 2, 0, None).is_err());
    }

    #[test]
    fn test_banded_layout() {
        let r = banded(DataType::Int, 2, 2, 3, None).unwrap();
        assert_eq!(r.data_buffer().read().num_banks(), 3);
        r.set_pixel(1, 1, &[-1, 2, 3]).unwrap();
        assert_eq!(r.pixel(1, 1).unwrap(), vec![-1, 2, 3]);
        assert!(banded(DataType::Float, 2, 2, 1, None).is_err());
    }

    #[test]
    fn test_packed_bits_masks() {
        let r = packed_bits(DataType::UShort, 2, 2, 3, 5, None).unwrap();
        let spp = r.sample_model().as_single_pixel_packed().unwrap();
        assert_eq!(spp.bit_masks(), &[0x7c00, 0x3e0, 0x1f]);
        assert!(packed_bits(DataType::Byte, 2, 2, 3, 3, None).is_err());
    }

    #[test]
    fn test_packed_bits_single_band() {
        let r = packed_bits(DataType::Byte, 10, 2, 1, 1, None).unwrap();
        let mpp = r.sample_model().as_multi_pixel_packed().unwrap();
        assert_eq!(mpp.scanline_stride(), 2);
        r.set_sample(9, 1, 0, 1).unwrap();
        assert_eq!(r.data_buffer().read().elem(0, 3), 0x40);
    }

    #[test]
    fn test_writable_with_buffer() {
        let sm = SampleModel::Interleaved(
            ComponentSampleModel::pixel_interleaved(DataType::Byte, 2, 1, 1, 2, vec![0]).unwrap(),
        );
        let buf = DataBuffer::from_elements(DataElements::Byte(vec![7, 9]));
        let r = read_only(sm, Some(buf), None).unwrap();
        assert_eq!(r.samples(0, 0, 2, 1, 0).unwrap(), vec![7, 9]);
    }

    #[test]
    fn test_origin_overflow() {
        assert!(interleaved(DataType::Byte, 4, 4, 1, Some((i32::MAX - 2, 0))).is_err());
        assert!(packed(DataType::Int, 4, 4, &[0xff], Some((0, i32::MAX))).is_err());
    }
}
