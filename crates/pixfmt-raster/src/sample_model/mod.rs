//! Sample models: mapping `(x, y, band)` to storage.
//!
//! A sample model knows the geometry of one tile and how its samples are
//! laid out in a [`DataBuffer`], but owns no storage itself. Coordinates
//! are always zero-based; [`Raster`](crate::Raster) handles translation.
//!
//! # Layouts
//!
//! | Variant | Storage |
//! |---------|---------|
//! | [`SampleModel::Interleaved`] | one element per sample, samples of a pixel adjacent |
//! | [`SampleModel::Banded`] | one element per sample, each band in its own bank |
//! | [`SampleModel::SinglePixelPacked`] | one element per pixel, bands as bitfields |
//! | [`SampleModel::MultiPixelPacked`] | several one-band pixels per element |
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_core::DataType;
//! use pixfmt_raster::{SampleLayout, SampleModel, SinglePixelPackedSampleModel};
//!
//! let sm = SampleModel::SinglePixelPacked(SinglePixelPackedSampleModel::new(
//!     DataType::Int, 4, 4, &[0xff0000, 0x00ff00, 0x0000ff],
//! )?);
//! let mut buf = sm.create_data_buffer();
//! sm.set_pixel(1, 2, &[10, 20, 30], &mut buf)?;
//! assert_eq!(sm.pixel(1, 2, &buf)?, vec![10, 20, 30]);
//! # Ok::<(), pixfmt_core::Error>(())
//! ```

mod component;
mod multi_packed;
mod packed;

pub use component::ComponentSampleModel;
pub use multi_packed::MultiPixelPackedSampleModel;
pub use packed::{mask_field, SinglePixelPackedSampleModel};

use pixfmt_core::{DataBuffer, DataElements, DataType, Error, Result};

// ============================================================================
// Shared behaviour
// ============================================================================

/// Behaviour shared by every sample model.
///
/// Implementors provide geometry and unchecked single-sample and
/// single-pixel primitives; everything else (bounds checks, whole pixels,
/// regions) is provided on top of them. Checked methods validate
/// coordinates against `[0, width) x [0, height)` and bands against
/// `[0, num_bands)` before touching storage.
pub trait SampleLayout {
    /// Width in pixels.
    fn width(&self) -> i32;

    /// Height in pixels.
    fn height(&self) -> i32;

    /// Number of bands (samples per pixel).
    fn num_bands(&self) -> usize;

    /// Storage element kind of the backing buffer.
    fn data_type(&self) -> DataType;

    /// Element kind of per-pixel transfer arrays.
    fn transfer_type(&self) -> DataType {
        self.data_type()
    }

    /// Transfer elements per pixel.
    fn num_data_elements(&self) -> usize;

    /// Significant bits of `band`.
    fn sample_size(&self, band: usize) -> u32;

    /// Minimum elements each bank must hold.
    fn required_size(&self) -> usize;

    /// Minimum number of banks.
    fn required_banks(&self) -> usize {
        1
    }

    /// Reads one sample. Coordinates and band are not checked.
    fn read_sample(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> i32;

    /// Writes one sample. Coordinates and band are not checked.
    fn write_sample(&self, x: i32, y: i32, band: usize, value: i32, buf: &mut DataBuffer);

    /// Reads one sample as `f64`. Unchecked.
    fn read_sample_f64(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> f64 {
        self.read_sample(x, y, band, buf) as f64
    }

    /// Writes one sample from `f64`. Unchecked.
    fn write_sample_f64(&self, x: i32, y: i32, band: usize, value: f64, buf: &mut DataBuffer) {
        self.write_sample(x, y, band, value as i32, buf)
    }

    /// Copies the transfer elements of pixel `(x, y)` into `out[at..]`. Unchecked.
    fn read_elements(&self, x: i32, y: i32, out: &mut DataElements, at: usize, buf: &DataBuffer);

    /// Stores the transfer elements `src[at..]` at pixel `(x, y)`. Unchecked.
    fn write_elements(
        &self,
        x: i32,
        y: i32,
        src: &DataElements,
        at: usize,
        buf: &mut DataBuffer,
    );

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Fails unless `(x, y)` is inside the model.
    fn check_pixel(&self, x: i32, y: i32) -> Result<()> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return Err(Error::out_of_bounds(x, y, self.width(), self.height()));
        }
        Ok(())
    }

    /// Fails unless `band` exists.
    fn check_band(&self, band: usize) -> Result<()> {
        if band >= self.num_bands() {
            return Err(Error::invalid_band(band, self.num_bands()));
        }
        Ok(())
    }

    /// Fails unless the `w x h` region at `(x, y)` is inside the model.
    fn check_region(&self, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        let outside = x < 0
            || y < 0
            || w < 0
            || h < 0
            || x as i64 + w as i64 > self.width() as i64
            || y as i64 + h as i64 > self.height() as i64;
        if outside {
            let (ex, ey) = if x < 0 || y < 0 { (x, y) } else { (x.saturating_add(w), y.saturating_add(h)) };
            return Err(Error::out_of_bounds(ex, ey, self.width(), self.height()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Single sample
    // ------------------------------------------------------------------------

    /// Sample of `band` at `(x, y)`.
    fn sample(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> Result<i32> {
        self.check_pixel(x, y)?;
        self.check_band(band)?;
        Ok(self.read_sample(x, y, band, buf))
    }

    /// Sets the sample of `band` at `(x, y)`.
    fn set_sample(&self, x: i32, y: i32, band: usize, value: i32, buf: &mut DataBuffer) -> Result<()> {
        self.check_pixel(x, y)?;
        self.check_band(band)?;
        self.write_sample(x, y, band, value, buf);
        Ok(())
    }

    /// Sample as `f32`.
    fn sample_f32(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> Result<f32> {
        self.sample_f64(x, y, band, buf).map(|v| v as f32)
    }

    /// Sample as `f64`.
    fn sample_f64(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> Result<f64> {
        self.check_pixel(x, y)?;
        self.check_band(band)?;
        Ok(self.read_sample_f64(x, y, band, buf))
    }

    /// Sets a sample from `f32`.
    fn set_sample_f32(&self, x: i32, y: i32, band: usize, value: f32, buf: &mut DataBuffer) -> Result<()> {
        self.set_sample_f64(x, y, band, value as f64, buf)
    }

    /// Sets a sample from `f64`.
    fn set_sample_f64(&self, x: i32, y: i32, band: usize, value: f64, buf: &mut DataBuffer) -> Result<()> {
        self.check_pixel(x, y)?;
        self.check_band(band)?;
        self.write_sample_f64(x, y, band, value, buf);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Whole pixels
    // ------------------------------------------------------------------------

    /// All samples of pixel `(x, y)`.
    fn pixel(&self, x: i32, y: i32, buf: &DataBuffer) -> Result<Vec<i32>> {
        self.check_pixel(x, y)?;
        Ok((0..self.num_bands()).map(|b| self.read_sample(x, y, b, buf)).collect())
    }

    /// Sets all samples of pixel `(x, y)` from `values[..num_bands]`.
    fn set_pixel(&self, x: i32, y: i32, values: &[i32], buf: &mut DataBuffer) -> Result<()> {
        self.check_pixel(x, y)?;
        Error::check_len(self.num_bands(), values.len())?;
        for (b, &v) in values.iter().take(self.num_bands()).enumerate() {
            self.write_sample(x, y, b, v, buf);
        }
        Ok(())
    }

    /// Pixel samples as `f32`.
    fn pixel_f32(&self, x: i32, y: i32, buf: &DataBuffer) -> Result<Vec<f32>> {
        Ok(self.pixel_f64(x, y, buf)?.into_iter().map(|v| v as f32).collect())
    }

    /// Pixel samples as `f64`.
    fn pixel_f64(&self, x: i32, y: i32, buf: &DataBuffer) -> Result<Vec<f64>> {
        self.check_pixel(x, y)?;
        Ok((0..self.num_bands()).map(|b| self.read_sample_f64(x, y, b, buf)).collect())
    }

    /// Sets pixel samples from `f32`.
    fn set_pixel_f32(&self, x: i32, y: i32, values: &[f32], buf: &mut DataBuffer) -> Result<()> {
        let wide: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        self.set_pixel_f64(x, y, &wide, buf)
    }

    /// Sets pixel samples from `f64`.
    fn set_pixel_f64(&self, x: i32, y: i32, values: &[f64], buf: &mut DataBuffer) -> Result<()> {
        self.check_pixel(x, y)?;
        Error::check_len(self.num_bands(), values.len())?;
        for (b, &v) in values.iter().take(self.num_bands()).enumerate() {
            self.write_sample_f64(x, y, b, v, buf);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Regions
    // ------------------------------------------------------------------------

    /// Samples of a `w x h` region, pixel-interleaved, rows top to bottom.
    fn pixels(&self, x: i32, y: i32, w: i32, h: i32, buf: &DataBuffer) -> Result<Vec<i32>> {
        self.check_region(x, y, w, h)?;
        let n = self.num_bands();
        let mut out = Vec::with_capacity(w as usize * h as usize * n);
        for yy in y..y + h {
            for xx in x..x + w {
                out.extend((0..n).map(|b| self.read_sample(xx, yy, b, buf)));
            }
        }
        Ok(out)
    }

    /// Writes a `w x h` region of pixel-interleaved samples.
    fn set_pixels(&self, x: i32, y: i32, w: i32, h: i32, values: &[i32], buf: &mut DataBuffer) -> Result<()> {
        self.check_region(x, y, w, h)?;
        let n = self.num_bands();
        Error::check_len(w as usize * h as usize * n, values.len())?;
        let mut it = values.iter();
        for yy in y..y + h {
            for xx in x..x + w {
                for b in 0..n {
                    if let Some(&v) = it.next() {
                        self.write_sample(xx, yy, b, v, buf);
                    }
                }
            }
        }
        Ok(())
    }

    /// Region samples as `f64`, pixel-interleaved.
    fn pixels_f64(&self, x: i32, y: i32, w: i32, h: i32, buf: &DataBuffer) -> Result<Vec<f64>> {
        self.check_region(x, y, w, h)?;
        let n = self.num_bands();
        let mut out = Vec::with_capacity(w as usize * h as usize * n);
        for yy in y..y + h {
            for xx in x..x + w {
                out.extend((0..n).map(|b| self.read_sample_f64(xx, yy, b, buf)));
            }
        }
        Ok(out)
    }

    /// Writes a region of pixel-interleaved `f64` samples.
    fn set_pixels_f64(&self, x: i32, y: i32, w: i32, h: i32, values: &[f64], buf: &mut DataBuffer) -> Result<()> {
        self.check_region(x, y, w, h)?;
        let n = self.num_bands();
        Error::check_len(w as usize * h as usize * n, values.len())?;
        let mut it = values.iter();
        for yy in y..y + h {
            for xx in x..x + w {
                for b in 0..n {
                    if let Some(&v) = it.next() {
                        self.write_sample_f64(xx, yy, b, v, buf);
                    }
                }
            }
        }
        Ok(())
    }

    /// One band of a `w x h` region, row-major.
    fn samples(&self, x: i32, y: i32, w: i32, h: i32, band: usize, buf: &DataBuffer) -> Result<Vec<i32>> {
        self.check_region(x, y, w, h)?;
        self.check_band(band)?;
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for yy in y..y + h {
            out.extend((x..x + w).map(|xx| self.read_sample(xx, yy, band, buf)));
        }
        Ok(out)
    }

    /// Writes one band of a region.
    fn set_samples(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        band: usize,
        values: &[i32],
        buf: &mut DataBuffer,
    ) -> Result<()> {
        self.check_region(x, y, w, h)?;
        self.check_band(band)?;
        Error::check_len(w as usize * h as usize, values.len())?;
        let mut it = values.iter();
        for yy in y..y + h {
            for xx in x..x + w {
                if let Some(&v) = it.next() {
                    self.write_sample(xx, yy, band, v, buf);
                }
            }
        }
        Ok(())
    }

    /// One band of a region as `f64`.
    fn samples_f64(&self, x: i32, y: i32, w: i32, h: i32, band: usize, buf: &DataBuffer) -> Result<Vec<f64>> {
        self.check_region(x, y, w, h)?;
        self.check_band(band)?;
        let mut out = Vec::with_capacity(w as usize * h as usize);
        for yy in y..y + h {
            out.extend((x..x + w).map(|xx| self.read_sample_f64(xx, yy, band, buf)));
        }
        Ok(out)
    }

    /// Writes one band of a region from `f64`.
    fn set_samples_f64(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        band: usize,
        values: &[f64],
        buf: &mut DataBuffer,
    ) -> Result<()> {
        self.check_region(x, y, w, h)?;
        self.check_band(band)?;
        Error::check_len(w as usize * h as usize, values.len())?;
        let mut it = values.iter();
        for yy in y..y + h {
            for xx in x..x + w {
                if let Some(&v) = it.next() {
                    self.write_sample_f64(xx, yy, band, v, buf);
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Transfer arrays
    // ------------------------------------------------------------------------

    /// Transfer elements of pixel `(x, y)`.
    ///
    /// `reuse` is filled in place when it has the transfer type and enough room.
    fn data_elements(&self, x: i32, y: i32, reuse: Option<DataElements>, buf: &DataBuffer) -> Result<DataElements> {
        self.check_pixel(x, y)?;
        let mut out = DataElements::reuse(reuse, self.transfer_type(), self.num_data_elements())?;
        self.read_elements(x, y, &mut out, 0, buf);
        Ok(out)
    }

    /// Stores transfer elements at pixel `(x, y)`.
    fn set_data_elements(&self, x: i32, y: i32, data: &DataElements, buf: &mut DataBuffer) -> Result<()> {
        self.check_pixel(x, y)?;
        data.expect(self.transfer_type(), self.num_data_elements())?;
        self.write_elements(x, y, data, 0, buf);
        Ok(())
    }

    /// Transfer elements of a `w x h` region, pixels in row-major order.
    fn data_elements_rect(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        reuse: Option<DataElements>,
        buf: &DataBuffer,
    ) -> Result<DataElements> {
        self.check_region(x, y, w, h)?;
        let n = self.num_data_elements();
        let mut out = DataElements::reuse(reuse, self.transfer_type(), w as usize * h as usize * n)?;
        let mut at = 0;
        for yy in y..y + h {
            for xx in x..x + w {
                self.read_elements(xx, yy, &mut out, at, buf);
                at += n;
            }
        }
        Ok(out)
    }

    /// Stores transfer elements for a `w x h` region.
    fn set_data_elements_rect(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        data: &DataElements,
        buf: &mut DataBuffer,
    ) -> Result<()> {
        self.check_region(x, y, w, h)?;
        let n = self.num_data_elements();
        data.expect(self.transfer_type(), w as usize * h as usize * n)?;
        let mut at = 0;
        for yy in y..y + h {
            for xx in x..x + w {
                self.write_elements(xx, yy, data, at, buf);
                at += n;
            }
        }
        Ok(())
    }

    /// Allocates a zeroed buffer large enough for this model.
    fn create_data_buffer(&self) -> DataBuffer {
        DataBuffer::new(self.data_type(), self.required_size(), self.required_banks())
    }
}

// ============================================================================
// SampleModel
// ============================================================================

/// The closed set of sample layouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleModel {
    /// Pixel-interleaved samples in one bank.
    Interleaved(ComponentSampleModel),
    /// One bank (or bank region) per band.
    Banded(ComponentSampleModel),
    /// All bands of a pixel packed into one element.
    SinglePixelPacked(SinglePixelPackedSampleModel),
    /// Several one-band pixels packed into each element.
    MultiPixelPacked(MultiPixelPackedSampleModel),
}

macro_rules! delegate {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            SampleModel::Interleaved($m) | SampleModel::Banded($m) => $body,
            SampleModel::SinglePixelPacked($m) => $body,
            SampleModel::MultiPixelPacked($m) => $body,
        }
    };
}

impl SampleLayout for SampleModel {
    fn width(&self) -> i32 {
        delegate!(self, m => m.width())
    }

    fn height(&self) -> i32 {
        delegate!(self, m => m.height())
    }

    fn num_bands(&self) -> usize {
        delegate!(self, m => m.num_bands())
    }

    fn data_type(&self) -> DataType {
        delegate!(self, m => m.data_type())
    }

    fn transfer_type(&self) -> DataType {
        delegate!(self, m => m.transfer_type())
    }

    fn num_data_elements(&self) -> usize {
        delegate!(self, m => m.num_data_elements())
    }

    fn sample_size(&self, band: usize) -> u32 {
        delegate!(self, m => m.sample_size(band))
    }

    fn required_size(&self) -> usize {
        delegate!(self, m => m.required_size())
    }

    fn required_banks(&self) -> usize {
        delegate!(self, m => m.required_banks())
    }

    #[inline]
    fn read_sample(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> i32 {
        delegate!(self, m => m.read_sample(x, y, band, buf))
    }

    #[inline]
    fn write_sample(&self, x: i32, y: i32, band: usize, value: i32, buf: &mut DataBuffer) {
        delegate!(self, m => m.write_sample(x, y, band, value, buf))
    }

    #[inline]
    fn read_sample_f64(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> f64 {
        delegate!(self, m => m.read_sample_f64(x, y, band, buf))
    }

    #[inline]
    fn write_sample_f64(&self, x: i32, y: i32, band: usize, value: f64, buf: &mut DataBuffer) {
        delegate!(self, m => m.write_sample_f64(x, y, band, value, buf))
    }

    #[inline]
    fn read_elements(&self, x: i32, y: i32, out: &mut DataElements, at: usize, buf: &DataBuffer) {
        delegate!(self, m => m.read_elements(x, y, out, at, buf))
    }

    #[inline]
    fn write_elements(&self, x: i32, y: i32, src: &DataElements, at: usize, buf: &mut DataBuffer) {
        delegate!(self, m => m.write_elements(x, y, src, at, buf))
    }
}

impl SampleModel {
    /// Sample sizes of all bands.
    pub fn sample_sizes(&self) -> Vec<u32> {
        (0..self.num_bands()).map(|b| self.sample_size(b)).collect()
    }

    /// A model of the same kind exposing only `bands`, in that order.
    ///
    /// The subset addresses the same storage as `self`.
    pub fn create_subset(&self, bands: &[usize]) -> Result<SampleModel> {
        if bands.is_empty() {
            return Err(Error::invalid_argument("band subset must not be empty"));
        }
        for &b in bands {
            self.check_band(b)?;
        }
        Ok(match self {
            Self::Interleaved(m) => Self::Interleaved(m.create_subset(bands)?),
            Self::Banded(m) => Self::Banded(m.create_subset(bands)?),
            Self::SinglePixelPacked(m) => Self::SinglePixelPacked(m.create_subset(bands)?),
            Self::MultiPixelPacked(m) => Self::MultiPixelPacked(m.create_subset(bands)?),
        })
    }

    /// A model of the same layout for a `w x h` tile with minimal strides.
    pub fn create_compatible(&self, w: i32, h: i32) -> Result<SampleModel> {
        Ok(match self {
            Self::Interleaved(m) => Self::Interleaved(m.create_compatible_interleaved(w, h)?),
            Self::Banded(m) => Self::Banded(m.create_compatible_banded(w, h)?),
            Self::SinglePixelPacked(m) => Self::SinglePixelPacked(m.create_compatible(w, h)?),
            Self::MultiPixelPacked(m) => Self::MultiPixelPacked(m.create_compatible(w, h)?),
        })
    }

    /// Layout name for logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Interleaved(_) => "interleaved",
            Self::Banded(_) => "banded",
            Self::SinglePixelPacked(_) => "single-pixel-packed",
            Self::MultiPixelPacked(_) => "multi-pixel-packed",
        }
    }

    /// The component model behind interleaved and banded layouts.
    pub fn as_component(&self) -> Option<&ComponentSampleModel> {
        match self {
            Self::Interleaved(m) | Self::Banded(m) => Some(m),
            _ => None,
        }
    }

    /// The packed model behind the single-pixel-packed layout.
    pub fn as_single_pixel_packed(&self) -> Option<&SinglePixelPackedSampleModel> {
        match self {
            Self::SinglePixelPacked(m) => Some(m),
            _ => None,
        }
    }

    /// The packed model behind the multi-pixel-packed layout.
    pub fn as_multi_pixel_packed(&self) -> Option<&MultiPixelPackedSampleModel> {
        match self {
            Self::MultiPixelPacked(m) => Some(m),
            _ => None,
        }
    }
}

// ============================================================================
// Construction helpers
// ============================================================================

/// Validates tile dimensions shared by every layout.
pub(crate) fn check_dimensions(width: i32, height: i32) -> Result<()> {
    if width <= 0 || height <= 0 {
        return Err(Error::invalid_argument(format!(
            "width ({width}) and height ({height}) must be > 0"
        )));
    }
    if width as i64 * height as i64 > i32::MAX as i64 {
        return Err(Error::invalid_argument(format!(
            "dimensions (width={width} height={height}) are too large"
        )));
    }
    Ok(())
}

/// Fails unless `data_type` is one of the packed storage kinds.
pub(crate) fn check_packed_type(data_type: DataType) -> Result<()> {
    match data_type {
        DataType::Byte | DataType::UShort | DataType::Int => Ok(()),
        other => Err(Error::invalid_argument(format!("unsupported data type {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_packed() -> SampleModel {
        SampleModel::SinglePixelPacked(
            SinglePixelPackedSampleModel::new(DataType::Int, 3, 2, &[0xff0000, 0xff00, 0xff]).unwrap(),
        )
    }

    #[test]
    fn test_bounds_are_checked() {
        let sm = rgb_packed();
        let buf = sm.create_data_buffer();
        assert!(sm.pixel(3, 0, &buf).unwrap_err().is_bounds_error());
        assert!(sm.pixel(0, -1, &buf).unwrap_err().is_bounds_error());
        assert!(matches!(sm.sample(0, 0, 3, &buf), Err(Error::InvalidBand { band: 3, .. })));
        assert!(sm.pixels(1, 0, 3, 1, &buf).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_region_roundtrip() {
        let sm = rgb_packed();
        let mut buf = sm.create_data_buffer();
        let values: Vec<i32> = (0..18).collect();
        sm.set_pixels(0, 0, 3, 2, &values, &mut buf).unwrap();
        assert_eq!(sm.pixels(0, 0, 3, 2, &buf).unwrap(), values);
        assert_eq!(sm.samples(0, 1, 3, 1, 2, &buf).unwrap(), vec![11, 14, 17]);
    }

    #[test]
    fn test_short_array_rejected() {
        let sm = rgb_packed();
        let mut buf = sm.create_data_buffer();
        let err = sm.set_pixel(0, 0, &[1, 2], &mut buf).unwrap_err();
        assert_eq!(err, Error::ArrayTooShort { expected: 3, got: 2 });
    }

    #[test]
    fn test_data_elements_rect() {
        let sm = rgb_packed();
        let mut buf = sm.create_data_buffer();
        sm.set_pixel(1, 1, &[1, 2, 3], &mut buf).unwrap();
        let elems = sm.data_elements_rect(0, 1, 2, 1, None, &buf).unwrap();
        assert_eq!(elems.as_ints(), Some(&[0, 0x010203][..]));
    }

    #[test]
    fn test_subset_and_compatible() {
        let sm = rgb_packed();
        let sub = sm.create_subset(&[2, 0]).unwrap();
        assert_eq!(sub.num_bands(), 2);
        assert!(sm.create_subset(&[4]).is_err());
        let compat = sm.create_compatible(8, 8).unwrap();
        assert_eq!((compat.width(), compat.height()), (8, 8));
        assert_eq!(compat.kind(), "single-pixel-packed");
    }

    #[test]
    fn test_dimension_checks() {
        assert!(check_dimensions(0, 4).is_err());
        assert!(check_dimensions(65536, 65536).is_err());
        assert!(check_dimensions(4, 4).is_ok());
    }
}
