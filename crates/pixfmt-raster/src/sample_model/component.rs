//! One storage element per sample.
//!
//! Sample `b` of pixel `(x, y)` lives in bank `bank_indices[b]` at element
//! `y * scanline_stride + x * pixel_stride + band_offsets[b]`. Interleaved
//! and banded layouts are both expressed with this model; they differ only
//! in how the strides and offsets are chosen.

use pixfmt_core::{DataBuffer, DataElements, DataType, Error, Result};

use super::{check_dimensions, SampleLayout};

/// Sample model with one element per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSampleModel {
    data_type: DataType,
    width: i32,
    height: i32,
    pixel_stride: usize,
    scanline_stride: usize,
    bank_indices: Vec<usize>,
    band_offsets: Vec<usize>,
}

impl ComponentSampleModel {
    /// Creates a model with explicit strides, banks and offsets.
    ///
    /// # Errors
    ///
    /// Non-positive or oversized dimensions, mismatched or empty band
    /// arrays, or an addressing range that overflows `i32`.
    pub fn new(
        data_type: DataType,
        width: i32,
        height: i32,
        pixel_stride: usize,
        scanline_stride: usize,
        bank_indices: Vec<usize>,
        band_offsets: Vec<usize>,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        if band_offsets.is_empty() {
            return Err(Error::invalid_argument("band offsets must not be empty"));
        }
        if bank_indices.len() != band_offsets.len() {
            return Err(Error::invalid_argument(format!(
                "length of bank indices ({}) must equal length of band offsets ({})",
                bank_indices.len(),
                band_offsets.len()
            )));
        }
        let model = Self {
            data_type,
            width,
            height,
            pixel_stride,
            scanline_stride,
            bank_indices,
            band_offsets,
        };
        let last = (height as u64 - 1) * scanline_stride as u64
            + (width as u64 - 1) * pixel_stride as u64
            + model.band_offsets.iter().copied().max().unwrap_or(0) as u64;
        if last > i32::MAX as u64 {
            return Err(Error::invalid_argument("data element offset overflow"));
        }
        Ok(model)
    }

    /// Pixel-interleaved layout in a single bank.
    ///
    /// Band offsets must fit inside one pixel and one pixel row inside the
    /// scanline.
    pub fn pixel_interleaved(
        data_type: DataType,
        width: i32,
        height: i32,
        pixel_stride: usize,
        scanline_stride: usize,
        band_offsets: Vec<usize>,
    ) -> Result<Self> {
        let min = band_offsets.iter().copied().min().unwrap_or(0);
        let max = band_offsets.iter().copied().max().unwrap_or(0);
        if max - min > scanline_stride {
            return Err(Error::invalid_argument(
                "offsets between bands must be less than the scanline stride",
            ));
        }
        if pixel_stride as u64 * width.max(0) as u64 > scanline_stride as u64 {
            return Err(Error::invalid_argument(
                "pixel stride times width must be less than or equal to the scanline stride",
            ));
        }
        if pixel_stride < max - min {
            return Err(Error::invalid_argument(
                "pixel stride must be greater than or equal to the offsets between bands",
            ));
        }
        let banks = vec![0; band_offsets.len()];
        Self::new(data_type, width, height, pixel_stride, scanline_stride, banks, band_offsets)
    }

    /// Banded layout: pixel stride 1, each band in its own bank region.
    pub fn banded(
        data_type: DataType,
        width: i32,
        height: i32,
        scanline_stride: usize,
        bank_indices: Vec<usize>,
        band_offsets: Vec<usize>,
    ) -> Result<Self> {
        Self::new(data_type, width, height, 1, scanline_stride, bank_indices, band_offsets)
    }

    /// Elements between horizontally adjacent pixels.
    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Elements between vertically adjacent pixels.
    pub fn scanline_stride(&self) -> usize {
        self.scanline_stride
    }

    /// Bank of each band.
    pub fn bank_indices(&self) -> &[usize] {
        &self.bank_indices
    }

    /// Offset of each band within a pixel.
    pub fn band_offsets(&self) -> &[usize] {
        &self.band_offsets
    }

    #[inline]
    fn index(&self, x: i32, y: i32, band: usize) -> usize {
        y as usize * self.scanline_stride + x as usize * self.pixel_stride + self.band_offsets[band]
    }

    pub(crate) fn create_subset(&self, bands: &[usize]) -> Result<Self> {
        Ok(Self {
            bank_indices: bands.iter().map(|&b| self.bank_indices[b]).collect(),
            band_offsets: bands.iter().map(|&b| self.band_offsets[b]).collect(),
            ..self.clone()
        })
    }

    /// Same band order, offsets rebased to zero, tight strides.
    pub(crate) fn create_compatible_interleaved(&self, w: i32, h: i32) -> Result<Self> {
        let min = self.band_offsets.iter().copied().min().unwrap_or(0);
        let offsets = self.band_offsets.iter().map(|&o| o - min).collect();
        let stride = self.pixel_stride.max(1);
        Self::pixel_interleaved(self.data_type, w, h, stride, stride * w.max(0) as usize, offsets)
    }

    /// One bank per band, offsets zero.
    pub(crate) fn create_compatible_banded(&self, w: i32, h: i32) -> Result<Self> {
        let n = self.band_offsets.len();
        Self::banded(self.data_type, w, h, w.max(0) as usize, (0..n).collect(), vec![0; n])
    }
}

impl SampleLayout for ComponentSampleModel {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn num_bands(&self) -> usize {
        self.band_offsets.len()
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn num_data_elements(&self) -> usize {
        self.num_bands()
    }

    fn sample_size(&self, _band: usize) -> u32 {
        self.data_type.size_bits()
    }

    fn required_size(&self) -> usize {
        let base = (self.height as usize - 1) * self.scanline_stride
            + (self.width as usize - 1) * self.pixel_stride;
        base + self.band_offsets.iter().copied().max().unwrap_or(0) + 1
    }

    fn required_banks(&self) -> usize {
        self.bank_indices.iter().copied().max().unwrap_or(0) + 1
    }

    #[inline]
    fn read_sample(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> i32 {
        buf.elem(self.bank_indices[band], self.index(x, y, band))
    }

    #[inline]
    fn write_sample(&self, x: i32, y: i32, band: usize, value: i32, buf: &mut DataBuffer) {
        buf.set_elem(self.bank_indices[band], self.index(x, y, band), value)
    }

    #[inline]
    fn read_sample_f64(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> f64 {
        buf.elem_f64(self.bank_indices[band], self.index(x, y, band))
    }

    #[inline]
    fn write_sample_f64(&self, x: i32, y: i32, band: usize, value: f64, buf: &mut DataBuffer) {
        buf.set_elem_f64(self.bank_indices[band], self.index(x, y, band), value)
    }

    fn read_elements(&self, x: i32, y: i32, out: &mut DataElements, at: usize, buf: &DataBuffer) {
        for b in 0..self.num_bands() {
            let (bank, i) = (self.bank_indices[b], self.index(x, y, b));
            if self.data_type.is_floating_point() {
                out.set_f64(at + b, buf.elem_f64(bank, i));
            } else {
                out.set_int(at + b, buf.elem(bank, i));
            }
        }
    }

    fn write_elements(&self, x: i32, y: i32, src: &DataElements, at: usize, buf: &mut DataBuffer) {
        for b in 0..self.num_bands() {
            let (bank, i) = (self.bank_indices[b], self.index(x, y, b));
            if self.data_type.is_floating_point() {
                buf.set_elem_f64(bank, i, src.get_f64(at + b));
            } else {
                buf.set_elem(bank, i, src.get_int(at + b));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interleaved_addressing() {
        let sm = ComponentSampleModel::pixel_interleaved(DataType::Byte, 4, 2, 3, 12, vec![2, 1, 0]).unwrap();
        let mut buf = sm.create_data_buffer();
        assert_eq!(buf.size(), 24);
        sm.set_pixel(1, 1, &[10, 20, 30], &mut buf).unwrap();
        // BGR order in storage
        assert_eq!(buf.elem(0, 12 + 3), 30);
        assert_eq!(buf.elem(0, 12 + 5), 10);
        assert_eq!(sm.pixel(1, 1, &buf).unwrap(), vec![10, 20, 30]);
    }

    #[test]
    fn test_banded_uses_banks() {
        let sm = ComponentSampleModel::banded(DataType::UShort, 2, 2, 2, vec![0, 1], vec![0, 0]).unwrap();
        let mut buf = sm.create_data_buffer();
        assert_eq!(buf.num_banks(), 2);
        sm.set_pixel(1, 0, &[1000, 2000], &mut buf).unwrap();
        assert_eq!(buf.elem(0, 1), 1000);
        assert_eq!(buf.elem(1, 1), 2000);
    }

    #[test]
    fn test_float_samples_keep_fraction() {
        let sm = ComponentSampleModel::pixel_interleaved(DataType::Float, 2, 1, 2, 4, vec![0, 1]).unwrap();
        let mut buf = sm.create_data_buffer();
        sm.set_pixel_f32(0, 0, &[0.25, 0.75], &mut buf).unwrap();
        let px = sm.pixel_f32(0, 0, &buf).unwrap();
        assert_relative_eq!(px[1], 0.75);
        let elems = sm.data_elements(0, 0, None, &buf).unwrap();
        assert_eq!(elems.as_floats(), Some(&[0.25f32, 0.75][..]));
    }

    #[test]
    fn test_validation() {
        assert!(ComponentSampleModel::new(DataType::Byte, 0, 1, 1, 1, vec![0], vec![0]).is_err());
        assert!(ComponentSampleModel::new(DataType::Byte, 1, 1, 1, 1, vec![0], vec![]).is_err());
        assert!(ComponentSampleModel::new(DataType::Byte, 1, 1, 1, 1, vec![0, 0], vec![0]).is_err());
        // pixel stride smaller than band spread
        assert!(ComponentSampleModel::pixel_interleaved(DataType::Byte, 2, 2, 1, 4, vec![0, 2]).is_err());
        // row wider than scanline
        assert!(ComponentSampleModel::pixel_interleaved(DataType::Byte, 4, 2, 3, 8, vec![0, 1, 2]).is_err());
        assert!(ComponentSampleModel::new(DataType::Byte, 40000, 40000, 4, 160000, vec![0], vec![0]).is_err());
    }

    #[test]
    fn test_compatible_rebases_offsets() {
        let sm = ComponentSampleModel::pixel_interleaved(DataType::Byte, 4, 4, 4, 20, vec![4, 3, 2, 1]).unwrap();
        let c = sm.create_compatible_interleaved(2, 3).unwrap();
        assert_eq!(c.band_offsets(), &[3, 2, 1, 0]);
        assert_eq!(c.scanline_stride(), 8);
        assert_eq!(c.required_size(), 24);
    }
}
