//! All bands of a pixel packed into one storage element.
//!
//! Each band is a contiguous bitfield of the element. Reading a band is
//! `(elem & mask) >> offset`; writing clears the field and ORs in
//! `(value << offset) & mask`. The per-pixel transfer array is the raw
//! element itself, so two rasters with identical masks can exchange pixels
//! without unpacking.

use pixfmt_core::{max_unsigned, DataBuffer, DataElements, DataType, Error, Result};

use super::{check_dimensions, check_packed_type, SampleLayout};

/// Sample model storing one pixel per element as bitfields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePixelPackedSampleModel {
    data_type: DataType,
    width: i32,
    height: i32,
    scanline_stride: usize,
    bit_masks: Vec<u32>,
    bit_offsets: Vec<u32>,
    bit_sizes: Vec<u32>,
}

/// Offset and width of a contiguous bit mask.
///
/// A zero mask is an empty field at offset 0.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if the set bits are not one contiguous run.
pub fn mask_field(mask: u32) -> Result<(u32, u32)> {
    if mask == 0 {
        return Ok((0, 0));
    }
    let offset = mask.trailing_zeros();
    let shifted = mask >> offset;
    let size = shifted.trailing_ones();
    if shifted.checked_shr(size).unwrap_or(0) != 0 {
        return Err(Error::invalid_argument(format!("mask {mask:#x} must be contiguous")));
    }
    Ok((offset, size))
}

impl SinglePixelPackedSampleModel {
    /// Creates a model whose scanline stride equals its width.
    pub fn new(data_type: DataType, width: i32, height: i32, bit_masks: &[u32]) -> Result<Self> {
        Self::with_stride(data_type, width, height, width.max(0) as usize, bit_masks)
    }

    /// Creates a model with an explicit scanline stride (in elements).
    ///
    /// Masks are first narrowed to the width of `data_type`.
    ///
    /// # Errors
    ///
    /// Storage other than byte/ushort/int, bad dimensions, no masks, or a
    /// mask that is not one contiguous run of ones.
    pub fn with_stride(
        data_type: DataType,
        width: i32,
        height: i32,
        scanline_stride: usize,
        bit_masks: &[u32],
    ) -> Result<Self> {
        check_packed_type(data_type)?;
        check_dimensions(width, height)?;
        if bit_masks.is_empty() {
            return Err(Error::invalid_argument("at least one bit mask is required"));
        }
        let type_mask = max_unsigned(data_type.size_bits());
        let bit_masks: Vec<u32> = bit_masks.iter().map(|&m| m & type_mask).collect();
        let mut bit_offsets = Vec::with_capacity(bit_masks.len());
        let mut bit_sizes = Vec::with_capacity(bit_masks.len());
        for &mask in &bit_masks {
            let (offset, size) = mask_field(mask)?;
            bit_offsets.push(offset);
            bit_sizes.push(size);
        }
        Ok(Self {
            data_type,
            width,
            height,
            scanline_stride,
            bit_masks,
            bit_offsets,
            bit_sizes,
        })
    }

    /// Masks after narrowing to the storage width.
    pub fn bit_masks(&self) -> &[u32] {
        &self.bit_masks
    }

    /// Bit position of each band's least significant bit.
    pub fn bit_offsets(&self) -> &[u32] {
        &self.bit_offsets
    }

    /// Width in bits of each band.
    pub fn sample_sizes(&self) -> &[u32] {
        &self.bit_sizes
    }

    /// Elements between vertically adjacent pixels.
    pub fn scanline_stride(&self) -> usize {
        self.scanline_stride
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.scanline_stride + x as usize
    }

    pub(crate) fn create_subset(&self, bands: &[usize]) -> Result<Self> {
        let masks: Vec<u32> = bands.iter().map(|&b| self.bit_masks[b]).collect();
        Self::with_stride(self.data_type, self.width, self.height, self.scanline_stride, &masks)
    }

    pub(crate) fn create_compatible(&self, w: i32, h: i32) -> Result<Self> {
        Self::new(self.data_type, w, h, &self.bit_masks)
    }
}

impl SampleLayout for SinglePixelPackedSampleModel {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn num_bands(&self) -> usize {
        self.bit_masks.len()
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn num_data_elements(&self) -> usize {
        1
    }

    fn sample_size(&self, band: usize) -> u32 {
        self.bit_sizes[band]
    }

    fn required_size(&self) -> usize {
        (self.height as usize - 1) * self.scanline_stride + self.width as usize
    }

    #[inline]
    fn read_sample(&self, x: i32, y: i32, band: usize, buf: &DataBuffer) -> i32 {
        let elem = buf.elem(0, self.index(x, y)) as u32;
        ((elem & self.bit_masks[band]) >> self.bit_offsets[band]) as i32
    }

    #[inline]
    fn write_sample(&self, x: i32, y: i32, band: usize, value: i32, buf: &mut DataBuffer) {
        let i = self.index(x, y);
        let mask = self.bit_masks[band];
        let elem = buf.elem(0, i) as u32 & !mask;
        let field = ((value as u32) << self.bit_offsets[band]) & mask;
        buf.set_elem(0, i, (elem | field) as i32);
    }

    fn read_elements(&self, x: i32, y: i32, out: &mut DataElements, at: usize, buf: &DataBuffer) {
        out.set_int(at, buf.elem(0, self.index(x, y)));
    }

    fn write_elements(&self, x: i32, y: i32, src: &DataElements, at: usize, buf: &mut DataBuffer) {
        buf.set_elem(0, self.index(x, y), src.get_int(at));
    }

    fn set_pixel(&self, x: i32, y: i32, values: &[i32], buf: &mut DataBuffer) -> Result<()> {
        self.check_pixel(x, y)?;
        Error::check_len(self.num_bands(), values.len())?;
        let i = self.index(x, y);
        let mut elem = buf.elem(0, i) as u32;
        for ((&mask, &offset), &v) in self.bit_masks.iter().zip(&self.bit_offsets).zip(values) {
            elem = (elem & !mask) | (((v as u32) << offset) & mask);
        }
        buf.set_elem(0, i, elem as i32);
        Ok(())
    }
}
