//! Several one-band pixels packed into each storage element.
//!
//! Pixels are `pixel_bit_stride` bits wide and never span elements. Within
//! an element the leftmost pixel occupies the most significant bits, so a
//! 1-bit row `1,0,0,0,0,0,0,1` is the byte `0x81`.

use pixfmt_core::{max_unsigned, DataBuffer, DataElements, DataType, Error, Result};

use super::{check_dimensions, check_packed_type, SampleLayout};

/// Sample model for packed sub-element pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPixelPackedSampleModel {
    data_type: DataType,
    width: i32,
    height: i32,
    pixel_bit_stride: u32,
    scanline_stride: usize,
    data_bit_offset: usize,
    bit_mask: u32,
    elem_bits: u32,
}

impl MultiPixelPackedSampleModel {
    /// Creates a model with the minimal scanline stride and no bit offset.
    pub fn new(data_type: DataType, width: i32, height: i32, bits: u32) -> Result<Self> {
        let elem_bits = data_type.size_bits() as usize;
        let stride = (width.max(0) as usize * bits as usize).div_ceil(elem_bits);
        Self::with_layout(data_type, width, height, bits, stride, 0)
    }

    /// Creates a model with explicit scanline stride (elements) and data
    /// bit offset.
    ///
    /// # Errors
    ///
    /// Storage other than byte/ushort/int, bad dimensions, a pixel width
    /// that does not divide the element width, or a bit offset that is not
    /// a multiple of the pixel width.
    pub fn with_layout(
        data_type: DataType,
        width: i32,
        height: i32,
        bits: u32,
        scanline_stride: usize,
        data_bit_offset: usize,
    ) -> Result<Self> {
        check_packed_type(data_type)?;
        check_dimensions(width, height)?;
        let elem_bits = data_type.size_bits();
        if bits == 0 || elem_bits % bits != 0 {
            return Err(Error::raster_format(
                "pixels must not span data element boundaries",
            ));
        }
        if data_bit_offset % bits as usize != 0 {
            return Err(Error::raster_format(
                "data bit offset is not a multiple of pixel bit stride",
            ));
        }
        Ok(Self {
            data_type,
            width,
            height,
            pixel_bit_stride: bits,
            scanline_stride,
            data_bit_offset,
            bit_mask: max_unsigned(bits),
            elem_bits,
        })
    }

    /// Bits per pixel.
    pub fn pixel_bit_stride(&self) -> u32 {
        self.pixel_bit_stride
    }

    /// Elements between vertically adjacent pixels.
    pub fn scanline_stride(&self) -> usize {
        self.scanline_stride
    }

    /// Bit offset of the first pixel within the first element of a row.
    pub fn data_bit_offset(&self) -> usize {
        self.data_bit_offset
    }

    /// Element index and right shift of pixel `(x, y)`.
    #[inline]
    fn locate(&self, x: i32, y: i32) -> (usize, u32) {
        let bitnum = self.data_bit_offset + x as usize * self.pixel_bit_stride as usize;
        let index = y as usize * self.scanline_stride + bitnum / self.elem_bits as usize;
        let shift = self.elem_bits - (bitnum % self.elem_bits as usize) as u32 - self.pixel_bit_stride;
        (index, shift)
    }

    pub(crate) fn create_subset(&self, bands: &[usize]) -> Result<Self> {
        if bands != [0] {
            return Err(Error::invalid_argument(
                "multi-pixel packed models have exactly one band",
            ));
        }
        Ok(self.clone())
    }

    pub(crate) fn create_compatible(&self, w: i32, h: i32) -> Result<Self> {
        Self::new(self.data_type, w, h, self.pixel_bit_stride)
    }
}

impl SampleLayout for MultiPixelPackedSampleModel {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn num_bands(&self) -> usize {
        1
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn transfer_type(&self) -> DataType {
        match self.pixel_bit_stride {
            b if b > 16 => DataType::Int,
            b if b > 8 => DataType::UShort,
            _ => DataType::Byte,
        }
    }

    fn num_data_elements(&self) -> usize {
        1
    }

    fn sample_size(&self, _band: usize) -> u32 {
        self.pixel_bit_stride
    }

    fn required_size(&self) -> usize {
        let row_bits = self.data_bit_offset + self.width as usize * self.pixel_bit_stride as usize;
        (self.height as usize - 1) * self.scanline_stride + row_bits.div_ceil(self.elem_bits as usize)
    }

    #[inline]
    fn read_sample(&self, x: i32, y: i32, _band: usize, buf: &DataBuffer) -> i32 {
        let (index, shift) = self.locate(x, y);
        ((buf.elem(0, index) as u32 >> shift) & self.bit_mask) as i32
    }

    #[inline]
    fn write_sample(&self, x: i32, y: i32, _band: usize, value: i32, buf: &mut DataBuffer) {
        let (index, shift) = self.locate(x, y);
        let elem = buf.elem(0, index) as u32 & !(self.bit_mask << shift);
        let field = (value as u32 & self.bit_mask) << shift;
        buf.set_elem(0, index, (elem | field) as i32);
    }

    fn read_elements(&self, x: i32, y: i32, out: &mut DataElements, at: usize, buf: &DataBuffer) {
        out.set_int(at, self.read_sample(x, y, 0, buf));
    }

    fn write_elements(&self, x: i32, y: i32, src: &DataElements, at: usize, buf: &mut DataBuffer) {
        self.write_sample(x, y, 0, src.get_int(at), buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_bits() {
        let sm = MultiPixelPackedSampleModel::new(DataType::Byte, 8, 1, 1).unwrap();
        let mut buf = sm.create_data_buffer();
        assert_eq!(buf.size(), 1);
        sm.set_sample(0, 0, 0, 1, &mut buf).unwrap();
        sm.set_sample(7, 0, 0, 1, &mut buf).unwrap();
        assert_eq!(buf.elem(0, 0), 0x81);
        assert_eq!(sm.samples(0, 0, 8, 1, 0, &buf).unwrap(), vec![1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_nibbles_and_stride() {
        let sm = MultiPixelPackedSampleModel::new(DataType::Byte, 3, 2, 4).unwrap();
        assert_eq!(sm.scanline_stride(), 2);
        assert_eq!(sm.required_size(), 4);
        let mut buf = sm.create_data_buffer();
        sm.set_pixel(2, 1, &[0xa], &mut buf).unwrap();
        assert_eq!(buf.elem(0, 3), 0xa0);
        assert_eq!(sm.pixel(2, 1, &buf).unwrap(), vec![0xa]);
    }

    #[test]
    fn test_transfer_type_follows_bits() {
        let sm = MultiPixelPackedSampleModel::new(DataType::Int, 4, 1, 2).unwrap();
        assert_eq!(sm.transfer_type(), DataType::Byte);
        let sm = MultiPixelPackedSampleModel::new(DataType::Int, 4, 1, 16).unwrap();
        assert_eq!(sm.transfer_type(), DataType::UShort);
        let mut buf = sm.create_data_buffer();
        sm.set_data_elements(3, 0, &DataElements::UShort(vec![0xbeef]), &mut buf).unwrap();
        assert_eq!(buf.elem(0, 1) & 0xffff, 0xbeef);
    }

    #[test]
    fn test_bit_offset() {
        let sm = MultiPixelPackedSampleModel::with_layout(DataType::Byte, 4, 1, 2, 2, 4).unwrap();
        let mut buf = sm.create_data_buffer();
        sm.set_sample(0, 0, 0, 3, &mut buf).unwrap();
        assert_eq!(buf.elem(0, 0), 0b0000_1100);
    }

    #[test]
    fn test_validation() {
        assert!(MultiPixelPackedSampleModel::new(DataType::Byte, 4, 1, 3).is_err());
        assert!(MultiPixelPackedSampleModel::with_layout(DataType::Byte, 4, 1, 2, 2, 3).is_err());
        assert!(MultiPixelPackedSampleModel::new(DataType::Short, 4, 1, 1).is_err());
        let sm = MultiPixelPackedSampleModel::new(DataType::Byte, 4, 1, 1).unwrap();
        assert!(sm.create_subset(&[0, 0]).is_err());
    }
}
