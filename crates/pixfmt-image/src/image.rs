//! Images: a color model bound to a compatible raster.
//!
//! # Construction
//!
//! [`Image::from_raster`] validates and normalizes the pair:
//!
//! 1. the color model must accept the raster (band count, transfer type)
//! 2. the raster origin must be `(0, 0)`
//! 3. if the raster's premultiplication state differs from the model's,
//!    the raster is rewritten in place to match the model
//! 4. the pair is tagged with an [`ImageType`] (or `Custom`)
//!
//! After that the structure is fixed. Pixel contents stay mutable through
//! the raster, which may be shared with other views.
//!
//! # Pixel Access
//!
//! `rgb`/`set_rgb` and their rectangle variants go through the default
//! ARGB format (`0xAARRGGBB`, 8 bits per channel, non-premultiplied sRGB).
//! [`Image::copy_to`] moves transfer arrays directly when both images use
//! equal color models, and falls back to ARGB otherwise.

use pixfmt_color::{ColorModel, ComponentColorModel, DirectColorModel, IndexColorModel};
use pixfmt_core::{colorspace, DataElements, DataType, Error, Rect, Result, Transparency};
use pixfmt_raster::{factory, Raster, WritableRaster};
use tracing::{debug, trace};

use crate::image_type::ImageType;

/// A color model and a raster whose samples it interprets.
#[derive(Debug, Clone)]
pub struct Image {
    color_model: ColorModel,
    raster: WritableRaster,
    image_type: ImageType,
}

fn scanline(width: i32, elements: usize) -> Result<usize> {
    usize::try_from(width)
        .ok()
        .and_then(|w| w.checked_mul(elements))
        .ok_or_else(|| Error::raster_format(format!("invalid width ({width})")))
}

/// Palette of [`ImageType::ByteIndexed`]: a 6x6x6 color cube followed by
/// a gray ramp.
fn cube_palette() -> Vec<u32> {
    let mut cmap = Vec::with_capacity(256);
    for r in (0..256u32).step_by(51) {
        for g in (0..256u32).step_by(51) {
            for b in (0..256u32).step_by(51) {
                cmap.push(r << 16 | g << 8 | b);
            }
        }
    }
    let step = 256 / (256 - cmap.len() as u32);
    let mut gray = step * 3;
    while cmap.len() < 256 {
        cmap.push(gray << 16 | gray << 8 | gray);
        gray += step;
    }
    cmap
}

impl Image {
    // ========================================================================
    // Construction
    // ========================================================================

    /// A zeroed image of a standard type.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for [`ImageType::Custom`]; raster errors
    /// for invalid sizes.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pixfmt_image::{Image, ImageType};
    ///
    /// let img = Image::new(4, 4, ImageType::IntArgb)?;
    /// img.set_rgb(1, 2, 0x80ff0000)?;
    /// assert_eq!(img.rgb(1, 2)?, 0x80ff0000);
    /// # Ok::<(), pixfmt_core::Error>(())
    /// ```
    pub fn new(width: i32, height: i32, image_type: ImageType) -> Result<Self> {
        let srgb = colorspace::srgb;
        let (color_model, raster): (ColorModel, WritableRaster) = match image_type {
            ImageType::Custom => {
                return Err(Error::invalid_argument("custom images need an explicit color model and raster"));
            }
            ImageType::IntRgb => {
                let cm = DirectColorModel::new(24, 0xff_0000, 0xff00, 0xff, 0)?;
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm.into(), r)
            }
            ImageType::IntArgb => {
                let cm = ColorModel::rgb_default();
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm, r)
            }
            ImageType::IntArgbPre => {
                let cm = DirectColorModel::with_color_space(
                    srgb(),
                    32,
                    [0xff_0000, 0xff00, 0xff, 0xff00_0000],
                    true,
                    DataType::Int,
                )?;
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm.into(), r)
            }
            ImageType::IntBgr => {
                let cm = DirectColorModel::new(24, 0xff, 0xff00, 0xff_0000, 0)?;
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm.into(), r)
            }
            ImageType::ThreeByteBgr => {
                let cm = ComponentColorModel::new(
                    srgb(),
                    Some(&[8, 8, 8][..]),
                    false,
                    false,
                    Transparency::Opaque,
                    DataType::Byte,
                )?;
                let r = factory::interleaved_with(
                    DataType::Byte,
                    width,
                    height,
                    scanline(width, 3)?,
                    3,
                    vec![2, 1, 0],
                    None,
                )?;
                (cm.into(), r)
            }
            ImageType::FourByteAbgr | ImageType::FourByteAbgrPre => {
                let premultiplied = image_type == ImageType::FourByteAbgrPre;
                let cm = ComponentColorModel::new(
                    srgb(),
                    Some(&[8, 8, 8, 8][..]),
                    true,
                    premultiplied,
                    Transparency::Translucent,
                    DataType::Byte,
                )?;
                let r = factory::interleaved_with(
                    DataType::Byte,
                    width,
                    height,
                    scanline(width, 4)?,
                    4,
                    vec![3, 2, 1, 0],
                    None,
                )?;
                (cm.into(), r)
            }
            ImageType::Ushort565Rgb => {
                let cm = DirectColorModel::new(16, 0xf800, 0x07e0, 0x001f, 0)?;
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm.into(), r)
            }
            ImageType::Ushort555Rgb => {
                let cm = DirectColorModel::new(15, 0x7c00, 0x03e0, 0x001f, 0)?;
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm.into(), r)
            }
            ImageType::ByteGray | ImageType::UshortGray => {
                let (bits, dt) = match image_type {
                    ImageType::ByteGray => (8, DataType::Byte),
                    _ => (16, DataType::UShort),
                };
                let cm = ComponentColorModel::new(
                    colorspace::linear_gray(),
                    Some(&[bits][..]),
                    false,
                    false,
                    Transparency::Opaque,
                    dt,
                )?;
                let r = cm.create_compatible_writable_raster(width, height)?;
                (cm.into(), r)
            }
            ImageType::ByteBinary => {
                let bw = [0u8, 0xff];
                let cm = IndexColorModel::from_planes(1, 2, &bw, &bw, &bw)?;
                let r = factory::packed_bits(DataType::Byte, width, height, 1, 1, None)?;
                (cm.into(), r)
            }
            ImageType::ByteIndexed => {
                let cm = IndexColorModel::from_argb(8, 256, &cube_palette(), 0, false, DataType::Byte)?;
                let r = factory::interleaved(DataType::Byte, width, height, 1, None)?;
                (cm.into(), r)
            }
        };
        debug!(width, height, %image_type, "new image");
        Ok(Self {
            color_model,
            raster,
            image_type,
        })
    }

    /// A zeroed [`ImageType::ByteBinary`] or [`ImageType::ByteIndexed`]
    /// image using `palette`.
    ///
    /// Binary images pack 1, 2 or 4 bits per pixel depending on the palette
    /// size, which must not exceed 16.
    pub fn with_palette(width: i32, height: i32, image_type: ImageType, palette: IndexColorModel) -> Result<Self> {
        let raster = match image_type {
            ImageType::ByteBinary => {
                let bits = match palette.map_size() {
                    0..=2 => 1,
                    3..=4 => 2,
                    5..=16 => 4,
                    n => {
                        return Err(Error::invalid_argument(format!(
                            "palette for byte_binary must have at most 16 entries, got {n}"
                        )));
                    }
                };
                factory::packed_bits(DataType::Byte, width, height, 1, bits, None)?
            }
            ImageType::ByteIndexed => factory::interleaved(DataType::Byte, width, height, 1, None)?,
            other => {
                return Err(Error::invalid_argument(format!(
                    "{other} images cannot use a caller-supplied palette"
                )));
            }
        };
        Self::from_raster(palette.into(), raster, false)
    }

    /// Binds `color_model` to `raster`.
    ///
    /// `raster_premultiplied` states whether the raster's color samples are
    /// currently premultiplied. When that differs from the model the raster
    /// is rewritten in place to match the model.
    ///
    /// # Errors
    ///
    /// - [`Error::Incompatible`] if the model cannot interpret the raster
    /// - [`Error::RasterFormat`] if the raster origin is not `(0, 0)`
    pub fn from_raster(color_model: ColorModel, raster: WritableRaster, raster_premultiplied: bool) -> Result<Self> {
        if !color_model.is_compatible_raster(&raster) {
            return Err(Error::incompatible(format!(
                "{} raster with {} bands is incompatible with the {} color model",
                raster.transfer_type(),
                raster.num_bands(),
                color_model.kind()
            )));
        }
        if raster.min_x() != 0 || raster.min_y() != 0 {
            return Err(Error::raster_format(format!(
                "image raster origin must be (0, 0), got ({}, {})",
                raster.min_x(),
                raster.min_y()
            )));
        }

        let premultiplied = color_model.is_alpha_premultiplied();
        if color_model.has_alpha() && raster_premultiplied != premultiplied {
            debug!(premultiplied, "coercing raster alpha to the color model");
            color_model.coerce_raster(&raster, raster_premultiplied)?;
        }

        let image_type = ImageType::classify(&color_model, &raster);
        debug!(width = raster.width(), height = raster.height(), %image_type, "classified image");
        Ok(Self {
            color_model,
            raster,
            image_type,
        })
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.raster.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.raster.height()
    }

    /// Canonical tag, or [`ImageType::Custom`].
    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// The color model.
    pub fn color_model(&self) -> &ColorModel {
        &self.color_model
    }

    /// The backing raster. Writes through it are visible in the image.
    pub fn raster(&self) -> &WritableRaster {
        &self.raster
    }

    /// Transparency class of the color model.
    pub fn transparency(&self) -> Transparency {
        self.color_model.transparency()
    }

    /// True if stored colors are premultiplied by alpha.
    pub fn is_alpha_premultiplied(&self) -> bool {
        self.color_model.is_alpha_premultiplied()
    }

    // ========================================================================
    // ARGB access
    // ========================================================================

    /// Pixel `(x, y)` as default ARGB.
    pub fn rgb(&self, x: i32, y: i32) -> Result<u32> {
        let data = self.raster.data_elements(x, y, None)?;
        self.color_model.rgb_data(&data)
    }

    /// Stores default ARGB `argb` at `(x, y)`.
    pub fn set_rgb(&self, x: i32, y: i32, argb: u32) -> Result<()> {
        let data = self.color_model.data_elements(argb, None)?;
        self.raster.set_data_elements(x, y, &data)
    }

    /// A region as default ARGB, rows top to bottom.
    pub fn rgb_rect(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Vec<u32>> {
        trace!(x, y, w, h, "image::rgb_rect");
        let mut out = Vec::with_capacity((w.max(0) as usize) * (h.max(0) as usize));
        let mut data: Option<DataElements> = None;
        for py in y..y.saturating_add(h.max(0)) {
            for px in x..x.saturating_add(w.max(0)) {
                let elems = self.raster.data_elements(px, py, data.take())?;
                out.push(self.color_model.rgb_data(&elems)?);
                data = Some(elems);
            }
        }
        Ok(out)
    }

    /// Stores `w * h` default ARGB values, rows top to bottom.
    pub fn set_rgb_rect(&self, x: i32, y: i32, w: i32, h: i32, argb: &[u32]) -> Result<()> {
        let w = w.max(0);
        let h = h.max(0);
        Error::check_len(w as usize * h as usize, argb.len())?;
        trace!(x, y, w, h, "image::set_rgb_rect");
        let mut data: Option<DataElements> = None;
        for (i, &c) in argb.iter().take(w as usize * h as usize).enumerate() {
            let (dx, dy) = ((i % w as usize) as i32, (i / w as usize) as i32);
            let elems = self.color_model.data_elements(c, data.take())?;
            self.raster.set_data_elements(x + dx, y + dy, &elems)?;
            data = Some(elems);
        }
        Ok(())
    }

    // ========================================================================
    // Views and copies
    // ========================================================================

    /// The `w x h` region at `(x, y)` as an image sharing this one's
    /// storage.
    pub fn subimage(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Image> {
        let child = self.raster.create_writable_child(x, y, w, h, 0, 0, None)?;
        Self::from_raster(self.color_model.clone(), child, self.is_alpha_premultiplied())
    }

    /// The single tile, `(0, 0)`, aliasing the image storage.
    pub fn tile(&self, tx: i32, ty: i32) -> Result<Raster> {
        self.writable_tile(tx, ty).map(Raster::from)
    }

    /// Writable form of [`Image::tile`].
    pub fn writable_tile(&self, tx: i32, ty: i32) -> Result<WritableRaster> {
        if tx != 0 || ty != 0 {
            return Err(Error::invalid_argument(format!("tile ({tx}, {ty}) does not exist")));
        }
        Ok(self.raster.clone())
    }

    /// A deep copy of the whole raster.
    pub fn data(&self) -> Result<Raster> {
        self.raster.data().map(Raster::from)
    }

    /// A deep copy of `rect`, positioned at `rect`'s origin.
    pub fn data_rect(&self, rect: Rect) -> Result<Raster> {
        let out = self.raster.create_compatible_writable_at(rect)?;
        let region = self
            .raster
            .create_child(rect.x, rect.y, rect.width, rect.height, rect.x, rect.y, None)?;
        region.copy_into(&out)?;
        Ok(out.into())
    }

    /// Copies the part of the image that overlaps `dst` into `dst`.
    pub fn copy_data(&self, dst: &WritableRaster) -> Result<()> {
        self.raster.copy_into(dst)
    }

    /// Copies the part of `src` that overlaps the image, using `src`'s own
    /// coordinates.
    pub fn set_data(&self, src: &Raster) -> Result<()> {
        self.raster.set_rect(0, 0, src)
    }

    /// The alpha band as a one-band raster sharing storage, or `None`.
    pub fn alpha_raster(&self) -> Result<Option<WritableRaster>> {
        self.color_model.alpha_raster(&self.raster)
    }

    /// Switches the stored colors to (or from) premultiplied form,
    /// replacing the color model to match. A no-op without alpha or when
    /// the state already matches.
    pub fn coerce_data(&mut self, premultiplied: bool) -> Result<()> {
        if self.color_model.has_alpha() && self.color_model.is_alpha_premultiplied() != premultiplied {
            self.color_model = self.color_model.coerce_data(&self.raster, premultiplied)?;
            self.image_type = ImageType::classify(&self.color_model, &self.raster);
        }
        Ok(())
    }

    /// Copies the overlapping region into `dst`, converting through ARGB
    /// unless both images use equal color models and transfer arrays.
    pub fn copy_to(&self, dst: &Image) -> Result<()> {
        let w = self.width().min(dst.width());
        let h = self.height().min(dst.height());
        let direct = self.color_model == dst.color_model
            && self.raster.transfer_type() == dst.raster.transfer_type()
            && self.raster.num_data_elements() == dst.raster.num_data_elements();
        trace!(w, h, direct, "image::copy_to");
        if direct {
            let region = self.raster.create_child(0, 0, w, h, 0, 0, None)?;
            return dst.raster.set_data_elements_from(0, 0, &region);
        }
        for y in 0..h {
            let row = self.rgb_rect(0, y, w, 1)?;
            dst.set_rgb_rect(0, y, w, 1, &row)?;
        }
        Ok(())
    }

    /// Expands an indexed image into [`ImageType::IntArgb`] (when the
    /// palette has alpha or `force_argb` is set) or [`ImageType::IntRgb`].
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] if the color model is not indexed.
    pub fn expand_indexed(&self, force_argb: bool) -> Result<Image> {
        let ColorModel::Indexed(icm) = &self.color_model else {
            return Err(Error::unsupported(format!(
                "cannot expand a {} color model",
                self.color_model.kind()
            )));
        };
        let image_type = if force_argb || icm.info().has_alpha() {
            ImageType::IntArgb
        } else {
            ImageType::IntRgb
        };
        let out = Image::new(self.width(), self.height(), image_type)?;
        let w = self.width();
        for y in 0..self.height() {
            let row = self
                .raster
                .samples(0, y, w, 1, 0)?
                .into_iter()
                .map(|s| icm.rgb(s as u32))
                .collect::<Result<Vec<_>>>()?;
            out.set_rgb_rect(0, y, w, 1, &row)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfmt_raster::SampleLayout;

    #[test]
    fn test_standard_types_classify_as_themselves() {
        for ty in ImageType::STANDARD {
            let img = Image::new(3, 2, ty).unwrap();
            assert_eq!(img.image_type(), ty);
            assert_eq!(ImageType::classify(img.color_model(), img.raster()), ty, "{ty}");
            assert_eq!((img.width(), img.height()), (3, 2));
        }
        assert!(Image::new(3, 2, ImageType::Custom).is_err());
    }

    #[test]
    fn test_opaque_rgb_roundtrip() {
        let colors = [0xff000000u32, 0xffffffff, 0xffff0000, 0xff00ff00, 0xff0000ff];
        for ty in [
            ImageType::IntRgb,
            ImageType::IntArgb,
            ImageType::IntBgr,
            ImageType::ThreeByteBgr,
            ImageType::FourByteAbgr,
            ImageType::Ushort565Rgb,
            ImageType::Ushort555Rgb,
            ImageType::ByteIndexed,
        ] {
            let img = Image::new(2, 2, ty).unwrap();
            for &c in &colors {
                img.set_rgb(1, 1, c).unwrap();
                assert_eq!(img.rgb(1, 1).unwrap(), c, "{ty} {c:#010x}");
            }
        }
    }

    #[test]
    fn test_gray_and_binary_extremes() {
        for ty in [ImageType::ByteGray, ImageType::UshortGray, ImageType::ByteBinary] {
            let img = Image::new(2, 1, ty).unwrap();
            img.set_rgb(0, 0, 0xffffffff).unwrap();
            assert_eq!(img.rgb(0, 0).unwrap(), 0xffffffff, "{ty}");
            assert_eq!(img.rgb(1, 0).unwrap(), 0xff000000, "{ty}");
        }
    }

    #[test]
    fn test_byte_layouts() {
        let img = Image::new(1, 1, ImageType::ThreeByteBgr).unwrap();
        img.set_rgb(0, 0, 0xff102030).unwrap();
        let buf = img.raster().data_buffer().read();
        assert_eq!([buf.elem(0, 0), buf.elem(0, 1), buf.elem(0, 2)], [0x30, 0x20, 0x10]);
        drop(buf);

        let img = Image::new(1, 1, ImageType::FourByteAbgr).unwrap();
        img.set_rgb(0, 0, 0x80102030).unwrap();
        let buf = img.raster().data_buffer().read();
        assert_eq!(buf.elem(0, 0), 0x80);
        assert_eq!(buf.elem(0, 3), 0x10);
    }

    #[test]
    fn test_indexed_nearest() {
        let img = Image::new(1, 1, ImageType::ByteIndexed).unwrap();
        img.set_rgb(0, 0, 0xff330066).unwrap();
        assert_eq!(img.rgb(0, 0).unwrap(), 0xff330066);
        img.set_rgb(0, 0, 0xff340067).unwrap();
        assert_eq!(img.rgb(0, 0).unwrap(), 0xff330066);
    }

    #[test]
    fn test_rect_access() {
        let img = Image::new(3, 2, ImageType::IntArgb).unwrap();
        let px: Vec<u32> = (0..6).map(|i| 0xff000000 | i).collect();
        img.set_rgb_rect(0, 0, 3, 2, &px).unwrap();
        assert_eq!(img.rgb_rect(0, 0, 3, 2).unwrap(), px);
        assert_eq!(img.rgb_rect(1, 1, 2, 1).unwrap(), vec![0xff000004, 0xff000005]);
        assert!(img.set_rgb_rect(0, 0, 3, 2, &px[..5]).is_err());
        assert!(img.rgb(3, 0).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_from_raster_validation() {
        let cm = ColorModel::rgb_default();
        let bytes = factory::interleaved(DataType::Byte, 2, 2, 4, None).unwrap();
        assert!(matches!(
            Image::from_raster(cm.clone(), bytes, false),
            Err(Error::Incompatible(_))
        ));
        let moved = cm.create_compatible_writable_raster(2, 2).unwrap();
        let moved = moved.create_writable_translated_child(1, 0).unwrap();
        assert!(matches!(
            Image::from_raster(cm, moved, false),
            Err(Error::RasterFormat(_))
        ));
    }

    #[test]
    fn test_from_raster_unpremultiplies() {
        let cm = ColorModel::rgb_default();
        let raster = cm.create_compatible_writable_raster(1, 1).unwrap();
        raster.set_pixel(0, 0, &[100, 50, 25, 128]).unwrap();
        let img = Image::from_raster(cm, raster, true).unwrap();
        assert_eq!(img.image_type(), ImageType::IntArgb);
        assert_eq!(img.raster().pixel(0, 0).unwrap(), vec![199, 100, 50, 128]);
    }

    #[test]
    fn test_from_raster_premultiplies() {
        let straight = ColorModel::rgb_default();
        let raster = straight.create_compatible_writable_raster(2, 1).unwrap();
        raster.set_pixel(0, 0, &[200, 100, 3, 128]).unwrap();
        raster.set_pixel(1, 0, &[200, 100, 3, 255]).unwrap();
        let pre = straight.coerce_data(&raster.data().unwrap(), true).unwrap();

        let img = Image::from_raster(pre, raster.clone(), false).unwrap();
        assert_eq!(img.image_type(), ImageType::IntArgbPre);
        assert_eq!(raster.pixel(0, 0).unwrap(), vec![100, 50, 2, 128]);
        assert_eq!(raster.pixel(1, 0).unwrap(), vec![200, 100, 3, 255]);
    }

    #[test]
    fn test_custom_pair() {
        let cm: ColorModel = ComponentColorModel::new(
            colorspace::srgb(),
            None,
            false,
            false,
            Transparency::Opaque,
            DataType::UShort,
        )
        .unwrap()
        .into();
        let raster = cm.create_compatible_writable_raster(2, 2).unwrap();
        let img = Image::from_raster(cm, raster, false).unwrap();
        assert_eq!(img.image_type(), ImageType::Custom);
        img.set_rgb(0, 0, 0xffff0000).unwrap();
        assert_eq!(img.raster().pixel(0, 0).unwrap(), vec![65535, 0, 0]);
    }

    #[test]
    fn test_subimage_aliases() {
        let img = Image::new(4, 4, ImageType::IntRgb).unwrap();
        let sub = img.subimage(1, 2, 2, 2).unwrap();
        assert_eq!(sub.image_type(), ImageType::IntRgb);
        sub.set_rgb(1, 1, 0xff123456).unwrap();
        assert_eq!(img.rgb(2, 3).unwrap(), 0xff123456);
        assert!(img.subimage(3, 3, 2, 2).is_err());
    }

    #[test]
    fn test_tiles_alias_and_data_copies() {
        let img = Image::new(2, 2, ImageType::IntRgb).unwrap();
        let tile = img.writable_tile(0, 0).unwrap();
        tile.set_pixel(0, 0, &[1, 2, 3]).unwrap();
        assert_eq!(img.rgb(0, 0).unwrap(), 0xff010203);
        assert!(img.tile(1, 0).is_err());

        let copy = img.data().unwrap();
        img.set_rgb(0, 0, 0xffffffff).unwrap();
        assert_eq!(copy.pixel(0, 0).unwrap(), vec![1, 2, 3]);
        assert!(!copy.data_buffer().ptr_eq(img.raster().data_buffer()));

        let part = img.data_rect(Rect::new(1, 1, 1, 1)).unwrap();
        assert_eq!((part.min_x(), part.min_y(), part.width()), (1, 1, 1));
        assert!(img.data_rect(Rect::new(1, 1, 2, 2)).is_err());
    }

    #[test]
    fn test_copy_and_set_data() {
        let img = Image::new(2, 2, ImageType::IntRgb).unwrap();
        img.set_rgb(1, 1, 0xff0a0b0c).unwrap();
        let out = img.raster().create_compatible_writable(2, 2).unwrap();
        img.copy_data(&out).unwrap();
        assert_eq!(out.pixel(1, 1).unwrap(), vec![10, 11, 12]);

        let src = factory::packed(DataType::Int, 1, 1, &[0xff_0000, 0xff00, 0xff], Some((1, 0))).unwrap();
        src.set_pixel(1, 0, &[7, 8, 9]).unwrap();
        img.set_data(&src).unwrap();
        assert_eq!(img.rgb(1, 0).unwrap(), 0xff070809);
    }

    #[test]
    fn test_alpha_raster_and_coerce() {
        let mut img = Image::new(1, 1, ImageType::IntArgb).unwrap();
        img.set_rgb(0, 0, 0x80c86432).unwrap();
        let alpha = img.alpha_raster().unwrap().unwrap();
        assert_eq!(alpha.sample(0, 0, 0).unwrap(), 0x80);

        img.coerce_data(true).unwrap();
        assert!(img.is_alpha_premultiplied());
        assert_eq!(img.image_type(), ImageType::IntArgbPre);
        assert_eq!(img.raster().pixel(0, 0).unwrap(), vec![100, 50, 25, 128]);

        let mut rgb = Image::new(1, 1, ImageType::IntRgb).unwrap();
        rgb.coerce_data(true).unwrap();
        assert!(!rgb.is_alpha_premultiplied());
        assert!(rgb.alpha_raster().unwrap().is_none());
    }

    #[test]
    fn test_copy_to() {
        let src = Image::new(2, 2, ImageType::IntRgb).unwrap();
        src.set_rgb(1, 0, 0xff00ff00).unwrap();
        let same = Image::new(3, 3, ImageType::IntRgb).unwrap();
        src.copy_to(&same).unwrap();
        assert_eq!(same.rgb(1, 0).unwrap(), 0xff00ff00);

        let other = Image::new(2, 2, ImageType::ThreeByteBgr).unwrap();
        src.copy_to(&other).unwrap();
        assert_eq!(other.rgb(1, 0).unwrap(), 0xff00ff00);
        assert_eq!(other.rgb(0, 0).unwrap(), 0xff000000);
    }

    #[test]
    fn test_with_palette() {
        let p = [0u8, 85, 170, 255];
        let pal = IndexColorModel::from_planes(2, 4, &p, &p, &p).unwrap();
        let img = Image::with_palette(5, 1, ImageType::ByteBinary, pal.clone()).unwrap();
        assert_eq!(img.image_type(), ImageType::ByteBinary);
        let mpp = img.raster().sample_model().as_multi_pixel_packed().unwrap();
        assert_eq!(mpp.pixel_bit_stride(), 2);
        img.set_rgb(4, 0, 0xffaaaaaa).unwrap();
        assert_eq!(img.raster().sample(4, 0, 0).unwrap(), 2);

        let indexed = Image::with_palette(2, 2, ImageType::ByteIndexed, pal.clone()).unwrap();
        assert_eq!(indexed.image_type(), ImageType::ByteIndexed);
        assert!(Image::with_palette(2, 2, ImageType::IntRgb, pal).is_err());

        let v: Vec<u8> = (0..17).collect();
        let big = IndexColorModel::from_planes(8, 17, &v, &v, &v).unwrap();
        assert!(Image::with_palette(2, 2, ImageType::ByteBinary, big).is_err());
    }

    #[test]
    fn test_expand_indexed() {
        let pal = IndexColorModel::from_planes(1, 2, &[0, 255], &[0, 0], &[0, 0]).unwrap();
        let img = Image::with_palette(2, 1, ImageType::ByteBinary, pal).unwrap();
        img.raster().set_sample(1, 0, 0, 1).unwrap();
        let rgb = img.expand_indexed(false).unwrap();
        assert_eq!(rgb.image_type(), ImageType::IntRgb);
        assert_eq!(rgb.rgb_rect(0, 0, 2, 1).unwrap(), vec![0xff000000, 0xffff0000]);
        let argb = img.expand_indexed(true).unwrap();
        assert_eq!(argb.image_type(), ImageType::IntArgb);
        assert_eq!(argb.raster().sample_model().num_bands(), 4);

        let plain = Image::new(1, 1, ImageType::IntRgb).unwrap();
        assert!(plain.expand_indexed(false).unwrap_err().is_unsupported());
    }
}
