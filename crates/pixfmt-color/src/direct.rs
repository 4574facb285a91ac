//! RGB(A) components packed as bitfields of one integer pixel.
//!
//! Each component is a contiguous mask; reading it is
//! `(pixel & mask) >> offset`. Components narrower or wider than 8 bits are
//! rescaled to 8-bit sRGB on the way out. Linear RGB spaces go through the
//! gamma tables at 8-bit precision when every color field fits in 8 bits,
//! 16-bit otherwise.

use pixfmt_core::colorspace::{self, ColorSpaceType};
use pixfmt_core::{
    max_unsigned, settings, BuiltinSpace, ColorSpaceRef, DataElements, DataType, Error, Result, Transparency,
};
use pixfmt_lut::gamma;
use pixfmt_raster::{mask_field, Raster, SampleLayout, SampleModel, SinglePixelPackedSampleModel, WritableRaster};
use tracing::trace;

use crate::model::{alpha_child, pack_argb, scale_by_alpha, unit_to_u8, unpack_argb, ModelInfo};

const MASK_NAMES: [&str; 4] = ["red", "green", "blue", "alpha"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Srgb,
    LinearRgb { precision: u32 },
    Generic,
}

/// Color model for pixels packed into one `Byte`, `UShort` or `Int`.
#[derive(Debug, Clone)]
pub struct DirectColorModel {
    info: ModelInfo,
    masks: Vec<u32>,
    offsets: Vec<u32>,
    path: Path,
}

impl DirectColorModel {
    /// An sRGB, non-premultiplied model with the transfer type implied by
    /// `bits`. An `alpha_mask` of 0 means no alpha.
    pub fn new(bits: u32, red_mask: u32, green_mask: u32, blue_mask: u32, alpha_mask: u32) -> Result<Self> {
        let transfer_type = DataType::for_pixel_bits(bits).filter(|_| bits > 0).ok_or_else(|| {
            Error::invalid_argument(format!("number of bits ({bits}) must be between 1 and 32"))
        })?;
        Self::with_color_space(
            colorspace::srgb(),
            bits,
            [red_mask, green_mask, blue_mask, alpha_mask],
            false,
            transfer_type,
        )
    }

    /// A model in any RGB color space whose components range over `0..1`.
    ///
    /// `masks` is red, green, blue, alpha; an alpha mask of 0 means no
    /// alpha.
    ///
    /// # Errors
    ///
    /// `bits` outside `1..=32`, a non-RGB space or one with a non-unit
    /// range, storage other than byte/ushort/int, or a mask that is not
    /// contiguous or does not fit in `bits`.
    pub fn with_color_space(
        color_space: ColorSpaceRef,
        bits: u32,
        masks: [u32; 4],
        premultiplied: bool,
        transfer_type: DataType,
    ) -> Result<Self> {
        if !(1..=32).contains(&bits) {
            return Err(Error::invalid_argument(format!(
                "number of bits ({bits}) must be between 1 and 32"
            )));
        }
        if color_space.space_type() != ColorSpaceType::Rgb {
            return Err(Error::invalid_argument("color space must be an RGB space"));
        }
        if !transfer_type.is_unsigned_integral() {
            return Err(Error::invalid_argument(format!(
                "transfer type {transfer_type} is not compatible with packed pixels"
            )));
        }
        let has_alpha = masks[3] != 0;
        let used = if has_alpha { 4 } else { 3 };
        let mut sizes = Vec::with_capacity(used);
        for (i, &mask) in masks[..used].iter().enumerate() {
            let (offset, size) = mask_field(mask).map_err(|_| {
                Error::invalid_argument(format!("{} mask {mask:#x} must be contiguous", MASK_NAMES[i]))
            })?;
            if offset + size > bits {
                return Err(Error::invalid_argument(format!(
                    "{} mask {mask:#x} overflows pixel (expecting {bits} bits)",
                    MASK_NAMES[i]
                )));
            }
            sizes.push(size);
        }
        for i in 0..used {
            for j in i + 1..used {
                if masks[i] & masks[j] != 0 {
                    return Err(Error::invalid_argument(format!(
                        "{} mask {:#x} overlaps {} mask {:#x}",
                        MASK_NAMES[i], masks[i], MASK_NAMES[j], masks[j]
                    )));
                }
            }
        }

        let path = match color_space.builtin() {
            Some(BuiltinSpace::Srgb) => Path::Srgb,
            Some(BuiltinSpace::LinearRgb) => Path::LinearRgb {
                precision: if sizes[..3].iter().all(|&s| s <= 8) { 8 } else { 16 },
            },
            _ => {
                if (0..3).any(|i| color_space.min_value(i) != 0.0 || color_space.max_value(i) != 1.0) {
                    return Err(Error::invalid_argument("illegal min/max RGB component value"));
                }
                Path::Generic
            }
        };
        let transparency = if has_alpha { Transparency::Translucent } else { Transparency::Opaque };
        let info = ModelInfo::new(
            color_space,
            sizes,
            bits,
            has_alpha,
            premultiplied,
            transparency,
            transfer_type,
        )?;
        if settings().prebuild_luts {
            gamma::prebuild();
        }
        trace!(bits, ?masks, ?path, premultiplied, "direct color model");
        Ok(Self::assemble(info, masks[..used].to_vec(), path))
    }

    /// 8-bit ARGB in one `Int`: alpha `0xff000000`, red `0xff0000`, green
    /// `0xff00`, blue `0xff`.
    pub fn rgb_default() -> Self {
        let info = ModelInfo::from_parts(
            colorspace::srgb(),
            vec![8; 4],
            32,
            true,
            false,
            Transparency::Translucent,
            DataType::Int,
        );
        Self::assemble(info, vec![0xff0000, 0xff00, 0xff, 0xff000000], Path::Srgb)
    }

    fn assemble(info: ModelInfo, masks: Vec<u32>, path: Path) -> Self {
        let offsets = masks
            .iter()
            .map(|&m| if m == 0 { 0 } else { m.trailing_zeros() })
            .collect();
        Self {
            info,
            masks,
            offsets,
            path,
        }
    }

    /// The shared description.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Red mask.
    pub fn red_mask(&self) -> u32 {
        self.masks[0]
    }

    /// Green mask.
    pub fn green_mask(&self) -> u32 {
        self.masks[1]
    }

    /// Blue mask.
    pub fn blue_mask(&self) -> u32 {
        self.masks[2]
    }

    /// Alpha mask, 0 without alpha.
    pub fn alpha_mask(&self) -> u32 {
        self.masks.get(3).copied().unwrap_or(0)
    }

    /// Masks of every component, alpha last when present.
    pub fn masks(&self) -> &[u32] {
        &self.masks
    }

    // ------------------------------------------------------------------------
    // Field access
    // ------------------------------------------------------------------------

    #[inline]
    fn field(&self, pixel: u32, i: usize) -> u32 {
        (pixel & self.masks[i]) >> self.offsets[i]
    }

    /// Field `i` as a unit value.
    #[inline]
    fn unit(&self, pixel: u32, i: usize) -> f64 {
        let max = self.info.max_value(i);
        if max == 0.0 { 0.0 } else { self.field(pixel, i) as f64 / max }
    }

    /// Color field `idx` rescaled to `precision` bits, with premultiplied
    /// alpha divided out.
    fn rescaled(&self, pixel: u32, idx: usize, precision: u32) -> usize {
        let max = max_unsigned(precision) as f64;
        let v = if self.info.is_alpha_premultiplied() {
            let a = self.unit(pixel, 3);
            if a == 0.0 {
                return 0;
            }
            (self.unit(pixel, idx) / a * max + 0.5).floor()
        } else if self.info.component_sizes()[idx] == precision {
            self.field(pixel, idx) as f64
        } else {
            (self.unit(pixel, idx) * max + 0.5).floor()
        };
        v.clamp(0.0, max) as usize
    }

    fn rgb_component(&self, pixel: u32, idx: usize) -> Result<u8> {
        Ok(match self.path {
            Path::Srgb => self.rescaled(pixel, idx, 8) as u8,
            Path::LinearRgb { precision: 8 } => gamma::linear8_to_srgb8()[self.rescaled(pixel, idx, 8)],
            Path::LinearRgb { .. } => gamma::linear16_to_srgb8()[self.rescaled(pixel, idx, 16)],
            Path::Generic => unit_to_u8(self.generic_rgb(pixel)?[idx]),
        })
    }

    fn generic_rgb(&self, pixel: u32) -> Result<[f32; 3]> {
        let norm = self.info.normalize(&self.components(pixel)?)?;
        Ok(self.info.color_space().to_rgb(&norm[..3]))
    }

    /// The pixel held in a one-element transfer array.
    fn pixel_of(&self, data: &DataElements) -> Result<u32> {
        let dt = self.info.transfer_type();
        data.expect(dt, 1)?;
        Ok(data.get_int(0) as u32 & max_unsigned(dt.size_bits()))
    }

    fn wrap(&self, pixel: u32, reuse: Option<DataElements>) -> Result<DataElements> {
        let mut out = DataElements::reuse(reuse, self.info.transfer_type(), 1)?;
        out.set_int(0, pixel as i32);
        Ok(out)
    }

    // ------------------------------------------------------------------------
    // Single-integer pixels
    // ------------------------------------------------------------------------

    /// Red as 8-bit sRGB.
    pub fn red(&self, pixel: u32) -> Result<u8> {
        self.rgb_component(pixel, 0)
    }

    /// Green as 8-bit sRGB.
    pub fn green(&self, pixel: u32) -> Result<u8> {
        self.rgb_component(pixel, 1)
    }

    /// Blue as 8-bit sRGB.
    pub fn blue(&self, pixel: u32) -> Result<u8> {
        self.rgb_component(pixel, 2)
    }

    /// Alpha rescaled to 8 bits, 255 without alpha.
    pub fn alpha(&self, pixel: u32) -> Result<u8> {
        if !self.info.has_alpha() {
            return Ok(255);
        }
        Ok(if self.info.component_sizes()[3] == 8 {
            self.field(pixel, 3) as u8
        } else {
            unit_to_u8(self.unit(pixel, 3) as f32)
        })
    }

    /// Pixel as default ARGB.
    pub fn rgb(&self, pixel: u32) -> Result<u32> {
        let alpha = self.alpha(pixel)?;
        if self.path == Path::Generic {
            let rgb = self.generic_rgb(pixel)?;
            return Ok(pack_argb(alpha, unit_to_u8(rgb[0]), unit_to_u8(rgb[1]), unit_to_u8(rgb[2])));
        }
        Ok(pack_argb(
            alpha,
            self.rgb_component(pixel, 0)?,
            self.rgb_component(pixel, 1)?,
            self.rgb_component(pixel, 2)?,
        ))
    }

    // ------------------------------------------------------------------------
    // Transfer arrays
    // ------------------------------------------------------------------------

    /// Red of a one-element transfer array.
    pub fn red_data(&self, data: &DataElements) -> Result<u8> {
        self.red(self.pixel_of(data)?)
    }

    /// Green of a one-element transfer array.
    pub fn green_data(&self, data: &DataElements) -> Result<u8> {
        self.green(self.pixel_of(data)?)
    }

    /// Blue of a one-element transfer array.
    pub fn blue_data(&self, data: &DataElements) -> Result<u8> {
        self.blue(self.pixel_of(data)?)
    }

    /// Alpha of a one-element transfer array.
    pub fn alpha_data(&self, data: &DataElements) -> Result<u8> {
        self.alpha(self.pixel_of(data)?)
    }

    /// One-element transfer array as default ARGB.
    pub fn rgb_data(&self, data: &DataElements) -> Result<u32> {
        self.rgb(self.pixel_of(data)?)
    }

    /// Default ARGB to a one-element transfer array.
    pub fn data_elements(&self, argb: u32, reuse: Option<DataElements>) -> Result<DataElements> {
        let (a8, r8, g8, b8) = unpack_argb(argb);
        let mut units: [f64; 3] = match self.path {
            Path::Srgb => [r8, g8, b8].map(|c| c as f64 / 255.0),
            Path::LinearRgb { precision: 8 } => {
                let lut = gamma::srgb8_to_linear8();
                [r8, g8, b8].map(|c| lut[c as usize] as f64 / 255.0)
            }
            Path::LinearRgb { .. } => {
                let lut = gamma::srgb8_to_linear16();
                [r8, g8, b8].map(|c| lut[c as usize] as f64 / 65535.0)
            }
            Path::Generic => {
                let norm = self.info.color_space().from_rgb([r8, g8, b8].map(|c| c as f32 / 255.0));
                [norm[0] as f64, norm[1] as f64, norm[2] as f64]
            }
        };
        let alpha = a8 as f64 / 255.0;
        if self.info.has_alpha() && self.info.is_alpha_premultiplied() {
            units.iter_mut().for_each(|u| *u *= alpha);
        }
        let mut pixel = 0u32;
        for (i, &u) in units.iter().enumerate() {
            pixel |= self.place(u, i);
        }
        if self.info.has_alpha() {
            pixel |= self.place(alpha, 3);
        }
        self.wrap(pixel, reuse)
    }

    /// Unit value scaled into field `i`, shifted into place.
    #[inline]
    fn place(&self, unit: f64, i: usize) -> u32 {
        let max = self.info.max_value(i);
        let v = (unit.clamp(0.0, 1.0) * max + 0.5).floor().min(max) as u32;
        (v.checked_shl(self.offsets[i]).unwrap_or(0)) & self.masks[i]
    }

    // ------------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------------

    /// Unnormalized fields of `pixel`, alpha last.
    pub fn components(&self, pixel: u32) -> Result<Vec<u32>> {
        Ok((0..self.info.num_components()).map(|i| self.field(pixel, i)).collect())
    }

    /// Unnormalized fields of a one-element transfer array.
    pub fn components_data(&self, data: &DataElements) -> Result<Vec<u32>> {
        self.components(self.pixel_of(data)?)
    }

    /// Normalized, non-premultiplied components of a transfer array.
    pub fn normalized_components(&self, data: &DataElements) -> Result<Vec<f32>> {
        self.info.normalize(&self.components_data(data)?)
    }

    /// Unnormalized to normalized components.
    pub fn normalized_from_components(&self, components: &[u32]) -> Result<Vec<f32>> {
        self.info.normalize(components)
    }

    /// Normalized to unnormalized components.
    pub fn unnormalized_components(&self, normalized: &[f32]) -> Result<Vec<u32>> {
        self.info.unnormalize(normalized)
    }

    /// Fields ORed into one pixel; values wider than a field are clipped.
    pub fn data_element(&self, components: &[u32]) -> Result<u32> {
        self.info.check_components(components.len())?;
        Ok(components
            .iter()
            .zip(self.masks.iter().zip(&self.offsets))
            .fold(0, |pixel, (&c, (&mask, &offset))| {
                pixel | (c.checked_shl(offset).unwrap_or(0) & mask)
            }))
    }

    /// Fields packed into a one-element transfer array.
    pub fn data_elements_from_components(
        &self,
        components: &[u32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        self.wrap(self.data_element(components)?, reuse)
    }

    /// Normalized components packed into one pixel.
    pub fn data_element_normalized(&self, normalized: &[f32]) -> Result<u32> {
        self.data_element(&self.info.unnormalize(normalized)?)
    }

    /// Normalized components packed into a one-element transfer array.
    pub fn data_elements_from_normalized(
        &self,
        normalized: &[f32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        self.wrap(self.data_element_normalized(normalized)?, reuse)
    }

    // ------------------------------------------------------------------------
    // Rasters
    // ------------------------------------------------------------------------

    fn rescale_alpha(&self, raster: &WritableRaster, premultiply: bool) -> Result<()> {
        if !self.is_compatible_raster(raster) {
            return Err(Error::incompatible("raster is not compatible with this color model"));
        }
        let max: Vec<f64> = (0..self.info.num_components()).map(|i| self.info.max_value(i)).collect();
        trace!(
            premultiply,
            width = raster.width(),
            height = raster.height(),
            "coercing packed raster"
        );
        scale_by_alpha(raster, &max, premultiply)
    }

    /// Premultiplies or un-premultiplies `raster` in place and returns the
    /// model describing the result.
    pub fn coerce_data(&self, raster: &WritableRaster, premultiplied: bool) -> Result<Self> {
        if !self.info.has_alpha() || self.info.is_alpha_premultiplied() == premultiplied {
            return Ok(self.clone());
        }
        self.rescale_alpha(raster, premultiplied)?;
        let mut masks = [0u32; 4];
        masks[..self.masks.len()].copy_from_slice(&self.masks);
        Self::with_color_space(
            self.info.color_space().clone(),
            self.info.pixel_size(),
            masks,
            premultiplied,
            self.info.transfer_type(),
        )
    }

    /// Rewrites `raster`, whose colors are premultiplied when
    /// `raster_premultiplied` is set, into this model's alpha state.
    pub fn coerce_raster(&self, raster: &WritableRaster, raster_premultiplied: bool) -> Result<()> {
        let premultiplied = self.info.is_alpha_premultiplied();
        if !self.info.has_alpha() || raster_premultiplied == premultiplied {
            return Ok(());
        }
        self.rescale_alpha(raster, premultiplied)
    }

    fn masks_match(&self, sm: &SinglePixelPackedSampleModel) -> bool {
        sm.bit_masks() == self.masks.as_slice()
    }

    /// True for single-pixel-packed rasters with identical masks and
    /// transfer type.
    pub fn is_compatible_raster(&self, raster: &Raster) -> bool {
        raster
            .sample_model()
            .as_single_pixel_packed()
            .is_some_and(|sm| self.masks_match(sm))
            && raster.transfer_type() == self.info.transfer_type()
    }

    /// True for single-pixel-packed sample models with identical masks and
    /// transfer type.
    pub fn is_compatible_sample_model(&self, sample_model: &SampleModel) -> bool {
        sample_model
            .as_single_pixel_packed()
            .is_some_and(|sm| self.masks_match(sm))
            && sample_model.transfer_type() == self.info.transfer_type()
    }

    /// A single-pixel-packed sample model with this model's masks.
    pub fn create_compatible_sample_model(&self, width: i32, height: i32) -> Result<SampleModel> {
        SinglePixelPackedSampleModel::new(self.info.transfer_type(), width, height, &self.masks)
            .map(SampleModel::SinglePixelPacked)
    }

    /// A new single-pixel-packed raster.
    pub fn create_compatible_writable_raster(&self, width: i32, height: i32) -> Result<WritableRaster> {
        pixfmt_raster::factory::packed(self.info.transfer_type(), width, height, &self.masks, None)
    }

    /// The alpha band of `raster`, or `None` without alpha.
    pub fn alpha_raster(&self, raster: &WritableRaster) -> Result<Option<WritableRaster>> {
        if !self.info.has_alpha() {
            return Ok(None);
        }
        alpha_child(raster).map(Some)
    }
}

impl PartialEq for DirectColorModel {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info && self.masks == other.masks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb565() -> DirectColorModel {
        DirectColorModel::new(16, 0xf800, 0x07e0, 0x001f, 0).unwrap()
    }

    #[test]
    fn test_default_argb_passthrough() {
        let cm = DirectColorModel::rgb_default();
        for argb in [0u32, 0xffffffff, 0x80402010, 0x12345678] {
            let px = cm.data_elements(argb, None).unwrap();
            assert_eq!(px.as_ints(), Some(&[argb as i32][..]));
            assert_eq!(cm.rgb(argb).unwrap(), argb);
        }
        assert_eq!(cm.info().transfer_type(), DataType::Int);
        assert_eq!(cm.info().transparency(), Transparency::Translucent);
    }

    #[test]
    fn test_565_expands_to_8_bits() {
        let cm = rgb565();
        assert_eq!(cm.info().transfer_type(), DataType::UShort);
        assert_eq!(cm.info().component_sizes(), &[5, 6, 5]);
        assert_eq!(cm.rgb(0xffff).unwrap(), 0xffffffff);
        assert_eq!(cm.rgb(0xf800).unwrap(), 0xffff0000);
        assert_eq!(cm.red(0x0800).unwrap(), 8);
        let px = cm.data_elements(0xff00ff00, None).unwrap();
        assert_eq!(px.as_ushorts(), Some(&[0x07e0][..]));
    }

    #[test]
    fn test_components_and_pixel() {
        let cm = rgb565();
        assert_eq!(cm.components(0xffff).unwrap(), vec![31, 63, 31]);
        assert_eq!(cm.data_element(&[1, 2, 3]).unwrap(), (1 << 11) | (2 << 5) | 3);
        let norm = cm.normalized_from_components(&[31, 0, 31]).unwrap();
        assert_eq!(norm, vec![1.0, 0.0, 1.0]);
        assert_eq!(cm.data_element_normalized(&norm).unwrap(), 0xf81f);
        assert!(cm.data_element(&[1, 2]).is_err());
    }

    #[test]
    fn test_premultiplied_decode() {
        let cm = DirectColorModel::with_color_space(
            colorspace::srgb(),
            32,
            [0xff0000, 0xff00, 0xff, 0xff000000],
            true,
            DataType::Int,
        )
        .unwrap();
        assert_eq!(cm.red(0x80800000).unwrap(), 255);
        assert_eq!(cm.rgb(0x00ffffff).unwrap(), 0);
        let px = cm.data_elements(0x80ff0000, None).unwrap();
        assert_eq!(px.as_ints(), Some(&[0x80800000u32 as i32][..]));
    }

    #[test]
    fn test_linear_rgb_precision() {
        let cm = DirectColorModel::with_color_space(
            colorspace::linear_rgb(),
            24,
            [0xff0000, 0xff00, 0xff, 0],
            false,
            DataType::Int,
        )
        .unwrap();
        assert_eq!(cm.rgb(0xffffff).unwrap(), 0xffffffff);
        assert_eq!(cm.rgb(0).unwrap(), 0xff000000);
        let px = cm.data_elements(0xffffffff, None).unwrap();
        assert_eq!(px.as_ints(), Some(&[0xffffff][..]));
    }

    #[test]
    fn test_rejects_bad_masks() {
        let err = DirectColorModel::new(16, 0xf0f0, 0x0f00, 0x000f, 0).unwrap_err();
        assert!(err.to_string().contains("contiguous"));
        let err = DirectColorModel::new(8, 0xf00, 0xf0, 0xf, 0).unwrap_err();
        assert!(err.to_string().contains("overflows"));
        let err = DirectColorModel::new(16, 0xff00, 0x0ff0, 0x000f, 0).unwrap_err();
        assert!(err.to_string().contains("overlaps"));
        assert!(DirectColorModel::new(32, 0xff0000, 0xff00, 0xff, 0xff800000).is_err());
        assert!(DirectColorModel::new(0, 0, 0, 1, 0).is_err());
        assert!(DirectColorModel::new(33, 0xff, 0xff00, 0xff0000, 0).is_err());
        let gray = DirectColorModel::with_color_space(
            colorspace::linear_gray(),
            8,
            [0xe0, 0x1c, 0x3, 0],
            false,
            DataType::Byte,
        );
        assert!(gray.is_err());
    }

    #[test]
    fn test_transfer_array_checks() {
        let cm = rgb565();
        assert!(cm.rgb_data(&DataElements::Int(vec![0])).is_err());
        assert_eq!(cm.rgb_data(&DataElements::UShort(vec![0x001f])).unwrap(), 0xff0000ff);
    }

    #[test]
    fn test_compatible_raster_and_coerce() {
        let cm = DirectColorModel::rgb_default();
        let r = cm.create_compatible_writable_raster(2, 1).unwrap();
        assert!(cm.is_compatible_raster(&r));
        assert!(!rgb565().is_compatible_raster(&r));
        r.set_data_elements(0, 0, &DataElements::Int(vec![0x80c86432u32 as i32])).unwrap();
        let pre = cm.coerce_data(&r, true).unwrap();
        assert!(pre.info().is_alpha_premultiplied());
        assert_eq!(r.pixel(0, 0).unwrap(), vec![100, 50, 25, 128]);
        let a = cm.alpha_raster(&r).unwrap().unwrap();
        assert_eq!(a.sample(0, 0, 0).unwrap(), 128);
        assert!(rgb565().alpha_raster(&r).unwrap().is_none());
    }

    #[test]
    fn test_coerce_raster_keeps_model() {
        let cm = DirectColorModel::rgb_default();
        let r = cm.create_compatible_writable_raster(1, 1).unwrap();
        r.set_pixel(0, 0, &[100, 50, 25, 128]).unwrap();
        cm.coerce_raster(&r, false).unwrap();
        assert_eq!(r.pixel(0, 0).unwrap(), vec![100, 50, 25, 128]);
        cm.coerce_raster(&r, true).unwrap();
        assert_eq!(r.pixel(0, 0).unwrap(), vec![199, 100, 50, 128]);
        assert!(!cm.info().is_alpha_premultiplied());

        let pre = cm.coerce_data(&r, true).unwrap();
        r.set_pixel(0, 0, &[200, 100, 3, 128]).unwrap();
        pre.coerce_raster(&r, false).unwrap();
        assert_eq!(r.pixel(0, 0).unwrap(), vec![100, 50, 2, 128]);
    }

    #[test]
    fn test_equality_includes_masks() {
        let bgr = DirectColorModel::new(24, 0xff, 0xff00, 0xff0000, 0).unwrap();
        let rgb = DirectColorModel::new(24, 0xff0000, 0xff00, 0xff, 0).unwrap();
        assert_ne!(bgr, rgb);
        assert_eq!(rgb, DirectColorModel::new(24, 0xff0000, 0xff00, 0xff, 0).unwrap());
    }
}
