//! The closed set of color models and the metadata they share.
//!
//! [`ColorModel`] dispatches to one of three concrete models:
//!
//! | Variant | Pixel | Conversion to ARGB |
//! |---------|-------|--------------------|
//! | [`Component`](ColorModel::Component) | one element per component | LUT fast paths or color space |
//! | [`Direct`](ColorModel::Direct) | one packed integer | bitfield extraction |
//! | [`Indexed`](ColorModel::Indexed) | one palette index | table lookup |
//!
//! Every method in the common surface exists on each concrete model with
//! the same name and signature; the enum only forwards.
//!
//! # Example
//!
//! ```rust
//! use pixfmt_color::ColorModel;
//!
//! let cm = ColorModel::rgb_default();
//! assert_eq!(cm.red(0x80ff4020).unwrap(), 0xff);
//! assert_eq!(cm.alpha(0x80ff4020).unwrap(), 0x80);
//! ```

use std::sync::OnceLock;

use pixfmt_core::colorspace::same_space;
use pixfmt_core::{max_unsigned, ColorSpaceRef, DataElements, DataType, Error, Result, Transparency};
use pixfmt_raster::{Raster, SampleModel, WritableRaster};

use crate::component::ComponentColorModel;
use crate::direct::DirectColorModel;
use crate::index::IndexColorModel;

// ============================================================================
// Shared metadata
// ============================================================================

/// Description common to all color models: color space, per-component bit
/// widths, alpha handling and transfer type.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    color_space: ColorSpaceRef,
    bits: Vec<u32>,
    pixel_bits: u32,
    has_alpha: bool,
    premultiplied: bool,
    transparency: Transparency,
    transfer_type: DataType,
}

impl ModelInfo {
    /// Validates and normalizes the shared description.
    ///
    /// `bits` must cover every color component plus alpha. Without alpha the
    /// model is forced opaque and not premultiplied.
    pub(crate) fn new(
        color_space: ColorSpaceRef,
        bits: Vec<u32>,
        pixel_bits: u32,
        has_alpha: bool,
        premultiplied: bool,
        transparency: Transparency,
        transfer_type: DataType,
    ) -> Result<Self> {
        let num_components = color_space.num_components() + has_alpha as usize;
        if bits.len() < num_components {
            return Err(Error::invalid_argument(format!(
                "number of color/alpha components should be {num_components} but length of bits array is {}",
                bits.len()
            )));
        }
        if bits[..num_components].iter().all(|&b| b == 0) {
            return Err(Error::invalid_argument(
                "there must be at least one component with > 0 pixel bits",
            ));
        }
        let (premultiplied, transparency) = if has_alpha {
            (premultiplied, transparency)
        } else {
            (false, Transparency::Opaque)
        };
        Ok(Self::from_parts(
            color_space,
            bits[..num_components].to_vec(),
            pixel_bits,
            has_alpha,
            premultiplied,
            transparency,
            transfer_type,
        ))
    }

    /// Assembles an already validated description.
    pub(crate) fn from_parts(
        color_space: ColorSpaceRef,
        bits: Vec<u32>,
        pixel_bits: u32,
        has_alpha: bool,
        premultiplied: bool,
        transparency: Transparency,
        transfer_type: DataType,
    ) -> Self {
        Self {
            color_space,
            bits,
            pixel_bits,
            has_alpha,
            premultiplied,
            transparency,
            transfer_type,
        }
    }

    /// The color space components are interpreted in.
    pub fn color_space(&self) -> &ColorSpaceRef {
        &self.color_space
    }

    /// Color components plus alpha.
    pub fn num_components(&self) -> usize {
        self.bits.len()
    }

    /// Color components only.
    pub fn num_color_components(&self) -> usize {
        self.color_space.num_components()
    }

    /// Significant bits of component `i`.
    pub fn component_size(&self, i: usize) -> Result<u32> {
        self.bits
            .get(i)
            .copied()
            .ok_or_else(|| Error::invalid_argument(format!("component index {i} out of range")))
    }

    /// Significant bits of every component.
    pub fn component_sizes(&self) -> &[u32] {
        &self.bits
    }

    /// Bits per pixel.
    pub fn pixel_size(&self) -> u32 {
        self.pixel_bits
    }

    /// Widest component.
    pub fn max_bits(&self) -> u32 {
        self.bits.iter().copied().max().unwrap_or(0)
    }

    /// True if the last component is alpha.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// True if color components are stored multiplied by alpha.
    pub fn is_alpha_premultiplied(&self) -> bool {
        self.premultiplied
    }

    /// Alpha values the model can produce.
    pub fn transparency(&self) -> Transparency {
        self.transparency
    }

    /// Element kind of the per-pixel transfer array.
    pub fn transfer_type(&self) -> DataType {
        self.transfer_type
    }

    /// `2^bits - 1` of component `i` as a float.
    #[inline]
    pub(crate) fn max_value(&self, i: usize) -> f64 {
        max_unsigned(self.bits[i]) as f64
    }

    /// Checks the length of a caller-supplied component array.
    pub(crate) fn check_components(&self, len: usize) -> Result<()> {
        let n = self.num_components();
        if len < n {
            return Err(Error::invalid_argument(format!(
                "incorrect number of components, expecting {n}"
            )));
        }
        Ok(())
    }

    /// Unnormalized to normalized, dividing out premultiplied alpha.
    pub(crate) fn normalize(&self, components: &[u32]) -> Result<Vec<f32>> {
        self.check_components(components.len())?;
        let n = self.num_components();
        let mut out = vec![0.0f32; n];
        if self.has_alpha && self.premultiplied {
            let ncc = self.num_color_components();
            let alpha = components[ncc] as f32 / self.max_value(ncc) as f32;
            if alpha != 0.0 {
                for c in 0..ncc {
                    out[c] = components[c] as f32 / (alpha * self.max_value(c) as f32);
                }
            }
            out[ncc] = alpha;
        } else {
            for (c, o) in out.iter_mut().enumerate() {
                *o = components[c] as f32 / self.max_value(c) as f32;
            }
        }
        Ok(out)
    }

    /// Normalized to unnormalized, multiplying in premultiplied alpha.
    pub(crate) fn unnormalize(&self, normalized: &[f32]) -> Result<Vec<u32>> {
        self.check_components(normalized.len())?;
        let n = self.num_components();
        let scale = |v: f32, i: usize| -> u32 {
            let max = self.max_value(i);
            (v as f64 * max + 0.5).floor().clamp(0.0, max) as u32
        };
        if self.has_alpha && self.premultiplied {
            let ncc = self.num_color_components();
            let alpha = normalized[ncc];
            let mut out: Vec<u32> = (0..ncc).map(|c| scale(normalized[c] * alpha, c)).collect();
            out.push(scale(alpha, ncc));
            Ok(out)
        } else {
            Ok((0..n).map(|c| scale(normalized[c], c)).collect())
        }
    }
}

impl PartialEq for ModelInfo {
    fn eq(&self, other: &Self) -> bool {
        same_space(&self.color_space, &other.color_space)
            && self.bits == other.bits
            && self.pixel_bits == other.pixel_bits
            && self.has_alpha == other.has_alpha
            && self.premultiplied == other.premultiplied
            && self.transparency == other.transparency
            && self.transfer_type == other.transfer_type
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Packs 8-bit channels into `0xAARRGGBB`.
#[inline]
pub(crate) const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Splits `0xAARRGGBB` into `(a, r, g, b)`.
#[inline]
pub(crate) const fn unpack_argb(argb: u32) -> (u8, u8, u8, u8) {
    ((argb >> 24) as u8, (argb >> 16) as u8, (argb >> 8) as u8, argb as u8)
}

/// Unit float to an 8-bit channel, rounding half up.
#[inline]
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    (v as f64 * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8
}

/// Multiplies (`premultiply`) or divides color samples by normalized
/// alpha, in place, one row at a time.
///
/// `max` holds the full-scale value of every band, alpha last; floating
/// point storage uses 1.0 and skips rounding. A zero alpha zeroes the
/// color samples.
pub(crate) fn scale_by_alpha(raster: &WritableRaster, max: &[f64], premultiply: bool) -> Result<()> {
    let n = raster.num_bands();
    Error::check_len(n, max.len())?;
    let integral = !raster.transfer_type().is_floating_point();
    let alpha_band = n - 1;
    let (x0, w) = (raster.min_x(), raster.width());
    for y in raster.min_y()..raster.min_y() + raster.height() {
        let mut row = raster.pixels_f64(x0, y, w, 1)?;
        for px in row.chunks_exact_mut(n) {
            let alpha = px[alpha_band] / max[alpha_band];
            if alpha == 0.0 {
                px[..alpha_band].fill(0.0);
                continue;
            }
            for (c, v) in px[..alpha_band].iter_mut().enumerate() {
                let scaled = if premultiply { *v * alpha } else { *v / alpha };
                *v = if integral {
                    (scaled + 0.5).floor().min(max[c])
                } else {
                    scaled
                };
            }
        }
        raster.set_pixels_f64(x0, y, w, 1, &row)?;
    }
    Ok(())
}

// ============================================================================
// ColorModel
// ============================================================================

/// A color model: how a pixel's samples become a color and back.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorModel {
    /// One storage element per component.
    Component(ComponentColorModel),
    /// Components as bitfields of one integer.
    Direct(DirectColorModel),
    /// A palette index.
    Indexed(IndexColorModel),
}

macro_rules! delegate {
    ($self:ident, $m:ident => $body:expr) => {
        match $self {
            ColorModel::Component($m) => $body,
            ColorModel::Direct($m) => $body,
            ColorModel::Indexed($m) => $body,
        }
    };
}

impl From<ComponentColorModel> for ColorModel {
    fn from(cm: ComponentColorModel) -> Self {
        Self::Component(cm)
    }
}

impl From<DirectColorModel> for ColorModel {
    fn from(cm: DirectColorModel) -> Self {
        Self::Direct(cm)
    }
}

impl From<IndexColorModel> for ColorModel {
    fn from(cm: IndexColorModel) -> Self {
        Self::Indexed(cm)
    }
}

impl ColorModel {
    /// The shared default model: 8-bit ARGB packed in one `Int`, sRGB, not
    /// premultiplied.
    pub fn rgb_default() -> ColorModel {
        static DEFAULT: OnceLock<ColorModel> = OnceLock::new();
        DEFAULT
            .get_or_init(|| ColorModel::Direct(DirectColorModel::rgb_default()))
            .clone()
    }

    /// True if this model describes the same format as [`rgb_default`](Self::rgb_default).
    pub fn is_rgb_default(&self) -> bool {
        *self == Self::rgb_default()
    }

    /// Short variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Component(_) => "component",
            Self::Direct(_) => "direct",
            Self::Indexed(_) => "indexed",
        }
    }

    /// The shared description.
    pub fn info(&self) -> &ModelInfo {
        delegate!(self, m => m.info())
    }

    /// The component model, if this is one.
    pub fn as_component(&self) -> Option<&ComponentColorModel> {
        match self {
            Self::Component(m) => Some(m),
            _ => None,
        }
    }

    /// The direct model, if this is one.
    pub fn as_direct(&self) -> Option<&DirectColorModel> {
        match self {
            Self::Direct(m) => Some(m),
            _ => None,
        }
    }

    /// The indexed model, if this is one.
    pub fn as_indexed(&self) -> Option<&IndexColorModel> {
        match self {
            Self::Indexed(m) => Some(m),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// See [`ModelInfo::color_space`].
    pub fn color_space(&self) -> &ColorSpaceRef {
        self.info().color_space()
    }

    /// See [`ModelInfo::num_components`].
    pub fn num_components(&self) -> usize {
        self.info().num_components()
    }

    /// See [`ModelInfo::num_color_components`].
    pub fn num_color_components(&self) -> usize {
        self.info().num_color_components()
    }

    /// See [`ModelInfo::component_size`].
    pub fn component_size(&self, i: usize) -> Result<u32> {
        self.info().component_size(i)
    }

    /// See [`ModelInfo::component_sizes`].
    pub fn component_sizes(&self) -> &[u32] {
        self.info().component_sizes()
    }

    /// See [`ModelInfo::pixel_size`].
    pub fn pixel_size(&self) -> u32 {
        self.info().pixel_size()
    }

    /// See [`ModelInfo::has_alpha`].
    pub fn has_alpha(&self) -> bool {
        self.info().has_alpha()
    }

    /// See [`ModelInfo::is_alpha_premultiplied`].
    pub fn is_alpha_premultiplied(&self) -> bool {
        self.info().is_alpha_premultiplied()
    }

    /// See [`ModelInfo::transparency`].
    pub fn transparency(&self) -> Transparency {
        self.info().transparency()
    }

    /// See [`ModelInfo::transfer_type`].
    pub fn transfer_type(&self) -> DataType {
        self.info().transfer_type()
    }

    // ------------------------------------------------------------------------
    // Single-integer pixels
    // ------------------------------------------------------------------------

    /// Red of a pixel given as one integer, as 8-bit sRGB.
    pub fn red(&self, pixel: u32) -> Result<u8> {
        delegate!(self, m => m.red(pixel))
    }

    /// Green of a pixel given as one integer.
    pub fn green(&self, pixel: u32) -> Result<u8> {
        delegate!(self, m => m.green(pixel))
    }

    /// Blue of a pixel given as one integer.
    pub fn blue(&self, pixel: u32) -> Result<u8> {
        delegate!(self, m => m.blue(pixel))
    }

    /// Alpha of a pixel given as one integer.
    pub fn alpha(&self, pixel: u32) -> Result<u8> {
        delegate!(self, m => m.alpha(pixel))
    }

    /// Pixel as default ARGB.
    pub fn rgb(&self, pixel: u32) -> Result<u32> {
        delegate!(self, m => m.rgb(pixel))
    }

    // ------------------------------------------------------------------------
    // Transfer arrays
    // ------------------------------------------------------------------------

    /// Red of a transfer-array pixel.
    pub fn red_data(&self, data: &DataElements) -> Result<u8> {
        delegate!(self, m => m.red_data(data))
    }

    /// Green of a transfer-array pixel.
    pub fn green_data(&self, data: &DataElements) -> Result<u8> {
        delegate!(self, m => m.green_data(data))
    }

    /// Blue of a transfer-array pixel.
    pub fn blue_data(&self, data: &DataElements) -> Result<u8> {
        delegate!(self, m => m.blue_data(data))
    }

    /// Alpha of a transfer-array pixel.
    pub fn alpha_data(&self, data: &DataElements) -> Result<u8> {
        delegate!(self, m => m.alpha_data(data))
    }

    /// Transfer-array pixel as default ARGB.
    pub fn rgb_data(&self, data: &DataElements) -> Result<u32> {
        delegate!(self, m => m.rgb_data(data))
    }

    /// Default ARGB to a transfer-array pixel, written into `reuse` when given.
    pub fn data_elements(&self, argb: u32, reuse: Option<DataElements>) -> Result<DataElements> {
        delegate!(self, m => m.data_elements(argb, reuse))
    }

    // ------------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------------

    /// Unnormalized components of a single-integer pixel.
    pub fn components(&self, pixel: u32) -> Result<Vec<u32>> {
        delegate!(self, m => m.components(pixel))
    }

    /// Unnormalized components of a transfer-array pixel.
    pub fn components_data(&self, data: &DataElements) -> Result<Vec<u32>> {
        delegate!(self, m => m.components_data(data))
    }

    /// Normalized, non-premultiplied components of a transfer-array pixel.
    pub fn normalized_components(&self, data: &DataElements) -> Result<Vec<f32>> {
        delegate!(self, m => m.normalized_components(data))
    }

    /// Unnormalized to normalized components.
    pub fn normalized_from_components(&self, components: &[u32]) -> Result<Vec<f32>> {
        delegate!(self, m => m.normalized_from_components(components))
    }

    /// Normalized to unnormalized components.
    pub fn unnormalized_components(&self, normalized: &[f32]) -> Result<Vec<u32>> {
        delegate!(self, m => m.unnormalized_components(normalized))
    }

    /// Unnormalized components to a single-integer pixel.
    pub fn data_element(&self, components: &[u32]) -> Result<u32> {
        delegate!(self, m => m.data_element(components))
    }

    /// Unnormalized components to a transfer-array pixel.
    pub fn data_elements_from_components(
        &self,
        components: &[u32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        delegate!(self, m => m.data_elements_from_components(components, reuse))
    }

    /// Normalized components to a single-integer pixel.
    pub fn data_element_normalized(&self, normalized: &[f32]) -> Result<u32> {
        delegate!(self, m => m.data_element_normalized(normalized))
    }

    /// Normalized components to a transfer-array pixel.
    pub fn data_elements_from_normalized(
        &self,
        normalized: &[f32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        delegate!(self, m => m.data_elements_from_normalized(normalized, reuse))
    }

    // ------------------------------------------------------------------------
    // Rasters
    // ------------------------------------------------------------------------

    /// Rewrites `raster` in place so its colors are (or are not)
    /// premultiplied, returning the model that describes the result.
    pub fn coerce_data(&self, raster: &WritableRaster, premultiplied: bool) -> Result<ColorModel> {
        match self {
            Self::Component(m) => m.coerce_data(raster, premultiplied).map(Self::Component),
            Self::Direct(m) => m.coerce_data(raster, premultiplied).map(Self::Direct),
            Self::Indexed(m) => m.coerce_data(raster, premultiplied).map(Self::Indexed),
        }
    }

    /// Rewrites `raster`, whose colors are premultiplied when
    /// `raster_premultiplied` is set, into this model's alpha state. The
    /// model is unchanged; models without alpha leave the raster alone.
    pub fn coerce_raster(&self, raster: &WritableRaster, raster_premultiplied: bool) -> Result<()> {
        delegate!(self, m => m.coerce_raster(raster, raster_premultiplied))
    }

    /// True if `raster` can hold pixels of this model.
    pub fn is_compatible_raster(&self, raster: &Raster) -> bool {
        delegate!(self, m => m.is_compatible_raster(raster))
    }

    /// True if `sample_model` can hold pixels of this model.
    pub fn is_compatible_sample_model(&self, sample_model: &SampleModel) -> bool {
        delegate!(self, m => m.is_compatible_sample_model(sample_model))
    }

    /// A sample model of the given size whose layout matches this model.
    pub fn create_compatible_sample_model(&self, width: i32, height: i32) -> Result<SampleModel> {
        delegate!(self, m => m.create_compatible_sample_model(width, height))
    }

    /// A new raster of the given size whose layout matches this model.
    pub fn create_compatible_writable_raster(&self, width: i32, height: i32) -> Result<WritableRaster> {
        delegate!(self, m => m.create_compatible_writable_raster(width, height))
    }

    /// Alpha band of `raster` as a one-band child, or `None` without alpha.
    pub fn alpha_raster(&self, raster: &WritableRaster) -> Result<Option<WritableRaster>> {
        delegate!(self, m => m.alpha_raster(raster))
    }
}

/// Alpha band of `raster` as a writable one-band child sharing storage.
pub(crate) fn alpha_child(raster: &WritableRaster) -> Result<WritableRaster> {
    let (x, y) = (raster.min_x(), raster.min_y());
    let band = [raster.num_bands() - 1];
    raster.create_writable_child(x, y, raster.width(), raster.height(), x, y, Some(&band))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfmt_core::colorspace;
    use pixfmt_raster::factory;

    fn info(bits: Vec<u32>, alpha: bool, premultiplied: bool) -> ModelInfo {
        ModelInfo::new(
            colorspace::srgb(),
            bits,
            32,
            alpha,
            premultiplied,
            Transparency::Translucent,
            DataType::Byte,
        )
        .unwrap()
    }

    #[test]
    fn test_info_without_alpha_is_opaque() {
        let i = info(vec![8, 8, 8, 8], false, true);
        assert_eq!(i.num_components(), 3);
        assert_eq!(i.transparency(), Transparency::Opaque);
        assert!(!i.is_alpha_premultiplied());
    }

    #[test]
    fn test_info_rejects_short_bits() {
        let err = ModelInfo::new(
            colorspace::srgb(),
            vec![8, 8],
            16,
            false,
            false,
            Transparency::Opaque,
            DataType::Byte,
        )
        .unwrap_err();
        assert!(err.is_construction_error());
    }

    #[test]
    fn test_normalize_premultiplied() {
        let i = info(vec![8, 8, 8, 8], true, true);
        let n = i.normalize(&[51, 0, 102, 102]).unwrap();
        approx::assert_abs_diff_eq!(n[0], 0.5, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(n[2], 1.0, epsilon = 1e-6);
        approx::assert_abs_diff_eq!(n[3], 0.4, epsilon = 1e-6);
        assert_eq!(i.unnormalize(&n).unwrap(), vec![51, 0, 102, 102]);
        assert_eq!(i.normalize(&[9, 9, 9, 0]).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn test_pack_unpack() {
        assert_eq!(pack_argb(1, 2, 3, 4), 0x01020304);
        assert_eq!(unpack_argb(0x01020304), (1, 2, 3, 4));
        assert_eq!(unit_to_u8(1.5), 255);
        assert_eq!(unit_to_u8(0.5), 128);
    }

    #[test]
    fn test_scale_by_alpha_float_is_exact() {
        let r = factory::writable(
            SampleModel::Interleaved(
                pixfmt_raster::ComponentSampleModel::pixel_interleaved(
                    DataType::Float,
                    2,
                    1,
                    2,
                    4,
                    vec![0, 1],
                )
                .unwrap(),
            ),
            None,
            None,
        )
        .unwrap();
        r.set_pixels_f64(0, 0, 2, 1, &[0.75, 0.5, 0.625, 0.25]).unwrap();
        scale_by_alpha(&r, &[1.0, 1.0], true).unwrap();
        assert_eq!(r.pixels_f64(0, 0, 2, 1).unwrap(), vec![0.375, 0.5, 0.15625, 0.25]);
        scale_by_alpha(&r, &[1.0, 1.0], false).unwrap();
        assert_eq!(r.pixel_f64(0, 0).unwrap(), vec![0.75, 0.5]);
    }

    #[test]
    fn test_scale_by_alpha_zero_alpha() {
        let r = factory::interleaved(DataType::Byte, 1, 1, 2, None).unwrap();
        r.set_pixel(0, 0, &[200, 0]).unwrap();
        scale_by_alpha(&r, &[255.0, 255.0], false).unwrap();
        assert_eq!(r.pixel(0, 0).unwrap(), vec![0, 0]);
    }
}
