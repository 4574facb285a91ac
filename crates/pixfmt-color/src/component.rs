//! One storage element per color and alpha component.
//!
//! # Conversion Paths
//!
//! The path is chosen once from the color space and refined on first use:
//!
//! | Path | Color space | Decode | Encode |
//! |------|-------------|--------|--------|
//! | sRGB | built-in sRGB | rescale to 8 bits | rescale from 8 bits |
//! | linear RGB | built-in linear RGB | 8/16-bit linear to sRGB LUT | sRGB to linear LUT |
//! | linear gray | built-in linear gray | gray to sRGB LUT | 16-bit luma |
//! | profile gray | profile gray, range 0..1 | gray to sRGB LUT | luma, then linear to gray LUT |
//! | generic | anything else | `to_rgb` | `from_rgb` |
//!
//! Integral storage is *standard scale* when the all-zero pixel normalizes
//! to 0 and the all-ones pixel to 1 in every color component. A model that
//! is not standard scale falls back to the generic path and rescales
//! normalized values by the measured offset and factor.
//!
//! # Storage Semantics
//!
//! - `Byte`, `UShort`, `Int`: unsigned, `bits[i]` significant bits each
//! - `Short`: signed; `0..=32767` maps to `0..=1`
//! - `Float`, `Double`: the normalized value is stored directly
//!
//! Only unsigned standard-scale storage supports unnormalized component
//! access. Everything else reports [`Error::Unsupported`].

use std::sync::{Arc, OnceLock};

use pixfmt_core::colorspace::ColorSpaceType;
use pixfmt_core::transfer::{linear_luma16, linear_luma16_index};
use pixfmt_core::{
    max_unsigned, settings, BuiltinSpace, ColorSpaceRef, DataElements, DataType, Error, Result, Transparency,
};
use pixfmt_lut::{gamma, gray_luts, GrayLuts};
use pixfmt_raster::{ComponentSampleModel, Raster, SampleLayout, SampleModel, WritableRaster};
use tracing::trace;

use crate::model::{alpha_child, pack_argb, scale_by_alpha, unit_to_u8, unpack_argb, ModelInfo};

const SHORT_MAX: f64 = 32767.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Path {
    Srgb,
    LinearRgb,
    LinearGray,
    ProfileGray,
    Generic,
}

/// Measured scale of the storage, resolved on first use.
#[derive(Debug, Clone)]
struct Scale {
    no_unnorm: bool,
    non_std: bool,
    offsets: Vec<f32>,
    factors: Vec<f32>,
}

/// Color model with one storage element per component.
#[derive(Debug, Clone)]
pub struct ComponentColorModel {
    info: ModelInfo,
    path: Path,
    /// Color space `(min, max - min)` per color component, for integral and
    /// short storage in spaces whose range is not `0..1`.
    range: Option<(Vec<f32>, Vec<f32>)>,
    gray: Option<Arc<GrayLuts>>,
    scale: OnceLock<Scale>,
}

impl ComponentColorModel {
    /// Creates a component model.
    ///
    /// `bits` is only honoured for `Byte`, `UShort` and `Int` storage, where
    /// `None` means the full element width. Other storage always uses the
    /// element width.
    ///
    /// # Errors
    ///
    /// `bits` shorter than the component count, or any width outside
    /// `1..=size_bits` of the storage.
    pub fn new(
        color_space: ColorSpaceRef,
        bits: Option<&[u32]>,
        has_alpha: bool,
        premultiplied: bool,
        transparency: Transparency,
        transfer_type: DataType,
    ) -> Result<Self> {
        let n = color_space.num_components() + has_alpha as usize;
        let size = transfer_type.size_bits();
        let bits = match bits {
            Some(bits) if transfer_type.is_unsigned_integral() => {
                if bits.len() < n {
                    return Err(Error::invalid_argument(format!(
                        "number of color/alpha components should be {n} but length of bits array is {}",
                        bits.len()
                    )));
                }
                if let Some(&b) = bits[..n].iter().find(|&&b| b == 0 || b > size) {
                    return Err(Error::invalid_argument(format!(
                        "number of bits ({b}) must be in 1..={size} for {transfer_type} storage"
                    )));
                }
                bits[..n].to_vec()
            }
            _ => vec![size; n],
        };
        let info = ModelInfo::new(
            color_space,
            bits,
            size * n as u32,
            has_alpha,
            premultiplied,
            transparency,
            transfer_type,
        )?;

        let cs = info.color_space();
        let path = match cs.builtin() {
            Some(BuiltinSpace::Srgb) => Path::Srgb,
            Some(BuiltinSpace::LinearRgb) => Path::LinearRgb,
            Some(BuiltinSpace::LinearGray) => Path::LinearGray,
            _ if cs.space_type() == ColorSpaceType::Gray
                && cs.is_profile_based()
                && cs.min_value(0) == 0.0
                && cs.max_value(0) == 1.0 =>
            {
                Path::ProfileGray
            }
            _ => Path::Generic,
        };
        let ncc = info.num_color_components();
        let range = (path == Path::Generic
            && !transfer_type.is_floating_point()
            && (0..ncc).any(|i| cs.min_value(i) != 0.0 || cs.max_value(i) != 1.0))
        .then(|| {
            let min: Vec<f32> = (0..ncc).map(|i| cs.min_value(i)).collect();
            let diff = (0..ncc).map(|i| cs.max_value(i) - min[i]).collect();
            (min, diff)
        });
        let gray = matches!(path, Path::LinearGray | Path::ProfileGray).then(|| gray_luts(cs));
        if settings().prebuild_luts {
            gamma::prebuild();
        }
        trace!(
            space = cs.name(),
            ?path,
            transfer_type = %transfer_type,
            has_alpha,
            premultiplied = info.is_alpha_premultiplied(),
            "component color model"
        );
        Ok(Self {
            info,
            path,
            range,
            gray,
            scale: OnceLock::new(),
        })
    }

    /// A model with every component at the full element width.
    pub fn with_defaults(
        color_space: ColorSpaceRef,
        has_alpha: bool,
        premultiplied: bool,
        transparency: Transparency,
        transfer_type: DataType,
    ) -> Result<Self> {
        Self::new(color_space, None, has_alpha, premultiplied, transparency, transfer_type)
    }

    /// The shared description.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// True if unnormalized component access is available.
    pub fn supports_unnormalized(&self) -> bool {
        !self.scale().no_unnorm
    }

    // ------------------------------------------------------------------------
    // Scale
    // ------------------------------------------------------------------------

    fn scale(&self) -> &Scale {
        self.scale.get_or_init(|| self.measure_scale())
    }

    /// Normalizes the all-zero and all-ones pixels to see whether storage
    /// maps exactly onto `0..1`.
    fn measure_scale(&self) -> Scale {
        let dt = self.info.transfer_type();
        let signed = dt.is_signed();
        let non_std_range = self.range.is_some();
        if dt.is_floating_point() {
            return Scale {
                no_unnorm: true,
                non_std: false,
                offsets: Vec::new(),
                factors: Vec::new(),
            };
        }
        let n = self.info.num_components();
        let ncc = self.info.num_color_components();
        let full = |i: usize| -> i32 {
            if dt == DataType::Short {
                SHORT_MAX as i32
            } else {
                max_unsigned(self.info.component_sizes()[i]) as i32
            }
        };
        let mut low = DataElements::new(dt, n);
        let mut high = DataElements::new(dt, n);
        for i in 0..n {
            if i < ncc {
                high.set_int(i, full(i));
            } else {
                low.set_int(i, full(i));
                high.set_int(i, full(i));
            }
        }
        let lo = self.normalize_raw(&low);
        let hi = self.normalize_raw(&high);
        let non_std = (0..ncc).any(|i| lo[i] != 0.0 || hi[i] != 1.0);
        let scale = if non_std {
            Scale {
                no_unnorm: true,
                non_std: true,
                offsets: lo[..ncc].to_vec(),
                factors: (0..ncc).map(|i| 1.0 / (hi[i] - lo[i])).collect(),
            }
        } else {
            Scale {
                no_unnorm: signed || non_std_range,
                non_std: false,
                offsets: Vec::new(),
                factors: Vec::new(),
            }
        };
        trace!(non_std = scale.non_std, no_unnorm = scale.no_unnorm, "measured component scale");
        scale
    }

    fn active_path(&self) -> Path {
        if self.scale().non_std {
            Path::Generic
        } else {
            self.path
        }
    }

    fn require_unnormalized(&self) -> Result<()> {
        if self.scale().no_unnorm {
            return Err(Error::unsupported(
                "this color model does not support the unnormalized form",
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Sample access
    // ------------------------------------------------------------------------

    /// Raw unsigned value of component `i`, masked to its bit width.
    #[inline]
    fn raw(&self, data: &DataElements, i: usize) -> u32 {
        data.get_int(i) as u32 & max_unsigned(self.info.component_sizes()[i])
    }

    /// Component `i` as a unit value, before any alpha division.
    fn unit(&self, data: &DataElements, i: usize) -> f64 {
        match self.info.transfer_type() {
            DataType::Short => data.get_int(i) as f64 / SHORT_MAX,
            DataType::Float | DataType::Double => data.get_f64(i),
            _ => self.raw(data, i) as f64 / self.info.max_value(i),
        }
    }

    /// Component `idx` rescaled to `precision` bits, with premultiplied
    /// alpha divided out.
    fn extract(&self, data: &DataElements, idx: usize, precision: u32) -> usize {
        let dt = self.info.transfer_type();
        let precision = if dt == DataType::Byte { 8 } else { precision };
        let max = max_unsigned(precision) as f64;
        let ncc = self.info.num_color_components();
        let premultiplied = self.info.has_alpha() && self.info.is_alpha_premultiplied();

        let value = if dt.is_signed() || premultiplied {
            let mut v = self.unit(data, idx);
            if premultiplied {
                let a = self.unit(data, ncc);
                if a == 0.0 {
                    return 0;
                }
                v /= a;
            }
            (v * max + 0.5).floor()
        } else {
            let comp = self.raw(data, idx);
            if self.info.component_sizes()[idx] == precision {
                comp as f64
            } else {
                (comp as f64 / self.info.max_value(idx) * max + 0.5).floor()
            }
        };
        value.clamp(0.0, max) as usize
    }

    /// Normalized components in color space units, before the length check.
    fn normalize_raw(&self, data: &DataElements) -> Vec<f32> {
        let n = self.info.num_components();
        let ncc = self.info.num_color_components();
        let mut norm: Vec<f32> = (0..n).map(|i| self.unit(data, i) as f32).collect();
        if self.info.has_alpha() && self.info.is_alpha_premultiplied() {
            let alpha = norm[ncc];
            for v in &mut norm[..ncc] {
                *v = if alpha != 0.0 { *v / alpha } else { 0.0 };
            }
        }
        if let Some((min, diff)) = &self.range {
            for c in 0..ncc {
                norm[c] = min[c] + diff[c] * norm[c];
            }
        }
        norm
    }

    fn check_data(&self, data: &DataElements) -> Result<()> {
        data.expect(self.info.transfer_type(), self.info.num_components())
    }

    fn gray_tables(&self) -> Result<&GrayLuts> {
        self.gray
            .as_deref()
            .ok_or_else(|| Error::unsupported("no gray lookup tables for this color space"))
    }

    /// sRGB channel `idx` of a checked pixel.
    fn rgb_component(&self, data: &DataElements, idx: usize) -> Result<u8> {
        let byte = self.info.transfer_type() == DataType::Byte;
        Ok(match self.active_path() {
            Path::Srgb => self.extract(data, idx, 8) as u8,
            Path::LinearRgb => {
                let i = self.extract(data, idx, 16);
                if byte {
                    gamma::linear8_to_srgb8()[i]
                } else {
                    gamma::linear16_to_srgb8()[i]
                }
            }
            Path::LinearGray | Path::ProfileGray => {
                let luts = self.gray_tables()?;
                let i = self.extract(data, 0, 16);
                if byte {
                    luts.gray8_to_srgb8[i]
                } else {
                    luts.gray16_to_srgb8[i]
                }
            }
            Path::Generic => {
                let norm = self.normalize_raw(data);
                let rgb = self.info.color_space().to_rgb(&norm[..self.info.num_color_components()]);
                unit_to_u8(rgb[idx])
            }
        })
    }

    /// Wraps a single-integer pixel as a one-element transfer array.
    fn single(&self, pixel: u32) -> Result<DataElements> {
        if self.info.num_components() > 1 {
            return Err(Error::unsupported("more than one component per pixel"));
        }
        if self.info.transfer_type().is_signed() {
            return Err(Error::unsupported("component value is signed"));
        }
        let mut data = DataElements::new(self.info.transfer_type(), 1);
        data.set_int(0, pixel as i32);
        Ok(data)
    }

    /// Writes unit values into a transfer array, scaling to storage.
    fn encode_units(&self, units: &[f64], reuse: Option<DataElements>) -> Result<DataElements> {
        let dt = self.info.transfer_type();
        let mut out = DataElements::reuse(reuse, dt, self.info.num_components())?;
        for (i, &u) in units.iter().enumerate() {
            match dt {
                DataType::Short => {
                    out.set_int(i, (u * SHORT_MAX + 0.5).floor().clamp(-32768.0, SHORT_MAX) as i32)
                }
                DataType::Float | DataType::Double => out.set_f64(i, u),
                _ => {
                    let max = self.info.max_value(i);
                    let v = (u.clamp(0.0, 1.0) * max + 0.5).floor().min(max);
                    out.set_int(i, v as u32 as i32);
                }
            }
        }
        Ok(out)
    }

    // ------------------------------------------------------------------------
    // Single-integer pixels
    // ------------------------------------------------------------------------

    /// Red of a one-component pixel.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] for models with more than one component or
    /// signed storage.
    pub fn red(&self, pixel: u32) -> Result<u8> {
        self.red_data(&self.single(pixel)?)
    }

    /// Green of a one-component pixel.
    pub fn green(&self, pixel: u32) -> Result<u8> {
        self.green_data(&self.single(pixel)?)
    }

    /// Blue of a one-component pixel.
    pub fn blue(&self, pixel: u32) -> Result<u8> {
        self.blue_data(&self.single(pixel)?)
    }

    /// Alpha of a one-component pixel; always 255.
    pub fn alpha(&self, pixel: u32) -> Result<u8> {
        self.alpha_data(&self.single(pixel)?)
    }

    /// One-component pixel as default ARGB.
    pub fn rgb(&self, pixel: u32) -> Result<u32> {
        self.rgb_data(&self.single(pixel)?)
    }

    // ------------------------------------------------------------------------
    // Transfer arrays
    // ------------------------------------------------------------------------

    /// Red of a transfer-array pixel.
    pub fn red_data(&self, data: &DataElements) -> Result<u8> {
        self.check_data(data)?;
        self.rgb_component(data, 0)
    }

    /// Green of a transfer-array pixel.
    pub fn green_data(&self, data: &DataElements) -> Result<u8> {
        self.check_data(data)?;
        self.rgb_component(data, 1)
    }

    /// Blue of a transfer-array pixel.
    pub fn blue_data(&self, data: &DataElements) -> Result<u8> {
        self.check_data(data)?;
        self.rgb_component(data, 2)
    }

    /// Alpha of a transfer-array pixel, 255 without alpha.
    pub fn alpha_data(&self, data: &DataElements) -> Result<u8> {
        self.check_data(data)?;
        if !self.info.has_alpha() {
            return Ok(255);
        }
        let a = self.info.num_color_components();
        Ok(match self.info.transfer_type() {
            DataType::Short | DataType::Float | DataType::Double => unit_to_u8(self.unit(data, a) as f32),
            _ => {
                let v = self.raw(data, a);
                if self.info.component_sizes()[a] == 8 {
                    v as u8
                } else {
                    unit_to_u8((v as f64 / self.info.max_value(a)) as f32)
                }
            }
        })
    }

    /// Transfer-array pixel as default ARGB.
    pub fn rgb_data(&self, data: &DataElements) -> Result<u32> {
        let alpha = self.alpha_data(data)?;
        Ok(match self.active_path() {
            Path::Srgb | Path::LinearRgb => pack_argb(
                alpha,
                self.rgb_component(data, 0)?,
                self.rgb_component(data, 1)?,
                self.rgb_component(data, 2)?,
            ),
            Path::LinearGray | Path::ProfileGray => {
                let g = self.rgb_component(data, 0)?;
                pack_argb(alpha, g, g, g)
            }
            Path::Generic => {
                let norm = self.normalize_raw(data);
                let rgb = self.info.color_space().to_rgb(&norm[..self.info.num_color_components()]);
                pack_argb(alpha, unit_to_u8(rgb[0]), unit_to_u8(rgb[1]), unit_to_u8(rgb[2]))
            }
        })
    }

    /// Default ARGB to a transfer-array pixel.
    pub fn data_elements(&self, argb: u32, reuse: Option<DataElements>) -> Result<DataElements> {
        let (a8, r8, g8, b8) = unpack_argb(argb);
        let byte = self.info.transfer_type() == DataType::Byte;
        let mut units: Vec<f64> = match self.active_path() {
            Path::Srgb => [r8, g8, b8].iter().map(|&c| c as f64 / 255.0).collect(),
            Path::LinearRgb => {
                if byte {
                    let lut = gamma::srgb8_to_linear8();
                    [r8, g8, b8].iter().map(|&c| lut[c as usize] as f64 / 255.0).collect()
                } else {
                    let lut = gamma::srgb8_to_linear16();
                    [r8, g8, b8].iter().map(|&c| lut[c as usize] as f64 / 65535.0).collect()
                }
            }
            Path::LinearGray => {
                let lut = gamma::srgb8_to_linear16();
                let (r, g, b) = (lut[r8 as usize], lut[g8 as usize], lut[b8 as usize]);
                vec![linear_luma16(r, g, b) as f64 / 65535.0]
            }
            Path::ProfileGray => {
                let lut = gamma::srgb8_to_linear16();
                let i = linear_luma16_index(lut[r8 as usize], lut[g8 as usize], lut[b8 as usize]) as usize;
                let luts = self.gray_tables()?;
                if byte {
                    vec![luts.linear16_to_gray8[i] as f64 / 255.0]
                } else {
                    vec![luts.linear16_to_gray16[i] as f64 / 65535.0]
                }
            }
            Path::Generic => {
                let rgb = [r8, g8, b8].map(|c| c as f32 / 255.0);
                let norm = self.info.color_space().from_rgb(rgb);
                let scale = self.scale();
                (0..self.info.num_color_components())
                    .map(|i| {
                        if scale.non_std {
                            ((norm[i] - scale.offsets[i]) * scale.factors[i]).clamp(0.0, 1.0) as f64
                        } else {
                            norm[i] as f64
                        }
                    })
                    .collect()
            }
        };
        if self.info.has_alpha() {
            let alpha = a8 as f64 / 255.0;
            if self.info.is_alpha_premultiplied() {
                units.iter_mut().for_each(|u| *u *= alpha);
            }
            units.push(alpha);
        }
        self.encode_units(&units, reuse)
    }

    // ------------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------------

    /// Unnormalized components of a one-component pixel.
    pub fn components(&self, pixel: u32) -> Result<Vec<u32>> {
        if self.info.num_components() > 1 {
            return Err(Error::unsupported("more than one component per pixel"));
        }
        self.require_unnormalized()?;
        Ok(vec![pixel])
    }

    /// Unnormalized components of a transfer-array pixel.
    pub fn components_data(&self, data: &DataElements) -> Result<Vec<u32>> {
        self.require_unnormalized()?;
        self.check_data(data)?;
        Ok((0..self.info.num_components()).map(|i| data.get_int(i) as u32).collect())
    }

    /// Normalized, non-premultiplied components in color space units.
    pub fn normalized_components(&self, data: &DataElements) -> Result<Vec<f32>> {
        self.check_data(data)?;
        Ok(self.normalize_raw(data))
    }

    /// Unnormalized to normalized components.
    pub fn normalized_from_components(&self, components: &[u32]) -> Result<Vec<f32>> {
        self.require_unnormalized()?;
        self.info.normalize(components)
    }

    /// Normalized to unnormalized components.
    pub fn unnormalized_components(&self, normalized: &[f32]) -> Result<Vec<u32>> {
        self.require_unnormalized()?;
        self.info.unnormalize(normalized)
    }

    /// Unnormalized components of a one-component model as its pixel.
    pub fn data_element(&self, components: &[u32]) -> Result<u32> {
        let n = self.info.num_components();
        if n != 1 {
            return Err(Error::unsupported(format!(
                "this model returns {n} elements in the pixel array"
            )));
        }
        self.require_unnormalized()?;
        Error::check_len(1, components.len())?;
        Ok(components[0])
    }

    /// Unnormalized components to a transfer-array pixel.
    pub fn data_elements_from_components(
        &self,
        components: &[u32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        self.require_unnormalized()?;
        let n = self.info.num_components();
        self.info.check_components(components.len())?;
        let mut out = DataElements::reuse(reuse, self.info.transfer_type(), n)?;
        for (i, &c) in components[..n].iter().enumerate() {
            out.set_int(i, c as i32);
        }
        Ok(out)
    }

    /// Normalized components of a one-component model as its pixel.
    pub fn data_element_normalized(&self, normalized: &[f32]) -> Result<u32> {
        let pixel = self.single(0)?;
        let pixel = self.data_elements_from_normalized(normalized, Some(pixel))?;
        Ok(pixel.get_int(0) as u32)
    }

    /// Normalized components in color space units to a transfer-array pixel.
    pub fn data_elements_from_normalized(
        &self,
        normalized: &[f32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        self.info.check_components(normalized.len())?;
        let ncc = self.info.num_color_components();
        let scale = self.scale();
        let mut units: Vec<f64> = (0..ncc)
            .map(|i| {
                if scale.non_std {
                    ((normalized[i] - scale.offsets[i]) * scale.factors[i]).clamp(0.0, 1.0) as f64
                } else {
                    normalized[i] as f64
                }
            })
            .collect();
        if self.info.has_alpha() {
            let alpha = normalized[ncc] as f64;
            if self.info.is_alpha_premultiplied() {
                units.iter_mut().for_each(|u| *u *= alpha);
            }
            units.push(alpha);
        }
        self.encode_units(&units, reuse)
    }

    // ------------------------------------------------------------------------
    // Rasters
    // ------------------------------------------------------------------------

    /// Premultiplies or un-premultiplies `raster` in place and returns the
    /// model describing the result.
    ///
    /// Models without alpha, or already in the requested state, return a
    /// copy of themselves and leave the raster untouched.
    pub fn coerce_data(&self, raster: &WritableRaster, premultiplied: bool) -> Result<Self> {
        if !self.info.has_alpha() || self.info.is_alpha_premultiplied() == premultiplied {
            return Ok(self.clone());
        }
        self.rescale_alpha(raster, premultiplied)?;
        Self::new(
            self.info.color_space().clone(),
            Some(self.info.component_sizes()),
            true,
            premultiplied,
            self.info.transparency(),
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

    fn rescale_alpha(&self, raster: &WritableRaster, premultiply: bool) -> Result<()> {
        if !self.is_compatible_raster(raster) {
            return Err(Error::incompatible("raster is not compatible with this color model"));
        }
        let dt = self.info.transfer_type();
        let max: Vec<f64> = (0..self.info.num_components())
            .map(|i| match dt {
                DataType::Short => SHORT_MAX,
                DataType::Float | DataType::Double => 1.0,
                _ => self.info.max_value(i),
            })
            .collect();
        trace!(
            premultiply,
            width = raster.width(),
            height = raster.height(),
            "coercing component raster"
        );
        scale_by_alpha(raster, &max, premultiply)
    }

    /// True for component layouts with one band per component, wide enough
    /// samples and the same transfer type.
    pub fn is_compatible_raster(&self, raster: &Raster) -> bool {
        let sm = raster.sample_model();
        sm.as_component().is_some()
            && sm.num_bands() == self.info.num_components()
            && (0..sm.num_bands()).all(|i| sm.sample_size(i) >= self.info.component_sizes()[i])
            && raster.transfer_type() == self.info.transfer_type()
    }

    /// True for component layouts with one band per component and the same
    /// transfer type.
    pub fn is_compatible_sample_model(&self, sample_model: &SampleModel) -> bool {
        sample_model.as_component().is_some()
            && sample_model.num_bands() == self.info.num_components()
            && sample_model.transfer_type() == self.info.transfer_type()
    }

    /// A pixel-interleaved sample model with components in order.
    pub fn create_compatible_sample_model(&self, width: i32, height: i32) -> Result<SampleModel> {
        let n = self.info.num_components();
        let scanline = (width.max(0) as usize)
            .checked_mul(n)
            .ok_or_else(|| Error::invalid_argument(format!("width ({width}) is too large")))?;
        ComponentSampleModel::pixel_interleaved(
            self.info.transfer_type(),
            width,
            height,
            n,
            scanline,
            (0..n).collect(),
        )
        .map(SampleModel::Interleaved)
    }

    /// A new pixel-interleaved raster.
    pub fn create_compatible_writable_raster(&self, width: i32, height: i32) -> Result<WritableRaster> {
        let sm = self.create_compatible_sample_model(width, height)?;
        pixfmt_raster::factory::writable(sm, None, None)
    }

    /// The last band of `raster`, or `None` without alpha.
    pub fn alpha_raster(&self, raster: &WritableRaster) -> Result<Option<WritableRaster>> {
        if !self.info.has_alpha() {
            return Ok(None);
        }
        alpha_child(raster).map(Some)
    }
}

impl PartialEq for ComponentColorModel {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
    }
}
