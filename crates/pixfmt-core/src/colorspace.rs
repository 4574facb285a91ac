//! Color spaces as seen by color models.
//!
//! A color model only needs four things from its color space: the number
//! of components, each component's `[min, max]` range, and the two pure
//! conversions to and from gamma-encoded sRGB in `[0, 1]^3`. The
//! [`ColorSpace`] trait is exactly that contract. Everything else about a
//! space (profiles, white points, rendering intents) stays behind it.
//!
//! # Built-in Spaces
//!
//! | Function | Type | Components | Range | Notes |
//! |----------|------|------------|-------|-------|
//! | [`srgb()`] | RGB | 3 | 0..1 | identity conversions |
//! | [`linear_rgb()`] | RGB | 3 | 0..1 | sRGB primaries, linear light |
//! | [`linear_gray()`] | Gray | 1 | 0..1 | linear luminance |
//! | [`cie_xyz()`] | XYZ | 3 | 0..1+32767/32768 | non-standard range |
//!
//! Built-ins are process-wide singletons; color models recognise them by
//! [`ColorSpace::builtin`] and take LUT-based fast paths. Any other space,
//! such as a [`GraySpace`] with its own tone curve, is driven through
//! `to_rgb`/`from_rgb`.
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_core::colorspace::{self, BuiltinSpace, ColorSpace};
//!
//! let cs = colorspace::linear_rgb();
//! assert_eq!(cs.builtin(), Some(BuiltinSpace::LinearRgb));
//! let srgb = cs.to_rgb(&[1.0, 0.0, 0.0]);
//! assert_eq!(srgb, [1.0, 0.0, 0.0]);
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::transfer::{srgb_eotf, srgb_oetf, GRAY_LUMA_B, GRAY_LUMA_G, GRAY_LUMA_R};

/// Shared handle to a color space.
pub type ColorSpaceRef = Arc<dyn ColorSpace>;

/// Family of a color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpaceType {
    /// Red, green, blue.
    Rgb,
    /// Single gray component.
    Gray,
    /// CIE XYZ.
    Xyz,
    /// Anything else.
    Other,
}

/// Identity of a built-in color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinSpace {
    /// Standard sRGB.
    Srgb,
    /// Linear-light RGB with sRGB primaries.
    LinearRgb,
    /// Linear-light gray.
    LinearGray,
    /// CIE XYZ.
    CieXyz,
}

/// Contract a color model needs from a color space.
///
/// Conversions must be pure functions; color models call them from any
/// thread without synchronization.
pub trait ColorSpace: Send + Sync + fmt::Debug {
    /// Human-readable name.
    fn name(&self) -> &str;

    /// Family of the space.
    fn space_type(&self) -> ColorSpaceType;

    /// Number of color components (alpha not included).
    fn num_components(&self) -> usize;

    /// Smallest normalized value of `component`.
    fn min_value(&self, component: usize) -> f32 {
        let _ = component;
        0.0
    }

    /// Largest normalized value of `component`.
    fn max_value(&self, component: usize) -> f32 {
        let _ = component;
        1.0
    }

    /// Converts normalized components to gamma-encoded sRGB in `[0, 1]`.
    fn to_rgb(&self, components: &[f32]) -> [f32; 3];

    /// Converts gamma-encoded sRGB in `[0, 1]` to normalized components.
    fn from_rgb(&self, rgb: [f32; 3]) -> Vec<f32>;

    /// Which built-in space this is, if any.
    fn builtin(&self) -> Option<BuiltinSpace> {
        None
    }

    /// True if the space is defined by a color profile. Profile-based gray
    /// spaces get per-space gray lookup tables.
    fn is_profile_based(&self) -> bool {
        false
    }
}

/// True if both handles are the same color space instance.
#[inline]
pub fn same_space(a: &ColorSpaceRef, b: &ColorSpaceRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[inline]
fn encode(l: f32) -> f32 {
    srgb_oetf(l.clamp(0.0, 1.0) as f64) as f32
}

#[inline]
fn decode(v: f32) -> f32 {
    srgb_eotf(v.clamp(0.0, 1.0) as f64) as f32
}

fn luminance(rgb: [f32; 3]) -> f32 {
    GRAY_LUMA_R * decode(rgb[0]) + GRAY_LUMA_G * decode(rgb[1]) + GRAY_LUMA_B * decode(rgb[2])
}

// ============================================================================
// Built-in spaces
// ============================================================================

/// Standard sRGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrgbSpace;

impl ColorSpace for SrgbSpace {
    fn name(&self) -> &str {
        "sRGB"
    }
    fn space_type(&self) -> ColorSpaceType {
        ColorSpaceType::Rgb
    }
    fn num_components(&self) -> usize {
        3
    }
    fn to_rgb(&self, c: &[f32]) -> [f32; 3] {
        [c[0], c[1], c[2]]
    }
    fn from_rgb(&self, rgb: [f32; 3]) -> Vec<f32> {
        rgb.to_vec()
    }
    fn builtin(&self) -> Option<BuiltinSpace> {
        Some(BuiltinSpace::Srgb)
    }
}

/// Linear-light RGB with sRGB primaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRgbSpace;

impl ColorSpace for LinearRgbSpace {
    fn name(&self) -> &str {
        "Linear RGB"
    }
    fn space_type(&self) -> ColorSpaceType {
        ColorSpaceType::Rgb
    }
    fn num_components(&self) -> usize {
        3
    }
    fn to_rgb(&self, c: &[f32]) -> [f32; 3] {
        [encode(c[0]), encode(c[1]), encode(c[2])]
    }
    fn from_rgb(&self, rgb: [f32; 3]) -> Vec<f32> {
        rgb.iter().map(|&v| decode(v)).collect()
    }
    fn builtin(&self) -> Option<BuiltinSpace> {
        Some(BuiltinSpace::LinearRgb)
    }
    fn is_profile_based(&self) -> bool {
        true
    }
}

/// Linear-light gray.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearGraySpace;

impl ColorSpace for LinearGraySpace {
    fn name(&self) -> &str {
        "Linear Gray"
    }
    fn space_type(&self) -> ColorSpaceType {
        ColorSpaceType::Gray
    }
    fn num_components(&self) -> usize {
        1
    }
    fn to_rgb(&self, c: &[f32]) -> [f32; 3] {
        let v = encode(c[0]);
        [v, v, v]
    }
    fn from_rgb(&self, rgb: [f32; 3]) -> Vec<f32> {
        vec![luminance(rgb)]
    }
    fn builtin(&self) -> Option<BuiltinSpace> {
        Some(BuiltinSpace::LinearGray)
    }
    fn is_profile_based(&self) -> bool {
        true
    }
}

/// Upper bound of every CIE XYZ component.
pub const XYZ_MAX: f32 = 1.0 + 32767.0 / 32768.0;

// Linear sRGB (D65) <-> XYZ.
const RGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412_456_4, 0.357_576_1, 0.180_437_5],
    [0.212_672_9, 0.715_152_2, 0.072_175_0],
    [0.019_333_9, 0.119_192_0, 0.950_304_1],
];
const XYZ_TO_RGB: [[f32; 3]; 3] = [
    [3.240_454_2, -1.537_138_5, -0.498_531_4],
    [-0.969_266_0, 1.876_010_8, 0.041_556_0],
    [0.055_643_4, -0.204_025_9, 1.057_225_2],
];

fn mul3(m: &[[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// CIE XYZ with components in `0..=XYZ_MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XyzSpace;

impl ColorSpace for XyzSpace {
    fn name(&self) -> &str {
        "CIE XYZ"
    }
    fn space_type(&self) -> ColorSpaceType {
        ColorSpaceType::Xyz
    }
    fn num_components(&self) -> usize {
        3
    }
    fn max_value(&self, _component: usize) -> f32 {
        XYZ_MAX
    }
    fn to_rgb(&self, c: &[f32]) -> [f32; 3] {
        let lin = mul3(&XYZ_TO_RGB, [c[0], c[1], c[2]]);
        [encode(lin[0]), encode(lin[1]), encode(lin[2])]
    }
    fn from_rgb(&self, rgb: [f32; 3]) -> Vec<f32> {
        let xyz = mul3(&RGB_TO_XYZ, [decode(rgb[0]), decode(rgb[1]), decode(rgb[2])]);
        xyz.iter().map(|v| v.clamp(0.0, XYZ_MAX)).collect()
    }
    fn builtin(&self) -> Option<BuiltinSpace> {
        Some(BuiltinSpace::CieXyz)
    }
    fn is_profile_based(&self) -> bool {
        true
    }
}

// ============================================================================
// Profile-based gray
// ============================================================================

/// Gray space defined by a power-law tone curve over linear luminance.
///
/// `gamma = 1.0` behaves like linear gray but is not the built-in instance,
/// so color models treat it as a profile gray with its own lookup tables.
#[derive(Debug, Clone)]
pub struct GraySpace {
    name: String,
    gamma: f32,
}

impl GraySpace {
    /// Creates a gray space; `gamma` must be positive (non-positive values
    /// fall back to 1.0).
    pub fn new(name: impl Into<String>, gamma: f32) -> Self {
        let gamma = if gamma > 0.0 && gamma.is_finite() { gamma } else { 1.0 };
        Self {
            name: name.into(),
            gamma,
        }
    }

    /// Tone curve exponent.
    pub fn gamma(&self) -> f32 {
        self.gamma
    }
}

impl ColorSpace for GraySpace {
    fn name(&self) -> &str {
        &self.name
    }
    fn space_type(&self) -> ColorSpaceType {
        ColorSpaceType::Gray
    }
    fn num_components(&self) -> usize {
        1
    }
    fn to_rgb(&self, c: &[f32]) -> [f32; 3] {
        let v = encode(c[0].clamp(0.0, 1.0).powf(self.gamma));
        [v, v, v]
    }
    fn from_rgb(&self, rgb: [f32; 3]) -> Vec<f32> {
        vec![luminance(rgb).clamp(0.0, 1.0).powf(1.0 / self.gamma)]
    }
    fn is_profile_based(&self) -> bool {
        true
    }
}

// ============================================================================
// Singletons
// ============================================================================

macro_rules! singleton {
    ($(#[$doc:meta])* $fn_name:ident, $ty:ident) => {
        $(#[$doc])*
        pub fn $fn_name() -> ColorSpaceRef {
            static INSTANCE: OnceLock<ColorSpaceRef> = OnceLock::new();
            INSTANCE.get_or_init(|| Arc::new($ty)).clone()
        }
    };
}

singleton!(
    /// The shared sRGB instance.
    srgb,
    SrgbSpace
);
singleton!(
    /// The shared linear RGB instance.
    linear_rgb,
    LinearRgbSpace
);
singleton!(
    /// The shared linear gray instance.
    linear_gray,
    LinearGraySpace
);
singleton!(
    /// The shared CIE XYZ instance.
    cie_xyz,
    XyzSpace
);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_singletons_are_shared() {
        assert!(same_space(&srgb(), &srgb()));
        assert!(!same_space(&srgb(), &linear_rgb()));
        assert_eq!(linear_gray().builtin(), Some(BuiltinSpace::LinearGray));
    }

    #[test]
    fn test_linear_rgb_roundtrip() {
        let cs = linear_rgb();
        let lin = cs.from_rgb([0.5, 0.25, 1.0]);
        let back = cs.to_rgb(&lin);
        assert_abs_diff_eq!(back[0], 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(back[1], 0.25, epsilon = 1e-5);
        assert_abs_diff_eq!(back[2], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_gray_white_and_black() {
        let g = GraySpace::new("gamma 2.2", 2.2);
        assert_abs_diff_eq!(g.from_rgb([1.0, 1.0, 1.0])[0], 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(g.from_rgb([0.0, 0.0, 0.0])[0], 0.0);
        assert_abs_diff_eq!(g.to_rgb(&[1.0])[1], 1.0, epsilon = 1e-5);
        assert!(g.is_profile_based());
        assert_eq!(g.builtin(), None);
    }

    #[test]
    fn test_xyz_range() {
        let cs = cie_xyz();
        assert_eq!(cs.min_value(0), 0.0);
        assert_abs_diff_eq!(cs.max_value(2), 1.999_969_5, epsilon = 1e-6);
        let white = cs.from_rgb([1.0, 1.0, 1.0]);
        assert_abs_diff_eq!(white[1], 1.0, epsilon = 1e-4);
        let back = cs.to_rgb(&white);
        assert_abs_diff_eq!(back[0], 1.0, epsilon = 1e-3);
    }
}
