//! sRGB transfer curves and luma weights.
//!
//! The sRGB standard uses a piecewise function combining a linear segment
//! near black with a power curve (approximately gamma 2.2) for the rest.
//! The built-in color spaces and the gamma lookup tables in `pixfmt-lut`
//! are both derived from these two functions.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999, ITU-R BT.709

// ============================================================================
// sRGB curves
// ============================================================================

/// sRGB EOTF: decodes gamma-encoded sRGB `[0, 1]` to linear light.
///
/// # Formula
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use pixfmt_core::transfer::srgb_eotf;
///
/// let linear = srgb_eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn srgb_eotf(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear light `[0, 1]` to gamma-encoded sRGB.
///
/// # Formula
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn srgb_oetf(l: f64) -> f64 {
    if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

// ============================================================================
// Luma
// ============================================================================

/// Red weight used when reducing linear RGB to gray.
pub const GRAY_LUMA_R: f32 = 0.2125;
/// Green weight used when reducing linear RGB to gray.
pub const GRAY_LUMA_G: f32 = 0.7154;
/// Blue weight used when reducing linear RGB to gray.
pub const GRAY_LUMA_B: f32 = 0.0721;

/// Weighted sum of 16-bit linear RGB samples, in `[0, 65535]`.
///
/// Evaluated in `f32` in a fixed order, so identical inputs always give
/// bit-identical results.
#[inline]
pub fn linear_luma16(r: u16, g: u16, b: u16) -> f32 {
    (GRAY_LUMA_R * r as f32) + (GRAY_LUMA_G * g as f32) + (GRAY_LUMA_B * b as f32)
}

/// [`linear_luma16`] rounded to a 16-bit lookup table index.
///
/// ```rust
/// use pixfmt_core::transfer::linear_luma16_index;
///
/// assert_eq!(linear_luma16_index(65535, 65535, 65535), 65535);
/// assert_eq!(linear_luma16_index(0, 0, 0), 0);
/// ```
#[inline]
pub fn linear_luma16_index(r: u16, g: u16, b: u16) -> u16 {
    ((linear_luma16(r, g, b) + 0.5) as u32).min(u16::MAX as u32) as u16
}

/// Integer luma of an 8-bit sRGB color, `(77R + 150G + 29B + 128) >> 8`.
///
/// Used to match colors against all-gray palettes.
#[inline]
pub const fn index_luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 77 + g as u32 * 150 + b as u32 * 29 + 128) >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_srgb_roundtrip() {
        for i in 0..=100 {
            let v = i as f64 / 100.0;
            assert_relative_eq!(srgb_oetf(srgb_eotf(v)), v, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_srgb_segments() {
        assert_relative_eq!(srgb_eotf(0.04045), 0.04045 / 12.92);
        assert_relative_eq!(srgb_oetf(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        assert_relative_eq!(GRAY_LUMA_R + GRAY_LUMA_G + GRAY_LUMA_B, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_index_luma_of_gray_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(index_luma(v, v, v), v);
        }
    }

    #[test]
    fn test_linear_luma_deterministic() {
        let a = linear_luma16(1234, 40000, 65535);
        let b = linear_luma16(1234, 40000, 65535);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
