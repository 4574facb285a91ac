//! Linear RGB <-> sRGB gamma tables.
//!
//! There is exactly one built-in linear RGB space, so these tables need no
//! key: each is a process-wide `OnceLock`.
//!
//! | Function | Entries | Maps |
//! |----------|---------|------|
//! | [`linear8_to_srgb8`] | 256 | 8-bit linear -> 8-bit sRGB |
//! | [`srgb8_to_linear8`] | 256 | 8-bit sRGB -> 8-bit linear |
//! | [`linear16_to_srgb8`] | 65536 | 16-bit linear -> 8-bit sRGB |
//! | [`srgb8_to_linear16`] | 256 | 8-bit sRGB -> 16-bit linear |
//!
//! Entries are rounded half-up.

use std::sync::OnceLock;

use pixfmt_core::transfer::{srgb_eotf, srgb_oetf};
use tracing::debug;

static LINEAR8_TO_SRGB8: OnceLock<Vec<u8>> = OnceLock::new();
static SRGB8_TO_LINEAR8: OnceLock<Vec<u8>> = OnceLock::new();
static LINEAR16_TO_SRGB8: OnceLock<Vec<u8>> = OnceLock::new();
static SRGB8_TO_LINEAR16: OnceLock<Vec<u16>> = OnceLock::new();

#[inline]
fn round_scaled(v: f64, max: f64) -> f64 {
    (v * max + 0.5).floor().clamp(0.0, max)
}

fn build_to_srgb8(entries: usize) -> Vec<u8> {
    let max_in = (entries - 1) as f64;
    let lut: Vec<u8> = (0..entries)
        .map(|i| round_scaled(srgb_oetf(i as f64 / max_in), 255.0) as u8)
        .collect();
    debug!(entries, "built linear -> sRGB8 table");
    lut
}

/// 8-bit linear to 8-bit sRGB.
pub fn linear8_to_srgb8() -> &'static [u8] {
    LINEAR8_TO_SRGB8.get_or_init(|| build_to_srgb8(256))
}

/// 16-bit linear to 8-bit sRGB.
pub fn linear16_to_srgb8() -> &'static [u8] {
    LINEAR16_TO_SRGB8.get_or_init(|| build_to_srgb8(65536))
}

/// 8-bit sRGB to 8-bit linear.
pub fn srgb8_to_linear8() -> &'static [u8] {
    SRGB8_TO_LINEAR8.get_or_init(|| {
        let lut: Vec<u8> = (0..256)
            .map(|i| round_scaled(srgb_eotf(i as f64 / 255.0), 255.0) as u8)
            .collect();
        debug!(entries = 256, "built sRGB8 -> linear8 table");
        lut
    })
}

/// 8-bit sRGB to 16-bit linear.
pub fn srgb8_to_linear16() -> &'static [u16] {
    SRGB8_TO_LINEAR16.get_or_init(|| {
        let lut: Vec<u16> = (0..256)
            .map(|i| round_scaled(srgb_eotf(i as f64 / 255.0), 65535.0) as u16)
            .collect();
        debug!(entries = 256, "built sRGB8 -> linear16 table");
        lut
    })
}

/// Builds all four tables now.
pub fn prebuild() {
    linear8_to_srgb8();
    srgb8_to_linear8();
    linear16_to_srgb8();
    srgb8_to_linear16();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sizes() {
        assert_eq!(linear8_to_srgb8().len(), 256);
        assert_eq!(srgb8_to_linear8().len(), 256);
        assert_eq!(linear16_to_srgb8().len(), 65536);
        assert_eq!(srgb8_to_linear16().len(), 256);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(linear8_to_srgb8()[0], 0);
        assert_eq!(linear8_to_srgb8()[255], 255);
        assert_eq!(srgb8_to_linear16()[255], 65535);
        assert_eq!(linear16_to_srgb8()[65535], 255);
    }

    #[test]
    fn test_monotonic() {
        let lut = srgb8_to_linear16();
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        let lut = linear16_to_srgb8();
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sixteen_bit_roundtrip_is_exact() {
        let to16 = srgb8_to_linear16();
        let to8 = linear16_to_srgb8();
        for v in 0..256usize {
            assert_eq!(to8[to16[v] as usize] as usize, v);
        }
    }

    #[test]
    fn test_known_values() {
        // sRGB 128 is ~21.6% linear
        assert_eq!(srgb8_to_linear8()[128], 55);
        assert_eq!(linear8_to_srgb8()[55], 128);
    }

    #[test]
    fn test_shared_instance() {
        prebuild();
        assert!(std::ptr::eq(linear8_to_srgb8(), linear8_to_srgb8()));
    }
}
