//! Per-color-space gray lookup tables.
//!
//! A component color model over a profile-based gray space converts gray
//! samples to sRGB, and linear luminance back to the space's own gray,
//! through tables specific to that space. Building them means probing the
//! space 65536 times, so they are cached in a registry keyed by the
//! identity of the color space `Arc`.
//!
//! The registry holds weak keys: dropping the last handle to a space makes
//! its entry collectable, and dead entries are pruned on the next insert.
//! Tables are built outside the registry lock and published under it; when
//! two threads build tables for the same space, the last one to publish
//! wins and both callers receive valid tables.
//!
//! The built-in linear gray space shares the linear RGB gamma tables.

use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use pixfmt_core::colorspace::{same_space, BuiltinSpace, ColorSpace, ColorSpaceRef};
use pixfmt_core::transfer::srgb_oetf;
use tracing::debug;

use crate::gamma;

/// Lookup tables for one gray color space.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayLuts {
    /// 8-bit gray sample to 8-bit sRGB (256 entries).
    pub gray8_to_srgb8: Vec<u8>,
    /// 16-bit gray sample to 8-bit sRGB (65536 entries).
    pub gray16_to_srgb8: Vec<u8>,
    /// 16-bit linear luminance to 8-bit gray sample (65536 entries).
    pub linear16_to_gray8: Vec<u8>,
    /// 16-bit linear luminance to 16-bit gray sample (65536 entries).
    pub linear16_to_gray16: Vec<u16>,
}

impl GrayLuts {
    /// Builds tables by probing `cs` through its sRGB conversions.
    pub fn build(cs: &dyn ColorSpace) -> Self {
        let to_srgb8 = |entries: usize| -> Vec<u8> {
            let max = (entries - 1) as f32;
            (0..entries)
                .map(|i| unit_to(cs.to_rgb(&[i as f32 / max])[0], 255.0) as u8)
                .collect()
        };
        let gray8_to_srgb8 = to_srgb8(256);
        let gray16_to_srgb8 = to_srgb8(65536);

        let mut linear16_to_gray8 = Vec::with_capacity(65536);
        let mut linear16_to_gray16 = Vec::with_capacity(65536);
        for i in 0..65536u32 {
            let s = srgb_oetf(i as f64 / 65535.0) as f32;
            let g = cs.from_rgb([s, s, s])[0];
            linear16_to_gray8.push(unit_to(g, 255.0) as u8);
            linear16_to_gray16.push(unit_to(g, 65535.0) as u16);
        }

        debug!(space = cs.name(), "built gray lookup tables");
        Self {
            gray8_to_srgb8,
            gray16_to_srgb8,
            linear16_to_gray8,
            linear16_to_gray16,
        }
    }

    /// Tables of the built-in linear gray space: gamma tables for the sRGB
    /// direction, identity for the gray direction.
    pub fn linear() -> Self {
        Self {
            gray8_to_srgb8: gamma::linear8_to_srgb8().to_vec(),
            gray16_to_srgb8: gamma::linear16_to_srgb8().to_vec(),
            linear16_to_gray8: (0..65536u32).map(|i| ((i * 255 + 32767) / 65535) as u8).collect(),
            linear16_to_gray16: (0..65536u32).map(|i| i as u16).collect(),
        }
    }
}

#[inline]
fn unit_to(v: f32, max: f32) -> f32 {
    (v.clamp(0.0, 1.0) * max + 0.5).floor()
}

type Registry = Mutex<Vec<(Weak<dyn ColorSpace>, Arc<GrayLuts>)>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

fn linear_tables() -> Arc<GrayLuts> {
    static LINEAR: OnceLock<Arc<GrayLuts>> = OnceLock::new();
    LINEAR.get_or_init(|| Arc::new(GrayLuts::linear())).clone()
}

fn lookup(cs: &ColorSpaceRef) -> Option<Arc<GrayLuts>> {
    let reg = registry().lock().unwrap_or_else(PoisonError::into_inner);
    reg.iter()
        .find(|(key, _)| key.strong_count() > 0 && std::ptr::addr_eq(key.as_ptr(), Arc::as_ptr(cs)))
        .map(|(_, luts)| luts.clone())
}

/// Gray tables for `cs`, building and caching them on first request.
pub fn gray_luts(cs: &ColorSpaceRef) -> Arc<GrayLuts> {
    if cs.builtin() == Some(BuiltinSpace::LinearGray) {
        return linear_tables();
    }
    if let Some(luts) = lookup(cs) {
        return luts;
    }

    let built = Arc::new(GrayLuts::build(cs.as_ref()));

    let mut reg = registry().lock().unwrap_or_else(PoisonError::into_inner);
    reg.retain(|(key, _)| key.strong_count() > 0);
    match reg
        .iter_mut()
        .find(|(key, _)| key.upgrade().is_some_and(|k| same_space(&k, cs)))
    {
        Some(entry) => entry.1 = built.clone(),
        None => reg.push((Arc::downgrade(cs), built.clone())),
    }
    debug!(space = cs.name(), entries = reg.len(), "gray tables registered");
    built
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixfmt_core::colorspace::{linear_gray, GraySpace};

    #[test]
    fn test_linear_gray_uses_gamma_tables() {
        let luts = gray_luts(&linear_gray());
        assert_eq!(luts.gray8_to_srgb8, gamma::linear8_to_srgb8());
        assert_eq!(luts.linear16_to_gray16[1234], 1234);
        assert_eq!(luts.linear16_to_gray8[65535], 255);
    }

    #[test]
    fn test_cached_by_identity() {
        let cs: ColorSpaceRef = Arc::new(GraySpace::new("g22", 2.2));
        let a = gray_luts(&cs);
        let b = gray_luts(&cs);
        assert!(Arc::ptr_eq(&a, &b));

        let other: ColorSpaceRef = Arc::new(GraySpace::new("g22", 2.2));
        let c = gray_luts(&other);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(*a, *c);
    }

    #[test]
    fn test_unit_gamma_matches_linear() {
        let cs: ColorSpaceRef = Arc::new(GraySpace::new("g10", 1.0));
        let luts = gray_luts(&cs);
        assert_eq!(luts.gray8_to_srgb8[0], 0);
        assert_eq!(luts.gray8_to_srgb8[255], 255);
        for i in (0..65536).step_by(4099) {
            let d = luts.linear16_to_gray16[i] as i32 - i as i32;
            assert!(d.abs() <= 2, "index {i}: {d}");
        }
    }
}
