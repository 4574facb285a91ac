//! Canonical image type tags.
//!
//! A tag names one exact color model / sample layout combination so that
//! callers can pick a specialized path. Anything else is [`ImageType::Custom`].
//!
//! | Tag | Model | Storage |
//! |-----|-------|---------|
//! | `IntRgb` | direct, `0xRRGGBB` | one `Int` per pixel |
//! | `IntArgb` | direct, `0xAARRGGBB` | one `Int` per pixel |
//! | `IntArgbPre` | as `IntArgb`, premultiplied | one `Int` per pixel |
//! | `IntBgr` | direct, `0xBBGGRR` | one `Int` per pixel |
//! | `ThreeByteBgr` | sRGB component | bytes `B, G, R` |
//! | `FourByteAbgr` | sRGB component + alpha | bytes `A, B, G, R` |
//! | `FourByteAbgrPre` | as `FourByteAbgr`, premultiplied | bytes `A, B, G, R` |
//! | `Ushort565Rgb` | direct, 5-6-5 | one `UShort` per pixel |
//! | `Ushort555Rgb` | direct, 5-5-5 | one `UShort` per pixel |
//! | `ByteGray` | linear gray component | one byte per pixel |
//! | `UshortGray` | linear gray component | one `UShort` per pixel |
//! | `ByteBinary` | indexed, 1/2/4 bits | packed bytes |
//! | `ByteIndexed` | indexed | one byte per pixel |

use std::fmt;

use pixfmt_color::ColorModel;
use pixfmt_core::{BuiltinSpace, DataType};
use pixfmt_raster::Raster;

/// Storage/interpretation combination of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageType {
    /// Not one of the combinations below.
    #[default]
    Custom,
    /// 8-bit RGB packed into an int, no alpha.
    IntRgb,
    /// 8-bit ARGB packed into an int.
    IntArgb,
    /// 8-bit premultiplied ARGB packed into an int.
    IntArgbPre,
    /// 8-bit BGR packed into an int, no alpha.
    IntBgr,
    /// Interleaved bytes in B, G, R order.
    ThreeByteBgr,
    /// Interleaved bytes in A, B, G, R order.
    FourByteAbgr,
    /// Interleaved premultiplied bytes in A, B, G, R order.
    FourByteAbgrPre,
    /// 5-6-5 RGB packed into a ushort.
    Ushort565Rgb,
    /// 5-5-5 RGB packed into a ushort.
    Ushort555Rgb,
    /// 8-bit linear gray.
    ByteGray,
    /// 16-bit linear gray.
    UshortGray,
    /// 1, 2 or 4 bit palette indices packed into bytes.
    ByteBinary,
    /// 8-bit palette indices.
    ByteIndexed,
}

impl ImageType {
    /// Every tag except [`ImageType::Custom`].
    pub const STANDARD: [ImageType; 13] = [
        Self::IntRgb,
        Self::IntArgb,
        Self::IntArgbPre,
        Self::IntBgr,
        Self::ThreeByteBgr,
        Self::FourByteAbgr,
        Self::FourByteAbgrPre,
        Self::Ushort565Rgb,
        Self::Ushort555Rgb,
        Self::ByteGray,
        Self::UshortGray,
        Self::ByteBinary,
        Self::ByteIndexed,
    ];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::IntRgb => "int_rgb",
            Self::IntArgb => "int_argb",
            Self::IntArgbPre => "int_argb_pre",
            Self::IntBgr => "int_bgr",
            Self::ThreeByteBgr => "3byte_bgr",
            Self::FourByteAbgr => "4byte_abgr",
            Self::FourByteAbgrPre => "4byte_abgr_pre",
            Self::Ushort565Rgb => "ushort_565_rgb",
            Self::Ushort555Rgb => "ushort_555_rgb",
            Self::ByteGray => "byte_gray",
            Self::UshortGray => "ushort_gray",
            Self::ByteBinary => "byte_binary",
            Self::ByteIndexed => "byte_indexed",
        }
    }

    /// Tag for a color model and a raster it is compatible with.
    ///
    /// Never fails; unrecognized pairs are [`ImageType::Custom`].
    pub fn classify(color_model: &ColorModel, raster: &Raster) -> Self {
        let sm = raster.sample_model();
        let tt = raster.transfer_type();
        let bands = raster.num_bands();
        let space = color_model.color_space().builtin();
        let premultiplied = color_model.is_alpha_premultiplied();

        match color_model {
            ColorModel::Direct(dcm) => {
                if space != Some(BuiltinSpace::Srgb) || sm.as_single_pixel_packed().is_none() {
                    return Self::Custom;
                }
                let masks = (dcm.red_mask(), dcm.green_mask(), dcm.blue_mask(), dcm.alpha_mask());
                match (tt, masks) {
                    (DataType::Int, (0xff_0000, 0xff00, 0xff, 0xff00_0000)) if premultiplied => Self::IntArgbPre,
                    (DataType::Int, (0xff_0000, 0xff00, 0xff, 0xff00_0000)) => Self::IntArgb,
                    (DataType::Int, (0xff_0000, 0xff00, 0xff, 0)) => Self::IntRgb,
                    (DataType::Int, (0xff, 0xff00, 0xff_0000, 0)) => Self::IntBgr,
                    (DataType::UShort, (0xf800, 0x07e0, 0x001f, 0)) => Self::Ushort565Rgb,
                    (DataType::UShort, (0x7c00, 0x03e0, 0x001f, 0)) => Self::Ushort555Rgb,
                    _ => Self::Custom,
                }
            }
            ColorModel::Component(ccm) => {
                let Some(csm) = sm.as_component() else {
                    return Self::Custom;
                };
                let sizes = ccm.info().component_sizes();
                let one_bank = csm.bank_indices().iter().all(|&b| b == 0);
                match space {
                    Some(BuiltinSpace::LinearGray) if bands == 1 && csm.pixel_stride() == 1 => match (tt, sizes) {
                        (DataType::Byte, [8]) => Self::ByteGray,
                        (DataType::UShort, [16]) => Self::UshortGray,
                        _ => Self::Custom,
                    },
                    Some(BuiltinSpace::Srgb)
                        if tt == DataType::Byte && one_bank && sizes.iter().all(|&s| s == 8) =>
                    {
                        let stride = csm.pixel_stride();
                        match (bands, ccm.info().has_alpha(), csm.band_offsets()) {
                            (3, false, [2, 1, 0]) if stride == 3 => Self::ThreeByteBgr,
                            (4, true, [3, 2, 1, 0]) if stride == 4 && premultiplied => Self::FourByteAbgrPre,
                            (4, true, [3, 2, 1, 0]) if stride == 4 => Self::FourByteAbgr,
                            _ => Self::Custom,
                        }
                    }
                    _ => Self::Custom,
                }
            }
            ColorModel::Indexed(icm) => {
                if bands != 1 || tt != DataType::Byte {
                    return Self::Custom;
                }
                if let Some(mpp) = sm.as_multi_pixel_packed() {
                    return match mpp.pixel_bit_stride() {
                        1 | 2 | 4 => Self::ByteBinary,
                        _ => Self::Custom,
                    };
                }
                match sm.as_component() {
                    Some(csm) if csm.pixel_stride() == 1 && icm.info().pixel_size() <= 8 => Self::ByteIndexed,
                    _ => Self::Custom,
                }
            }
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
