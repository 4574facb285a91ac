//! Palette-based color model.
//!
//! A pixel is an index into a table of up to 65536 ARGB entries. Decoding
//! is a lookup; encoding searches the palette for the closest entry:
//!
//! 1. all-gray opaque palettes compare the query's integer luma against
//!    each entry's gray level
//! 2. opaque palettes try an exact RGB match, then squared RGB distance
//! 3. palettes with alpha map fully transparent queries to the transparent
//!    index when there is one, otherwise use squared RGBA distance
//!
//! Search results go through a small most-recently-used cache guarded by a
//! mutex, so a shared model can encode from several threads.
//!
//! Entries excluded by a [`ValidBits`] set are stored as 0 and never
//! returned by the opaque and gray searches.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use pixfmt_core::transfer::index_luma;
use pixfmt_core::{colorspace, settings, DataElements, DataType, Error, Result, Transparency};
use pixfmt_raster::{
    factory, ComponentSampleModel, MultiPixelPackedSampleModel, Raster, SampleLayout, SampleModel, WritableRaster,
};
use tracing::{trace, warn};

use crate::model::{unpack_argb, ModelInfo};

// ============================================================================
// ValidBits
// ============================================================================

/// Growable bitset of palette indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidBits {
    words: Vec<u64>,
}

impl ValidBits {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every index in `0..n`.
    pub fn all(n: usize) -> Self {
        Self::from_indices(0..n)
    }

    /// The given indices.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = Self::new();
        for i in indices {
            bits.set(i);
        }
        bits
    }

    /// Adds `i`.
    pub fn set(&mut self, i: usize) {
        let word = i / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (i % 64);
    }

    /// Removes `i`.
    pub fn clear(&mut self, i: usize) {
        if let Some(w) = self.words.get_mut(i / 64) {
            *w &= !(1 << (i % 64));
        }
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }

    /// True if `i` is in the set.
    pub fn test(&self, i: usize) -> bool {
        self.words.get(i / 64).is_some_and(|w| w & (1 << (i % 64)) != 0)
    }

    /// Number of indices in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True if no index is set.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            (0..64).filter(move |b| word & (1 << b) != 0).map(move |b| w * 64 + b)
        })
    }
}

// ============================================================================
// IndexColorModel
// ============================================================================

/// Color model whose pixels are palette indices.
pub struct IndexColorModel {
    info: ModelInfo,
    map_size: usize,
    rgb: Vec<u32>,
    transparent_index: Option<usize>,
    all_gray_opaque: bool,
    valid: Option<ValidBits>,
    pixel_mask: u32,
    cache: Mutex<VecDeque<(u32, u32)>>,
}

impl fmt::Debug for IndexColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexColorModel")
            .field("bits", &self.info.pixel_size())
            .field("map_size", &self.map_size)
            .field("transparency", &self.info.transparency())
            .field("transparent_index", &self.transparent_index)
            .field("transfer_type", &self.info.transfer_type())
            .finish()
    }
}

impl Clone for IndexColorModel {
    fn clone(&self) -> Self {
        Self {
            info: self.info.clone(),
            map_size: self.map_size,
            rgb: self.rgb.clone(),
            transparent_index: self.transparent_index,
            all_gray_opaque: self.all_gray_opaque,
            valid: self.valid.clone(),
            pixel_mask: self.pixel_mask,
            cache: Mutex::new(VecDeque::new()),
        }
    }
}

impl PartialEq for IndexColorModel {
    fn eq(&self, other: &Self) -> bool {
        self.info == other.info
            && self.map_size == other.map_size
            && self.transparent_index == other.transparent_index
            && self.rgb[..self.map_size] == other.rgb[..other.map_size]
            && self.valid_pixels() == other.valid_pixels()
    }
}

fn info_for(bits: u32, transparency: Transparency, transfer_type: DataType) -> ModelInfo {
    let has_alpha = transparency != Transparency::Opaque;
    let components = if has_alpha { 4 } else { 3 };
    ModelInfo::from_parts(
        colorspace::srgb(),
        vec![8; components],
        bits,
        has_alpha,
        false,
        transparency,
        transfer_type,
    )
}

impl IndexColorModel {
    /// Builds the palette from `entry(i)` for every valid `i < size`.
    fn build(
        bits: u32,
        size: usize,
        transfer_type: DataType,
        valid: Option<ValidBits>,
        entry: impl Fn(usize) -> u32,
    ) -> Result<Self> {
        if !(1..=16).contains(&bits) {
            return Err(Error::invalid_argument(format!(
                "number of bits ({bits}) must be between 1 and 16"
            )));
        }
        if size < 1 {
            return Err(Error::invalid_argument(format!("map size ({size}) must be >= 1")));
        }
        if !matches!(transfer_type, DataType::Byte | DataType::UShort) {
            return Err(Error::invalid_argument(format!(
                "transfer type must be byte or ushort, got {transfer_type}"
            )));
        }
        if size > 1 << bits {
            warn!(bits, size, "palette has more entries than pixels can address");
        }

        let mut rgb = vec![0u32; (1usize << bits).max(size).max(256)];
        let mut transparency = Transparency::Opaque;
        let mut transparent_index = None;
        let mut all_gray = true;
        for (i, slot) in rgb.iter_mut().enumerate().take(size) {
            if valid.as_ref().is_some_and(|v| !v.test(i)) {
                continue;
            }
            let argb = entry(i);
            let (a, r, g, b) = unpack_argb(argb);
            match a {
                255 => all_gray = all_gray && r == g && g == b,
                0 => {
                    transparency = transparency.max(Transparency::Bitmask);
                    transparent_index.get_or_insert(i);
                    all_gray = false;
                }
                _ => {
                    transparency = Transparency::Translucent;
                    all_gray = false;
                }
            }
            *slot = argb;
        }

        let mask_bits = match bits {
            3 => 4,
            5..=7 => 8,
            b => b,
        };
        trace!(bits, size, %transparency, all_gray, "index color model");
        Ok(Self {
            info: info_for(bits, transparency, transfer_type),
            map_size: size,
            rgb,
            transparent_index,
            all_gray_opaque: all_gray,
            valid,
            pixel_mask: (1u32 << mask_bits) - 1,
            cache: Mutex::new(VecDeque::new()),
        })
    }

    fn default_transfer_type(bits: u32) -> DataType {
        if bits <= 8 { DataType::Byte } else { DataType::UShort }
    }

    /// An opaque palette from separate red, green and blue planes.
    ///
    /// # Errors
    ///
    /// `bits` outside `1..=16`, `size` of 0, or a plane shorter than `size`.
    pub fn from_planes(bits: u32, size: usize, red: &[u8], green: &[u8], blue: &[u8]) -> Result<Self> {
        for plane in [red, green, blue] {
            Error::check_len(size, plane.len())?;
        }
        Self::build(bits, size, Self::default_transfer_type(bits), None, |i| {
            0xff00_0000 | (red[i] as u32) << 16 | (green[i] as u32) << 8 | blue[i] as u32
        })
    }

    /// A palette from red, green, blue and alpha planes.
    pub fn from_planes_with_alpha(
        bits: u32,
        size: usize,
        red: &[u8],
        green: &[u8],
        blue: &[u8],
        alpha: &[u8],
    ) -> Result<Self> {
        for plane in [red, green, blue, alpha] {
            Error::check_len(size, plane.len())?;
        }
        Self::build(bits, size, Self::default_transfer_type(bits), None, |i| {
            (alpha[i] as u32) << 24 | (red[i] as u32) << 16 | (green[i] as u32) << 8 | blue[i] as u32
        })
    }

    /// A palette from interleaved `r, g, b[, a]` bytes starting at byte
    /// `start`.
    pub fn from_interleaved(bits: u32, size: usize, cmap: &[u8], start: usize, has_alpha: bool) -> Result<Self> {
        let stride = if has_alpha { 4 } else { 3 };
        Error::check_len(start + size * stride, cmap.len())?;
        Self::build(bits, size, Self::default_transfer_type(bits), None, |i| {
            let e = &cmap[start + i * stride..start + (i + 1) * stride];
            let a = if has_alpha { e[3] } else { 255 };
            (a as u32) << 24 | (e[0] as u32) << 16 | (e[1] as u32) << 8 | e[2] as u32
        })
    }

    /// A palette from packed ARGB entries starting at `start`. Without
    /// `has_alpha` every entry is forced opaque.
    pub fn from_argb(
        bits: u32,
        size: usize,
        cmap: &[u32],
        start: usize,
        has_alpha: bool,
        transfer_type: DataType,
    ) -> Result<Self> {
        Error::check_len(start + size, cmap.len())?;
        Self::build(bits, size, transfer_type, None, |i| {
            let argb = cmap[start + i];
            if has_alpha { argb } else { argb | 0xff00_0000 }
        })
    }

    /// A palette from packed ARGB entries where only the indices in `valid`
    /// are usable. Invalid entries are stored as 0.
    pub fn from_argb_with_valid(
        bits: u32,
        size: usize,
        cmap: &[u32],
        start: usize,
        transfer_type: DataType,
        valid: ValidBits,
    ) -> Result<Self> {
        Error::check_len(start + size, cmap.len())?;
        Self::build(bits, size, transfer_type, Some(valid), |i| cmap[start + i])
    }

    /// Marks `index` fully transparent. Indices outside the map are
    /// ignored.
    pub fn with_transparent_pixel(mut self, index: usize) -> Self {
        if index < self.map_size {
            self.rgb[index] &= 0x00ff_ffff;
            self.transparent_index = Some(index);
            self.all_gray_opaque = false;
            let transparency = self.info.transparency().max(Transparency::Bitmask);
            self.info = info_for(self.info.pixel_size(), transparency, self.info.transfer_type());
            self.cache = Mutex::new(VecDeque::new());
        }
        self
    }

    // ------------------------------------------------------------------------
    // Palette
    // ------------------------------------------------------------------------

    /// The shared description.
    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    /// Number of palette entries.
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// Index of the first fully transparent entry, if any.
    pub fn transparent_pixel(&self) -> Option<usize> {
        self.transparent_index
    }

    /// True if every valid entry is opaque gray.
    pub fn is_all_gray_opaque(&self) -> bool {
        self.all_gray_opaque
    }

    /// True if `pixel` is inside the map and valid.
    pub fn is_valid(&self, pixel: usize) -> bool {
        pixel < self.map_size && self.valid.as_ref().is_none_or(|v| v.test(pixel))
    }

    /// Every usable index.
    pub fn valid_pixels(&self) -> ValidBits {
        match &self.valid {
            Some(v) => ValidBits::from_indices(v.iter().take_while(|&i| i < self.map_size)),
            None => ValidBits::all(self.map_size),
        }
    }

    fn channel(&self, shift: u32) -> Vec<u8> {
        self.rgb[..self.map_size].iter().map(|&c| (c >> shift) as u8).collect()
    }

    /// Red of every entry.
    pub fn reds(&self) -> Vec<u8> {
        self.channel(16)
    }

    /// Green of every entry.
    pub fn greens(&self) -> Vec<u8> {
        self.channel(8)
    }

    /// Blue of every entry.
    pub fn blues(&self) -> Vec<u8> {
        self.channel(0)
    }

    /// Alpha of every entry.
    pub fn alphas(&self) -> Vec<u8> {
        self.channel(24)
    }

    /// Every entry as ARGB.
    pub fn rgbs(&self) -> Vec<u32> {
        self.rgb[..self.map_size].to_vec()
    }

    #[inline]
    fn entry(&self, pixel: u32) -> u32 {
        self.rgb[(pixel & self.pixel_mask) as usize]
    }

    fn pixel_of(&self, data: &DataElements) -> Result<u32> {
        data.expect(self.info.transfer_type(), 1)?;
        Ok(data.get_int(0) as u32 & 0xffff)
    }

    fn wrap(&self, pixel: u32, reuse: Option<DataElements>) -> Result<DataElements> {
        let mut out = DataElements::reuse(reuse, self.info.transfer_type(), 1)?;
        out.set_int(0, pixel as i32);
        Ok(out)
    }

    // ------------------------------------------------------------------------
    // Nearest color
    // ------------------------------------------------------------------------

    /// Palette index closest to `argb`, through the lookup cache.
    fn closest(&self, argb: u32) -> u32 {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(&(_, pix)) = cache.iter().rev().find(|(rgb, _)| *rgb == argb) {
            return pix;
        }
        let pix = self.search(argb);
        if cache.len() >= settings().index_cache_entries {
            cache.pop_front();
        }
        cache.push_back((argb, pix));
        pix
    }

    fn search(&self, argb: u32) -> u32 {
        let (alpha, red, green, blue) = unpack_argb(argb);
        let lut = &self.rgb[..self.map_size];

        if self.all_gray_opaque {
            let gray = index_luma(red, green, blue) as i32;
            let mut best = 0;
            let mut min_dist = 256;
            for (i, &entry) in lut.iter().enumerate() {
                if entry == 0 {
                    continue;
                }
                let d = ((entry & 0xff) as i32 - gray).abs();
                if d < min_dist {
                    best = i;
                    if d == 0 {
                        break;
                    }
                    min_dist = d;
                }
            }
            return best as u32;
        }

        if self.info.transparency() == Transparency::Opaque {
            if let Some(i) = lut
                .iter()
                .position(|&e| e != 0 && e & 0x00ff_ffff == argb & 0x00ff_ffff)
            {
                return i as u32;
            }
            let mut best = 0;
            let mut smallest = i32::MAX;
            for (i, &entry) in lut.iter().enumerate() {
                if entry == 0 {
                    continue;
                }
                let (_, r, g, b) = unpack_argb(entry);
                let mut err = sq(r, red);
                if err >= smallest {
                    continue;
                }
                err += sq(g, green);
                if err >= smallest {
                    continue;
                }
                err += sq(b, blue);
                if err < smallest {
                    best = i;
                    smallest = err;
                }
            }
            return best as u32;
        }

        if alpha == 0 {
            if let Some(t) = self.transparent_index {
                return t as u32;
            }
        }

        let valid = |i: usize| self.valid.as_ref().is_none_or(|v| v.test(i));
        let mut best = 0;
        let mut smallest = i32::MAX;
        for (i, &entry) in lut.iter().enumerate() {
            if entry == argb {
                if !valid(i) {
                    continue;
                }
                best = i;
                break;
            }
            let (a, r, g, b) = unpack_argb(entry);
            let mut err = sq(r, red);
            if err >= smallest {
                continue;
            }
            err += sq(g, green);
            if err >= smallest {
                continue;
            }
            err += sq(b, blue);
            if err >= smallest {
                continue;
            }
            err += sq(a, alpha);
            if err < smallest && valid(i) {
                best = i;
                smallest = err;
            }
        }
        best as u32
    }

    // ------------------------------------------------------------------------
    // Single-integer pixels
    // ------------------------------------------------------------------------

    /// Red of palette entry `pixel`.
    pub fn red(&self, pixel: u32) -> Result<u8> {
        Ok((self.entry(pixel) >> 16) as u8)
    }

    /// Green of palette entry `pixel`.
    pub fn green(&self, pixel: u32) -> Result<u8> {
        Ok((self.entry(pixel) >> 8) as u8)
    }

    /// Blue of palette entry `pixel`.
    pub fn blue(&self, pixel: u32) -> Result<u8> {
        Ok(self.entry(pixel) as u8)
    }

    /// Alpha of palette entry `pixel`.
    pub fn alpha(&self, pixel: u32) -> Result<u8> {
        Ok((self.entry(pixel) >> 24) as u8)
    }

    /// Palette entry `pixel` as ARGB.
    pub fn rgb(&self, pixel: u32) -> Result<u32> {
        Ok(self.entry(pixel))
    }

    // ------------------------------------------------------------------------
    // Transfer arrays
    // ------------------------------------------------------------------------

    /// Red of the indexed entry.
    pub fn red_data(&self, data: &DataElements) -> Result<u8> {
        self.red(self.pixel_of(data)?)
    }

    /// Green of the indexed entry.
    pub fn green_data(&self, data: &DataElements) -> Result<u8> {
        self.green(self.pixel_of(data)?)
    }

    /// Blue of the indexed entry.
    pub fn blue_data(&self, data: &DataElements) -> Result<u8> {
        self.blue(self.pixel_of(data)?)
    }

    /// Alpha of the indexed entry.
    pub fn alpha_data(&self, data: &DataElements) -> Result<u8> {
        self.alpha(self.pixel_of(data)?)
    }

    /// The indexed entry as ARGB.
    pub fn rgb_data(&self, data: &DataElements) -> Result<u32> {
        self.rgb(self.pixel_of(data)?)
    }

    /// Index of the palette entry closest to `argb`.
    pub fn data_elements(&self, argb: u32, reuse: Option<DataElements>) -> Result<DataElements> {
        self.wrap(self.closest(argb), reuse)
    }

    // ------------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------------

    /// Red, green, blue and (with alpha) alpha of entry `pixel`.
    pub fn components(&self, pixel: u32) -> Result<Vec<u32>> {
        let (a, r, g, b) = unpack_argb(self.entry(pixel));
        let mut out = vec![r as u32, g as u32, b as u32];
        if self.info.has_alpha() {
            out.push(a as u32);
        }
        Ok(out)
    }

    /// Components of the indexed entry.
    pub fn components_data(&self, data: &DataElements) -> Result<Vec<u32>> {
        self.components(self.pixel_of(data)?)
    }

    /// Components of the indexed entry divided by 255.
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

    /// Index of the entry closest to the given components.
    pub fn data_element(&self, components: &[u32]) -> Result<u32> {
        self.info.check_components(components.len())?;
        let alpha = if self.info.has_alpha() { components[3] & 0xff } else { 0xff };
        let argb = alpha << 24 | (components[0] & 0xff) << 16 | (components[1] & 0xff) << 8 | components[2] & 0xff;
        Ok(self.closest(argb))
    }

    /// Index of the entry closest to the given components, as a transfer
    /// array.
    pub fn data_elements_from_components(
        &self,
        components: &[u32],
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        self.wrap(self.data_element(components)?, reuse)
    }

    /// Index of the entry closest to normalized components.
    pub fn data_element_normalized(&self, normalized: &[f32]) -> Result<u32> {
        self.data_element(&self.info.unnormalize(normalized)?)
    }

    /// Index of the entry closest to normalized components, as a transfer
    /// array.
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

    /// Palettes are never premultiplied; asking for premultiplied data is
    /// [`Error::Unsupported`].
    pub fn coerce_data(&self, _raster: &WritableRaster, premultiplied: bool) -> Result<Self> {
        if premultiplied {
            return Err(Error::unsupported("indexed color models cannot premultiply alpha"));
        }
        Ok(self.clone())
    }

    /// Palette indices carry no premultiplied colors, so rasters are left
    /// as they are.
    pub fn coerce_raster(&self, _raster: &WritableRaster, _raster_premultiplied: bool) -> Result<()> {
        Ok(())
    }

    /// True for one-band rasters of the same transfer type whose samples
    /// can address every entry.
    pub fn is_compatible_raster(&self, raster: &Raster) -> bool {
        let sm = raster.sample_model();
        raster.transfer_type() == self.info.transfer_type()
            && raster.num_bands() == 1
            && (1u64 << sm.sample_size(0).min(32)) >= self.map_size as u64
    }

    /// True for one-band component or multi-pixel packed models of the same
    /// transfer type.
    pub fn is_compatible_sample_model(&self, sample_model: &SampleModel) -> bool {
        matches!(
            sample_model,
            SampleModel::Interleaved(_) | SampleModel::Banded(_) | SampleModel::MultiPixelPacked(_)
        ) && sample_model.transfer_type() == self.info.transfer_type()
            && sample_model.num_bands() == 1
    }

    /// Multi-pixel packed for 1, 2 and 4 bit palettes, one element per
    /// pixel otherwise.
    pub fn create_compatible_sample_model(&self, width: i32, height: i32) -> Result<SampleModel> {
        let bits = self.info.pixel_size();
        let dt = self.info.transfer_type();
        if matches!(bits, 1 | 2 | 4) {
            return MultiPixelPackedSampleModel::new(dt, width, height, bits).map(SampleModel::MultiPixelPacked);
        }
        ComponentSampleModel::pixel_interleaved(dt, width, height, 1, width.max(0) as usize, vec![0])
            .map(SampleModel::Interleaved)
    }

    /// A packed byte raster for 1, 2 and 4 bit palettes, an interleaved one
    /// otherwise.
    pub fn create_compatible_writable_raster(&self, width: i32, height: i32) -> Result<WritableRaster> {
        let bits = self.info.pixel_size();
        let dt = self.info.transfer_type();
        match bits {
            1 | 2 | 4 if dt == DataType::Byte => factory::packed_bits(dt, width, height, 1, bits, None),
            _ => factory::interleaved(dt, width, height, 1, None),
        }
    }

    /// Always `None`: the alpha of an indexed pixel lives in the palette.
    pub fn alpha_raster(&self, _raster: &WritableRaster) -> Result<Option<WritableRaster>> {
        Ok(None)
    }
}

#[inline]
fn sq(a: u8, b: u8) -> i32 {
    let d = a as i32 - b as i32;
    d * d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_ramp() -> IndexColorModel {
        let v: Vec<u8> = (0..=255u8).collect();
        IndexColorModel::from_planes(8, 256, &v, &v, &v).unwrap()
    }

    #[test]
    fn test_valid_bits() {
        let mut b = ValidBits::from_indices([1, 70, 3]);
        assert!(b.test(70) && b.test(1) && !b.test(2));
        assert_eq!(b.len(), 3);
        b.clear(70);
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(b, ValidBits::from_indices([3, 1]));
        assert!(ValidBits::new().is_empty());
    }

    #[test]
    fn test_lookup() {
        let cm = IndexColorModel::from_planes(2, 3, &[255, 0, 0], &[0, 255, 0], &[0, 0, 255]).unwrap();
        assert_eq!(cm.rgb(0).unwrap(), 0xffff0000);
        assert_eq!(cm.green(1).unwrap(), 255);
        assert_eq!(cm.rgb(3).unwrap(), 0);
        assert_eq!(cm.info().transparency(), Transparency::Opaque);
        assert!(!cm.info().has_alpha());
        assert_eq!(cm.components(2).unwrap(), vec![0, 0, 255]);
        assert_eq!(cm.rgb_data(&DataElements::Byte(vec![2])).unwrap(), 0xff0000ff);
    }

    #[test]
    fn test_opaque_nearest() {
        let cm = IndexColorModel::from_planes(2, 3, &[255, 0, 0], &[0, 255, 0], &[0, 0, 255]).unwrap();
        for (i, &argb) in cm.rgbs().iter().enumerate() {
            assert_eq!(cm.data_elements(argb, None).unwrap().as_bytes(), Some(&[i as u8][..]));
        }
        assert_eq!(cm.data_elements(0xffe01010, None).unwrap().as_bytes(), Some(&[0][..]));
        assert_eq!(cm.data_elements(0x00e01010, None).unwrap().as_bytes(), Some(&[0][..]));
        assert_eq!(cm.data_element(&[10, 20, 240]).unwrap(), 2);
    }

    #[test]
    fn test_gray_nearest() {
        let cm = gray_ramp();
        assert!(cm.is_all_gray_opaque());
        assert_eq!(cm.data_elements(0xff808080, None).unwrap().as_bytes(), Some(&[128][..]));
        // luma of pure red
        assert_eq!(cm.data_elements(0xffff0000, None).unwrap().as_bytes(), Some(&[77][..]));
    }

    #[test]
    fn test_transparent_pixel() {
        let cm = gray_ramp().with_transparent_pixel(5);
        assert_eq!(cm.transparent_pixel(), Some(5));
        assert_eq!(cm.info().transparency(), Transparency::Bitmask);
        assert!(cm.info().has_alpha());
        assert!(!cm.is_all_gray_opaque());
        assert_eq!(cm.alpha(5).unwrap(), 0);
        assert_eq!(cm.data_elements(0x00123456, None).unwrap().as_bytes(), Some(&[5][..]));
        assert_eq!(cm.components(5).unwrap(), vec![5, 5, 5, 0]);
        let ignored = gray_ramp().with_transparent_pixel(300);
        assert_eq!(ignored.transparent_pixel(), None);
    }

    #[test]
    fn test_alpha_classification() {
        let cm = IndexColorModel::from_planes_with_alpha(1, 2, &[0, 255], &[0, 255], &[0, 255], &[0, 255]).unwrap();
        assert_eq!(cm.info().transparency(), Transparency::Bitmask);
        assert_eq!(cm.transparent_pixel(), Some(0));
        let cm = IndexColorModel::from_planes_with_alpha(1, 2, &[0, 255], &[0, 255], &[0, 255], &[128, 0]).unwrap();
        assert_eq!(cm.info().transparency(), Transparency::Translucent);
        assert_eq!(cm.transparent_pixel(), Some(1));
        assert_eq!(cm.data_elements(0x80000000, None).unwrap().as_bytes(), Some(&[0][..]));
    }

    #[test]
    fn test_interleaved_and_argb_constructors() {
        let cm = IndexColorModel::from_interleaved(1, 2, &[9, 1, 2, 3, 4, 5, 6], 1, false).unwrap();
        assert_eq!(cm.rgbs(), vec![0xff010203, 0xff040506]);
        let cm = IndexColorModel::from_argb(4, 2, &[0x10203040, 0x50607080], 0, false, DataType::UShort).unwrap();
        assert_eq!(cm.rgbs(), vec![0xff203040, 0xff607080]);
        assert_eq!(cm.info().transfer_type(), DataType::UShort);
        assert!(IndexColorModel::from_interleaved(1, 2, &[1, 2, 3], 0, false).is_err());
    }

    #[test]
    fn test_valid_bits_palette() {
        let valid = ValidBits::from_indices([0, 2]);
        let cm = IndexColorModel::from_argb_with_valid(
            2,
            3,
            &[0xffff0000, 0xff00ff00, 0xff0000ff],
            0,
            DataType::Byte,
            valid.clone(),
        )
        .unwrap();
        assert!(cm.is_valid(0) && !cm.is_valid(1) && !cm.is_valid(3));
        assert_eq!(cm.valid_pixels(), valid);
        assert_eq!(cm.rgb(1).unwrap(), 0);
        assert_eq!(cm.data_elements(0xff00ff00, None).unwrap().as_bytes(), Some(&[0][..]));
    }

    #[test]
    fn test_pixel_mask_rounding() {
        let v: Vec<u8> = (0..8).collect();
        let cm = IndexColorModel::from_planes(3, 8, &v, &v, &v).unwrap();
        // 3-bit palettes mask with 4 bits
        assert_eq!(cm.red(0x1f).unwrap(), 0);
        assert_eq!(cm.red(0x17).unwrap(), 7);
    }

    #[test]
    fn test_validation() {
        assert!(IndexColorModel::from_planes(0, 1, &[0], &[0], &[0]).is_err());
        assert!(IndexColorModel::from_planes(17, 1, &[0], &[0], &[0]).is_err());
        assert!(IndexColorModel::from_planes(8, 0, &[], &[], &[]).is_err());
        assert!(IndexColorModel::from_planes(8, 4, &[0; 3], &[0; 4], &[0; 4]).is_err());
        assert!(IndexColorModel::from_argb(8, 1, &[0], 0, true, DataType::Int).is_err());
    }

    #[test]
    fn test_compatibility() {
        let cm = IndexColorModel::from_planes(2, 4, &[0; 4], &[0; 4], &[0; 4]).unwrap();
        let r = cm.create_compatible_writable_raster(5, 2).unwrap();
        assert!(r.sample_model().as_multi_pixel_packed().is_some());
        assert!(cm.is_compatible_raster(&r));
        assert!(cm.is_compatible_sample_model(r.sample_model()));
        let wide = factory::interleaved(DataType::Byte, 2, 2, 3, None).unwrap();
        assert!(!cm.is_compatible_raster(&wide));
        let big = gray_ramp();
        let one_bit = factory::packed_bits(DataType::Byte, 4, 1, 1, 1, None).unwrap();
        assert!(!big.is_compatible_raster(&one_bit));
        assert!(big.alpha_raster(&r).unwrap().is_none());
    }

    #[test]
    fn test_coerce_data() {
        let cm = gray_ramp();
        let r = cm.create_compatible_writable_raster(1, 1).unwrap();
        assert_eq!(cm.coerce_data(&r, false).unwrap(), cm);
        assert!(cm.coerce_data(&r, true).unwrap_err().is_unsupported());
    }

    #[test]
    fn test_normalized_components() {
        let cm = gray_ramp();
        let n = cm.normalized_components(&DataElements::Byte(vec![255])).unwrap();
        assert_eq!(n, vec![1.0, 1.0, 1.0]);
        assert_eq!(cm.data_element_normalized(&[0.0, 0.0, 0.0]).unwrap(), 0);
    }
}
