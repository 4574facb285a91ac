//! Rasters: positioned views over a sample model and shared storage.
//!
//! A [`Raster`] covers the rectangle `(min_x, min_y, width, height)` of its
//! own coordinate space. The sample model is always zero-based; the
//! *sample model translate* `(tx, ty)` maps raster coordinates to it:
//! `model_x = x - tx`. Children created with [`Raster::create_child`]
//! share the parent's [`SharedDataBuffer`] and differ only in bounds,
//! translate and possibly band subset, so writes through any view are
//! visible through all of them.
//!
//! Children keep a non-owning link to their parent. Storage lifetime is
//! governed by the buffer handle alone.
//!
//! # Usage
//!
//! ```rust
//! use pixfmt_core::DataType;
//! use pixfmt_raster::factory;
//!
//! let parent = factory::interleaved(DataType::Byte, 8, 8, 3, None)?;
//! let child = parent.create_writable_child(2, 3, 4, 4, 0, 0, None)?;
//! child.set_pixel(1, 1, &[7, 8, 9])?;
//! assert_eq!(parent.pixel(3, 4)?, vec![7, 8, 9]);
//! # Ok::<(), pixfmt_core::Error>(())
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use pixfmt_core::{DataBuffer, DataElements, DataType, Error, Rect, Result, SharedDataBuffer};
use tracing::trace;

use crate::sample_model::{SampleLayout, SampleModel};

// ============================================================================
// Raster
// ============================================================================

struct RasterInner {
    sample_model: SampleModel,
    buffer: SharedDataBuffer,
    bounds: Rect,
    translate_x: i32,
    translate_y: i32,
    parent: Option<Weak<RasterInner>>,
}

/// A read-only rectangular view of pixel samples.
///
/// Cloning is cheap and aliases the same view.
#[derive(Clone)]
pub struct Raster {
    inner: Arc<RasterInner>,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("bounds", &self.inner.bounds)
            .field("translate", &(self.inner.translate_x, self.inner.translate_y))
            .field("sample_model", &self.inner.sample_model)
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

impl Raster {
    /// Wraps `buffer` with `sample_model`, placing the model's origin at `origin`.
    ///
    /// # Errors
    ///
    /// Fails if the buffer kind differs from the model's, the buffer is too
    /// small for the model, or `origin + size` overflows.
    pub fn new(sample_model: SampleModel, buffer: SharedDataBuffer, origin: (i32, i32)) -> Result<Self> {
        let bounds = Rect::new(origin.0, origin.1, sample_model.width(), sample_model.height());
        Self::build(sample_model, buffer, bounds, origin, None)
    }

    fn build(
        sample_model: SampleModel,
        buffer: SharedDataBuffer,
        bounds: Rect,
        translate: (i32, i32),
        parent: Option<&Raster>,
    ) -> Result<Self> {
        if bounds.width <= 0 || bounds.height <= 0 {
            return Err(Error::raster_format("negative or zero width or height"));
        }
        if bounds.right() > i32::MAX as i64 {
            return Err(Error::raster_format("overflow condition for X coordinates of raster"));
        }
        if bounds.bottom() > i32::MAX as i64 {
            return Err(Error::raster_format("overflow condition for Y coordinates of raster"));
        }
        {
            let buf = buffer.read();
            if buf.data_type() != sample_model.data_type() {
                return Err(Error::type_mismatch(sample_model.data_type(), buf.data_type()));
            }
            if buf.size() < sample_model.required_size() || buf.num_banks() < sample_model.required_banks() {
                return Err(Error::raster_format(format!(
                    "data buffer too small: {} bank(s) of {} element(s), need {} of {}",
                    buf.num_banks(),
                    buf.size(),
                    sample_model.required_banks(),
                    sample_model.required_size()
                )));
            }
        }
        Ok(Self {
            inner: Arc::new(RasterInner {
                sample_model,
                buffer,
                bounds,
                translate_x: translate.0,
                translate_y: translate.1,
                parent: parent.map(|p| Arc::downgrade(&p.inner)),
            }),
        })
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    /// Left edge.
    pub fn min_x(&self) -> i32 {
        self.inner.bounds.x
    }

    /// Top edge.
    pub fn min_y(&self) -> i32 {
        self.inner.bounds.y
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.inner.bounds.width
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.inner.bounds.height
    }

    /// Bounding rectangle in raster coordinates.
    pub fn bounds(&self) -> Rect {
        self.inner.bounds
    }

    /// Number of bands.
    pub fn num_bands(&self) -> usize {
        self.inner.sample_model.num_bands()
    }

    /// Transfer elements per pixel.
    pub fn num_data_elements(&self) -> usize {
        self.inner.sample_model.num_data_elements()
    }

    /// Element kind of per-pixel transfer arrays.
    pub fn transfer_type(&self) -> DataType {
        self.inner.sample_model.transfer_type()
    }

    /// The sample model, in its own zero-based space.
    pub fn sample_model(&self) -> &SampleModel {
        &self.inner.sample_model
    }

    /// The shared storage handle.
    pub fn data_buffer(&self) -> &SharedDataBuffer {
        &self.inner.buffer
    }

    /// Offset from raster to sample model coordinates.
    pub fn sample_model_translate(&self) -> (i32, i32) {
        (self.inner.translate_x, self.inner.translate_y)
    }

    /// The raster this one was carved from, if it is still alive.
    pub fn parent(&self) -> Option<Raster> {
        let weak = self.inner.parent.as_ref()?;
        weak.upgrade().map(|inner| Raster { inner })
    }

    /// True if both handles are the same view.
    pub fn ptr_eq(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------------
    // Coordinate mapping
    // ------------------------------------------------------------------------

    fn local(&self, x: i32, y: i32) -> Result<(i32, i32)> {
        if !self.inner.bounds.contains(x, y) {
            return Err(Error::out_of_bounds(x, y, self.width(), self.height()));
        }
        Ok((x.wrapping_sub(self.inner.translate_x), y.wrapping_sub(self.inner.translate_y)))
    }

    fn local_region(&self, x: i32, y: i32, w: i32, h: i32) -> Result<(i32, i32)> {
        let region = Rect::new(x, y, w, h);
        if w < 0 || h < 0 || (!region.is_empty() && !self.inner.bounds.contains_rect(&region)) {
            return Err(Error::out_of_bounds(x, y, self.width(), self.height()));
        }
        Ok((x.wrapping_sub(self.inner.translate_x), y.wrapping_sub(self.inner.translate_y)))
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    /// Sample of `band` at `(x, y)`.
    pub fn sample(&self, x: i32, y: i32, band: usize) -> Result<i32> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.sample(lx, ly, band, &self.inner.buffer.read())
    }

    /// Sample as `f32`.
    pub fn sample_f32(&self, x: i32, y: i32, band: usize) -> Result<f32> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.sample_f32(lx, ly, band, &self.inner.buffer.read())
    }

    /// Sample as `f64`.
    pub fn sample_f64(&self, x: i32, y: i32, band: usize) -> Result<f64> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.sample_f64(lx, ly, band, &self.inner.buffer.read())
    }

    /// All samples of pixel `(x, y)`.
    pub fn pixel(&self, x: i32, y: i32) -> Result<Vec<i32>> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.pixel(lx, ly, &self.inner.buffer.read())
    }

    /// Pixel samples as `f32`.
    pub fn pixel_f32(&self, x: i32, y: i32) -> Result<Vec<f32>> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.pixel_f32(lx, ly, &self.inner.buffer.read())
    }

    /// Pixel samples as `f64`.
    pub fn pixel_f64(&self, x: i32, y: i32) -> Result<Vec<f64>> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.pixel_f64(lx, ly, &self.inner.buffer.read())
    }

    /// Samples of a region, pixel-interleaved.
    pub fn pixels(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Vec<i32>> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.inner.sample_model.pixels(lx, ly, w, h, &self.inner.buffer.read())
    }

    /// Region samples as `f64`.
    pub fn pixels_f64(&self, x: i32, y: i32, w: i32, h: i32) -> Result<Vec<f64>> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.inner.sample_model.pixels_f64(lx, ly, w, h, &self.inner.buffer.read())
    }

    /// One band of a region.
    pub fn samples(&self, x: i32, y: i32, w: i32, h: i32, band: usize) -> Result<Vec<i32>> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.inner.sample_model.samples(lx, ly, w, h, band, &self.inner.buffer.read())
    }

    /// One band of a region as `f64`.
    pub fn samples_f64(&self, x: i32, y: i32, w: i32, h: i32, band: usize) -> Result<Vec<f64>> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.inner.sample_model.samples_f64(lx, ly, w, h, band, &self.inner.buffer.read())
    }

    /// Transfer elements of pixel `(x, y)`.
    pub fn data_elements(&self, x: i32, y: i32, reuse: Option<DataElements>) -> Result<DataElements> {
        let (lx, ly) = self.local(x, y)?;
        self.inner.sample_model.data_elements(lx, ly, reuse, &self.inner.buffer.read())
    }

    /// Transfer elements of a region, pixels in row-major order.
    pub fn data_elements_rect(
        &self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        reuse: Option<DataElements>,
    ) -> Result<DataElements> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.inner
            .sample_model
            .data_elements_rect(lx, ly, w, h, reuse, &self.inner.buffer.read())
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    fn child_parts(
        &self,
        parent_x: i32,
        parent_y: i32,
        width: i32,
        height: i32,
        child_min_x: i32,
        child_min_y: i32,
        bands: Option<&[usize]>,
    ) -> Result<(SampleModel, Rect, (i32, i32))> {
        let b = self.inner.bounds;
        if parent_x < b.x {
            return Err(Error::raster_format("parent_x lies outside raster"));
        }
        if parent_y < b.y {
            return Err(Error::raster_format("parent_y lies outside raster"));
        }
        if parent_x as i64 + width as i64 > b.right() || (width as i64) < 0 {
            return Err(Error::raster_format("(parent_x + width) is outside raster"));
        }
        if parent_y as i64 + height as i64 > b.bottom() || (height as i64) < 0 {
            return Err(Error::raster_format("(parent_y + height) is outside raster"));
        }

        let sample_model = match bands {
            Some(bands) => self.inner.sample_model.create_subset(bands)?,
            None => self.inner.sample_model.clone(),
        };

        let tx = self.inner.translate_x as i64 + (child_min_x as i64 - parent_x as i64);
        let ty = self.inner.translate_y as i64 + (child_min_y as i64 - parent_y as i64);
        let (Ok(tx), Ok(ty)) = (i32::try_from(tx), i32::try_from(ty)) else {
            return Err(Error::raster_format("child translation overflows"));
        };
        Ok((sample_model, Rect::new(child_min_x, child_min_y, width, height), (tx, ty)))
    }

    /// A read-only view of the `width x height` region at
    /// `(parent_x, parent_y)`, re-positioned at `(child_min_x, child_min_y)`,
    /// optionally restricted to `bands`.
    ///
    /// The child shares storage with `self`; no samples are copied.
    #[allow(clippy::too_many_arguments)]
    pub fn create_child(
        &self,
        parent_x: i32,
        parent_y: i32,
        width: i32,
        height: i32,
        child_min_x: i32,
        child_min_y: i32,
        bands: Option<&[usize]>,
    ) -> Result<Raster> {
        let (sm, bounds, translate) =
            self.child_parts(parent_x, parent_y, width, height, child_min_x, child_min_y, bands)?;
        Self::build(sm, self.inner.buffer.clone(), bounds, translate, Some(self))
    }

    /// The same region moved so its origin is `(child_min_x, child_min_y)`.
    pub fn create_translated_child(&self, child_min_x: i32, child_min_y: i32) -> Result<Raster> {
        self.create_child(
            self.min_x(),
            self.min_y(),
            self.width(),
            self.height(),
            child_min_x,
            child_min_y,
            None,
        )
    }

    /// A new, zeroed raster of the same layout with its origin at (0, 0).
    pub fn create_compatible_writable(&self, width: i32, height: i32) -> Result<WritableRaster> {
        let sm = self.inner.sample_model.create_compatible(width, height)?;
        let buffer = SharedDataBuffer::new(sm.create_data_buffer());
        WritableRaster::new(sm, buffer, (0, 0))
    }

    /// A new, zeroed raster of the same layout covering `bounds`.
    pub fn create_compatible_writable_at(&self, bounds: Rect) -> Result<WritableRaster> {
        let sm = self.inner.sample_model.create_compatible(bounds.width, bounds.height)?;
        let buffer = SharedDataBuffer::new(sm.create_data_buffer());
        WritableRaster::new(sm, buffer, (bounds.x, bounds.y))
    }

    // ------------------------------------------------------------------------
    // Copies
    // ------------------------------------------------------------------------

    /// A deep copy of this raster's samples, with the same bounds and its
    /// own storage.
    pub fn data(&self) -> Result<WritableRaster> {
        let copy = self.create_compatible_writable_at(self.bounds())?;
        self.copy_into(&copy)?;
        Ok(copy)
    }

    /// Copies the samples where `self` and `dst` overlap into `dst`.
    ///
    /// Both rasters must exchange the same transfer arrays.
    pub fn copy_into(&self, dst: &WritableRaster) -> Result<()> {
        if self.transfer_type() != dst.transfer_type() || self.num_data_elements() != dst.num_data_elements() {
            return Err(Error::incompatible(format!(
                "cannot copy {} x{} pixels into {} x{} pixels",
                self.transfer_type(),
                self.num_data_elements(),
                dst.transfer_type(),
                dst.num_data_elements()
            )));
        }
        let Some(area) = self.bounds().intersect(&dst.bounds()) else {
            return Ok(());
        };
        trace!(x = area.x, y = area.y, width = area.width, height = area.height, "raster::copy_into");
        let mut row = None;
        for y in area.y..area.y + area.height {
            let elems = self.data_elements_rect(area.x, y, area.width, 1, row.take())?;
            dst.set_data_elements_rect(area.x, y, area.width, 1, &elems)?;
            row = Some(elems);
        }
        Ok(())
    }
}

// ============================================================================
// WritableRaster
// ============================================================================

/// A raster that also allows writes.
///
/// Dereferences to [`Raster`] for all read operations.
#[derive(Clone)]
pub struct WritableRaster {
    raster: Raster,
}

impl fmt::Debug for WritableRaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WritableRaster").field(&self.raster).finish()
    }
}

impl Deref for WritableRaster {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.raster
    }
}

impl From<WritableRaster> for Raster {
    fn from(w: WritableRaster) -> Raster {
        w.raster
    }
}

impl WritableRaster {
    /// Writable counterpart of [`Raster::new`].
    pub fn new(sample_model: SampleModel, buffer: SharedDataBuffer, origin: (i32, i32)) -> Result<Self> {
        Raster::new(sample_model, buffer, origin).map(|raster| Self { raster })
    }

    fn with_buffer<T>(&self, f: impl FnOnce(&SampleModel, &mut DataBuffer) -> Result<T>) -> Result<T> {
        let mut buf = self.raster.inner.buffer.write();
        f(&self.raster.inner.sample_model, &mut buf)
    }

    /// The read-only view of this raster.
    pub fn as_raster(&self) -> &Raster {
        &self.raster
    }

    /// The writable parent, if this raster is a child and the parent is alive.
    pub fn writable_parent(&self) -> Option<WritableRaster> {
        self.raster.parent().map(|raster| Self { raster })
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    /// Sets the sample of `band` at `(x, y)`.
    pub fn set_sample(&self, x: i32, y: i32, band: usize, value: i32) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_sample(lx, ly, band, value, buf))
    }

    /// Sets a sample from `f32`.
    pub fn set_sample_f32(&self, x: i32, y: i32, band: usize, value: f32) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_sample_f32(lx, ly, band, value, buf))
    }

    /// Sets a sample from `f64`.
    pub fn set_sample_f64(&self, x: i32, y: i32, band: usize, value: f64) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_sample_f64(lx, ly, band, value, buf))
    }

    /// Sets all samples of pixel `(x, y)`.
    pub fn set_pixel(&self, x: i32, y: i32, values: &[i32]) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_pixel(lx, ly, values, buf))
    }

    /// Sets pixel samples from `f32`.
    pub fn set_pixel_f32(&self, x: i32, y: i32, values: &[f32]) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_pixel_f32(lx, ly, values, buf))
    }

    /// Sets pixel samples from `f64`.
    pub fn set_pixel_f64(&self, x: i32, y: i32, values: &[f64]) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_pixel_f64(lx, ly, values, buf))
    }

    /// Writes a region of pixel-interleaved samples.
    pub fn set_pixels(&self, x: i32, y: i32, w: i32, h: i32, values: &[i32]) -> Result<()> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.with_buffer(|sm, buf| sm.set_pixels(lx, ly, w, h, values, buf))
    }

    /// Writes a region of pixel-interleaved `f64` samples.
    pub fn set_pixels_f64(&self, x: i32, y: i32, w: i32, h: i32, values: &[f64]) -> Result<()> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.with_buffer(|sm, buf| sm.set_pixels_f64(lx, ly, w, h, values, buf))
    }

    /// Writes one band of a region.
    pub fn set_samples(&self, x: i32, y: i32, w: i32, h: i32, band: usize, values: &[i32]) -> Result<()> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.with_buffer(|sm, buf| sm.set_samples(lx, ly, w, h, band, values, buf))
    }

    /// Writes one band of a region from `f64`.
    pub fn set_samples_f64(&self, x: i32, y: i32, w: i32, h: i32, band: usize, values: &[f64]) -> Result<()> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.with_buffer(|sm, buf| sm.set_samples_f64(lx, ly, w, h, band, values, buf))
    }

    /// Stores transfer elements at pixel `(x, y)`.
    pub fn set_data_elements(&self, x: i32, y: i32, data: &DataElements) -> Result<()> {
        let (lx, ly) = self.local(x, y)?;
        self.with_buffer(|sm, buf| sm.set_data_elements(lx, ly, data, buf))
    }

    /// Stores transfer elements for a region.
    pub fn set_data_elements_rect(&self, x: i32, y: i32, w: i32, h: i32, data: &DataElements) -> Result<()> {
        let (lx, ly) = self.local_region(x, y, w, h)?;
        self.with_buffer(|sm, buf| sm.set_data_elements_rect(lx, ly, w, h, data, buf))
    }

    /// Copies all of `src` as transfer arrays, placing `src`'s origin at
    /// `(x + src.min_x, y + src.min_y)`.
    ///
    /// The whole source must fit inside this raster.
    pub fn set_data_elements_from(&self, x: i32, y: i32, src: &Raster) -> Result<()> {
        let dst_x = x as i64 + src.min_x() as i64;
        let dst_y = y as i64 + src.min_y() as i64;
        let b = self.bounds();
        if dst_x < b.x as i64
            || dst_y < b.y as i64
            || dst_x + src.width() as i64 > b.right()
            || dst_y + src.height() as i64 > b.bottom()
        {
            return Err(Error::out_of_bounds(
                dst_x.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
                dst_y.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
                self.width(),
                self.height(),
            ));
        }
        let (dst_x, dst_y) = (dst_x as i32, dst_y as i32);
        let mut row = None;
        for dy in 0..src.height() {
            let elems = src.data_elements_rect(src.min_x(), src.min_y() + dy, src.width(), 1, row.take())?;
            self.set_data_elements_rect(dst_x, dst_y + dy, src.width(), 1, &elems)?;
            row = Some(elems);
        }
        Ok(())
    }

    /// Copies the samples of `src`, offset by `(dx, dy)`, clipped to this
    /// raster. Integer samples are copied as integers and floating-point
    /// samples as `f64`.
    pub fn set_rect(&self, dx: i32, dy: i32, src: &Raster) -> Result<()> {
        let mut width = src.width() as i64;
        let mut height = src.height() as i64;
        let mut src_x = src.min_x() as i64;
        let mut src_y = src.min_y() as i64;
        let mut dst_x = dx as i64 + src_x;
        let mut dst_y = dy as i64 + src_y;
        let b = self.bounds();

        if dst_x < b.x as i64 {
            let skip = b.x as i64 - dst_x;
            width -= skip;
            src_x += skip;
            dst_x = b.x as i64;
        }
        if dst_y < b.y as i64 {
            let skip = b.y as i64 - dst_y;
            height -= skip;
            src_y += skip;
            dst_y = b.y as i64;
        }
        width = width.min(b.right() - dst_x);
        height = height.min(b.bottom() - dst_y);
        if width <= 0 || height <= 0 {
            return Ok(());
        }
        let (w, h) = (width as i32, height as i32);
        let (src_x, src_y, dst_x, dst_y) = (src_x as i32, src_y as i32, dst_x as i32, dst_y as i32);
        trace!(dst_x, dst_y, width = w, height = h, "raster::set_rect");

        let floating = src.sample_model().data_type().is_floating_point();
        for row in 0..h {
            if floating {
                let values = src.pixels_f64(src_x, src_y + row, w, 1)?;
                self.set_pixels_f64(dst_x, dst_y + row, w, 1, &values)?;
            } else {
                let values = src.pixels(src_x, src_y + row, w, 1)?;
                self.set_pixels(dst_x, dst_y + row, w, 1, &values)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Writable views
    // ------------------------------------------------------------------------

    /// Writable counterpart of [`Raster::create_child`].
    #[allow(clippy::too_many_arguments)]
    pub fn create_writable_child(
        &self,
        parent_x: i32,
        parent_y: i32,
        width: i32,
        height: i32,
        child_min_x: i32,
        child_min_y: i32,
        bands: Option<&[usize]>,
    ) -> Result<WritableRaster> {
        let (sm, bounds, translate) =
            self.child_parts(parent_x, parent_y, width, height, child_min_x, child_min_y, bands)?;
        Raster::build(sm, self.inner.buffer.clone(), bounds, translate, Some(&self.raster))
            .map(|raster| Self { raster })
    }

    /// Writable counterpart of [`Raster::create_translated_child`].
    pub fn create_writable_translated_child(&self, child_min_x: i32, child_min_y: i32) -> Result<WritableRaster> {
        self.create_writable_child(
            self.min_x(),
            self.min_y(),
            self.width(),
            self.height(),
            child_min_x,
            child_min_y,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory;
    use crate::sample_model::SinglePixelPackedSampleModel;

    #[test]
    fn test_translated_access() {
        let r = factory::interleaved(DataType::Byte, 4, 4, 1, Some((10, 20))).unwrap();
        r.set_sample(10, 20, 0, 5).unwrap();
        assert_eq!(r.data_buffer().read().elem(0, 0), 5);
        assert!(r.sample(0, 0, 0).unwrap_err().is_bounds_error());
        assert!(r.sample(14, 20, 0).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_child_aliasing() {
        let parent = factory::interleaved(DataType::Byte, 10, 10, 3, None).unwrap();
        let child = parent.create_writable_child(4, 5, 3, 3, 0, 0, None).unwrap();
        child.set_pixel(2, 1, &[1, 2, 3]).unwrap();
        assert_eq!(parent.pixel(6, 6).unwrap(), vec![1, 2, 3]);
        assert!(child.parent().unwrap().ptr_eq(&parent));
        assert!(child.data_buffer().ptr_eq(parent.data_buffer()));
        // child bounds are enforced even though the storage continues
        assert!(child.pixel(3, 0).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_child_of_translated_parent() {
        let parent = factory::interleaved(DataType::Byte, 8, 8, 1, Some((100, 100))).unwrap();
        let child = parent.create_writable_child(102, 103, 2, 2, -5, -5, None).unwrap();
        assert_eq!(child.sample_model_translate(), (-7, -8));
        child.set_sample(-4, -4, 0, 9).unwrap();
        assert_eq!(parent.sample(103, 104, 0).unwrap(), 9);
    }

    #[test]
    fn test_band_subset_child() {
        let parent = factory::interleaved(DataType::Byte, 2, 2, 4, None).unwrap();
        parent.set_pixel(1, 1, &[1, 2, 3, 4]).unwrap();
        let alpha = parent.create_child(0, 0, 2, 2, 0, 0, Some(&[3][..])).unwrap();
        assert_eq!(alpha.num_bands(), 1);
        assert_eq!(alpha.sample(1, 1, 0).unwrap(), 4);
    }

    #[test]
    fn test_child_bounds_errors() {
        let parent = factory::interleaved(DataType::Byte, 4, 4, 1, None).unwrap();
        let msg = |r: Result<Raster>| r.unwrap_err().to_string();
        assert!(msg(parent.create_child(-1, 0, 2, 2, 0, 0, None)).contains("parent_x lies outside"));
        assert!(msg(parent.create_child(0, -1, 2, 2, 0, 0, None)).contains("parent_y lies outside"));
        assert!(msg(parent.create_child(3, 0, 2, 2, 0, 0, None)).contains("(parent_x + width)"));
        assert!(msg(parent.create_child(0, 3, 2, 2, 0, 0, None)).contains("(parent_y + height)"));
        assert!(msg(parent.create_child(0, 0, 0, 2, 0, 0, None)).contains("zero width"));
        assert!(parent.create_child(0, 0, 2, 2, i32::MAX, 0, None).is_err());
    }

    #[test]
    fn test_parent_link_does_not_own() {
        let parent = factory::interleaved(DataType::Byte, 4, 4, 1, None).unwrap();
        let child = parent.create_writable_translated_child(1, 1).unwrap();
        drop(parent);
        assert!(child.parent().is_none());
        child.set_sample(1, 1, 0, 3).unwrap();
        assert_eq!(child.sample(1, 1, 0).unwrap(), 3);
    }

    #[test]
    fn test_data_is_deep() {
        let r = factory::interleaved(DataType::UShort, 3, 2, 2, Some((1, 1))).unwrap();
        r.set_pixel(2, 2, &[300, 400]).unwrap();
        let copy = r.data().unwrap();
        assert_eq!(copy.bounds(), r.bounds());
        assert_eq!(copy.pixel(2, 2).unwrap(), vec![300, 400]);
        assert!(!copy.data_buffer().ptr_eq(r.data_buffer()));
        copy.set_pixel(2, 2, &[0, 0]).unwrap();
        assert_eq!(r.pixel(2, 2).unwrap(), vec![300, 400]);
    }

    #[test]
    fn test_set_rect_clips() {
        let dst = factory::interleaved(DataType::Byte, 4, 4, 1, None).unwrap();
        let src = factory::interleaved(DataType::Byte, 3, 3, 1, None).unwrap();
        src.set_samples(0, 0, 3, 3, 0, &[1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        dst.set_rect(2, -1, &src).unwrap();
        assert_eq!(dst.samples(2, 0, 2, 2, 0).unwrap(), vec![4, 5, 7, 8]);
        assert_eq!(dst.sample(1, 0, 0).unwrap(), 0);
    }

    #[test]
    fn test_set_rect_through_aliased_views() {
        let r = factory::interleaved(DataType::Byte, 4, 1, 1, None).unwrap();
        r.set_samples(0, 0, 4, 1, 0, &[1, 2, 3, 4]).unwrap();
        let left = r.create_child(0, 0, 2, 1, 0, 0, None).unwrap();
        r.set_rect(2, 0, &left).unwrap();
        assert_eq!(r.samples(0, 0, 4, 1, 0).unwrap(), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_set_data_elements_from() {
        let dst = factory::packed(DataType::Int, 4, 4, &[0xff0000, 0xff00, 0xff], None).unwrap();
        let src = factory::packed(DataType::Int, 2, 2, &[0xff0000, 0xff00, 0xff], Some((1, 1))).unwrap();
        src.set_pixel(2, 2, &[1, 2, 3]).unwrap();
        dst.set_data_elements_from(1, 1, &src).unwrap();
        assert_eq!(dst.pixel(3, 3).unwrap(), vec![1, 2, 3]);
        assert!(dst.set_data_elements_from(2, 2, &src).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_buffer_checks() {
        let sm = SampleModel::SinglePixelPacked(
            SinglePixelPackedSampleModel::new(DataType::Int, 4, 4, &[0xff]).unwrap(),
        );
        let small = SharedDataBuffer::new(DataBuffer::new(DataType::Int, 15, 1));
        assert!(matches!(Raster::new(sm.clone(), small, (0, 0)), Err(Error::RasterFormat(_))));
        let wrong = SharedDataBuffer::new(DataBuffer::new(DataType::Byte, 16, 1));
        assert!(matches!(Raster::new(sm.clone(), wrong, (0, 0)), Err(Error::DataTypeMismatch { .. })));
        let ok = SharedDataBuffer::new(DataBuffer::new(DataType::Int, 16, 1));
        assert!(Raster::new(sm.clone(), ok.clone(), (i32::MAX - 4, 0)).is_ok());
        assert!(Raster::new(sm, ok, (i32::MAX - 3, 0)).is_err());
    }

    #[test]
    fn test_copy_into_requires_same_transfer() {
        let a = factory::interleaved(DataType::Byte, 2, 2, 1, None).unwrap();
        let b = factory::interleaved(DataType::UShort, 2, 2, 1, None).unwrap();
        assert!(matches!(a.copy_into(&b), Err(Error::Incompatible(_))));
    }
}
