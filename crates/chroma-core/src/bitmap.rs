//! Materialized raster images.
//!
//! A [`Bitmap`] is the immutable result of drawing into a
//! [`BitmapContext`](crate::BitmapContext), or raw pixel data handed in by a
//! caller. It is the "image handle" passed between pipeline stages.
//!
//! # Memory Layout
//!
//! Pixels are stored **row-major**, top-to-bottom, with alpha interleaved
//! after the color channels. Rows may carry trailing padding; `stride` is
//! the distance in bytes between row starts:
//!
//! ```text
//! Memory: [R G B A R G B A ... pad]  ← Row 0
//!         [R G B A R G B A ... pad]  ← Row 1
//! ```
//!
//! Alpha is straight (not premultiplied).
//!
//! # Usage
//!
//! ```rust
//! use chroma_core::Bitmap;
//!
//! let gray = Bitmap::filled_rgba8(64, 64, [128, 128, 128, 255]);
//! assert_eq!(gray.pixel_bytes(10, 10), &[128, 128, 128, 255]);
//!
//! let px = gray.pixel_rgba(0, 0);
//! assert!((px[0] - 128.0 / 255.0).abs() < 1e-6);
//! ```

use crate::format::{ColorSpaceKind, PixelFormatSpec, SampleType};
use crate::pixel::read_sample;
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Immutable raster with an explicit pixel format.
///
/// The byte buffer is held in an [`Arc`], so clones share memory.
#[derive(Clone)]
pub struct Bitmap {
    /// Pixel bytes (Arc for cheap cloning)
    data: Arc<Vec<u8>>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Bytes per row (may include padding)
    stride: usize,
    /// Pixel layout
    format: PixelFormatSpec,
    /// Cached sample encoding of `format`
    sample: SampleType,
}

impl Bitmap {
    /// Wraps raw pixel bytes.
    ///
    /// The row stride comes from `format.bytes_per_row`, or the packed
    /// default. `data` must hold at least `stride * height` bytes.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for zero width or height
    /// - [`Error::UnsupportedFormat`] for inconsistent or sub-byte layouts
    /// - [`Error::InvalidStride`] if the stride cannot hold a row
    /// - [`Error::AllocationFailed`] if `data` is too short
    pub fn from_raw(width: u32, height: u32, format: PixelFormatSpec, data: Vec<u8>) -> Result<Self> {
        let (stride, sample) = layout(width, height, &format)?;
        let required = required_len(stride, height)?;
        if data.len() < required {
            return Err(Error::allocation_failed(
                required,
                format!("pixel data holds only {} bytes", data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            stride,
            format,
            sample,
        })
    }

    /// Wraps tightly packed 8-bit RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_raw(width, height, PixelFormatSpec::rgba8(), data)
    }

    /// Creates an 8-bit RGBA bitmap filled with one pixel value.
    ///
    /// # Panics
    ///
    /// Panics if width or height is zero.
    pub fn filled_rgba8(width: u32, height: u32, pixel: [u8; 4]) -> Self {
        assert!(width > 0 && height > 0, "bitmap must have non-zero area");
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * 4);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
            stride: width as usize * 4,
            format: PixelFormatSpec::rgba8(),
            sample: SampleType::U8,
        }
    }

    /// Wraps interleaved RGBA floats as a 32-bit-per-component bitmap.
    ///
    /// `samples` must hold exactly `width * height * 4` values.
    pub fn from_rgba_f32(width: u32, height: u32, samples: &[f32]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if samples.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, samples.len()),
            ));
        }
        let mut data = Vec::with_capacity(expected * 4);
        for v in samples {
            data.extend_from_slice(&v.to_ne_bytes());
        }
        Self::from_raw(width, height, PixelFormatSpec::rgba_f32(), data)
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the pixel layout.
    #[inline]
    pub fn format(&self) -> &PixelFormatSpec {
        &self.format
    }

    /// Returns the stride (bytes per row).
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns the raw pixel bytes, row padding included.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.stride;
        &self.data[start..start + self.format.min_bytes_per_row(self.width)]
    }

    /// Returns the bytes of pixel (x, y).
    #[inline]
    pub fn pixel_bytes(&self, x: u32, y: u32) -> &[u8] {
        debug_assert!(x < self.width, "pixel out of bounds");
        let bpp = self.format.bytes_per_pixel();
        let start = x as usize * bpp;
        &self.row(y)[start..start + bpp]
    }

    /// Decodes pixel (x, y) to straight RGBA.
    ///
    /// Integer samples are normalized to 0-1. Gray is replicated into all
    /// three color channels; CMYK uses the naive `(1-c)(1-k)` inversion.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> [f32; 4] {
        decode_pixel(self.sample, self.format.color_space, self.pixel_bytes(x, y))
    }

    /// Decodes the whole image to interleaved straight RGBA, packed rows.
    pub fn to_rgba_f32(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.pixel_count() * 4);
        let bpp = self.format.bytes_per_pixel();
        for y in 0..self.height {
            for px in self.row(y).chunks_exact(bpp) {
                out.extend_from_slice(&decode_pixel(self.sample, self.format.color_space, px));
            }
        }
        out
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Validates `format` for a `width x height` raster and returns its
/// stride and sample encoding.
pub(crate) fn layout(width: u32, height: u32, format: &PixelFormatSpec) -> Result<(usize, SampleType)> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "width and height must be > 0"));
    }
    format.validate()?;
    let sample = format.sample_type().ok_or_else(|| {
        Error::unsupported_format(format!(
            "{} bits per component is not byte addressable",
            format.component_bits
        ))
    })?;
    let min_stride = format.min_bytes_per_row(width);
    let stride = format.bytes_per_row_for(width);
    if stride < min_stride {
        return Err(Error::InvalidStride {
            stride,
            min_stride,
            width,
        });
    }
    Ok((stride, sample))
}

pub(crate) fn required_len(stride: usize, height: u32) -> Result<usize> {
    stride
        .checked_mul(height as usize)
        .ok_or_else(|| Error::allocation_failed(usize::MAX, "buffer size overflows usize"))
}

fn decode_pixel(sample: SampleType, kind: ColorSpaceKind, px: &[u8]) -> [f32; 4] {
    let step = sample.bytes();
    let ch = |i: usize| read_sample(sample, &px[i * step..]);
    match kind {
        ColorSpaceKind::Gray => {
            let g = ch(0);
            [g, g, g, ch(1)]
        }
        ColorSpaceKind::Rgb => [ch(0), ch(1), ch(2), ch(3)],
        ColorSpaceKind::Cmyk => {
            let k = 1.0 - ch(3);
            [(1.0 - ch(0)) * k, (1.0 - ch(1)) * k, (1.0 - ch(2)) * k, ch(4)]
        }
    }
}
