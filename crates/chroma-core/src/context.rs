//! Bitmap contexts: addressable pixel memory used as a render target.
//!
//! A [`BitmapContext`] pairs a byte region with a [`PixelFormatSpec`]. The
//! memory is either allocated (zero-initialized) and owned by the context,
//! or borrowed from the caller for the context's lifetime `'a`.
//!
//! Supported layouts are Gray or RGB with one alpha channel at 8, 16, or
//! 32 (float) bits per component. Anything else is an incompatible
//! combination and building fails with [`Error::UnsupportedFormat`].
//!
//! # Usage
//!
//! ```rust
//! use chroma_core::{Bitmap, BitmapContext, ColorSpaceKind};
//!
//! let src = Bitmap::filled_rgba8(8, 8, [200, 100, 50, 255]);
//!
//! let mut ctx = BitmapContext::build(None, 8, 8, 16, None, ColorSpaceKind::Rgb).unwrap();
//! ctx.draw(&src, true).unwrap();
//! let deep = ctx.into_bitmap().unwrap();
//! assert_eq!(deep.format().pixel_bits, 64);
//! ```

use crate::bitmap::{layout, required_len};
use crate::format::{ColorSpaceKind, ComponentDepth, PixelFormatSpec, SampleType};
use crate::pixel::{luminance_rec709, write_sample};
use crate::{Bitmap, Error, Result};
use tracing::trace;

/// Backing memory of a context.
enum PixelMemory<'a> {
    /// Allocated by the context.
    Owned(Vec<u8>),
    /// Supplied by the caller.
    Borrowed(&'a mut [u8]),
}

impl PixelMemory<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(s) => s,
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Owned(v) => v,
            Self::Borrowed(s) => s,
        }
    }
}

/// Drawable raster target.
pub struct BitmapContext<'a> {
    memory: PixelMemory<'a>,
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormatSpec,
    sample: SampleType,
}

impl<'a> BitmapContext<'a> {
    /// Builds a context from individual layout parameters.
    ///
    /// Pixel depth is derived as `bits_per_component * (channels + 1)`.
    /// When `bytes_per_row` is `None` it defaults to
    /// `width * bits_per_pixel / 8`.
    ///
    /// # Arguments
    ///
    /// * `memory` - Caller-owned pixel memory, or `None` to allocate
    /// * `width`, `height` - Raster size, both > 0
    /// * `bits_per_component` - 8, 16 or 32
    /// * `bytes_per_row` - Optional row stride
    /// * `kind` - Gray or RGB
    pub fn build(
        memory: Option<&'a mut [u8]>,
        width: u32,
        height: u32,
        bits_per_component: u32,
        bytes_per_row: Option<usize>,
        kind: ColorSpaceKind,
    ) -> Result<Self> {
        let mut format = PixelFormatSpec::new(kind, ComponentDepth::from_bits(bits_per_component));
        format.bytes_per_row = bytes_per_row;
        Self::with_format(memory, width, height, format)
    }

    /// Builds a context for a complete [`PixelFormatSpec`].
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] for zero width or height
    /// - [`Error::UnsupportedFormat`] for CMYK, sub-byte or custom depths,
    ///   or a pixel depth inconsistent with the channel count
    /// - [`Error::InvalidStride`] if `bytes_per_row` cannot hold a row
    /// - [`Error::AllocationFailed`] if supplied memory is too short or
    ///   allocation fails
    pub fn with_format(
        memory: Option<&'a mut [u8]>,
        width: u32,
        height: u32,
        format: PixelFormatSpec,
    ) -> Result<Self> {
        if format.color_space == ColorSpaceKind::Cmyk {
            return Err(Error::unsupported_format(format!(
                "{format}: bitmap contexts cannot render CMYK with alpha"
            )));
        }
        let (stride, sample) = layout(width, height, &format)?;
        let required = required_len(stride, height)?;

        let memory = match memory {
            Some(buf) => {
                if buf.len() < required {
                    return Err(Error::allocation_failed(
                        required,
                        format!("supplied memory holds only {} bytes", buf.len()),
                    ));
                }
                PixelMemory::Borrowed(buf)
            }
            None => {
                let mut buf = Vec::new();
                buf.try_reserve_exact(required)
                    .map_err(|e| Error::allocation_failed(required, e.to_string()))?;
                buf.resize(required, 0);
                PixelMemory::Owned(buf)
            }
        };

        trace!(width, height, stride, %format, "bitmap context");
        Ok(Self {
            memory,
            width,
            height,
            stride,
            format: format.with_bytes_per_row(stride),
            sample,
        })
    }

    /// Returns the context width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the context height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the stride (bytes per row).
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel layout, with the resolved stride.
    #[inline]
    pub fn format(&self) -> &PixelFormatSpec {
        &self.format
    }

    /// Returns `true` if the context allocated its own memory.
    #[inline]
    pub fn owns_memory(&self) -> bool {
        matches!(self.memory, PixelMemory::Owned(_))
    }

    /// Returns the backing bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.memory.bytes()
    }

    /// Draws `src` into the whole context.
    ///
    /// Samples are converted to the context's depth and color model
    /// (RGB to Gray uses Rec.709 luma). With `opaque`, the source is
    /// composited over black and alpha is written as 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if `src` has a different size.
    pub fn draw(&mut self, src: &Bitmap, opaque: bool) -> Result<()> {
        if src.dimensions() != (self.width, self.height) {
            return Err(Error::dimension_mismatch(
                src.dimensions(),
                (self.width, self.height),
            ));
        }
        let bpp = self.format.bytes_per_pixel();
        let step = self.sample.bytes();
        let row_bytes = self.format.min_bytes_per_row(self.width);
        let (stride, sample, kind) = (self.stride, self.sample, self.format.color_space);
        let data = self.memory.bytes_mut();

        for y in 0..self.height {
            let start = y as usize * stride;
            let row = &mut data[start..start + row_bytes];
            for (x, px) in row.chunks_exact_mut(bpp).enumerate() {
                let [mut r, mut g, mut b, mut a] = src.pixel_rgba(x as u32, y);
                if opaque {
                    r *= a;
                    g *= a;
                    b *= a;
                    a = 1.0;
                }
                match kind {
                    ColorSpaceKind::Gray => {
                        write_sample(sample, luminance_rec709([r, g, b]), px);
                        write_sample(sample, a, &mut px[step..]);
                    }
                    _ => {
                        for (i, v) in [r, g, b, a].into_iter().enumerate() {
                            write_sample(sample, v, &mut px[i * step..]);
                        }
                    }
                }
            }
        }
        trace!(width = self.width, height = self.height, opaque, "draw");
        Ok(())
    }

    /// Materializes a new bitmap from the current drawing state.
    ///
    /// The pixel bytes are copied; the context stays usable.
    pub fn make_bitmap(&self) -> Result<Bitmap> {
        let len = required_len(self.stride, self.height)?;
        Bitmap::from_raw(
            self.width,
            self.height,
            self.format,
            self.memory.bytes()[..len].to_vec(),
        )
    }

    /// Consumes the context and materializes its contents.
    ///
    /// Owned memory moves into the bitmap without copying; borrowed memory
    /// is copied and released back to the caller.
    pub fn into_bitmap(self) -> Result<Bitmap> {
        match self.memory {
            PixelMemory::Owned(buf) => Bitmap::from_raw(self.width, self.height, self.format, buf),
            PixelMemory::Borrowed(_) => self.make_bitmap(),
        }
    }
}

impl std::fmt::Debug for BitmapContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitmapContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("owned", &self.owns_memory())
            .finish()
    }
}
