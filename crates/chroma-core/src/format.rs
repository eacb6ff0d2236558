//! Pixel format descriptors.
//!
//! This module provides the value types that describe a raster's memory
//! layout:
//!
//! - [`ColorSpaceKind`] - Which color model the samples encode (Gray, RGB, CMYK)
//! - [`ComponentDepth`] - Bits per component presets
//! - [`PixelFormatSpec`] - Complete layout: color model, component and pixel
//!   bit depths, optional row stride
//!
//! Every layout carries one alpha channel after the color channels, so an
//! RGB format at 8 bits per component is 32 bits per pixel.
//!
//! # Usage
//!
//! ```rust
//! use chroma_core::format::{ColorSpaceKind, ComponentDepth, PixelFormatSpec};
//!
//! assert_eq!(ComponentDepth::TrueColor.bits(), 8);
//!
//! let spec = PixelFormatSpec::rgba8();
//! assert_eq!(spec.pixel_bits, 32);
//! assert_eq!(spec.bytes_per_row_for(256), 1024);
//! assert_eq!(spec.color_space, ColorSpaceKind::Rgb);
//! ```

use crate::{Error, Result};
use std::fmt;

/// Color model of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpaceKind {
    /// Single luminance channel.
    Gray,
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Cyan, magenta, yellow, key.
    Cmyk,
}

impl ColorSpaceKind {
    /// Number of color channels, alpha excluded.
    #[inline]
    pub const fn channels(&self) -> u32 {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Cmyk => 4,
        }
    }

    /// Number of channels including the alpha channel.
    #[inline]
    pub const fn channels_with_alpha(&self) -> u32 {
        self.channels() + 1
    }

    /// Short lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Rgb => "rgb",
            Self::Cmyk => "cmyk",
        }
    }
}

impl fmt::Display for ColorSpaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bits-per-component presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentDepth {
    /// 1-bit bitmap.
    Bitmap,
    /// 2-bit indexed color.
    IndexedColor2,
    /// 4-bit indexed color.
    IndexedColor4,
    /// 8-bit true color.
    TrueColor,
    /// 16-bit deep color.
    DeepColor,
    /// 32-bit floating point.
    FloatingPointColor,
    /// Arbitrary bit count.
    Custom(u32),
}

impl ComponentDepth {
    /// Number of bits per component.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Bitmap => 1,
            Self::IndexedColor2 => 2,
            Self::IndexedColor4 => 4,
            Self::TrueColor => 8,
            Self::DeepColor => 16,
            Self::FloatingPointColor => 32,
            Self::Custom(n) => *n,
        }
    }

    /// Maps a bit count back to its preset, or `Custom` when none matches.
    pub const fn from_bits(bits: u32) -> Self {
        match bits {
            1 => Self::Bitmap,
            2 => Self::IndexedColor2,
            4 => Self::IndexedColor4,
            8 => Self::TrueColor,
            16 => Self::DeepColor,
            32 => Self::FloatingPointColor,
            n => Self::Custom(n),
        }
    }
}

impl From<ComponentDepth> for u32 {
    fn from(depth: ComponentDepth) -> Self {
        depth.bits()
    }
}

/// In-memory sample encoding for the depths a bitmap context can back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    /// Unsigned normalized 8-bit.
    U8,
    /// Unsigned normalized 16-bit, native endian.
    U16,
    /// IEEE 754 single precision, native endian.
    F32,
}

impl SampleType {
    /// Bytes occupied by one sample.
    #[inline]
    pub const fn bytes(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }

    /// Sample encoding for a component depth, if addressable.
    pub const fn from_component_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::U8),
            16 => Some(Self::U16),
            32 => Some(Self::F32),
            _ => None,
        }
    }
}

/// Complete description of a raster's pixel layout.
///
/// Immutable value; create one per conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormatSpec {
    /// Color model.
    pub color_space: ColorSpaceKind,
    /// Bits per component.
    pub component_bits: u32,
    /// Bits per pixel, alpha included.
    pub pixel_bits: u32,
    /// Row stride in bytes; `None` means tightly packed.
    pub bytes_per_row: Option<usize>,
}

impl PixelFormatSpec {
    /// Creates a format with one alpha channel and a packed stride.
    pub const fn new(color_space: ColorSpaceKind, depth: ComponentDepth) -> Self {
        let component_bits = depth.bits();
        Self {
            color_space,
            component_bits,
            pixel_bits: component_bits * color_space.channels_with_alpha(),
            bytes_per_row: None,
        }
    }

    /// Creates a format from explicit bit counts.
    ///
    /// The layout is validated; see [`validate`](Self::validate).
    pub fn from_bits(
        color_space: ColorSpaceKind,
        component_bits: u32,
        pixel_bits: u32,
        bytes_per_row: Option<usize>,
    ) -> Result<Self> {
        let spec = Self {
            color_space,
            component_bits,
            pixel_bits,
            bytes_per_row,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Canonical layout: RGB + alpha, 8 bits per component, 32 bits per pixel.
    pub const fn rgba8() -> Self {
        Self::new(ColorSpaceKind::Rgb, ComponentDepth::TrueColor)
    }

    /// RGB + alpha as 32-bit floats, 128 bits per pixel.
    pub const fn rgba_f32() -> Self {
        Self::new(ColorSpaceKind::Rgb, ComponentDepth::FloatingPointColor)
    }

    /// Returns a copy with an explicit row stride.
    pub const fn with_bytes_per_row(mut self, bytes_per_row: usize) -> Self {
        self.bytes_per_row = Some(bytes_per_row);
        self
    }

    /// Checks that the pixel depth is consistent with the component depth
    /// and the channel count (color channels plus alpha).
    pub fn validate(&self) -> Result<()> {
        if self.component_bits == 0 || self.pixel_bits % self.component_bits != 0 {
            return Err(Error::unsupported_format(format!(
                "{} bits per pixel is not a multiple of {} bits per component",
                self.pixel_bits, self.component_bits
            )));
        }
        let expected = self.component_bits * self.color_space.channels_with_alpha();
        if self.pixel_bits != expected {
            return Err(Error::unsupported_format(format!(
                "{} with {} bits per component needs {} bits per pixel, got {}",
                self.color_space, self.component_bits, expected, self.pixel_bits
            )));
        }
        Ok(())
    }

    /// Number of channels per pixel, alpha included.
    #[inline]
    pub const fn channels(&self) -> usize {
        self.color_space.channels_with_alpha() as usize
    }

    /// Bytes per pixel, rounded up for sub-byte layouts.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        (self.pixel_bits as usize).div_ceil(8)
    }

    /// Smallest row stride able to hold `width` pixels.
    #[inline]
    pub const fn min_bytes_per_row(&self, width: u32) -> usize {
        (width as usize * self.pixel_bits as usize).div_ceil(8)
    }

    /// Row stride for `width` pixels: the explicit stride or the packed default.
    #[inline]
    pub fn bytes_per_row_for(&self, width: u32) -> usize {
        self.bytes_per_row.unwrap_or_else(|| self.min_bytes_per_row(width))
    }

    /// Sample encoding, if the component depth is byte addressable.
    #[inline]
    pub const fn sample_type(&self) -> Option<SampleType> {
        SampleType::from_component_bits(self.component_bits)
    }
}

impl Default for PixelFormatSpec {
    fn default() -> Self {
        Self::rgba8()
    }
}

impl fmt::Display for PixelFormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}a {}bpc/{}bpp",
            self.color_space, self.component_bits, self.pixel_bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_presets() {
        assert_eq!(ComponentDepth::Bitmap.bits(), 1);
        assert_eq!(ComponentDepth::IndexedColor2.bits(), 2);
        assert_eq!(ComponentDepth::IndexedColor4.bits(), 4);
        assert_eq!(ComponentDepth::TrueColor.bits(), 8);
        assert_eq!(ComponentDepth::DeepColor.bits(), 16);
        assert_eq!(ComponentDepth::FloatingPointColor.bits(), 32);
        assert_eq!(ComponentDepth::Custom(10).bits(), 10);
        assert_eq!(ComponentDepth::from_bits(16), ComponentDepth::DeepColor);
        assert_eq!(ComponentDepth::from_bits(12), ComponentDepth::Custom(12));
    }

    #[test]
    fn test_channels() {
        assert_eq!(ColorSpaceKind::Gray.channels(), 1);
        assert_eq!(ColorSpaceKind::Rgb.channels(), 3);
        assert_eq!(ColorSpaceKind::Cmyk.channels(), 4);
        assert_eq!(ColorSpaceKind::Rgb.channels_with_alpha(), 4);
    }

    #[test]
    fn test_canonical() {
        let spec = PixelFormatSpec::rgba8();
        assert_eq!(spec.component_bits, 8);
        assert_eq!(spec.pixel_bits, 32);
        assert_eq!(spec.bytes_per_pixel(), 4);
        assert_eq!(spec.sample_type(), Some(SampleType::U8));
        assert!(spec.validate().is_ok());

        let float = PixelFormatSpec::rgba_f32();
        assert_eq!(float.pixel_bits, 128);
        assert_eq!(float.bytes_per_row_for(10), 160);
    }

    #[test]
    fn test_validate_rejects_inconsistent_depths() {
        assert!(PixelFormatSpec::from_bits(ColorSpaceKind::Rgb, 8, 24, None).is_err());
        assert!(PixelFormatSpec::from_bits(ColorSpaceKind::Rgb, 8, 30, None).is_err());
        assert!(PixelFormatSpec::from_bits(ColorSpaceKind::Gray, 8, 16, None).is_ok());
        assert!(PixelFormatSpec::from_bits(ColorSpaceKind::Cmyk, 16, 80, None).is_ok());
    }

    #[test]
    fn test_stride() {
        let spec = PixelFormatSpec::rgba8();
        assert_eq!(spec.min_bytes_per_row(3), 12);
        assert_eq!(spec.with_bytes_per_row(16).bytes_per_row_for(3), 16);

        let bitmap = PixelFormatSpec::new(ColorSpaceKind::Gray, ComponentDepth::Bitmap);
        assert_eq!(bitmap.pixel_bits, 2);
        assert_eq!(bitmap.min_bytes_per_row(5), 2);
        assert_eq!(bitmap.sample_type(), None);
    }
}
