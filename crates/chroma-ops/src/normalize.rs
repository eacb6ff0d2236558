//! Bitmap normalization: resize and re-render into a canonical layout.
//!
//! [`normalize`] scales a source bitmap to an exact target size and draws
//! it into a freshly allocated RGB [`BitmapContext`] with the requested
//! bit depths. The context contents become a new [`Bitmap`].
//!
//! A source that already has the target size is drawn without
//! resampling, so normalizing a normalized bitmap with the same
//! parameters reproduces it byte for byte.
//!
//! # Example
//!
//! ```rust
//! use chroma_core::Bitmap;
//! use chroma_ops::normalize::{normalize_canonical, NormalizeOptions};
//!
//! let src = Bitmap::filled_rgba8(64, 64, [128, 128, 128, 255]);
//! let out = normalize_canonical(&src, (256, 256), &NormalizeOptions::default()).unwrap();
//! assert_eq!(out.dimensions(), (256, 256));
//! assert_eq!(out.format().pixel_bits, 32);
//! ```

use crate::resize::{resize_f32, Filter};
use crate::{OpsError, OpsResult};
use chroma_core::{Bitmap, BitmapContext, ColorSpaceKind, PixelFormatSpec};
use tracing::debug;

/// Canonical bits per component.
pub const CANONICAL_COMPONENT_BITS: u32 = 8;

/// Canonical bits per pixel (RGB + alpha at 8 bits).
pub const CANONICAL_PIXEL_BITS: u32 = 32;

/// Rendering options for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Resampling filter used when the size changes.
    pub filter: Filter,
    /// Composite over black and write alpha as 1.
    pub opaque: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            filter: Filter::Lanczos3,
            opaque: true,
        }
    }
}

/// Resizes `image` to `target` and renders it into an RGB bitmap with the
/// given layout.
///
/// # Arguments
///
/// * `image` - Source bitmap, any supported format
/// * `target` - Exact output (width, height)
/// * `component_bits` - Bits per component of the output (8, 16, 32)
/// * `pixel_bits` - Bits per pixel; must be `component_bits * 4`
/// * `bytes_per_row` - Optional output stride
/// * `options` - Filter and opacity
///
/// # Errors
///
/// - [`OpsError::InvalidDimensions`] for a zero target
/// - [`OpsError::Core`] if the layout is inconsistent or the context
///   cannot be built
pub fn normalize(
    image: &Bitmap,
    target: (u32, u32),
    component_bits: u32,
    pixel_bits: u32,
    bytes_per_row: Option<usize>,
    options: &NormalizeOptions,
) -> OpsResult<Bitmap> {
    let (width, height) = target;
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "normalize target {}x{} has no area",
            width, height
        )));
    }
    let format =
        PixelFormatSpec::from_bits(ColorSpaceKind::Rgb, component_bits, pixel_bits, bytes_per_row)?;

    let resized = resample(image, width, height, options.filter)?;
    let mut ctx = BitmapContext::with_format(None, width, height, format)?;
    ctx.draw(&resized, options.opaque)?;
    let out = ctx.into_bitmap()?;

    debug!(
        src_w = image.width(),
        src_h = image.height(),
        width,
        height,
        %format,
        "normalized bitmap"
    );
    Ok(out)
}

/// [`normalize`] into the canonical 8-bit RGBA layout with packed rows.
pub fn normalize_canonical(
    image: &Bitmap,
    target: (u32, u32),
    options: &NormalizeOptions,
) -> OpsResult<Bitmap> {
    normalize(
        image,
        target,
        CANONICAL_COMPONENT_BITS,
        CANONICAL_PIXEL_BITS,
        None,
        options,
    )
}

/// Scales `image` to exactly `width x height`.
fn resample(image: &Bitmap, width: u32, height: u32, filter: Filter) -> OpsResult<Bitmap> {
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    let samples = resize_f32(
        &image.to_rgba_f32(),
        image.width() as usize,
        image.height() as usize,
        4,
        width as usize,
        height as usize,
        filter,
    )?;
    Ok(Bitmap::from_rgba_f32(width, height, &samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Bitmap {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 7 % 256) as u8, (y * 13 % 256) as u8, 90, 255]);
            }
        }
        Bitmap::from_rgba8(width, height, data).unwrap()
    }

    #[test]
    fn test_exact_target_size() {
        let out = normalize_canonical(&gradient(64, 40), (256, 256), &NormalizeOptions::default())
            .unwrap();
        assert_eq!(out.dimensions(), (256, 256));
        assert_eq!(out.stride(), 1024);
        assert_eq!(out.data().len(), 256 * 256 * 4);
    }

    #[test]
    fn test_idempotent() {
        let opts = NormalizeOptions::default();
        let once = normalize_canonical(&gradient(33, 17), (50, 20), &opts).unwrap();
        let twice = normalize_canonical(&once, (50, 20), &opts).unwrap();
        assert_eq!(once.data(), twice.data());
    }

    #[test]
    fn test_same_size_is_lossless() {
        let src = gradient(16, 16);
        let out = normalize_canonical(&src, (16, 16), &NormalizeOptions::default()).unwrap();
        assert_eq!(src.data(), out.data());
    }

    #[test]
    fn test_solid_color_survives_resize() {
        let src = Bitmap::filled_rgba8(64, 64, [128, 128, 128, 255]);
        let out = normalize_canonical(&src, (256, 256), &NormalizeOptions::default()).unwrap();
        for y in [0, 100, 255] {
            for x in [0, 17, 255] {
                assert_eq!(out.pixel_bytes(x, y), &[128, 128, 128, 255]);
            }
        }
    }

    #[test]
    fn test_deep_and_padded_output() {
        let src = gradient(8, 8);
        let deep = normalize(&src, (4, 4), 16, 64, None, &NormalizeOptions::default()).unwrap();
        assert_eq!(deep.format().component_bits, 16);
        assert_eq!(deep.stride(), 32);

        let padded = normalize(&src, (4, 4), 8, 32, Some(20), &NormalizeOptions::default()).unwrap();
        assert_eq!(padded.stride(), 20);
    }

    #[test]
    fn test_translucent_source() {
        let src = Bitmap::filled_rgba8(4, 4, [200, 100, 50, 0]);
        let keep = NormalizeOptions {
            opaque: false,
            ..NormalizeOptions::default()
        };
        let out = normalize_canonical(&src, (4, 4), &keep).unwrap();
        assert_eq!(out.pixel_bytes(0, 0), &[200, 100, 50, 0]);

        let flat = normalize_canonical(&src, (4, 4), &NormalizeOptions::default()).unwrap();
        assert_eq!(flat.pixel_bytes(0, 0), &[0, 0, 0, 255]);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let src = gradient(4, 4);
        let opts = NormalizeOptions::default();
        assert!(matches!(
            normalize_canonical(&src, (0, 4), &opts),
            Err(OpsError::InvalidDimensions(_))
        ));
        assert!(matches!(
            normalize(&src, (4, 4), 8, 24, None, &opts),
            Err(OpsError::Core(_))
        ));
        assert!(normalize(&src, (4, 4), 8, 32, Some(3), &opts).is_err());
    }
}
