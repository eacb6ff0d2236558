//! Lab channel planes: splitting bitmaps into L/a/b and rendering them back.
//!
//! [`extract_channels`] reads an 8-bit RGB bitmap pixel by pixel, converts
//! each pixel to Lab, and appends the components to three parallel planes
//! in row-major order. [`render_from_channels`] is the inverse: it converts
//! each Lab triple back to RGB, stages the result as a float RGBA bitmap,
//! and renders that into an 8-bit RGBA bitmap. Clamping to 0-255 happens
//! only in that last render.

use crate::transform::{ColorTransform, LabToRgb, RgbToLab};
use crate::{IccError, IccResult, Intent, ProfileSource};
use chroma_core::{Bitmap, BitmapContext, ColorSpaceKind, Lab, Rgb, SampleType};
use tracing::debug;

/// Three index-aligned planes of L, a and b values.
///
/// All planes always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChannelPlanes {
    l: Vec<f32>,
    a: Vec<f32>,
    b: Vec<f32>,
}

impl ChannelPlanes {
    /// Wraps three planes.
    ///
    /// # Errors
    ///
    /// [`IccError::ChannelLengthMismatch`] if the lengths differ.
    pub fn new(l: Vec<f32>, a: Vec<f32>, b: Vec<f32>) -> IccResult<Self> {
        check_lengths(&l, &a, &b, l.len())?;
        Ok(Self { l, a, b })
    }

    /// Creates empty planes with room for `len` pixels.
    pub fn with_capacity(len: usize) -> Self {
        Self {
            l: Vec::with_capacity(len),
            a: Vec::with_capacity(len),
            b: Vec::with_capacity(len),
        }
    }

    /// Appends one pixel.
    #[inline]
    pub fn push(&mut self, lab: Lab) {
        self.l.push(lab.l);
        self.a.push(lab.a);
        self.b.push(lab.b);
    }

    /// Number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.l.len()
    }

    /// Returns `true` if there are no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.l.is_empty()
    }

    /// Lightness plane.
    #[inline]
    pub fn l(&self) -> &[f32] {
        &self.l
    }

    /// Green-red plane.
    #[inline]
    pub fn a(&self) -> &[f32] {
        &self.a
    }

    /// Blue-yellow plane.
    #[inline]
    pub fn b(&self) -> &[f32] {
        &self.b
    }

    /// Lab triple of pixel `index`.
    #[inline]
    pub fn lab(&self, index: usize) -> Lab {
        Lab::new(self.l[index], self.a[index], self.b[index])
    }

    /// Splits into `(l, a, b)`.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
        (self.l, self.a, self.b)
    }

    /// Lightness of `luma` combined with the chrominance of `chroma`.
    ///
    /// # Errors
    ///
    /// [`IccError::ChannelLengthMismatch`] if the two differ in length.
    pub fn recombine(luma: ChannelPlanes, chroma: ChannelPlanes) -> IccResult<Self> {
        Self::new(luma.l, chroma.a, chroma.b)
    }

    /// Renders the planes as a `width x height` 8-bit RGBA bitmap.
    pub fn render<S: ProfileSource + ?Sized>(
        &self,
        size: (u32, u32),
        source: &S,
        intent: Intent,
    ) -> IccResult<Bitmap> {
        render_from_channels(&self.l, &self.a, &self.b, size, source, intent)
    }
}

/// Splits an 8-bit RGB bitmap into Lab planes.
///
/// Each pixel occupies `pixel_bits / 8` bytes; its first three bytes are
/// read as 0-255 RGB. Row padding is skipped.
///
/// # Errors
///
/// - [`IccError::UnsupportedFormat`] unless the bitmap is 8-bit RGB
/// - [`IccError::NoPixelData`] if the bitmap has no bytes
/// - Any error from building the RGB to Lab transform
pub fn extract_channels<S: ProfileSource + ?Sized>(
    bitmap: &Bitmap,
    source: &S,
    intent: Intent,
) -> IccResult<ChannelPlanes> {
    let format = bitmap.format();
    if format.color_space != ColorSpaceKind::Rgb || format.sample_type() != Some(SampleType::U8) {
        return Err(IccError::UnsupportedFormat(format!(
            "channel extraction needs 8-bit RGB, got {format}"
        )));
    }
    if bitmap.data().is_empty() {
        return Err(IccError::NoPixelData);
    }

    let transform = ColorTransform::<RgbToLab>::build(source, intent)?;
    let step = format.bytes_per_pixel();
    let mut planes = ChannelPlanes::with_capacity(bitmap.pixel_count());
    let mut unit = Vec::with_capacity(bitmap.width() as usize);
    let mut lab = vec![[0.0f32; 3]; bitmap.width() as usize];

    for y in 0..bitmap.height() {
        unit.clear();
        unit.extend(
            bitmap
                .row(y)
                .chunks_exact(step)
                .map(|px| Rgb::from_bytes([px[0], px[1], px[2]]).to_unit()),
        );
        transform.apply_slice(&unit, &mut lab);
        for v in &lab {
            planes.push(Lab::from_array(*v));
        }
    }

    debug!(width = bitmap.width(), height = bitmap.height(), "extracted Lab planes");
    Ok(planes)
}

/// Renders L, a, b planes into a `width x height` 8-bit RGBA bitmap.
///
/// Every Lab triple is converted to RGB, normalized to 0-1 and written with
/// alpha 1.0 into a float RGBA bitmap, which is then drawn into an 8-bit
/// context.
///
/// # Errors
///
/// - [`IccError::ChannelLengthMismatch`] unless all planes hold exactly
///   `width * height` values
/// - Any error from building the Lab to RGB transform
pub fn render_from_channels<S: ProfileSource + ?Sized>(
    l: &[f32],
    a: &[f32],
    b: &[f32],
    size: (u32, u32),
    source: &S,
    intent: Intent,
) -> IccResult<Bitmap> {
    let (width, height) = size;
    let count = width as usize * height as usize;
    check_lengths(l, a, b, count)?;

    let transform = ColorTransform::<LabToRgb>::build(source, intent)?;
    let mut samples = Vec::with_capacity(count * 4);
    for i in 0..count {
        let [red, green, blue] = transform.convert(Lab::new(l[i], a[i], b[i])).to_unit();
        samples.extend_from_slice(&[red, green, blue, 1.0]);
    }

    let staged = Bitmap::from_rgba_f32(width, height, &samples)?;
    let mut ctx = BitmapContext::build(None, width, height, 8, None, ColorSpaceKind::Rgb)?;
    ctx.draw(&staged, false)?;
    let out = ctx.into_bitmap()?;

    debug!(width, height, "rendered Lab planes");
    Ok(out)
}

fn check_lengths(l: &[f32], a: &[f32], b: &[f32], expected: usize) -> IccResult<()> {
    if l.len() != expected || a.len() != expected || b.len() != expected {
        return Err(IccError::ChannelLengthMismatch {
            l: l.len(),
            a: a.len(),
            b: b.len(),
            expected,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileSet;
    use approx::assert_abs_diff_eq;
    use chroma_core::PixelFormatSpec;

    fn profiles() -> ProfileSet {
        ProfileSet::builtin().unwrap()
    }

    fn checker(width: u32, height: u32) -> Bitmap {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let px = if (x + y) % 2 == 0 { [200, 40, 40, 255] } else { [30, 90, 220, 255] };
                data.extend_from_slice(&px);
            }
        }
        Bitmap::from_rgba8(width, height, data).unwrap()
    }

    #[test]
    fn test_plane_lengths() {
        let bmp = checker(7, 5);
        let planes = extract_channels(&bmp, &profiles(), Intent::Perceptual).unwrap();
        assert_eq!(planes.len(), 35);
        assert_eq!(planes.a().len(), 35);
        assert_eq!(planes.b().len(), 35);

        let out = planes.render((7, 5), &profiles(), Intent::Perceptual).unwrap();
        assert_eq!(out.dimensions(), (7, 5));
        assert_eq!(out.format(), &PixelFormatSpec::rgba8().with_bytes_per_row(28));
    }

    #[test]
    fn test_roundtrip_preserves_pixels() {
        let bmp = checker(4, 4);
        let set = profiles();
        let out = extract_channels(&bmp, &set, Intent::Perceptual)
            .unwrap()
            .render((4, 4), &set, Intent::Perceptual)
            .unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let (src, dst) = (bmp.pixel_bytes(x, y), out.pixel_bytes(x, y));
                for c in 0..3 {
                    assert!((src[c] as i32 - dst[c] as i32).abs() <= 2, "{src:?} vs {dst:?}");
                }
                assert_eq!(dst[3], 255);
            }
        }
    }

    #[test]
    fn test_traversal_order() {
        let bmp = checker(3, 2);
        let planes = extract_channels(&bmp, &profiles(), Intent::Perceptual).unwrap();
        // pixel 0 is reddish (a > 0), pixel 1 bluish (b < 0)
        assert!(planes.lab(0).a > 20.0);
        assert!(planes.lab(1).b < -20.0);
        assert_abs_diff_eq!(planes.l()[0], planes.l()[2], epsilon = 1e-4);
    }

    #[test]
    fn test_padded_rows_skipped() {
        let format = PixelFormatSpec::rgba8().with_bytes_per_row(12);
        let mut data = vec![255u8; 24];
        data[0..8].copy_from_slice(&[0, 0, 0, 255, 0, 0, 0, 255]);
        data[12..20].copy_from_slice(&[0, 0, 0, 255, 0, 0, 0, 255]);
        let bmp = Bitmap::from_raw(2, 2, format, data).unwrap();
        let planes = extract_channels(&bmp, &profiles(), Intent::Perceptual).unwrap();
        assert_eq!(planes.len(), 4);
        assert!(planes.l().iter().all(|&l| l < 1.0));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let set = profiles();
        let l = vec![50.0; 16];
        let a = vec![0.0; 15];
        let b = vec![0.0; 16];
        let err = render_from_channels(&l, &a, &b, (4, 4), &set, Intent::Perceptual).unwrap_err();
        assert!(matches!(err, IccError::ChannelLengthMismatch { a: 15, expected: 16, .. }));

        let err = render_from_channels(&l, &l, &l, (5, 4), &set, Intent::Perceptual).unwrap_err();
        assert!(matches!(err, IccError::ChannelLengthMismatch { expected: 20, .. }));

        assert!(ChannelPlanes::new(l, a, b).is_err());
    }

    #[test]
    fn test_out_of_range_lab_clamps_at_quantization() {
        let l = vec![150.0, -20.0];
        let a = vec![0.0, 0.0];
        let b = vec![0.0, 0.0];
        let out = render_from_channels(&l, &a, &b, (2, 1), &profiles(), Intent::Perceptual).unwrap();
        assert_eq!(out.pixel_bytes(0, 0), &[255, 255, 255, 255]);
        assert_eq!(out.pixel_bytes(1, 0), &[0, 0, 0, 255]);
    }

    #[test]
    fn test_recombine() {
        let luma = ChannelPlanes::new(vec![10.0, 20.0], vec![1.0, 1.0], vec![2.0, 2.0]).unwrap();
        let chroma = ChannelPlanes::new(vec![90.0, 90.0], vec![5.0, 6.0], vec![7.0, 8.0]).unwrap();
        let mixed = ChannelPlanes::recombine(luma, chroma).unwrap();
        assert_eq!(mixed.lab(1), Lab::new(20.0, 6.0, 8.0));

        let short = ChannelPlanes::new(vec![1.0], vec![1.0], vec![1.0]).unwrap();
        assert!(ChannelPlanes::recombine(short, mixed).is_err());
    }

    #[test]
    fn test_rejects_non_rgb8() {
        let deep = Bitmap::from_rgba_f32(1, 1, &[0.5, 0.5, 0.5, 1.0]).unwrap();
        let err = extract_channels(&deep, &profiles(), Intent::Perceptual).unwrap_err();
        assert!(matches!(err, IccError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_profile_fails_cleanly() {
        let bmp = checker(2, 2);
        let empty = ProfileSet::new();
        assert!(extract_channels(&bmp, &empty, Intent::Perceptual).unwrap_err().is_missing_profile());
        let planes = extract_channels(&bmp, &profiles(), Intent::Perceptual).unwrap();
        assert!(planes.render((2, 2), &empty, Intent::Perceptual).unwrap_err().is_missing_profile());
    }
}
