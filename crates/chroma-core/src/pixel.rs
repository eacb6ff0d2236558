//! Color triples and sample encoding.
//!
//! Two triples cross the color-transform boundary:
//!
//! - [`Rgb`] - device RGB on a **0-255** scale, as read from 8-bit pixel bytes
//! - [`Lab`] - CIE L\*a\*b\* at native scale (L 0-100, a/b roughly -128..127)
//!
//! Lab values coming out of a prediction model are unclamped and may exceed
//! the nominal ranges. Nothing in this module clamps them; clamping happens
//! once, when samples are quantized into integer storage.

use crate::format::SampleType;

/// Rec.709 luminance coefficient for red channel.
pub const REC709_LUMA_R: f32 = 0.2126;

/// Rec.709 luminance coefficient for green channel.
pub const REC709_LUMA_G: f32 = 0.7152;

/// Rec.709 luminance coefficient for blue channel.
pub const REC709_LUMA_B: f32 = 0.0722;

/// Calculate Rec.709 luminance from normalized RGB values.
///
/// `Y = 0.2126*R + 0.7152*G + 0.0722*B`
///
/// # Example
/// ```
/// use chroma_core::pixel::luminance_rec709;
/// let luma = luminance_rec709([0.5, 0.3, 0.2]);
/// assert!((luma - 0.3353).abs() < 0.0001);
/// ```
#[inline]
pub fn luminance_rec709(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_LUMA_R + rgb[1] * REC709_LUMA_G + rgb[2] * REC709_LUMA_B
}

/// Device RGB triple on a 0-255 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    /// Red, 0-255.
    pub r: f32,
    /// Green, 0-255.
    pub g: f32,
    /// Blue, 0-255.
    pub b: f32,
}

impl Rgb {
    /// Creates a triple from 0-255 components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a triple from raw pixel bytes.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0] as f32, bytes[1] as f32, bytes[2] as f32)
    }

    /// Components rescaled to 0-1.
    #[inline]
    pub fn to_unit(self) -> [f32; 3] {
        [self.r / 255.0, self.g / 255.0, self.b / 255.0]
    }

    /// Builds a triple from 0-1 components.
    #[inline]
    pub fn from_unit(unit: [f32; 3]) -> Self {
        Self::new(unit[0] * 255.0, unit[1] * 255.0, unit[2] * 255.0)
    }
}

/// CIE L\*a\*b\* triple at native scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, nominally 0-100.
    pub l: f32,
    /// Green-red axis.
    pub a: f32,
    /// Blue-yellow axis.
    pub b: f32,
}

impl Lab {
    /// Creates a Lab triple.
    #[inline]
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Components as an array.
    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        [self.l, self.a, self.b]
    }

    /// Builds a triple from `[l, a, b]`.
    #[inline]
    pub const fn from_array(lab: [f32; 3]) -> Self {
        Self::new(lab[0], lab[1], lab[2])
    }

    /// Euclidean distance to another triple (CIE76 delta E).
    #[inline]
    pub fn delta_e(self, other: Lab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        (dl * dl + da * da + db * db).sqrt()
    }
}

/// Reads one sample at the start of `bytes` as a normalized value.
///
/// Integer samples map to 0-1; float samples are returned unchanged.
#[inline]
pub fn read_sample(sample: SampleType, bytes: &[u8]) -> f32 {
    match sample {
        SampleType::U8 => bytes[0] as f32 / 255.0,
        SampleType::U16 => u16::from_ne_bytes([bytes[0], bytes[1]]) as f32 / 65535.0,
        SampleType::F32 => f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    }
}

/// Writes one normalized value at the start of `bytes`.
///
/// Integer targets are clamped to 0-1 and rounded; float targets keep the
/// value as is.
#[inline]
pub fn write_sample(sample: SampleType, value: f32, bytes: &mut [u8]) {
    match sample {
        SampleType::U8 => bytes[0] = quantize(value, 255.0) as u8,
        SampleType::U16 => {
            let v = quantize(value, 65535.0) as u16;
            bytes[..2].copy_from_slice(&v.to_ne_bytes());
        }
        SampleType::F32 => bytes[..4].copy_from_slice(&value.to_ne_bytes()),
    }
}

#[inline]
fn quantize(value: f32, max: f32) -> f32 {
    // NaN clamps to 0
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
    (v * max).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgb_scale() {
        let rgb = Rgb::from_bytes([255, 128, 0]);
        let unit = rgb.to_unit();
        assert_relative_eq!(unit[0], 1.0);
        assert_relative_eq!(unit[1], 128.0 / 255.0);
        assert_relative_eq!(Rgb::from_unit(unit).g, 128.0, epsilon = 1e-4);
    }

    #[test]
    fn test_lab_delta_e() {
        let a = Lab::new(50.0, 0.0, 0.0);
        let b = Lab::new(53.0, 4.0, 0.0);
        assert_relative_eq!(a.delta_e(b), 5.0);
        assert_eq!(Lab::from_array(a.to_array()), a);
    }

    #[test]
    fn test_sample_u8_clamps() {
        let mut buf = [0u8; 1];
        write_sample(SampleType::U8, 1.7, &mut buf);
        assert_eq!(buf[0], 255);
        write_sample(SampleType::U8, -3.0, &mut buf);
        assert_eq!(buf[0], 0);
        write_sample(SampleType::U8, f32::NAN, &mut buf);
        assert_eq!(buf[0], 0);
        write_sample(SampleType::U8, 0.5, &mut buf);
        assert_eq!(buf[0], 128);
    }

    #[test]
    fn test_sample_u16_and_f32() {
        let mut buf = [0u8; 4];
        write_sample(SampleType::U16, 1.0, &mut buf);
        assert_relative_eq!(read_sample(SampleType::U16, &buf), 1.0);

        // floats pass through unclamped
        write_sample(SampleType::F32, 1.25, &mut buf);
        assert_relative_eq!(read_sample(SampleType::F32, &buf), 1.25);
    }
}
