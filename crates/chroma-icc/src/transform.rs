//! Directional RGB/Lab transforms between ICC profiles.
//!
//! The direction is part of the type: a [`ColorTransform<RgbToLab>`] only
//! converts [`Rgb`] to [`Lab`], a [`ColorTransform<LabToRgb>`] only the
//! reverse. Each transform is built from two profiles fetched from a
//! [`ProfileSource`], which are closed again before `build` returns.
//!
//! Transforms are never cached. Every call site builds its own and drops
//! it when done, so concurrent pipelines share no transform state.
//!
//! # Example
//!
//! ```rust
//! use chroma_core::Rgb;
//! use chroma_icc::{ColorTransform, Intent, LabToRgb, ProfileSet, RgbToLab};
//!
//! let profiles = ProfileSet::builtin().unwrap();
//! let forward = ColorTransform::<RgbToLab>::build(&profiles, Intent::Perceptual).unwrap();
//! let inverse = ColorTransform::<LabToRgb>::build(&profiles, Intent::Perceptual).unwrap();
//!
//! let lab = forward.convert(Rgb::new(128.0, 128.0, 128.0));
//! assert!(lab.a.abs() < 0.5 && lab.b.abs() < 0.5);
//!
//! let back = inverse.convert(lab);
//! assert!((back.r - 128.0).abs() <= 2.0);
//! ```

use crate::source::{DEVICE_RGB, LAB_REFERENCE};
use crate::{IccError, IccResult, Intent, Profile, ProfileSource};
use chroma_core::{Lab, Rgb};
use lcms2::{ColorSpaceSignature, PixelFormat, Transform as LcmsTransform};
use std::marker::PhantomData;
use tracing::trace;

mod sealed {
    pub trait Sealed {}
}

/// Compile-time transform direction.
pub trait Direction: sealed::Sealed {
    /// Human readable direction.
    const NAME: &'static str;
    /// Resource name of the source profile.
    const SOURCE_PROFILE: &'static str;
    /// Resource name of the destination profile.
    const DEST_PROFILE: &'static str;
    /// Required color space of the source profile.
    const SOURCE_SPACE: ColorSpaceSignature;
    /// Required color space of the destination profile.
    const DEST_SPACE: ColorSpaceSignature;
    /// lcms2 input layout.
    const INPUT: PixelFormat;
    /// lcms2 output layout.
    const OUTPUT: PixelFormat;
}

/// Device RGB to Lab.
#[derive(Debug, Clone, Copy)]
pub enum RgbToLab {}

/// Lab to device RGB.
#[derive(Debug, Clone, Copy)]
pub enum LabToRgb {}

impl sealed::Sealed for RgbToLab {}
impl sealed::Sealed for LabToRgb {}

impl Direction for RgbToLab {
    const NAME: &'static str = "rgb->lab";
    const SOURCE_PROFILE: &'static str = DEVICE_RGB;
    const DEST_PROFILE: &'static str = LAB_REFERENCE;
    const SOURCE_SPACE: ColorSpaceSignature = ColorSpaceSignature::RgbData;
    const DEST_SPACE: ColorSpaceSignature = ColorSpaceSignature::LabData;
    const INPUT: PixelFormat = PixelFormat::RGB_FLT;
    const OUTPUT: PixelFormat = PixelFormat::Lab_FLT;
}

impl Direction for LabToRgb {
    const NAME: &'static str = "lab->rgb";
    const SOURCE_PROFILE: &'static str = LAB_REFERENCE;
    const DEST_PROFILE: &'static str = DEVICE_RGB;
    const SOURCE_SPACE: ColorSpaceSignature = ColorSpaceSignature::LabData;
    const DEST_SPACE: ColorSpaceSignature = ColorSpaceSignature::RgbData;
    const INPUT: PixelFormat = PixelFormat::Lab_FLT;
    const OUTPUT: PixelFormat = PixelFormat::RGB_FLT;
}

/// Calibrated transform in direction `D`.
///
/// RGB crosses the lcms2 boundary on a 0-1 scale and Lab at native scale.
/// Results are passed on unclamped; clamping belongs to 8-bit quantization.
pub struct ColorTransform<D: Direction> {
    inner: LcmsTransform<[f32; 3], [f32; 3]>,
    _direction: PhantomData<D>,
}

impl<D: Direction> ColorTransform<D> {
    /// Builds the transform from the two profiles `D` names.
    ///
    /// # Errors
    ///
    /// - [`IccError::ProfileMissing`] if either resource is absent
    /// - [`IccError::InvalidProfile`] if either resource does not parse
    /// - [`IccError::ColorSpaceMismatch`] if a profile has the wrong space
    /// - [`IccError::TransformFailed`] if lcms2 rejects the pair
    pub fn build<S: ProfileSource + ?Sized>(source: &S, intent: Intent) -> IccResult<Self> {
        let src = Profile::load(source, D::SOURCE_PROFILE)?;
        let dst = Profile::load(source, D::DEST_PROFILE)?;
        Self::from_profiles(&src, &dst, intent)
    }

    /// Builds the transform from already opened profiles.
    pub fn from_profiles(source: &Profile, dest: &Profile, intent: Intent) -> IccResult<Self> {
        expect_space(source, D::SOURCE_SPACE)?;
        expect_space(dest, D::DEST_SPACE)?;

        let inner = LcmsTransform::new(&source.inner, D::INPUT, &dest.inner, D::OUTPUT, intent.into())
            .map_err(|e| IccError::TransformFailed(format!("{}: {}", D::NAME, e)))?;
        trace!(direction = D::NAME, ?intent, "built color transform");

        Ok(Self {
            inner,
            _direction: PhantomData,
        })
    }

    /// Transforms raw triples at lcms2 scale.
    ///
    /// # Panics
    ///
    /// Panics if `src` and `dst` differ in length.
    pub fn apply_slice(&self, src: &[[f32; 3]], dst: &mut [[f32; 3]]) {
        assert_eq!(src.len(), dst.len(), "source and dest must have same length");
        self.inner.transform_pixels(src, dst);
    }

    #[inline]
    fn apply(&self, px: [f32; 3]) -> [f32; 3] {
        let mut out = [[0.0f32; 3]];
        self.inner.transform_pixels(&[px], &mut out);
        out[0]
    }
}

impl ColorTransform<RgbToLab> {
    /// Converts a 0-255 RGB triple to Lab.
    #[inline]
    pub fn convert(&self, rgb: Rgb) -> Lab {
        Lab::from_array(self.apply(rgb.to_unit()))
    }
}

impl ColorTransform<LabToRgb> {
    /// Converts a Lab triple to 0-255 RGB. The result is not clamped.
    #[inline]
    pub fn convert(&self, lab: Lab) -> Rgb {
        Rgb::from_unit(self.apply(lab.to_array()))
    }
}

impl<D: Direction> std::fmt::Debug for ColorTransform<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorTransform")
            .field("direction", &D::NAME)
            .finish_non_exhaustive()
    }
}

/// Converts one 0-255 RGB triple to Lab.
#[inline]
pub fn rgb_to_lab(transform: &ColorTransform<RgbToLab>, rgb: Rgb) -> Lab {
    transform.convert(rgb)
}

/// Converts one Lab triple to 0-255 RGB.
#[inline]
pub fn lab_to_rgb(transform: &ColorTransform<LabToRgb>, lab: Lab) -> Rgb {
    transform.convert(lab)
}

fn expect_space(profile: &Profile, expected: ColorSpaceSignature) -> IccResult<()> {
    let actual = profile.signature();
    if actual as u32 != expected as u32 {
        return Err(IccError::ColorSpaceMismatch {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProfileSet;
    use approx::assert_abs_diff_eq;

    fn profiles() -> ProfileSet {
        ProfileSet::builtin().unwrap()
    }

    #[test]
    fn test_gray_roundtrip_within_two() {
        let set = profiles();
        let fwd = ColorTransform::<RgbToLab>::build(&set, Intent::Perceptual).unwrap();
        let inv = ColorTransform::<LabToRgb>::build(&set, Intent::Perceptual).unwrap();

        let rgb = Rgb::new(128.0, 128.0, 128.0);
        let back = lab_to_rgb(&inv, rgb_to_lab(&fwd, rgb));
        assert_abs_diff_eq!(back.r, 128.0, epsilon = 2.0);
        assert_abs_diff_eq!(back.g, 128.0, epsilon = 2.0);
        assert_abs_diff_eq!(back.b, 128.0, epsilon = 2.0);
    }

    #[test]
    fn test_reference_points() {
        let fwd = ColorTransform::<RgbToLab>::build(&profiles(), Intent::Perceptual).unwrap();

        let white = fwd.convert(Rgb::new(255.0, 255.0, 255.0));
        assert_abs_diff_eq!(white.l, 100.0, epsilon = 0.5);
        assert_abs_diff_eq!(white.a, 0.0, epsilon = 0.5);

        let black = fwd.convert(Rgb::new(0.0, 0.0, 0.0));
        assert_abs_diff_eq!(black.l, 0.0, epsilon = 0.5);

        // sRGB 128 gray is L* ~53.6
        let gray = fwd.convert(Rgb::new(128.0, 128.0, 128.0));
        assert_abs_diff_eq!(gray.l, 53.6, epsilon = 1.0);

        let red = fwd.convert(Rgb::new(255.0, 0.0, 0.0));
        assert!(red.a > 50.0);
    }

    #[test]
    fn test_slice_matches_single() {
        let fwd = ColorTransform::<RgbToLab>::build(&profiles(), Intent::Perceptual).unwrap();
        let src = [[0.2f32, 0.4, 0.6], [0.9, 0.1, 0.3]];
        let mut dst = [[0.0f32; 3]; 2];
        fwd.apply_slice(&src, &mut dst);
        let single = fwd.convert(Rgb::from_unit(src[1])).to_array();
        for c in 0..3 {
            assert_abs_diff_eq!(dst[1][c], single[c], epsilon = 1e-3);
        }
    }

    #[test]
    fn test_missing_profile() {
        let mut set = profiles();
        set.remove(DEVICE_RGB);
        let err = ColorTransform::<LabToRgb>::build(&set, Intent::Perceptual).unwrap_err();
        assert!(err.is_missing_profile());
    }

    #[test]
    fn test_swapped_profiles_rejected() {
        let set = ProfileSet::new()
            .with(DEVICE_RGB, Profile::lab().unwrap().to_icc().unwrap())
            .with(LAB_REFERENCE, Profile::srgb().to_icc().unwrap());
        let err = ColorTransform::<RgbToLab>::build(&set, Intent::Perceptual).unwrap_err();
        assert!(matches!(err, IccError::ColorSpaceMismatch { .. }));
    }
}
