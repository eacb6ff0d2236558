//! ICC profile wrapper.

use crate::{IccError, IccResult, ProfileSource};
use chroma_core::ColorSpaceKind;
use lcms2::{ColorSpaceSignature, Profile as LcmsProfile};

/// An ICC color profile.
///
/// Profiles are opened for the duration of a transform build and dropped
/// right after; nothing holds on to them.
///
/// # Example
///
/// ```rust
/// use chroma_icc::Profile;
///
/// let srgb = Profile::srgb();
/// assert!(srgb.is_rgb());
///
/// let lab = Profile::lab().unwrap();
/// assert!(lab.is_lab());
/// ```
pub struct Profile {
    /// Internal lcms2 profile handle.
    pub(crate) inner: LcmsProfile,
}

impl Profile {
    /// Creates a profile from raw ICC data.
    pub fn from_icc(data: &[u8]) -> IccResult<Self> {
        let inner = LcmsProfile::new_icc(data)
            .map_err(|e| IccError::InvalidProfile(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Opens the resource `name` from a profile source.
    ///
    /// # Errors
    ///
    /// [`IccError::ProfileMissing`] if the source has no such resource,
    /// [`IccError::InvalidProfile`] if its bytes do not parse.
    pub fn load<S: ProfileSource + ?Sized>(source: &S, name: &str) -> IccResult<Self> {
        let bytes = source.load(name)?;
        Self::from_icc(&bytes)
    }

    /// Creates an sRGB profile (IEC 61966-2-1).
    pub fn srgb() -> Self {
        Self {
            inner: LcmsProfile::new_srgb(),
        }
    }

    /// Creates a CIE Lab v4 profile (D50).
    pub fn lab() -> IccResult<Self> {
        let inner = LcmsProfile::new_lab4_context(lcms2::GlobalContext::new(), &lcms2::CIExyY::d50())
            .map_err(|e| IccError::CreateFailed(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Returns the profile description.
    pub fn description(&self) -> String {
        self.inner
            .info(lcms2::InfoType::Description, lcms2::Locale::none())
            .unwrap_or_default()
    }

    /// Returns the color space signature.
    pub fn signature(&self) -> ColorSpaceSignature {
        self.inner.color_space()
    }

    /// Returns the color space signature as text.
    pub fn color_space(&self) -> String {
        format!("{:?}", self.inner.color_space())
    }

    /// Returns the color model, if it is one a bitmap can carry.
    pub fn kind(&self) -> Option<ColorSpaceKind> {
        kind_of(self.signature())
    }

    /// Returns true if this is an RGB profile.
    pub fn is_rgb(&self) -> bool {
        matches!(self.inner.color_space(), ColorSpaceSignature::RgbData)
    }

    /// Returns true if this is a Lab profile.
    pub fn is_lab(&self) -> bool {
        matches!(self.inner.color_space(), ColorSpaceSignature::LabData)
    }

    /// Exports the profile as ICC data.
    pub fn to_icc(&self) -> IccResult<Vec<u8>> {
        self.inner
            .icc()
            .map_err(|e| IccError::CreateFailed(e.to_string()))
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("description", &self.description())
            .field("color_space", &self.color_space())
            .finish()
    }
}

/// lcms2 color space handle for a bitmap color model.
pub fn signature(kind: ColorSpaceKind) -> ColorSpaceSignature {
    match kind {
        ColorSpaceKind::Gray => ColorSpaceSignature::GrayData,
        ColorSpaceKind::Rgb => ColorSpaceSignature::RgbData,
        ColorSpaceKind::Cmyk => ColorSpaceSignature::CmykData,
    }
}

/// Bitmap color model for an lcms2 color space, if there is one.
pub fn kind_of(signature: ColorSpaceSignature) -> Option<ColorSpaceKind> {
    match signature {
        ColorSpaceSignature::GrayData => Some(ColorSpaceKind::Gray),
        ColorSpaceSignature::RgbData => Some(ColorSpaceKind::Rgb),
        ColorSpaceSignature::CmykData => Some(ColorSpaceKind::Cmyk),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb() {
        let profile = Profile::srgb();
        assert!(profile.is_rgb());
        assert_eq!(profile.kind(), Some(ColorSpaceKind::Rgb));
        assert!(!profile.description().is_empty());
    }

    #[test]
    fn test_lab() {
        let profile = Profile::lab().unwrap();
        assert!(profile.is_lab());
        assert!(!profile.is_rgb());
        assert_eq!(profile.kind(), None);
    }

    #[test]
    fn test_icc_roundtrip() {
        let data = Profile::lab().unwrap().to_icc().unwrap();
        assert!(!data.is_empty());
        assert!(Profile::from_icc(&data).unwrap().is_lab());
    }

    #[test]
    fn test_invalid_bytes() {
        let err = Profile::from_icc(b"not a profile").unwrap_err();
        assert!(matches!(err, IccError::InvalidProfile(_)));
    }

    #[test]
    fn test_signature_mapping() {
        for kind in [ColorSpaceKind::Gray, ColorSpaceKind::Rgb, ColorSpaceKind::Cmyk] {
            assert_eq!(kind_of(signature(kind)), Some(kind));
        }
    }
}
