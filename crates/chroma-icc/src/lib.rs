//! # chroma-icc
//!
//! Calibrated RGB/Lab conversion on top of Little CMS 2.
//!
//! # Features
//!
//! - Load ICC profiles by resource name from a directory or memory
//! - Built-in sRGB and D50 Lab v4 profiles
//! - Direction-typed RGB to Lab and Lab to RGB transforms
//! - Split 8-bit RGB bitmaps into L/a/b planes and render planes back
//!
//! # Example
//!
//! ```rust
//! use chroma_core::Bitmap;
//! use chroma_icc::{extract_channels, Intent, ProfileSet};
//!
//! let profiles = ProfileSet::builtin().unwrap();
//! let gray = Bitmap::filled_rgba8(8, 8, [128, 128, 128, 255]);
//!
//! let planes = extract_channels(&gray, &profiles, Intent::Perceptual).unwrap();
//! assert_eq!(planes.len(), 64);
//!
//! let back = planes.render((8, 8), &profiles, Intent::Perceptual).unwrap();
//! assert_eq!(back.dimensions(), (8, 8));
//! ```
//!
//! # Thread Safety
//!
//! Nothing here is cached or global. Each extraction or render builds its
//! own transform and drops it, so independent calls may run concurrently.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod planes;
mod profile;
mod source;
mod transform;

pub use error::{IccError, IccResult};
pub use planes::{extract_channels, render_from_channels, ChannelPlanes};
pub use profile::{kind_of, signature, Profile};
pub use source::{ProfileDirectory, ProfileSet, ProfileSource, DEVICE_RGB, LAB_REFERENCE};
pub use transform::{lab_to_rgb, rgb_to_lab, ColorTransform, Direction, LabToRgb, RgbToLab};

use serde::Deserialize;

/// Rendering intent for color transformations.
///
/// Determines how out-of-gamut colors are handled during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Compresses the source gamut to fit the destination.
    ///
    /// Best for photographic images.
    #[default]
    Perceptual,

    /// Maps source white to destination white; in-gamut colors are exact,
    /// out-of-gamut colors are clipped.
    RelativeColorimetric,

    /// Maintains saturation at the expense of accuracy.
    Saturation,

    /// Like relative colorimetric but without white point adaptation.
    AbsoluteColorimetric,
}

impl From<Intent> for lcms2::Intent {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Perceptual => lcms2::Intent::Perceptual,
            Intent::RelativeColorimetric => lcms2::Intent::RelativeColorimetric,
            Intent::Saturation => lcms2::Intent::Saturation,
            Intent::AbsoluteColorimetric => lcms2::Intent::AbsoluteColorimetric,
        }
    }
}
