//! ICC error types.

use thiserror::Error;

/// Result type for ICC operations.
pub type IccResult<T> = Result<T, IccError>;

/// Errors that can occur during ICC operations.
#[derive(Debug, Error)]
pub enum IccError {
    /// Failed to create profile.
    #[error("failed to create profile: {0}")]
    CreateFailed(String),

    /// Failed to create transform.
    #[error("failed to create transform: {0}")]
    TransformFailed(String),

    /// Invalid profile data.
    #[error("invalid profile data: {0}")]
    InvalidProfile(String),

    /// A named profile resource is not available from its source.
    #[error("profile resource not found: {name}")]
    ProfileMissing {
        /// Resource name that was requested.
        name: String,
    },

    /// Profile color space mismatch.
    #[error("color space mismatch: expected {expected}, got {actual}")]
    ColorSpaceMismatch {
        /// Expected color space.
        expected: String,
        /// Actual color space.
        actual: String,
    },

    /// L, a, b planes disagree in length or with the target size.
    #[error("channel planes mismatch: l={l}, a={a}, b={b}, expected {expected}")]
    ChannelLengthMismatch {
        /// Length of the L plane.
        l: usize,
        /// Length of the a plane.
        a: usize,
        /// Length of the b plane.
        b: usize,
        /// Required length.
        expected: usize,
    },

    /// Bitmap layout cannot be read as 8-bit RGB.
    #[error("unsupported bitmap layout: {0}")]
    UnsupportedFormat(String),

    /// Bitmap has no backing pixel data.
    #[error("bitmap has no pixel data")]
    NoPixelData,

    /// Raster construction failed.
    #[error(transparent)]
    Core(#[from] chroma_core::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IccError {
    /// Returns `true` if a profile resource was absent.
    #[inline]
    pub fn is_missing_profile(&self) -> bool {
        matches!(self, Self::ProfileMissing { .. })
    }
}
