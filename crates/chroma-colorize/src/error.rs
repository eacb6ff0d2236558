//! Pipeline error taxonomy.
//!
//! A colorize call either returns an image or exactly one of these errors.
//! Lower-layer failures are wrapped by the stage that hit them.

use crate::config::ConfigError;
use crate::predict::PredictError;
use chroma_icc::IccError;
use chroma_ops::OpsError;
use thiserror::Error;

/// Result type for colorization.
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal pipeline failure.
#[derive(Debug, Error)]
pub enum Error {
    /// The input could not be normalized or split into Lab planes.
    #[error("preprocess failed: {0}")]
    Preprocess(#[source] StageError),

    /// The chroma predictor failed or returned planes of the wrong shape.
    ///
    /// Predictor errors are carried unmodified.
    #[error("prediction failed: {0}")]
    Prediction(#[source] PredictError),

    /// Rendering, normalizing, extracting or recombining the result failed.
    #[error("postprocess failed: {0}")]
    Postprocess(#[source] StageError),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns `true` for [`Error::Preprocess`].
    #[inline]
    pub fn is_preprocess(&self) -> bool {
        matches!(self, Self::Preprocess(_))
    }

    /// Returns `true` for [`Error::Prediction`].
    #[inline]
    pub fn is_prediction(&self) -> bool {
        matches!(self, Self::Prediction(_))
    }

    /// Returns `true` for [`Error::Postprocess`].
    #[inline]
    pub fn is_postprocess(&self) -> bool {
        matches!(self, Self::Postprocess(_))
    }

    /// Name of the step that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Preprocess(_) => "preprocess",
            Self::Prediction(_) => "predict",
            Self::Postprocess(_) => "postprocess",
            Self::Config(_) => "config",
        }
    }
}

/// Cause of a pre- or postprocess failure.
#[derive(Debug, Error)]
pub enum StageError {
    /// Normalization failed.
    #[error(transparent)]
    Ops(#[from] OpsError),

    /// Profile loading, transform construction, extraction or render failed.
    #[error(transparent)]
    Icc(#[from] IccError),
}
