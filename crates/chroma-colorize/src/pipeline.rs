//! The colorization pipeline.
//!
//! One call runs three stages in order, synchronously:
//!
//! 1. **Preprocess** - normalize the input to the square model size and
//!    split it into L/a/b planes.
//! 2. **Predict** - hand L to the [`ChromaPredictor`] and take back a/b.
//! 3. **Postprocess** - render a provisional image from (L, predicted a/b),
//!    bring it and the original back to the original size, then combine the
//!    original's L with the provisional a/b and render that.
//!
//! The first failure ends the call with the matching [`Error`] variant.
//! Nothing partial is returned.

use crate::config::ColorizeConfig;
use crate::error::{Error, Result, StageError};
use crate::predict::{luminance_tensor, unpack_prediction, ChromaPredictor};
use chroma_core::Bitmap;
use chroma_icc::{extract_channels, ChannelPlanes, ProfileSet, ProfileSource};
use chroma_ops::normalize_canonical;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, debug_span, warn};

/// Progress of one colorize call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has run yet.
    Start,
    /// Model-size L/a/b planes exist.
    Preprocessed,
    /// Predicted a/b planes exist.
    Predicted,
    /// The final image has been rendered.
    Postprocessed,
    /// The image has been handed back.
    Done,
}

impl Stage {
    /// Lowercase stage name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Preprocessed => "preprocessed",
            Self::Predicted => "predicted",
            Self::Postprocessed => "postprocessed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colorization handle.
///
/// Owns an injected predictor and profile source. It holds no per-call
/// state, so one instance may serve any number of concurrent calls; wrap it
/// in an `Arc` to use [`colorize_async`](Self::colorize_async).
///
/// # Example
///
/// ```rust
/// use chroma_colorize::{ChromaPrediction, Colorizer, PredictError};
/// use chroma_core::Bitmap;
/// use chroma_icc::ProfileSet;
/// use ndarray::{Array4, ArrayView4};
///
/// fn neutral(l: ArrayView4<'_, f32>) -> Result<ChromaPrediction, PredictError> {
///     Ok(ChromaPrediction {
///         a: Array4::zeros(l.raw_dim()),
///         b: Array4::zeros(l.raw_dim()),
///     })
/// }
///
/// let colorizer = Colorizer::new(neutral, ProfileSet::builtin().unwrap());
/// let gray = Bitmap::filled_rgba8(32, 24, [90, 90, 90, 255]);
/// let out = colorizer.colorize(&gray).unwrap();
/// assert_eq!(out.dimensions(), (32, 24));
/// ```
pub struct Colorizer<P, S = ProfileSet> {
    predictor: P,
    profiles: S,
    config: ColorizeConfig,
}

impl<P, S> Colorizer<P, S>
where
    P: ChromaPredictor,
    S: ProfileSource,
{
    /// Creates a colorizer with default settings.
    pub fn new(predictor: P, profiles: S) -> Self {
        Self::with_config(predictor, profiles, ColorizeConfig::default())
    }

    /// Creates a colorizer with explicit settings.
    pub fn with_config(predictor: P, profiles: S, config: ColorizeConfig) -> Self {
        Self {
            predictor,
            profiles,
            config,
        }
    }

    /// Settings in use.
    pub fn config(&self) -> &ColorizeConfig {
        &self.config
    }

    /// The injected predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// The injected profile source.
    pub fn profiles(&self) -> &S {
        &self.profiles
    }

    /// Colorizes `image`, returning an 8-bit RGBA bitmap of the same size.
    ///
    /// # Errors
    ///
    /// Exactly one of [`Error::Preprocess`], [`Error::Prediction`] or
    /// [`Error::Postprocess`], naming the stage that failed.
    pub fn colorize(&self, image: &Bitmap) -> Result<Bitmap> {
        let span = debug_span!(
            "colorize",
            width = image.width(),
            height = image.height(),
            model_size = self.config.model_size
        );
        let _enter = span.enter();

        let mut stage = Stage::Start;
        let result = self.run(image, &mut stage);
        if let Err(e) = &result {
            warn!(failed = e.stage(), completed = %stage, error = %e, "colorize failed");
        }
        result
    }

    fn run(&self, image: &Bitmap, stage: &mut Stage) -> Result<Bitmap> {
        let luminance = self.preprocess(image).map_err(Error::Preprocess)?;
        advance(stage, Stage::Preprocessed);

        let (a, b) = self.predict(luminance.l())?;
        advance(stage, Stage::Predicted);

        let out = self
            .postprocess(image, luminance, a, b)
            .map_err(Error::Postprocess)?;
        advance(stage, Stage::Postprocessed);

        advance(stage, Stage::Done);
        Ok(out)
    }

    /// Normalizes `image` to the model size and extracts its Lab planes.
    pub fn preprocess(&self, image: &Bitmap) -> std::result::Result<ChannelPlanes, StageError> {
        let size = self.config.model_size;
        let options = self.config.normalize_options();
        let model_input = normalize_canonical(image, (size, size), &options)?;
        Ok(extract_channels(&model_input, &self.profiles, self.config.intent)?)
    }

    /// Runs the predictor on a model-size L plane.
    ///
    /// Returns a and b planes aligned index for index with `l`. A panic
    /// inside the predictor is caught and reported as [`Error::Prediction`].
    pub fn predict(&self, l: &[f32]) -> Result<(Vec<f32>, Vec<f32>)> {
        let size = self.config.model_size as usize;
        let tensor = luminance_tensor(l, size).map_err(Error::Prediction)?;
        let prediction = panic::catch_unwind(AssertUnwindSafe(|| {
            self.predictor.predict(tensor.view())
        }))
        .unwrap_or_else(|payload| Err(panic_message(payload.as_ref()).into()))
        .map_err(Error::Prediction)?;
        unpack_prediction(prediction, size).map_err(Error::Prediction)
    }

    /// Builds the final image from model-size planes and the original.
    ///
    /// The result keeps `original`'s lightness at full resolution; only the
    /// predicted chrominance comes from the model-size planes.
    pub fn postprocess(
        &self,
        original: &Bitmap,
        luminance: ChannelPlanes,
        a: Vec<f32>,
        b: Vec<f32>,
    ) -> std::result::Result<Bitmap, StageError> {
        let model = self.config.model_size;
        let intent = self.config.intent;
        let options = self.config.normalize_options();
        let size = original.dimensions();

        let (l, _, _) = luminance.into_parts();
        let predicted = ChannelPlanes::new(l, a, b)?;
        let provisional = predicted.render((model, model), &self.profiles, intent)?;

        let result = normalize_canonical(&provisional, size, &options)?;
        let source = normalize_canonical(original, size, &options)?;
        let result_planes = extract_channels(&result, &self.profiles, intent)?;
        let source_planes = extract_channels(&source, &self.profiles, intent)?;

        let merged = ChannelPlanes::recombine(source_planes, result_planes)?;
        debug!(width = size.0, height = size.1, "recombined lightness and chroma");
        Ok(merged.render(size, &self.profiles, intent)?)
    }
}

impl<P: ChromaPredictor> Colorizer<P, Box<dyn ProfileSource>> {
    /// Creates a colorizer whose profiles come from `config`.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the settings are out of range or the built-in
    /// profiles cannot be created.
    pub fn from_config(predictor: P, config: ColorizeConfig) -> Result<Self> {
        config.validate()?;
        let profiles = config.profile_source()?;
        Ok(Self::with_config(predictor, profiles, config))
    }
}

impl<P, S> fmt::Debug for Colorizer<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colorizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let msg = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    format!("predictor panicked: {msg}")
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{ChromaPrediction, PredictError};
    use approx::assert_abs_diff_eq;
    use ndarray::{Array4, ArrayView4};

    fn neutral(l: ArrayView4<'_, f32>) -> std::result::Result<ChromaPrediction, PredictError> {
        Ok(ChromaPrediction {
            a: Array4::zeros(l.raw_dim()),
            b: Array4::zeros(l.raw_dim()),
        })
    }

    fn small() -> ColorizeConfig {
        ColorizeConfig {
            model_size: 16,
            ..ColorizeConfig::default()
        }
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Start.to_string(), "start");
        assert_eq!(Stage::Postprocessed.to_string(), "postprocessed");
    }

    #[test]
    fn test_preprocess_size() {
        let c = Colorizer::with_config(neutral, ProfileSet::builtin().unwrap(), small());
        let planes = c.preprocess(&Bitmap::filled_rgba8(5, 3, [10, 200, 30, 255])).unwrap();
        assert_eq!(planes.len(), 256);
    }

    #[test]
    fn test_predict_aligns_with_l() {
        let c = Colorizer::with_config(neutral, ProfileSet::builtin().unwrap(), small());
        let (a, b) = c.predict(&[50.0; 256]).unwrap();
        assert_eq!(a.len(), 256);
        assert_eq!(b.len(), 256);
    }

    #[test]
    fn test_predict_rejects_short_plane() {
        let c = Colorizer::with_config(neutral, ProfileSet::builtin().unwrap(), small());
        assert!(c.predict(&[50.0; 10]).unwrap_err().is_prediction());
    }

    #[test]
    fn test_postprocess_keeps_original_lightness() {
        let profiles = ProfileSet::builtin().unwrap();
        let c = Colorizer::with_config(neutral, profiles, small());
        let original = Bitmap::filled_rgba8(20, 10, [200, 200, 200, 255]);

        // model-size planes from a much darker image
        let dark = c.preprocess(&Bitmap::filled_rgba8(4, 4, [40, 40, 40, 255])).unwrap();
        let n = dark.len();
        let out = c.postprocess(&original, dark, vec![0.0; n], vec![0.0; n]).unwrap();

        assert_eq!(out.dimensions(), (20, 10));
        let px = out.pixel_rgba(7, 3);
        assert_abs_diff_eq!(px[0] * 255.0, 200.0, epsilon = 2.0);
        assert_abs_diff_eq!(px[1] * 255.0, 200.0, epsilon = 2.0);
    }
}
