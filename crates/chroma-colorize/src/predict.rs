//! The chroma prediction seam.
//!
//! A [`ChromaPredictor`] maps a `[1, 1, N, N]` luminance tensor (Lab L
//! values, 0-100 nominal) to two `[1, 1, N, N]` tensors of predicted a and
//! b values. Predictions are unclamped.
//!
//! The pipeline owns the packing on both sides: [`luminance_tensor`] builds
//! the input from a flat L plane and [`unpack_prediction`] flattens the
//! output back into planes aligned index for index with it.

use ndarray::{Array4, ArrayView4};

/// Error raised by a predictor, passed through the pipeline unchanged.
pub type PredictError = Box<dyn std::error::Error + Send + Sync>;

/// Predicted chrominance planes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaPrediction {
    /// Predicted a channel, shape `[1, 1, N, N]`.
    pub a: Array4<f32>,
    /// Predicted b channel, shape `[1, 1, N, N]`.
    pub b: Array4<f32>,
}

/// External colorization model.
pub trait ChromaPredictor: Send + Sync {
    /// Predicts a/b planes for one luminance tensor.
    fn predict(&self, luminance: ArrayView4<'_, f32>) -> Result<ChromaPrediction, PredictError>;
}

impl<F> ChromaPredictor for F
where
    F: Fn(ArrayView4<'_, f32>) -> Result<ChromaPrediction, PredictError> + Send + Sync,
{
    fn predict(&self, luminance: ArrayView4<'_, f32>) -> Result<ChromaPrediction, PredictError> {
        self(luminance)
    }
}

/// Packs a row-major `size x size` L plane as a `[1, 1, size, size]` tensor.
pub fn luminance_tensor(l: &[f32], size: usize) -> Result<Array4<f32>, PredictError> {
    Array4::from_shape_vec((1, 1, size, size), l.to_vec()).map_err(|e| {
        format!(
            "luminance plane of {} values does not fit [1, 1, {size}, {size}]: {e}",
            l.len()
        )
        .into()
    })
}

/// Flattens a prediction into row-major a and b planes of `size * size`.
///
/// # Errors
///
/// Returns an error naming the offending plane if either tensor is not
/// `[1, 1, size, size]`.
pub fn unpack_prediction(
    prediction: ChromaPrediction,
    size: usize,
) -> Result<(Vec<f32>, Vec<f32>), PredictError> {
    let expected = [1, 1, size, size];
    for (name, plane) in [("a", &prediction.a), ("b", &prediction.b)] {
        if plane.shape() != expected {
            return Err(format!(
                "predicted {name} plane has shape {:?}, expected {:?}",
                plane.shape(),
                expected
            )
            .into());
        }
    }
    Ok((flatten(prediction.a), flatten(prediction.b)))
}

/// Logical row-major copy; the plane may be a view into a larger buffer.
fn flatten(plane: Array4<f32>) -> Vec<f32> {
    plane.iter().copied().collect()
}
