//! Separable resampling of interleaved float images.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - Fastest, no interpolation (blocky)
//! - [`Filter::Bilinear`] - Linear interpolation (smooth but blurry)
//! - [`Filter::Bicubic`] - Mitchell-Netravali cubic
//! - [`Filter::Lanczos3`] - High-quality sinc-based (best for downscaling)
//!
//! Resizing always targets the exact destination size; aspect ratio is
//! not preserved. Each axis is resampled independently through a table of
//! normalized filter weights, so the result depends only on the input
//! samples and parameters.
//!
//! # Example
//!
//! ```rust
//! use chroma_ops::resize::{resize_f32, Filter};
//!
//! let src = vec![0.5f32; 16 * 16 * 4];
//! let dst = resize_f32(&src, 16, 16, 4, 32, 24, Filter::Bilinear).unwrap();
//! assert_eq!(dst.len(), 32 * 24 * 4);
//! ```

use crate::{OpsError, OpsResult};
use serde::Deserialize;
use tracing::trace;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Bilinear interpolation (smooth, fast).
    Bilinear,
    /// Bicubic interpolation (sharper than bilinear).
    Bicubic,
    /// Lanczos-3 (high quality, best for downscaling).
    #[default]
    Lanczos3,
}

impl Filter {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        match self {
            Filter::Nearest => {
                if ax <= 0.5 { 1.0 } else { 0.0 }
            }
            Filter::Bilinear => (1.0 - ax).max(0.0),
            Filter::Bicubic => mitchell(ax),
            Filter::Lanczos3 => lanczos(ax, 3.0),
        }
    }
}

/// Mitchell-Netravali with B=1/3, C=1/3.
#[inline]
fn mitchell(ax: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos(ax: f32, a: f32) -> f32 {
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Normalized filter taps for one destination sample.
#[derive(Debug, Clone)]
struct Taps {
    /// First source index.
    first: usize,
    /// Weights for `first..first + weights.len()`, summing to 1.
    weights: Vec<f32>,
}

/// Builds the weight table mapping `src_len` samples onto `dst_len`.
fn taps(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    // widen the kernel when minifying
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let lo = ((center - support).floor().max(0.0) as usize).min(src_len - 1);
            let hi = ((center + support).ceil().max(0.0) as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (lo..=hi)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();
            if sum.abs() > f32::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
                Taps { first: lo, weights }
            } else {
                // degenerate kernel: fall back to the nearest sample
                let nearest = (center.round().max(0.0) as usize).min(src_len - 1);
                Taps { first: nearest, weights: vec![1.0] }
            }
        })
        .collect()
}

/// Resizes interleaved f32 image data.
///
/// # Arguments
///
/// * `src` - Source samples, `src_w * src_h * channels` values
/// * `src_w`, `src_h` - Source size
/// * `channels` - Samples per pixel
/// * `dst_w`, `dst_h` - Destination size
/// * `filter` - Resampling filter
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] if any size is zero or `src` has the
/// wrong length.
pub fn resize_f32(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
    filter: Filter,
) -> OpsResult<Vec<f32>> {
    if src_w == 0 || src_h == 0 || channels == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "source {}x{}x{} is empty",
            src_w, src_h, channels
        )));
    }
    let expected = src_w * src_h * channels;
    if src.len() != expected {
        return Err(OpsError::InvalidDimensions(format!(
            "expected {} samples, got {}",
            expected,
            src.len()
        )));
    }
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }
    trace!(src_w, src_h, dst_w, dst_h, channels, ?filter, "resize_f32");

    // Horizontal pass into a dst_w x src_h buffer, then vertical.
    let h_taps = taps(src_w, dst_w, filter);
    let mut temp = vec![0.0f32; dst_w * src_h * channels];
    for y in 0..src_h {
        let src_row = &src[y * src_w * channels..(y + 1) * src_w * channels];
        let dst_row = &mut temp[y * dst_w * channels..(y + 1) * dst_w * channels];
        for (x, t) in h_taps.iter().enumerate() {
            let out = &mut dst_row[x * channels..(x + 1) * channels];
            for (k, w) in t.weights.iter().enumerate() {
                let px = &src_row[(t.first + k) * channels..(t.first + k + 1) * channels];
                for (o, s) in out.iter_mut().zip(px) {
                    *o += s * w;
                }
            }
        }
    }

    let v_taps = taps(src_h, dst_h, filter);
    let row_len = dst_w * channels;
    let mut dst = vec![0.0f32; dst_w * dst_h * channels];
    for (y, t) in v_taps.iter().enumerate() {
        let out = &mut dst[y * row_len..(y + 1) * row_len];
        for (k, w) in t.weights.iter().enumerate() {
            let row = &temp[(t.first + k) * row_len..(t.first + k + 1) * row_len];
            for (o, s) in out.iter_mut().zip(row) {
                *o += s * w;
            }
        }
    }

    Ok(dst)
}
