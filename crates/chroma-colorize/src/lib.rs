//! # chroma-colorize
//!
//! Colorizes grayscale images in Lab space around an external chroma model.
//!
//! The model sees only a fixed-size lightness plane and answers with two
//! chrominance planes. This crate prepares that plane, calls the model and
//! puts the predicted color back onto the original image at its own size,
//! keeping the original's lightness untouched.
//!
//! # Architecture
//!
//! ```text
//! Bitmap ──normalize 256²──► L,a,b ──L──► ChromaPredictor ──a,b──┐
//!   │                          │                                 │
//!   │                          └───────L─────────► render 256² ◄─┘
//!   │                                                  │
//!   └──normalize W×H──► L ────► recombine ◄── a,b ◄────┘ normalize W×H
//!                                  │
//!                            render W×H ──► Bitmap
//! ```
//!
//! # Example
//!
//! ```rust
//! use chroma_colorize::{ChromaPrediction, Colorizer, ColorizeConfig, PredictError};
//! use chroma_core::Bitmap;
//! use ndarray::{Array4, ArrayView4};
//!
//! // A stand-in model that tints everything slightly warm.
//! fn warm(l: ArrayView4<'_, f32>) -> Result<ChromaPrediction, PredictError> {
//!     Ok(ChromaPrediction {
//!         a: Array4::from_elem(l.raw_dim(), 10.0),
//!         b: Array4::from_elem(l.raw_dim(), 20.0),
//!     })
//! }
//!
//! let config = ColorizeConfig { model_size: 64, ..Default::default() };
//! let colorizer = Colorizer::from_config(warm, config).unwrap();
//!
//! let gray = Bitmap::filled_rgba8(40, 30, [128, 128, 128, 255]);
//! let color = colorizer.colorize(&gray).unwrap();
//!
//! let [r, _, b, _] = color.pixel_rgba(20, 15);
//! assert!(r > b);
//! ```
//!
//! # Thread Safety
//!
//! [`Colorizer`] is `Send + Sync`. Every call builds its own transforms and
//! buffers, so calls may overlap freely; see [`Colorizer::colorize_async`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod dispatch;
mod error;
mod pipeline;
mod predict;

pub use config::{ColorizeConfig, ConfigError, DEFAULT_MODEL_SIZE};
pub use dispatch::{CompletionContext, Immediate, Job};
pub use error::{Error, Result, StageError};
pub use pipeline::{Colorizer, Stage};
pub use predict::{luminance_tensor, unpack_prediction, ChromaPrediction, ChromaPredictor, PredictError};
