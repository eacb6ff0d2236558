//! # chroma-core
//!
//! Core raster types for the chroma colorization engine.
//!
//! - [`PixelFormatSpec`], [`ColorSpaceKind`], [`ComponentDepth`] - Pixel layout descriptors
//! - [`BitmapContext`] - Drawable pixel memory, owned or caller-supplied
//! - [`Bitmap`] - Materialized immutable raster
//! - [`Rgb`], [`Lab`] - Color triples crossing the transform boundary
//!
//! ## Crate Structure
//!
//! ```text
//! chroma-core (this crate)
//!    ^
//!    |
//!    +-- chroma-ops (resampling, normalization)
//!    +-- chroma-icc (ICC profiles, Lab transforms, channel planes)
//!    +-- chroma-colorize (pipeline)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod bitmap;
pub mod context;
pub mod error;
pub mod format;
pub mod pixel;

pub use bitmap::Bitmap;
pub use context::BitmapContext;
pub use error::{Error, Result};
pub use format::{ColorSpaceKind, ComponentDepth, PixelFormatSpec, SampleType};
pub use pixel::{luminance_rec709, Lab, Rgb};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitmap::Bitmap;
    pub use crate::context::BitmapContext;
    pub use crate::error::{Error, Result};
    pub use crate::format::{ColorSpaceKind, ComponentDepth, PixelFormatSpec};
    pub use crate::pixel::{Lab, Rgb};
}
