//! # chroma-ops
//!
//! Image operations that prepare bitmaps for color conversion.
//!
//! # Modules
//!
//! - [`resize`] - Separable resampling with selectable filters
//! - [`normalize`] - Resize and re-render into a fixed pixel layout
//!
//! # Example
//!
//! ```rust
//! use chroma_core::Bitmap;
//! use chroma_ops::{normalize, NormalizeOptions};
//!
//! let src = Bitmap::filled_rgba8(100, 80, [10, 20, 30, 255]);
//! let out = normalize(&src, (256, 256), 8, 32, None, &NormalizeOptions::default()).unwrap();
//! assert_eq!(out.dimensions(), (256, 256));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod normalize;
pub mod resize;

pub use error::{OpsError, OpsResult};
pub use normalize::{normalize, normalize_canonical, NormalizeOptions};
pub use resize::Filter;
