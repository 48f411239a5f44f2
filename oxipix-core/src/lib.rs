//! # OxiPix Core
//!
//! Core components for the OxiPix image encoders.
//!
//! - [`pixel`]: ARGB pixel buffers and the [`PixelSource`] pull contract
//! - [`crc`]: CRC-32 for PNG chunk trailers
//! - [`traits`]: the [`ImageEncoder`] trait and [`CompressionLevel`]
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Facade: ImageFormat, encode(), batch / async helpers    │
//! ├────────────────────────────┬────────────────────────────┤
//! │ GIF: quantize + LZW        │ PNG: filter + DEFLATE      │
//! │      GIF89a container      │      chunk container       │
//! ├────────────────────────────┴────────────────────────────┤
//! │ Core (this crate): PixelSource, CRC-32, errors          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxipix_core::{Crc32, PixelBuffer, PixelSource};
//!
//! let mut image = PixelBuffer::filled(4, 4, 0xFF336699);
//! let pixels = image.read_all().unwrap();
//! assert_eq!(pixels.len(), 16);
//!
//! assert_eq!(Crc32::compute(b"123456789"), 0xCBF43926);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod error;
pub mod pixel;
pub mod traits;

pub use crc::Crc32;
pub use error::{OxiPixError, Result};
pub use pixel::{PixelBuffer, PixelSource};
pub use traits::{CompressionLevel, ImageEncoder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{OxiPixError, Result};
    pub use crate::pixel::{PixelBuffer, PixelSource};
    pub use crate::traits::{CompressionLevel, ImageEncoder};
}
