//! # OxiPix-PNG: Pure Rust PNG Encoder
//!
//! Encodes a single image as an 8-bit, non-interlaced PNG with no ancillary
//! chunks:
//!
//! ```text
//! signature | IHDR | [PLTE] | IDAT+ | IEND
//! ```
//!
//! ## Features
//!
//! - **Color types**: RGB (2), RGBA (6) and indexed (3)
//! - **Filters**: None, Sub and Up, one type for the whole image
//! - **DEFLATE**: zlib stream at a configurable level (0-9)
//! - **Bounded scratch memory**: rows are filtered in batches of at most
//!   32767 scanline bytes
//! - **Two sources**: any [`PixelSource`] of packed ARGB, or a [`Raster`]
//!   read in its native byte/int/short layout
//!
//! ## Example
//!
//! ```rust
//! use oxipix_core::PixelBuffer;
//! use oxipix_png::{FilterType, PngConfig, encode_png};
//!
//! let image = PixelBuffer::filled(16, 16, 0xFF2080C0);
//! let config = PngConfig::new().with_alpha(false).with_filter(FilterType::Up);
//! let png = encode_png(&image, config).unwrap();
//! assert_eq!(&png[..8], &oxipix_png::PNG_SIGNATURE);
//! ```
//!
//! Indexed output needs a raster with a palette:
//!
//! ```rust
//! use oxipix_png::{PngConfig, Raster, encode_raster};
//!
//! let palette = [[0, 0, 0], [255, 255, 255]];
//! let indices = [0u8, 1, 1, 0];
//! let raster = Raster::indexed(2, 2, &indices, &palette).unwrap();
//! let png = encode_raster(&raster, PngConfig::default()).unwrap();
//! assert_eq!(png[25], 3); // IHDR color type
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod chunk;
pub mod config;
pub mod encoder;
pub mod filter;
pub mod raster;

pub use chunk::{ColorType, PNG_SIGNATURE};
pub use config::PngConfig;
pub use encoder::PngEncoder;
pub use filter::{FilterType, ScanlineFilter};
pub use raster::{Raster, RasterData, SampleLayout, ShortFormat};

use oxipix_core::error::Result;
use oxipix_core::pixel::PixelSource;
use oxipix_core::traits::ImageEncoder;

/// Encode `source` as a PNG and return the file bytes.
pub fn encode_png<S: PixelSource>(source: S, config: PngConfig) -> Result<Vec<u8>> {
    PngEncoder::new(config).encode_to_vec(source)
}

/// Encode `raster` in its native layout and return the file bytes.
pub fn encode_raster(raster: &Raster<'_>, config: PngConfig) -> Result<Vec<u8>> {
    PngEncoder::new(config).encode_raster_to_vec(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxipix_core::PixelBuffer;

    #[test]
    fn test_content_type() {
        assert_eq!(PngEncoder::CONTENT_TYPE, "image/png");
    }

    #[test]
    fn test_helpers_match_encoder() {
        let image = PixelBuffer::filled(4, 4, 0xFF00FF00);
        let config = PngConfig::new().with_alpha(false);
        assert_eq!(
            encode_png(&image, config).unwrap(),
            PngEncoder::new(config).encode_to_vec(&image).unwrap()
        );

        let ints = [0xFF00FF00u32; 16];
        let raster = Raster::int_argb(4, 4, &ints, false).unwrap();
        assert_eq!(
            encode_raster(&raster, PngConfig::default()).unwrap(),
            encode_png(&image, config).unwrap()
        );
    }
}
