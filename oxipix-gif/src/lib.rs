//! # OxiPix-GIF: Pure Rust GIF89a Encoder
//!
//! Encodes a single ARGB image as a GIF89a file with one global color table
//! and one image block.
//!
//! ## Pipeline
//!
//! 1. **Quantize**: every distinct ARGB value gets a palette slot in
//!    first-occurrence order. More than 256 distinct values is an error;
//!    there is no color reduction or dithering.
//! 2. **Transparency**: pixels with alpha below `0x80` share one
//!    transparent index, announced in a graphic control extension.
//! 3. **LZW**: `compress(1)`-style hashed LZW with variable-width codes up
//!    to 12 bits and adaptive table resets, packed LSB first into 254-byte
//!    sub-blocks.
//! 4. **Container**: header, logical screen descriptor, color table, image
//!    descriptor, data, trailer.
//!
//! ## Example
//!
//! ```rust
//! use oxipix_core::PixelBuffer;
//! use oxipix_gif::{GifConfig, encode_gif};
//!
//! let mut pixels = vec![0xFFFF0000u32; 16];
//! pixels[5] = 0x00000000; // transparent
//! let image = PixelBuffer::new(4, 4, pixels).unwrap();
//!
//! let gif = encode_gif(&image, GifConfig::default()).unwrap();
//! assert_eq!(&gif[..6], b"GIF89a");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod encoder;
pub mod interlace;
pub mod lzw;
pub mod packet;
pub mod quantize;

pub use config::GifConfig;
pub use encoder::{GIF_MAGIC, GifEncoder, IndexedImage, write_gif};
pub use interlace::RowOrder;
pub use lzw::LzwCompressor;
pub use quantize::{ColorEntry, Palette, Quantized, quantize};

use oxipix_core::error::Result;
use oxipix_core::pixel::PixelSource;
use oxipix_core::traits::ImageEncoder;
use std::io::Write;

/// Encode `source` as a GIF and return the file bytes.
///
/// This is equivalent to `GifEncoder::new(config).encode_to_vec(source)`.
pub fn encode_gif<S: PixelSource>(source: S, config: GifConfig) -> Result<Vec<u8>> {
    GifEncoder::new(config).encode_to_vec(source)
}

/// Encode `source` as a GIF into `writer`.
pub fn write_gif_to<S: PixelSource, W: Write>(
    source: S,
    writer: &mut W,
    config: GifConfig,
) -> Result<()> {
    GifEncoder::new(config).encode(source, writer)
}
