//! # OxiPix: Pure Rust GIF and PNG Encoders
//!
//! OxiPix turns an in-memory ARGB image into a complete, standalone GIF or
//! PNG file, ready to be written to disk or sent as an HTTP response body.
//! It targets small, dynamically generated images such as icons, buttons
//! and charts.
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`oxipix_core`] | pixel sources, CRC-32, errors |
//! | [`oxipix_gif`] | quantizer, LZW, GIF89a writer |
//! | [`oxipix_png`] | scanline filters, raster layouts, PNG writer |
//!
//! ## Example
//!
//! ```rust
//! use oxipix::{EncodeOptions, ImageFormat, PixelBuffer, encode};
//!
//! let mut image = PixelBuffer::filled(16, 16, 0xFFFFFFFF);
//! image.set_pixel(8, 8, 0xFF000000);
//!
//! for format in [ImageFormat::Gif, ImageFormat::Png] {
//!     let bytes = encode(&image, &EncodeOptions::from(format)).unwrap();
//!     assert_eq!(ImageFormat::from_magic(&bytes), Some(format));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: [`encode_batch_parallel`] using rayon
//! - `async-io`: [`async_io::write_async`] for tokio sinks
//! - `serde`: serialize [`EncodeOptions`] and the per-format configs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

#[cfg(feature = "async-io")]
pub mod async_io;
pub mod batch;
pub mod format;

pub use batch::encode_batch;
#[cfg(feature = "parallel")]
pub use batch::encode_batch_parallel;
pub use format::ImageFormat;

pub use oxipix_core::{
    CompressionLevel, Crc32, ImageEncoder, OxiPixError, PixelBuffer, PixelSource, Result,
};
pub use oxipix_gif::{GifConfig, GifEncoder};
pub use oxipix_png::{FilterType, PngConfig, PngEncoder, Raster};

pub use oxipix_core;
pub use oxipix_gif;
pub use oxipix_png;

use std::io::Write;

/// Output format plus its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "format", rename_all = "lowercase"))]
pub enum EncodeOptions {
    /// Encode as GIF.
    Gif(GifConfig),
    /// Encode as PNG.
    Png(PngConfig),
}

impl EncodeOptions {
    /// The output format.
    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Gif(_) => ImageFormat::Gif,
            Self::Png(_) => ImageFormat::Png,
        }
    }

    /// MIME type of the output.
    pub fn content_type(&self) -> &'static str {
        self.format().content_type()
    }
}

impl From<ImageFormat> for EncodeOptions {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Gif => Self::Gif(GifConfig::default()),
            ImageFormat::Png => Self::Png(PngConfig::default()),
        }
    }
}

impl From<GifConfig> for EncodeOptions {
    fn from(config: GifConfig) -> Self {
        Self::Gif(config)
    }
}

impl From<PngConfig> for EncodeOptions {
    fn from(config: PngConfig) -> Self {
        Self::Png(config)
    }
}

/// Encode `source` and write the complete file to `writer`.
///
/// Nothing reaches `writer` unless encoding succeeds.
pub fn encode_to<S: PixelSource, W: Write>(
    source: S,
    options: &EncodeOptions,
    writer: &mut W,
) -> Result<()> {
    match options {
        EncodeOptions::Gif(config) => GifEncoder::new(*config).encode(source, writer),
        EncodeOptions::Png(config) => PngEncoder::new(*config).encode(source, writer),
    }
}

/// Encode `source` into a new byte vector.
pub fn encode<S: PixelSource>(source: S, options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_to(source, options, &mut out)?;
    Ok(out)
}
