//! GIF89a container writer.
//!
//! # Stream layout
//!
//! ```text
//! "GIF89a"
//! logical screen descriptor   width, height (LE u16), packed, background, aspect=0
//! global color table          3 * (1 << bit_depth) bytes
//! [graphic control extension] only when a transparent index is set
//! image descriptor            ',' left=0 top=0 width height packed(0x40 = interlaced)
//! LZW minimum code size
//! LZW data sub-blocks, 0x00 terminator
//! ';'
//! ```

use crate::config::{GifConfig, min_code_size};
use crate::interlace::RowOrder;
use crate::lzw::LzwCompressor;
use crate::quantize::quantize;
use oxipix_core::error::{OxiPixError, Result};
use oxipix_core::pixel::PixelSource;
use oxipix_core::traits::ImageEncoder;
use std::io::Write;

/// GIF signature and version.
pub const GIF_MAGIC: &[u8; 6] = b"GIF89a";

const EXTENSION_INTRODUCER: u8 = b'!';
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const IMAGE_SEPARATOR: u8 = b',';
const TRAILER: u8 = b';';

/// A fully quantized image ready to be written as one GIF.
#[derive(Debug, Clone, Copy)]
pub struct IndexedImage<'a> {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
    /// Background color index.
    pub background: u8,
    /// Transparent color index, if any.
    pub transparent: Option<u8>,
    /// Bits per index (1-8).
    pub bit_depth: u8,
    /// Global color table, exactly `1 << bit_depth` entries.
    pub palette: &'a [[u8; 3]],
    /// Row-major palette indices.
    pub indices: &'a [u8],
    /// Store rows in 4-pass interlace order.
    pub interlaced: bool,
}

impl IndexedImage<'_> {
    fn validate(&self) -> Result<()> {
        if !(1..=8).contains(&self.bit_depth) {
            return Err(OxiPixError::invalid_parameter(
                "bit_depth",
                format!("{} is outside 1..=8", self.bit_depth),
            ));
        }
        let table_size = 1usize << self.bit_depth;
        if self.palette.len() != table_size {
            return Err(OxiPixError::invalid_parameter(
                "palette",
                format!(
                    "{} entries, bit depth {} needs {}",
                    self.palette.len(),
                    self.bit_depth,
                    table_size
                ),
            ));
        }
        let pixels = self.width as usize * self.height as usize;
        if self.indices.len() != pixels {
            return Err(OxiPixError::invalid_dimensions(
                self.width as u32,
                self.height as u32,
                format!("expected {} indices, got {}", pixels, self.indices.len()),
            ));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= table_size) {
            return Err(OxiPixError::invalid_parameter(
                "indices",
                format!("index {} outside a {}-entry palette", bad, table_size),
            ));
        }
        Ok(())
    }
}

/// Write `image` as a complete GIF89a stream.
pub fn write_gif<W: Write>(writer: &mut W, image: &IndexedImage<'_>) -> Result<()> {
    image.validate()?;

    let mut out = Vec::with_capacity(32 + image.palette.len() * 3 + image.indices.len());

    out.extend_from_slice(GIF_MAGIC);

    // Logical screen descriptor
    out.extend_from_slice(&image.width.to_le_bytes());
    out.extend_from_slice(&image.height.to_le_bytes());
    // Global color table present, 8-bit color resolution, unsorted
    out.push(0x80 | ((8 - 1) << 4) | (image.bit_depth - 1));
    out.push(image.background);
    // Nonzero aspect ratios trip up some decoders
    out.push(0);

    for rgb in image.palette {
        out.extend_from_slice(rgb);
    }

    if let Some(index) = image.transparent {
        out.extend_from_slice(&[
            EXTENSION_INTRODUCER,
            GRAPHIC_CONTROL_LABEL,
            4, // block size
            1, // transparent color flag
            0,
            0, // delay
            index,
            0, // block terminator
        ]);
    }

    // Image descriptor
    out.push(IMAGE_SEPARATOR);
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&image.width.to_le_bytes());
    out.extend_from_slice(&image.height.to_le_bytes());
    out.push(if image.interlaced { 0x40 } else { 0x00 });

    let code_size = min_code_size(image.bit_depth);
    out.push(code_size);

    let width = image.width as usize;
    let symbols = RowOrder::new(image.height as u32, image.interlaced).flat_map(|row| {
        let start = row as usize * width;
        image.indices[start..start + width].iter().copied()
    });
    let mut lzw = LzwCompressor::new(code_size, out)?;
    lzw.compress(symbols)?;
    let mut out = lzw.into_inner();

    out.push(0);
    out.push(TRAILER);

    writer.write_all(&out)?;
    Ok(())
}

/// GIF encoder for ARGB pixel sources.
///
/// # Example
///
/// ```
/// use oxipix_core::{ImageEncoder, PixelBuffer};
/// use oxipix_gif::{GifConfig, GifEncoder};
///
/// let image = PixelBuffer::new(2, 2, vec![0xFF000000, 0xFFFFFFFF, 0xFFFFFFFF, 0xFF000000]).unwrap();
/// let gif = GifEncoder::new(GifConfig::default()).encode_to_vec(&image).unwrap();
/// assert!(gif.starts_with(b"GIF89a"));
/// assert_eq!(gif.last(), Some(&b';'));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GifEncoder {
    config: GifConfig,
}

impl GifEncoder {
    /// Create an encoder with the given configuration.
    pub fn new(config: GifConfig) -> Self {
        Self { config }
    }

    /// The encoder configuration.
    pub fn config(&self) -> &GifConfig {
        &self.config
    }
}

impl ImageEncoder for GifEncoder {
    const CONTENT_TYPE: &'static str = "image/gif";

    fn encode<S: PixelSource, W: Write>(&self, mut source: S, writer: &mut W) -> Result<()> {
        let (width, height) = (source.width(), source.height());
        if width == 0 || height == 0 {
            return Err(OxiPixError::empty_image(width, height));
        }
        let (Ok(gif_width), Ok(gif_height)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(OxiPixError::invalid_dimensions(
                width,
                height,
                "GIF dimensions are limited to 65535",
            ));
        };

        let mut pixels = source.read_all()?;
        let quantized = quantize(&mut pixels)?;
        let palette = quantized.palette.color_table();

        log::debug!(
            "gif: {}x{}, {} colors, depth {}, transparent {:?}",
            width,
            height,
            quantized.palette.len(),
            quantized.palette.bit_depth(),
            quantized.palette.transparent_index()
        );

        write_gif(
            writer,
            &IndexedImage {
                width: gif_width,
                height: gif_height,
                background: self.config.background_index,
                transparent: quantized.palette.transparent_index(),
                bit_depth: quantized.palette.bit_depth(),
                palette: &palette,
                indices: &quantized.indices,
                interlaced: self.config.interlaced,
            },
        )
    }
}
