//! PNG container writer.
//!
//! Both pixel-source variants share one pipeline:
//!
//! ```text
//! rows --> [sample extraction] --> scanlines --> [filter] --> zlib --> IDAT*
//!           PixelSource (ARGB)      filter byte
//!           Raster (native)         + pixel bytes
//! ```
//!
//! Rows are processed in batches of at most [`MAX_BATCH_BYTES`] scanline
//! bytes. The whole file is assembled in memory and handed to the sink in
//! one write, so a failed encode produces no output.
//!
//! [`MAX_BATCH_BYTES`]: crate::config::MAX_BATCH_BYTES

use crate::chunk::{
    ColorType, IDAT, IEND, IHDR, ImageHeader, MAX_CHUNK_LEN, PLTE, PNG_SIGNATURE, write_chunk,
};
use crate::config::{PngConfig, batch_rows};
use crate::filter::ScanlineFilter;
use crate::raster::{Raster, SampleLayout, plte_payload};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use oxipix_core::error::{OxiPixError, Result};
use oxipix_core::pixel::PixelSource;
use oxipix_core::traits::ImageEncoder;
use std::io::Write;

/// Where scanline bytes come from.
enum RowSource<'r> {
    /// Packed ARGB pulled from a pixel source.
    Pixels {
        source: &'r mut dyn PixelSource,
        argb: Vec<u32>,
    },
    /// Native samples read in place.
    Raster {
        raster: &'r Raster<'r>,
        layout: SampleLayout,
    },
}

impl RowSource<'_> {
    /// Fill `rows` scanlines starting at row `y`, leaving each filter-type
    /// byte for the filter engine.
    fn fill(
        &mut self,
        y: u32,
        rows: u32,
        width: usize,
        color_type: ColorType,
        scanlines: &mut [u8],
    ) -> Result<()> {
        let stride = width * color_type.bytes_per_pixel() + 1;
        match self {
            Self::Pixels { source, argb } => {
                let argb = &mut argb[..width * rows as usize];
                source.read_rows(y, rows, argb)?;
                let alpha = color_type == ColorType::Rgba;
                let lines = scanlines.chunks_exact_mut(stride);
                for (line, pixels) in lines.zip(argb.chunks_exact(width)) {
                    let dst = &mut line[1..];
                    if alpha {
                        for (out, &p) in dst.chunks_exact_mut(4).zip(pixels) {
                            let [a, r, g, b] = p.to_be_bytes();
                            out.copy_from_slice(&[r, g, b, a]);
                        }
                    } else {
                        for (out, &p) in dst.chunks_exact_mut(3).zip(pixels) {
                            out.copy_from_slice(&p.to_be_bytes()[1..]);
                        }
                    }
                }
            }
            Self::Raster { raster, layout } => {
                for (row, line) in (y..y + rows).zip(scanlines.chunks_exact_mut(stride)) {
                    layout.write_row(raster, row, color_type, &mut line[1..])?;
                }
            }
        }
        Ok(())
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(OxiPixError::empty_image(width, height));
    }
    if width as usize > MAX_CHUNK_LEN || height as usize > MAX_CHUNK_LEN {
        return Err(OxiPixError::invalid_dimensions(
            width,
            height,
            "PNG dimensions are limited to 2^31 - 1",
        ));
    }
    Ok(())
}

/// Run the shared pipeline and return the complete file.
fn assemble(
    mut rows: RowSource<'_>,
    width: u32,
    height: u32,
    color_type: ColorType,
    palette: Option<&[[u8; 3]]>,
    config: &PngConfig,
) -> Result<Vec<u8>> {
    config.validate()?;

    let bpp = color_type.bytes_per_pixel();
    let mut out = Vec::new();
    out.extend_from_slice(&PNG_SIGNATURE);
    let header = ImageHeader {
        width,
        height,
        color_type,
    };
    write_chunk(&mut out, IHDR, &header.to_bytes())?;
    if let Some(palette) = palette {
        write_chunk(&mut out, PLTE, &plte_payload(palette))?;
    }

    let width = width as usize;
    let batch = batch_rows(width as u32, bpp).min(height);
    let mut filter = ScanlineFilter::new(config.filter, bpp, width);
    let stride = filter.stride();
    let mut scanlines = vec![0u8; stride * batch as usize];
    if let RowSource::Pixels { argb, .. } = &mut rows {
        argb.resize(width * batch as usize, 0);
    }

    let mut zlib = ZlibEncoder::new(Vec::new(), Compression::new(config.level.level() as u32));
    let mut y = 0;
    while y < height {
        let count = batch.min(height - y);
        let lines = &mut scanlines[..stride * count as usize];
        rows.fill(y, count, width, color_type, lines)?;
        filter.apply(lines);
        zlib.write_all(lines)?;
        log::trace!("png: rows {}..{} filtered and deflated", y, y + count);
        y += count;
    }
    let compressed = zlib.finish()?;

    let idat_chunks = compressed.chunks(config.max_idat_len);
    let idat_count = idat_chunks.len();
    for data in idat_chunks {
        write_chunk(&mut out, IDAT, data)?;
    }
    write_chunk(&mut out, IEND, &[])?;

    log::debug!(
        "png: {}x{} {:?}, filter {:?}, level {}, {} compressed bytes in {} IDAT, {} bytes total",
        width,
        height,
        color_type,
        config.filter,
        config.level.level(),
        compressed.len(),
        idat_count,
        out.len()
    );
    Ok(out)
}

/// PNG encoder.
///
/// Encodes [`PixelSource`]s through [`ImageEncoder`] (truecolor, with or
/// without alpha) and native [`Raster`]s through
/// [`encode_raster`](Self::encode_raster) (truecolor or indexed).
///
/// # Example
///
/// ```
/// use oxipix_core::{ImageEncoder, PixelBuffer};
/// use oxipix_png::{PngConfig, PngEncoder};
///
/// let image = PixelBuffer::filled(8, 8, 0x80FF8000);
/// let png = PngEncoder::new(PngConfig::default()).encode_to_vec(&image).unwrap();
/// assert_eq!(&png[1..4], b"PNG");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder {
    config: PngConfig,
}

impl PngEncoder {
    /// Create an encoder with the given configuration.
    pub fn new(config: PngConfig) -> Self {
        Self { config }
    }

    /// The encoder configuration.
    pub fn config(&self) -> &PngConfig {
        &self.config
    }

    /// Encode a raster in its native sample layout.
    ///
    /// Alpha is written only when both the configuration asks for it and
    /// the layout carries it. Indexed rasters always produce color type 3
    /// with a 256-entry PLTE.
    pub fn encode_raster<W: Write>(&self, raster: &Raster<'_>, writer: &mut W) -> Result<()> {
        let (width, height) = (raster.width(), raster.height());
        check_dimensions(width, height)?;

        let layout = SampleLayout::detect(raster)?;
        let color_type = layout.color_type(self.config.alpha);
        let palette = match layout {
            SampleLayout::Indexed => raster.palette(),
            _ => None,
        };
        log::debug!("png: raster layout {:?} -> {:?}", layout, color_type);

        let rows = RowSource::Raster { raster, layout };
        let png = assemble(rows, width, height, color_type, palette, &self.config)?;
        writer.write_all(&png)?;
        Ok(())
    }

    /// Encode a raster into a new byte vector.
    pub fn encode_raster_to_vec(&self, raster: &Raster<'_>) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_raster(raster, &mut out)?;
        Ok(out)
    }
}

impl ImageEncoder for PngEncoder {
    const CONTENT_TYPE: &'static str = "image/png";

    fn encode<S: PixelSource, W: Write>(&self, mut source: S, writer: &mut W) -> Result<()> {
        let (width, height) = (source.width(), source.height());
        check_dimensions(width, height)?;

        let color_type = if self.config.alpha {
            ColorType::Rgba
        } else {
            ColorType::Rgb
        };
        let rows = RowSource::Pixels {
            source: &mut source,
            argb: Vec::new(),
        };
        let png = assemble(rows, width, height, color_type, None, &self.config)?;
        writer.write_all(&png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterType;
    use crate::raster::ShortFormat;
    use flate2::read::ZlibDecoder;
    use oxipix_core::{CompressionLevel, PixelBuffer};
    use std::io::Read;

    /// (type, payload) for every chunk after the signature.
    fn chunks(png: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        let mut rest = &png[8..];
        let mut out = Vec::new();
        while !rest.is_empty() {
            let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
            let kind = [rest[4], rest[5], rest[6], rest[7]];
            out.push((kind, rest[8..8 + len].to_vec()));
            rest = &rest[12 + len..];
        }
        out
    }

    /// Filtered scanlines recovered from the IDAT stream.
    fn scanlines(png: &[u8]) -> Vec<u8> {
        let idat: Vec<u8> = chunks(png)
            .into_iter()
            .filter(|(kind, _)| *kind == IDAT)
            .flat_map(|(_, data)| data)
            .collect();
        let mut raw = Vec::new();
        ZlibDecoder::new(&idat[..]).read_to_end(&mut raw).unwrap();
        raw
    }

    #[test]
    fn test_sub_filter_bytes_2x2() {
        let image = PixelBuffer::new(
            2,
            2,
            vec![0xFF102030, 0xFF152535, 0x80010203, 0x40FFFFFF],
        )
        .unwrap();
        let config = PngConfig::new().with_filter(FilterType::Sub);
        let png = PngEncoder::new(config).encode_to_vec(&image).unwrap();

        assert_eq!(
            scanlines(&png),
            vec![
                1, 0x10, 0x20, 0x30, 0xFF, 0x05, 0x05, 0x05, 0x00, //
                1, 0x01, 0x02, 0x03, 0x80, 0xFE, 0xFD, 0xFC, 0xC0,
            ]
        );
    }

    #[test]
    fn test_up_filter_uses_unfiltered_rows() {
        let image = PixelBuffer::new(1, 3, vec![0xFF0A141E, 0xFF0F1419, 0xFF0F1E00]).unwrap();
        let config = PngConfig::new()
            .with_alpha(false)
            .with_filter(FilterType::Up);
        let png = PngEncoder::new(config).encode_to_vec(&image).unwrap();

        assert_eq!(
            scanlines(&png),
            vec![
                2, 10, 20, 30, //
                2, 5, 0, 251, //
                2, 0, 10, 231,
            ]
        );
    }

    #[test]
    fn test_none_filter_is_raw_rgb() {
        let image = PixelBuffer::new(2, 1, vec![0x00ABCDEF, 0xFF010203]).unwrap();
        let config = PngConfig::new()
            .with_alpha(false)
            .with_filter(FilterType::None);
        let png = PngEncoder::new(config).encode_to_vec(&image).unwrap();
        assert_eq!(scanlines(&png), vec![0, 0xAB, 0xCD, 0xEF, 1, 2, 3]);
    }

    #[test]
    fn test_chunk_sequence() {
        let image = PixelBuffer::filled(3, 2, 0xFF000000);
        let png = PngEncoder::default().encode_to_vec(&image).unwrap();
        let kinds: Vec<[u8; 4]> = chunks(&png).into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![IHDR, IDAT, IEND]);

        let ihdr = &chunks(&png)[0].1;
        assert_eq!(ihdr, &[0, 0, 0, 3, 0, 0, 0, 2, 8, 6, 0, 0, 0]);
    }

    #[test]
    fn test_idat_split() {
        let pixels = (0..64 * 64)
            .map(|i: u32| 0xFF000000 | (i.wrapping_mul(2654435761) >> 8))
            .collect();
        let image = PixelBuffer::new(64, 64, pixels).unwrap();

        let single = PngEncoder::default().encode_to_vec(&image).unwrap();
        let config = PngConfig::new().with_max_idat_len(1000);
        let split = PngEncoder::new(config).encode_to_vec(&image).unwrap();

        let idats: Vec<usize> = chunks(&split)
            .into_iter()
            .filter(|(kind, _)| *kind == IDAT)
            .map(|(_, data)| data.len())
            .collect();
        assert!(idats.len() > 1);
        assert!(idats.iter().all(|&len| len <= 1000));
        assert!(idats[..idats.len() - 1].iter().all(|&len| len == 1000));
        assert_eq!(scanlines(&split), scanlines(&single));
    }

    #[test]
    fn test_batches_match_single_pass() {
        // 300 px wide RGBA: 21 rows per batch, so 50 rows span three batches
        let pixels = (0..300 * 50)
            .map(|i: u32| 0xFF000000 | ((i % 300) << 8) | (i / 300))
            .collect();
        let image = PixelBuffer::new(300, 50, pixels).unwrap();
        assert_eq!(batch_rows(300, 4), 21);

        let config = PngConfig::new().with_filter(FilterType::Up);
        let raw = scanlines(&PngEncoder::new(config).encode_to_vec(&image).unwrap());

        let mut filter = ScanlineFilter::new(FilterType::Up, 4, 300);
        let mut expected = Vec::new();
        for y in 0..50 {
            let mut line = vec![0u8];
            for x in 0..300 {
                let [a, r, g, b] = image.pixel(x, y).to_be_bytes();
                line.extend_from_slice(&[r, g, b, a]);
            }
            filter.apply(&mut line);
            expected.extend_from_slice(&line);
        }
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_indexed_raster_writes_plte() {
        let indices = [0u8, 1, 1, 0];
        let palette = [[255u8, 0, 0], [0, 0, 255]];
        let raster = Raster::indexed(2, 2, &indices, &palette).unwrap();
        let png = PngEncoder::default().encode_raster_to_vec(&raster).unwrap();

        let chunks = chunks(&png);
        assert_eq!(chunks[0].1[9], 3);
        assert_eq!(chunks[1].0, PLTE);
        assert_eq!(chunks[1].1.len(), 768);
        assert_eq!(&chunks[1].1[..6], &[255, 0, 0, 0, 0, 255]);
        // Sub on 1-byte pixels
        assert_eq!(scanlines(&png), vec![1, 0, 1, 1, 1, 255]);
    }

    #[test]
    fn test_short_raster_ignores_alpha() {
        let shorts = [0xF800u16, 0x001F];
        let raster = Raster::short_rgb(2, 1, &shorts, ShortFormat::Rgb565).unwrap();
        let config = PngConfig::new().with_filter(FilterType::None);
        let png = PngEncoder::new(config).encode_raster_to_vec(&raster).unwrap();

        assert_eq!(chunks(&png)[0].1[9], 2);
        assert_eq!(scanlines(&png), vec![0, 0xF8, 0, 0, 0, 0, 0xF8]);
    }

    #[test]
    fn test_empty_and_invalid_inputs() {
        let empty = PixelBuffer::new(5, 0, Vec::new()).unwrap();
        let err = PngEncoder::default().encode_to_vec(&empty).unwrap_err();
        assert!(matches!(err, OxiPixError::EmptyImage { .. }));

        let image = PixelBuffer::filled(1, 1, 0);
        let config = PngConfig::new().with_max_idat_len(0);
        let mut out = Vec::new();
        let err = PngEncoder::new(config).encode(&image, &mut out).unwrap_err();
        assert!(matches!(err, OxiPixError::InvalidParameter { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_compression_levels() {
        let image = PixelBuffer::filled(64, 64, 0xFF336699);
        let stored = PngEncoder::new(PngConfig::new().with_level(CompressionLevel::NONE))
            .encode_to_vec(&image)
            .unwrap();
        let best = PngEncoder::new(PngConfig::new().with_level(CompressionLevel::BEST))
            .encode_to_vec(&image)
            .unwrap();
        assert!(best.len() < stored.len());
        assert_eq!(scanlines(&best), scanlines(&stored));
    }
}
