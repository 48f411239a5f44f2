//! Direct access to native sample storage.
//!
//! A [`Raster`] exposes an image the way it already sits in memory: byte,
//! int or short samples with a band count and a little color-model
//! metadata. [`SampleLayout::detect`] inspects that metadata once per
//! encode and picks one of four supported shapes; anything else is
//! rejected rather than guessed at.
//!
//! | Storage           | Bands | Extra          | Layout              |
//! |-------------------|-------|----------------|---------------------|
//! | `u8`              | 4     |                | `ByteArgb` (A,R,G,B)|
//! | `u32`             | 1     | alpha flag     | `IntArgb`           |
//! | `u16`             | 1     | 565 or 555     | `Short565/555`      |
//! | `u8`              | 1     | palette        | `Indexed`           |

use crate::chunk::ColorType;
use oxipix_core::error::{OxiPixError, Result};

/// Largest palette PNG allows at bit depth 8.
pub const MAX_PALETTE_LEN: usize = 256;

/// Packing of 16-bit RGB samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortFormat {
    /// 5 bits red, 6 green, 5 blue.
    #[default]
    Rgb565,
    /// 5 bits each, top bit unused.
    Rgb555,
}

/// Borrowed sample storage.
#[derive(Debug, Clone, Copy)]
pub enum RasterData<'a> {
    /// One byte per sample.
    Byte(&'a [u8]),
    /// One packed int per sample.
    Int(&'a [u32]),
    /// One packed short per sample.
    Short(&'a [u16]),
}

impl RasterData<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Byte(data) => data.len(),
            Self::Int(data) => data.len(),
            Self::Short(data) => data.len(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Byte(_) => "byte",
            Self::Int(_) => "int",
            Self::Short(_) => "short",
        }
    }
}

/// An image in its native sample layout.
///
/// # Example
///
/// ```
/// use oxipix_png::raster::{Raster, SampleLayout};
///
/// let pixels = [0xFF112233u32, 0x80445566];
/// let raster = Raster::int_argb(2, 1, &pixels, true).unwrap();
/// assert_eq!(
///     SampleLayout::detect(&raster).unwrap(),
///     SampleLayout::IntArgb { alpha: true }
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    width: u32,
    height: u32,
    bands: usize,
    data: RasterData<'a>,
    has_alpha: bool,
    short_format: ShortFormat,
    palette: Option<&'a [[u8; 3]]>,
}

impl<'a> Raster<'a> {
    /// Wrap `data` holding `bands` samples per pixel, row-major.
    ///
    /// Only the storage size is checked here; whether the shape can be
    /// encoded is decided by [`SampleLayout::detect`].
    pub fn new(width: u32, height: u32, bands: usize, data: RasterData<'a>) -> Result<Self> {
        let expected = width as u64 * height as u64 * bands as u64;
        if data.len() as u64 != expected {
            return Err(OxiPixError::invalid_dimensions(
                width,
                height,
                format!(
                    "expected {} {} samples ({} bands), got {}",
                    expected,
                    data.kind(),
                    bands,
                    data.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            bands,
            data,
            has_alpha: false,
            short_format: ShortFormat::default(),
            palette: None,
        })
    }

    /// Four byte bands per pixel in A, R, G, B order.
    pub fn byte_argb(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        Self::new(width, height, 4, RasterData::Byte(data))
    }

    /// One packed `0xAARRGGBB` int per pixel.
    ///
    /// With `has_alpha` false the top byte is ignored.
    pub fn int_argb(width: u32, height: u32, data: &'a [u32], has_alpha: bool) -> Result<Self> {
        Ok(Self::new(width, height, 1, RasterData::Int(data))?.with_alpha(has_alpha))
    }

    /// One packed 16-bit RGB short per pixel.
    pub fn short_rgb(
        width: u32,
        height: u32,
        data: &'a [u16],
        format: ShortFormat,
    ) -> Result<Self> {
        Ok(Self::new(width, height, 1, RasterData::Short(data))?.with_short_format(format))
    }

    /// One palette index byte per pixel.
    pub fn indexed(
        width: u32,
        height: u32,
        data: &'a [u8],
        palette: &'a [[u8; 3]],
    ) -> Result<Self> {
        Ok(Self::new(width, height, 1, RasterData::Byte(data))?.with_palette(palette))
    }

    /// Mark packed int samples as carrying alpha.
    pub fn with_alpha(mut self, has_alpha: bool) -> Self {
        self.has_alpha = has_alpha;
        self
    }

    /// Set the packing of short samples.
    pub fn with_short_format(mut self, format: ShortFormat) -> Self {
        self.short_format = format;
        self
    }

    /// Attach an index color model.
    pub fn with_palette(mut self, palette: &'a [[u8; 3]]) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// The index color model, if any.
    pub fn palette(&self) -> Option<&'a [[u8; 3]]> {
        self.palette
    }
}

/// The supported storage shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// Four byte bands, A, R, G, B.
    ByteArgb,
    /// Packed ARGB ints; `alpha` is whether the top byte is meaningful.
    IntArgb {
        /// Top byte carries alpha.
        alpha: bool,
    },
    /// Packed 5-6-5 shorts.
    Short565,
    /// Packed 5-5-5 shorts.
    Short555,
    /// Palette indices.
    Indexed,
}

impl SampleLayout {
    /// Determine the layout of `raster`.
    pub fn detect(raster: &Raster<'_>) -> Result<Self> {
        match (raster.data, raster.bands, raster.palette) {
            (RasterData::Byte(_), 4, None) => Ok(Self::ByteArgb),
            (RasterData::Byte(_), 1, Some(palette)) => {
                if palette.is_empty() || palette.len() > MAX_PALETTE_LEN {
                    return Err(OxiPixError::unsupported_layout(format!(
                        "palette of {} entries",
                        palette.len()
                    )));
                }
                Ok(Self::Indexed)
            }
            (RasterData::Int(_), 1, None) => Ok(Self::IntArgb {
                alpha: raster.has_alpha,
            }),
            (RasterData::Short(_), 1, None) => Ok(match raster.short_format {
                ShortFormat::Rgb565 => Self::Short565,
                ShortFormat::Rgb555 => Self::Short555,
            }),
            (data, bands, palette) => Err(OxiPixError::unsupported_layout(format!(
                "{} storage with {} band(s){}",
                data.kind(),
                bands,
                if palette.is_some() { " and a palette" } else { "" }
            ))),
        }
    }

    /// Whether this layout can produce an alpha channel.
    pub fn supports_alpha(self) -> bool {
        match self {
            Self::ByteArgb => true,
            Self::IntArgb { alpha } => alpha,
            Self::Short565 | Self::Short555 | Self::Indexed => false,
        }
    }

    /// IHDR color type given the requested alpha setting.
    pub fn color_type(self, alpha: bool) -> ColorType {
        match self {
            Self::Indexed => ColorType::Indexed,
            _ if alpha && self.supports_alpha() => ColorType::Rgba,
            _ => ColorType::Rgb,
        }
    }

    /// Write the output bytes of row `y` into `out`.
    ///
    /// `color_type` must come from [`color_type`](Self::color_type) for
    /// this layout; `out` is exactly one row of that type.
    pub fn write_row(
        self,
        raster: &Raster<'_>,
        y: u32,
        color_type: ColorType,
        out: &mut [u8],
    ) -> Result<()> {
        let width = raster.width as usize;
        let start = y as usize * width;
        let bpp = color_type.bytes_per_pixel();
        let alpha = color_type == ColorType::Rgba;

        match (self, raster.data) {
            (Self::ByteArgb, RasterData::Byte(data)) => {
                let src = &data[start * 4..(start + width) * 4];
                for (dst, argb) in out.chunks_exact_mut(bpp).zip(src.chunks_exact(4)) {
                    dst[..3].copy_from_slice(&argb[1..4]);
                    if alpha {
                        dst[3] = argb[0];
                    }
                }
            }
            (Self::Indexed, RasterData::Byte(data)) => {
                out.copy_from_slice(&data[start..start + width]);
            }
            (Self::IntArgb { .. }, RasterData::Int(data)) => {
                for (dst, &argb) in out.chunks_exact_mut(bpp).zip(&data[start..start + width]) {
                    let [a, r, g, b] = argb.to_be_bytes();
                    dst[..3].copy_from_slice(&[r, g, b]);
                    if alpha {
                        dst[3] = a;
                    }
                }
            }
            (Self::Short565, RasterData::Short(data)) => {
                for (dst, &v) in out.chunks_exact_mut(bpp).zip(&data[start..start + width]) {
                    dst[..3].copy_from_slice(&rgb565(v));
                }
            }
            (Self::Short555, RasterData::Short(data)) => {
                for (dst, &v) in out.chunks_exact_mut(bpp).zip(&data[start..start + width]) {
                    dst[..3].copy_from_slice(&rgb555(v));
                }
            }
            (layout, data) => {
                return Err(OxiPixError::unsupported_layout(format!(
                    "{:?} does not match {} storage",
                    layout,
                    data.kind()
                )));
            }
        }
        Ok(())
    }
}

/// Expand a 5-6-5 short to 8-bit channels (low bits zero).
#[inline]
pub fn rgb565(v: u16) -> [u8; 3] {
    [
        ((v >> 8) & 0xF8) as u8,
        ((v >> 3) & 0xFC) as u8,
        ((v << 3) & 0xF8) as u8,
    ]
}

/// Expand a 5-5-5 short to 8-bit channels (low bits zero).
#[inline]
pub fn rgb555(v: u16) -> [u8; 3] {
    [
        ((v >> 7) & 0xF8) as u8,
        ((v >> 2) & 0xF8) as u8,
        ((v << 3) & 0xF8) as u8,
    ]
}

/// Palette as a 256-entry PLTE payload, zero padded.
pub fn plte_payload(palette: &[[u8; 3]]) -> Vec<u8> {
    let mut data = vec![0u8; MAX_PALETTE_LEN * 3];
    for (dst, rgb) in data.chunks_exact_mut(3).zip(palette) {
        dst.copy_from_slice(rgb);
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_supported_layouts() {
        let bytes = [0u8; 8];
        let ints = [0u32; 2];
        let shorts = [0u16; 2];
        let palette = [[1u8, 2, 3]; 4];

        let byte_argb = Raster::byte_argb(2, 1, &bytes).unwrap();
        assert_eq!(SampleLayout::detect(&byte_argb).unwrap(), SampleLayout::ByteArgb);

        let int_opaque = Raster::int_argb(2, 1, &ints, false).unwrap();
        assert_eq!(
            SampleLayout::detect(&int_opaque).unwrap(),
            SampleLayout::IntArgb { alpha: false }
        );

        let s565 = Raster::short_rgb(2, 1, &shorts, ShortFormat::Rgb565).unwrap();
        let s555 = Raster::short_rgb(2, 1, &shorts, ShortFormat::Rgb555).unwrap();
        assert_eq!(SampleLayout::detect(&s565).unwrap(), SampleLayout::Short565);
        assert_eq!(SampleLayout::detect(&s555).unwrap(), SampleLayout::Short555);

        let indexed = Raster::indexed(2, 1, &bytes[..2], &palette).unwrap();
        assert_eq!(SampleLayout::detect(&indexed).unwrap(), SampleLayout::Indexed);
    }

    #[test]
    fn test_detect_rejects_unknown_shapes() {
        let bytes = [0u8; 6];
        let ints = [0u32; 4];
        let palette = [[0u8; 3]; 2];

        let cases = [
            Raster::new(2, 1, 3, RasterData::Byte(&bytes)).unwrap(),
            Raster::new(6, 1, 1, RasterData::Byte(&bytes)).unwrap(),
            Raster::new(2, 1, 2, RasterData::Int(&ints)).unwrap(),
            Raster::new(4, 1, 1, RasterData::Int(&ints))
                .unwrap()
                .with_palette(&palette),
        ];
        for raster in &cases {
            let err = SampleLayout::detect(raster).unwrap_err();
            assert!(matches!(err, OxiPixError::UnsupportedLayout { .. }), "{:?}", raster);
        }
    }

    #[test]
    fn test_detect_rejects_oversized_palette() {
        let index = [0u8; 1];
        let palette = vec![[0u8; 3]; 257];
        let raster = Raster::indexed(1, 1, &index, &palette).unwrap();
        assert!(SampleLayout::detect(&raster).is_err());
    }

    #[test]
    fn test_storage_length_checked() {
        let bytes = [0u8; 7];
        let err = Raster::byte_argb(2, 1, &bytes).unwrap_err();
        assert!(matches!(err, OxiPixError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_alpha_eligibility() {
        assert!(SampleLayout::ByteArgb.supports_alpha());
        assert!(SampleLayout::IntArgb { alpha: true }.supports_alpha());
        assert!(!SampleLayout::IntArgb { alpha: false }.supports_alpha());
        assert!(!SampleLayout::Short565.supports_alpha());
        assert!(!SampleLayout::Indexed.supports_alpha());

        assert_eq!(SampleLayout::ByteArgb.color_type(true), ColorType::Rgba);
        assert_eq!(SampleLayout::ByteArgb.color_type(false), ColorType::Rgb);
        assert_eq!(SampleLayout::Short555.color_type(true), ColorType::Rgb);
        assert_eq!(SampleLayout::Indexed.color_type(true), ColorType::Indexed);
    }

    #[test]
    fn test_short_conversions() {
        assert_eq!(rgb565(0xFFFF), [0xF8, 0xFC, 0xF8]);
        assert_eq!(rgb565(0xF800), [0xF8, 0, 0]);
        assert_eq!(rgb565(0x07E0), [0, 0xFC, 0]);
        assert_eq!(rgb565(0x001F), [0, 0, 0xF8]);

        assert_eq!(rgb555(0x7FFF), [0xF8, 0xF8, 0xF8]);
        assert_eq!(rgb555(0x7C00), [0xF8, 0, 0]);
        assert_eq!(rgb555(0x03E0), [0, 0xF8, 0]);
        assert_eq!(rgb555(0x801F), [0, 0, 0xF8]);
    }

    #[test]
    fn test_write_row_byte_argb() {
        let bytes = [0x80, 1, 2, 3, 0xFF, 4, 5, 6];
        let raster = Raster::byte_argb(1, 2, &bytes).unwrap();
        let layout = SampleLayout::detect(&raster).unwrap();

        let mut rgba = [0u8; 4];
        layout.write_row(&raster, 1, ColorType::Rgba, &mut rgba).unwrap();
        assert_eq!(rgba, [4, 5, 6, 0xFF]);

        let mut rgb = [0u8; 3];
        layout.write_row(&raster, 0, ColorType::Rgb, &mut rgb).unwrap();
        assert_eq!(rgb, [1, 2, 3]);
    }

    #[test]
    fn test_write_row_int_and_indexed() {
        let ints = [0x11223344u32, 0xAABBCCDD];
        let raster = Raster::int_argb(2, 1, &ints, true).unwrap();
        let mut out = [0u8; 8];
        SampleLayout::IntArgb { alpha: true }
            .write_row(&raster, 0, ColorType::Rgba, &mut out)
            .unwrap();
        assert_eq!(out, [0x22, 0x33, 0x44, 0x11, 0xBB, 0xCC, 0xDD, 0xAA]);

        let indices = [3u8, 0, 1, 2];
        let palette = [[0u8; 3]; 4];
        let raster = Raster::indexed(2, 2, &indices, &palette).unwrap();
        let mut row = [0u8; 2];
        SampleLayout::Indexed
            .write_row(&raster, 1, ColorType::Indexed, &mut row)
            .unwrap();
        assert_eq!(row, [1, 2]);

        let err = SampleLayout::Short565
            .write_row(&raster, 0, ColorType::Rgb, &mut [0u8; 6])
            .unwrap_err();
        assert!(matches!(err, OxiPixError::UnsupportedLayout { .. }));
    }

    #[test]
    fn test_plte_payload_padding() {
        let data = plte_payload(&[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(data.len(), 768);
        assert_eq!(&data[..6], &[1, 2, 3, 4, 5, 6]);
        assert!(data[6..].iter().all(|&b| b == 0));
    }
}
