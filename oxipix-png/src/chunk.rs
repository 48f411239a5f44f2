//! PNG chunk framing.
//!
//! ```text
//! +--------+--------+==========+--------+
//! | length |  type  |   data   |  CRC   |
//! +--------+--------+==========+--------+
//!   4 (BE)    4        length     4 (BE)
//! ```
//!
//! The CRC covers type and data, never the length.

use oxipix_core::crc::Crc32;
use oxipix_core::error::{OxiPixError, Result};

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Largest chunk payload the length field allows (2^31 - 1).
pub const MAX_CHUNK_LEN: usize = 0x7FFF_FFFF;

/// Image header.
pub const IHDR: [u8; 4] = *b"IHDR";
/// Palette.
pub const PLTE: [u8; 4] = *b"PLTE";
/// Image data.
pub const IDAT: [u8; 4] = *b"IDAT";
/// Image trailer.
pub const IEND: [u8; 4] = *b"IEND";

/// PNG color type written to IHDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    /// 8-bit RGB triples.
    Rgb = 2,
    /// 8-bit palette indices.
    Indexed = 3,
    /// 8-bit RGBA quads.
    Rgba = 6,
}

impl ColorType {
    /// Bytes per pixel at bit depth 8.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Indexed => 1,
            Self::Rgba => 4,
        }
    }
}

/// IHDR payload. Bit depth is always 8 and the image is never interlaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color type.
    pub color_type: ColorType,
}

impl ImageHeader {
    /// Serialize to the 13-byte IHDR payload.
    pub fn to_bytes(&self) -> [u8; 13] {
        let mut data = [0u8; 13];
        data[0..4].copy_from_slice(&self.width.to_be_bytes());
        data[4..8].copy_from_slice(&self.height.to_be_bytes());
        data[8] = 8; // bit depth
        data[9] = self.color_type as u8;
        // compression, filter method, interlace: all 0
        data
    }
}

/// Append one framed chunk to `out`.
pub fn write_chunk(out: &mut Vec<u8>, kind: [u8; 4], data: &[u8]) -> Result<()> {
    if data.len() > MAX_CHUNK_LEN {
        return Err(OxiPixError::invalid_parameter(
            "chunk",
            format!(
                "{} payload of {} bytes exceeds the chunk length limit",
                String::from_utf8_lossy(&kind),
                data.len()
            ),
        ));
    }

    let mut crc = Crc32::new();
    crc.update(&kind);
    crc.update(data);

    out.reserve(12 + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(&kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iend_chunk() {
        let mut out = Vec::new();
        write_chunk(&mut out, IEND, &[]).unwrap();
        assert_eq!(
            out,
            vec![0, 0, 0, 0, b'I', b'E', b'N', b'D', 0xAE, 0x42, 0x60, 0x82]
        );
    }

    #[test]
    fn test_crc_excludes_length() {
        let mut out = Vec::new();
        write_chunk(&mut out, IDAT, b"abc").unwrap();
        assert_eq!(&out[0..4], &[0, 0, 0, 3]);
        let crc = u32::from_be_bytes([out[11], out[12], out[13], out[14]]);
        assert_eq!(crc, Crc32::compute(b"IDATabc"));
    }

    #[test]
    fn test_image_header_bytes() {
        let header = ImageHeader {
            width: 0x0102,
            height: 3,
            color_type: ColorType::Rgba,
        };
        assert_eq!(
            header.to_bytes(),
            [0, 0, 1, 2, 0, 0, 0, 3, 8, 6, 0, 0, 0]
        );
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(ColorType::Rgb.bytes_per_pixel(), 3);
        assert_eq!(ColorType::Rgba.bytes_per_pixel(), 4);
        assert_eq!(ColorType::Indexed.bytes_per_pixel(), 1);
    }
}
