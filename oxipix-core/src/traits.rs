//! Core traits shared by the format encoders.

use crate::error::Result;
use crate::pixel::PixelSource;
use std::io::Write;

/// A one-shot image encoder.
///
/// An encode call consumes one pixel source and writes one complete,
/// standalone file. Encoders hold only configuration, so one instance can
/// serve any number of calls, including concurrent ones on separate sinks.
pub trait ImageEncoder {
    /// MIME type of the produced stream.
    const CONTENT_TYPE: &'static str;

    /// Encode `source` and write the complete file to `writer`.
    ///
    /// Nothing is written unless the whole image encodes successfully,
    /// except when the sink itself fails mid-stream.
    fn encode<S: PixelSource, W: Write>(&self, source: S, writer: &mut W) -> Result<()>;

    /// Encode `source` into a new byte vector.
    fn encode_to_vec<S: PixelSource>(&self, source: S) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.encode(source, &mut output)?;
        Ok(output)
    }
}

/// DEFLATE compression level (0-9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// No compression (stored blocks).
    pub const NONE: Self = Self(0);
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a compression level, clamping to 0-9.
    pub fn new(level: u8) -> Self {
        Self(level.min(9))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl From<CompressionLevel> for u8 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::PixelBuffer;

    #[test]
    fn test_compression_level() {
        assert_eq!(CompressionLevel::NONE.level(), 0);
        assert_eq!(CompressionLevel::FAST.level(), 1);
        assert_eq!(CompressionLevel::DEFAULT.level(), 6);
        assert_eq!(CompressionLevel::BEST.level(), 9);
        assert_eq!(CompressionLevel::default(), CompressionLevel::DEFAULT);

        // Clamped, not rejected
        assert_eq!(CompressionLevel::new(100).level(), 9);
        assert_eq!(u8::from(CompressionLevel::from(3)), 3);
    }

    struct RawDump;

    impl ImageEncoder for RawDump {
        const CONTENT_TYPE: &'static str = "application/octet-stream";

        fn encode<S: PixelSource, W: Write>(&self, mut source: S, writer: &mut W) -> Result<()> {
            for pixel in source.read_all()? {
                writer.write_all(&pixel.to_be_bytes())?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_encode_to_vec_default() {
        let image = PixelBuffer::new(1, 2, vec![0x01020304, 0x05060708]).unwrap();
        let bytes = RawDump.encode_to_vec(&image).unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
