//! PNG encoder configuration.

use crate::chunk::MAX_CHUNK_LEN;
use crate::filter::FilterType;
use oxipix_core::error::{OxiPixError, Result};
use oxipix_core::traits::CompressionLevel;

/// Upper bound on the scanline working buffer of one row batch.
pub const MAX_BATCH_BYTES: usize = 32767;

/// PNG encoder configuration.
///
/// # Example
///
/// ```
/// use oxipix_core::CompressionLevel;
/// use oxipix_png::{FilterType, PngConfig};
///
/// let config = PngConfig::new()
///     .with_alpha(false)
///     .with_filter(FilterType::Up)
///     .with_level(CompressionLevel::BEST);
/// assert_eq!(config.filter, FilterType::Up);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PngConfig {
    /// Emit an alpha channel when the source can provide one.
    pub alpha: bool,
    /// Scanline filter applied to every row.
    pub filter: FilterType,
    /// DEFLATE level.
    pub level: CompressionLevel,
    /// Largest IDAT payload; longer compressed streams are split.
    pub max_idat_len: usize,
}

impl PngConfig {
    /// RGBA, Sub filter, level 6, one IDAT.
    pub const DEFAULT: Self = Self {
        alpha: true,
        filter: FilterType::Sub,
        level: CompressionLevel::DEFAULT,
        max_idat_len: MAX_CHUNK_LEN,
    };

    /// Create the default configuration.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Enable or disable the alpha channel.
    pub fn with_alpha(mut self, alpha: bool) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the scanline filter.
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// Set the DEFLATE level.
    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    /// Split compressed data into IDAT chunks of at most `len` bytes.
    pub fn with_max_idat_len(mut self, len: usize) -> Self {
        self.max_idat_len = len;
        self
    }

    /// Check the settings that cannot be clamped.
    pub fn validate(&self) -> Result<()> {
        if self.max_idat_len == 0 || self.max_idat_len > MAX_CHUNK_LEN {
            return Err(OxiPixError::invalid_parameter(
                "max_idat_len",
                format!("{} is outside 1..={}", self.max_idat_len, MAX_CHUNK_LEN),
            ));
        }
        Ok(())
    }
}

impl Default for PngConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Rows per batch for scanlines of `width` pixels at `bpp` bytes each.
///
/// Keeps `width * (bpp + 1) * rows` within [`MAX_BATCH_BYTES`], with at
/// least one row.
pub fn batch_rows(width: u32, bpp: usize) -> u32 {
    let per_row = (width as usize).saturating_mul(bpp + 1);
    if per_row == 0 {
        return 1;
    }
    (MAX_BATCH_BYTES / per_row).clamp(1, u32::MAX as usize) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PngConfig::default();
        assert!(config.alpha);
        assert_eq!(config.filter, FilterType::Sub);
        assert_eq!(config.level.level(), 6);
        assert_eq!(config.max_idat_len, MAX_CHUNK_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_idat_len() {
        assert!(PngConfig::new().with_max_idat_len(0).validate().is_err());
        assert!(PngConfig::new().with_max_idat_len(1).validate().is_ok());
        assert!(
            PngConfig::new()
                .with_max_idat_len(MAX_CHUNK_LEN + 1)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_batch_rows() {
        // 100 px RGBA: 500 bytes per row
        assert_eq!(batch_rows(100, 4), 65);
        assert_eq!(batch_rows(1, 3), 8191);
        // A single row already exceeds the cap
        assert_eq!(batch_rows(10_000, 4), 1);
        assert_eq!(batch_rows(0, 4), 1);
    }
}
