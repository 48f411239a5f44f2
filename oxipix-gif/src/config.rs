//! GIF encoder configuration and LZW constants.

/// Maximum LZW code width in bits.
pub const MAX_BITS: u8 = 12;

/// Number of codes addressable at [`MAX_BITS`]; the table never grows past it.
pub const MAX_MAX_CODE: u32 = 1 << MAX_BITS;

/// Hash table size: a prime giving roughly 80% occupancy at 4096 codes.
pub const HASH_SIZE: usize = 5003;

/// GIF encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GifConfig {
    /// Deliver rows in the 4-pass interlace order and flag the descriptor.
    pub interlaced: bool,
    /// Logical screen background color index.
    pub background_index: u8,
}

impl GifConfig {
    /// Progressive rows, background index 0.
    pub const DEFAULT: Self = Self {
        interlaced: false,
        background_index: 0,
    };

    /// Interlaced rows, background index 0.
    pub const INTERLACED: Self = Self {
        interlaced: true,
        background_index: 0,
    };

    /// Create the default configuration.
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Enable or disable interlacing.
    pub fn with_interlace(mut self, interlaced: bool) -> Self {
        self.interlaced = interlaced;
        self
    }

    /// Set the background color index.
    pub fn with_background(mut self, index: u8) -> Self {
        self.background_index = index;
        self
    }
}

/// LZW minimum code size byte for a palette bit depth.
///
/// GIF requires at least 2 even for two-color images.
pub fn min_code_size(bit_depth: u8) -> u8 {
    bit_depth.max(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GifConfig::new();
        assert!(!config.interlaced);
        assert_eq!(config.background_index, 0);
        assert_eq!(config, GifConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = GifConfig::new().with_interlace(true).with_background(3);
        assert!(config.interlaced);
        assert_eq!(config.background_index, 3);
        assert_eq!(GifConfig::INTERLACED.with_background(3), config);
    }

    #[test]
    fn test_min_code_size() {
        assert_eq!(min_code_size(1), 2);
        assert_eq!(min_code_size(2), 2);
        assert_eq!(min_code_size(4), 4);
        assert_eq!(min_code_size(8), 8);
    }

    #[test]
    fn test_constants() {
        assert_eq!(MAX_MAX_CODE, 4096);
        assert!(HASH_SIZE > MAX_MAX_CODE as usize);
    }
}
