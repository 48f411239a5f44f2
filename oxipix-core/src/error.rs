//! Error types for OxiPix operations.
//!
//! Every encoder in the workspace reports failure through [`OxiPixError`].
//! An encode call either produces a complete file or returns one of these
//! errors; there is no partial output.

use std::io;
use thiserror::Error;

/// The main error type for OxiPix operations.
#[derive(Debug, Error)]
pub enum OxiPixError {
    /// I/O error from the output sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Image has zero width or height.
    #[error("Nothing to encode: image is {width}x{height}")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// Dimensions do not match the pixel data or exceed a format field.
    #[error("Invalid dimensions {width}x{height}: {message}")]
    InvalidDimensions {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Description of the mismatch.
        message: String,
    },

    /// GIF palette would need more than 256 entries.
    #[error("Too many colors for a GIF: found more than {limit} distinct colors")]
    TooManyColors {
        /// Maximum palette size of the format.
        limit: usize,
    },

    /// The pixel source aborted while rows were being read.
    #[error("Pixel acquisition failed at row {row}: {message}")]
    PixelAcquisition {
        /// First row of the failed read.
        row: u32,
        /// Description of the failure.
        message: String,
    },

    /// Raster storage shape has no sample extraction.
    #[error("Unsupported raster layout: {message}")]
    UnsupportedLayout {
        /// Description of the storage shape.
        message: String,
    },

    /// Caller supplied an out-of-range parameter.
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the accepted range.
        message: String,
    },
}

/// Result type alias for OxiPix operations.
pub type Result<T> = std::result::Result<T, OxiPixError>;

impl OxiPixError {
    /// Create an empty image error.
    pub fn empty_image(width: u32, height: u32) -> Self {
        Self::EmptyImage { width, height }
    }

    /// Create an invalid dimensions error.
    pub fn invalid_dimensions(width: u32, height: u32, message: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            message: message.into(),
        }
    }

    /// Create a too-many-colors error.
    pub fn too_many_colors(limit: usize) -> Self {
        Self::TooManyColors { limit }
    }

    /// Create a pixel acquisition error.
    pub fn pixel_acquisition(row: u32, message: impl Into<String>) -> Self {
        Self::PixelAcquisition {
            row,
            message: message.into(),
        }
    }

    /// Create an unsupported layout error.
    pub fn unsupported_layout(message: impl Into<String>) -> Self {
        Self::UnsupportedLayout {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OxiPixError::too_many_colors(256);
        assert!(err.to_string().contains("Too many colors"));

        let err = OxiPixError::invalid_parameter("opacity", "must be within 0.0..=1.0");
        assert!(err.to_string().contains("opacity"));

        let err = OxiPixError::empty_image(0, 4);
        assert!(err.to_string().contains("0x4"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "sink closed");
        let err: OxiPixError = io_err.into();
        assert!(matches!(err, OxiPixError::Io(_)));
    }
}
