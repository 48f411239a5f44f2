//! Pixel buffers and the pixel-source contract shared by both encoders.
//!
//! Pixels are packed 32-bit ARGB values (`0xAARRGGBB`) in row-major order.
//! Encoders never hand pixels back to the caller; they pull rows from a
//! [`PixelSource`] synchronously, top to bottom or in whatever order the
//! output format needs.

use crate::error::{OxiPixError, Result};

/// Alpha component of a packed ARGB pixel.
#[inline(always)]
pub fn alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

/// Red component of a packed ARGB pixel.
#[inline(always)]
pub fn red(argb: u32) -> u8 {
    (argb >> 16) as u8
}

/// Green component of a packed ARGB pixel.
#[inline(always)]
pub fn green(argb: u32) -> u8 {
    (argb >> 8) as u8
}

/// Blue component of a packed ARGB pixel.
#[inline(always)]
pub fn blue(argb: u32) -> u8 {
    argb as u8
}

/// Pack four channels into an ARGB pixel.
#[inline(always)]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// A synchronous, row-oriented supplier of ARGB pixels.
///
/// This is the only boundary between the encoders and whatever produced the
/// image. Implementations may fail a read (a decoder gave up, a canvas was
/// disposed); the encoder then aborts with no output.
pub trait PixelSource {
    /// Image width in pixels.
    fn width(&self) -> u32;

    /// Image height in pixels.
    fn height(&self) -> u32;

    /// Copy `rows` rows starting at row `y` into `out`.
    ///
    /// `out` holds at least `width * rows` pixels. Callers never request
    /// rows past the bottom of the image.
    fn read_rows(&mut self, y: u32, rows: u32, out: &mut [u32]) -> Result<()>;

    /// Read the whole image into a new row-major buffer.
    fn read_all(&mut self) -> Result<Vec<u32>> {
        let (width, height) = (self.width(), self.height());
        let mut pixels = vec![0u32; width as usize * height as usize];
        self.read_rows(0, height, &mut pixels)?;
        Ok(pixels)
    }
}

impl<S: PixelSource + ?Sized> PixelSource for &mut S {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn read_rows(&mut self, y: u32, rows: u32, out: &mut [u32]) -> Result<()> {
        (**self).read_rows(y, rows, out)
    }
}

/// An owned, validated image of packed ARGB pixels.
///
/// # Example
///
/// ```
/// use oxipix_core::PixelBuffer;
///
/// let image = PixelBuffer::new(2, 1, vec![0xFF000000, 0xFFFFFFFF]).unwrap();
/// assert_eq!(image.pixel(1, 0), 0xFFFFFFFF);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Wrap row-major ARGB pixels.
    ///
    /// Fails when `pixels.len() != width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = width as u64 * height as u64;
        if pixels.len() as u64 != expected {
            return Err(OxiPixError::invalid_dimensions(
                width,
                height,
                format!("expected {} pixels, got {}", expected, pixels.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer filled with one color.
    pub fn filled(width: u32, height: u32, argb: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![argb; width as usize * height as usize],
        }
    }

    /// Build a buffer from tightly packed RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        if rgba.len() % 4 != 0 {
            return Err(OxiPixError::invalid_dimensions(
                width,
                height,
                format!("RGBA data length {} is not a multiple of 4", rgba.len()),
            ));
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| pack_argb(p[3], p[0], p[1], p[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major ARGB pixels.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Overwrite the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics when the coordinate is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, argb: u32) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize] = argb;
    }

    /// Give every pixel whose RGB equals `rgb` the alpha for `opacity`.
    ///
    /// `opacity` runs from `0.0` (fully transparent) to `1.0` (opaque). The
    /// value is checked before any pixel changes. Returns how many pixels
    /// were rewritten.
    pub fn set_color_opacity(&mut self, rgb: u32, opacity: f32) -> Result<usize> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(OxiPixError::invalid_parameter(
                "opacity",
                format!("{} is outside 0.0..=1.0", opacity),
            ));
        }

        let alpha = ((opacity * 255.0).round() as u32) << 24;
        let rgb = rgb & 0x00FF_FFFF;
        let mut changed = 0;
        for pixel in self.pixels.iter_mut().filter(|p| **p & 0x00FF_FFFF == rgb) {
            *pixel = alpha | rgb;
            changed += 1;
        }
        Ok(changed)
    }

    /// Consume the buffer and return its pixels.
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }
}

impl PixelSource for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_rows(&mut self, y: u32, rows: u32, out: &mut [u32]) -> Result<()> {
        self.copy_rows(y, rows, out)
    }
}

impl PixelSource for &PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_rows(&mut self, y: u32, rows: u32, out: &mut [u32]) -> Result<()> {
        self.copy_rows(y, rows, out)
    }
}

impl PixelBuffer {
    fn copy_rows(&self, y: u32, rows: u32, out: &mut [u32]) -> Result<()> {
        if y as u64 + rows as u64 > self.height as u64 {
            return Err(OxiPixError::pixel_acquisition(
                y,
                format!(
                    "rows {}..{} exceed height {}",
                    y,
                    y as u64 + rows as u64,
                    self.height
                ),
            ));
        }
        let width = self.width as usize;
        let start = y as usize * width;
        let len = rows as usize * width;
        out[..len].copy_from_slice(&self.pixels[start..start + len]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_helpers() {
        let p = pack_argb(0x80, 0x11, 0x22, 0x33);
        assert_eq!(p, 0x80112233);
        assert_eq!(alpha(p), 0x80);
        assert_eq!(red(p), 0x11);
        assert_eq!(green(p), 0x22);
        assert_eq!(blue(p), 0x33);
    }

    #[test]
    fn test_length_mismatch() {
        let err = PixelBuffer::new(3, 3, vec![0; 8]).unwrap_err();
        assert!(matches!(err, OxiPixError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_from_rgba8() {
        let image = PixelBuffer::from_rgba8(2, 1, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(image.pixels(), &[0x04010203, 0x08050607]);

        assert!(PixelBuffer::from_rgba8(1, 1, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_read_rows() {
        let mut image = PixelBuffer::new(2, 3, (0..6).collect()).unwrap();
        let mut out = [0u32; 4];
        image.read_rows(1, 2, &mut out).unwrap();
        assert_eq!(out, [2, 3, 4, 5]);

        let err = image.read_rows(2, 2, &mut out).unwrap_err();
        assert!(matches!(err, OxiPixError::PixelAcquisition { row: 2, .. }));
    }

    #[test]
    fn test_read_all_through_reference() {
        let image = PixelBuffer::new(2, 2, vec![9, 8, 7, 6]).unwrap();
        let mut source = &image;
        assert_eq!(source.read_all().unwrap(), vec![9, 8, 7, 6]);
    }

    #[test]
    fn test_set_color_opacity() {
        let mut image =
            PixelBuffer::new(3, 1, vec![0xFFFF0000, 0x80FF0000, 0xFF00FF00]).unwrap();
        let changed = image.set_color_opacity(0xFF0000, 0.0).unwrap();
        assert_eq!(changed, 2);
        assert_eq!(image.pixels(), &[0x00FF0000, 0x00FF0000, 0xFF00FF00]);

        image.set_color_opacity(0x00FF00, 0.5).unwrap();
        assert_eq!(alpha(image.pixel(2, 0)), 128);
    }

    #[test]
    fn test_set_color_opacity_rejects_out_of_range() {
        let mut image = PixelBuffer::filled(1, 1, 0xFF123456);
        for bad in [-0.1, 1.5, f32::NAN, f32::INFINITY] {
            let err = image.set_color_opacity(0x123456, bad).unwrap_err();
            assert!(matches!(err, OxiPixError::InvalidParameter { name: "opacity", .. }));
        }
        assert_eq!(image.pixel(0, 0), 0xFF123456);
    }
}
