//! Scanline filter engine.
//!
//! PNG prefixes every scanline with a filter-type byte and stores each
//! sample as a difference from a predictor. Only the three cheapest
//! predictors are offered:
//!
//! | Type | Predictor                                  |
//! |------|--------------------------------------------|
//! | 0    | none                                       |
//! | 1    | byte `bpp` positions to the left (Sub)     |
//! | 2    | byte at the same position one row up (Up)  |
//!
//! All predictors use the *unfiltered* neighbor values. Sub restarts at
//! every row, so the first pixel of a row is stored as-is. Up reads from
//! zeros above the first row.

use oxipix_core::error::{OxiPixError, Result};

/// Scanline filter selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum FilterType {
    /// Raw bytes.
    None = 0,
    /// Difference from the pixel to the left.
    #[default]
    Sub = 1,
    /// Difference from the pixel above.
    Up = 2,
}

impl FilterType {
    /// Parse a PNG filter-type byte.
    ///
    /// Average and Paeth (3 and 4) are valid PNG but not produced here.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            _ => Err(OxiPixError::invalid_parameter(
                "filter",
                format!("unsupported filter type {}", value),
            )),
        }
    }

    /// The filter-type byte written before each scanline.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for FilterType {
    type Error = OxiPixError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value)
    }
}

/// Per-encode filter state.
///
/// Owns the prior-row buffer that Up needs across row batches. One
/// instance serves exactly one image.
#[derive(Debug)]
pub struct ScanlineFilter {
    filter: FilterType,
    bpp: usize,
    row_len: usize,
    /// Unfiltered bytes of the previous row.
    prior_row: Vec<u8>,
    scratch: Vec<u8>,
}

impl ScanlineFilter {
    /// Create filter state for rows of `width` pixels at `bpp` bytes each.
    pub fn new(filter: FilterType, bpp: usize, width: usize) -> Self {
        let row_len = width * bpp;
        let (prior_row, scratch) = match filter {
            FilterType::Up => (vec![0; row_len], vec![0; row_len]),
            _ => (Vec::new(), Vec::new()),
        };
        Self {
            filter,
            bpp,
            row_len,
            prior_row,
            scratch,
        }
    }

    /// The selected filter.
    pub fn filter_type(&self) -> FilterType {
        self.filter
    }

    /// Bytes in one scanline including its filter-type byte.
    pub fn stride(&self) -> usize {
        self.row_len + 1
    }

    /// Filter one row of pixel bytes in place (no filter-type byte).
    pub fn filter_row(&mut self, row: &mut [u8]) {
        debug_assert_eq!(row.len(), self.row_len);
        match self.filter {
            FilterType::None => {}
            FilterType::Sub => {
                // Right to left so every subtrahend is still unfiltered.
                for i in (self.bpp..row.len()).rev() {
                    row[i] = row[i].wrapping_sub(row[i - self.bpp]);
                }
            }
            FilterType::Up => {
                self.scratch.copy_from_slice(row);
                for (byte, &above) in row.iter_mut().zip(&self.prior_row) {
                    *byte = byte.wrapping_sub(above);
                }
                std::mem::swap(&mut self.prior_row, &mut self.scratch);
            }
        }
    }

    /// Filter a batch of complete scanlines in place.
    ///
    /// `scanlines` holds whole rows of [`stride`](Self::stride) bytes. The
    /// first byte of each row is set to the filter type; the rest is
    /// filtered.
    pub fn apply(&mut self, scanlines: &mut [u8]) {
        let stride = self.stride();
        debug_assert_eq!(scanlines.len() % stride, 0);
        let kind = self.filter.as_u8();
        for line in scanlines.chunks_exact_mut(stride) {
            line[0] = kind;
            self.filter_row(&mut line[1..]);
        }
    }
}
