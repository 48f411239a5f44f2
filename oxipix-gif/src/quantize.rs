//! Palette construction for GIF.
//!
//! GIF stores indexed color only, so every distinct ARGB value in the image
//! gets one palette slot, assigned in first-occurrence order during a single
//! row-major scan. There is no frequency ordering and no color reduction: an
//! image with more than 256 distinct values is rejected.
//!
//! A pixel whose alpha is below `0x80` is transparent. GIF has a single
//! transparent index, so the first transparent value seen becomes canonical
//! and any later transparent pixel with a different value is rewritten to it.

use oxipix_core::error::{OxiPixError, Result};
use oxipix_core::pixel::{alpha, blue, green, red};
use std::collections::HashMap;

/// Largest palette a GIF can carry.
pub const MAX_COLORS: usize = 256;

/// Alpha values below this are treated as fully transparent.
pub const TRANSPARENT_ALPHA: u8 = 0x80;

/// One palette slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    /// Packed ARGB value that claimed this slot.
    pub argb: u32,
    /// Pixels using this slot.
    pub count: u32,
    /// Palette index.
    pub index: u8,
    /// Whether this is the transparent slot.
    pub transparent: bool,
}

/// Deduplicated palette in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<ColorEntry>,
    transparent_index: Option<u8>,
}

impl Palette {
    /// Slots in index order.
    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the transparent slot, if any pixel was transparent.
    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// Bits per index: 1, 2, 4 or 8.
    pub fn bit_depth(&self) -> u8 {
        match self.entries.len() {
            0..=2 => 1,
            3..=4 => 2,
            5..=16 => 4,
            _ => 8,
        }
    }

    /// Color table padded with black to `1 << bit_depth` entries.
    pub fn color_table(&self) -> Vec<[u8; 3]> {
        let mut table = vec![[0u8; 3]; 1 << self.bit_depth()];
        for entry in &self.entries {
            table[entry.index as usize] = [red(entry.argb), green(entry.argb), blue(entry.argb)];
        }
        table
    }
}

/// Palette plus the image recoded as palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantized {
    /// The palette.
    pub palette: Palette,
    /// One index per pixel, row-major.
    pub indices: Vec<u8>,
}

/// Build the palette and index plane for `pixels`.
///
/// `pixels` is the encoder's own copy; transparent pixels may be rewritten
/// in place to the canonical transparent value.
pub fn quantize(pixels: &mut [u32]) -> Result<Quantized> {
    let mut lookup: HashMap<u32, usize> = HashMap::new();
    let mut entries: Vec<ColorEntry> = Vec::new();
    let mut transparent: Option<(u32, u8)> = None;
    let mut indices = Vec::with_capacity(pixels.len());

    for pixel in pixels.iter_mut() {
        let is_transparent = alpha(*pixel) < TRANSPARENT_ALPHA;
        if is_transparent {
            match transparent {
                None => transparent = Some((*pixel, entries.len() as u8)),
                Some((canonical, _)) if canonical != *pixel => *pixel = canonical,
                Some(_) => {}
            }
        }

        let slot = match lookup.get(pixel) {
            Some(&slot) => {
                entries[slot].count += 1;
                slot
            }
            None => {
                if entries.len() >= MAX_COLORS {
                    return Err(OxiPixError::too_many_colors(MAX_COLORS));
                }
                let slot = entries.len();
                entries.push(ColorEntry {
                    argb: *pixel,
                    count: 1,
                    index: slot as u8,
                    transparent: is_transparent,
                });
                lookup.insert(*pixel, slot);
                slot
            }
        };
        indices.push(slot as u8);
    }

    Ok(Quantized {
        palette: Palette {
            entries,
            transparent_index: transparent.map(|(_, index)| index),
        },
        indices,
    })
}
