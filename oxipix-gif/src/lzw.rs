//! GIF-flavoured LZW compression.
//!
//! This is the `compress(1)` algorithm as adapted for GIF: open-addressed
//! double hashing on (prefix code, next symbol), an XOR first probe, and
//! Knott's relatively-prime secondary probe. When all 4096 codes are taken
//! the table is cleared and a CLEAR code emitted ("adaptive block
//! compression"); codes never exceed 12 bits.
//!
//! The probe sequence determines which table slot each code lands in, and so
//! the exact output stream. It must not be replaced with a general-purpose
//! map.

use crate::config::{HASH_SIZE, MAX_BITS, MAX_MAX_CODE};
use crate::packet::CodePacker;
use oxipix_core::error::{OxiPixError, Result};
use std::io::Write;

/// Shift for the XOR first probe: `8 - log2(65536 / HASH_SIZE)` rounded up.
const HASH_SHIFT: u32 = {
    let mut shift = 0;
    let mut fcode = HASH_SIZE;
    while fcode < 65536 {
        shift += 1;
        fcode *= 2;
    }
    8 - shift
};

/// Empty slot marker in the hash table.
const EMPTY: i32 = -1;

#[inline]
fn max_code(n_bits: u8) -> u32 {
    (1 << n_bits) - 1
}

/// Streaming LZW compressor writing GIF sub-blocks.
///
/// One compressor owns its hash and code tables for a single pass.
#[derive(Debug)]
pub struct LzwCompressor<W: Write> {
    /// fcode per slot, `EMPTY` when free.
    htab: Vec<i32>,
    /// Code assigned to the fcode in the same slot.
    codetab: Vec<u16>,
    packer: CodePacker<W>,
    init_bits: u8,
    n_bits: u8,
    maxcode: u32,
    free_ent: u32,
    clear_code: u32,
    eof_code: u32,
    clear_flag: bool,
    #[cfg(test)]
    trace: Vec<(u32, u8)>,
}

impl<W: Write> LzwCompressor<W> {
    /// Create a compressor for symbols below `1 << min_code_size`.
    ///
    /// `min_code_size` is the value written before the image data (2-8).
    pub fn new(min_code_size: u8, writer: W) -> Result<Self> {
        if !(2..=8).contains(&min_code_size) {
            return Err(OxiPixError::invalid_parameter(
                "min_code_size",
                format!("{} is outside 2..=8", min_code_size),
            ));
        }

        let init_bits = min_code_size + 1;
        let clear_code = 1u32 << min_code_size;
        Ok(Self {
            htab: vec![EMPTY; HASH_SIZE],
            codetab: vec![0; HASH_SIZE],
            packer: CodePacker::new(writer),
            init_bits,
            n_bits: init_bits,
            maxcode: max_code(init_bits),
            free_ent: clear_code + 2,
            clear_code,
            eof_code: clear_code + 1,
            clear_flag: false,
            #[cfg(test)]
            trace: Vec::new(),
        })
    }

    /// Compress every symbol, then emit END-OF-INFORMATION and flush.
    ///
    /// A symbol at or above the clear code fails with `InvalidParameter`;
    /// codes already emitted stay in the writer. The zero-length block
    /// terminator is not written; it belongs to the container.
    pub fn compress<I>(&mut self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut symbols = symbols.into_iter();

        self.clear_hash();
        let clear_code = self.clear_code;

        let Some(first) = symbols.next() else {
            self.output(clear_code)?;
            return self.output(self.eof_code);
        };

        let mut ent = self.check_symbol(first)?;
        self.output(clear_code)?;

        'outer: for c in symbols {
            let c = self.check_symbol(c)?;

            let fcode = ((c << MAX_BITS) + ent) as i32;
            let mut i = ((c << HASH_SHIFT) ^ ent) as usize;

            if self.htab[i] == fcode {
                ent = self.codetab[i] as u32;
                continue;
            }

            if self.htab[i] >= 0 {
                // Secondary probe (after G. Knott)
                let disp = if i == 0 { 1 } else { HASH_SIZE - i };
                loop {
                    i = if i >= disp { i - disp } else { i + HASH_SIZE - disp };
                    if self.htab[i] == fcode {
                        ent = self.codetab[i] as u32;
                        continue 'outer;
                    }
                    if self.htab[i] < 0 {
                        break;
                    }
                }
            }

            self.output(ent)?;
            ent = c;
            if self.free_ent < MAX_MAX_CODE {
                self.codetab[i] = self.free_ent as u16;
                self.free_ent += 1;
                self.htab[i] = fcode;
            } else {
                self.clear_block()?;
            }
        }

        self.output(ent)?;
        self.output(self.eof_code)
    }

    /// Consume the compressor and return the writer.
    pub fn into_inner(self) -> W {
        self.packer.into_inner()
    }

    /// Table full: forget every entry and tell the decoder to do the same.
    fn clear_block(&mut self) -> Result<()> {
        log::trace!("lzw: code table full, emitting CLEAR");
        self.clear_hash();
        self.free_ent = self.clear_code + 2;
        self.clear_flag = true;
        self.output(self.clear_code)
    }

    fn check_symbol(&self, symbol: u8) -> Result<u32> {
        let symbol = symbol as u32;
        if symbol >= self.clear_code {
            return Err(OxiPixError::invalid_parameter(
                "symbol",
                format!("{} does not fit a {}-bit code size", symbol, self.init_bits - 1),
            ));
        }
        Ok(symbol)
    }

    fn clear_hash(&mut self) {
        self.htab.fill(EMPTY);
    }

    fn output(&mut self, code: u32) -> Result<()> {
        #[cfg(test)]
        self.trace.push((code, self.n_bits));

        self.packer.push(code, self.n_bits)?;

        // Widen once the next entry no longer fits, or drop back after CLEAR.
        if self.free_ent > self.maxcode || self.clear_flag {
            if self.clear_flag {
                self.n_bits = self.init_bits;
                self.maxcode = max_code(self.n_bits);
                self.clear_flag = false;
            } else {
                self.n_bits += 1;
                self.maxcode = if self.n_bits == MAX_BITS {
                    MAX_MAX_CODE
                } else {
                    max_code(self.n_bits)
                };
            }
        }

        if code == self.eof_code {
            self.packer.finish()?;
        }
        Ok(())
    }
}

/// Compress `symbols` into GIF sub-blocks (without the block terminator).
///
/// # Example
///
/// ```
/// use oxipix_gif::lzw::compress;
///
/// let data = compress(2, [0u8, 1, 0, 1, 0, 1, 0, 1]).unwrap();
/// // First sub-block length prefix
/// assert_eq!(data[0] as usize, data.len() - 1);
/// ```
pub fn compress<I>(min_code_size: u8, symbols: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = u8>,
{
    let mut compressor = LzwCompressor::new(min_code_size, Vec::new())?;
    compressor.compress(symbols)?;
    Ok(compressor.into_inner())
}
