//! LSB-first code packing into GIF data sub-blocks.
//!
//! GIF packs variable-width LZW codes least significant bit first, then
//! frames the byte stream as sub-blocks: a length byte followed by up to 255
//! data bytes. Blocks are flushed at 254 bytes.

use oxipix_core::error::Result;
use std::io::Write;

/// Bytes collected before a sub-block is flushed.
pub const PACKET_SIZE: usize = 254;

/// Bit accumulator feeding a sub-block packet buffer.
#[derive(Debug)]
pub struct CodePacker<W: Write> {
    writer: W,
    /// Pending bits, LSB first.
    accum: u32,
    /// Number of valid bits in `accum`.
    bits: u8,
    packet: [u8; PACKET_SIZE],
    len: usize,
}

impl<W: Write> CodePacker<W> {
    /// Create a packer writing sub-blocks to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            accum: 0,
            bits: 0,
            packet: [0; PACKET_SIZE],
            len: 0,
        }
    }

    /// Append a `width`-bit code.
    pub fn push(&mut self, code: u32, width: u8) -> Result<()> {
        debug_assert!((1..=12).contains(&width), "code width {} out of range", width);
        debug_assert!(code < (1 << width), "code {} wider than {} bits", code, width);

        self.accum &= (1u32 << self.bits) - 1;
        self.accum |= code << self.bits;
        self.bits += width;

        while self.bits >= 8 {
            self.push_byte(self.accum as u8)?;
            self.accum >>= 8;
            self.bits -= 8;
        }
        Ok(())
    }

    /// Flush the partial byte and the last (possibly short) sub-block.
    pub fn finish(&mut self) -> Result<()> {
        if self.bits > 0 {
            self.push_byte(self.accum as u8)?;
            self.accum = 0;
            self.bits = 0;
        }
        self.flush_packet()
    }

    /// Consume the packer and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.packet[self.len] = byte;
        self.len += 1;
        if self.len >= PACKET_SIZE {
            self.flush_packet()?;
        }
        Ok(())
    }

    fn flush_packet(&mut self) -> Result<()> {
        if self.len > 0 {
            self.writer.write_all(&[self.len as u8])?;
            self.writer.write_all(&self.packet[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }
}
