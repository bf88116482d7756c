//! Schema-driven bit codec
//!
//! Records are described by static [`Schema`] tables and walked by a single
//! generic [`decode`]/[`encode`] pair. Fields are packed MSB-first and are not
//! byte aligned.

mod codec;
mod record;
mod schema;

pub use codec::{decode, encode};
pub use record::{Record, Value};
pub use schema::{Field, FieldKind, Schema, SubFraming};

/// Mask with the low `count` bits set
pub(crate) const fn low_mask(count: u32) -> u32 {
    if count >= 32 {
        u32::MAX
    } else {
        (1u32 << count) - 1
    }
}

/// MSB-first bit reader over a byte slice
///
/// Unlike a padding reader, running out of input is reported to the caller
/// so a short frame can be rejected instead of silently zero-filled.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Bits not yet consumed
    pub fn bits_remaining(&self) -> usize {
        (self.data.len() - self.byte_pos) * 8 - self.bit_pos as usize
    }

    /// Read `count` bits (at most 32), MSB first.
    ///
    /// Returns `None` without consuming anything if fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: u32) -> Option<u32> {
        if count > 32 || self.bits_remaining() < count as usize {
            return None;
        }

        let mut result = 0u32;
        let mut remaining = count;

        while remaining > 0 {
            let current_byte = self.data[self.byte_pos] as u32;
            let bits_left_in_byte = 8 - self.bit_pos as u32;
            let bits_to_read = remaining.min(bits_left_in_byte);

            let shift = bits_left_in_byte - bits_to_read;
            let bits = (current_byte >> shift) & low_mask(bits_to_read);

            result = if bits_to_read >= 32 {
                bits
            } else {
                (result << bits_to_read) | bits
            };
            remaining -= bits_to_read;
            self.bit_pos += bits_to_read as u8;

            if self.bit_pos >= 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
        }

        Some(result)
    }

    /// Read eight bits, not necessarily byte aligned
    pub fn read_byte(&mut self) -> Option<u8> {
        self.read_bits(8).map(|b| b as u8)
    }
}

/// MSB-first bit writer
#[derive(Debug, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    current_byte: u8,
    bit_pos: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 + self.bit_pos as usize
    }

    /// Write the low `count` bits of `value` (at most 32), MSB first
    pub fn write_bits(&mut self, value: u32, count: u32) {
        let mut remaining = count.min(32);

        while remaining > 0 {
            let bits_left = 8 - self.bit_pos as u32;
            let bits_to_write = remaining.min(bits_left);

            let bits = (value >> (remaining - bits_to_write)) & low_mask(bits_to_write);
            self.current_byte |= (bits as u8) << (bits_left - bits_to_write);

            remaining -= bits_to_write;
            self.bit_pos += bits_to_write as u8;

            if self.bit_pos >= 8 {
                self.data.push(self.current_byte);
                self.current_byte = 0;
                self.bit_pos = 0;
            }
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.write_bits(byte as u32, 8);
    }

    /// Flush the final partial byte with zero bits and return the buffer
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_pos > 0 {
            self.data.push(self.current_byte);
        }
        self.data
    }
}
