//! This module contains the bit packer used to build per-frame bitstreams.
//!
//! Values are appended with a caller-specified bit width, most significant bit
//! first, so a decoder reading the buffer front to back sees the fields in the
//! exact order they were written. The final byte is padded with zero bits.

use bitvec::prelude::*;
use num_traits::{PrimInt, ToPrimitive, Unsigned};

use crate::error::TilecastError;

/// Appends variable-width unsigned fields to a growing, byte-aligned buffer.
#[derive(Debug, Default, Clone)]
pub struct BitstreamWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitstreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the lowest `bit_width` bits of `value`, MSB first.
    ///
    /// Fails if `bit_width` is 0 or wider than 64 bits, or if `value` does not
    /// fit in `bit_width` bits.
    pub fn write<T>(&mut self, bit_width: u8, value: T) -> Result<(), TilecastError>
    where
        T: PrimInt + Unsigned + ToPrimitive,
    {
        let val_u64 = value
            .to_u64()
            .ok_or(TilecastError::BitWidthExceeded(u64::MAX, bit_width))?;
        if bit_width == 0 || bit_width > 64 {
            return Err(TilecastError::BitWidthExceeded(val_u64, bit_width));
        }
        if bit_width < 64 && (val_u64 >> bit_width) != 0 {
            return Err(TilecastError::BitWidthExceeded(val_u64, bit_width));
        }

        let start = 64 - bit_width as usize;
        self.bits
            .extend_from_bitslice(&val_u64.view_bits::<Msb0>()[start..]);
        Ok(())
    }

    /// Number of bits written so far, excluding padding.
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Returns a copy of the written bytes, zero-padded to a byte boundary.
    pub fn buffer(&self) -> Vec<u8> {
        self.clone().into_buffer()
    }

    /// Consumes the writer and returns the zero-padded bytes.
    pub fn into_buffer(mut self) -> Vec<u8> {
        while self.bits.len() % 8 != 0 {
            self.bits.push(false);
        }
        self.bits.into_vec()
    }
}
