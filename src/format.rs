// In: src/format.rs

//! Defines all wire-level constants and the control word codec for the tilecast
//! movie format. This is the single source of truth shared by the sequencer, the
//! bitstream encoder and the scene encoder; the decoder on the other side of the
//! format depends on every value here being bit-exact.

use serde::{Deserialize, Serialize};

use crate::types::ControlType;

//==================================================================================
// I. Tile Geometry
//==================================================================================

/// Side length of a square tile in pixels.
pub const TILE_SIDE_LENGTH: usize = 4;
/// Number of pixels in one tile.
pub const PIXEL_PER_TILE: usize = TILE_SIDE_LENGTH * TILE_SIDE_LENGTH;
/// Palette index the decoder treats as "leave the pixel unmodified".
pub const TRANSPARENT_COLOR_INDEX: u8 = 0;

//==================================================================================
// II. Bitstream Addressing
//==================================================================================

/// Highest operation offset a control word parameter can hold (12 bits).
pub const CONTROL_WORD_PARAM_LIMIT: u32 = 0xFFF;
/// Default number of directly addressable control words.
pub const DEFAULT_BITSTREAM_INDEX_LIMIT: u32 = 0xFFF;
/// Width of the outermost address field of every tile in the bitstream.
pub const DIRECT_INDEX_BITS: u8 = 12;
/// Width of the relative address field inside a nested table level.
pub const NESTED_INDEX_BITS: u8 = 4;
/// Entries a nested level holds before the next long offset must be chained.
pub const NESTED_LEVEL_SLOTS: u32 = 15;
/// Highest absolute table index a long-offset word can point to.
pub const LONG_OFFSET_LIMIT: u32 = 0xFFFF;

//==================================================================================
// III. Skip Compression
//==================================================================================

/// Width of the count field following a skip reference.
pub const SKIP_COUNT_BITS: u8 = 5;
/// Longest run of unchanged tiles a single skip reference may cover.
pub const MAX_SKIP_RUN: u32 = 0x1E;
/// Reserved count value: skip the remainder of the current tile row.
pub const LINE_SKIP_MARKER: u32 = 0x1F;

//==================================================================================
// IV. Control Word Codec
//==================================================================================

const BIT_WIDTH_SHIFT: u32 = 16;
const BIT_WIDTH_MASK: u32 = 0xF;
const TYPE_SHIFT: u32 = 12;
const TYPE_MASK: u32 = 0xF;
/// Number of bytes a control word occupies in the serialized table.
pub const CONTROL_WORD_BYTES: usize = 3;

/// A packed low-level instruction of the canonical control word table.
///
/// Layout (20 significant bits):
/// * bits 16..=19: width of the address field that selects this word; 0 marks a long offset
/// * bits 12..=15: `ControlType`
/// * bits 0..=11: parameter
///
/// A long-offset word stores the absolute index of the next table level in bits 0..=15.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ControlWord(u32);

impl ControlWord {
    /// Packs a regular control word. Fields wider than their slot are truncated,
    /// callers validate ranges before constructing words.
    pub fn of(bit_width: u8, control_type: ControlType, parameter: u32) -> Self {
        Self(
            ((u32::from(bit_width) & BIT_WIDTH_MASK) << BIT_WIDTH_SHIFT)
                | (((control_type as u32) & TYPE_MASK) << TYPE_SHIFT)
                | (parameter & CONTROL_WORD_PARAM_LIMIT),
        )
    }

    /// Packs an indirection word pointing at the table index `target`.
    pub fn long_offset(target: u32) -> Self {
        Self(target & LONG_OFFSET_LIMIT)
    }

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn bit_width(&self) -> u8 {
        ((self.0 >> BIT_WIDTH_SHIFT) & BIT_WIDTH_MASK) as u8
    }

    pub fn is_long_offset(&self) -> bool {
        self.bit_width() == 0
    }

    /// The table index a long-offset word points to.
    pub fn long_offset_target(&self) -> Option<u32> {
        self.is_long_offset().then_some(self.0 & LONG_OFFSET_LIMIT)
    }

    pub fn control_type(&self) -> Option<ControlType> {
        if self.is_long_offset() {
            return None;
        }
        ControlType::from_raw((self.0 >> TYPE_SHIFT) & TYPE_MASK)
    }

    pub fn parameter(&self) -> u32 {
        self.0 & CONTROL_WORD_PARAM_LIMIT
    }

    /// Little-endian serialized form of the word.
    pub fn to_le_bytes(&self) -> [u8; CONTROL_WORD_BYTES] {
        let bytes = self.0.to_le_bytes();
        [bytes[0], bytes[1], bytes[2]]
    }
}

/// Serializes a control word table into its on-disk representation.
pub fn serialize_control_words(words: &[ControlWord]) -> Vec<u8> {
    let mut output_buf = Vec::with_capacity(words.len() * CONTROL_WORD_BYTES);
    for word in words {
        output_buf.extend_from_slice(&word.to_le_bytes());
    }
    output_buf
}
