// In: src/sequencer/mod.rs

//! The control word sequencer turns the multiset of tile coloring operations
//! requested by a whole scene into the canonical control word table.
//!
//! It operates in two steps:
//! 1. `add` counts how often every distinct `TileColorOp` is used.
//! 2. `sequence` sorts the operations by descending frequency (ties broken by
//!    ascending offset, then ascending type) and assigns each one a table slot.
//!    Hot operations land at low slots and are addressed with a single 12-bit
//!    field. Once the directly addressable range is used up, a long-offset word
//!    chains into a nested level addressed with 4-bit fields; every nested level
//!    holds 15 entries before the next long offset opens a deeper one.
//!
//! The resulting `ControlWordSequence` is read-only and shared by every frame's
//! bitstream encode.

use hashbrown::HashMap;

use crate::error::TilecastError;
use crate::format::{
    ControlWord, CONTROL_WORD_PARAM_LIMIT, DEFAULT_BITSTREAM_INDEX_LIMIT, DIRECT_INDEX_BITS,
    LONG_OFFSET_LIMIT, NESTED_INDEX_BITS, NESTED_LEVEL_SLOTS,
};
use crate::types::TileColorOp;

pub mod bitstream_encoder;

pub use self::bitstream_encoder::FrameBitstreamEncoder;

//==================================================================================
// 1. Address Paths
//==================================================================================

/// One field of an address path: `relative_offset` written with `bit_width` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressLevel {
    pub bit_width: u8,
    pub relative_offset: u32,
}

impl AddressLevel {
    pub fn new(bit_width: u8, relative_offset: u32) -> Self {
        Self {
            bit_width,
            relative_offset,
        }
    }
}

/// The full chain of fields that selects one operation's control word.
///
/// Levels are stored leaf first; the bitstream needs them outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressPath {
    levels: Vec<AddressLevel>,
}

impl AddressPath {
    pub fn leaf(&self) -> Option<&AddressLevel> {
        self.levels.first()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Levels in the order they are written to (and read from) the bitstream.
    pub fn outermost_first(&self) -> impl Iterator<Item = &AddressLevel> + '_ {
        self.levels.iter().rev()
    }

    /// Total number of bitstream bits spent on this path.
    pub fn bit_len(&self) -> usize {
        self.levels.iter().map(|level| level.bit_width as usize).sum()
    }
}

/// An indirection level of the table; ancestors are referenced by arena index.
#[derive(Debug, Clone, Copy)]
struct NestedLevel {
    level: AddressLevel,
    parent: Option<usize>,
}

/// Where an operation sits: its own field plus the innermost enclosing level.
#[derive(Debug, Clone, Copy)]
struct OpPlacement {
    leaf: AddressLevel,
    parent: Option<usize>,
}

//==================================================================================
// 2. Control Word Sequence
//==================================================================================

/// A finalized control word table plus the address path of every operation in it.
#[derive(Debug, Clone, Default)]
pub struct ControlWordSequence {
    words: Vec<ControlWord>,
    nested_levels: Vec<NestedLevel>,
    placements: HashMap<TileColorOp, OpPlacement>,
}

impl ControlWordSequence {
    /// The low-level control words, in table order.
    pub fn control_words(&self) -> &[ControlWord] {
        &self.words
    }

    pub fn into_control_words(self) -> Vec<ControlWord> {
        self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of distinct operations placed in the table.
    pub fn operation_count(&self) -> usize {
        self.placements.len()
    }

    /// Number of long-offset indirections in the table.
    pub fn nested_level_count(&self) -> usize {
        self.nested_levels.len()
    }

    pub fn contains(&self, op: &TileColorOp) -> bool {
        self.placements.contains_key(op)
    }

    /// Materializes the address path of `op`, or `None` if it was never added.
    pub fn address_path(&self, op: &TileColorOp) -> Option<AddressPath> {
        let placement = self.placements.get(op)?;
        let mut levels = vec![placement.leaf];
        let mut parent = placement.parent;
        while let Some(index) = parent {
            let nested = self.nested_levels[index];
            levels.push(nested.level);
            parent = nested.parent;
        }
        Some(AddressPath { levels })
    }
}

//==================================================================================
// 3. Control Word Sequencer
//==================================================================================

/// Collects requested tile coloring operations and sequences them into a
/// `ControlWordSequence`.
#[derive(Debug, Clone)]
pub struct ControlWordSequencer {
    bitstream_index_limit: u32,
    ops: HashMap<TileColorOp, u32>,
}

impl Default for ControlWordSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlWordSequencer {
    pub fn new() -> Self {
        Self {
            bitstream_index_limit: DEFAULT_BITSTREAM_INDEX_LIMIT,
            ops: HashMap::new(),
        }
    }

    /// Uses `limit` as the number of directly addressable table entries.
    /// 0 selects the default; values beyond the 12-bit field are clamped.
    pub fn with_bitstream_index_limit(limit: u32) -> Self {
        let effective = match limit {
            0 => DEFAULT_BITSTREAM_INDEX_LIMIT,
            l if l > DEFAULT_BITSTREAM_INDEX_LIMIT => {
                log::warn!(
                    "Bitstream index limit {} exceeds the {}-bit field, clamping to {}",
                    l,
                    DIRECT_INDEX_BITS,
                    DEFAULT_BITSTREAM_INDEX_LIMIT
                );
                DEFAULT_BITSTREAM_INDEX_LIMIT
            }
            l => l,
        };
        Self {
            bitstream_index_limit: effective,
            ops: HashMap::new(),
        }
    }

    pub fn bitstream_index_limit(&self) -> u32 {
        self.bitstream_index_limit
    }

    /// Records one more use of `op`. Offsets above `CONTROL_WORD_PARAM_LIMIT`
    /// are rejected and leave the sequencer unchanged.
    pub fn add(&mut self, op: TileColorOp) -> Result<(), TilecastError> {
        if op.offset > CONTROL_WORD_PARAM_LIMIT {
            return Err(TilecastError::OffsetOutOfRange {
                offset: op.offset,
                limit: CONTROL_WORD_PARAM_LIMIT,
            });
        }
        *self.ops.entry(op).or_insert(0) += 1;
        Ok(())
    }

    pub fn distinct_operations(&self) -> usize {
        self.ops.len()
    }

    /// Usage count recorded for `op` so far.
    pub fn count_of(&self, op: &TileColorOp) -> u32 {
        self.ops.get(op).copied().unwrap_or(0)
    }

    /// Packs the recorded operations into the canonical control word table.
    ///
    /// The result depends only on the multiset of added operations, never on
    /// the order they were added in.
    pub fn sequence(&self) -> Result<ControlWordSequence, TilecastError> {
        let mut sorted_ops: Vec<(TileColorOp, u32)> =
            self.ops.iter().map(|(op, count)| (*op, *count)).collect();
        sorted_ops.sort_by(|(op_a, count_a), (op_b, count_b)| {
            count_b
                .cmp(count_a)
                .then(op_a.offset.cmp(&op_b.offset))
                .then(op_a.control_type.cmp(&op_b.control_type))
        });

        let limit = self.bitstream_index_limit;
        let mut result = ControlWordSequence {
            words: Vec::with_capacity(sorted_ops.len()),
            nested_levels: Vec::new(),
            placements: HashMap::with_capacity(sorted_ops.len()),
        };
        let mut leaf_bits = DIRECT_INDEX_BITS;
        let mut parent: Option<usize> = None;
        let mut relative_offset = 0u32;

        for (op, _) in sorted_ops {
            let word_count = result.words.len() as u32;
            if word_count == limit {
                result.words.push(long_offset_word(word_count + 1)?);
                result.nested_levels.push(NestedLevel {
                    level: AddressLevel::new(DIRECT_INDEX_BITS, word_count),
                    parent: None,
                });
                parent = Some(result.nested_levels.len() - 1);
                leaf_bits = NESTED_INDEX_BITS;
                relative_offset = 0;
            }
            if word_count > limit && relative_offset == NESTED_LEVEL_SLOTS {
                result.words.push(long_offset_word(word_count + 1)?);
                result.nested_levels.push(NestedLevel {
                    level: AddressLevel::new(NESTED_INDEX_BITS, NESTED_LEVEL_SLOTS),
                    parent,
                });
                parent = Some(result.nested_levels.len() - 1);
                relative_offset = 0;
            }

            result.placements.insert(
                op,
                OpPlacement {
                    leaf: AddressLevel::new(leaf_bits, relative_offset),
                    parent,
                },
            );
            result
                .words
                .push(ControlWord::of(leaf_bits, op.control_type, op.offset));
            relative_offset += 1;
        }

        log::debug!(
            "Sequenced {} operations into {} control words ({} long offsets)",
            result.operation_count(),
            result.len(),
            result.nested_level_count()
        );
        log_metric!(
            "event" = "sequence",
            "operations" = result.operation_count(),
            "control_words" = result.len(),
            "long_offsets" = result.nested_level_count()
        );
        Ok(result)
    }
}

fn long_offset_word(target: u32) -> Result<ControlWord, TilecastError> {
    if target > LONG_OFFSET_LIMIT {
        return Err(TilecastError::TableOverflow(target));
    }
    Ok(ControlWord::long_offset(target))
}

#[cfg(test)]
mod sequencer_tests;
