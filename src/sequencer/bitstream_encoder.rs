//! The frame bitstream encoder writes one frame's list of tile operations as a
//! sequence of address paths into a `ControlWordSequence`.
//!
//! Runs of unchanged tiles are not addressed one by one. They accumulate into a
//! pending skip counter that is flushed as skip references, each followed by a
//! 5-bit `run - 1` field of at most 30 tiles. A run still open at a tile-row
//! boundary (or at the end of the frame) is closed with the line-skip marker
//! instead, so skips never carry across rows.

use crate::error::TilecastError;
use crate::format::{LINE_SKIP_MARKER, MAX_SKIP_RUN, SKIP_COUNT_BITS};
use crate::kernels::BitstreamWriter;
use crate::types::TileColorOp;

use super::ControlWordSequence;

/// Encodes frames against a shared, finalized control word sequence.
#[derive(Debug, Clone, Copy)]
pub struct FrameBitstreamEncoder<'a> {
    sequence: &'a ControlWordSequence,
    h_tiles: u32,
}

impl<'a> FrameBitstreamEncoder<'a> {
    /// `h_tiles` is the number of tiles per row. With 0, row tracking is off and
    /// every unchanged tile is flushed as its own single-tile skip.
    pub fn new(sequence: &'a ControlWordSequence, h_tiles: u32) -> Self {
        Self { sequence, h_tiles }
    }

    /// Returns the zero-padded bitstream reproducing `ops` (row-major).
    pub fn encode(&self, ops: &[TileColorOp]) -> Result<Vec<u8>, TilecastError> {
        let mut writer = BitstreamWriter::new();
        let mut pending_skips = 0u32;

        for (op_index, op) in ops.iter().enumerate() {
            if pending_skips > 0 && self.is_row_start(op_index) {
                self.write_line_skip(&mut writer, &mut pending_skips)?;
            }
            if op.is_skip() {
                pending_skips += 1;
                if self.h_tiles == 0 {
                    self.write_pending_skips(&mut writer, &mut pending_skips)?;
                }
            } else {
                self.write_pending_skips(&mut writer, &mut pending_skips)?;
                self.write_op(&mut writer, op)?;
            }
        }
        if pending_skips > 0 {
            self.write_line_skip(&mut writer, &mut pending_skips)?;
        }

        Ok(writer.into_buffer())
    }

    fn is_row_start(&self, op_index: usize) -> bool {
        self.h_tiles != 0 && (op_index as u32) % self.h_tiles == 0
    }

    /// Writes the address path of `op`, outermost level first.
    fn write_op(&self, writer: &mut BitstreamWriter, op: &TileColorOp) -> Result<(), TilecastError> {
        let path = self
            .sequence
            .address_path(op)
            .ok_or(TilecastError::UnknownOperation(*op))?;
        for level in path.outermost_first() {
            writer.write(level.bit_width, level.relative_offset)?;
        }
        Ok(())
    }

    fn write_pending_skips(
        &self,
        writer: &mut BitstreamWriter,
        pending_skips: &mut u32,
    ) -> Result<(), TilecastError> {
        while *pending_skips != 0 {
            let to_skip = (*pending_skips).min(MAX_SKIP_RUN);
            self.write_op(writer, &TileColorOp::skip())?;
            writer.write(SKIP_COUNT_BITS, to_skip - 1)?;
            *pending_skips -= to_skip;
        }
        Ok(())
    }

    fn write_line_skip(
        &self,
        writer: &mut BitstreamWriter,
        pending_skips: &mut u32,
    ) -> Result<(), TilecastError> {
        self.write_op(writer, &TileColorOp::skip())?;
        writer.write(SKIP_COUNT_BITS, LINE_SKIP_MARKER)?;
        *pending_skips = 0;
        Ok(())
    }
}
