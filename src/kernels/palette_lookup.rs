//! This module contains the palette-lookup writer, a dictionary-style
//! deduplicator for the color blocks referenced by masked tile operations.
//!
//! Every block handed to `write` is searched for in the buffer built so far. A
//! hit returns the existing byte offset, so offsets stay stable for the lifetime
//! of the scene; a miss appends the block. Because the search runs over the raw
//! byte buffer, a block that happens to appear at a boundary between two earlier
//! blocks is reused as well.

use hashbrown::HashMap;

/// Deduplicating writer of the shared palette-lookup buffer.
#[derive(Debug, Default, Clone)]
pub struct PaletteLookupWriter {
    buffer: Vec<u8>,
    known_blocks: HashMap<Vec<u8>, usize>,
}

impl PaletteLookupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the offset of `block` within the buffer, appending it if it has
    /// not been seen before.
    pub fn write(&mut self, block: &[u8]) -> usize {
        if block.is_empty() {
            return 0;
        }
        if let Some(&offset) = self.known_blocks.get(block) {
            return offset;
        }

        let offset = match self
            .buffer
            .windows(block.len())
            .position(|window| window == block)
        {
            Some(existing) => existing,
            None => {
                let appended_at = self.buffer.len();
                self.buffer.extend_from_slice(block);
                appended_at
            }
        };
        self.known_blocks.insert(block.to_vec(), offset);
        offset
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_buffer(self) -> Vec<u8> {
        self.buffer
    }
}
