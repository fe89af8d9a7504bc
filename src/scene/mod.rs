// In: src/scene/mod.rs

//! This module contains the scene encoder, the orchestrator of the whole
//! compression process for one scene of frames sharing a palette.
//!
//! Encoding happens in two phases separated by a single barrier:
//! 1. `add_frame` runs every frame through the tile delta engine and stores the
//!    resulting deltas. Nothing is encoded yet.
//! 2. `encode` derives a coloring operation for every tile of every frame,
//!    counts them in the control word sequencer, sequences the canonical table
//!    once, and only then writes each frame's bitstream against that table.
//!
//! The frequency-ordered table needs the full operation distribution of the
//! scene, which is why frames cannot be encoded as they arrive.

use serde::Serialize;

use crate::config::EncoderConfig;
use crate::delta::{FrameDelta, TileDeltaEngine};
use crate::error::TilecastError;
use crate::format::{serialize_control_words, ControlWord, TILE_SIDE_LENGTH};
use crate::kernels::PaletteLookupWriter;
use crate::sequencer::{ControlWordSequencer, FrameBitstreamEncoder};
use crate::types::TileColorOp;

mod tile_policy;

//==================================================================================
// 1. Output Artifacts
//==================================================================================

/// The streams of one compressed frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedFrame {
    pub bitstream: Vec<u8>,
    pub maskstream: Vec<u8>,
}

/// Size and shape figures of one encoded scene.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub frames: usize,
    pub tiles: usize,
    pub skipped_tiles: usize,
    /// Pixels that changed to the transparent index and were left as they were.
    pub lost_pixels: usize,
    pub distinct_operations: usize,
    pub control_words: usize,
    pub palette_bytes: usize,
    pub bitstream_bytes: usize,
    pub maskstream_bytes: usize,
}

impl SceneStats {
    pub fn to_json(&self) -> Result<String, TilecastError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Everything a decoder needs to reproduce the scene.
#[derive(Debug, Clone, Default)]
pub struct EncodedScene {
    /// The canonical control word table, shared by all frames.
    pub control_words: Vec<ControlWord>,
    /// The deduplicated palette-lookup buffer, shared by all frames.
    pub palette_lookup: Vec<u8>,
    /// One entry per added frame, in input order.
    pub frames: Vec<EncodedFrame>,
    pub stats: SceneStats,
}

impl EncodedScene {
    /// The control word table in its serialized, on-disk form.
    pub fn serialized_control_words(&self) -> Vec<u8> {
        serialize_control_words(&self.control_words)
    }
}

//==================================================================================
// 2. Scene Encoder
//==================================================================================

/// Encodes an entire scene of bitmaps sharing the same palette.
#[derive(Debug, Clone)]
pub struct SceneEncoder {
    config: EncoderConfig,
    engine: TileDeltaEngine,
    deltas: Vec<FrameDelta>,
}

impl SceneEncoder {
    /// Creates an encoder with the default configuration.
    pub fn new(width: usize, height: usize) -> Result<Self, TilecastError> {
        Self::with_config(width, height, EncoderConfig::default())
    }

    pub fn with_config(
        width: usize,
        height: usize,
        config: EncoderConfig,
    ) -> Result<Self, TilecastError> {
        config.validate()?;
        let engine = TileDeltaEngine::new(width, height)?;
        if u32::try_from(engine.h_tiles()).is_err() {
            return Err(TilecastError::InvalidDimensions {
                width,
                height,
                tile_side: TILE_SIDE_LENGTH,
            });
        }
        Ok(Self {
            config,
            engine,
            deltas: Vec::new(),
        })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn h_tiles(&self) -> usize {
        self.engine.h_tiles()
    }

    pub fn v_tiles(&self) -> usize {
        self.engine.v_tiles()
    }

    /// Number of frames registered since the last `encode`.
    pub fn frame_count(&self) -> usize {
        self.deltas.len()
    }

    /// Registers a further frame to the scene. A frame of the wrong size is
    /// rejected and leaves the scene unchanged.
    pub fn add_frame(&mut self, frame: &[u8]) -> Result<(), TilecastError> {
        let delta = self.engine.ingest(frame)?;
        self.deltas.push(delta);
        Ok(())
    }

    /// Processes all registered frames and creates the components needed for
    /// decoding. The registered frames are consumed only on success; after an
    /// error they stay registered and `encode` can be retried.
    pub fn encode(&mut self) -> Result<EncodedScene, TilecastError> {
        let deltas = &self.deltas;

        let mut palette = PaletteLookupWriter::new();
        let mut sequencer =
            ControlWordSequencer::with_bitstream_index_limit(self.config.bitstream_index_limit);
        let mut stats = SceneStats {
            frames: deltas.len(),
            ..SceneStats::default()
        };

        // --- Phase 1: derive and count every tile operation of the scene ---
        let mut frame_ops: Vec<Vec<TileColorOp>> = Vec::with_capacity(deltas.len());
        let mut maskstreams: Vec<Vec<u8>> = Vec::with_capacity(deltas.len());
        for delta in deltas {
            let mut ops = Vec::with_capacity(delta.tiles.len());
            let mut maskstream = Vec::new();
            for tile in &delta.tiles {
                let op = tile_policy::color_tile(
                    tile,
                    self.config.tile_policy,
                    &mut palette,
                    &mut maskstream,
                )?;
                sequencer.add(op)?;
                if op.is_skip() {
                    stats.skipped_tiles += 1;
                }
                ops.push(op);
            }
            stats.tiles += ops.len();
            stats.lost_pixels += delta.lost_pixels;
            frame_ops.push(ops);
            maskstreams.push(maskstream);
        }

        // --- Phase 2: the single sequencing barrier ---
        let sequence = sequencer.sequence()?;

        // --- Phase 3: per-frame bitstreams against the shared table ---
        let h_tiles = if self.config.row_aligned_skips {
            self.engine.h_tiles() as u32
        } else {
            0
        };
        let encoder = FrameBitstreamEncoder::new(&sequence, h_tiles);
        let mut frames = Vec::with_capacity(frame_ops.len());
        for (ops, maskstream) in frame_ops.iter().zip(maskstreams) {
            let bitstream = encoder.encode(ops)?;
            stats.bitstream_bytes += bitstream.len();
            stats.maskstream_bytes += maskstream.len();
            frames.push(EncodedFrame {
                bitstream,
                maskstream,
            });
        }

        stats.distinct_operations = sequence.operation_count();
        stats.control_words = sequence.len();
        stats.palette_bytes = palette.len();

        log::info!(
            "Encoded scene: {} frames, {} control words, {} palette bytes, {} bitstream bytes, {} mask bytes",
            stats.frames,
            stats.control_words,
            stats.palette_bytes,
            stats.bitstream_bytes,
            stats.maskstream_bytes
        );
        log_metric!(
            "event" = "encode_scene",
            "frames" = stats.frames,
            "tiles" = stats.tiles,
            "skipped_tiles" = stats.skipped_tiles,
            "lost_pixels" = stats.lost_pixels,
            "distinct_operations" = stats.distinct_operations
        );

        self.deltas.clear();
        Ok(EncodedScene {
            control_words: sequence.into_control_words(),
            palette_lookup: palette.into_buffer(),
            frames,
            stats,
        })
    }
}

#[cfg(test)]
mod reference_decoder;
