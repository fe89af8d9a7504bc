//! This module contains the tile delta engine: the first stage of scene
//! encoding.
//!
//! A frame is split into a fixed grid of `TILE_SIDE_LENGTH`-sized square tiles
//! and every tile is compared pixel by pixel against the previous frame. The
//! result is one `TileDelta` per tile, in row-major order, where a zero byte
//! means "unchanged" and any other byte is the new palette index.

use crate::error::TilecastError;
use crate::format::{PIXEL_PER_TILE, TILE_SIDE_LENGTH, TRANSPARENT_COLOR_INDEX};

//==================================================================================
// 1. Delta Types
//==================================================================================

/// Per-pixel changes of one tile relative to the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileDelta(pub [u8; PIXEL_PER_TILE]);

impl TileDelta {
    pub fn pixels(&self) -> &[u8; PIXEL_PER_TILE] {
        &self.0
    }

    /// True if no pixel of the tile changed.
    pub fn is_unchanged(&self) -> bool {
        self.0.iter().all(|&pixel| pixel == TRANSPARENT_COLOR_INDEX)
    }
}

impl Default for TileDelta {
    fn default() -> Self {
        Self([TRANSPARENT_COLOR_INDEX; PIXEL_PER_TILE])
    }
}

/// All tile deltas of one frame, row-major, `h_tiles * v_tiles` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameDelta {
    pub tiles: Vec<TileDelta>,
    /// Pixels that changed to the transparent index. Their delta reads as
    /// "unchanged", so the frame cannot be reproduced exactly.
    pub lost_pixels: usize,
}

//==================================================================================
// 2. Tile Delta Engine
//==================================================================================

/// Computes tile deltas against an owned baseline of the previous frame.
#[derive(Debug, Clone)]
pub struct TileDeltaEngine {
    h_tiles: usize,
    v_tiles: usize,
    stride: usize,
    last_frame: Vec<u8>,
}

impl TileDeltaEngine {
    /// Creates an engine for frames of `width` x `height` pixels. Both must be
    /// multiples of `TILE_SIDE_LENGTH`. The baseline starts fully zeroed.
    pub fn new(width: usize, height: usize) -> Result<Self, TilecastError> {
        if width % TILE_SIDE_LENGTH != 0 || height % TILE_SIDE_LENGTH != 0 {
            return Err(TilecastError::InvalidDimensions {
                width,
                height,
                tile_side: TILE_SIDE_LENGTH,
            });
        }
        Ok(Self {
            h_tiles: width / TILE_SIDE_LENGTH,
            v_tiles: height / TILE_SIDE_LENGTH,
            stride: width,
            last_frame: vec![0; width * height],
        })
    }

    pub fn h_tiles(&self) -> usize {
        self.h_tiles
    }

    pub fn v_tiles(&self) -> usize {
        self.v_tiles
    }

    pub fn tile_count(&self) -> usize {
        self.h_tiles * self.v_tiles
    }

    /// Expected length of every ingested frame buffer.
    pub fn frame_len(&self) -> usize {
        self.last_frame.len()
    }

    /// Computes the delta of `frame` against the previous frame and makes
    /// `frame` the new baseline. A size mismatch leaves the baseline untouched.
    pub fn ingest(&mut self, frame: &[u8]) -> Result<FrameDelta, TilecastError> {
        if frame.len() != self.frame_len() {
            return Err(TilecastError::FrameSizeMismatch {
                expected: self.frame_len(),
                actual: frame.len(),
            });
        }

        let mut delta = FrameDelta {
            tiles: Vec::with_capacity(self.tile_count()),
            lost_pixels: 0,
        };
        for v_tile in 0..self.v_tiles {
            let v_start = v_tile * self.stride * TILE_SIDE_LENGTH;
            for h_tile in 0..self.h_tiles {
                let (tile, lost) = self.delta_tile(v_start + h_tile * TILE_SIDE_LENGTH, frame);
                delta.tiles.push(tile);
                delta.lost_pixels += lost;
            }
        }

        if delta.lost_pixels > 0 {
            log::warn!(
                "{} pixel(s) changed to the transparent index {} and cannot be represented",
                delta.lost_pixels,
                TRANSPARENT_COLOR_INDEX
            );
        }

        self.last_frame.copy_from_slice(frame);
        Ok(delta)
    }

    /// Returns the delta of the tile starting at `offset`, and how many of its
    /// pixels changed to the transparent index.
    fn delta_tile(&self, offset: usize, frame: &[u8]) -> (TileDelta, usize) {
        let mut delta = TileDelta::default();
        let mut lost = 0;
        for y in 0..TILE_SIDE_LENGTH {
            let start = offset + y * self.stride;
            for x in 0..TILE_SIDE_LENGTH {
                let pixel = frame[start + x];
                if pixel != self.last_frame[start + x] {
                    if pixel == TRANSPARENT_COLOR_INDEX {
                        lost += 1;
                    }
                    delta.0[y * TILE_SIDE_LENGTH + x] = pixel;
                }
            }
        }
        (delta, lost)
    }
}
