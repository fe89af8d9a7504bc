// In: src/config.rs

//! The single source of truth for all scene encoder configuration.
//!
//! `EncoderConfig` is created once at the application boundary (typically from a
//! JSON file) and handed to the `SceneEncoder`. Every field has a default, so an
//! empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::TilecastError;
use crate::format::DEFAULT_BITSTREAM_INDEX_LIMIT;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// Selects how a changed tile is mapped to a coloring operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TilePolicy {
    /// **Default:** The cheapest operation that reproduces the tile exactly:
    /// solid fill for uniform fully-changed tiles, otherwise the narrowest
    /// masked type whose palette block holds every distinct value.
    #[default]
    Adaptive,

    /// Every changed tile uses the 16-color masked type. Produces larger output
    /// but keeps a single operation type per scene.
    SixteenColorsOnly,
}

//==================================================================================
// II. The Unified EncoderConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EncoderConfig {
    /// Number of control words addressable directly with a 12-bit field before
    /// overflow chaining starts. 0 selects the default.
    #[serde(default = "default_bitstream_index_limit")]
    pub bitstream_index_limit: u32,

    /// If true, skip runs are cut at tile-row boundaries with the line-skip
    /// marker. If false, every unchanged tile is written as its own skip.
    #[serde(default = "default_true")]
    pub row_aligned_skips: bool,

    /// Mapping from tile deltas to coloring operations.
    #[serde(default)]
    pub tile_policy: TilePolicy,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            bitstream_index_limit: default_bitstream_index_limit(),
            row_aligned_skips: true,
            tile_policy: TilePolicy::default(),
        }
    }
}

impl EncoderConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, TilecastError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, TilecastError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), TilecastError> {
        if self.bitstream_index_limit > DEFAULT_BITSTREAM_INDEX_LIMIT {
            return Err(TilecastError::InvalidConfig(format!(
                "bitstream_index_limit {} exceeds the maximum of {}",
                self.bitstream_index_limit, DEFAULT_BITSTREAM_INDEX_LIMIT
            )));
        }
        Ok(())
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

/// Helper for `serde` to provide a default for `bitstream_index_limit`.
fn default_bitstream_index_limit() -> u32 {
    DEFAULT_BITSTREAM_INDEX_LIMIT
}
