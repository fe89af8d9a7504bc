// In: src/error.rs

//! This module defines the single, unified error type for the entire tilecast library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::types::TileColorOp;

#[derive(Error, Debug)]
pub enum TilecastError {
    // =========================================================================
    // === Scene Construction & Ingestion Errors
    // =========================================================================
    #[error("Invalid scene dimensions {width}x{height}: both must be multiples of {tile_side}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        tile_side: usize,
    },

    #[error("Frame size mismatch: expected {expected} bytes, got {actual}")]
    FrameSizeMismatch { expected: usize, actual: usize },

    // =========================================================================
    // === Sequencing & Bitstream Errors
    // =========================================================================
    #[error("Operation offset {offset} exceeds the control word parameter limit {limit}")]
    OffsetOutOfRange { offset: u32, limit: u32 },

    /// A frame referenced an operation that was never added to the sequencer.
    #[error("Operation {0:?} is not part of the control word sequence (this is a bug)")]
    UnknownOperation(TileColorOp),

    #[error("Control word table overflow: long offset {0} exceeds the addressable range")]
    TableOverflow(u32),

    #[error("Bitstream encoding error: value {0} exceeds bit width {1}")]
    BitWidthExceeded(u64, u8),

    // =========================================================================
    // === Configuration Errors
    // =========================================================================
    #[error("Invalid encoder configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., config or log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
