//! This module defines the core, strongly-typed data representations used
//! throughout the tilecast encoder.
//!
//! It currently includes the closed `ControlType` enum and the `TileColorOp`
//! key that identifies one way of coloring a tile.

pub mod tile_color_op;

// Re-export the main type(s) for easier access.
pub use tile_color_op::{ControlType, TileColorOp};
