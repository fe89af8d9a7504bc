//! This file is the root of the `tilecast` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`scene`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the types a host needs to encode a scene, so callers can
//!     `use tilecast::SceneEncoder` without knowing the module layout.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod config;
pub mod delta;
pub mod error;
pub mod format;
pub mod kernels;
pub mod scene;
pub mod sequencer;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use config::{EncoderConfig, TilePolicy};
pub use delta::{FrameDelta, TileDelta, TileDeltaEngine};
pub use error::TilecastError;
pub use format::ControlWord;
pub use observability::enable_verbose_logging;
pub use scene::{EncodedFrame, EncodedScene, SceneEncoder, SceneStats};
pub use sequencer::{
    AddressLevel, AddressPath, ControlWordSequence, ControlWordSequencer, FrameBitstreamEncoder,
};
pub use types::{ControlType, TileColorOp};
