//! This module collects the low-level, stateless-per-call writers the encoder
//! builds its output artifacts with.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Variable-width, MSB-first field packing for frame bitstreams.
pub mod bitstream;

/// LSB-first per-pixel index packing for the mask stream.
pub mod maskstream;

/// Dictionary-style deduplication of palette blocks.
pub mod palette_lookup;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use self::bitstream::BitstreamWriter;
pub use self::palette_lookup::PaletteLookupWriter;
