//! This module defines the canonical, type-safe representation of the ways a
//! tile can be colored by the decoder.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of tile operation types understood by the decoder.
///
/// The discriminants are part of the wire format (they are stored in the type
/// field of a control word) and the derived ordering is used as the final
/// tie-breaker when sequencing.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ControlType {
    /// All 16 pixels take the palette index stored in the parameter. No mask.
    SolidColor = 0,
    /// Palette block of 2 entries, 1 mask bit per pixel.
    Masked2Colors = 1,
    /// Palette block of 4 entries, 2 mask bits per pixel.
    Masked4Colors = 2,
    /// Palette block of 8 entries, 3 mask bits per pixel.
    Masked8Colors = 3,
    /// Palette block of 16 entries, 4 mask bits per pixel.
    Masked16Colors = 4,
    /// Leaves a run of tiles unchanged. Followed by a 5-bit count field.
    Skip = 5,
}

impl ControlType {
    /// Decodes a raw type field back into a `ControlType`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::SolidColor),
            1 => Some(Self::Masked2Colors),
            2 => Some(Self::Masked4Colors),
            3 => Some(Self::Masked8Colors),
            4 => Some(Self::Masked16Colors),
            5 => Some(Self::Skip),
            _ => None,
        }
    }

    /// Number of mask bits stored per pixel, or `None` for types without a mask.
    pub fn mask_bits_per_pixel(&self) -> Option<u8> {
        match self {
            Self::Masked2Colors => Some(1),
            Self::Masked4Colors => Some(2),
            Self::Masked8Colors => Some(3),
            Self::Masked16Colors => Some(4),
            Self::SolidColor | Self::Skip => None,
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Describes one operation how a tile should be colored.
///
/// This is a plain value key: two operations with the same type and offset are
/// the same operation, regardless of which tile or frame requested them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileColorOp {
    pub control_type: ControlType,
    pub offset: u32,
}

impl TileColorOp {
    pub fn new(control_type: ControlType, offset: u32) -> Self {
        Self {
            control_type,
            offset,
        }
    }

    /// The operation that stands for one unchanged tile.
    pub fn skip() -> Self {
        Self::new(ControlType::Skip, 0)
    }

    pub fn is_skip(&self) -> bool {
        self.control_type == ControlType::Skip
    }
}
