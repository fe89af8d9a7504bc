//! Maps one tile delta to the tile coloring operation that reproduces it.
//!
//! Unchanged tiles become skips. A fully changed single-color tile becomes a
//! solid fill. Everything else becomes a masked operation over a palette block
//! holding the tile's sorted distinct values; zero (the transparent index) is one
//! of those values whenever part of the tile is unchanged, which is how the
//! decoder knows to leave those pixels alone.

use crate::config::TilePolicy;
use crate::delta::TileDelta;
use crate::error::TilecastError;
use crate::format::{CONTROL_WORD_PARAM_LIMIT, PIXEL_PER_TILE, TRANSPARENT_COLOR_INDEX};
use crate::kernels::maskstream::pack_tile_mask;
use crate::kernels::PaletteLookupWriter;
use crate::types::{ControlType, TileColorOp};

/// Chooses the operation for `delta`, registering its palette block and
/// appending its mask (if any) to `maskstream`.
pub(crate) fn color_tile(
    delta: &TileDelta,
    policy: TilePolicy,
    palette: &mut PaletteLookupWriter,
    maskstream: &mut Vec<u8>,
) -> Result<TileColorOp, TilecastError> {
    if delta.is_unchanged() {
        return Ok(TileColorOp::skip());
    }

    let mut colors: Vec<u8> = delta.pixels().to_vec();
    colors.sort_unstable();
    colors.dedup();

    // A single distinct value in a changed tile cannot be the transparent index.
    if policy == TilePolicy::Adaptive && colors.len() == 1 {
        return Ok(TileColorOp::new(ControlType::SolidColor, u32::from(colors[0])));
    }

    let (control_type, block_len, bits_per_pixel): (ControlType, usize, u8) = match policy {
        TilePolicy::SixteenColorsOnly => (ControlType::Masked16Colors, 16, 4),
        TilePolicy::Adaptive => match colors.len() {
            0..=2 => (ControlType::Masked2Colors, 2, 1),
            3..=4 => (ControlType::Masked4Colors, 4, 2),
            5..=8 => (ControlType::Masked8Colors, 8, 3),
            _ => (ControlType::Masked16Colors, 16, 4),
        },
    };

    let mut block = colors.clone();
    block.resize(block_len, TRANSPARENT_COLOR_INDEX);

    let mut indices = [0u8; PIXEL_PER_TILE];
    for (index, &pixel) in indices.iter_mut().zip(delta.pixels()) {
        // `colors` holds every pixel value, so the search always succeeds.
        *index = colors.binary_search(&pixel).unwrap_or(0) as u8;
    }

    let offset = palette.write(&block);
    let offset = u32::try_from(offset).map_err(|_| TilecastError::OffsetOutOfRange {
        offset: u32::MAX,
        limit: CONTROL_WORD_PARAM_LIMIT,
    })?;
    pack_tile_mask(&indices, bits_per_pixel, maskstream)?;

    Ok(TileColorOp::new(control_type, offset))
}
