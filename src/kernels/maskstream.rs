//! Packs the per-pixel palette-block indices of one masked tile into the mask
//! stream.
//!
//! Unlike the bitstream, masks are packed LSB first: pixel 0 occupies the lowest
//! bits of the first byte. A tile of 16 pixels always packs into a whole number
//! of bytes (`2 * bits_per_pixel`).

use bitvec::prelude::*;

use crate::error::TilecastError;
use crate::format::PIXEL_PER_TILE;

/// Appends the packed mask of one tile to `output_buf`.
pub fn pack_tile_mask(
    indices: &[u8; PIXEL_PER_TILE],
    bits_per_pixel: u8,
    output_buf: &mut Vec<u8>,
) -> Result<(), TilecastError> {
    if bits_per_pixel == 0 || bits_per_pixel > 8 {
        return Err(TilecastError::BitWidthExceeded(0, bits_per_pixel));
    }

    let max_index = (1u16 << bits_per_pixel) - 1;
    let mut bit_vec = BitVec::<u8, Lsb0>::with_capacity(PIXEL_PER_TILE * bits_per_pixel as usize);
    for &index in indices {
        if u16::from(index) > max_index {
            return Err(TilecastError::BitWidthExceeded(u64::from(index), bits_per_pixel));
        }
        bit_vec.extend_from_bitslice(&index.view_bits::<Lsb0>()[..bits_per_pixel as usize]);
    }

    output_buf.extend_from_slice(bit_vec.as_raw_slice());
    Ok(())
}

/// Number of mask bytes one tile occupies for the given bit depth.
pub fn tile_mask_len(bits_per_pixel: u8) -> usize {
    PIXEL_PER_TILE * bits_per_pixel as usize / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixteen_color_mask_nibble_order() {
        let mut indices = [0u8; PIXEL_PER_TILE];
        for (i, index) in indices.iter_mut().enumerate() {
            *index = i as u8;
        }
        let mut mask = Vec::new();
        pack_tile_mask(&indices, 4, &mut mask).unwrap();
        assert_eq!(mask, vec![0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE]);
    }

    #[test]
    fn test_two_color_mask() {
        let mut indices = [0u8; PIXEL_PER_TILE];
        indices[0] = 1;
        indices[9] = 1;
        indices[15] = 1;
        let mut mask = Vec::new();
        pack_tile_mask(&indices, 1, &mut mask).unwrap();
        assert_eq!(mask, vec![0b0000_0001, 0b1000_0010]);
        assert_eq!(mask.len(), tile_mask_len(1));
    }

    #[test]
    fn test_three_bit_mask_length_and_append() {
        let indices = [7u8; PIXEL_PER_TILE];
        let mut mask = vec![0xAA];
        pack_tile_mask(&indices, 3, &mut mask).unwrap();
        assert_eq!(mask.len(), 1 + tile_mask_len(3));
        assert_eq!(&mask[1..], &[0xFF; 6]);
    }

    #[test]
    fn test_index_too_wide_error() {
        let mut indices = [0u8; PIXEL_PER_TILE];
        indices[3] = 4;
        let mut mask = Vec::new();
        let result = pack_tile_mask(&indices, 2, &mut mask);
        assert!(matches!(result, Err(TilecastError::BitWidthExceeded(4, 2))));
        assert!(mask.is_empty());
    }
}
