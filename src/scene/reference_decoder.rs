//! A minimal decoder for the encoded format, used only by tests to verify
//! that scenes survive an encode/decode round trip bit for bit.

use crate::format::{
    ControlWord, DIRECT_INDEX_BITS, LINE_SKIP_MARKER, NESTED_INDEX_BITS, PIXEL_PER_TILE,
    SKIP_COUNT_BITS, TILE_SIDE_LENGTH, TRANSPARENT_COLOR_INDEX,
};
use crate::kernels::maskstream::tile_mask_len;
use crate::types::ControlType;

use super::{EncodedFrame, EncodedScene};

/// Reads MSB-first fields from a bitstream.
struct BitReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    fn read(&mut self, bit_width: u8) -> u32 {
        let mut value = 0u32;
        for _ in 0..bit_width {
            let byte = self.bytes[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            self.position += 1;
        }
        value
    }
}

/// Follows an address path from the bitstream to the selected control word.
fn read_control_word(reader: &mut BitReader<'_>, words: &[ControlWord]) -> ControlWord {
    let mut word = words[reader.read(DIRECT_INDEX_BITS) as usize];
    while let Some(base) = word.long_offset_target() {
        word = words[(base + reader.read(NESTED_INDEX_BITS)) as usize];
    }
    word
}

/// Reads mask index `pixel` of an LSB-first packed tile mask.
fn mask_index(mask: &[u8], bits_per_pixel: u8, pixel: usize) -> usize {
    let mut index = 0usize;
    for bit in 0..bits_per_pixel as usize {
        let position = pixel * bits_per_pixel as usize + bit;
        if (mask[position / 8] >> (position % 8)) & 1 == 1 {
            index |= 1 << bit;
        }
    }
    index
}

/// Applies one encoded frame to `canvas`, the decoder's copy of the previous frame.
pub(crate) fn decode_frame(
    scene: &EncodedScene,
    frame: &EncodedFrame,
    width: usize,
    canvas: &mut [u8],
) {
    let h_tiles = width / TILE_SIDE_LENGTH;
    let tile_count = canvas.len() / PIXEL_PER_TILE;
    let mut reader = BitReader::new(&frame.bitstream);
    let mut mask_cursor = 0usize;
    let mut tile = 0usize;

    while tile < tile_count {
        let word = read_control_word(&mut reader, &scene.control_words);
        let control_type = word.control_type().expect("leaf words carry a type");

        let mut tile_pixels = [TRANSPARENT_COLOR_INDEX; PIXEL_PER_TILE];
        match control_type {
            ControlType::Skip => {
                let count = reader.read(SKIP_COUNT_BITS);
                if count == LINE_SKIP_MARKER {
                    tile = (tile / h_tiles + 1) * h_tiles;
                } else {
                    tile += count as usize + 1;
                }
                continue;
            }
            ControlType::SolidColor => {
                tile_pixels = [word.parameter() as u8; PIXEL_PER_TILE];
            }
            masked => {
                let bits = masked.mask_bits_per_pixel().expect("masked type");
                let mask_len = tile_mask_len(bits);
                let mask = &frame.maskstream[mask_cursor..mask_cursor + mask_len];
                mask_cursor += mask_len;
                let offset = word.parameter() as usize;
                for (pixel, value) in tile_pixels.iter_mut().enumerate() {
                    *value = scene.palette_lookup[offset + mask_index(mask, bits, pixel)];
                }
            }
        }

        let origin_x = (tile % h_tiles) * TILE_SIDE_LENGTH;
        let origin_y = (tile / h_tiles) * TILE_SIDE_LENGTH;
        for y in 0..TILE_SIDE_LENGTH {
            for x in 0..TILE_SIDE_LENGTH {
                let value = tile_pixels[y * TILE_SIDE_LENGTH + x];
                if value != TRANSPARENT_COLOR_INDEX {
                    canvas[(origin_y + y) * width + origin_x + x] = value;
                }
            }
        }
        tile += 1;
    }
    assert_eq!(mask_cursor, frame.maskstream.len(), "mask stream not fully consumed");
}

/// Decodes every frame of `scene` in order.
pub(crate) fn decode_scene(scene: &EncodedScene, width: usize, height: usize) -> Vec<Vec<u8>> {
    let mut canvas = vec![0u8; width * height];
    scene
        .frames
        .iter()
        .map(|frame| {
            decode_frame(scene, frame, width, &mut canvas);
            canvas.clone()
        })
        .collect()
}
