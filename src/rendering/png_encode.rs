use eink_palette::IndexedImage;
use std::io::Cursor;

use crate::error::DisplayError;

/// Encode an indexed image as a palette PNG (color type 3).
///
/// The bit depth is the smallest that addresses every palette table entry,
/// padding included. The PLTE chunk carries the whole table.
pub fn encode_indexed_png(image: &IndexedImage) -> Result<Vec<u8>, DisplayError> {
    let table_len = image.palette().table().len();
    let (bit_depth, bits) = match table_len {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };

    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), image.width() as u32, bits)
    };

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        palette = table_len,
        bits,
        "Encoding indexed PNG"
    );

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width() as u32, image.height() as u32);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(image.palette().to_plte());
        let mut writer = encoder
            .write_header()
            .map_err(|e| DisplayError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| DisplayError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack indices into N-bit PNG rows (1, 2 or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    if width == 0 {
        return Vec::new();
    }
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * (indices.len() / width as usize));

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let slot = i % pixels_per_byte;
            byte |= (idx & mask) << ((8 - bits) - slot as u8 * bits);

            if slot == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}

#[cfg(test)]
mod tests {
    use super::*;
    use eink_palette::{Palette, Rgb};
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>, Vec<u8>) {
        let mut decoder = png::Decoder::new(bytes);
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info().unwrap();
        let plte = reader.info().palette.as_ref().unwrap().to_vec();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, plte, buf)
    }

    fn three_colors() -> Palette {
        Palette::new(&[Rgb::WHITE, Rgb::BLACK, Rgb::new(255, 0, 0)]).unwrap()
    }

    #[test]
    fn test_pack_two_bits() {
        let packed = pack_nbits(&[0, 1, 2, 3, 1], 5, 2);
        assert_eq!(packed, vec![0b00_01_10_11, 0b01_00_00_00]);
    }

    #[test]
    fn test_pack_one_bit_rows_are_byte_aligned() {
        let packed = pack_nbits(&[1, 0, 1, 1, 0, 1], 3, 1);
        assert_eq!(packed, vec![0b1010_0000, 0b1010_0000]);
    }

    #[test]
    fn test_small_palette_uses_two_bits() {
        let image = IndexedImage::new(vec![0, 1, 2, 1], 2, 2, three_colors());
        let bytes = encode_indexed_png(&image).unwrap();
        let (info, plte, data) = decode(&bytes);

        assert_eq!(info.color_type, png::ColorType::Indexed);
        assert_eq!(info.bit_depth, png::BitDepth::Two);
        assert_eq!(plte, vec![255, 255, 255, 0, 0, 0, 255, 0, 0]);
        assert_eq!(data, vec![0b00_01_0000, 0b10_01_0000]);
    }

    #[test]
    fn test_padded_palette_uses_eight_bits() {
        let palette = three_colors().padded_to(256).unwrap();
        let image = IndexedImage::new(vec![2, 0, 1], 3, 1, palette);
        let bytes = encode_indexed_png(&image).unwrap();
        let (info, plte, data) = decode(&bytes);

        assert_eq!(info.bit_depth, png::BitDepth::Eight);
        assert_eq!(plte.len(), 256 * 3);
        assert_eq!(&plte[9..12], &[0, 0, 0]);
        assert_eq!(data, vec![2, 0, 1]);
    }
}
