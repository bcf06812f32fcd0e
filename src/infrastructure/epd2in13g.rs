//! Waveshare 2.13" (G) e-paper panel: geometry and frame buffer codec.
//!
//! The panel takes 2 bits per pixel from a four-entry palette
//! (black, white, yellow, red), four pixels per byte, MSB first.
//! Rows are padded to a whole byte with white.

use image::{imageops, Rgb, RgbImage};

pub const EPD_WIDTH: u32 = 122;
pub const EPD_HEIGHT: u32 = 250;

/// Bytes per panel row
pub const ROW_BYTES: usize = EPD_WIDTH.div_ceil(4) as usize;
pub const BUFFER_LEN: usize = ROW_BYTES * EPD_HEIGHT as usize;

const PALETTE: [Rgb<u8>; 4] = [
    Rgb([0, 0, 0]),
    Rgb([255, 255, 255]),
    Rgb([255, 255, 0]),
    Rgb([255, 0, 0]),
];
const WHITE_CODE: u8 = 1;

/// Index of the palette entry nearest to `pixel`
fn nearest_code(pixel: &Rgb<u8>) -> u8 {
    let distance = |entry: &Rgb<u8>| -> u32 {
        pixel
            .0
            .iter()
            .zip(entry.0)
            .map(|(&a, b)| (i32::from(a) - i32::from(b)).unsigned_abs().pow(2))
            .sum()
    };
    PALETTE
        .iter()
        .enumerate()
        .min_by_key(|(_, entry)| distance(entry))
        .map(|(code, _)| code as u8)
        .unwrap_or(WHITE_CODE)
}

/// Pack a frame into the panel's native buffer. Landscape frames
/// (`EPD_HEIGHT x EPD_WIDTH`) are rotated 90° counter-clockwise first.
pub fn pack(image: &RgbImage) -> anyhow::Result<Vec<u8>> {
    let portrait = match image.dimensions() {
        (EPD_WIDTH, EPD_HEIGHT) => image.clone(),
        (EPD_HEIGHT, EPD_WIDTH) => imageops::rotate270(image),
        (w, h) => anyhow::bail!(
            "Frame is {}x{}, panel expects {}x{} or {}x{}",
            w,
            h,
            EPD_WIDTH,
            EPD_HEIGHT,
            EPD_HEIGHT,
            EPD_WIDTH
        ),
    };

    let mut buffer = Vec::with_capacity(BUFFER_LEN);
    for y in 0..EPD_HEIGHT {
        for byte_index in 0..ROW_BYTES as u32 {
            let mut byte = 0u8;
            for slot in 0..4 {
                let x = byte_index * 4 + slot;
                let code = if x < EPD_WIDTH {
                    nearest_code(portrait.get_pixel(x, y))
                } else {
                    WHITE_CODE
                };
                byte |= code << (6 - slot * 2);
            }
            buffer.push(byte);
        }
    }
    Ok(buffer)
}

/// Decode a native buffer back into a portrait RGB image
pub fn unpack(buffer: &[u8]) -> anyhow::Result<RgbImage> {
    if buffer.len() != BUFFER_LEN {
        anyhow::bail!(
            "Buffer is {} bytes, panel expects {}",
            buffer.len(),
            BUFFER_LEN
        );
    }

    let mut image = RgbImage::new(EPD_WIDTH, EPD_HEIGHT);
    for (y, row) in buffer.chunks_exact(ROW_BYTES).enumerate() {
        for x in 0..EPD_WIDTH {
            let byte = row[(x / 4) as usize];
            let code = (byte >> (6 - (x % 4) * 2)) & 0b11;
            image.put_pixel(x, y as u32, PALETTE[code as usize]);
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_geometry() {
        assert_eq!(ROW_BYTES, 31);
        assert_eq!(BUFFER_LEN, 7750);
    }

    #[test]
    fn test_pack_white_frame() {
        let image = RgbImage::from_pixel(EPD_HEIGHT, EPD_WIDTH, Rgb([255, 255, 255]));
        let buffer = pack(&image).unwrap();
        assert_eq!(buffer.len(), BUFFER_LEN);
        assert!(buffer.iter().all(|&b| b == 0b0101_0101));
    }

    #[test]
    fn test_pack_quantizes_to_palette() {
        let mut image = RgbImage::from_pixel(EPD_WIDTH, EPD_HEIGHT, Rgb([250, 250, 250]));
        image.put_pixel(0, 0, Rgb([10, 0, 0]));
        image.put_pixel(1, 0, Rgb([240, 20, 20]));
        image.put_pixel(2, 0, Rgb([240, 240, 30]));

        let buffer = pack(&image).unwrap();
        assert_eq!(buffer[0], 0b00_11_10_01);
    }

    #[test]
    fn test_landscape_frame_is_rotated() {
        // Top-left of a landscape frame lands bottom-left in portrait
        let mut image = RgbImage::from_pixel(EPD_HEIGHT, EPD_WIDTH, Rgb([255, 255, 255]));
        image.put_pixel(0, 0, Rgb([0, 0, 0]));

        let portrait = unpack(&pack(&image).unwrap()).unwrap();
        assert_eq!(*portrait.get_pixel(0, EPD_HEIGHT - 1), Rgb([0, 0, 0]));
        assert_eq!(*portrait.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_rejects_wrong_sizes() {
        assert!(pack(&RgbImage::new(100, 100)).is_err());
        assert!(unpack(&[0u8; 10]).is_err());
    }
}
