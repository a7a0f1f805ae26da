/// Pack an 8 bit grayscale buffer into bitmap data.
///
/// `luma` holds `width * height` pixels, row by row. A pixel at or below
/// `threshold` becomes a black dot. Rows are padded to whole bytes, most
/// significant bit first, which is the layout [`Bitmap`](crate::Bitmap)
/// expects. threshold = 80 works well if the source is already monochrome.
///
/// Returns `None` if `luma` is shorter than `width * height`. A zero width
/// packs to no bytes at all.
pub fn threshold_luma(threshold: u8, width: u32, height: u32, luma: &[u8]) -> Option<Vec<u8>> {
    let width = width as usize;
    let height = height as usize;
    if luma.len() < width * height {
        return None;
    }
    if width == 0 {
        return Some(Vec::new());
    }

    let row_bytes = crate::bitmap::row_bytes(width as u32);
    let mut bw = vec![0u8; row_bytes * height];

    for (y, row) in luma.chunks(width).take(height).enumerate() {
        for (x, &pixel) in row.iter().enumerate() {
            if pixel <= threshold {
                bw[y * row_bytes + x / 8] |= 0x80 >> (x % 8);
            }
        }
    }

    Some(bw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_packs_msb_first() {
        // 10 pixels: dark, light, dark, then light, last one dark
        let luma = [0, 255, 0, 255, 255, 255, 255, 255, 255, 10];
        let bw = threshold_luma(80, 10, 1, &luma).unwrap();
        assert_eq!(bw, vec![0b1010_0000, 0b0100_0000]);
    }

    #[test]
    fn test_threshold_pads_each_row() {
        let luma = [0u8; 3 * 2];
        let bw = threshold_luma(80, 3, 2, &luma).unwrap();
        assert_eq!(bw, vec![0b1110_0000, 0b1110_0000]);
    }

    #[test]
    fn test_threshold_short_input() {
        assert!(threshold_luma(80, 4, 4, &[0u8; 15]).is_none());
    }

    #[test]
    fn test_threshold_zero_width() {
        assert_eq!(threshold_luma(80, 0, 3, &[0u8, 0, 0]), Some(vec![]));
        assert_eq!(threshold_luma(80, 0, 0, &[]), Some(vec![]));
    }
}
