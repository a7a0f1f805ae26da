//! Monochrome bitmaps and the row chunking used to print them.
//!
//! The raster command can carry at most [`MAX_ROW_BYTES`] bytes per row and
//! the printer only buffers [`PRINTER_BUFFER_SIZE`] bytes, so an image is sent
//! as a series of raster commands, each covering as many rows as fit.

use crate::error::{Error, Result};

/// Widest row the raster command accepts, in bytes.
pub const MAX_ROW_BYTES: usize = 48;

/// Widest printable row in dots (48 * 8).
pub const MAX_PRINT_WIDTH: u32 = (MAX_ROW_BYTES * 8) as u32;

/// Assumed size of the printer's receive buffer.
pub const PRINTER_BUFFER_SIZE: usize = 256;

/// A borrowed 1 bit per pixel image.
///
/// Rows are stored top to bottom, each padded to a whole number of bytes,
/// most significant bit first. A set bit is a black dot.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Wrap `data` as a `width` x `height` bitmap.
    ///
    /// `data` must hold at least `ceil(width / 8) * height` bytes; anything
    /// beyond that is ignored. Rows wider than [`MAX_PRINT_WIDTH`] are
    /// accepted and clipped to that width when printed.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        if width == 0 && height > 0 {
            return Err(Error::EmptyBitmap);
        }
        let expected = row_bytes(width) * height as usize;
        if data.len() < expected {
            return Err(Error::BitmapTooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(Bitmap {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn is_clipped(&self) -> bool {
        self.width > MAX_PRINT_WIDTH
    }

    pub fn plan(&self) -> ChunkPlan {
        ChunkPlan::for_width(self.width)
    }

    /// The printable part of row `y`, at most [`MAX_ROW_BYTES`] long.
    ///
    /// `None` if `y` is not below the bitmap height.
    pub fn row(&self, y: u32) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let plan = self.plan();
        let start = y as usize * plan.row_bytes;
        self.data.get(start..start + plan.row_bytes_clipped)
    }
}

/// How a bitmap of a given width is split into raster commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Bytes per row in the source data.
    pub row_bytes: usize,
    /// Bytes per row actually sent.
    pub row_bytes_clipped: usize,
    /// Rows sent under a single raster command.
    pub chunk_height_limit: usize,
}

impl ChunkPlan {
    pub fn for_width(width: u32) -> Self {
        let row_bytes = row_bytes(width);
        let row_bytes_clipped = row_bytes.min(MAX_ROW_BYTES);
        let chunk_height_limit = (PRINTER_BUFFER_SIZE / row_bytes_clipped.max(1)).clamp(1, 255);

        ChunkPlan {
            row_bytes,
            row_bytes_clipped,
            chunk_height_limit,
        }
    }

    /// Bytes of each source row skipped because they do not fit.
    pub fn skipped_per_row(&self) -> usize {
        self.row_bytes - self.row_bytes_clipped
    }

    pub fn chunks(&self, height: u32) -> Chunks {
        Chunks {
            row_start: 0,
            height: height as usize,
            limit: self.chunk_height_limit,
        }
    }
}

/// A run of rows sent under one raster command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub row_start: usize,
    pub height: usize,
}

/// Iterator over the chunks of a bitmap, top to bottom.
#[derive(Debug, Clone)]
pub struct Chunks {
    row_start: usize,
    height: usize,
    limit: usize,
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row_start >= self.height {
            return None;
        }
        let chunk = Chunk {
            row_start: self.row_start,
            height: (self.height - self.row_start).min(self.limit),
        };
        self.row_start += self.limit;
        Some(chunk)
    }
}

/// Bytes needed for `width` pixels, rounded up to a byte boundary.
pub fn row_bytes(width: u32) -> usize {
    (width as usize + 7) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_narrow_image() {
        let plan = ChunkPlan::for_width(8);
        assert_eq!(plan.row_bytes, 1);
        assert_eq!(plan.row_bytes_clipped, 1);
        // 256 rows would fit, but the row count is a single byte
        assert_eq!(plan.chunk_height_limit, 255);
    }

    #[test]
    fn test_plan_full_width() {
        let plan = ChunkPlan::for_width(384);
        assert_eq!(plan.row_bytes, 48);
        assert_eq!(plan.row_bytes_clipped, 48);
        assert_eq!(plan.chunk_height_limit, 5);
        assert_eq!(plan.skipped_per_row(), 0);
    }

    #[test]
    fn test_plan_clips_wide_image() {
        let plan = ChunkPlan::for_width(400);
        assert_eq!(plan.row_bytes, 50);
        assert_eq!(plan.row_bytes_clipped, 48);
        assert_eq!(plan.chunk_height_limit, 5);
        assert_eq!(plan.skipped_per_row(), 2);
    }

    #[test]
    fn test_plan_rounds_partial_bytes_up() {
        assert_eq!(ChunkPlan::for_width(9).row_bytes, 2);
        assert_eq!(ChunkPlan::for_width(100).row_bytes, 13);
        assert_eq!(ChunkPlan::for_width(100).chunk_height_limit, 19);
    }

    #[test]
    fn test_chunks_cover_height() {
        let chunks: Vec<Chunk> = ChunkPlan::for_width(384).chunks(12).collect();
        assert_eq!(
            chunks,
            vec![
                Chunk { row_start: 0, height: 5 },
                Chunk { row_start: 5, height: 5 },
                Chunk { row_start: 10, height: 2 },
            ]
        );
    }

    #[test]
    fn test_chunks_empty_height() {
        assert_eq!(ChunkPlan::for_width(384).chunks(0).count(), 0);
    }

    #[test]
    fn test_bitmap_rejects_short_data() {
        let data = [0u8; 10];
        match Bitmap::new(16, 6, &data) {
            Err(Error::BitmapTooShort { expected, actual }) => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bitmap_rejects_zero_width() {
        assert!(matches!(Bitmap::new(0, 3, &[]), Err(Error::EmptyBitmap)));
        assert!(Bitmap::new(0, 0, &[]).is_ok());
    }

    #[test]
    fn test_bitmap_row_skips_clipped_bytes() {
        let data: Vec<u8> = (0..100).map(|i| i as u8).collect();
        let bitmap = Bitmap::new(400, 2, &data).unwrap();

        assert!(bitmap.is_clipped());
        assert_eq!(bitmap.row(0), Some(&data[0..48]));
        assert_eq!(bitmap.row(1), Some(&data[50..98]));
    }

    #[test]
    fn test_bitmap_row_out_of_range() {
        let data = [0xFFu8; 4];
        let bitmap = Bitmap::new(16, 2, &data).unwrap();

        assert_eq!(bitmap.row(1), Some(&data[2..4]));
        assert_eq!(bitmap.row(2), None);
        assert_eq!(bitmap.row(u32::MAX), None);
        assert_eq!(Bitmap::new(0, 0, &[]).unwrap().row(0), None);
    }
}
