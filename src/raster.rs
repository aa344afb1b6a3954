// ============================================================================
// RASTER — shared pixel buffers and format helpers
// ============================================================================
//
// Rasters are `image::RgbaImage` (row-major, 4 bytes/pixel, straight alpha).
// Finished glass layers are handed out as `SharedRaster` so the cache and the
// caller hold the same buffer.

use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::color::Color;

/// A finished, read-only raster shared between the cache and its callers.
pub type SharedRaster = Arc<RgbaImage>;

/// Byte footprint used for cache accounting (width × height × 4).
#[inline]
pub fn byte_size(img: &RgbaImage) -> usize {
    img.width() as usize * img.height() as usize * 4
}

/// Solid raster of a single color.
pub fn solid(width: u32, height: u32, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color.to_rgba()))
}

/// Pack a raster into row-major ARGB8888 words.
pub fn to_argb_pixels(img: &RgbaImage) -> Vec<u32> {
    img.pixels()
        .map(|p| Color::argb(p[3], p[0], p[1], p[2]).0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing_is_row_major() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(1, 0, Rgba([0xFF, 0, 0, 0xFF]));
        assert_eq!(to_argb_pixels(&img), vec![0x0401_0203, 0xFFFF_0000]);
    }

    #[test]
    fn byte_size_counts_four_per_pixel() {
        assert_eq!(byte_size(&RgbaImage::new(300, 150)), 180_000);
    }
}
