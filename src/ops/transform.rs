// ============================================================================
// TRANSFORM — working-resolution resampling
// ============================================================================

use image::{imageops, Rgba, RgbaImage};

use super::effects::sample_bilinear;

/// Bilinearly rescale `src` to `tw` × `th` with alpha forced opaque.
///
/// The output buffer is reserved fallibly; `Err` carries the byte count that
/// could not be allocated so the caller can degrade instead of aborting.
pub fn try_resample_opaque(src: &RgbaImage, tw: u32, th: u32) -> Result<RgbaImage, usize> {
    let bytes = tw as usize * th as usize * 4;
    let mut raw: Vec<u8> = Vec::new();
    raw.try_reserve_exact(bytes).map_err(|_| bytes)?;

    if src.width() == 0 || src.height() == 0 {
        raw.resize(bytes, 0);
        return RgbaImage::from_raw(tw, th, raw).ok_or(bytes);
    }

    let sx = src.width() as f32 / tw as f32;
    let sy = src.height() as f32 / th as f32;
    for y in 0..th {
        let fy = (y as f32 + 0.5) * sy - 0.5;
        for x in 0..tw {
            let fx = (x as f32 + 0.5) * sx - 0.5;
            let p = sample_bilinear(src, fx, fy);
            raw.push(p[0].round().clamp(0.0, 255.0) as u8);
            raw.push(p[1].round().clamp(0.0, 255.0) as u8);
            raw.push(p[2].round().clamp(0.0, 255.0) as u8);
            raw.push(255);
        }
    }
    RgbaImage::from_raw(tw, th, raw).ok_or(bytes)
}

/// Smooth (bilinear) resize to exactly `w` × `h`.
pub fn resize_smooth(src: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    if src.width() == w && src.height() == h {
        return src.clone();
    }
    if src.width() == 0 || src.height() == 0 {
        return RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]));
    }
    imageops::resize(src, w, h, imageops::FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_forces_opaque_and_keeps_flat_colour() {
        let src = RgbaImage::from_pixel(40, 40, Rgba([10, 20, 30, 7]));
        let out = try_resample_opaque(&src, 10, 10).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert!(out.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn resize_hits_exact_dimensions() {
        let src = RgbaImage::from_pixel(12, 7, Rgba([1, 2, 3, 255]));
        assert_eq!(resize_smooth(&src, 301, 149).dimensions(), (301, 149));
        assert_eq!(resize_smooth(&src, 1, 1).dimensions(), (1, 1));
    }
}
