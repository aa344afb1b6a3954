// ============================================================================
// EFFECTS — grain tile, highlight gradient, bilinear sampling
// ============================================================================

use image::RgbaImage;

/// Edge length of the grain tile.
pub const NOISE_TILE_SIZE: u32 = 64;
/// Seed for the grain tile, fixed so every render gets the same texture.
pub const NOISE_SEED: u32 = 12345;

/// Simple hash for deterministic noise.
#[inline]
fn hash_u32(mut x: u32) -> u32 {
    x = x.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;
    x
}

/// Square tile of greyscale grain, sampled with repeat-wrap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseTile {
    size: u32,
    values: Vec<u8>,
}

impl NoiseTile {
    pub fn new(size: u32, seed: u32) -> Self {
        let size = size.max(1);
        let values = (0..size * size)
            .map(|i| {
                let h = hash_u32(i.wrapping_mul(374761393).wrapping_add(seed));
                (h >> 24) as u8
            })
            .collect();
        Self { size, values }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Grey level at canvas position (x, y), tiled.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        let tx = x % self.size;
        let ty = y % self.size;
        self.values[(ty * self.size + tx) as usize]
    }
}

impl Default for NoiseTile {
    fn default() -> Self {
        Self::new(NOISE_TILE_SIZE, NOISE_SEED)
    }
}

/// Alpha (0–1) of a top highlight that starts at `opacity` on row 0 and
/// fades linearly to nothing at `fade_height`.  `None` past the fade.
#[inline]
pub fn highlight_alpha(y: u32, fade_height: f32, opacity: f32) -> Option<f32> {
    let cy = y as f32 + 0.5;
    if fade_height <= 0.0 || cy >= fade_height {
        return None;
    }
    Some(opacity * (1.0 - cy / fade_height))
}

/// Clamp-sample a pixel from an image (replicate at edges).
#[inline]
fn sample_clamped(img: &RgbaImage, x: i32, y: i32) -> [f32; 4] {
    let cx = x.clamp(0, img.width() as i32 - 1) as u32;
    let cy = y.clamp(0, img.height() as i32 - 1) as u32;
    let p = img.get_pixel(cx, cy);
    [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
}

/// Bilinear-sample at fractional coordinates.
#[inline]
pub fn sample_bilinear(img: &RgbaImage, fx: f32, fy: f32) -> [f32; 4] {
    let x0 = fx.floor() as i32;
    let y0 = fy.floor() as i32;
    let x1 = x0 + 1;
    let y1 = y0 + 1;
    let dx = fx - x0 as f32;
    let dy = fy - y0 as f32;

    let p00 = sample_clamped(img, x0, y0);
    let p10 = sample_clamped(img, x1, y0);
    let p01 = sample_clamped(img, x0, y1);
    let p11 = sample_clamped(img, x1, y1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        out[c] = p00[c] * (1.0 - dx) * (1.0 - dy)
            + p10[c] * dx * (1.0 - dy)
            + p01[c] * (1.0 - dx) * dy
            + p11[c] * dx * dy;
    }
    out
}
