// ============================================================================
// FILTERS — separable Gaussian blur for coverage masks
// ============================================================================

/// Convert a paint-style blur radius to a Gaussian sigma
/// (`sigma = radius * 1/sqrt(3) + 0.5`), as mask filters and render effects
/// interpret their radius.
#[inline]
pub fn radius_to_sigma(radius: f32) -> f32 {
    if radius <= 0.0 {
        0.0
    } else {
        radius * 0.57735 + 0.5
    }
}

/// Build a 1-D Gaussian kernel truncated at ceil(3*sigma).
pub fn build_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil() as usize;
    if radius == 0 {
        return vec![1.0];
    }
    let len = radius * 2 + 1;
    let mut kernel = vec![0.0f32; len];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;
    for (i, item) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        let v = (-x * x / s2).exp();
        *item = v;
        sum += v;
    }
    let inv = 1.0 / sum;
    for v in &mut kernel {
        *v *= inv;
    }
    kernel
}

/// Separable Gaussian blur of a single-channel `w` × `h` plane.
///
/// Samples outside the plane read as zero, so a shape blurred near the edge
/// fades out instead of smearing the border value.
pub fn gaussian_blur_plane(src: &[f32], w: usize, h: usize, sigma: f32) -> Vec<f32> {
    if w == 0 || h == 0 || sigma <= 0.0 {
        return src.to_vec();
    }
    let kernel = build_gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    // --- Horizontal pass ---
    let mut buf_h = vec![0.0f32; w * h];
    for (y, row_out) in buf_h.chunks_mut(w).enumerate() {
        let row_in = &src[y * w..(y + 1) * w];
        for (x, out) in row_out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sx = x as isize + ki as isize - radius;
                if sx >= 0 && (sx as usize) < w {
                    acc += row_in[sx as usize] * kv;
                }
            }
            *out = acc;
        }
    }

    // --- Vertical pass ---
    let mut buf_v = vec![0.0f32; w * h];
    for (y, row_out) in buf_v.chunks_mut(w).enumerate() {
        for (x, out) in row_out.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (ki, &kv) in kernel.iter().enumerate() {
                let sy = y as isize + ki as isize - radius;
                if sy >= 0 && (sy as usize) < h {
                    acc += buf_h[sy as usize * w + x] * kv;
                }
            }
            *out = acc;
        }
    }
    buf_v
}
