// ============================================================================
// STACK BLUR — linear-time software blur, the terminal tier
// ============================================================================
//
// Two separable passes of a triangular-weighted sliding window.  For radius r
// the window spans 2r+1 pixels and the tap at offset i weighs r+1-|i|, so the
// weights sum to (r+1)^2.  Each step drops the pixel leaving the window and
// admits the one entering it:
//
//   sum  -= out_sum            (left half loses one unit of weight)
//   out  -= leaving pixel
//   in   += entering pixel
//   sum  += in_sum             (right half gains one unit of weight)
//   move the centre pixel from `in` to `out`
//
// Cost per pixel is constant regardless of r.  Division by (r+1)^2 goes
// through a lookup table.  Reads past either end replicate the edge pixel.
//
// The horizontal pass writes three u8 planes; the vertical pass reads those
// and writes RGBA with alpha forced to 255.  Alpha is applied later by the
// compositor.

use image::RgbaImage;

use super::BlurBackend;
use crate::error::BlurError;
use crate::host::DeviceProfile;

/// Largest radius honoured; larger requests are clamped.
pub const MAX_RADIUS: u32 = 254;

/// Division lookup for one radius: `dv[i] = i / (r+1)^2`.
pub struct DivTable {
    divsum: u32,
    table: Vec<u8>,
}

impl DivTable {
    pub fn new(radius: u32) -> Self {
        let div = 2 * radius + 1;
        let half = (div + 1) >> 1;
        let divsum = half * half;
        let table = (0..256 * divsum).map(|i| (i / divsum) as u8).collect();
        Self { divsum, table }
    }

    /// Sum of all window weights, (r+1)^2.
    pub fn divsum(&self) -> u32 {
        self.divsum
    }

    #[inline]
    pub fn div(&self, weighted_sum: u32) -> u8 {
        self.table[weighted_sum as usize]
    }
}

/// Software blur with no external dependency; cannot fail.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackBlur;

impl StackBlur {
    /// Blur `src` with integer radius `radius`.  Radius 0 yields an opaque copy.
    pub fn blur_rgba(&self, src: &RgbaImage, radius: u32) -> RgbaImage {
        let (w, h) = (src.width() as usize, src.height() as usize);
        let mut out = RgbaImage::new(src.width(), src.height());
        if w == 0 || h == 0 {
            return out;
        }

        let radius = radius.min(MAX_RADIUS);
        if radius == 0 {
            for (dst, p) in out.pixels_mut().zip(src.pixels()) {
                *dst = image::Rgba([p[0], p[1], p[2], 255]);
            }
            return out;
        }

        let dv = DivTable::new(radius);
        let mut stack = vec![[0u32; 3]; (2 * radius + 1) as usize];
        let mut line_in: Vec<[u8; 3]> = Vec::with_capacity(w.max(h));
        let mut line_out: Vec<[u8; 3]> = vec![[0; 3]; w.max(h)];

        // Per-channel intermediate planes.
        let mut r = vec![0u8; w * h];
        let mut g = vec![0u8; w * h];
        let mut b = vec![0u8; w * h];

        // Horizontal pass: packed pixels → planes.
        let raw = src.as_raw();
        for y in 0..h {
            line_in.clear();
            let row = &raw[y * w * 4..(y + 1) * w * 4];
            line_in.extend(row.chunks_exact(4).map(|p| [p[0], p[1], p[2]]));
            blur_line(&line_in, &mut line_out[..w], radius, &dv, &mut stack);
            for (x, px) in line_out[..w].iter().enumerate() {
                let i = y * w + x;
                r[i] = px[0];
                g[i] = px[1];
                b[i] = px[2];
            }
        }

        // Vertical pass: planes → packed pixels, alpha opaque.
        let dst = out.as_mut();
        for x in 0..w {
            line_in.clear();
            line_in.extend((0..h).map(|y| {
                let i = y * w + x;
                [r[i], g[i], b[i]]
            }));
            blur_line(&line_in, &mut line_out[..h], radius, &dv, &mut stack);
            for (y, px) in line_out[..h].iter().enumerate() {
                let o = (y * w + x) * 4;
                dst[o] = px[0];
                dst[o + 1] = px[1];
                dst[o + 2] = px[2];
                dst[o + 3] = 255;
            }
        }
        out
    }
}

/// One sliding-window pass over a line of pixels.
fn blur_line(
    input: &[[u8; 3]],
    output: &mut [[u8; 3]],
    radius: u32,
    dv: &DivTable,
    stack: &mut [[u32; 3]],
) {
    let n = input.len();
    let last = n - 1;
    let r = radius as usize;
    let div = stack.len();
    let at = |i: isize| -> [u32; 3] {
        let p = input[i.clamp(0, last as isize) as usize];
        [p[0] as u32, p[1] as u32, p[2] as u32]
    };

    let mut sum = [0u32; 3];
    let mut in_sum = [0u32; 3];
    let mut out_sum = [0u32; 3];

    // Prime the window centred on pixel 0.
    for i in -(r as isize)..=(r as isize) {
        let px = at(i);
        stack[(i + r as isize) as usize] = px;
        let weight = (r + 1) as u32 - i.unsigned_abs() as u32;
        for c in 0..3 {
            sum[c] += px[c] * weight;
            if i > 0 {
                in_sum[c] += px[c];
            } else {
                out_sum[c] += px[c];
            }
        }
    }

    let mut sp = r;
    for (x, out) in output.iter_mut().enumerate() {
        *out = [dv.div(sum[0]), dv.div(sum[1]), dv.div(sum[2])];

        // The slot holding the pixel that leaves on the left is reused for the
        // pixel entering on the right.
        let start = (sp + div - r) % div;
        let entering = at((x + r + 1).min(last) as isize);
        for c in 0..3 {
            sum[c] -= out_sum[c];
            out_sum[c] -= stack[start][c];
            in_sum[c] += entering[c];
            sum[c] += in_sum[c];
        }
        stack[start] = entering;

        sp = (sp + 1) % div;
        let centre = stack[sp];
        for c in 0..3 {
            out_sum[c] += centre[c];
            in_sum[c] -= centre[c];
        }
    }
}

impl BlurBackend for StackBlur {
    fn name(&self) -> &'static str {
        "stack"
    }

    fn is_available(&self, _profile: &DeviceProfile) -> bool {
        true
    }

    fn blur(&self, src: &RgbaImage, radius: f32) -> Result<RgbaImage, BlurError> {
        Ok(self.blur_rgba(src, software_radius(radius)))
    }
}

/// Fractional radius → integer window radius, at least 1.
pub fn software_radius(radius: f32) -> u32 {
    (radius.max(0.0) as u32).max(1)
}
