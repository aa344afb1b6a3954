// ============================================================================
// CANVAS — clip-aware source-over drawing into an RgbaImage
// ============================================================================
//
// A minimal painter: one optional antialiased clip (a rounded rectangle),
// straight-alpha source-over blending, and the handful of primitives the glass
// compositor needs.  Draw calls run row by row on the calling thread.

use image::{Rgba, RgbaImage};

use crate::color::Color;

use super::shapes::{RectF, RoundedRect};

pub struct Canvas<'a> {
    target: &'a mut RgbaImage,
    /// Per-pixel clip coverage, row-major.  `None` = unclipped.
    clip: Option<Vec<f32>>,
}

impl<'a> Canvas<'a> {
    pub fn new(target: &'a mut RgbaImage) -> Self {
        Self { target, clip: None }
    }

    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Confine subsequent draws to a rounded rectangle.
    pub fn clip_rounded_rect(&mut self, rect: RectF, radius: f32) {
        let shape = RoundedRect::new(rect, radius);
        let (w, h) = (self.width(), self.height());
        let mut mask = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                mask.push(shape.fill_coverage(x, y));
            }
        }
        self.clip = Some(mask);
    }

    /// Drop the clip.
    pub fn restore(&mut self) {
        self.clip = None;
    }

    /// Draw `src` at the origin using its own alpha.
    pub fn draw_image(&mut self, src: &RgbaImage) {
        let w = self.width().min(src.width());
        let h = self.height().min(src.height());
        for y in 0..h {
            for x in 0..w {
                let p = src.get_pixel(x, y);
                self.blend(x, y, [p[0], p[1], p[2]], p[3] as f32 / 255.0);
            }
        }
    }

    /// Fill the whole canvas with one color.
    pub fn fill(&mut self, color: Color) {
        let rgb = color.rgb();
        let alpha = color.a() as f32 / 255.0;
        self.shade(|_, _| Some((rgb, alpha)));
    }

    /// Per-pixel paint: `shader(x, y)` yields `(rgb, alpha)` or `None` to skip.
    pub fn shade<F>(&mut self, shader: F)
    where
        F: Fn(u32, u32) -> Option<([u8; 3], f32)>,
    {
        let (w, h) = (self.width(), self.height());
        for y in 0..h {
            for x in 0..w {
                if let Some((rgb, alpha)) = shader(x, y) {
                    self.blend(x, y, rgb, alpha);
                }
            }
        }
    }

    pub fn fill_rounded_rect(&mut self, rect: RectF, radius: f32, color: Color) {
        if rect.is_empty() {
            return;
        }
        let shape = RoundedRect::new(rect, radius);
        let rgb = color.rgb();
        let alpha = color.a() as f32 / 255.0;
        self.shade(|x, y| {
            let cov = shape.fill_coverage(x, y);
            (cov > 0.001).then_some((rgb, alpha * cov))
        });
    }

    /// Stroke centred on the outline of `rect`.
    pub fn stroke_rounded_rect(&mut self, rect: RectF, radius: f32, width: f32, color: Color) {
        if rect.is_empty() || width <= 0.0 {
            return;
        }
        let shape = RoundedRect::new(rect, radius);
        let rgb = color.rgb();
        let alpha = color.a() as f32 / 255.0;
        self.shade(|x, y| {
            let cov = shape.stroke_coverage(x, y, width);
            (cov > 0.001).then_some((rgb, alpha * cov))
        });
    }

    #[inline]
    fn blend(&mut self, x: u32, y: u32, rgb: [u8; 3], alpha: f32) {
        let coverage = match &self.clip {
            Some(mask) => mask[y as usize * self.target.width() as usize + x as usize],
            None => 1.0,
        };
        blend_over(self.target.get_pixel_mut(x, y), rgb, alpha * coverage);
    }
}

/// Straight-alpha source-over of `rgb` at `alpha` onto `dst`.
#[inline]
pub fn blend_over(dst: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let sa = alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let v = (rgb[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_onto_transparent_keeps_source() {
        let mut p = Rgba([0, 0, 0, 0]);
        blend_over(&mut p, [200, 100, 50], 89.0 / 255.0);
        assert_eq!(p, Rgba([200, 100, 50, 89]));
    }

    #[test]
    fn opaque_source_replaces() {
        let mut p = Rgba([10, 20, 30, 255]);
        blend_over(&mut p, [1, 2, 3], 1.0);
        assert_eq!(p, Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn half_white_over_opaque_black() {
        let mut p = Rgba([0, 0, 0, 255]);
        blend_over(&mut p, [255, 255, 255], 0.5);
        assert_eq!(p, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn clip_masks_corners() {
        let mut img = RgbaImage::new(60, 40);
        {
            let mut canvas = Canvas::new(&mut img);
            canvas.clip_rounded_rect(RectF::of_size(60, 40), 15.0);
            canvas.fill(Color::WHITE);
            canvas.restore();
        }
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(*img.get_pixel(30, 20), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn unclipped_fill_reaches_corners() {
        let mut img = RgbaImage::new(8, 8);
        Canvas::new(&mut img).fill(Color::BLACK);
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn stroke_leaves_interior_untouched() {
        let mut img = RgbaImage::new(40, 40);
        Canvas::new(&mut img).stroke_rounded_rect(
            RectF::of_size(40, 40).inset(1.0),
            8.0,
            2.0,
            Color::WHITE,
        );
        assert_eq!(img.get_pixel(20, 20)[3], 0);
        assert!(img.get_pixel(20, 0)[3] > 0);
    }
}
