// ============================================================================
// SHAPES — rounded-rectangle geometry via signed distance fields
// ============================================================================

/// Axis-aligned rectangle in pixel coordinates (edges, not centres).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// The full extent of a `width` × `height` raster.
    pub fn of_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Shrink every side by `d`.
    pub fn inset(self, d: f32) -> Self {
        Self::new(self.left + d, self.top + d, self.right - d, self.bottom - d)
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }
}

/// A rounded rectangle ready for per-pixel coverage queries.
#[derive(Clone, Copy, Debug)]
pub struct RoundedRect {
    cx: f32,
    cy: f32,
    hx: f32,
    hy: f32,
    radius: f32,
}

impl RoundedRect {
    pub fn new(rect: RectF, radius: f32) -> Self {
        Self {
            cx: (rect.left + rect.right) * 0.5,
            cy: (rect.top + rect.bottom) * 0.5,
            hx: ((rect.right - rect.left) * 0.5).max(0.0),
            hy: ((rect.bottom - rect.top) * 0.5).max(0.0),
            radius: radius.max(0.0),
        }
    }

    /// Signed distance from the pixel centre at (x, y); negative inside.
    #[inline]
    pub fn distance(&self, x: u32, y: u32) -> f32 {
        let px = x as f32 + 0.5 - self.cx;
        let py = y as f32 + 0.5 - self.cy;
        sdf_rounded_box(px, py, self.hx, self.hy, self.radius)
    }

    /// Antialiased fill coverage in [0, 1].
    #[inline]
    pub fn fill_coverage(&self, x: u32, y: u32) -> f32 {
        smoothstep(0.5, -0.5, self.distance(x, y))
    }

    /// Antialiased coverage of a stroke of `width` centred on the outline.
    #[inline]
    pub fn stroke_coverage(&self, x: u32, y: u32, width: f32) -> f32 {
        let band = self.distance(x, y).abs() - width * 0.5;
        smoothstep(0.5, -0.5, band)
    }
}

/// SDF for a box centred at origin with half-extents (hx, hy).
#[inline]
fn sdf_box(px: f32, py: f32, hx: f32, hy: f32) -> f32 {
    let dx = px.abs() - hx;
    let dy = py.abs() - hy;
    let outside = (dx.max(0.0) * dx.max(0.0) + dy.max(0.0) * dy.max(0.0)).sqrt();
    let inside = dx.max(dy).min(0.0);
    outside + inside
}

/// SDF for a rounded box.  The radius never exceeds the shorter half-extent.
#[inline]
fn sdf_rounded_box(px: f32, py: f32, hx: f32, hy: f32, r: f32) -> f32 {
    let r = r.min(hx).min(hy);
    sdf_box(px, py, hx - r, hy - r) - r
}

/// Smoothstep between edge0 and edge1.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_is_covered_and_corner_is_not() {
        let rr = RoundedRect::new(RectF::of_size(100, 50), 22.0);
        assert_eq!(rr.fill_coverage(50, 25), 1.0);
        // The extreme corner pixel lies outside a 22 px rounding.
        assert_eq!(rr.fill_coverage(0, 0), 0.0);
        // Straight edges are still reached.
        assert!(rr.fill_coverage(50, 0) > 0.4);
    }

    #[test]
    fn stroke_hugs_the_outline() {
        let rr = RoundedRect::new(RectF::of_size(100, 50).inset(1.0), 21.0);
        assert!(rr.stroke_coverage(50, 0, 2.0) > 0.5);
        assert_eq!(rr.stroke_coverage(50, 25, 2.0), 0.0);
    }

    #[test]
    fn radius_is_limited_by_extent() {
        let rr = RoundedRect::new(RectF::of_size(10, 10), 100.0);
        // Degenerates to a circle of radius 5.
        assert_eq!(rr.fill_coverage(5, 5), 1.0);
        assert_eq!(rr.fill_coverage(0, 0), 0.0);
    }

    #[test]
    fn inset_and_empty() {
        let r = RectF::of_size(4, 4).inset(1.0);
        assert_eq!(r, RectF::new(1.0, 1.0, 3.0, 3.0));
        assert!(RectF::of_size(4, 4).inset(3.0).is_empty());
    }
}
