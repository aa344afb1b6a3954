// ============================================================================
// COLOR — packed ARGB8888 colors and opacity helpers
// ============================================================================

use serde::{Deserialize, Serialize};

/// A packed 32-bit ARGB color (`0xAARRGGBB`).
///
/// Serialized as a plain integer so config files can write `0xFFFFFFFF`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const TRANSPARENT: Color = Color(0x0000_0000);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// Same RGB, alpha replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Color::argb(a, self.r(), self.g(), self.b())
    }

    /// RGBA byte order, as stored in an `RgbaImage`.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), self.a()]
    }

    pub const fn rgb(self) -> [u8; 3] {
        [self.r(), self.g(), self.b()]
    }
}

/// Opacity in [0, 1] to an 8-bit alpha.  Truncates like a paint alpha setter
/// and saturates out-of-range input (NaN maps to 0).
#[inline]
pub fn alpha_from_opacity(opacity: f32) -> u8 {
    (opacity * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_unpack_from_argb() {
        let c = Color(0x80_11_22_33);
        assert_eq!((c.a(), c.r(), c.g(), c.b()), (0x80, 0x11, 0x22, 0x33));
        assert_eq!(Color::argb(0x80, 0x11, 0x22, 0x33), c);
        assert_eq!(c.to_rgba(), [0x11, 0x22, 0x33, 0x80]);
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        assert_eq!(Color::WHITE.with_alpha(0), Color(0x00FF_FFFF));
        assert_eq!(Color::BLACK.with_alpha(0x7F).rgb(), [0, 0, 0]);
    }

    #[test]
    fn opacity_saturates() {
        assert_eq!(alpha_from_opacity(0.0), 0);
        assert_eq!(alpha_from_opacity(1.0), 255);
        assert_eq!(alpha_from_opacity(0.15), 38);
        assert_eq!(alpha_from_opacity(3.0), 255);
        assert_eq!(alpha_from_opacity(-1.0), 0);
        assert_eq!(alpha_from_opacity(f32::NAN), 0);
    }
}
