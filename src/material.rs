// ============================================================================
// GLASS MATERIAL — visual parameters for one frosted-glass panel
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Resolution fraction used for the blur pass, on top of the working scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurQuality {
    /// Full working resolution.
    #[default]
    High,
    /// Half the working resolution.
    Medium,
    /// A quarter of the working resolution.
    Low,
}

impl BlurQuality {
    pub fn resolution_fraction(self) -> f32 {
        match self {
            BlurQuality::High => 1.0,
            BlurQuality::Medium => 0.5,
            BlurQuality::Low => 0.25,
        }
    }
}

/// Immutable description of a glass style.  Lengths are in density-independent
/// units; the renderer scales them by the device density.
///
/// Fields missing from a config file take the light-glass value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassMaterial {
    // Background
    pub background_color: Color,
    pub background_opacity: f32,

    // Blur
    pub blur_radius: f32,
    pub blur_quality: BlurQuality,

    // Edge
    pub border_color: Color,
    pub border_opacity: f32,
    pub border_width: f32,

    // Light reflection
    pub has_top_highlight: bool,
    pub highlight_opacity: f32,

    // Drop shadow
    pub shadow_color: Color,
    pub shadow_opacity: f32,
    pub shadow_blur: f32,
    pub shadow_offset_y: f32,

    // Grain
    pub has_noise: bool,
    pub noise_opacity: f32,
}

impl GlassMaterial {
    /// Light glass, for light wallpapers.
    pub fn light_glass() -> Self {
        Self {
            background_color: Color::WHITE,
            background_opacity: 0.15,
            blur_radius: 25.0,
            blur_quality: BlurQuality::High,
            border_color: Color::WHITE,
            border_opacity: 0.45,
            border_width: 1.5,
            has_top_highlight: true,
            highlight_opacity: 0.15,
            shadow_color: Color::BLACK,
            shadow_opacity: 0.12,
            shadow_blur: 10.0,
            shadow_offset_y: 6.0,
            has_noise: true,
            noise_opacity: 0.03,
        }
    }

    /// Dark glass, for dark wallpapers.
    pub fn dark_glass() -> Self {
        Self {
            background_color: Color::BLACK,
            background_opacity: 0.35,
            blur_radius: 25.0,
            blur_quality: BlurQuality::High,
            border_color: Color::WHITE,
            border_opacity: 0.15,
            border_width: 1.0,
            has_top_highlight: true,
            highlight_opacity: 0.08,
            shadow_color: Color::BLACK,
            shadow_opacity: 0.35,
            shadow_blur: 16.0,
            shadow_offset_y: 8.0,
            has_noise: true,
            noise_opacity: 0.04,
        }
    }

    /// Dark variants are partitioned separately in the effect cache.
    pub fn is_dark(&self) -> bool {
        self.background_color == Color::BLACK
    }
}

impl Default for GlassMaterial {
    fn default() -> Self {
        Self::light_glass()
    }
}
