// ============================================================================
// BACKGROUND EXTRACTOR — wallpaper → downsample → blur → upsample
// ============================================================================
//
// Blurring happens at a fraction of the target resolution: a quarter of each
// side (less on very large displays), further reduced by the material's blur
// quality.  The blurred result is scaled back up to exactly the requested
// size.  Every failure degrades to a flat tint; nothing propagates.

use std::sync::Arc;

use image::RgbaImage;

use crate::blur::BlurChain;
use crate::color::{alpha_from_opacity, Color};
use crate::error::{ExtractError, HostError};
use crate::host::{DeviceProfile, WallpaperSource};
use crate::material::BlurQuality;
use crate::ops::transform::{resize_smooth, try_resample_opaque};
use crate::raster::solid;

/// Working scale for ordinary displays.
pub const WORKING_SCALE: f32 = 0.25;
/// Working scale once the display exceeds `LARGE_DISPLAY_PIXELS`.
pub const LARGE_DISPLAY_SCALE: f32 = 0.15;
pub const LARGE_DISPLAY_PIXELS: u64 = 12_000_000;
/// Floor for each side of the working raster.
pub const MIN_WORKING_SIDE: u32 = 10;

/// Parameters of one backdrop request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackgroundRequest {
    pub width: u32,
    pub height: u32,
    /// Flat-fallback color.
    pub tint: Color,
    /// Flat-fallback opacity, 0–1.
    pub tint_opacity: f32,
    /// Blur radius at target resolution.
    pub blur_radius: f32,
    pub quality: BlurQuality,
}

impl BackgroundRequest {
    /// The flat raster returned whenever the wallpaper cannot be used.
    pub fn flat_fallback(&self) -> RgbaImage {
        solid(
            self.width,
            self.height,
            self.tint.with_alpha(alpha_from_opacity(self.tint_opacity)),
        )
    }
}

/// Produces the blurred backdrop for a glass panel.  Always returns a raster
/// of exactly `req.width` × `req.height`.
pub trait BackdropSource: Send + Sync {
    fn create_glass_background(&self, req: &BackgroundRequest) -> RgbaImage;
}

pub struct BackgroundExtractor {
    source: Arc<dyn WallpaperSource>,
    chain: BlurChain,
    profile: DeviceProfile,
}

impl BackgroundExtractor {
    pub fn new(source: Arc<dyn WallpaperSource>, chain: BlurChain, profile: DeviceProfile) -> Self {
        Self {
            source,
            chain,
            profile,
        }
    }

    /// Standard GPU → intrinsic → stack chain.
    pub fn with_standard_chain(source: Arc<dyn WallpaperSource>, profile: DeviceProfile) -> Self {
        Self::new(source, BlurChain::standard(), profile)
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Downsampling factor applied before blurring.
    pub fn working_scale(&self, quality: BlurQuality) -> f32 {
        let base = if self.profile.display_pixels() > LARGE_DISPLAY_PIXELS {
            LARGE_DISPLAY_SCALE
        } else {
            WORKING_SCALE
        };
        base * quality.resolution_fraction()
    }

    fn extract(&self, req: &BackgroundRequest) -> Result<RgbaImage, ExtractError> {
        let wallpaper = self
            .source
            .current_wallpaper()?
            .filter(|img| img.width() > 0 && img.height() > 0)
            .ok_or(ExtractError::NoWallpaper)?;

        let scale = self.working_scale(req.quality);
        let ww = working_side(req.width, scale);
        let wh = working_side(req.height, scale);

        let small = try_resample_opaque(&wallpaper, ww, wh)
            .map_err(|bytes| ExtractError::OutOfMemory { bytes })?;
        drop(wallpaper);

        let radius = self.profile.recommended_blur_radius(req.blur_radius) * scale;
        let blurred = self.chain.blur(&self.profile, &small, radius);
        drop(small);

        Ok(resize_smooth(&blurred, req.width, req.height))
    }
}

impl BackdropSource for BackgroundExtractor {
    fn create_glass_background(&self, req: &BackgroundRequest) -> RgbaImage {
        if req.width == 0 || req.height == 0 {
            return RgbaImage::new(req.width, req.height);
        }
        match self.extract(req) {
            Ok(img) => img,
            Err(e) => {
                if matches!(
                    e,
                    ExtractError::OutOfMemory { .. } | ExtractError::Host(HostError::OutOfMemory)
                ) {
                    self.source.trim_memory();
                }
                log_warn!("extractor: {}, using flat {}x{} fill", e, req.width, req.height);
                req.flat_fallback()
            }
        }
    }
}

fn working_side(side: u32, scale: f32) -> u32 {
    ((side as f32 * scale) as u32).max(MIN_WORKING_SIDE)
}
