// ============================================================================
// GLASS RENDERER — compositing, caching, device-tier fallback, shadows
// ============================================================================
//
// Layer order inside the rounded clip:
//   1. blurred backdrop
//   2. flat tint at background color / opacity
//   3. grain tile (optional)
//   4. top highlight gradient (optional)
// The border stroke is drawn after the clip is released.

use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};

use crate::cache::GlassEffectCache;
use crate::color::{alpha_from_opacity, Color};
use crate::extractor::{BackdropSource, BackgroundExtractor, BackgroundRequest};
use crate::host::{DeviceProfile, WallpaperSource};
use crate::material::GlassMaterial;
use crate::ops::canvas::Canvas;
use crate::ops::effects::{highlight_alpha, NoiseTile};
use crate::ops::filters::{gaussian_blur_plane, radius_to_sigma};
use crate::ops::shapes::{RectF, RoundedRect};
use crate::raster::SharedRaster;

/// Panel corner radius, density-independent.
pub const PANEL_CORNER_RADIUS: f32 = 22.0;
/// Shadow corner radius, density-independent.
pub const SHADOW_CORNER_RADIUS: f32 = 24.0;
/// The highlight fades out at this fraction of the panel height.
pub const HIGHLIGHT_FADE_FRACTION: f32 = 0.4;

/// Opacity added to the tint on low-end devices, where there is no backdrop.
const LOW_END_OPACITY_BOOST: f32 = 0.2;
/// Border stroke on low-end devices, density-independent.
const LOW_END_BORDER_WIDTH: f32 = 1.5;

pub struct GlassRenderer {
    backdrop: Arc<dyn BackdropSource>,
    cache: Arc<GlassEffectCache>,
    profile: DeviceProfile,
    noise: OnceLock<NoiseTile>,
}

impl GlassRenderer {
    pub fn new(
        backdrop: Arc<dyn BackdropSource>,
        cache: Arc<GlassEffectCache>,
        profile: DeviceProfile,
    ) -> Self {
        Self {
            backdrop,
            cache,
            profile,
            noise: OnceLock::new(),
        }
    }

    /// Renderer over a wallpaper source with the standard blur chain.
    pub fn for_wallpaper(
        source: Arc<dyn WallpaperSource>,
        cache: Arc<GlassEffectCache>,
        profile: DeviceProfile,
    ) -> Self {
        let extractor = BackgroundExtractor::with_standard_chain(source, profile.clone());
        Self::new(Arc::new(extractor), cache, profile)
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn cache(&self) -> &Arc<GlassEffectCache> {
        &self.cache
    }

    /// The grain tile, generated on first use.
    pub fn noise_tile(&self) -> &NoiseTile {
        self.noise.get_or_init(NoiseTile::default)
    }

    /// Render a glass panel of exactly `width` × `height`.
    ///
    /// Results are cached per consumer; an identical request returns the same
    /// buffer.  Low-end devices get an uncached flat panel instead.
    pub fn render_glass(
        &self,
        material: &GlassMaterial,
        width: u32,
        height: u32,
        consumer_id: i32,
    ) -> SharedRaster {
        if width == 0 || height == 0 {
            return Arc::new(RgbaImage::new(width, height));
        }

        if self.profile.is_low_end() {
            log_info!(
                "renderer: low-end device, flat glass for consumer {} ({}x{})",
                consumer_id,
                width,
                height
            );
            return Arc::new(self.render_low_end(material, width, height));
        }

        let key = GlassEffectCache::key(
            consumer_id,
            width,
            height,
            material.blur_radius,
            material.is_dark(),
        );
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let raster: SharedRaster = Arc::new(self.composite(material, width, height));
        self.cache.put(key, raster.clone());
        raster
    }

    fn composite(&self, material: &GlassMaterial, width: u32, height: u32) -> RgbaImage {
        let density = self.profile.density;
        let corner = PANEL_CORNER_RADIUS * density;

        let backdrop = self.backdrop.create_glass_background(&BackgroundRequest {
            width,
            height,
            tint: material.background_color,
            tint_opacity: material.background_opacity,
            blur_radius: material.blur_radius,
            quality: material.blur_quality,
        });

        let mut out = RgbaImage::new(width, height);
        let mut canvas = Canvas::new(&mut out);
        canvas.clip_rounded_rect(RectF::of_size(width, height), corner);

        canvas.draw_image(&backdrop);
        drop(backdrop);

        canvas.fill(
            material
                .background_color
                .with_alpha(alpha_from_opacity(material.background_opacity)),
        );

        if material.has_noise {
            let tile = self.noise_tile();
            let opacity = material.noise_opacity;
            canvas.shade(|x, y| {
                let v = tile.sample(x, y);
                Some(([v, v, v], opacity))
            });
        }

        if material.has_top_highlight {
            let fade = height as f32 * HIGHLIGHT_FADE_FRACTION;
            let opacity = material.highlight_opacity;
            canvas.shade(|_, y| highlight_alpha(y, fade, opacity).map(|a| ([255, 255, 255], a)));
        }

        canvas.restore();

        let stroke = material.border_width * density;
        let inset = stroke / 2.0;
        canvas.stroke_rounded_rect(
            RectF::of_size(width, height).inset(inset),
            corner - inset,
            stroke,
            material
                .border_color
                .with_alpha(alpha_from_opacity(material.border_opacity)),
        );

        out
    }

    /// Flat rounded panel with a faint border.  No wallpaper, blur, grain or
    /// highlight.
    fn render_low_end(&self, material: &GlassMaterial, width: u32, height: u32) -> RgbaImage {
        let density = self.profile.density;
        let corner = PANEL_CORNER_RADIUS * density;
        let mut out = RgbaImage::new(width, height);
        let mut canvas = Canvas::new(&mut out);

        let fill_opacity = (material.background_opacity + LOW_END_OPACITY_BOOST).min(1.0);
        canvas.fill_rounded_rect(
            RectF::of_size(width, height),
            corner,
            material
                .background_color
                .with_alpha(alpha_from_opacity(fill_opacity)),
        );

        let stroke = LOW_END_BORDER_WIDTH * density;
        let inset = stroke / 2.0;
        canvas.stroke_rounded_rect(
            RectF::of_size(width, height).inset(inset),
            corner - inset,
            stroke,
            material
                .border_color
                .with_alpha(alpha_from_opacity(material.border_opacity * 0.5)),
        );
        out
    }

    /// Render the soft drop shadow for a `width` × `height` panel.
    ///
    /// The raster is taller than the panel by the shadow offset plus twice the
    /// blur radius.  Not cached; independent of device tier.
    pub fn render_shadow(&self, material: &GlassMaterial, width: u32, height: u32) -> RgbaImage {
        let density = self.profile.density;
        let blur = (material.shadow_blur * density).max(0.0);
        let offset = (material.shadow_offset_y * density).max(0.0);
        let out_h = height.saturating_add((offset + 2.0 * blur).ceil() as u32);

        let mut out = RgbaImage::new(width, out_h);
        if width == 0 || out_h == 0 {
            return out;
        }

        let rect = RectF::new(blur, offset + blur, width as f32 - blur, height as f32 + offset - blur);
        if rect.is_empty() {
            return out;
        }

        let shape = RoundedRect::new(rect, SHADOW_CORNER_RADIUS * density);
        let (w, h) = (width as usize, out_h as usize);
        let mut mask = Vec::with_capacity(w * h);
        for y in 0..out_h {
            for x in 0..width {
                mask.push(shape.fill_coverage(x, y));
            }
        }
        let mask = gaussian_blur_plane(&mask, w, h, radius_to_sigma(blur));

        let color: Color = material.shadow_color;
        let max_alpha = alpha_from_opacity(material.shadow_opacity) as f32;
        let [r, g, b] = color.rgb();
        for (p, m) in out.pixels_mut().zip(mask) {
            let a = (m * max_alpha).round().clamp(0.0, 255.0) as u8;
            if a > 0 {
                *p = Rgba([r, g, b, a]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DeviceTier, NoWallpaper};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backdrop that counts calls and returns a mid-grey opaque raster.
    #[derive(Default)]
    struct CountingBackdrop {
        calls: AtomicUsize,
    }

    impl BackdropSource for CountingBackdrop {
        fn create_glass_background(&self, req: &BackgroundRequest) -> RgbaImage {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RgbaImage::from_pixel(req.width, req.height, Rgba([128, 128, 128, 255]))
        }
    }

    fn renderer_with(backdrop: Arc<CountingBackdrop>, profile: DeviceProfile) -> GlassRenderer {
        GlassRenderer::new(backdrop, Arc::new(GlassEffectCache::new()), profile)
    }

    #[test]
    fn glass_is_cached_per_consumer() {
        let backdrop = Arc::new(CountingBackdrop::default());
        let r = renderer_with(backdrop.clone(), DeviceProfile::default());
        let m = GlassMaterial::light_glass();

        let a = r.render_glass(&m, 60, 40, 1);
        let b = r.render_glass(&m, 60, 40, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(backdrop.calls.load(Ordering::SeqCst), 1);

        let _ = r.render_glass(&m, 60, 40, 12);
        assert_eq!(backdrop.calls.load(Ordering::SeqCst), 2);

        r.cache().invalidate(1);
        let c = r.render_glass(&m, 60, 40, 1);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(*a, *c);
        let _ = r.render_glass(&m, 60, 40, 12);
        assert_eq!(backdrop.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn dark_variant_has_its_own_entry() {
        let backdrop = Arc::new(CountingBackdrop::default());
        let r = renderer_with(backdrop.clone(), DeviceProfile::default());
        let light = r.render_glass(&GlassMaterial::light_glass(), 30, 30, 4);
        let dark = r.render_glass(&GlassMaterial::dark_glass(), 30, 30, 4);
        assert!(!Arc::ptr_eq(&light, &dark));
        assert_eq!(backdrop.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn corners_are_clipped_and_centre_is_opaque() {
        let r = renderer_with(Arc::new(CountingBackdrop::default()), DeviceProfile::default());
        let out = r.render_glass(&GlassMaterial::light_glass(), 120, 80, 0);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(60, 40)[3], 255);
    }

    #[test]
    fn highlight_brightens_the_top() {
        let mut m = GlassMaterial::light_glass();
        m.has_noise = false;
        let r = renderer_with(Arc::new(CountingBackdrop::default()), DeviceProfile::default());
        let out = r.render_glass(&m, 100, 100, 0);
        let top = out.get_pixel(50, 3)[0];
        let bottom = out.get_pixel(50, 60)[0];
        assert!(top > bottom);
    }

    #[test]
    fn low_end_is_flat_and_uncached() {
        let backdrop = Arc::new(CountingBackdrop::default());
        let profile = DeviceProfile {
            tier: DeviceTier::Low,
            ..DeviceProfile::default()
        };
        let r = renderer_with(backdrop.clone(), profile);
        let m = GlassMaterial::light_glass();
        let a = r.render_glass(&m, 80, 60, 3);
        let b = r.render_glass(&m, 80, 60, 3);
        assert_eq!(backdrop.calls.load(Ordering::SeqCst), 0);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(r.cache().stats().entries, 0);
        // (0.15 + 0.2) * 255 truncates to 89.
        assert_eq!(*a.get_pixel(40, 30), Rgba([255, 255, 255, 89]));
    }

    #[test]
    fn zero_sized_glass_is_empty_and_uncached() {
        let r = GlassRenderer::for_wallpaper(
            Arc::new(NoWallpaper),
            Arc::new(GlassEffectCache::new()),
            DeviceProfile::default(),
        );
        assert_eq!(r.render_glass(&GlassMaterial::light_glass(), 0, 5, 1).dimensions(), (0, 5));
        assert_eq!(r.cache().stats().entries, 0);
    }

    #[test]
    fn shadow_is_taller_and_soft() {
        let r = renderer_with(Arc::new(CountingBackdrop::default()), DeviceProfile::default());
        let m = GlassMaterial::light_glass();
        let s = r.render_shadow(&m, 200, 100);
        // 100 + 6 + 2 * 10
        assert_eq!(s.dimensions(), (200, 126));
        let peak = s.pixels().map(|p| p[3]).max().unwrap_or(0);
        assert!(peak > 0 && peak <= alpha_from_opacity(m.shadow_opacity));
        assert!(s.pixels().all(|p| p[3] == 0 || p.0[..3] == [0, 0, 0]));
        assert_eq!(s.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn shadow_of_tiny_panel_is_transparent() {
        let r = renderer_with(Arc::new(CountingBackdrop::default()), DeviceProfile::default());
        let s = r.render_shadow(&GlassMaterial::dark_glass(), 4, 4);
        assert_eq!(s.dimensions(), (4, 4 + 8 + 32));
        assert!(s.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn noise_tile_is_created_once() {
        let r = renderer_with(Arc::new(CountingBackdrop::default()), DeviceProfile::default());
        let a = r.noise_tile() as *const NoiseTile;
        let b = r.noise_tile() as *const NoiseTile;
        assert_eq!(a, b);
    }
}
