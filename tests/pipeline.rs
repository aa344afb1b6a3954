use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use proptest::prelude::*;

use frostglass::blur::StackBlur;
use frostglass::{
    BackdropSource, BackgroundExtractor, BackgroundRequest, BlurBackend, BlurChain, BlurError,
    BlurQuality, Color, DeviceProfile, DeviceTier, GlassEffectCache, GlassMaterial,
    GlassRenderer, HostError, NoWallpaper, WallpaperSource,
};

// ---------------------------------------------------------------------------
//  Fakes
// ---------------------------------------------------------------------------

/// Wallpaper with a diagonal colour ramp; counts reads.
struct RampWallpaper {
    reads: AtomicUsize,
}

impl RampWallpaper {
    fn new() -> Self {
        Self {
            reads: AtomicUsize::new(0),
        }
    }
}

impl WallpaperSource for RampWallpaper {
    fn current_wallpaper(&self) -> Result<Option<RgbaImage>, HostError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(RgbaImage::from_fn(400, 240, |x, y| {
            Rgba([(x * 255 / 399) as u8, (y * 255 / 239) as u8, ((x + y) % 256) as u8, 255])
        })))
    }
}

struct BrokenWallpaper;

impl WallpaperSource for BrokenWallpaper {
    fn current_wallpaper(&self) -> Result<Option<RgbaImage>, HostError> {
        Err(HostError::Other("wallpaper service crashed".into()))
    }
}

/// Wraps an extractor and counts how often it is asked for a backdrop.
struct CountingBackdrop {
    inner: BackgroundExtractor,
    calls: AtomicUsize,
}

impl BackdropSource for CountingBackdrop {
    fn create_glass_background(&self, req: &BackgroundRequest) -> RgbaImage {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_glass_background(req)
    }
}

struct DeviceLost;

impl BlurBackend for DeviceLost {
    fn name(&self) -> &'static str {
        "device-lost"
    }
    fn is_available(&self, _: &DeviceProfile) -> bool {
        true
    }
    fn blur(&self, _: &RgbaImage, _: f32) -> Result<RgbaImage, BlurError> {
        Err(BlurError::Device {
            backend: "device-lost",
            message: "context lost".into(),
        })
    }
}

struct Exploding;

impl BlurBackend for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }
    fn is_available(&self, _: &DeviceProfile) -> bool {
        true
    }
    fn blur(&self, _: &RgbaImage, _: f32) -> Result<RgbaImage, BlurError> {
        panic!("shader compiler crashed");
    }
}

fn software_profile() -> DeviceProfile {
    DeviceProfile {
        hardware_blur: false,
        ..DeviceProfile::default()
    }
}

fn software_renderer(source: Arc<dyn WallpaperSource>, profile: DeviceProfile) -> GlassRenderer {
    let extractor = BackgroundExtractor::new(source, BlurChain::software(), profile.clone());
    GlassRenderer::new(Arc::new(extractor), Arc::new(GlassEffectCache::new()), profile)
}

// ---------------------------------------------------------------------------
//  End to end
// ---------------------------------------------------------------------------

#[test]
fn second_identical_render_is_served_from_cache() {
    let wallpaper = Arc::new(RampWallpaper::new());
    let profile = software_profile();
    let backdrop = Arc::new(CountingBackdrop {
        inner: BackgroundExtractor::new(wallpaper.clone(), BlurChain::software(), profile.clone()),
        calls: AtomicUsize::new(0),
    });
    let cache = Arc::new(GlassEffectCache::new());
    let renderer = GlassRenderer::new(backdrop.clone(), cache.clone(), profile);
    let light = GlassMaterial::light_glass();

    let first = renderer.render_glass(&light, 300, 150, 7);
    assert_eq!(first.dimensions(), (300, 150));
    assert_eq!(backdrop.calls.load(Ordering::SeqCst), 1);
    assert_eq!(wallpaper.reads.load(Ordering::SeqCst), 1);

    let second = renderer.render_glass(&light, 300, 150, 7);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(backdrop.calls.load(Ordering::SeqCst), 1);
    assert_eq!(wallpaper.reads.load(Ordering::SeqCst), 1);

    let stats = cache.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.resident_bytes, 300 * 150 * 4);
    assert_eq!(stats.hits, 1);

    let key = GlassEffectCache::key(7, 300, 150, light.blur_radius, false);
    assert!(Arc::ptr_eq(&cache.get(&key).unwrap(), &first));
}

#[test]
fn invalidation_is_scoped_to_one_consumer() {
    let renderer = software_renderer(Arc::new(RampWallpaper::new()), software_profile());
    let m = GlassMaterial::light_glass();
    let one = renderer.render_glass(&m, 40, 20, 1);
    let twelve = renderer.render_glass(&m, 40, 20, 12);

    renderer.cache().invalidate(1);

    assert!(renderer
        .cache()
        .get(&GlassEffectCache::key(1, 40, 20, 25.0, false))
        .is_none());
    let twelve_again = renderer.render_glass(&m, 40, 20, 12);
    assert!(Arc::ptr_eq(&twelve, &twelve_again));
    let one_again = renderer.render_glass(&m, 40, 20, 1);
    assert!(!Arc::ptr_eq(&one, &one_again));
}

// ---------------------------------------------------------------------------
//  Fallbacks
// ---------------------------------------------------------------------------

#[test]
fn faulting_wallpaper_yields_flat_tint_of_exact_size() {
    let extractor =
        BackgroundExtractor::new(Arc::new(BrokenWallpaper), BlurChain::software(), software_profile());
    let req = BackgroundRequest {
        width: 123,
        height: 45,
        tint: Color::BLACK,
        tint_opacity: 0.35,
        blur_radius: 25.0,
        quality: BlurQuality::High,
    };
    let out = extractor.create_glass_background(&req);
    assert_eq!(out.dimensions(), (123, 45));
    assert!(out.pixels().all(|p| *p == Rgba([0, 0, 0, 89])));

    let renderer = software_renderer(Arc::new(BrokenWallpaper), software_profile());
    let glass = renderer.render_glass(&GlassMaterial::dark_glass(), 123, 45, 3);
    assert_eq!(glass.dimensions(), (123, 45));
}

#[test]
fn low_end_tier_bypasses_the_wallpaper() {
    let mut m = GlassMaterial::light_glass();
    m.has_noise = false;
    m.has_top_highlight = false;

    let low_wall = Arc::new(RampWallpaper::new());
    let low = software_renderer(
        low_wall.clone(),
        DeviceProfile {
            tier: DeviceTier::Low,
            ..software_profile()
        },
    );
    let flat = low.render_glass(&m, 200, 120, 5);
    assert_eq!(low_wall.reads.load(Ordering::SeqCst), 0);

    let interior: Vec<Rgba<u8>> = (40..80)
        .flat_map(|y| (40..160).map(move |x| (x, y)))
        .map(|(x, y)| *flat.get_pixel(x, y))
        .collect();
    assert!(interior.iter().all(|p| *p == interior[0]));

    let normal = software_renderer(Arc::new(RampWallpaper::new()), software_profile());
    let glass = normal.render_glass(&m, 200, 120, 5);
    let sampled: Vec<Rgba<u8>> = (40..80)
        .flat_map(|y| (40..160).map(move |x| (x, y)))
        .map(|(x, y)| *glass.get_pixel(x, y))
        .collect();
    assert!(sampled.iter().any(|p| *p != sampled[0]));
}

#[test]
fn chain_survives_failing_and_panicking_tiers() {
    let chain = BlurChain::with_backends(vec![Box::new(DeviceLost), Box::new(Exploding)]);
    assert_eq!(chain.tier_names(), vec!["device-lost", "exploding", "stack"]);

    let src = RgbaImage::from_fn(30, 18, |x, y| Rgba([(x * 8) as u8, (y * 14) as u8, 7, 255]));
    let out = chain.blur(&software_profile(), &src, 4.0);
    assert_eq!(out, StackBlur.blur_rgba(&src, 4));

    // The same chain still drives a full render.
    let extractor =
        BackgroundExtractor::new(Arc::new(RampWallpaper::new()), chain, software_profile());
    let renderer = GlassRenderer::new(
        Arc::new(extractor),
        Arc::new(GlassEffectCache::new()),
        software_profile(),
    );
    let glass = renderer.render_glass(&GlassMaterial::light_glass(), 64, 32, 9);
    assert_eq!(glass.dimensions(), (64, 32));
}

// ---------------------------------------------------------------------------
//  Determinism and shape
// ---------------------------------------------------------------------------

#[test]
fn noise_is_identical_across_renderers() {
    let m = GlassMaterial::dark_glass();
    let a = software_renderer(Arc::new(NoWallpaper), software_profile());
    let b = software_renderer(Arc::new(NoWallpaper), software_profile());
    assert_eq!(a.noise_tile(), b.noise_tile());
    assert_eq!(*a.render_glass(&m, 90, 70, 1), *b.render_glass(&m, 90, 70, 1));
}

#[test]
fn shadow_sits_below_the_panel() {
    let profile = DeviceProfile {
        density: 2.0,
        ..software_profile()
    };
    let renderer = software_renderer(Arc::new(NoWallpaper), profile);
    let m = GlassMaterial::light_glass();
    let s = renderer.render_shadow(&m, 240, 120);
    // 120 + (6 + 2 * 10) * 2
    assert_eq!(s.dimensions(), (240, 172));

    let row_alpha = |y: u32| (0..240).map(|x| s.get_pixel(x, y)[3] as u32).sum::<u32>();
    assert!(row_alpha(100) > row_alpha(2));
    assert_eq!(row_alpha(0), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn rendered_rasters_have_requested_shape(w in 1u32..96, h in 1u32..96, dark in any::<bool>()) {
        let renderer = software_renderer(Arc::new(RampWallpaper::new()), software_profile());
        let m = if dark { GlassMaterial::dark_glass() } else { GlassMaterial::light_glass() };

        let glass = renderer.render_glass(&m, w, h, 0);
        prop_assert_eq!(glass.dimensions(), (w, h));

        let shadow = renderer.render_shadow(&m, w, h);
        prop_assert_eq!(shadow.width(), w);
        prop_assert!(shadow.height() >= h);
    }
}
