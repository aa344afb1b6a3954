// ============================================================================
// FrostGlass CLI — headless glass / shadow rendering
// ============================================================================
//
// Usage examples:
//   frostglass --wallpaper wall.jpg --size 300x150
//   frostglass -w wall.png -s 320x180 --preset dark --consumer 1 2 3 -o out/
//   frostglass -w wall.png -s 300x150 --material glass.toml --profile phone.toml
//
// Each consumer id is rendered on the rayon pool; all of them share one
// effect cache.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rayon::prelude::*;

use frostglass::config::{load_material, load_profile};
use frostglass::{
    DeviceProfile, DeviceTier, FileWallpaper, GlassEffectCache, GlassMaterial, GlassRenderer,
};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Light,
    Dark,
}

/// FrostGlass headless renderer.
#[derive(Parser, Debug)]
#[command(
    name = "frostglass",
    about = "Render frosted-glass panel and shadow rasters from a wallpaper",
    long_about = "Blur a wallpaper into a frosted-glass panel and render its drop shadow,\n\
                  writing glass_<id>.png and shadow_<id>.png for each consumer id.\n\
                  A missing or unreadable wallpaper yields the flat fallback panel.\n\n\
                  Example:\n  \
                  frostglass --wallpaper wall.jpg --size 300x150 --preset dark --consumer 1 2"
)]
pub struct CliArgs {
    /// Wallpaper image (PNG, JPEG, WEBP, BMP).
    #[arg(short, long, value_name = "IMAGE")]
    pub wallpaper: PathBuf,

    /// Panel size in pixels, WIDTHxHEIGHT.
    #[arg(short, long, value_parser = parse_size, value_name = "WxH")]
    pub size: (u32, u32),

    /// Built-in material preset.  Ignored when --material is given.
    #[arg(short, long, value_enum, default_value_t = Preset::Light)]
    pub preset: Preset,

    /// Material TOML file; missing fields take the light preset's values.
    #[arg(short, long, value_name = "FILE.toml")]
    pub material: Option<PathBuf>,

    /// Device profile TOML file.
    #[arg(long, value_name = "FILE.toml")]
    pub profile: Option<PathBuf>,

    /// Treat the device as low-end (flat panel, no blur).
    #[arg(long)]
    pub low_end: bool,

    /// Never try the GPU blur tier.
    #[arg(long)]
    pub no_gpu: bool,

    /// Consumer ids to render.
    #[arg(short, long, num_args = 1.., default_values_t = [0])]
    pub consumer: Vec<i32>,

    /// Output directory.
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Mirror log lines to stderr and print per-consumer timing.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be at least 1x1, got '{s}'"));
    }
    Ok((w, h))
}

// ============================================================================
// Public entry point
// ============================================================================

/// Render every requested consumer and return an OS exit code.
/// `0` = all files written, `1` = config or I/O failure.
pub fn run(args: CliArgs) -> ExitCode {
    if args.verbose {
        frostglass::logger::set_echo(true);
    }

    let material = match &args.material {
        Some(path) => match load_material(path) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => match args.preset {
            Preset::Light => GlassMaterial::light_glass(),
            Preset::Dark => GlassMaterial::dark_glass(),
        },
    };

    let mut profile = match &args.profile {
        Some(path) => match load_profile(path) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => DeviceProfile::default(),
    };
    if args.low_end {
        profile.tier = DeviceTier::Low;
    }
    if args.no_gpu {
        profile.hardware_blur = false;
    }

    if let Err(e) = std::fs::create_dir_all(&args.output_dir) {
        eprintln!(
            "error: could not create output directory '{}': {}",
            args.output_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let renderer = GlassRenderer::for_wallpaper(
        Arc::new(FileWallpaper::new(&args.wallpaper)),
        Arc::new(GlassEffectCache::new()),
        profile,
    );
    let (width, height) = args.size;

    let failures: usize = args
        .consumer
        .par_iter()
        .map(|&id| {
            let start = Instant::now();
            match render_one(&renderer, &material, width, height, id, &args.output_dir) {
                Ok(()) => {
                    if args.verbose {
                        println!(
                            "consumer {} → {} ({:.0}ms)",
                            id,
                            args.output_dir.display(),
                            start.elapsed().as_secs_f64() * 1000.0
                        );
                    }
                    0
                }
                Err(e) => {
                    eprintln!("  error: consumer {id}: {e}");
                    1
                }
            }
        })
        .sum();

    if args.verbose {
        let stats = renderer.cache().stats();
        println!(
            "cache: {} entries, {} bytes, {} hits, {} misses",
            stats.entries, stats.resident_bytes, stats.hits, stats.misses
        );
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn render_one(
    renderer: &GlassRenderer,
    material: &GlassMaterial,
    width: u32,
    height: u32,
    id: i32,
    out_dir: &Path,
) -> Result<(), image::ImageError> {
    let glass = renderer.render_glass(material, width, height, id);
    glass.save(out_dir.join(format!("glass_{id}.png")))?;
    let shadow = renderer.render_shadow(material, width, height);
    shadow.save(out_dir.join(format!("shadow_{id}.png")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("300x150"), Ok((300, 150)));
        assert_eq!(parse_size("12X7"), Ok((12, 7)));
        assert!(parse_size("300").is_err());
        assert!(parse_size("0x5").is_err());
        assert!(parse_size("ax5").is_err());
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = CliArgs::parse_from(["frostglass", "-w", "wall.png", "-s", "300x150"]);
        assert_eq!(args.size, (300, 150));
        assert_eq!(args.preset, Preset::Light);
        assert_eq!(args.consumer, vec![0]);
        assert!(!args.low_end);
    }

    #[test]
    fn args_parse_consumer_list() {
        let args = CliArgs::parse_from([
            "frostglass", "-w", "w.png", "-s", "10x10", "--preset", "dark", "--consumer", "1", "2",
            "3",
        ]);
        assert_eq!(args.preset, Preset::Dark);
        assert_eq!(args.consumer, vec![1, 2, 3]);
    }
}
