//! FrostGlass — frosted-glass raster compositing.
//!
//! Given a wallpaper and a [`GlassMaterial`], [`GlassRenderer`] produces a
//! translucent, blurred panel raster and a matching soft-shadow raster.  Blur
//! runs on the best available tier (GPU compute, the image library's
//! Gaussian, or a software StackBlur) and finished panels are kept in a
//! byte-budgeted [`GlassEffectCache`].  Every failure path degrades to a
//! simpler raster of the requested size; nothing is returned as an error.

#[macro_use]
pub mod logger;

pub mod blur;
pub mod cache;
pub mod color;
pub mod config;
pub mod error;
pub mod extractor;
pub mod gpu;
pub mod host;
pub mod material;
pub mod ops;
pub mod raster;
pub mod renderer;

pub use blur::{BlurBackend, BlurChain};
pub use cache::{CacheStats, GlassEffectCache};
pub use color::Color;
pub use error::{BlurError, ConfigError, ExtractError, HostError};
pub use extractor::{BackdropSource, BackgroundExtractor, BackgroundRequest};
pub use host::{DeviceProfile, DeviceTier, FileWallpaper, NoWallpaper, WallpaperSource};
pub use material::{BlurQuality, GlassMaterial};
pub use raster::SharedRaster;
pub use renderer::GlassRenderer;
