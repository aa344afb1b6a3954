// ============================================================================
// HOST — wallpaper source and device capabilities
// ============================================================================
//
// The pipeline never reaches into the platform directly.  Everything it needs
// from the host comes through `WallpaperSource` (the backdrop pixels) and
// `DeviceProfile` (what the device can do).  Both are read, never written.

use std::path::{Path, PathBuf};

use image::error::{ImageError, LimitErrorKind};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::HostError;

const GIB: u64 = 1024 * 1024 * 1024;

/// Devices below this much RAM get the flat fallback instead of glass.
pub const LOW_END_MEMORY_BYTES: u64 = 2 * GIB;
/// Devices below this much RAM skip GPU blur and cap the blur radius.
pub const LOW_RAM_MEMORY_BYTES: u64 = 3 * GIB;
/// Blur radius cap on low-RAM devices, in density-independent units.
pub const LOW_RAM_MAX_BLUR_RADIUS: f32 = 15.0;

/// Supplies the current wallpaper.
///
/// `Ok(None)` means "no wallpaper set"; errors cover permission denial and
/// any other platform fault.  The pipeline treats all three the same way.
pub trait WallpaperSource: Send + Sync {
    fn current_wallpaper(&self) -> Result<Option<RgbaImage>, HostError>;

    /// Best-effort hint that memory is tight.  Default: nothing to release.
    fn trim_memory(&self) {}
}

/// Coarse performance classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    #[default]
    Normal,
    Low,
}

/// What the host offers.  Loaded from a profile file by the CLI; embedders
/// fill it from their platform queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    /// A GPU blur path may be attempted.
    pub hardware_blur: bool,
    /// The image library's intrinsic blur may be used.
    pub blur_intrinsic: bool,
    pub tier: DeviceTier,
    /// Fewer than 3 GiB of RAM: no GPU blur, blur radius capped.
    pub low_ram: bool,
    pub display_width: u32,
    pub display_height: u32,
    /// Pixels per density-independent unit.
    pub density: f32,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            hardware_blur: true,
            blur_intrinsic: true,
            tier: DeviceTier::Normal,
            low_ram: false,
            display_width: 1080,
            display_height: 2400,
            density: 1.0,
        }
    }
}

impl DeviceProfile {
    /// Classify a device from its total RAM.
    pub fn from_total_memory(
        total_bytes: u64,
        display_width: u32,
        display_height: u32,
        density: f32,
    ) -> Self {
        let low_ram = total_bytes < LOW_RAM_MEMORY_BYTES;
        Self {
            hardware_blur: !low_ram,
            blur_intrinsic: true,
            tier: if total_bytes < LOW_END_MEMORY_BYTES {
                DeviceTier::Low
            } else {
                DeviceTier::Normal
            },
            low_ram,
            display_width,
            display_height,
            density,
        }
    }

    pub fn is_low_end(&self) -> bool {
        self.tier == DeviceTier::Low
    }

    pub fn display_pixels(&self) -> u64 {
        self.display_width as u64 * self.display_height as u64
    }

    /// GPU blur is worth trying: the host offers it and RAM is not tight.
    pub fn allows_hardware_blur(&self) -> bool {
        self.hardware_blur && !self.low_ram
    }

    /// Requested blur radius, capped on low-RAM devices.
    pub fn recommended_blur_radius(&self, requested: f32) -> f32 {
        if self.low_ram {
            requested.min(LOW_RAM_MAX_BLUR_RADIUS)
        } else {
            requested
        }
    }
}

// ---------------------------------------------------------------------------
//  Stock wallpaper sources
// ---------------------------------------------------------------------------

/// Wallpaper decoded from an image file on every request.
pub struct FileWallpaper {
    path: PathBuf,
}

impl FileWallpaper {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WallpaperSource for FileWallpaper {
    fn current_wallpaper(&self) -> Result<Option<RgbaImage>, HostError> {
        match image::open(&self.path) {
            Ok(img) => Ok(Some(img.to_rgba8())),
            Err(ImageError::IoError(e)) => match e.kind() {
                std::io::ErrorKind::NotFound => Ok(None),
                std::io::ErrorKind::PermissionDenied => Err(HostError::PermissionDenied),
                _ => Err(HostError::Other(e.to_string())),
            },
            Err(ImageError::Limits(e))
                if matches!(e.kind(), LimitErrorKind::InsufficientMemory) =>
            {
                Err(HostError::OutOfMemory)
            }
            Err(e) => Err(HostError::Other(e.to_string())),
        }
    }
}

/// A host with no wallpaper at all.
pub struct NoWallpaper;

impl WallpaperSource for NoWallpaper {
    fn current_wallpaper(&self) -> Result<Option<RgbaImage>, HostError> {
        Ok(None)
    }
}
