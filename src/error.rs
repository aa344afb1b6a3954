// ============================================================================
// ERRORS — host, blur, extraction and config failures
// ============================================================================
//
// None of these reach a `render_glass` / `render_shadow` caller; the pipeline
// recovers from each one locally.  They exist so every fallback path has a
// concrete cause to log and test against.

use std::path::PathBuf;

use thiserror::Error;

/// Faults reported by the host wallpaper source.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("permission denied reading wallpaper")]
    PermissionDenied,
    #[error("out of memory materialising wallpaper")]
    OutOfMemory,
    #[error("wallpaper source failed: {0}")]
    Other(String),
}

/// Faults raised by a blur backend.  `StackBlur` never produces one.
#[derive(Debug, Error)]
pub enum BlurError {
    #[error("{backend} cannot handle a {width}x{height} raster")]
    Unsupported {
        backend: &'static str,
        width: u32,
        height: u32,
    },
    #[error("{backend} device error: {message}")]
    Device {
        backend: &'static str,
        message: String,
    },
    #[error("{backend} panicked: {message}")]
    Panicked {
        backend: &'static str,
        message: String,
    },
}

/// Why the background extractor fell back to a flat fill.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no wallpaper available")]
    NoWallpaper,
    #[error(transparent)]
    Host(#[from] HostError),
    #[error("cannot allocate {bytes} bytes for the working raster")]
    OutOfMemory { bytes: usize },
}

/// Config file failures (CLI only).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
