// ============================================================================
// BLUR — tiered blur backends with a guaranteed software floor
// ============================================================================
//
// Tiers are tried in order: GPU compute, the image library's intrinsic
// Gaussian, then StackBlur.  A tier is skipped when the device profile rules
// it out, and abandoned when it returns an error or panics.  StackBlur always
// runs last and cannot fail, so `BlurChain::blur` is total.

pub mod hardware;
pub mod intrinsic;
pub mod stack;

use std::panic::{self, AssertUnwindSafe};

use image::RgbaImage;

use crate::error::BlurError;
use crate::host::DeviceProfile;

pub use hardware::GpuBlur;
pub use intrinsic::IntrinsicBlur;
pub use stack::StackBlur;

/// One blur implementation.
///
/// `radius` is in working-resolution pixels.  Output has the same size as
/// `src`; alpha is not meaningful and is written opaque.
pub trait BlurBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this device may use the backend at all.
    fn is_available(&self, profile: &DeviceProfile) -> bool;

    fn blur(&self, src: &RgbaImage, radius: f32) -> Result<RgbaImage, BlurError>;
}

pub struct BlurChain {
    backends: Vec<Box<dyn BlurBackend>>,
    fallback: StackBlur,
}

impl BlurChain {
    /// GPU → intrinsic → stack.  The GPU device is opened on first use.
    pub fn standard() -> Self {
        Self::with_backends(vec![Box::new(GpuBlur::new()), Box::new(IntrinsicBlur)])
    }

    /// Software only: intrinsic → stack.
    pub fn software() -> Self {
        Self::with_backends(vec![Box::new(IntrinsicBlur)])
    }

    /// Custom upper tiers; StackBlur is always appended as the floor.
    pub fn with_backends(backends: Vec<Box<dyn BlurBackend>>) -> Self {
        Self {
            backends,
            fallback: StackBlur,
        }
    }

    /// Names of the tiers in the order they are tried.
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.backends
            .iter()
            .map(|b| b.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Blur `src` with the first tier that succeeds.
    pub fn blur(&self, profile: &DeviceProfile, src: &RgbaImage, radius: f32) -> RgbaImage {
        for backend in &self.backends {
            if !backend.is_available(profile) {
                continue;
            }
            match run_guarded(backend.as_ref(), src, radius) {
                Ok(out) if out.dimensions() == src.dimensions() => return out,
                Ok(out) => {
                    log_warn!(
                        "blur: {} returned {}x{} for a {}x{} input, trying next tier",
                        backend.name(),
                        out.width(),
                        out.height(),
                        src.width(),
                        src.height()
                    );
                }
                Err(e) => {
                    log_warn!("blur: {} failed ({}), trying next tier", backend.name(), e);
                }
            }
        }
        self.fallback.blur_rgba(src, stack::software_radius(radius))
    }
}

/// Run one backend, turning a panic into `BlurError::Panicked`.
fn run_guarded(
    backend: &dyn BlurBackend,
    src: &RgbaImage,
    radius: f32,
) -> Result<RgbaImage, BlurError> {
    match panic::catch_unwind(AssertUnwindSafe(|| backend.blur(src, radius))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(BlurError::Panicked {
                backend: backend.name(),
                message,
            })
        }
    }
}
