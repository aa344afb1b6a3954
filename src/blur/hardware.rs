// Hardware tier: wgpu compute Gaussian blur.

use std::sync::OnceLock;

use image::RgbaImage;

use super::BlurBackend;
use crate::error::BlurError;
use crate::gpu::{GpuBlurPipeline, GpuContext};
use crate::host::DeviceProfile;
use crate::ops::filters::radius_to_sigma;

struct GpuBlurDevice {
    ctx: GpuContext,
    pipeline: GpuBlurPipeline,
}

/// Opens the GPU on first use and keeps it for the life of the backend.  A
/// host without a usable adapter reports `Unsupported` on every call.
pub struct GpuBlur {
    device: OnceLock<Option<GpuBlurDevice>>,
}

impl GpuBlur {
    pub fn new() -> Self {
        Self {
            device: OnceLock::new(),
        }
    }

    fn device(&self) -> Option<&GpuBlurDevice> {
        self.device
            .get_or_init(|| {
                let ctx = GpuContext::new()?;
                log_info!("gpu: using adapter {}", ctx.adapter_name);
                let pipeline = GpuBlurPipeline::new(&ctx.device);
                Some(GpuBlurDevice { ctx, pipeline })
            })
            .as_ref()
    }
}

impl Default for GpuBlur {
    fn default() -> Self {
        Self::new()
    }
}

impl BlurBackend for GpuBlur {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn is_available(&self, profile: &DeviceProfile) -> bool {
        profile.allows_hardware_blur()
    }

    fn blur(&self, src: &RgbaImage, radius: f32) -> Result<RgbaImage, BlurError> {
        let (w, h) = src.dimensions();
        let unsupported = BlurError::Unsupported {
            backend: "gpu",
            width: w,
            height: h,
        };
        let Some(dev) = self.device() else {
            return Err(unsupported);
        };
        if !dev.ctx.supports_size(w, h) {
            return Err(unsupported);
        }

        let data = dev
            .pipeline
            .blur_image(&dev.ctx, src.as_raw(), w, h, radius_to_sigma(radius))
            .map_err(|message| BlurError::Device {
                backend: "gpu",
                message,
            })?;
        RgbaImage::from_raw(w, h, data).ok_or(BlurError::Device {
            backend: "gpu",
            message: "short readback".to_string(),
        })
    }
}
