// Intrinsic tier: the image library's own Gaussian blur.

use image::{imageops, RgbaImage};

use super::BlurBackend;
use crate::error::BlurError;
use crate::host::DeviceProfile;
use crate::ops::filters::radius_to_sigma;

/// Radius ceiling of a platform blur intrinsic.
pub const MAX_INTRINSIC_RADIUS: f32 = 25.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct IntrinsicBlur;

impl BlurBackend for IntrinsicBlur {
    fn name(&self) -> &'static str {
        "intrinsic"
    }

    fn is_available(&self, profile: &DeviceProfile) -> bool {
        profile.blur_intrinsic
    }

    fn blur(&self, src: &RgbaImage, radius: f32) -> Result<RgbaImage, BlurError> {
        let sigma = radius_to_sigma(radius.clamp(0.0, MAX_INTRINSIC_RADIUS));
        let mut out = if sigma > 0.0 {
            imageops::blur(src, sigma)
        } else {
            src.clone()
        };
        for p in out.pixels_mut() {
            p[3] = 255;
        }
        Ok(out)
    }
}
