// ============================================================================
// GPU MODULE — hardware compute blur
// ============================================================================
//
//   context.rs — wgpu Device, Queue, adapter init
//   shaders.rs — WGSL shader source (inline strings)
//   blur.rs    — separable Gaussian compute pipeline + readback
// ============================================================================

pub mod blur;
pub mod context;
pub mod shaders;

pub use blur::GpuBlurPipeline;
pub use context::GpuContext;
