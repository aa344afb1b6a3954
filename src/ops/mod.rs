// ============================================================================
// OPS — CPU raster operations used by the compositor
// ============================================================================

pub mod canvas;
pub mod effects;
pub mod filters;
pub mod shapes;
pub mod transform;
