// ============================================================================
// WGSL SHADERS
// ============================================================================

/// Separable Gaussian blur, one direction per dispatch.
///
/// Each 256-thread workgroup loads its tile plus a `radius`-wide apron into
/// shared memory, clamping reads at the texture edge.  Alpha is written as 1.
/// Max supported radius = 127 → shared array max = 256 + 2*127 = 510.
pub const GAUSSIAN_BLUR_SHADER: &str = r#"
struct BlurParams {
    radius: u32,
    direction: u32,  // 0 = horizontal, 1 = vertical
    width: u32,
    height: u32,
};

@group(0) @binding(0) var input_tex: texture_2d<f32>;
@group(0) @binding(1) var output_tex: texture_storage_2d<rgba8unorm, write>;
@group(0) @binding(2) var<uniform> params: BlurParams;
@group(0) @binding(3) var<storage, read> kernel: array<f32>;

const TILE_W: u32 = 256u;
const MAX_SHARED: u32 = 512u;

var<workgroup> shared_tile: array<vec3<f32>, MAX_SHARED>;

fn load_px(along: i32, across: u32) -> vec3<f32> {
    if (params.direction == 0u) {
        let gx = clamp(along, 0, i32(params.width) - 1);
        return textureLoad(input_tex, vec2<u32>(u32(gx), across), 0).rgb;
    }
    let gy = clamp(along, 0, i32(params.height) - 1);
    return textureLoad(input_tex, vec2<u32>(across, u32(gy)), 0).rgb;
}

@compute @workgroup_size(256, 1, 1)
fn cs_blur(@builtin(local_invocation_id) lid: vec3<u32>,
           @builtin(workgroup_id) wid: vec3<u32>) {
    let radius = i32(params.radius);
    let tile_start = i32(wid.x) * i32(TILE_W);
    let local_idx = i32(lid.x);

    // wid.y is the row (horizontal) or column (vertical) index.
    var line_len = params.width;
    var lines = params.height;
    if (params.direction == 1u) {
        line_len = params.height;
        lines = params.width;
    }
    let across = wid.y;
    if (across >= lines) { return; }

    let apron_size = i32(TILE_W) + 2 * radius;
    var i = local_idx;
    while (i < apron_size) {
        shared_tile[i] = load_px(tile_start + i - radius, across);
        i = i + i32(TILE_W);
    }
    workgroupBarrier();

    let along = tile_start + local_idx;
    if (along >= i32(line_len)) { return; }

    var color = vec3<f32>(0.0, 0.0, 0.0);
    for (var k: i32 = -radius; k <= radius; k = k + 1) {
        color = color + shared_tile[local_idx + radius + k] * kernel[u32(k + radius)];
    }

    var pos = vec2<u32>(u32(along), across);
    if (params.direction == 1u) {
        pos = vec2<u32>(across, u32(along));
    }
    textureStore(output_tex, pos, vec4<f32>(color, 1.0));
}
"#;
