use bytemuck::{Pod, Zeroable};

/// Instanced line shader.
///
/// Each [`LineInstance`](crate::surface::LineInstance) expands to a quad
/// covering the segment plus its caps. Coordinates arrive in device pixels
/// with the origin top-left, like a 2D canvas.
pub const LINE_SHADER: &str = r#"
struct Viewport {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0)
var<uniform> viewport: Viewport;

struct LineIn {
    @location(0) start: vec2<f32>,
    @location(1) end: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
    @location(4) cap: u32,
};

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    // x runs along the segment from its start, y across it, in pixels
    @location(0) local: vec2<f32>,
    @location(1) color: vec4<f32>,
    // segment length, half width
    @location(2) @interpolate(flat) dims: vec2<f32>,
    @location(3) @interpolate(flat) cap: u32,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32, line: LineIn) -> VertexOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(0.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(0.0, 1.0),
    );
    let corner = corners[vertex_index];

    let delta = line.end - line.start;
    let len = length(delta);
    var dir = vec2<f32>(1.0, 0.0);
    if len > 0.0001 {
        dir = delta / len;
    }
    let normal = vec2<f32>(-dir.y, dir.x);
    // Keep hairlines at least one pixel wide.
    let half_w = max(line.width * 0.5, 0.5);

    var ext = 0.0;
    if line.cap != 0u {
        ext = half_w;
    }
    let u = mix(-ext, len + ext, corner.x);
    let v = corner.y * half_w;
    let pixel = line.start + dir * u + normal * v;

    var out: VertexOut;
    out.clip = vec4<f32>(
        pixel.x / viewport.size.x * 2.0 - 1.0,
        1.0 - pixel.y / viewport.size.y * 2.0,
        0.0,
        1.0,
    );
    out.local = vec2<f32>(u, v);
    out.color = line.color;
    out.dims = vec2<f32>(len, half_w);
    out.cap = line.cap;
    return out;
}

@fragment
fn fs_main(input: VertexOut) -> @location(0) vec4<f32> {
    var alpha = input.color.a;
    if input.cap == 1u {
        let along = clamp(input.local.x, 0.0, input.dims.x);
        let d = distance(input.local, vec2<f32>(along, 0.0));
        alpha = alpha * clamp(input.dims.y - d + 0.5, 0.0, 1.0);
    }
    if alpha <= 0.0 {
        discard;
    }
    return vec4<f32>(input.color.rgb, alpha);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct ViewportUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}
