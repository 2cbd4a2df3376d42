//! WGSL source of the particle field program.
//!
//! wgpu has no point primitives with a size, so every particle is drawn as an instanced quad of
//! two triangles. The vertex stage scales the quad in screen space and the fragment stage cuts
//! it down to a disc.

/// Particle program. Group 0 holds the uniforms, group 1 the picture, the displacement texture
/// and their shared sampler.
pub(crate) const PARTICLES_WGSL: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    resolution: vec2<f32>,
    point_size: f32,
    displacement_strength: f32,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

@group(1) @binding(0) var t_picture: texture_2d<f32>;
@group(1) @binding(1) var t_displacement: texture_2d<f32>;
@group(1) @binding(2) var s_field: sampler;

struct ParticleInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) intensity: f32,
    @location(3) angle: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) corner: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vi: u32, particle: ParticleInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vi];

    // Raster row 0 is the top edge, UV v = 1 is the top edge.
    let sample_uv = vec2<f32>(particle.uv.x, 1.0 - particle.uv.y);

    let trail = textureSampleLevel(t_displacement, s_field, sample_uv, 0.0).r;
    let displacement = smoothstep(0.1, 0.3, trail);
    let direction = normalize(vec3<f32>(cos(particle.angle) * 0.2, sin(particle.angle) * 0.2, 1.0));
    let displaced = particle.position
        + direction * displacement * uniforms.displacement_strength * particle.intensity;

    let view_position = uniforms.view * vec4<f32>(displaced, 1.0);
    var clip = uniforms.projection * view_position;

    let picture = textureSampleLevel(t_picture, s_field, sample_uv, 0.0).r;
    let size = uniforms.point_size * picture * uniforms.resolution.y / -view_position.z;
    let offset = corner * size / uniforms.resolution;
    clip = vec4<f32>(clip.xy + offset * clip.w, clip.zw);

    var out: VertexOutput;
    out.clip_position = clip;
    out.color = vec3<f32>(picture * picture);
    out.corner = corner;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if (length(in.corner) > 1.0) {
        discard;
    }
    return vec4<f32>(in.color, 1.0);
}
"#;

/// Vertices emitted per particle instance.
pub(crate) const VERTICES_PER_PARTICLE: u32 = 6;
