//! Static particle grid and the per-particle random attributes.
//!
//! The grid is a flat square plane split into `n × n` segments whose `(n + 1)²` corners become
//! disconnected particles. Rows run from the top edge (`v = 1`) down, columns from the left edge
//! (`u = 0`) right. Everything here is generated once; the per-frame motion happens in the
//! vertex shader, mirrored by [`ParticleInstance::displacement`] for tests.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::util::smoothstep;

/// Displacement samples below this do not move particles.
pub const DISPLACEMENT_LOW_EDGE: f32 = 0.1;
/// Displacement samples above this move particles the full distance.
pub const DISPLACEMENT_HIGH_EDGE: f32 = 0.3;
/// How far the displacement direction leans into the XY plane.
pub const DISPLACEMENT_SPREAD: f32 = 0.2;

/// One particle as laid out in the instance buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    /// Uniform draw in `[0, 1)`, scales how far this particle can be pushed.
    pub intensity: f32,
    /// Uniform draw in `[0, 2π)`, direction of the push in the plane.
    pub angle: f32,
}

impl ParticleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
        2 => Float32,
        3 => Float32,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Offset the vertex shader adds to the base position for a displacement texture sample.
    pub fn displacement(&self, displacement_sample: f32, strength: f32) -> Vec3 {
        let amount = smoothstep(
            DISPLACEMENT_LOW_EDGE,
            DISPLACEMENT_HIGH_EDGE,
            displacement_sample,
        );
        let direction = Vec3::new(
            self.angle.cos() * DISPLACEMENT_SPREAD,
            self.angle.sin() * DISPLACEMENT_SPREAD,
            1.0,
        )
        .normalize();

        direction * amount * strength * self.intensity
    }
}

/// Point diameter in pixels, as computed by the vertex shader.
#[inline]
pub fn point_size_pixels(
    point_size: f32,
    picture_intensity: f32,
    resolution_height: f32,
    view_depth: f32,
) -> f32 {
    point_size * picture_intensity * resolution_height / view_depth
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    subdivisions: u32,
    size: f32,
    instances: Vec<ParticleInstance>,
}

impl ParticleField {
    /// Builds the grid with attributes drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(subdivisions: u32, size: f32, rng: &mut R) -> Self {
        let side = subdivisions as usize + 1;
        let segment = size / subdivisions as f32;
        let half = size * 0.5;
        let mut instances = Vec::with_capacity(side * side);

        for row in 0..side {
            let y = half - row as f32 * segment;
            for column in 0..side {
                let x = column as f32 * segment - half;
                instances.push(ParticleInstance {
                    position: [x, y, 0.0],
                    uv: [
                        column as f32 / subdivisions as f32,
                        1.0 - row as f32 / subdivisions as f32,
                    ],
                    intensity: rng.random::<f32>(),
                    angle: rng.random::<f32>() * TAU,
                });
            }
        }

        Self {
            subdivisions,
            size,
            instances,
        }
    }

    /// Builds the grid with a seeded generator, or the thread RNG when `seed` is `None`.
    pub fn generate(subdivisions: u32, size: f32, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(subdivisions, size, &mut StdRng::seed_from_u64(seed)),
            None => Self::new(subdivisions, size, &mut rand::rng()),
        }
    }

    pub fn count(&self) -> usize {
        self.instances.len()
    }

    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}
