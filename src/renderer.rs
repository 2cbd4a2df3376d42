//! wgpu renderer for the particle field.
//!
//! The renderer owns the GPU side (device, surface, pipeline, textures) and a [`TrailField`]
//! holding the interaction state. Every frame it ticks the field, uploads the trail raster when
//! it changed, writes the uniforms and draws all particles in one instanced call.

use std::sync::Arc;

use tracing::{info, trace, warn};
use wgpu::{BindGroup, BindGroupLayout, Buffer, CompositeAlphaMode, InstanceDescriptor};
use wgpu::{RenderPipeline, SurfaceTarget, Texture, TextureView};

use crate::camera::PerspectiveCamera;
use crate::config::TrailFieldConfig;
use crate::displacement::DisplacementTexture;
use crate::error::TrailFieldError;
use crate::orchestrator::{FrameReport, SkipReason, TrailField};
use crate::pipeline::{
    compute_padded_bytes_per_row, create_depth_texture, create_field_texture_bind_group_layout,
    create_instance_buffer, create_offscreen_color_texture, create_particle_pipeline,
    create_readback_buffer, create_uniform_bind_group, create_uniform_bind_group_layout,
    create_uniform_buffer, encode_copy_texture_to_buffer, Uniforms,
};
use crate::shaders::VERTICES_PER_PARTICLE;
use crate::sprite::GlowSprite;
use crate::texture_manager::{TextureManager, TextureSlot};
use crate::viewport::Viewport;

mod construction;
mod readback;
mod rendering;
mod surface;

pub struct Renderer<'a> {
    // Window information
    /// Size of the window
    physical_size: (u32, u32),
    /// Scale factor of the window
    scale_factor: f64,

    // WGPU components
    instance: wgpu::Instance,
    surface: Option<wgpu::Surface<'a>>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,

    texture_manager: TextureManager,
    displacement: DisplacementTexture,
    field: TrailField,
    camera: PerspectiveCamera,
    clear_color: wgpu::Color,

    uniforms: Uniforms,
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,
    field_texture_bind_group_layout: BindGroupLayout,
    particle_pipeline: RenderPipeline,
    instance_buffer: Buffer,
    instance_count: u32,

    depth_view: TextureView,

    // Headless readback, created on first use and rebuilt on resize
    offscreen_texture: Option<Texture>,
    readback_buffer: Option<Buffer>,
    readback_bytes: Vec<u8>,
}

impl<'a> Renderer<'a> {
    /// Uploads the source picture. The particle draw is skipped until this has been done,
    /// either here or from another thread through [`Self::texture_manager`].
    pub fn set_picture(
        &self,
        dimensions: (u32, u32),
        rgba: &[u8],
    ) -> Result<(), TrailFieldError> {
        self.texture_manager
            .allocate_texture_with_data(TextureSlot::Picture, dimensions, rgba)?;
        Ok(())
    }

    pub fn set_glow_sprite(&mut self, sprite: GlowSprite) {
        self.field.set_glow_sprite(sprite);
    }

    /// Forwards a pointer-move event in physical pixels from the top-left corner.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.field.pointer_moved(x, y);
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    /// Shared handle to the GPU textures, usable from a loader thread.
    pub fn texture_manager(&self) -> TextureManager {
        self.texture_manager.clone()
    }

    pub fn trail_field(&self) -> &TrailField {
        &self.field
    }

    /// Number of trail raster uploads so far.
    pub fn displacement_uploads(&self) -> u64 {
        self.displacement.uploads()
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.physical_size, self.scale_factor)
    }
}
