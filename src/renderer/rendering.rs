use super::*;

impl<'a> Renderer<'a> {
    /// Runs the CPU side of a frame in order: tick the trail field, upload the raster if it
    /// changed, then write the uniforms the draw will read.
    pub(super) fn prepare_frame(&mut self) -> FrameReport {
        let mut report = self.field.tick(&self.camera);

        match self
            .displacement
            .sync(self.field.trail_buffer_mut(), &self.texture_manager)
        {
            Ok(uploaded) => report.uploaded = uploaded,
            Err(error) => warn!("Frame {}: trail upload failed, {error}", report.frame),
        }

        self.write_uniforms();
        report
    }

    fn write_uniforms(&mut self) {
        let viewport = self.viewport();
        if let Some(resolution) = self.field.resolution() {
            self.uniforms.resolution = resolution;
        }
        self.uniforms.view = self.camera.view_matrix().to_cols_array_2d();
        self.uniforms.projection = self
            .camera
            .projection_matrix(viewport.aspect())
            .to_cols_array_2d();

        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );
    }

    /// Clears `texture_view` and draws every particle into it. The draw is left out while the
    /// picture texture is missing.
    pub(super) fn render_to_texture_view(
        &mut self,
        texture_view: &wgpu::TextureView,
        report: &mut FrameReport,
    ) {
        let field_bind_group = match self
            .texture_manager
            .get_or_create_field_bind_group(&self.field_texture_bind_group_layout)
        {
            Ok(bind_group) => Some(bind_group),
            Err(error) => {
                trace!("Frame {}: not drawing particles, {error}", report.frame);
                report.draw_skipped = Some(SkipReason::PictureNotReady);
                None
            }
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Command Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particle_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(field_bind_group) = &field_bind_group {
                render_pass.set_pipeline(&self.particle_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_bind_group(1, field_bind_group.as_ref(), &[]);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                render_pass.draw(0..VERTICES_PER_PARTICLE, 0..self.instance_count);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    /// Renders one frame to the window surface and presents it.
    pub fn render(&mut self) -> Result<FrameReport, wgpu::SurfaceError> {
        let output = match &self.surface {
            Some(surface) => surface.get_current_texture()?,
            None => {
                warn!("render() called on a headless renderer, use render_to_buffer()");
                return Err(wgpu::SurfaceError::Lost);
            }
        };
        let mut report = self.prepare_frame();
        let output_texture_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.render_to_texture_view(&output_texture_view, &mut report);

        output.present();
        Ok(report)
    }
}
