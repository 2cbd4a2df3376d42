use super::*;

impl<'a> Renderer<'a> {
    pub fn size(&self) -> (u32, u32) {
        self.physical_size
    }

    pub fn change_scale_factor(&mut self, new_scale_factor: f64) {
        self.scale_factor = new_scale_factor;
        self.resize(self.physical_size)
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Reconfigures the surface and the depth buffer. A zero-sized window (minimised) keeps the
    /// previous configuration; the pointer and resolution state still see the new size and
    /// ignore it until a valid one arrives.
    pub fn resize(&mut self, new_physical_size: (u32, u32)) {
        self.physical_size = new_physical_size;
        self.field.set_viewport(self.viewport());

        if new_physical_size.0 == 0 || new_physical_size.1 == 0 {
            warn!("Skipping surface reconfiguration for size {new_physical_size:?}");
            return;
        }

        self.config.width = new_physical_size.0;
        self.config.height = new_physical_size.1;

        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
        self.recreate_depth_texture();
        self.offscreen_texture = None;
        self.readback_buffer = None;
    }

    pub(super) fn recreate_depth_texture(&mut self) {
        let texture = create_depth_texture(&self.device, self.physical_size);
        self.depth_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    }

    pub fn set_surface(
        &mut self,
        window: impl Into<SurfaceTarget<'static>>,
    ) -> Result<(), TrailFieldError> {
        let surface = self.instance.create_surface(window)?;
        surface.configure(&self.device, &self.config);
        self.surface = Some(surface);
        Ok(())
    }

    pub fn set_vsync(&mut self, vsync: bool) {
        self.config.present_mode = if vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
    }
}
