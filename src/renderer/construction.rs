use super::*;

impl<'a> Renderer<'a> {
    pub async fn new(
        window: impl Into<SurfaceTarget<'static>>,
        physical_size: (u32, u32),
        scale_factor: f64,
        vsync: bool,
        field_config: TrailFieldConfig,
    ) -> Result<Self, TrailFieldError> {
        let size = physical_size;

        let instance = wgpu::Instance::new(&InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| TrailFieldError::AdapterUnavailable)?;
        info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = Self::request_device(&adapter).await?;

        let swapchain_format = wgpu::TextureFormat::Bgra8UnormSrgb;

        let surface_caps = surface.get_capabilities(&adapter);
        let alpha_mode = if surface_caps
            .alpha_modes
            .contains(&CompositeAlphaMode::Opaque)
        {
            CompositeAlphaMode::Opaque
        } else {
            let fallback = surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(CompositeAlphaMode::Auto);
            warn!("Opaque surfaces are not supported, using {fallback:?}");
            fallback
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: swapchain_format,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        Self::build_from_device(
            instance,
            Some(surface),
            device,
            queue,
            config,
            size,
            scale_factor,
            field_config,
        )
    }

    /// Creates a renderer without a window surface.
    ///
    /// Use [`Self::render_to_buffer`] to read back rendered pixels. Calling [`Self::render`] on
    /// a headless renderer returns [`wgpu::SurfaceError::Lost`].
    ///
    /// Returns [`TrailFieldError::AdapterUnavailable`] if no suitable GPU adapter is available.
    /// This is useful in environments without a GPU (e.g. CI), where tests can skip gracefully
    /// instead of panicking.
    pub async fn try_new_headless(
        physical_size: (u32, u32),
        scale_factor: f64,
        field_config: TrailFieldConfig,
    ) -> Result<Self, TrailFieldError> {
        let size = physical_size;

        let instance = wgpu::Instance::new(&InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| TrailFieldError::AdapterUnavailable)?;
        info!("Using adapter {:?} headless", adapter.get_info().name);

        let (device, queue) = Self::request_device(&adapter).await?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            format: wgpu::TextureFormat::Bgra8UnormSrgb,
            width: size.0.max(1),
            height: size.1.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: CompositeAlphaMode::Opaque,
            view_formats: vec![],
        };

        Self::build_from_device(
            instance,
            None,
            device,
            queue,
            config,
            size,
            scale_factor,
            field_config,
        )
    }

    async fn request_device(
        adapter: &wgpu::Adapter,
    ) -> Result<(wgpu::Device, wgpu::Queue), TrailFieldError> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|error| TrailFieldError::DeviceRequest(error.to_string()))
    }

    /// Shared constructor: takes the wgpu primitives produced by `new()` or
    /// `try_new_headless()` and builds the full `Renderer`.
    #[allow(clippy::too_many_arguments)]
    fn build_from_device(
        instance: wgpu::Instance,
        surface: Option<wgpu::Surface<'a>>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        physical_size: (u32, u32),
        scale_factor: f64,
        field_config: TrailFieldConfig,
    ) -> Result<Self, TrailFieldError> {
        let viewport = Viewport::new(physical_size, scale_factor);
        field_config.check_device_limits(&device.limits())?;
        let field = TrailField::new(field_config, viewport)?;
        let camera = PerspectiveCamera::default();

        let uniforms = Uniforms::new(
            camera.view_matrix(),
            camera.projection_matrix(viewport.aspect()),
            viewport.resolution(field.config().max_pixel_ratio),
            field.config().point_size,
            field.config().displacement_strength,
        );
        let uniform_buffer = create_uniform_buffer(&device, &uniforms);
        let uniform_bind_group_layout = create_uniform_bind_group_layout(&device);
        let uniform_bind_group =
            create_uniform_bind_group(&device, &uniform_bind_group_layout, &uniform_buffer);
        let field_texture_bind_group_layout = create_field_texture_bind_group_layout(&device);

        let particle_pipeline = create_particle_pipeline(
            &device,
            config.format,
            &uniform_bind_group_layout,
            &field_texture_bind_group_layout,
        );

        let instances = field.particles().instances();
        let instance_buffer = create_instance_buffer(&device, instances);
        let instance_count = instances.len() as u32;

        let depth_texture = create_depth_texture(&device, physical_size);
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let device = Arc::new(device);
        let queue = Arc::new(queue);
        let texture_manager = TextureManager::new(device.clone(), queue.clone());
        let clear_color = field.config().clear_color.to_wgpu();

        Ok(Self {
            physical_size,
            scale_factor,
            instance,
            surface,
            device,
            queue,
            config,
            texture_manager,
            displacement: DisplacementTexture::new(),
            field,
            camera,
            clear_color,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            field_texture_bind_group_layout,
            particle_pipeline,
            instance_buffer,
            instance_count,
            depth_view,
            offscreen_texture: None,
            readback_buffer: None,
            readback_bytes: Vec::new(),
        })
    }
}
