/// Shows the raw trail raster, without any GPU work.
///
/// Run with:    cargo run --example trail_debug_softbuffer
///
/// The field runs on the CPU against the default camera; the trail buffer is scaled up to the
/// window with nearest-neighbour sampling and presented through softbuffer.
use std::num::NonZeroU32;
use std::sync::Arc;
use trailfield::{GlowSprite, PerspectiveCamera, TrailField, TrailFieldConfig, Viewport};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    softbuffer_context: Option<softbuffer::Context<Arc<Window>>>,
    softbuffer_surface: Option<softbuffer::Surface<Arc<Window>, Arc<Window>>>,
    field: Option<TrailField>,
    camera: PerspectiveCamera,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_inner_size(winit::dpi::PhysicalSize::new(512, 512))
                        .with_title("trailfield trail buffer"),
                )
                .unwrap(),
        );

        let window_size = window.inner_size();
        let physical_size = (window_size.width, window_size.height);
        let viewport = Viewport::new(physical_size, window.scale_factor());

        let config = TrailFieldConfig::default().with_grid_subdivisions(1);
        let mut field = TrailField::new(config, viewport).unwrap();
        let glow_size = field.config().glow_size().round() as u32;
        field.set_glow_sprite(GlowSprite::radial(glow_size));

        let softbuffer_context = softbuffer::Context::new(window.clone()).unwrap();
        let mut softbuffer_surface =
            softbuffer::Surface::new(&softbuffer_context, window.clone()).unwrap();
        softbuffer_surface
            .resize(
                NonZeroU32::new(physical_size.0.max(1)).unwrap(),
                NonZeroU32::new(physical_size.1.max(1)).unwrap(),
            )
            .unwrap();

        self.window = Some(window);
        self.softbuffer_context = Some(softbuffer_context);
        self.softbuffer_surface = Some(softbuffer_surface);
        self.field = Some(field);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        let Some(field) = &mut self.field else { return };
        let Some(softbuffer_surface) = &mut self.softbuffer_surface else {
            return;
        };

        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                field.set_viewport(Viewport::new(
                    (physical_size.width, physical_size.height),
                    window.scale_factor(),
                ));
                if let (Some(width), Some(height)) = (
                    NonZeroU32::new(physical_size.width),
                    NonZeroU32::new(physical_size.height),
                ) {
                    softbuffer_surface.resize(width, height).unwrap();
                }
                window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                field.pointer_moved(position.x, position.y);
            }
            WindowEvent::RedrawRequested => {
                field.tick(&self.camera);

                let window_size = window.inner_size();
                let (width, height) = (window_size.width, window_size.height);
                if width == 0 || height == 0 {
                    return;
                }

                let trail = field.trail_buffer();
                let (trail_width, trail_height) = trail.dimensions();
                let pixels = trail.as_bytes();

                let mut buffer = softbuffer_surface.buffer_mut().unwrap();
                for y in 0..height {
                    let trail_y = (y * trail_height / height) as usize;
                    for x in 0..width {
                        let trail_x = (x * trail_width / width) as usize;
                        let offset = (trail_y * trail_width as usize + trail_x) * 4;
                        let (r, g, b) = (
                            pixels[offset] as u32,
                            pixels[offset + 1] as u32,
                            pixels[offset + 2] as u32,
                        );
                        buffer[(y * width + x) as usize] = (r << 16) | (g << 8) | b;
                    }
                }
                buffer.present().unwrap();

                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    let event_loop = EventLoop::new().expect("to start an event loop");
    let mut app = App::default();
    event_loop.run_app(&mut app).unwrap();
}
