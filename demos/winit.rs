/// Interactive particle field.
///
/// Run with:    cargo run --example winit [path/to/picture.png]
///
/// Move the cursor over the picture to leave a glowing trail that pushes particles toward the
/// camera. Drag with the left button to orbit, scroll to zoom.
use futures::executor::block_on;
use std::sync::Arc;
use trailfield::{wgpu, GlowSprite, Renderer, TextureSlot, TrailFieldConfig};
use trailfield_test_scenes::{gradient_picture, PICTURE_SIZE};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

const ORBIT_SPEED: f32 = 0.005;

fn load_picture(path: Option<String>) -> ((u32, u32), Vec<u8>) {
    if let Some(path) = path {
        match image::open(&path) {
            Ok(picture) => {
                let rgba = picture.to_rgba8();
                return (rgba.dimensions(), rgba.into_raw());
            }
            Err(error) => eprintln!("Could not open {path}: {error}, using a gradient"),
        }
    }
    ((PICTURE_SIZE, PICTURE_SIZE), gradient_picture(PICTURE_SIZE))
}

#[derive(Default)]
struct App<'a> {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer<'a>>,
    cursor: Option<(f64, f64)>,
    orbiting: bool,
    frame_count: u64,
}

impl<'a> ApplicationHandler for App<'a> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("trailfield"))
                .unwrap(),
        );

        let window_size = window.inner_size();
        let scale_factor = window.scale_factor();
        let physical_size = (window_size.width, window_size.height);

        let mut renderer = block_on(Renderer::new(
            window.clone(),
            physical_size,
            scale_factor,
            true,
            TrailFieldConfig::default(),
        ))
        .unwrap();

        let glow_size = renderer.trail_field().config().glow_size().round() as u32;
        renderer.set_glow_sprite(GlowSprite::radial(glow_size));

        // The picture arrives from another thread; frames render without particles until then.
        let texture_manager = renderer.texture_manager();
        let path = std::env::args().nth(1);
        std::thread::spawn(move || {
            let (dimensions, rgba) = load_picture(path);
            if let Err(error) =
                texture_manager.allocate_texture_with_data(TextureSlot::Picture, dimensions, &rgba)
            {
                eprintln!("Picture upload failed: {error}");
            }
        });

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else { return };
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        if window_id != window.id() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                renderer.resize((physical_size.width, physical_size.height));
                window.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                renderer.change_scale_factor(scale_factor);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.orbiting {
                    if let Some((last_x, last_y)) = self.cursor {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        renderer
                            .camera_mut()
                            .orbit(-dx * ORBIT_SPEED, -dy * ORBIT_SPEED);
                    }
                }
                self.cursor = Some((position.x, position.y));
                renderer.pointer_moved(position.x, position.y);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.orbiting = state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / 50.0,
                };
                renderer.camera_mut().zoom(0.95_f32.powf(lines));
            }
            WindowEvent::RedrawRequested => {
                self.frame_count += 1;
                match renderer.render() {
                    Ok(report) => {
                        if self.frame_count.is_multiple_of(120) {
                            println!("{report:?}");
                        }
                    }
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size()),
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => eprintln!("{e:?}"),
                }
                window.request_redraw();
            }
            _ => {}
        }
    }
}

pub fn main() {
    env_logger::init();
    let event_loop = EventLoop::new().expect("Failed to create event loop");

    let mut app = App::default();
    let _ = event_loop.run_app(&mut app);
}
