//! # Trailfield
//!
//! A field of GPU particles laid out on a flat grid and pushed toward the camera wherever the
//! cursor recently passed.
//!
//! Pointer positions are cast onto an invisible reference plane and stamped into a small
//! decaying raster, the trail buffer. The raster is uploaded as a displacement texture that the
//! particle shader samples every frame, while a second texture, the source picture, sets every
//! particle's brightness and size.
//!
//! The CPU side is usable without a GPU: [`TrailField`] runs the per-frame interaction logic on
//! its own, and [`Renderer`] wraps it with a `wgpu` pipeline for windows or headless readback.
//!
//! ```rust,no_run
//! use futures::executor::block_on;
//! use trailfield::{GlowSprite, Renderer, TrailFieldConfig};
//!
//! let mut renderer =
//!     block_on(Renderer::try_new_headless((800, 600), 1.0, TrailFieldConfig::default()))
//!         .unwrap();
//! renderer.set_picture((2, 2), &[255; 16]).unwrap();
//! renderer.set_glow_sprite(GlowSprite::radial(64));
//!
//! renderer.pointer_moved(400.0, 300.0);
//! let mut pixels = Vec::new();
//! let report = renderer.render_to_buffer(&mut pixels);
//! assert_eq!(pixels.len(), 800 * 600 * 4);
//! println!("{report:?}");
//! ```

pub use glam;
pub use wgpu;

mod camera;
mod color;
mod config;
mod displacement;
mod error;
mod orchestrator;
mod particles;
mod pipeline;
mod pointer;
mod projector;
mod renderer;
mod shaders;
mod sprite;
mod texture_manager;
mod trail_buffer;
mod util;
mod viewport;

pub use camera::{PerspectiveCamera, Ray};
pub use color::Color;
pub use config::TrailFieldConfig;
pub use displacement::{DisplacementTexture, RasterSink};
pub use error::{ConfigError, TextureManagerError, TrailFieldError};
pub use orchestrator::{FrameReport, SkipReason, TrailField, TrailUpdate};
pub use particles::{point_size_pixels, ParticleField, ParticleInstance};
pub use pointer::{PointerSample, PointerTracker};
pub use projector::{uv_to_buffer_pixel, ProjectedCoordinate, ProjectionOutcome, SurfaceProjector};
pub use renderer::Renderer;
pub use sprite::GlowSprite;
pub use texture_manager::{TextureManager, TextureSlot};
pub use trail_buffer::{stamp_alpha, TrailBuffer};
pub use viewport::{ResolutionCache, Viewport};
