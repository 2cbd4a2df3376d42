//! Per-frame driver tying the pointer, the projector and the trail buffer together.
//!
//! [`TrailField`] owns all mutable interaction state. Nothing else writes the trail buffer:
//! the renderer only reads it back after [`TrailField::tick`] has returned.

use rand::Rng;
use tracing::{debug, trace};

use crate::camera::PerspectiveCamera;
use crate::config::TrailFieldConfig;
use crate::error::TrailFieldError;
use crate::particles::ParticleField;
use crate::pointer::{PointerSample, PointerTracker};
use crate::projector::{ProjectedCoordinate, ProjectionOutcome, SurfaceProjector};
use crate::sprite::GlowSprite;
use crate::trail_buffer::{stamp_alpha, TrailBuffer};
use crate::viewport::{ResolutionCache, Viewport};

/// Why part of a frame was left out. None of these are errors, the frame simply holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No glow sprite has been handed in yet.
    GlowSpriteNotReady,
    /// The pointer has never hit the reference surface.
    NoProjection,
    /// The source picture texture is not loaded, so no particles are drawn.
    PictureNotReady,
}

/// What happened to the trail buffer during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailUpdate {
    /// The buffer decayed and the glow was stamped.
    Updated {
        /// Buffer-pixel distance the projected pointer moved since the previous update.
        distance: f32,
        stamp_alpha: f32,
    },
    /// Neither decay nor stamp ran.
    Skipped(SkipReason),
}

/// Summary of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Sequence number, starting at 1.
    pub frame: u64,
    pub projection: ProjectionOutcome,
    pub trail: TrailUpdate,
    /// New resolution uniform, present only when it changed this frame.
    pub resolution: Option<[f32; 2]>,
    /// Set by the renderer when the trail raster was uploaded to the GPU.
    pub uploaded: bool,
    /// Set by the renderer when the particle draw was left out.
    pub draw_skipped: Option<SkipReason>,
}

/// The frame orchestrator.
///
/// Each [`tick`](Self::tick) reads the latest pointer sample, projects it onto the reference
/// surface, decays and stamps the trail buffer, then refreshes the resolution uniform when the
/// viewport changed. Uploading the raster and drawing are the renderer's job and happen after
/// the tick, so the shader always samples the buffer produced in the same frame.
#[derive(Debug)]
pub struct TrailField {
    config: TrailFieldConfig,
    pointer: PointerTracker,
    projector: SurfaceProjector,
    coordinate: ProjectedCoordinate,
    trail: TrailBuffer,
    glow_sprite: Option<GlowSprite>,
    resolution: ResolutionCache,
    particles: ParticleField,
    frame: u64,
}

impl TrailField {
    /// Validates `config` and builds the field. Particle attributes come from
    /// `config.particle_seed`, or from the thread RNG when no seed is set.
    pub fn new(config: TrailFieldConfig, viewport: Viewport) -> Result<Self, TrailFieldError> {
        config.validate()?;
        let particles = ParticleField::generate(
            config.grid_subdivisions,
            config.plane_size,
            config.particle_seed,
        );
        Ok(Self::from_parts(config, viewport, particles))
    }

    /// Same as [`Self::new`] with particle attributes drawn from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        config: TrailFieldConfig,
        viewport: Viewport,
        rng: &mut R,
    ) -> Result<Self, TrailFieldError> {
        config.validate()?;
        let particles = ParticleField::new(config.grid_subdivisions, config.plane_size, rng);
        Ok(Self::from_parts(config, viewport, particles))
    }

    fn from_parts(config: TrailFieldConfig, viewport: Viewport, particles: ParticleField) -> Self {
        debug!(
            "Trail field with a {}x{} buffer and {} particles",
            config.buffer_size.0,
            config.buffer_size.1,
            particles.count()
        );

        Self {
            pointer: PointerTracker::new(viewport),
            projector: SurfaceProjector::new(config.plane_size, config.buffer_size),
            coordinate: ProjectedCoordinate::new(),
            trail: TrailBuffer::new(config.buffer_size.0, config.buffer_size.1),
            glow_sprite: None,
            resolution: ResolutionCache::new(),
            particles,
            frame: 0,
            config,
        }
    }

    /// Forwards a pointer-move event in physical pixels. Only the latest position is kept.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.pointer_moved(x, y);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.pointer.set_viewport(viewport);
    }

    /// Hands in the glow sprite. Trail updates are skipped until this is called.
    pub fn set_glow_sprite(&mut self, sprite: GlowSprite) {
        debug!(
            "Glow sprite of {}x{} ready",
            sprite.dimensions().0,
            sprite.dimensions().1
        );
        self.glow_sprite = Some(sprite);
    }

    /// Runs one frame of interaction state.
    pub fn tick(&mut self, camera: &PerspectiveCamera) -> FrameReport {
        self.frame += 1;

        let viewport = self.pointer.viewport();
        let sample = self.pointer.sample();
        let projection =
            self.projector
                .project(camera, viewport.aspect(), sample, &mut self.coordinate);

        let trail = self.update_trail();
        if let TrailUpdate::Skipped(reason) = trail {
            trace!("Frame {}: trail update skipped, {:?}", self.frame, reason);
        }

        let resolution = self
            .resolution
            .update(viewport, self.config.max_pixel_ratio);

        FrameReport {
            frame: self.frame,
            projection,
            trail,
            resolution,
            uploaded: false,
            draw_skipped: None,
        }
    }

    fn update_trail(&mut self) -> TrailUpdate {
        let Some(sprite) = &self.glow_sprite else {
            return TrailUpdate::Skipped(SkipReason::GlowSpriteNotReady);
        };
        if !self.coordinate.is_set() {
            return TrailUpdate::Skipped(SkipReason::NoProjection);
        }

        self.trail.decay(self.config.decay_opacity);

        let distance = self.coordinate.advance();
        let alpha = stamp_alpha(distance, self.config.speed_gain);
        self.trail.stamp(
            sprite,
            self.coordinate.current,
            self.config.glow_size(),
            alpha,
        );

        TrailUpdate::Updated {
            distance,
            stamp_alpha: alpha,
        }
    }

    pub fn config(&self) -> &TrailFieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.pointer.viewport()
    }

    pub fn pointer_sample(&self) -> PointerSample {
        self.pointer.sample()
    }

    pub fn coordinate(&self) -> ProjectedCoordinate {
        self.coordinate
    }

    pub fn trail_buffer(&self) -> &TrailBuffer {
        &self.trail
    }

    pub(crate) fn trail_buffer_mut(&mut self) -> &mut TrailBuffer {
        &mut self.trail
    }

    pub fn glow_sprite(&self) -> Option<&GlowSprite> {
        self.glow_sprite.as_ref()
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Last resolution pushed to the shader.
    pub fn resolution(&self) -> Option<[f32; 2]> {
        self.resolution.resolution()
    }

    /// Number of ticks so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
