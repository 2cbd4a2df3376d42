use crate::color::Color;
use crate::error::ConfigError;
use crate::particles::ParticleInstance;

/// Tunables for the trail buffer, the particle grid and the particle shader.
///
/// All options have defaults matching the reference look: a 128×128 trail raster, a glow stamp
/// a quarter of the raster wide, and a 128-segment particle plane ten world units across.
///
/// # Examples
///
/// ```
/// use trailfield::TrailFieldConfig;
///
/// let config = TrailFieldConfig::default()
///     .with_buffer_size(256, 256)
///     .with_speed_gain(0.05)
///     .with_particle_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.glow_size(), 64.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrailFieldConfig {
    /// Resolution of the trail raster, in buffer pixels.
    pub buffer_size: (u32, u32),
    /// Side of the glow stamp as a fraction of the buffer width.
    pub glow_size_ratio: f32,
    /// Multiplier turning buffer-pixel distance per frame into stamp opacity.
    pub speed_gain: f32,
    /// Opacity of the black overlay composited over the raster every tick.
    pub decay_opacity: f32,
    /// Number of plane segments per side. The field has `(n + 1)²` particles.
    pub grid_subdivisions: u32,
    /// World-space side of the particle plane and of the reference surface.
    pub plane_size: f32,
    /// Upper bound for the device pixel ratio used by the resolution uniform.
    pub max_pixel_ratio: f64,
    /// Point size factor. Multiplied by the picture intensity and the vertical resolution, then
    /// divided by view depth.
    pub point_size: f32,
    /// Length of a fully displaced particle offset, in world units.
    pub displacement_strength: f32,
    /// Color the render target is cleared to before the particles are drawn.
    pub clear_color: Color,
    /// Seed for the per-particle random attributes. `None` uses the thread RNG.
    pub particle_seed: Option<u64>,
}

impl TrailFieldConfig {
    pub const DEFAULT_BUFFER_SIZE: (u32, u32) = (128, 128);
    pub const DEFAULT_GLOW_SIZE_RATIO: f32 = 0.25;
    pub const DEFAULT_SPEED_GAIN: f32 = 0.1;
    pub const DEFAULT_DECAY_OPACITY: f32 = 0.02;
    pub const DEFAULT_GRID_SUBDIVISIONS: u32 = 128;
    pub const DEFAULT_PLANE_SIZE: f32 = 10.0;
    pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;
    pub const DEFAULT_POINT_SIZE: f32 = 0.15;
    pub const DEFAULT_DISPLACEMENT_STRENGTH: f32 = 3.0;

    pub fn with_buffer_size(mut self, width: u32, height: u32) -> Self {
        self.buffer_size = (width, height);
        self
    }

    pub fn with_glow_size_ratio(mut self, ratio: f32) -> Self {
        self.glow_size_ratio = ratio;
        self
    }

    pub fn with_speed_gain(mut self, gain: f32) -> Self {
        self.speed_gain = gain;
        self
    }

    pub fn with_decay_opacity(mut self, opacity: f32) -> Self {
        self.decay_opacity = opacity;
        self
    }

    pub fn with_grid_subdivisions(mut self, subdivisions: u32) -> Self {
        self.grid_subdivisions = subdivisions;
        self
    }

    pub fn with_plane_size(mut self, size: f32) -> Self {
        self.plane_size = size;
        self
    }

    pub fn with_max_pixel_ratio(mut self, ratio: f64) -> Self {
        self.max_pixel_ratio = ratio;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn with_displacement_strength(mut self, strength: f32) -> Self {
        self.displacement_strength = strength;
        self
    }

    pub fn with_clear_color(mut self, color: impl Into<Color>) -> Self {
        self.clear_color = color.into();
        self
    }

    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particle_seed = Some(seed);
        self
    }

    /// Side of the square glow stamp in buffer pixels.
    #[inline]
    pub fn glow_size(&self) -> f32 {
        self.buffer_size.0 as f32 * self.glow_size_ratio
    }

    /// Number of particles the grid produces.
    #[inline]
    pub fn particle_count(&self) -> usize {
        let side = self.grid_subdivisions as usize + 1;
        side * side
    }

    /// Checks every option and reports the first one that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.buffer_size;
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyBuffer { width, height });
        }
        if !(self.glow_size_ratio > 0.0 && self.glow_size_ratio <= 1.0) {
            return Err(ConfigError::GlowSizeRatio(self.glow_size_ratio));
        }
        if !self.speed_gain.is_finite() || self.speed_gain < 0.0 {
            return Err(ConfigError::SpeedGain(self.speed_gain));
        }
        if !(0.0..=1.0).contains(&self.decay_opacity) {
            return Err(ConfigError::DecayOpacity(self.decay_opacity));
        }
        if self.grid_subdivisions == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if !(self.plane_size.is_finite() && self.plane_size > 0.0) {
            return Err(ConfigError::PlaneSize(self.plane_size));
        }
        if !(self.max_pixel_ratio >= 1.0) {
            return Err(ConfigError::MaxPixelRatio(self.max_pixel_ratio));
        }
        Ok(())
    }

    /// Checks the GPU-facing sizes against what `limits` allows: the displacement texture
    /// dimensions and the instance buffer holding every particle.
    pub fn check_device_limits(&self, limits: &wgpu::Limits) -> Result<(), ConfigError> {
        let (width, height) = self.buffer_size;
        let max = limits.max_texture_dimension_2d;
        if width > max || height > max {
            return Err(ConfigError::BufferTooLarge { width, height, max });
        }

        let count = self.particle_count();
        let bytes = count as u64 * std::mem::size_of::<ParticleInstance>() as u64;
        if bytes > limits.max_buffer_size || u32::try_from(count).is_err() {
            return Err(ConfigError::TooManyParticles {
                count,
                bytes,
                max_bytes: limits.max_buffer_size,
            });
        }
        Ok(())
    }
}

impl Default for TrailFieldConfig {
    fn default() -> Self {
        Self {
            buffer_size: Self::DEFAULT_BUFFER_SIZE,
            glow_size_ratio: Self::DEFAULT_GLOW_SIZE_RATIO,
            speed_gain: Self::DEFAULT_SPEED_GAIN,
            decay_opacity: Self::DEFAULT_DECAY_OPACITY,
            grid_subdivisions: Self::DEFAULT_GRID_SUBDIVISIONS,
            plane_size: Self::DEFAULT_PLANE_SIZE,
            max_pixel_ratio: Self::DEFAULT_MAX_PIXEL_RATIO,
            point_size: Self::DEFAULT_POINT_SIZE,
            displacement_strength: Self::DEFAULT_DISPLACEMENT_STRENGTH,
            clear_color: Color::TRANSPARENT,
            particle_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TrailFieldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.glow_size(), 32.0);
        assert_eq!(config.particle_count(), 129 * 129);
    }

    #[test]
    fn rejects_empty_buffer() {
        let config = TrailFieldConfig::default().with_buffer_size(0, 128);
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyBuffer {
                width: 0,
                height: 128
            })
        );
    }

    #[test]
    fn rejects_out_of_range_ratios() {
        assert_eq!(
            TrailFieldConfig::default()
                .with_glow_size_ratio(0.0)
                .validate(),
            Err(ConfigError::GlowSizeRatio(0.0))
        );
        assert_eq!(
            TrailFieldConfig::default()
                .with_decay_opacity(1.5)
                .validate(),
            Err(ConfigError::DecayOpacity(1.5))
        );
        assert_eq!(
            TrailFieldConfig::default()
                .with_max_pixel_ratio(0.5)
                .validate(),
            Err(ConfigError::MaxPixelRatio(0.5))
        );
    }

    #[test]
    fn rejects_nan_gain() {
        let result = TrailFieldConfig::default()
            .with_speed_gain(f32::NAN)
            .validate();
        assert!(matches!(result, Err(ConfigError::SpeedGain(_))));
    }

    #[test]
    fn defaults_fit_default_device_limits() {
        let limits = wgpu::Limits::default();
        assert_eq!(TrailFieldConfig::default().check_device_limits(&limits), Ok(()));
        assert_eq!(
            TrailFieldConfig::default()
                .with_buffer_size(8192, 8192)
                .check_device_limits(&limits),
            Ok(())
        );
    }

    #[test]
    fn rejects_sizes_beyond_device_limits() {
        let limits = wgpu::Limits::default();

        let oversized = TrailFieldConfig::default().with_buffer_size(20000, 128);
        assert!(oversized.validate().is_ok());
        assert_eq!(
            oversized.check_device_limits(&limits),
            Err(ConfigError::BufferTooLarge {
                width: 20000,
                height: 128,
                max: 8192
            })
        );

        let dense = TrailFieldConfig::default().with_grid_subdivisions(4000);
        assert!(matches!(
            dense.check_device_limits(&limits),
            Err(ConfigError::TooManyParticles {
                count: 16_008_001,
                ..
            })
        ));
    }

    #[test]
    fn rejects_empty_grid_and_plane() {
        assert_eq!(
            TrailFieldConfig::default()
                .with_grid_subdivisions(0)
                .validate(),
            Err(ConfigError::EmptyGrid)
        );
        assert_eq!(
            TrailFieldConfig::default().with_plane_size(-1.0).validate(),
            Err(ConfigError::PlaneSize(-1.0))
        );
    }
}
