use thiserror::Error;

use crate::texture_manager::TextureSlot;

/// A configuration option that is outside of its accepted range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("trail buffer must not be empty, got {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },
    #[error("glow size ratio must be in (0, 1], got {0}")]
    GlowSizeRatio(f32),
    #[error("speed gain must be finite and non-negative, got {0}")]
    SpeedGain(f32),
    #[error("decay opacity must be in [0, 1], got {0}")]
    DecayOpacity(f32),
    #[error("particle grid needs at least one subdivision")]
    EmptyGrid,
    #[error("plane size must be finite and positive, got {0}")]
    PlaneSize(f32),
    #[error("pixel ratio cap must be at least 1, got {0}")]
    MaxPixelRatio(f64),
    #[error("trail buffer of {width}x{height} exceeds the device texture limit of {max}")]
    BufferTooLarge { width: u32, height: u32, max: u32 },
    #[error("{count} particles need {bytes} bytes of instance data, the device allows {max_bytes}")]
    TooManyParticles {
        count: usize,
        bytes: u64,
        max_bytes: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureManagerError {
    #[error("texture {0} has not been allocated")]
    TextureNotFound(TextureSlot),
    #[error("texture {slot} of {width}x{height} is outside the supported range 1..={max}")]
    InvalidDimensions {
        slot: TextureSlot,
        width: u32,
        height: u32,
        max: u32,
    },
    #[error("texture {slot} expects {expected} bytes of RGBA8 data, got {actual}")]
    DimensionMismatch {
        slot: TextureSlot,
        expected: usize,
        actual: usize,
    },
}

/// Errors returned while building a trail field or handing it assets.
///
/// Conditions that only delay rendering, such as a glow sprite that has not arrived yet or a
/// pointer that is off the reference surface, are not errors. They are reported per frame
/// through [`crate::FrameReport`].
#[derive(Debug, Error)]
pub enum TrailFieldError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Texture(#[from] TextureManagerError),
    #[error("sprite of {width}x{height} needs {expected} bytes of RGBA8 data, got {actual}")]
    InvalidSprite {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("failed to create a window surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter is available")]
    AdapterUnavailable,
    #[error("failed to request a GPU device: {0}")]
    DeviceRequest(String),
}
