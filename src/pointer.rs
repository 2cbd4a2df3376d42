use glam::Vec2;
use tracing::trace;

use crate::viewport::Viewport;

/// Latest pointer position in normalized device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    /// Position reported before any pointer event arrived. It lies far outside every frustum, so
    /// a ray through it can never hit the reference surface.
    pub const SENTINEL: Self = Self {
        x: 9999.0,
        y: 9999.0,
    };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl Default for PointerSample {
    fn default() -> Self {
        Self::SENTINEL
    }
}

/// Converts pointer-move positions into NDC. Only the latest sample is kept.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    viewport: Viewport,
    sample: PointerSample,
}

impl PointerTracker {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            sample: PointerSample::SENTINEL,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Records a pointer position given in physical pixels from the top-left corner.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.viewport.is_empty() {
            trace!(
                "Dropping pointer event at ({x}, {y}): viewport is {:?}",
                self.viewport.physical_size
            );
            return;
        }

        let (width, height) = self.viewport.physical_size;
        self.sample = PointerSample {
            x: ((x / width as f64) * 2.0 - 1.0) as f32,
            y: (-(y / height as f64) * 2.0 + 1.0) as f32,
        };
    }

    pub fn sample(&self) -> PointerSample {
        self.sample
    }
}
