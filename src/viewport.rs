use tracing::{debug, trace};

use crate::util::to_logical;

/// Size of the drawable area as reported by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub physical_size: (u32, u32),
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(physical_size: (u32, u32), scale_factor: f64) -> Self {
        Self {
            physical_size,
            scale_factor,
        }
    }

    /// True while either side is zero, which happens on minimised windows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.physical_size.0 == 0 || self.physical_size.1 == 0
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            return 1.0;
        }
        self.physical_size.0 as f32 / self.physical_size.1 as f32
    }

    /// Logical size multiplied by the device pixel ratio, with the ratio capped at `max_ratio`.
    pub fn resolution(&self, max_ratio: f64) -> [f32; 2] {
        let (logical_width, logical_height) = to_logical(self.physical_size, self.scale_factor);
        let pixel_ratio = self.scale_factor.min(max_ratio) as f32;
        [logical_width * pixel_ratio, logical_height * pixel_ratio]
    }
}

/// Resolution uniform recomputed only when the viewport or the pixel ratio changes.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    inputs: Option<Viewport>,
    resolution: Option<[f32; 2]>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new resolution when it has to be pushed to the shader, `None` otherwise.
    ///
    /// A zero-sized viewport never replaces the cached value.
    pub fn update(&mut self, viewport: Viewport, max_ratio: f64) -> Option<[f32; 2]> {
        if viewport.is_empty() {
            trace!(
                "Ignoring zero-sized viewport {:?}, keeping resolution {:?}",
                viewport.physical_size, self.resolution
            );
            return None;
        }
        if self.inputs == Some(viewport) {
            return None;
        }

        let resolution = viewport.resolution(max_ratio);
        debug!(
            "Resolution uniform changed to {}x{}",
            resolution[0], resolution[1]
        );
        self.inputs = Some(viewport);
        self.resolution = Some(resolution);
        Some(resolution)
    }

    pub fn resolution(&self) -> Option<[f32; 2]> {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_caps_pixel_ratio() {
        let retina = Viewport::new((1600, 1200), 2.0);
        assert_eq!(retina.resolution(2.0), [1600.0, 1200.0]);

        let dense = Viewport::new((3000, 1500), 3.0);
        assert_eq!(dense.resolution(2.0), [2000.0, 1000.0]);
    }

    #[test]
    fn cache_only_reports_changes() {
        let mut cache = ResolutionCache::new();
        let viewport = Viewport::new((800, 600), 1.0);

        assert_eq!(cache.update(viewport, 2.0), Some([800.0, 600.0]));
        assert_eq!(cache.update(viewport, 2.0), None);

        let resized = Viewport::new((1024, 768), 1.0);
        assert_eq!(cache.update(resized, 2.0), Some([1024.0, 768.0]));
    }

    #[test]
    fn cache_reacts_to_scale_factor_changes() {
        let mut cache = ResolutionCache::new();
        cache.update(Viewport::new((800, 600), 1.0), 2.0);
        assert_eq!(
            cache.update(Viewport::new((800, 600), 2.0), 2.0),
            Some([800.0, 600.0])
        );
    }

    #[test]
    fn zero_sized_viewport_keeps_previous_resolution() {
        let mut cache = ResolutionCache::new();
        cache.update(Viewport::new((800, 600), 1.0), 2.0);

        assert_eq!(cache.update(Viewport::new((0, 600), 1.0), 2.0), None);
        assert_eq!(cache.resolution(), Some([800.0, 600.0]));
    }

    #[test]
    fn minimised_window_is_ignored_on_every_tick() {
        let mut cache = ResolutionCache::new();
        cache.update(Viewport::new((800, 600), 1.0), 2.0);

        let minimised = Viewport::new((0, 0), 1.0);
        for _ in 0..3 {
            assert_eq!(cache.update(minimised, 2.0), None);
        }
        assert_eq!(
            cache.update(Viewport::new((800, 600), 1.0), 2.0),
            None,
            "restoring the previous size is not a change"
        );
    }
}
