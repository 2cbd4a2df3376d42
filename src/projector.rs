use glam::{Vec2, Vec3};

use crate::camera::{PerspectiveCamera, Ray};
use crate::pointer::PointerSample;

/// Where the glow is stamped, in trail buffer pixels, plus the position from the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedCoordinate {
    pub current: Vec2,
    pub previous: Vec2,
    hit: bool,
}

impl ProjectedCoordinate {
    /// Position held before the pointer has ever hit the reference surface. It is far from any
    /// buffer pixel, so the distance to the first hit saturates the stamp alpha.
    pub const UNSET: Vec2 = Vec2::splat(9999.0);

    pub fn new() -> Self {
        Self {
            current: Self::UNSET,
            previous: Self::UNSET,
            hit: false,
        }
    }

    /// A coordinate that has already been projected, at `current`, coming from `previous`.
    pub fn from_points(current: Vec2, previous: Vec2) -> Self {
        Self {
            current,
            previous,
            hit: true,
        }
    }

    /// True once a projection has succeeded at least once.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.hit
    }

    /// Distance travelled since the previous frame. Moves `current` into `previous`, so the
    /// distance has to be read exactly once per update.
    pub fn advance(&mut self) -> f32 {
        let distance = self.previous.distance(self.current);
        self.previous = self.current;
        distance
    }
}

impl Default for ProjectedCoordinate {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of casting the pointer onto the reference surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionOutcome {
    Hit { uv: Vec2, pixel: Vec2 },
    Miss,
}

/// Maps a surface UV to trail buffer pixels. Raster rows grow downward while V grows upward.
#[inline]
pub fn uv_to_buffer_pixel(uv: Vec2, buffer_size: (u32, u32)) -> Vec2 {
    Vec2::new(
        uv.x * buffer_size.0 as f32,
        (1.0 - uv.y) * buffer_size.1 as f32,
    )
}

/// Invisible square at the origin in the XY plane, facing +Z and hit from both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProjector {
    size: f32,
    buffer_size: (u32, u32),
}

impl SurfaceProjector {
    pub fn new(size: f32, buffer_size: (u32, u32)) -> Self {
        Self { size, buffer_size }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Surface UV of the closest intersection in front of the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec2> {
        if ray.direction.z.abs() <= f32::EPSILON {
            return None;
        }

        let distance = -ray.origin.z / ray.direction.z;
        if !distance.is_finite() || distance < 0.0 {
            return None;
        }

        let hit: Vec3 = ray.at(distance);
        let half = self.size * 0.5;
        if hit.x.abs() > half || hit.y.abs() > half {
            return None;
        }

        Some(Vec2::new(hit.x / self.size + 0.5, hit.y / self.size + 0.5))
    }

    /// Casts `sample` from `camera` and writes the hit into `coordinate.current`.
    ///
    /// On a miss `coordinate` is left untouched so the trail does not jump when the pointer
    /// leaves the surface.
    pub fn project(
        &self,
        camera: &PerspectiveCamera,
        aspect: f32,
        sample: PointerSample,
        coordinate: &mut ProjectedCoordinate,
    ) -> ProjectionOutcome {
        if sample.is_sentinel() {
            return ProjectionOutcome::Miss;
        }

        let ray = camera.ray_from_ndc(sample.to_vec2(), aspect);
        match self.intersect(&ray) {
            Some(uv) => {
                let pixel = uv_to_buffer_pixel(uv, self.buffer_size);
                coordinate.current = pixel;
                coordinate.hit = true;
                ProjectionOutcome::Hit { uv, pixel }
            }
            None => ProjectionOutcome::Miss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_mapping_flips_v() {
        let size = (128, 128);
        assert_eq!(
            uv_to_buffer_pixel(Vec2::new(0.5, 0.5), size),
            Vec2::new(64.0, 64.0)
        );
        assert_eq!(uv_to_buffer_pixel(Vec2::new(0.0, 1.0), size), Vec2::ZERO);
        assert_eq!(
            uv_to_buffer_pixel(Vec2::new(1.0, 0.0), size),
            Vec2::new(128.0, 128.0)
        );
    }

    #[test]
    fn intersects_from_both_sides() {
        let projector = SurfaceProjector::new(10.0, (128, 128));
        let front = Ray {
            origin: Vec3::new(2.5, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        let back = Ray {
            origin: Vec3::new(2.5, 0.0, -5.0),
            direction: Vec3::Z,
        };

        assert_eq!(projector.intersect(&front), Some(Vec2::new(0.75, 0.5)));
        assert_eq!(projector.intersect(&back), Some(Vec2::new(0.75, 0.5)));
    }

    #[test]
    fn misses_parallel_rays_and_rays_pointing_away() {
        let projector = SurfaceProjector::new(10.0, (128, 128));
        let parallel = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::X,
        };
        let away = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::Z,
        };

        assert_eq!(projector.intersect(&parallel), None);
        assert_eq!(projector.intersect(&away), None);
    }

    #[test]
    fn misses_outside_the_square() {
        let projector = SurfaceProjector::new(10.0, (128, 128));
        let ray = Ray {
            origin: Vec3::new(5.5, 0.0, 5.0),
            direction: Vec3::NEG_Z,
        };
        assert_eq!(projector.intersect(&ray), None);
    }

    #[test]
    fn miss_holds_previous_coordinate() {
        let projector = SurfaceProjector::new(10.0, (128, 128));
        let camera = PerspectiveCamera::default();
        let mut coordinate = ProjectedCoordinate::new();

        let outcome = projector.project(&camera, 1.0, PointerSample::new(0.0, 0.0), &mut coordinate);
        assert!(matches!(outcome, ProjectionOutcome::Hit { .. }));
        let held = coordinate;

        let outcome = projector.project(&camera, 1.0, PointerSample::new(0.99, 0.99), &mut coordinate);
        assert_eq!(outcome, ProjectionOutcome::Miss);
        assert_eq!(coordinate, held);

        let outcome = projector.project(&camera, 1.0, PointerSample::SENTINEL, &mut coordinate);
        assert_eq!(outcome, ProjectionOutcome::Miss);
        assert_eq!(coordinate, held);
    }

    #[test]
    fn advance_reports_distance_then_stores() {
        let mut coordinate = ProjectedCoordinate::from_points(Vec2::new(10.0, 0.0), Vec2::ZERO);
        assert_eq!(coordinate.advance(), 10.0);
        assert_eq!(coordinate.previous, Vec2::new(10.0, 0.0));
        assert_eq!(coordinate.advance(), 0.0);
    }

    #[test]
    fn set_state_does_not_depend_on_the_position() {
        assert!(!ProjectedCoordinate::new().is_set());
        let at_unset = ProjectedCoordinate::from_points(
            ProjectedCoordinate::UNSET,
            ProjectedCoordinate::UNSET,
        );
        assert!(at_unset.is_set());

        let projector = SurfaceProjector::new(10.0, (128, 128));
        let mut coordinate = ProjectedCoordinate::new();
        projector.project(
            &PerspectiveCamera::default(),
            1.0,
            PointerSample::new(0.0, 0.0),
            &mut coordinate,
        );
        assert!(coordinate.is_set());
    }
}
