//! Perspective camera with orbit controls and screen-to-world ray casting.

use glam::{Mat4, Vec2, Vec3};

/// Half-line from `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Camera orbiting a target point, described in spherical coordinates.
///
/// `polar` is measured from the +Y axis and `azimuth` around it, starting at +Z. A camera with
/// `polar = π/2` and `azimuth = 0` sits on the +Z axis looking toward `-Z`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub const DEFAULT_FOV: f32 = 35.0;
    pub const DEFAULT_DISTANCE: f32 = 18.0;
    pub const MIN_DISTANCE: f32 = 2.0;
    pub const MAX_DISTANCE: f32 = 20.0;
    pub const MIN_POLAR: f32 = 1.0;
    pub const MAX_POLAR: f32 = std::f32::consts::FRAC_PI_2 - 0.1;

    /// Places the camera at `position`, looking at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().max(f32::EPSILON);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);

        Self {
            target,
            distance,
            azimuth,
            polar,
            fov: Self::DEFAULT_FOV,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                self.distance * sin_polar * self.azimuth.sin(),
                self.distance * self.polar.cos(),
                self.distance * sin_polar * self.azimuth.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// glam's `perspective_rh` already maps depth to wgpu's `0..1` range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_proj_matrix(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Ray from the camera through a point given in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let origin = self.position();
        let inverse = self.view_proj_matrix(aspect).inverse();
        let on_far_plane = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        Ray {
            origin,
            direction: (on_far_plane - origin).normalize(),
        }
    }

    /// Rotates around the target. The polar angle stays between [`Self::MIN_POLAR`] and
    /// [`Self::MAX_POLAR`] so the camera never dips below the horizon.
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth += delta_azimuth;
        self.polar = (self.polar + delta_polar).clamp(Self::MIN_POLAR, Self::MAX_POLAR);
    }

    /// Scales the distance to the target, `factor < 1` moves closer.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, Self::DEFAULT_DISTANCE), Vec3::ZERO)
    }
}
