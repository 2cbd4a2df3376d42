use crate::util::normalize_rgba_color;

/// An RGBA color with 8-bit channels.
///
/// Used for the render target clear color and for reading pixels back out of the trail raster.
///
/// # Examples
///
/// ```
/// use trailfield::Color;
///
/// let black = Color::BLACK;
/// assert_eq!(black.to_array(), [0, 0, 0, 255]);
///
/// let dusk = Color::rgb(26, 26, 46);
/// assert_eq!(dusk.normalize()[3], 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// All channels zero.
    pub const TRANSPARENT: Self = Self([0, 0, 0, 0]);
    /// Opaque black. The trail raster starts out filled with it.
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    /// Opaque white.
    pub const WHITE: Self = Self([255, 255, 255, 255]);

    /// Creates an opaque color.
    ///
    /// ```
    /// use trailfield::Color;
    ///
    /// assert_eq!(Color::rgb(0, 255, 0), Color([0, 255, 0, 255]));
    /// ```
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Channel values mapped to `[0.0, 1.0]`.
    pub fn normalize(&self) -> [f32; 4] {
        normalize_rgba_color(&self.0)
    }

    pub fn to_array(&self) -> [u8; 4] {
        self.0
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.normalize();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        Self(value)
    }
}
