use std::sync::Arc;

use crate::error::TrailFieldError;
use crate::util::smoothstep;

/// Immutable RGBA8 image stamped into the trail buffer. Cloning shares the pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct GlowSprite {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl GlowSprite {
    /// Wraps already decoded, non-premultiplied RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TrailFieldError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(TrailFieldError::InvalidSprite {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// White dot whose alpha falls off smoothly from the center to the inscribed circle.
    pub fn radial(size: u32) -> Self {
        let size = size.max(1);
        let center = size as f32 * 0.5;
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let distance = (dx * dx + dy * dy).sqrt() / center;
                let alpha = smoothstep(1.0, 0.0, distance);
                pixels.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
            }
        }

        Self {
            width: size,
            height: size,
            pixels: pixels.into(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let offset = (y * self.width as usize + x) * 4;
        let px = &self.pixels[offset..offset + 4];
        [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        ]
    }

    /// Bilinear sample with clamp-to-edge addressing. `(0, 0)` is the top-left corner.
    pub fn sample(&self, u: f32, v: f32) -> [f32; 4] {
        let tx = u * self.width as f32 - 0.5;
        let ty = v * self.height as f32 - 0.5;
        let x0 = tx.floor();
        let y0 = ty.floor();
        let fx = tx - x0;
        let fy = ty - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top_left = self.texel(x0, y0);
        let top_right = self.texel(x0 + 1, y0);
        let bottom_left = self.texel(x0, y0 + 1);
        let bottom_right = self.texel(x0 + 1, y0 + 1);

        let mut out = [0.0; 4];
        for channel in 0..4 {
            let top = top_left[channel] + (top_right[channel] - top_left[channel]) * fx;
            let bottom =
                bottom_left[channel] + (bottom_right[channel] - bottom_left[channel]) * fx;
            out[channel] = top + (bottom - top) * fy;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_data() {
        let result = GlowSprite::from_rgba(4, 4, vec![0; 10]);
        assert!(matches!(
            result,
            Err(TrailFieldError::InvalidSprite {
                expected: 64,
                actual: 10,
                ..
            })
        ));
    }

    #[test]
    fn radial_sprite_is_bright_in_the_middle_and_clear_at_corners() {
        let sprite = GlowSprite::radial(64);
        let center = sprite.sample(0.5, 0.5);
        let corner = sprite.sample(0.0, 0.0);
        assert!(center[3] > 0.99);
        assert_eq!(corner[3], 0.0);
        assert_eq!(center[0], 1.0);
    }

    #[test]
    fn sample_interpolates_between_texels() {
        let sprite = GlowSprite::from_rgba(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let middle = sprite.sample(0.5, 0.5);
        assert!((middle[0] - 0.5).abs() < 1e-6);
        assert_eq!(sprite.sample(0.0, 0.5)[0], 0.0);
        assert_eq!(sprite.sample(1.0, 0.5)[0], 1.0);
    }
}
