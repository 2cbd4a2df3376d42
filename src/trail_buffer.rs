//! Decaying RGBA8 raster that records recent pointer activity.
//!
//! Every update first darkens the whole raster by compositing a faint black overlay
//! (source-over), then stamps the glow sprite with a lighten blend, so overlapping stamps keep the
//! brightest value instead of adding up. The raster is opaque and starts out black.

use glam::Vec2;

use crate::color::Color;
use crate::sprite::GlowSprite;

/// Opacity of a stamp for a pointer that moved `distance` buffer pixels since the last frame.
#[inline]
pub fn stamp_alpha(distance: f32, speed_gain: f32) -> f32 {
    (distance * speed_gain).min(1.0)
}

#[derive(Debug, Clone)]
pub struct TrailBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    dirty: bool,
}

impl TrailBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; width as usize * height as usize * 4];
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&Color::BLACK.0);
        }

        Self {
            width,
            height,
            pixels,
            dirty: true,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// True when the raster changed since the last upload.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(Color(rgba))
    }

    /// Sum of all color channels over the raster.
    pub fn total_energy(&self) -> u64 {
        self.pixels
            .chunks_exact(4)
            .map(|px| px[0] as u64 + px[1] as u64 + px[2] as u64)
            .sum()
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Composites black at `opacity` over the whole raster.
    ///
    /// Results round down, so every non-zero channel loses at least one step per call and the
    /// raster eventually reaches black.
    pub fn decay(&mut self, opacity: f32) {
        let keep = (1.0 - opacity).clamp(0.0, 1.0);
        if keep >= 1.0 {
            return;
        }

        for px in self.pixels.chunks_exact_mut(4) {
            for channel in &mut px[..3] {
                *channel = (*channel as f32 * keep).floor() as u8;
            }
        }
        self.dirty = true;
    }

    /// Draws `sprite` scaled to a `size`×`size` square centered on `center`, lighten-blended at
    /// `alpha`. Parts of the square outside the raster are clipped.
    pub fn stamp(&mut self, sprite: &GlowSprite, center: Vec2, size: f32, alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || size <= 0.0 {
            return;
        }

        let left = center.x - size * 0.5;
        let top = center.y - size * 0.5;
        let x_start = left.floor().max(0.0) as u32;
        let y_start = top.floor().max(0.0) as u32;
        let x_end = ((left + size).ceil().max(0.0) as u32).min(self.width);
        let y_end = ((top + size).ceil().max(0.0) as u32).min(self.height);

        for y in y_start..y_end {
            let v = (y as f32 + 0.5 - top) / size;
            if !(0.0..=1.0).contains(&v) {
                continue;
            }
            for x in x_start..x_end {
                let u = (x as f32 + 0.5 - left) / size;
                if !(0.0..=1.0).contains(&u) {
                    continue;
                }

                let source = sprite.sample(u, v);
                let coverage = source[3] * alpha;
                if coverage <= 0.0 {
                    continue;
                }

                let offset = self.offset(x, y);
                for channel in 0..3 {
                    let backdrop = self.pixels[offset + channel] as f32 / 255.0;
                    let lightened = backdrop.max(source[channel]);
                    let out = backdrop + coverage * (lightened - backdrop);
                    self.pixels[offset + channel] = (out * 255.0).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_dot() -> GlowSprite {
        GlowSprite::from_rgba(1, 1, vec![255; 4]).unwrap()
    }

    fn lit_buffer() -> TrailBuffer {
        let mut buffer = TrailBuffer::new(32, 32);
        buffer.stamp(&GlowSprite::radial(16), Vec2::new(16.0, 16.0), 16.0, 1.0);
        buffer
    }

    #[test]
    fn starts_opaque_black_and_dirty() {
        let buffer = TrailBuffer::new(4, 4);
        assert_eq!(buffer.total_energy(), 0);
        assert_eq!(buffer.pixel(3, 3), Some(Color::BLACK));
        assert!(buffer.is_dirty());
        assert_eq!(buffer.as_bytes().len(), 64);
    }

    #[test]
    fn stamp_alpha_scales_with_speed_and_clamps() {
        assert_eq!(stamp_alpha(0.0, 0.1), 0.0);
        assert!((stamp_alpha(5.0, 0.1) - 0.5).abs() < 1e-6);
        assert_eq!(stamp_alpha(10.0, 0.1), 1.0);
        assert_eq!(stamp_alpha(20.0, 0.1), 1.0);
    }

    #[test]
    fn stamp_lights_the_center_only() {
        let buffer = lit_buffer();
        let center = buffer.pixel(16, 16).unwrap();
        assert!(center.0[0] > 200);
        assert_eq!(center.0[0], center.0[2]);
        assert_eq!(buffer.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(buffer.pixel(31, 16), Some(Color::BLACK));
    }

    #[test]
    fn zero_alpha_stamp_changes_nothing() {
        let mut buffer = TrailBuffer::new(16, 16);
        buffer.mark_clean();
        buffer.stamp(&GlowSprite::radial(8), Vec2::new(8.0, 8.0), 8.0, 0.0);
        assert_eq!(buffer.total_energy(), 0);
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn lighten_never_darkens_existing_content() {
        let mut buffer = lit_buffer();
        let before = buffer.as_bytes().to_vec();

        buffer.stamp(&GlowSprite::radial(16), Vec2::new(20.0, 16.0), 16.0, 0.3);

        for (after, before) in buffer.as_bytes().iter().zip(before.iter()) {
            assert!(after >= before);
        }
    }

    #[test]
    fn repeated_stamps_saturate_instead_of_overflowing() {
        let mut buffer = TrailBuffer::new(16, 16);
        for _ in 0..50 {
            buffer.stamp(&GlowSprite::radial(8), Vec2::new(8.0, 8.0), 8.0, 1.0);
        }
        assert_eq!(buffer.pixel(8, 8), Some(Color::WHITE));
    }

    #[test]
    fn decay_strictly_reduces_lit_pixels() {
        let mut buffer = lit_buffer();
        let before = buffer.pixel(16, 16).unwrap();
        buffer.decay(0.02);
        let after = buffer.pixel(16, 16).unwrap();

        assert!(after.0[0] < before.0[0]);
        assert_eq!(after.0[3], 255);
    }

    #[test]
    fn decay_rounds_each_channel_down() {
        let mut buffer = TrailBuffer::new(4, 4);
        buffer.stamp(&white_dot(), Vec2::new(2.0, 2.0), 4.0, 1.0);
        assert_eq!(buffer.pixel(1, 1), Some(Color::WHITE));

        buffer.decay(0.02);
        assert_eq!(buffer.pixel(1, 1), Some(Color::rgb(249, 249, 249)));
        buffer.decay(0.02);
        assert_eq!(buffer.pixel(1, 1), Some(Color::rgb(244, 244, 244)));
    }

    #[test]
    fn half_alpha_stamp_moves_halfway_to_the_sprite() {
        let mut buffer = TrailBuffer::new(16, 16);
        buffer.stamp(&white_dot(), Vec2::new(4.0, 8.0), 4.0, 0.5);
        assert_eq!(buffer.pixel(4, 8), Some(Color::rgb(128, 128, 128)));

        let gray = GlowSprite::from_rgba(1, 1, vec![200, 200, 200, 255]).unwrap();
        buffer.stamp(&gray, Vec2::new(12.0, 8.0), 4.0, 1.0);
        assert_eq!(buffer.pixel(12, 8), Some(Color::rgb(200, 200, 200)));
        buffer.stamp(&white_dot(), Vec2::new(12.0, 8.0), 4.0, 0.5);
        assert_eq!(buffer.pixel(12, 8), Some(Color::rgb(228, 228, 228)));
    }

    #[test]
    fn decay_reaches_black() {
        let mut buffer = lit_buffer();
        for _ in 0..400 {
            buffer.decay(0.02);
        }
        assert_eq!(buffer.total_energy(), 0);
    }

    #[test]
    fn stamp_is_clipped_at_the_edges() {
        let mut buffer = TrailBuffer::new(16, 16);
        buffer.stamp(&GlowSprite::radial(8), Vec2::new(0.0, 0.0), 8.0, 1.0);
        buffer.stamp(&GlowSprite::radial(8), Vec2::new(-50.0, 200.0), 8.0, 1.0);

        assert!(buffer.pixel(0, 0).unwrap().0[0] > 0);
        assert_eq!(buffer.pixel(15, 15), Some(Color::BLACK));
    }
}
