use trailfield::{GlowSprite, Renderer, TrailFieldError};

use crate::expectations::PixelExpectation;

pub const CANVAS_WIDTH: u32 = 480;
pub const CANVAS_HEIGHT: u32 = 480;

/// Side of the generated source pictures.
pub const PICTURE_SIZE: u32 = 64;

/// Fully white opaque RGBA8 picture. Every particle gets full size and brightness.
pub fn white_picture(size: u32) -> Vec<u8> {
    vec![255; size as usize * size as usize * 4]
}

/// Picture that is black on the left edge and white on the right edge.
pub fn gradient_picture(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
    for _ in 0..size {
        for x in 0..size {
            let value = (x * 255 / size.saturating_sub(1).max(1)) as u8;
            pixels.extend_from_slice(&[value, value, value, 255]);
        }
    }
    pixels
}

/// Scripted pointer movement in physical pixels, evenly spaced from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPath {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub steps: u32,
}

impl PointerPath {
    pub fn new(from: (f64, f64), to: (f64, f64), steps: u32) -> Self {
        Self { from, to, steps }
    }

    /// Left-to-right swipe through the middle of a `width`×`height` canvas, staying on the
    /// reference surface of a default camera.
    pub fn horizontal_swipe(width: u32, height: u32, steps: u32) -> Self {
        let y = height as f64 * 0.5;
        Self::new(
            (width as f64 * 0.3, y),
            (width as f64 * 0.7, y),
            steps,
        )
    }

    /// Left-to-right swipe along pixel row `row` of a `width`-wide canvas.
    pub fn horizontal_swipe_at(width: u32, row: u32, steps: u32) -> Self {
        let y = row as f64;
        Self::new(
            (width as f64 * 0.3, y),
            (width as f64 * 0.7, y),
            steps,
        )
    }

    /// Positions along the path, both end points included.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let last = self.steps.max(1);
        (0..=last).map(move |step| {
            let t = step as f64 / last as f64;
            (
                self.from.0 + (self.to.0 - self.from.0) * t,
                self.from.1 + (self.to.1 - self.from.1) * t,
            )
        })
    }
}

/// Loads a white picture and a radial glow sprite into `renderer` and returns the pixels a
/// frame rendered from the default camera must produce.
///
/// Shared between the integration tests (via `render_to_buffer`) and the headless snapshot
/// demo.
pub fn build_field_scene(renderer: &mut Renderer) -> Result<Vec<PixelExpectation>, TrailFieldError> {
    renderer.set_picture((PICTURE_SIZE, PICTURE_SIZE), &white_picture(PICTURE_SIZE))?;
    let glow_size = renderer.trail_field().config().glow_size().round() as u32;
    renderer.set_glow_sprite(GlowSprite::radial(glow_size));

    let (width, height) = renderer.size();
    let (center_x, center_y) = (width / 2, height / 2);

    Ok(vec![
        PixelExpectation::lit(center_x, center_y, 600, "center particle"),
        PixelExpectation::background(2, 2, "top-left corner is off the plane"),
        PixelExpectation::background(width - 3, height - 3, "bottom-right corner is off the plane"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipe_includes_both_ends() {
        let path = PointerPath::new((0.0, 10.0), (100.0, 10.0), 4);
        let points: Vec<_> = path.points().collect();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], (0.0, 10.0));
        assert_eq!(points[2], (50.0, 10.0));
        assert_eq!(points[4], (100.0, 10.0));
    }

    #[test]
    fn gradient_runs_dark_to_bright() {
        let picture = gradient_picture(4);
        assert_eq!(picture.len(), 64);
        assert_eq!(picture[0], 0);
        assert_eq!(picture[12], 255);
    }
}
