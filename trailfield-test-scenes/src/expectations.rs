/// How a rendered pixel is judged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PixelCheck {
    /// Every RGBA channel within `tolerance` of the expected value.
    Near { rgba: [u8; 4], tolerance: u8 },
    /// Red, green and blue summed to at least `min_energy`. Particle discs have hard edges, so
    /// lit areas are checked for brightness rather than an exact color.
    Lit { min_energy: u32 },
}

/// A single pixel expectation to validate after rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelExpectation {
    pub x: u32,
    pub y: u32,
    pub check: PixelCheck,
    /// Human-readable label for failure messages.
    pub label: &'static str,
}

impl PixelExpectation {
    pub fn near(x: u32, y: u32, rgba: [u8; 4], label: &'static str) -> Self {
        Self {
            x,
            y,
            check: PixelCheck::Near { rgba, tolerance: 5 },
            label,
        }
    }

    /// Expects the clear color of a default configuration.
    pub fn background(x: u32, y: u32, label: &'static str) -> Self {
        Self::near(x, y, [0, 0, 0, 0], label)
    }

    pub fn lit(x: u32, y: u32, min_energy: u32, label: &'static str) -> Self {
        Self {
            x,
            y,
            check: PixelCheck::Lit { min_energy },
            label,
        }
    }

    /// Only affects [`PixelCheck::Near`] expectations.
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        if let PixelCheck::Near { rgba, .. } = self.check {
            self.check = PixelCheck::Near { rgba, tolerance };
        }
        self
    }
}

/// Reads pixel `(x, y)` out of BGRA8 data from `render_to_buffer()` as RGBA.
pub fn read_rgba(pixel_data: &[u8], width: u32, x: u32, y: u32) -> Option<[u8; 4]> {
    let offset = (y as usize * width as usize + x as usize) * 4;
    let px = pixel_data.get(offset..offset + 4)?;
    Some([px[2], px[1], px[0], px[3]])
}

/// Validates pixel expectations against raw BGRA8 pixel data from `render_to_buffer()`.
///
/// Returns a list of human-readable failure descriptions. An empty list means
/// all expectations passed.
pub fn check_pixels(
    pixel_data: &[u8],
    width: u32,
    height: u32,
    expectations: &[PixelExpectation],
) -> Vec<String> {
    let mut failures = Vec::new();

    for expectation in expectations {
        if expectation.x >= width || expectation.y >= height {
            failures.push(format!(
                "[{}] pixel ({},{}) is outside canvas {}×{}",
                expectation.label, expectation.x, expectation.y, width, height,
            ));
            continue;
        }

        let Some(actual) = read_rgba(pixel_data, width, expectation.x, expectation.y) else {
            failures.push(format!(
                "[{}] pixel ({},{}) is out of bounds (buffer len {})",
                expectation.label,
                expectation.x,
                expectation.y,
                pixel_data.len(),
            ));
            continue;
        };

        match expectation.check {
            PixelCheck::Near { rgba, tolerance } => {
                let matches = actual
                    .iter()
                    .zip(rgba.iter())
                    .all(|(&a, &e)| (a as i16 - e as i16).abs() <= tolerance as i16);
                if !matches {
                    failures.push(format!(
                        "[{}] pixel ({},{}) expected rgba{:?} ±{} but got rgba{:?}",
                        expectation.label,
                        expectation.x,
                        expectation.y,
                        rgba,
                        tolerance,
                        actual,
                    ));
                }
            }
            PixelCheck::Lit { min_energy } => {
                let energy = actual[..3].iter().map(|&c| c as u32).sum::<u32>();
                if energy < min_energy {
                    failures.push(format!(
                        "[{}] pixel ({},{}) expected energy ≥ {} but got rgba{:?}",
                        expectation.label, expectation.x, expectation.y, min_energy, actual,
                    ));
                }
            }
        }
    }

    failures
}
