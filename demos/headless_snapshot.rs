/// Renders a short scripted swipe headlessly and writes the last frame to a PNG.
///
/// Run with:    cargo run --example headless_snapshot [output.png]
use futures::executor::block_on;
use trailfield::{Renderer, TrailFieldConfig};
use trailfield_test_scenes::{
    build_field_scene, check_pixels, PointerPath, CANVAS_HEIGHT, CANVAS_WIDTH,
};

pub fn main() {
    env_logger::init();
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "trailfield_snapshot.png".to_string());

    let config = TrailFieldConfig::default().with_particle_seed(7);
    let mut renderer = match block_on(Renderer::try_new_headless(
        (CANVAS_WIDTH, CANVAS_HEIGHT),
        1.0,
        config,
    )) {
        Ok(renderer) => renderer,
        Err(error) => {
            eprintln!("{error}");
            return;
        }
    };
    let expectations = build_field_scene(&mut renderer).unwrap();

    let mut bgra = Vec::new();
    for (x, y) in PointerPath::horizontal_swipe(CANVAS_WIDTH, CANVAS_HEIGHT, 24).points() {
        renderer.pointer_moved(x, y);
        let report = renderer.render_to_buffer(&mut bgra);
        tracing::debug!("{report:?}");
    }

    // Only the off-plane corners are stable once particles have moved.
    for failure in check_pixels(&bgra, CANVAS_WIDTH, CANVAS_HEIGHT, &expectations[1..]) {
        eprintln!("{failure}");
    }

    let mut rgba = bgra;
    for px in rgba.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    match image::RgbaImage::from_raw(CANVAS_WIDTH, CANVAS_HEIGHT, rgba) {
        Some(picture) => match picture.save(&output) {
            Ok(()) => println!("Wrote {output}"),
            Err(error) => eprintln!("Could not write {output}: {error}"),
        },
        None => eprintln!("Readback did not match the canvas size"),
    }
}
