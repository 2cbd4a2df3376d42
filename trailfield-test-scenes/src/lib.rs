pub mod expectations;
pub mod scene;

pub use expectations::{check_pixels, read_rgba, PixelExpectation};
pub use scene::{
    build_field_scene, gradient_picture, white_picture, PointerPath, CANVAS_HEIGHT, CANVAS_WIDTH,
    PICTURE_SIZE,
};
