//! End-to-end properties of the trail, driven through `TrailField` with scripted pointers.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trailfield::glam::Vec2;
use trailfield::{
    stamp_alpha, uv_to_buffer_pixel, GlowSprite, PerspectiveCamera, ProjectedCoordinate,
    ProjectionOutcome, SurfaceProjector, TrailField, TrailFieldConfig, TrailUpdate, Viewport,
};
use trailfield_test_scenes::PointerPath;

const VIEWPORT: (u32, u32) = (800, 600);

fn ready_field() -> TrailField {
    let config = TrailFieldConfig::default()
        .with_grid_subdivisions(16)
        .with_particle_seed(5);
    let mut field = TrailField::new(config, Viewport::new(VIEWPORT, 1.0)).unwrap();
    field.set_glow_sprite(GlowSprite::radial(32));
    field
}

#[test]
fn energy_never_grows_without_a_new_stamp() {
    let mut field = ready_field();
    let camera = PerspectiveCamera::default();
    for (x, y) in PointerPath::horizontal_swipe(VIEWPORT.0, VIEWPORT.1, 20).points() {
        field.pointer_moved(x, y);
        field.tick(&camera);
    }

    // The pointer now rests, so every following tick is decay only.
    let mut energy = field.trail_buffer().total_energy();
    assert!(energy > 0);
    for _ in 0..300 {
        let report = field.tick(&camera);
        if let TrailUpdate::Updated { stamp_alpha, .. } = report.trail {
            assert_eq!(stamp_alpha, 0.0);
        }
        let next = field.trail_buffer().total_energy();
        assert!(next <= energy);
        if energy > 0 {
            assert!(next < energy, "decay-only frames must strictly fade");
        }
        energy = next;
    }
    assert_eq!(energy, 0);
}

#[test]
fn random_walk_energy_is_non_increasing_between_stamps() {
    let mut field = ready_field();
    let camera = PerspectiveCamera::default();
    let mut rng = StdRng::seed_from_u64(99);

    let mut energy = field.trail_buffer().total_energy();
    for _ in 0..200 {
        let moved = rng.random_bool(0.3);
        if moved {
            let x = rng.random_range(200.0..600.0);
            let y = rng.random_range(150.0..450.0);
            field.pointer_moved(x, y);
        }

        let report = field.tick(&camera);
        let next = field.trail_buffer().total_energy();
        if let TrailUpdate::Updated { stamp_alpha, .. } = report.trail {
            if stamp_alpha == 0.0 {
                assert!(next <= energy);
            }
        }
        energy = next;
    }
}

#[test]
fn stationary_pointer_produces_zero_alpha() {
    let mut field = ready_field();
    let camera = PerspectiveCamera::default();
    field.pointer_moved(400.0, 300.0);
    field.tick(&camera);

    for _ in 0..10 {
        match field.tick(&camera).trail {
            TrailUpdate::Updated {
                distance,
                stamp_alpha,
            } => {
                assert_eq!(distance, 0.0);
                assert_eq!(stamp_alpha, 0.0);
            }
            other => panic!("expected an update, got {other:?}"),
        }
    }
}

#[test]
fn stamp_alpha_reference_values() {
    let mut coordinate = ProjectedCoordinate::from_points(Vec2::new(10.0, 0.0), Vec2::ZERO);
    let distance = coordinate.advance();
    assert_eq!(distance, 10.0);
    assert_eq!(coordinate.previous, Vec2::new(10.0, 0.0));
    assert_eq!(stamp_alpha(distance, 0.1), 1.0);
    assert_eq!(stamp_alpha(20.0, 0.1), 1.0);
    assert!((stamp_alpha(3.0, 0.1) - 0.3).abs() < 1e-6);
}

#[test]
fn projection_miss_holds_the_coordinate() {
    let mut field = ready_field();
    let camera = PerspectiveCamera::default();
    field.pointer_moved(400.0, 300.0);
    field.tick(&camera);
    let held = field.coordinate();

    // Far corner of the window is off the reference surface.
    field.pointer_moved(1.0, 1.0);
    let report = field.tick(&camera);

    assert_eq!(report.projection, ProjectionOutcome::Miss);
    assert_eq!(field.coordinate().current, held.current);

    let projector = SurfaceProjector::new(10.0, (128, 128));
    let mut coordinate = held;
    projector.project(
        &camera,
        1.0,
        trailfield::PointerSample::SENTINEL,
        &mut coordinate,
    );
    assert_eq!(coordinate, held);
}

#[test]
fn particle_attributes_are_bit_stable() {
    let mut field = ready_field();
    let camera = PerspectiveCamera::default();
    let probe = field.particles().instances()[42];

    for (x, y) in PointerPath::horizontal_swipe(VIEWPORT.0, VIEWPORT.1, 30).points() {
        field.pointer_moved(x, y);
        field.tick(&camera);
        let now = field.particles().instances()[42];
        assert_eq!(now.angle.to_bits(), probe.angle.to_bits());
        assert_eq!(now.intensity.to_bits(), probe.intensity.to_bits());
    }
}

#[test]
fn buffer_pixel_mapping_reference_values() {
    let size = (128, 128);
    assert_eq!(uv_to_buffer_pixel(Vec2::new(0.5, 0.5), size), Vec2::new(64.0, 64.0));
    assert_eq!(uv_to_buffer_pixel(Vec2::new(0.0, 1.0), size), Vec2::new(0.0, 0.0));
    assert_eq!(uv_to_buffer_pixel(Vec2::new(1.0, 0.0), size), Vec2::new(128.0, 128.0));
}
