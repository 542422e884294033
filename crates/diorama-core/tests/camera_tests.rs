// Host-side tests for the orbit camera and pointer picking.

use diorama_core::*;
use glam::Vec3;
use std::f32::consts::PI;

fn held(code: &str) -> MovementIntent {
    let mut intent = MovementIntent::default();
    intent.handle_key(code, true);
    intent
}

#[test]
fn initial_pose_matches_spherical_formula() {
    let cam = OrbitCameraController::default();
    let expected = Vec3::new(
        5.0 * (PI / 4.0).sin(),
        5.0 * (PI / 4.0).cos(),
        0.0,
    );
    assert!((cam.camera().eye - expected).length() < 1e-5);
    assert_eq!(cam.camera().target, Vec3::ZERO);
}

#[test]
fn one_frame_of_d_rotates_theta() {
    let mut cam = OrbitCameraController::default();
    cam.update(&held("KeyD"), 1.0 / 60.0);

    assert!((cam.state.theta - 0.05).abs() < 1e-6);
    assert!((cam.state.phi - PI / 4.0).abs() < 1e-6);
    assert!((cam.state.radius - 5.0).abs() < 1e-6);
    let expected = spherical_to_cartesian(5.0, 0.05, PI / 4.0);
    assert!((cam.camera().eye - expected).length() < 1e-5);
}

#[test]
fn theta_wraps_into_full_turn() {
    let mut cam = OrbitCameraController::default();
    let left = held("KeyA");
    cam.update(&left, 0.0);
    assert!(cam.state.theta >= 0.0 && cam.state.theta < std::f32::consts::TAU);
    assert!((cam.state.theta - (std::f32::consts::TAU - 0.05)).abs() < 1e-5);
}

#[test]
fn phi_stays_away_from_poles() {
    let mut cam = OrbitCameraController::default();
    let up = held("Space");
    for _ in 0..500 {
        cam.update(&up, 0.016);
    }
    assert!((cam.state.phi - 0.1).abs() < 1e-5);

    let down = held("ShiftLeft");
    for _ in 0..500 {
        cam.update(&down, 0.016);
    }
    assert!((cam.state.phi - (PI - 0.1)).abs() < 1e-5);
}

#[test]
fn radius_never_enters_the_bubble() {
    let mut cam = OrbitCameraController::default();
    let zoom_in = held("KeyW");
    for _ in 0..200 {
        cam.update(&zoom_in, 0.016);
    }
    assert_eq!(cam.state.radius, 2.0);

    let zoom_out = held("KeyS");
    cam.update(&zoom_out, 0.016);
    assert!((cam.state.radius - 2.1).abs() < 1e-5);
}

#[test]
fn idle_input_leaves_pose_unchanged() {
    let mut cam = OrbitCameraController::default();
    let before = cam.state;
    cam.update(&MovementIntent::default(), 0.016);
    assert_eq!(cam.state, before);
}

#[test]
fn out_of_range_start_is_sanitized() {
    let start = CameraState {
        radius: 0.5,
        theta: -1.0,
        phi: 0.0,
    };
    let cam = OrbitCameraController::new(start, CameraParams::default());
    assert_eq!(cam.state.radius, 2.0);
    assert!((cam.state.phi - 0.1).abs() < 1e-6);
    assert!(cam.state.theta >= 0.0);
}

#[test]
fn center_ray_hits_origin_plane_near_target() {
    let cam = OrbitCameraController::default();
    let (ro, rd) = cam.camera().screen_ray(400.0, 300.0, 800.0, 600.0);
    assert!((rd.length() - 1.0).abs() < 1e-4);
    let hit = ray_plane_y(ro, rd, 0.0).expect("center ray looks down at the equator");
    assert!(hit.length() < 1e-2, "hit {hit:?}");
}
