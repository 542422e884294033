// Host-side tests for key mapping and pointer projection.

use diorama_core::*;
use glam::Vec3;

#[test]
fn movement_keys_map_to_axes() {
    assert_eq!(axis_for_code("KeyW"), Some((Axis::Forward, -1.0)));
    assert_eq!(axis_for_code("KeyS"), Some((Axis::Forward, 1.0)));
    assert_eq!(axis_for_code("KeyA"), Some((Axis::Sideways, -1.0)));
    assert_eq!(axis_for_code("KeyD"), Some((Axis::Sideways, 1.0)));
    assert_eq!(axis_for_code("Space"), Some((Axis::Vertical, 1.0)));
    assert_eq!(axis_for_code("ShiftLeft"), Some((Axis::Vertical, -1.0)));
}

#[test]
fn unrelated_keys_are_ignored() {
    let mut m = MovementIntent::default();
    assert!(!m.handle_key("KeyQ", true));
    assert!(!m.handle_key("ShiftRight", true));
    assert!(!m.handle_key("w", true));
    assert!(m.is_idle());
}

#[test]
fn release_resets_axis() {
    let mut m = MovementIntent::default();
    assert!(m.handle_key("KeyD", true));
    assert_eq!(m.sideways, 1.0);
    assert!(m.handle_key("KeyD", false));
    assert_eq!(m.sideways, 0.0);
    assert!(m.is_idle());
}

#[test]
fn most_recent_key_of_a_pair_wins() {
    let mut m = MovementIntent::default();
    m.handle_key("KeyA", true);
    m.handle_key("KeyD", true);
    assert_eq!(m.sideways, 1.0);

    // releasing either key of the pair clears the axis
    m.handle_key("KeyA", false);
    assert_eq!(m.sideways, 0.0);
}

#[test]
fn axes_are_independent() {
    let mut m = MovementIntent::default();
    m.handle_key("KeyW", true);
    m.handle_key("Space", true);
    m.handle_key("KeyA", true);
    assert_eq!((m.forward, m.sideways, m.vertical), (-1.0, -1.0, 1.0));
    m.handle_key("Space", false);
    assert_eq!((m.forward, m.sideways, m.vertical), (-1.0, -1.0, 0.0));
}

#[test]
fn ray_plane_hits_below() {
    let hit = ray_plane_y(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
    assert_eq!(hit, Some(Vec3::new(1.0, 0.0, 0.0)));
}

#[test]
fn ray_plane_misses_parallel_and_backward_rays() {
    assert!(ray_plane_y(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 0.0).is_none());
    assert!(ray_plane_y(Vec3::new(0.0, 1.0, 0.0), Vec3::Y, 0.0).is_none());
}

#[test]
fn pointer_keeps_last_position_when_ray_misses() {
    let mut p = PointerIntent::default();
    assert!(p.set_from_ray(Vec3::new(0.3, 1.0, -0.2), Vec3::NEG_Y, 0.0));
    let first = p.world_position;
    assert!(!p.set_from_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 0.0));
    assert_eq!(p.world_position, first);
    assert!((first - Vec3::new(0.3, 0.0, -0.2)).length() < 1e-6);
}
