// Host-side tests for pointer-driven bubble bursts.

use diorama_core::*;
use glam::Vec3;

fn pointer(down: bool) -> PointerIntent {
    PointerIntent {
        is_down: down,
        world_position: Vec3::new(0.1, 0.0, -0.2),
    }
}

fn system(lifetime: f32, decay: f32) -> ParticleSystem {
    let params = ParticleParams {
        lifetime,
        decay_per_frame: decay,
        ..ParticleParams::default()
    };
    ParticleSystem::new(params, 7)
}

#[test]
fn lifetime_frames_is_ceiling_of_ratio() {
    assert_eq!(lifetime_frames(1.0, 0.25), 4);
    assert_eq!(lifetime_frames(1.0, 0.3), 4);
    assert_eq!(lifetime_frames(1.0, 0.01), 100);
    assert_eq!(lifetime_frames(1.0000005, 0.01), 101);
    assert_eq!(lifetime_frames(0.5, 0.1), 5);
    assert_eq!(lifetime_frames(0.7, 0.07), 10);
    assert_eq!(lifetime_frames(1.0, 2.0), 1);
    assert_eq!(lifetime_frames(1.0, 0.0), u32::MAX);
}

#[test]
fn held_pointer_spawns_every_fifth_frame() {
    let mut ps = system(1.0, 0.01);
    let mut spawned = 0;
    for frame in 1..=25 {
        let ev = ps.update(&pointer(true), 0.016);
        if frame % 5 == 0 {
            assert_eq!(ev.spawned.len(), 1, "frame {frame}");
        } else {
            assert!(ev.spawned.is_empty(), "frame {frame}");
        }
        spawned += ev.spawned.len();
    }
    assert_eq!(spawned, 5);
    assert_eq!(ps.active_count(), 5);
}

#[test]
fn releasing_pointer_resets_throttle() {
    let mut ps = system(1.0, 0.01);
    for _ in 0..4 {
        ps.update(&pointer(true), 0.016);
    }
    ps.update(&pointer(false), 0.016);
    for _ in 0..4 {
        assert!(ps.update(&pointer(true), 0.016).spawned.is_empty());
    }
    assert_eq!(ps.update(&pointer(true), 0.016).spawned.len(), 1);
}

#[test]
fn no_spawns_while_pointer_up() {
    let mut ps = system(1.0, 0.01);
    for _ in 0..50 {
        assert!(ps.update(&pointer(false), 0.016).spawned.is_empty());
    }
    assert_eq!(ps.active_count(), 0);
}

fn frames_until_removed(lifetime: f32, decay: f32) -> u32 {
    let mut ps = system(lifetime, decay);
    let id = ps.spawn_at(Vec3::ZERO).expect("pool has room");
    let mut frames = 0;
    loop {
        frames += 1;
        let ev = ps.update(&pointer(false), 0.016);
        if ev.expired.contains(&id) {
            assert!(ps.burst(id).is_none());
            return frames;
        }
        assert!(ps.burst(id).is_some());
        assert!(frames < 1000);
    }
}

#[test]
fn burst_removed_after_exact_frame_count() {
    assert_eq!(frames_until_removed(1.0, 0.25), 4);
    assert_eq!(frames_until_removed(1.0, 0.3), 4);
    assert_eq!(frames_until_removed(1.0, 0.01), 100);
}

#[test]
fn burst_layout_and_motion() {
    let mut ps = system(1.0, 0.01);
    let origin = Vec3::new(0.2, 0.0, 0.1);
    let id = ps.spawn_at(origin).expect("pool has room");
    let burst = ps.burst(id).expect("just spawned").clone();

    assert_eq!(burst.points.len(), PARTICLES_PER_BURST);
    assert_eq!(burst.points.len(), burst.velocities.len());
    for (p, v) in burst.points.iter().zip(&burst.velocities) {
        let d = *p - origin;
        assert!((d.x * d.x + d.z * d.z).sqrt() <= BURST_DISK_RADIUS + 1e-6);
        assert!(d.y >= 0.0 && d.y <= BURST_VERTICAL_JITTER + 1e-6);
        assert!(v.y >= BURST_RISE_SPEED_MIN && v.y <= BURST_RISE_SPEED_MAX);
        assert!(v.x.abs() <= BURST_HORIZONTAL_SPEED && v.z.abs() <= BURST_HORIZONTAL_SPEED);
    }

    ps.update(&pointer(false), 0.016);
    let moved = ps.burst(id).expect("still alive");
    for ((p0, v), p1) in burst.points.iter().zip(&burst.velocities).zip(&moved.points) {
        assert!((*p0 + *v - *p1).length() < 1e-6);
    }
    assert!((moved.remaining_lifetime - 0.99).abs() < 1e-5);
    assert!(moved.opacity() < 1.0 && moved.opacity() > 0.98);
}

#[test]
fn pool_cap_skips_spawns() {
    let params = ParticleParams {
        max_active: Some(3),
        ..ParticleParams::default()
    };
    let mut ps = ParticleSystem::new(params, 1);
    for _ in 0..3 {
        assert!(ps.spawn_at(Vec3::ZERO).is_some());
    }
    assert!(ps.spawn_at(Vec3::ZERO).is_none());
    assert_eq!(ps.active_count(), 3);
}

#[test]
fn burst_ids_are_unique() {
    let mut ps = system(1.0, 0.5);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..40 {
        let ev = ps.update(&pointer(true), 0.016);
        for id in ev.spawned {
            assert!(seen.insert(id));
        }
    }
    assert_eq!(seen.len(), 8);
}
