//! Pointer-driven bubble bursts: short-lived point clouds that rise and fade.

use crate::constants::*;
use crate::input::PointerIntent;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub u64);

#[derive(Clone, Debug)]
pub struct ParticleParams {
    pub particles_per_burst: usize,
    pub spawn_every: u32,
    pub disk_radius: f32,
    pub vertical_jitter: f32,
    pub horizontal_speed: f32,
    pub rise_speed_min: f32,
    pub rise_speed_max: f32,
    pub lifetime: f32,
    pub decay_per_frame: f32,
    /// `None` leaves the pool unbounded.
    pub max_active: Option<usize>,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            particles_per_burst: PARTICLES_PER_BURST,
            spawn_every: BURST_SPAWN_EVERY_FRAMES,
            disk_radius: BURST_DISK_RADIUS,
            vertical_jitter: BURST_VERTICAL_JITTER,
            horizontal_speed: BURST_HORIZONTAL_SPEED,
            rise_speed_min: BURST_RISE_SPEED_MIN,
            rise_speed_max: BURST_RISE_SPEED_MAX,
            lifetime: BURST_LIFETIME,
            decay_per_frame: BURST_DECAY_PER_FRAME,
            max_active: Some(BURST_MAX_ACTIVE),
        }
    }
}

/// Number of updates a burst with lifetime `lifetime` survives at `decay` per frame.
///
/// This is `ceil(lifetime / decay)`. The ratio is taken in f64 and only the
/// rounding error of the two f32 inputs (a few ulps of the ratio) is
/// forgiven, so `1.0 / 0.01` counts as 100 frames while `1.0000005 / 0.01`
/// still counts as 101.
pub fn lifetime_frames(lifetime: f32, decay: f32) -> u32 {
    if decay <= 0.0 || !decay.is_finite() {
        return u32::MAX;
    }
    let ratio = lifetime as f64 / decay as f64;
    let tolerance = ratio.abs() * 2.0 * f32::EPSILON as f64;
    (ratio - tolerance).ceil().max(1.0) as u32
}

/// One spawned group of particles.
#[derive(Clone, Debug)]
pub struct Burst {
    pub id: BurstId,
    pub points: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub remaining_lifetime: f32,
    initial_lifetime: f32,
    decay: f32,
    age_frames: u32,
    lifetime_frames: u32,
}

impl Burst {
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age_frames >= self.lifetime_frames
    }

    /// Remaining lifetime as a fraction of the initial lifetime, for fading.
    #[inline]
    pub fn opacity(&self) -> f32 {
        if self.initial_lifetime > 0.0 {
            (self.remaining_lifetime / self.initial_lifetime).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    fn advance(&mut self) {
        for (p, v) in self.points.iter_mut().zip(&self.velocities) {
            *p += *v;
        }
        self.age_frames = self.age_frames.saturating_add(1);
        self.remaining_lifetime = self.initial_lifetime - self.age_frames as f32 * self.decay;
        if self.is_expired() {
            self.remaining_lifetime = self.remaining_lifetime.min(0.0);
        }
    }
}

/// What changed during one [`ParticleSystem::update`].
#[derive(Debug, Default)]
pub struct ParticleEvents {
    pub spawned: SmallVec<[BurstId; 2]>,
    pub expired: SmallVec<[BurstId; 4]>,
}

pub struct ParticleSystem {
    pub params: ParticleParams,
    bursts: Vec<Burst>,
    spawn_counter: u32,
    next_id: u64,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(params: ParticleParams, seed: u64) -> Self {
        Self {
            params,
            bursts: Vec::new(),
            spawn_counter: 0,
            next_id: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    pub fn burst(&self, id: BurstId) -> Option<&Burst> {
        self.bursts.iter().find(|b| b.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.bursts.len()
    }

    /// Advance one frame: maybe spawn at the pointer, move every particle,
    /// decay lifetimes and drop expired bursts. Speeds are per frame, so
    /// `_dt` is unused.
    pub fn update(&mut self, pointer: &PointerIntent, _dt: f32) -> ParticleEvents {
        let mut events = ParticleEvents::default();

        for burst in &mut self.bursts {
            burst.advance();
        }
        self.bursts.retain(|b| {
            if b.is_expired() {
                events.expired.push(b.id);
                false
            } else {
                true
            }
        });

        if pointer.is_down {
            self.spawn_counter += 1;
            let every = self.params.spawn_every.max(1);
            if self.spawn_counter % every == 0 {
                if let Some(id) = self.spawn_at(pointer.world_position) {
                    events.spawned.push(id);
                }
            }
        } else {
            self.spawn_counter = 0;
        }

        events
    }

    /// Spawn one burst centred on `origin`. Returns `None` when the pool is full.
    pub fn spawn_at(&mut self, origin: Vec3) -> Option<BurstId> {
        if let Some(max) = self.params.max_active {
            if self.bursts.len() >= max {
                log::debug!("[bursts] pool full ({max}), skipping spawn");
                return None;
            }
        }
        let p = &self.params;
        let n = p.particles_per_burst;
        let mut points = Vec::with_capacity(n);
        let mut velocities = Vec::with_capacity(n);
        for _ in 0..n {
            let angle = self.rng.gen_range(0.0..TAU);
            let r = p.disk_radius * self.rng.gen::<f32>().sqrt();
            let jitter = self.rng.gen::<f32>() * p.vertical_jitter;
            points.push(origin + Vec3::new(r * angle.cos(), jitter, r * angle.sin()));

            let h = p.horizontal_speed;
            let rise = if p.rise_speed_max > p.rise_speed_min {
                self.rng.gen_range(p.rise_speed_min..=p.rise_speed_max)
            } else {
                p.rise_speed_min
            };
            velocities.push(Vec3::new(
                self.rng.gen_range(-h..=h),
                rise,
                self.rng.gen_range(-h..=h),
            ));
        }

        let id = BurstId(self.next_id);
        self.next_id += 1;
        self.bursts.push(Burst {
            id,
            points,
            velocities,
            remaining_lifetime: p.lifetime,
            initial_lifetime: p.lifetime,
            decay: p.decay_per_frame,
            age_frames: 0,
            lifetime_frames: lifetime_frames(p.lifetime, p.decay_per_frame),
        });
        Some(id)
    }
}
