//! Fish motion: a single agent swimming inside a sphere, optionally restricted
//! to the upper hemisphere, with periodic speed/heading changes.

use crate::constants::*;
use glam::{Quat, Vec3};
use rand::prelude::*;

/// Local axis of the fish body that should point along its heading.
pub const LOCAL_FORWARD: Vec3 = Vec3::Z;

/// Used whenever a direction would otherwise be zero-length or non-finite.
pub const FALLBACK_DIRECTION: Vec3 = Vec3::Y;

#[derive(Clone, Debug)]
pub struct AgentParams {
    pub max_radius: f32,
    pub bounding_radius: f32,
    pub margin: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub change_direction_interval: u32,
    /// Restrict the agent to `y >= 0`.
    pub upper_hemisphere: bool,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            max_radius: FISH_HABITAT_RADIUS,
            bounding_radius: FISH_BOUNDING_RADIUS,
            margin: FISH_BOUNDARY_MARGIN,
            speed_min: FISH_SPEED_MIN,
            speed_max: FISH_SPEED_MAX,
            change_direction_interval: FISH_CHANGE_DIRECTION_FRAMES,
            upper_hemisphere: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Agent {
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    pub frames_since_direction_change: u32,
    pub bounding_radius: f32,
    pub orientation: Quat,
}

impl Agent {
    pub fn new(position: Vec3, direction: Vec3, speed: f32, bounding_radius: f32) -> Self {
        let direction = safe_normalize(direction);
        Self {
            position,
            direction,
            speed,
            frames_since_direction_change: 0,
            bounding_radius,
            orientation: heading_rotation(direction),
        }
    }
}

/// Reflect `d` about the unit normal `n`: `d - 2(d·n)n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * d.dot(n) * n
}

#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(FALLBACK_DIRECTION)
}

/// Rotation taking [`LOCAL_FORWARD`] onto `direction`.
#[inline]
pub fn heading_rotation(direction: Vec3) -> Quat {
    Quat::from_rotation_arc(LOCAL_FORWARD, safe_normalize(direction))
}

/// Random heading biased toward +Y.
pub fn random_heading(rng: &mut impl Rng) -> Vec3 {
    let v = Vec3::new(
        rng.gen_range(-1.0..=1.0),
        rng.gen_range(-0.25..=0.75),
        rng.gen_range(-1.0..=1.0),
    );
    safe_normalize(v)
}

/// Drives one [`Agent`] with its own deterministic RNG.
pub struct BoundedAgent {
    pub agent: Agent,
    pub params: AgentParams,
    rng: StdRng,
}

impl BoundedAgent {
    pub fn new(agent: Agent, params: AgentParams, seed: u64) -> Self {
        Self {
            agent,
            params,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Spawn an agent at a random point of the habitat with a random heading and speed.
    pub fn spawn(params: AgentParams, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let reach = (params.max_radius - params.bounding_radius - params.margin).max(0.0) * 0.8;
        let mut position = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        position = position.clamp_length_max(1.0) * reach;
        if params.upper_hemisphere {
            position.y = position.y.abs();
        }
        let direction = random_heading(&mut rng);
        let speed = draw_speed(&mut rng, &params);
        let agent = Agent::new(position, direction, speed, params.bounding_radius);
        Self { agent, params, rng }
    }

    /// Advance one frame. Speeds are distance per frame, so `_dt` is unused.
    pub fn update(&mut self, _dt: f32) {
        let p = &self.params;
        let a = &mut self.agent;

        a.frames_since_direction_change += 1;
        let change_due = p.change_direction_interval > 0
            && a.frames_since_direction_change >= p.change_direction_interval;
        if change_due {
            a.speed = draw_speed(&mut self.rng, p);
        }

        let mut candidate = a.position + a.direction * a.speed;

        if candidate.length() + a.bounding_radius > p.max_radius {
            let normal = safe_normalize(candidate);
            let limit = (p.max_radius - a.bounding_radius - p.margin).max(0.0);
            candidate = normal * limit;
            a.direction = safe_normalize(reflect(a.direction, normal));
        }

        if p.upper_hemisphere && candidate.y < 0.0 {
            candidate.y = 0.0;
            a.direction.y = a.direction.y.abs();
            a.direction = safe_normalize(a.direction);
        }

        if !candidate.is_finite() {
            log::warn!("[fish] non-finite position, resetting to origin");
            candidate = Vec3::ZERO;
        }
        a.position = candidate;

        if change_due {
            a.direction = random_heading(&mut self.rng);
            a.frames_since_direction_change = 0;
        }

        a.orientation = heading_rotation(a.direction);
    }
}

fn draw_speed(rng: &mut impl Rng, p: &AgentParams) -> f32 {
    if p.speed_max > p.speed_min {
        rng.gen_range(p.speed_min..=p.speed_max)
    } else {
        p.speed_min
    }
}

/// Derive a per-agent seed from a base seed, as with per-voice RNGs.
#[inline]
pub fn agent_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
