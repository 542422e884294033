use std::f32::consts::PI;

// Shared scene and simulation tuning constants used by both web and native frontends.

// Bubble shell
pub const BUBBLE_RADIUS: f32 = 1.0;
pub const BUBBLE_COLOR: [f32; 3] = [0.529, 0.808, 0.922]; // 0x87ceeb
pub const BUBBLE_OPACITY: f32 = 0.6;

// Orbit camera
pub const CAMERA_INITIAL_RADIUS: f32 = 5.0;
pub const CAMERA_INITIAL_THETA: f32 = 0.0;
pub const CAMERA_INITIAL_PHI: f32 = PI / 4.0;
pub const CAMERA_MOVE_SPEED: f32 = 0.05; // radians per frame
pub const CAMERA_ZOOM_SPEED: f32 = 0.1; // world units per frame
pub const CAMERA_MIN_RADIUS: f32 = 2.0; // keeps the eye outside the bubble
pub const CAMERA_PHI_EPSILON: f32 = 0.1; // distance kept from the poles
pub const CAMERA_FOVY_DEGREES: f32 = 75.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Fish habitat (upper half of the bubble)
pub const FISH_COUNT: usize = 5;
pub const FISH_HABITAT_RADIUS: f32 = 0.9;
pub const FISH_BOUNDING_RADIUS: f32 = 0.05;
pub const FISH_BOUNDARY_MARGIN: f32 = 0.01;
pub const FISH_SPEED_MIN: f32 = 0.002; // distance per frame
pub const FISH_SPEED_MAX: f32 = 0.006;
pub const FISH_CHANGE_DIRECTION_FRAMES: u32 = 300;
pub const FISH_BODY_LENGTH: f32 = 0.1;
pub const FISH_COLOR: [f32; 3] = [1.0, 0.55, 0.1];

// Bubble bursts
pub const PARTICLES_PER_BURST: usize = 50;
pub const BURST_SPAWN_EVERY_FRAMES: u32 = 5;
pub const BURST_DISK_RADIUS: f32 = 0.05;
pub const BURST_VERTICAL_JITTER: f32 = 0.02;
pub const BURST_HORIZONTAL_SPEED: f32 = 0.004; // max |vx|, |vz| per frame
pub const BURST_RISE_SPEED_MIN: f32 = 0.002;
pub const BURST_RISE_SPEED_MAX: f32 = 0.01;
pub const BURST_LIFETIME: f32 = 1.0;
pub const BURST_DECAY_PER_FRAME: f32 = 0.01;
pub const BURST_MAX_ACTIVE: usize = 128;
pub const BURST_POINT_SIZE: f32 = 0.02;
pub const BURST_COLOR: [f32; 3] = [0.85, 0.95, 1.0];

// Pointer picking plane: the habitat equator
pub const POINTER_PLANE_Y: f32 = 0.0;

// Sand terrain
pub const TERRAIN_RADIUS: f32 = BUBBLE_RADIUS;
pub const TERRAIN_RINGS: u32 = 32;
pub const TERRAIN_SEGMENTS: u32 = 64;
pub const TERRAIN_NOISE_SCALE: f32 = 3.0;
pub const TERRAIN_AMPLITUDE: f32 = 0.05;
pub const TERRAIN_SEED: u32 = 7;
pub const SAND_COLOR: [f32; 3] = [0.76, 0.70, 0.50];

// Water surface
pub const WATER_FIELD_SIZE: usize = 256;
pub const WATER_MESH_SEGMENTS: u32 = 128;
pub const WATER_EXTENT: f32 = 40.0;
pub const WATER_LEVEL: f32 = 6.0;
pub const WATER_WAVE_HEIGHT: f32 = 0.3;
pub const WATER_NOISE_SCALE: f32 = 8.0; // in field UV units
pub const WATER_DRIFT_SPEED: f32 = 0.15; // noise phase per second
pub const WATER_WAVE_SPEED_SQ: f32 = 0.2; // c^2 of the discrete wave equation, < 0.5 for stability
pub const WATER_DAMPING: f32 = 0.995;
pub const WATER_SEED: u32 = 11;
pub const WATER_COLOR: [f32; 3] = [0.1, 0.35, 0.6];
pub const WATER_OPACITY: f32 = 0.75;

// Skybox
pub const SKYBOX_SIZE: f32 = 50.0;
// Face order: +X, -X, +Y, -Y, +Z, -Z
pub const SKYBOX_FACE_PATHS: [&str; 6] = [
    "left.png",
    "right.png",
    "top.png",
    "bottom.png",
    "back.png",
    "front.png",
];

// Frame clock
pub const MAX_FRAME_DT_SEC: f32 = 0.1; // clamp after stalls (tab switch, debugger)

// Base seed for all simulation RNGs
pub const SIM_SEED: u64 = 42;
