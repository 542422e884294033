//! Water surface height field and the strategies that advance it.
//!
//! The default is a static field seeded from noise. Dynamic variants either
//! re-sample the noise with a moving phase or hand the field to a
//! [`HeightFieldKernel`] (CPU wave equation here, GPU compute pass in the
//! renderer crate). A kernel that fails is dropped and the surface stays
//! static from then on.

use crate::constants::*;
use crate::error::SimError;
use crate::mesh::MeshData;
use crate::noise_field::NoiseField;
use glam::Vec2;
use std::str::FromStr;

/// Row-major grid of height samples.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    pub width: usize,
    pub height: usize,
    pub samples: Vec<f32>,
}

impl HeightField {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            samples: vec![0.0; width * height],
        }
    }

    /// Fill with `noise` evaluated at each cell's UV.
    pub fn from_noise(width: usize, height: usize, noise: &NoiseField) -> Self {
        let mut field = Self::new(width, height);
        field.fill_from_noise(noise, None);
        field
    }

    /// Re-sample every cell; `phase` selects a 3D slice when present.
    pub fn fill_from_noise(&mut self, noise: &NoiseField, phase: Option<f32>) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            let v = cell_uv(y, h);
            for x in 0..w {
                let u = cell_uv(x, w);
                self.samples[y * w + x] = match phase {
                    Some(t) => noise.sample3(u, v, t),
                    None => noise.sample(u, v),
                };
            }
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.samples[y * self.width + x]
    }

    /// Bilinear sample at `uv` in `[0, 1]²` (clamped).
    pub fn sample_uv(&self, uv: Vec2) -> f32 {
        let fx = uv.x.clamp(0.0, 1.0) * (self.width - 1) as f32;
        let fy = uv.y.clamp(0.0, 1.0) * (self.height - 1) as f32;
        let x0 = fx.floor() as usize;
        let y0 = fy.floor() as usize;
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;
        let a = self.get(x0, y0) * (1.0 - tx) + self.get(x0 + 1, y0) * tx;
        let b = self.get(x0, y0 + 1) * (1.0 - tx) + self.get(x0 + 1, y0 + 1) * tx;
        a * (1.0 - ty) + b * ty
    }

    pub fn max_abs(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()))
    }
}

#[inline]
fn cell_uv(i: usize, n: usize) -> f32 {
    if n > 1 {
        i as f32 / (n - 1) as f32
    } else {
        0.0
    }
}

/// A data-parallel step over the height field. The same kernel seeds its
/// internal state from the initial field and then advances it every frame.
pub trait HeightFieldKernel {
    fn name(&self) -> &str;
    fn init(&mut self, field: &HeightField) -> Result<(), SimError>;
    fn step(&mut self, field: &mut HeightField, dt: f32) -> Result<(), SimError>;
}

/// Damped discrete wave equation with clamped (reflecting) edges:
/// `next = (2·curr − prev + c²·∇²curr) · damping`.
pub struct WaveEquationKernel {
    pub wave_speed_sq: f32,
    pub damping: f32,
    prev: Vec<f32>,
    scratch: Vec<f32>,
}

impl WaveEquationKernel {
    pub fn new(wave_speed_sq: f32, damping: f32) -> Self {
        Self {
            wave_speed_sq,
            damping,
            prev: Vec::new(),
            scratch: Vec::new(),
        }
    }
}

impl Default for WaveEquationKernel {
    fn default() -> Self {
        Self::new(WATER_WAVE_SPEED_SQ, WATER_DAMPING)
    }
}

impl HeightFieldKernel for WaveEquationKernel {
    fn name(&self) -> &str {
        "cpu-wave"
    }

    fn init(&mut self, field: &HeightField) -> Result<(), SimError> {
        if !(0.0..=0.5).contains(&self.wave_speed_sq) {
            return Err(SimError::KernelInit {
                kernel: self.name().to_string(),
                reason: format!("c^2 = {} is outside the stable range [0, 0.5]", self.wave_speed_sq),
            });
        }
        self.prev = field.samples.clone();
        self.scratch = vec![0.0; field.samples.len()];
        Ok(())
    }

    fn step(&mut self, field: &mut HeightField, _dt: f32) -> Result<(), SimError> {
        if self.prev.len() != field.samples.len() {
            return Err(SimError::KernelStep {
                kernel: self.name().to_string(),
                reason: "field size changed since init".into(),
            });
        }
        let (w, h) = (field.width, field.height);
        let curr = &field.samples;
        let at = |x: isize, y: isize| -> f32 {
            let cx = x.clamp(0, w as isize - 1) as usize;
            let cy = y.clamp(0, h as isize - 1) as usize;
            curr[cy * w + cx]
        };
        for y in 0..h {
            for x in 0..w {
                let (xi, yi) = (x as isize, y as isize);
                let c = curr[y * w + x];
                let lap = at(xi - 1, yi) + at(xi + 1, yi) + at(xi, yi - 1) + at(xi, yi + 1) - 4.0 * c;
                self.scratch[y * w + x] =
                    (2.0 * c - self.prev[y * w + x] + self.wave_speed_sq * lap) * self.damping;
            }
        }
        // prev <- curr, curr <- next
        std::mem::swap(&mut self.prev, &mut field.samples);
        std::mem::swap(&mut field.samples, &mut self.scratch);
        Ok(())
    }
}

/// Which water strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaterMode {
    #[default]
    Static,
    Drift,
    Wave,
    Gpu,
}

impl FromStr for WaterMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "" => Ok(Self::Static),
            "drift" | "noise" => Ok(Self::Drift),
            "wave" | "cpu" => Ok(Self::Wave),
            "gpu" | "compute" => Ok(Self::Gpu),
            other => Err(SimError::UnknownWaterMode(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WaterParams {
    pub mode: WaterMode,
    pub field_size: usize,
    pub mesh_segments: u32,
    pub extent: f32,
    pub level: f32,
    pub wave_height: f32,
    pub noise_scale: f32,
    pub drift_speed: f32,
    pub wave_speed_sq: f32,
    pub damping: f32,
    pub seed: u32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            mode: WaterMode::Static,
            field_size: WATER_FIELD_SIZE,
            mesh_segments: WATER_MESH_SEGMENTS,
            extent: WATER_EXTENT,
            level: WATER_LEVEL,
            wave_height: WATER_WAVE_HEIGHT,
            noise_scale: WATER_NOISE_SCALE,
            drift_speed: WATER_DRIFT_SPEED,
            wave_speed_sq: WATER_WAVE_SPEED_SQ,
            damping: WATER_DAMPING,
            seed: WATER_SEED,
        }
    }
}

enum Strategy {
    Static,
    Drift { elapsed: f32 },
    /// `mode` is `Wave` or `Gpu`, as requested by the caller.
    Kernel {
        kernel: Box<dyn HeightFieldKernel>,
        mode: WaterMode,
    },
}

pub struct WaterSimulator {
    field: HeightField,
    noise: NoiseField,
    strategy: Strategy,
    drift_speed: f32,
    wave_height: f32,
    dirty: bool,
}

impl WaterSimulator {
    /// Static surface: seeded once, never changes.
    pub fn new_static(params: &WaterParams) -> Self {
        let noise = NoiseField::with_octaves(params.seed, params.noise_scale, 1.0, 3);
        let field = HeightField::from_noise(params.field_size, params.field_size, &noise);
        Self {
            field,
            noise,
            strategy: Strategy::Static,
            drift_speed: params.drift_speed,
            wave_height: params.wave_height,
            dirty: true,
        }
    }

    /// Surface re-sampled from noise with a phase advancing at `drift_speed` per second.
    pub fn new_drift(params: &WaterParams) -> Self {
        let mut sim = Self::new_static(params);
        sim.strategy = Strategy::Drift { elapsed: 0.0 };
        sim
    }

    /// Surface advanced by `kernel`. Falls back to static if the kernel
    /// cannot initialize.
    pub fn with_kernel(params: &WaterParams, mut kernel: Box<dyn HeightFieldKernel>) -> Self {
        let mut sim = Self::new_static(params);
        match kernel.init(&sim.field) {
            Ok(()) => {
                log::info!("[water] using kernel `{}`", kernel.name());
                let mode = match params.mode {
                    WaterMode::Gpu => WaterMode::Gpu,
                    _ => WaterMode::Wave,
                };
                sim.strategy = Strategy::Kernel { kernel, mode };
            }
            Err(e) => {
                log::error!("[water] {e}; falling back to static surface");
            }
        }
        sim
    }

    /// Build the simulator for a kernel that may have failed to construct.
    pub fn with_kernel_result(
        params: &WaterParams,
        kernel: Result<Box<dyn HeightFieldKernel>, SimError>,
    ) -> Self {
        match kernel {
            Ok(k) => Self::with_kernel(params, k),
            Err(e) => {
                log::error!("[water] {e}; falling back to static surface");
                Self::new_static(params)
            }
        }
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn mode(&self) -> WaterMode {
        match &self.strategy {
            Strategy::Static => WaterMode::Static,
            Strategy::Drift { .. } => WaterMode::Drift,
            Strategy::Kernel { mode, .. } => *mode,
        }
    }

    pub fn kernel_name(&self) -> Option<&str> {
        match &self.strategy {
            Strategy::Kernel { kernel, .. } => Some(kernel.name()),
            _ => None,
        }
    }

    pub fn is_static(&self) -> bool {
        matches!(self.strategy, Strategy::Static)
    }

    /// True when the field changed since the last [`Self::displace`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn update(&mut self, dt: f32) {
        match &mut self.strategy {
            Strategy::Static => {}
            Strategy::Drift { elapsed } => {
                *elapsed += dt;
                let phase = *elapsed * self.drift_speed;
                self.field.fill_from_noise(&self.noise, Some(phase));
                self.dirty = true;
            }
            Strategy::Kernel { kernel, .. } => match kernel.step(&mut self.field, dt) {
                Ok(()) => self.dirty = true,
                Err(e) => {
                    log::error!("[water] {e}; surface frozen as static");
                    self.strategy = Strategy::Static;
                }
            },
        }
    }

    /// Write `level + field(uv) * wave_height` into each vertex's Y.
    pub fn displace(&mut self, mesh: &mut MeshData, level: f32) {
        for (p, uv) in mesh.positions.iter_mut().zip(&mesh.uvs) {
            p.y = level + self.field.sample_uv(*uv) * self.wave_height;
        }
        mesh.recompute_normals();
        self.dirty = false;
    }
}
