//! Coherent noise used by the terrain bake and the water height field.

use ::noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Deterministic gradient noise with a fixed input `scale` and output `amplitude`.
///
/// `scale` applies to the spatial axes only. The permutation table is seeded
/// once in [`NoiseField::new`]; sampling never mutates anything, so identical
/// inputs always yield identical outputs.
#[derive(Clone, Debug)]
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    pub scale: f32,
    pub amplitude: f32,
}

impl NoiseField {
    /// Single-octave Perlin noise.
    pub fn new(seed: u32, scale: f32, amplitude: f32) -> Self {
        Self::with_octaves(seed, scale, amplitude, 1)
    }

    pub fn with_octaves(seed: u32, scale: f32, amplitude: f32, octaves: usize) -> Self {
        let fbm = Fbm::<Perlin>::new(seed).set_octaves(octaves.max(1));
        Self {
            fbm,
            scale,
            amplitude,
        }
    }

    /// Sample the 2D field. Output lies in `[-amplitude, amplitude]`.
    #[inline]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let v = self
            .fbm
            .get([(x * self.scale) as f64, (y * self.scale) as f64]);
        (v as f32).clamp(-1.0, 1.0) * self.amplitude
    }

    /// Sample the 3D field. `phase` is in raw noise units and is not
    /// multiplied by `scale`.
    #[inline]
    pub fn sample3(&self, x: f32, y: f32, phase: f32) -> f32 {
        let v = self.fbm.get([
            (x * self.scale) as f64,
            (y * self.scale) as f64,
            phase as f64,
        ]);
        (v as f32).clamp(-1.0, 1.0) * self.amplitude
    }
}
