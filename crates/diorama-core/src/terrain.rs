//! One-shot sand terrain: noise-displaced disc baked at scene construction.

use crate::constants::*;
use crate::mesh::{self, MeshData};
use crate::noise_field::NoiseField;

#[derive(Clone, Debug)]
pub struct TerrainParams {
    pub radius: f32,
    pub rings: u32,
    pub segments: u32,
    pub noise_scale: f32,
    pub amplitude: f32,
    pub seed: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            radius: TERRAIN_RADIUS,
            rings: TERRAIN_RINGS,
            segments: TERRAIN_SEGMENTS,
            noise_scale: TERRAIN_NOISE_SCALE,
            amplitude: TERRAIN_AMPLITUDE,
            seed: TERRAIN_SEED,
        }
    }
}

/// Overwrite each vertex's Y with the noise height at its XZ position and
/// recompute normals from the displaced positions.
pub fn bake(mesh: &mut MeshData, noise: &NoiseField) {
    for p in &mut mesh.positions {
        p.y = noise.sample(p.x, p.z);
    }
    mesh.recompute_normals();
}

/// Build and bake the sand disc described by `params`.
pub fn generate(params: &TerrainParams) -> MeshData {
    let noise = NoiseField::new(params.seed, params.noise_scale, params.amplitude);
    let mut mesh = mesh::disc(params.radius, params.rings, params.segments);
    bake(&mut mesh, &noise);
    log::info!(
        "[terrain] baked {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    mesh
}
