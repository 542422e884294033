use crate::agent::AgentParams;
use crate::camera::{CameraParams, CameraState};
use crate::constants::*;
use crate::particles::ParticleParams;
use crate::terrain::TerrainParams;
use crate::water::WaterParams;

/// Everything needed to build a [`crate::Diorama`]. Defaults reproduce the
/// reference scene; hosts override individual fields.
#[derive(Clone, Debug)]
pub struct DioramaConfig {
    pub seed: u64,
    pub camera_start: CameraState,
    pub camera: CameraParams,
    pub fish_count: usize,
    pub fish: AgentParams,
    /// Optional model replacing the procedural fish body once loaded.
    pub fish_model: Option<String>,
    pub particles: ParticleParams,
    pub terrain: TerrainParams,
    /// `None` disables the water surface.
    pub water: Option<WaterParams>,
    /// Six face images (+X, -X, +Y, -Y, +Z, -Z); `None` disables the skybox.
    pub skybox_faces: Option<[String; 6]>,
    pub skybox_size: f32,
}

impl Default for DioramaConfig {
    fn default() -> Self {
        Self {
            seed: SIM_SEED,
            camera_start: CameraState::default(),
            camera: CameraParams::default(),
            fish_count: FISH_COUNT,
            fish: AgentParams::default(),
            fish_model: None,
            particles: ParticleParams::default(),
            terrain: TerrainParams::default(),
            water: Some(WaterParams::default()),
            skybox_faces: Some(SKYBOX_FACE_PATHS.map(String::from)),
            skybox_size: SKYBOX_SIZE,
        }
    }
}

impl DioramaConfig {
    /// Prefix every asset path with `base` (e.g. `"assets/"`).
    pub fn with_asset_base(mut self, base: &str) -> Self {
        if let Some(faces) = &mut self.skybox_faces {
            for f in faces.iter_mut() {
                *f = format!("{base}{f}");
            }
        }
        if let Some(model) = &mut self.fish_model {
            *model = format!("{base}{model}");
        }
        self
    }
}
