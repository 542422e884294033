// Scene-level tests: a recording renderer and a scripted asset source stand
// in for the GPU and the network.

use diorama_core::*;
use glam::Vec3;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Create(RenderHandle, &'static str),
    Attach(RenderHandle),
    Detach(RenderHandle),
    Release(RenderHandle),
    SetTransform(RenderHandle),
    UpdatePositions(RenderHandle),
    SetOpacity(RenderHandle),
    CreateTexture(TextureHandle),
    Render,
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<Call>,
    next: u32,
    materials: Vec<(RenderHandle, MaterialDescriptor)>,
}

impl RecordingRenderer {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    fn material(&self, h: RenderHandle) -> Option<&MaterialDescriptor> {
        self.materials.iter().find(|(x, _)| *x == h).map(|(_, m)| m)
    }
}

impl SceneRenderer for RecordingRenderer {
    fn create_renderable(
        &mut self,
        geometry: GeometryDescriptor,
        material: MaterialDescriptor,
    ) -> Result<RenderHandle, SimError> {
        let h = RenderHandle(self.next);
        self.next += 1;
        let kind = match geometry {
            GeometryDescriptor::Mesh(_) => "mesh",
            GeometryDescriptor::Points(_) => "points",
        };
        self.materials.push((h, material));
        self.calls.push(Call::Create(h, kind));
        Ok(h)
    }

    fn attach(&mut self, handle: RenderHandle) {
        self.calls.push(Call::Attach(handle));
    }

    fn detach(&mut self, handle: RenderHandle) {
        self.calls.push(Call::Detach(handle));
    }

    fn release(&mut self, handle: RenderHandle) {
        self.calls.push(Call::Release(handle));
    }

    fn set_transform(&mut self, handle: RenderHandle, _transform: Transform) {
        self.calls.push(Call::SetTransform(handle));
    }

    fn update_positions(&mut self, handle: RenderHandle, _positions: &[Vec3], _normals: Option<&[Vec3]>) {
        self.calls.push(Call::UpdatePositions(handle));
    }

    fn set_opacity(&mut self, handle: RenderHandle, _opacity: f32) {
        self.calls.push(Call::SetOpacity(handle));
    }

    fn create_texture(&mut self, _texture: &TextureData) -> Result<TextureHandle, SimError> {
        let t = TextureHandle(self.next);
        self.next += 1;
        self.calls.push(Call::CreateTexture(t));
        Ok(t)
    }

    fn render_frame(&mut self, _camera: &Camera) -> Result<(), SimError> {
        self.calls.push(Call::Render);
        Ok(())
    }
}

/// Answers every request on the next poll; paths listed in `fail` error out.
#[derive(Default)]
struct ScriptedAssets {
    fail: Vec<String>,
    requested: Vec<(AssetId, AssetKind, String)>,
    ready: VecDeque<AssetEvent>,
}

impl AssetSource for ScriptedAssets {
    fn request(&mut self, id: AssetId, kind: AssetKind, path: &str) {
        self.requested.push((id, kind, path.to_string()));
        let result = if self.fail.iter().any(|p| p == path) {
            Err(SimError::asset_load(path, "404"))
        } else {
            match kind {
                AssetKind::Texture => Ok(AssetData::Texture(TextureData {
                    width: 1,
                    height: 1,
                    rgba: vec![255; 4],
                })),
                AssetKind::Model => Ok(AssetData::Model(mesh::fish_body(0.2))),
            }
        };
        self.ready.push_back(AssetEvent { id, result });
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        self.ready.drain(..).collect()
    }
}

fn small_config() -> DioramaConfig {
    DioramaConfig {
        water: Some(WaterParams {
            field_size: 8,
            mesh_segments: 4,
            ..WaterParams::default()
        }),
        skybox_faces: None,
        ..DioramaConfig::default()
    }
}

#[test]
fn scene_construction_creates_static_elements() {
    let mut r = RecordingRenderer::default();
    let mut assets = NoAssets;
    let d = Diorama::new(small_config(), &mut r, &mut assets);

    let calls = r.take();
    let creates = calls.iter().filter(|c| matches!(c, Call::Create(..))).count();
    // bubble + terrain + fish + water
    assert_eq!(creates, 2 + FISH_COUNT + 1);
    assert!(d.bubble().is_some());
    assert!(d.terrain().is_some());
    assert_eq!(d.fish().len(), FISH_COUNT);
    assert!(d.water().is_some());

    let bubble = r.material(d.bubble().unwrap()).unwrap();
    assert_eq!(bubble.color, BUBBLE_COLOR);
    assert_eq!(bubble.shading, Shading::Unlit);
    assert!((bubble.opacity - 0.6).abs() < 1e-6);
    assert!(bubble.is_transparent());
}

#[test]
fn tick_runs_cascade_in_order() {
    let mut r = RecordingRenderer::default();
    let mut assets = NoAssets;
    let config = DioramaConfig {
        water: Some(WaterParams {
            mode: WaterMode::Drift,
            field_size: 8,
            mesh_segments: 4,
            ..WaterParams::default()
        }),
        skybox_faces: None,
        ..DioramaConfig::default()
    };
    let mut d = Diorama::new(config, &mut r, &mut assets);
    r.take();

    let tick = d.tick(1.0 / 60.0, &mut r, &mut assets);
    assert_eq!(tick.frame, 1);

    let calls = r.take();
    let water = d.water().and_then(|w| w.handle).unwrap();
    let first_transform = calls.iter().position(|c| matches!(c, Call::SetTransform(_))).unwrap();
    let water_update = calls
        .iter()
        .position(|c| *c == Call::UpdatePositions(water))
        .unwrap();
    assert!(first_transform < water_update);
    assert_eq!(calls.last(), Some(&Call::Render));
    let transforms = calls.iter().filter(|c| matches!(c, Call::SetTransform(_))).count();
    assert_eq!(transforms, FISH_COUNT);
}

#[test]
fn static_water_is_not_reuploaded() {
    let mut r = RecordingRenderer::default();
    let mut assets = NoAssets;
    let mut d = Diorama::new(small_config(), &mut r, &mut assets);
    r.take();
    for _ in 0..3 {
        d.tick(0.016, &mut r, &mut assets);
    }
    let water = d.water().and_then(|w| w.handle).unwrap();
    assert!(!r.take().contains(&Call::UpdatePositions(water)));
}

#[test]
fn camera_follows_held_keys() {
    let mut r = RecordingRenderer::default();
    let mut assets = NoAssets;
    let mut d = Diorama::new(small_config(), &mut r, &mut assets);
    assert!(d.handle_key("KeyD", true));
    assert!(!d.handle_key("KeyP", true));
    d.tick(0.016, &mut r, &mut assets);
    assert!((d.camera().state.theta - 0.05).abs() < 1e-6);
    d.handle_key("KeyD", false);
    d.tick(0.016, &mut r, &mut assets);
    assert!((d.camera().state.theta - 0.05).abs() < 1e-6);
}

#[test]
fn burst_lifecycle_creates_updates_and_releases() {
    let mut r = RecordingRenderer::default();
    let mut assets = NoAssets;
    let config = DioramaConfig {
        particles: ParticleParams {
            spawn_every: 1,
            lifetime: 0.02,
            decay_per_frame: 0.01,
            ..ParticleParams::default()
        },
        ..small_config()
    };
    let mut d = Diorama::new(config, &mut r, &mut assets);
    r.take();

    d.input.pointer = PointerIntent {
        is_down: true,
        world_position: Vec3::new(0.1, 0.0, 0.1),
    };
    d.tick(0.016, &mut r, &mut assets);
    d.input.pointer.is_down = false;

    let h = d.burst_handle(BurstId(0)).expect("burst drawn");
    let calls = r.take();
    assert!(calls.contains(&Call::Create(h, "points")));
    assert!(calls.contains(&Call::Attach(h)));
    assert!(r.material(h).unwrap().opacity > 0.99);

    d.tick(0.016, &mut r, &mut assets);
    let calls = r.take();
    assert!(calls.contains(&Call::UpdatePositions(h)));
    assert!(calls.contains(&Call::SetOpacity(h)));

    d.tick(0.016, &mut r, &mut assets);
    let calls = r.take();
    let detach = calls.iter().position(|c| *c == Call::Detach(h)).unwrap();
    let release = calls.iter().position(|c| *c == Call::Release(h)).unwrap();
    assert!(detach < release);
    assert_eq!(d.particles().active_count(), 0);
    assert!(d.burst_handle(BurstId(0)).is_none());
}

#[test]
fn pointer_sample_projects_onto_equator() {
    let mut r = RecordingRenderer::default();
    let mut assets = NoAssets;
    let mut d = Diorama::new(small_config(), &mut r, &mut assets);
    d.handle_pointer(PointerSample {
        x: 400.0,
        y: 300.0,
        viewport_width: 800.0,
        viewport_height: 600.0,
        is_down: Some(true),
    });
    assert!(d.input.pointer.is_down);
    assert!(d.input.pointer.world_position.length() < 1e-2);
    assert!(d.input.pointer.world_position.y.abs() < 1e-4);

    d.handle_pointer(PointerSample {
        x: 10.0,
        y: 10.0,
        viewport_width: 800.0,
        viewport_height: 600.0,
        is_down: None,
    });
    assert!(d.input.pointer.is_down);
}

#[test]
fn failed_skybox_face_is_omitted() {
    let mut r = RecordingRenderer::default();
    let mut assets = ScriptedAssets {
        fail: vec!["top.png".into()],
        ..Default::default()
    };
    let config = DioramaConfig {
        skybox_faces: Some(SKYBOX_FACE_PATHS.map(String::from)),
        ..small_config()
    };
    let mut d = Diorama::new(config, &mut r, &mut assets);
    assert_eq!(assets.requested.len(), 6);
    assert!(assets.requested.iter().all(|(_, k, _)| *k == AssetKind::Texture));
    assert_eq!(d.pending_assets(), 6);
    assert!(d.skybox_faces().is_empty());
    r.take();

    d.tick(0.016, &mut r, &mut assets);
    assert_eq!(d.pending_assets(), 0);
    assert_eq!(d.skybox_faces().len(), 5);

    let calls = r.take();
    let textures = calls.iter().filter(|c| matches!(c, Call::CreateTexture(_))).count();
    assert_eq!(textures, 5);
    for h in d.skybox_faces() {
        assert!(calls.contains(&Call::Attach(*h)));
        let m = r.material(*h).unwrap();
        assert!(m.texture.is_some());
        assert_eq!(m.shading, Shading::Unlit);
    }
}

#[test]
fn asset_base_prefixes_paths() {
    let config = DioramaConfig::default().with_asset_base("assets/");
    let faces = config.skybox_faces.unwrap();
    assert_eq!(faces[0], "assets/left.png");
    assert_eq!(faces[5], "assets/front.png");
}

#[test]
fn fish_model_replaces_procedural_bodies() {
    let mut r = RecordingRenderer::default();
    let mut assets = ScriptedAssets::default();
    let config = DioramaConfig {
        fish_count: 2,
        fish_model: Some("fish.glb".into()),
        ..small_config()
    };
    let mut d = Diorama::new(config, &mut r, &mut assets);
    let old: Vec<RenderHandle> = d.fish().iter().filter_map(|f| f.handle).collect();
    assert_eq!(old.len(), 2);
    r.take();

    d.tick(0.016, &mut r, &mut assets);
    let calls = r.take();
    for (f, o) in d.fish().iter().zip(&old) {
        let new = f.handle.unwrap();
        assert_ne!(new, *o);
        assert!(calls.contains(&Call::Release(*o)));
        assert!(calls.contains(&Call::SetTransform(new)));
    }
}

#[test]
fn disabled_water_and_skybox_are_skipped() {
    let mut r = RecordingRenderer::default();
    let mut assets = ScriptedAssets::default();
    let config = DioramaConfig {
        water: None,
        skybox_faces: None,
        ..DioramaConfig::default()
    };
    let mut d = Diorama::new(config, &mut r, &mut assets);
    assert!(d.water().is_none());
    assert!(assets.requested.is_empty());
    d.tick(0.016, &mut r, &mut assets);
    assert_eq!(d.clock().frame(), 1);
}

#[test]
fn clock_clamps_long_and_bad_frames() {
    let mut clock = SimulationClock::default();
    assert_eq!(clock.advance(5.0).dt_sec, MAX_FRAME_DT_SEC);
    assert_eq!(clock.advance(-1.0).dt_sec, 0.0);
    assert_eq!(clock.advance(f32::NAN).dt_sec, 0.0);
    assert_eq!(clock.frame(), 3);
    assert!((clock.elapsed_sec() - MAX_FRAME_DT_SEC as f64).abs() < 1e-9);
}
