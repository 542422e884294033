//! Simulation root: owns input state and every component, builds the scene
//! through the renderer, and runs the per-frame cascade
//! camera → fish → bursts → water → render.

use crate::agent::{agent_seed, BoundedAgent};
use crate::camera::OrbitCameraController;
use crate::clock::{FrameTick, SimulationClock};
use crate::config::DioramaConfig;
use crate::constants::*;
use crate::input::{InputState, PointerSample};
use crate::mesh::{self, MeshData};
use crate::particles::{BurstId, ParticleSystem};
use crate::scene::*;
use crate::terrain;
use crate::water::{WaterMode, WaterParams, WaterSimulator, WaveEquationKernel};
use fnv::FnvHashMap;
use glam::Vec3;

pub struct Fish {
    pub motion: BoundedAgent,
    pub handle: Option<RenderHandle>,
}

pub struct WaterLayer {
    pub sim: WaterSimulator,
    pub mesh: MeshData,
    pub level: f32,
    pub handle: Option<RenderHandle>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingAsset {
    SkyboxFace(usize),
    FishModel,
}

pub struct Diorama {
    pub input: InputState,
    clock: SimulationClock,
    camera: OrbitCameraController,
    fish: Vec<Fish>,
    particles: ParticleSystem,
    burst_handles: FnvHashMap<BurstId, RenderHandle>,
    water: Option<WaterLayer>,
    bubble: Option<RenderHandle>,
    terrain: Option<RenderHandle>,
    skybox: Vec<RenderHandle>,
    skybox_size: f32,
    pending: FnvHashMap<AssetId, PendingAsset>,
    next_asset_id: u32,
}

/// Build the CPU water strategy named by `params.mode`. The GPU kernel lives
/// in the renderer crate, so `Gpu` degrades to static here.
pub fn cpu_water(params: &WaterParams) -> WaterSimulator {
    match params.mode {
        WaterMode::Static => WaterSimulator::new_static(params),
        WaterMode::Drift => WaterSimulator::new_drift(params),
        WaterMode::Wave => WaterSimulator::with_kernel(
            params,
            Box::new(WaveEquationKernel::new(params.wave_speed_sq, params.damping)),
        ),
        WaterMode::Gpu => {
            log::warn!("[water] no GPU kernel supplied; using static surface");
            WaterSimulator::new_static(params)
        }
    }
}

fn create_attached(
    renderer: &mut dyn SceneRenderer,
    what: &str,
    geometry: GeometryDescriptor,
    material: MaterialDescriptor,
) -> Option<RenderHandle> {
    match renderer.create_renderable(geometry, material) {
        Ok(h) => {
            renderer.attach(h);
            Some(h)
        }
        Err(e) => {
            log::warn!("[scene] {what} omitted: {e}");
            None
        }
    }
}

impl Diorama {
    /// Build the scene with the CPU water strategy from `config.water`.
    pub fn new(
        config: DioramaConfig,
        renderer: &mut dyn SceneRenderer,
        assets: &mut dyn AssetSource,
    ) -> Self {
        let water = config.water.as_ref().map(cpu_water);
        Self::with_water(config, water, renderer, assets)
    }

    /// Build the scene with a caller-provided water simulator (`None`: no water).
    pub fn with_water(
        config: DioramaConfig,
        water_sim: Option<WaterSimulator>,
        renderer: &mut dyn SceneRenderer,
        assets: &mut dyn AssetSource,
    ) -> Self {
        let camera = OrbitCameraController::new(config.camera_start, config.camera.clone());

        let bubble = create_attached(
            renderer,
            "bubble",
            GeometryDescriptor::Mesh(mesh::sphere(BUBBLE_RADIUS, 32, 32)),
            MaterialDescriptor::unlit(BUBBLE_COLOR).with_opacity(BUBBLE_OPACITY),
        );

        let terrain = create_attached(
            renderer,
            "terrain",
            GeometryDescriptor::Mesh(terrain::generate(&config.terrain)),
            MaterialDescriptor::lit(SAND_COLOR).with_side(Side::Double),
        );

        let body = mesh::fish_body(FISH_BODY_LENGTH);
        let fish: Vec<Fish> = (0..config.fish_count)
            .map(|i| {
                let motion = BoundedAgent::spawn(config.fish.clone(), agent_seed(config.seed, i));
                let handle = create_attached(
                    renderer,
                    "fish",
                    GeometryDescriptor::Mesh(body.clone()),
                    MaterialDescriptor::lit(FISH_COLOR).with_side(Side::Double),
                );
                let f = Fish { motion, handle };
                sync_fish(renderer, &f);
                f
            })
            .collect();
        log::info!("[scene] {} fish", fish.len());

        let water = match (config.water.as_ref(), water_sim) {
            (Some(params), Some(mut sim)) => {
                let mut mesh = mesh::plane(params.extent, params.mesh_segments);
                sim.displace(&mut mesh, params.level);
                let handle = create_attached(
                    renderer,
                    "water",
                    GeometryDescriptor::Mesh(mesh.clone()),
                    MaterialDescriptor::lit(WATER_COLOR)
                        .with_opacity(WATER_OPACITY)
                        .with_side(Side::Double),
                );
                log::info!(
                    "[water] {:?} surface, {}x{} field",
                    sim.mode(),
                    sim.field().width,
                    sim.field().height
                );
                Some(WaterLayer {
                    sim,
                    mesh,
                    level: params.level,
                    handle,
                })
            }
            _ => None,
        };

        let particles = ParticleSystem::new(config.particles.clone(), agent_seed(config.seed, usize::MAX));

        let mut diorama = Self {
            input: InputState::default(),
            clock: SimulationClock::default(),
            camera,
            fish,
            particles,
            burst_handles: FnvHashMap::default(),
            water,
            bubble,
            terrain,
            skybox: Vec::new(),
            skybox_size: config.skybox_size,
            pending: FnvHashMap::default(),
            next_asset_id: 0,
        };

        if let Some(faces) = &config.skybox_faces {
            for (i, path) in faces.iter().enumerate() {
                diorama.request(assets, AssetKind::Texture, path, PendingAsset::SkyboxFace(i));
            }
        }
        if let Some(model) = &config.fish_model {
            diorama.request(assets, AssetKind::Model, model, PendingAsset::FishModel);
        }
        diorama
    }

    fn request(
        &mut self,
        assets: &mut dyn AssetSource,
        kind: AssetKind,
        path: &str,
        what: PendingAsset,
    ) {
        let id = AssetId(self.next_asset_id);
        self.next_asset_id += 1;
        self.pending.insert(id, what);
        assets.request(id, kind, path);
    }

    /// Forward a key transition. Returns `false` for keys the camera ignores.
    pub fn handle_key(&mut self, code: &str, is_pressed: bool) -> bool {
        self.input.movement.handle_key(code, is_pressed)
    }

    /// Project a pointer sample onto the habitat equator and record button state.
    pub fn handle_pointer(&mut self, sample: PointerSample) {
        let (ro, rd) = self.camera.camera().screen_ray(
            sample.x,
            sample.y,
            sample.viewport_width,
            sample.viewport_height,
        );
        self.input.pointer.set_from_ray(ro, rd, POINTER_PLANE_Y);
        if let Some(down) = sample.is_down {
            self.input.pointer.is_down = down;
        }
    }

    /// Run one frame and draw it.
    pub fn tick(
        &mut self,
        dt_sec: f32,
        renderer: &mut dyn SceneRenderer,
        assets: &mut dyn AssetSource,
    ) -> FrameTick {
        let tick = self.clock.advance(dt_sec);
        let dt = tick.dt_sec;

        for event in assets.poll() {
            self.on_asset(renderer, event);
        }

        self.camera.update(&self.input.movement, dt);

        for f in &mut self.fish {
            f.motion.update(dt);
            sync_fish(renderer, f);
        }

        self.update_bursts(renderer, dt);

        if let Some(w) = &mut self.water {
            w.sim.update(dt);
            if w.sim.is_dirty() {
                w.sim.displace(&mut w.mesh, w.level);
                if let Some(h) = w.handle {
                    renderer.update_positions(h, &w.mesh.positions, Some(&w.mesh.normals));
                }
            }
        }

        if let Err(e) = renderer.render_frame(self.camera.camera()) {
            log::error!("[frame] render error: {e}");
        }
        tick
    }

    fn update_bursts(&mut self, renderer: &mut dyn SceneRenderer, dt: f32) {
        let events = self.particles.update(&self.input.pointer, dt);

        for id in &events.expired {
            if let Some(h) = self.burst_handles.remove(id) {
                renderer.detach(h);
                renderer.release(h);
            }
        }

        for burst in self.particles.bursts() {
            match self.burst_handles.get(&burst.id) {
                Some(&h) => {
                    renderer.update_positions(h, &burst.points, None);
                    renderer.set_opacity(h, burst.opacity());
                }
                None if events.spawned.contains(&burst.id) => {
                    let geometry = GeometryDescriptor::Points(PointCloud {
                        positions: burst.points.clone(),
                    });
                    let material = MaterialDescriptor::unlit(BURST_COLOR)
                        .with_opacity(burst.opacity())
                        .with_point_size(BURST_POINT_SIZE);
                    match renderer.create_renderable(geometry, material) {
                        Ok(h) => {
                            renderer.attach(h);
                            self.burst_handles.insert(burst.id, h);
                        }
                        Err(e) => log::warn!("[bursts] burst {:?} not drawn: {e}", burst.id),
                    }
                }
                None => {}
            }
        }
    }

    fn on_asset(&mut self, renderer: &mut dyn SceneRenderer, event: AssetEvent) {
        let Some(what) = self.pending.remove(&event.id) else {
            log::warn!("[assets] unexpected completion for {:?}", event.id);
            return;
        };
        match (what, event.result) {
            (PendingAsset::SkyboxFace(face), Ok(AssetData::Texture(tex))) => {
                let texture = match renderer.create_texture(&tex) {
                    Ok(t) => t,
                    Err(e) => {
                        log::warn!("[assets] skybox face {face} omitted: {e}");
                        return;
                    }
                };
                let handle = create_attached(
                    renderer,
                    "skybox face",
                    GeometryDescriptor::Mesh(mesh::skybox_face(face, self.skybox_size)),
                    MaterialDescriptor::unlit([1.0, 1.0, 1.0])
                        .with_texture(texture)
                        .with_side(Side::Double),
                );
                self.skybox.extend(handle);
                log::info!("[assets] skybox face {face} ready ({}x{})", tex.width, tex.height);
            }
            (PendingAsset::FishModel, Ok(AssetData::Model(model))) => {
                for f in &mut self.fish {
                    let Some(h) = create_attached(
                        renderer,
                        "fish model",
                        GeometryDescriptor::Mesh(model.clone()),
                        MaterialDescriptor::lit(FISH_COLOR).with_side(Side::Double),
                    ) else {
                        continue;
                    };
                    if let Some(old) = f.handle.replace(h) {
                        renderer.detach(old);
                        renderer.release(old);
                    }
                    sync_fish(renderer, f);
                }
                log::info!("[assets] fish model ready ({} vertices)", model.vertex_count());
            }
            (what, Ok(_)) => {
                log::warn!("[assets] {what:?} received the wrong kind of asset; omitted");
            }
            (what, Err(e)) => {
                log::warn!("[assets] {what:?} omitted: {e}");
            }
        }
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn camera(&self) -> &OrbitCameraController {
        &self.camera
    }

    pub fn fish(&self) -> &[Fish] {
        &self.fish
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn water(&self) -> Option<&WaterLayer> {
        self.water.as_ref()
    }

    pub fn bubble(&self) -> Option<RenderHandle> {
        self.bubble
    }

    pub fn terrain(&self) -> Option<RenderHandle> {
        self.terrain
    }

    pub fn skybox_faces(&self) -> &[RenderHandle] {
        &self.skybox
    }

    pub fn pending_assets(&self) -> usize {
        self.pending.len()
    }

    pub fn burst_handle(&self, id: BurstId) -> Option<RenderHandle> {
        self.burst_handles.get(&id).copied()
    }
}

fn sync_fish(renderer: &mut dyn SceneRenderer, f: &Fish) {
    if let Some(h) = f.handle {
        let a = &f.motion.agent;
        renderer.set_transform(
            h,
            Transform {
                translation: a.position,
                rotation: a.orientation,
                scale: Vec3::ONE,
            },
        );
    }
}
