//! wgpu implementation of [`SceneRenderer`]: one uniform buffer and bind group
//! per renderable, opaque objects first, then transparent ones back to front.

use crate::helpers::{self, MeshVertex};
use diorama_core::{
    Camera, GeometryDescriptor, MaterialDescriptor, MeshData, RenderHandle, SceneRenderer, Shading,
    SimError, TextureData, TextureHandle, Transform,
};
use fnv::FnvHashMap;
use glam::Vec3;
use std::sync::Arc;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_dir: [f32; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PointInstance {
    center: [f32; 4],
}

enum Geometry {
    Mesh {
        vertex_buffer: wgpu::Buffer,
        index_buffer: wgpu::Buffer,
        index_count: u32,
        // kept so position updates can re-interleave vertices
        normals: Vec<Vec3>,
        uvs: Vec<[f32; 2]>,
    },
    Points {
        instance_buffer: wgpu::Buffer,
        count: u32,
        capacity: usize,
    },
}

struct Renderable {
    geometry: Geometry,
    material: MaterialDescriptor,
    transform: Transform,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    attached: bool,
}

impl Renderable {
    fn uniforms(&self) -> ObjectUniforms {
        let m = &self.material;
        ObjectUniforms {
            model: self.transform.matrix().to_cols_array_2d(),
            color: [m.color[0], m.color[1], m.color[2], m.opacity],
            params: [
                if m.shading == Shading::Lit { 1.0 } else { 0.0 },
                m.point_size,
                0.0,
                0.0,
            ],
        }
    }
}

pub struct WgpuRenderer<'w> {
    surface: wgpu::Surface<'w>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,

    // indexed by side * 2 + transparent
    mesh_pipelines: Vec<wgpu::RenderPipeline>,
    points_pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,

    objects: FnvHashMap<u32, Renderable>,
    textures: FnvHashMap<u32, wgpu::TextureView>,
    next_id: u32,
    clear_color: wgpu::Color,
}

impl<'w> WgpuRenderer<'w> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;
        log::info!("[gpu] adapter: {:?}", adapter.get_info().name);

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = helpers::create_depth_texture(&device, width, height);

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let white_view = helpers::upload_rgba(
            &device,
            &queue,
            "white_tex",
            &TextureData {
                width: 1,
                height: 1,
                rgba: vec![255; 4],
            },
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&globals_bgl, &object_bgl],
            push_constant_ranges: &[],
        });
        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::SCENE_WGSL.into()),
        });
        let mut mesh_pipelines = Vec::with_capacity(6);
        for side in [
            diorama_core::Side::Front,
            diorama_core::Side::Back,
            diorama_core::Side::Double,
        ] {
            for transparent in [false, true] {
                mesh_pipelines.push(helpers::make_scene_pipeline(
                    &device,
                    "mesh_pipeline",
                    &pipeline_layout,
                    &scene_shader,
                    &[MeshVertex::LAYOUT],
                    format,
                    helpers::cull_mode(side),
                    transparent,
                ));
            }
        }

        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::POINTS_WGSL.into()),
        });
        let point_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: one centre per particle
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<PointInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 1,
                }],
            },
        ];
        let points_pipeline = helpers::make_scene_pipeline(
            &device,
            "points_pipeline",
            &pipeline_layout,
            &points_shader,
            &point_buffers,
            format,
            None,
            true,
        );
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            depth_view,
            globals_buffer,
            globals_bind_group,
            object_bgl,
            sampler,
            white_view,
            mesh_pipelines,
            points_pipeline,
            quad_vb,
            objects: FnvHashMap::default(),
            textures: FnvHashMap::default(),
            next_id: 0,
            clear_color: wgpu::Color {
                r: 0.01,
                g: 0.06,
                b: 0.12,
                a: 1.0,
            },
        })
    }

    pub fn device(&self) -> Arc<wgpu::Device> {
        Arc::clone(&self.device)
    }

    pub fn queue(&self) -> Arc<wgpu::Queue> {
        Arc::clone(&self.queue)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = helpers::create_depth_texture(&self.device, width, height);
    }

    pub fn attached_count(&self) -> usize {
        self.objects.values().filter(|o| o.attached).count()
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn object_bind_group(
        &self,
        uniform_buffer: &wgpu::Buffer,
        texture: Option<TextureHandle>,
    ) -> wgpu::BindGroup {
        let view = texture
            .and_then(|t| {
                let v = self.textures.get(&t.0);
                if v.is_none() {
                    log::warn!("[gpu] unknown texture {t:?}; using white");
                }
                v
            })
            .unwrap_or(&self.white_view);
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bg"),
            layout: &self.object_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    fn mesh_geometry(&self, mesh: MeshData) -> Result<Geometry, SimError> {
        if mesh.positions.is_empty() || mesh.indices.is_empty() {
            return Err(SimError::Renderer("empty mesh".into()));
        }
        let n = mesh.positions.len();
        if let Some(bad) = mesh.indices.iter().find(|&&i| i as usize >= n) {
            return Err(SimError::Renderer(format!(
                "index {bad} out of range for {n} vertices"
            )));
        }
        let mut normals = mesh.normals;
        if normals.len() != n {
            normals = vec![Vec3::Y; n];
        }
        let mut uvs: Vec<[f32; 2]> = mesh.uvs.iter().map(|uv| uv.to_array()).collect();
        uvs.resize(n, [0.0, 0.0]);
        let vertices = interleave(&mesh.positions, &normals, &uvs);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vb"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_ib"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Ok(Geometry::Mesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            normals,
            uvs,
        })
    }

    fn points_geometry(&self, positions: &[Vec3]) -> Geometry {
        let capacity = positions.len().max(1);
        let instance_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("points_instances"),
            size: (std::mem::size_of::<PointInstance>() * capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let instances = point_instances(positions);
        self.queue
            .write_buffer(&instance_buffer, 0, bytemuck::cast_slice(&instances));
        Geometry::Points {
            instance_buffer,
            count: positions.len() as u32,
            capacity,
        }
    }

    fn pipeline_for(&self, obj: &Renderable) -> &wgpu::RenderPipeline {
        match obj.geometry {
            Geometry::Points { .. } => &self.points_pipeline,
            Geometry::Mesh { .. } => {
                let idx = helpers::side_index(obj.material.side) * 2
                    + obj.material.is_transparent() as usize;
                &self.mesh_pipelines[idx]
            }
        }
    }

    /// Attached objects in draw order: opaque first, then transparent sorted
    /// far to near from `eye`.
    fn draw_order(&self, eye: Vec3) -> Vec<u32> {
        let mut opaque = Vec::new();
        let mut transparent = Vec::new();
        for (&id, obj) in &self.objects {
            if !obj.attached {
                continue;
            }
            let is_points = matches!(obj.geometry, Geometry::Points { .. });
            if obj.material.is_transparent() || is_points {
                let d = obj.transform.translation.distance_squared(eye);
                transparent.push((id, d));
            } else {
                opaque.push(id);
            }
        }
        opaque.sort_unstable();
        transparent.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        opaque.extend(transparent.into_iter().map(|(id, _)| id));
        opaque
    }
}

fn interleave(positions: &[Vec3], normals: &[Vec3], uvs: &[[f32; 2]]) -> Vec<MeshVertex> {
    positions
        .iter()
        .zip(normals)
        .zip(uvs)
        .map(|((p, n), uv)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
            uv: *uv,
        })
        .collect()
}

fn point_instances(positions: &[Vec3]) -> Vec<PointInstance> {
    positions
        .iter()
        .map(|p| PointInstance {
            center: [p.x, p.y, p.z, 1.0],
        })
        .collect()
}

impl<'w> SceneRenderer for WgpuRenderer<'w> {
    fn create_renderable(
        &mut self,
        geometry: GeometryDescriptor,
        material: MaterialDescriptor,
    ) -> Result<RenderHandle, SimError> {
        let geometry = match geometry {
            GeometryDescriptor::Mesh(mesh) => self.mesh_geometry(mesh)?,
            GeometryDescriptor::Points(cloud) => self.points_geometry(&cloud.positions),
        };
        let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_uniforms"),
            size: std::mem::size_of::<ObjectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.object_bind_group(&uniform_buffer, material.texture);
        let id = self.alloc_id();
        self.objects.insert(
            id,
            Renderable {
                geometry,
                material,
                transform: Transform::default(),
                uniform_buffer,
                bind_group,
                attached: false,
            },
        );
        Ok(RenderHandle(id))
    }

    fn attach(&mut self, handle: RenderHandle) {
        match self.objects.get_mut(&handle.0) {
            Some(obj) => obj.attached = true,
            None => log::warn!("[gpu] attach on unknown {handle:?}"),
        }
    }

    fn detach(&mut self, handle: RenderHandle) {
        if let Some(obj) = self.objects.get_mut(&handle.0) {
            obj.attached = false;
        }
    }

    fn release(&mut self, handle: RenderHandle) {
        if let Some(obj) = self.objects.remove(&handle.0) {
            match obj.geometry {
                Geometry::Mesh {
                    vertex_buffer,
                    index_buffer,
                    ..
                } => {
                    vertex_buffer.destroy();
                    index_buffer.destroy();
                }
                Geometry::Points {
                    instance_buffer, ..
                } => instance_buffer.destroy(),
            }
            obj.uniform_buffer.destroy();
        }
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: Transform) {
        if let Some(obj) = self.objects.get_mut(&handle.0) {
            obj.transform = transform;
        }
    }

    fn update_positions(&mut self, handle: RenderHandle, positions: &[Vec3], normals: Option<&[Vec3]>) {
        let Some(obj) = self.objects.get_mut(&handle.0) else {
            return;
        };
        match &mut obj.geometry {
            Geometry::Mesh {
                vertex_buffer,
                normals: kept,
                uvs,
                ..
            } => {
                if positions.len() != uvs.len() {
                    log::warn!(
                        "[gpu] {handle:?}: {} positions for {} vertices; update ignored",
                        positions.len(),
                        uvs.len()
                    );
                    return;
                }
                if let Some(n) = normals.filter(|n| n.len() == positions.len()) {
                    kept.clear();
                    kept.extend_from_slice(n);
                }
                let vertices = interleave(positions, kept, uvs);
                self.queue
                    .write_buffer(vertex_buffer, 0, bytemuck::cast_slice(&vertices));
            }
            Geometry::Points {
                instance_buffer,
                count,
                capacity,
            } => {
                if positions.len() > *capacity {
                    *capacity = positions.len();
                    *instance_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some("points_instances"),
                        size: (std::mem::size_of::<PointInstance>() * *capacity) as u64,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    });
                }
                let instances = point_instances(positions);
                self.queue
                    .write_buffer(instance_buffer, 0, bytemuck::cast_slice(&instances));
                *count = positions.len() as u32;
            }
        }
    }

    fn set_opacity(&mut self, handle: RenderHandle, opacity: f32) {
        if let Some(obj) = self.objects.get_mut(&handle.0) {
            obj.material.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    fn create_texture(&mut self, texture: &TextureData) -> Result<TextureHandle, SimError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if texture.width == 0 || texture.height == 0 || texture.width > max || texture.height > max {
            return Err(SimError::Renderer(format!(
                "texture size {}x{} unsupported (max {max})",
                texture.width, texture.height
            )));
        }
        let expected = texture.width as usize * texture.height as usize * 4;
        if texture.rgba.len() != expected {
            return Err(SimError::Renderer(format!(
                "texture data is {} bytes, expected {expected}",
                texture.rgba.len()
            )));
        }
        let view = helpers::upload_rgba(&self.device, &self.queue, "scene_tex", texture);
        let id = self.alloc_id();
        self.textures.insert(id, view);
        Ok(TextureHandle(id))
    }

    fn render_frame(&mut self, camera: &Camera) -> Result<(), SimError> {
        let frame = match self.surface.get_current_texture() {
            Ok(f) => f,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("[gpu] surface timeout; frame skipped");
                return Ok(());
            }
            Err(e) => return Err(SimError::Renderer(e.to_string())),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = self.config.width as f32 / self.config.height.max(1) as f32;
        let view_m = camera.view_matrix();
        let inv_view = view_m.inverse();
        let right = inv_view.x_axis.truncate();
        let up = inv_view.y_axis.truncate();
        let globals = Globals {
            view_proj: (camera.projection_matrix(aspect) * view_m).to_cols_array_2d(),
            eye: camera.eye.extend(1.0).to_array(),
            light_dir: Vec3::new(-0.4, -1.0, -0.3).normalize().extend(0.0).to_array(),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let order = self.draw_order(camera.eye);
        for id in &order {
            if let Some(obj) = self.objects.get(id) {
                self.queue
                    .write_buffer(&obj.uniform_buffer, 0, bytemuck::bytes_of(&obj.uniforms()));
            }
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            for id in &order {
                let Some(obj) = self.objects.get(id) else {
                    continue;
                };
                rpass.set_pipeline(self.pipeline_for(obj));
                rpass.set_bind_group(1, &obj.bind_group, &[]);
                match &obj.geometry {
                    Geometry::Mesh {
                        vertex_buffer,
                        index_buffer,
                        index_count,
                        ..
                    } => {
                        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
                        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                        rpass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                    Geometry::Points {
                        instance_buffer,
                        count,
                        ..
                    } => {
                        if *count == 0 {
                            continue;
                        }
                        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
                        rpass.set_vertex_buffer(1, instance_buffer.slice(..));
                        rpass.draw(0..6, 0..*count);
                    }
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

