//! Height-field wave step as a compute pass with a blocking readback.
//!
//! Three storage buffers rotate through the prev/curr/next roles, so each step
//! is one dispatch plus one copy into a mappable staging buffer.

use diorama_core::{HeightField, HeightFieldKernel, SimError};
use std::sync::{mpsc, Arc};

const WORKGROUP: u32 = 8;
const NAME: &str = "gpu-wave";

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct StepParams {
    width: u32,
    height: u32,
    c2: f32,
    damping: f32,
}

struct Resources {
    width: u32,
    height: u32,
    buffers: [wgpu::Buffer; 3],
    // bind_groups[r] reads buffers[r], buffers[r + 1] and writes buffers[r + 2] (mod 3)
    bind_groups: [wgpu::BindGroup; 3],
    staging: wgpu::Buffer,
    rotation: usize,
}

pub struct GpuWaveKernel {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pub wave_speed_sq: f32,
    pub damping: f32,
    pipeline: Option<(wgpu::ComputePipeline, wgpu::BindGroupLayout, wgpu::Buffer)>,
    resources: Option<Resources>,
}

fn init_err(reason: impl ToString) -> SimError {
    SimError::KernelInit {
        kernel: NAME.to_string(),
        reason: reason.to_string(),
    }
}

fn step_err(reason: impl ToString) -> SimError {
    SimError::KernelStep {
        kernel: NAME.to_string(),
        reason: reason.to_string(),
    }
}

impl GpuWaveKernel {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        wave_speed_sq: f32,
        damping: f32,
    ) -> Self {
        Self {
            device,
            queue,
            wave_speed_sq,
            damping,
            pipeline: None,
            resources: None,
        }
    }

    fn build_pipeline(&self) -> Result<(wgpu::ComputePipeline, wgpu::BindGroupLayout, wgpu::Buffer), SimError> {
        let device = &self.device;
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("water_step_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::WATER_STEP_WGSL.into()),
        });
        let storage = |binding: u32, read_only: bool| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water_step_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                storage(1, true),
                storage(2, true),
                storage(3, false),
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("water_step_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("water_step_pipeline"),
            layout: Some(&layout),
            module: &shader,
            entry_point: Some("cs_step"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });
        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("water_step_params"),
            size: std::mem::size_of::<StepParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(init_err(e));
        }
        Ok((pipeline, bgl, params))
    }
}

impl HeightFieldKernel for GpuWaveKernel {
    fn name(&self) -> &str {
        NAME
    }

    fn init(&mut self, field: &HeightField) -> Result<(), SimError> {
        if !(0.0..=0.5).contains(&self.wave_speed_sq) {
            return Err(init_err(format!(
                "c^2 = {} is outside the stable range [0, 0.5]",
                self.wave_speed_sq
            )));
        }
        let bytes = (field.samples.len() * std::mem::size_of::<f32>()) as u64;
        let limit = self.device.limits().max_storage_buffer_binding_size as u64;
        if bytes > limit {
            return Err(init_err(format!(
                "field needs {bytes} bytes, storage binding limit is {limit}"
            )));
        }

        let (pipeline, bgl, params) = self.build_pipeline()?;
        self.queue.write_buffer(
            &params,
            0,
            bytemuck::bytes_of(&StepParams {
                width: field.width as u32,
                height: field.height as u32,
                c2: self.wave_speed_sq,
                damping: self.damping,
            }),
        );

        let make = |label: &str| {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: bytes,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let buffers = [make("height_a"), make("height_b"), make("height_c")];
        // prev and curr both start at the seeded field: the surface is at rest
        let initial: &[u8] = bytemuck::cast_slice(&field.samples);
        self.queue.write_buffer(&buffers[0], 0, initial);
        self.queue.write_buffer(&buffers[1], 0, initial);

        let bind = |r: usize| {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("water_step_bg"),
                layout: &bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers[r % 3].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffers[(r + 1) % 3].as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: buffers[(r + 2) % 3].as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [bind(0), bind(1), bind(2)];
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("height_staging"),
            size: bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.resources = Some(Resources {
            width: field.width as u32,
            height: field.height as u32,
            buffers,
            bind_groups,
            staging,
            rotation: 0,
        });
        self.pipeline = Some((pipeline, bgl, params));
        log::info!("[water] gpu kernel ready ({}x{})", field.width, field.height);
        Ok(())
    }

    fn step(&mut self, field: &mut HeightField, _dt: f32) -> Result<(), SimError> {
        let (Some((pipeline, _, _)), Some(res)) = (&self.pipeline, &mut self.resources) else {
            return Err(step_err("kernel used before init"));
        };
        if field.width as u32 != res.width || field.height as u32 != res.height {
            return Err(step_err("field size changed since init"));
        }

        let r = res.rotation;
        let next = &res.buffers[(r + 2) % 3];
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("water_step"),
            });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("water_step_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &res.bind_groups[r], &[]);
            pass.dispatch_workgroups(
                res.width.div_ceil(WORKGROUP),
                res.height.div_ceil(WORKGROUP),
                1,
            );
        }
        encoder.copy_buffer_to_buffer(next, 0, &res.staging, 0, res.staging.size());
        self.queue.submit(Some(encoder.finish()));
        if let Some(e) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(step_err(e));
        }

        let slice = res.staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        let _ = self.device.poll(wgpu::Maintain::Wait);
        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(step_err(e)),
            Err(e) => return Err(step_err(e)),
        }
        {
            let data = slice.get_mapped_range();
            field.samples.copy_from_slice(bytemuck::cast_slice(&data[..]));
        }
        res.staging.unmap();

        // the buffer just written becomes curr for the next step
        res.rotation = (r + 1) % 3;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Headless device, or `None` on machines without an adapter.
    fn device() -> Option<(Arc<wgpu::Device>, Arc<wgpu::Queue>)> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor::default(),
            None,
        ))
        .ok()?;
        Some((Arc::new(device), Arc::new(queue)))
    }

    fn bumped_field() -> HeightField {
        let mut field = HeightField::new(16, 16);
        field.samples[8 * 16 + 8] = 1.0;
        field
    }

    #[test]
    fn steps_spread_a_bump() {
        let Some((device, queue)) = device() else {
            eprintln!("no adapter; skipping");
            return;
        };
        let mut field = bumped_field();
        let mut kernel = GpuWaveKernel::new(device, queue, 0.2, 0.99);
        kernel.init(&field).unwrap();
        for _ in 0..4 {
            kernel.step(&mut field, 0.016).unwrap();
        }
        assert!(field.get(9, 8).abs() > 0.0);
        assert!(field.samples.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn unstable_speed_is_an_init_error() {
        let Some((device, queue)) = device() else {
            eprintln!("no adapter; skipping");
            return;
        };
        let mut kernel = GpuWaveKernel::new(device, queue, 0.9, 0.99);
        assert!(matches!(
            kernel.init(&bumped_field()),
            Err(SimError::KernelInit { .. })
        ));
    }

    #[test]
    fn validation_failure_during_step_is_returned() {
        let Some((device, queue)) = device() else {
            eprintln!("no adapter; skipping");
            return;
        };
        let mut field = bumped_field();
        let mut kernel = GpuWaveKernel::new(device, queue, 0.2, 0.99);
        kernel.init(&field).unwrap();
        if let Some(res) = &kernel.resources {
            res.buffers[2].destroy();
        }
        assert!(matches!(
            kernel.step(&mut field, 0.016),
            Err(SimError::KernelStep { .. })
        ));
    }

    #[test]
    fn step_before_init_fails() {
        let Some((device, queue)) = device() else {
            eprintln!("no adapter; skipping");
            return;
        };
        let mut kernel = GpuWaveKernel::new(device, queue, 0.2, 0.99);
        let mut field = bumped_field();
        assert!(kernel.step(&mut field, 0.016).is_err());
    }
}
