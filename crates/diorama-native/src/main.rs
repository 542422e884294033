use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use diorama_core::{cpu_water, Diorama, DioramaConfig, PointerSample, WaterMode, WaterParams, WaterSimulator};
use diorama_render::{GpuWaveKernel, WgpuRenderer};
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

mod assets;

use assets::ThreadedAssetSource;

/// Translate a physical key into the `KeyboardEvent.code` names the core understands.
fn key_code_name(code: KeyCode) -> Option<&'static str> {
    Some(match code {
        KeyCode::KeyW => "KeyW",
        KeyCode::KeyA => "KeyA",
        KeyCode::KeyS => "KeyS",
        KeyCode::KeyD => "KeyD",
        KeyCode::Space => "Space",
        KeyCode::ShiftLeft => "ShiftLeft",
        _ => return None,
    })
}

fn water_mode_from_env() -> WaterMode {
    match std::env::var("DIORAMA_WATER") {
        Ok(s) => s.parse().unwrap_or_else(|e| {
            log::warn!("[water] {e}; using static surface");
            WaterMode::Static
        }),
        Err(_) => WaterMode::Static,
    }
}

fn build_water(params: &WaterParams, renderer: &WgpuRenderer) -> WaterSimulator {
    match params.mode {
        WaterMode::Gpu => {
            let kernel = GpuWaveKernel::new(
                renderer.device(),
                renderer.queue(),
                params.wave_speed_sq,
                params.damping,
            );
            WaterSimulator::with_kernel(params, Box::new(kernel))
        }
        _ => cpu_water(params),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let asset_root = std::env::var("DIORAMA_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("assets"));

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title("Underwater Diorama (native)")
        .with_inner_size(LogicalSize::new(1280.0, 720.0))
        .build(&event_loop)
        .context("window")?;

    let size = window.inner_size();
    let mut renderer = pollster::block_on(WgpuRenderer::new(&window, size.width, size.height))
        .context("gpu init")?;
    let mut assets = ThreadedAssetSource::spawn(asset_root).context("asset loader")?;

    let mut config = DioramaConfig {
        fish_model: std::env::var("DIORAMA_FISH_MODEL").ok(),
        ..DioramaConfig::default()
    };
    let water = config.water.as_mut().map(|p| {
        p.mode = water_mode_from_env();
        build_water(p, &renderer)
    });
    let mut diorama = Diorama::with_water(config, water, &mut renderer, &mut assets);

    let window = &window;
    let mut cursor = (0.0_f32, 0.0_f32);
    let mut last_frame = Instant::now();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => renderer.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                if code == KeyCode::Escape {
                    elwt.exit();
                    return;
                }
                if let Some(name) = key_code_name(code) {
                    diorama.handle_key(name, event.state == ElementState::Pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                cursor = (position.x as f32, position.y as f32);
                let (w, h) = renderer.size();
                diorama.handle_pointer(PointerSample {
                    x: cursor.0,
                    y: cursor.1,
                    viewport_width: w as f32,
                    viewport_height: h as f32,
                    is_down: None,
                });
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let (w, h) = renderer.size();
                diorama.handle_pointer(PointerSample {
                    x: cursor.0,
                    y: cursor.1,
                    viewport_width: w as f32,
                    viewport_height: h as f32,
                    is_down: Some(state == ElementState::Pressed),
                });
            }
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            let dt = (now - last_frame).as_secs_f32();
            last_frame = now;
            diorama.tick(dt, &mut renderer, &mut assets);
            window.request_redraw();
        }
        _ => {}
    })?;
    Ok(())
}
