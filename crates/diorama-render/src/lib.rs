pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
pub static WATER_STEP_WGSL: &str = include_str!("../shaders/water_step.wgsl");

mod helpers;
pub mod renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod wave_kernel;

pub use renderer::WgpuRenderer;
#[cfg(not(target_arch = "wasm32"))]
pub use wave_kernel::GpuWaveKernel;
