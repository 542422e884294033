#![cfg(target_arch = "wasm32")]
use diorama_core::{cpu_water, Diorama, DioramaConfig, WaterMode};
use diorama_render::WgpuRenderer;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod assets;
mod dom;
mod events;

use assets::FetchAssetSource;

/// Everything the browser callbacks share.
pub(crate) struct App {
    pub diorama: Diorama,
    pub renderer: WgpuRenderer<'static>,
    pub assets: FetchAssetSource,
}

impl App {
    fn frame(&mut self, dt_sec: f32, canvas: &web::HtmlCanvasElement) {
        let size = (canvas.width(), canvas.height());
        if size != self.renderer.size() {
            self.renderer.resize(size.0, size.1);
        }
        self.diorama.tick(dt_sec, &mut self.renderer, &mut self.assets);
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("diorama-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn water_mode() -> WaterMode {
    let Some(raw) = dom::query_param("water") else {
        return WaterMode::Static;
    };
    match raw.parse() {
        // compute readback would block the browser's event loop
        Ok(WaterMode::Gpu) => {
            log::warn!("[water] gpu kernel is native-only; using the CPU wave kernel");
            WaterMode::Wave
        }
        Ok(mode) => mode,
        Err(e) => {
            log::warn!("[water] {e}; using static surface");
            WaterMode::Static
        }
    }
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, "app-canvas")?;
    dom::sync_canvas_backing_size(&canvas);
    dom::wire_resize(&canvas);

    let mut renderer = WgpuRenderer::new(
        wgpu::SurfaceTarget::Canvas(canvas.clone()),
        canvas.width(),
        canvas.height(),
    )
    .await?;
    let mut assets = FetchAssetSource::default();

    let mut config = DioramaConfig {
        fish_model: dom::query_param("fish"),
        ..DioramaConfig::default()
    }
    .with_asset_base("assets/");
    if let Some(p) = config.water.as_mut() {
        p.mode = water_mode();
    }
    let water = config.water.as_ref().map(cpu_water);
    let diorama = Diorama::with_water(config, water, &mut renderer, &mut assets);

    let app = Rc::new(RefCell::new(App {
        diorama,
        renderer,
        assets,
    }));
    events::wire_keyboard(app.clone());
    events::wire_pointer(app.clone(), &canvas);
    start_loop(app, canvas);
    Ok(())
}

fn start_loop(app: Rc<RefCell<App>>, canvas: web::HtmlCanvasElement) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let mut last_instant = Instant::now();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now = Instant::now();
        let dt_sec = (now - last_instant).as_secs_f32();
        last_instant = now;
        app.borrow_mut().frame(dt_sec, &canvas);

        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}
