//! `fetch`-backed asset loading. Each request runs as its own future and
//! parks its result in a shared queue until the next frame polls it.

use diorama_core::{
    decode_gltf, AssetData, AssetEvent, AssetId, AssetKind, AssetSource, SimError, TextureData,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[derive(Default)]
pub struct FetchAssetSource {
    done: Rc<RefCell<Vec<AssetEvent>>>,
}

impl AssetSource for FetchAssetSource {
    fn request(&mut self, id: AssetId, kind: AssetKind, path: &str) {
        let done = self.done.clone();
        let path = path.to_string();
        spawn_local(async move {
            let result = match fetch_bytes(&path).await {
                Ok(bytes) => decode(&path, kind, &bytes),
                Err(e) => Err(SimError::asset_load(&path, format!("{:?}", e))),
            };
            done.borrow_mut().push(AssetEvent { id, result });
        });
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        std::mem::take(&mut *self.done.borrow_mut())
    }
}

async fn fetch_bytes(path: &str) -> Result<Vec<u8>, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(path))
        .await?
        .dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("HTTP {}", resp.status())));
    }
    let buf = JsFuture::from(resp.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

fn decode(path: &str, kind: AssetKind, bytes: &[u8]) -> Result<AssetData, SimError> {
    match kind {
        AssetKind::Texture => {
            let rgba = image::load_from_memory(bytes)
                .map_err(|e| SimError::asset_load(path, e))?
                .to_rgba8();
            let (width, height) = rgba.dimensions();
            log::debug!("[assets] decoded {path} ({width}x{height})");
            Ok(AssetData::Texture(TextureData {
                width,
                height,
                rgba: rgba.into_raw(),
            }))
        }
        AssetKind::Model => decode_gltf(path, bytes).map(AssetData::Model),
    }
}
