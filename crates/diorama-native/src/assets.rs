//! File-backed asset loading on a worker thread.

use diorama_core::{
    decode_gltf, AssetData, AssetEvent, AssetId, AssetKind, AssetSource, SimError, TextureData,
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

struct Request {
    id: AssetId,
    kind: AssetKind,
    path: String,
}

/// Decodes files relative to `root` on one background thread; finished loads
/// are drained by [`AssetSource::poll`].
pub struct ThreadedAssetSource {
    requests: Sender<Request>,
    done: Receiver<AssetEvent>,
}

impl ThreadedAssetSource {
    pub fn spawn(root: PathBuf) -> anyhow::Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (done_tx, done_rx) = mpsc::channel();
        thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                for req in req_rx {
                    let result = load(&root, &req.path, req.kind);
                    if done_tx.send(AssetEvent { id: req.id, result }).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            requests: req_tx,
            done: done_rx,
        })
    }
}

impl AssetSource for ThreadedAssetSource {
    fn request(&mut self, id: AssetId, kind: AssetKind, path: &str) {
        let req = Request {
            id,
            kind,
            path: path.to_string(),
        };
        if self.requests.send(req).is_err() {
            log::error!("[assets] loader thread gone; `{path}` dropped");
        }
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        self.done.try_iter().collect()
    }
}

fn load(root: &Path, path: &str, kind: AssetKind) -> Result<AssetData, SimError> {
    let full = root.join(path);
    match kind {
        AssetKind::Texture => {
            let img = image::open(&full).map_err(|e| SimError::asset_load(path, e))?;
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            log::debug!("[assets] decoded {} ({width}x{height})", full.display());
            Ok(AssetData::Texture(TextureData {
                width,
                height,
                rgba: rgba.into_raw(),
            }))
        }
        AssetKind::Model => {
            let bytes = std::fs::read(&full).map_err(|e| SimError::asset_load(path, e))?;
            decode_gltf(path, &bytes).map(AssetData::Model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for(src: &mut ThreadedAssetSource) -> AssetEvent {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(ev) = src.poll().pop() {
                return ev;
            }
            assert!(Instant::now() < deadline, "loader timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn missing_file_reports_asset_error() {
        let mut src = ThreadedAssetSource::spawn(std::env::temp_dir()).unwrap();
        src.request(AssetId(3), AssetKind::Texture, "definitely-not-here-diorama.png");
        let ev = wait_for(&mut src);
        assert_eq!(ev.id, AssetId(3));
        assert!(matches!(ev.result, Err(SimError::AssetLoad { .. })));
    }

    #[test]
    fn png_decodes_to_rgba() {
        let dir = std::env::temp_dir().join(format!("diorama-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        img.save(dir.join("face.png")).unwrap();

        let mut src = ThreadedAssetSource::spawn(dir.clone()).unwrap();
        src.request(AssetId(0), AssetKind::Texture, "face.png");
        match wait_for(&mut src).result {
            Ok(AssetData::Texture(t)) => {
                assert_eq!((t.width, t.height), (2, 3));
                assert_eq!(t.rgba.len(), 2 * 3 * 4);
                assert_eq!(&t.rgba[..4], &[10, 20, 30, 255]);
            }
            other => panic!("unexpected {other:?}"),
        }
        let _ = std::fs::remove_dir_all(dir);
    }

    /// One triangle as a GLB: positions only, no indices.
    fn triangle_glb() -> Vec<u8> {
        let mut json = br#"{"asset":{"version":"2.0"},"buffers":[{"byteLength":36}],"bufferViews":[{"buffer":0,"byteLength":36}],"accessors":[{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}],"meshes":[{"primitives":[{"attributes":{"POSITION":0}}]}]}"#.to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let bin: Vec<u8> = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let total = (12 + 8 + json.len() + 8 + bin.len()) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    #[test]
    fn glb_model_decodes_to_mesh() {
        let dir = std::env::temp_dir().join(format!("diorama-models-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("fish.glb"), triangle_glb()).unwrap();

        let mut src = ThreadedAssetSource::spawn(dir.clone()).unwrap();
        src.request(AssetId(1), AssetKind::Model, "fish.glb");
        match wait_for(&mut src).result {
            Ok(AssetData::Model(mesh)) => {
                assert_eq!(mesh.vertex_count(), 3);
                assert_eq!(mesh.indices, vec![0, 1, 2]);
            }
            other => panic!("unexpected {other:?}"),
        }
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_model_reports_asset_error() {
        let mut src = ThreadedAssetSource::spawn(std::env::temp_dir()).unwrap();
        src.request(AssetId(2), AssetKind::Model, "definitely-not-here-diorama.glb");
        assert!(matches!(
            wait_for(&mut src).result,
            Err(SimError::AssetLoad { .. })
        ));
    }
}
