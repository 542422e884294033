//! glTF 2.0 model decoding shared by the asset loaders.

use crate::error::SimError;
use crate::mesh::MeshData;
use glam::{Vec2, Vec3};
use gltf::buffer::Source;
use gltf::mesh::Mode;

/// Decode the first mesh of a binary glTF (`.glb`) into a [`MeshData`].
///
/// Triangle primitives of that mesh are merged into one index space. Missing
/// normals are recomputed, missing UVs are zero and missing indices mean the
/// vertices are already a triangle list. Buffers must live in the GLB binary
/// chunk; external URIs are rejected.
pub fn decode_gltf(path: &str, bytes: &[u8]) -> Result<MeshData, SimError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|e| SimError::asset_load(path, e))?;

    let mut buffers: Vec<&[u8]> = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .ok_or_else(|| SimError::asset_load(path, "binary chunk missing"))?;
                buffers.push(blob);
            }
            Source::Uri(uri) => {
                return Err(SimError::asset_load(
                    path,
                    format!("external buffer `{uri}` is not supported; embed it in a .glb"),
                ))
            }
        }
    }

    let mesh = gltf
        .meshes()
        .next()
        .ok_or_else(|| SimError::asset_load(path, "no meshes"))?;

    let mut out = MeshData::default();
    let mut has_normals = true;
    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            log::warn!("[assets] {path}: skipping {:?} primitive", primitive.mode());
            continue;
        }
        let reader = primitive.reader(|b| buffers.get(b.index()).copied());
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let base = out.positions.len() as u32;
        out.positions.extend(positions.map(Vec3::from));
        let count = out.positions.len() - base as usize;

        match reader.read_normals() {
            Some(n) => out.normals.extend(n.map(Vec3::from)),
            None => {
                has_normals = false;
                out.normals.extend(std::iter::repeat(Vec3::Y).take(count));
            }
        }
        match reader.read_tex_coords(0) {
            Some(uv) => out.uvs.extend(uv.into_f32().map(Vec2::from)),
            None => out.uvs.extend(std::iter::repeat(Vec2::ZERO).take(count)),
        }
        match reader.read_indices() {
            Some(idx) => out.indices.extend(idx.into_u32().map(|i| base + i)),
            None => out.indices.extend(base..base + count as u32),
        }
    }

    if out.indices.is_empty() {
        return Err(SimError::asset_load(path, "no triangle geometry"));
    }
    if out.normals.len() != out.positions.len() || out.uvs.len() != out.positions.len() {
        return Err(SimError::asset_load(path, "attribute counts disagree"));
    }
    if out.indices.iter().any(|&i| i as usize >= out.positions.len()) {
        return Err(SimError::asset_load(path, "index out of range"));
    }
    if !has_normals {
        out.recompute_normals();
    }
    log::debug!(
        "[assets] {path}: {} vertices, {} triangles",
        out.vertex_count(),
        out.triangle_count()
    );
    Ok(out)
}
