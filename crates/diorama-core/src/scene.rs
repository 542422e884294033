//! Boundary with the rendering engine and the asset loader.
//!
//! The core only describes what to draw (geometry/material descriptors,
//! transforms) and reacts to finished asset loads; the collaborators decide
//! how.

use crate::camera::Camera;
use crate::error::SimError;
use crate::mesh::MeshData;
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GeometryDescriptor {
    Mesh(MeshData),
    Points(PointCloud),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    #[default]
    Lit,
    Unlit,
}

/// Which triangle faces are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDescriptor {
    pub color: [f32; 3],
    pub opacity: f32,
    pub shading: Shading,
    pub side: Side,
    pub texture: Option<TextureHandle>,
    /// World-space size of each point for [`GeometryDescriptor::Points`].
    pub point_size: f32,
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            shading: Shading::Lit,
            side: Side::Front,
            texture: None,
            point_size: 0.02,
        }
    }
}

impl MaterialDescriptor {
    pub fn lit(color: [f32; 3]) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn unlit(color: [f32; 3]) -> Self {
        Self {
            color,
            shading: Shading::Unlit,
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Decoded RGBA8 image.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Drawing side of the engine. Handles stay valid until [`SceneRenderer::release`].
pub trait SceneRenderer {
    fn create_renderable(
        &mut self,
        geometry: GeometryDescriptor,
        material: MaterialDescriptor,
    ) -> Result<RenderHandle, SimError>;
    fn attach(&mut self, handle: RenderHandle);
    fn detach(&mut self, handle: RenderHandle);
    /// Free GPU resources; the handle must not be used afterwards.
    fn release(&mut self, handle: RenderHandle);
    fn set_transform(&mut self, handle: RenderHandle, transform: Transform);
    /// Replace vertex positions (and normals for meshes) in place.
    fn update_positions(&mut self, handle: RenderHandle, positions: &[Vec3], normals: Option<&[Vec3]>);
    fn set_opacity(&mut self, handle: RenderHandle, opacity: f32);
    fn create_texture(&mut self, texture: &TextureData) -> Result<TextureHandle, SimError>;
    fn render_frame(&mut self, camera: &Camera) -> Result<(), SimError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Model,
}

#[derive(Clone, Debug)]
pub enum AssetData {
    Texture(TextureData),
    Model(MeshData),
}

#[derive(Debug)]
pub struct AssetEvent {
    pub id: AssetId,
    pub result: Result<AssetData, SimError>,
}

/// Asynchronous loader. `request` must return immediately; completions are
/// picked up by `poll` once per frame.
pub trait AssetSource {
    fn request(&mut self, id: AssetId, kind: AssetKind, path: &str);
    fn poll(&mut self) -> Vec<AssetEvent>;
}

/// Loader that never produces anything, for hosts without assets.
#[derive(Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn request(&mut self, _id: AssetId, _kind: AssetKind, path: &str) {
        log::debug!("[assets] no asset source; ignoring `{path}`");
    }

    fn poll(&mut self) -> Vec<AssetEvent> {
        Vec::new()
    }
}
