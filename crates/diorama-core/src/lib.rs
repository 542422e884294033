pub mod agent;
pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod diorama;
pub mod error;
pub mod input;
pub mod mesh;
pub mod model;
pub mod noise_field;
pub mod particles;
pub mod scene;
pub mod terrain;
pub mod water;

pub use agent::*;
pub use camera::*;
pub use clock::*;
pub use config::*;
pub use constants::*;
pub use diorama::*;
pub use error::*;
pub use input::*;
pub use mesh::MeshData;
pub use model::decode_gltf;
pub use noise_field::*;
pub use particles::*;
pub use scene::*;
pub use water::*;
