//! Indexed triangle meshes built on the CPU and handed to the renderer.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Smooth normals: area-weighted average of the adjacent face normals.
    pub fn recompute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(pa), Some(pb), Some(pc)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };
            let face = (*pb - *pa).cross(*pc - *pa);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for n in &mut normals {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
        self.normals = normals;
    }
}

/// UV sphere centred on the origin.
pub fn sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = MeshData::default();
    for r in 0..=rings {
        let v = r as f32 / rings as f32;
        let phi = v * PI;
        for s in 0..=segments {
            let u = s as f32 / segments as f32;
            let theta = u * TAU;
            let n = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            mesh.positions.push(n * radius);
            mesh.normals.push(n);
            mesh.uvs.push(Vec2::new(u, v));
        }
    }
    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    mesh
}

/// Flat disc in the XZ plane, centre vertex plus `rings` concentric rings.
pub fn disc(radius: f32, rings: u32, segments: u32) -> MeshData {
    let rings = rings.max(1);
    let segments = segments.max(3);
    let mut mesh = MeshData::default();
    mesh.positions.push(Vec3::ZERO);
    mesh.normals.push(Vec3::Y);
    mesh.uvs.push(Vec2::splat(0.5));
    for r in 1..=rings {
        let rr = radius * r as f32 / rings as f32;
        for s in 0..segments {
            let a = s as f32 / segments as f32 * TAU;
            let (x, z) = (rr * a.cos(), rr * a.sin());
            mesh.positions.push(Vec3::new(x, 0.0, z));
            mesh.normals.push(Vec3::Y);
            mesh.uvs
                .push(Vec2::new(0.5 + 0.5 * x / radius, 0.5 + 0.5 * z / radius));
        }
    }
    // centre fan
    for s in 0..segments {
        let a = 1 + s;
        let b = 1 + (s + 1) % segments;
        mesh.indices.extend_from_slice(&[0, b, a]);
    }
    for r in 1..rings {
        let inner = 1 + (r - 1) * segments;
        let outer = 1 + r * segments;
        for s in 0..segments {
            let s1 = (s + 1) % segments;
            let (i0, i1) = (inner + s, inner + s1);
            let (o0, o1) = (outer + s, outer + s1);
            mesh.indices.extend_from_slice(&[i0, i1, o0, i1, o1, o0]);
        }
    }
    mesh
}

/// Square grid in the XZ plane spanning `size`, with UVs in `[0, 1]`.
pub fn plane(size: f32, segments: u32) -> MeshData {
    let segments = segments.max(1);
    let mut mesh = MeshData::default();
    let half = size * 0.5;
    for j in 0..=segments {
        let v = j as f32 / segments as f32;
        for i in 0..=segments {
            let u = i as f32 / segments as f32;
            mesh.positions
                .push(Vec3::new(-half + u * size, 0.0, -half + v * size));
            mesh.normals.push(Vec3::Y);
            mesh.uvs.push(Vec2::new(u, v));
        }
    }
    let stride = segments + 1;
    for j in 0..segments {
        for i in 0..segments {
            let a = j * stride + i;
            let b = a + stride;
            mesh.indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    mesh
}

/// One inward-facing face of an axis-aligned skybox of edge `size`.
///
/// Faces are indexed +X, -X, +Y, -Y, +Z, -Z.
pub fn skybox_face(face: usize, size: f32) -> MeshData {
    let h = size * 0.5;
    let (normal, u_axis, v_axis) = match face % 6 {
        0 => (Vec3::X, Vec3::NEG_Z, Vec3::NEG_Y),
        1 => (Vec3::NEG_X, Vec3::Z, Vec3::NEG_Y),
        2 => (Vec3::Y, Vec3::X, Vec3::Z),
        3 => (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
        4 => (Vec3::Z, Vec3::X, Vec3::NEG_Y),
        _ => (Vec3::NEG_Z, Vec3::NEG_X, Vec3::NEG_Y),
    };
    let centre = normal * h;
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    let mut mesh = MeshData::default();
    for (u, v) in corners {
        let p = centre + u_axis * (u * 2.0 - 1.0) * h + v_axis * (v * 2.0 - 1.0) * h;
        mesh.positions.push(p);
        mesh.normals.push(-normal);
        mesh.uvs.push(Vec2::new(u, v));
    }
    mesh.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    mesh
}

/// Low-poly fish body: an elongated octahedron pointing down +Z.
pub fn fish_body(length: f32) -> MeshData {
    let half = length * 0.5;
    let w = length * 0.18;
    let h = length * 0.28;
    let mut mesh = MeshData {
        positions: vec![
            Vec3::new(0.0, 0.0, half),        // nose
            Vec3::new(0.0, 0.0, -half),       // tail
            Vec3::new(w, 0.0, 0.0),           // right
            Vec3::new(-w, 0.0, 0.0),          // left
            Vec3::new(0.0, h, -half * 0.1),   // top
            Vec3::new(0.0, -h, -half * 0.1),  // bottom
        ],
        uvs: vec![Vec2::ZERO; 6],
        indices: vec![
            0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2, //
            1, 4, 2, 1, 3, 4, 1, 5, 3, 1, 2, 5,
        ],
        ..Default::default()
    };
    mesh.recompute_normals();
    mesh
}
