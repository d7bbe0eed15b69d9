use std::collections::BTreeMap;

use cgmath::{InnerSpace, Vector2, Vector3, Zero};

use crate::geometry::Geometry;

/// Opaque cable body.
pub const SUBMESH_BODY: usize = 0;
/// Additive glow strips, present only on active cables.
pub const SUBMESH_GLOW: usize = 1;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Generated cable mesh: one shared vertex buffer, one index list per
/// submesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub submeshes: BTreeMap<usize, Vec<u32>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_geometry(geometry: Geometry) -> Self {
        let (vertices, uvs, submeshes) = geometry.into_parts();
        let mut mesh = Self {
            normals: Vec::new(),
            vertices,
            uvs,
            submeshes,
        };
        mesh.recalculate_normals();
        mesh
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    pub fn indices(&self, submesh: usize) -> &[u32] {
        self.submeshes
            .get(&submesh)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn triangle_count(&self, submesh: usize) -> usize {
        self.indices(submesh).len() / 3
    }

    pub fn total_triangle_count(&self) -> usize {
        self.submeshes.values().map(|list| list.len() / 3).sum()
    }

    /// Area-weighted vertex normals over every submesh. Vertices no
    /// triangle touches keep a zero normal.
    pub fn recalculate_normals(&mut self) {
        let mut normals = vec![Vector3::zero(); self.vertices.len()];
        for indices in self.submeshes.values() {
            for tri in indices.chunks_exact(3) {
                let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
                // cross product length is twice the area, so this weights by area
                let face = (self.vertices[b] - self.vertices[a])
                    .cross(self.vertices[c] - self.vertices[a]);
                normals[a] += face;
                normals[b] += face;
                normals[c] += face;
            }
        }
        for normal in &mut normals {
            if normal.magnitude2() > f32::EPSILON * f32::EPSILON {
                *normal = normal.normalize();
            }
        }
        self.normals = normals;
    }

    /// Interleaved vertex stream for upload.
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let normal = self.normals.get(i).copied().unwrap_or_else(Vector3::zero);
                let uv = self.uvs.get(i).copied().unwrap_or_else(Vector2::zero);
                GpuVertex {
                    position: (*position).into(),
                    normal: normal.into(),
                    uv: uv.into(),
                }
            })
            .collect()
    }

    pub fn index_bytes(&self, submesh: usize) -> &[u8] {
        bytemuck::cast_slice(self.indices(submesh))
    }
}
