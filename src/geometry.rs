use std::collections::BTreeMap;

use cgmath::{Vector2, Vector3};

use crate::patches::Patch;

/// Append-only buffer one generation call writes its patches into.
///
/// Triangles go to the current submesh; [`Geometry::increment_mesh_index`]
/// opens the next one (the glow pass uses this).
#[derive(Debug, Default)]
pub struct Geometry {
    vertices: Vec<Vector3<f32>>,
    uvs: Vec<Vector2<f32>>,
    triangles: BTreeMap<usize, Vec<u32>>,
    mesh_index: usize,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Vector3<f32>] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[Vector2<f32>] {
        &self.uvs
    }

    pub fn triangles(&self) -> &BTreeMap<usize, Vec<u32>> {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn add_vertex(&mut self, position: Vector3<f32>, uv: Vector2<f32>) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.uvs.push(uv);
        index
    }

    /// Adds a triangle whose indices are relative to `offset`, into the
    /// current submesh.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32, offset: u32) {
        self.add_triangle_to(self.mesh_index, a, b, c, offset);
    }

    pub fn add_triangle_to(&mut self, mesh_index: usize, a: u32, b: u32, c: u32, offset: u32) {
        self.triangles
            .entry(mesh_index)
            .or_default()
            .extend_from_slice(&[a + offset, b + offset, c + offset]);
    }

    /// Copies a patch in, rebasing its local indices onto the current end
    /// of the vertex buffer.
    pub fn append(&mut self, patch: &Patch) {
        let offset = self.vertices.len() as u32;
        for &(position, uv) in &patch.vertices {
            self.add_vertex(position, uv);
        }
        for tri in &patch.triangles {
            self.add_triangle(tri[0], tri[1], tri[2], offset);
        }
    }

    pub fn increment_mesh_index(&mut self) -> usize {
        self.mesh_index += 1;
        self.mesh_index
    }

    pub fn triangle_count(&self, mesh_index: usize) -> usize {
        self.triangles
            .get(&mesh_index)
            .map(|list| list.len() / 3)
            .unwrap_or(0)
    }

    pub fn into_parts(
        self,
    ) -> (
        Vec<Vector3<f32>>,
        Vec<Vector2<f32>>,
        BTreeMap<usize, Vec<u32>>,
    ) {
        (self.vertices, self.uvs, self.triangles)
    }
}
