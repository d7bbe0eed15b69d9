use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector2, Vector3};
use serde::Deserialize;

use crate::activation::Combinator;
use crate::config::{CableMeshSettings, TubeSettings};
use crate::geometry::Geometry;
use crate::junction::{classify, JunctionKind, JunctionVariant};
use crate::mesh::Mesh;
use crate::patches::{self, Profile};
use crate::path::CablePoint;
use crate::texture::{
    patch_uv, COLUMN_CONCAVE, COLUMN_CONVEX, COLUMN_GLOW, COLUMN_JUNCTION_SIMPLE, COLUMN_SEGMENT,
};

/// Mesh strategy a cable is built with. Picked once from configuration.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshGenerator {
    /// Profiled cable with junction pieces, atlas UVs and a glow pass.
    Creation(CableMeshSettings),
    /// Plain round tube, one submesh.
    Tube(TubeSettings),
}

impl Default for MeshGenerator {
    fn default() -> Self {
        MeshGenerator::Creation(CableMeshSettings::default())
    }
}

impl MeshGenerator {
    /// Builds the mesh for `points` from scratch. Identical inputs always
    /// give an identical mesh. Fewer than two points give an empty mesh.
    pub fn generate(&self, points: &[CablePoint], active: bool, combinator: Combinator) -> Mesh {
        if points.len() < 2 {
            log::warn!(
                "cable needs at least 2 points to build a mesh, got {}",
                points.len()
            );
            return Mesh::new();
        }
        let mesh = match self {
            MeshGenerator::Creation(settings) => {
                build_creation(settings, points, active, combinator)
            }
            MeshGenerator::Tube(settings) => build_tube(settings, points),
        };
        log::debug!(
            "generated cable mesh: {} points, {} vertices, {} triangles in {} submeshes",
            points.len(),
            mesh.vertex_count(),
            mesh.total_triangle_count(),
            mesh.submesh_count()
        );
        mesh
    }
}

fn incoming(points: &[CablePoint], index: usize) -> Vector3<f32> {
    (points[index].position - points[index - 1].position).normalize()
}

fn build_creation(
    settings: &CableMeshSettings,
    points: &[CablePoint],
    active: bool,
    combinator: Combinator,
) -> Mesh {
    let profile = Profile::from_settings(settings);
    let start_cap = JunctionVariant::start_cap(combinator);
    let kinds: Vec<Option<JunctionKind>> = (0..points.len()).map(|i| classify(points, i)).collect();
    let mut geometry = Geometry::new();

    for i in 1..points.len() - 1 {
        let Some(kind) = kinds[i] else {
            continue;
        };
        let (previous, current) = (&points[i - 1], &points[i]);
        let forward = incoming(points, i);
        let patch = match kind {
            JunctionKind::SamePlane => patches::same_plane_junction(
                current.position,
                current.normal,
                forward,
                &profile,
                patch_uv(COLUMN_JUNCTION_SIMPLE, active),
            ),
            JunctionKind::Convex => patches::convex_junction(
                current.position,
                previous.normal,
                forward,
                &profile,
                patch_uv(COLUMN_CONVEX, active),
            ),
            JunctionKind::Concave => patches::concave_junction(
                current.position,
                previous.normal,
                forward,
                &profile,
                patch_uv(COLUMN_CONCAVE, active),
            ),
        };
        geometry.append(&patch);
    }

    if let Some(variant) = start_cap {
        let first = &points[0];
        geometry.append(&patches::same_plane_junction(
            first.position,
            first.normal,
            incoming(points, 1),
            &profile,
            patch_uv(variant.column(), active),
        ));
    }

    for pair in points.windows(2) {
        geometry.append(&patches::segment(
            pair[0].position,
            pair[1].position,
            pair[0].normal,
            &profile,
            patch_uv(COLUMN_SEGMENT, active),
        ));
    }

    if active {
        geometry.increment_mesh_index();
        let glow = patch_uv(COLUMN_GLOW, true);
        for pair in points.windows(2) {
            geometry.append(&patches::glow_segment(
                pair[0].position,
                pair[1].position,
                pair[0].normal,
                &profile,
                glow,
            ));
        }
        for (i, kind) in kinds.iter().enumerate() {
            if *kind == Some(JunctionKind::Convex) {
                geometry.append(&patches::glow_convex_junction(
                    points[i].position,
                    points[i - 1].normal,
                    incoming(points, i),
                    &profile,
                    glow,
                ));
            }
        }
    }

    Mesh::from_geometry(geometry)
}

/// Orthonormal ring basis: `z` along travel, `y` as close to `up` as it gets.
fn ring_basis(forward: Vector3<f32>, up: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let z = if forward.magnitude2() > f32::EPSILON {
        forward.normalize()
    } else {
        Vector3::unit_z()
    };
    let mut x = up.cross(z);
    if x.magnitude2() <= f32::EPSILON {
        // up runs along the cable, any perpendicular will do
        let helper = if z.x.abs() < 0.9 {
            Vector3::unit_x()
        } else {
            Vector3::unit_y()
        };
        x = helper.cross(z);
    }
    let x = x.normalize();
    (x, z.cross(x))
}

fn build_tube(settings: &TubeSettings, points: &[CablePoint]) -> Mesh {
    let segments = settings.radial_segments.max(3);
    let last = points.len() - 1;
    let mut geometry = Geometry::new();

    for (i, point) in points.iter().enumerate() {
        let forward = if i < last {
            points[i + 1].position - point.position
        } else {
            point.position - points[i - 1].position
        };
        let (x, y) = ring_basis(forward, point.normal);
        let v = i as f32 / last as f32;
        for j in 0..segments {
            let angle = TAU * j as f32 / segments as f32;
            let offset = (x * angle.cos() + y * angle.sin()) * settings.radius;
            geometry.add_vertex(
                point.position + offset,
                Vector2::new(j as f32 / segments as f32, v),
            );
        }
    }

    for i in 0..last as u32 {
        for j in 0..segments {
            let j_next = (j + 1) % segments;
            let current = i * segments + j;
            let next = (i + 1) * segments + j;
            let current_next = i * segments + j_next;
            let next_next = (i + 1) * segments + j_next;
            geometry.add_triangle(current, next_next, next, 0);
            geometry.add_triangle(current, current_next, next_next, 0);
        }
    }

    Mesh::from_geometry(geometry)
}
