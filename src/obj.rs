use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::mesh::Mesh;

/// Wavefront OBJ text for `mesh`, one `g` group per submesh. Indices are
/// shared between position, uv and normal.
pub fn write_obj(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# cable_forge");
    let _ = writeln!(out, "o {name}");
    for v in &mesh.vertices {
        let _ = writeln!(out, "v {} {} {}", v.x, v.y, v.z);
    }
    for uv in &mesh.uvs {
        let _ = writeln!(out, "vt {} {}", uv.x, uv.y);
    }
    for n in &mesh.normals {
        let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
    }
    for (submesh, indices) in &mesh.submeshes {
        let _ = writeln!(out, "g submesh_{submesh}");
        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
            let _ = writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}");
        }
    }
    out
}

pub fn save_obj(path: &Path, mesh: &Mesh, name: &str) -> std::io::Result<()> {
    fs::write(path, write_obj(mesh, name))
}
