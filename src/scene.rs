//! JSON scene description.
//!
//! ```json
//! {
//!   "generator": { "kind": "creation", "width": 1.0 },
//!   "cables": [
//!     { "name": "source", "active": true,
//!       "points": [ { "position": [0, 0, 0] }, { "position": [2, 0, 0] } ] },
//!     { "name": "gate", "combinator": "or", "extends": ["source"],
//!       "points": [ { "position": [2, 0, 0] }, { "position": [2, 0, 3] } ] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use cgmath::Vector3;
use serde::Deserialize;

use crate::activation::Combinator;
use crate::error::SceneError;
use crate::generator::MeshGenerator;
use crate::path::{CablePath, CablePoint};
use crate::registry::CableRegistry;

fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointDesc {
    pub position: [f32; 3],
    #[serde(default = "default_up")]
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct CableDesc {
    pub name: String,
    pub points: Vec<PointDesc>,
    #[serde(default)]
    pub combinator: Combinator,
    #[serde(default)]
    pub active: bool,
    /// Names of the cables this one derives its state from.
    #[serde(default)]
    pub extends: Vec<String>,
    /// Place points like the editor does: each one is snapped against the
    /// previous point (and onto its own surface) instead of taken as is.
    #[serde(default)]
    pub snap: bool,
    /// Overrides the scene-wide generator.
    #[serde(default)]
    pub generator: Option<MeshGenerator>,
}

impl CableDesc {
    pub fn path(&self) -> CablePath {
        let mut path = CablePath::new();
        for point in &self.points {
            let position = Vector3::from(point.position);
            let normal = Vector3::from(point.normal);
            if self.snap {
                path.push_snapped(position, normal, true);
            } else {
                path.push(CablePoint::new(position, normal));
            }
        }
        path
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub generator: MeshGenerator,
    #[serde(default)]
    pub cables: Vec<CableDesc>,
}

impl Scene {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Builds every cable, then wires up `extends`, so links may point
    /// forward in the file.
    pub fn build(&self) -> Result<CableRegistry, SceneError> {
        let mut registry = CableRegistry::new();
        for desc in &self.cables {
            registry.add_cable(
                desc.name.clone(),
                desc.path(),
                desc.combinator,
                desc.active,
                desc.generator.unwrap_or(self.generator),
            )?;
        }
        for desc in &self.cables {
            let node = registry
                .id_by_name(&desc.name)
                .ok_or_else(|| SceneError::UnknownCable(desc.name.clone()))?;
            for upstream in &desc.extends {
                let upstream = registry
                    .id_by_name(upstream)
                    .ok_or_else(|| SceneError::UnknownCable(upstream.clone()))?;
                registry.link(node, upstream)?;
            }
        }
        Ok(registry)
    }
}
