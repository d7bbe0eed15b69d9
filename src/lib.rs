//! Procedural cable meshes and the activation graph that drives them.

pub mod activation;
pub mod config;
pub mod error;
pub mod frame;
pub mod generator;
pub mod geometry;
pub mod junction;
pub mod mesh;
pub mod obj;
pub mod patches;
pub mod path;
pub mod profiler;
pub mod registry;
pub mod scene;
pub mod texture;
pub mod uv;

pub use activation::{ActivationGraph, CableId, Combinator};
pub use config::{CableMeshSettings, TubeSettings};
pub use error::{GraphError, SceneError};
pub use generator::MeshGenerator;
pub use mesh::{GpuVertex, Mesh, SUBMESH_BODY, SUBMESH_GLOW};
pub use path::{snap_next_point, CablePath, CablePoint};
pub use registry::{Cable, CableRegistry};
pub use scene::Scene;
