use std::collections::{BTreeMap, HashMap};

use cgmath::Vector3;

use crate::activation::{ActivationGraph, CableId, Combinator};
use crate::error::{GraphError, SceneError};
use crate::generator::MeshGenerator;
use crate::mesh::Mesh;
use crate::path::{CablePath, CablePoint};
use crate::profiler;

#[derive(Debug, Clone)]
pub struct Cable {
    name: String,
    path: CablePath,
    generator: MeshGenerator,
    combinator: Combinator,
    mesh: Mesh,
    generations: u64,
}

impl Cable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &CablePath {
        &self.path
    }

    pub fn generator(&self) -> &MeshGenerator {
        &self.generator
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// How many times the mesh has been built.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    fn rebuild(&mut self, active: bool) {
        let mesh = profiler::time_cable(&self.name, self.path.len(), || {
            self.generator
                .generate(self.path.points(), active, self.combinator)
        });
        self.mesh = mesh;
        self.generations += 1;
    }
}

/// Every cable in a scene together with the activation graph linking them.
///
/// Meshes are rebuilt whenever a cable's path is edited or its activation
/// flips, including flips caused by a cascade from another cable.
#[derive(Debug, Default)]
pub struct CableRegistry {
    graph: ActivationGraph,
    cables: BTreeMap<CableId, Cable>,
    names: HashMap<String, CableId>,
}

impl CableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    pub fn graph(&self) -> &ActivationGraph {
        &self.graph
    }

    pub fn cable(&self, id: CableId) -> Option<&Cable> {
        self.cables.get(&id)
    }

    pub fn mesh(&self, id: CableId) -> Option<&Mesh> {
        self.cables.get(&id).map(Cable::mesh)
    }

    pub fn id_by_name(&self, name: &str) -> Option<CableId> {
        self.names.get(name).copied()
    }

    pub fn is_active(&self, id: CableId) -> bool {
        self.graph.is_active(id).unwrap_or(false)
    }

    /// Cables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CableId, &Cable)> {
        self.cables.iter().map(|(id, cable)| (*id, cable))
    }

    pub fn add_cable(
        &mut self,
        name: impl Into<String>,
        path: CablePath,
        combinator: Combinator,
        active: bool,
        generator: MeshGenerator,
    ) -> Result<CableId, SceneError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(SceneError::DuplicateCable(name));
        }
        let id = self.graph.add_node(combinator, active);
        let mut cable = Cable {
            name: name.clone(),
            path,
            generator,
            combinator,
            mesh: Mesh::new(),
            generations: 0,
        };
        cable.rebuild(self.graph.is_active(id).unwrap_or(active));
        log::info!("added cable `{name}` as {id} with {} points", cable.path.len());
        self.names.insert(name, id);
        self.cables.insert(id, cable);
        Ok(id)
    }

    pub fn remove_cable(&mut self, id: CableId) -> Result<Cable, GraphError> {
        let cables = &mut self.cables;
        self.graph.remove_node_with(id, |changed, active| {
            if let Some(cable) = cables.get_mut(&changed) {
                cable.rebuild(active);
            }
        })?;
        let cable = self.cables.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        self.names.remove(&cable.name);
        log::info!("removed cable `{}`", cable.name);
        Ok(cable)
    }

    /// Makes `node` extend `upstream`, rebuilding whatever changes state.
    pub fn link(&mut self, node: CableId, upstream: CableId) -> Result<Vec<CableId>, GraphError> {
        let mut rebuilt = Vec::new();
        let cables = &mut self.cables;
        self.graph.add_upstream_with(node, upstream, |changed, active| {
            if let Some(cable) = cables.get_mut(&changed) {
                cable.rebuild(active);
                rebuilt.push(changed);
            }
        })?;
        Ok(rebuilt)
    }

    pub fn unlink(&mut self, node: CableId, upstream: CableId) -> Result<Vec<CableId>, GraphError> {
        let mut rebuilt = Vec::new();
        let cables = &mut self.cables;
        self.graph.remove_upstream_with(node, upstream, |changed, active| {
            if let Some(cable) = cables.get_mut(&changed) {
                cable.rebuild(active);
                rebuilt.push(changed);
            }
        })?;
        Ok(rebuilt)
    }

    /// Drives a cable without a combinator. Returns every cable whose mesh
    /// was rebuilt, in propagation order.
    pub fn set_active(&mut self, id: CableId, active: bool) -> Result<Vec<CableId>, GraphError> {
        let mut rebuilt = Vec::new();
        let cables = &mut self.cables;
        self.graph.set_active_with(id, active, |changed, active| {
            if let Some(cable) = cables.get_mut(&changed) {
                cable.rebuild(active);
                rebuilt.push(changed);
            }
        })?;
        if !rebuilt.is_empty() {
            log::info!("activation change on {id} rebuilt {} cables", rebuilt.len());
        }
        Ok(rebuilt)
    }

    pub fn set_active_by_name(
        &mut self,
        name: &str,
        active: bool,
    ) -> Result<Vec<CableId>, SceneError> {
        let id = self
            .id_by_name(name)
            .ok_or_else(|| SceneError::UnknownCable(name.to_string()))?;
        Ok(self.set_active(id, active)?)
    }

    pub fn regenerate(&mut self, id: CableId) -> bool {
        let active = self.is_active(id);
        match self.cables.get_mut(&id) {
            Some(cable) => {
                cable.rebuild(active);
                true
            }
            None => false,
        }
    }

    pub fn regenerate_all(&mut self) {
        for (id, cable) in self.cables.iter_mut() {
            cable.rebuild(self.graph.is_active(*id).unwrap_or(false));
        }
        log::info!("regenerated {} cables", self.cables.len());
    }

    /// Runs `edit` on the cable's path and rebuilds its mesh.
    pub fn edit_path<F, R>(&mut self, id: CableId, edit: F) -> Option<R>
    where
        F: FnOnce(&mut CablePath) -> R,
    {
        let active = self.is_active(id);
        let cable = self.cables.get_mut(&id)?;
        let result = edit(&mut cable.path);
        cable.rebuild(active);
        Some(result)
    }

    /// Editor-style placement of the next point, see
    /// [`snap_next_point`](crate::path::snap_next_point).
    pub fn place_point(
        &mut self,
        id: CableId,
        target: Vector3<f32>,
        target_normal: Vector3<f32>,
        snap_normal: bool,
    ) -> Option<CablePoint> {
        self.edit_path(id, |path| path.push_snapped(target, target_normal, snap_normal))
    }
}
