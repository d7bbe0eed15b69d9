//! Boolean dataflow between cables.
//!
//! Each cable is a node holding its own activation flag. A node with a
//! combinator other than [`Combinator::None`] derives its flag from the
//! nodes it extends; changes cascade to observers synchronously.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::Deserialize;

use crate::error::GraphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CableId(pub u32);

impl fmt::Display for CableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Combinator {
    /// Flag is set directly and ignores upstreams.
    #[default]
    None,
    Or,
    And,
    /// Mirrors exactly one upstream.
    Passthrough,
    Unknown,
}

impl Combinator {
    pub fn is_settable(self) -> bool {
        self == Combinator::None
    }
}

impl From<&str> for Combinator {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "none" => Combinator::None,
            "or" => Combinator::Or,
            "and" => Combinator::And,
            "passthrough" => Combinator::Passthrough,
            _ => Combinator::Unknown,
        }
    }
}

impl From<String> for Combinator {
    fn from(name: String) -> Self {
        Combinator::from(name.as_str())
    }
}

#[derive(Debug, Clone)]
struct Node {
    combinator: Combinator,
    active: bool,
    extends: Vec<CableId>,
}

#[derive(Debug, Default)]
pub struct ActivationGraph {
    nodes: HashMap<CableId, Node>,
    observers: HashMap<CableId, BTreeSet<CableId>>,
    next_id: u32,
}

impl ActivationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unlinked node. `active` is only kept for [`Combinator::None`];
    /// derived nodes start from what their combinator gives with no
    /// upstreams.
    pub fn add_node(&mut self, combinator: Combinator, active: bool) -> CableId {
        let id = CableId(self.next_id);
        self.next_id += 1;
        // a passthrough without its upstream yet is expected here, stay quiet
        let active = fold_upstreams(combinator, active, &[]).unwrap_or(true);
        self.nodes.insert(
            id,
            Node {
                combinator,
                active,
                extends: Vec::new(),
            },
        );
        id
    }

    pub fn contains(&self, id: CableId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_active(&self, id: CableId) -> Option<bool> {
        self.nodes.get(&id).map(|node| node.active)
    }

    pub fn combinator(&self, id: CableId) -> Option<Combinator> {
        self.nodes.get(&id).map(|node| node.combinator)
    }

    pub fn upstreams(&self, id: CableId) -> &[CableId] {
        self.nodes
            .get(&id)
            .map(|node| node.extends.as_slice())
            .unwrap_or(&[])
    }

    pub fn observers(&self, id: CableId) -> impl Iterator<Item = CableId> + '_ {
        self.observers.get(&id).into_iter().flatten().copied()
    }

    /// Value `id` should hold given its upstreams right now. Upstream ids
    /// that are no longer in the graph are skipped.
    pub fn evaluate(&self, id: CableId) -> Option<bool> {
        let node = self.nodes.get(&id)?;
        let inputs: Vec<bool> = node
            .extends
            .iter()
            .filter_map(|up| self.nodes.get(up))
            .map(|up| up.active)
            .collect();
        let value = fold_upstreams(node.combinator, node.active, &inputs).unwrap_or_else(|| {
            match node.combinator {
                Combinator::Passthrough => log::error!(
                    "passthrough cable {id} needs exactly one upstream, has {}",
                    inputs.len()
                ),
                _ => log::error!("cable {id} has an unknown combinator type"),
            }
            true
        });
        Some(value)
    }

    /// Re-evaluates `id` and stores the result. Returns whether it changed.
    pub fn recompute(&mut self, id: CableId) -> Result<bool, GraphError> {
        let value = self.evaluate(id).ok_or(GraphError::UnknownNode(id))?;
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownNode(id))?;
        let changed = node.active != value;
        node.active = value;
        Ok(changed)
    }

    pub fn set_active(&mut self, id: CableId, active: bool) -> Result<(), GraphError> {
        self.set_active_with(id, active, |_, _| {})
    }

    /// Sets a directly-driven node. `on_change` fires for `id` and then for
    /// every downstream node whose value flips, once each.
    pub fn set_active_with<F>(
        &mut self,
        id: CableId,
        active: bool,
        mut on_change: F,
    ) -> Result<(), GraphError>
    where
        F: FnMut(CableId, bool),
    {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::UnknownNode(id))?;
        if !node.combinator.is_settable() {
            return Err(GraphError::NotSettable(id));
        }
        if node.active == active {
            return Ok(());
        }
        node.active = active;
        on_change(id, active);
        let dirty = self.observers(id).collect();
        self.cascade(dirty, &mut on_change);
        Ok(())
    }

    /// Called when something `id` depends on changed outside of a cascade.
    pub fn on_upstream_changed<F>(
        &mut self,
        id: CableId,
        mut on_change: F,
    ) -> Result<(), GraphError>
    where
        F: FnMut(CableId, bool),
    {
        if !self.contains(id) {
            return Err(GraphError::UnknownNode(id));
        }
        self.cascade(BTreeSet::from([id]), &mut on_change);
        Ok(())
    }

    pub fn add_upstream(&mut self, node: CableId, upstream: CableId) -> Result<(), GraphError> {
        self.add_upstream_with(node, upstream, |_, _| {})
    }

    /// Makes `node` extend `upstream`. Adding an existing edge is a no-op;
    /// edges that would close a loop are refused and leave the graph as is.
    pub fn add_upstream_with<F>(
        &mut self,
        node: CableId,
        upstream: CableId,
        mut on_change: F,
    ) -> Result<(), GraphError>
    where
        F: FnMut(CableId, bool),
    {
        if !self.contains(node) {
            return Err(GraphError::UnknownNode(node));
        }
        if !self.contains(upstream) {
            return Err(GraphError::UnknownNode(upstream));
        }
        if node == upstream {
            return Err(GraphError::SelfEdge(node));
        }
        if self.upstreams(node).contains(&upstream) {
            return Ok(());
        }
        if self.reaches(node, upstream) {
            return Err(GraphError::Cycle { node, upstream });
        }

        if let Some(entry) = self.nodes.get_mut(&node) {
            entry.extends.push(upstream);
        }
        self.observers.entry(upstream).or_default().insert(node);
        self.cascade(BTreeSet::from([node]), &mut on_change);
        Ok(())
    }

    pub fn remove_upstream(
        &mut self,
        node: CableId,
        upstream: CableId,
    ) -> Result<bool, GraphError> {
        self.remove_upstream_with(node, upstream, |_, _| {})
    }

    /// Returns whether the edge existed.
    pub fn remove_upstream_with<F>(
        &mut self,
        node: CableId,
        upstream: CableId,
        mut on_change: F,
    ) -> Result<bool, GraphError>
    where
        F: FnMut(CableId, bool),
    {
        let entry = self.nodes.get_mut(&node).ok_or(GraphError::UnknownNode(node))?;
        let before = entry.extends.len();
        entry.extends.retain(|id| *id != upstream);
        if entry.extends.len() == before {
            return Ok(false);
        }
        self.unobserve(upstream, node);
        self.cascade(BTreeSet::from([node]), &mut on_change);
        Ok(true)
    }

    pub fn remove_node(&mut self, id: CableId) -> Result<(), GraphError> {
        self.remove_node_with(id, |_, _| {})
    }

    /// Drops `id` and every edge touching it; former observers re-evaluate
    /// without it.
    pub fn remove_node_with<F>(&mut self, id: CableId, mut on_change: F) -> Result<(), GraphError>
    where
        F: FnMut(CableId, bool),
    {
        let node = self.nodes.remove(&id).ok_or(GraphError::UnknownNode(id))?;
        for upstream in &node.extends {
            self.unobserve(*upstream, id);
        }
        let former = self.observers.remove(&id).unwrap_or_default();
        for observer in &former {
            if let Some(entry) = self.nodes.get_mut(observer) {
                entry.extends.retain(|up| *up != id);
            }
        }
        self.cascade(former, &mut on_change);
        Ok(())
    }

    fn unobserve(&mut self, upstream: CableId, observer: CableId) {
        if let Some(set) = self.observers.get_mut(&upstream) {
            set.remove(&observer);
            if set.is_empty() {
                self.observers.remove(&upstream);
            }
        }
    }

    /// Whether `to` is downstream of (or equal to) `from`.
    fn reaches(&self, from: CableId, to: CableId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == to {
                return true;
            }
            if visited.insert(id) {
                stack.extend(self.observers(id));
            }
        }
        false
    }

    /// Re-evaluates the `dirty` nodes and whatever they feed, in dependency
    /// order, so every node is evaluated at most once with final inputs.
    /// Nodes whose value holds do not dirty their observers.
    fn cascade<F>(&mut self, mut dirty: BTreeSet<CableId>, on_change: &mut F)
    where
        F: FnMut(CableId, bool),
    {
        for id in self.downstream_order(&dirty) {
            if !dirty.remove(&id) {
                continue;
            }
            match self.recompute(id) {
                Ok(true) => {
                    let active = self.nodes[&id].active;
                    on_change(id, active);
                    dirty.extend(self.observers(id));
                }
                Ok(false) => {}
                Err(err) => log::warn!("skipping {id} during propagation: {err}"),
            }
        }
    }

    /// Reverse post-order of a depth-first walk over observer edges.
    fn downstream_order(&self, roots: &BTreeSet<CableId>) -> Vec<CableId> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        for &root in roots {
            self.visit(root, &mut visited, &mut order);
        }
        order.reverse();
        order
    }

    fn visit(&self, id: CableId, visited: &mut HashSet<CableId>, order: &mut Vec<CableId>) {
        if !visited.insert(id) {
            return;
        }
        let observers: Vec<CableId> = self.observers(id).collect();
        for observer in observers.into_iter().rev() {
            self.visit(observer, visited, order);
        }
        order.push(id);
    }
}

/// Folds upstream values. `None` marks a misconfigured node, which callers
/// treat as active.
fn fold_upstreams(combinator: Combinator, own: bool, inputs: &[bool]) -> Option<bool> {
    match combinator {
        Combinator::None => Some(own),
        Combinator::Or => Some(inputs.iter().any(|active| *active)),
        Combinator::And => Some(inputs.iter().all(|active| *active)),
        Combinator::Passthrough => match inputs {
            [single] => Some(*single),
            _ => None,
        },
        Combinator::Unknown => None,
    }
}
