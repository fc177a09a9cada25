//! Minimal scene graph for loaded lab assets
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. Removing a
//! node only detaches it; ids stay valid so handles resolved earlier never
//! dangle.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Local-space axis-aligned box of a node's own geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl LocalBounds {
    pub fn from_half_extents(half: Vec3) -> Self {
        Self { min: -half, max: half }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// World-space AABB of these bounds under `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> LocalBounds {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        LocalBounds { min, max }
    }

    pub fn union(&self, other: &LocalBounds) -> LocalBounds {
        LocalBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub bounds: Option<LocalBounds>,
    pub color: [f32; 4],
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Animation clip metadata carried by an asset
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    pub duration: f32,
}

#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    root: NodeId,
    pub clips: Vec<ClipInfo>,
}

impl SceneGraph {
    pub fn new(root_name: &str) -> Self {
        let root = SceneNode {
            name: root_name.to_string(),
            transform: Transform::IDENTITY,
            bounds: None,
            color: [1.0; 4],
            visible: true,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            clips: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node under `parent`
    pub fn add(&mut self, parent: NodeId, name: &str, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.to_string(),
            transform,
            bounds: None,
            color: [0.8, 0.8, 0.8, 1.0],
            visible: true,
            parent: None,
            children: Vec::new(),
        });
        self.attach(parent, id);
        id
    }

    /// Create a node with box geometry
    pub fn add_box(&mut self, parent: NodeId, name: &str, center: Vec3, half_extents: Vec3, color: [f32; 4]) -> NodeId {
        let id = self.add(parent, name, Transform::from_translation(center));
        if let Some(node) = self.node_mut(id) {
            node.bounds = Some(LocalBounds::from_half_extents(half_extents));
            node.color = color;
        }
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    /// Detach `child` from its parent. Returns false if it had none.
    pub fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = None;
        }
        true
    }

    /// Move `child` under `new_parent`, keeping its local transform
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) {
        self.detach(child);
        self.attach(new_parent, child);
    }

    /// Child of `parent` at `index` in current order
    pub fn child_at(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        self.node(parent)?.children.get(index).copied()
    }

    /// Remove the child at `index` from `parent`. Later children shift down.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let child = self.child_at(parent, index)?;
        self.detach(child);
        Some(child)
    }

    /// First attached node with this name, searching depth first from the root
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id)?;
            if node.name == name {
                return Some(id);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else { break };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// World-space bounds of a node and everything below it
    pub fn world_bounds(&self, id: NodeId) -> Option<LocalBounds> {
        let mut result: Option<LocalBounds> = None;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.node(current) else { continue };
            if let Some(bounds) = node.bounds {
                let world = bounds.transformed(&self.world_matrix(current));
                result = Some(match result {
                    Some(acc) => acc.union(&world),
                    None => world,
                });
            }
            stack.extend(node.children.iter().copied());
        }
        result
    }

    /// Visit every attached, visible node that carries geometry
    pub fn visible_geometry(&self) -> Vec<(NodeId, LocalBounds, [f32; 4])> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if !node.visible {
                continue;
            }
            if let Some(bounds) = node.bounds {
                out.push((id, bounds.transformed(&self.world_matrix(id)), node.color));
            }
            stack.extend(node.children.iter().copied());
        }
        out
    }
}

/// Versioned fallback table from handle names to child indices.
///
/// Assets are expected to expose named nodes. When a name is absent the
/// schema's index for the asset version it was written against is used
/// instead.
#[derive(Debug, Clone)]
pub struct NodeSchema {
    pub version: u32,
    indices: HashMap<String, usize>,
}

impl NodeSchema {
    pub fn new(version: u32, entries: &[(&str, usize)]) -> Self {
        Self {
            version,
            indices: entries.iter().map(|(name, index)| (name.to_string(), *index)).collect(),
        }
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Resolve `name` under `parent`: by name first, then by schema index.
    pub fn resolve(&self, graph: &SceneGraph, parent: NodeId, name: &str) -> Option<NodeId> {
        if let Some(id) = graph.find_by_name(name) {
            return Some(id);
        }
        let index = self.index_of(name)?;
        let id = graph.child_at(parent, index);
        if id.is_some() {
            log::debug!("node '{}' resolved by schema v{} index {}", name, self.version, index);
        }
        id
    }

    /// Schema entries that resolve neither by name nor by index
    pub fn missing(&self, graph: &SceneGraph, parent: NodeId) -> Vec<String> {
        let mut missing: Vec<String> = self
            .indices
            .keys()
            .filter(|name| self.resolve(graph, parent, name).is_none())
            .cloned()
            .collect();
        missing.sort();
        missing
    }

    /// Check every schema entry resolves. Debug builds fail loudly; release
    /// builds log and carry on with whatever did resolve.
    pub fn validate(&self, graph: &SceneGraph, parent: NodeId) -> bool {
        let missing = self.missing(graph, parent);
        if missing.is_empty() {
            return true;
        }
        log::warn!("asset does not match node schema v{}: missing {:?}", self.version, missing);
        debug_assert!(false, "asset does not match node schema v{}: missing {:?}", self.version, missing);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SceneGraph, Vec<NodeId>) {
        let mut graph = SceneGraph::new("scene");
        let root = graph.root();
        let ids = (0..4)
            .map(|i| {
                graph.add_box(
                    root,
                    &format!("part_{}", i),
                    Vec3::new(i as f32, 0.0, 0.0),
                    Vec3::splat(0.5),
                    [1.0; 4],
                )
            })
            .collect();
        (graph, ids)
    }

    #[test]
    fn test_remove_child_shifts_indices() {
        let (mut graph, ids) = sample();
        let root = graph.root();
        assert_eq!(graph.remove_child_at(root, 0), Some(ids[0]));
        assert_eq!(graph.child_at(root, 0), Some(ids[1]));
        assert_eq!(graph.child_at(root, 3), None);
        assert!(!graph.is_attached(ids[0]));
    }

    #[test]
    fn test_reparent_into_group() {
        let (mut graph, ids) = sample();
        let root = graph.root();
        let group = graph.add(root, "group", Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)));
        graph.reparent(ids[2], group);
        graph.reparent(ids[3], group);

        assert_eq!(graph.node(group).unwrap().children(), &[ids[2], ids[3]]);
        let bounds = graph.world_bounds(group).unwrap();
        assert!((bounds.min - Vec3::new(1.5, 1.5, -0.5)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(3.5, 2.5, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_find_by_name_ignores_detached() {
        let (mut graph, ids) = sample();
        assert_eq!(graph.find_by_name("part_1"), Some(ids[1]));
        graph.detach(ids[1]);
        assert_eq!(graph.find_by_name("part_1"), None);
    }

    #[test]
    fn test_schema_falls_back_to_index() {
        let (graph, ids) = sample();
        let schema = NodeSchema::new(2, &[("beaker", 2), ("part_0", 9)]);
        let root = graph.root();
        assert_eq!(schema.resolve(&graph, root, "beaker"), Some(ids[2]));
        // Name wins over a stale index
        assert_eq!(schema.resolve(&graph, root, "part_0"), Some(ids[0]));
        assert_eq!(schema.resolve(&graph, root, "missing"), None);
    }

    #[test]
    fn test_schema_validation_reports_missing() {
        let (graph, _) = sample();
        let schema = NodeSchema::new(1, &[("part_1", 1), ("ring", 7)]);
        assert_eq!(schema.missing(&graph, graph.root()), vec!["ring".to_string()]);
    }

    #[test]
    fn test_hidden_nodes_are_skipped() {
        let (mut graph, ids) = sample();
        graph.node_mut(ids[1]).unwrap().visible = false;
        let visible: Vec<NodeId> = graph.visible_geometry().into_iter().map(|(id, _, _)| id).collect();
        assert_eq!(visible.len(), 3);
        assert!(!visible.contains(&ids[1]));
    }
}
