//! Arena-backed transform trees
//!
//! A `Model` owns every node of one renderable entity. Nodes are addressed
//! by `NodeId` and keep their parent/children links inside the arena, so
//! animation code can hold ids across frames without borrowing the tree.
//! Removing a subtree releases its geometry; shared materials are only
//! released when their last reference goes away. Freed slots are reused by
//! later insertions, so a model that keeps attaching and detaching parts
//! does not grow.

use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::Geometry;
use crate::instanced::InstancedBatch;
use crate::material::Material;
use crate::SceneError;

/// Index of a node inside its `Model`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Local transform: position, Euler rotation and non-uniform scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub euler_order: EulerRot,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        euler_order: EulerRot::XYZ,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            self.euler_order,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Single mesh: geometry owned by the node, material possibly shared
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Arc<Material>,
}

/// What a node draws, if anything
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NodeContent {
    #[default]
    Group,
    Mesh(Mesh),
    Instanced(InstancedBatch),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub visible: bool,
    pub content: NodeContent,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group() -> Self {
        Self {
            name: None,
            transform: Transform::IDENTITY,
            visible: true,
            content: NodeContent::Group,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(geometry: Geometry, material: Arc<Material>) -> Self {
        Self {
            content: NodeContent::Mesh(Mesh { geometry, material }),
            ..Self::group()
        }
    }

    pub fn instanced(batch: InstancedBatch) -> Self {
        Self {
            content: NodeContent::Instanced(batch),
            ..Self::group()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_euler_order(mut self, order: EulerRot) -> Self {
        self.transform.euler_order = order;
        self
    }

    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Resources released by a disposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisposeReport {
    pub nodes: usize,
    pub geometries: usize,
    pub materials: usize,
}

impl DisposeReport {
    pub fn is_empty(&self) -> bool {
        self.nodes == 0
    }

    fn merge(&mut self, other: DisposeReport) {
        self.nodes += other.nodes;
        self.geometries += other.geometries;
        self.materials += other.materials;
    }
}

/// Tree of nodes rooted at a single group
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    nodes: Vec<Option<Node>>,
    /// Slots emptied by removals, reused last-freed first
    free: Vec<usize>,
    root: NodeId,
}

impl Model {
    /// Create a model whose root group carries `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Some(Node::group().named(name))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self) -> Option<&str> {
        self.node(self.root).and_then(|n| n.name.as_deref())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Shorthand for the mutable transform of a live node
    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|n| &mut n.transform)
    }

    pub fn root_transform(&self) -> &Transform {
        // Root is never removed
        &self.nodes[self.root.0]
            .as_ref()
            .expect("model root is always present")
            .transform
    }

    pub fn root_transform_mut(&mut self) -> &mut Transform {
        &mut self.nodes[self.root.0]
            .as_mut()
            .expect("model root is always present")
            .transform
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Append `node` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = NodeId(self.next_slot());
        self.nodes[id.0] = Some(node);
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Append `node` under the root.
    pub fn add(&mut self, node: Node) -> NodeId {
        let root = self.root;
        let mut node = node;
        node.parent = Some(root);
        node.children.clear();
        let id = NodeId(self.next_slot());
        self.nodes[id.0] = Some(node);
        if let Some(p) = self.node_mut(root) {
            p.children.push(id);
        }
        id
    }

    fn next_slot(&mut self) -> usize {
        match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.nodes.push(None);
                self.nodes.len() - 1
            }
        }
    }

    /// Move every node of `other` under `parent`. Returns the id that
    /// `other`'s root received in this model.
    pub fn graft(&mut self, parent: NodeId, other: Model) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::MissingNode(parent));
        }
        if !other.contains(other.root) {
            return Err(SceneError::MissingNode(other.root));
        }

        let mut slots = vec![None; other.nodes.len()];
        for (i, node) in other.nodes.iter().enumerate() {
            if node.is_some() {
                slots[i] = Some(NodeId(self.next_slot()));
            }
        }
        let remap = |id: NodeId| slots.get(id.0).copied().flatten();
        let grafted_root = remap(other.root).ok_or(SceneError::MissingNode(other.root))?;

        for (i, node) in other.nodes.into_iter().enumerate() {
            let (Some(mut node), Some(id)) = (node, slots[i]) else {
                continue;
            };
            node.parent = node.parent.and_then(remap);
            node.children = node.children.iter().filter_map(|c| remap(*c)).collect();
            self.nodes[id.0] = Some(node);
        }

        if let Some(root) = self.node_mut(grafted_root) {
            root.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(grafted_root);
        }
        Ok(grafted_root)
    }

    /// Remove `id` and all its descendants, releasing their resources.
    /// Removing an already-removed node is a no-op. The root cannot be
    /// removed; use `dispose` for the whole model.
    pub fn remove_subtree(&mut self, id: NodeId) -> DisposeReport {
        if id == self.root || !self.contains(id) {
            return DisposeReport::default();
        }
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.release(id)
    }

    fn release(&mut self, id: NodeId) -> DisposeReport {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return DisposeReport::default();
        };
        self.free.push(id.0);

        let mut report = DisposeReport {
            nodes: 1,
            ..Default::default()
        };
        match node.content {
            NodeContent::Group => {}
            NodeContent::Mesh(mesh) => {
                report.geometries += 1;
                if Arc::strong_count(&mesh.material) == 1 {
                    report.materials += 1;
                }
            }
            NodeContent::Instanced(batch) => {
                report.geometries += 1;
                if batch.material_is_unique() {
                    report.materials += 1;
                }
            }
        }

        for child in node.children {
            report.merge(self.release(child));
        }
        report
    }

    /// Release every node. The model is left with a bare root.
    pub fn dispose(&mut self) -> DisposeReport {
        let children = self
            .node(self.root)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        let mut report = DisposeReport::default();
        for child in children {
            report.merge(self.remove_subtree(child));
        }
        report
    }

    /// First live node carrying `name`, searched in slot order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(i, n)| {
            n.as_ref()
                .filter(|n| n.name.as_deref() == Some(name))
                .map(|_| NodeId(i))
        })
    }

    /// First node named `name` within the subtree rooted at `under`
    pub fn find_in_subtree(&self, under: NodeId, name: &str) -> Option<NodeId> {
        let node = self.node(under)?;
        if node.name.as_deref() == Some(name) {
            return Some(under);
        }
        node.children
            .iter()
            .find_map(|c| self.find_in_subtree(*c, name))
    }

    /// Transform from node-local space to model space (root included)
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.node(id)?;
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.w_axis.truncate())
    }

    /// Whether the node and all its ancestors are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.node(cid) {
                Some(n) if n.visible => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    /// Iterate live nodes with their ids
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i), n)))
    }
}
