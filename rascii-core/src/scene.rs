//! Scene graph
//!
//! Nodes live in one arena owned by [`SceneGraph`] and refer to each other by
//! [`NodeId`]. A parent owns the ordered list of its children; the child's
//! `parent` id is a lookup-only back reference. Node 0 is the root: it has no
//! parent and starts with an identity transform.
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::geometry::Mesh;
use crate::math::Mat4;
use crate::transform::Transform;

/// Handle to a node inside one [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A transform node, optionally carrying a mesh to render
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub transform: Transform,
    pub mesh: Option<Rc<Mesh>>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_deref()
    }

    /// Matrix of this node alone, ignoring its ancestors.
    pub fn local_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}

/// A tree of transform nodes rooted at [`NodeId::ROOT`]
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::default()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a node with no parent. It is not visited until attached with
    /// [`SceneGraph::add_child`].
    pub fn create_node(&mut self, transform: Transform, mesh: Option<Rc<Mesh>>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            parent: None,
            children: Vec::new(),
            transform,
            mesh,
        });
        id
    }

    /// Append `child` to `parent`'s children.
    ///
    /// A node can be attached once; the root can never become a child.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        if self.node(child)?.parent.is_some() {
            return Err(Error::AlreadyParented(child));
        }
        if child == NodeId::ROOT || self.is_ancestor_or_self(child, parent) {
            return Err(Error::CycleDetected { parent, child });
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        Ok(())
    }

    /// Create a node and attach it under `parent` in one step.
    pub fn spawn(
        &mut self,
        parent: NodeId,
        transform: Transform,
        mesh: Option<Rc<Mesh>>,
    ) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.create_node(transform, mesh);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(id.0).ok_or(Error::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(id.0).ok_or(Error::NodeNotFound(id))
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform> {
        Ok(&mut self.node_mut(id)?.transform)
    }

    /// Composite matrix of `id`: `parent_world * local`, walking up to the root.
    pub fn world_transform(&self, id: NodeId) -> Result<Mat4> {
        let mut chain = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            chain.push(parent);
            current = self.node(parent)?;
        }

        Ok(chain
            .iter()
            .rev()
            .fold(Mat4::identity(), |world, node| {
                world * self.nodes[node.0].local_matrix()
            }))
    }

    /// Pre-order, depth-first walk from the root. Children come in insertion order.
    pub fn iter(&self) -> SceneIter<'_> {
        SceneIter {
            graph: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Same walk as [`SceneGraph::iter`], starting at `id`.
    pub fn iter_from(&self, id: NodeId) -> Result<SceneIter<'_>> {
        self.node(id)?;
        Ok(SceneIter {
            graph: self,
            stack: vec![id],
        })
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.nodes[node.0].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a SceneGraph {
    type Item = (NodeId, &'a SceneNode);
    type IntoIter = SceneIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy pre-order traversal over a [`SceneGraph`]
pub struct SceneIter<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for SceneIter<'a> {
    type Item = (NodeId, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.graph.nodes[id.0];
        // reversed so the first child is popped first
        self.stack.extend(node.children.iter().rev());
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Quat, QuatExt};
    use nalgebra::Vector3;

    #[test]
    fn test_root_is_identity() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 1);
        assert!(graph.node(graph.root()).unwrap().parent().is_none());
        let world = graph.world_transform(NodeId::ROOT).unwrap();
        assert!((world - Mat4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_three_level_world_transform() {
        let mut graph = SceneGraph::new();
        *graph.transform_mut(NodeId::ROOT).unwrap() = Transform::from_position(0.0, 1.0, 0.0)
            .with_rotation(Quat::axis_angle(&Vector3::y_axis(), 0.4).unwrap());

        let a_local = Transform::from_position(2.0, 0.0, -3.0)
            .with_rotation(Quat::axis_angle(&Vector3::new(1.0, 0.0, 1.0), 0.9).unwrap())
            .with_scale(1.5, 1.5, 1.5);
        let b_local = Transform::from_position(-1.0, 4.0, 0.5)
            .with_rotation(Quat::euler(0.2, -0.7, 1.3))
            .with_scale(0.5, 2.0, 1.0);

        let a = graph.spawn(NodeId::ROOT, a_local, None).unwrap();
        let b = graph.spawn(a, b_local, None).unwrap();

        let root_local = graph.node(NodeId::ROOT).unwrap().local_matrix();
        let expected = root_local * a_local.matrix() * b_local.matrix();
        let world = graph.world_transform(b).unwrap();
        assert!((world - expected).norm() < 1e-4);

        // repeated queries agree
        assert_eq!(world, graph.world_transform(b).unwrap());
    }

    #[test]
    fn test_preorder_traversal() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn(NodeId::ROOT, Transform::identity(), None).unwrap();
        let b = graph.spawn(NodeId::ROOT, Transform::identity(), None).unwrap();
        let a1 = graph.spawn(a, Transform::identity(), None).unwrap();
        let a2 = graph.spawn(a, Transform::identity(), None).unwrap();
        let b1 = graph.spawn(b, Transform::identity(), None).unwrap();
        let a1x = graph.spawn(a1, Transform::identity(), None).unwrap();

        let order: Vec<NodeId> = graph.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![NodeId::ROOT, a, a1, a1x, a2, b, b1]);

        // a fresh iterator restarts at the root
        let again: Vec<NodeId> = (&graph).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, again);

        let subtree: Vec<NodeId> = graph.iter_from(a).unwrap().map(|(id, _)| id).collect();
        assert_eq!(subtree, vec![a, a1, a1x, a2]);
    }

    #[test]
    fn test_detached_nodes_are_not_visited() {
        let mut graph = SceneGraph::new();
        let loose = graph.create_node(Transform::identity(), Some(Rc::new(Mesh::cube(1.0))));
        assert_eq!(graph.iter().count(), 1);

        graph.add_child(NodeId::ROOT, loose).unwrap();
        assert_eq!(graph.iter().count(), 2);
        assert_eq!(graph.node(loose).unwrap().parent(), Some(NodeId::ROOT));
    }

    #[test]
    fn test_add_child_rejects_second_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn(NodeId::ROOT, Transform::identity(), None).unwrap();
        let b = graph.spawn(NodeId::ROOT, Transform::identity(), None).unwrap();
        assert_eq!(graph.add_child(b, a), Err(Error::AlreadyParented(a)));
        assert_eq!(graph.add_child(NodeId::ROOT, a), Err(Error::AlreadyParented(a)));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let top = graph.create_node(Transform::identity(), None);
        let below = graph.spawn(top, Transform::identity(), None).unwrap();

        assert_eq!(
            graph.add_child(below, top),
            Err(Error::CycleDetected { parent: below, child: top })
        );
        assert_eq!(
            graph.add_child(top, top),
            Err(Error::CycleDetected { parent: top, child: top })
        );
        assert_eq!(
            graph.add_child(top, NodeId::ROOT),
            Err(Error::CycleDetected { parent: top, child: NodeId::ROOT })
        );
    }

    #[test]
    fn test_unknown_node() {
        let mut graph = SceneGraph::new();
        let missing = NodeId(42);
        assert_eq!(graph.world_transform(missing), Err(Error::NodeNotFound(missing)));
        assert!(graph.spawn(missing, Transform::identity(), None).is_err());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_shared_mesh() {
        let mut graph = SceneGraph::new();
        let mesh = Rc::new(Mesh::centered_quad());
        let a = graph.spawn(NodeId::ROOT, Transform::identity(), Some(mesh.clone())).unwrap();
        let b = graph.spawn(NodeId::ROOT, Transform::identity(), Some(mesh.clone())).unwrap();
        assert_eq!(Rc::strong_count(&mesh), 3);
        assert_eq!(graph.node(a).unwrap().mesh().map(Mesh::triangle_count), Some(2));
        assert!(graph.node(b).unwrap().mesh().is_some());
        assert!(graph.node(NodeId::ROOT).unwrap().mesh().is_none());
    }
}
