//! Depth-first cull traversal.
//!
//! [`CullTraverser::traverse`] walks the graph from the root. At each node the
//! local transform and state are handed to the node's effects through
//! [`RenderEffects::cull_callback`](crate::RenderEffects::cull_callback)
//! before being composed into the net transform and state, which are then
//! passed down to the children.

use tracing::{debug, trace};

use crate::graph::{NodeId, SceneGraph, SceneNode};
use crate::render_state::RenderState;
use crate::transform::TransformState;

/// Per-node traversal data: the node being visited and the net transform and
/// state accumulated above it.
#[derive(Debug)]
pub struct CullTraverserData<'a> {
    node: &'a SceneNode,
    net_transform: TransformState,
    net_state: RenderState,
}

impl<'a> CullTraverserData<'a> {
    /// Data for visiting `node` below the given net transform and state.
    pub fn new(
        node: &'a SceneNode,
        net_transform: TransformState,
        net_state: RenderState,
    ) -> Self {
        Self {
            node,
            net_transform,
            net_state,
        }
    }

    /// The node being visited.
    pub fn node(&self) -> &'a SceneNode {
        self.node
    }

    /// Net transform of the parent, not yet including this node.
    pub fn net_transform(&self) -> &TransformState {
        &self.net_transform
    }

    /// Net state of the parent, not yet including this node.
    pub fn net_state(&self) -> &RenderState {
        &self.net_state
    }
}

/// A node as seen by the cull pass, after effects were applied.
#[derive(Clone, Debug, PartialEq)]
pub struct CulledNode {
    /// Node handle
    pub node: NodeId,
    /// Node name, copied for diagnostics
    pub name: String,
    /// Net transform including this node
    pub net_transform: TransformState,
    /// Net state including this node
    pub net_state: RenderState,
}

/// Cull traversal context, reused across passes.
#[derive(Debug, Default)]
pub struct CullTraverser {
    pass: u64,
    results: Vec<CulledNode>,
}

impl CullTraverser {
    /// Create a traverser that has not run any pass yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed passes.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Nodes visited by the last pass, in depth-first order.
    pub fn results(&self) -> &[CulledNode] {
        &self.results
    }

    /// Result of the last pass for a given node.
    pub fn result_for(&self, id: NodeId) -> Option<&CulledNode> {
        self.results.iter().find(|r| r.node == id)
    }

    /// Run one cull pass over `graph`.
    pub fn traverse(&mut self, graph: &SceneGraph) -> &[CulledNode] {
        self.results.clear();
        self.traverse_below(
            graph,
            graph.root(),
            &TransformState::identity(),
            &RenderState::empty(),
        );
        self.pass += 1;
        debug!("Cull pass {} visited {} nodes", self.pass, self.results.len());
        &self.results
    }

    fn traverse_below(
        &mut self,
        graph: &SceneGraph,
        id: NodeId,
        net_transform: &TransformState,
        net_state: &RenderState,
    ) {
        let node = graph.get(id);
        let data = CullTraverserData::new(node, net_transform.clone(), net_state.clone());

        let mut node_transform = node.transform().clone();
        let node_state = node.state().clone();
        let effects = node.effects();
        if effects.has_cull_callback() {
            effects.cull_callback(self, &data, &mut node_transform, &node_state);
        }

        let net_transform = data.net_transform().compose(&node_transform);
        let net_state = data.net_state().compose(&node_state);
        trace!("Culled '{}' at {}", node.name(), net_transform);

        self.results.push(CulledNode {
            node: id,
            name: node.name().to_string(),
            net_transform: net_transform.clone(),
            net_state: net_state.clone(),
        });

        for &child in node.children() {
            self.traverse_below(graph, child, &net_transform, &net_state);
        }
    }
}
