//! Arena-backed scene graph.
//!
//! Nodes live in a flat vector and refer to each other through [`NodeId`]
//! handles. Each node carries its local [`TransformState`], [`RenderState`]
//! and [`RenderEffects`].

use cullfx_core::{Error, Result};
use tracing::{debug, warn};

use crate::effect::EffectHandle;
use crate::effects::RenderEffects;
use crate::render_state::RenderState;
use crate::transform::TransformState;

/// Handle to a node in a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A single node of the scene graph.
#[derive(Debug)]
pub struct SceneNode {
    name: String,
    transform: TransformState,
    state: RenderState,
    effects: RenderEffects,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            transform: TransformState::identity(),
            state: RenderState::empty(),
            effects: RenderEffects::empty(),
            parent,
            children: Vec::new(),
        }
    }

    /// Node name, for diagnostics and lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Local transform relative to the parent.
    pub fn transform(&self) -> &TransformState {
        &self.transform
    }

    /// Local render state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Effects attached to this node.
    pub fn effects(&self) -> &RenderEffects {
        &self.effects
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A tree of [`SceneNode`]s with a single root.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Create a graph holding only a root node named `"root"`.
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::new("root".to_string(), None)],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A graph always has its root, so it is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append a new child under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        self.node_mut(parent)?.children.push(id);
        let node = SceneNode::new(name.into(), Some(parent));
        debug!("Added node '{}' under '{}'", node.name, self.nodes[parent.0].name);
        self.nodes.push(node);
        Ok(id)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(id.0).ok_or(Error::NodeNotFound(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(id.0).ok_or(Error::NodeNotFound(id.0))
    }

    /// Find the first node with the given name, in insertion order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Replace a node's local transform.
    pub fn set_transform(&mut self, id: NodeId, transform: TransformState) -> Result<()> {
        self.node_mut(id)?.transform = transform;
        Ok(())
    }

    /// Replace a node's local render state.
    pub fn set_state(&mut self, id: NodeId, state: RenderState) -> Result<()> {
        self.node_mut(id)?.state = state;
        Ok(())
    }

    /// Add an effect to a node, replacing any effect of the same kind.
    pub fn add_effect(&mut self, id: NodeId, effect: EffectHandle) -> Result<()> {
        let node = self.node_mut(id)?;
        node.effects = node.effects.add_effect(effect);
        debug!("Node '{}' effects now {}", node.name, node.effects);
        Ok(())
    }

    /// Apply `xform` on top of a node's local transform.
    ///
    /// Refused when any of the node's effects is not safe to transform, since
    /// such an effect would overwrite the result on the next cull pass.
    pub fn xform(&mut self, id: NodeId, xform: &TransformState) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.effects.safe_to_transform() {
            warn!("Refusing to transform node '{}': {}", node.name, node.effects);
            return Err(Error::UnsafeTransform {
                node: node.name.clone(),
                effects: node.effects.to_string(),
            });
        }
        node.transform = xform.compose(&node.transform);
        Ok(())
    }

    /// Net transform of a node: the composition of every local transform from
    /// the root down to and including `id`.
    ///
    /// Effects that adjust transforms are applied at each level, exactly as
    /// the cull traversal would see them.
    pub fn net_transform(&self, id: NodeId) -> Result<TransformState> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id)?;
            path.push(node);
            current = node.parent;
        }

        let mut net = TransformState::identity();
        for node in path.into_iter().rev() {
            let mut transform = node.transform.clone();
            if node.effects.has_adjust_transform() {
                node.effects.adjust_transform(&mut net, &mut transform, node);
            }
            net = net.compose(&transform);
        }
        Ok(net)
    }

    /// Infallible lookup for ids handed out by this graph.
    pub(crate) fn get(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
