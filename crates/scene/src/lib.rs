//! Scene graph, render effects and cull traversal.
//!
//! This crate provides:
//! - Immutable transform and render-state values
//! - The [`RenderEffect`] contract and canonical [`RenderEffects`] sets
//! - An arena-backed scene graph
//! - A depth-first cull traverser that invokes effect hooks

pub mod cull;
pub mod effect;
pub mod effects;
pub mod graph;
pub mod render_state;
pub mod transform;

pub use cull::{CullTraverser, CullTraverserData, CulledNode};
pub use effect::{EffectHandle, RenderEffect};
pub use effects::RenderEffects;
pub use graph::{NodeId, SceneGraph, SceneNode};
pub use render_state::RenderState;
pub use transform::TransformState;
