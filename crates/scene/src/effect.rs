//! The render-effect contract.
//!
//! A [`RenderEffect`] is an immutable object attached to a scene node that the
//! cull traversal queries through capability flags and invokes without knowing
//! its concrete kind. Effects are shared through [`EffectHandle`]s and never
//! change after construction, so the same handle may sit on many nodes.
//!
//! The traversal calls [`RenderEffect::cull_callback`] on every node whose
//! effects report [`RenderEffect::has_cull_callback`], before the node's local
//! transform is composed into the net transform. Effects that only rewrite
//! transforms implement [`RenderEffect::adjust_transform`] and rely on the
//! default `cull_callback`, which forwards to it with a throwaway net
//! transform.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::cull::{CullTraverser, CullTraverserData};
use crate::graph::SceneNode;
use crate::render_state::RenderState;
use crate::transform::TransformState;

/// Shared, immutable handle to an effect of any kind.
pub type EffectHandle = Arc<dyn RenderEffect>;

/// Behavior attached to a scene node and invoked during the cull traversal.
///
/// Capability predicates must be constant for a given effect: collections
/// cache them when they are built.
pub trait RenderEffect: Any + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Name of this effect kind, used for ordering and diagnostics.
    fn type_name(&self) -> &'static str;

    /// Returns true if external code may freely apply a transform to a node
    /// carrying this effect.
    fn safe_to_transform(&self) -> bool {
        true
    }

    /// Returns true if [`RenderEffect::cull_callback`] must be called for
    /// nodes carrying this effect.
    fn has_cull_callback(&self) -> bool {
        false
    }

    /// Called once per node per cull pass, before the node's transform and
    /// state are folded into the net transform and state.
    ///
    /// `node_transform` may be rebound to a new value. The default forwards to
    /// [`RenderEffect::adjust_transform`] when the effect supports it, passing
    /// a throwaway identity net transform whose result is discarded.
    fn cull_callback(
        &self,
        _trav: &mut CullTraverser,
        data: &CullTraverserData<'_>,
        node_transform: &mut TransformState,
        _node_state: &RenderState,
    ) {
        if self.has_adjust_transform() {
            let mut dummy_transform = TransformState::identity();
            self.adjust_transform(&mut dummy_transform, node_transform, data.node());
        }
    }

    /// Returns true if [`RenderEffect::adjust_transform`] is implemented, and
    /// therefore this effect changes the node's apparent transforms.
    fn has_adjust_transform(&self) -> bool {
        false
    }

    /// Rewrites the node's apparent net and/or local transform.
    ///
    /// Both transforms are in/out: either may be rebound to a new value or
    /// left untouched.
    fn adjust_transform(
        &self,
        _net_transform: &mut TransformState,
        _node_transform: &mut TransformState,
        _node: &SceneNode,
    ) {
    }

    /// Orders this effect against another effect of the *same* kind.
    ///
    /// Must be a total order. Only called with an effect of the same kind;
    /// callers holding effects of mixed kinds use `compare_to` on
    /// `dyn RenderEffect`, which orders by kind first.
    fn compare_to_impl(&self, other: &dyn RenderEffect) -> Ordering;
}

impl dyn RenderEffect {
    /// Runtime kind of this effect.
    pub fn kind(&self) -> TypeId {
        let any: &dyn Any = self;
        any.type_id()
    }

    /// Returns true if both effects are of the same concrete kind.
    pub fn same_kind(&self, other: &dyn RenderEffect) -> bool {
        self.kind() == other.kind()
    }

    /// Downcast to a concrete effect kind.
    pub fn downcast_ref<T: RenderEffect>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Orders effects by kind only.
    pub fn compare_kind(&self, other: &dyn RenderEffect) -> Ordering {
        self.type_name()
            .cmp(other.type_name())
            .then_with(|| self.kind().cmp(&other.kind()))
    }

    /// Total order over effects of any kind: by kind, then by the kind's own
    /// [`RenderEffect::compare_to_impl`].
    pub fn compare_to(&self, other: &dyn RenderEffect) -> Ordering {
        self.compare_kind(other)
            .then_with(|| self.compare_to_impl(other))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::graph::SceneGraph;
    use glam::Vec3;

    /// Test effect that offsets the node position and pushes the net transform.
    #[derive(Debug)]
    pub(crate) struct OffsetEffect {
        pub(crate) offset: Vec3,
    }

    impl OffsetEffect {
        pub(crate) fn make(offset: Vec3) -> EffectHandle {
            Arc::new(Self { offset })
        }
    }

    impl fmt::Display for OffsetEffect {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "OffsetEffect:{}", self.offset)
        }
    }

    impl RenderEffect for OffsetEffect {
        fn type_name(&self) -> &'static str {
            "OffsetEffect"
        }

        fn has_cull_callback(&self) -> bool {
            true
        }

        fn has_adjust_transform(&self) -> bool {
            true
        }

        fn adjust_transform(
            &self,
            net_transform: &mut TransformState,
            node_transform: &mut TransformState,
            _node: &SceneNode,
        ) {
            *node_transform = node_transform.with_position(node_transform.position() + self.offset);
            *net_transform = net_transform.with_scale(Vec3::splat(9.0));
        }

        fn compare_to_impl(&self, other: &dyn RenderEffect) -> Ordering {
            let other = other
                .downcast_ref::<Self>()
                .expect("compared against a different effect kind");
            self.offset
                .to_array()
                .partial_cmp(&other.offset.to_array())
                .unwrap_or(Ordering::Equal)
        }
    }

    /// Test effect that implements no optional capability.
    #[derive(Debug)]
    pub(crate) struct TagEffect(pub(crate) u32);

    impl fmt::Display for TagEffect {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "TagEffect:{}", self.0)
        }
    }

    impl RenderEffect for TagEffect {
        fn type_name(&self) -> &'static str {
            "TagEffect"
        }

        fn compare_to_impl(&self, other: &dyn RenderEffect) -> Ordering {
            let other = other
                .downcast_ref::<Self>()
                .expect("compared against a different effect kind");
            self.0.cmp(&other.0)
        }
    }

    #[test]
    fn test_default_capabilities() {
        let tag: EffectHandle = Arc::new(TagEffect(1));
        assert!(tag.safe_to_transform());
        assert!(!tag.has_cull_callback());
        assert!(!tag.has_adjust_transform());
    }

    #[test]
    fn test_default_cull_callback_discards_net_transform() {
        let graph = SceneGraph::new();
        let root = graph.node(graph.root()).expect("root exists");
        let parent_net = TransformState::identity().with_position(Vec3::new(0.0, 0.0, 5.0));
        let data = CullTraverserData::new(root, parent_net.clone(), RenderState::empty());
        let mut trav = CullTraverser::new();

        let effect = OffsetEffect::make(Vec3::X);
        let mut node_transform = TransformState::identity();
        effect.cull_callback(&mut trav, &data, &mut node_transform, &RenderState::empty());

        assert_eq!(node_transform.position(), Vec3::X);
        // The throwaway net transform never reaches the traversal data.
        assert_eq!(data.net_transform(), &parent_net);
    }

    #[test]
    fn test_default_cull_callback_without_adjust_is_noop() {
        let graph = SceneGraph::new();
        let root = graph.node(graph.root()).expect("root exists");
        let data = CullTraverserData::new(
            root,
            TransformState::identity(),
            RenderState::empty(),
        );
        let mut trav = CullTraverser::new();

        let tag: EffectHandle = Arc::new(TagEffect(3));
        let original = TransformState::identity().with_position(Vec3::Y);
        let mut node_transform = original.clone();
        tag.cull_callback(&mut trav, &data, &mut node_transform, &RenderState::empty());

        assert!(node_transform.same_instance(&original));
    }

    #[test]
    fn test_compare_to_orders_by_kind_first() {
        let offset = OffsetEffect::make(Vec3::new(100.0, 0.0, 0.0));
        let tag: EffectHandle = Arc::new(TagEffect(0));

        assert_eq!(offset.compare_to(tag.as_ref()), Ordering::Less);
        assert_eq!(tag.compare_to(offset.as_ref()), Ordering::Greater);
        assert!(!offset.same_kind(tag.as_ref()));
    }

    #[test]
    fn test_compare_to_within_kind() {
        let a: EffectHandle = Arc::new(TagEffect(1));
        let b: EffectHandle = Arc::new(TagEffect(2));
        let a2: EffectHandle = Arc::new(TagEffect(1));

        assert_eq!(a.compare_to(a.as_ref()), Ordering::Equal);
        assert_eq!(a.compare_to(b.as_ref()), Ordering::Less);
        assert_eq!(b.compare_to(a.as_ref()), Ordering::Greater);
        assert_eq!(a.compare_to(a2.as_ref()), Ordering::Equal);
    }

    #[test]
    fn test_downcast() {
        let tag: EffectHandle = Arc::new(TagEffect(7));
        assert_eq!(tag.downcast_ref::<TagEffect>().map(|t| t.0), Some(7));
        assert!(tag.downcast_ref::<OffsetEffect>().is_none());
    }
}
