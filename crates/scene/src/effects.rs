//! Canonical, immutable collections of render effects.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::cull::{CullTraverser, CullTraverserData};
use crate::effect::{EffectHandle, RenderEffect};
use crate::graph::SceneNode;
use crate::render_state::RenderState;
use crate::transform::TransformState;

#[derive(Debug)]
struct EffectsData {
    /// Sorted by kind, at most one effect per kind.
    effects: Vec<EffectHandle>,
    safe_to_transform: bool,
    has_cull_callback: bool,
    has_adjust_transform: bool,
}

/// The set of effects attached to one node.
///
/// Holds at most one effect of each kind, kept in a canonical order so that
/// two collections with equivalent effects compare equal. Capability flags
/// are computed once when the collection is built.
#[derive(Clone, Debug)]
pub struct RenderEffects {
    inner: Arc<EffectsData>,
}

impl RenderEffects {
    /// An empty collection.
    pub fn empty() -> Self {
        Self::from_sorted(Vec::new())
    }

    /// Build a collection from arbitrary effects. When two effects share a
    /// kind, the later one wins.
    pub fn from_effects(effects: impl IntoIterator<Item = EffectHandle>) -> Self {
        let mut sorted: Vec<EffectHandle> = Vec::new();
        for effect in effects {
            insert_sorted(&mut sorted, effect);
        }
        Self::from_sorted(sorted)
    }

    /// A collection holding a single effect.
    pub fn single(effect: EffectHandle) -> Self {
        Self::from_sorted(vec![effect])
    }

    fn from_sorted(effects: Vec<EffectHandle>) -> Self {
        let safe_to_transform = effects.iter().all(|e| e.safe_to_transform());
        let has_cull_callback = effects.iter().any(|e| e.has_cull_callback());
        let has_adjust_transform = effects.iter().any(|e| e.has_adjust_transform());
        Self {
            inner: Arc::new(EffectsData {
                effects,
                safe_to_transform,
                has_cull_callback,
                has_adjust_transform,
            }),
        }
    }

    /// Return a new collection with `effect` added, replacing any effect of
    /// the same kind.
    pub fn add_effect(&self, effect: EffectHandle) -> Self {
        let mut effects = self.inner.effects.clone();
        insert_sorted(&mut effects, effect);
        Self::from_sorted(effects)
    }

    /// Return a new collection without any effect of kind `T`.
    pub fn remove_effect<T: RenderEffect>(&self) -> Self {
        let effects = self
            .inner
            .effects
            .iter()
            .filter(|e| e.downcast_ref::<T>().is_none())
            .cloned()
            .collect();
        Self::from_sorted(effects)
    }

    /// The effect of kind `T`, if present.
    pub fn get_effect<T: RenderEffect>(&self) -> Option<&T> {
        self.inner.effects.iter().find_map(|e| e.downcast_ref::<T>())
    }

    /// Number of effects in the collection.
    pub fn len(&self) -> usize {
        self.inner.effects.len()
    }

    /// Check whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.effects.is_empty()
    }

    /// Iterate over the effects in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &EffectHandle> {
        self.inner.effects.iter()
    }

    /// True if every effect is safe to transform.
    pub fn safe_to_transform(&self) -> bool {
        self.inner.safe_to_transform
    }

    /// True if any effect needs its cull callback invoked.
    pub fn has_cull_callback(&self) -> bool {
        self.inner.has_cull_callback
    }

    /// True if any effect adjusts transforms.
    pub fn has_adjust_transform(&self) -> bool {
        self.inner.has_adjust_transform
    }

    /// Invoke the cull callback of each effect that has one, in order.
    pub fn cull_callback(
        &self,
        trav: &mut CullTraverser,
        data: &CullTraverserData<'_>,
        node_transform: &mut TransformState,
        node_state: &RenderState,
    ) {
        for effect in self.iter().filter(|e| e.has_cull_callback()) {
            effect.cull_callback(trav, data, node_transform, node_state);
        }
    }

    /// Apply the transform adjustment of each effect that has one, in order.
    pub fn adjust_transform(
        &self,
        net_transform: &mut TransformState,
        node_transform: &mut TransformState,
        node: &SceneNode,
    ) {
        for effect in self.iter().filter(|e| e.has_adjust_transform()) {
            effect.adjust_transform(net_transform, node_transform, node);
        }
    }
}

fn insert_sorted(effects: &mut Vec<EffectHandle>, effect: EffectHandle) {
    match effects.binary_search_by(|existing| existing.compare_kind(effect.as_ref())) {
        Ok(index) => effects[index] = effect,
        Err(index) => effects.insert(index, effect),
    }
}

impl Default for RenderEffects {
    fn default() -> Self {
        Self::empty()
    }
}

impl Ord for RenderEffects {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return Ordering::Equal;
        }
        for (a, b) in self.iter().zip(other.iter()) {
            let order = a.compare_to(b.as_ref());
            if order != Ordering::Equal {
                return order;
            }
        }
        self.len().cmp(&other.len())
    }
}

impl PartialOrd for RenderEffects {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RenderEffects {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RenderEffects {}

impl fmt::Display for RenderEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, effect) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", effect)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::tests::{OffsetEffect, TagEffect};
    use crate::graph::SceneGraph;
    use glam::Vec3;

    #[test]
    fn test_empty_collection() {
        let effects = RenderEffects::empty();
        assert!(effects.is_empty());
        assert!(effects.safe_to_transform());
        assert!(!effects.has_cull_callback());
        assert!(!effects.has_adjust_transform());
        assert_eq!(effects.to_string(), "[]");
    }

    #[test]
    fn test_one_effect_per_kind() {
        let effects = RenderEffects::from_effects([
            Arc::new(TagEffect(1)) as EffectHandle,
            OffsetEffect::make(Vec3::X),
            Arc::new(TagEffect(2)) as EffectHandle,
        ]);

        assert_eq!(effects.len(), 2);
        assert_eq!(effects.get_effect::<TagEffect>().map(|t| t.0), Some(2));
        // Sorted by kind name.
        assert_eq!(
            effects.to_string(),
            "[OffsetEffect:[1, 0, 0], TagEffect:2]"
        );
    }

    #[test]
    fn test_add_and_remove_leave_original_untouched() {
        let base = RenderEffects::single(Arc::new(TagEffect(1)));
        let added = base.add_effect(OffsetEffect::make(Vec3::Y));
        let removed = added.remove_effect::<TagEffect>();

        assert_eq!(base.len(), 1);
        assert_eq!(added.len(), 2);
        assert_eq!(removed.len(), 1);
        assert!(removed.get_effect::<TagEffect>().is_none());
        assert!(removed.get_effect::<OffsetEffect>().is_some());
    }

    #[test]
    fn test_capabilities_are_aggregated() {
        let effects = RenderEffects::from_effects([
            Arc::new(TagEffect(1)) as EffectHandle,
            OffsetEffect::make(Vec3::X),
        ]);
        assert!(effects.has_cull_callback());
        assert!(effects.has_adjust_transform());
        assert!(effects.safe_to_transform());
    }

    #[test]
    fn test_equivalent_collections_compare_equal() {
        let a = RenderEffects::from_effects([
            Arc::new(TagEffect(4)) as EffectHandle,
            OffsetEffect::make(Vec3::Z),
        ]);
        let b = RenderEffects::from_effects([
            OffsetEffect::make(Vec3::Z),
            Arc::new(TagEffect(4)) as EffectHandle,
        ]);
        let c = RenderEffects::single(Arc::new(TagEffect(5)));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.cmp(&c), c.cmp(&a).reverse());
        assert!(RenderEffects::empty() < c);
    }

    #[test]
    fn test_adjust_transform_runs_each_effect() {
        let graph = SceneGraph::new();
        let node = graph.node(graph.root()).expect("root exists");
        let effects = RenderEffects::single(OffsetEffect::make(Vec3::new(1.0, 2.0, 3.0)));

        let mut net = TransformState::identity();
        let mut local = TransformState::identity();
        effects.adjust_transform(&mut net, &mut local, node);

        assert_eq!(local.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(net.scale(), Vec3::splat(9.0));
    }
}
