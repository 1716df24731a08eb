//! Immutable per-node render state.

use std::fmt;
use std::sync::{Arc, OnceLock};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct StateData {
    bin: Option<Arc<str>>,
    draw_order: i32,
}

/// Render state accumulated during the cull traversal.
///
/// Currently this only carries the cull bin assignment. Nodes driven by a
/// tracker should be placed in a late bin so the pose is sampled as close to
/// drawing as possible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderState {
    inner: Arc<StateData>,
}

impl RenderState {
    /// The empty state, shared by all callers.
    pub fn empty() -> Self {
        static EMPTY: OnceLock<RenderState> = OnceLock::new();
        EMPTY
            .get_or_init(|| Self {
                inner: Arc::new(StateData::default()),
            })
            .clone()
    }

    /// Return a copy of this state assigned to the named bin.
    pub fn with_bin(&self, bin: &str, draw_order: i32) -> Self {
        Self {
            inner: Arc::new(StateData {
                bin: Some(Arc::from(bin)),
                draw_order,
            }),
        }
    }

    /// Name of the assigned bin, if any.
    pub fn bin(&self) -> Option<&str> {
        self.inner.bin.as_deref()
    }

    /// Draw order within the bin.
    pub fn draw_order(&self) -> i32 {
        self.inner.draw_order
    }

    /// Check whether this state carries no settings.
    pub fn is_empty(&self) -> bool {
        self.inner.bin.is_none()
    }

    /// Compose a child's state underneath this one. A child bin overrides the
    /// inherited one.
    pub fn compose(&self, child: &RenderState) -> RenderState {
        if child.is_empty() {
            self.clone()
        } else {
            child.clone()
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bin() {
            Some(bin) => write!(f, "S:(bin {} {})", bin, self.draw_order()),
            None => f.write_str("S:empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = RenderState::empty();
        assert!(state.is_empty());
        assert_eq!(state.bin(), None);
        assert_eq!(state.to_string(), "S:empty");
    }

    #[test]
    fn test_child_bin_overrides_parent() {
        let parent = RenderState::empty().with_bin("opaque", 0);
        let child = RenderState::empty().with_bin("late", 100);

        assert_eq!(parent.compose(&child).bin(), Some("late"));
        assert_eq!(parent.compose(&RenderState::empty()).bin(), Some("opaque"));
        assert_eq!(parent.compose(&child).draw_order(), 100);
    }
}
