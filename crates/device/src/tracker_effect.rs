//! Binds a node's position and orientation to a tracked device.
//!
//! Applying the pose during the cull traversal, instead of updating the node
//! transform from application code, samples the device as late as possible
//! before drawing and so keeps motion-to-photon latency low. For the same
//! reason nodes carrying this effect are best placed in a bin that is culled
//! late.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use cullfx_scene::{EffectHandle, RenderEffect, SceneNode, TransformState};
use tracing::{debug, trace};

use crate::axes::TrackedAxes;
use crate::device::InputDevice;

/// Render effect overriding a node's local transform with the current pose of
/// an [`InputDevice`].
///
/// The device is shared, not owned: any number of effects may refer to the
/// same device. Both fields are fixed at construction.
#[derive(Debug)]
pub struct TrackerEffect {
    device: Arc<dyn InputDevice>,
    tracked_axes: TrackedAxes,
}

impl TrackerEffect {
    /// Create an effect applying the selected axes of `device`'s pose.
    pub fn make(device: Arc<dyn InputDevice>, tracked_axes: TrackedAxes) -> EffectHandle {
        debug!("Creating TrackerEffect for '{}' axes {}", device.name(), tracked_axes);
        Arc::new(Self {
            device,
            tracked_axes,
        })
    }

    /// Create an effect tracking both position and orientation.
    pub fn make_all(device: Arc<dyn InputDevice>) -> EffectHandle {
        Self::make(device, TrackedAxes::ALL)
    }

    /// The bound device.
    pub fn device(&self) -> &Arc<dyn InputDevice> {
        &self.device
    }

    /// The applied axes.
    pub fn tracked_axes(&self) -> TrackedAxes {
        self.tracked_axes
    }

    fn device_addr(&self) -> *const () {
        Arc::as_ptr(&self.device).cast::<()>()
    }
}

impl fmt::Display for TrackerEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name(), self.device)
    }
}

impl RenderEffect for TrackerEffect {
    fn type_name(&self) -> &'static str {
        "TrackerEffect"
    }

    /// The transform is rewritten on every cull pass, so any transform applied
    /// from outside would be silently lost.
    fn safe_to_transform(&self) -> bool {
        false
    }

    fn has_cull_callback(&self) -> bool {
        true
    }

    // Don't check the device connection here: collections cache this flag.
    fn has_adjust_transform(&self) -> bool {
        true
    }

    fn adjust_transform(
        &self,
        _net_transform: &mut TransformState,
        node_transform: &mut TransformState,
        node: &SceneNode,
    ) {
        // Keep the last applied transform while the device is away.
        if !self.device.is_connected() {
            trace!("'{}': {} disconnected, keeping transform", node.name(), self.device.name());
            return;
        }

        // TODO: compose the net transform with the device's tracking origin
        // once devices report one.

        let pose = self.device.tracker();

        if self.tracked_axes.intersects(TrackedAxes::POSITION)
            && let Some(position) = pose.position()
        {
            *node_transform = node_transform.with_position(position);
        }
        if self.tracked_axes.intersects(TrackedAxes::ORIENTATION)
            && let Some(orientation) = pose.orientation()
        {
            *node_transform = node_transform.with_orientation(orientation);
        }
    }

    fn compare_to_impl(&self, other: &dyn RenderEffect) -> Ordering {
        let other = other.downcast_ref::<Self>();
        debug_assert!(other.is_some(), "TrackerEffect compared against another effect kind");
        let Some(other) = other else {
            return Ordering::Equal;
        };

        self.device_addr()
            .cmp(&other.device_addr())
            .then_with(|| self.tracked_axes.bits().cmp(&other.tracked_axes.bits()))
    }
}
