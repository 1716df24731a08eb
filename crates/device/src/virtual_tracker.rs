//! A tracker whose pose is pushed by application code.
//!
//! Useful for replaying recorded poses, for tests, and for driving demo
//! scenes without hardware.

use parking_lot::RwLock;
use tracing::info;

use crate::device::{InputDevice, TrackerData};

#[derive(Debug, Default)]
struct TrackerState {
    connected: bool,
    data: TrackerData,
}

/// Tracked device fed through [`VirtualTracker::set_tracker`].
///
/// The pose is stored behind a lock so the whole sample is replaced at once,
/// and readers always see position and orientation from the same update.
#[derive(Debug)]
pub struct VirtualTracker {
    name: String,
    state: RwLock<TrackerState>,
}

impl VirtualTracker {
    /// Create a connected tracker with no valid pose yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(TrackerState {
                connected: true,
                data: TrackerData::new(),
            }),
        }
    }

    /// Mark the device as connected or disconnected.
    pub fn set_connected(&self, connected: bool) {
        let mut state = self.state.write();
        if state.connected != connected {
            info!(
                "Tracker '{}' {}",
                self.name,
                if connected { "connected" } else { "disconnected" }
            );
        }
        state.connected = connected;
    }

    /// Replace the current pose sample.
    pub fn set_tracker(&self, data: TrackerData) {
        self.state.write().data = data;
    }
}

impl InputDevice for VirtualTracker {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.state.read().connected
    }

    fn tracker(&self) -> TrackerData {
        self.state.read().data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::sync::Arc;

    #[test]
    fn test_new_tracker_is_connected_without_pose() {
        let tracker = VirtualTracker::new("hmd");
        assert!(tracker.is_connected());
        assert_eq!(tracker.tracker(), TrackerData::new());
    }

    #[test]
    fn test_set_tracker_replaces_sample() {
        let tracker = VirtualTracker::new("hmd");
        tracker.set_tracker(TrackerData::new().with_position(Vec3::X));
        tracker.set_tracker(TrackerData::new().with_position(Vec3::Y).with_time(1.0));

        let data = tracker.tracker();
        assert_eq!(data.position(), Some(Vec3::Y));
        assert_eq!(data.time(), 1.0);
    }

    #[test]
    fn test_display() {
        let tracker: Arc<dyn InputDevice> = Arc::new(VirtualTracker::new("wand"));
        assert_eq!(tracker.to_string(), "wand");

        let tracker = Arc::new(VirtualTracker::new("wand"));
        tracker.set_connected(false);
        let device: Arc<dyn InputDevice> = tracker;
        assert_eq!(device.to_string(), "wand (disconnected)");
    }
}
