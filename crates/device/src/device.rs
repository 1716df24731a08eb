//! Tracked input devices and their pose samples.

use std::fmt;

use glam::{Quat, Vec3};

/// A point-in-time pose reading from a tracked device.
///
/// Position and orientation are reported independently: a device may know
/// its orientation but not its position, or neither.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TrackerData {
    position: Option<Vec3>,
    orientation: Option<Quat>,
    time: f64,
}

impl TrackerData {
    /// A sample with neither component valid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with a valid position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Return a copy with a valid orientation.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Return a copy stamped with the given time, in seconds.
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Check if the position component is valid.
    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Check if the orientation component is valid.
    pub fn has_orientation(&self) -> bool {
        self.orientation.is_some()
    }

    /// The position, if valid.
    pub fn position(&self) -> Option<Vec3> {
        self.position
    }

    /// The orientation, if valid.
    pub fn orientation(&self) -> Option<Quat> {
        self.orientation
    }

    /// Time the sample was taken, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }
}

/// A device that reports a tracked pose.
///
/// Implementations must return a self-consistent sample from
/// [`InputDevice::tracker`]; position and orientation must come from the same
/// instant.
pub trait InputDevice: fmt::Debug + Send + Sync {
    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Whether the device is currently delivering data.
    fn is_connected(&self) -> bool;

    /// Snapshot of the most recent pose.
    fn tracker(&self) -> TrackerData;
}

impl fmt::Display for dyn InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if !self.is_connected() {
            f.write_str(" (disconnected)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample() {
        let data = TrackerData::new();
        assert!(!data.has_position());
        assert!(!data.has_orientation());
        assert_eq!(data.time(), 0.0);
    }

    #[test]
    fn test_components_are_independent() {
        let data = TrackerData::new()
            .with_orientation(Quat::from_rotation_z(1.0))
            .with_time(2.5);
        assert!(!data.has_position());
        assert!(data.has_orientation());
        assert_eq!(data.position(), None);
        assert_eq!(data.time(), 2.5);
    }
}
