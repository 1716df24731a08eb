//! Tracked input devices and the tracker render effect.
//!
//! This crate provides:
//! - The [`InputDevice`] pose-source trait and [`TrackerData`] samples
//! - A [`VirtualTracker`] fed from application code
//! - [`TrackerEffect`], which drives a node's transform from a device during
//!   the cull traversal

mod axes;
mod device;
mod tracker_effect;
mod virtual_tracker;

pub use axes::TrackedAxes;
pub use device::{InputDevice, TrackerData};
pub use tracker_effect::TrackerEffect;
pub use virtual_tracker::VirtualTracker;
