//! cullfx demo - Main Entry Point
//!
//! Builds a small rig with a tracked head node, feeds a virtual tracker with
//! a synthetic pose every frame and runs one cull pass per frame.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use glam::{Quat, Vec3};
use tracing::{info, warn};

use cullfx_core::{FrameClock, FrameTime, init_logging};
use cullfx_device::{TrackedAxes, TrackerData, TrackerEffect, VirtualTracker};
use cullfx_scene::{CullTraverser, NodeId, RenderState, SceneGraph, TransformState};

/// Drive a tracked node through repeated cull passes.
#[derive(Parser, Debug)]
#[command(name = "cullfx-demo", version, about)]
struct Args {
    /// Number of frames to run
    #[arg(long, default_value_t = 10)]
    frames: u64,

    /// Tracked axes: names joined by '|' (x, y, z, pos, orient, all) or a raw mask
    #[arg(long, default_value = "all")]
    axes: TrackedAxes,

    /// Disconnect the tracker at this frame
    #[arg(long)]
    disconnect_at: Option<u64>,

    /// Milliseconds to sleep between frames
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

struct Demo {
    graph: SceneGraph,
    tracker: Arc<VirtualTracker>,
    head: NodeId,
    hand: NodeId,
    traverser: CullTraverser,
    clock: FrameClock,
}

impl Demo {
    fn new(axes: TrackedAxes) -> Result<Self> {
        let mut graph = SceneGraph::new();
        let rig = graph.add_child(graph.root(), "rig")?;
        let head = graph.add_child(rig, "head")?;
        let hand = graph.add_child(head, "hand")?;

        graph.set_transform(rig, TransformState::identity().with_position(Vec3::new(0.0, 0.0, 2.0)))?;
        graph.set_transform(head, TransformState::identity().with_position(Vec3::new(0.0, 1.6, 0.0)))?;
        graph.set_transform(hand, TransformState::identity().with_position(Vec3::new(0.3, -0.4, -0.3)))?;
        // Cull the tracked subtree late so the pose is as fresh as possible.
        graph.set_state(head, RenderState::empty().with_bin("late", 100))?;

        let tracker = Arc::new(VirtualTracker::new("virtual-hmd"));
        graph.add_effect(head, TrackerEffect::make(tracker.clone(), axes))?;

        Ok(Self {
            graph,
            tracker,
            head,
            hand,
            traverser: CullTraverser::new(),
            clock: FrameClock::new(),
        })
    }

    fn frame(&mut self, disconnect_at: Option<u64>) -> Result<()> {
        let time = self.clock.tick();
        if disconnect_at == Some(time.frame) {
            self.tracker.set_connected(false);
        }
        let pose = synthetic_pose(time);
        let sample_time = pose.time();
        self.tracker.set_tracker(pose);

        self.traverser.traverse(&self.graph);

        let head = self
            .traverser
            .result_for(self.head)
            .context("head missing from cull pass")?;
        let hand = self
            .traverser
            .result_for(self.hand)
            .context("hand missing from cull pass")?;
        info!(
            "frame {} ({:.1} ms, sample t={:.3}s): head {} hand {}",
            time.frame,
            time.delta.as_secs_f64() * 1000.0,
            sample_time,
            head.net_transform,
            hand.net_transform.position()
        );
        Ok(())
    }
}

/// Head swaying on a small circle while turning.
fn synthetic_pose(time: FrameTime) -> TrackerData {
    let t = time.elapsed_secs();
    TrackerData::new()
        .with_position(Vec3::new(0.2 * t.sin(), 1.7, 0.2 * t.cos()))
        .with_orientation(Quat::from_rotation_y(t))
        .with_time(time.elapsed.as_secs_f64())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    info!("cullfx demo starting: {} frames, axes {}", args.frames, args.axes);

    let mut demo = Demo::new(args.axes)?;

    // The tracker overwrites the head transform on every pass.
    if let Err(e) = demo
        .graph
        .xform(demo.head, &TransformState::identity().with_position(Vec3::X))
    {
        warn!("{}", e);
    }

    for _ in 0..args.frames {
        demo.frame(args.disconnect_at)?;
        thread::sleep(Duration::from_millis(args.frame_ms));
    }

    info!("Done after {} cull passes", demo.traverser.pass());
    Ok(())
}
