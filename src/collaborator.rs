//! External collaborator contracts.
//!
//! The engine does not produce detections, raycast the environment, or draw
//! anything. It talks to those services through the two traits below, which the
//! host implements for its engine of choice.
//!
//! # Implementing a render sink
//!
//! ```rust
//! use anchor_track::collaborator::RenderSink;
//! use anchor_track::detection::Pose;
//! use anchor_track::registry::AnchorKind;
//!
//! #[derive(Default)]
//! struct CountingSink { live: usize, next: u32 }
//!
//! impl RenderSink for CountingSink {
//!     type Handle = u32;
//!
//!     fn spawn(&mut self, _class: &str, _pose: &Pose, _kind: AnchorKind) -> u32 {
//!         self.live += 1;
//!         self.next += 1;
//!         self.next
//!     }
//!
//!     fn move_to(&mut self, _handle: &u32, _pose: &Pose) {}
//!
//!     fn destroy(&mut self, _handle: u32) {
//!         self.live -= 1;
//!     }
//! }
//! ```

use alloc::boxed::Box;

use nalgebra::Point3;

use crate::detection::Pose;
use crate::registry::AnchorKind;

/// Refines a rough detection position into a placement-ready pose.
///
/// Typically backed by an environment-mesh raycast. Called once per detection
/// per policy pass. Returning the input position unchanged is a valid answer
/// when no refinement is available; it is not a failure.
pub trait PoseResolver {
    /// Resolve `approx` into a world pose.
    fn resolve_world_pose(&mut self, approx: &Point3<f32>) -> Pose;
}

/// Resolver that returns the detection position as-is with identity orientation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassthroughResolver;

impl PoseResolver for PassthroughResolver {
    fn resolve_world_pose(&mut self, approx: &Point3<f32>) -> Pose {
        Pose::from_position(*approx)
    }
}

impl<R: PoseResolver + ?Sized> PoseResolver for &mut R {
    fn resolve_world_pose(&mut self, approx: &Point3<f32>) -> Pose {
        (**self).resolve_world_pose(approx)
    }
}

impl<R: PoseResolver + ?Sized> PoseResolver for Box<R> {
    fn resolve_world_pose(&mut self, approx: &Point3<f32>) -> Pose {
        (**self).resolve_world_pose(approx)
    }
}

/// Visual representation of anchors.
///
/// The registry calls exactly one of these per lifecycle transition:
/// [`spawn`](Self::spawn) on create, [`move_to`](Self::move_to) on update,
/// [`destroy`](Self::destroy) on removal.
pub trait RenderSink {
    /// Opaque handle to a spawned visual.
    ///
    /// Handles are moved into [`destroy`](Self::destroy) and never cloned.
    type Handle;

    /// Spawn a marker for a new anchor. `kind` lets the renderer give following
    /// markers a distinct appearance.
    fn spawn(&mut self, class_label: &str, pose: &Pose, kind: AnchorKind) -> Self::Handle;

    /// Move an existing marker.
    fn move_to(&mut self, handle: &Self::Handle, pose: &Pose);

    /// Release a marker.
    fn destroy(&mut self, handle: Self::Handle);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
    type Handle = S::Handle;

    fn spawn(&mut self, class_label: &str, pose: &Pose, kind: AnchorKind) -> Self::Handle {
        (**self).spawn(class_label, pose, kind)
    }

    fn move_to(&mut self, handle: &Self::Handle, pose: &Pose) {
        (**self).move_to(handle, pose)
    }

    fn destroy(&mut self, handle: Self::Handle) {
        (**self).destroy(handle)
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    type Handle = S::Handle;

    fn spawn(&mut self, class_label: &str, pose: &Pose, kind: AnchorKind) -> Self::Handle {
        (**self).spawn(class_label, pose, kind)
    }

    fn move_to(&mut self, handle: &Self::Handle, pose: &Pose) {
        (**self).move_to(handle, pose)
    }

    fn destroy(&mut self, handle: Self::Handle) {
        (**self).destroy(handle)
    }
}
