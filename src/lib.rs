//! # anchor-track
//!
//! Detection-to-anchor association and lifecycle for spatial perception.
//!
//! A perception pipeline emits class-labelled 3D detections every frame. This
//! crate turns that noisy stream into stable world anchors:
//!
//! - **Transient** anchors follow the live detections frame by frame. Each is
//!   identified by a quantised spatial key, so jitter below the key resolution
//!   moves the marker instead of respawning it.
//! - **Persistent** anchors are placed when the user commits. A same-class
//!   anchor within the dedup radius absorbs the detection instead of spawning a
//!   duplicate.
//!
//! ## The pipeline
//!
//! ```text
//! Detections ──▶ KeyQuantizer ──▶ TransientPolicy ──┐
//!     │                                             ├──▶ AnchorRegistry ──▶ RenderSink
//!     └───────▶ find_nearest ───▶ CommitPolicy ─────┘          ▲
//!                                      ▲                       │
//!                               CommitTrigger         PoseResolver (raycast)
//!
//!                  LifecycleCoordinator drives all of it once per frame
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`key`] | [`SpatialKey`], [`KeyQuantizer`] | Class label + position rounded to a fixed precision |
//! | [`matcher`] | [`find_nearest`], [`Locatable`] | Nearest same-class candidate inside a radius |
//! | [`registry`] | [`AnchorRegistry`], [`TrackedAnchor`] | Both anchor populations, mirrored to the render sink |
//! | [`transient`] | [`TransientPolicy`] | Per-frame upsert + evict of following markers |
//! | [`commit`] | [`CommitPolicy`], [`CommitTrigger`] | Edge-triggered placement with proximity dedup |
//! | [`coordinator`] | [`LifecycleCoordinator`], [`TrackerBuilder`] | Frame driver, pause, reset, events |
//! | [`collaborator`] | [`PoseResolver`], [`RenderSink`] | Host-implemented raycast and rendering contracts |
//! | [`config`] | [`TrackerConfig`] | Tunables with validation |
//! | `snapshot` | `RegistrySnapshot` | Serialisable registry view (requires `serde` feature) |
//!
//! ## Quick start
//!
//! ```rust
//! use anchor_track::prelude::*;
//!
//! struct NullSink;
//! impl RenderSink for NullSink {
//!     type Handle = ();
//!     fn spawn(&mut self, _: &str, _: &Pose, _: AnchorKind) {}
//!     fn move_to(&mut self, _: &(), _: &Pose) {}
//!     fn destroy(&mut self, _: ()) {}
//! }
//!
//! let mut tracker = TrackerBuilder::new(TrackerConfig::default())
//!     .pose_resolver(PassthroughResolver)
//!     .render_sink(NullSink)
//!     .build()?;
//! tracker.mark_ready();
//!
//! let frame = [Detection::at("cup", 1.02, 0.0, 0.5)];
//! tracker.tick(FrameInput::new(&frame));
//! tracker.tick(FrameInput::new(&[Detection::at("cup", 1.04, 0.0, 0.5)]));
//! assert_eq!(tracker.registry().transient_count(), 1);
//! # Ok::<(), anchor_track::TrackerError>(())
//! ```
//!
//! ## `no_std`
//!
//! The crate is `#![no_std]` + `alloc` by default. Enable `std` to forward the
//! feature to `nalgebra`, `tracing`, and `thiserror`. Enable `serde` for
//! serialisable configuration, events, and `snapshot` support.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod collaborator;
pub mod commit;
pub mod config;
pub mod coordinator;
pub mod detection;
pub mod error;
pub mod key;
pub mod matcher;
pub mod registry;
pub mod transient;
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod snapshot;

pub use collaborator::{PassthroughResolver, PoseResolver, RenderSink};
pub use commit::{CommitOutcome, CommitPolicy, CommitTrigger};
pub use config::TrackerConfig;
pub use coordinator::{FrameInput, LifecycleCoordinator, TickReport, TrackerBuilder, TrackerEvent};
pub use detection::{Detection, Pose};
pub use error::{TrackerError, TrackerResult};
pub use key::{KeyQuantizer, SpatialKey};
pub use matcher::{find_nearest, Locatable, ProximityMatch};
pub use registry::{AnchorId, AnchorKind, AnchorRegistry, TrackedAnchor, Upsert};
pub use transient::{TransientPassStats, TransientPolicy};

/// Everything a host needs to wire up and drive a tracker.
pub mod prelude {
    pub use crate::collaborator::{PassthroughResolver, PoseResolver, RenderSink};
    pub use crate::config::TrackerConfig;
    pub use crate::coordinator::{FrameInput, LifecycleCoordinator, TrackerBuilder, TrackerEvent};
    pub use crate::detection::{Detection, Pose};
    pub use crate::registry::AnchorKind;
}
