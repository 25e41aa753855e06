//! Anchor registry: the authoritative store of tracked anchors.
//!
//! Two populations live side by side:
//!
//! - **Transient** anchors, keyed by [`SpatialKey`] in a hash map. They follow
//!   the current frame's detections and are evicted as soon as their key stops
//!   appearing (after the configured grace period).
//! - **Persistent** anchors, held in a flat list and matched by proximity scan.
//!   They are created by explicit commits and survive until a full reset.
//!
//! Every create, update, and removal is mirrored to the [`RenderSink`] exactly
//! once. The registry never calls the sink for anything else.
//!
//! # Invariants
//! - A key maps to at most one transient anchor.
//! - Touch flags are only cleared by [`AnchorRegistry::mark_all_untouched`].
//! - Persistent anchors are never removed by touch state unless the caller asks
//!   for [`AnchorRegistry::evict_untouched_persistent`].

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use nalgebra::Point3;
use tracing::debug;

use crate::collaborator::RenderSink;
use crate::detection::Pose;
use crate::key::SpatialKey;
use crate::matcher::Locatable;

// ─── Identity ───────────────────────────────────────────────────────────────

/// Opaque anchor identity, unique for the lifetime of a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorId(u64);

impl AnchorId {
    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Which population an anchor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnchorKind {
    /// Mirrors the latest frame's detections.
    Transient,
    /// Explicitly committed; survives until reset.
    Persistent,
}

// ─── Tracked Anchor ─────────────────────────────────────────────────────────

/// One tracked real-world object and the handle of its visual marker.
#[derive(Clone, Debug)]
pub struct TrackedAnchor<H> {
    id: AnchorId,
    class_label: String,
    pose: Pose,
    touched: bool,
    kind: AnchorKind,
    key: SpatialKey,
    idle_frames: u32,
    handle: H,
}

impl<H> TrackedAnchor<H> {
    /// Identity of this anchor.
    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// Class label the anchor was created with.
    pub fn class_label(&self) -> &str {
        &self.class_label
    }

    /// Current world position.
    pub fn position(&self) -> &Point3<f32> {
        &self.pose.position
    }

    /// Current world pose.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// Whether a detection matched this anchor since the last
    /// [`AnchorRegistry::mark_all_untouched`].
    pub fn touched(&self) -> bool {
        self.touched
    }

    /// Population this anchor belongs to.
    pub fn kind(&self) -> AnchorKind {
        self.kind
    }

    /// Quantised key of the detection that created (transient) or placed
    /// (persistent) this anchor.
    pub fn key(&self) -> &SpatialKey {
        &self.key
    }

    /// Consecutive reconciliations this anchor has gone unmatched.
    pub fn idle_frames(&self) -> u32 {
        self.idle_frames
    }

    /// Render-side handle.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    fn touch_at(&mut self, pose: Pose) {
        self.pose = pose;
        self.touched = true;
        self.idle_frames = 0;
    }
}

impl<H> Locatable for TrackedAnchor<H> {
    fn class_label(&self) -> &str {
        &self.class_label
    }

    fn position(&self) -> &Point3<f32> {
        &self.pose.position
    }
}

/// Result of [`AnchorRegistry::upsert_transient`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    /// A new transient anchor was created and spawned.
    Created(AnchorId),
    /// An existing transient anchor was moved in place.
    Moved(AnchorId),
}

impl Upsert {
    /// Identity of the created or moved anchor.
    pub fn id(self) -> AnchorId {
        match self {
            Upsert::Created(id) | Upsert::Moved(id) => id,
        }
    }
}

// ─── Anchor Registry ────────────────────────────────────────────────────────

/// Owner of every tracked anchor.
///
/// Generic over the render handle type `H` so that it can be driven by any
/// [`RenderSink`]. The registry holds no reference to the sink; each mutating
/// call borrows it for the duration of the transition.
pub struct AnchorRegistry<H> {
    transient: HashMap<SpatialKey, TrackedAnchor<H>>,
    persistent: Vec<TrackedAnchor<H>>,
    next_id: u64,
}

impl<H> AnchorRegistry<H> {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self {
            transient: HashMap::new(),
            persistent: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> AnchorId {
        let id = AnchorId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Transient population ───────────────────────────────────────────────

    /// Create or move the transient anchor for `key`, marking it touched.
    ///
    /// Spawns a marker on create and moves the existing marker on update.
    pub fn upsert_transient<S>(&mut self, key: SpatialKey, pose: Pose, sink: &mut S) -> Upsert
    where
        S: RenderSink<Handle = H> + ?Sized,
    {
        if let Some(anchor) = self.transient.get_mut(&key) {
            anchor.touch_at(pose);
            sink.move_to(&anchor.handle, &pose);
            debug!(id = anchor.id.0, key = %key, "transient anchor moved");
            return Upsert::Moved(anchor.id);
        }

        let id = self.allocate_id();
        let handle = sink.spawn(key.class_label(), &pose, AnchorKind::Transient);
        debug!(id = id.0, key = %key, "transient anchor created");
        let anchor = TrackedAnchor {
            id,
            class_label: String::from(key.class_label()),
            pose,
            touched: true,
            kind: AnchorKind::Transient,
            key: key.clone(),
            idle_frames: 0,
            handle,
        };
        self.transient.insert(key, anchor);
        Upsert::Created(id)
    }

    /// Remove transient anchors that stayed untouched for more than
    /// `grace_frames` consecutive reconciliations, destroying their markers.
    ///
    /// With `grace_frames = 0` every untouched transient anchor is removed.
    /// Returns the number of anchors evicted.
    pub fn evict_untouched_transient<S>(&mut self, grace_frames: u32, sink: &mut S) -> usize
    where
        S: RenderSink<Handle = H> + ?Sized,
    {
        let mut stale: Vec<SpatialKey> = Vec::new();
        for (key, anchor) in self.transient.iter_mut() {
            if anchor.touched {
                continue;
            }
            anchor.idle_frames = anchor.idle_frames.saturating_add(1);
            if anchor.idle_frames > grace_frames {
                stale.push(key.clone());
            }
        }

        for key in &stale {
            if let Some(anchor) = self.transient.remove(key) {
                debug!(id = anchor.id.0, key = %key, "transient anchor evicted");
                sink.destroy(anchor.handle);
            }
        }
        stale.len()
    }

    // ── Persistent population ──────────────────────────────────────────────

    /// Create a persistent anchor unconditionally and spawn its marker.
    ///
    /// `key` is the quantised key of the committing detection; it is kept for
    /// key-match refinement. Deduplication is the caller's job.
    pub fn insert_persistent<S>(&mut self, key: SpatialKey, pose: Pose, sink: &mut S) -> AnchorId
    where
        S: RenderSink<Handle = H> + ?Sized,
    {
        let id = self.allocate_id();
        let handle = sink.spawn(key.class_label(), &pose, AnchorKind::Persistent);
        debug!(id = id.0, key = %key, "persistent anchor placed");
        self.persistent.push(TrackedAnchor {
            id,
            class_label: String::from(key.class_label()),
            pose,
            touched: true,
            kind: AnchorKind::Persistent,
            key,
            idle_frames: 0,
            handle,
        });
        id
    }

    /// Mark the persistent anchor at `index` touched without moving it.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn touch_persistent(&mut self, index: usize) -> bool {
        match self.persistent.get_mut(index) {
            Some(anchor) => {
                anchor.touched = true;
                anchor.idle_frames = 0;
                true
            }
            None => false,
        }
    }

    /// Move every persistent anchor placed under `key` to `pose` and touch it.
    ///
    /// Returns the number of anchors moved.
    pub fn refine_persistent<S>(&mut self, key: &SpatialKey, pose: Pose, sink: &mut S) -> usize
    where
        S: RenderSink<Handle = H> + ?Sized,
    {
        let mut moved = 0;
        for anchor in self.persistent.iter_mut().filter(|a| &a.key == key) {
            anchor.touch_at(pose);
            sink.move_to(&anchor.handle, &pose);
            debug!(id = anchor.id.0, key = %key, "persistent anchor refined");
            moved += 1;
        }
        moved
    }

    /// Remove persistent anchors not touched since the last
    /// [`mark_all_untouched`](Self::mark_all_untouched), destroying their markers.
    ///
    /// Returns the number of anchors evicted.
    pub fn evict_untouched_persistent<S>(&mut self, sink: &mut S) -> usize
    where
        S: RenderSink<Handle = H> + ?Sized,
    {
        let before = self.persistent.len();
        let (kept, idle): (Vec<_>, Vec<_>) = self.persistent.drain(..).partition(|a| a.touched);
        self.persistent = kept;
        for anchor in idle {
            debug!(id = anchor.id.0, key = %anchor.key, "idle persistent anchor evicted");
            sink.destroy(anchor.handle);
        }
        before - self.persistent.len()
    }

    // ── Whole registry ─────────────────────────────────────────────────────

    /// Clear the touch flag of every anchor of both kinds.
    pub fn mark_all_untouched(&mut self) {
        for anchor in self.transient.values_mut() {
            anchor.touched = false;
        }
        for anchor in self.persistent.iter_mut() {
            anchor.touched = false;
        }
    }

    /// Drop every anchor of both kinds, destroying all markers.
    ///
    /// Returns the number of anchors removed.
    pub fn clear_all<S>(&mut self, sink: &mut S) -> usize
    where
        S: RenderSink<Handle = H> + ?Sized,
    {
        let removed = self.len();
        for (_, anchor) in self.transient.drain() {
            sink.destroy(anchor.handle);
        }
        for anchor in self.persistent.drain(..) {
            sink.destroy(anchor.handle);
        }
        removed
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// Transient anchor for `key`, if tracked.
    pub fn get_transient(&self, key: &SpatialKey) -> Option<&TrackedAnchor<H>> {
        self.transient.get(key)
    }

    /// Iterate over transient anchors in arbitrary order.
    pub fn transient(&self) -> impl Iterator<Item = &TrackedAnchor<H>> {
        self.transient.values()
    }

    /// Persistent anchors in placement order.
    pub fn persistent(&self) -> &[TrackedAnchor<H>] {
        &self.persistent
    }

    /// Number of transient anchors.
    pub fn transient_count(&self) -> usize {
        self.transient.len()
    }

    /// Number of persistent anchors.
    pub fn persistent_count(&self) -> usize {
        self.persistent.len()
    }

    /// Total number of anchors.
    pub fn len(&self) -> usize {
        self.transient.len() + self.persistent.len()
    }

    /// `true` when no anchor of either kind is tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<H> Default for AnchorRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> core::fmt::Debug for AnchorRegistry<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnchorRegistry")
            .field("transient_count", &self.transient.len())
            .field("persistent_count", &self.persistent.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
