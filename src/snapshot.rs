//! Serialisable registry snapshot for inspection and debugging overlays.
//!
//! A [`RegistrySnapshot`] is a flat, render-handle-free copy of both anchor
//! populations at one instant. Spatial keys are stored in their canonical text
//! form (`cup_(1.0, 0.0, 0.0)`), positions as `[x, y, z]`.
//!
//! Snapshots are a read-only view: there is no restore path, because render
//! handles cannot outlive the sink that produced them.
//!
//! This module requires the `serde` feature.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::registry::{AnchorKind, AnchorRegistry, TrackedAnchor};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// A serialisable copy of an [`AnchorRegistry`].
///
/// ```rust
/// use anchor_track::registry::AnchorRegistry;
/// use anchor_track::snapshot::RegistrySnapshot;
///
/// let registry: AnchorRegistry<u32> = AnchorRegistry::new();
/// let snapshot = RegistrySnapshot::capture(&registry);
/// assert_eq!(snapshot.anchor_count(), 0);
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct RegistrySnapshot {
    /// Format version, always [`SNAPSHOT_VERSION`] for new snapshots.
    pub version: u16,
    /// Transient anchors, ordered by id.
    pub transient: Vec<AnchorRecord>,
    /// Persistent anchors, in placement order.
    pub persistent: Vec<AnchorRecord>,
}

/// One anchor in a [`RegistrySnapshot`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct AnchorRecord {
    /// Registry-assigned anchor id.
    pub id: u64,
    /// Canonical spatial key text.
    pub key: String,
    /// Object class label.
    pub class_label: String,
    /// World position `[x, y, z]` in metres.
    pub position: [f32; 3],
    /// Lifecycle category.
    pub kind: AnchorKind,
    /// Whether the anchor was matched in the current pass.
    pub touched: bool,
    /// Consecutive unmatched reconciliations.
    pub idle_frames: u32,
}

impl<H> From<&TrackedAnchor<H>> for AnchorRecord {
    fn from(anchor: &TrackedAnchor<H>) -> Self {
        let p = anchor.position();
        Self {
            id: anchor.id().get(),
            key: anchor.key().to_string(),
            class_label: String::from(anchor.class_label()),
            position: [p.x, p.y, p.z],
            kind: anchor.kind(),
            touched: anchor.touched(),
            idle_frames: anchor.idle_frames(),
        }
    }
}

impl RegistrySnapshot {
    /// Capture both populations of `registry`.
    pub fn capture<H>(registry: &AnchorRegistry<H>) -> Self {
        let mut transient: Vec<AnchorRecord> =
            registry.transient().map(AnchorRecord::from).collect();
        transient.sort_by_key(|r| r.id);
        let persistent = registry.persistent().iter().map(AnchorRecord::from).collect();

        Self {
            version: SNAPSHOT_VERSION,
            transient,
            persistent,
        }
    }

    /// Total anchors across both populations.
    pub fn anchor_count(&self) -> usize {
        self.transient.len() + self.persistent.len()
    }

    /// Look up an anchor record by id in either population.
    pub fn find(&self, id: u64) -> Option<&AnchorRecord> {
        self.transient
            .iter()
            .chain(self.persistent.iter())
            .find(|r| r.id == id)
    }
}
