//! Transient tracking policy: following markers that mirror the current frame.
//!
//! Each eligible frame:
//!
//! ```text
//! mark_all_untouched → for each detection: key → resolve pose → upsert → evict untouched
//! ```
//!
//! Markers are flicker-free only to the extent that detections are key-stable
//! from frame to frame; see [`crate::key`].

use tracing::debug;

use crate::collaborator::{PoseResolver, RenderSink};
use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::key::KeyQuantizer;
use crate::registry::{AnchorRegistry, Upsert};

/// Counters for one transient reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransientPassStats {
    /// Anchors created for previously unseen keys.
    pub created: usize,
    /// Anchors moved in place.
    pub moved: usize,
    /// Anchors evicted because their key did not reappear.
    pub evicted: usize,
}

/// Reconciles the transient population against one frame of detections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientPolicy {
    quantizer: KeyQuantizer,
    grace_frames: u32,
}

impl TransientPolicy {
    /// Policy using `quantizer` for keys and evicting after `grace_frames`
    /// unmatched frames.
    pub fn new(quantizer: KeyQuantizer, grace_frames: u32) -> Self {
        Self { quantizer, grace_frames }
    }

    /// Policy configured from a [`TrackerConfig`].
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            KeyQuantizer::new(config.stale_key_decimal_precision),
            config.transient_grace_frames,
        )
    }

    /// Key quantiser used by this policy.
    pub fn quantizer(&self) -> &KeyQuantizer {
        &self.quantizer
    }

    /// Run one reconciliation pass.
    ///
    /// Clears every touch flag in `registry` first, so the pass is
    /// self-contained and callers need not clear them beforehand.
    ///
    /// Keys are derived from the raw detection position; the stored pose comes
    /// from `resolver`, which is called once per detection.
    pub fn reconcile<R, S>(
        &self,
        registry: &mut AnchorRegistry<S::Handle>,
        detections: &[Detection],
        resolver: &mut R,
        sink: &mut S,
    ) -> TransientPassStats
    where
        R: PoseResolver + ?Sized,
        S: RenderSink + ?Sized,
    {
        let mut stats = TransientPassStats::default();
        registry.mark_all_untouched();

        for detection in detections {
            let key = self
                .quantizer
                .key(&detection.class_label, &detection.world_position);
            let pose = resolver.resolve_world_pose(&detection.world_position);
            match registry.upsert_transient(key, pose, sink) {
                Upsert::Created(_) => stats.created += 1,
                Upsert::Moved(_) => stats.moved += 1,
            }
        }

        stats.evicted = registry.evict_untouched_transient(self.grace_frames, sink);
        debug!(
            detections = detections.len(),
            created = stats.created,
            moved = stats.moved,
            evicted = stats.evicted,
            "transient pass"
        );
        stats
    }
}

impl Default for TransientPolicy {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}
