//! Commit policy: user-placed persistent markers with duplicate suppression.
//!
//! - [`CommitTrigger`]: edge detector for the commit input with a post-pause cooldown.
//! - [`CommitPolicy`]: promotes the current detections into persistent anchors.
//!
//! # Invariants
//! - A commit fires once per release of the commit input, never while it is held.
//! - No commit fires while paused or within the cooldown after resuming.
//! - A detection never creates a persistent anchor when a same-class persistent
//!   anchor lies strictly closer than the dedup radius; that anchor is touched
//!   instead and keeps its position.

use tracing::{debug, info};

use crate::collaborator::{PoseResolver, RenderSink};
use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::key::KeyQuantizer;
use crate::matcher::find_nearest;
use crate::registry::AnchorRegistry;

// ─── Commit Trigger ─────────────────────────────────────────────────────────

/// Edge detector for the commit input.
///
/// The host feeds the raw held/released level every frame; the trigger fires on
/// the held → released transition, like a button-up event. After a pause the
/// cooldown is re-armed every paused frame, so the first release after resuming
/// must come at least `cooldown_seconds` later to count.
#[derive(Clone, Debug, PartialEq)]
pub struct CommitTrigger {
    cooldown_seconds: f32,
    cooldown_remaining: f32,
    was_held: bool,
}

impl CommitTrigger {
    /// Trigger with the given post-pause cooldown.
    pub fn new(cooldown_seconds: f32) -> Self {
        Self {
            cooldown_seconds,
            cooldown_remaining: 0.0,
            was_held: false,
        }
    }

    /// Advance by one active frame. Returns `true` when a commit should fire.
    ///
    /// - `held`: whether the commit input is currently held.
    /// - `delta_seconds`: time elapsed since the previous frame.
    pub fn update(&mut self, held: bool, delta_seconds: f32) -> bool {
        let released = self.was_held && !held;
        self.was_held = held;
        let fire = released && self.cooldown_remaining <= 0.0;
        self.cooldown_remaining = (self.cooldown_remaining - delta_seconds).max(0.0);
        fire
    }

    /// Advance by one paused frame: track the input level, never fire, and
    /// re-arm the cooldown.
    pub fn hold_off(&mut self, held: bool) {
        self.was_held = held;
        self.cooldown_remaining = self.cooldown_seconds;
    }

    /// Restart the cooldown without touching the input level.
    ///
    /// Called on resume, so the window applies even when no frame ran while paused.
    pub fn rearm(&mut self) {
        self.cooldown_remaining = self.cooldown_seconds;
    }

    /// Remaining cooldown in seconds.
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Whether the input was held on the last frame.
    pub fn is_held(&self) -> bool {
        self.was_held
    }
}

impl Default for CommitTrigger {
    fn default() -> Self {
        Self::new(TrackerConfig::default().resume_cooldown_seconds)
    }
}

// ─── Commit Policy ──────────────────────────────────────────────────────────

/// Outcome of one commit pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Persistent anchors newly placed.
    pub placed: usize,
    /// Detections that matched an existing persistent anchor.
    pub matched: usize,
}

/// Promotes detections into persistent anchors, deduplicating by proximity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CommitPolicy {
    quantizer: KeyQuantizer,
    spawn_distance_threshold: f32,
}

impl CommitPolicy {
    /// Policy with a key quantiser and dedup radius in metres.
    pub fn new(quantizer: KeyQuantizer, spawn_distance_threshold: f32) -> Self {
        Self {
            quantizer,
            spawn_distance_threshold,
        }
    }

    /// Policy configured from a [`TrackerConfig`].
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            KeyQuantizer::new(config.stale_key_decimal_precision),
            config.spawn_distance_threshold,
        )
    }

    /// Dedup radius in metres.
    pub fn spawn_distance_threshold(&self) -> f32 {
        self.spawn_distance_threshold
    }

    /// Run one commit pass over `detections`.
    ///
    /// Each detection's pose is resolved once and compared against the
    /// persistent population, including anchors placed earlier in the same
    /// pass. Never evicts.
    pub fn commit<R, S>(
        &self,
        registry: &mut AnchorRegistry<S::Handle>,
        detections: &[Detection],
        resolver: &mut R,
        sink: &mut S,
    ) -> CommitOutcome
    where
        R: PoseResolver + ?Sized,
        S: RenderSink + ?Sized,
    {
        let mut outcome = CommitOutcome::default();

        for detection in detections {
            let pose = resolver.resolve_world_pose(&detection.world_position);
            let nearest = find_nearest(
                &pose.position,
                &detection.class_label,
                registry.persistent(),
                self.spawn_distance_threshold,
            );
            match nearest {
                Some(m) => {
                    registry.touch_persistent(m.index);
                    outcome.matched += 1;
                    debug!(
                        class = %detection.class_label,
                        distance = m.distance,
                        "commit matched existing anchor"
                    );
                }
                None => {
                    let key = self
                        .quantizer
                        .key(&detection.class_label, &detection.world_position);
                    registry.insert_persistent(key, pose, sink);
                    outcome.placed += 1;
                }
            }
        }

        info!(
            detections = detections.len(),
            placed = outcome.placed,
            matched = outcome.matched,
            total = registry.persistent_count(),
            "commit pass"
        );
        outcome
    }
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::from_config(&TrackerConfig::default())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
