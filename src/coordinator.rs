//! Lifecycle coordinator: the per-frame driver.
//!
//! The host calls [`LifecycleCoordinator::tick`] once per rendered frame with
//! the current detections and input state:
//!
//! ```text
//! ready? ── no ──▶ ignored
//!   │ yes
//!   ▼
//!   ├─ not paused ∧ inference idle ─▶ transient pass ─▶ persistent refinement (opt-in)
//!   │        otherwise ─▶ mark_all_untouched
//!   │
//!   ├─ commit released ∧ cooldown elapsed ─▶ commit pass ─▶ ObjectsIdentified
//!   │
//!   └─ reconciled ∧ idle eviction enabled ─▶ evict untouched persistent
//! ```
//!
//! [`LifecycleCoordinator::reset`] clears everything (world re-centring) and
//! emits [`TrackerEvent::PopulationReset`], which is distinct from a commit that
//! placed zero anchors.
//!
//! The coordinator takes `&mut self` for every mutation, so a reconciliation
//! pass cannot be re-entered or interleaved with another writer.

use alloc::vec::Vec;

use tracing::{debug, error, info, warn};

use crate::collaborator::{PoseResolver, RenderSink};
use crate::commit::{CommitOutcome, CommitPolicy, CommitTrigger};
use crate::config::TrackerConfig;
use crate::detection::Detection;
use crate::error::{TrackerError, TrackerResult};
use crate::registry::AnchorRegistry;
use crate::transient::{TransientPassStats, TransientPolicy};

// ─── Events and frame I/O ───────────────────────────────────────────────────

/// Notifications emitted by the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackerEvent {
    /// The first frame after [`LifecycleCoordinator::mark_ready`] was accepted.
    Started,
    /// A commit pass finished. `placed` may be zero.
    ObjectsIdentified {
        /// Persistent anchors newly placed by the commit.
        placed: usize,
    },
    /// Every anchor was dropped by [`LifecycleCoordinator::reset`].
    PopulationReset,
    /// The 2D detection overlay was hidden.
    OverlayHidden,
}

impl TrackerEvent {
    /// Population count carried by this event.
    ///
    /// `Some(n)` for a commit, `None` for a reset or an event that carries no count.
    pub fn identified_count(&self) -> Option<usize> {
        match self {
            TrackerEvent::ObjectsIdentified { placed } => Some(*placed),
            _ => None,
        }
    }
}

/// Host-supplied state for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput<'a> {
    /// Detections for this frame, in perception order.
    pub detections: &'a [Detection],
    /// Whether the perception pipeline is still computing a new result.
    pub inference_busy: bool,
    /// Whether the commit input is currently held.
    pub commit_held: bool,
    /// Seconds since the previous frame.
    pub delta_seconds: f32,
}

impl<'a> FrameInput<'a> {
    /// Frame with `detections`, inference idle, commit released, zero delta.
    pub fn new(detections: &'a [Detection]) -> Self {
        Self {
            detections,
            inference_busy: false,
            commit_held: false,
            delta_seconds: 0.0,
        }
    }

    /// Set the inference busy flag.
    pub fn with_inference_busy(mut self, busy: bool) -> Self {
        self.inference_busy = busy;
        self
    }

    /// Set the commit input level.
    pub fn with_commit_held(mut self, held: bool) -> Self {
        self.commit_held = held;
        self
    }

    /// Set the frame delta in seconds.
    pub fn with_delta(mut self, seconds: f32) -> Self {
        self.delta_seconds = seconds;
        self
    }
}

/// What happened during one [`LifecycleCoordinator::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// `false` when the frame was ignored because the coordinator is not ready.
    pub accepted: bool,
    /// `true` when the transient pass ran this frame.
    pub reconciled: bool,
    /// Transient pass counters (all zero when not reconciled).
    pub transient: TransientPassStats,
    /// Persistent anchors moved by key-match refinement.
    pub persistent_refined: usize,
    /// Commit outcome, when a commit fired this frame.
    pub commit: Option<CommitOutcome>,
    /// Persistent anchors removed by idle eviction.
    pub persistent_evicted: usize,
    /// Events emitted this frame, in order.
    pub events: Vec<TrackerEvent>,
}

// ─── Builder ────────────────────────────────────────────────────────────────

/// Assembles a [`LifecycleCoordinator`] and checks that every collaborator is present.
///
/// ```rust
/// use anchor_track::collaborator::{PassthroughResolver, RenderSink};
/// use anchor_track::config::TrackerConfig;
/// use anchor_track::coordinator::TrackerBuilder;
/// use anchor_track::detection::Pose;
/// use anchor_track::registry::AnchorKind;
///
/// struct NullSink;
/// impl RenderSink for NullSink {
///     type Handle = ();
///     fn spawn(&mut self, _: &str, _: &Pose, _: AnchorKind) {}
///     fn move_to(&mut self, _: &(), _: &Pose) {}
///     fn destroy(&mut self, _: ()) {}
/// }
///
/// let tracker = TrackerBuilder::new(TrackerConfig::default())
///     .pose_resolver(PassthroughResolver)
///     .render_sink(NullSink)
///     .build()
///     .expect("collaborators supplied");
/// assert!(tracker.registry().is_empty());
/// ```
pub struct TrackerBuilder<R, S> {
    config: TrackerConfig,
    resolver: Option<R>,
    sink: Option<S>,
}

impl<R: PoseResolver, S: RenderSink> TrackerBuilder<R, S> {
    /// Start a builder with `config`.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            resolver: None,
            sink: None,
        }
    }

    /// Supply the environment pose resolver.
    pub fn pose_resolver(mut self, resolver: R) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Supply the render sink.
    pub fn render_sink(mut self, sink: S) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Validate the configuration and build the coordinator.
    ///
    /// Fails with [`TrackerError::MissingCollaborator`] when a collaborator is
    /// absent. The failure is terminal: the host should disable tracking for the
    /// session rather than run a partially wired engine.
    pub fn build(self) -> TrackerResult<LifecycleCoordinator<R, S>> {
        if let Err(e) = self.config.validate() {
            error!(error = %e, "rejecting tracker configuration");
            return Err(e);
        }
        let resolver = self.resolver.ok_or_else(|| missing("pose_resolver"))?;
        let sink = self.sink.ok_or_else(|| missing("render_sink"))?;
        Ok(LifecycleCoordinator::new(self.config, resolver, sink))
    }
}

fn missing(collaborator: &'static str) -> TrackerError {
    let e = TrackerError::MissingCollaborator { collaborator };
    error!(error = %e, "tracking subsystem disabled");
    e
}

// ─── Lifecycle Coordinator ──────────────────────────────────────────────────

/// Owns the registry, both policies, and the collaborators, and drives them
/// once per frame.
pub struct LifecycleCoordinator<R: PoseResolver, S: RenderSink> {
    config: TrackerConfig,
    registry: AnchorRegistry<S::Handle>,
    transient: TransientPolicy,
    commit: CommitPolicy,
    trigger: CommitTrigger,
    resolver: R,
    sink: S,
    ready: bool,
    started: bool,
    paused: bool,
    overlay_visible: bool,
    held_before_ready: bool,
}

impl<R: PoseResolver, S: RenderSink> LifecycleCoordinator<R, S> {
    fn new(config: TrackerConfig, resolver: R, sink: S) -> Self {
        Self {
            registry: AnchorRegistry::new(),
            transient: TransientPolicy::from_config(&config),
            commit: CommitPolicy::from_config(&config),
            trigger: CommitTrigger::new(config.resume_cooldown_seconds),
            config,
            resolver,
            sink,
            ready: false,
            started: false,
            paused: false,
            overlay_visible: true,
            held_before_ready: false,
        }
    }

    // ── Gates ──────────────────────────────────────────────────────────────

    /// Open the readiness gate (model loaded, camera available).
    ///
    /// Frames passed to [`tick`](Self::tick) before this are ignored.
    pub fn mark_ready(&mut self) {
        if !self.ready {
            info!("tracker ready");
        }
        self.ready = true;
    }

    /// Enter or leave the pause state.
    ///
    /// Pausing suspends the transient pass and commits but keeps every anchor.
    /// Resuming hides the detection overlay; the returned event reports it.
    pub fn set_paused(&mut self, paused: bool) -> Option<TrackerEvent> {
        if self.paused == paused {
            return None;
        }
        self.paused = paused;
        info!(paused, "pause state changed");
        if paused {
            None
        } else {
            self.trigger.rearm();
            self.hide_overlay()
        }
    }

    // ── Frame driver ───────────────────────────────────────────────────────

    /// Run one frame.
    pub fn tick(&mut self, input: FrameInput<'_>) -> TickReport {
        let mut report = TickReport::default();
        if !self.ready {
            if input.commit_held && !self.held_before_ready {
                warn!("commit input ignored: tracker not ready");
            }
            self.held_before_ready = input.commit_held;
            return report;
        }
        report.accepted = true;
        if !self.started {
            self.started = true;
            report.events.push(TrackerEvent::Started);
            info!("tracker started");
        }

        let eligible = !self.paused && !input.inference_busy;
        if eligible {
            // the transient pass clears touch flags itself
            report.transient = self.transient.reconcile(
                &mut self.registry,
                input.detections,
                &mut self.resolver,
                &mut self.sink,
            );
            if self.config.refine_persistent_on_key_match {
                report.persistent_refined = self.refine_persistent(input.detections);
            }
            report.reconciled = true;
        } else {
            self.registry.mark_all_untouched();
        }

        let fire = if self.paused {
            self.trigger.hold_off(input.commit_held);
            false
        } else {
            self.trigger.update(input.commit_held, input.delta_seconds)
        };
        if fire {
            if let Some(event) = self.hide_overlay() {
                report.events.push(event);
            }
            let outcome = self.commit.commit(
                &mut self.registry,
                input.detections,
                &mut self.resolver,
                &mut self.sink,
            );
            report.events.push(TrackerEvent::ObjectsIdentified { placed: outcome.placed });
            report.commit = Some(outcome);
        }

        if eligible && self.config.evict_idle_persistent {
            report.persistent_evicted = self.registry.evict_untouched_persistent(&mut self.sink);
        }

        report
    }

    /// Drop every anchor of both kinds and clear the overlay.
    ///
    /// Called on world re-centring. Always clears, whether or not paused.
    pub fn reset(&mut self) -> Vec<TrackerEvent> {
        let removed = self.registry.clear_all(&mut self.sink);
        info!(removed, "tracker reset");
        let mut events = Vec::new();
        if let Some(event) = self.hide_overlay() {
            events.push(event);
        }
        events.push(TrackerEvent::PopulationReset);
        events
    }

    fn refine_persistent(&mut self, detections: &[Detection]) -> usize {
        let quantizer = *self.transient.quantizer();
        let mut moved = 0;
        for detection in detections {
            let key = quantizer.key(&detection.class_label, &detection.world_position);
            if !self.registry.persistent().iter().any(|a| a.key() == &key) {
                continue;
            }
            let pose = self.resolver.resolve_world_pose(&detection.world_position);
            moved += self.registry.refine_persistent(&key, pose, &mut self.sink);
        }
        moved
    }

    fn hide_overlay(&mut self) -> Option<TrackerEvent> {
        if !self.overlay_visible {
            return None;
        }
        self.overlay_visible = false;
        debug!("detection overlay hidden");
        Some(TrackerEvent::OverlayHidden)
    }

    // ── Read accessors ─────────────────────────────────────────────────────

    /// The anchor registry.
    pub fn registry(&self) -> &AnchorRegistry<S::Handle> {
        &self.registry
    }

    /// The configuration this coordinator was built with.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Whether the readiness gate is open.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the first frame has been accepted.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the coordinator is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the 2D detection overlay is still visible.
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// The render sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The pose resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Consume the coordinator and return its collaborators.
    ///
    /// Markers still alive in the sink are not destroyed.
    pub fn into_parts(self) -> (R, S) {
        (self.resolver, self.sink)
    }
}

impl<R: PoseResolver, S: RenderSink> core::fmt::Debug for LifecycleCoordinator<R, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LifecycleCoordinator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("ready", &self.ready)
            .field("started", &self.started)
            .field("paused", &self.paused)
            .field("overlay_visible", &self.overlay_visible)
            .finish_non_exhaustive()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::test_support::RecordingSink;
    use crate::collaborator::PassthroughResolver;

    type Tracker = LifecycleCoordinator<PassthroughResolver, RecordingSink>;
    type Builder = TrackerBuilder<PassthroughResolver, RecordingSink>;

    fn tracker(config: TrackerConfig) -> Tracker {
        let mut t = TrackerBuilder::new(config)
            .pose_resolver(PassthroughResolver)
            .render_sink(RecordingSink::default())
            .build()
            .expect("build");
        t.mark_ready();
        t
    }

    /// Press and release the commit input over two frames.
    fn press_commit(t: &mut Tracker, frame: &[Detection]) -> TickReport {
        t.tick(FrameInput::new(frame).with_commit_held(true).with_delta(0.016));
        t.tick(FrameInput::new(frame).with_delta(0.016))
    }

    // ── Builder ──────────────────────────────────────────────────────────

    #[test]
    fn test_build_requires_resolver() {
        let result = Builder::new(TrackerConfig::default())
            .render_sink(RecordingSink::default())
            .build();
        assert_eq!(
            result.err(),
            Some(TrackerError::MissingCollaborator { collaborator: "pose_resolver" })
        );
    }

    #[test]
    fn test_build_requires_sink() {
        let result = Builder::new(TrackerConfig::default())
            .pose_resolver(PassthroughResolver)
            .build();
        assert_eq!(
            result.err(),
            Some(TrackerError::MissingCollaborator { collaborator: "render_sink" })
        );
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let result = TrackerBuilder::new(TrackerConfig::new().with_spawn_distance_threshold(0.0))
            .pose_resolver(PassthroughResolver)
            .render_sink(RecordingSink::default())
            .build();
        assert!(matches!(result, Err(TrackerError::InvalidConfig { .. })));
    }

    // ── Gates ────────────────────────────────────────────────────────────

    #[test]
    fn test_frames_ignored_until_ready() {
        let mut t = TrackerBuilder::new(TrackerConfig::default())
            .pose_resolver(PassthroughResolver)
            .render_sink(RecordingSink::default())
            .build()
            .expect("build");
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0)];

        let report = t.tick(FrameInput::new(&frame));
        assert!(!report.accepted);
        assert!(t.registry().is_empty());

        t.mark_ready();
        let report = t.tick(FrameInput::new(&frame));
        assert!(report.accepted);
        assert_eq!(report.events, [TrackerEvent::Started]);
        assert_eq!(t.registry().transient_count(), 1);

        let report = t.tick(FrameInput::new(&frame));
        assert!(report.events.is_empty(), "Started is emitted once");
    }

    #[test]
    fn test_busy_inference_skips_reconciliation() {
        let mut t = tracker(TrackerConfig::default());
        t.tick(FrameInput::new(&[Detection::at("cup", 0.0, 0.0, 0.0)]));

        let report = t.tick(FrameInput::new(&[]).with_inference_busy(true));

        assert!(!report.reconciled);
        assert_eq!(t.registry().transient_count(), 1, "no eviction while busy");
        assert!(t.sink().destroyed.is_empty());
    }

    #[test]
    fn test_skipped_frame_still_clears_touch_flags() {
        let mut t = tracker(TrackerConfig::default());
        t.tick(FrameInput::new(&[Detection::at("cup", 0.0, 0.0, 0.0)]));
        assert!(t.registry().transient().all(|a| a.touched()));

        t.tick(FrameInput::new(&[]).with_inference_busy(true));

        assert_eq!(t.registry().transient_count(), 1);
        assert!(t.registry().transient().all(|a| !a.touched()));
    }

    #[test]
    fn test_reconciled_frame_clears_flags_once_per_pass() {
        let mut t = tracker(TrackerConfig::default());
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0)];
        press_commit(&mut t, &frame);

        let report = t.tick(FrameInput::new(&frame));

        assert!(report.reconciled);
        assert!(t.registry().transient().all(|a| a.touched()));
        assert!(t.registry().persistent().iter().all(|a| !a.touched()));
    }

    #[test]
    fn test_held_before_ready_is_reported_per_press() {
        let mut t = TrackerBuilder::new(TrackerConfig::default())
            .pose_resolver(PassthroughResolver)
            .render_sink(RecordingSink::default())
            .build()
            .expect("build");
        for _ in 0..3 {
            assert!(!t.tick(FrameInput::new(&[]).with_commit_held(true)).accepted);
        }
        assert!(t.held_before_ready);
        t.tick(FrameInput::new(&[]));
        assert!(!t.held_before_ready);
    }

    #[test]
    fn test_resume_without_paused_frames_still_cools_down() {
        let mut t = tracker(TrackerConfig::default());
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0)];
        t.tick(FrameInput::new(&frame).with_commit_held(true).with_delta(0.016));

        t.set_paused(true);
        t.set_paused(false);
        let report = t.tick(FrameInput::new(&frame).with_delta(0.016));

        assert!(report.commit.is_none(), "release right after resume is swallowed");
        assert_eq!(t.registry().persistent_count(), 0);
    }

    #[test]
    fn test_pause_freezes_transient_markers() {
        let mut t = tracker(TrackerConfig::default());
        t.tick(FrameInput::new(&[Detection::at("cup", 0.0, 0.0, 0.0)]));

        assert_eq!(t.set_paused(true), None);
        let report = t.tick(FrameInput::new(&[]));

        assert!(!report.reconciled);
        assert_eq!(t.registry().transient_count(), 1, "pausing never clears");
    }

    #[test]
    fn test_resume_hides_overlay_once() {
        let mut t = tracker(TrackerConfig::default());
        t.set_paused(true);
        assert_eq!(t.set_paused(false), Some(TrackerEvent::OverlayHidden));
        t.set_paused(true);
        assert_eq!(t.set_paused(false), None);
        assert!(!t.overlay_visible());
    }

    // ── Commit ───────────────────────────────────────────────────────────

    #[test]
    fn test_commit_emits_count_and_hides_overlay() {
        let mut t = tracker(TrackerConfig::default());
        let frame = [Detection::at("chair", 2.0, 0.0, 1.0), Detection::at("chair", 2.1, 0.0, 1.0)];
        t.tick(FrameInput::new(&frame));

        let report = press_commit(&mut t, &frame);

        assert_eq!(
            report.events,
            [TrackerEvent::OverlayHidden, TrackerEvent::ObjectsIdentified { placed: 1 }]
        );
        assert_eq!(report.commit, Some(CommitOutcome { placed: 1, matched: 1 }));
        assert_eq!(t.registry().persistent_count(), 1);
    }

    #[test]
    fn test_commit_suppressed_while_paused_and_during_cooldown() {
        let mut t = tracker(TrackerConfig::default());
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0)];
        t.tick(FrameInput::new(&frame));

        t.set_paused(true);
        let report = press_commit(&mut t, &frame);
        assert!(report.commit.is_none(), "no commit while paused");

        t.tick(FrameInput::new(&frame).with_commit_held(true).with_delta(0.016));
        t.set_paused(false);
        let report = t.tick(FrameInput::new(&frame).with_delta(0.016));
        assert!(report.commit.is_none(), "release inside cooldown is swallowed");
        assert_eq!(t.registry().persistent_count(), 0);

        for _ in 0..10 {
            t.tick(FrameInput::new(&frame).with_delta(0.016));
        }
        let report = press_commit(&mut t, &frame);
        assert_eq!(report.commit.map(|c| c.placed), Some(1));
    }

    #[test]
    fn test_commit_runs_even_when_inference_busy() {
        let mut t = tracker(TrackerConfig::default());
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0)];
        t.tick(FrameInput::new(&frame).with_commit_held(true));
        let report = t.tick(FrameInput::new(&frame).with_inference_busy(true));
        assert_eq!(report.commit.map(|c| c.placed), Some(1));
        assert!(!report.reconciled);
    }

    #[test]
    fn test_zero_count_commit_is_distinct_from_reset() {
        let mut t = tracker(TrackerConfig::default());
        let report = press_commit(&mut t, &[]);
        let commit_event = *report.events.last().expect("event");
        let reset_event = *t.reset().last().expect("event");

        assert_eq!(commit_event.identified_count(), Some(0));
        assert_eq!(reset_event, TrackerEvent::PopulationReset);
        assert_eq!(reset_event.identified_count(), None);
    }

    // ── Reset ────────────────────────────────────────────────────────────

    #[test]
    fn test_reset_clears_both_kinds() {
        let mut t = tracker(TrackerConfig::default());
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0), Detection::at("mug", 1.0, 0.0, 0.0)];
        t.tick(FrameInput::new(&frame));
        press_commit(&mut t, &frame);
        assert_eq!(t.registry().len(), 4);

        let events = t.reset();

        assert!(t.registry().is_empty());
        assert_eq!(t.sink().live(), 0);
        assert_eq!(events, [TrackerEvent::PopulationReset], "overlay already hidden by commit");
    }

    #[test]
    fn test_reset_while_paused_still_clears() {
        let mut t = tracker(TrackerConfig::default());
        t.tick(FrameInput::new(&[Detection::at("cup", 0.0, 0.0, 0.0)]));
        t.set_paused(true);
        let events = t.reset();
        assert!(t.registry().is_empty());
        assert_eq!(events, [TrackerEvent::OverlayHidden, TrackerEvent::PopulationReset]);
    }

    // ── Opt-in persistent behaviour ──────────────────────────────────────

    #[test]
    fn test_idle_persistent_eviction() {
        let mut t = tracker(TrackerConfig::new().with_idle_persistent_eviction(true));
        let frame = [Detection::at("cup", 0.0, 0.0, 0.0)];
        press_commit(&mut t, &frame);
        assert_eq!(t.registry().persistent_count(), 1);

        let report = t.tick(FrameInput::new(&[]));

        assert_eq!(report.persistent_evicted, 1);
        assert_eq!(t.registry().persistent_count(), 0);
    }

    #[test]
    fn test_idle_persistent_kept_by_refinement() {
        let config = TrackerConfig::new()
            .with_idle_persistent_eviction(true)
            .with_persistent_refinement(true);
        let mut t = tracker(config);
        press_commit(&mut t, &[Detection::at("cup", 1.0, 0.0, 0.0)]);

        let report = t.tick(FrameInput::new(&[Detection::at("cup", 1.03, 0.0, 0.0)]));

        assert_eq!(report.persistent_refined, 1);
        assert_eq!(report.persistent_evicted, 0);
        let placed = &t.registry().persistent()[0];
        assert!((placed.position().x - 1.03).abs() < 1e-6, "x={}", placed.position().x);
    }

    #[test]
    fn test_persistent_default_is_never_evicted_or_moved() {
        let mut t = tracker(TrackerConfig::default());
        press_commit(&mut t, &[Detection::at("cup", 1.0, 0.0, 0.0)]);

        for _ in 0..5 {
            t.tick(FrameInput::new(&[Detection::at("cup", 1.03, 0.0, 0.0)]));
        }
        t.tick(FrameInput::new(&[]));

        assert_eq!(t.registry().persistent_count(), 1);
        assert_eq!(t.registry().persistent()[0].position().x, 1.0);
    }
}
