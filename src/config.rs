//! Tracker configuration, fixed at setup.
//!
//! The configuration is validated once by
//! [`TrackerBuilder::build`](crate::coordinator::TrackerBuilder::build) and is
//! never reloaded while the coordinator runs.

use alloc::format;

use crate::error::{TrackerError, TrackerResult};
use crate::key::MAX_KEY_PRECISION;

/// Tunables for the association engine.
///
/// Default values:
/// - `spawn_distance_threshold`: 0.25 m
/// - `stale_key_decimal_precision`: 1 decimal place
/// - `resume_cooldown_seconds`: 0.1 s
/// - `transient_grace_frames`: 0 (markers mirror the current frame exactly)
/// - `evict_idle_persistent`: off
/// - `refine_persistent_on_key_match`: off
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Dedup radius in metres. A commit never places a second persistent anchor
    /// of the same class strictly closer than this to an existing one.
    pub spawn_distance_threshold: f32,
    /// Number of decimal places kept when quantising positions into transient keys.
    ///
    /// Range [0, 6].
    pub stale_key_decimal_precision: u8,
    /// Commit suppression window after the pause state is left, in seconds.
    pub resume_cooldown_seconds: f32,
    /// Consecutive unmatched frames a transient anchor survives before eviction.
    pub transient_grace_frames: u32,
    /// Destroy persistent anchors that no detection touched during a reconciled frame.
    pub evict_idle_persistent: bool,
    /// Move persistent anchors whose placement key reappears in the current frame.
    pub refine_persistent_on_key_match: bool,
}

impl TrackerConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dedup radius used by commits.
    pub fn with_spawn_distance_threshold(mut self, metres: f32) -> Self {
        self.spawn_distance_threshold = metres;
        self
    }

    /// Set the transient key precision in decimal places.
    pub fn with_key_precision(mut self, decimals: u8) -> Self {
        self.stale_key_decimal_precision = decimals;
        self
    }

    /// Set the post-pause commit cooldown.
    pub fn with_resume_cooldown(mut self, seconds: f32) -> Self {
        self.resume_cooldown_seconds = seconds;
        self
    }

    /// Set how many unmatched frames a transient anchor survives.
    pub fn with_transient_grace_frames(mut self, frames: u32) -> Self {
        self.transient_grace_frames = frames;
        self
    }

    /// Enable or disable idle eviction of persistent anchors.
    pub fn with_idle_persistent_eviction(mut self, enabled: bool) -> Self {
        self.evict_idle_persistent = enabled;
        self
    }

    /// Enable or disable key-match refinement of persistent anchors.
    pub fn with_persistent_refinement(mut self, enabled: bool) -> Self {
        self.refine_persistent_on_key_match = enabled;
        self
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> TrackerResult<()> {
        let threshold = self.spawn_distance_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(TrackerError::InvalidConfig {
                field: "spawn_distance_threshold",
                reason: format!("must be a positive finite distance, got {threshold}"),
            });
        }
        if self.stale_key_decimal_precision > MAX_KEY_PRECISION {
            return Err(TrackerError::InvalidConfig {
                field: "stale_key_decimal_precision",
                reason: format!(
                    "must be at most {MAX_KEY_PRECISION}, got {}",
                    self.stale_key_decimal_precision
                ),
            });
        }
        let cooldown = self.resume_cooldown_seconds;
        if !cooldown.is_finite() || cooldown < 0.0 {
            return Err(TrackerError::InvalidConfig {
                field: "resume_cooldown_seconds",
                reason: format!("must be a non-negative finite duration, got {cooldown}"),
            });
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            spawn_distance_threshold: 0.25,
            stale_key_decimal_precision: 1,
            resume_cooldown_seconds: 0.1,
            transient_grace_frames: 0,
            evict_idle_persistent: false,
            refine_persistent_on_key_match: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = TrackerConfig::default();
        assert!((cfg.spawn_distance_threshold - 0.25).abs() < f32::EPSILON);
        assert_eq!(cfg.stale_key_decimal_precision, 1);
        assert!((cfg.resume_cooldown_seconds - 0.1).abs() < f32::EPSILON);
        assert_eq!(cfg.transient_grace_frames, 0);
        assert!(!cfg.evict_idle_persistent);
        assert!(!cfg.refine_persistent_on_key_match);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        for bad in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            let cfg = TrackerConfig::new().with_spawn_distance_threshold(bad);
            match cfg.validate() {
                Err(TrackerError::InvalidConfig { field, .. }) => {
                    assert_eq!(field, "spawn_distance_threshold")
                }
                other => panic!("threshold {} accepted: {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_rejects_excessive_precision() {
        let cfg = TrackerConfig::new().with_key_precision(MAX_KEY_PRECISION + 1);
        assert!(matches!(
            cfg.validate(),
            Err(TrackerError::InvalidConfig { field: "stale_key_decimal_precision", .. })
        ));
        let cfg = TrackerConfig::new().with_key_precision(MAX_KEY_PRECISION);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_cooldown() {
        let cfg = TrackerConfig::new().with_resume_cooldown(-0.1);
        assert!(matches!(
            cfg.validate(),
            Err(TrackerError::InvalidConfig { field: "resume_cooldown_seconds", .. })
        ));
        let cfg = TrackerConfig::new().with_resume_cooldown(0.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_builder_methods_chain() {
        let cfg = TrackerConfig::new()
            .with_spawn_distance_threshold(0.5)
            .with_key_precision(2)
            .with_transient_grace_frames(3)
            .with_idle_persistent_eviction(true)
            .with_persistent_refinement(true);
        assert!((cfg.spawn_distance_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(cfg.stale_key_decimal_precision, 2);
        assert_eq!(cfg.transient_grace_frames, 3);
        assert!(cfg.evict_idle_persistent);
        assert!(cfg.refine_persistent_on_key_match);
    }
}
