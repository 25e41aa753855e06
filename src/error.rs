//! Setup-time errors.
//!
//! Matching and registry operations never fail: an unmatched detection is an
//! expected outcome, not an error. The only conditions surfaced to the host are
//! the ones that make the tracking subsystem unusable for the whole session, and
//! they are terminal (the host disables tracking instead of retrying).

use alloc::string::String;

/// Errors raised while building a [`LifecycleCoordinator`].
///
/// [`LifecycleCoordinator`]: crate::coordinator::LifecycleCoordinator
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackerError {
    /// A required external collaborator (pose resolver or render sink) was not
    /// supplied at setup.
    #[error("required collaborator `{collaborator}` was not provided; tracking disabled")]
    MissingCollaborator {
        /// Name of the missing collaborator.
        collaborator: &'static str,
    },
    /// A configuration value is outside its accepted range.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending [`TrackerConfig`](crate::config::TrackerConfig) field.
        field: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },
}

/// Result alias used by the setup path.
pub type TrackerResult<T> = Result<T, TrackerError>;
