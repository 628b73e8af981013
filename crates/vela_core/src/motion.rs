//! Reduced-motion policy
//!
//! A single process-wide flag read from the host's media-capability query at
//! startup and immutable for the session. Subsystems consult it before
//! constructing any animation; under [`MotionPolicy::Reduced`] they jump
//! straight to their end state.
//!
//! The global is a convenience for hosts. Every Vela constructor also accepts
//! an explicit policy, which is what tests use.

use std::sync::OnceLock;

static MOTION_POLICY: OnceLock<MotionPolicy> = OnceLock::new();

/// Session-wide motion preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MotionPolicy {
    /// Animate normally
    #[default]
    Full,
    /// Suppress non-essential motion: bindings apply end states with zero
    /// intermediate frames, the particle field renders a static frame
    Reduced,
}

impl MotionPolicy {
    pub fn is_reduced(&self) -> bool {
        matches!(self, MotionPolicy::Reduced)
    }

    /// Map the host's `prefers-reduced-motion` query result
    pub fn from_media_query(prefers_reduced: bool) -> Self {
        if prefers_reduced {
            MotionPolicy::Reduced
        } else {
            MotionPolicy::Full
        }
    }
}

/// Set the process-wide motion policy
///
/// Call once at startup, after querying the host environment.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init_motion_policy(policy: MotionPolicy) {
    if MOTION_POLICY.set(policy).is_err() {
        panic!("init_motion_policy() called more than once");
    }
    tracing::debug!(?policy, "motion policy initialized");
}

/// Set the process-wide motion policy, returning `false` if already set
pub fn try_init_motion_policy(policy: MotionPolicy) -> bool {
    MOTION_POLICY.set(policy).is_ok()
}

/// Read the process-wide motion policy
///
/// Falls back to [`MotionPolicy::Full`] when the host never initialized it.
pub fn motion_policy() -> MotionPolicy {
    MOTION_POLICY.get().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_media_query() {
        assert_eq!(MotionPolicy::from_media_query(true), MotionPolicy::Reduced);
        assert_eq!(MotionPolicy::from_media_query(false), MotionPolicy::Full);
        assert!(MotionPolicy::Reduced.is_reduced());
        assert!(!MotionPolicy::Full.is_reduced());
    }
}
