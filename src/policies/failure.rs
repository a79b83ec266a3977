//! # Failure policies for broadcast dispatch.
//!
//! [`FailurePolicy`] decides what a broadcast does when the callback fails for one
//! participant (returns `Err`, or panics while panic isolation is enabled).
//!
//! ```text
//! FailurePolicy::Abort    → stop at the first failure, skip remaining participants
//! FailurePolicy::Collect  → keep going, return every failure afterwards (default)
//! FailurePolicy::Discard  → keep going, count and log failures, return Ok
//! ```
//!
//! Participants are always visited in insertion order, so under `Abort` the set of
//! participants that did receive the call is a prefix of the snapshot.

/// Policy controlling how per-participant callback failures affect a broadcast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Propagate the first failure and stop dispatching.
    Abort,
    /// Continue dispatching and report all failures once the snapshot is exhausted (default).
    #[default]
    Collect,
    /// Continue dispatching; failures are logged and counted, never returned.
    Discard,
}

impl FailurePolicy {
    /// Returns `true` if dispatch should continue after a failure.
    #[inline]
    pub fn continues(&self) -> bool {
        !matches!(self, FailurePolicy::Abort)
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailurePolicy::Abort => "abort",
            FailurePolicy::Collect => "collect",
            FailurePolicy::Discard => "discard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_collects() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::Collect);
    }

    #[test]
    fn test_only_abort_stops() {
        assert!(!FailurePolicy::Abort.continues());
        assert!(FailurePolicy::Collect.continues());
        assert!(FailurePolicy::Discard.continues());
    }
}
