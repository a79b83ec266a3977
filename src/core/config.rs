//! # Registry configuration.
//!
//! Provides [`RegistryConfig`] centralized settings for a [`Registry`](crate::Registry).
//!
//! ## Sentinel values
//! - `capacity = 0` → no preallocation (storage grows on demand)

use crate::policies::{FailurePolicy, Ownership};

/// Configuration for a single registry.
///
/// ## Field semantics
/// - `ownership`: Mode used by [`Registry::add`](crate::Registry::add)
/// - `failure`: How `try_broadcast*` reacts to a failing callback
/// - `isolate_panics`: Catch callback panics and report them as failures
/// - `capacity`: Initial storage capacity (`0` = grow on demand)
///
/// ## Notes
/// All fields are public. Prefer the helper accessors over checking sentinels directly.
#[derive(Clone, Debug)]
pub struct RegistryConfig {
    /// Default ownership mode for `add`.
    ///
    /// The explicit `add_with`/`add_owned`/`add_observed` variants ignore it.
    pub ownership: Ownership,

    /// Failure policy applied by `try_broadcast`, `try_broadcast_excluding`
    /// and `broadcast_async`.
    pub failure: FailurePolicy,

    /// Whether callback panics are caught during dispatch.
    ///
    /// - `false` = a panic unwinds out of the broadcast call (remaining participants skipped)
    /// - `true` = the panic is converted to `DispatchError::Panicked` and handled by `failure`
    pub isolate_panics: bool,

    /// Initial capacity of the entry storage.
    ///
    /// - `0` = grow on demand
    /// - `n > 0` = preallocate room for `n` entries
    pub capacity: usize,
}

impl RegistryConfig {
    /// Preset for mediator-style registries: colleagues are owned by the registry.
    pub fn colleagues() -> Self {
        Self {
            ownership: Ownership::Exclusive,
            ..Self::default()
        }
    }

    /// Preset for multicast delegates: delegates are only observed.
    pub fn delegates() -> Self {
        Self {
            ownership: Ownership::Observing,
            ..Self::default()
        }
    }

    /// Returns the initial storage capacity as an `Option`.
    ///
    /// - `None` → grow on demand
    /// - `Some(n)` → preallocate `n` entries
    #[inline]
    pub fn initial_capacity(&self) -> Option<usize> {
        if self.capacity == 0 {
            None
        } else {
            Some(self.capacity)
        }
    }
}

impl Default for RegistryConfig {
    /// Default configuration:
    ///
    /// - `ownership = Ownership::Exclusive`
    /// - `failure = FailurePolicy::Collect` (every participant called, failures reported together)
    /// - `isolate_panics = false`
    /// - `capacity = 0` (grow on demand)
    fn default() -> Self {
        Self {
            ownership: Ownership::default(),
            failure: FailurePolicy::default(),
            isolate_panics: false,
            capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = RegistryConfig::default();
        assert_eq!(cfg.ownership, Ownership::Exclusive);
        assert_eq!(cfg.failure, FailurePolicy::Collect);
        assert!(!cfg.isolate_panics);
        assert_eq!(cfg.initial_capacity(), None);
    }

    #[test]
    fn test_presets_differ_only_in_ownership() {
        assert_eq!(RegistryConfig::colleagues().ownership, Ownership::Exclusive);
        let delegates = RegistryConfig::delegates();
        assert_eq!(delegates.ownership, Ownership::Observing);
        assert_eq!(delegates.failure, FailurePolicy::Collect);
    }

    #[test]
    fn test_capacity_sentinel() {
        let cfg = RegistryConfig {
            capacity: 16,
            ..RegistryConfig::default()
        };
        assert_eq!(cfg.initial_capacity(), Some(16));
    }
}
