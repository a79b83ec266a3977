//! # Registry entries: keys and mixed-ownership slots.
//!
//! Every entry pairs a process-unique [`Key`] with a [`Slot`] holding the participant
//! either strongly (`Arc`) or weakly (`Weak`).
//!
//! ## Identity
//! Participants are compared by the address of their shared allocation (thin data
//! pointer; trait-object vtables are ignored). A `Weak` keeps the allocation itself
//! reserved, so the address of a stale observing entry can not be handed to a new
//! participant until the entry is pruned.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Weak};

use crate::policies::Ownership;

/// Global sequence counter for entry keys.
static KEY_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token returned by `add`.
///
/// Keys are unique within the process and increase monotonically in creation order,
/// so two entries for the same participant still have distinct keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(u64);

impl Key {
    /// Allocates the next key.
    pub(crate) fn next() -> Self {
        Key(KEY_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw numeric value of the key.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Address used as participant identity.
#[inline]
pub(crate) fn identity<T: ?Sized>(participant: &Arc<T>) -> *const () {
    Arc::as_ptr(participant).cast()
}

/// Participant storage: owning or observing.
pub(crate) enum Slot<T: ?Sized> {
    Owned(Arc<T>),
    Observed(Weak<T>),
}

impl<T: ?Sized> Slot<T> {
    /// Wraps `participant` according to `ownership`.
    ///
    /// For [`Ownership::Observing`] the passed `Arc` is released here; if it was the
    /// last strong handle, the slot is stale from the start.
    pub(crate) fn new(participant: Arc<T>, ownership: Ownership) -> Self {
        match ownership {
            Ownership::Exclusive => Slot::Owned(participant),
            Ownership::Observing => Slot::Observed(Arc::downgrade(&participant)),
        }
    }

    pub(crate) fn ownership(&self) -> Ownership {
        match self {
            Slot::Owned(_) => Ownership::Exclusive,
            Slot::Observed(_) => Ownership::Observing,
        }
    }

    /// Returns `false` once an observed participant has been destroyed.
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        match self {
            Slot::Owned(_) => true,
            Slot::Observed(weak) => weak.strong_count() > 0,
        }
    }

    /// Temporary strong handle for a snapshot; never stored back into the slot.
    pub(crate) fn upgrade(&self) -> Option<Arc<T>> {
        match self {
            Slot::Owned(strong) => Some(Arc::clone(strong)),
            Slot::Observed(weak) => weak.upgrade(),
        }
    }

    #[inline]
    pub(crate) fn identity(&self) -> *const () {
        match self {
            Slot::Owned(strong) => identity(strong),
            Slot::Observed(weak) => Weak::as_ptr(weak).cast(),
        }
    }
}

/// One slot of the registry.
pub(crate) struct Entry<T: ?Sized> {
    pub(crate) key: Key,
    pub(crate) slot: Slot<T>,
}

impl<T: ?Sized> Entry<T> {
    pub(crate) fn new(participant: Arc<T>, ownership: Ownership) -> Self {
        Self {
            key: Key::next(),
            slot: Slot::new(participant, ownership),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_monotonic() {
        let a = Key::next();
        let b = Key::next();
        assert!(b > a);
        assert_eq!(format!("{a}"), format!("#{}", a.get()));
    }

    #[test]
    fn test_observed_slot_goes_stale() {
        let owner = Arc::new(7u32);
        let slot = Slot::new(Arc::clone(&owner), Ownership::Observing);
        assert!(slot.is_live());
        assert_eq!(slot.upgrade().as_deref(), Some(&7));

        drop(owner);
        assert!(!slot.is_live());
        assert!(slot.upgrade().is_none());
    }

    #[test]
    fn test_owned_slot_keeps_value() {
        let slot = Slot::new(Arc::new(String::from("kept")), Ownership::Exclusive);
        assert!(slot.is_live());
        assert_eq!(slot.ownership(), Ownership::Exclusive);
        assert_eq!(slot.upgrade().as_deref().map(String::as_str), Some("kept"));
    }

    #[test]
    fn test_identity_matches_across_modes() {
        let p: Arc<dyn Fn() + Send + Sync> = Arc::new(|| {});
        let owned = Slot::new(Arc::clone(&p), Ownership::Exclusive);
        let observed = Slot::new(Arc::clone(&p), Ownership::Observing);
        assert_eq!(owned.identity(), identity(&p));
        assert_eq!(observed.identity(), identity(&p));
    }
}
