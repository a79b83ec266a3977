//! # Registry - insertion-ordered, mixed-ownership participant set.
//!
//! [`Registry`] holds participants of a caller-chosen capability type `T` (usually a
//! trait object) and broadcasts calls to the ones that are still alive.
//!
//! ## Architecture
//! ```text
//! add(Arc<T>, Ownership) ──► Mutex<Vec<Entry>> ◄── remove(&Arc<T>) / remove_key(Key)
//!                                   │
//!                     lock ─► prune stale ─► snapshot [(Key, Arc<T>)] ─► unlock
//!                                                      │
//!                                                      ▼
//!                                   broadcast*: invoke(&T) per participant, in order
//! ```
//!
//! ## Rules
//! - Order is insertion order; there is no sorting and no de-duplication.
//! - Identity is the address of the shared allocation, never `PartialEq`.
//! - Pruning is lazy: stale observing entries are dropped by the next scan
//!   (`remove`, `live_participants`, `len`, `contains`, `prune`, every broadcast).
//!   Read-shaped calls therefore mutate storage and take the same lock as `add`.
//! - The lock is never held while user code runs: callbacks, `Drop` of removed
//!   participants and snapshot drops all happen after it is released. Callbacks may
//!   call back into the same registry.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::config::RegistryConfig;
use crate::core::dispatch::{self, Delivery};
use crate::core::entry::{Entry, Key, identity};
use crate::error::BroadcastError;
use crate::policies::Ownership;

/// Mixed-ownership subscriber registry.
///
/// `T` is the capability all participants share; participants are handed in as
/// `Arc<T>` so both ownership modes can be expressed:
/// - [`Ownership::Exclusive`] entries keep the participant alive;
/// - [`Ownership::Observing`] entries hold a `Weak` and disappear once the participant
///   is dropped by its owners.
///
/// All methods take `&self`; share the registry with `Arc<Registry<T>>` when several
/// threads need it.
pub struct Registry<T: ?Sized> {
    config: RegistryConfig,
    entries: Mutex<Vec<Entry<T>>>,
}

impl<T: ?Sized> Registry<T> {
    /// Creates an empty registry with [`RegistryConfig::default`].
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        let entries = match config.initial_capacity() {
            Some(n) => Vec::with_capacity(n),
            None => Vec::new(),
        };
        Self {
            config,
            entries: Mutex::new(entries),
        }
    }

    /// Returns the configuration this registry was built with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Appends `participant` using the configured default [`Ownership`].
    pub fn add(&self, participant: Arc<T>) -> Key {
        self.add_with(participant, self.config.ownership)
    }

    /// Appends `participant` as an owned entry.
    pub fn add_owned(&self, participant: Arc<T>) -> Key {
        self.add_with(participant, Ownership::Exclusive)
    }

    /// Appends an observing entry for `participant`; the registry only keeps a `Weak`.
    pub fn add_observed(&self, participant: &Arc<T>) -> Key {
        self.add_with(Arc::clone(participant), Ownership::Observing)
    }

    /// Appends `participant` with an explicit ownership mode.
    ///
    /// Always succeeds; adding the same participant twice creates two entries.
    /// With [`Ownership::Observing`], passing the only strong handle produces an
    /// entry that is already stale and will be pruned by the next scan.
    pub fn add_with(&self, participant: Arc<T>, ownership: Ownership) -> Key {
        // Built before locking: releasing an observed Arc may run the participant's Drop.
        let entry = Entry::new(participant, ownership);
        let key = entry.key;
        self.entries.lock().push(entry);

        tracing::trace!(%key, ownership = ownership.as_label(), "participant added");
        key
    }

    /// Removes the first live entry whose participant is `participant` (by identity).
    ///
    /// Returns `false` when nothing matched; that is a no-op, not an error.
    /// Stale observing entries are pruned along the way.
    pub fn remove(&self, participant: &Arc<T>) -> bool {
        let target = identity(participant);
        self.take_first(|entry| entry.slot.identity() == target)
    }

    /// Removes the entry created with `key`, if it is still present and live.
    pub fn remove_key(&self, key: Key) -> bool {
        self.take_first(|entry| entry.key == key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let drained = std::mem::take(&mut *self.entries.lock());
        tracing::trace!(count = drained.len(), "registry cleared");
        drop(drained);
    }

    // ---------------------------
    // Live view
    // ---------------------------

    /// Returns a snapshot of live participants in insertion order.
    ///
    /// Stale observing entries found during the scan are removed from storage before
    /// returning, so this call mutates the registry even though it reads like a getter.
    /// The returned handles are temporary: holding them keeps observed participants
    /// alive only as long as the `Vec` lives.
    pub fn live_participants(&self) -> Vec<Arc<T>> {
        self.snapshot().into_iter().map(|(_, p)| p).collect()
    }

    /// Like [`live_participants`](Self::live_participants), paired with each entry's key.
    pub fn live_entries(&self) -> Vec<(Key, Arc<T>)> {
        self.snapshot()
    }

    /// Number of live entries (prunes).
    pub fn len(&self) -> usize {
        let (len, pruned) = {
            let mut entries = self.entries.lock();
            let pruned = prune_stale(&mut entries);
            (entries.len(), pruned)
        };
        report_pruned(pruned);
        len
    }

    /// Returns `true` if no live entry remains (prunes).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `participant` has a live entry (prunes).
    pub fn contains(&self, participant: &Arc<T>) -> bool {
        let target = identity(participant);
        let (found, pruned) = {
            let mut entries = self.entries.lock();
            let pruned = prune_stale(&mut entries);
            let found = entries.iter().any(|e| e.slot.identity() == target);
            (found, pruned)
        };
        report_pruned(pruned);
        found
    }

    /// Drops every stale observing entry now; returns how many were dropped.
    pub fn prune(&self) -> usize {
        let pruned = prune_stale(&mut self.entries.lock());
        report_pruned(pruned);
        pruned
    }

    // ---------------------------
    // Broadcast
    // ---------------------------

    /// Calls `invoke` once per live participant, in insertion order.
    ///
    /// The live set is snapshotted first: participants added or removed by `invoke`
    /// only show up in the next call. With panic isolation enabled, caught panics are
    /// logged and dispatch follows the configured [`FailurePolicy`](crate::FailurePolicy).
    pub fn broadcast<F>(&self, mut invoke: F)
    where
        F: FnMut(&T),
    {
        let outcome = self.try_broadcast(|p| {
            invoke(p);
            Ok::<(), Infallible>(())
        });
        log_lost(outcome);
    }

    /// Like [`broadcast`](Self::broadcast), skipping every entry for `excluded`.
    ///
    /// Exclusion is by identity: a distinct participant that compares equal is still called.
    pub fn broadcast_excluding<F>(&self, excluded: &Arc<T>, mut invoke: F)
    where
        F: FnMut(&T),
    {
        let outcome = self.try_broadcast_excluding(excluded, |p| {
            invoke(p);
            Ok::<(), Infallible>(())
        });
        log_lost(outcome);
    }

    /// Fallible broadcast; failures are handled per the configured
    /// [`FailurePolicy`](crate::FailurePolicy).
    ///
    /// # Errors
    /// - [`BroadcastError::Aborted`] under `Abort`, at the first failure.
    /// - [`BroadcastError::Incomplete`] under `Collect`, after every participant was called.
    pub fn try_broadcast<E, F>(&self, invoke: F) -> Result<Delivery, BroadcastError<E>>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        let targets = self.snapshot();
        dispatch::run(
            &targets,
            self.config.failure,
            self.config.isolate_panics,
            invoke,
        )
    }

    /// Fallible variant of [`broadcast_excluding`](Self::broadcast_excluding).
    ///
    /// # Errors
    /// Same as [`try_broadcast`](Self::try_broadcast).
    pub fn try_broadcast_excluding<E, F>(
        &self,
        excluded: &Arc<T>,
        invoke: F,
    ) -> Result<Delivery, BroadcastError<E>>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        let skip = identity(excluded);
        let mut targets = self.snapshot();
        targets.retain(|(_, p)| identity(p) != skip);
        dispatch::run(
            &targets,
            self.config.failure,
            self.config.isolate_panics,
            invoke,
        )
    }

    /// Async broadcast: awaits `invoke(participant)` for each live participant in turn.
    ///
    /// The snapshot is taken before the first await and the registry lock is never held
    /// across an await point.
    ///
    /// # Errors
    /// Same as [`try_broadcast`](Self::try_broadcast).
    pub async fn broadcast_async<E, F, Fut>(&self, invoke: F) -> Result<Delivery, BroadcastError<E>>
    where
        F: FnMut(Arc<T>) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let targets = self.snapshot();
        dispatch::run_async(
            targets,
            self.config.failure,
            self.config.isolate_panics,
            invoke,
        )
        .await
    }

    // ---------------------------
    // Helpers
    // ---------------------------

    /// Prunes, then copies out live participants with their keys.
    fn snapshot(&self) -> Vec<(Key, Arc<T>)> {
        let (live, pruned) = {
            let mut entries = self.entries.lock();
            let before = entries.len();
            let mut live = Vec::with_capacity(before);
            entries.retain(|e| match e.slot.upgrade() {
                Some(p) => {
                    live.push((e.key, p));
                    true
                }
                None => false,
            });
            let pruned = before - entries.len();
            (live, pruned)
        };
        report_pruned(pruned);
        live
    }

    /// Prunes, then removes the first live entry accepted by `matches`.
    fn take_first(&self, matches: impl Fn(&Entry<T>) -> bool) -> bool {
        let (removed, pruned) = {
            let mut entries = self.entries.lock();
            let pruned = prune_stale(&mut entries);
            let idx = entries.iter().position(|e| matches(e));
            let removed = idx.map(|idx| entries.remove(idx));
            (removed, pruned)
        };
        report_pruned(pruned);

        match removed {
            Some(entry) => {
                tracing::trace!(
                    key = %entry.key,
                    ownership = entry.slot.ownership().as_label(),
                    "participant removed"
                );
                // Dropped here, outside the lock.
                drop(entry);
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn stored(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Drops stale observing entries; returns how many were dropped.
fn prune_stale<T: ?Sized>(entries: &mut Vec<Entry<T>>) -> usize {
    let before = entries.len();
    entries.retain(|e| e.slot.is_live());
    before - entries.len()
}

fn report_pruned(pruned: usize) {
    if pruned > 0 {
        tracing::debug!(pruned, "stale participants pruned");
    }
}

fn log_lost(outcome: Result<Delivery, BroadcastError<Infallible>>) {
    if let Err(err) = outcome {
        tracing::warn!(
            label = err.as_label(),
            detail = %err.as_message(),
            "broadcast lost deliveries"
        );
    }
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("stored", &self.entries.lock().len())
            .finish()
    }
}
