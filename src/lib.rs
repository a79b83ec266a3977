//! # roster
//!
//! **Roster** is a mixed-ownership subscriber registry for Rust.
//!
//! It keeps an insertion-ordered set of participants that share one capability
//! (usually a trait object) and broadcasts calls to the ones that are still alive.
//! Each entry either owns its participant or merely observes it; observed participants
//! whose owners dropped them are forgotten automatically.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Arc<dyn T>  │   │  Arc<dyn T>  │   │  Arc<dyn T>  │
//!     │  (Exclusive) │   │  (Observing) │   │  (Exclusive) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Registry<T>                                                      │
//! │  - Mutex<Vec<Entry>>  (insertion order)                           │
//! │  - Entry = Key + Slot::{Owned(Arc<T>), Observed(Weak<T>)}         │
//! │  - RegistryConfig (default ownership, failure policy, panics)     │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        │ lock, prune stale, copy live, unlock         │ remove(&Arc<T>) / remove_key(Key)
//!        ▼                                              ▼
//!  snapshot [(Key, Arc<T>)]                      first live match (identity)
//!        │
//!        ▼
//!  dispatch: invoke(&T) per participant, in order
//!        ├─ Ok    ─► delivered
//!        └─ Err   ─► FailurePolicy::{Abort, Collect, Discard}
//! ```
//!
//! ### Lifecycle
//! ```text
//! add ──► Entry (mode fixed) ──► remove / remove_key ──► dropped (outside the lock)
//!                          └──► observed participant dropped elsewhere
//!                                 └─► pruned by the next scan (lazy)
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types                                 |
//! |-----------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Registry**    | Add/remove by identity, live snapshots, lazy pruning.         | [`Registry`], [`Key`]                     |
//! | **Broadcast**   | Snapshot dispatch, exclusion, fallible and async variants.    | [`Delivery`]                              |
//! | **Policies**    | Ownership mode and failure handling.                          | [`Ownership`], [`FailurePolicy`]          |
//! | **Errors**      | Typed per-participant and per-broadcast failures.             | [`DispatchError`], [`BroadcastError`]     |
//! | **Consumers**   | Mediator and multicast-delegate shapes.                       | [`Mediator`], [`MulticastDelegate`]       |
//! | **Configuration** | Per-registry settings and presets.                          | [`RegistryConfig`]                        |
//!
//! ## Logging
//! Emits [`tracing`] events: `trace` on add/remove, `debug` when stale entries are
//! pruned, `warn` for dispatch failures that are discarded.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use roster::{Ownership, Registry};
//!
//! trait Listener: Send + Sync {
//!     fn name(&self) -> &str;
//! }
//!
//! struct Named(&'static str);
//! impl Listener for Named {
//!     fn name(&self) -> &str { self.0 }
//! }
//!
//! let reg: Registry<dyn Listener> = Registry::new();
//! let p1: Arc<dyn Listener> = Arc::new(Named("p1"));
//! let p2: Arc<dyn Listener> = Arc::new(Named("p2"));
//!
//! reg.add_with(Arc::clone(&p1), Ownership::Exclusive);
//! reg.add_with(Arc::clone(&p2), Ownership::Observing);
//! reg.add_with(Arc::new(Named("p3")), Ownership::Exclusive);
//!
//! let names = |r: &Registry<dyn Listener>| {
//!     r.live_participants().iter().map(|p| p.name().to_string()).collect::<Vec<_>>()
//! };
//! assert_eq!(names(&reg), ["p1", "p2", "p3"]);
//!
//! drop(p2);
//! assert_eq!(names(&reg), ["p1", "p3"]);
//!
//! reg.remove(&p1);
//! assert_eq!(names(&reg), ["p3"]);
//! ```
mod consumers;
mod core;
mod error;
mod policies;

// ---- Public re-exports ----

pub use consumers::{Mediator, MulticastDelegate};
pub use crate::core::{Delivery, Key, Registry, RegistryConfig};
pub use error::{BroadcastError, DispatchError};
pub use policies::{FailurePolicy, Ownership};
