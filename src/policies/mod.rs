//! Ownership and failure policies.
//!
//! This module groups the knobs that control **how long** a participant is kept
//! and **what happens** when a broadcast callback fails for one of them.
//!
//! ## Contents
//! - [`Ownership`] whether an entry keeps its participant alive (exclusive / observing)
//! - [`FailurePolicy`] how dispatch reacts to a failing callback (abort / collect / discard)
//!
//! ## Quick wiring
//! ```text
//! RegistryConfig { ownership: Ownership, failure: FailurePolicy, .. }
//!      └─► core::Registry uses:
//!           - ownership as the default mode for `add`
//!           - failure to decide continue/stop inside `try_broadcast`
//! ```
//!
//! ## Defaults
//! - `Ownership::Exclusive` (the registry keeps what it is given).
//! - `FailurePolicy::Collect` (every participant is called, failures are reported together).

mod failure;
mod ownership;

pub use failure::FailurePolicy;
pub use ownership::Ownership;
