//! # Ready-made registry consumers.
//!
//! Two thin wrappers over [`Registry`](crate::Registry) that only differ in their
//! default [`Ownership`](crate::Ownership) and naming:
//!
//! ```text
//! Mediator<C>           ── Registry<C> (Exclusive) ── invoke_colleagues{,_except}
//! MulticastDelegate<D>  ── Registry<D> (Observing) ── invoke_delegates{,_async}
//! ```
//!
//! - [`Mediator`]: the hub owns its colleagues; one colleague notifies the others.
//! - [`MulticastDelegate`]: the subject never keeps delegates alive.

mod mediator;
mod multicast;

pub use mediator::Mediator;
pub use multicast::MulticastDelegate;
