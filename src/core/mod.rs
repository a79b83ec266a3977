//! Registry core: storage, configuration and dispatch.
//!
//! The public API from this module is [`Registry`], its [`RegistryConfig`],
//! the [`Key`] handed out by `add`, and the [`Delivery`] report of a broadcast.
//!
//! Internal modules:
//! - [`entry`]: keys, identity and the owning/observing slot;
//! - [`config`]: registry settings and presets;
//! - [`dispatch`]: snapshot dispatch with failure policy and panic isolation;
//! - [`registry`]: the registry itself (add/remove/prune/broadcast).

mod config;
mod dispatch;
mod entry;
mod registry;

pub use config::RegistryConfig;
pub use dispatch::Delivery;
pub use entry::Key;
pub use registry::Registry;
