//! # Mediator: colleagues that talk through one hub.
//!
//! [`Mediator`] keeps its colleagues in a [`Registry`] that owns them by default, and
//! lets one colleague notify every other one.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use roster::Mediator;
//!
//! trait Pilot: Send + Sync {
//!     fn callsign(&self) -> &str;
//!     fn hear(&self, from: &str);
//! }
//!
//! struct Plane(&'static str);
//! impl Pilot for Plane {
//!     fn callsign(&self) -> &str { self.0 }
//!     fn hear(&self, from: &str) { let _ = from; }
//! }
//!
//! let tower: Mediator<dyn Pilot> = Mediator::new();
//! let speaker: Arc<dyn Pilot> = Arc::new(Plane("AB12"));
//! tower.add_colleague(Arc::clone(&speaker));
//! tower.add_colleague(Arc::new(Plane("CD34")));
//!
//! let mut heard = 0;
//! tower.invoke_colleagues_except(&speaker, |p| { p.hear(speaker.callsign()); heard += 1; });
//! assert_eq!(heard, 1);
//! ```

use std::sync::Arc;

use crate::core::{Delivery, Key, Registry, RegistryConfig};
use crate::error::BroadcastError;
use crate::policies::Ownership;

/// Colleague hub backed by an owning [`Registry`].
pub struct Mediator<C: ?Sized> {
    colleagues: Registry<C>,
}

impl<C: ?Sized> Mediator<C> {
    /// Creates a mediator whose colleagues are owned ([`RegistryConfig::colleagues`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::colleagues())
    }

    /// Creates a mediator with a custom registry configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            colleagues: Registry::with_config(config),
        }
    }

    /// Registers a colleague using the configured default mode (owned unless overridden).
    pub fn add_colleague(&self, colleague: Arc<C>) -> Key {
        self.colleagues.add(colleague)
    }

    /// Registers a colleague with an explicit mode.
    pub fn add_colleague_with(&self, colleague: Arc<C>, ownership: Ownership) -> Key {
        self.colleagues.add_with(colleague, ownership)
    }

    /// Unregisters the first entry for `colleague`. No-op if it is not registered.
    pub fn remove_colleague(&self, colleague: &Arc<C>) -> bool {
        self.colleagues.remove(colleague)
    }

    /// Live colleagues in registration order.
    pub fn colleagues(&self) -> Vec<Arc<C>> {
        self.colleagues.live_participants()
    }

    /// Calls `invoke` on every live colleague.
    pub fn invoke_colleagues<F>(&self, invoke: F)
    where
        F: FnMut(&C),
    {
        self.colleagues.broadcast(invoke);
    }

    /// Calls `invoke` on every live colleague except `sender`.
    pub fn invoke_colleagues_except<F>(&self, sender: &Arc<C>, invoke: F)
    where
        F: FnMut(&C),
    {
        self.colleagues.broadcast_excluding(sender, invoke);
    }

    /// Fallible variant of [`invoke_colleagues_except`](Self::invoke_colleagues_except).
    ///
    /// # Errors
    /// See [`Registry::try_broadcast`].
    pub fn try_invoke_colleagues_except<E, F>(
        &self,
        sender: &Arc<C>,
        invoke: F,
    ) -> Result<Delivery, BroadcastError<E>>
    where
        F: FnMut(&C) -> Result<(), E>,
    {
        self.colleagues.try_broadcast_excluding(sender, invoke)
    }

    /// Underlying registry.
    pub fn registry(&self) -> &Registry<C> {
        &self.colleagues
    }
}

impl<C: ?Sized> Default for Mediator<C> {
    fn default() -> Self {
        Self::new()
    }
}
