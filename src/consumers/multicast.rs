//! # MulticastDelegate: one subject, many non-owned delegates.
//!
//! [`MulticastDelegate`] observes its delegates by default: it never keeps one alive,
//! and a delegate dropped by its owner silently stops receiving calls.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use roster::MulticastDelegate;
//!
//! trait Responder: Send + Sync {
//!     fn notify_fire(&self, at: &str) -> String;
//! }
//!
//! struct Station(&'static str);
//! impl Responder for Station {
//!     fn notify_fire(&self, at: &str) -> String { format!("{} -> {at}", self.0) }
//! }
//!
//! let police: Arc<dyn Responder> = Arc::new(Station("police"));
//! let fire: Arc<dyn Responder> = Arc::new(Station("fire"));
//! let dispatch = MulticastDelegate::with_delegates([&police, &fire]);
//!
//! let mut log = Vec::new();
//! dispatch.invoke_delegates(|d| log.push(d.notify_fire("house")));
//! assert_eq!(log.len(), 2);
//!
//! drop(fire);
//! log.clear();
//! dispatch.invoke_delegates(|d| log.push(d.notify_fire("garage")));
//! assert_eq!(log, vec!["police -> garage"]);
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::core::{Delivery, Key, Registry, RegistryConfig};
use crate::error::BroadcastError;

/// Delegate fan-out backed by an observing [`Registry`].
pub struct MulticastDelegate<D: ?Sized> {
    delegates: Registry<D>,
}

impl<D: ?Sized> MulticastDelegate<D> {
    /// Creates an empty multicast delegate ([`RegistryConfig::delegates`]).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::delegates())
    }

    /// Creates an empty multicast delegate with a custom registry configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            delegates: Registry::with_config(config),
        }
    }

    /// Creates a multicast delegate observing each of `delegates`, in order.
    #[must_use]
    pub fn with_delegates<'a, I>(delegates: I) -> Self
    where
        I: IntoIterator<Item = &'a Arc<D>>,
        D: 'a,
    {
        let me = Self::new();
        for delegate in delegates {
            me.add_delegate(delegate);
        }
        me
    }

    /// Observes `delegate` (configured default mode; observing unless overridden).
    pub fn add_delegate(&self, delegate: &Arc<D>) -> Key {
        self.delegates.add(Arc::clone(delegate))
    }

    /// Stops calling `delegate`. No-op if it is not registered or already gone.
    pub fn remove_delegate(&self, delegate: &Arc<D>) -> bool {
        self.delegates.remove(delegate)
    }

    /// Delegates that are still alive, in registration order.
    pub fn delegates(&self) -> Vec<Arc<D>> {
        self.delegates.live_participants()
    }

    /// Calls `invoke` on every live delegate.
    pub fn invoke_delegates<F>(&self, invoke: F)
    where
        F: FnMut(&D),
    {
        self.delegates.broadcast(invoke);
    }

    /// Fallible variant of [`invoke_delegates`](Self::invoke_delegates).
    ///
    /// # Errors
    /// See [`Registry::try_broadcast`].
    pub fn try_invoke_delegates<E, F>(&self, invoke: F) -> Result<Delivery, BroadcastError<E>>
    where
        F: FnMut(&D) -> Result<(), E>,
    {
        self.delegates.try_broadcast(invoke)
    }

    /// Async variant: awaits each delegate in turn.
    ///
    /// # Errors
    /// See [`Registry::broadcast_async`].
    pub async fn invoke_delegates_async<E, F, Fut>(
        &self,
        invoke: F,
    ) -> Result<Delivery, BroadcastError<E>>
    where
        F: FnMut(Arc<D>) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        self.delegates.broadcast_async(invoke).await
    }

    /// Underlying registry.
    pub fn registry(&self) -> &Registry<D> {
        &self.delegates
    }
}

impl<D: ?Sized> Default for MulticastDelegate<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    trait Emergency: Send + Sync {
        fn notify(&self, at: &str) -> Result<(), String>;
    }

    struct Station {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        broken: bool,
    }

    impl Emergency for Station {
        fn notify(&self, at: &str) -> Result<(), String> {
            if self.broken {
                return Err(format!("{} line down", self.name));
            }
            self.log.lock().push(format!("{} notified at {at}", self.name));
            Ok(())
        }
    }

    fn station(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Emergency> {
        Arc::new(Station {
            name,
            log: Arc::clone(log),
            broken: false,
        })
    }

    #[test]
    fn test_dropped_delegate_stops_receiving() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let police = station("police", &log);
        let fire = station("fire", &log);

        let dispatch = MulticastDelegate::new();
        dispatch.add_delegate(&police);
        dispatch.add_delegate(&fire);

        dispatch.invoke_delegates(|d| d.notify("house").unwrap());
        drop(fire);
        dispatch.invoke_delegates(|d| d.notify("garage").unwrap());

        assert_eq!(
            *log.lock(),
            vec![
                "police notified at house".to_string(),
                "fire notified at house".to_string(),
                "police notified at garage".to_string(),
            ]
        );
        assert_eq!(dispatch.delegates().len(), 1);
    }

    #[test]
    fn test_delegates_not_kept_alive() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let dispatch = MulticastDelegate::with_delegates([&station("temp", &log)]);
        assert!(dispatch.delegates().is_empty());
    }

    #[test]
    fn test_try_invoke_collects_failures() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let ok = station("ok", &log);
        let broken: Arc<dyn Emergency> = Arc::new(Station {
            name: "broken",
            log: Arc::clone(&log),
            broken: true,
        });
        let dispatch = MulticastDelegate::with_delegates([&broken, &ok]);

        let err = dispatch
            .try_invoke_delegates(|d| d.notify("mall"))
            .unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].as_message(), "error: broken line down");
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_remove_delegate() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let police = station("police", &log);
        let dispatch = MulticastDelegate::with_delegates([&police]);
        assert!(dispatch.remove_delegate(&police));

        let mut calls = 0;
        dispatch.invoke_delegates(|_| calls += 1);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_async_invoke() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let police = station("police", &log);
        let dispatch = MulticastDelegate::with_delegates([&police]);

        let delivery = dispatch
            .invoke_delegates_async(|d| async move { d.notify("dock") })
            .await
            .unwrap();
        assert_eq!(delivery.delivered, 1);
        assert_eq!(*log.lock(), vec!["police notified at dock".to_string()]);
    }
}
