//! # Snapshot dispatch.
//!
//! Runs a callback over a materialized snapshot of live participants, in order,
//! applying the registry's [`FailurePolicy`] and optional panic isolation.
//!
//! ```text
//! snapshot [(key, Arc<T>)] ──► for each ──► invoke(&T)
//!                                  │            ├─ Ok        → delivered += 1
//!                                  │            ├─ Err(e)    → DispatchError::Failed
//!                                  │            └─ panic     → DispatchError::Panicked (isolated)
//!                                  └─ failure ──► Abort: return Aborted
//!                                                 Collect: push, continue
//!                                                 Discard: warn, continue
//! ```
//!
//! The snapshot is owned by the dispatch loop, never a view into registry storage,
//! so reentrant `add`/`remove` calls from `invoke` only affect the next broadcast.

use std::any::Any;
use std::future::Future;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;

use crate::core::Key;
use crate::error::{BroadcastError, DispatchError};
use crate::policies::FailurePolicy;

/// Summary of a broadcast that did not produce an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Number of participants the callback was invoked for.
    pub attempted: usize,
    /// Number of invocations that completed successfully.
    pub delivered: usize,
    /// Number of failures dropped under [`FailurePolicy::Discard`].
    pub discarded: usize,
}

impl Delivery {
    /// Returns `true` if every attempted invocation succeeded.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.delivered == self.attempted
    }
}

/// Running totals for one dispatch.
struct Tally<E> {
    policy: FailurePolicy,
    delivery: Delivery,
    failures: Vec<DispatchError<E>>,
}

impl<E> Tally<E> {
    fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            delivery: Delivery::default(),
            failures: Vec::new(),
        }
    }

    fn record(&mut self, outcome: Result<(), DispatchError<E>>) -> ControlFlow<BroadcastError<E>> {
        self.delivery.attempted += 1;
        let err = match outcome {
            Ok(()) => {
                self.delivery.delivered += 1;
                return ControlFlow::Continue(());
            }
            Err(err) => err,
        };

        match self.policy {
            FailurePolicy::Abort => ControlFlow::Break(BroadcastError::Aborted {
                delivered: self.delivery.delivered,
                cause: err,
            }),
            FailurePolicy::Collect => {
                self.failures.push(err);
                ControlFlow::Continue(())
            }
            FailurePolicy::Discard => {
                tracing::warn!(
                    key = %err.key(),
                    label = err.as_label(),
                    "dispatch failure discarded"
                );
                self.delivery.discarded += 1;
                ControlFlow::Continue(())
            }
        }
    }

    fn finish(self) -> Result<Delivery, BroadcastError<E>> {
        if self.failures.is_empty() {
            Ok(self.delivery)
        } else {
            Err(BroadcastError::Incomplete {
                attempted: self.delivery.attempted,
                failures: self.failures,
            })
        }
    }
}

/// Dispatches `invoke` synchronously over `targets`.
pub(crate) fn run<T, E, F>(
    targets: &[(Key, Arc<T>)],
    policy: FailurePolicy,
    isolate_panics: bool,
    mut invoke: F,
) -> Result<Delivery, BroadcastError<E>>
where
    T: ?Sized,
    F: FnMut(&T) -> Result<(), E>,
{
    let mut tally = Tally::new(policy);

    for (key, participant) in targets {
        let key = *key;
        let outcome = if isolate_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| invoke(participant.as_ref()))) {
                Ok(res) => res.map_err(|error| DispatchError::Failed { key, error }),
                Err(payload) => Err(DispatchError::Panicked {
                    key,
                    message: panic_message(&*payload),
                }),
            }
        } else {
            invoke(participant.as_ref()).map_err(|error| DispatchError::Failed { key, error })
        };

        if let ControlFlow::Break(err) = tally.record(outcome) {
            return Err(err);
        }
    }

    tally.finish()
}

/// Dispatches `invoke` over `targets`, awaiting each participant before the next.
pub(crate) async fn run_async<T, E, F, Fut>(
    targets: Vec<(Key, Arc<T>)>,
    policy: FailurePolicy,
    isolate_panics: bool,
    mut invoke: F,
) -> Result<Delivery, BroadcastError<E>>
where
    T: ?Sized,
    F: FnMut(Arc<T>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut tally = Tally::new(policy);

    for (key, participant) in targets {
        let outcome = if isolate_panics {
            // Building the future happens inside the guard too.
            let call = &mut invoke;
            let fut = async move { call(participant).await };
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(res) => res.map_err(|error| DispatchError::Failed { key, error }),
                Err(payload) => Err(DispatchError::Panicked {
                    key,
                    message: panic_message(&*payload),
                }),
            }
        } else {
            invoke(participant)
                .await
                .map_err(|error| DispatchError::Failed { key, error })
        };

        if let ControlFlow::Break(err) = tally.record(outcome) {
            return Err(err);
        }
    }

    tally.finish()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(values: &[u32]) -> Vec<(Key, Arc<u32>)> {
        values.iter().map(|v| (Key::next(), Arc::new(*v))).collect()
    }

    fn fail_on_even(v: &u32) -> Result<(), String> {
        if v % 2 == 0 {
            Err(format!("even {v}"))
        } else {
            Ok(())
        }
    }

    #[test]
    fn test_all_succeed() {
        let t = targets(&[1, 3, 5]);
        let mut seen = Vec::new();
        let delivery = run(&t, FailurePolicy::Abort, false, |v: &u32| {
            seen.push(*v);
            Ok::<(), String>(())
        })
        .unwrap();
        assert_eq!(seen, vec![1, 3, 5]);
        assert_eq!(
            delivery,
            Delivery {
                attempted: 3,
                delivered: 3,
                discarded: 0
            }
        );
        assert!(delivery.is_complete());
    }

    #[test]
    fn test_abort_stops_at_first_failure() {
        let t = targets(&[1, 2, 3, 4]);
        let mut seen = Vec::new();
        let err = run(&t, FailurePolicy::Abort, false, |v: &u32| {
            seen.push(*v);
            fail_on_even(v)
        })
        .unwrap_err();

        assert_eq!(seen, vec![1, 2]);
        match err {
            BroadcastError::Aborted { delivered, cause } => {
                assert_eq!(delivered, 1);
                assert_eq!(cause.key(), t[1].0);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_collect_reports_every_failure_in_order() {
        let t = targets(&[1, 2, 3, 4]);
        let err = run(&t, FailurePolicy::Collect, false, fail_on_even).unwrap_err();
        let keys: Vec<Key> = err.failures().iter().map(DispatchError::key).collect();
        assert_eq!(keys, vec![t[1].0, t[3].0]);
        assert!(matches!(err, BroadcastError::Incomplete { attempted: 4, .. }));
    }

    #[test]
    fn test_discard_counts_failures() {
        let t = targets(&[2, 4, 5]);
        let delivery = run(&t, FailurePolicy::Discard, false, fail_on_even).unwrap();
        assert_eq!(delivery.attempted, 3);
        assert_eq!(delivery.delivered, 1);
        assert_eq!(delivery.discarded, 2);
        assert!(!delivery.is_complete());
    }

    #[test]
    fn test_isolated_panic_becomes_failure() {
        let t = targets(&[1, 2, 3]);
        let mut seen = Vec::new();
        let err = run(&t, FailurePolicy::Collect, true, |v: &u32| {
            if *v == 2 {
                panic!("two is cursed");
            }
            seen.push(*v);
            Ok::<(), String>(())
        })
        .unwrap_err();

        assert_eq!(seen, vec![1, 3]);
        match &err.failures()[0] {
            DispatchError::Panicked { key, message } => {
                assert_eq!(*key, t[1].0);
                assert_eq!(message, "two is cursed");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }

    #[tokio::test]
    async fn test_async_runs_sequentially_in_order() {
        let t = targets(&[10, 20, 30]);
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let delivery = run_async(t, FailurePolicy::Abort, false, |v: Arc<u32>| {
            let seen = Arc::clone(&seen);
            async move {
                tokio::task::yield_now().await;
                seen.lock().push(*v);
                Ok::<(), String>(())
            }
        })
        .await
        .unwrap();

        assert_eq!(*seen.lock(), vec![10, 20, 30]);
        assert_eq!(delivery.delivered, 3);
    }

    #[tokio::test]
    async fn test_async_isolated_panic() {
        let t = targets(&[1, 2]);
        let err = run_async(t, FailurePolicy::Collect, true, |v: Arc<u32>| async move {
            if *v == 1 {
                panic!("async boom");
            }
            Ok::<(), String>(())
        })
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            BroadcastError::Incomplete { attempted: 2, .. }
        ));
        assert_eq!(err.failures()[0].as_label(), "participant_panicked");
    }
}
