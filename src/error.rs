//! Error types produced by registry broadcasts.
//!
//! This module defines two error enums:
//!
//! - [`DispatchError`] one participant's callback failed (returned `Err` or panicked).
//! - [`BroadcastError`] the outcome of a whole broadcast that saw failures.
//!
//! `add` and `remove` never fail, so no error type exists for them.
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.

use thiserror::Error;

use crate::core::Key;

/// # Failure of a single participant during dispatch.
///
/// `E` is the error type returned by the caller's callback.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum DispatchError<E> {
    /// The callback returned an error for this participant.
    #[error("participant {key} failed: {error}")]
    Failed {
        /// Registry key of the participant.
        key: Key,
        /// The error returned by the callback.
        error: E,
    },

    /// The callback panicked for this participant (only with panic isolation enabled).
    #[error("participant {key} panicked: {message}")]
    Panicked {
        /// Registry key of the participant.
        key: Key,
        /// Panic payload rendered as text.
        message: String,
    },
}

impl<E> DispatchError<E> {
    /// Returns the key of the participant that failed.
    pub fn key(&self) -> Key {
        match self {
            DispatchError::Failed { key, .. } | DispatchError::Panicked { key, .. } => *key,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use roster::{DispatchError, Registry};
    /// use std::sync::Arc;
    ///
    /// let reg: Registry<str> = Registry::new();
    /// let key = reg.add(Arc::from("p"));
    /// let err: DispatchError<()> = DispatchError::Panicked { key, message: "boom".into() };
    /// assert_eq!(err.as_label(), "participant_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::Failed { .. } => "participant_failed",
            DispatchError::Panicked { .. } => "participant_panicked",
        }
    }
}

impl<E: std::fmt::Display> DispatchError<E> {
    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::Failed { error, .. } => format!("error: {error}"),
            DispatchError::Panicked { message, .. } => format!("panic: {message}"),
        }
    }
}

/// # Failures observed by a broadcast.
///
/// Which variant is produced depends on the registry's
/// [`FailurePolicy`](crate::FailurePolicy):
/// - `Abort` → [`BroadcastError::Aborted`]
/// - `Collect` → [`BroadcastError::Incomplete`]
/// - `Discard` → never an error
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BroadcastError<E> {
    /// Dispatch stopped at the first failure; later participants were not called.
    #[error("broadcast aborted after {delivered} deliveries: {cause}")]
    Aborted {
        /// Number of participants that were called successfully before the failure.
        delivered: usize,
        /// The failure that stopped dispatch.
        cause: DispatchError<E>,
    },

    /// Every participant was called; some of them failed.
    #[error("{} of {attempted} deliveries failed", .failures.len())]
    Incomplete {
        /// Number of participants the callback was invoked for.
        attempted: usize,
        /// Failures in dispatch order.
        failures: Vec<DispatchError<E>>,
    },
}

impl<E> BroadcastError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BroadcastError::Aborted { .. } => "broadcast_aborted",
            BroadcastError::Incomplete { .. } => "broadcast_incomplete",
        }
    }

    /// Returns the failures carried by this error, in dispatch order.
    pub fn failures(&self) -> &[DispatchError<E>] {
        match self {
            BroadcastError::Aborted { cause, .. } => std::slice::from_ref(cause),
            BroadcastError::Incomplete { failures, .. } => failures,
        }
    }

    /// Consumes the error and returns its failures, in dispatch order.
    pub fn into_failures(self) -> Vec<DispatchError<E>> {
        match self {
            BroadcastError::Aborted { cause, .. } => vec![cause],
            BroadcastError::Incomplete { failures, .. } => failures,
        }
    }
}

impl<E: std::fmt::Display> BroadcastError<E> {
    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BroadcastError::Aborted { delivered, cause } => {
                format!("aborted after {delivered}; {}", cause.as_message())
            }
            BroadcastError::Incomplete {
                attempted,
                failures,
            } => {
                let parts: Vec<String> = failures.iter().map(DispatchError::as_message).collect();
                format!("{}/{attempted} failed: [{}]", failures.len(), parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Key {
        Key::next()
    }

    #[test]
    fn test_dispatch_labels_and_messages() {
        let failed: DispatchError<&str> = DispatchError::Failed {
            key: key(),
            error: "nope",
        };
        assert_eq!(failed.as_label(), "participant_failed");
        assert_eq!(failed.as_message(), "error: nope");

        let panicked: DispatchError<&str> = DispatchError::Panicked {
            key: key(),
            message: "boom".into(),
        };
        assert_eq!(panicked.as_message(), "panic: boom");
    }

    #[test]
    fn test_incomplete_display_counts_failures() {
        let err: BroadcastError<&str> = BroadcastError::Incomplete {
            attempted: 3,
            failures: vec![
                DispatchError::Failed { key: key(), error: "a" },
                DispatchError::Failed { key: key(), error: "b" },
            ],
        };
        assert_eq!(err.to_string(), "2 of 3 deliveries failed");
        assert_eq!(err.as_label(), "broadcast_incomplete");
        assert_eq!(err.failures().len(), 2);
        assert_eq!(err.as_message(), "2/3 failed: [error: a, error: b]");
    }

    #[test]
    fn test_aborted_exposes_single_cause() {
        let k = key();
        let err: BroadcastError<&str> = BroadcastError::Aborted {
            delivered: 1,
            cause: DispatchError::Failed { key: k, error: "x" },
        };
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].key(), k);
        assert_eq!(err.into_failures().len(), 1);
    }
}
