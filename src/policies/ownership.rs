//! # Ownership modes for registry entries.
//!
//! [`Ownership`] decides whether the registry keeps a participant alive.
//!
//! - [`Ownership::Exclusive`] the registry holds a strong `Arc`; the participant lives
//!   at least as long as its entry.
//! - [`Ownership::Observing`] the registry holds a `Weak`; the participant's lifetime is
//!   controlled elsewhere and the entry is forgotten once it is gone.
//!
//! ## Choosing the right mode
//!
//! **Colleagues** (the registry is their home):
//! ```text
//! Ownership::Exclusive   → dropping every outside handle keeps the participant registered
//! ```
//!
//! **Delegates** (someone else owns them):
//! ```text
//! Ownership::Observing   → dropping the last outside handle unregisters it on the next scan
//! ```
//!
//! The mode is fixed when the entry is created and never changes afterwards.

/// How a registry entry holds on to its participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Strong reference: the registry keeps the participant alive (default).
    #[default]
    Exclusive,
    /// Weak reference: the participant is pruned once its last outside owner drops it.
    Observing,
}

impl Ownership {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Ownership::Exclusive => "exclusive",
            Ownership::Observing => "observing",
        }
    }

    /// Returns `true` if entries with this mode keep their participant alive.
    #[inline]
    pub fn retains(&self) -> bool {
        matches!(self, Ownership::Exclusive)
    }
}

impl From<bool> for Ownership {
    /// Maps a "strong reference" flag to a mode: `true` → Exclusive, `false` → Observing.
    fn from(strong: bool) -> Self {
        if strong {
            Ownership::Exclusive
        } else {
            Ownership::Observing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_exclusive() {
        assert_eq!(Ownership::default(), Ownership::Exclusive);
    }

    #[test]
    fn test_from_strong_flag() {
        assert_eq!(Ownership::from(true), Ownership::Exclusive);
        assert_eq!(Ownership::from(false), Ownership::Observing);
    }

    #[test]
    fn test_retains_only_exclusive() {
        assert!(Ownership::Exclusive.retains());
        assert!(!Ownership::Observing.retains());
        assert_eq!(Ownership::Observing.as_label(), "observing");
    }
}
