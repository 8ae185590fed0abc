//! Consumer identity and per-request tickets.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONSUMER_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identifier of an image-bearing view.
///
/// Unique among all views created by this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(u64);

impl ConsumerId {
    /// Allocates a fresh identifier.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CONSUMER_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Generation number of a load request on one view.
///
/// A newer request always carries a larger ticket than the ones it supersedes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

impl LoadTicket {
    /// Ticket of a view that never issued a request.
    pub const NONE: Self = Self(0);

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for LoadTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_ids_are_unique() {
        let a = ConsumerId::next();
        let b = ConsumerId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_ticket_ordering() {
        let first = LoadTicket::NONE.next();
        assert!(first > LoadTicket::NONE);
        assert_eq!(first.next(), LoadTicket(2));
    }
}
