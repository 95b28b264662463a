//! Generation counter for callers that re-resolve while earlier results are
//! still in flight.
//!
//! Resolution itself is synchronous; ordering only matters to a caller that
//! hands work to another thread or queue. Issue a ticket before each call and
//! apply a result only if its ticket is still the latest.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one issued resolution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolveTicket(u64);

impl ResolveTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Issues increasing tickets and tracks the latest one.
#[derive(Debug, Default)]
pub struct ResolveGeneration {
    latest: AtomicU64,
}

impl ResolveGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket that supersedes every earlier one.
    pub fn issue(&self) -> ResolveTicket {
        ResolveTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, ticket: ResolveTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Returns `result` only if no newer ticket has been issued since.
    pub fn accept<T>(&self, ticket: ResolveTicket, result: T) -> Option<T> {
        self.is_current(ticket).then_some(result)
    }
}
