//! Stale response detection

use std::sync::atomic::{AtomicU64, Ordering};

/// Generation counter for in-flight requests
///
/// Issuing a ticket supersedes every ticket issued before it. A response may only be applied
/// while its ticket is still current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generation: AtomicU64,
}

/// Proof of a single issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request, superseding any outstanding one
    pub fn issue(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Invalidates the outstanding request without starting a new one
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }
}
