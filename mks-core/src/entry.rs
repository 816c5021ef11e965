use std::sync::Arc;
use std::time::{Duration, Instant};

/// A shortened link together with the window it stays valid for
#[derive(Debug, Clone)]
pub struct Entry {
    link: Arc<str>,
    created_at: Instant,
    expires_in: Duration,
}

impl Entry {
    /// Creates a new entry created at `created_at` that lives for `expires_in`
    pub fn new(link: impl Into<Arc<str>>, created_at: Instant, expires_in: Duration) -> Self {
        Self {
            link: link.into(),
            created_at,
            expires_in,
        }
    }

    /// Returns the destination link
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Instant from which the entry counts as expired.
    ///
    /// `None` when `created_at + expires_in` does not fit in an `Instant`,
    /// in which case the entry never expires.
    pub fn expires_at(&self) -> Option<Instant> {
        self.created_at.checked_add(self.expires_in)
    }

    /// Checks if this entry has expired as of `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at() {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}
