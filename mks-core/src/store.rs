use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::entry::Entry;
use crate::slug::random_slug;

/// Internal shared state for the store
struct StoreInner {
    data: DashMap<String, Entry>,
    clock: Arc<dyn Clock>,
    max_slug_attempts: u32,
}

/// Thread-safe in-memory mapping from slug to link with expiry
///
/// Uses `DashMap` for concurrent access. Cloning a `Store` yields another
/// handle to the same data, so one instance can be shared between request
/// handlers and the [`PurgeScheduler`](crate::PurgeScheduler).
///
/// Reads never evict. An entry stays visible to [`Store::get`] until the
/// next [`Store::purge`] after its expiry instant.
///
/// # Example
///
/// ```rust
/// use mks_core::Store;
/// use std::time::Duration;
///
/// let store = Store::new();
/// let slug = store.insert("https://example.com", Duration::from_secs(300));
/// assert_eq!(store.get(&slug).as_deref(), Some("https://example.com"));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates a new store on the system clock with default configuration
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a new store on the system clock
    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a new store that reads time from `clock`
    ///
    /// # Example
    ///
    /// ```rust
    /// use mks_core::{ManualClock, Store, StoreConfig};
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let clock = Arc::new(ManualClock::new());
    /// let store = Store::with_clock(StoreConfig::default(), clock.clone());
    ///
    /// store.insert("https://example.com", Duration::from_secs(10));
    /// clock.advance(Duration::from_secs(11));
    /// assert_eq!(store.purge(), 1);
    /// ```
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                data: DashMap::new(),
                clock,
                max_slug_attempts: config.max_slug_attempts.max(1),
            }),
        }
    }

    /// Stores `link` under a freshly generated slug and returns the slug
    ///
    /// The slug is unique among the keys present at the moment of insertion.
    /// A `ttl` of zero makes the entry eligible for the next purge.
    ///
    /// # Panics
    ///
    /// Panics if every one of `max_slug_attempts` random candidates is
    /// already taken. With a 64-bit identifier space this does not happen
    /// in practice.
    pub fn insert(&self, link: impl Into<String>, ttl: Duration) -> String {
        self.insert_with_rng(&mut rand::thread_rng(), link, ttl)
    }

    /// [`Store::insert`] with the candidate source made explicit
    pub(crate) fn insert_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        link: impl Into<String>,
        ttl: Duration,
    ) -> String {
        let link: Arc<str> = Arc::from(link.into());

        for attempt in 1..=self.inner.max_slug_attempts {
            let candidate = random_slug(rng);

            // The shard lock is held from the vacancy check until the insert
            // completes, so two concurrent inserts cannot claim the same slug.
            match self.inner.data.entry(candidate.clone()) {
                MapEntry::Vacant(vacant) => {
                    let created_at = self.inner.clock.now();
                    vacant.insert(Entry::new(link, created_at, ttl));
                    return candidate;
                }
                MapEntry::Occupied(_) => {
                    tracing::debug!(attempt, "slug collision, regenerating");
                }
            }
        }

        panic!(
            "slug space exhausted: {} random candidates were all taken",
            self.inner.max_slug_attempts
        );
    }

    /// Stores `link` under a caller-chosen slug
    ///
    /// Any existing entry under `slug` is replaced unconditionally and the
    /// creation time is reset.
    pub fn insert_fixed(&self, slug: impl Into<String>, link: impl Into<String>, ttl: Duration) {
        let created_at = self.inner.clock.now();
        let link: Arc<str> = Arc::from(link.into());
        self.inner
            .data
            .insert(slug.into(), Entry::new(link, created_at, ttl));
    }

    /// Retrieves the link stored under `slug`
    ///
    /// Returns `None` if the slug is absent. Expired entries that have not
    /// been purged yet are still returned.
    pub fn get(&self, slug: &str) -> Option<String> {
        self.inner
            .data
            .get(slug)
            .map(|entry| entry.value().link().to_string())
    }

    /// Removes every entry whose expiry instant is at or before now
    ///
    /// Returns the number of entries removed.
    pub fn purge(&self) -> usize {
        let now = self.inner.clock.now();
        let mut removed_count = 0;

        self.inner.data.retain(|_, entry| {
            if entry.is_expired_at(now) {
                removed_count += 1;
                false
            } else {
                true
            }
        });

        removed_count
    }

    /// Returns the number of entries in the store (including expired ones
    /// not purged yet)
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.data.len()
    }

    /// Returns `true` if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.data.is_empty()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
