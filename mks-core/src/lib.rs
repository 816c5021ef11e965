//! # mks core
//!
//! The in-memory expiring link store behind the mks URL shortener.
//!
//! ## Features
//!
//! - Random base-36 slugs drawn from a 64-bit space, unique among live keys
//! - Thread-safe storage using `DashMap`
//! - Reads never evict; a [`PurgeScheduler`] sweeps expired links on an interval
//! - Injectable [`Clock`] so expiry can be tested without sleeping
//!
//! ## Example
//!
//! ```rust,no_run
//! use mks_core::{PurgeScheduler, Store, StoreConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = StoreConfig::default()
//!         .with_purge_interval(Duration::from_secs(5));
//!     let store = Store::with_config(config.clone());
//!     let _purger = PurgeScheduler::spawn(store.clone(), &config);
//!
//!     // Shorten a link for 15 minutes
//!     let slug = store.insert("https://example.com", Duration::from_secs(15 * 60));
//!
//!     // Resolve it
//!     if let Some(link) = store.get(&slug) {
//!         println!("{} -> {}", slug, link);
//!     }
//!
//!     // Manual purge (also done automatically by the scheduler)
//!     let removed_count = store.purge();
//! }
//! ```

mod clock;
mod config;
mod entry;
mod scheduler;
mod slug;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{StoreConfig, DEFAULT_MAX_SLUG_ATTEMPTS, DEFAULT_PURGE_INTERVAL};
pub use entry::Entry;
pub use scheduler::PurgeScheduler;
pub use slug::{encode_base36, random_slug};
pub use store::Store;
