use std::time::Duration;

/// Default interval between purge runs
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of slug candidates tried before giving up
pub const DEFAULT_MAX_SLUG_ATTEMPTS: u32 = 64;

/// Configuration for a [`Store`](crate::Store) and its purge loop
///
/// # Example
///
/// ```rust
/// use mks_core::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_purge_interval(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Interval between purge runs, read by
    /// [`PurgeScheduler::spawn`](crate::PurgeScheduler::spawn) (default: 1 second)
    pub purge_interval: Duration,
    /// How many random slugs `insert` tries before treating the
    /// identifier space as exhausted (default: 64)
    pub max_slug_attempts: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            purge_interval: DEFAULT_PURGE_INTERVAL,
            max_slug_attempts: DEFAULT_MAX_SLUG_ATTEMPTS,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the purge interval
    ///
    /// This determines how often the [`PurgeScheduler`](crate::PurgeScheduler)
    /// sweeps expired entries out of the store.
    pub fn with_purge_interval(mut self, interval: Duration) -> Self {
        self.purge_interval = interval;
        self
    }

    /// Sets the slug retry cap. Values below 1 are raised to 1.
    pub fn with_max_slug_attempts(mut self, attempts: u32) -> Self {
        self.max_slug_attempts = attempts.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.purge_interval, Duration::from_secs(1));
        assert_eq!(config.max_slug_attempts, 64);
    }

    #[test]
    fn test_builder_pattern_chaining() {
        let config = StoreConfig::new()
            .with_purge_interval(Duration::from_secs(120))
            .with_max_slug_attempts(8);
        assert_eq!(config.purge_interval, Duration::from_secs(120));
        assert_eq!(config.max_slug_attempts, 8);
    }

    #[test]
    fn test_zero_attempts_raised_to_one() {
        let config = StoreConfig::default().with_max_slug_attempts(0);
        assert_eq!(config.max_slug_attempts, 1);
    }
}
