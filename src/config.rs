//! Pool configuration options

use crate::errors::{PoolError, PoolResult};
use std::time::Duration;

/// Configuration for resource pool behavior
///
/// # Examples
///
/// ```
/// use elastic_pool::PoolConfiguration;
/// use std::time::Duration;
///
/// let config = PoolConfiguration::new()
///     .with_initial_size(4)
///     .with_expansion_threshold(2)
///     .with_expansion_batch_size(8)
///     .with_auto_evict(Duration::from_secs(30));
///
/// assert_eq!(config.initial_size, 4);
/// assert!(config.auto_evict);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfiguration {
    /// Number of resources created eagerly when the pool is built
    pub initial_size: usize,

    /// Idle count below which an acquire triggers a batch expansion
    pub expansion_threshold: usize,

    /// Number of resources created per expansion
    pub expansion_batch_size: usize,

    /// Whether the idle reaper runs in the background
    pub auto_evict: bool,

    /// Reaper interval, and how long a resource must sit idle before eviction
    pub idle_timeout: Duration,

    /// Emit per-operation debug events
    pub verbose: bool,
}

impl Default for PoolConfiguration {
    fn default() -> Self {
        Self {
            initial_size: 10,
            expansion_threshold: 5,
            expansion_batch_size: 10,
            auto_evict: false,
            idle_timeout: Duration::from_secs(60),
            verbose: false,
        }
    }
}

impl PoolConfiguration {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of eagerly created resources
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    /// Set the low-watermark that triggers expansion
    ///
    /// # Examples
    ///
    /// ```
    /// use elastic_pool::PoolConfiguration;
    ///
    /// // A threshold of zero disables proactive expansion; the pool then
    /// // grows one resource at a time when it runs dry.
    /// let config = PoolConfiguration::new().with_expansion_threshold(0);
    /// assert_eq!(config.expansion_threshold, 0);
    /// ```
    pub fn with_expansion_threshold(mut self, threshold: usize) -> Self {
        self.expansion_threshold = threshold;
        self
    }

    /// Set how many resources each expansion creates
    pub fn with_expansion_batch_size(mut self, size: usize) -> Self {
        self.expansion_batch_size = size;
        self
    }

    /// Enable the idle reaper with the given timeout
    pub fn with_auto_evict(mut self, idle_timeout: Duration) -> Self {
        self.auto_evict = true;
        self.idle_timeout = idle_timeout;
        self
    }

    /// Set the idle timeout without toggling the reaper
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Enable verbose diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the configuration bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use elastic_pool::PoolConfiguration;
    ///
    /// let config = PoolConfiguration::new().with_expansion_batch_size(0);
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> PoolResult<()> {
        if self.expansion_batch_size == 0 {
            return Err(PoolError::InvalidConfiguration(
                "expansion_batch_size must be at least 1".to_string(),
            ));
        }
        if self.idle_timeout.is_zero() {
            return Err(PoolError::InvalidConfiguration(
                "idle_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfiguration::default();
        assert_eq!(config.initial_size, 10);
        assert_eq!(config.expansion_threshold, 5);
        assert_eq!(config.expansion_batch_size, 10);
        assert!(!config.auto_evict);
        assert_eq!(config.idle_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_idle_timeout_rejected() {
        let config = PoolConfiguration::new().with_idle_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidConfiguration(_))
        ));
    }
}
