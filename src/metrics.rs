//! Metrics collection and export for resource pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Metrics data for a pool
///
/// # Examples
///
/// ```
/// use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
///
/// let config = PoolConfiguration::new().with_initial_size(3);
/// let pool = ResourcePool::new(factory_fn(|| 0u32), config).unwrap();
///
/// {
///     let _res = pool.acquire();
///     let metrics = pool.metrics();
///     assert_eq!(metrics.total_acquired, 1);
///     assert_eq!(metrics.active_resources, 1);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Total resources handed out
    pub total_acquired: usize,

    /// Total resources taken back
    pub total_released: usize,

    /// Total resources built by the factory
    pub total_created: usize,

    /// Total resources torn down by the factory
    pub total_destroyed: usize,

    /// Number of batch expansions
    pub expansions: usize,

    /// Resources removed by the idle reaper
    pub evictions: usize,

    /// Releases refused as foreign, unknown or duplicate
    pub rejected_releases: usize,

    /// Destroyer calls that failed
    pub destroy_failures: usize,

    /// Current idle resources
    pub idle_resources: usize,

    /// Current active resources
    pub active_resources: usize,

    /// Resources currently tracked
    pub total_resources: usize,

    /// Active share of tracked resources (0.0 to 1.0)
    pub utilization: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("total_created".to_string(), self.total_created.to_string());
        metrics.insert("total_destroyed".to_string(), self.total_destroyed.to_string());
        metrics.insert("expansions".to_string(), self.expansions.to_string());
        metrics.insert("evictions".to_string(), self.evictions.to_string());
        metrics.insert("rejected_releases".to_string(), self.rejected_releases.to_string());
        metrics.insert("destroy_failures".to_string(), self.destroy_failures.to_string());
        metrics.insert("idle_resources".to_string(), self.idle_resources.to_string());
        metrics.insert("active_resources".to_string(), self.active_resources.to_string());
        metrics.insert("total_resources".to_string(), self.total_resources.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics
    }
}

/// Metrics exporter for Prometheus format
#[cfg(feature = "metrics")]
pub struct MetricsExporter;

#[cfg(feature = "metrics")]
impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
    /// use std::collections::HashMap;
    ///
    /// let pool = ResourcePool::new(factory_fn(|| 0u32), PoolConfiguration::default()).unwrap();
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("my_pool", Some(&tags)).unwrap();
    /// assert!(output.contains("resourcepool_resources_idle"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> prometheus::Result<String> {
        use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Opts, Registry, TextEncoder};

        let mut labels = tags.cloned().unwrap_or_default();
        labels.insert("pool".to_string(), pool_name.to_string());
        let registry = Registry::new_custom(None, Some(labels))?;

        let gauges = [
            ("resourcepool_resources_active", "Current active resources", metrics.active_resources),
            ("resourcepool_resources_idle", "Current idle resources", metrics.idle_resources),
            ("resourcepool_resources_total", "Resources currently tracked", metrics.total_resources),
        ];
        for (name, help, value) in gauges {
            let gauge = IntGauge::with_opts(Opts::new(name, help))?;
            gauge.set(value as i64);
            registry.register(Box::new(gauge))?;
        }

        let utilization = Gauge::with_opts(Opts::new(
            "resourcepool_utilization",
            "Pool utilization ratio",
        ))?;
        utilization.set(metrics.utilization);
        registry.register(Box::new(utilization))?;

        let counters = [
            ("resourcepool_acquired_total", "Total resources acquired", metrics.total_acquired),
            ("resourcepool_released_total", "Total resources released", metrics.total_released),
            ("resourcepool_created_total", "Total resources created", metrics.total_created),
            ("resourcepool_destroyed_total", "Total resources destroyed", metrics.total_destroyed),
            ("resourcepool_expansions_total", "Batch expansions", metrics.expansions),
            ("resourcepool_evictions_total", "Idle evictions", metrics.evictions),
            ("resourcepool_rejected_releases_total", "Rejected releases", metrics.rejected_releases),
            ("resourcepool_destroy_failures_total", "Failed destroy calls", metrics.destroy_failures),
        ];
        for (name, help, value) in counters {
            let counter = IntCounter::with_opts(Opts::new(name, help))?;
            counter.inc_by(value as u64);
            registry.register(Box::new(counter))?;
        }

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Internal metrics tracker
#[derive(Default)]
pub(crate) struct MetricsTracker {
    pub total_acquired: AtomicUsize,
    pub total_released: AtomicUsize,
    pub total_created: AtomicUsize,
    pub total_destroyed: AtomicUsize,
    pub expansions: AtomicUsize,
    pub evictions: AtomicUsize,
    pub rejected_releases: AtomicUsize,
    pub destroy_failures: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_metrics(&self, idle: usize, active: usize, total: usize) -> PoolMetrics {
        let utilization = if total > 0 {
            active as f64 / total as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
            total_created: self.total_created.load(Ordering::Relaxed),
            total_destroyed: self.total_destroyed.load(Ordering::Relaxed),
            expansions: self.expansions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            rejected_releases: self.rejected_releases.load(Ordering::Relaxed),
            destroy_failures: self.destroy_failures.load(Ordering::Relaxed),
            idle_resources: idle,
            active_resources: active,
            total_resources: total,
            utilization,
        }
    }
}
