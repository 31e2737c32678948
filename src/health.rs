//! Health monitoring for resource pools

/// Health status of a resource pool
///
/// # Examples
///
/// ```
/// use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
///
/// let config = PoolConfiguration::new().with_initial_size(3);
/// let pool = ResourcePool::new(factory_fn(|| 0u32), config).unwrap();
///
/// let health = pool.health();
/// assert!(health.is_healthy());
/// assert_eq!(health.idle_resources, 3);
/// ```
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    /// Idle resources count
    pub idle_resources: usize,

    /// Active resources count
    pub active_resources: usize,

    /// Resources tracked by the pool
    pub total_resources: usize,

    /// Accounting mismatch between idle + active and tracked resources
    pub leak_detected: bool,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status
    pub fn new(idle: usize, active: usize, total: usize, leak_detected: bool) -> Self {
        let utilization = if total > 0 {
            active as f64 / total as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if leak_detected {
            warnings.push(format!(
                "Leak detected: idle {} + active {} != tracked {}",
                idle, active, total
            ));
            is_healthy = false;
        }

        // The pool grows on demand, so high utilization only warns
        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
        }

        if idle == 0 && total > 0 {
            warnings.push("No idle resources; next acquire will expand".to_string());
        }

        Self {
            is_healthy,
            utilization,
            idle_resources: idle,
            active_resources: active,
            total_resources: total,
            leak_detected,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leak_marks_unhealthy() {
        let status = HealthStatus::new(2, 1, 4, true);
        assert!(!status.is_healthy());
        assert_eq!(status.warning_count(), 1);
    }

    #[test]
    fn test_exhausted_pool_still_healthy() {
        let status = HealthStatus::new(0, 5, 5, false);
        assert!(status.is_healthy());
        assert_eq!(status.warning_count(), 2);
        assert_eq!(status.utilization, 1.0);
    }
}
