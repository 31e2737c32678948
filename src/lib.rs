//! # elastic_pool
//!
//! Thread-safe, elastic resource pool for expensive-to-construct resources:
//! connections, buffers, worker handles, game entities.
//!
//! ## Features
//!
//! - One lock covers idle, active and tracked resources, so every snapshot is
//!   consistent
//! - Acquire never blocks: the pool refills in batches below a low-watermark
//!   and grows by one when empty
//! - Automatic return of resources via RAII (Drop trait)
//! - Lifecycle hooks for acquire, release and reset
//! - Background idle reaper (tokio task or dedicated thread) that never
//!   shrinks the pool below its initial size
//! - Leak detection, health status and metrics
//! - Prometheus metrics export
//!
//! ## Quick Start
//!
//! ```rust
//! use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
//!
//! let pool = ResourcePool::new(factory_fn(|| String::with_capacity(256)), PoolConfiguration::default()).unwrap();
//! {
//!     let mut line = pool.acquire();
//!     line.push_str("hello");
//!     // Resource automatically returned when `line` goes out of scope
//! }
//! assert_eq!(pool.active_count(), 0);
//! ```

mod pool;
mod state;
mod config;
mod factory;
mod lifecycle;
mod metrics;
mod health;
mod reaper;
mod errors;

pub use pool::{ResourcePool, ResourcePoolBuilder, Pooled};
pub use state::{PoolCounts, ResourceId};
pub use config::PoolConfiguration;
pub use factory::{factory_fn, FnFactory, ResourceFactory};
pub use lifecycle::LifecycleHooks;
pub use metrics::PoolMetrics;
#[cfg(feature = "metrics")]
pub use metrics::MetricsExporter;
pub use health::HealthStatus;
pub use errors::{BoxError, PoolError, PoolResult};
