//! Core resource pool implementation

use crate::config::PoolConfiguration;
use crate::errors::{PoolError, PoolResult};
use crate::factory::ResourceFactory;
use crate::health::HealthStatus;
use crate::lifecycle::LifecycleHooks;
use crate::metrics::{MetricsTracker, PoolMetrics};
use crate::reaper::Reaper;
use crate::state::{PoolCounts, PoolState, ResourceId};

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A checked-out resource that returns to its pool when dropped
pub struct Pooled<T: LifecycleHooks + Send + 'static> {
    resource: Option<T>,
    id: ResourceId,
    shared: Arc<Shared<T>>,
}

impl<T: LifecycleHooks + Send + 'static> Pooled<T> {
    fn new(resource: T, id: ResourceId, shared: Arc<Shared<T>>) -> Self {
        Self {
            resource: Some(resource),
            id,
            shared,
        }
    }

    /// Identity of the resource inside its pool
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Take the resource out of the pool's accounting without releasing it
    ///
    /// The resource stays counted in the pool's total but no longer as
    /// active, so [`ResourcePool::detect_leaks`] reports it. The caller
    /// becomes responsible for tearing it down.
    pub fn detach(mut self) -> T {
        let resource = self.resource.take().expect("Value already taken");
        let mut state = self.shared.state.lock();
        state.forget_active(self.id);
        warn!(pool = self.shared.label, id = %self.id, "resource detached from pool");
        resource
    }

    fn into_parts(mut self) -> (ResourceId, T) {
        let resource = self.resource.take().expect("Value already taken");
        (self.id, resource)
    }
}

impl<T: LifecycleHooks + Send + 'static> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.resource.as_ref().expect("Value already taken")
    }
}

impl<T: LifecycleHooks + Send + 'static> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resource.as_mut().expect("Value already taken")
    }
}

impl<T: LifecycleHooks + Send + 'static> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            let _ = self.shared.check_in(self.id, resource);
        }
    }
}

impl<T: LifecycleHooks + Send + fmt::Debug + 'static> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("id", &self.id)
            .field("resource", &self.resource)
            .finish()
    }
}

/// State shared between the pool, its handles and its reaper
pub(crate) struct Shared<T> {
    pub state: Mutex<PoolState<T>>,
    pub factory: Box<dyn ResourceFactory<T>>,
    pub config: PoolConfiguration,
    pub metrics: MetricsTracker,
    pub verbose: AtomicBool,
    pub label: &'static str,
}

impl<T: LifecycleHooks + Send + 'static> Shared<T> {
    pub fn verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    fn create_idle(&self, state: &mut PoolState<T>) -> ResourceId {
        let id = state.admit(self.factory.create());
        MetricsTracker::bump(&self.metrics.total_created);
        id
    }

    fn expand(&self, state: &mut PoolState<T>) {
        let batch = self.config.expansion_batch_size;
        if self.verbose() {
            debug!(
                pool = self.label,
                idle = state.idle_len(),
                threshold = self.config.expansion_threshold,
                batch,
                "idle below threshold, expanding"
            );
        }
        for _ in 0..batch {
            self.create_idle(state);
        }
        MetricsTracker::bump(&self.metrics.expansions);
    }

    fn checkout<F>(&self, placement: F) -> (ResourceId, T)
    where
        F: FnOnce(&mut T),
    {
        let (id, mut resource, counts) = {
            let mut state = self.state.lock();

            if state.disposed {
                warn!(pool = self.label, "acquire on a disposed pool");
            } else if state.idle_len() < self.config.expansion_threshold {
                self.expand(&mut state);
            }

            let (id, resource) = match state.checkout() {
                Some(entry) => entry,
                None => {
                    if self.verbose() {
                        debug!(pool = self.label, "pool empty, creating one resource");
                    }
                    let resource = self.factory.create();
                    MetricsTracker::bump(&self.metrics.total_created);
                    (state.admit_active(), resource)
                }
            };
            (id, resource, state.counts())
        };

        // Already active; caller code runs without the lock held
        placement(&mut resource);
        resource.on_acquire();
        MetricsTracker::bump(&self.metrics.total_acquired);

        if self.verbose() {
            debug!(pool = self.label, %id, idle = counts.idle, active = counts.active, "acquired");
        }
        (id, resource)
    }

    pub(crate) fn check_in(&self, id: ResourceId, mut resource: T) -> PoolResult<()> {
        // Hooks run on the owned value before the lock is taken
        self.factory.recycle(&mut resource);
        resource.on_release();
        resource.reset_state();

        let mut state = self.state.lock();

        // A disposed pool keeps nothing: whatever comes back is destroyed.
        if state.disposed {
            self.destroy_locked(&mut state, id, resource);
            return Ok(());
        }

        match state.checkin(id, resource) {
            Ok(()) => {
                MetricsTracker::bump(&self.metrics.total_released);
                if self.verbose() {
                    let counts = state.counts();
                    debug!(pool = self.label, %id, idle = counts.idle, active = counts.active, "released");
                }
                Ok(())
            }
            Err((e, resource)) => {
                MetricsTracker::bump(&self.metrics.rejected_releases);
                warn!(pool = self.label, %id, error = %e, "released resource was not active");
                // Bookkeeping stays as is; only the caller's value goes
                self.destroy_value(id, resource);
                Err(e)
            }
        }
    }

    /// Stop tracking `id` and destroy it, with the state lock held
    pub(crate) fn destroy_locked(&self, state: &mut PoolState<T>, id: ResourceId, resource: T) {
        state.retire(id);
        self.destroy_value(id, resource);
    }

    /// Hand a resource to the destroyer without touching bookkeeping
    ///
    /// A failing or panicking destroyer is logged and counted; the resource
    /// is considered gone either way.
    fn destroy_value(&self, id: ResourceId, resource: T) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.factory.destroy(resource)));
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(payload) => Some(panic_message(payload.as_ref())),
        };

        match failure {
            None => {
                MetricsTracker::bump(&self.metrics.total_destroyed);
                if self.verbose() {
                    debug!(pool = self.label, %id, "destroyed");
                }
            }
            Some(reason) => {
                MetricsTracker::bump(&self.metrics.destroy_failures);
                let err = PoolError::Destroy { id: id.get(), reason };
                error!(pool = self.label, %id, error = %err, "destroyer failed");
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "destroyer panicked".to_string()
    }
}

/// Thread-safe elastic resource pool
///
/// Resources are created through a [`ResourceFactory`], handed out as
/// [`Pooled`] handles and returned on [`release`](Self::release) or drop. The
/// pool never blocks an acquire: when idle supply runs low it grows.
///
/// # Examples
///
/// ```
/// use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
///
/// let config = PoolConfiguration::new()
///     .with_initial_size(3)
///     .with_expansion_threshold(1)
///     .with_expansion_batch_size(2);
/// let pool = ResourcePool::new(factory_fn(|| Vec::<u8>::with_capacity(1024)), config).unwrap();
///
/// let mut buf = pool.acquire();
/// buf.extend_from_slice(b"hello");
/// pool.release(buf).unwrap();
///
/// assert_eq!(pool.pool_count(), 3);
/// assert!(!pool.detect_leaks());
/// ```
pub struct ResourcePool<T: LifecycleHooks + Send + 'static> {
    shared: Arc<Shared<T>>,
    reaper: Mutex<Option<Reaper>>,
}

impl<T: LifecycleHooks + Send + 'static> ResourcePool<T> {
    /// Create a pool and eagerly fill it with `config.initial_size` resources
    pub fn new<F>(factory: F, config: PoolConfiguration) -> PoolResult<Self>
    where
        F: ResourceFactory<T> + 'static,
    {
        Self::builder().factory(factory).config(config).build()
    }

    pub fn builder() -> ResourcePoolBuilder<T> {
        ResourcePoolBuilder::default()
    }

    fn from_parts(factory: Box<dyn ResourceFactory<T>>, config: PoolConfiguration) -> Self {
        let label = std::any::type_name::<T>();
        let initial = config.initial_size;
        let auto_evict = config.auto_evict;

        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState::new(initial)),
            factory,
            verbose: AtomicBool::new(config.verbose),
            config,
            metrics: MetricsTracker::new(),
            label,
        });

        {
            let mut state = shared.state.lock();
            for _ in 0..initial {
                shared.create_idle(&mut state);
            }
        }
        if shared.verbose() {
            debug!(pool = label, initial, "pool initialized");
        }

        let reaper = auto_evict.then(|| Reaper::start(&shared));
        Self {
            shared,
            reaper: Mutex::new(reaper),
        }
    }

    /// Acquire a resource in its default placement
    pub fn acquire(&self) -> Pooled<T> {
        self.acquire_with(|_| {})
    }

    /// Acquire a resource, applying `placement` before `on_acquire` runs
    ///
    /// # Examples
    ///
    /// ```
    /// use elastic_pool::{factory_fn, LifecycleHooks, PoolConfiguration, ResourcePool};
    ///
    /// #[derive(Default)]
    /// struct Sprite { x: f32, y: f32 }
    /// impl LifecycleHooks for Sprite {}
    ///
    /// let pool = ResourcePool::new(factory_fn(Sprite::default), PoolConfiguration::default()).unwrap();
    /// let sprite = pool.acquire_with(|s| { s.x = 4.0; s.y = 2.0; });
    /// assert_eq!(sprite.x, 4.0);
    /// ```
    pub fn acquire_with<F>(&self, placement: F) -> Pooled<T>
    where
        F: FnOnce(&mut T),
    {
        let (id, resource) = self.shared.checkout(placement);
        Pooled::new(resource, id, Arc::clone(&self.shared))
    }

    /// Return a resource to the pool
    ///
    /// Refused releases leave the pool untouched and are reported as
    /// [`PoolError::ForeignOrUnknownHandle`] or [`PoolError::DoubleRelease`].
    /// A handle belonging to another pool goes back to that pool instead.
    pub fn release(&self, handle: Pooled<T>) -> PoolResult<()> {
        if !Arc::ptr_eq(&handle.shared, &self.shared) {
            let err = PoolError::ForeignOrUnknownHandle { id: handle.id.get() };
            MetricsTracker::bump(&self.shared.metrics.rejected_releases);
            warn!(pool = self.shared.label, id = %handle.id, "release of a handle owned by another pool");
            return Err(err);
        }
        let (id, resource) = handle.into_parts();
        self.shared.check_in(id, resource)
    }

    /// Whether idle + active disagrees with the tracked total
    pub fn detect_leaks(&self) -> bool {
        let state = self.shared.state.lock();
        let counts = state.counts();
        let leaked = state.leaked();
        drop(state);

        if leaked {
            warn!(
                pool = self.shared.label,
                idle = counts.idle,
                active = counts.active,
                tracked = counts.all,
                "pool leak detected"
            );
        } else if self.shared.verbose() {
            debug!(pool = self.shared.label, "no leaks detected");
        }
        leaked
    }

    /// Run one idle-eviction sweep now, returning how many resources went
    pub fn evict_idle(&self) -> usize {
        self.shared.sweep_idle(|| false)
    }

    /// Stop the reaper and destroy every resource the pool owns
    ///
    /// Resources checked out at this point are destroyed when their handle
    /// comes back. Calling this twice is harmless.
    pub fn dispose(&self) {
        if let Some(reaper) = self.reaper.lock().take() {
            reaper.stop();
        }

        let mut state = self.shared.state.lock();
        let was_disposed = state.disposed;
        state.disposed = true;
        let outstanding = state.counts().active;
        let drained = state.drain();
        let destroyed = drained.len();
        for (id, resource) in drained {
            self.shared.destroy_locked(&mut state, id, resource);
        }

        if !was_disposed && self.shared.verbose() {
            debug!(pool = self.shared.label, destroyed, outstanding, "pool disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.state.lock().disposed
    }

    /// Idle resources available for acquisition
    pub fn pool_count(&self) -> usize {
        self.counts().idle
    }

    pub fn active_count(&self) -> usize {
        self.counts().active
    }

    /// Every resource currently tracked, idle or active
    pub fn all_count(&self) -> usize {
        self.counts().all
    }

    pub fn counts(&self) -> PoolCounts {
        self.shared.state.lock().counts()
    }

    /// Toggle per-operation debug events
    pub fn set_verbose(&self, enable: bool) {
        self.shared.verbose.store(enable, Ordering::Relaxed);
    }

    pub fn config(&self) -> &PoolConfiguration {
        &self.shared.config
    }

    /// Get pool metrics
    pub fn metrics(&self) -> PoolMetrics {
        let counts = self.counts();
        self.shared
            .metrics
            .get_metrics(counts.idle, counts.active, counts.all)
    }

    /// Export metrics
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus format
    #[cfg(feature = "metrics")]
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> prometheus::Result<String> {
        crate::metrics::MetricsExporter::export_prometheus(&self.metrics(), pool_name, tags)
    }

    /// Get health status
    pub fn health(&self) -> HealthStatus {
        let state = self.shared.state.lock();
        let counts = state.counts();
        HealthStatus::new(counts.idle, counts.active, counts.all, state.leaked())
    }
}

impl<T: LifecycleHooks + Send + 'static> Drop for ResourcePool<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T: LifecycleHooks + Send + 'static> fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("resource", &self.shared.label)
            .field("counts", &self.counts())
            .field("config", &self.shared.config)
            .finish()
    }
}

/// Builder for [`ResourcePool`]
pub struct ResourcePoolBuilder<T> {
    factory: Option<Box<dyn ResourceFactory<T>>>,
    config: PoolConfiguration,
}

impl<T> Default for ResourcePoolBuilder<T> {
    fn default() -> Self {
        Self {
            factory: None,
            config: PoolConfiguration::default(),
        }
    }
}

impl<T: LifecycleHooks + Send + 'static> ResourcePoolBuilder<T> {
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: ResourceFactory<T> + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn config(mut self, config: PoolConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Build the pool
    ///
    /// # Examples
    ///
    /// ```
    /// use elastic_pool::{PoolError, ResourcePool};
    ///
    /// let result = ResourcePool::<u32>::builder().build();
    /// assert!(matches!(result, Err(PoolError::InvalidConfiguration(_))));
    /// ```
    pub fn build(self) -> PoolResult<ResourcePool<T>> {
        let factory = self.factory.ok_or_else(|| {
            PoolError::InvalidConfiguration("a resource factory is required".to_string())
        })?;
        self.config.validate()?;
        Ok(ResourcePool::from_parts(factory, self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BoxError;
    use crate::factory::{factory_fn, FnFactory};
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Probe {
        acquired: usize,
        released: usize,
        resets: usize,
        scratch: Vec<u8>,
    }

    impl LifecycleHooks for Probe {
        fn on_acquire(&mut self) {
            self.acquired += 1;
        }

        fn on_release(&mut self) {
            self.released += 1;
        }

        fn reset_state(&mut self) {
            self.resets += 1;
            self.scratch.clear();
        }
    }

    fn sized(initial: usize, threshold: usize, batch: usize) -> PoolConfiguration {
        PoolConfiguration::new()
            .with_initial_size(initial)
            .with_expansion_threshold(threshold)
            .with_expansion_batch_size(batch)
    }

    fn counting_factory(
        created: Arc<AtomicUsize>,
        destroyed: Arc<AtomicUsize>,
    ) -> impl ResourceFactory<u32> {
        FnFactory::new(
            move || created.fetch_add(1, Ordering::Relaxed) as u32,
            move |_: u32| -> Result<(), BoxError> {
                destroyed.fetch_add(1, Ordering::Relaxed);
                Ok(())
            },
        )
    }

    #[test]
    fn test_initial_fill() {
        let pool = ResourcePool::new(factory_fn(|| 0u32), sized(4, 0, 1)).unwrap();
        assert_eq!(pool.counts(), PoolCounts { idle: 4, active: 0, all: 4 });
    }

    #[test]
    fn test_hooks_run_in_order() {
        let pool = ResourcePool::new(factory_fn(Probe::default), sized(1, 0, 1)).unwrap();

        let mut probe = pool.acquire();
        assert_eq!(probe.acquired, 1);
        probe.scratch.push(1);
        pool.release(probe).unwrap();

        let probe = pool.acquire();
        assert_eq!(probe.acquired, 2);
        assert_eq!(probe.released, 1);
        assert_eq!(probe.resets, 1);
        assert!(probe.scratch.is_empty());
    }

    #[test]
    fn test_placement_applied_before_on_acquire() {
        struct Slot {
            value: u32,
            seen_on_acquire: u32,
        }
        impl LifecycleHooks for Slot {
            fn on_acquire(&mut self) {
                self.seen_on_acquire = self.value;
            }
        }

        let pool = ResourcePool::new(
            factory_fn(|| Slot { value: 0, seen_on_acquire: 0 }),
            sized(1, 0, 1),
        )
        .unwrap();
        let slot = pool.acquire_with(|s| s.value = 9);
        assert_eq!(slot.seen_on_acquire, 9);
    }

    #[test]
    fn test_recycle_runs_before_hooks() {
        struct Cursor {
            position: u32,
            position_at_release: Option<u32>,
        }
        impl LifecycleHooks for Cursor {
            fn on_release(&mut self) {
                self.position_at_release = Some(self.position);
            }
        }

        struct Rewind;
        impl ResourceFactory<Cursor> for Rewind {
            fn create(&self) -> Cursor {
                Cursor { position: 0, position_at_release: None }
            }
            fn destroy(&self, _: Cursor) -> Result<(), BoxError> {
                Ok(())
            }
            fn recycle(&self, resource: &mut Cursor) {
                resource.position = 0;
            }
        }

        let pool = ResourcePool::new(Rewind, sized(1, 0, 1)).unwrap();
        let mut cursor = pool.acquire();
        cursor.position = 12;
        drop(cursor);

        let cursor = pool.acquire();
        assert_eq!(cursor.position, 0);
        assert_eq!(cursor.position_at_release, Some(0));
    }

    #[test]
    fn test_drop_returns_to_pool() {
        let pool = ResourcePool::new(factory_fn(|| 0u32), sized(2, 0, 1)).unwrap();
        {
            let _a = pool.acquire();
            assert_eq!(pool.active_count(), 1);
        }
        assert_eq!(pool.counts(), PoolCounts { idle: 2, active: 0, all: 2 });
        assert_eq!(pool.metrics().total_released, 1);
    }

    #[test]
    fn test_zero_threshold_grows_by_one() {
        let pool = ResourcePool::new(factory_fn(|| 0u32), sized(0, 0, 10)).unwrap();
        let _a = pool.acquire();
        let _b = pool.acquire();
        assert_eq!(pool.counts(), PoolCounts { idle: 0, active: 2, all: 2 });
        assert_eq!(pool.metrics().expansions, 0);
    }

    #[test]
    fn test_foreign_handle_goes_home() {
        let a = ResourcePool::new(factory_fn(|| 0u32), sized(1, 0, 1)).unwrap();
        let b = ResourcePool::new(factory_fn(|| 0u32), sized(1, 0, 1)).unwrap();

        let handle = a.acquire();
        let id = handle.id().get();
        assert_eq!(
            b.release(handle),
            Err(PoolError::ForeignOrUnknownHandle { id })
        );
        assert_eq!(b.counts(), PoolCounts { idle: 1, active: 0, all: 1 });
        assert_eq!(a.counts(), PoolCounts { idle: 1, active: 0, all: 1 });
        assert_eq!(b.metrics().rejected_releases, 1);
    }

    #[test]
    fn test_second_check_in_leaves_state_alone() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let pool = ResourcePool::new(
            counting_factory(Arc::new(AtomicUsize::new(0)), Arc::clone(&destroyed)),
            sized(2, 0, 1),
        )
        .unwrap();

        let handle = pool.acquire();
        let id = handle.id();
        pool.release(handle).unwrap();
        let before = pool.counts();

        assert_eq!(
            pool.shared.check_in(id, 0),
            Err(PoolError::DoubleRelease { id: id.get() })
        );
        assert_eq!(pool.counts(), before);
        assert!(!pool.detect_leaks());
        assert_eq!(pool.metrics().rejected_releases, 1);
        // Only the duplicate value went to the destroyer
        assert_eq!(destroyed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_placement_may_read_pool() {
        let pool = ResourcePool::new(factory_fn(|| 0u32), sized(1, 0, 1)).unwrap();
        let mut seen = None;
        let _held = pool.acquire_with(|_| seen = Some(pool.counts()));
        assert_eq!(seen, Some(PoolCounts { idle: 0, active: 1, all: 1 }));
    }

    #[test]
    fn test_reset_may_return_nested_handle() {
        struct Node {
            child: Option<Box<Pooled<Node>>>,
        }
        impl LifecycleHooks for Node {
            fn reset_state(&mut self) {
                self.child = None;
            }
        }

        let pool = ResourcePool::new(factory_fn(|| Node { child: None }), sized(2, 0, 1)).unwrap();
        let mut parent = pool.acquire();
        parent.child = Some(Box::new(pool.acquire()));
        assert_eq!(pool.active_count(), 2);

        pool.release(parent).unwrap();
        assert_eq!(pool.counts(), PoolCounts { idle: 2, active: 0, all: 2 });
        assert!(!pool.detect_leaks());
    }

    #[test]
    fn test_missing_factory_rejected() {
        let result = ResourcePool::<u32>::builder().config(sized(1, 0, 1)).build();
        assert!(matches!(result, Err(PoolError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = ResourcePool::new(factory_fn(|| 0u32), sized(1, 0, 0));
        assert!(matches!(result, Err(PoolError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        let pool = ResourcePool::new(
            counting_factory(Arc::clone(&created), Arc::clone(&destroyed)),
            sized(5, 0, 1),
        )
        .unwrap();

        pool.dispose();
        pool.dispose();
        assert!(pool.is_disposed());
        assert_eq!(destroyed.load(Ordering::Relaxed), 5);
        assert_eq!(pool.counts(), PoolCounts::default());
    }

    #[test]
    fn test_outstanding_handle_destroyed_after_dispose() {
        let created = Arc::new(AtomicUsize::new(0));
        let destroyed = Arc::new(AtomicUsize::new(0));
        let pool = ResourcePool::new(
            counting_factory(Arc::clone(&created), Arc::clone(&destroyed)),
            sized(2, 0, 1),
        )
        .unwrap();

        let handle = pool.acquire();
        pool.dispose();
        assert_eq!(destroyed.load(Ordering::Relaxed), 1);

        assert!(pool.release(handle).is_ok());
        assert_eq!(destroyed.load(Ordering::Relaxed), 2);
        assert_eq!(pool.counts(), PoolCounts::default());
        assert_eq!(pool.metrics().rejected_releases, 0);
    }

    #[test]
    fn test_destroy_failure_is_contained() {
        let pool = ResourcePool::new(
            FnFactory::new(|| 1u8, |_: u8| -> Result<(), BoxError> { Err("socket busy".into()) }),
            sized(3, 0, 1),
        )
        .unwrap();

        pool.dispose();
        let metrics = pool.metrics();
        assert_eq!(metrics.destroy_failures, 3);
        assert_eq!(metrics.total_destroyed, 0);
        assert_eq!(pool.all_count(), 0);
    }

    #[test]
    fn test_panicking_destroyer_is_contained() {
        let pool = ResourcePool::new(
            FnFactory::new(|| 1u8, |_: u8| -> Result<(), BoxError> { panic!("boom") }),
            sized(2, 0, 1),
        )
        .unwrap();

        pool.dispose();
        assert_eq!(pool.metrics().destroy_failures, 2);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let pool = Arc::new(ResourcePool::new(factory_fn(|| 0u64), sized(4, 2, 4)).unwrap());

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let mut res = pool.acquire();
                        *res += 1;
                        pool.release(res).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let counts = pool.counts();
        assert_eq!(counts.active, 0);
        assert_eq!(counts.idle, counts.all);
        assert!(!pool.detect_leaks());
        assert_eq!(pool.metrics().total_acquired, 4000);
    }
}
