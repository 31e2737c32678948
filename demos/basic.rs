//! Basic usage examples for ResourcePool

use elastic_pool::{BoxError, FnFactory, LifecycleHooks, PoolConfiguration, ResourcePool};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Entity {
    id: usize,
    position: (f32, f32),
    tags: Vec<String>,
}

impl LifecycleHooks for Entity {
    fn on_acquire(&mut self) {
        self.tags.push("spawned".to_string());
    }

    fn reset_state(&mut self) {
        self.position = (0.0, 0.0);
        self.tags.clear();
    }
}

fn entity_factory() -> impl elastic_pool::ResourceFactory<Entity> {
    let next = std::sync::atomic::AtomicUsize::new(0);
    FnFactory::new(
        move || Entity {
            id: next.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            position: (0.0, 0.0),
            tags: Vec::new(),
        },
        |entity: Entity| -> Result<(), BoxError> {
            println!("   destroying entity {}", entity.id);
            Ok(())
        },
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== elastic_pool - Basic Examples ===\n");

    // Example 1: Acquire and release
    acquire_release();

    // Example 2: Expansion
    expansion();

    // Example 3: Leak detection
    leak_detection();

    // Example 4: Metrics and health
    metrics_and_health();
}

fn acquire_release() {
    println!("1. Acquire and Release:");
    let config = PoolConfiguration::new().with_initial_size(2).with_verbose(true);
    let pool = ResourcePool::new(entity_factory(), config).unwrap();

    {
        let entity = pool.acquire_with(|e| e.position = (3.0, 4.0));
        println!("   Got entity {} at {:?} {:?}", entity.id, entity.position, entity.tags);
        // Entity automatically returned when dropped
    }

    let entity = pool.acquire();
    println!("   Reused entity {} at {:?}", entity.id, entity.position);
    pool.release(entity).unwrap();

    println!("   Idle after return: {}\n", pool.pool_count());
}

fn expansion() {
    println!("2. Expansion:");
    let config = PoolConfiguration::new()
        .with_initial_size(3)
        .with_expansion_threshold(1)
        .with_expansion_batch_size(2);
    let pool = ResourcePool::new(entity_factory(), config).unwrap();

    let held: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
    let counts = pool.counts();
    println!("   After 4 acquires: idle={}, active={}, all={}", counts.idle, counts.active, counts.all);

    for entity in held {
        pool.release(entity).unwrap();
    }
    println!("   After release: idle={}, active={}\n", pool.pool_count(), pool.active_count());
}

fn leak_detection() {
    println!("3. Leak Detection:");
    let pool = ResourcePool::new(entity_factory(), PoolConfiguration::new().with_initial_size(2)).unwrap();
    println!("   Leaks before: {}", pool.detect_leaks());

    let escaped = pool.acquire().detach();
    println!("   Detached entity {}", escaped.id);
    println!("   Leaks after: {}\n", pool.detect_leaks());
}

fn metrics_and_health() {
    println!("4. Metrics and Health:");
    let pool = ResourcePool::new(entity_factory(), PoolConfiguration::new().with_initial_size(5)).unwrap();

    {
        let _a = pool.acquire();
        let _b = pool.acquire();

        let health = pool.health();
        println!("   Health: {}", if health.is_healthy { "Healthy" } else { "Unhealthy" });
        println!("   Utilization: {:.1}%", health.utilization * 100.0);
        println!("   Active: {}, Idle: {}", health.active_resources, health.idle_resources);
    }

    let metrics = pool.export_metrics();
    println!("\n   Metrics:");
    for (key, value) in metrics {
        println!("     {}: {}", key, value);
    }

    match pool.export_metrics_prometheus("entities", None) {
        Ok(text) => println!("\n{}", text),
        Err(e) => println!("   Prometheus export failed: {}", e),
    }

    pool.dispose();
}
