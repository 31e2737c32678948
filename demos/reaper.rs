//! Idle reaping under tokio

use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    println!("=== elastic_pool - Idle Reaper ===\n");

    let config = PoolConfiguration::new()
        .with_initial_size(2)
        .with_expansion_threshold(1)
        .with_expansion_batch_size(8)
        .with_auto_evict(Duration::from_millis(200))
        .with_verbose(true);
    let pool = Arc::new(ResourcePool::new(factory_fn(|| Vec::<u8>::with_capacity(1024)), config).unwrap());

    // Burst of concurrent work forces expansion
    let mut tasks = Vec::new();
    for n in 0..6 {
        let pool = Arc::clone(&pool);
        tasks.push(tokio::spawn(async move {
            let mut buf = pool.acquire();
            buf.push(n);
            sleep(Duration::from_millis(50)).await;
        }));
    }
    for task in tasks {
        let _ = task.await;
    }

    println!("After burst: {:?}", pool.counts());

    // Give the reaper a few sweeps
    sleep(Duration::from_millis(800)).await;
    println!("After reaping: {:?}", pool.counts());
    println!("Evictions: {}", pool.metrics().evictions);

    pool.dispose();
    println!("After dispose: {:?}", pool.counts());
}
