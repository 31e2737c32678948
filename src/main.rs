// elastic_pool quick demo
//
// The library lives in lib.rs. Run the demos with: cargo run --example basic

use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};

fn main() {
    println!("=== elastic_pool ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    let config = PoolConfiguration::new()
        .with_initial_size(3)
        .with_expansion_threshold(1)
        .with_expansion_batch_size(2);

    let pool = match ResourcePool::new(factory_fn(|| Vec::<u8>::with_capacity(4096)), config) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("  Could not build pool: {e}");
            return;
        }
    };

    println!("Quick Demo:");
    {
        let held: Vec<_> = (0..4).map(|_| pool.acquire()).collect();
        let counts = pool.counts();
        println!(
            "  Holding {}: idle={}, active={}, all={}",
            held.len(),
            counts.idle,
            counts.active,
            counts.all
        );
    }

    println!("  Idle after return: {}", pool.pool_count());
    println!("  Leaks: {}", pool.detect_leaks());
}
