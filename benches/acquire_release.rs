use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use elastic_pool::{factory_fn, PoolConfiguration, ResourcePool};
use std::sync::Arc;
use std::thread;

const OPS_PER_ITER: u64 = 1_000;

fn bench_single_thread(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire_release");
    group.throughput(Throughput::Elements(OPS_PER_ITER));

    for held in [1usize, 8, 64] {
        let config = PoolConfiguration::new().with_initial_size(held);
        let pool = ResourcePool::new(factory_fn(|| vec![0u8; 256]), config).unwrap();

        group.bench_with_input(BenchmarkId::new("held", held), &held, |b, &held| {
            b.iter(|| {
                for _ in 0..OPS_PER_ITER / held as u64 {
                    let batch: Vec<_> = (0..held).map(|_| pool.acquire()).collect();
                    for buf in batch {
                        pool.release(black_box(buf)).unwrap();
                    }
                }
            });
        });
    }
    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for threads in [2usize, 4, 8] {
        let pool = Arc::new(
            ResourcePool::new(factory_fn(|| vec![0u8; 256]), PoolConfiguration::default()).unwrap(),
        );
        group.throughput(Throughput::Elements(OPS_PER_ITER * threads as u64));

        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &threads| {
            b.iter(|| {
                let workers: Vec<_> = (0..threads)
                    .map(|_| {
                        let pool = Arc::clone(&pool);
                        thread::spawn(move || {
                            for _ in 0..OPS_PER_ITER {
                                let mut buf = pool.acquire();
                                buf.push(1);
                                drop(buf);
                            }
                        })
                    })
                    .collect();
                for worker in workers {
                    worker.join().unwrap();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_thread, bench_contended);
criterion_main!(benches);
