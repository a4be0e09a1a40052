//! Navigation benchmark suite.
//!
//! Benchmarks fan-out navigation over an in-memory transport:
//! - Collection sizes: 10, 100
//! - Pool capacities: 1, 10
//!
//! Run with: cargo bench --bench navigation
//! Results saved to: target/criterion/

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use futures_util::future::try_join_all;
use hal_navigator::{
    Error, Node, Payload, PoolOptions, Result, Scheduler, Transport, TransportFactory,
};
use serde_json::json;
use tokio::runtime::Runtime;
use url::Url;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const ROOT: &str = "http://bench.test/";
const COLLECTION_SIZES: &[usize] = &[10, 100];
const POOL_CAPACITIES: &[usize] = &[1, 10];

// ============================================================================
// In-Memory Transport
// ============================================================================

/// Serves a collection document at `ROOT` and a small item everywhere else.
#[derive(Clone)]
struct MemoryTransport {
    root: Bytes,
    item: Bytes,
}

impl MemoryTransport {
    fn new(size: usize) -> Self {
        let items: Vec<_> = (0..size)
            .map(|i| json!({"href": format!("/items/{i}")}))
            .collect();
        let root = json!({"_links": {"self": {"href": ROOT}, "item": items}});
        let item = json!({"_links": {"up": {"href": "/"}}, "value": 42});

        Self {
            root: Bytes::from(root.to_string()),
            item: Bytes::from(item.to_string()),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn get(&self, url: &Url) -> Result<Bytes> {
        if url.as_str() == ROOT {
            Ok(self.root.clone())
        } else {
            Ok(self.item.clone())
        }
    }

    async fn post(&self, url: &Url, _payload: &Payload) -> Result<Bytes> {
        Err(Error::transport(url.as_str(), "read-only"))
    }
}

impl TransportFactory for MemoryTransport {
    fn create(&self) -> Result<Box<dyn Transport>> {
        Ok(Box::new(self.clone()))
    }
}

// ============================================================================
// Benchmark: Fan-Out
// ============================================================================

fn bench_follow_all(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");

    let mut group = c.benchmark_group("follow_all");

    for &size in COLLECTION_SIZES {
        for &capacity in POOL_CAPACITIES {
            let id = format!("{size}items_{capacity}pool");
            group.bench_with_input(
                BenchmarkId::new("fetch_each", &id),
                &(size, capacity),
                |b, &(size, capacity)| {
                    b.to_async(&rt)
                        .iter(|| async move { fan_out(size, capacity).await });
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Benchmark: Memoized Body
// ============================================================================

fn bench_memoized_body(c: &mut Criterion) {
    let rt = Runtime::new().expect("runtime");

    let node = Node::builder()
        .transport(MemoryTransport::new(100))
        .url(ROOT)
        .build()
        .expect("node")
        .fetch();

    c.bench_function("memoized_body", |b| {
        b.to_async(&rt).iter(|| async { node.body().await.expect("body") });
    });
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn fan_out(size: usize, capacity: usize) -> usize {
    let root = Node::builder()
        .transport(MemoryTransport::new(size))
        .pool_options(PoolOptions::new().with_capacity(capacity))
        .scheduler(Scheduler::current())
        .url(ROOT)
        .build()
        .expect("node")
        .fetch();

    let items = root.follow_all("item").await.expect("follow");
    let fetched: Vec<Node> = items.iter().map(Node::fetch).collect();
    let bodies: Vec<Arc<_>> = try_join_all(fetched.iter().map(Node::body))
        .await
        .expect("bodies");

    bodies.len()
}

criterion_group!(benches, bench_follow_all, bench_memoized_body);
criterion_main!(benches);
