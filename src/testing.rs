//! Shared helpers for unit tests.
//!
//! [`StubTransport`] answers from a route table, counts every call, and
//! doubles as its own [`TransportFactory`]: each created instance shares the
//! same routes and counters. [`init_tracing`] routes library logs to the
//! test output, filtered by `RUST_LOG`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::{Payload, Transport, TransportFactory};

/// Installs a test-writer subscriber once per test binary.
pub(crate) fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hal_navigator=debug"));

    // Already installed by an earlier test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Copy)]
enum Method {
    Get,
    Post,
}

#[derive(Default)]
struct StubState {
    gets: FxHashMap<String, Result<Bytes>>,
    posts: FxHashMap<String, Result<Bytes>>,
    payloads: Vec<Payload>,
    delay: Option<Duration>,
    creation_failure: Option<String>,
}

/// Counting, routable transport shared by clones.
#[derive(Clone, Default)]
pub(crate) struct StubTransport {
    state: Arc<Mutex<StubState>>,
    get_calls: Arc<AtomicUsize>,
    post_calls: Arc<AtomicUsize>,
    instances: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for GET `url`.
    pub(crate) fn route(&self, url: &str, body: &str) -> &Self {
        self.state
            .lock()
            .gets
            .insert(url.to_string(), Ok(Bytes::from(body.to_string())));
        self
    }

    /// Serves `document` as JSON for GET `url`.
    pub(crate) fn route_json(&self, url: &str, document: Value) -> &Self {
        self.route(url, &document.to_string())
    }

    /// Serves `document` as JSON for POST `url`.
    pub(crate) fn route_post_json(&self, url: &str, document: Value) -> &Self {
        self.state
            .lock()
            .posts
            .insert(url.to_string(), Ok(Bytes::from(document.to_string())));
        self
    }

    /// Fails GET `url` with a transport error.
    pub(crate) fn fail(&self, url: &str, message: &str) -> &Self {
        self.state
            .lock()
            .gets
            .insert(url.to_string(), Err(Error::transport(url, message)));
        self
    }

    /// Delays every call by `delay`.
    pub(crate) fn with_delay(&self, delay: Duration) -> &Self {
        self.state.lock().delay = Some(delay);
        self
    }

    /// Makes the factory fail.
    pub(crate) fn fail_creation(&self, message: &str) {
        self.state.lock().creation_failure = Some(message.to_string());
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn post_calls(&self) -> usize {
        self.post_calls.load(Ordering::SeqCst)
    }

    /// Number of instances created through the factory.
    pub(crate) fn instances(&self) -> usize {
        self.instances.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous calls observed.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn payloads(&self) -> Vec<Payload> {
        self.state.lock().payloads.clone()
    }

    async fn respond(&self, method: Method, url: &Url) -> Result<Bytes> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, outcome) = {
            let state = self.state.lock();
            let table = match method {
                Method::Get => &state.gets,
                Method::Post => &state.posts,
            };
            let outcome = table
                .get(url.as_str())
                .cloned()
                .unwrap_or_else(|| Err(Error::transport(url.as_str(), "no route")));
            (state.delay, outcome)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &Url) -> Result<Bytes> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.respond(Method::Get, url).await
    }

    async fn post(&self, url: &Url, payload: &Payload) -> Result<Bytes> {
        self.post_calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().payloads.push(payload.clone());
        self.respond(Method::Post, url).await
    }
}

impl TransportFactory for StubTransport {
    fn create(&self) -> Result<Box<dyn Transport>> {
        if let Some(message) = self.state.lock().creation_failure.clone() {
            return Err(Error::config(message));
        }
        self.instances.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.clone()))
    }
}
