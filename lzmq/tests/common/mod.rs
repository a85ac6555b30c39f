//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use lzmq::{Context, ContextConfig};

static NEXT_ENDPOINT: AtomicUsize = AtomicUsize::new(0);

/// Fresh context whose sockets drop pending messages on close.
pub fn context() -> Context {
    lzmq::dev_tracing::init_tracing();
    Context::with_config(ContextConfig::new().with_default_linger(0)).unwrap()
}

/// Unique in-process endpoint for one test.
pub fn inproc(tag: &str) -> String {
    let n = NEXT_ENDPOINT.fetch_add(1, Ordering::Relaxed);
    format!("inproc://{tag}-{n}")
}

/// Loopback TCP endpoint letting the engine pick the port.
pub const TCP_ANY: &str = "tcp://127.0.0.1:*";
