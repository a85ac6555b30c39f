//! Example: ROUTER-DEALER load balancer proxy
//!
//! A proxy thread forwards requests from REQ clients to REP workers and
//! carries the replies back. Everything runs in one process over `inproc://`.
//!
//! # Architecture
//!
//! ```text
//! Client (REQ) → ROUTER (frontend) → DEALER (backend) → Worker (REP)
//!                      ↓                    ↓
//!              inproc://frontend     inproc://backend
//! ```
//!
//! The proxy owns its thread until the context is terminated, which makes it
//! return `Ok(())`.
//!
//! Run this example:
//! ```bash
//! cargo run -p lzmq --example proxy_broker
//! ```

use std::thread;

use lzmq::prelude::*;

const FRONTEND: &str = "inproc://frontend";
const BACKEND: &str = "inproc://backend";
const REQUESTS: usize = 5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("🚀 Starting ROUTER-DEALER Load Balancer");
    println!("========================================\n");

    let ctx = Context::with_config(ContextConfig::default().with_default_linger(0))?;

    let frontend = ctx.socket("router")?;
    frontend.bind(FRONTEND)?;
    println!("✓ Frontend ROUTER bound to {FRONTEND}");

    let backend = ctx.socket("dealer")?;
    backend.bind(BACKEND)?;
    println!("✓ Backend DEALER bound to {BACKEND}");

    let broker = thread::spawn(move || proxy(&frontend, &backend, None));

    let worker = ctx.socket("rep")?;
    worker.connect(BACKEND)?;
    let worker = thread::spawn(move || -> Result<()> {
        for _ in 0..REQUESTS {
            let request = worker.recv_one(Mode::Blocking)?;
            let mut reply = b"done: ".to_vec();
            reply.extend_from_slice(request.data());
            worker.send_one(reply, Mode::Blocking)?;
        }
        Ok(())
    });

    let mut client = ctx.socket("req")?;
    client.connect(FRONTEND)?;
    println!("\n📡 Proxy running, sending {REQUESTS} requests\n");

    for i in 0..REQUESTS {
        client.send_one(format!("job-{i}"), Mode::Blocking)?;
        let reply = client.recv_one(Mode::Blocking)?;
        println!("✓ {}", String::from_utf8_lossy(reply.data()));
    }
    client.close();

    worker.join().expect("worker thread panicked")?;
    ctx.term()?;
    broker.join().expect("proxy thread panicked")?;
    println!("\n✓ Proxy stopped");

    Ok(())
}
