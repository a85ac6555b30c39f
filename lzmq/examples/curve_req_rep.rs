//! CURVE Encryption Example
//!
//! An encrypted REQ/REP exchange over TCP using the CURVE mechanism
//! (CurveZMQ, RFC 26).
//!
//! ## Keys
//!
//! - **Server**: a long-term key pair. Clients must know its public key.
//! - **Client**: a fresh key pair generated by `configure_client`.
//!
//! ## Running
//!
//! ```bash
//! cargo run -p lzmq --example curve_req_rep
//! ```
//!
//! The engine must be built with CURVE support; otherwise the example
//! prints a notice and exits.

use lzmq::curve::has_curve;
use lzmq::prelude::*;

const SERVER_ADDR: &str = "tcp://127.0.0.1:*";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    if !has_curve() {
        eprintln!("Engine built without CURVE support, nothing to do");
        return Ok(());
    }

    println!("🔐 CURVE REQ/REP");
    println!("================\n");

    let server_keys = KeyPair::generate()?;
    println!("Server public key: {}", server_keys.public_text());

    let ctx = Context::with_config(ContextConfig::default().with_default_linger(0))?;

    let server = ctx.socket("rep")?;
    configure_server(&server, server_keys.secret_text())?;
    server.bind(SERVER_ADDR)?;
    let endpoint = server.last_endpoint()?;
    println!("✓ Server listening on {endpoint}");

    let client = ctx.socket("req")?;
    let client_keys = configure_client(&client, server_keys.public_text())?;
    client.connect(&endpoint)?;
    println!("✓ Client connected with key {}", client_keys.public_text());

    client.send_one("Hello from CURVE client!", Mode::Blocking)?;
    let request = server.recv_one(Mode::Blocking)?;
    println!("📨 Server received: {}", String::from_utf8_lossy(request.data()));

    server.send_one("Hello from CURVE server!", Mode::Blocking)?;
    let reply = client.recv_one(Mode::Blocking)?;
    println!("📨 Client received: {}", String::from_utf8_lossy(reply.data()));

    println!("\n✓ Encrypted round trip complete");
    Ok(())
}
