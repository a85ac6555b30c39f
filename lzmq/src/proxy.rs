//! Message proxy (broker) between two sockets.
//!
//! A proxy connects frontend and backend sockets and forwards messages
//! bidirectionally until the owning context is terminated. This covers
//! brokers, load balancers and forwarders without application logic.
//!
//! # Supported Patterns
//!
//! - **PUB-SUB broker**: XSUB frontend ←→ XPUB backend
//! - **REQ-REP load balancer**: ROUTER frontend ←→ DEALER backend
//! - **PUSH-PULL forwarder**: PULL frontend ←→ PUSH backend
//!
//! # Message Flow
//!
//! ```text
//! Publishers → XSUB (frontend) → XPUB (backend) → Subscribers
//! Clients    → ROUTER (frontend) → DEALER (backend) → Workers
//! ```
//!
//! The proxy monopolizes its calling thread. Run it on a dedicated thread and
//! stop it by terminating the context (or, for [`proxy_steerable`], by sending
//! `TERMINATE` on the control socket).
//!
//! # Example: REQ-REP Load Balancer
//!
//! ```no_run
//! use lzmq::{proxy::proxy, Context};
//!
//! # fn main() -> lzmq::Result<()> {
//! let ctx = Context::new()?;
//!
//! // Clients connect to 5555
//! let frontend = ctx.socket("router")?;
//! frontend.bind("tcp://127.0.0.1:5555")?;
//!
//! // Workers connect to 5556
//! let backend = ctx.socket("dealer")?;
//! backend.bind("tcp://127.0.0.1:5556")?;
//!
//! // Returns once the context is terminated from another thread
//! proxy(&frontend, &backend, None)?;
//! # Ok(())
//! # }
//! ```

use lzmq_core::error::{LzmqError, Result};
use tracing::debug;

use crate::engine;
use crate::socket::Socket;

/// Run a bidirectional proxy between `frontend` and `backend`.
///
/// If `capture` is given, every forwarded message is also sent to it.
/// Blocks until the context is terminated, which is reported as `Ok(())`.
/// Any other engine failure is returned.
pub fn proxy(frontend: &Socket, backend: &Socket, capture: Option<&Socket>) -> Result<()> {
    run(frontend, backend, capture, None)
}

/// Like [`proxy`], with a control socket.
///
/// The control socket accepts the single-part commands `PAUSE`, `RESUME`,
/// `TERMINATE` and `STATISTICS`. `TERMINATE` makes this return `Ok(())`.
pub fn proxy_steerable(
    frontend: &Socket,
    backend: &Socket,
    capture: Option<&Socket>,
    control: &Socket,
) -> Result<()> {
    run(frontend, backend, capture, Some(control))
}

fn run(
    frontend: &Socket,
    backend: &Socket,
    capture: Option<&Socket>,
    control: Option<&Socket>,
) -> Result<()> {
    let front = frontend.handle()?;
    let back = backend.handle()?;
    let capture = capture.map(Socket::handle).transpose()?;
    let control = control.map(Socket::handle).transpose()?;

    debug!(
        frontend = %frontend.socket_type(),
        backend = %backend.socket_type(),
        capture = capture.is_some(),
        steerable = control.is_some(),
        "Starting proxy"
    );

    match engine::proxy(front, back, capture, control) {
        Ok(()) => {
            debug!("Proxy terminated by control command");
            Ok(())
        }
        Err(LzmqError::ContextTerminated) => {
            debug!("Proxy stopped: context terminated");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
