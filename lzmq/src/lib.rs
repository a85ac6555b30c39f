//! # lzmq
//!
//! A safe binding layer over libzmq.
//!
//! ## Architecture
//!
//! - **`lzmq-core`**: Error taxonomy, socket pattern table, option dispatch
//!   table and context configuration. No engine calls.
//! - **`lzmq`**: Context and socket lifecycle, message I/O, CURVE key
//!   management, polling and proxying (this crate)
//!
//! The messaging engine is treated as a correct black box. This crate adds
//! lifecycle correctness, option-name validation, multipart framing and
//! polling composition on top of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lzmq::prelude::*;
//!
//! # fn main() -> lzmq::Result<()> {
//! let ctx = Context::new()?;
//!
//! let rep = ctx.socket("rep")?;
//! rep.bind("inproc://echo")?;
//!
//! let req = ctx.socket("req")?;
//! req.connect("inproc://echo")?;
//!
//! req.send_one("ping", Mode::Blocking)?;
//! let request = rep.recv_one(Mode::Blocking)?;
//! assert_eq!(request.data(), b"ping");
//! assert!(!request.more);
//!
//! rep.send_one("pong", Mode::Blocking)?;
//! let reply = req.recv_one(Mode::Blocking)?;
//! assert_eq!(reply.data(), b"pong");
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifecycle
//!
//! - [`Context::global`] is the process-wide context, created on first use.
//!   Independent contexts come from [`Context::new`].
//! - Sockets keep their context alive. [`Context::term`] blocks until every
//!   socket is closed, so close sockets first.
//! - [`Socket::close`] is idempotent; a closed socket fails every operation
//!   with [`LzmqError::SocketClosed`].
//!
//! ## Safety
//!
//! - `unsafe` code is isolated to `engine.rs` (raw libzmq calls)
//! - `lzmq-core` is `#![deny(unsafe_code)]`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod curve;
pub mod dev_tracing;
mod engine;
pub mod message;
pub mod poll;
pub mod proxy;
pub mod socket;

// Re-export core types
pub use bytes::Bytes;
pub use lzmq_core::config::ContextConfig;
pub use lzmq_core::error::{EngineError, LzmqError, Result};
pub use lzmq_core::options::{OptionKind, OptionValue};
pub use lzmq_core::socket_type::SocketType;

pub use context::Context;
pub use curve::KeyPair;
pub use message::{Mode, Part, Parts};
pub use poll::{poll_in, Interest, PollOutcome, PollSet};
pub use socket::Socket;

/// Convenient imports for binding users.
pub mod prelude {
    pub use crate::context::Context;
    pub use crate::curve::{configure_client, configure_server, KeyPair};
    pub use crate::message::{Mode, Part};
    pub use crate::poll::{poll_in, Interest, PollOutcome, PollSet};
    pub use crate::proxy::{proxy, proxy_steerable};
    pub use crate::socket::Socket;
    pub use crate::{Bytes, ContextConfig, LzmqError, OptionValue, Result, SocketType};
}
