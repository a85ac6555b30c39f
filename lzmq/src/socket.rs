//! Socket lifecycle and option dispatch.
//!
//! A [`Socket`] is created from a [`Context`](crate::Context) with a fixed
//! pattern and stays bound to that context until it is closed. Closing is
//! idempotent; a closed socket answers every operation with
//! [`LzmqError::SocketClosed`] without reaching the engine.
//!
//! Options are addressed by name through the dispatch table in
//! [`lzmq_core::options`]. Validation runs before any engine call, so a
//! rejected assignment leaves the socket unchanged.

use std::fmt;
use std::sync::Arc;

use lzmq_core::error::{LzmqError, Result};
use lzmq_core::options::{lookup_socket_option, OptionBuf, OptionKind, OptionValue};
use lzmq_core::socket_type::SocketType;
use tracing::{debug, trace};

use crate::context::ContextInner;
use crate::engine::{from_zmq, RawSocket};

/// Messaging socket of a fixed pattern.
///
/// A socket may be moved to another thread but never shared between threads.
pub struct Socket {
    // Dropped before `context`, so the engine context outlives the handle.
    handle: Option<RawSocket>,
    socket_type: SocketType,
    context: Arc<ContextInner>,
}

impl Socket {
    pub(crate) fn open(context: Arc<ContextInner>, socket_type: SocketType) -> Result<Self> {
        let handle = context.with_raw(|raw| raw.socket(socket_type.code()))?;
        let socket = Self {
            handle: Some(handle),
            socket_type,
            context,
        };

        if let Some(linger) = socket.context.config().default_linger {
            socket.set_option("linger", linger)?;
        }

        debug!(
            ctx = socket.context.id(),
            socket_type = %socket_type,
            "Socket created"
        );
        Ok(socket)
    }

    /// Pattern the socket was created with.
    pub fn socket_type(&self) -> SocketType {
        self.socket_type
    }

    /// Whether [`Socket::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.handle.is_none()
    }

    pub(crate) fn handle(&self) -> Result<&RawSocket> {
        self.handle.as_ref().ok_or(LzmqError::SocketClosed)
    }

    /// Accept connections on `endpoint` (`tcp://`, `ipc://`, `inproc://`, ...).
    pub fn bind(&self, endpoint: &str) -> Result<()> {
        self.handle()?.zmq().bind(endpoint).map_err(from_zmq)?;
        debug!(socket_type = %self.socket_type, endpoint, "Bound");
        Ok(())
    }

    /// Connect to `endpoint`. The engine reconnects in the background.
    pub fn connect(&self, endpoint: &str) -> Result<()> {
        self.handle()?.zmq().connect(endpoint).map_err(from_zmq)?;
        debug!(socket_type = %self.socket_type, endpoint, "Connected");
        Ok(())
    }

    /// Stop accepting connections on a previously bound `endpoint`.
    pub fn unbind(&self, endpoint: &str) -> Result<()> {
        self.handle()?.zmq().unbind(endpoint).map_err(from_zmq)?;
        debug!(socket_type = %self.socket_type, endpoint, "Unbound");
        Ok(())
    }

    /// Drop a connection made with [`Socket::connect`].
    pub fn disconnect(&self, endpoint: &str) -> Result<()> {
        self.handle()?.zmq().disconnect(endpoint).map_err(from_zmq)?;
        debug!(socket_type = %self.socket_type, endpoint, "Disconnected");
        Ok(())
    }

    /// Read a socket option by name.
    pub fn get_option(&self, name: &str) -> Result<OptionValue> {
        let handle = self.handle()?;
        let spec = lookup_socket_option(name)?;
        spec.check_readable()?;
        spec.check_applicable(self.socket_type)?;

        let mut buf = OptionBuf::from_elem(0, spec.repr.buffer_len());
        let len = handle.getsockopt(spec.code, &mut buf)?;
        let value = spec.decode(&buf[..len])?;
        trace!(option = spec.name, ?value, "Socket option read");
        Ok(value)
    }

    /// Write a socket option by name.
    ///
    /// On any validation failure the engine is not called.
    pub fn set_option(&self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let handle = self.handle()?;
        let spec = lookup_socket_option(name)?;
        spec.check_writable()?;
        spec.check_applicable(self.socket_type)?;

        let value = value.into();
        let buf = spec.encode(&value)?;
        handle.setsockopt(spec.code, &buf)?;
        trace!(option = spec.name, ?value, "Socket option set");
        Ok(())
    }

    /// Endpoint resolved by the last bind or connect, e.g. the port chosen for
    /// `tcp://127.0.0.1:*`.
    pub fn last_endpoint(&self) -> Result<String> {
        let value = self.get_option("endpoint")?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or(LzmqError::InvalidValue {
                option: "endpoint",
                expected: OptionKind::String,
            })
    }

    /// Close the socket. Calling it again does nothing.
    ///
    /// Pending outbound messages are kept for the socket's linger period.
    pub fn close(&mut self) {
        if self.handle.take().is_some() {
            debug!(
                ctx = self.context.id(),
                socket_type = %self.socket_type,
                "Socket closed"
            );
        }
    }

    /// Set the linger period, then close.
    pub fn close_with_linger(&mut self, linger_ms: i32) -> Result<()> {
        self.set_option("linger", linger_ms)?;
        self.close();
        Ok(())
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Socket")
            .field("socket_type", &self.socket_type)
            .field("closed", &self.is_closed())
            .field("ctx", &self.context.id())
            .finish()
    }
}
