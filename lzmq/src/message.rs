//! Single and multipart message I/O.
//!
//! A logical message is an ordered, non-empty sequence of parts. Every part
//! except the last carries the "more" flag; receivers keep reading while it is
//! set. The engine delivers the parts of one message atomically, so once the
//! first part is available the rest can be read without blocking.
//!
//! # Examples
//!
//! ```no_run
//! use lzmq::{Context, Mode};
//!
//! # fn main() -> lzmq::Result<()> {
//! let ctx = Context::new()?;
//! let push = ctx.socket("push")?;
//! let pull = ctx.socket("pull")?;
//! pull.bind("inproc://parts")?;
//! push.connect("inproc://parts")?;
//!
//! push.send_multipart([&b"header"[..], &b"body"[..]], Mode::Blocking)?;
//! let parts = pull.recv_multipart(Mode::Blocking)?;
//! assert_eq!(parts.len(), 2);
//! # Ok(())
//! # }
//! ```

use std::iter::FusedIterator;

use bytes::Bytes;
use lzmq_core::error::{LzmqError, Result};
use tracing::trace;

use crate::engine::from_zmq;
use crate::socket::Socket;

/// Blocking behaviour of a send or receive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Wait until the engine accepts or delivers the part.
    #[default]
    Blocking,
    /// Fail with [`LzmqError::WouldBlock`] instead of waiting.
    NonBlocking,
}

impl Mode {
    fn flags(self) -> i32 {
        match self {
            Self::Blocking => 0,
            Self::NonBlocking => zmq::DONTWAIT,
        }
    }
}

/// One received message part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Payload, possibly empty.
    pub data: Bytes,
    /// More parts of the same message follow.
    pub more: bool,
}

impl Part {
    /// Part payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether more parts of the same message follow.
    pub fn has_more(&self) -> bool {
        self.more
    }
}

impl Socket {
    fn send_part(&self, data: &[u8], mode: Mode, more: bool) -> Result<()> {
        let mut flags = mode.flags();
        if more {
            flags |= zmq::SNDMORE;
        }
        self.handle()?.zmq().send(data, flags).map_err(from_zmq)?;
        trace!(len = data.len(), more, "Part sent");
        Ok(())
    }

    /// Send a single-part message.
    pub fn send_one(&self, data: impl AsRef<[u8]>, mode: Mode) -> Result<()> {
        self.send_part(data.as_ref(), mode, false)
    }

    /// Send every element as one part of a single message, in order.
    ///
    /// Returns the number of parts sent. Stops at the first failure: if it
    /// happens on the first part the engine error is returned as is, otherwise
    /// it is wrapped in [`LzmqError::Incomplete`] with the count of parts the
    /// engine already accepted. The non-blocking flag applies to every part.
    pub fn send_multipart<I, B>(&self, parts: I, mode: Mode) -> Result<usize>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        self.handle()?;
        let mut parts = parts.into_iter().peekable();
        if parts.peek().is_none() {
            return Err(LzmqError::EmptyMessage);
        }

        let mut sent = 0;
        while let Some(part) = parts.next() {
            let more = parts.peek().is_some();
            if let Err(e) = self.send_part(part.as_ref(), mode, more) {
                return Err(if sent == 0 {
                    e
                } else {
                    LzmqError::Incomplete {
                        sent,
                        source: Box::new(e),
                    }
                });
            }
            sent += 1;
        }
        Ok(sent)
    }

    /// Receive one part. An empty part is a valid zero-length payload.
    pub fn recv_one(&self, mode: Mode) -> Result<Part> {
        let msg = self.handle()?.zmq().recv_msg(mode.flags()).map_err(from_zmq)?;
        let part = Part {
            more: msg.get_more(),
            data: Bytes::copy_from_slice(&msg),
        };
        trace!(len = part.data.len(), more = part.more, "Part received");
        Ok(part)
    }

    /// Receive every part of the next message.
    pub fn recv_multipart(&self, mode: Mode) -> Result<Vec<Bytes>> {
        Ok(self
            .recv_multipart_parts(mode)?
            .into_iter()
            .map(|part| part.data)
            .collect())
    }

    /// Receive every part of the next message, keeping each part's more flag.
    pub fn recv_multipart_parts(&self, mode: Mode) -> Result<Vec<Part>> {
        let mut parts = Vec::new();
        loop {
            let part = self.recv_one(mode)?;
            let more = part.more;
            parts.push(part);
            if !more {
                return Ok(parts);
            }
        }
    }

    /// Read the next message lazily, one part per step.
    ///
    /// The iterator ends after the final part or after the first error. It
    /// borrows the socket exclusively, so a message cannot be interleaved with
    /// other reads until the iterator is dropped.
    pub fn iter_parts(&mut self, mode: Mode) -> Parts<'_> {
        Parts {
            socket: self,
            mode,
            done: false,
        }
    }
}

/// Lazy iterator over the parts of one message. See [`Socket::iter_parts`].
#[derive(Debug)]
pub struct Parts<'a> {
    socket: &'a mut Socket,
    mode: Mode,
    done: bool,
}

impl Iterator for Parts<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.socket.recv_one(self.mode) {
            Ok(part) => {
                self.done = !part.more;
                Some(Ok(part.data))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Parts<'_> {}
