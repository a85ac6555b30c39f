//! Readiness polling across sockets.
//!
//! Polling is level-triggered: a socket with unconsumed input keeps being
//! reported ready. Each call reports only the first satisfied entry in
//! insertion order, so callers wanting every ready socket drain the reported
//! one and poll again.

use smallvec::SmallVec;

use lzmq_core::error::Result;
use tracing::trace;

use crate::engine::from_zmq;
use crate::socket::Socket;

/// Readiness an entry waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    /// A message can be received.
    Readable,
    /// A message can be sent.
    Writable,
    /// Either direction.
    Both,
}

impl Interest {
    fn events(self) -> zmq::PollEvents {
        match self {
            Self::Readable => zmq::POLLIN,
            Self::Writable => zmq::POLLOUT,
            Self::Both => zmq::POLLIN | zmq::POLLOUT,
        }
    }

    fn satisfied_by(self, item: &zmq::PollItem<'_>) -> bool {
        match self {
            Self::Readable => item.is_readable(),
            Self::Writable => item.is_writable(),
            Self::Both => item.is_readable() || item.is_writable(),
        }
    }
}

/// Result of one poll call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// 0-based position of the first satisfied entry.
    Ready(usize),
    /// No entry became ready within the timeout.
    Timeout,
}

impl PollOutcome {
    /// Whether an entry was ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// 0-based position of the ready entry.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Ready(index) => Some(*index),
            Self::Timeout => None,
        }
    }

    /// 1-based position of the ready entry.
    pub fn ordinal(&self) -> Option<usize> {
        self.index().map(|index| index + 1)
    }
}

/// Ordered set of sockets submitted together to one poll call.
#[derive(Debug, Default)]
pub struct PollSet<'a> {
    entries: SmallVec<[(&'a Socket, Interest); 8]>,
}

impl<'a> PollSet<'a> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries are scanned in insertion order.
    pub fn add(&mut self, socket: &'a Socket, interest: Interest) -> &mut Self {
        self.entries.push((socket, interest));
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wait for readiness.
    ///
    /// `timeout_ms` of 0 returns immediately and a negative value waits
    /// indefinitely. An empty set times out without calling the engine.
    pub fn poll(&self, timeout_ms: i64) -> Result<PollOutcome> {
        if self.entries.is_empty() {
            return Ok(PollOutcome::Timeout);
        }

        let mut items: SmallVec<[zmq::PollItem<'_>; 8]> = SmallVec::new();
        for (socket, interest) in &self.entries {
            items.push(socket.handle()?.zmq().as_poll_item(interest.events()));
        }

        let ready = zmq::poll(&mut items, timeout_ms).map_err(from_zmq)?;
        if ready == 0 {
            trace!(timeout_ms, "Poll timed out");
            return Ok(PollOutcome::Timeout);
        }

        let outcome = self
            .entries
            .iter()
            .zip(items.iter())
            .position(|((_, interest), item)| interest.satisfied_by(item))
            .map_or(PollOutcome::Timeout, PollOutcome::Ready);
        trace!(?outcome, "Poll returned");
        Ok(outcome)
    }
}

/// Poll `sockets` for input. Convenience over [`PollSet`].
///
/// A ready outcome holds the 0-based index into `sockets`;
/// [`PollOutcome::ordinal`] gives the 1-based position.
pub fn poll_in(sockets: &[&Socket], timeout_ms: i64) -> Result<PollOutcome> {
    let mut set = PollSet::new();
    for socket in sockets {
        set.add(socket, Interest::Readable);
    }
    set.poll(timeout_ms)
}
