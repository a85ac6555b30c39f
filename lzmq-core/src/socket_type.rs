//! Socket pattern table.
//!
//! This module provides the `SocketType` enum and the stable symbolic names
//! callers use to request a pattern. The discriminants are the libzmq
//! `ZMQ_*` socket type codes.

use std::fmt;
use std::str::FromStr;

use crate::error::LzmqError;

/// ZeroMQ socket pattern types.
///
/// Fixed at socket creation and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SocketType {
    /// PAIR socket for exclusive bidirectional communication
    Pair = 0,

    /// PUB socket for publishing messages to subscribers
    Pub = 1,

    /// SUB socket for subscribing to published messages
    Sub = 2,

    /// REQ socket for synchronous request-reply client
    Req = 3,

    /// REP socket for synchronous request-reply server
    Rep = 4,

    /// DEALER socket for asynchronous request-reply patterns
    Dealer = 5,

    /// ROUTER socket for routing messages by identity
    Router = 6,

    /// PULL socket for receiving messages from pushers
    Pull = 7,

    /// PUSH socket for sending messages to pullers
    Push = 8,

    /// XPUB socket for extended publisher with subscription awareness
    XPub = 9,

    /// XSUB socket for extended subscriber with dynamic subscriptions
    XSub = 10,

    /// STREAM socket for raw TCP peers
    Stream = 11,
}

impl SocketType {
    /// Every pattern, in engine code order.
    pub const ALL: [SocketType; 12] = [
        Self::Pair,
        Self::Pub,
        Self::Sub,
        Self::Req,
        Self::Rep,
        Self::Dealer,
        Self::Router,
        Self::Pull,
        Self::Push,
        Self::XPub,
        Self::XSub,
        Self::Stream,
    ];

    /// Stable symbolic name of the pattern.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pair => "pair",
            Self::Pub => "pub",
            Self::Sub => "sub",
            Self::Req => "req",
            Self::Rep => "rep",
            Self::Dealer => "dealer",
            Self::Router => "router",
            Self::Pull => "pull",
            Self::Push => "push",
            Self::XPub => "xpub",
            Self::XSub => "xsub",
            Self::Stream => "stream",
        }
    }

    /// Resolve a symbolic name. Names are matched exactly.
    pub fn from_name(name: &str) -> Result<Self, LzmqError> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .ok_or_else(|| LzmqError::unknown_socket_type(name))
    }

    /// Engine socket type code (`ZMQ_PAIR`, `ZMQ_PUB`, ...).
    #[must_use]
    pub const fn code(&self) -> i32 {
        *self as i32
    }

    /// Map an engine code back to a pattern.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }
}

impl FromStr for SocketType {
    type Err = LzmqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
