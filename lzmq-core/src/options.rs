//! Option dispatch table
//!
//! Context and socket tunables are addressed by stable symbolic names. Each
//! name resolves to an [`OptionSpec`] carrying the engine's numeric code, the
//! value kind, the native buffer representation, the legal access direction
//! and, for socket options, the socket patterns it applies to.
//!
//! Both tables are `static` and indexed once on first use, so lookups never
//! allocate and the tables are safe to share across threads.
//!
//! # Examples
//!
//! ```
//! use lzmq_core::options::{lookup_socket_option, OptionValue};
//! use lzmq_core::socket_type::SocketType;
//!
//! let linger = lookup_socket_option("linger").unwrap();
//! assert!(linger.is_applicable(SocketType::Req));
//!
//! let buf = linger.encode(&OptionValue::Int(250)).unwrap();
//! assert_eq!(linger.decode(&buf).unwrap(), OptionValue::Int(250));
//! ```

use std::fmt;

use hashbrown::HashMap;
use once_cell::sync::Lazy;
use smallvec::SmallVec;

use crate::error::{LzmqError, Result};
use crate::socket_type::SocketType;

/// Native buffer for one option value. Integer options fit inline.
pub type OptionBuf = SmallVec<[u8; 8]>;

/// Width of the engine's file descriptor type (`ZMQ_FD`).
#[cfg(windows)]
const FD_WIDTH: usize = 8;
#[cfg(not(windows))]
const FD_WIDTH: usize = 4;

/// Which handle an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Context,
    Socket,
}

/// Value kind as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Boolean,
    Integer,
    String,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
        })
    }
}

/// Legal direction for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
    ReadWrite,
}

impl Access {
    pub const fn readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub const fn writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// Native representation of the option buffer passed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repr {
    /// `int` holding 0 or 1
    Bool,
    /// `int`
    Int,
    /// `int64_t`
    Int64,
    /// `uint64_t`
    UInt64,
    /// Platform socket descriptor
    Fd,
    /// Raw bytes, not terminated
    Binary { max_len: usize },
    /// NUL-terminated text returned by the engine
    Text { max_len: usize },
}

impl Repr {
    pub const fn kind(self) -> OptionKind {
        match self {
            Self::Bool => OptionKind::Boolean,
            Self::Int | Self::Int64 | Self::UInt64 | Self::Fd => OptionKind::Integer,
            Self::Binary { .. } | Self::Text { .. } => OptionKind::String,
        }
    }

    /// Buffer size to offer the engine when reading.
    pub const fn buffer_len(self) -> usize {
        match self {
            Self::Bool | Self::Int => 4,
            Self::Int64 | Self::UInt64 => 8,
            Self::Fd => FD_WIDTH,
            Self::Binary { max_len } | Self::Text { max_len } => max_len,
        }
    }
}

/// Tagged option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    /// String-valued options; may hold arbitrary bytes (routing ids).
    Bytes(Vec<u8>),
}

impl OptionValue {
    pub const fn kind(&self) -> OptionKind {
        match self {
            Self::Bool(_) => OptionKind::Boolean,
            Self::Int(_) => OptionKind::Integer,
            Self::Bytes(_) => OptionKind::String,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// String view of a string-valued option, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Bytes(v.as_bytes().to_vec())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Bytes(v.into_bytes())
    }
}

impl From<&[u8]> for OptionValue {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for OptionValue {
    fn from(v: &[u8; N]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for OptionValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

/// One entry of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    /// Stable symbolic name
    pub name: &'static str,
    /// Engine option code (`ZMQ_*`)
    pub code: i32,
    pub scope: Scope,
    pub repr: Repr,
    pub access: Access,
    /// Socket patterns the option applies to; empty means all.
    pub applies_to: &'static [SocketType],
}

impl OptionSpec {
    const fn socket(
        name: &'static str,
        code: i32,
        repr: Repr,
        access: Access,
        applies_to: &'static [SocketType],
    ) -> Self {
        Self {
            name,
            code,
            scope: Scope::Socket,
            repr,
            access,
            applies_to,
        }
    }

    const fn context(name: &'static str, code: i32) -> Self {
        Self {
            name,
            code,
            scope: Scope::Context,
            repr: Repr::Int,
            access: Access::ReadWrite,
            applies_to: &[],
        }
    }

    pub const fn kind(&self) -> OptionKind {
        self.repr.kind()
    }

    pub fn is_applicable(&self, socket_type: SocketType) -> bool {
        self.applies_to.is_empty() || self.applies_to.contains(&socket_type)
    }

    pub fn check_applicable(&self, socket_type: SocketType) -> Result<()> {
        if self.is_applicable(socket_type) {
            Ok(())
        } else {
            Err(LzmqError::NotApplicable {
                option: self.name,
                socket_type,
            })
        }
    }

    pub fn check_readable(&self) -> Result<()> {
        if self.access.readable() {
            Ok(())
        } else {
            Err(LzmqError::NotReadable(self.name))
        }
    }

    pub fn check_writable(&self) -> Result<()> {
        if self.access.writable() {
            Ok(())
        } else {
            Err(LzmqError::NotWritable(self.name))
        }
    }

    fn invalid(&self) -> LzmqError {
        LzmqError::InvalidValue {
            option: self.name,
            expected: self.kind(),
        }
    }

    /// Encode a value into the native buffer the engine expects.
    ///
    /// Fails with `InvalidValue` if the value kind does not match the option
    /// or the value does not fit the native width.
    pub fn encode(&self, value: &OptionValue) -> Result<OptionBuf> {
        let mut buf = OptionBuf::new();
        match (self.repr, value) {
            (Repr::Bool, OptionValue::Bool(b)) => {
                buf.extend_from_slice(&i32::from(*b).to_ne_bytes());
            }
            (Repr::Int, OptionValue::Int(v)) => {
                let v = i32::try_from(*v).map_err(|_| self.invalid())?;
                buf.extend_from_slice(&v.to_ne_bytes());
            }
            (Repr::Int64, OptionValue::Int(v)) => {
                buf.extend_from_slice(&v.to_ne_bytes());
            }
            (Repr::UInt64, OptionValue::Int(v)) => {
                let v = u64::try_from(*v).map_err(|_| self.invalid())?;
                buf.extend_from_slice(&v.to_ne_bytes());
            }
            (Repr::Fd, OptionValue::Int(v)) => {
                if FD_WIDTH == 8 {
                    buf.extend_from_slice(&v.to_ne_bytes());
                } else {
                    let v = i32::try_from(*v).map_err(|_| self.invalid())?;
                    buf.extend_from_slice(&v.to_ne_bytes());
                }
            }
            (Repr::Binary { max_len } | Repr::Text { max_len }, OptionValue::Bytes(b)) => {
                if b.len() > max_len {
                    return Err(self.invalid());
                }
                buf.extend_from_slice(b);
            }
            _ => return Err(self.invalid()),
        }
        Ok(buf)
    }

    /// Decode the bytes the engine wrote back into a tagged value.
    pub fn decode(&self, buf: &[u8]) -> Result<OptionValue> {
        match self.repr {
            Repr::Bool => Ok(OptionValue::Bool(self.read_i32(buf)? != 0)),
            Repr::Int => Ok(OptionValue::Int(i64::from(self.read_i32(buf)?))),
            Repr::Int64 => Ok(OptionValue::Int(i64::from_ne_bytes(self.read_8(buf)?))),
            Repr::UInt64 => {
                let v = u64::from_ne_bytes(self.read_8(buf)?);
                i64::try_from(v).map(OptionValue::Int).map_err(|_| self.invalid())
            }
            Repr::Fd => match buf.len() {
                4 => Ok(OptionValue::Int(i64::from(self.read_i32(buf)?))),
                8 => Ok(OptionValue::Int(i64::from_ne_bytes(self.read_8(buf)?))),
                _ => Err(self.invalid()),
            },
            Repr::Binary { max_len } => {
                if buf.len() > max_len {
                    return Err(self.invalid());
                }
                Ok(OptionValue::Bytes(buf.to_vec()))
            }
            Repr::Text { .. } => {
                let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
                Ok(OptionValue::Bytes(buf[..end].to_vec()))
            }
        }
    }

    fn read_i32(&self, buf: &[u8]) -> Result<i32> {
        let arr: [u8; 4] = buf.try_into().map_err(|_| self.invalid())?;
        Ok(i32::from_ne_bytes(arr))
    }

    fn read_8(&self, buf: &[u8]) -> Result<[u8; 8]> {
        buf.try_into().map_err(|_| self.invalid())
    }
}

// Engine option codes, consistent with zmq.h
pub const ZMQ_IO_THREADS: i32 = 1;
pub const ZMQ_MAX_SOCKETS: i32 = 2;
pub const ZMQ_THREAD_NAME_PREFIX: i32 = 9;
pub const ZMQ_BLOCKY: i32 = 70;

pub const ZMQ_AFFINITY: i32 = 4;
pub const ZMQ_ROUTING_ID: i32 = 5;
pub const ZMQ_SUBSCRIBE: i32 = 6;
pub const ZMQ_UNSUBSCRIBE: i32 = 7;
pub const ZMQ_RCVMORE: i32 = 13;
pub const ZMQ_FD: i32 = 14;
pub const ZMQ_EVENTS: i32 = 15;
pub const ZMQ_TYPE: i32 = 16;
pub const ZMQ_LINGER: i32 = 17;
pub const ZMQ_RECONNECT_IVL: i32 = 18;
pub const ZMQ_BACKLOG: i32 = 19;
pub const ZMQ_RECONNECT_IVL_MAX: i32 = 21;
pub const ZMQ_MAXMSGSIZE: i32 = 22;
pub const ZMQ_SNDHWM: i32 = 23;
pub const ZMQ_RCVHWM: i32 = 24;
pub const ZMQ_RCVTIMEO: i32 = 27;
pub const ZMQ_SNDTIMEO: i32 = 28;
pub const ZMQ_LAST_ENDPOINT: i32 = 32;
pub const ZMQ_ROUTER_MANDATORY: i32 = 33;
pub const ZMQ_TCP_KEEPALIVE: i32 = 34;
pub const ZMQ_IMMEDIATE: i32 = 39;
pub const ZMQ_XPUB_VERBOSE: i32 = 40;
pub const ZMQ_IPV6: i32 = 42;
pub const ZMQ_MECHANISM: i32 = 43;
pub const ZMQ_CURVE_SERVER: i32 = 47;
pub const ZMQ_CURVE_PUBLICKEY: i32 = 48;
pub const ZMQ_CURVE_SECRETKEY: i32 = 49;
pub const ZMQ_CURVE_SERVERKEY: i32 = 50;
pub const ZMQ_PROBE_ROUTER: i32 = 51;
pub const ZMQ_REQ_CORRELATE: i32 = 52;
pub const ZMQ_REQ_RELAXED: i32 = 53;
pub const ZMQ_CONFLATE: i32 = 54;
pub const ZMQ_ROUTER_HANDOVER: i32 = 56;
pub const ZMQ_CONNECT_ROUTING_ID: i32 = 61;
pub const ZMQ_HANDSHAKE_IVL: i32 = 66;
pub const ZMQ_CONNECT_TIMEOUT: i32 = 79;
pub const ZMQ_THREAD_SAFE: i32 = 81;
/// Draft API: only honoured by engines built with draft sockets enabled.
pub const ZMQ_ROUTER_NOTIFY: i32 = 97;

/// Routing ids and subscriptions are limited to 255 bytes by the engine.
const ID_MAX: usize = 255;
/// 32-byte binary key or 40-character Z85 text (41 with terminator).
const CURVE_KEY_MAX: usize = 41;
const ENDPOINT_MAX: usize = 1024;

const SUB_ONLY: &[SocketType] = &[SocketType::Sub];
const ROUTING_ID_TYPES: &[SocketType] = &[
    SocketType::Router,
    SocketType::Dealer,
    SocketType::Req,
    SocketType::Rep,
];
const CONNECT_ROUTING_ID_TYPES: &[SocketType] = &[SocketType::Router, SocketType::Stream];
const ROUTER_ONLY: &[SocketType] = &[SocketType::Router];
const PROBE_TYPES: &[SocketType] = &[SocketType::Router, SocketType::Dealer, SocketType::Req];
const CONFLATE_TYPES: &[SocketType] = &[
    SocketType::Pull,
    SocketType::Push,
    SocketType::Sub,
    SocketType::Pub,
    SocketType::Dealer,
];
const XPUB_ONLY: &[SocketType] = &[SocketType::XPub];
const REQ_ONLY: &[SocketType] = &[SocketType::Req];

/// Every context option.
pub static CONTEXT_OPTIONS: &[OptionSpec] = &[
    OptionSpec::context("threads", ZMQ_IO_THREADS),
    OptionSpec::context("sockets", ZMQ_MAX_SOCKETS),
    OptionSpec::context("prefix", ZMQ_THREAD_NAME_PREFIX),
    OptionSpec::context("blocky", ZMQ_BLOCKY),
];

/// Every socket option.
#[rustfmt::skip]
pub static SOCKET_OPTIONS: &[OptionSpec] = &[
    OptionSpec::socket("subscribe", ZMQ_SUBSCRIBE, Repr::Binary { max_len: ID_MAX }, Access::Write, SUB_ONLY),
    OptionSpec::socket("unsubscribe", ZMQ_UNSUBSCRIBE, Repr::Binary { max_len: ID_MAX }, Access::Write, SUB_ONLY),
    OptionSpec::socket("routing-id", ZMQ_ROUTING_ID, Repr::Binary { max_len: ID_MAX }, Access::ReadWrite, ROUTING_ID_TYPES),
    OptionSpec::socket("connect-routing-id", ZMQ_CONNECT_ROUTING_ID, Repr::Binary { max_len: ID_MAX }, Access::Write, CONNECT_ROUTING_ID_TYPES),
    OptionSpec::socket("notify", ZMQ_ROUTER_NOTIFY, Repr::Int, Access::ReadWrite, ROUTER_ONLY),
    OptionSpec::socket("immediate", ZMQ_IMMEDIATE, Repr::Bool, Access::ReadWrite, &[]),
    OptionSpec::socket("timeout", ZMQ_CONNECT_TIMEOUT, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("fd", ZMQ_FD, Repr::Fd, Access::Read, &[]),
    OptionSpec::socket("events", ZMQ_EVENTS, Repr::Int, Access::Read, &[]),
    OptionSpec::socket("linger", ZMQ_LINGER, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("safe", ZMQ_THREAD_SAFE, Repr::Bool, Access::Read, &[]),
    OptionSpec::socket("affinity", ZMQ_AFFINITY, Repr::UInt64, Access::ReadWrite, &[]),
    OptionSpec::socket("backlog", ZMQ_BACKLOG, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("recv-hwm", ZMQ_RCVHWM, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("recv-timeo", ZMQ_RCVTIMEO, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("send-hwm", ZMQ_SNDHWM, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("send-timeo", ZMQ_SNDTIMEO, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("endpoint", ZMQ_LAST_ENDPOINT, Repr::Text { max_len: ENDPOINT_MAX }, Access::Read, &[]),
    OptionSpec::socket("probe", ZMQ_PROBE_ROUTER, Repr::Bool, Access::Write, PROBE_TYPES),
    OptionSpec::socket("conflate", ZMQ_CONFLATE, Repr::Bool, Access::ReadWrite, CONFLATE_TYPES),
    OptionSpec::socket("mandatory", ZMQ_ROUTER_MANDATORY, Repr::Bool, Access::Write, ROUTER_ONLY),
    OptionSpec::socket("type", ZMQ_TYPE, Repr::Int, Access::Read, &[]),
    OptionSpec::socket("more", ZMQ_RCVMORE, Repr::Bool, Access::Read, &[]),
    OptionSpec::socket("mechanism", ZMQ_MECHANISM, Repr::Int, Access::Read, &[]),
    OptionSpec::socket("curve-server", ZMQ_CURVE_SERVER, Repr::Bool, Access::ReadWrite, &[]),
    OptionSpec::socket("curve-publickey", ZMQ_CURVE_PUBLICKEY, Repr::Binary { max_len: CURVE_KEY_MAX }, Access::Write, &[]),
    OptionSpec::socket("curve-secretkey", ZMQ_CURVE_SECRETKEY, Repr::Binary { max_len: CURVE_KEY_MAX }, Access::Write, &[]),
    OptionSpec::socket("curve-serverkey", ZMQ_CURVE_SERVERKEY, Repr::Binary { max_len: CURVE_KEY_MAX }, Access::Write, &[]),
    OptionSpec::socket("reconnect-ivl", ZMQ_RECONNECT_IVL, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("reconnect-ivl-max", ZMQ_RECONNECT_IVL_MAX, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("handshake-ivl", ZMQ_HANDSHAKE_IVL, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("ipv6", ZMQ_IPV6, Repr::Bool, Access::ReadWrite, &[]),
    OptionSpec::socket("maxmsgsize", ZMQ_MAXMSGSIZE, Repr::Int64, Access::ReadWrite, &[]),
    OptionSpec::socket("tcp-keepalive", ZMQ_TCP_KEEPALIVE, Repr::Int, Access::ReadWrite, &[]),
    OptionSpec::socket("xpub-verbose", ZMQ_XPUB_VERBOSE, Repr::Bool, Access::Write, XPUB_ONLY),
    OptionSpec::socket("router-handover", ZMQ_ROUTER_HANDOVER, Repr::Bool, Access::Write, ROUTER_ONLY),
    OptionSpec::socket("req-relaxed", ZMQ_REQ_RELAXED, Repr::Bool, Access::Write, REQ_ONLY),
    OptionSpec::socket("req-correlate", ZMQ_REQ_CORRELATE, Repr::Bool, Access::Write, REQ_ONLY),
];

static CONTEXT_INDEX: Lazy<HashMap<&'static str, &'static OptionSpec>> =
    Lazy::new(|| CONTEXT_OPTIONS.iter().map(|o| (o.name, o)).collect());

static SOCKET_INDEX: Lazy<HashMap<&'static str, &'static OptionSpec>> =
    Lazy::new(|| SOCKET_OPTIONS.iter().map(|o| (o.name, o)).collect());

/// Every context option, in table order.
pub fn context_options() -> &'static [OptionSpec] {
    CONTEXT_OPTIONS
}

/// Every socket option, in table order.
pub fn socket_options() -> &'static [OptionSpec] {
    SOCKET_OPTIONS
}

/// Resolve a context option name.
pub fn lookup_context_option(name: &str) -> Result<&'static OptionSpec> {
    CONTEXT_INDEX
        .get(name)
        .copied()
        .ok_or_else(|| LzmqError::unknown_option(name))
}

/// Resolve a socket option name.
pub fn lookup_socket_option(name: &str) -> Result<&'static OptionSpec> {
    SOCKET_INDEX
        .get(name)
        .copied()
        .ok_or_else(|| LzmqError::unknown_option(name))
}
