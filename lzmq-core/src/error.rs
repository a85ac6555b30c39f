/// lzmq Error Types
///
/// Every fallible binding operation reports one of these. Configuration
/// errors are raised before the engine is touched; engine failures carry the
/// engine's own errno and diagnostic text.

use std::fmt;
use thiserror::Error;

use crate::options::OptionKind;
use crate::socket_type::SocketType;

/// Error reported by the messaging engine itself.
///
/// Carries the raw errno so callers can match on it, plus the engine's
/// human-readable description (`zmq_strerror`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    code: i32,
    message: String,
}

impl EngineError {
    /// Create an engine error from an errno and its description.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Raw engine errno.
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.code
    }

    /// Engine diagnostic text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Main error type for lzmq operations
#[derive(Error, Debug)]
pub enum LzmqError {
    /// Option name not present in the dispatch table for its scope
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Socket pattern name not present in the pattern table
    #[error("unknown socket type: {0}")]
    UnknownSocketType(String),

    /// Option exists but is restricted to other socket patterns
    #[error("option not applicable to this socket type: {option} on {socket_type}")]
    NotApplicable {
        option: &'static str,
        socket_type: SocketType,
    },

    /// Option is write-only
    #[error("option is not readable: {0}")]
    NotReadable(&'static str),

    /// Option is read-only
    #[error("option is not writable: {0}")]
    NotWritable(&'static str),

    /// Value has the wrong kind or is out of range for the option
    #[error("invalid value for option {option}: expected {expected}")]
    InvalidValue {
        option: &'static str,
        expected: OptionKind,
    },

    /// Printable key text has the wrong length
    #[error("invalid key size: {actual} characters (expected {expected})")]
    KeySize { expected: usize, actual: usize },

    /// Key text could not be decoded to a binary key
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A message needs at least one part
    #[error("message must contain at least one part")]
    EmptyMessage,

    /// Non-blocking operation could not proceed immediately
    #[error("operation would block")]
    WouldBlock,

    /// Socket was already closed
    #[error("socket closed")]
    SocketClosed,

    /// Owning context has been terminated
    #[error("context terminated")]
    ContextTerminated,

    /// Engine-level failure with the engine's diagnostic text
    #[error("{0}")]
    Engine(EngineError),

    /// Multipart send stopped after some parts were accepted
    #[error("multipart send stopped after {sent} part(s): {source}")]
    Incomplete {
        sent: usize,
        #[source]
        source: Box<LzmqError>,
    },
}

/// Result type alias for lzmq operations
pub type Result<T> = std::result::Result<T, LzmqError>;

impl LzmqError {
    /// Create an engine error from an errno and description
    pub fn engine(code: i32, message: impl Into<String>) -> Self {
        Self::Engine(EngineError::new(code, message))
    }

    /// Create an unknown option error
    pub fn unknown_option(name: impl Into<String>) -> Self {
        Self::UnknownOption(name.into())
    }

    /// Create an unknown socket type error
    pub fn unknown_socket_type(name: impl Into<String>) -> Self {
        Self::UnknownSocketType(name.into())
    }

    /// Check if this is the retryable "would block" condition
    #[must_use]
    pub const fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }

    /// Check if this error was raised before any engine call
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownOption(_)
                | Self::UnknownSocketType(_)
                | Self::NotApplicable { .. }
                | Self::NotReadable(_)
                | Self::NotWritable(_)
                | Self::InvalidValue { .. }
                | Self::KeySize { .. }
                | Self::InvalidKey(_)
                | Self::EmptyMessage
        )
    }

    /// Check if the handle (socket or context) is no longer usable
    #[must_use]
    pub fn is_handle_error(&self) -> bool {
        match self {
            Self::SocketClosed | Self::ContextTerminated => true,
            Self::Incomplete { source, .. } => source.is_handle_error(),
            _ => false,
        }
    }

    /// Number of parts accepted before a multipart send failed
    #[must_use]
    pub const fn parts_sent(&self) -> usize {
        match self {
            Self::Incomplete { sent, .. } => *sent,
            _ => 0,
        }
    }

    /// Engine errno, if this error came from the engine
    #[must_use]
    pub fn engine_code(&self) -> Option<i32> {
        match self {
            Self::Engine(e) => Some(e.code()),
            Self::Incomplete { source, .. } => source.engine_code(),
            _ => None,
        }
    }
}
