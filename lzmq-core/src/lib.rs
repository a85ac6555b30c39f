//! lzmq Core
//!
//! This crate contains the engine-independent building blocks of the binding:
//! - Error taxonomy and the crate-wide `Result` alias (`error`)
//! - Symbolic socket pattern table (`socket_type`)
//! - Option dispatch table with native encoding (`options`)
//! - Context configuration (`config`)
//!
//! Nothing here talks to libzmq, so every table and validation rule can be
//! tested without the native library.

#![deny(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod options;
pub mod socket_type;

pub mod prelude {
    pub use crate::config::ContextConfig;
    pub use crate::error::{EngineError, LzmqError, Result};
    pub use crate::options::{Access, OptionKind, OptionSpec, OptionValue, Scope};
    pub use crate::socket_type::SocketType;
}
