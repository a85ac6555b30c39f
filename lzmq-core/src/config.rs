//! Context configuration
//!
//! Settings applied once when a context is created: engine tunables that must
//! be in place before the first socket exists, and the linger every new socket
//! starts with.

use std::env;

use tracing::debug;

use crate::error::{LzmqError, Result};
use crate::options::OptionKind;

/// Environment variable for [`ContextConfig::io_threads`]
pub const ENV_IO_THREADS: &str = "LZMQ_IO_THREADS";
/// Environment variable for [`ContextConfig::max_sockets`]
pub const ENV_MAX_SOCKETS: &str = "LZMQ_MAX_SOCKETS";
/// Environment variable for [`ContextConfig::thread_name_prefix`]
pub const ENV_THREAD_NAME_PREFIX: &str = "LZMQ_THREAD_NAME_PREFIX";
/// Environment variable for [`ContextConfig::blocky`]
pub const ENV_BLOCKY: &str = "LZMQ_BLOCKY";
/// Environment variable for [`ContextConfig::default_linger`]
pub const ENV_LINGER: &str = "LZMQ_LINGER";

/// Context configuration.
///
/// Every field left as `None` keeps the engine default.
///
/// # Examples
///
/// ```
/// use lzmq_core::config::ContextConfig;
///
/// let config = ContextConfig::new()
///     .with_io_threads(2)
///     .with_default_linger(0);
///
/// assert_eq!(config.context_options(), vec![("threads", 2)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextConfig {
    /// Size of the engine's I/O thread pool (`threads`)
    pub io_threads: Option<i32>,

    /// Maximum number of sockets (`sockets`)
    pub max_sockets: Option<i32>,

    /// Numeric prefix for engine thread names (`prefix`)
    pub thread_name_prefix: Option<i32>,

    /// Whether termination blocks on pending messages (`blocky`)
    ///
    /// With `false`, sockets default to zero linger.
    pub blocky: Option<bool>,

    /// Linger in milliseconds applied to every new socket
    ///
    /// - `None`: engine default
    /// - `Some(-1)`: wait indefinitely for pending messages
    /// - `Some(0)`: drop pending messages on close
    pub default_linger: Option<i32>,
}

impl ContextConfig {
    /// Create a configuration with engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the I/O thread pool size.
    pub fn with_io_threads(mut self, threads: i32) -> Self {
        self.io_threads = Some(threads);
        self
    }

    /// Set the maximum number of sockets.
    pub fn with_max_sockets(mut self, max: i32) -> Self {
        self.max_sockets = Some(max);
        self
    }

    /// Set the engine thread name prefix.
    pub fn with_thread_name_prefix(mut self, prefix: i32) -> Self {
        self.thread_name_prefix = Some(prefix);
        self
    }

    /// Set blocky termination.
    pub fn with_blocky(mut self, blocky: bool) -> Self {
        self.blocky = Some(blocky);
        self
    }

    /// Set the linger applied to new sockets.
    pub fn with_default_linger(mut self, linger_ms: i32) -> Self {
        self.default_linger = Some(linger_ms);
        self
    }

    /// Build a configuration from `LZMQ_*` environment variables.
    ///
    /// Unset variables keep the engine default; malformed values fail.
    pub fn from_env() -> Result<Self> {
        let config = Self {
            io_threads: read_int(ENV_IO_THREADS, "threads")?,
            max_sockets: read_int(ENV_MAX_SOCKETS, "sockets")?,
            thread_name_prefix: read_int(ENV_THREAD_NAME_PREFIX, "prefix")?,
            blocky: read_int(ENV_BLOCKY, "blocky")?.map(|v| v != 0),
            default_linger: read_int(ENV_LINGER, "linger")?,
        };
        debug!(?config, "Context configuration loaded from environment");
        Ok(config)
    }

    /// Context option assignments, by dispatch-table name, in application order.
    pub fn context_options(&self) -> Vec<(&'static str, i64)> {
        [
            ("threads", self.io_threads.map(i64::from)),
            ("sockets", self.max_sockets.map(i64::from)),
            ("prefix", self.thread_name_prefix.map(i64::from)),
            ("blocky", self.blocky.map(i64::from)),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}

fn read_int(var: &str, option: &'static str) -> Result<Option<i32>> {
    match env::var(var) {
        Ok(raw) => parse_int(&raw, option).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_int(raw: &str, option: &'static str) -> Result<i32> {
    raw.trim().parse::<i32>().map_err(|_| LzmqError::InvalidValue {
        option,
        expected: OptionKind::Integer,
    })
}
