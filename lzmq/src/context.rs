//! Process-wide messaging context.
//!
//! A [`Context`] owns the engine's I/O threads and socket registry. Every
//! [`Socket`] keeps the context state alive, so the engine context always
//! outlives the sockets created from it.
//!
//! # Lifecycle
//!
//! - [`Context::global`] lazily creates the process-wide context on first use
//!   (configured from `LZMQ_*` environment variables). Failing to create it is
//!   an unrecoverable startup fault.
//! - [`Context::term`] is effective at most once. It blocks until every socket
//!   of the context is closed; afterwards every operation on the context fails
//!   with [`LzmqError::ContextTerminated`].
//! - Independent contexts can be created with [`Context::new`] or
//!   [`Context::with_config`] when isolation is needed (tests, embedding).

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use lzmq_core::config::ContextConfig;
use lzmq_core::error::{LzmqError, Result};
use lzmq_core::options::{lookup_context_option, OptionValue};
use lzmq_core::socket_type::SocketType;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::engine::RawContext;
use crate::socket::Socket;

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(1);
static GLOBAL: OnceCell<Context> = OnceCell::new();

/// State shared by every `Context` handle and every socket of the context.
pub(crate) struct ContextInner {
    id: usize,
    /// `None` once terminated.
    raw: RwLock<Option<RawContext>>,
    terminated: AtomicBool,
    config: ContextConfig,
}

impl ContextInner {
    /// Run `f` against the live engine context.
    pub(crate) fn with_raw<T>(&self, f: impl FnOnce(&RawContext) -> Result<T>) -> Result<T> {
        if self.terminated.load(Ordering::Acquire) {
            return Err(LzmqError::ContextTerminated);
        }
        match self.raw.read().as_ref() {
            Some(raw) => f(raw),
            None => Err(LzmqError::ContextTerminated),
        }
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    pub(crate) fn config(&self) -> &ContextConfig {
        &self.config
    }
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        if self.raw.get_mut().is_some() {
            debug!(ctx = self.id, "Last context handle dropped, terminating");
        }
    }
}

/// Handle to a messaging context. Cloning shares the same engine context.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create an independent context with engine defaults.
    pub fn new() -> Result<Self> {
        Self::with_config(ContextConfig::default())
    }

    /// Create an independent context and apply `config` before any socket exists.
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        let raw = RawContext::new()?;
        let id = NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed);
        let context = Self {
            inner: Arc::new(ContextInner {
                id,
                raw: RwLock::new(Some(raw)),
                terminated: AtomicBool::new(false),
                config,
            }),
        };

        for (name, value) in context.inner.config.context_options() {
            context.set_option(name, value)?;
        }

        debug!(ctx = id, config = ?context.inner.config, "Context created");
        Ok(context)
    }

    /// The process-wide context, created on first use.
    ///
    /// # Panics
    ///
    /// Panics if the engine cannot allocate the context or the `LZMQ_*`
    /// environment is malformed; all messaging depends on it.
    pub fn global() -> &'static Context {
        Self::try_global()
            .unwrap_or_else(|e| panic!("lzmq: cannot initialize the process-wide context: {e}"))
    }

    /// Fallible form of [`Context::global`].
    pub fn try_global() -> Result<&'static Context> {
        GLOBAL.get_or_try_init(|| Self::with_config(ContextConfig::from_env()?))
    }

    /// Read a context option (`threads`, `sockets`, `prefix`, `blocky`).
    pub fn get_option(&self, name: &str) -> Result<OptionValue> {
        let spec = lookup_context_option(name)?;
        spec.check_readable()?;
        let value = self.inner.with_raw(|raw| raw.get(spec.code))?;
        Ok(OptionValue::Int(i64::from(value)))
    }

    /// Write a context option. All context options are integer-valued.
    pub fn set_option(&self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let spec = lookup_context_option(name)?;
        spec.check_writable()?;
        let value = value
            .into()
            .as_int()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or(LzmqError::InvalidValue {
                option: spec.name,
                expected: spec.kind(),
            })?;
        self.inner.with_raw(|raw| raw.set(spec.code, value))?;
        debug!(ctx = self.inner.id, option = spec.name, value, "Context option set");
        Ok(())
    }

    /// Create a socket from its symbolic pattern name (`"req"`, `"pub"`, ...).
    pub fn socket(&self, type_name: &str) -> Result<Socket> {
        let socket_type = SocketType::from_name(type_name)?;
        self.socket_of(socket_type)
    }

    /// Create a socket of a known pattern.
    pub fn socket_of(&self, socket_type: SocketType) -> Result<Socket> {
        Socket::open(Arc::clone(&self.inner), socket_type)
    }

    /// Terminate the context.
    ///
    /// Blocks until every socket created from this context has been closed.
    /// Close sockets first: a socket still open on the calling thread makes
    /// this block forever. Blocking calls on other threads are woken with
    /// [`LzmqError::ContextTerminated`].
    pub fn term(&self) -> Result<()> {
        if self.inner.terminated.swap(true, Ordering::AcqRel) {
            return Err(LzmqError::ContextTerminated);
        }
        info!(ctx = self.inner.id, "Context termination started");

        let raw = self.inner.raw.write().take();
        match raw {
            Some(raw) => raw.term()?,
            None => return Err(LzmqError::ContextTerminated),
        }

        info!(ctx = self.inner.id, "Context terminated");
        Ok(())
    }

    /// Whether [`Context::term`] has been called.
    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.load(Ordering::Acquire)
    }

    /// Configuration the context was created with.
    pub fn config(&self) -> &ContextConfig {
        &self.inner.config
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("terminated", &self.is_terminated())
            .finish()
    }
}
