//! Raw engine handles and errno translation.
//!
//! Everything that crosses into `zmq-sys` lives here. The rest of the crate
//! sees owned handles with `Result` returns.

use std::ffi::{c_void, CStr, CString};
use std::mem::ManuallyDrop;
use std::ptr::{self, NonNull};

use lzmq_core::error::{LzmqError, Result};
use tracing::warn;
use zmq_sys::errno::ETERM;

fn errno() -> i32 {
    // SAFETY: reads the calling thread's engine errno.
    unsafe { zmq_sys::zmq_errno() }
}

fn strerror(code: i32) -> String {
    // SAFETY: zmq_strerror returns a static NUL-terminated string for any code.
    unsafe { CStr::from_ptr(zmq_sys::zmq_strerror(code)) }
        .to_string_lossy()
        .into_owned()
}

// Engine errno values, not native OS codes.
fn is_would_block(code: i32) -> bool {
    code == zmq_sys::errno::EAGAIN
}

fn is_interrupted(code: i32) -> bool {
    code == zmq_sys::errno::EINTR
}

/// Translate an engine errno.
pub(crate) fn error_from_code(code: i32) -> LzmqError {
    if code == ETERM {
        LzmqError::ContextTerminated
    } else if is_would_block(code) {
        LzmqError::WouldBlock
    } else {
        LzmqError::engine(code, strerror(code))
    }
}

/// Error for the engine call that just failed on this thread.
pub(crate) fn last_error() -> LzmqError {
    error_from_code(errno())
}

/// Translate an error reported through the safe `zmq` API.
pub(crate) fn from_zmq(e: zmq::Error) -> LzmqError {
    match e {
        zmq::Error::EAGAIN => LzmqError::WouldBlock,
        zmq::Error::ETERM => LzmqError::ContextTerminated,
        other => LzmqError::engine(other.to_raw(), other.message()),
    }
}

fn check(rc: i32) -> Result<i32> {
    if rc == -1 {
        Err(last_error())
    } else {
        Ok(rc)
    }
}

/// Decode Z85 text, rejecting characters outside the alphabet.
pub(crate) fn z85_decode(text: &str) -> Result<Vec<u8>> {
    if text.len() % 5 != 0 {
        return Err(LzmqError::InvalidKey(format!(
            "Z85 text length {} is not a multiple of 5",
            text.len()
        )));
    }
    let c_text = CString::new(text)
        .map_err(|_| LzmqError::InvalidKey("Z85 text contains a NUL byte".to_owned()))?;
    let mut dest = vec![0u8; text.len() / 5 * 4];
    // SAFETY: `dest` has room for 4 bytes per 5 input characters and `c_text`
    // is NUL-terminated; the engine writes nothing past either.
    let decoded = unsafe { zmq_sys::zmq_z85_decode(dest.as_mut_ptr(), c_text.as_ptr()) };
    if decoded.is_null() {
        return Err(LzmqError::InvalidKey("text is not valid Z85".to_owned()));
    }
    Ok(dest)
}

/// Owned engine context. Dropping it terminates the context.
pub(crate) struct RawContext(NonNull<c_void>);

// SAFETY: libzmq contexts are thread-safe.
unsafe impl Send for RawContext {}
unsafe impl Sync for RawContext {}

impl RawContext {
    pub(crate) fn new() -> Result<Self> {
        // SAFETY: no preconditions.
        let ptr = unsafe { zmq_sys::zmq_ctx_new() };
        NonNull::new(ptr).map(Self).ok_or_else(last_error)
    }

    pub(crate) fn set(&self, code: i32, value: i32) -> Result<()> {
        // SAFETY: the pointer is a live context until `term`/drop.
        check(unsafe { zmq_sys::zmq_ctx_set(self.0.as_ptr(), code, value) }).map(|_| ())
    }

    pub(crate) fn get(&self, code: i32) -> Result<i32> {
        // SAFETY: as above.
        check(unsafe { zmq_sys::zmq_ctx_get(self.0.as_ptr(), code) })
    }

    pub(crate) fn socket(&self, type_code: i32) -> Result<RawSocket> {
        // SAFETY: as above; a non-null result is a fresh socket we now own.
        let ptr = unsafe { zmq_sys::zmq_socket(self.0.as_ptr(), type_code) };
        let ptr = NonNull::new(ptr).ok_or_else(last_error)?;
        // SAFETY: `ptr` came from zmq_socket and is owned by nobody else.
        let socket = unsafe { zmq::Socket::from_raw(ptr.as_ptr()) };
        Ok(RawSocket { ptr, socket })
    }

    /// Terminate, blocking until every socket of the context is closed.
    pub(crate) fn term(self) -> Result<()> {
        let this = ManuallyDrop::new(self);
        terminate(this.0)
    }
}

impl Drop for RawContext {
    fn drop(&mut self) {
        if let Err(e) = terminate(self.0) {
            warn!(error = %e, "Context termination on drop failed");
        }
    }
}

fn terminate(ptr: NonNull<c_void>) -> Result<()> {
    loop {
        // SAFETY: called at most once per context, by `term` or `drop`.
        if unsafe { zmq_sys::zmq_ctx_term(ptr.as_ptr()) } == 0 {
            return Ok(());
        }
        let code = errno();
        if !is_interrupted(code) {
            return Err(error_from_code(code));
        }
        warn!("Context termination interrupted, retrying");
    }
}

/// Owned engine socket.
///
/// The safe `zmq::Socket` closes the handle when dropped; `ptr` is kept for
/// the typed option and proxy calls the safe API does not cover.
pub(crate) struct RawSocket {
    ptr: NonNull<c_void>,
    socket: zmq::Socket,
}

// SAFETY: engine sockets may migrate between threads; the binding never
// shares one between threads (`Socket` is not `Sync`).
unsafe impl Send for RawSocket {}

impl RawSocket {
    pub(crate) fn zmq(&self) -> &zmq::Socket {
        &self.socket
    }

    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }

    pub(crate) fn setsockopt(&self, code: i32, value: &[u8]) -> Result<()> {
        // SAFETY: the socket is live and `value` is valid for `value.len()` bytes.
        check(unsafe {
            zmq_sys::zmq_setsockopt(
                self.as_ptr(),
                code,
                value.as_ptr().cast::<c_void>(),
                value.len(),
            )
        })
        .map(|_| ())
    }

    /// Read an option into `buf`, returning the length the engine wrote.
    pub(crate) fn getsockopt(&self, code: i32, buf: &mut [u8]) -> Result<usize> {
        let mut len = buf.len();
        // SAFETY: the socket is live and `buf` is writable for `len` bytes.
        check(unsafe {
            zmq_sys::zmq_getsockopt(self.as_ptr(), code, buf.as_mut_ptr().cast::<c_void>(), &mut len)
        })?;
        Ok(len)
    }
}

/// Run the engine's forwarding loop. Returns the engine's result code.
pub(crate) fn proxy(
    frontend: &RawSocket,
    backend: &RawSocket,
    capture: Option<&RawSocket>,
    control: Option<&RawSocket>,
) -> Result<()> {
    let capture = capture.map_or(ptr::null_mut(), RawSocket::as_ptr);
    // SAFETY: all sockets are live for the duration of the call.
    let rc = unsafe {
        match control {
            Some(control) => zmq_sys::zmq_proxy_steerable(
                frontend.as_ptr(),
                backend.as_ptr(),
                capture,
                control.as_ptr(),
            ),
            None => zmq_sys::zmq_proxy(frontend.as_ptr(), backend.as_ptr(), capture),
        }
    };
    check(rc).map(|_| ())
}
