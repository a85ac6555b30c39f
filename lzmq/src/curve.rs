//! CURVE key management (RFC 26)
//!
//! CurveZMQ gives a socket pair public-key authenticated encryption. The
//! engine runs the handshake; this module produces key material and applies
//! it to sockets:
//!
//! - **Server**: holds a long-term secret key and enables server mode
//! - **Client**: knows the server's public key and uses its own key pair,
//!   generated fresh per socket by [`configure_client`]
//!
//! ## Key Encoding
//!
//! Keys are 32 bytes. Their printable form is Z85 (RFC 32), 40 characters.
//!
//! ## References
//!
//! - RFC 26: https://rfc.zeromq.org/spec/26/
//! - RFC 32: https://rfc.zeromq.org/spec/32/

use std::fmt;

use lzmq_core::error::{LzmqError, Result};
use tracing::debug;

use crate::engine::{self, from_zmq};
use crate::socket::Socket;

/// Binary key size
pub const KEY_SIZE: usize = 32;
/// Z85 key size
pub const KEY_TEXT_SIZE: usize = 40;

/// CURVE key pair with both binary and Z85 forms. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    public: [u8; KEY_SIZE],
    secret: [u8; KEY_SIZE],
    public_text: String,
    secret_text: String,
}

impl KeyPair {
    /// Generate a fresh random key pair.
    pub fn generate() -> Result<Self> {
        let pair = zmq::CurveKeyPair::new().map_err(from_zmq)?;
        Ok(Self {
            public_text: z85_encode(&pair.public_key)?,
            secret_text: z85_encode(&pair.secret_key)?,
            public: pair.public_key,
            secret: pair.secret_key,
        })
    }

    /// Build a key pair from Z85 text.
    ///
    /// Text longer than 40 characters fails with [`LzmqError::KeySize`]
    /// before anything is decoded.
    pub fn import(public_text: &str, secret_text: &str) -> Result<Self> {
        check_max_len(public_text)?;
        check_max_len(secret_text)?;
        Ok(Self {
            public: decode_key(public_text)?,
            secret: decode_key(secret_text)?,
            public_text: public_text.to_owned(),
            secret_text: secret_text.to_owned(),
        })
    }

    /// Binary public key
    pub fn public_key(&self) -> &[u8; KEY_SIZE] {
        &self.public
    }

    /// Binary secret key
    pub fn secret_key(&self) -> &[u8; KEY_SIZE] {
        &self.secret
    }

    /// Z85 public key
    pub fn public_text(&self) -> &str {
        &self.public_text
    }

    /// Z85 secret key
    pub fn secret_text(&self) -> &str {
        &self.secret_text
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public_text)
            .field("secret", &"<redacted>")
            .finish()
    }
}

fn check_max_len(text: &str) -> Result<()> {
    let actual = text.chars().count();
    if actual > KEY_TEXT_SIZE {
        return Err(LzmqError::KeySize {
            expected: KEY_TEXT_SIZE,
            actual,
        });
    }
    Ok(())
}

fn decode_key(text: &str) -> Result<[u8; KEY_SIZE]> {
    let bytes = z85_decode(text)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| LzmqError::InvalidKey(format!("decoded to {len} bytes, expected {KEY_SIZE}")))
}

/// Encode bytes as Z85. The input length must be a multiple of 4.
pub fn z85_encode(data: &[u8]) -> Result<String> {
    zmq::z85_encode(data).map_err(|e| LzmqError::InvalidKey(e.to_string()))
}

/// Decode Z85 text. The input length must be a multiple of 5 and every
/// character must belong to the Z85 alphabet.
pub fn z85_decode(text: &str) -> Result<Vec<u8>> {
    engine::z85_decode(text)
}

/// Whether the linked engine was built with CURVE support.
pub fn has_curve() -> bool {
    zmq::has("curve").unwrap_or(false)
}

/// Configure `socket` as a CURVE client of the server owning `server_public_text`.
///
/// The server key must be 40 characters of valid Z85; it is decoded before
/// anything touches the socket. Then generates a fresh key pair for the
/// socket and applies the server key, the
/// socket's public key and its secret key, in that order. Stops at the first
/// failure and leaves the socket partially configured; discard it in that
/// case. Returns the generated pair.
pub fn configure_client(socket: &Socket, server_public_text: &str) -> Result<KeyPair> {
    let actual = server_public_text.chars().count();
    if actual != KEY_TEXT_SIZE {
        return Err(LzmqError::KeySize {
            expected: KEY_TEXT_SIZE,
            actual,
        });
    }
    let server_key = decode_key(server_public_text)?;

    let pair = KeyPair::generate()?;
    socket.set_option("curve-serverkey", &server_key)?;
    socket.set_option("curve-publickey", pair.public_key())?;
    socket.set_option("curve-secretkey", pair.secret_key())?;

    debug!(
        socket_type = %socket.socket_type(),
        public = pair.public_text(),
        "CURVE client configured"
    );
    Ok(pair)
}

/// Configure `socket` as a CURVE server with the long-term `secret_text`.
///
/// The secret must decode to exactly 32 bytes. It is applied in binary form,
/// then server mode is enabled. Same partial-failure contract as
/// [`configure_client`].
pub fn configure_server(socket: &Socket, secret_text: &str) -> Result<()> {
    check_max_len(secret_text)?;
    let secret = decode_key(secret_text)?;
    socket.set_option("curve-secretkey", &secret)?;
    socket.set_option("curve-server", true)?;

    debug!(socket_type = %socket.socket_type(), "CURVE server configured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test vector from RFC 32.
    const HELLO_BYTES: [u8; 8] = [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B];

    #[test]
    fn test_z85_reference_vector() {
        assert_eq!(z85_encode(&HELLO_BYTES).unwrap(), "HelloWorld");
        assert_eq!(z85_decode("HelloWorld").unwrap(), HELLO_BYTES);
    }

    #[test]
    fn test_import_rejects_long_text_before_decoding() {
        // 41 characters, not valid Z85 either
        let long = "~".repeat(41);
        let err = KeyPair::import(&long, &long).unwrap_err();
        assert!(matches!(err, LzmqError::KeySize { expected: 40, actual: 41 }));
    }

    #[test]
    fn test_import_rejects_short_key() {
        // Valid Z85, 8 bytes once decoded
        let err = KeyPair::import("HelloWorld", "HelloWorld").unwrap_err();
        assert!(matches!(err, LzmqError::InvalidKey(_)));
    }

    #[test]
    fn test_z85_decode_rejects_characters_outside_alphabet() {
        // '~' and '"' are printable but not part of the Z85 alphabet
        assert!(matches!(z85_decode("~~~~~"), Err(LzmqError::InvalidKey(_))));
        assert!(matches!(z85_decode("Hello\"orld"), Err(LzmqError::InvalidKey(_))));
    }

    #[test]
    fn test_z85_decode_rejects_partial_group() {
        assert!(matches!(z85_decode("Hell"), Err(LzmqError::InvalidKey(_))));
    }

    #[test]
    fn test_key_length_counts_characters() {
        // 40 characters but 80 bytes of UTF-8
        let text = "é".repeat(40);
        let err = KeyPair::import(&text, &text).unwrap_err();
        assert!(matches!(err, LzmqError::InvalidKey(_)));

        let long = "é".repeat(41);
        let err = KeyPair::import(&long, &long).unwrap_err();
        assert!(matches!(err, LzmqError::KeySize { expected: 40, actual: 41 }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let text = z85_encode(&[7u8; KEY_SIZE]).unwrap();
        let pair = KeyPair::import(&text, &text).unwrap();
        let rendered = format!("{pair:?}");
        assert_eq!(rendered.matches(text.as_str()).count(), 1);
        assert!(rendered.contains("<redacted>"));
    }
}
