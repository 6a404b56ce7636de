//! Error types for the DRIFT protocol.

use std::io;
use thiserror::Error;

use crate::session::ConnectionState;

/// Result type alias for DRIFT operations.
pub type Result<T> = std::result::Result<T, DriftError>;

/// Errors that can occur during DRIFT communication.
///
/// The variants fall into three classes with different recovery rules:
///
/// - **Transport** ([`Io`](DriftError::Io), [`Timeout`](DriftError::Timeout),
///   [`HandshakeFailed`](DriftError::HandshakeFailed)) — fatal to the
///   session; the caller must reconnect.
/// - **Framing** ([`MalformedFrame`](DriftError::MalformedFrame),
///   [`IncompleteResponse`](DriftError::IncompleteResponse)) — the byte
///   stream is desynchronized; fatal to the connection.
/// - **Decryption** ([`Padding`](DriftError::Padding)) — the derived key was
///   wrong or the ciphertext corrupted; the command failed but the stream is
///   still aligned on a frame boundary, so the session may continue.
///
/// Non-success protocol status codes are not errors — they are normal
/// outcomes carried by [`Status`](crate::Status).
#[derive(Debug, Error)]
pub enum DriftError {
    /// I/O error during communication.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Communication timeout.
    #[error("communication timeout")]
    Timeout,

    /// The new-connection handshake failed.
    #[error("handshake failed: {reason}")]
    HandshakeFailed {
        /// Description of the handshake failure.
        reason: String,
    },

    /// A frame's length or fields are inconsistent with the wire format.
    #[error("malformed frame: {reason}")]
    MalformedFrame {
        /// Description of the framing violation.
        reason: String,
    },

    /// A response frame was shorter than the protocol minimum of 18 bytes.
    #[error("incomplete response: {len} bytes, need at least 18")]
    IncompleteResponse {
        /// Total length of the response frame as received.
        len: usize,
    },

    /// Block padding of the decrypted plaintext is malformed.
    ///
    /// This is the primary signal that the inbound key was derived wrongly
    /// or that the ciphertext was corrupted in transit.
    #[error("malformed block padding after decryption")]
    Padding,

    /// An operation was issued while the session was not in the
    /// [`Ready`](ConnectionState::Ready) state.
    #[error("session not ready: state is {state}")]
    NotReady {
        /// The state the session was actually in.
        state: ConnectionState,
    },

    /// Key material was not exactly 8 bytes.
    #[error("invalid key fragment: expected 8 bytes, got {len}")]
    InvalidFragment {
        /// Length of the rejected byte slice.
        len: usize,
    },
}

impl DriftError {
    /// Creates a new `HandshakeFailed` error.
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::DriftError;
    ///
    /// let err = DriftError::handshake_failed("short read");
    /// ```
    pub fn handshake_failed(reason: impl Into<String>) -> Self {
        Self::HandshakeFailed {
            reason: reason.into(),
        }
    }

    /// Creates a new `MalformedFrame` error.
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::DriftError;
    ///
    /// let err = DriftError::malformed_frame("declared length smaller than header");
    /// ```
    pub fn malformed_frame(reason: impl Into<String>) -> Self {
        Self::MalformedFrame {
            reason: reason.into(),
        }
    }

    /// Returns whether this error is fatal to the connection.
    ///
    /// Only [`Padding`](DriftError::Padding) failures are recoverable at the
    /// call level; everything else requires tearing down the session.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DriftError::Padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_failed_display() {
        let err = DriftError::handshake_failed("short read");
        assert_eq!(err.to_string(), "handshake failed: short read");
    }

    #[test]
    fn test_malformed_frame_display() {
        let err = DriftError::malformed_frame("declared length 5 smaller than header");
        assert_eq!(
            err.to_string(),
            "malformed frame: declared length 5 smaller than header"
        );
    }

    #[test]
    fn test_incomplete_response_display() {
        let err = DriftError::IncompleteResponse { len: 12 };
        assert_eq!(
            err.to_string(),
            "incomplete response: 12 bytes, need at least 18"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = DriftError::Timeout;
        assert_eq!(err.to_string(), "communication timeout");
    }

    #[test]
    fn test_fatality() {
        assert!(!DriftError::Padding.is_fatal());
        assert!(DriftError::Timeout.is_fatal());
        assert!(DriftError::IncompleteResponse { len: 12 }.is_fatal());
        assert!(DriftError::malformed_frame("x").is_fatal());
    }
}
