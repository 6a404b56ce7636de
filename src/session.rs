//! Connection state machine and command/response orchestration.
//!
//! A [`Session`] owns one transport and the key fragment obtained from the
//! new-connection handshake, and walks the explicit state machine
//!
//! ```text
//! Disconnected -> Handshaking -> Ready -> Closed
//! ```
//!
//! Commands are accepted only in `Ready`, which turns "issued a command
//! before the handshake" into an early runtime check instead of a decode
//! failure deep in the stack. The session is strictly sequential: one
//! command in flight, one response read to completion, no sharing between
//! callers.
//!
//! # Fragment lifetime
//!
//! The handshake fragment is fixed for the whole connection. Every outbound
//! frame carries and encrypts under it; a response's header fragment is used
//! once, to decrypt that single response, and is then discarded — it never
//! replaces the session's own fragment.
//!
//! # Failure handling
//!
//! Transport, framing and length errors leave the byte stream in an unknown
//! position, so the session tears itself down (`Closed`) rather than risk
//! reinterpreting a partial frame as a new one. A padding failure after
//! decryption only invalidates the one command; the stream is still aligned
//! on a frame boundary and the session stays `Ready`.

use crate::cipher;
use crate::command::{Command, HANDSHAKE_REQUEST, HANDSHAKE_RESPONSE_SIZE};
use crate::error::{DriftError, Result};
use crate::frame::{Frame, LENGTH_PREFIX_SIZE, MIN_FRAME_SIZE, MIN_RESPONSE_SIZE};
use crate::keys::{inbound_key, outbound_key, KeyFragment, FRAGMENT_SIZE};
use crate::response::Response;
use crate::transport::Transport;

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection established.
    Disconnected,
    /// Handshake request sent, response pending.
    Handshaking,
    /// Handshake complete; commands may be issued.
    Ready,
    /// Connection released; no further operations permitted.
    Closed,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Handshaking => write!(f, "handshaking"),
            ConnectionState::Ready => write!(f, "ready"),
            ConnectionState::Closed => write!(f, "closed"),
        }
    }
}

/// One encrypted protocol session over one transport.
///
/// Created by [`Session::handshake`]; destroyed by [`Session::close`] or by
/// a fatal protocol error.
///
/// # Example
///
/// ```no_run
/// use drift_plc::{Command, Session, TcpTransport};
///
/// let transport = TcpTransport::with_default_timeout(
///     "192.168.1.10:34854".parse().unwrap(),
/// )?;
/// let mut session = Session::handshake(transport)?;
///
/// let response = session.issue(&Command::ReadSensor { id: 7 })?;
/// println!("status: {}", response.status);
/// # Ok::<(), drift_plc::DriftError>(())
/// ```
pub struct Session<T: Transport> {
    transport: Option<T>,
    fragment: KeyFragment,
    state: ConnectionState,
}

impl<T: Transport> Session<T> {
    /// Performs the new-connection handshake on a fresh transport.
    ///
    /// Sends the fixed request `00 03 01`, reads the 12-byte response and
    /// keeps its last 8 bytes as the session's key fragment.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::HandshakeFailed`] on any I/O failure or short
    /// read. Handshake failures are fatal and never retried by the core; a
    /// retry policy, if any, belongs to the driver. On failure no session
    /// exists and the caller is back where it started: disconnected.
    pub fn handshake(mut transport: T) -> Result<Self> {
        transport
            .send(&HANDSHAKE_REQUEST)
            .map_err(|e| DriftError::handshake_failed(format!("sending request: {e}")))?;

        let response = transport
            .recv_exact(HANDSHAKE_RESPONSE_SIZE)
            .map_err(|e| DriftError::handshake_failed(format!("reading response: {e}")))?;

        let fragment = KeyFragment::from_slice(&response[HANDSHAKE_RESPONSE_SIZE - FRAGMENT_SIZE..])
            .map_err(|e| DriftError::handshake_failed(e.to_string()))?;

        Ok(Self {
            transport: Some(transport),
            fragment,
            state: ConnectionState::Ready,
        })
    }

    /// Returns the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the session's key fragment.
    pub fn fragment(&self) -> &KeyFragment {
        &self.fragment
    }

    /// Issues one command and reads its response, the only steady-state
    /// transition (`Ready -> Ready`).
    ///
    /// The command body is padded and encrypted under the outbound key (the
    /// session fragment self-concatenated), framed with the session fragment
    /// in the header, and written to the transport. The response frame's
    /// header fragment then combines with the session fragment into the
    /// inbound key for that one response.
    ///
    /// # Errors
    ///
    /// - [`DriftError::NotReady`] if the session is not `Ready`.
    /// - [`DriftError::IncompleteResponse`] if the response frame is shorter
    ///   than 18 bytes; decryption is never attempted.
    /// - [`DriftError::MalformedFrame`] on any framing inconsistency.
    /// - [`DriftError::Padding`] if the response fails to decrypt cleanly;
    ///   the session remains usable.
    /// - [`DriftError::Io`] / [`DriftError::Timeout`] on transport failure.
    ///
    /// Every error except `Padding` closes the session: a partially
    /// consumed frame must never be reinterpreted as the start of a new one.
    pub fn issue(&mut self, command: &Command) -> Result<Response> {
        if self.state != ConnectionState::Ready {
            return Err(DriftError::NotReady { state: self.state });
        }

        match self.exchange(command) {
            Ok(response) => Ok(response),
            Err(err) => {
                if err.is_fatal() {
                    self.close();
                }
                Err(err)
            }
        }
    }

    fn exchange(&mut self, command: &Command) -> Result<Response> {
        let transport = self
            .transport
            .as_mut()
            .ok_or(DriftError::NotReady {
                state: ConnectionState::Closed,
            })?;

        let ciphertext = cipher::encrypt(&outbound_key(&self.fragment), &command.to_bytes());
        let request = Frame::new(self.fragment, ciphertext).to_bytes()?;
        transport.send(&request)?;

        let prefix = transport.recv_exact(LENGTH_PREFIX_SIZE)?;
        let declared = u16::from_be_bytes([prefix[0], prefix[1]]) as usize;
        if declared < MIN_FRAME_SIZE {
            return Err(DriftError::malformed_frame(format!(
                "declared length {declared} smaller than the {MIN_FRAME_SIZE}-byte header"
            )));
        }

        let rest = transport.recv_exact(declared - LENGTH_PREFIX_SIZE)?;
        if declared < MIN_RESPONSE_SIZE {
            return Err(DriftError::IncompleteResponse { len: declared });
        }

        let mut raw = prefix;
        raw.extend_from_slice(&rest);
        let frame = Frame::from_bytes(&raw)?;

        let key = inbound_key(&self.fragment, &frame.fragment);
        let plaintext = cipher::decrypt(&key, &frame.ciphertext)?;

        Response::from_bytes(&plaintext)
    }

    /// Releases the transport and closes the session.
    ///
    /// Closing an already-closed session is a no-op. All subsequent
    /// [`issue`](Session::issue) calls fail with [`DriftError::NotReady`].
    pub fn close(&mut self) {
        self.transport = None;
        self.state = ConnectionState::Closed;
    }
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("fragment", &self.fragment)
            .field("state", &self.state)
            .finish()
    }
}
