//! TCP transport layer for DRIFT communication.
//!
//! The transport layer is completely separated from the protocol layer — it
//! only knows about sockets and bytes. The protocol core consumes the
//! [`Transport`] trait, a duplex byte stream with exact-count reads; the
//! core never assumes message boundaries beyond the lengths it computes
//! itself.
//!
//! # Design
//!
//! - **Protocol agnostic** — byte transmission only, no DRIFT knowledge
//! - **Synchronous** — blocking send/receive with configurable deadlines
//! - **Simple** — one socket, one controller, no pooling or reconnection
//!
//! # Constants
//!
//! - [`DEFAULT_PLC_PORT`] - Default controller TCP port (34854)
//! - [`DEFAULT_TIMEOUT`] - Default read/write deadline (2 seconds)
//!
//! # Example
//!
//! The transport is typically used through the [`Client`](crate::Client)
//! struct, but can be driven directly:
//!
//! ```no_run
//! use drift_plc::{TcpTransport, Transport};
//! use std::time::Duration;
//!
//! let mut transport = TcpTransport::connect(
//!     "192.168.1.10:34854".parse().unwrap(),
//!     Duration::from_secs(2),
//! ).unwrap();
//!
//! transport.send(&[0x00, 0x03, 0x01]).unwrap();
//! let response = transport.recv_exact(12);
//! ```

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::{DriftError, Result};

/// Default DRIFT controller TCP port.
pub const DEFAULT_PLC_PORT: u16 = 34854;

/// Default deadline for socket operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// A reliable, ordered duplex byte stream.
///
/// The protocol core reads and writes through this seam exclusively, which
/// keeps the session logic testable against scripted byte sequences.
pub trait Transport {
    /// Writes all of `data` to the peer.
    fn send(&mut self, data: &[u8]) -> Result<()>;

    /// Reads exactly `len` bytes, blocking until they arrive.
    ///
    /// A short read is an error, never a partial result: a frame must be
    /// consumed whole or the stream is considered desynchronized.
    fn recv_exact(&mut self, len: usize) -> Result<Vec<u8>>;
}

/// Blocking TCP transport with read/write deadlines.
///
/// The base protocol has no timeout of its own and the controller sends no
/// keep-alives, so the deadline is the only way out of a read against a
/// stalled peer; its expiry surfaces as [`DriftError::Timeout`].
pub struct TcpTransport {
    stream: TcpStream,
    peer_addr: SocketAddr,
}

impl TcpTransport {
    /// Opens a TCP connection to the controller with the given deadline
    /// applied to the connect itself and to every subsequent read and write.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the connection cannot be established or the
    /// socket cannot be configured.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use drift_plc::TcpTransport;
    /// use std::time::Duration;
    ///
    /// let transport = TcpTransport::connect(
    ///     "192.168.1.10:34854".parse().unwrap(),
    ///     Duration::from_secs(2),
    /// ).unwrap();
    /// ```
    pub fn connect(peer_addr: SocketAddr, timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect_timeout(&peer_addr, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;

        Ok(Self { stream, peer_addr })
    }

    /// Opens a TCP connection with the default deadline.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the connection cannot be established.
    pub fn with_default_timeout(peer_addr: SocketAddr) -> Result<Self> {
        Self::connect(peer_addr, DEFAULT_TIMEOUT)
    }

    /// Replaces the read deadline for subsequent receives.
    ///
    /// `None` blocks indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket rejects the configuration.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Returns the controller's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}

impl Transport for TcpTransport {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        match self.stream.write_all(data) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(DriftError::Timeout),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(DriftError::Timeout),
            Err(e) => Err(DriftError::Io(e)),
        }
    }

    fn recv_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        match self.stream.read_exact(&mut buf) {
            Ok(()) => Ok(buf),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(DriftError::Timeout),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Err(DriftError::Timeout),
            Err(e) => Err(DriftError::Io(e)),
        }
    }
}

impl std::fmt::Debug for TcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpTransport")
            .field("peer_addr", &self.peer_addr)
            .field("local_addr", &self.stream.local_addr().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_PLC_PORT, 34854);
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(2));
    }

    #[test]
    fn test_connect_and_exchange() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut socket, _) = listener.accept().unwrap();
            let mut buf = [0u8; 3];
            socket.read_exact(&mut buf).unwrap();
            assert_eq!(buf, [0x00, 0x03, 0x01]);
            socket.write_all(&[0xAB; 12]).unwrap();
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_secs(1)).unwrap();
        assert_eq!(transport.peer_addr(), addr);

        transport.send(&[0x00, 0x03, 0x01]).unwrap();
        let response = transport.recv_exact(12).unwrap();
        assert_eq!(response, vec![0xAB; 12]);

        server.join().unwrap();
    }

    #[test]
    fn test_recv_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        // Server accepts but never writes.
        let server = std::thread::spawn(move || {
            let (_socket, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_millis(300));
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_millis(50)).unwrap();
        match transport.recv_exact(1) {
            Err(DriftError::Timeout) => {}
            other => panic!("expected Timeout, got {other:?}"),
        }

        server.join().unwrap();
    }

    #[test]
    fn test_recv_peer_close_is_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (socket, _) = listener.accept().unwrap();
            drop(socket);
        });

        let mut transport = TcpTransport::connect(addr, Duration::from_secs(1)).unwrap();
        server.join().unwrap();

        match transport.recv_exact(4) {
            Err(DriftError::Io(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected Io(UnexpectedEof), got {other:?}"),
        }
    }

    #[test]
    fn test_transport_debug() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let _ = listener.accept();
        });

        let transport = TcpTransport::connect(addr, Duration::from_secs(1)).unwrap();
        let debug_str = format!("{transport:?}");
        assert!(debug_str.contains("TcpTransport"));
        assert!(debug_str.contains("127.0.0.1"));

        server.join().unwrap();
    }
}
