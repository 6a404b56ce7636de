//! High-level client for reading and probing DRIFT sensor registers.
//!
//! This module provides the [`Client`] struct, the primary interface for
//! talking to a DRIFT controller, plus the [`ClientConfig`] builder that
//! names the controller and the [`SensorReading`] result type.
//!
//! # Overview
//!
//! The client wraps a [`Session`] and speaks the sensor command set on top
//! of it:
//!
//! - [`read_sensor`](Client::read_sensor) — fetch one register's value
//! - [`write_sensor`](Client::write_sensor) — store a value in a register
//! - [`is_writable`](Client::is_writable) — probe write permission
//! - [`scan_sensors`](Client::scan_sensors) — discovery sweep over an ID range
//! - [`find_writable`](Client::find_writable) — first writable ID in a range
//!
//! Each call produces exactly one request and one response. No automatic
//! retries, caching, or reconnection: the application keeps full control.
//!
//! # Example
//!
//! ```no_run
//! use drift_plc::{Client, ClientConfig};
//!
//! fn main() -> drift_plc::Result<()> {
//!     let config = ClientConfig::new("192.168.1.10");
//!     let mut client = Client::connect(config)?;
//!
//!     if let Some(reading) = client.read_sensor(7)? {
//!         println!("sensor 7 = {}", reading.value);
//!     }
//!
//!     let readings = client.scan_sensors(0..=31)?;
//!     println!("{} sensors present", readings.len());
//!     Ok(())
//! }
//! ```
//!
//! # Soft versus hard failures
//!
//! "No sensor at this ID" is not an error. A probe that decodes to a
//! non-success status, a short payload, or a padding failure yields
//! `Ok(None)` / `Ok(false)` and the session stays usable; only transport
//! and framing failures — after which the connection is unusable — come
//! back as `Err`.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use crate::command::Command;
use crate::error::{DriftError, Result};
use crate::keys::KeyFragment;
use crate::response::Status;
use crate::session::{ConnectionState, Session};
use crate::transport::{TcpTransport, Transport, DEFAULT_PLC_PORT, DEFAULT_TIMEOUT};

/// Configuration for creating a DRIFT client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Controller hostname or IP address.
    pub host: String,
    /// Controller TCP port.
    pub port: u16,
    /// Deadline applied to connect and to every read/write.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration for the given host with default port and
    /// timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::ClientConfig;
    ///
    /// let config = ClientConfig::new("plc.example.net");
    /// assert_eq!(config.port, 34854);
    /// ```
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PLC_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom controller port (default is 34854).
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::ClientConfig;
    ///
    /// let config = ClientConfig::new("plc.example.net").with_port(9000);
    /// assert_eq!(config.port, 9000);
    /// ```
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets a custom timeout (default is 2 seconds).
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::ClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new("plc.example.net")
    ///     .with_timeout(Duration::from_secs(5));
    /// ```
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn resolve(&self) -> Result<SocketAddr> {
        let mut addrs = (self.host.as_str(), self.port).to_socket_addrs()?;
        addrs.next().ok_or_else(|| {
            DriftError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no address found for {}:{}", self.host, self.port),
            ))
        })
    }
}

/// A sensor register's value, as read from the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    /// Sensor register ID.
    pub id: u8,
    /// Register value at read time.
    pub value: u32,
}

impl std::fmt::Display for SensorReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sensor {} = {} (0x{:08X})", self.id, self.value, self.value)
    }
}

/// DRIFT client for one controller connection.
///
/// Owns the encrypted session for its whole lifetime; dropping the client
/// or calling [`close`](Client::close) releases the connection.
pub struct Client<T: Transport = TcpTransport> {
    session: Session<T>,
}

impl Client<TcpTransport> {
    /// Connects to the controller and performs the handshake.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the host cannot be resolved or the TCP
    /// connection fails, or [`DriftError::HandshakeFailed`] if the
    /// handshake does.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use drift_plc::{Client, ClientConfig};
    ///
    /// let client = Client::connect(ClientConfig::new("192.168.1.10")).unwrap();
    /// ```
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let addr = config.resolve()?;
        let transport = TcpTransport::connect(addr, config.timeout)?;
        Ok(Self {
            session: Session::handshake(transport)?,
        })
    }
}

impl<T: Transport> Client<T> {
    /// Wraps an already-handshaken session.
    ///
    /// Useful for driving the client over a custom [`Transport`].
    pub fn from_session(session: Session<T>) -> Self {
        Self { session }
    }

    /// Reads a sensor register.
    ///
    /// Returns `Ok(None)` when there is no sensor at this ID: a non-success
    /// status, a payload too short to carry a value, or a response that
    /// failed to decrypt cleanly. Probes are independent and safe to retry;
    /// this call never retries by itself.
    ///
    /// # Errors
    ///
    /// Returns transport or framing errors, which are fatal to the
    /// connection.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use drift_plc::{Client, ClientConfig};
    /// # let mut client = Client::connect(ClientConfig::new("192.168.1.10")).unwrap();
    /// match client.read_sensor(7).unwrap() {
    ///     Some(reading) => println!("{reading}"),
    ///     None => println!("no sensor at ID 7"),
    /// }
    /// ```
    pub fn read_sensor(&mut self, id: u8) -> Result<Option<SensorReading>> {
        let response = match self.session.issue(&Command::ReadSensor { id }) {
            Ok(response) => response,
            Err(DriftError::Padding) => return Ok(None),
            Err(err) => return Err(err),
        };

        Ok(response
            .sensor_value()
            .map(|value| SensorReading { id, value }))
    }

    /// Writes a value to a sensor register and returns the classified
    /// status.
    ///
    /// The write is real: if the controller permits it, the value persists.
    ///
    /// # Errors
    ///
    /// Returns transport or framing errors, and [`DriftError::Padding`] if
    /// the response failed to decrypt — the write may or may not have been
    /// applied.
    pub fn write_sensor(&mut self, id: u8, value: u32) -> Result<Status> {
        let response = self.session.issue(&Command::WriteSensor { id, value })?;
        Ok(response.status)
    }

    /// Probes whether a sensor register accepts writes.
    ///
    /// Issues a real `WriteSensor` with value 1 — which persists on the
    /// controller if permitted. Returns `Ok(false)` on the explicit
    /// not-writable status, on any unclassified status, and on decode
    /// failure; `Ok(true)` only on success.
    ///
    /// # Errors
    ///
    /// Returns transport or framing errors, which are fatal to the
    /// connection.
    pub fn is_writable(&mut self, id: u8) -> Result<bool> {
        match self.session.issue(&Command::WriteSensor { id, value: 1 }) {
            Ok(response) => Ok(response.status.is_success()),
            Err(DriftError::Padding) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Sweeps a set of candidate IDs and collects present sensors.
    ///
    /// IDs are probed in ascending numeric order, duplicates skipped; each
    /// probe is an independent [`read_sensor`](Client::read_sensor), and a
    /// single malformed-but-decryptable response simply omits that ID.
    ///
    /// # Errors
    ///
    /// Stops at the first transport or framing error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use drift_plc::{Client, ClientConfig};
    /// # let mut client = Client::connect(ClientConfig::new("192.168.1.10")).unwrap();
    /// let readings = client.scan_sensors(0..=255).unwrap();
    /// for reading in &readings {
    ///     println!("{reading}");
    /// }
    /// ```
    pub fn scan_sensors(&mut self, ids: impl IntoIterator<Item = u8>) -> Result<Vec<SensorReading>> {
        let mut candidates: Vec<u8> = ids.into_iter().collect();
        candidates.sort_unstable();
        candidates.dedup();

        let mut readings = Vec::new();
        for id in candidates {
            if let Some(reading) = self.read_sensor(id)? {
                readings.push(reading);
            }
        }
        Ok(readings)
    }

    /// Probes candidate IDs in ascending order and returns the first
    /// writable one.
    ///
    /// Every probe before the hit performs a real write of value 1 to that
    /// ID (rejected ones excepted).
    ///
    /// # Errors
    ///
    /// Stops at the first transport or framing error.
    pub fn find_writable(&mut self, ids: impl IntoIterator<Item = u8>) -> Result<Option<u8>> {
        let mut candidates: Vec<u8> = ids.into_iter().collect();
        candidates.sort_unstable();
        candidates.dedup();

        for id in candidates {
            if self.is_writable(id)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Returns the session's key fragment, for diagnostics.
    pub fn fragment(&self) -> &KeyFragment {
        self.session.fragment()
    }

    /// Returns the underlying connection state.
    pub fn state(&self) -> ConnectionState {
        self.session.state()
    }

    /// Closes the connection. Idempotent.
    pub fn close(&mut self) {
        self.session.close();
    }
}

impl<T: Transport> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("session", &self.session)
            .finish()
    }
}
