//! # DRIFT PLC Protocol Library
//!
//! A Rust client for the DRIFT protocol — a length-prefixed, AES-ECB
//! encrypted request/response protocol spoken by a simulated industrial
//! controller ("PLC") that exposes numbered sensor registers.
//!
//! This is a **protocol-only** library—no business logic, polling,
//! schedulers, or application-level features. Each call produces exactly
//! 1 request and 1 response. No automatic retries, caching, or
//! reconnection.
//!
//! ## Features
//!
//! - **Protocol-only** — handshake, key derivation, framing, sensor commands
//! - **Deterministic** — each call produces exactly 1 request and 1 response
//! - **Type-safe** — commands and statuses as closed enums, state machine as
//!   an explicit [`ConnectionState`]
//! - **No panics** — all errors returned as `Result<T, DriftError>`
//!
//! ## Quick Start
//!
//! ```no_run
//! use drift_plc::{Client, ClientConfig};
//!
//! fn main() -> drift_plc::Result<()> {
//!     // Connect and handshake; the controller hands back the session's
//!     // 8-byte key fragment.
//!     let config = ClientConfig::new("192.168.1.250");
//!     let mut client = Client::connect(config)?;
//!
//!     // Read sensor register 7.
//!     if let Some(reading) = client.read_sensor(7)? {
//!         println!("sensor 7 = {}", reading.value);
//!     }
//!
//!     // Discover which registers exist.
//!     let readings = client.scan_sensors(0..=255)?;
//!     println!("{} sensors found", readings.len());
//!
//!     // Probe write permission (a real write of value 1 when permitted).
//!     if client.is_writable(16)? {
//!         println!("sensor 16 accepts writes");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## The key-exchange scheme
//!
//! No full cipher key ever crosses the wire. The handshake hands the client
//! an 8-byte [`KeyFragment`]; every response frame carries a fresh fragment
//! from the controller. The 16-byte AES key differs per direction:
//!
//! - outbound commands encrypt under the client fragment **concatenated
//!   with itself** ([`outbound_key`]);
//! - each inbound response decrypts under the client fragment followed by
//!   **that response's** header fragment ([`inbound_key`]).
//!
//! Getting the two backwards produces garbage plaintext with no error
//! recovery from the controller, which is why they are two separate
//! functions rather than one parameterized routine. A wrong key surfaces
//! as [`DriftError::Padding`] after decryption.
//!
//! ## Wire format
//!
//! | Message | Bytes |
//! |---------|-------|
//! | Handshake request | `00 03 01` |
//! | Handshake response | 12 bytes, last 8 = session fragment |
//! | Command/response frame | `total_length(2 BE) \|\| fragment(8) \|\| ciphertext` |
//!
//! Ciphertext is AES-128-ECB over a PKCS#7-padded body. Commands encode as
//! `opcode || id [|| value(4 BE)]`; response bodies carry the status at
//! byte 1 and, for successful reads, the value at bytes 4..8 big-endian.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, DriftError>`]. The library never
//! panics in public code. Errors separate into session-fatal (transport,
//! framing, handshake) and call-level (padding) classes — see
//! [`DriftError`]; non-success protocol statuses are not errors at all but
//! [`Status`] values.
//!
//! ```no_run
//! use drift_plc::{Client, ClientConfig, DriftError};
//!
//! let config = ClientConfig::new("192.168.1.250");
//! let mut client = Client::connect(config)?;
//!
//! match client.read_sensor(7) {
//!     Ok(Some(reading)) => println!("value: {}", reading.value),
//!     Ok(None) => println!("no sensor at this ID"),
//!     Err(DriftError::Timeout) => println!("controller not answering"),
//!     Err(e) => println!("connection lost: {e}"),
//! }
//! # Ok::<(), DriftError>(())
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Each operation does exactly what it says
//! 2. No magic or implicit behavior
//! 3. The application has full control over retry and reconnection
//! 4. Errors are always explicit and descriptive

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod client;
mod command;
mod error;
mod frame;
mod keys;
mod response;
mod session;
mod transport;

pub mod cipher;
pub mod utils;

// Public re-exports
pub use client::{Client, ClientConfig, SensorReading};
pub use command::{Command, HANDSHAKE_REQUEST, HANDSHAKE_RESPONSE_SIZE};
pub use error::{DriftError, Result};
pub use frame::{Frame, LENGTH_PREFIX_SIZE, MIN_FRAME_SIZE, MIN_RESPONSE_SIZE};
pub use keys::{inbound_key, outbound_key, KeyFragment, SessionKey, FRAGMENT_SIZE, SESSION_KEY_SIZE};
pub use response::{Response, Status};
pub use session::{ConnectionState, Session};
pub use transport::{TcpTransport, Transport, DEFAULT_PLC_PORT, DEFAULT_TIMEOUT};
