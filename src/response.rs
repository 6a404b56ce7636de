//! DRIFT response parsing and status interpretation.
//!
//! A response is the decrypted plaintext body of an inbound frame:
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0 | opcode | echoes the command kind |
//! | 1 | status | `0x00` success, `0x04` not writable, others unclassified |
//! | 2.. | payload | command-specific; successful reads carry the sensor value at body bytes 4..8, big-endian |
//!
//! A non-success status is a normal protocol outcome, not an error — it is
//! surfaced as a [`Status`] value and interpreted per command by the caller.
//!
//! # Example
//!
//! ```
//! use drift_plc::{Response, Status};
//!
//! let body = [0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x50, 0x20];
//! let response = Response::from_bytes(&body).unwrap();
//! assert_eq!(response.status, Status::Success);
//! assert_eq!(response.sensor_value(), Some(0x5020));
//! ```

use crate::error::{DriftError, Result};

/// Status byte for a successful operation.
pub(crate) const STATUS_SUCCESS: u8 = 0x00;
/// Status byte for a write to a read-only register.
pub(crate) const STATUS_NOT_WRITABLE: u8 = 0x04;

/// Minimum decrypted body: opcode plus status.
pub(crate) const MIN_BODY_SIZE: usize = 2;

/// Offset of the sensor value within a successful read response body.
const VALUE_OFFSET: usize = 4;

/// Classified response status code.
///
/// The controller documents only success and not-writable; everything else
/// is carried verbatim as [`Other`](Status::Other) without guessing further
/// semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Operation succeeded (`0x00`).
    Success,
    /// Write rejected: the register is read-only (`0x04`).
    NotWritable,
    /// Unclassified failure status.
    Other(u8),
}

impl Status {
    /// Classifies a raw status byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            STATUS_SUCCESS => Status::Success,
            STATUS_NOT_WRITABLE => Status::NotWritable,
            other => Status::Other(other),
        }
    }

    /// Returns the raw status byte.
    pub fn as_byte(&self) -> u8 {
        match self {
            Status::Success => STATUS_SUCCESS,
            Status::NotWritable => STATUS_NOT_WRITABLE,
            Status::Other(byte) => *byte,
        }
    }

    /// Returns whether this is the success status.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Success => write!(f, "success"),
            Status::NotWritable => write!(f, "not writable"),
            Status::Other(byte) => write!(f, "status 0x{byte:02X}"),
        }
    }
}

/// A decrypted logical reply from the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response opcode (byte 0 of the decrypted body).
    pub opcode: u8,
    /// Classified status (byte 1).
    pub status: Status,
    body: Vec<u8>,
}

impl Response {
    /// Parses a response from a decrypted frame body.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::MalformedFrame`] if the body is shorter than
    /// the two mandatory bytes.
    pub fn from_bytes(body: &[u8]) -> Result<Self> {
        if body.len() < MIN_BODY_SIZE {
            return Err(DriftError::malformed_frame(format!(
                "decrypted body too short: {} bytes, need at least {MIN_BODY_SIZE}",
                body.len()
            )));
        }

        Ok(Self {
            opcode: body[0],
            status: Status::from_byte(body[1]),
            body: body.to_vec(),
        })
    }

    /// Returns the full decrypted body, opcode and status included.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the payload bytes following opcode and status.
    pub fn payload(&self) -> &[u8] {
        &self.body[MIN_BODY_SIZE..]
    }

    /// Extracts the sensor value from a successful read response.
    ///
    /// The value sits at body bytes 4..8, big-endian. Returns `None` when
    /// the status is not success or the body is too short to hold a value —
    /// the caller treats both as "no sensor at this ID".
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::Response;
    ///
    /// let ok = Response::from_bytes(&[0x03, 0x00, 0, 0, 0x00, 0x00, 0x50, 0x20]).unwrap();
    /// assert_eq!(ok.sensor_value(), Some(20512));
    ///
    /// let failed = Response::from_bytes(&[0x03, 0x01, 0, 0, 0x00, 0x00, 0x50, 0x20]).unwrap();
    /// assert_eq!(failed.sensor_value(), None);
    /// ```
    pub fn sensor_value(&self) -> Option<u32> {
        if !self.status.is_success() {
            return None;
        }
        let bytes = self.body.get(VALUE_OFFSET..VALUE_OFFSET + 4)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(Status::from_byte(0x00), Status::Success);
        assert_eq!(Status::from_byte(0x04), Status::NotWritable);
        assert_eq!(Status::from_byte(0x01), Status::Other(0x01));
        assert_eq!(Status::from_byte(0xFF), Status::Other(0xFF));
    }

    #[test]
    fn test_status_roundtrip() {
        for byte in [0x00, 0x01, 0x04, 0x7F, 0xFF] {
            assert_eq!(Status::from_byte(byte).as_byte(), byte);
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::Success.to_string(), "success");
        assert_eq!(Status::NotWritable.to_string(), "not writable");
        assert_eq!(Status::Other(0x1A).to_string(), "status 0x1A");
    }

    #[test]
    fn test_from_bytes() {
        let response = Response::from_bytes(&[0x03, 0x00, 0xAA, 0xBB]).unwrap();
        assert_eq!(response.opcode, 0x03);
        assert_eq!(response.status, Status::Success);
        assert_eq!(response.payload(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_from_bytes_too_short() {
        assert!(Response::from_bytes(&[]).is_err());
        assert!(Response::from_bytes(&[0x03]).is_err());
    }

    #[test]
    fn test_sensor_value_success() {
        let body = [0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x50, 0x20];
        let response = Response::from_bytes(&body).unwrap();
        assert_eq!(response.sensor_value(), Some(20512));
    }

    #[test]
    fn test_sensor_value_non_success_status() {
        let body = [0x03, 0x01, 0x00, 0x00, 0x00, 0x00, 0x50, 0x20];
        let response = Response::from_bytes(&body).unwrap();
        assert_eq!(response.sensor_value(), None);
    }

    #[test]
    fn test_sensor_value_short_body() {
        // Success status but not enough bytes to hold a value.
        let response = Response::from_bytes(&[0x03, 0x00, 0x00, 0x00, 0x12]).unwrap();
        assert_eq!(response.sensor_value(), None);
    }

    #[test]
    fn test_sensor_value_is_big_endian() {
        let body = [0x03, 0x00, 0x00, 0x00, 0x12, 0x34, 0x56, 0x78];
        let response = Response::from_bytes(&body).unwrap();
        assert_eq!(response.sensor_value(), Some(0x12345678));
    }
}
