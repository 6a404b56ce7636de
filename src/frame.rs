//! Wire frame encoding and decoding.
//!
//! Every DRIFT message after the handshake travels in the same envelope:
//!
//! | Field | Size | Description |
//! |-------|------|-------------|
//! | total length | 2 bytes, big-endian | length of the whole frame, itself included |
//! | key fragment | 8 bytes | sender's half-key for this frame |
//! | ciphertext | remaining bytes | AES-ECB encrypted command or response body |
//!
//! The invariant `total_length == 2 + 8 + ciphertext.len()` is checked on
//! both encode and decode; any mismatch means the byte stream is
//! desynchronized and is reported as [`DriftError::MalformedFrame`]. The
//! codec knows nothing about command semantics or keys beyond the fragment's
//! size.
//!
//! # Example
//!
//! ```
//! use drift_plc::{Frame, KeyFragment};
//!
//! let frame = Frame::new(KeyFragment::new([0xAB; 8]), vec![0x01; 16]);
//! let bytes = frame.to_bytes().unwrap();
//! assert_eq!(bytes.len(), 26);
//! assert_eq!(&bytes[..2], &[0x00, 26]);
//!
//! let decoded = Frame::from_bytes(&bytes).unwrap();
//! assert_eq!(decoded, frame);
//! ```

use crate::error::{DriftError, Result};
use crate::keys::{KeyFragment, FRAGMENT_SIZE};

/// Size of the big-endian length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Smallest well-formed frame: length prefix plus fragment, no ciphertext.
pub const MIN_FRAME_SIZE: usize = LENGTH_PREFIX_SIZE + FRAGMENT_SIZE;

/// Smallest acceptable response frame: header plus one half-block of
/// ciphertext. Anything shorter is rejected before decryption is attempted.
pub const MIN_RESPONSE_SIZE: usize = 18;

/// A decoded wire frame: key fragment header plus opaque ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The sender's half-key for this frame.
    pub fragment: KeyFragment,
    /// Encrypted command or response body.
    pub ciphertext: Vec<u8>,
}

impl Frame {
    /// Creates a frame from a fragment and ciphertext.
    pub fn new(fragment: KeyFragment, ciphertext: Vec<u8>) -> Self {
        Self {
            fragment,
            ciphertext,
        }
    }

    /// Returns the total on-wire length of this frame, length field included.
    pub fn total_length(&self) -> usize {
        LENGTH_PREFIX_SIZE + FRAGMENT_SIZE + self.ciphertext.len()
    }

    /// Serializes the frame to wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::MalformedFrame`] if the ciphertext is too large
    /// for the 16-bit length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let total = self.total_length();
        let declared = u16::try_from(total).map_err(|_| {
            DriftError::malformed_frame(format!("frame of {total} bytes exceeds the length field"))
        })?;

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(&declared.to_be_bytes());
        bytes.extend_from_slice(self.fragment.as_bytes());
        bytes.extend_from_slice(&self.ciphertext);
        Ok(bytes)
    }

    /// Parses a frame from wire bytes.
    ///
    /// The buffer must contain exactly one frame: the declared length must
    /// match the buffer length. A buffer with fewer bytes than declared, a
    /// declared length smaller than [`MIN_FRAME_SIZE`], or trailing bytes
    /// beyond the declared length all indicate stream desync.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::MalformedFrame`] on any of the violations above.
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::Frame;
    ///
    /// // Declared length 11, one ciphertext byte.
    /// let bytes = [0x00, 0x0B, 1, 2, 3, 4, 5, 6, 7, 8, 0xFF];
    /// let frame = Frame::from_bytes(&bytes).unwrap();
    /// assert_eq!(frame.ciphertext, vec![0xFF]);
    /// ```
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < MIN_FRAME_SIZE {
            return Err(DriftError::malformed_frame(format!(
                "frame too short: {} bytes, need at least {MIN_FRAME_SIZE}",
                buf.len()
            )));
        }

        let declared = u16::from_be_bytes([buf[0], buf[1]]) as usize;
        if declared < MIN_FRAME_SIZE {
            return Err(DriftError::malformed_frame(format!(
                "declared length {declared} smaller than the {MIN_FRAME_SIZE}-byte header"
            )));
        }
        if buf.len() < declared {
            return Err(DriftError::malformed_frame(format!(
                "declared length {declared} but only {} bytes available",
                buf.len()
            )));
        }
        if buf.len() > declared {
            return Err(DriftError::malformed_frame(format!(
                "{} trailing bytes beyond declared length {declared}",
                buf.len() - declared
            )));
        }

        let fragment = KeyFragment::from_slice(&buf[LENGTH_PREFIX_SIZE..MIN_FRAME_SIZE])?;
        Ok(Self {
            fragment,
            ciphertext: buf[MIN_FRAME_SIZE..].to_vec(),
        })
    }
}
