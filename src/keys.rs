//! Key fragments and per-direction session key derivation.
//!
//! The DRIFT protocol never transmits a full cipher key. Each party reveals
//! only an 8-byte half-key ("fragment") per exchange, and the halves are
//! combined differently per direction:
//!
//! | Direction | Key | Operands |
//! |-----------|-----|----------|
//! | Outbound (client → PLC) | [`outbound_key`] | own fragment twice |
//! | Inbound (PLC → client) | [`inbound_key`] | own fragment, then the fragment from the response header |
//!
//! The asymmetry is deliberately modeled as two distinct functions rather
//! than one parameterized combine routine, so the two directions cannot be
//! accidentally collapsed into each other.
//!
//! # Example
//!
//! ```
//! use drift_plc::{inbound_key, outbound_key, KeyFragment};
//!
//! let own = KeyFragment::new([0x11; 8]);
//! let peer = KeyFragment::new([0x22; 8]);
//!
//! assert_eq!(outbound_key(&own).as_bytes(), &[0x11; 16]);
//! assert_ne!(outbound_key(&own).as_bytes(), inbound_key(&own, &peer).as_bytes());
//! ```

use crate::error::{DriftError, Result};

/// Size of a key fragment in bytes.
pub const FRAGMENT_SIZE: usize = 8;

/// Size of a derived session key in bytes.
pub const SESSION_KEY_SIZE: usize = 16;

/// An 8-byte half-key.
///
/// The client receives its fragment once, from the new-connection response,
/// and reuses it unchanged for every outbound frame of the session. Each
/// response frame carries a fresh fragment from the PLC, used exactly once
/// to decrypt the ciphertext it arrived with.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyFragment([u8; FRAGMENT_SIZE]);

impl KeyFragment {
    /// Creates a fragment from an 8-byte array.
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::KeyFragment;
    ///
    /// let fragment = KeyFragment::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11]);
    /// assert_eq!(fragment.as_bytes()[0], 0xAA);
    /// ```
    pub fn new(bytes: [u8; FRAGMENT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates a fragment from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::InvalidFragment`] if the slice is not exactly
    /// 8 bytes long.
    ///
    /// # Example
    ///
    /// ```
    /// use drift_plc::KeyFragment;
    ///
    /// let fragment = KeyFragment::from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    /// assert!(KeyFragment::from_slice(&[1, 2, 3]).is_err());
    /// ```
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; FRAGMENT_SIZE] = bytes
            .try_into()
            .map_err(|_| DriftError::InvalidFragment { len: bytes.len() })?;
        Ok(Self(array))
    }

    /// Returns the raw fragment bytes.
    pub fn as_bytes(&self) -> &[u8; FRAGMENT_SIZE] {
        &self.0
    }
}

impl std::fmt::Display for KeyFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for KeyFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyFragment({self})")
    }
}

/// A 16-byte cipher key derived from two fragments.
///
/// A session key is a one-shot value: it encrypts or decrypts exactly one
/// frame and is never persisted beyond the operation that produced it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SessionKey([u8; SESSION_KEY_SIZE]);

impl SessionKey {
    /// Returns the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of logs.
        write!(f, "SessionKey(..)")
    }
}

/// Derives the key that encrypts an outbound command.
///
/// The client's own fragment is concatenated with itself. Every command of
/// the session is encrypted under this same key.
///
/// # Example
///
/// ```
/// use drift_plc::{outbound_key, KeyFragment};
///
/// let own = KeyFragment::new(*b"ABCDEFGH");
/// assert_eq!(outbound_key(&own).as_bytes(), b"ABCDEFGHABCDEFGH");
/// ```
pub fn outbound_key(own: &KeyFragment) -> SessionKey {
    let mut key = [0u8; SESSION_KEY_SIZE];
    key[..FRAGMENT_SIZE].copy_from_slice(own.as_bytes());
    key[FRAGMENT_SIZE..].copy_from_slice(own.as_bytes());
    SessionKey(key)
}

/// Derives the key that decrypts one inbound response.
///
/// The client's own fragment comes first, followed by the fragment carried
/// in that response's header. The peer fragment is valid only for the frame
/// it arrived with.
///
/// # Example
///
/// ```
/// use drift_plc::{inbound_key, KeyFragment};
///
/// let own = KeyFragment::new(*b"ABCDEFGH");
/// let peer = KeyFragment::new(*b"12345678");
/// assert_eq!(inbound_key(&own, &peer).as_bytes(), b"ABCDEFGH12345678");
/// ```
pub fn inbound_key(own: &KeyFragment, peer: &KeyFragment) -> SessionKey {
    let mut key = [0u8; SESSION_KEY_SIZE];
    key[..FRAGMENT_SIZE].copy_from_slice(own.as_bytes());
    key[FRAGMENT_SIZE..].copy_from_slice(peer.as_bytes());
    SessionKey(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_key_self_concatenated() {
        let own = KeyFragment::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11]);
        let key = outbound_key(&own);
        assert_eq!(&key.as_bytes()[..8], own.as_bytes());
        assert_eq!(&key.as_bytes()[8..], own.as_bytes());
    }

    #[test]
    fn test_inbound_key_own_then_peer() {
        let own = KeyFragment::new(*b"ABCDEFGH");
        let peer = KeyFragment::new(*b"12345678");
        let key = inbound_key(&own, &peer);
        assert_eq!(key.as_bytes(), b"ABCDEFGH12345678");
    }

    #[test]
    fn test_directions_differ_for_distinct_fragments() {
        let own = KeyFragment::new([0x01; 8]);
        let peer = KeyFragment::new([0x02; 8]);
        assert_ne!(
            outbound_key(&own).as_bytes(),
            inbound_key(&own, &peer).as_bytes()
        );
    }

    #[test]
    fn test_directions_coincide_for_equal_fragments() {
        let own = KeyFragment::new([0x5A; 8]);
        assert_eq!(
            outbound_key(&own).as_bytes(),
            inbound_key(&own, &own).as_bytes()
        );
    }

    #[test]
    fn test_from_slice() {
        let fragment = KeyFragment::from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(fragment.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        match KeyFragment::from_slice(&[1, 2, 3]) {
            Err(DriftError::InvalidFragment { len }) => assert_eq!(len, 3),
            other => panic!("expected InvalidFragment, got {other:?}"),
        }
        assert!(KeyFragment::from_slice(&[0; 9]).is_err());
    }

    #[test]
    fn test_fragment_display_is_hex() {
        let fragment = KeyFragment::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11]);
        assert_eq!(fragment.to_string(), "aabbccddeeff0011");
    }

    #[test]
    fn test_session_key_debug_hides_material() {
        let key = outbound_key(&KeyFragment::new([0x42; 8]));
        assert_eq!(format!("{key:?}"), "SessionKey(..)");
    }
}
