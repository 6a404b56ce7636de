//! AES-128-ECB transform with PKCS#7 padding.
//!
//! DRIFT encrypts each 16-byte block independently, with no chaining or
//! nonce — electronic-codebook mode. Identical plaintext blocks under the
//! same key therefore produce identical ciphertext blocks; the protocol
//! relies on this being stable, and it is inherited from the controller
//! rather than redesigned here.
//!
//! Plaintext is PKCS#7-padded before encryption (a full padding block when
//! already block-aligned) and unpadded after decryption. A padding failure
//! after decryption is the protocol's only signal that the inbound key was
//! derived wrongly, and is reported as [`DriftError::Padding`], distinct
//! from framing errors.
//!
//! # Example
//!
//! ```
//! use drift_plc::{cipher, outbound_key, KeyFragment};
//!
//! let key = outbound_key(&KeyFragment::new([0x42; 8]));
//! let ciphertext = cipher::encrypt(&key, &[0x03, 0x07]);
//! assert_eq!(ciphertext.len(), 16);
//! assert_eq!(cipher::decrypt(&key, &ciphertext).unwrap(), vec![0x03, 0x07]);
//! ```

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use block_padding::{Pkcs7, RawPadding};

use crate::error::{DriftError, Result};
use crate::keys::SessionKey;

/// Cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Pads data to a multiple of the block size with PKCS#7.
///
/// Always appends between 1 and 16 bytes; block-aligned input gains a full
/// padding block, so the pad length is always recoverable.
///
/// # Example
///
/// ```
/// use drift_plc::cipher::pad;
///
/// assert_eq!(pad(&[0x03, 0x07]).len(), 16);
/// assert_eq!(pad(&[0u8; 16]).len(), 32);
/// ```
pub fn pad(data: &[u8]) -> Vec<u8> {
    let padded_len = (data.len() / BLOCK_SIZE + 1) * BLOCK_SIZE;
    let mut buf = data.to_vec();
    buf.resize(padded_len, 0);
    Pkcs7::raw_pad(&mut buf, data.len());
    buf
}

/// Strips PKCS#7 padding, returning the unpadded prefix.
///
/// # Errors
///
/// Returns [`DriftError::Padding`] if the trailing bytes are not well-formed
/// padding — the expected outcome when ciphertext was decrypted under the
/// wrong key or truncated.
///
/// # Example
///
/// ```
/// use drift_plc::cipher::{pad, unpad};
///
/// let padded = pad(b"drift");
/// assert_eq!(unpad(&padded).unwrap(), b"drift");
/// assert!(unpad(&[0x00; 16]).is_err());
/// ```
pub fn unpad(data: &[u8]) -> Result<&[u8]> {
    Pkcs7::raw_unpad(data).map_err(|_| DriftError::Padding)
}

/// Pads and encrypts plaintext under the given session key.
///
/// The output length is always a non-zero multiple of [`BLOCK_SIZE`].
pub fn encrypt(key: &SessionKey, plaintext: &[u8]) -> Vec<u8> {
    let cipher = Aes128::new(key.as_bytes().into());
    let mut buf = pad(plaintext);
    for block in buf.chunks_mut(BLOCK_SIZE) {
        cipher.encrypt_block(block.into());
    }
    buf
}

/// Decrypts ciphertext under the given session key and strips padding.
///
/// # Errors
///
/// - [`DriftError::MalformedFrame`] if the ciphertext is empty or not a
///   multiple of the block size — the frame itself is inconsistent and the
///   connection is desynchronized.
/// - [`DriftError::Padding`] if decryption produced malformed padding —
///   the command failed but the connection is still usable.
pub fn decrypt(key: &SessionKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.is_empty() || !ciphertext.len().is_multiple_of(BLOCK_SIZE) {
        return Err(DriftError::malformed_frame(format!(
            "ciphertext length {} is not a positive multiple of the {BLOCK_SIZE}-byte block size",
            ciphertext.len()
        )));
    }

    let cipher = Aes128::new(key.as_bytes().into());
    let mut buf = ciphertext.to_vec();
    for block in buf.chunks_mut(BLOCK_SIZE) {
        cipher.decrypt_block(block.into());
    }

    let unpadded = unpad(&buf)?;
    Ok(unpadded.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{outbound_key, KeyFragment};

    fn test_key() -> SessionKey {
        outbound_key(&KeyFragment::new(*b"ABCDEFGH"))
    }

    #[test]
    fn test_pad_lengths() {
        assert_eq!(pad(&[]).len(), 16);
        assert_eq!(pad(&[0x01]).len(), 16);
        assert_eq!(pad(&[0x01; 15]).len(), 16);
        assert_eq!(pad(&[0x01; 16]).len(), 32);
        assert_eq!(pad(&[0x01; 17]).len(), 32);
    }

    #[test]
    fn test_pad_bytes_encode_pad_length() {
        let padded = pad(&[0x03, 0x07]);
        assert_eq!(&padded[..2], &[0x03, 0x07]);
        assert!(padded[2..].iter().all(|&b| b == 14));
    }

    #[test]
    fn test_unpad_inverts_pad() {
        // Every length below four blocks round-trips.
        for len in 0..64 {
            let data: Vec<u8> = (0..len as u8).collect();
            assert_eq!(unpad(&pad(&data)).unwrap(), &data[..], "len {len}");
        }
    }

    #[test]
    fn test_unpad_rejects_garbage() {
        assert!(unpad(&[]).is_err());
        assert!(unpad(&[0x00; 16]).is_err());
        // Pad byte larger than the buffer.
        assert!(unpad(&[0xFF; 16]).is_err());
        // Inconsistent trailing bytes.
        let mut buf = pad(b"abc");
        buf[14] ^= 0x01;
        assert!(unpad(&buf).is_err());
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        for len in [0usize, 1, 2, 6, 15, 16, 17, 33] {
            let plaintext: Vec<u8> = (0..len as u8).collect();
            let ciphertext = encrypt(&key, &plaintext);
            assert!(ciphertext.len().is_multiple_of(BLOCK_SIZE));
            assert_eq!(decrypt(&key, &ciphertext).unwrap(), plaintext, "len {len}");
        }
    }

    #[test]
    fn test_command_roundtrip_with_equal_fragments() {
        // When both parties hold the same fragment the two derivations
        // coincide, so an encoded command survives the full transform.
        let fragment = KeyFragment::new([0x42; 8]);
        let encoded = crate::command::Command::WriteSensor { id: 7, value: 99 }.to_bytes();
        let ciphertext = encrypt(&outbound_key(&fragment), &encoded);
        let decrypted = decrypt(&crate::keys::inbound_key(&fragment, &fragment), &ciphertext);
        assert_eq!(decrypted.unwrap(), encoded);
    }

    #[test]
    fn test_ecb_identical_blocks_collide() {
        // No chaining: equal plaintext blocks yield equal ciphertext blocks.
        let key = test_key();
        let ciphertext = encrypt(&key, &[0x55; 32]);
        assert_eq!(ciphertext[..16], ciphertext[16..32]);
    }

    #[test]
    fn test_decrypt_wrong_key_never_recovers_plaintext() {
        // A wrong key almost always surfaces as a padding failure; in the
        // rare case the garbage forms valid padding, the plaintext is still
        // garbage.
        let ciphertext = encrypt(&test_key(), &[0x03, 0x07]);
        let wrong = outbound_key(&KeyFragment::new(*b"12345678"));
        match decrypt(&wrong, &ciphertext) {
            Err(DriftError::Padding) => {}
            Ok(plaintext) => assert_ne!(plaintext, vec![0x03, 0x07]),
            other => panic!("expected Padding or garbage, got {other:?}"),
        }
    }

    #[test]
    fn test_decrypt_unaligned_is_malformed() {
        let key = test_key();
        assert!(matches!(
            decrypt(&key, &[0x00; 15]),
            Err(DriftError::MalformedFrame { .. })
        ));
        assert!(matches!(
            decrypt(&key, &[]),
            Err(DriftError::MalformedFrame { .. })
        ));
    }
}
