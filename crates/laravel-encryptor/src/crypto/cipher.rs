//! AES-CBC encryption and decryption with PKCS#7 padding.
//!
//! Ciphertext length is always the plaintext length rounded up to the next
//! 16-byte block (a full padding block is added for aligned input). CBC gives
//! no integrity on its own; callers authenticate the result with
//! [`crate::crypto::mac`].

use aes::{Aes128, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

use super::Algorithm;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

/// IV length required by AES-CBC.
pub const IV_LEN: usize = BLOCK_LEN;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The secret does not match the key size of the selected algorithm.
    #[error("invalid key length for {algorithm}: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    /// The IV is not exactly [`IV_LEN`] bytes.
    #[error("invalid IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),

    /// Ciphertext is not block-aligned or its padding is corrupt.
    #[error("bad decrypt")]
    BadDecrypt,
}

/// Encrypt `plaintext` under `key` and `iv`.
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`] or [`CipherError::InvalidIvLength`]
/// if the key or IV does not fit `algorithm`.
pub fn encrypt(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    check_lengths(algorithm, key, iv)?;
    let ciphertext = match algorithm {
        Algorithm::Aes128Cbc => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| key_error(algorithm, key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        Algorithm::Aes256Cbc => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| key_error(algorithm, key))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext),
    };
    Ok(ciphertext)
}

/// Decrypt `ciphertext` under `key` and `iv` and strip the padding.
///
/// # Errors
///
/// Returns [`CipherError::BadDecrypt`] if the ciphertext is not a whole number
/// of blocks or the padding does not check out (typical for a wrong key).
pub fn decrypt(
    algorithm: Algorithm,
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    check_lengths(algorithm, key, iv)?;
    let plaintext = match algorithm {
        Algorithm::Aes128Cbc => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|_| key_error(algorithm, key))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
        Algorithm::Aes256Cbc => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|_| key_error(algorithm, key))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext),
    };
    plaintext.map_err(|_| CipherError::BadDecrypt)
}

fn check_lengths(algorithm: Algorithm, key: &[u8], iv: &[u8]) -> Result<(), CipherError> {
    if key.len() != algorithm.key_len() {
        return Err(key_error(algorithm, key));
    }
    if iv.len() != IV_LEN {
        return Err(CipherError::InvalidIvLength(iv.len()));
    }
    Ok(())
}

fn key_error(algorithm: Algorithm, key: &[u8]) -> CipherError {
    CipherError::InvalidKeyLength {
        algorithm,
        expected: algorithm.key_len(),
        actual: key.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_256: [u8; 32] = [0x42; 32];
    const KEY_128: [u8; 16] = [0x24; 16];
    const IV: &[u8; 16] = b"0001020304050607";

    #[test]
    fn round_trip_both_key_sizes() {
        for (algorithm, key) in [
            (Algorithm::Aes256Cbc, &KEY_256[..]),
            (Algorithm::Aes128Cbc, &KEY_128[..]),
        ] {
            let ct = encrypt(algorithm, key, IV, b"resistance is futile").unwrap();
            let pt = decrypt(algorithm, key, IV, &ct).unwrap();
            assert_eq!(pt, b"resistance is futile");
        }
    }

    #[test]
    fn ciphertext_is_padded_to_block_boundary() {
        for len in [0usize, 1, 15, 16, 17, 32] {
            let ct = encrypt(Algorithm::Aes256Cbc, &KEY_256, IV, &vec![b'x'; len]).unwrap();
            assert_eq!(ct.len(), (len / BLOCK_LEN + 1) * BLOCK_LEN);
        }
    }

    #[test]
    fn key_size_mismatch_rejected() {
        let err = encrypt(Algorithm::Aes128Cbc, &KEY_256, IV, b"x").unwrap_err();
        assert_eq!(
            err,
            CipherError::InvalidKeyLength {
                algorithm: Algorithm::Aes128Cbc,
                expected: 16,
                actual: 32,
            }
        );
    }

    #[test]
    fn short_iv_rejected() {
        let err = encrypt(Algorithm::Aes256Cbc, &KEY_256, &IV[..8], b"x").unwrap_err();
        assert_eq!(err, CipherError::InvalidIvLength(8));
    }

    #[test]
    fn unaligned_ciphertext_rejected() {
        let err = decrypt(Algorithm::Aes256Cbc, &KEY_256, IV, &[0u8; 15]).unwrap_err();
        assert_eq!(err, CipherError::BadDecrypt);
    }
}
