//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! and verifies the tag before any plaintext is released.
//!
//! Layout of the returned token:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use super::kdf::DerivedKey;
use crate::errors::{Result, VaultError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest possible token: nonce plus tag over an empty plaintext.
pub const MIN_TOKEN_LEN: usize = NONCE_LEN + TAG_LEN;

/// Encrypt `plaintext` under `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext || tag).
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    token.extend_from_slice(&nonce);
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Decrypt a token produced by `encrypt`.
///
/// Fails closed: any tag mismatch (wrong key or modified bytes) yields
/// `WrongPassphrase` and no plaintext.
pub fn decrypt(key: &DerivedKey, token: &[u8]) -> Result<Vec<u8>> {
    if token.len() < MIN_TOKEN_LEN {
        return Err(VaultError::CorruptVault(format!(
            "token is {} bytes, expected at least {MIN_TOKEN_LEN}",
            token.len()
        )));
    }

    let (nonce_bytes, ciphertext) = token.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| VaultError::WrongPassphrase)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| VaultError::WrongPassphrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::{derive_key, SALT_LEN};

    fn key(passphrase: &str) -> DerivedKey {
        derive_key(passphrase.as_bytes(), &[0x5Au8; SALT_LEN]).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let k = key("correct-horse");
        let plaintext = b"WIKIJS_URL=https://wiki.example.com\n";

        let token = encrypt(&k, plaintext).unwrap();
        assert_eq!(token.len(), plaintext.len() + MIN_TOKEN_LEN);

        let recovered = decrypt(&k, &token).unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[test]
    fn decrypt_is_repeatable() {
        let k = key("correct-horse");
        let token = encrypt(&k, b"A=1\n").unwrap();
        assert_eq!(decrypt(&k, &token).unwrap(), decrypt(&k, &token).unwrap());
    }

    #[test]
    fn nonce_differs_each_time() {
        let k = key("correct-horse");
        let t1 = encrypt(&k, b"SAME=1\n").unwrap();
        let t2 = encrypt(&k, b"SAME=1\n").unwrap();
        assert_ne!(t1[..NONCE_LEN], t2[..NONCE_LEN]);
        assert_ne!(t1, t2);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = encrypt(&key("correct-horse"), b"SECRET=1\n").unwrap();
        let result = decrypt(&key("wrong-pass"), &token);
        assert!(matches!(result, Err(VaultError::WrongPassphrase)));
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let k = key("correct-horse");
        let token = encrypt(&k, b"K=v\n").unwrap();

        for byte in 0..token.len() {
            for bit in 0..8 {
                let mut tampered = token.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    matches!(decrypt(&k, &tampered), Err(VaultError::WrongPassphrase)),
                    "flip at byte {byte} bit {bit} was not detected"
                );
            }
        }
    }

    #[test]
    fn short_token_is_corrupt() {
        let result = decrypt(&key("correct-horse"), &[0u8; MIN_TOKEN_LEN - 1]);
        assert!(matches!(result, Err(VaultError::CorruptVault(_))));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let k = key("correct-horse");
        let token = encrypt(&k, b"").unwrap();
        assert_eq!(token.len(), MIN_TOKEN_LEN);
        assert!(decrypt(&k, &token).unwrap().is_empty());
    }
}
