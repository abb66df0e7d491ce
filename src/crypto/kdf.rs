//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed: the vault file stores only the salt, so
//! every vault ever written must be readable with the same parameters.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 rounds. Never lower this without a format migration.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// A 32-byte symmetric key that wipes its memory when dropped.
///
/// Deliberately has no `Clone`, `Debug` or serde impls: a derived key
/// lives for one operation and is never written anywhere.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Access the raw key bytes (to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Derive a 32-byte key from a passphrase and salt.
///
/// The same passphrase + salt always produce the same key. A wrong
/// passphrase is not detected here; the cipher's auth tag catches it.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(VaultError::EmptyPassphrase);
    }

    let mut key = DerivedKey {
        bytes: [0u8; KEY_LEN],
    };
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, &mut key.bytes);

    Ok(key)
}

/// Generate a fresh random salt from the operating system RNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::EncryptionFailed(format!("OS random source failed: {e}")))?;
    Ok(salt)
}
