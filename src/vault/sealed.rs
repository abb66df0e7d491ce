//! Sealing: `ConfigMap` ⇄ `VaultBytes` under a passphrase.
//!
//! Every seal draws a fresh salt (and the cipher a fresh nonce), so sealing
//! the same map twice never yields the same bytes.  The derived key and the
//! intermediate plaintext are wiped before returning.

use zeroize::Zeroize;

use super::format::VaultBytes;
use crate::config::env_file::{self, ConfigMap};
use crate::crypto::{decrypt, derive_key, encrypt, generate_salt};
use crate::errors::{Result, VaultError};

/// Encrypt a configuration map under `passphrase` with a new random salt.
pub fn seal(map: &ConfigMap, passphrase: &str) -> Result<VaultBytes> {
    let salt = generate_salt()?;
    let key = derive_key(passphrase.as_bytes(), &salt)?;

    let mut text = env_file::serialize(map)?;
    let token = encrypt(&key, text.as_bytes());
    text.zeroize();

    Ok(VaultBytes { salt, token: token? })
}

/// Decrypt a vault with `passphrase`, re-deriving the key from its stored salt.
///
/// A wrong passphrase and a modified file both fail with `WrongPassphrase`;
/// nothing is returned unless the auth tag verifies.
pub fn unseal(vault: &VaultBytes, passphrase: &str) -> Result<ConfigMap> {
    let key = derive_key(passphrase.as_bytes(), &vault.salt)?;
    let plaintext = decrypt(&key, &vault.token)?;
    drop(key);

    let mut text = String::from_utf8(plaintext).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        VaultError::InvalidUtf8
    })?;
    let map = env_file::parse(&text);
    text.zeroize();

    Ok(map)
}
