//! Cryptographic primitives for the configuration vault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - AES-256-GCM encryption and decryption (`encryption`)

pub mod encryption;
pub mod kdf;

pub use encryption::{decrypt, encrypt, MIN_TOKEN_LEN};
pub use kdf::{derive_key, generate_salt, DerivedKey, SALT_LEN};
