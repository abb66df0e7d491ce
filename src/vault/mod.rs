//! Vault module — the encrypted on-disk configuration.
//!
//! This module provides:
//! - `salt || token` framing with atomic writes (`format`)
//! - Sealing and unsealing a `ConfigMap` under a passphrase (`sealed`)

pub mod format;
pub mod sealed;

pub use format::{
    inspect, read_vault, secure_delete, write_private, write_vault, Framing, VaultBytes,
};
pub use sealed::{seal, unseal};
