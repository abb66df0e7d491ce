use std::path::{Path, PathBuf};
use thiserror::Error;

/// All errors that can occur while managing the configuration vault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Passphrase errors ---
    #[error("Passphrase must not be empty")]
    EmptyPassphrase,

    #[error("Passphrase must be at least {0} characters")]
    WeakPassphrase(usize),

    #[error("Passphrase mismatch — passphrases do not match")]
    PassphraseMismatch,

    #[error("Decryption failed — wrong passphrase or tampered vault")]
    WrongPassphrase,

    #[error("Too many failed passphrase attempts ({0}) — nothing was changed")]
    TooManyAttempts(u32),

    // --- Vault errors ---
    #[error("Corrupt vault: {0}")]
    CorruptVault(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decrypted configuration is not valid UTF-8")]
    InvalidUtf8,

    #[error("{0:?} is not a valid configuration key")]
    InvalidKey(String),

    // --- Workflow errors ---
    #[error("{}: {detail}; nothing was changed", path.display())]
    UnparsedLines { path: PathBuf, detail: String },

    #[error("{} not found", .0.display())]
    SourceNotFound(PathBuf),

    #[error("{} already exists (not overwritten)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{0} is required")]
    MissingValue(&'static str),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("Interrupted — edit discarded, vault left unchanged")]
    Interrupted,

    #[error("Prompt failed: {0}")]
    Prompt(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    /// Build a closure that wraps an `io::Error` with the offending path.
    ///
    /// Intended for `map_err(VaultError::fs(path))`.
    pub fn fs(path: &Path) -> impl FnOnce(std::io::Error) -> VaultError + '_ {
        move |source| VaultError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether another passphrase attempt may fix this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VaultError::EmptyPassphrase
                | VaultError::WeakPassphrase(_)
                | VaultError::PassphraseMismatch
                | VaultError::WrongPassphrase
        )
    }
}

/// Convenience type alias for vault results.
pub type Result<T> = std::result::Result<T, VaultError>;
