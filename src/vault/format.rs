//! Binary vault file format and atomic file writes.
//!
//! A vault file has this layout:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][ciphertext][auth tag: 16 bytes]
//! ```
//!
//! - **Salt**: PBKDF2 salt, regenerated on every write.  Not secret.
//! - **Token** (everything after the salt): opaque AES-256-GCM output.
//!   This layer only checks that it is long enough to be a token.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crypto::{MIN_TOKEN_LEN, SALT_LEN};
use crate::errors::{Result, VaultError};

/// Smallest file that can possibly be a vault.
pub const MIN_VAULT_LEN: usize = SALT_LEN + MIN_TOKEN_LEN;

// ---------------------------------------------------------------------------
// VaultBytes
// ---------------------------------------------------------------------------

/// The two parts of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultBytes {
    pub salt: [u8; SALT_LEN],
    pub token: Vec<u8>,
}

impl VaultBytes {
    /// Frame as `salt || token`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SALT_LEN + self.token.len());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.token);
        buf
    }

    /// Split a raw file into salt and token, validating the minimum length.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_VAULT_LEN {
            return Err(VaultError::CorruptVault(format!(
                "file is {} bytes, a vault needs at least {MIN_VAULT_LEN}",
                data.len()
            )));
        }

        let (salt_bytes, token) = data.split_at(SALT_LEN);
        let salt: [u8; SALT_LEN] = salt_bytes
            .try_into()
            .map_err(|_| VaultError::CorruptVault("bad salt length".into()))?;

        Ok(Self {
            salt,
            token: token.to_vec(),
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Write a vault file to disk **atomically**.
pub fn write_vault(path: &Path, vault: &VaultBytes) -> Result<()> {
    write_atomic(path, &vault.to_bytes())
}

/// Read and frame a vault file. Does not look inside the token.
pub fn read_vault(path: &Path) -> Result<VaultBytes> {
    if !path.exists() {
        return Err(VaultError::SourceNotFound(path.to_path_buf()));
    }

    let data = fs::read(path).map_err(VaultError::fs(path))?;
    VaultBytes::from_bytes(&data)
}

/// Write plaintext configuration with owner-only permissions, atomically.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    write_atomic(path, contents)
}

/// Overwrite a plaintext file with zeros, then remove it.
///
/// Zeroing reduces what can be recovered from the old blocks; removal
/// errors are returned, never swallowed.
pub fn secure_delete(path: &Path) -> Result<()> {
    let len = fs::metadata(path).map_err(VaultError::fs(path))?.len();
    if len > 0 {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(VaultError::fs(path))?;
        let zeros = [0u8; 8192];
        let mut remaining = len;
        while remaining > 0 {
            let chunk = remaining.min(zeros.len() as u64) as usize;
            file.write_all(&zeros[..chunk]).map_err(VaultError::fs(path))?;
            remaining -= chunk as u64;
        }
        file.sync_all().map_err(VaultError::fs(path))?;
    }
    fs::remove_file(path).map_err(VaultError::fs(path))
}

/// What `status` can tell about a vault file without a passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    Missing,
    Valid { len: u64 },
    TooShort { len: u64 },
    /// Present (or possibly present) but its metadata could not be read.
    Unreadable,
}

/// Inspect a vault file's framing. Reads metadata only and never fails.
pub fn inspect(path: &Path) -> Framing {
    match fs::metadata(path) {
        Ok(meta) if meta.len() >= MIN_VAULT_LEN as u64 => Framing::Valid { len: meta.len() },
        Ok(meta) => Framing::TooShort { len: meta.len() },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Framing::Missing,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read vault metadata");
            Framing::Unreadable
        }
    }
}

// ---------------------------------------------------------------------------
// Atomic write
// ---------------------------------------------------------------------------

/// Write to a temp file in the same directory, fsync, then rename over
/// the target. Readers never observe a half-written file; the temp file
/// is removed if any step fails.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = sibling_tmp_path(path);

    let result = write_then_rename(&tmp_path, path, contents);
    if result.is_err() {
        match fs::remove_file(&tmp_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %tmp_path.display(),
                error = %e,
                "could not remove temp file after failed write; delete it manually"
            ),
        }
    }
    result
}

fn write_then_rename(tmp_path: &Path, path: &Path, contents: &[u8]) -> Result<()> {
    // A stale temp file from a crashed run may have wider permissions;
    // start from scratch so the mode below applies.
    match fs::remove_file(tmp_path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(VaultError::fs(tmp_path)(e)),
    }

    let mut file = create_private(tmp_path)?;
    file.write_all(contents).map_err(VaultError::fs(tmp_path))?;
    file.sync_all().map_err(VaultError::fs(tmp_path))?;
    drop(file);

    fs::rename(tmp_path, path).map_err(VaultError::fs(path))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file atomically");
    Ok(())
}

/// Create a new file readable and writable by the owner only.
fn create_private(path: &Path) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path).map_err(VaultError::fs(path))
}

/// `dir/.name.tmp` next to the target, so the rename stays on one filesystem.
fn sibling_tmp_path(path: &Path) -> PathBuf {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}
