//! Which on-disk representation of the configuration currently exists.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Settings;

/// The plaintext env file and its encrypted sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub plaintext: PathBuf,
    pub vault: PathBuf,
}

impl ConfigPaths {
    /// `.env` → (`.env`, `.env.encrypted`) with the default suffix.
    pub fn new(env_file: &Path, settings: &Settings) -> Self {
        let mut vault: OsString = env_file.as_os_str().to_owned();
        vault.push(&settings.vault_suffix);
        Self {
            plaintext: env_file.to_path_buf(),
            vault: PathBuf::from(vault),
        }
    }

    /// Detect the current state from file presence.
    pub fn state(&self) -> VaultState {
        VaultState::from_presence(self.plaintext.exists(), self.vault.exists())
    }
}

/// Steady states are `NoConfig`, `PlaintextOnly` and `EncryptedOnly`;
/// `BothPresent` should only be seen mid-transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    NoConfig,
    PlaintextOnly,
    EncryptedOnly,
    BothPresent,
}

impl VaultState {
    pub fn from_presence(plaintext: bool, vault: bool) -> Self {
        match (plaintext, vault) {
            (false, false) => VaultState::NoConfig,
            (true, false) => VaultState::PlaintextOnly,
            (false, true) => VaultState::EncryptedOnly,
            (true, true) => VaultState::BothPresent,
        }
    }

    pub fn has_vault(self) -> bool {
        matches!(self, VaultState::EncryptedOnly | VaultState::BothPresent)
    }

    pub fn has_plaintext(self) -> bool {
        matches!(self, VaultState::PlaintextOnly | VaultState::BothPresent)
    }
}

impl fmt::Display for VaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VaultState::NoConfig => "no configuration",
            VaultState::PlaintextOnly => "plaintext only",
            VaultState::EncryptedOnly => "encrypted",
            VaultState::BothPresent => "plaintext and encrypted both present",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn vault_path_appends_suffix() {
        let paths = ConfigPaths::new(Path::new("conf/.env"), &Settings::default());
        assert_eq!(paths.plaintext, PathBuf::from("conf/.env"));
        assert_eq!(paths.vault, PathBuf::from("conf/.env.encrypted"));
    }

    #[test]
    fn custom_suffix_is_used() {
        let settings = Settings {
            vault_suffix: ".vault".into(),
            ..Settings::default()
        };
        let paths = ConfigPaths::new(Path::new(".env"), &settings);
        assert_eq!(paths.vault, PathBuf::from(".env.vault"));
    }

    #[test]
    fn state_follows_file_presence() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::new(&dir.path().join(".env"), &Settings::default());
        assert_eq!(paths.state(), VaultState::NoConfig);

        fs::write(&paths.plaintext, "A=1\n").unwrap();
        assert_eq!(paths.state(), VaultState::PlaintextOnly);

        fs::write(&paths.vault, [0u8; 64]).unwrap();
        assert_eq!(paths.state(), VaultState::BothPresent);

        fs::remove_file(&paths.plaintext).unwrap();
        assert_eq!(paths.state(), VaultState::EncryptedOnly);
        assert!(paths.state().has_vault());
        assert!(!paths.state().has_plaintext());
    }
}
