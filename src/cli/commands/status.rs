//! `wikijs-env status` — report which configuration files exist.
//!
//! Read-only: never prompts, never decrypts, never touches file contents.

use crate::cli::output;
use crate::errors::Result;
use crate::state::{ConfigPaths, VaultState};
use crate::vault::{self, Framing};

/// Snapshot of the on-disk representation.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub paths: ConfigPaths,
    pub state: VaultState,
    pub plaintext_exists: bool,
    pub framing: Framing,
}

impl StatusReport {
    /// Whether the vault exists and is long enough to be a vault.
    pub fn vault_framing_valid(&self) -> bool {
        matches!(self.framing, Framing::Valid { .. })
    }
}

/// Gather the status without printing anything.
///
/// Unreadable metadata is reported as a state, never as an error.
pub fn report(paths: &ConfigPaths) -> StatusReport {
    let plaintext_exists = paths.plaintext.exists();
    let framing = vault::inspect(&paths.vault);
    let state = VaultState::from_presence(plaintext_exists, framing != Framing::Missing);

    StatusReport {
        paths: paths.clone(),
        state,
        plaintext_exists,
        framing,
    }
}

/// Execute the `status` command. Always succeeds.
pub fn execute(paths: &ConfigPaths) -> Result<()> {
    let report = report(paths);

    output::info(&format!("Configuration state: {}", report.state));
    output::print_status_table(&report);

    match report.framing {
        Framing::TooShort { .. } => {
            output::warning("The encrypted file is too short to be a valid vault.")
        }
        Framing::Unreadable => output::warning(&format!(
            "Cannot read {}; check its permissions.",
            report.paths.vault.display()
        )),
        Framing::Missing | Framing::Valid { .. } => {}
    }

    match report.state {
        VaultState::NoConfig => output::tip("Run `wikijs-env setup` to create a configuration."),
        VaultState::PlaintextOnly => {
            output::tip("Run `wikijs-env encrypt` to encrypt and remove the plaintext file.")
        }
        VaultState::EncryptedOnly => {
            output::tip("Run `wikijs-env edit` to change the encrypted configuration.")
        }
        VaultState::BothPresent => {
            output::warning("Both encrypted and unencrypted files exist!");
            output::tip("Delete the plaintext file, or run `wikijs-env encrypt` to replace the vault.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn report_reflects_files() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::new(&dir.path().join(".env"), &Settings::default());

        let r = report(&paths);
        assert_eq!(r.state, VaultState::NoConfig);
        assert!(!r.vault_framing_valid());

        fs::write(&paths.vault, [0u8; 8]).unwrap();
        let r = report(&paths);
        assert_eq!(r.state, VaultState::EncryptedOnly);
        assert_eq!(r.framing, Framing::TooShort { len: 8 });

        fs::write(&paths.vault, [0u8; 100]).unwrap();
        fs::write(&paths.plaintext, "A=1\n").unwrap();
        let r = report(&paths);
        assert_eq!(r.state, VaultState::BothPresent);
        assert!(r.vault_framing_valid());
    }

    #[test]
    fn status_does_not_modify_files() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::new(&dir.path().join(".env"), &Settings::default());
        fs::write(&paths.vault, [7u8; 100]).unwrap();

        execute(&paths).unwrap();
        assert_eq!(fs::read(&paths.vault).unwrap(), vec![7u8; 100]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_vault_metadata_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("conf"), "not a directory").unwrap();
        let paths = ConfigPaths::new(&dir.path().join("conf/.env"), &Settings::default());

        let r = report(&paths);
        assert_eq!(r.framing, Framing::Unreadable);
        assert!(!r.vault_framing_valid());
        assert!(execute(&paths).is_ok());
    }
}
