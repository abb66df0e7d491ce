//! The single entry point the rest of the server uses to read its
//! configuration.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use crate::config::{env_file, ConfigMap};
use crate::errors::{Result, VaultError};
use crate::session::Session;
use crate::state::{ConfigPaths, VaultState};
use crate::vault;

/// Resolve the current steady state of `env_file` and return its configuration.
///
/// - vault present: decrypt it, using the session's cached passphrase or
///   prompting for one (the passphrase is cached on success);
/// - plaintext only: parse the plaintext file;
/// - neither: `SourceNotFound`.
pub fn load(env_file: &Path, session: &mut Session) -> Result<ConfigMap> {
    let paths = ConfigPaths::new(env_file, session.settings());
    let state = paths.state();
    tracing::debug!(%state, path = %env_file.display(), "loading configuration");

    match state {
        VaultState::EncryptedOnly | VaultState::BothPresent => {
            if state == VaultState::BothPresent {
                tracing::warn!(
                    "both {} and {} exist, using the encrypted vault",
                    paths.plaintext.display(),
                    paths.vault.display()
                );
            }
            let sealed = vault::read_vault(&paths.vault)?;
            let prompt = format!("Passphrase for {}", paths.vault.display());
            let (map, _) = session.unlock(&sealed, &prompt)?;
            Ok(map)
        }
        VaultState::PlaintextOnly => {
            let text = Zeroizing::new(
                fs::read_to_string(&paths.plaintext).map_err(VaultError::fs(&paths.plaintext))?,
            );
            Ok(env_file::parse(&text))
        }
        VaultState::NoConfig => Err(VaultError::SourceNotFound(paths.plaintext)),
    }
}
