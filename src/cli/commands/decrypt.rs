//! `wikijs-env decrypt` — turn the vault back into a plaintext env file.

use zeroize::Zeroize;

use crate::cli::output;
use crate::config::env_file;
use crate::errors::{Result, VaultError};
use crate::session::Session;
use crate::state::ConfigPaths;
use crate::vault;

/// Execute the `decrypt` command.
pub fn execute(session: &mut Session, paths: &ConfigPaths) -> Result<()> {
    let state = paths.state();

    if !state.has_vault() {
        return Err(VaultError::SourceNotFound(paths.vault.clone()));
    }

    if state.has_plaintext() {
        let prompt = format!("{} already exists. Overwrite it?", paths.plaintext.display());
        if !session.prompter().confirm(&prompt, false)? {
            return Err(VaultError::AlreadyExists(paths.plaintext.clone()));
        }
    }

    // 1. Frame and unlock. Nothing on disk changes until this succeeds.
    let sealed = vault::read_vault(&paths.vault)?;
    let prompt = format!("Passphrase to decrypt {}", paths.vault.display());
    let (map, _) = session.unlock(&sealed, &prompt)?;

    // 2. Plaintext first (owner-only), then drop the vault.
    let mut text = env_file::serialize(&map)?;
    let written = vault::write_private(&paths.plaintext, text.as_bytes());
    text.zeroize();
    written?;

    std::fs::remove_file(&paths.vault).map_err(VaultError::fs(&paths.vault))?;
    tracing::info!(plaintext = %paths.plaintext.display(), "vault decrypted");

    output::success(&format!(
        "Decrypted {} → {}",
        paths.vault.display(),
        paths.plaintext.display()
    ));
    output::tip("Run `wikijs-env encrypt` when you are done editing the plaintext file.");

    Ok(())
}
