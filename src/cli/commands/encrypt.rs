//! `wikijs-env encrypt` — seal the plaintext env file and delete it.

use std::fs;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::config::env_file;
use crate::errors::{Result, VaultError};
use crate::session::Session;
use crate::state::ConfigPaths;
use crate::vault;

/// Execute the `encrypt` command.
pub fn execute(session: &mut Session, paths: &ConfigPaths) -> Result<()> {
    let state = paths.state();

    // 1. There must be something to encrypt.
    if !state.has_plaintext() {
        return Err(VaultError::SourceNotFound(paths.plaintext.clone()));
    }

    // 2. Replacing an existing vault is destructive; ask first.
    if state.has_vault() {
        let prompt = format!("{} already exists. Overwrite it?", paths.vault.display());
        if !session.prompter().confirm(&prompt, false)? {
            return Err(VaultError::AlreadyExists(paths.vault.clone()));
        }
    }

    // 3. Read and parse before prompting so a bad file fails fast.
    let text = Zeroizing::new(
        fs::read_to_string(&paths.plaintext).map_err(VaultError::fs(&paths.plaintext))?,
    );
    let (map, skipped) = env_file::parse_reporting(&text);
    drop(text);

    // The plaintext is deleted afterwards, so nothing may vanish silently.
    if skipped.comments > 0 {
        output::info(&format!(
            "{} comment line(s) will not be kept in the vault.",
            skipped.comments
        ));
    }
    if skipped.loses_data() {
        output::warning(&format!(
            "{} has lines that cannot be stored: {}",
            paths.plaintext.display(),
            skipped.describe()
        ));
        if !session
            .prompter()
            .confirm("Encrypt the rest and delete the file anyway?", false)?
        {
            return Err(VaultError::UnparsedLines {
                path: paths.plaintext.clone(),
                detail: skipped.describe(),
            });
        }
    }
    if map.is_empty() {
        output::warning(&format!(
            "{} has no KEY=VALUE entries; the vault will be empty.",
            paths.plaintext.display()
        ));
    }

    // 4. New passphrase (twice), fresh salt, seal.
    let passphrase = session.choose_passphrase()?;
    let sealed = vault::seal(&map, &passphrase)?;

    // 5. Vault first, then remove the plaintext: a failure in between
    //    leaves both files rather than neither.
    vault::write_vault(&paths.vault, &sealed)?;
    tracing::info!(vault = %paths.vault.display(), entries = map.len(), "vault written");
    vault::secure_delete(&paths.plaintext)?;

    output::success(&format!(
        "Encrypted {} → {} ({} entries)",
        paths.plaintext.display(),
        paths.vault.display(),
        map.len()
    ));
    output::info(&format!("Deleted {}", paths.plaintext.display()));

    Ok(())
}
