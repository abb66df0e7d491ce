//! `wikijs-env setup` — interactively create an encrypted configuration.
//!
//! Values are collected in memory and sealed directly into the vault; the
//! plaintext never touches disk.

use crate::cli::commands::encrypt;
use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::config::wiki::{WikiConfig, API_KEY_KEY, DEFAULT_GRAPHQL_ENDPOINT, URL_KEY};
use crate::errors::{Result, VaultError};
use crate::session::Session;
use crate::state::{ConfigPaths, VaultState};
use crate::vault;

/// Execute the `setup` command.
pub fn execute(session: &mut Session, paths: &ConfigPaths) -> Result<()> {
    output::info("Wiki.js MCP server configuration setup");

    match paths.state() {
        VaultState::PlaintextOnly => {
            output::info(&format!("Found existing {}", paths.plaintext.display()));
            if session.prompter().confirm("Encrypt it now?", true)? {
                return encrypt::execute(session, paths);
            }
            output::tip("Run `wikijs-env encrypt` when you are ready.");
            return Ok(());
        }
        VaultState::EncryptedOnly | VaultState::BothPresent => {
            let prompt = format!(
                "An encrypted configuration already exists at {}. Overwrite it?",
                paths.vault.display()
            );
            if !session.prompter().confirm(&prompt, false)? {
                output::tip("Run `wikijs-env edit` to change the existing configuration.");
                return Err(VaultError::AlreadyExists(paths.vault.clone()));
            }
        }
        VaultState::NoConfig => {}
    }

    // 1. Passphrase first (entered twice, retried on mismatch).
    let passphrase = session.choose_passphrase()?;

    // 2. Connection values.
    let config = collect_values(session.prompter())?;

    // 3. Seal straight from memory and write atomically.
    let map = config.to_map();
    let sealed = vault::seal(&map, &passphrase)?;
    vault::write_vault(&paths.vault, &sealed)?;
    tracing::info!(vault = %paths.vault.display(), "setup wrote new vault");

    output::success(&format!(
        "Encrypted configuration written to {}",
        paths.vault.display()
    ));
    if paths.plaintext.exists() {
        output::warning(&format!(
            "{} still exists in plaintext — consider deleting it.",
            paths.plaintext.display()
        ));
    }
    output::tip("Run `wikijs-env edit` to change values later.");

    Ok(())
}

/// Ask for the Wiki.js connection settings.
fn collect_values(prompter: &mut dyn Prompter) -> Result<WikiConfig> {
    let url = prompter.input("Wiki.js URL (e.g. https://wiki.example.com)", None)?;
    if url.is_empty() {
        return Err(VaultError::MissingValue(URL_KEY));
    }

    let api_key = prompter.secret("Wiki.js API key")?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(VaultError::MissingValue(API_KEY_KEY));
    }

    let graphql_endpoint = prompter.input("GraphQL endpoint", Some(DEFAULT_GRAPHQL_ENDPOINT))?;
    let graphql_endpoint = if graphql_endpoint.is_empty() {
        DEFAULT_GRAPHQL_ENDPOINT.to_string()
    } else {
        graphql_endpoint
    };

    let debug = prompter.confirm("Enable debug logging?", false)?;

    Ok(WikiConfig {
        url,
        api_key: api_key.to_string(),
        graphql_endpoint,
        debug,
    })
}
