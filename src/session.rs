//! Per-invocation session context.
//!
//! A `Session` is passed explicitly into every command and into `load`.
//! It owns the settings and the prompter, plus the passphrase once a vault
//! has been unlocked, so a second unlock in the same session does
//! not prompt again.  Dropping the session wipes the cached passphrase.

use zeroize::Zeroizing;

use crate::cli::prompt::{self, Prompter, TerminalPrompter};
use crate::config::{ConfigMap, Settings};
use crate::errors::{Result, VaultError};
use crate::vault::{self, VaultBytes};

pub struct Session {
    settings: Settings,
    prompter: Box<dyn Prompter>,
    passphrase: Option<Zeroizing<String>>,
}

impl Session {
    pub fn new(settings: Settings, prompter: Box<dyn Prompter>) -> Self {
        Self {
            settings,
            prompter,
            passphrase: None,
        }
    }

    /// A session that prompts on the controlling terminal.
    pub fn interactive(settings: Settings) -> Self {
        Self::new(settings, Box::new(TerminalPrompter))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompter(&mut self) -> &mut dyn Prompter {
        self.prompter.as_mut()
    }

    /// Whether a passphrase is cached for this session.
    pub fn has_passphrase(&self) -> bool {
        self.passphrase.is_some()
    }

    /// Drop the cached passphrase.
    pub fn forget_passphrase(&mut self) {
        self.passphrase = None;
    }

    /// Decrypt `vault`, trying the cached passphrase first and then
    /// prompting under the retry policy.
    ///
    /// Returns the map together with the passphrase that opened it; the
    /// passphrase is also cached for the rest of the session.
    pub fn unlock(
        &mut self,
        vault: &VaultBytes,
        prompt: &str,
    ) -> Result<(ConfigMap, Zeroizing<String>)> {
        if let Some(cached) = self.passphrase.take() {
            match vault::unseal(vault, &cached) {
                Ok(map) => {
                    tracing::debug!("unlocked vault with cached passphrase");
                    self.passphrase = Some(cached.clone());
                    return Ok((map, cached));
                }
                Err(VaultError::WrongPassphrase) => {
                    tracing::info!("cached passphrase rejected, prompting");
                }
                Err(e) => return Err(e),
            }
        }

        let max = self.settings.max_passphrase_attempts;
        let prompter = self.prompter.as_mut();
        let (map, passphrase) = prompt::with_retries(max, || {
            let passphrase = prompt::read_passphrase(&mut *prompter, prompt)?;
            let map = vault::unseal(vault, &passphrase)?;
            Ok((map, passphrase))
        })?;

        self.passphrase = Some(passphrase.clone());
        Ok((map, passphrase))
    }

    /// Ask for a new passphrase (entered twice) under the retry policy,
    /// and cache it for the rest of the session.
    pub fn choose_passphrase(&mut self) -> Result<Zeroizing<String>> {
        let max = self.settings.max_passphrase_attempts;
        let min_len = self.settings.min_passphrase_len;
        let prompter = self.prompter.as_mut();
        let passphrase =
            prompt::with_retries(max, || prompt::read_new_passphrase(&mut *prompter, min_len))?;

        self.passphrase = Some(passphrase.clone());
        Ok(passphrase)
    }
}
