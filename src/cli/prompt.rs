//! Interactive passphrase and value collection.
//!
//! Passphrases only ever come from a prompt. There is no flag or
//! environment variable for them, so they never land in shell history or
//! the process list.  The `Prompter` trait lets tests script the answers.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::errors::{Result, VaultError};

/// Source of interactive answers.
pub trait Prompter {
    /// Read a secret without echoing it (passphrases, API keys).
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Read a line of visible text, with an optional default.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;
}

/// `Prompter` backed by the terminal via `dialoguer`.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
        let value = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(|e| VaultError::Prompt(format!("{prompt}: {e}")))?;
        Ok(Zeroizing::new(value))
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| VaultError::Prompt(format!("{prompt}: {e}")))
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        let value = input
            .interact_text()
            .map_err(|e| VaultError::Prompt(format!("{prompt}: {e}")))?;
        Ok(value.trim().to_string())
    }
}

/// Read an existing passphrase once. Empty input is rejected.
pub fn read_passphrase(prompter: &mut dyn Prompter, prompt: &str) -> Result<Zeroizing<String>> {
    let passphrase = prompter.secret(prompt)?;
    if passphrase.is_empty() {
        return Err(VaultError::EmptyPassphrase);
    }
    Ok(passphrase)
}

/// Read a new passphrase twice and check both entries agree.
pub fn read_new_passphrase(
    prompter: &mut dyn Prompter,
    min_len: usize,
) -> Result<Zeroizing<String>> {
    let passphrase = prompter.secret("Choose a passphrase")?;
    if passphrase.is_empty() {
        return Err(VaultError::EmptyPassphrase);
    }
    if passphrase.chars().count() < min_len {
        return Err(VaultError::WeakPassphrase(min_len));
    }

    let confirmation = prompter.secret("Confirm passphrase")?;
    if *passphrase != *confirmation {
        return Err(VaultError::PassphraseMismatch);
    }
    Ok(passphrase)
}

/// Run `attempt` until it succeeds, a non-passphrase error occurs, or
/// `max_attempts` consecutive passphrase failures have happened.
pub fn with_retries<T>(max_attempts: u32, mut attempt: impl FnMut() -> Result<T>) -> Result<T> {
    let mut failures = 0;
    loop {
        match attempt() {
            Err(e) if e.is_retryable() => {
                failures += 1;
                tracing::warn!(failures, max_attempts, "passphrase attempt failed");
                if failures >= max_attempts {
                    return Err(VaultError::TooManyAttempts(max_attempts));
                }
                output::warning(&format!(
                    "{e} ({} attempt{} left)",
                    max_attempts - failures,
                    if max_attempts - failures == 1 { "" } else { "s" }
                ));
            }
            other => return other,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::*;

    /// A `Prompter` that replays queued answers and fails when it runs dry.
    #[derive(Debug, Default)]
    pub struct Scripted {
        pub secrets: VecDeque<String>,
        pub confirms: VecDeque<bool>,
        pub inputs: VecDeque<String>,
    }

    impl Scripted {
        pub fn secrets(values: &[&str]) -> Self {
            Self {
                secrets: values.iter().map(|s| s.to_string()).collect(),
                ..Self::default()
            }
        }
    }

    impl Prompter for Scripted {
        fn secret(&mut self, prompt: &str) -> Result<Zeroizing<String>> {
            self.secrets
                .pop_front()
                .map(Zeroizing::new)
                .ok_or_else(|| VaultError::Prompt(format!("no scripted answer for {prompt}")))
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool> {
            self.confirms
                .pop_front()
                .ok_or_else(|| VaultError::Prompt(format!("no scripted answer for {prompt}")))
        }

        fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
            match self.inputs.pop_front() {
                Some(v) if v.is_empty() => Ok(default.unwrap_or_default().to_string()),
                Some(v) => Ok(v),
                None => Err(VaultError::Prompt(format!("no scripted answer for {prompt}"))),
            }
        }
    }
}
