//! Project-level settings loaded from `.wikijs-env.toml`.
//!
//! Every field has a sensible default, so the file is entirely optional.
//!
//! Example `.wikijs-env.toml`:
//!
//! ```toml
//! vault_suffix = ".encrypted"
//! max_passphrase_attempts = 3
//! min_passphrase_len = 8
//! editor = "code --wait"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::errors::{Result, VaultError};

/// Upper bound for `max_passphrase_attempts`.
const MAX_ATTEMPTS_CEILING: u32 = 10;

/// Tool settings, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Suffix appended to the env file path to name the vault file.
    #[serde(default = "default_vault_suffix")]
    pub vault_suffix: String,

    /// Consecutive passphrase failures allowed per invocation.
    #[serde(default = "default_max_passphrase_attempts")]
    pub max_passphrase_attempts: u32,

    /// Minimum length for newly chosen passphrases.
    #[serde(default = "default_min_passphrase_len")]
    pub min_passphrase_len: usize,

    /// Editor command for `edit`; falls back to `$VISUAL` / `$EDITOR` / `nano`.
    #[serde(default)]
    pub editor: Option<String>,
}

// ── Default value functions (used by serde) ──────────────────────────

fn default_vault_suffix() -> String {
    ".encrypted".to_string()
}

fn default_max_passphrase_attempts() -> u32 {
    3
}

fn default_min_passphrase_len() -> usize {
    8
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_suffix: default_vault_suffix(),
            max_passphrase_attempts: default_max_passphrase_attempts(),
            min_passphrase_len: default_min_passphrase_len(),
            editor: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".wikijs-env.toml";

    /// Load settings from `<dir>/.wikijs-env.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but is invalid, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(VaultError::fs(&config_path))?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        tracing::debug!(path = %config_path.display(), "loaded settings");

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.vault_suffix.is_empty() || self.vault_suffix.contains(['/', '\\']) {
            return Err(VaultError::Config(format!(
                "vault_suffix '{}' must be a non-empty file name suffix",
                self.vault_suffix
            )));
        }
        if !(1..=MAX_ATTEMPTS_CEILING).contains(&self.max_passphrase_attempts) {
            return Err(VaultError::Config(format!(
                "max_passphrase_attempts must be between 1 and {MAX_ATTEMPTS_CEILING} (got {})",
                self.max_passphrase_attempts
            )));
        }
        if self.min_passphrase_len == 0 {
            return Err(VaultError::Config(
                "min_passphrase_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_suffix, ".encrypted");
        assert_eq!(s.max_passphrase_attempts, 3);
        assert_eq!(s.min_passphrase_len, 8);
        assert!(s.editor.is_none());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_suffix, ".encrypted");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_suffix = ".vault"
max_passphrase_attempts = 5
min_passphrase_len = 12
editor = "vim -n"
"#;
        fs::write(tmp.path().join(Settings::FILE_NAME), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_suffix, ".vault");
        assert_eq!(settings.max_passphrase_attempts, 5);
        assert_eq!(settings.min_passphrase_len, 12);
        assert_eq!(settings.editor.as_deref(), Some("vim -n"));
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "editor = \"nano\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.editor.as_deref(), Some("nano"));
        assert_eq!(settings.max_passphrase_attempts, 3);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(Settings::FILE_NAME), "not valid {{toml").unwrap();
        assert!(matches!(
            Settings::load(tmp.path()),
            Err(VaultError::Config(_))
        ));
    }

    #[test]
    fn load_rejects_out_of_range_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(Settings::FILE_NAME);

        fs::write(&path, "max_passphrase_attempts = 0\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());

        fs::write(&path, "max_passphrase_attempts = 11\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());

        fs::write(&path, "vault_suffix = \"/x\"\n").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }
}
