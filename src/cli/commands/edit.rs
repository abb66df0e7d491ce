//! `wikijs-env edit` — open the encrypted configuration in an editor.
//!
//! Decrypts to a temporary file next to the env file, launches the editor,
//! and re-seals the result under a fresh salt.  The temporary file is
//! removed on every exit path: normal return, any error, and SIGINT/SIGTERM
//! while the editor is open.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tempfile::TempPath;
use zeroize::{Zeroize, Zeroizing};

use crate::cli::output;
use crate::config::env_file::{self, ConfigMap};
use crate::config::{Settings, WikiConfig};
use crate::errors::{Result, VaultError};
use crate::session::Session;
use crate::state::ConfigPaths;
use crate::vault;

/// Editor used when nothing else is configured.
const FALLBACK_EDITOR: &str = "nano";

/// Set by the signal handler while an edit session is running.
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Execute the `edit` command.
pub fn execute(session: &mut Session, paths: &ConfigPaths, editor: Option<&str>) -> Result<()> {
    let state = paths.state();
    if !state.has_vault() {
        output::tip("Create a configuration first with `wikijs-env setup`.");
        return Err(VaultError::SourceNotFound(paths.vault.clone()));
    }
    if state.has_plaintext() {
        output::warning(&format!(
            "{} also exists in plaintext; editing the encrypted copy.",
            paths.plaintext.display()
        ));
    }

    // 1. Unlock before anything is written, so a wrong passphrase never
    //    creates a temp file.
    let sealed = vault::read_vault(&paths.vault)?;
    let prompt = format!("Passphrase to edit {}", paths.vault.display());
    let (original, passphrase) = session.unlock(&sealed, &prompt)?;

    // 2. Decrypted copy for the editor; removed when `temp` goes out of scope.
    install_interrupt_handler()?;
    INTERRUPTED.store(false, Ordering::SeqCst);

    let dir = temp_dir_for(&paths.plaintext);
    let temp = TempPlaintext::create(dir, &original)?;

    // 3. Run the editor and wait for it.
    let editor = resolve_editor(editor, session.settings());
    output::info(&format!("Opening {} with {editor}...", temp.path().display()));
    output::tip("Save and close the editor when done.");
    run_editor(&editor, temp.path())?;

    if INTERRUPTED.load(Ordering::SeqCst) {
        return Err(VaultError::Interrupted);
    }

    // 4. Read back and remove the temp file before touching the vault.
    let edited_text = temp.read()?;
    temp.remove()?;
    let (edited, skipped) = env_file::parse_reporting(&edited_text);
    drop(edited_text);

    if skipped.loses_data() {
        output::warning(&format!(
            "These lines cannot be stored: {}",
            skipped.describe()
        ));
        if !session
            .prompter()
            .confirm("Save the rest and discard them?", false)?
        {
            return Err(VaultError::UnparsedLines {
                path: paths.vault.clone(),
                detail: format!("edit discarded ({})", skipped.describe()),
            });
        }
    }

    let changes = ChangeSummary::between(&original, &edited);
    if changes.is_empty() {
        output::info("No changes detected.");
    } else if let Err(e) = WikiConfig::from_map(&edited).validate() {
        output::warning(&format!("{e}; the MCP server will not start without it."));
    }

    // 5. Always re-seal: fresh salt and nonce, atomic replace.
    let resealed = vault::seal(&edited, &passphrase)?;
    vault::write_vault(&paths.vault, &resealed)?;
    tracing::info!(
        added = changes.added,
        removed = changes.removed,
        changed = changes.changed,
        "vault re-encrypted after edit"
    );

    output::success(&format!(
        "Edit complete: {} added, {} removed, {} changed",
        changes.added, changes.removed, changes.changed
    ));

    Ok(())
}

// ---------------------------------------------------------------------------
// Temp file guard
// ---------------------------------------------------------------------------

/// Owner-only temp file holding decrypted configuration.
///
/// Dropping the guard zero-fills and deletes the file; `remove` does the
/// same but reports failures.
struct TempPlaintext {
    path: Option<TempPath>,
}

impl TempPlaintext {
    fn create(dir: &Path, map: &ConfigMap) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(".wikijs-env-edit-")
            .suffix(".env")
            .tempfile_in(dir)
            .map_err(VaultError::fs(dir))?;
        let path = file.path().to_path_buf();

        let mut text = String::from("# Wiki.js configuration (KEY=VALUE per line)\n");
        text.push_str("# Lines starting with '#' are ignored\n\n");
        let mut body = env_file::serialize(map)?;
        text.push_str(&body);
        body.zeroize();

        let written = file
            .write_all(text.as_bytes())
            .and_then(|()| file.as_file().sync_all());
        text.zeroize();

        // The guard owns the file from here, so a failed write still cleans up.
        let guard = Self {
            path: Some(file.into_temp_path()),
        };
        written.map_err(VaultError::fs(&path))?;

        tracing::debug!(path = %path.display(), "created edit temp file");
        Ok(guard)
    }

    fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    fn read(&self) -> Result<Zeroizing<String>> {
        let path = self.path();
        if !path.exists() {
            return Err(VaultError::Editor(format!(
                "{} was deleted while editing",
                path.display()
            )));
        }
        let text = fs::read_to_string(path).map_err(VaultError::fs(path))?;
        Ok(Zeroizing::new(text))
    }

    /// Zero-fill and delete now, surfacing any error.
    fn remove(mut self) -> Result<()> {
        match self.path.take() {
            Some(temp_path) => {
                let result = vault::secure_delete(&temp_path);
                // Unlinks the file if zeroing failed before removal.
                drop(temp_path);
                result
            }
            None => Ok(()),
        }
    }
}

impl Drop for TempPlaintext {
    fn drop(&mut self) {
        if let Some(temp_path) = self.path.take() {
            if vault::secure_delete(&temp_path).is_err() {
                // Zeroing failed (e.g. the editor replaced the file with one
                // we cannot open); TempPath's drop still unlinks it.
                tracing::warn!(path = %temp_path.display(), "could not zero edit temp file");
            }
        }
    }
}

/// The temp file lives next to the env file (same filesystem, same
/// permissions regime as the plaintext it stands in for).
fn temp_dir_for(env_file: &Path) -> &Path {
    match env_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Pick the editor: explicit flag, settings, `$VISUAL`, `$EDITOR`, then nano.
fn resolve_editor(flag: Option<&str>, settings: &Settings) -> String {
    let candidates = [
        flag.map(str::to_string),
        settings.editor.clone(),
        std::env::var("VISUAL").ok(),
        std::env::var("EDITOR").ok(),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|e| !e.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// Launch `editor` on `file` and block until it exits.
///
/// The editor string may carry arguments, e.g. `code --wait`.
fn run_editor(editor: &str, file: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| VaultError::Editor("empty editor command".into()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(file)
        .status()
        .map_err(|e| VaultError::Editor(format!("failed to launch '{editor}': {e}")))?;

    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(VaultError::Editor(format!(
            "editor exited with code {code}; vault left unchanged"
        ))),
        None => Err(VaultError::Editor(
            "editor was terminated by a signal; vault left unchanged".into(),
        )),
    }
}

/// Route SIGINT/SIGTERM to a flag instead of killing the process, so the
/// temp file guard always runs. Installed once per process.
fn install_interrupt_handler() -> Result<()> {
    static INSTALLED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

    INSTALLED
        .get_or_init(|| {
            ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst))
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|e| VaultError::Editor(format!("cannot install interrupt handler: {e}")))
}

// ---------------------------------------------------------------------------
// Change summary
// ---------------------------------------------------------------------------

#[derive(Debug, Default, PartialEq, Eq)]
struct ChangeSummary {
    added: usize,
    removed: usize,
    changed: usize,
}

impl ChangeSummary {
    fn between(old: &ConfigMap, new: &ConfigMap) -> Self {
        let mut summary = Self::default();
        for (key, value) in new.iter() {
            match old.get(key) {
                Some(previous) if previous == value => {}
                Some(_) => summary.changed += 1,
                None => summary.added += 1,
            }
        }
        summary.removed = old.keys().filter(|k| !new.contains_key(k)).count();
        summary
    }

    fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.changed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn map(pairs: &[(&str, &str)]) -> ConfigMap {
        pairs.iter().copied().collect()
    }

    #[test]
    fn change_summary_counts() {
        let old = map(&[("A", "1"), ("B", "2"), ("C", "3")]);
        let new = map(&[("A", "1"), ("B", "20"), ("D", "4")]);
        assert_eq!(
            ChangeSummary::between(&old, &new),
            ChangeSummary {
                added: 1,
                removed: 1,
                changed: 1
            }
        );
        assert!(ChangeSummary::between(&old, &old).is_empty());
    }

    #[test]
    fn editor_flag_wins() {
        let settings = Settings {
            editor: Some("vim".into()),
            ..Settings::default()
        };
        assert_eq!(resolve_editor(Some("code --wait"), &settings), "code --wait");
        assert_eq!(resolve_editor(None, &settings), "vim");
    }

    #[test]
    fn temp_file_is_private_and_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let temp = TempPlaintext::create(dir.path(), &map(&[("KEY", "secret")])).unwrap();
        let path = temp.path().to_path_buf();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("KEY=secret"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        drop(temp);
        assert!(!path.exists());
    }

    #[test]
    fn temp_file_remove_reports_and_deletes() {
        let dir = TempDir::new().unwrap();
        let temp = TempPlaintext::create(dir.path(), &map(&[("KEY", "v")])).unwrap();
        let path = temp.path().to_path_buf();

        temp.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn temp_file_header_parses_back_to_same_map() {
        let dir = TempDir::new().unwrap();
        let original = map(&[("WIKIJS_URL", "https://wiki.example.com"), ("X", "a b ")]);
        let temp = TempPlaintext::create(dir.path(), &original).unwrap();
        assert_eq!(env_file::parse(&temp.read().unwrap()), original);
    }

    #[test]
    fn missing_editor_binary_is_an_editor_error() {
        let dir = TempDir::new().unwrap();
        let result = run_editor("definitely-not-an-editor-4242", &dir.path().join("f"));
        assert!(matches!(result, Err(VaultError::Editor(_))));
    }

    #[test]
    fn temp_dir_defaults_to_current_dir() {
        assert_eq!(temp_dir_for(Path::new(".env")), Path::new("."));
        assert_eq!(temp_dir_for(Path::new("conf/.env")), Path::new("conf"));
    }
}
