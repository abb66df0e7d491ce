//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::cli::commands::status::StatusReport;
use crate::vault::Framing;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the file table for `status`.
pub fn print_status_table(report: &StatusReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["File", "Path", "State"]);

    table.add_row(vec![
        "plaintext".to_string(),
        report.paths.plaintext.display().to_string(),
        if report.plaintext_exists {
            "exists".to_string()
        } else {
            "not found".to_string()
        },
    ]);

    let vault_state = match report.framing {
        Framing::Missing => "not found".to_string(),
        Framing::Valid { len } => format!("exists, {len} bytes"),
        Framing::TooShort { len } => format!("exists, {len} bytes (too short, corrupt)"),
        Framing::Unreadable => "unreadable".to_string(),
    };
    table.add_row(vec![
        "encrypted".to_string(),
        report.paths.vault.display().to_string(),
        vault_state,
    ]);

    println!("{table}");
}
