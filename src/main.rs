use clap::Parser;
use wikijs_env::cli::commands;
use wikijs_env::cli::{output, Cli, Commands};
use wikijs_env::{ConfigPaths, Result, Session, Settings};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::debug!(error = ?e, "command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()
        .map_err(wikijs_env::VaultError::fs(std::path::Path::new(".")))?;
    let settings = match Settings::load(&cwd) {
        Ok(settings) => settings,
        // `status` reports; it never refuses to run.
        Err(e) if matches!(cli.command, Commands::Status { .. }) => {
            output::warning(&format!("{e}; using default settings"));
            Settings::default()
        }
        Err(e) => return Err(e),
    };
    let paths = ConfigPaths::new(cli.command.env_file(), &settings);
    let mut session = Session::interactive(settings);

    match cli.command {
        Commands::Setup { .. } => commands::setup::execute(&mut session, &paths),
        Commands::Encrypt { .. } => commands::encrypt::execute(&mut session, &paths),
        Commands::Decrypt { .. } => commands::decrypt::execute(&mut session, &paths),
        Commands::Edit { ref editor, .. } => {
            commands::edit::execute(&mut session, &paths, editor.as_deref())
        }
        Commands::Status { .. } => commands::status::execute(&paths),
    }
}

/// Logs go to stderr so they never mix with command output.
/// `RUST_LOG` overrides the `-v` level.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wikijs_env={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
