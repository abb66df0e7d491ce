//! CLI module — Clap argument parser, prompts, output helpers, and command
//! implementations.

pub mod commands;
pub mod output;
pub mod prompt;

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

/// Default plaintext configuration file.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// wikijs-env: encrypted configuration for the Wiki.js MCP server.
#[derive(Parser)]
#[command(
    name = "wikijs-env",
    about = "Encrypted configuration vault for the Wiki.js MCP server",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Interactively create an encrypted configuration
    Setup {
        /// Path to the plaintext env file
        #[arg(default_value = DEFAULT_ENV_FILE)]
        env_file: PathBuf,
    },

    /// Encrypt the plaintext env file and delete it
    Encrypt {
        /// Path to the plaintext env file
        #[arg(default_value = DEFAULT_ENV_FILE)]
        env_file: PathBuf,
    },

    /// Decrypt the vault back into the plaintext env file
    Decrypt {
        /// Path to the plaintext env file
        #[arg(default_value = DEFAULT_ENV_FILE)]
        env_file: PathBuf,
    },

    /// Edit the encrypted configuration in an editor (re-encrypts on save)
    Edit {
        /// Path to the plaintext env file
        #[arg(default_value = DEFAULT_ENV_FILE)]
        env_file: PathBuf,

        /// Editor command (default: $VISUAL, $EDITOR, then nano)
        #[arg(long)]
        editor: Option<String>,
    },

    /// Show which configuration files exist
    Status {
        /// Path to the plaintext env file
        #[arg(default_value = DEFAULT_ENV_FILE)]
        env_file: PathBuf,
    },
}

impl Commands {
    /// The env file the command operates on.
    pub fn env_file(&self) -> &Path {
        match self {
            Commands::Setup { env_file }
            | Commands::Encrypt { env_file }
            | Commands::Decrypt { env_file }
            | Commands::Edit { env_file, .. }
            | Commands::Status { env_file } => env_file,
        }
    }
}
