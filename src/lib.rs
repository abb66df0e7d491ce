//! Encrypted configuration vault for the Wiki.js MCP server.
//!
//! The server reads its settings through [`load`]; the `wikijs-env` binary
//! manages the files behind it (setup, encrypt, decrypt, edit, status).

pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod loader;
pub mod session;
pub mod state;
pub mod vault;

pub use cli::prompt::{Prompter, TerminalPrompter};
pub use config::{ConfigMap, Settings, WikiConfig};
pub use errors::{Result, VaultError};
pub use loader::load;
pub use session::Session;
pub use state::{ConfigPaths, VaultState};
