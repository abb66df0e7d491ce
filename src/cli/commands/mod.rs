//! One module per subcommand.

pub mod decrypt;
pub mod edit;
pub mod encrypt;
pub mod setup;
pub mod status;
