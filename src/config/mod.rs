//! Configuration: the `KEY=VALUE` serializer, the typed Wiki.js view of it,
//! and the tool's own `.wikijs-env.toml` settings.

pub mod env_file;
pub mod settings;
pub mod wiki;

pub use env_file::ConfigMap;
pub use settings::Settings;
pub use wiki::WikiConfig;
