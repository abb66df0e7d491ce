//! Typed view of the Wiki.js connection settings held in a `ConfigMap`.

use super::env_file::ConfigMap;
use crate::errors::{Result, VaultError};

pub const URL_KEY: &str = "WIKIJS_URL";
pub const API_KEY_KEY: &str = "WIKIJS_API_KEY";
pub const GRAPHQL_ENDPOINT_KEY: &str = "WIKIJS_GRAPHQL_ENDPOINT";
pub const DEBUG_KEY: &str = "DEBUG";

/// Default GraphQL path appended to the wiki URL.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "/graphql";

/// Connection settings for a Wiki.js instance.
#[derive(Clone, PartialEq, Eq)]
pub struct WikiConfig {
    pub url: String,
    pub api_key: String,
    pub graphql_endpoint: String,
    pub debug: bool,
}

impl WikiConfig {
    /// Build from a decrypted map, filling defaults for optional keys.
    pub fn from_map(map: &ConfigMap) -> Self {
        Self {
            url: map.get(URL_KEY).unwrap_or_default().to_string(),
            api_key: map.get(API_KEY_KEY).unwrap_or_default().to_string(),
            graphql_endpoint: map
                .get(GRAPHQL_ENDPOINT_KEY)
                .filter(|v| !v.is_empty())
                .unwrap_or(DEFAULT_GRAPHQL_ENDPOINT)
                .to_string(),
            debug: map
                .get(DEBUG_KEY)
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        }
    }

    /// The full GraphQL endpoint URL.
    pub fn graphql_url(&self) -> String {
        format!("{}{}", self.url.trim_end_matches('/'), self.graphql_endpoint)
    }

    /// Check that the required settings are present.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(VaultError::MissingValue(URL_KEY));
        }
        if self.api_key.is_empty() {
            return Err(VaultError::MissingValue(API_KEY_KEY));
        }
        Ok(())
    }

    /// Render back into the map layout written by `setup`.
    pub fn to_map(&self) -> ConfigMap {
        [
            (URL_KEY, self.url.as_str()),
            (API_KEY_KEY, self.api_key.as_str()),
            (GRAPHQL_ENDPOINT_KEY, self.graphql_endpoint.as_str()),
            (DEBUG_KEY, if self.debug { "true" } else { "false" }),
        ]
        .into_iter()
        .collect()
    }
}

impl std::fmt::Debug for WikiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("graphql_endpoint", &self.graphql_endpoint)
            .field("debug", &self.debug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_keys() {
        let map: ConfigMap = [(URL_KEY, "https://wiki.example.com"), (API_KEY_KEY, "abc123")]
            .into_iter()
            .collect();
        let cfg = WikiConfig::from_map(&map);
        assert_eq!(cfg.graphql_endpoint, "/graphql");
        assert!(!cfg.debug);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn graphql_url_joins_without_double_slash() {
        let map: ConfigMap = [(URL_KEY, "https://wiki.example.com/"), (API_KEY_KEY, "k")]
            .into_iter()
            .collect();
        assert_eq!(
            WikiConfig::from_map(&map).graphql_url(),
            "https://wiki.example.com/graphql"
        );
    }

    #[test]
    fn debug_flag_is_case_insensitive() {
        let map: ConfigMap = [(DEBUG_KEY, "TRUE")].into_iter().collect();
        assert!(WikiConfig::from_map(&map).debug);
    }

    #[test]
    fn missing_required_values_fail_validation() {
        let cfg = WikiConfig::from_map(&ConfigMap::new());
        assert!(matches!(cfg.validate(), Err(VaultError::MissingValue(URL_KEY))));

        let map: ConfigMap = [(URL_KEY, "https://wiki.example.com")].into_iter().collect();
        assert!(matches!(
            WikiConfig::from_map(&map).validate(),
            Err(VaultError::MissingValue(API_KEY_KEY))
        ));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let map: ConfigMap = [(API_KEY_KEY, "abc123")].into_iter().collect();
        let shown = format!("{:?}", WikiConfig::from_map(&map));
        assert!(!shown.contains("abc123"));
    }
}
