//! Front end configuration

use std::path::PathBuf;

use fellowflight::matches::ApiConfig;
use fellowflight::session::SessionMarkers;
use serde::{Deserialize, Deserializer};
use tracing_subscriber::filter::Directive;

/// Logging output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    /// Additional filtering directives
    #[serde(deserialize_with = "Logging::deserialize_filters")]
    pub filters: Vec<Directive>,

    /// Logging format
    pub format: LogFormat,
}

impl Logging {
    fn deserialize_filters<'de, D>(deserializer: D) -> Result<Vec<Directive>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let dirs: Vec<String> = Deserialize::deserialize(deserializer)?;
        dirs.into_iter()
            .map(|dir| dir.parse().map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Top level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Match service connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Names of the persisted session markers
    #[serde(default)]
    pub session: SessionMarkers,

    /// Airport reference table
    #[serde(default = "Config::default_airports")]
    pub airports: PathBuf,

    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    fn default_airports() -> PathBuf {
        "airports.csv".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(
            config.api.base_url,
            "https://api.fellowflightmatch.abdullah.buzz"
        );
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.session.onboarding_complete, "fellowflight_form_complete");
        assert_eq!(config.airports, PathBuf::from("airports.csv"));
        assert!(config.logging.filters.is_empty());
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn full_config() {
        let config: Config = toml::from_str(
            r#"
            airports = "/data/airports.csv"

            [api]
            base_url = "http://localhost:8000"
            timeout_secs = 10

            [session]
            access_token = "token"
            onboarding_complete = "onboarded"

            [logging]
            filters = ["fellowflight=debug"]
            format = "Pretty"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.session.access_token, "token");
        assert_eq!(config.session.onboarding_complete, "onboarded");
        assert_eq!(config.airports, PathBuf::from("/data/airports.csv"));
        assert_eq!(config.logging.filters.len(), 1);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let err = toml::from_str::<Config>("[logging]\nfilters = [\"[[[\"]\n");
        assert!(err.is_err());
    }
}
