use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "LEARN_API_BASE_URL";
pub const TOKEN_VAR: &str = "LEARN_API_TOKEN";
pub const TIMEOUT_VAR: &str = "LEARN_API_TIMEOUT_SECS";

/// Connection settings for the study API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Read settings from `LEARN_API_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or any value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Read settings through `lookup`, treating blank values as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is missing or any value is malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let raw = read(BASE_URL_VAR).ok_or(ConfigError::Missing { var: BASE_URL_VAR })?;
        let base_url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
            var: BASE_URL_VAR,
            raw: raw.clone(),
            source,
        })?;

        let timeout = match read(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidNumber {
                    var: TIMEOUT_VAR,
                    raw,
                })?,
            None => Self::DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url,
            token: read(TOKEN_VAR),
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn reads_all_values() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://api.example.test/v1/"),
            (TOKEN_VAR, "secret"),
            (TIMEOUT_VAR, "3"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://api.example.test/v1/");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn blank_token_and_timeout_fall_back_to_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost:8080"),
            (TOKEN_VAR, "  "),
        ]))
        .unwrap();
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, ApiConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_or_invalid_base_url_is_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { var: BASE_URL_VAR }));

        let err = ApiConfig::from_lookup(lookup(&[(BASE_URL_VAR, "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "http://localhost"),
            (TIMEOUT_VAR, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var: TIMEOUT_VAR, .. }));
    }
}
