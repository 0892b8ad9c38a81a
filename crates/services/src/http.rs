use reqwest::{Client, Method, RequestBuilder};

use crate::config::ApiConfig;
use crate::error::ConfigError;

/// Thin wrapper over `reqwest::Client` that knows the API base URL and token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client honoring the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Client` if the HTTP client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn url_joins_without_doubled_slashes() {
        let base = Url::parse("https://api.example.test/v1/").unwrap();
        let client = ApiClient::new(ApiConfig::new(base)).unwrap();
        assert_eq!(
            client.url("/cards/7/bookmark"),
            "https://api.example.test/v1/cards/7/bookmark"
        );
    }
}
