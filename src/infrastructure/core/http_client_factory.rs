use crate::config::MarketDataConfig;
use crate::domain::errors::PredictionError;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;
use url::Url;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware
    pub fn create_client(config: &MarketDataConfig) -> ClientWithMiddleware {
        // Exponential backoff on transient failures (5xx, timeouts, 429)
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Appends query parameters to `base_url`, percent-encoding keys and values.
///
/// reqwest-middleware 0.5 does not expose `.query()`, so the URL is built up front.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> Result<Url, PredictionError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base_url)
        .map_err(|e| PredictionError::fetch(format!("invalid URL '{}': {}", base_url, e)))?;
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k.as_ref(), v.as_ref());
        }
    }
    Ok(url)
}
