//! HTTP client for the public product catalog endpoint.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;
use crate::types::CatalogResponse;

/// HTTP client for the catalog listing endpoint.
///
/// Rate limiting (429), not-found (404), and other non-2xx responses surface
/// as typed errors. Transient errors (429, 5xx, network failures) are retried
/// with exponential backoff up to `max_retries` additional attempts.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` for `base_url` with the given timeout,
    /// `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches one catalog page. `params` are forwarded verbatim, in order,
    /// as the query string (e.g. `limit`, `page`, `order`).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure after all retries.
    /// - [`ScraperError::Deserialize`]: the body is not a catalog response.
    pub async fn fetch_products(
        &self,
        params: &[(String, String)],
    ) -> Result<CatalogResponse, ScraperError> {
        let url = Self::catalog_url(&self.base_url, params)?;

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(&url)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    let host = response.url().host_str().unwrap_or_default().to_owned();
                    return Err(ScraperError::RateLimited {
                        host,
                        retry_after_secs,
                    });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let body = response.text().await?;
                serde_json::from_str::<CatalogResponse>(&body).map_err(|e| {
                    ScraperError::Deserialize {
                        context: format!("catalog page {url}"),
                        source: e,
                    }
                })
            }
        })
        .await
    }

    /// Builds the catalog URL: `base_url` plus every parameter, URL-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` cannot be parsed.
    fn catalog_url(base_url: &str, params: &[(String, String)]) -> Result<String, ScraperError> {
        let mut url = reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
