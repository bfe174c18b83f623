use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};

use crate::error::{AppError, Result};

use super::Upstream;

/// Header carrying the license key on every upstream request.
pub const API_KEY_HEADER: &str = "X-Licensing-Api-Key";

const LICENSE_PATH: &str = "/v2/licenses/me";
const CHECKOUT_PATH: &str = "/v2/subscriptions/me/sessions/checkout";
const PORTAL_PATH: &str = "/v2/subscriptions/me/sessions/portal";

#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    base_url: String,
    retry_count: u32,
}

impl HttpUpstream {
    pub fn new(base_url: &str, retry_count: u32, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::internal("failed to build upstream client", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_count,
        })
    }

    fn backoff(attempt: u32) -> Duration {
        Duration::from_millis(100 * 2u64.pow(attempt.min(6)))
    }

    /// Send one request. GETs retry transport failures and 5xx responses up
    /// to `retry_count` times; POSTs open billing sessions and are sent once.
    /// Other non-2xx statuses are returned immediately.
    async fn send(&self, method: Method, path: &str, key: &str, body: &[u8]) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let max_retries = if method == Method::GET { self.retry_count } else { 0 };
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .request(method.clone(), &url)
                .header(API_KEY_HEADER, key)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.to_vec())
                .send()
                .await;

            let retryable = match result {
                Ok(response) if response.status().is_success() => {
                    let bytes = response
                        .bytes()
                        .await
                        .map_err(|e| AppError::internal("failed to read upstream response", e))?;
                    return Ok(bytes.to_vec());
                }
                Ok(response) if response.status().is_server_error() => {
                    AppError::from_upstream_status(response.status())
                }
                Ok(response) => return Err(AppError::from_upstream_status(response.status())),
                Err(e) => AppError::internal("upstream request failed", e),
            };

            if attempt >= max_retries {
                return Err(retryable);
            }
            attempt += 1;
            tracing::warn!(
                "Upstream {} {} failed (attempt {}/{}): {}",
                method,
                path,
                attempt,
                max_retries,
                retryable
            );
            tokio::time::sleep(Self::backoff(attempt)).await;
        }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_license(&self, key: &str) -> Result<Vec<u8>> {
        self.send(Method::GET, LICENSE_PATH, key, &[]).await
    }

    async fn get_checkout_url(&self, key: &str, body: &[u8]) -> Result<Vec<u8>> {
        self.send(Method::POST, CHECKOUT_PATH, key, body).await
    }

    async fn get_portal_url(&self, key: &str, body: &[u8]) -> Result<Vec<u8>> {
        self.send(Method::POST, PORTAL_PATH, key, body).await
    }
}
