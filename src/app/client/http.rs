//! Core HTTP operations
//!
//! A single blocking-style GET per call: no retry, no caching. Any transport
//! failure or non-success status is terminal for the run.

use reqwest::Client;
use url::Url;

use crate::errors::{NetworkError, NetworkResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and returns the full response body
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Http` if the request or body read fails and
    /// `NetworkError::ServerError` for any non-2xx status.
    pub async fn get_bytes(&self, url: &Url) -> NetworkResult<Vec<u8>> {
        let http_error = |source| NetworkError::Http {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("GET {} returned HTTP {}", url, status.as_u16());
            return Err(NetworkError::ServerError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(http_error)?;
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
