//! HTTP side of the installer
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: single GET with status checking
//! - `release`: latest release tag lookup
//! - `download`: release archive download into the temporary file
//!
//! Stages talk to the network only through [`HttpTransport`], so tests can
//! substitute a fake and count calls.

use url::Url;

use crate::errors::NetworkResult;

pub mod config;
pub mod download;
pub mod http;
pub mod release;

pub use config::ClientConfig;
pub use download::ArchiveFetcher;
pub use release::VersionResolver;

use http::HttpHandler;

/// Blocking-style GET returning the whole body
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    /// Fetch `url`, failing on transport errors and non-success statuses
    async fn get(&self, url: &Url) -> NetworkResult<Vec<u8>>;
}

/// HTTP client for the upstream release host
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http_handler: HttpHandler,
}

impl ReleaseClient {
    /// Creates a client with default timeouts and user agent
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::ClientBuild` if the HTTP client cannot be built
    pub fn new() -> NetworkResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: &ClientConfig) -> NetworkResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self {
            http_handler: HttpHandler::new(client),
        })
    }
}

impl HttpTransport for ReleaseClient {
    async fn get(&self, url: &Url) -> NetworkResult<Vec<u8>> {
        self.http_handler.get_bytes(url).await
    }
}
