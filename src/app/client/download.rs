//! Release archive download
//!
//! The release tag is substituted into the configured URL template and the
//! response body is written verbatim to the run's temporary archive path.

use url::Url;

use crate::app::client::HttpTransport;
use crate::app::models::{ReleaseVersion, TempArchivePath};
use crate::constants::upstream;
use crate::errors::{IoError, ParseError, ParseResult, Result};

/// Downloads a release asset into a temporary file
pub struct ArchiveFetcher<'a, H> {
    transport: &'a H,
    url_template: &'a str,
}

impl<'a, H: HttpTransport> ArchiveFetcher<'a, H> {
    pub fn new(transport: &'a H, url_template: &'a str) -> Self {
        Self {
            transport,
            url_template,
        }
    }

    /// Download URL for `version`
    pub fn download_url(&self, version: &ReleaseVersion) -> ParseResult<Url> {
        build_download_url(self.url_template, version)
    }

    /// Download the archive for `version` into `destination`
    ///
    /// Returns the URL that was fetched.
    ///
    /// # Errors
    ///
    /// Returns a parse error for an unusable tag, a network error on
    /// transport failure or non-success status, and `IoError::TempFileWrite`
    /// if the body cannot be written.
    pub async fn fetch(&self, version: &ReleaseVersion, destination: &TempArchivePath) -> Result<Url> {
        let url = self.download_url(version)?;
        tracing::info!("Downloading {} to {}", url, destination.path().display());

        let bytes = self.transport.get(&url).await?;

        tokio::fs::write(destination.path(), &bytes)
            .await
            .map_err(|source| IoError::TempFileWrite {
                path: destination.path().to_path_buf(),
                source,
            })?;

        tracing::debug!(
            "Wrote {} bytes to {}",
            bytes.len(),
            destination.path().display()
        );
        Ok(url)
    }
}

/// Substitute `version` into `template`
///
/// The tag is used verbatim as a single path segment, so characters that
/// would change the URL structure are rejected rather than escaped.
pub fn build_download_url(template: &str, version: &ReleaseVersion) -> ParseResult<Url> {
    let tag = version.as_str();
    let structural = |c: char| matches!(c, '/' | '\\' | '?' | '#') || c.is_whitespace();
    if tag.is_empty() || tag == "." || tag == ".." || tag.chars().any(structural) {
        return Err(ParseError::InvalidTag {
            tag: tag.to_string(),
        });
    }

    let raw = template.replace(upstream::VERSION_PLACEHOLDER, tag);
    Url::parse(&raw).map_err(|e| ParseError::InvalidUrl {
        url: raw,
        error: e.to_string(),
    })
}
