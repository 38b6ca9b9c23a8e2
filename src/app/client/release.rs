//! Latest release lookup
//!
//! The release index is a JSON array ordered newest first. Only the first
//! element's `tag_name` is used; nothing else in the payload is inspected.

use serde_json::Value;
use url::Url;

use crate::app::client::HttpTransport;
use crate::app::models::ReleaseVersion;
use crate::errors::{ParseError, ParseResult, Result};

/// Resolves the most recent release tag from the release index
pub struct VersionResolver<'a, H> {
    transport: &'a H,
    index_url: &'a str,
}

impl<'a, H: HttpTransport> VersionResolver<'a, H> {
    pub fn new(transport: &'a H, index_url: &'a str) -> Self {
        Self {
            transport,
            index_url,
        }
    }

    /// Issue one GET against the index and return the latest tag
    ///
    /// # Errors
    ///
    /// Returns a network error if the request fails and a parse error if
    /// the body is not a release list with a tagged first entry.
    pub async fn resolve_latest(&self) -> Result<ReleaseVersion> {
        let url = Url::parse(self.index_url).map_err(|e| ParseError::InvalidUrl {
            url: self.index_url.to_string(),
            error: e.to_string(),
        })?;

        tracing::info!("Looking up latest release from {}", url);
        let body = self.transport.get(&url).await?;
        let version = parse_release_list(&body)?;
        tracing::info!("Latest release is {}", version);

        Ok(version)
    }
}

/// Extract the first release's `tag_name` from a release-list body
pub fn parse_release_list(body: &[u8]) -> ParseResult<ReleaseVersion> {
    let releases: Vec<Value> = serde_json::from_slice(body)?;
    let latest = releases.first().ok_or(ParseError::EmptyReleaseList)?;

    latest
        .get("tag_name")
        .and_then(Value::as_str)
        .filter(|tag| !tag.is_empty())
        .map(ReleaseVersion::new)
        .ok_or(ParseError::MissingTagName)
}
