//! Configuration for the install coordinator
//!
//! Everything that used to be hard-wired (theme list and release endpoints)
//! lives here, so callers and tests can point the coordinator elsewhere.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::models::is_simple_identifier;
use crate::constants::{themes, upstream};
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the install coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Themes the user may select; each is a directory under `templates/`
    pub theme_allow_list: Vec<String>,
    /// Releases-list JSON endpoint, newest release first
    pub release_index_url: String,
    /// Download URL with a `{version}` placeholder
    pub download_url_template: String,
    /// Upper bound on the whole post-extraction pipeline
    #[serde(with = "humantime_serde")]
    pub pipeline_timeout: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            theme_allow_list: themes::DEFAULT_ALLOW_LIST
                .iter()
                .map(|theme| theme.to_string())
                .collect(),
            release_index_url: upstream::RELEASE_INDEX_URL.to_string(),
            download_url_template: upstream::DOWNLOAD_URL_TEMPLATE.to_string(),
            pipeline_timeout: None,
        }
    }
}

impl CoordinatorConfig {
    /// Replace the theme allow-list
    pub fn with_themes<I, S>(mut self, themes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.theme_allow_list = themes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the releases-list endpoint
    pub fn with_release_index_url(mut self, url: impl Into<String>) -> Self {
        self.release_index_url = url.into();
        self
    }

    /// Set the download URL template
    pub fn with_download_url_template(mut self, template: impl Into<String>) -> Self {
        self.download_url_template = template.into();
        self
    }

    /// Bound the post-extraction pipeline
    pub fn with_pipeline_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline_timeout = Some(timeout);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.theme_allow_list.is_empty() {
            return Err(invalid(
                "installer.theme_allow_list",
                "[]",
                "At least one theme is required",
            ));
        }

        if let Some(theme) = self
            .theme_allow_list
            .iter()
            .find(|theme| !is_simple_identifier(theme))
        {
            return Err(invalid(
                "installer.theme_allow_list",
                theme,
                "Theme names may only contain letters, digits, '-' and '_'",
            ));
        }

        if let Err(e) = url::Url::parse(&self.release_index_url) {
            return Err(invalid(
                "installer.release_index_url",
                &self.release_index_url,
                &e.to_string(),
            ));
        }

        if !self
            .download_url_template
            .contains(upstream::VERSION_PLACEHOLDER)
        {
            return Err(invalid(
                "installer.download_url_template",
                &self.download_url_template,
                "Template must contain {version}",
            ));
        }

        if self.pipeline_timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(invalid(
                "installer.pipeline_timeout",
                "0s",
                "Pipeline timeout cannot be zero",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
