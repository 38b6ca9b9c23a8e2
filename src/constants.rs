//! Application constants for the MyLar installer
//!
//! This module centralizes all constants used throughout the installer,
//! organized by functional domain. Values that callers may want to swap
//! out (endpoints, theme list) are only defaults: the coordinator receives
//! them through its configuration struct.

use std::time::Duration;

/// Environment variable names used for configuration overrides
pub mod env {
    /// Overrides the releases-list endpoint
    pub const RELEASE_INDEX_URL: &str = "MYLAR_RELEASE_INDEX_URL";

    /// Overrides the per-version download URL template
    pub const DOWNLOAD_URL_TEMPLATE: &str = "MYLAR_DOWNLOAD_URL_TEMPLATE";
}

/// Upstream project identity and release endpoints
pub mod upstream {
    /// Releases-list JSON endpoint
    pub const RELEASE_INDEX_URL: &str = "https://api.github.com/repos/vietdien2005/mylar/releases";

    /// Release asset download URL; `{version}` is replaced by the release tag
    pub const DOWNLOAD_URL_TEMPLATE: &str =
        "https://github.com/vietdien2005/mylar/releases/download/{version}/latest.zip";

    /// Placeholder substituted in the download URL template
    pub const VERSION_PLACEHOLDER: &str = "{version}";
}

/// Theme selection
pub mod themes {
    /// Themes shipped in the upstream `templates/` tree
    pub const DEFAULT_ALLOW_LIST: &[&str] = &["flatlab", "lte"];
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent (GitHub's API rejects requests without one)
    pub const USER_AGENT: &str = "MyLar-Installer/0.1.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// File naming for installer-owned files
pub mod files {
    /// Prefix of the temporary release archive
    pub const TEMP_ARCHIVE_PREFIX: &str = "mylar_";

    /// Extension of the temporary release archive
    pub const TEMP_ARCHIVE_EXTENSION: &str = "zip";

    /// Local composer phar looked up in the working directory
    pub const COMPOSER_PHAR: &str = "composer.phar";

    /// Config file name under the user config directory
    pub const CONFIG_FILE_NAME: &str = "config.toml";

    /// Application directory under the user config directory
    pub const CONFIG_DIR_NAME: &str = "mylar";

    /// Permission mode applied before deleting the temporary archive (Unix only)
    #[cfg(unix)]
    pub const CLEANUP_PERMISSIONS: u32 = 0o777;
}

/// Conventional paths inside the extracted project tree
pub mod layout {
    /// Default asset directory replaced by the theme's assets
    pub const ASSETS_DIR: &str = "resources/assets";

    /// Default view directory replaced by the theme's views
    pub const VIEWS_DIR: &str = "resources/views";

    /// Directory holding every shipped theme
    pub const TEMPLATES_DIR: &str = "templates";

    /// Theme-level asset directory name
    pub const THEME_ASSETS: &str = "assets";

    /// Theme-level view directory name
    pub const THEME_VIEWS: &str = "views";

    /// Build-tool configuration promoted to the project root
    pub const BUILD_CONFIG: &str = "webpack.mix.js";
}

/// External tools driven by the pipeline
pub mod tools {
    /// JS package manager, required on PATH
    pub const YARN: &str = "yarn";

    /// PHP dependency manager looked up when no local phar exists
    pub const COMPOSER: &str = "composer";

    /// PHP interpreter used to run a local `composer.phar`
    pub const PHP: &str = "php";

    /// Install hint shown when yarn is missing
    pub const YARN_INSTALL_HINT: &str = "You must install Yarn from https://yarnpkg.com";
}

/// Logging constants
pub mod logging {
    /// Tracing target directive for this crate
    pub const CRATE_TARGET: &str = "mylar_installer";
}
