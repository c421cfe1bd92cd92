//! Application configuration constants
//!
//! Central place for endpoint URLs and network settings. Components take
//! their endpoints through [`crate::resolver::Endpoints`] so tests can
//! substitute a local server; these are the production defaults.

/// Application metadata
pub mod app {
    /// Application name
    pub const NAME: &str = "pbrp-resolver";

    /// User agent for upstream requests
    pub const USER_AGENT: &str = concat!("pbrp-resolver/", env!("CARGO_PKG_VERSION"));
}

/// Upstream source URLs
pub mod urls {
    /// Global vendor -> codename device registry document
    pub const DEVICE_REGISTRY: &str =
        "https://raw.githubusercontent.com/PitchBlackRecoveryProject/vendor_utils/pb/pb_devices.json";

    /// Base for per-device build index documents (`builds-{codename}.json`)
    pub const BUILD_INDEX_BASE: &str =
        "https://raw.githubusercontent.com/PitchBlackRecoveryProject/PitchBlackRecoveryProject.github.io/pb/assets/json";

    /// Base for per-device markdown pages (`{vendor}/{codename}.md`)
    pub const DEVICE_PAGE_BASE: &str =
        "https://raw.githubusercontent.com/PitchBlackRecoveryProject/PitchBlackRecoveryProject.github.io/pb/_oem";

    /// GitHub REST API root for release-asset lookups
    pub const RELEASE_API_BASE: &str = "https://api.github.com";

    /// Mirror RSS feed, scoped with a `?path=/{codename}` query
    pub const MIRROR_FEED_BASE: &str = "https://sourceforge.net/projects/pbrp/rss";

    /// Base for mirror file downloads (`{path}/download` appended)
    pub const MIRROR_FILES_BASE: &str = "https://sourceforge.net/projects/pbrp/files";
}

/// Network settings
pub mod net {
    /// Request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Logging settings
pub mod logging {
    /// Environment variable selecting the log level (error/warn/info/debug)
    pub const LEVEL_ENV: &str = "PBRP_LOG";
}
