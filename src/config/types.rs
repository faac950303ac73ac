use std::time::Duration;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub github: GitHubConfig,
    pub copy: CopyConfig,
}

// ---------------------------------------------------------------------------
// GitHub connection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// `github.com` or a GitHub Enterprise host.
    pub host: String,
    /// Explicit API base URI; overrides the one derived from `host`.
    pub api_base: Option<String>,
    /// Per-request timeout in seconds. `0` disables the timeout.
    pub request_timeout_secs: u64,
    /// Items requested per listing call. Only the first page is read.
    pub page_size: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_owned(),
            api_base: None,
            request_timeout_secs: 30,
            page_size: 100,
        }
    }
}

impl GitHubConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// `page_size` clamped to the range GitHub accepts.
    #[allow(clippy::cast_possible_truncation)]
    pub fn per_page(&self) -> u8 {
        self.page_size.clamp(1, 100) as u8
    }
}

// ---------------------------------------------------------------------------
// Copy behavior
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Treat column and card creation failures as fatal.
    pub strict: bool,
}
