use std::sync::Arc;

use anyhow::{Context, Result};
use octocrab::Octocrab;

use crate::config::types::GitHubConfig;

/// Base URI for the configured host.
///
/// `api_base` wins when set; otherwise `github.com` uses octocrab's default
/// and any other host is treated as GitHub Enterprise.
pub fn api_base(config: &GitHubConfig) -> Option<String> {
    if let Some(ref base) = config.api_base {
        return Some(base.trim_end_matches('/').to_owned());
    }
    if config.host == "github.com" {
        None
    } else {
        Some(format!("https://{}/api/v3", config.host))
    }
}

/// Build the Octocrab instance used for every call of a run.
///
/// Without a token the client is unauthenticated, which GitHub heavily
/// rate-limits and which cannot create or delete projects.
pub fn build(config: &GitHubConfig, token: Option<String>) -> Result<Arc<Octocrab>> {
    let mut builder = Octocrab::builder();
    match token {
        Some(token) => builder = builder.personal_token(token),
        None => tracing::warn!(
            host = %config.host,
            "no GitHub token found; requests will be unauthenticated"
        ),
    }
    if let Some(base) = api_base(config) {
        builder = builder
            .base_uri(base)
            .context("setting API base URI")?;
    }

    let instance = builder.build().context("building octocrab instance")?;
    Ok(Arc::new(instance))
}
