use std::process::Command;

use anyhow::{Context, Result, bail};

/// Resolve a GitHub auth token for the given host.
///
/// Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. `gh auth token --hostname {host}` (gh CLI)
///
/// Returns `None` when nothing is found; callers then fall back to
/// unauthenticated requests.
pub fn resolve_token(host: &str) -> Option<String> {
    token_from_env(|name| std::env::var(name).ok()).or_else(|| token_from_gh_cli(host).ok())
}

fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    ["GITHUB_TOKEN", "GH_TOKEN"]
        .into_iter()
        .filter_map(lookup)
        .map(|token| token.trim().to_owned())
        .find(|token| !token.is_empty())
}

fn token_from_gh_cli(host: &str) -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .context("failed to run `gh auth token`")?;

    if !output.status.success() {
        bail!("gh auth token exited with non-zero status");
    }

    let token = String::from_utf8(output.stdout)
        .context("gh auth token produced non-UTF-8 output")?
        .trim()
        .to_owned();

    if token.is_empty() {
        bail!("gh auth token returned empty string");
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn github_token_wins() {
        let lookup = env(&[("GITHUB_TOKEN", "ghp_a"), ("GH_TOKEN", "ghp_b")]);
        assert_eq!(token_from_env(lookup).as_deref(), Some("ghp_a"));
    }

    #[test]
    fn gh_token_is_fallback() {
        let lookup = env(&[("GH_TOKEN", "ghp_b")]);
        assert_eq!(token_from_env(lookup).as_deref(), Some("ghp_b"));
    }

    #[test]
    fn empty_values_are_skipped() {
        let lookup = env(&[("GITHUB_TOKEN", "  "), ("GH_TOKEN", "ghp_b")]);
        assert_eq!(token_from_env(lookup).as_deref(), Some("ghp_b"));
    }

    #[test]
    fn nothing_set() {
        assert_eq!(token_from_env(env(&[])), None);
    }
}
