use std::fmt;

use thiserror::Error;

/// A repository identified as `org/repo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgRepo {
    pub org: String,
    pub repo: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected orgrepo like org/repo but got {0:?}")]
pub struct OrgRepoError(pub String);

impl OrgRepo {
    /// Split `org/repo` into its two parts.
    ///
    /// Exactly one `/` is accepted and neither side may be empty.
    pub fn parse(s: &str) -> Result<Self, OrgRepoError> {
        let make_err = || OrgRepoError(s.to_owned());

        let (org, repo) = s.split_once('/').ok_or_else(make_err)?;
        if org.is_empty() || repo.is_empty() || repo.contains('/') {
            return Err(make_err());
        }
        Ok(Self {
            org: org.to_owned(),
            repo: repo.to_owned(),
        })
    }
}

impl fmt::Display for OrgRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}

/// The kind of content a project card points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Issue,
    PullRequest,
}

impl ContentKind {
    /// Value expected by the card-creation `content_type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::PullRequest => "PullRequest",
        }
    }
}

/// Issue (or pull request) reference extracted from a card's `content_url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRef {
    pub number: u64,
    pub kind: ContentKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("could not parse an issue number from content url {url:?}")]
pub struct ContentUrlError {
    pub url: String,
}

impl ContentRef {
    /// Parse the trailing `/<number>` of a content URL such as
    /// `https://api.github.com/repos/owner/repo/issues/42`.
    ///
    /// Query strings, fragments and a trailing slash are stripped first.
    /// A `pulls` segment before the number marks a pull request; anything
    /// else is treated as an issue.
    pub fn parse(url: &str) -> Result<Self, ContentUrlError> {
        let make_err = || ContentUrlError {
            url: url.to_owned(),
        };

        let path = url.split_once('?').map_or(url, |(p, _)| p);
        let path = path.split_once('#').map_or(path, |(p, _)| p);
        let path = path.strip_suffix('/').unwrap_or(path);

        let mut segments = path.rsplit('/');
        let number = segments
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(make_err)?;
        let kind = match segments.next() {
            Some("pulls") => ContentKind::PullRequest,
            _ => ContentKind::Issue,
        };
        Ok(Self { number, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_org_repo() {
        assert_eq!(
            OrgRepo::parse("lytics/lio"),
            Ok(OrgRepo {
                org: "lytics".to_owned(),
                repo: "lio".to_owned(),
            })
        );
    }

    #[test]
    fn org_repo_display_round_trips() {
        let parsed = OrgRepo::parse("rust-lang/rust").unwrap();
        assert_eq!(parsed.to_string(), "rust-lang/rust");
    }

    #[test]
    fn org_repo_without_slash_fails() {
        assert!(OrgRepo::parse("lytics").is_err());
        assert!(OrgRepo::parse("").is_err());
    }

    #[test]
    fn org_repo_with_two_slashes_fails() {
        assert!(OrgRepo::parse("a/b/c").is_err());
        assert!(OrgRepo::parse("a//b").is_err());
    }

    #[test]
    fn org_repo_with_empty_side_fails() {
        assert!(OrgRepo::parse("/repo").is_err());
        assert!(OrgRepo::parse("org/").is_err());
        assert!(OrgRepo::parse("/").is_err());
    }

    #[test]
    fn org_repo_error_mentions_input() {
        let err = OrgRepo::parse("nope").unwrap_err();
        assert!(err.to_string().contains("\"nope\""));
    }

    #[test]
    fn parse_issue_content_url() {
        let r = ContentRef::parse("https://api.github.com/repos/acme/widgets/issues/42").unwrap();
        assert_eq!(r.number, 42);
        assert_eq!(r.kind, ContentKind::Issue);
    }

    #[test]
    fn parse_pull_content_url() {
        let r = ContentRef::parse("https://api.github.com/repos/acme/widgets/pulls/7").unwrap();
        assert_eq!(r.number, 7);
        assert_eq!(r.kind, ContentKind::PullRequest);
    }

    #[test]
    fn parse_content_url_accepts_any_non_negative_number() {
        for n in [0_u64, 1, 9, 10, 12_345, u64::from(u32::MAX) + 1] {
            let url = format!("https://api.github.com/repos/o/r/issues/{n}");
            assert_eq!(ContentRef::parse(&url).unwrap().number, n);
        }
    }

    #[test]
    fn parse_content_url_strips_trailing_slash_and_query() {
        let r = ContentRef::parse("https://api.github.com/repos/o/r/issues/3/?x=1#frag").unwrap();
        assert_eq!(r.number, 3);
    }

    #[test]
    fn parse_content_url_bare_number() {
        assert_eq!(ContentRef::parse("15").unwrap().number, 15);
    }

    #[test]
    fn parse_content_url_non_numeric_fails() {
        assert!(ContentRef::parse("https://api.github.com/repos/o/r/issues/abc").is_err());
        assert!(ContentRef::parse("https://api.github.com/repos/o/r/issues/-1").is_err());
        assert!(ContentRef::parse("").is_err());
    }

    #[test]
    fn content_kind_strings() {
        assert_eq!(ContentKind::Issue.as_str(), "Issue");
        assert_eq!(ContentKind::PullRequest.as_str(), "PullRequest");
    }
}
