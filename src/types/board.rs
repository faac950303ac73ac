use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::url::ContentKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectState {
    #[default]
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

impl ProjectState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Board entities
// ---------------------------------------------------------------------------

/// A classic project board.
///
/// `id` is the global identifier used by the `/projects/{id}` routes;
/// `number` is the repository- or organization-relative display number
/// shown in the board's URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub number: u64,
    pub name: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub state: ProjectState,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: u64,
    pub name: String,
}

/// A card as listed from a column.
///
/// Note cards carry `note`; issue and pull request cards carry
/// `content_url` pointing at the API resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
}

impl Card {
    /// The card's note, treating an empty note as absent.
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}

/// An issue or pull request looked up to obtain its database id.
///
/// Pull request cards usually point at the `/issues/N` route; the issue
/// returned there carries a `pull_request` link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: u64,
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestLink>,
}

impl ContentItem {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestLink {
    #[serde(default)]
    pub url: String,
}

// ---------------------------------------------------------------------------
// Creation payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub body: Option<String>,
}

impl NewProject {
    pub fn from_source(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            body: project.body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewCard {
    Note(String),
    Content { id: u64, kind: ContentKind },
}

impl NewCard {
    /// Request body for `POST /projects/columns/{column_id}/cards`.
    pub fn to_payload(&self) -> serde_json::Value {
        match self {
            Self::Note(note) => serde_json::json!({ "note": note }),
            Self::Content { id, kind } => serde_json::json!({
                "content_id": id,
                "content_type": kind.as_str(),
            }),
        }
    }
}
