use std::future::Future;
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::types::{Card, Column, ContentItem, NewCard, NewProject, Project};
use crate::url::{ContentRef, OrgRepo};

/// Per-call context threaded through every network operation.
///
/// Carries an optional deadline applied to each call individually.
/// Whole-run cancellation (Ctrl-C) happens one level up, in `main`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    timeout: Option<Duration>,
}

impl RequestContext {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drive `fut` to completion, failing with a timeout error if the
    /// deadline passes first.
    pub async fn run<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.timeout {
            None => fut.await,
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| anyhow!("{what}: timed out after {limit:?}"))?,
        }
    }
}

/// Operations the copier needs from GitHub.
///
/// Implemented by `GitHubProjects` (octocrab) and `StubProjects` (in memory).
#[allow(async_fn_in_trait)]
pub trait ProjectApi {
    async fn list_repo_projects(&self, ctx: &RequestContext, repo: &OrgRepo)
    -> Result<Vec<Project>>;

    async fn list_org_projects(&self, ctx: &RequestContext, org: &str) -> Result<Vec<Project>>;

    async fn create_org_project(
        &self,
        ctx: &RequestContext,
        org: &str,
        project: &NewProject,
    ) -> Result<Project>;

    async fn delete_project(&self, ctx: &RequestContext, project_id: u64) -> Result<()>;

    async fn list_columns(&self, ctx: &RequestContext, project_id: u64) -> Result<Vec<Column>>;

    async fn create_column(
        &self,
        ctx: &RequestContext,
        project_id: u64,
        name: &str,
    ) -> Result<Column>;

    async fn list_cards(&self, ctx: &RequestContext, column_id: u64) -> Result<Vec<Card>>;

    async fn create_card(
        &self,
        ctx: &RequestContext,
        column_id: u64,
        card: &NewCard,
    ) -> Result<Card>;

    /// Look up the issue or pull request a card points at.
    async fn get_content(
        &self,
        ctx: &RequestContext,
        repo: &OrgRepo,
        content: ContentRef,
    ) -> Result<ContentItem>;
}
