use std::sync::Arc;

use anyhow::Result;
use octocrab::Octocrab;

use crate::config::types::GitHubConfig;
use crate::github::{auth, client, projects};
use crate::types::{Card, Column, ContentItem, NewCard, NewProject, Project};
use crate::url::{ContentKind, ContentRef, OrgRepo};

use super::interface::{ProjectApi, RequestContext};

/// The real GitHub backend, one Octocrab instance per run.
pub struct GitHubProjects {
    octocrab: Arc<Octocrab>,
    per_page: u8,
}

impl GitHubProjects {
    pub fn new(octocrab: Arc<Octocrab>, per_page: u8) -> Self {
        Self { octocrab, per_page }
    }

    /// Resolve a token for the configured host and build the client.
    pub fn connect(config: &GitHubConfig) -> Result<Self> {
        let token = auth::resolve_token(&config.host);
        let octocrab = client::build(config, token)?;
        Ok(Self::new(octocrab, config.per_page()))
    }
}

impl ProjectApi for GitHubProjects {
    async fn list_repo_projects(
        &self,
        ctx: &RequestContext,
        repo: &OrgRepo,
    ) -> Result<Vec<Project>> {
        ctx.run(
            "list repository projects",
            projects::list_repo_projects(&self.octocrab, &repo.org, &repo.repo, self.per_page),
        )
        .await
    }

    async fn list_org_projects(&self, ctx: &RequestContext, org: &str) -> Result<Vec<Project>> {
        ctx.run(
            "list organization projects",
            projects::list_org_projects(&self.octocrab, org, self.per_page),
        )
        .await
    }

    async fn create_org_project(
        &self,
        ctx: &RequestContext,
        org: &str,
        project: &NewProject,
    ) -> Result<Project> {
        ctx.run(
            "create project",
            projects::create_org_project(&self.octocrab, org, project),
        )
        .await
    }

    async fn delete_project(&self, ctx: &RequestContext, project_id: u64) -> Result<()> {
        ctx.run(
            "delete project",
            projects::delete_project(&self.octocrab, project_id),
        )
        .await
    }

    async fn list_columns(&self, ctx: &RequestContext, project_id: u64) -> Result<Vec<Column>> {
        ctx.run(
            "list columns",
            projects::list_columns(&self.octocrab, project_id, self.per_page),
        )
        .await
    }

    async fn create_column(
        &self,
        ctx: &RequestContext,
        project_id: u64,
        name: &str,
    ) -> Result<Column> {
        ctx.run(
            "create column",
            projects::create_column(&self.octocrab, project_id, name),
        )
        .await
    }

    async fn list_cards(&self, ctx: &RequestContext, column_id: u64) -> Result<Vec<Card>> {
        ctx.run(
            "list cards",
            projects::list_cards(&self.octocrab, column_id, self.per_page),
        )
        .await
    }

    async fn create_card(
        &self,
        ctx: &RequestContext,
        column_id: u64,
        card: &NewCard,
    ) -> Result<Card> {
        ctx.run(
            "create card",
            projects::create_card(&self.octocrab, column_id, card),
        )
        .await
    }

    async fn get_content(
        &self,
        ctx: &RequestContext,
        repo: &OrgRepo,
        content: ContentRef,
    ) -> Result<ContentItem> {
        match content.kind {
            ContentKind::Issue => {
                ctx.run(
                    "get issue",
                    projects::get_issue(&self.octocrab, &repo.org, &repo.repo, content.number),
                )
                .await
            }
            ContentKind::PullRequest => {
                ctx.run(
                    "get pull request",
                    projects::get_pull_request(
                        &self.octocrab,
                        &repo.org,
                        &repo.repo,
                        content.number,
                    ),
                )
                .await
            }
        }
    }
}
