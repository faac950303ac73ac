// copier module: replays a classic project board into another organization.

mod report;

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::api::{ProjectApi, RequestContext};
use crate::prompt::ConsolePrompt;
use crate::types::{Card, Column, NewCard, NewProject, Project};
use crate::url::{ContentKind, ContentRef, OrgRepo};

pub use report::{CopyOutcome, CopyReport};

/// What to copy and where.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Repository the source project lives in.
    pub source: OrgRepo,
    /// Organization receiving the copy.
    pub dest_org: String,
    /// Display number of the source project (not its id).
    pub project_number: i64,
    /// Offer to delete destination projects with the same name first.
    pub delete_existing: bool,
    /// Abort on the first column or card creation failure.
    pub strict: bool,
}

/// Copies one project board through a `ProjectApi`.
pub struct ProjectCopier<A, R, W> {
    api: A,
    ctx: RequestContext,
    prompt: ConsolePrompt<R, W>,
    options: CopyOptions,
}

impl<A: ProjectApi, R: BufRead + Send + 'static, W: Write> ProjectCopier<A, R, W> {
    pub fn new(
        api: A,
        ctx: RequestContext,
        prompt: ConsolePrompt<R, W>,
        options: CopyOptions,
    ) -> Self {
        Self {
            api,
            ctx,
            prompt,
            options,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Consume the copier, returning its API handle and prompt.
    pub fn into_parts(self) -> (A, ConsolePrompt<R, W>) {
        (self.api, self.prompt)
    }

    /// Run the whole copy.
    ///
    /// Returns `CopyOutcome::NotFound` without touching the destination when
    /// no source project has the configured number.
    pub async fn run(&mut self) -> Result<CopyOutcome> {
        let Some(source) = self.find_source_project().await? else {
            tracing::warn!(
                number = self.options.project_number,
                repo = %self.options.source,
                "no project with this number; nothing copied"
            );
            return Ok(CopyOutcome::NotFound);
        };
        tracing::info!(
            id = source.id,
            name = %source.name,
            "found source project #{}",
            source.number
        );

        if self.options.delete_existing {
            self.delete_same_named(&source).await?;
        }

        let dest = self.create_project(&source).await?;
        let mut report = CopyReport::new(dest);
        self.copy_columns(&source, &mut report).await?;

        report.log_summary();
        Ok(CopyOutcome::Copied(report))
    }

    async fn find_source_project(&self) -> Result<Option<Project>> {
        let repo = &self.options.source;
        tracing::debug!(
            "getting org={:?} repo={:?} project number {}",
            repo.org,
            repo.repo,
            self.options.project_number
        );
        let projects = self
            .api
            .list_repo_projects(&self.ctx, repo)
            .await
            .with_context(|| format!("could not list projects of {repo}"))?;

        let wanted = u64::try_from(self.options.project_number).ok();
        Ok(projects
            .into_iter()
            .find(|p| Some(p.number) == wanted))
    }

    async fn delete_same_named(&mut self, source: &Project) -> Result<()> {
        let org = self.options.dest_org.clone();
        let existing = self
            .api
            .list_org_projects(&self.ctx, &org)
            .await
            .with_context(|| format!("could not list projects of org {org}"))?;

        for project in existing.iter().filter(|p| p.name == source.name) {
            tracing::warn!(
                id = project.id,
                "about to delete project {:?} in org {org:?}",
                project.name
            );
            let question = format!(
                "Delete existing project {:?} (id {}) in org {org:?}?",
                project.name, project.id
            );
            if !self.prompt.confirm(&question).await? {
                tracing::info!(id = project.id, "keeping existing project");
                continue;
            }
            self.api
                .delete_project(&self.ctx, project.id)
                .await
                .with_context(|| format!("could not delete project {}", project.id))?;
            tracing::info!(id = project.id, "deleted project {:?}", project.name);
        }
        Ok(())
    }

    async fn create_project(&self, source: &Project) -> Result<Project> {
        let org = &self.options.dest_org;
        let created = self
            .api
            .create_org_project(&self.ctx, org, &NewProject::from_source(source))
            .await
            .with_context(|| format!("could not create project {:?} in org {org}", source.name))?;
        tracing::info!(
            id = created.id,
            "created project {:?} in org {org}",
            created.name
        );
        Ok(created)
    }

    async fn copy_columns(&self, source: &Project, report: &mut CopyReport) -> Result<()> {
        let columns = self
            .api
            .list_columns(&self.ctx, source.id)
            .await
            .context("could not get project columns")?;

        for column in &columns {
            tracing::debug!("Column: {:<9} {}", column.id, column.name);

            let new_column = match self
                .api
                .create_column(&self.ctx, report.project.id, &column.name)
                .await
            {
                Ok(c) => Some(c),
                Err(e) => {
                    let e = e.context(format!("could not create column {:?}", column.name));
                    if self.options.strict {
                        return Err(e);
                    }
                    tracing::warn!("{e:#}");
                    report.record_failure(&e);
                    None
                }
            };

            let cards = self
                .api
                .list_cards(&self.ctx, column.id)
                .await
                .with_context(|| format!("could not get cards of column {:?}", column.name))?;

            match new_column {
                Some(new_column) => {
                    report.columns_created += 1;
                    self.copy_cards(column, &new_column, &cards, report).await?;
                }
                None => {
                    tracing::warn!(
                        "column {:?} was not created; skipping its {} card(s)",
                        column.name,
                        cards.len()
                    );
                    report.cards_skipped += cards.len();
                }
            }
        }
        Ok(())
    }

    async fn copy_cards(
        &self,
        column: &Column,
        new_column: &Column,
        cards: &[Card],
        report: &mut CopyReport,
    ) -> Result<()> {
        for card in cards {
            tracing::debug!(
                "Card: {:<9} {}  {}",
                card.id,
                card.note.as_deref().unwrap_or_default(),
                card.content_url.as_deref().unwrap_or_default()
            );
            let new_card = self.resolve_card(card).await?;

            match self
                .api
                .create_card(&self.ctx, new_column.id, &new_card)
                .await
            {
                Ok(_) => report.cards_created += 1,
                Err(e) => {
                    let e = e.context(format!(
                        "could not create card {} in column {:?}",
                        card.id, column.name
                    ));
                    if self.options.strict {
                        return Err(e);
                    }
                    tracing::warn!("{e:#}");
                    report.record_failure(&e);
                }
            }
        }
        Ok(())
    }

    /// Turn a listed card into a creation request.
    ///
    /// Content cards are looked up in the source repository: card creation
    /// takes the issue's database id, not its number. An issue that backs a
    /// pull request is fetched again through `/pulls` for the PR's own id.
    async fn resolve_card(&self, card: &Card) -> Result<NewCard> {
        if let Some(note) = card.note_text() {
            return Ok(NewCard::Note(note.to_owned()));
        }

        let Some(url) = card.content_url.as_deref() else {
            bail!("card {} has neither a note nor content", card.id);
        };
        let content = ContentRef::parse(url)?;
        let item = self
            .api
            .get_content(&self.ctx, &self.options.source, content)
            .await
            .with_context(|| format!("could not get issue {} for card {}", content.number, card.id))?;

        if content.kind == ContentKind::Issue && item.is_pull_request() {
            let pull = ContentRef {
                number: content.number,
                kind: ContentKind::PullRequest,
            };
            let item = self
                .api
                .get_content(&self.ctx, &self.options.source, pull)
                .await
                .with_context(|| {
                    format!(
                        "could not get pull request {} for card {}",
                        content.number, card.id
                    )
                })?;
            return Ok(NewCard::Content {
                id: item.id,
                kind: ContentKind::PullRequest,
            });
        }

        Ok(NewCard::Content {
            id: item.id,
            kind: content.kind,
        })
    }
}
