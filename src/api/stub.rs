use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow, bail};

use crate::types::{
    Card, Column, ContentItem, NewCard, NewProject, Project, ProjectState, PullRequestLink,
};
use crate::url::{ContentKind, ContentRef, OrgRepo};

use super::interface::{ProjectApi, RequestContext};

/// Who a stub project belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Repo(OrgRepo),
    Org(String),
}

/// A card as stored by the stub.
///
/// Seeded cards carry `note` or `content_url`; cards created through
/// `create_card` also keep the request that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubCard {
    pub card: Card,
    pub created_from: Option<NewCard>,
}

#[derive(Debug)]
struct StubProject {
    project: Project,
    owner: Owner,
    columns: Vec<u64>,
}

#[derive(Debug)]
struct StubColumn {
    column: Column,
    cards: Vec<StubCard>,
}

#[derive(Debug, Clone, Copy)]
struct StubContent {
    id: u64,
    /// Set on the issue side of a pull request.
    backs_pull_request: bool,
}

#[derive(Debug, Default)]
struct StubState {
    next_id: u64,
    projects: Vec<StubProject>,
    columns: HashMap<u64, StubColumn>,
    content: HashMap<(String, String, ContentKind, u64), StubContent>,
    deleted: Vec<u64>,
    failing_columns: HashSet<String>,
    failing_notes: HashSet<String>,
    failing_calls: Vec<String>,
    calls: Vec<String>,
}

impl StubState {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn project_mut(&mut self, project_id: u64) -> Result<&mut StubProject> {
        self.projects
            .iter_mut()
            .find(|p| p.project.id == project_id)
            .ok_or_else(|| anyhow!("stub: no project with id {project_id}"))
    }

    fn column_mut(&mut self, column_id: u64) -> Result<&mut StubColumn> {
        self.columns
            .get_mut(&column_id)
            .ok_or_else(|| anyhow!("stub: no column with id {column_id}"))
    }

    fn insert_project(&mut self, owner: Owner, number: u64, name: &str, body: Option<&str>) -> u64 {
        let id = self.alloc_id();
        self.projects.push(StubProject {
            project: Project {
                id,
                number,
                name: name.to_owned(),
                body: body.map(str::to_owned),
                state: ProjectState::Open,
                html_url: String::new(),
                created_at: None,
            },
            owner,
            columns: Vec::new(),
        });
        id
    }

    fn insert_column(&mut self, project_id: u64, name: &str) -> Result<u64> {
        let id = self.alloc_id();
        self.project_mut(project_id)?.columns.push(id);
        self.columns.insert(
            id,
            StubColumn {
                column: Column {
                    id,
                    name: name.to_owned(),
                },
                cards: Vec::new(),
            },
        );
        Ok(id)
    }

    fn insert_card(&mut self, column_id: u64, card: StubCard) -> Result<()> {
        self.column_mut(column_id)?.cards.push(card);
        Ok(())
    }

    fn insert_content(
        &mut self,
        repo: &OrgRepo,
        kind: ContentKind,
        number: u64,
        content: StubContent,
    ) {
        self.content
            .insert((repo.org.clone(), repo.repo.clone(), kind, number), content);
    }
}

/// An in-memory classic-projects backend with no network access.
///
/// Seed it with the `add_*` methods, run the copier against it, then inspect
/// the result. Every API call is recorded in `calls()`.
#[derive(Debug, Default)]
pub struct StubProjects {
    state: RefCell<StubState>,
}

impl StubProjects {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    pub fn add_repo_project(
        &self,
        repo: &OrgRepo,
        number: u64,
        name: &str,
        body: Option<&str>,
    ) -> u64 {
        self.state
            .borrow_mut()
            .insert_project(Owner::Repo(repo.clone()), number, name, body)
    }

    pub fn add_org_project(&self, org: &str, number: u64, name: &str) -> u64 {
        self.state
            .borrow_mut()
            .insert_project(Owner::Org(org.to_owned()), number, name, None)
    }

    /// # Panics
    ///
    /// Panics if `project_id` was not seeded.
    pub fn add_column(&self, project_id: u64, name: &str) -> u64 {
        self.state
            .borrow_mut()
            .insert_column(project_id, name)
            .expect("seeding column into unknown project")
    }

    /// # Panics
    ///
    /// Panics if `column_id` was not seeded.
    pub fn add_note_card(&self, column_id: u64, note: &str) -> u64 {
        self.add_card(column_id, Some(note), None)
    }

    /// # Panics
    ///
    /// Panics if `column_id` was not seeded.
    pub fn add_content_card(&self, column_id: u64, content_url: &str) -> u64 {
        self.add_card(column_id, None, Some(content_url))
    }

    fn add_card(&self, column_id: u64, note: Option<&str>, content_url: Option<&str>) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.alloc_id();
        let card = StubCard {
            card: Card {
                id,
                note: note.map(str::to_owned),
                content_url: content_url.map(str::to_owned),
            },
            created_from: None,
        };
        state
            .insert_card(column_id, card)
            .expect("seeding card into unknown column");
        id
    }

    /// Register an issue so that `get_content` can resolve it.
    pub fn add_issue(&self, repo: &OrgRepo, number: u64, id: u64) {
        let mut state = self.state.borrow_mut();
        let content = StubContent {
            id,
            backs_pull_request: false,
        };
        state.insert_content(repo, ContentKind::Issue, number, content);
    }

    /// Register a pull request under `/pulls/{number}` with database id `id`.
    ///
    /// Like GitHub, the same number also resolves under `/issues`, to an
    /// issue with its own id that links back to the pull request.
    pub fn add_pull_request(&self, repo: &OrgRepo, number: u64, id: u64) {
        let mut state = self.state.borrow_mut();
        let issue_id = state.alloc_id();
        state.insert_content(
            repo,
            ContentKind::Issue,
            number,
            StubContent {
                id: issue_id,
                backs_pull_request: true,
            },
        );
        state.insert_content(
            repo,
            ContentKind::PullRequest,
            number,
            StubContent {
                id,
                backs_pull_request: false,
            },
        );
    }

    /// Make `create_column` fail for columns with this name.
    pub fn fail_column_named(&self, name: &str) {
        self.state
            .borrow_mut()
            .failing_columns
            .insert(name.to_owned());
    }

    /// Make `create_card` fail for note cards with this text.
    pub fn fail_note(&self, note: &str) {
        self.state.borrow_mut().failing_notes.insert(note.to_owned());
    }

    /// Make every call whose `calls()` entry starts with `prefix` fail,
    /// e.g. `"list_cards"` or `"delete_project 7"`. The call is still logged.
    pub fn fail_calls(&self, prefix: &str) {
        self.state
            .borrow_mut()
            .failing_calls
            .push(prefix.to_owned());
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn org_projects(&self, org: &str) -> Vec<Project> {
        let owner = Owner::Org(org.to_owned());
        self.state
            .borrow()
            .projects
            .iter()
            .filter(|p| p.owner == owner)
            .map(|p| p.project.clone())
            .collect()
    }

    pub fn columns(&self, project_id: u64) -> Vec<Column> {
        let state = self.state.borrow();
        state
            .projects
            .iter()
            .find(|p| p.project.id == project_id)
            .map(|p| {
                p.columns
                    .iter()
                    .filter_map(|id| state.columns.get(id))
                    .map(|c| c.column.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn cards(&self, column_id: u64) -> Vec<StubCard> {
        self.state
            .borrow()
            .columns
            .get(&column_id)
            .map(|c| c.cards.clone())
            .unwrap_or_default()
    }

    /// Ids passed to `delete_project`, in call order.
    pub fn deleted(&self) -> Vec<u64> {
        self.state.borrow().deleted.clone()
    }

    /// Every API call received, e.g. `"create_column 7 To Do"`.
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let rejected = state
            .failing_calls
            .iter()
            .any(|p| call.starts_with(p.as_str()));
        let err = rejected.then(|| anyhow!("stub: {call} rejected"));
        state.calls.push(call);
        err.map_or(Ok(()), Err)
    }
}

impl ProjectApi for StubProjects {
    async fn list_repo_projects(
        &self,
        _ctx: &RequestContext,
        repo: &OrgRepo,
    ) -> Result<Vec<Project>> {
        self.record(format!("list_repo_projects {repo}"))?;
        let owner = Owner::Repo(repo.clone());
        Ok(self
            .state
            .borrow()
            .projects
            .iter()
            .filter(|p| p.owner == owner)
            .map(|p| p.project.clone())
            .collect())
    }

    async fn list_org_projects(&self, _ctx: &RequestContext, org: &str) -> Result<Vec<Project>> {
        self.record(format!("list_org_projects {org}"))?;
        Ok(self.org_projects(org))
    }

    async fn create_org_project(
        &self,
        _ctx: &RequestContext,
        org: &str,
        project: &NewProject,
    ) -> Result<Project> {
        self.record(format!("create_org_project {org} {}", project.name))?;
        let mut state = self.state.borrow_mut();
        let owner = Owner::Org(org.to_owned());
        let number = state.projects.iter().filter(|p| p.owner == owner).count() as u64 + 1;
        let id = state.insert_project(owner, number, &project.name, project.body.as_deref());
        Ok(state.project_mut(id)?.project.clone())
    }

    async fn delete_project(&self, _ctx: &RequestContext, project_id: u64) -> Result<()> {
        self.record(format!("delete_project {project_id}"))?;
        let mut state = self.state.borrow_mut();
        let before = state.projects.len();
        state.projects.retain(|p| p.project.id != project_id);
        if state.projects.len() == before {
            bail!("stub: no project with id {project_id}");
        }
        state.deleted.push(project_id);
        Ok(())
    }

    async fn list_columns(&self, _ctx: &RequestContext, project_id: u64) -> Result<Vec<Column>> {
        self.record(format!("list_columns {project_id}"))?;
        self.state.borrow_mut().project_mut(project_id)?;
        Ok(self.columns(project_id))
    }

    async fn create_column(
        &self,
        _ctx: &RequestContext,
        project_id: u64,
        name: &str,
    ) -> Result<Column> {
        self.record(format!("create_column {project_id} {name}"))?;
        let mut state = self.state.borrow_mut();
        if state.failing_columns.contains(name) {
            bail!("stub: column {name:?} rejected");
        }
        let id = state.insert_column(project_id, name)?;
        Ok(Column {
            id,
            name: name.to_owned(),
        })
    }

    async fn list_cards(&self, _ctx: &RequestContext, column_id: u64) -> Result<Vec<Card>> {
        self.record(format!("list_cards {column_id}"))?;
        let mut state = self.state.borrow_mut();
        Ok(state
            .column_mut(column_id)?
            .cards
            .iter()
            .map(|c| c.card.clone())
            .collect())
    }

    async fn create_card(
        &self,
        _ctx: &RequestContext,
        column_id: u64,
        card: &NewCard,
    ) -> Result<Card> {
        self.record(format!("create_card {column_id}"))?;
        let mut state = self.state.borrow_mut();
        if let NewCard::Note(note) = card
            && state.failing_notes.contains(note)
        {
            bail!("stub: card {note:?} rejected");
        }
        let id = state.alloc_id();
        let created = Card {
            id,
            note: match card {
                NewCard::Note(note) => Some(note.clone()),
                NewCard::Content { .. } => None,
            },
            content_url: None,
        };
        state.insert_card(
            column_id,
            StubCard {
                card: created.clone(),
                created_from: Some(card.clone()),
            },
        )?;
        Ok(created)
    }

    async fn get_content(
        &self,
        _ctx: &RequestContext,
        repo: &OrgRepo,
        content: ContentRef,
    ) -> Result<ContentItem> {
        self.record(format!("get_content {repo} {}", content.number))?;
        let key = (
            repo.org.clone(),
            repo.repo.clone(),
            content.kind,
            content.number,
        );
        let found = self
            .state
            .borrow()
            .content
            .get(&key)
            .copied()
            .ok_or_else(|| anyhow!("stub: {repo}#{} not found", content.number))?;
        Ok(ContentItem {
            id: found.id,
            number: content.number,
            pull_request: found.backs_pull_request.then(|| PullRequestLink {
                url: format!(
                    "https://api.github.com/repos/{}/{}/pulls/{}",
                    repo.org, repo.repo, content.number
                ),
            }),
        })
    }
}
