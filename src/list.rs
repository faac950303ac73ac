use std::io::Write;

use anyhow::{Context, Result};

use crate::api::{ProjectApi, RequestContext};
use crate::types::Project;
use crate::url::OrgRepo;

/// Whose projects to list.
#[derive(Debug, Clone)]
pub enum ListTarget {
    Org(String),
    Repo(OrgRepo),
}

/// Print `id #number state created name` for each project, one per line.
///
/// Used to find a project's display number before copying it.
pub async fn run(
    api: &impl ProjectApi,
    ctx: &RequestContext,
    target: &ListTarget,
    out: &mut impl Write,
) -> Result<usize> {
    let projects = match target {
        ListTarget::Org(org) => api
            .list_org_projects(ctx, org)
            .await
            .with_context(|| format!("could not list projects of org {org}"))?,
        ListTarget::Repo(repo) => api
            .list_repo_projects(ctx, repo)
            .await
            .with_context(|| format!("could not list projects of {repo}"))?,
    };

    for project in &projects {
        writeln!(out, "{}", format_row(project)).context("writing project list")?;
    }
    Ok(projects.len())
}

fn format_row(project: &Project) -> String {
    let created = project
        .created_at
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    format!(
        "{:<9}  #{:<4} {:<6} {:<10} {}",
        project.id,
        project.number,
        project.state.as_str(),
        created,
        project.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StubProjects;

    #[tokio::test]
    async fn lists_org_projects() {
        let api = StubProjects::new();
        api.add_org_project("newco", 1, "Roadmap");
        api.add_org_project("newco", 2, "Support");
        api.add_org_project("other", 1, "Elsewhere");

        let mut out = Vec::new();
        let n = run(
            &api,
            &RequestContext::default(),
            &ListTarget::Org("newco".to_owned()),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(n, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("#1"));
        assert!(lines[0].ends_with("Roadmap"));
        assert!(lines[1].ends_with("Support"));
    }

    #[tokio::test]
    async fn lists_repo_projects() {
        let api = StubProjects::new();
        let repo = OrgRepo::parse("acme/widgets").unwrap();
        api.add_repo_project(&repo, 4, "Board", None);

        let mut out = Vec::new();
        run(
            &api,
            &RequestContext::default(),
            &ListTarget::Repo(repo),
            &mut out,
        )
        .await
        .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("#4"));
        assert!(text.contains("open"));
    }

    #[test]
    fn row_columns() {
        let project = Project {
            id: 1_002_604,
            number: 3,
            name: "Q3 Roadmap".to_owned(),
            body: None,
            state: crate::types::ProjectState::Closed,
            html_url: String::new(),
            created_at: Some("2024-01-02T10:00:00Z".parse().unwrap()),
        };
        let row = format_row(&project);
        let fields: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(fields, ["1002604", "#3", "closed", "2024-01-02", "Q3", "Roadmap"]);
        assert!(row.ends_with(" Q3 Roadmap"));
    }
}
