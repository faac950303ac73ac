use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use octocrab::Octocrab;

use crate::types::{Card, Column, ContentItem, NewCard, NewProject, Project};

// ---------------------------------------------------------------------------
// Classic projects REST calls
//
// Every listing reads the first page only.
// ---------------------------------------------------------------------------

fn first_page(per_page: u8) -> HashMap<&'static str, String> {
    let mut params = HashMap::new();
    params.insert("per_page", per_page.to_string());
    params.insert("page", "1".to_owned());
    params
}

/// List the projects of a repository.
pub async fn list_repo_projects(
    octocrab: &Arc<Octocrab>,
    owner: &str,
    repo: &str,
    per_page: u8,
) -> Result<Vec<Project>> {
    let route = format!("/repos/{owner}/{repo}/projects");
    octocrab
        .get(route, Some(&first_page(per_page)))
        .await
        .context("listing repository projects")
}

/// List the projects of an organization.
pub async fn list_org_projects(
    octocrab: &Arc<Octocrab>,
    org: &str,
    per_page: u8,
) -> Result<Vec<Project>> {
    let route = format!("/orgs/{org}/projects");
    octocrab
        .get(route, Some(&first_page(per_page)))
        .await
        .context("listing organization projects")
}

/// Create an organization project.
pub async fn create_org_project(
    octocrab: &Arc<Octocrab>,
    org: &str,
    project: &NewProject,
) -> Result<Project> {
    let route = format!("/orgs/{org}/projects");
    let payload = serde_json::json!({
        "name": project.name,
        "body": project.body.as_deref().unwrap_or_default(),
    });
    octocrab
        .post(route, Some(&payload))
        .await
        .context("creating organization project")
}

/// Delete a project (DELETE /projects/{id}).
///
/// The endpoint answers `204 No Content`, so the raw `_delete` method is used
/// instead of a deserializing helper.
pub async fn delete_project(octocrab: &Arc<Octocrab>, project_id: u64) -> Result<()> {
    let route = format!("/projects/{project_id}");
    let uri = http::Uri::builder()
        .path_and_query(route)
        .build()
        .context("building URI for project delete")?;
    let response = octocrab
        ._delete(uri, None::<&()>)
        .await
        .context("deleting project")?;
    octocrab::map_github_error(response)
        .await
        .map(drop)
        .context("project delete API error")?;
    Ok(())
}

/// List the columns of a project.
pub async fn list_columns(
    octocrab: &Arc<Octocrab>,
    project_id: u64,
    per_page: u8,
) -> Result<Vec<Column>> {
    let route = format!("/projects/{project_id}/columns");
    octocrab
        .get(route, Some(&first_page(per_page)))
        .await
        .context("listing project columns")
}

/// Create a column at the end of a project.
pub async fn create_column(
    octocrab: &Arc<Octocrab>,
    project_id: u64,
    name: &str,
) -> Result<Column> {
    let route = format!("/projects/{project_id}/columns");
    let payload = serde_json::json!({ "name": name });
    octocrab
        .post(route, Some(&payload))
        .await
        .context("creating project column")
}

/// List the (non-archived) cards of a column, top to bottom.
pub async fn list_cards(
    octocrab: &Arc<Octocrab>,
    column_id: u64,
    per_page: u8,
) -> Result<Vec<Card>> {
    let route = format!("/projects/columns/{column_id}/cards");
    octocrab
        .get(route, Some(&first_page(per_page)))
        .await
        .context("listing column cards")
}

/// Create a card in a column.
pub async fn create_card(octocrab: &Arc<Octocrab>, column_id: u64, card: &NewCard) -> Result<Card> {
    let route = format!("/projects/columns/{column_id}/cards");
    octocrab
        .post(route, Some(&card.to_payload()))
        .await
        .context("creating project card")
}

/// Fetch an issue to learn its database id.
pub async fn get_issue(
    octocrab: &Arc<Octocrab>,
    owner: &str,
    repo: &str,
    number: u64,
) -> Result<ContentItem> {
    let route = format!("/repos/{owner}/{repo}/issues/{number}");
    octocrab
        .get(route, None::<&()>)
        .await
        .with_context(|| format!("fetching issue {owner}/{repo}#{number}"))
}

/// Fetch a pull request to learn its database id.
pub async fn get_pull_request(
    octocrab: &Arc<Octocrab>,
    owner: &str,
    repo: &str,
    number: u64,
) -> Result<ContentItem> {
    let route = format!("/repos/{owner}/{repo}/pulls/{number}");
    octocrab
        .get(route, None::<&()>)
        .await
        .with_context(|| format!("fetching pull request {owner}/{repo}#{number}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_params() {
        let params = first_page(100);
        assert_eq!(params.get("per_page").map(String::as_str), Some("100"));
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
    }
}
