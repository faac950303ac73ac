// api module: the seam between the copier and GitHub.

pub mod github;
mod interface;
pub mod stub;

pub use github::GitHubProjects;
pub use interface::{ProjectApi, RequestContext};
pub use stub::StubProjects;
