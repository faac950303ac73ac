// github module: octocrab construction and the classic-projects REST calls.

pub mod auth;
pub mod client;
pub mod projects;
