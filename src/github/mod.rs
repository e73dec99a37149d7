// GitHub API module.
// Provides the client, fetcher contract, and types for the project feed.

#![allow(dead_code, unused_imports)]

pub mod client;
pub mod types;

pub use client::{GitHubClient, PROJECTS_PER_PAGE, ProjectSource};
pub use types::*;
