// GitHub API module.
// Provides client, typed endpoints, and the cached fetcher for the
// GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod fetcher;
pub mod types;

pub use client::GitHubClient;
pub use fetcher::RepoFetcher;
pub use types::*;
