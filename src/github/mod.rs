// GitHub API module.
// Provides client, endpoint methods, and response types for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod types;

#[cfg(test)]
mod test_server;

pub use client::{CachePolicy, GITHUB_API_BASE, GitHubClient};
pub use endpoints::validate_username;
pub use types::{RateLimit, Repository, User};
