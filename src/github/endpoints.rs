// GitHub API endpoint functions.
// Typed methods for the user and repository endpoints.

use tracing::{debug, info};

use crate::error::{AppError, Result};

use super::client::{CachePolicy, GitHubClient};
use super::types::{Repository, User};

/// Largest page size the repos endpoint accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Upper bound on pages walked by `get_all_user_repos`.
pub const MAX_REPO_PAGES: u32 = 10;

impl GitHubClient {
    /// Get a user's public profile.
    pub async fn get_user(&self, username: &str, policy: CachePolicy) -> Result<User> {
        validate_username(username)?;
        let params: [(&str, &str); 0] = [];
        self.get_json(&format!("/users/{}", username), &params, policy)
            .await
    }

    /// Get one page of a user's public repositories, most recently updated first.
    pub async fn get_user_repos(
        &self,
        username: &str,
        page: u32,
        per_page: u32,
        policy: CachePolicy,
    ) -> Result<Vec<Repository>> {
        validate_username(username)?;
        let params = [
            ("sort", "updated"),
            ("direction", "desc"),
            ("page", &page.to_string()),
            ("per_page", &per_page.to_string()),
        ];
        self.get_json(&format!("/users/{}/repos", username), &params, policy)
            .await
    }

    /// Get all of a user's public repositories by walking full pages.
    pub async fn get_all_user_repos(
        &self,
        username: &str,
        policy: CachePolicy,
    ) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();

        for page in 1..=MAX_REPO_PAGES {
            let batch = self
                .get_user_repos(username, page, MAX_PER_PAGE, policy)
                .await?;
            let fetched = batch.len();
            repos.extend(batch);
            debug!(username, page, fetched, "fetched repository page");

            if fetched < MAX_PER_PAGE as usize {
                break;
            }
        }

        info!(username, count = repos.len(), "loaded repositories");
        Ok(repos)
    }
}

/// Check a username against GitHub's login rules before it reaches a URL.
///
/// Logins are 1-39 characters of ASCII alphanumerics or hyphens, with no
/// leading, trailing or doubled hyphen.
pub fn validate_username(username: &str) -> Result<()> {
    let valid = !username.is_empty()
        && username.len() <= 39
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--");

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidUsername(username.to_string()))
    }
}
