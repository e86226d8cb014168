// Display models.
// Narrow the GitHub API types down to what the profile and repository views show.

use chrono::{DateTime, Utc};

use crate::github::{Repository, User};

/// Profile fields shown in the profile pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub profile_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog_url: Option<String>,
    /// Rendered as `@handle`.
    pub twitter: Option<String>,
    pub followers: u64,
    pub following: u64,
    pub public_repos: u64,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name if set, otherwise the login.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            login: user.login,
            name: non_empty(user.name),
            avatar_url: user.avatar_url,
            profile_url: user.html_url,
            bio: non_empty(user.bio).map(|bio| bio.trim().to_string()),
            location: non_empty(user.location),
            company: non_empty(user.company),
            blog_url: non_empty(user.blog).map(|blog| with_scheme(&blog)),
            twitter: non_empty(user.twitter_username)
                .map(|handle| format!("@{}", handle.trim_start_matches('@'))),
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            created_at: user.created_at,
        }
    }
}

/// Repository fields shown in the repository list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u64,
    pub forks: u64,
    pub topics: Vec<String>,
    pub language: Option<String>,
    pub fork: bool,
    pub archived: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Repository> for RepoSummary {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            description: non_empty(repo.description),
            url: repo.html_url,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            topics: repo.topics,
            language: non_empty(repo.language),
            fork: repo.fork,
            archived: repo.archived,
            updated_at: repo.updated_at,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GitHub stores blog URLs as typed by the user, often without a scheme.
fn with_scheme(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}
