// Repository filtering and sorting.
// Runs client-side over the full repository list before it is paginated.

use crate::models::RepoSummary;

/// Sort order for the repository list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepoSort {
    #[default]
    Updated,
    Stars,
    Name,
}

impl RepoSort {
    pub fn title(&self) -> &'static str {
        match self {
            RepoSort::Updated => "updated",
            RepoSort::Stars => "stars",
            RepoSort::Name => "name",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            RepoSort::Updated => RepoSort::Stars,
            RepoSort::Stars => RepoSort::Name,
            RepoSort::Name => RepoSort::Updated,
        }
    }
}

/// Case-insensitive text filter plus sort order.
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    query: String,
    pub sort: RepoSort,
}

impl RepoFilter {
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            sort: RepoSort::default(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Match against name, description, language and topics.
    pub fn matches(&self, repo: &RepoSummary) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let q = self.query.as_str();
        repo.name.to_lowercase().contains(q)
            || repo
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(q))
            || repo
                .language
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(q))
            || repo.topics.iter().any(|t| t.to_lowercase().contains(q))
    }

    /// Return the matching repositories in sort order.
    pub fn apply(&self, repos: &[RepoSummary]) -> Vec<RepoSummary> {
        let mut matched: Vec<RepoSummary> =
            repos.iter().filter(|r| self.matches(r)).cloned().collect();

        match self.sort {
            RepoSort::Updated => matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
            RepoSort::Stars => matched.sort_by(|a, b| b.stars.cmp(&a.stars)),
            RepoSort::Name => {
                matched.sort_by_key(|r| r.name.to_lowercase());
            }
        }
        matched
    }
}
