// Profile and repository state.
// Holds the searched user, their repositories, and the filter/page/selection over them.

use ratatui::widgets::ListState;

use crate::models::{RepoSummary, UserProfile};

use super::filter::{RepoFilter, RepoSort};
use super::loading::LoadingState;
use super::paginator::Paginator;

pub const MIN_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 100;
pub const PAGE_SIZE_STEP: usize = 5;

/// Everything shown for the current search.
#[derive(Debug)]
pub struct ProfileState {
    /// Login that was searched for.
    pub username: Option<String>,
    pub user: LoadingState<UserProfile>,
    /// Full repository list as fetched.
    pub repos: LoadingState<Vec<RepoSummary>>,
    /// Filtered, sorted repositories split into pages.
    pub pager: Paginator<RepoSummary>,
    pub filter: RepoFilter,
    /// Selection within the current page.
    pub list_state: ListState,
}

impl ProfileState {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            username: None,
            user: LoadingState::Idle,
            repos: LoadingState::Idle,
            pager: Paginator::new(Vec::new(), items_per_page),
            filter: RepoFilter::default(),
            list_state: ListState::default(),
        }
    }

    /// Clear previous results and mark both panes as loading.
    pub fn start_search(&mut self, username: &str) {
        self.username = Some(username.to_string());
        self.user = LoadingState::Loading;
        self.repos = LoadingState::Loading;
        self.pager.set_items(Vec::new());
        self.list_state.select(None);
    }

    pub fn set_user(&mut self, user: UserProfile) {
        self.user = LoadingState::Loaded(user);
    }

    /// The user lookup failed, so no repositories will follow.
    pub fn set_user_error(&mut self, message: String) {
        self.user = LoadingState::Error(message);
        self.repos = LoadingState::Idle;
    }

    pub fn set_repos(&mut self, repos: Vec<RepoSummary>) {
        self.repos = LoadingState::Loaded(repos);
        self.refresh_pages();
    }

    pub fn set_repos_error(&mut self, message: String) {
        self.repos = LoadingState::Error(message);
        self.pager.set_items(Vec::new());
        self.list_state.select(None);
    }

    /// Re-run the filter over the full list and go back to page 1.
    pub fn refresh_pages(&mut self) {
        let filtered = match &self.repos {
            LoadingState::Loaded(repos) => self.filter.apply(repos),
            _ => Vec::new(),
        };
        self.pager.set_items(filtered);
        self.reset_selection();
    }

    pub fn set_filter_query(&mut self, query: &str) {
        self.filter.set_query(query);
        self.refresh_pages();
    }

    pub fn cycle_sort(&mut self) -> RepoSort {
        self.filter.sort = self.filter.sort.next();
        self.refresh_pages();
        self.filter.sort
    }

    /// Total repositories before filtering.
    pub fn total_repos(&self) -> usize {
        self.repos.data().map_or(0, Vec::len)
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.pager.next();
        if moved {
            self.reset_selection();
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.pager.previous();
        if moved {
            self.reset_selection();
        }
        moved
    }

    pub fn first_page(&mut self) -> bool {
        let moved = self.pager.first();
        if moved {
            self.reset_selection();
        }
        moved
    }

    pub fn last_page(&mut self) -> bool {
        let moved = self.pager.last();
        if moved {
            self.reset_selection();
        }
        moved
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.pager.go_to(page);
        if moved {
            self.reset_selection();
        }
        moved
    }

    /// Grow or shrink the page size by one step, within bounds.
    pub fn resize_pages(&mut self, grow: bool) -> usize {
        let current = self.pager.items_per_page();
        let size = if grow {
            (current + PAGE_SIZE_STEP).min(MAX_PAGE_SIZE)
        } else {
            current.saturating_sub(PAGE_SIZE_STEP).max(MIN_PAGE_SIZE)
        };
        if size != current {
            self.pager.set_items_per_page(size);
            self.reset_selection();
        }
        size
    }

    /// Select the next item on the current page.
    pub fn select_next(&mut self) {
        let shown = self.pager.displayed_items().len();
        if shown == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < shown => i + 1,
            Some(i) => i, // Stay at end
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item on the current page.
    pub fn select_prev(&mut self) {
        if self.pager.displayed_items().is_empty() {
            return;
        }
        let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(i));
    }

    pub fn selected_repo(&self) -> Option<&RepoSummary> {
        let index = self.list_state.selected()?;
        self.pager.displayed_items().get(index)
    }

    fn reset_selection(&mut self) {
        if self.pager.displayed_items().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn repos(n: usize) -> Vec<RepoSummary> {
        (0..n)
            .map(|i| RepoSummary {
                name: format!("repo-{:02}", i),
                description: None,
                url: format!("https://github.com/octocat/repo-{:02}", i),
                stars: i as u64,
                forks: 0,
                topics: Vec::new(),
                language: if i % 2 == 0 { Some("Rust".to_string()) } else { None },
                fork: false,
                archived: false,
                updated_at: Utc::now() - chrono::Duration::hours(i as i64),
            })
            .collect()
    }

    #[test]
    fn test_search_lifecycle() {
        let mut state = ProfileState::new(10);
        state.start_search("octocat");

        assert!(state.user.is_loading());
        assert!(state.repos.is_loading());
        assert_eq!(state.username.as_deref(), Some("octocat"));

        state.set_repos(repos(23));
        assert_eq!(state.total_repos(), 23);
        assert_eq!(state.pager.total_pages(), 3);
        assert_eq!(state.list_state.selected(), Some(0));
        assert_eq!(state.selected_repo().unwrap().name, "repo-00");
    }

    #[test]
    fn test_user_error_clears_repos() {
        let mut state = ProfileState::new(10);
        state.start_search("ghost");
        state.set_user_error("User 'ghost' not found".to_string());

        assert_eq!(state.user.error(), Some("User 'ghost' not found"));
        assert_eq!(state.repos, LoadingState::Idle);
    }

    #[test]
    fn test_filter_resets_to_first_page() {
        let mut state = ProfileState::new(5);
        state.set_repos(repos(20));
        state.last_page();
        assert_eq!(state.pager.current_page(), 4);

        state.set_filter_query("rust");
        assert_eq!(state.pager.current_page(), 1);
        assert_eq!(state.pager.len(), 10);
        assert_eq!(state.total_repos(), 20);

        state.set_filter_query("no-such-repo");
        assert!(state.pager.displayed_items().is_empty());
        assert!(state.selected_repo().is_none());
    }

    #[test]
    fn test_page_moves_reset_selection() {
        let mut state = ProfileState::new(5);
        state.set_repos(repos(12));
        state.select_next();
        state.select_next();
        assert_eq!(state.list_state.selected(), Some(2));

        assert!(state.next_page());
        assert_eq!(state.list_state.selected(), Some(0));
        assert_eq!(state.selected_repo().unwrap().name, "repo-05");

        assert!(!state.go_to_page(9));
        assert!(state.go_to_page(3));
        // Last page has two items; selection stays in bounds
        state.select_next();
        state.select_next();
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn test_resize_pages_bounds() {
        let mut state = ProfileState::new(10);
        state.set_repos(repos(40));

        assert_eq!(state.resize_pages(false), 5);
        assert_eq!(state.resize_pages(false), MIN_PAGE_SIZE);
        for _ in 0..30 {
            state.resize_pages(true);
        }
        assert_eq!(state.pager.items_per_page(), MAX_PAGE_SIZE);
        assert_eq!(state.pager.total_pages(), 1);
    }

    #[test]
    fn test_cycle_sort_reorders() {
        let mut state = ProfileState::new(10);
        state.set_repos(repos(3));
        assert_eq!(state.selected_repo().unwrap().name, "repo-00");

        assert_eq!(state.cycle_sort(), RepoSort::Stars);
        assert_eq!(state.selected_repo().unwrap().name, "repo-02");
    }
}
