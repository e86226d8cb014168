//! Integration tests for browsing a fetched repository list
//!
//! Feeds API-shaped JSON through the display models, filter and paginator
//! the same way the app does after a lookup.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use octolook::cache::ResponseCache;
use octolook::github::{Repository, User};
use octolook::models::{RepoSummary, UserProfile};
use octolook::state::{LoadingState, ProfileState, RepoSort};

fn repos_json(count: usize) -> String {
    let repos: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": i,
                "name": format!("repo-{:02}", i),
                "full_name": format!("octocat/repo-{:02}", i),
                "description": if i % 2 == 0 { "a rust tool" } else { "" },
                "html_url": format!("https://github.com/octocat/repo-{:02}", i),
                "stargazers_count": i * 3,
                "forks_count": i,
                "topics": if i % 5 == 0 { vec!["cli"] } else { vec![] },
                "language": if i % 3 == 0 { "Rust" } else { "Go" },
                "fork": false,
                "archived": false,
                "updated_at": format!("2024-01-{:02}T00:00:00Z", i + 1),
            })
        })
        .collect();
    serde_json::to_string(&repos).unwrap()
}

fn load(count: usize, per_page: usize) -> ProfileState {
    let repos: Vec<Repository> = serde_json::from_str(&repos_json(count)).unwrap();
    let mut state = ProfileState::new(per_page);
    state.start_search("octocat");
    state.set_repos(repos.into_iter().map(RepoSummary::from).collect());
    state
}

#[test]
fn test_pages_newest_first() {
    let mut state = load(23, 10);

    assert_eq!(state.total_repos(), 23);
    assert_eq!(state.pager.total_pages(), 3);
    assert_eq!(state.pager.current_page(), 1);
    assert_eq!(state.pager.displayed_items()[0].name, "repo-22");

    assert!(state.last_page());
    assert_eq!(state.pager.displayed_items().len(), 3);
    assert_eq!(state.pager.page_range(), Some((21, 23)));
    assert!(!state.next_page());

    assert!(state.go_to_page(2));
    assert!(!state.go_to_page(4));
    assert_eq!(state.pager.current_page(), 2);
}

#[test]
fn test_filter_then_sort_resets_to_first_page() {
    let mut state = load(23, 5);
    state.next_page();

    state.set_filter_query("RUST");
    assert_eq!(state.pager.current_page(), 1);
    // Even indices match the description, multiples of 3 the language
    let expected = (0..23).filter(|i| i % 2 == 0 || i % 3 == 0).count();
    assert_eq!(state.pager.len(), expected);
    assert_eq!(state.total_repos(), 23);

    assert_eq!(state.cycle_sort(), RepoSort::Stars);
    assert_eq!(state.pager.displayed_items()[0].name, "repo-22");
    assert_eq!(state.cycle_sort(), RepoSort::Name);
    assert_eq!(state.pager.displayed_items()[0].name, "repo-00");

    state.set_filter_query("no-such-repo");
    assert!(state.pager.is_empty());
    assert_eq!(state.pager.total_pages(), 0);
    assert!(state.selected_repo().is_none());
}

#[test]
fn test_selection_follows_page() {
    let mut state = load(12, 5);
    assert_eq!(state.selected_repo().map(|r| r.name.as_str()), Some("repo-11"));

    state.select_next();
    state.select_next();
    assert_eq!(state.selected_repo().map(|r| r.name.as_str()), Some("repo-09"));

    state.next_page();
    assert_eq!(state.selected_repo().map(|r| r.name.as_str()), Some("repo-06"));
}

#[test]
fn test_cached_body_decodes_to_profile() {
    let body = serde_json::json!({
        "id": 583231,
        "login": "octocat",
        "name": "The Octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
        "html_url": "https://github.com/octocat",
        "bio": null,
        "location": "San Francisco",
        "company": "@github",
        "blog": "github.blog",
        "twitter_username": null,
        "followers": 9000,
        "following": 9,
        "public_repos": 8,
        "created_at": "2011-01-25T18:44:36Z",
    })
    .to_string();

    let mut cache: ResponseCache<String> =
        ResponseCache::new().with_default_ttl(Duration::from_secs(60));
    let key = "https://api.github.com/users/octocat";
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    cache.set_at(key, body, None, t0);

    let fresh = cache
        .get_at(key, t0 + chrono::Duration::seconds(59))
        .expect("entry should still be fresh");
    let profile = UserProfile::from(serde_json::from_str::<User>(&fresh).unwrap());
    assert_eq!(profile.display_name(), "The Octocat");
    assert_eq!(profile.blog_url.as_deref(), Some("https://github.blog"));
    assert!(profile.twitter.is_none());

    assert!(cache.get_at(key, t0 + chrono::Duration::seconds(60)).is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_user_error_clears_repositories() {
    let mut state = load(3, 10);
    state.start_search("ghost");
    state.set_user_error("User 'ghost' not found".to_string());

    assert_eq!(state.user.error(), Some("User 'ghost' not found"));
    assert_eq!(state.repos, LoadingState::Idle);
    assert!(state.pager.is_empty());
}
