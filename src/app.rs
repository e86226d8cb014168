// App state and main event loop.
// Routes keyboard input, starts background fetches, and applies their results.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::ResponseCache;
use crate::cli::Config;
use crate::error::{AppError, Result};
use crate::github::{CachePolicy, GitHubClient};
use crate::models::{RepoSummary, UserProfile};
use crate::state::{ConsoleMessage, ConsoleState, ProfileState};
use crate::ui;

/// Longest text accepted in an input prompt.
const MAX_INPUT_LEN: usize = 64;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Profile,
    Repositories,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Profile, Tab::Repositories, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Profile => "Profile",
            Tab::Repositories => "Repositories",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Profile => Tab::Repositories,
            Tab::Repositories => Tab::Console,
            Tab::Console => Tab::Profile,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Profile => Tab::Console,
            Tab::Repositories => Tab::Profile,
            Tab::Console => Tab::Repositories,
        }
    }
}

/// What fills the content area.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Main,
    /// Shown instead of the tabs after an authentication or rate limit failure.
    Error { title: String, message: String },
}

/// Where typed characters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    Filter,
    GoToPage,
}

/// Results sent back from fetch tasks, tagged with the search that started them.
#[derive(Debug)]
pub enum AppEvent {
    UserLoaded {
        generation: u64,
        result: Result<UserProfile>,
    },
    ReposLoaded {
        generation: u64,
        result: Result<Vec<RepoSummary>>,
    },
}

impl AppEvent {
    pub fn generation(&self) -> u64 {
        match self {
            AppEvent::UserLoaded { generation, .. } | AppEvent::ReposLoaded { generation, .. } => {
                *generation
            }
        }
    }
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    pub view: View,
    pub input_mode: InputMode,
    /// Text of the active input prompt.
    pub input: String,
    pub profile: ProfileState,
    pub console: ConsoleState,
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
    pub client: GitHubClient,
    initial_username: Option<String>,
    /// Filter query to restore when a filter prompt is cancelled.
    filter_before_edit: String,
    /// Id of the latest search; results from older searches are dropped.
    generation: u64,
    in_flight: Option<JoinHandle<()>>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let mut cache = ResponseCache::new().with_capacity(config.cache_capacity);
        if let Some(ttl) = config.cache_ttl {
            cache = cache.with_default_ttl(ttl);
        }
        let client = GitHubClient::new(config.token.as_deref(), &config.api_url, cache)?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            active_tab: Tab::default(),
            view: View::Main,
            input_mode: InputMode::Normal,
            input: String::new(),
            profile: ProfileState::new(config.per_page),
            console: ConsoleState::default(),
            show_help: false,
            should_quit: false,
            client,
            initial_username: config.initial_username,
            filter_before_edit: String::new(),
            generation: 0,
            in_flight: None,
            events_tx,
            events_rx,
        };

        if !app.client.is_authenticated() {
            app.log(ConsoleMessage::info(
                "No token configured; GitHub allows 60 unauthenticated requests per hour",
            ));
        }
        Ok(app)
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        match self.initial_username.take() {
            Some(username) => {
                self.search(&username, CachePolicy::Use);
            }
            None => self.begin_input(InputMode::Search),
        }

        while !self.should_quit {
            self.drain_events();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Apply every result that arrived since the last frame.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_app_event(event);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            _ => self.handle_input_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') | KeyCode::Char('s') => self.begin_input(InputMode::Search),
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Esc => {
                if matches!(self.view, View::Error { .. }) {
                    self.view = View::Main;
                }
            }
            KeyCode::Tab => self.set_tab(self.active_tab.next()),
            KeyCode::BackTab => self.set_tab(self.active_tab.prev()),
            _ if self.view == View::Main => match self.active_tab {
                Tab::Repositories => self.handle_repos_key(key),
                Tab::Console => self.handle_console_key(key),
                Tab::Profile => {}
            },
            _ => {}
        }
    }

    fn handle_repos_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.profile.previous_page();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.profile.next_page();
            }
            KeyCode::Home => {
                self.profile.first_page();
            }
            KeyCode::End => {
                self.profile.last_page();
            }
            KeyCode::Up | KeyCode::Char('k') => self.profile.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.profile.select_next(),
            KeyCode::Char('g') => self.begin_input(InputMode::GoToPage),
            KeyCode::Char('f') => self.begin_input(InputMode::Filter),
            KeyCode::Char('o') => {
                let sort = self.profile.cycle_sort();
                debug!(sort = sort.title(), "changed sort order");
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.profile.resize_pages(true);
            }
            KeyCode::Char('-') => {
                self.profile.resize_pages(false);
            }
            KeyCode::Enter => {
                if let Some(repo) = self.profile.selected_repo() {
                    let message = format!("{}: {}", repo.name, repo.url);
                    self.log(ConsoleMessage::info(message));
                }
            }
            _ => {}
        }
    }

    fn handle_console_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.console.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.console.select_next(),
            KeyCode::Char('c') => self.console.clear(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                self.input.pop();
                if self.input_mode == InputMode::Filter {
                    self.profile.set_filter_query(&self.input);
                }
            }
            KeyCode::Char(c) => {
                if self.input.len() >= MAX_INPUT_LEN {
                    return;
                }
                if self.input_mode == InputMode::GoToPage && !c.is_ascii_digit() {
                    return;
                }
                self.input.push(c);
                if self.input_mode == InputMode::Filter {
                    self.profile.set_filter_query(&self.input);
                }
            }
            _ => {}
        }
    }

    /// Open an input prompt, prefilled where it makes sense.
    pub fn begin_input(&mut self, mode: InputMode) {
        self.input = match mode {
            InputMode::Search => self.profile.username.clone().unwrap_or_default(),
            InputMode::Filter => {
                self.filter_before_edit = self.profile.filter.query().to_string();
                self.filter_before_edit.clone()
            }
            InputMode::GoToPage | InputMode::Normal => String::new(),
        };
        self.input_mode = mode;
    }

    fn cancel_input(&mut self) {
        if self.input_mode == InputMode::Filter {
            let previous = std::mem::take(&mut self.filter_before_edit);
            self.profile.set_filter_query(&previous);
        }
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    fn submit_input(&mut self) {
        let mode = std::mem::take(&mut self.input_mode);
        let input = std::mem::take(&mut self.input);

        match mode {
            InputMode::Search => {
                self.search(&input, CachePolicy::Use);
            }
            InputMode::Filter => {
                self.profile.set_filter_query(&input);
                self.set_tab(Tab::Repositories);
            }
            InputMode::GoToPage => {
                let total = self.profile.pager.total_pages();
                match input.parse::<usize>() {
                    Ok(page) if (1..=total).contains(&page) => {
                        self.profile.go_to_page(page);
                    }
                    _ => self.log(ConsoleMessage::warn(format!(
                        "No page {:?}: {} page(s) available",
                        input, total
                    ))),
                }
            }
            InputMode::Normal => {}
        }
    }

    /// Start a new search, superseding any search still in flight.
    /// Returns false for blank input.
    pub fn search(&mut self, username: &str, policy: CachePolicy) -> bool {
        let username = username.trim();
        if username.is_empty() {
            return false;
        }

        self.generation += 1;
        if let Some(task) = self.in_flight.take() {
            task.abort();
            debug!("aborted superseded search");
        }

        self.view = View::Main;
        self.profile.start_search(username);
        info!(username, generation = self.generation, ?policy, "searching");
        self.log(ConsoleMessage::info(format!("Searching for {}", username)));

        let task = fetch_profile(
            self.client.clone(),
            username.to_string(),
            self.generation,
            policy,
            self.events_tx.clone(),
        );
        self.in_flight = Some(tokio::spawn(task));
        true
    }

    /// Refetch the current user, bypassing cached responses.
    pub fn refresh(&mut self) {
        if let Some(username) = self.profile.username.clone() {
            self.search(&username, CachePolicy::Refresh);
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        let generation = event.generation();
        if generation != self.generation {
            debug!(generation, current = self.generation, "dropping stale response");
            return;
        }

        match event {
            AppEvent::UserLoaded {
                result: Ok(user), ..
            } => {
                info!(login = %user.login, "loaded user");
                self.profile.set_user(user);
            }
            AppEvent::UserLoaded {
                result: Err(e), ..
            } => {
                self.in_flight = None;
                self.handle_user_error(e);
            }
            AppEvent::ReposLoaded {
                result: Ok(repos), ..
            } => {
                self.in_flight = None;
                self.log(ConsoleMessage::info(format!(
                    "Loaded {} repositories",
                    repos.len()
                )));
                self.profile.set_repos(repos);
            }
            AppEvent::ReposLoaded {
                result: Err(e), ..
            } => {
                self.in_flight = None;
                error!(error = %e, "repository lookup failed");
                self.profile.set_repos_error(e.to_string());
                if e.is_auth() {
                    self.redirect_to_error(&e);
                }
                self.log(ConsoleMessage::error(format!("Repositories: {}", e)));
            }
        }
    }

    fn handle_user_error(&mut self, e: AppError) {
        let message = match &e {
            AppError::NotFound(_) => format!(
                "User '{}' not found",
                self.profile.username.as_deref().unwrap_or_default()
            ),
            _ => e.to_string(),
        };

        if e.is_not_found() {
            warn!(%message);
        } else {
            error!(error = %e, "user lookup failed");
        }

        self.profile.set_user_error(message.clone());
        if e.is_auth() {
            self.redirect_to_error(&e);
        }
        self.log(ConsoleMessage::error(message));
    }

    /// Replace the tabs with the error screen.
    fn redirect_to_error(&mut self, e: &AppError) {
        let title = match e {
            AppError::RateLimited { .. } => "Rate limited",
            _ => "Access denied",
        };
        let hint = if self.client.is_authenticated() {
            "Check that your token is valid and has not expired."
        } else {
            "Set GITHUB_TOKEN or pass --token to authenticate."
        };
        self.view = View::Error {
            title: title.to_string(),
            message: format!("{}\n\n{}", e, hint),
        };
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        if tab == Tab::Console {
            self.console.mark_read();
        }
    }

    /// Add a console message, counting it as unread unless the console is showing.
    pub fn log(&mut self, message: ConsoleMessage) {
        let visible = self.active_tab == Tab::Console && self.view == View::Main;
        self.console.push(message, visible);
    }
}

/// Fetch a user and then their repositories, reporting each step.
async fn fetch_profile(
    client: GitHubClient,
    username: String,
    generation: u64,
    policy: CachePolicy,
    events: UnboundedSender<AppEvent>,
) {
    let user = client
        .get_user(&username, policy)
        .await
        .map(UserProfile::from);
    let failed = user.is_err();
    if events
        .send(AppEvent::UserLoaded {
            generation,
            result: user,
        })
        .is_err()
        || failed
    {
        return;
    }

    let repos = client
        .get_all_user_repos(&username, policy)
        .await
        .map(|repos| repos.into_iter().map(RepoSummary::from).collect());
    let _ = events.send(AppEvent::ReposLoaded {
        generation,
        result: repos,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_app() -> App {
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            per_page: 5,
            ..Config::default()
        };
        App::new(config).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn profile(login: &str) -> UserProfile {
        UserProfile {
            login: login.to_string(),
            name: None,
            avatar_url: String::new(),
            profile_url: format!("https://github.com/{}", login),
            bio: None,
            location: None,
            company: None,
            blog_url: None,
            twitter: None,
            followers: 0,
            following: 0,
            public_repos: 0,
            created_at: Utc::now(),
        }
    }

    fn repos(n: usize) -> Vec<RepoSummary> {
        (0..n)
            .map(|i| RepoSummary {
                name: format!("repo-{}", i),
                description: None,
                url: format!("https://github.com/octocat/repo-{}", i),
                stars: 0,
                forks: 0,
                topics: Vec::new(),
                language: (i == 0).then(|| "Rust".to_string()),
                fork: false,
                archived: false,
                updated_at: Utc::now() - chrono::Duration::minutes(i as i64),
            })
            .collect()
    }

    #[test]
    fn test_tab_cycle() {
        assert_eq!(Tab::Profile.next(), Tab::Repositories);
        assert_eq!(Tab::Console.next(), Tab::Profile);
        assert_eq!(Tab::Profile.prev(), Tab::Console);
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut app = test_app();
        app.generation = 2;

        app.handle_app_event(AppEvent::UserLoaded {
            generation: 1,
            result: Ok(profile("old")),
        });
        assert!(app.profile.user.data().is_none());

        app.handle_app_event(AppEvent::UserLoaded {
            generation: 2,
            result: Ok(profile("new")),
        });
        assert_eq!(app.profile.user.data().unwrap().login, "new");
    }

    #[test]
    fn test_auth_error_redirects_to_error_view() {
        let mut app = test_app();
        app.profile.start_search("octocat");

        app.handle_app_event(AppEvent::UserLoaded {
            generation: 0,
            result: Err(AppError::Unauthorized),
        });

        assert!(matches!(&app.view, View::Error { title, .. } if title == "Access denied"));
        assert!(app.console.unread >= 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view, View::Main);
    }

    #[test]
    fn test_not_found_stays_on_profile() {
        let mut app = test_app();
        app.profile.start_search("ghost");

        app.handle_app_event(AppEvent::UserLoaded {
            generation: 0,
            result: Err(AppError::NotFound("https://api.github.com/users/ghost".to_string())),
        });

        assert_eq!(app.view, View::Main);
        assert_eq!(app.profile.user.error(), Some("User 'ghost' not found"));
    }

    #[test]
    fn test_go_to_page_prompt() {
        let mut app = test_app();
        app.profile.set_repos(repos(12));
        app.set_tab(Tab::Repositories);

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.input_mode, InputMode::GoToPage);
        type_text(&mut app, "x3");
        assert_eq!(app.input, "3");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.profile.pager.current_page(), 3);

        // Out of range leaves the page alone
        press(&mut app, KeyCode::Char('g'));
        type_text(&mut app, "9");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.profile.pager.current_page(), 3);
    }

    #[test]
    fn test_page_keys() {
        let mut app = test_app();
        app.profile.set_repos(repos(12));
        app.set_tab(Tab::Repositories);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.profile.pager.current_page(), 2);
        press(&mut app, KeyCode::End);
        assert_eq!(app.profile.pager.current_page(), 3);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.profile.pager.current_page(), 3);
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.profile.pager.current_page(), 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.profile.pager.current_page(), 1);
    }

    #[test]
    fn test_filter_prompt_is_live_and_cancellable() {
        let mut app = test_app();
        app.profile.set_repos(repos(12));
        app.set_tab(Tab::Repositories);

        press(&mut app, KeyCode::Char('f'));
        type_text(&mut app, "rust");
        assert_eq!(app.profile.pager.len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.profile.pager.len(), 12);

        press(&mut app, KeyCode::Char('f'));
        type_text(&mut app, "repo-1");
        press(&mut app, KeyCode::Enter);
        // repo-1, repo-10, repo-11
        assert_eq!(app.profile.pager.len(), 3);
        assert_eq!(app.profile.filter.query(), "repo-1");
    }

    #[test]
    fn test_search_prompt_cancel() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_text(&mut app, "octo");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.profile.username.is_none());
        assert_eq!(app.generation, 0);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut app = test_app();
        assert!(!app.search("   ", CachePolicy::Use));
        assert_eq!(app.generation, 0);
    }

    #[tokio::test]
    async fn test_search_supersedes_previous() {
        let mut app = test_app();

        assert!(app.search("octocat", CachePolicy::Use));
        assert!(app.search("rust-lang", CachePolicy::Use));

        assert_eq!(app.generation, 2);
        assert_eq!(app.profile.username.as_deref(), Some("rust-lang"));
        assert!(app.profile.user.is_loading());

        // A late answer for the first search changes nothing
        app.handle_app_event(AppEvent::UserLoaded {
            generation: 1,
            result: Ok(profile("octocat")),
        });
        assert!(app.profile.user.is_loading());
    }

    #[test]
    fn test_console_badge_clears_on_view() {
        let mut app = test_app();
        app.log(ConsoleMessage::error("boom"));
        assert_eq!(app.console.unread, 1);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_tab, Tab::Console);
        assert_eq!(app.console.unread, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
