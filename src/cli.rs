//! Command-line interface parsing for octolook
//!
//! Parses arguments with clap and turns them into the runtime `Config`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::github::{GITHUB_API_BASE, validate_username};
use crate::logging;

/// Look up a GitHub user's profile and browse their repositories
#[derive(Parser, Debug)]
#[command(name = "octolook")]
#[command(about = "Look up a GitHub user's profile and browse their repositories")]
#[command(version)]
pub struct Cli {
    /// GitHub username to search for on startup
    #[arg(value_parser = parse_username)]
    pub username: Option<String>,

    /// Personal access token sent as a bearer token (optional, raises rate limits)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repositories shown per page
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub per_page: u16,

    /// Seconds a cached API response stays fresh (0 keeps responses until evicted)
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TTL.as_secs())]
    pub cache_ttl: u64,

    /// Maximum number of cached API responses
    #[arg(long, value_name = "N", default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,

    /// Base URL of the GitHub REST API
    #[arg(long, value_name = "URL", default_value = GITHUB_API_BASE)]
    pub api_url: String,

    /// Where to write the log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Validate a username argument against GitHub's login rules.
pub fn parse_username(s: &str) -> Result<String, String> {
    let s = s.trim();
    validate_username(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

/// Runtime configuration derived from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    pub initial_username: Option<String>,
    pub token: Option<String>,
    pub per_page: usize,
    /// `None` keeps cached responses until they are evicted.
    pub cache_ttl: Option<Duration>,
    pub cache_capacity: usize,
    pub api_url: String,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_username: None,
            token: None,
            per_page: 10,
            cache_ttl: Some(DEFAULT_TTL),
            cache_capacity: DEFAULT_CAPACITY,
            api_url: GITHUB_API_BASE.to_string(),
            log_file: logging::default_log_path(),
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            initial_username: cli.username,
            token: cli.token.filter(|t| !t.trim().is_empty()),
            per_page: usize::from(cli.per_page),
            cache_ttl: (cli.cache_ttl > 0).then(|| Duration::from_secs(cli.cache_ttl)),
            cache_capacity: cli.cache_capacity.max(1),
            api_url: cli.api_url,
            log_file: cli.log_file.unwrap_or_else(logging::default_log_path),
        }
    }
}
