//! octolook library
//!
//! GitHub user lookup: API client, response cache, paginated repository
//! browsing and the terminal UI. Exposed as a library for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod error;
pub mod github;
pub mod logging;
pub mod models;
pub mod state;
pub mod ui;
