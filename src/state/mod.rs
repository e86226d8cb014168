// State management module.
// Loading, pagination, filtering and console state for the views.

pub mod console;
pub mod filter;
pub mod loading;
pub mod paginator;
pub mod profile;

pub use console::{ConsoleLevel, ConsoleMessage, ConsoleState};
pub use filter::{RepoFilter, RepoSort};
pub use loading::LoadingState;
pub use paginator::Paginator;
pub use profile::ProfileState;
