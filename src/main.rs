//! octolook - look up GitHub users from the terminal
//!
//! Shows a user's profile and pages through their public repositories.

use std::io;
use std::panic;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use octolook::app::App;
use octolook::cli::{Cli, Config};
use octolook::logging;

/// Restore the terminal before the default panic message is printed.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Enter raw mode and the alternate screen, undoing both if any step fails.
fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let terminal = execute!(io::stdout(), EnterAlternateScreen)
        .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
    undo_on_err(terminal, || {
        let _ = restore_terminal();
    })
}

/// Run `undo` when `result` is an error, then pass the result through.
fn undo_on_err<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from(Cli::parse());

    logging::init(&config.log_file)?;
    info!(version = env!("CARGO_PKG_VERSION"), api_url = %config.api_url, "starting");

    let mut app = App::new(config)?;

    setup_panic_hook();

    let mut terminal = setup_terminal()?;

    let result = app.run(&mut terminal);

    // Restore terminal even when the loop failed
    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "terminal error");
    }
    info!("exiting");
    Ok(result?)
}
