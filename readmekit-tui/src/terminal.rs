//! Terminal setup, teardown and suspension for child processes

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Enter raw mode on the alternate screen
pub fn init() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(io::stdout(), EnterAlternateScreen).context("Failed to enter alternate screen")?;

    Terminal::new(CrosstermBackend::new(io::stdout())).context("Failed to create terminal")
}

/// Return the terminal to cooked mode on the main screen
pub fn restore() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    Ok(())
}

/// Hand the terminal to `f` (e.g. an external editor) and take it back afterwards.
///
/// The terminal is re-initialised even when `f` fails; its result is returned as is.
pub fn suspend<T>(terminal: &mut Tui, f: impl FnOnce() -> T) -> Result<T> {
    restore().context("Failed to restore terminal for child process")?;
    let result = f();
    *terminal = init().context("Failed to reinitialize terminal")?;
    Ok(result)
}
