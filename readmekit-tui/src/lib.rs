//! readmekit TUI - Terminal user interface components
//!
//! This crate contains all ratatui/crossterm integration:
//! - App state on top of the core composition store
//! - Event loop and input handling
//! - Live preview rendering, outline and status bar
//! - External editor hand-off
//! - Theme system

pub mod app;
pub mod editor;
pub mod input;
pub mod render;
pub mod terminal;
pub mod theme;
pub mod ui;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use readmekit_core::composition::BlockId;
use std::time::{Duration, Instant};

// Re-export main types
pub use app::App;

/// Run the TUI application
pub fn run(mut app: App) -> Result<()> {
    let mut terminal = terminal::init().context("Failed to initialize terminal")?;

    // Main event loop
    let result = run_loop(&mut terminal, &mut app);

    // Always restore terminal, even if run_loop fails
    terminal::restore().context("Failed to restore terminal")?;

    result
}

fn run_loop(terminal: &mut terminal::Tui, app: &mut App) -> Result<()> {
    loop {
        app.process_changes();
        app.expire_status(Instant::now());

        let viewport_height = ui::preview_viewport_height(terminal.size()?.height);

        terminal
            .draw(|frame| ui::draw(frame, app))
            .context("Failed to draw frame")?;

        if app.should_quit {
            break;
        }

        // Poll with a timeout so timed status messages expire while idle
        if crossterm::event::poll(Duration::from_millis(100)).context("Failed to poll events")? {
            if let Event::Key(key) = crossterm::event::read().context("Failed to read event")? {
                // Only handle key press events, ignore release
                if key.kind == KeyEventKind::Press {
                    match input::handle_input(app, key, viewport_height)? {
                        input::Action::EditBlock(id) => {
                            if let Err(e) = terminal::suspend(terminal, || edit_block(app, id))? {
                                log::warn!("editing block {} failed: {:#}", id, e);
                                app.set_error_message(format!("Editor error: {}", e));
                            }
                        }
                        input::Action::Quit | input::Action::Continue => {}
                    }
                }
            }
        }
    }

    Ok(())
}

/// Hand a block's content to the external editor and store the result
fn edit_block(app: &mut App, id: BlockId) -> Result<()> {
    let Some(block) = app.composition.get(id) else {
        return Ok(());
    };
    let name = block.name().to_string();

    match editor::edit_content(&app.config.editor, &block.content)? {
        Some(content) => {
            app.set_block_content(id, content)?;
            app.set_success_message(format!("Updated {}", name));
        }
        None => app.set_info_message(format!("{} unchanged", name)),
    }
    Ok(())
}
