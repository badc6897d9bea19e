//! Input handling and keybindings

use crate::app::{App, Focus};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use readmekit_core::composition::BlockId;

/// Result of handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    /// Suspend the terminal and edit this block in the external editor
    EditBlock(BlockId),
}

/// Handle a key event; `viewport_height` sizes preview paging
pub fn handle_input(app: &mut App, key: KeyEvent, viewport_height: usize) -> Result<Action> {
    // Clear status message on any keystroke (except pure modifiers)
    if !matches!(key.code, KeyCode::Modifier(_)) {
        app.clear_status_message();
    }

    // Handle Ctrl+C
    if matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
    ) {
        app.quit();
        return Ok(Action::Quit);
    }

    // Handle help dialog - close with Esc or ?
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            app.toggle_help();
        }
        // Ignore all other keys when help is shown
        return Ok(Action::Continue);
    }

    // A grabbed block captures movement until it is dropped or released
    if app.grab.is_some() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.grab_move(1),
            KeyCode::Char('k') | KeyCode::Up => app.grab_move(-1),
            KeyCode::Enter | KeyCode::Char('m') => {
                if let Err(e) = app.commit_grab() {
                    app.set_error_message(e.to_string());
                }
            }
            KeyCode::Esc => {
                app.cancel_grab();
                app.set_info_message("Move cancelled");
            }
            _ => {}
        }
        return Ok(Action::Continue);
    }

    let page = viewport_height.max(1) as isize;

    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return Ok(Action::Quit);
        }
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::PageDown => app.scroll_preview(page / 2, viewport_height),
        KeyCode::PageUp => app.scroll_preview(-page / 2, viewport_height),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_preview(page / 2, viewport_height)
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_preview(-page / 2, viewport_height)
        }
        KeyCode::Char('y') => {
            app.copy_to_clipboard();
        }
        KeyCode::Char('w') => {
            app.save();
        }
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('o') => app.toggle_outline(),
        _ => match app.focus {
            Focus::Catalog => handle_catalog_key(app, key),
            Focus::Composition => return handle_composition_key(app, key),
        },
    }

    Ok(Action::Continue)
}

fn handle_catalog_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('a') => {
            if app.add_selected_template().is_none() {
                app.set_info_message("No block selected");
            }
        }
        KeyCode::Char('c') => app.cycle_category(),
        _ => {}
    }
}

fn handle_composition_key(app: &mut App, key: KeyEvent) -> Result<Action> {
    let acts_on_selection = matches!(
        key.code,
        KeyCode::Char('d' | 'K' | 'J' | 'r' | 'm' | 'e') | KeyCode::Delete | KeyCode::Enter
    );
    if acts_on_selection && app.selected_block().is_none() {
        app.set_info_message("No block selected");
        return Ok(Action::Continue);
    }

    let result = match key.code {
        KeyCode::Char('d') | KeyCode::Delete => app.remove_selected_block(),
        KeyCode::Char('K') => app.move_selected_block(-1),
        KeyCode::Char('J') => app.move_selected_block(1),
        KeyCode::Char('r') => app.reset_selected_block(),
        KeyCode::Char('m') => {
            app.begin_grab();
            Ok(())
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(block) = app.selected_block() {
                return Ok(Action::EditBlock(block.id));
            }
            Ok(())
        }
        _ => Ok(()),
    };

    if let Err(e) = result {
        app.set_error_message(e.to_string());
    }
    Ok(Action::Continue)
}
