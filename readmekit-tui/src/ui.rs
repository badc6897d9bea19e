//! UI rendering

use crate::app::{App, Focus, StatusKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use readmekit_core::config::ThemeVariant;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CATALOG_WIDTH: u16 = 32;
const COMPOSITION_WIDTH: u16 = 32;

const HELP: &[(&str, &str)] = &[
    ("Tab", "switch catalog / composition"),
    ("j/k", "select next / previous"),
    ("a, Enter", "add block (catalog)"),
    ("c", "cycle category (catalog)"),
    ("d", "remove block"),
    ("J/K", "move block down / up"),
    ("m", "grab block; j/k, Enter drop, Esc cancel"),
    ("e, Enter", "edit block in $EDITOR"),
    ("r", "reset block to template"),
    ("y", "copy README to clipboard"),
    ("w", "write README file"),
    ("PgUp/PgDn", "scroll preview"),
    ("o", "toggle outline"),
    ("t", "toggle theme"),
    ("?", "toggle help"),
    ("q", "quit"),
];

/// Height of the preview viewport for a terminal of `height` rows
pub fn preview_viewport_height(height: u16) -> usize {
    // -1 for status bar, -2 for pane borders (top and bottom)
    height.saturating_sub(3) as usize
}

/// Draw the UI
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let mut constraints = vec![
        Constraint::Length(CATALOG_WIDTH),
        Constraint::Length(COMPOSITION_WIDTH),
        Constraint::Min(1),
    ];
    if app.show_outline {
        constraints.push(Constraint::Length(app.config.preview.outline_width));
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(chunks[0]);

    render_catalog(frame, app, panes[0]);
    render_composition(frame, app, panes[1]);
    render_preview(frame, app, panes[2]);
    if app.show_outline {
        render_outline(frame, app, panes[3]);
    }

    render_status_bar(frame, app, chunks[1]);

    if app.show_help {
        render_help(frame, app);
    }
}

fn pane_block<'a>(app: &App, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    let border = if focused {
        app.theme.border_focused
    } else {
        app.theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

/// First visible row so that `selected` stays inside a window of `height` rows
fn list_offset(selected: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    selected.saturating_sub(height - 1)
}

fn render_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Catalog;
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;
    let offset = list_offset(app.catalog_selected, height);

    let lines: Vec<Line> = app
        .visible_templates()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, template)| {
            let text = truncate(&format!(" {}", template.name), width);
            if idx == app.catalog_selected && focused {
                Line::from(text).style(app.theme.selected)
            } else if idx == app.catalog_selected {
                Line::from(text).style(app.theme.base.add_modifier(Modifier::BOLD))
            } else {
                Line::from(text).style(app.theme.base)
            }
        })
        .collect();

    let title = match app.category_filter {
        Some(category) => format!("Blocks [{}]", category),
        None => "Blocks [all]".to_string(),
    };

    let widget = Paragraph::new(lines)
        .block(pane_block(app, title, focused))
        .style(app.theme.base);
    frame.render_widget(widget, area);
}

fn render_composition(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Composition;
    let width = area.width.saturating_sub(2) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let selected = app.grab.map(|g| g.target).unwrap_or(app.block_selected);
    let offset = list_offset(selected, height);

    let lines: Vec<Line> = if app.composition.is_empty() {
        vec![Line::styled(" (empty)", app.theme.muted)]
    } else {
        app.display_blocks()
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(idx, block)| {
                let grabbed = app.grab.is_some_and(|g| g.id == block.id);
                let marker = if grabbed {
                    "≡"
                } else if block.is_modified() {
                    "*"
                } else {
                    " "
                };
                let text = truncate(&format!("{}{}. {}", marker, idx + 1, block.name()), width);

                if grabbed {
                    Line::from(text).style(app.theme.grabbed)
                } else if idx == selected && focused {
                    Line::from(text).style(app.theme.selected)
                } else if block.is_modified() {
                    Line::from(text).style(app.theme.modified)
                } else {
                    Line::from(text).style(app.theme.base)
                }
            })
            .collect()
    };

    let title = if app.grab.is_some() {
        "README [moving]"
    } else {
        "README"
    };

    let widget = Paragraph::new(lines)
        .block(pane_block(app, title, focused))
        .style(app.theme.base);
    frame.render_widget(widget, area);
}

fn render_preview(frame: &mut Frame, app: &mut App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let scroll = app.preview_scroll;

    let lines: Vec<Line<'static>> = if app.composition.is_empty() {
        vec![Line::styled(
            "Select blocks on the left to start your README",
            app.theme.muted,
        )]
    } else {
        app.preview_lines()
            .iter()
            .skip(scroll)
            .take(height)
            .cloned()
            .collect()
    };

    let widget = Paragraph::new(lines)
        .block(pane_block(app, "Preview", false))
        .style(app.theme.base);
    frame.render_widget(widget, area);
}

fn render_outline(frame: &mut Frame, app: &App, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    // Headings of the selected block are marked
    let selected = app.selected_block_lines().unwrap_or_default();

    let lines: Vec<Line> = app
        .outline()
        .iter()
        .map(|heading| {
            // Indent based on level (2 spaces per level, starting from level 1)
            let indent = "  ".repeat((heading.level as usize).saturating_sub(1));
            let current = selected.contains(&heading.line);
            let marker = if current { "▸" } else { " " };
            let text = truncate(&format!("{}{}{}", marker, indent, heading.text), width);
            let style = app.theme.heading[(heading.level as usize).clamp(1, 6) - 1];
            if current {
                Line::from(text).style(style.add_modifier(Modifier::REVERSED))
            } else {
                Line::from(text).style(style)
            }
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(pane_block(app, "Outline", false))
        .style(app.theme.base);
    frame.render_widget(widget, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let category = app
        .category_filter
        .map(|c| c.to_string())
        .unwrap_or_else(|| "all".to_string());

    let focus_str = match app.focus {
        Focus::Catalog => "CATALOG",
        Focus::Composition => "README",
    };

    let theme_str = match app.theme_variant {
        ThemeVariant::Dark => "DARK",
        ThemeVariant::Light => "LIGHT",
    };

    let status_text = format!(
        " readmekit  {} blocks  rev {}  [{}]  [{}]  [{}] ",
        app.composition.len(),
        app.composition.rev(),
        category,
        focus_str,
        theme_str
    );

    let bar_style = Style::default()
        .fg(app.theme.status_bar_fg)
        .bg(app.theme.status_bar_bg)
        .add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled(status_text, bar_style)];
    if let Some(status) = &app.status {
        let style = match status.kind {
            StatusKind::Info => bar_style,
            StatusKind::Success => app.theme.notice_ok,
            StatusKind::Error => app.theme.notice_err,
        };
        spans.push(Span::styled(format!(" {} ", status.text), style));
    }

    let status = Paragraph::new(Line::from(spans)).style(bar_style);
    frame.render_widget(status, area);
}

fn render_help(frame: &mut Frame, app: &App) {
    let key_width = HELP.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!(" {:<width$}  ", keys, width = key_width), app.theme.list_marker),
                Span::styled(*what, app.theme.base),
            ])
        })
        .collect();

    let width = HELP
        .iter()
        .map(|(_, what)| what.width())
        .max()
        .unwrap_or(0)
        + key_width
        + 5;
    let area = centered(frame.area(), width as u16, lines.len() as u16 + 2);

    frame.render_widget(Clear, area);
    let widget = Paragraph::new(lines)
        .block(pane_block(app, "Help (Esc to close)", true))
        .style(app.theme.base);
    frame.render_widget(widget, area);
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
