//! Theme system for dark/light modes

use ratatui::style::{Color, Modifier, Style};
use readmekit_core::config::ThemeVariant;

/// Theme definition
#[derive(Clone, Debug)]
pub struct Theme {
    pub base: Style,
    pub heading: [Style; 6],
    pub code: Style,
    pub link: Style,
    pub list_marker: Style,
    pub quote: Style,
    pub muted: Style,
    pub modified: Style,
    pub border: Color,
    pub border_focused: Color,
    pub selected: Style,
    pub grabbed: Style,
    pub status_bar_fg: Color,
    pub status_bar_bg: Color,
    pub notice_ok: Style,
    pub notice_err: Style,
}

impl Theme {
    /// Create a theme for the given variant
    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            base: Style::default().fg(Color::White),
            heading: [
                Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::LightCyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            ],
            code: Style::default().fg(Color::Yellow),
            link: Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
            list_marker: Style::default().fg(Color::LightRed),
            quote: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            muted: Style::default().fg(Color::DarkGray),
            modified: Style::default().fg(Color::LightYellow),
            border: Color::DarkGray,
            border_focused: Color::LightCyan,
            selected: Style::default()
                .fg(Color::Black)
                .bg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
            grabbed: Style::default()
                .fg(Color::Black)
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            status_bar_fg: Color::Black,
            status_bar_bg: Color::LightBlue,
            notice_ok: Style::default().fg(Color::Black).bg(Color::LightGreen),
            notice_err: Style::default().fg(Color::White).bg(Color::Red),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            base: Style::default().fg(Color::Black),
            heading: [
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                Style::default()
                    .fg(Color::Rgb(150, 100, 0))
                    .add_modifier(Modifier::BOLD), // Dark yellow
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
            ],
            code: Style::default().fg(Color::Rgb(150, 75, 0)), // Orange-brown
            link: Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            list_marker: Style::default().fg(Color::Red),
            quote: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            muted: Style::default().fg(Color::Gray),
            modified: Style::default().fg(Color::Rgb(150, 100, 0)),
            border: Color::Gray,
            border_focused: Color::Blue,
            selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            grabbed: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            notice_ok: Style::default().fg(Color::White).bg(Color::Green),
            notice_err: Style::default().fg(Color::White).bg(Color::Red),
        }
    }
}
