//! Live preview rendering and caching

use crate::theme::Theme;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use readmekit_core::config::ThemeVariant;
use std::num::NonZeroUsize;

const CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => panic!("cache size must be non-zero"),
};

/// Key for render cache
#[derive(Hash, PartialEq, Eq, Clone, Copy, Debug)]
pub struct RenderKey {
    pub rev: u64,
    pub theme: ThemeVariant,
}

/// LRU cache of rendered previews, one entry per composition revision and theme
pub struct PreviewCache {
    cache: lru::LruCache<RenderKey, Vec<Line<'static>>>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self {
            cache: lru::LruCache::new(CACHE_SIZE),
        }
    }

    /// Rendered lines for `key`, rendering `source()` on a miss
    pub fn lines(
        &mut self,
        key: RenderKey,
        theme: &Theme,
        source: impl FnOnce() -> String,
    ) -> &[Line<'static>] {
        if !self.cache.contains(&key) {
            let lines = render_markdown(&source(), theme);
            self.cache.put(key, lines);
        }
        self.cache.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &RenderKey) -> bool {
        self.cache.contains(key)
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert Markdown into styled terminal lines
pub fn render_markdown(markdown: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut renderer = Renderer::new(theme);
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(markdown, options) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    heading_level: Option<usize>,
    in_code_block: bool,
    in_link: bool,
    in_image: bool,
    bold: bool,
    italic: bool,
    strike: bool,
    quote_depth: usize,
    /// One entry per open list: next number for ordered lists
    lists: Vec<Option<u64>>,
}

impl<'t> Renderer<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            spans: Vec::new(),
            heading_level: None,
            in_code_block: false,
            in_link: false,
            in_image: false,
            bold: false,
            italic: false,
            strike: false,
            quote_depth: 0,
            lists: Vec::new(),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.spans.push(Span::styled(code.to_string(), self.theme.code)),
            // Block HTML arrives one source line per event
            Event::Html(html) => {
                self.spans.push(Span::styled(html.trim_end().to_string(), self.theme.muted));
                self.flush();
            }
            Event::InlineHtml(html) => {
                self.spans.push(Span::styled(html.to_string(), self.theme.muted));
            }
            Event::SoftBreak | Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines.push(Line::styled("─".repeat(40), self.theme.muted));
                self.blank();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.spans.push(Span::styled(marker, self.theme.list_marker));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                let level = level as usize;
                self.heading_level = Some(level);
                self.spans.push(Span::styled(
                    format!("{} ", "#".repeat(level)),
                    self.heading_style(level),
                ));
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.in_code_block = true;
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::raw("  ".repeat(depth)));
                self.spans.push(Span::styled(marker, self.theme.list_marker));
            }
            Tag::Strong => self.bold = true,
            Tag::Emphasis => self.italic = true,
            Tag::Strikethrough => self.strike = true,
            Tag::Link { .. } => self.in_link = true,
            Tag::Image { .. } => {
                self.in_image = true;
                self.spans.push(Span::styled("[image: ", self.theme.muted));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.heading_level = None;
                self.flush();
                self.blank();
            }
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            TagEnd::HtmlBlock => {
                self.flush();
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.flush();
                self.blank();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Strong => self.bold = false,
            TagEnd::Emphasis => self.italic = false,
            TagEnd::Strikethrough => self.strike = false,
            TagEnd::Link => self.in_link = false,
            TagEnd::Image => {
                self.in_image = false;
                self.spans.push(Span::styled("]", self.theme.muted));
            }
            TagEnd::TableCell => self.spans.push(Span::styled(" │ ", self.theme.muted)),
            TagEnd::TableHead | TagEnd::TableRow => self.flush(),
            TagEnd::Table => {
                self.flush();
                self.blank();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.lines() {
                self.spans.push(Span::styled(format!("  {}", line), self.theme.code));
                self.flush();
            }
            return;
        }

        let style = self.text_style();
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.flush();
            }
            if !part.is_empty() {
                self.spans.push(Span::styled(part.to_string(), style));
            }
        }
    }

    fn text_style(&self) -> Style {
        if let Some(level) = self.heading_level {
            return self.heading_style(level);
        }
        if self.in_link || self.in_image {
            return self.theme.link;
        }

        let mut style = if self.quote_depth > 0 {
            self.theme.quote
        } else {
            self.theme.base
        };
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.italic {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strike {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        style
    }

    fn heading_style(&self, level: usize) -> Style {
        self.theme.heading[level.clamp(1, 6) - 1]
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled("│ ".repeat(self.quote_depth), self.theme.quote));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Add a separating empty line unless one is already there
    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}
