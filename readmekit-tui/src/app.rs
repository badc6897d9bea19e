//! Application state

use crossbeam_channel::Receiver;
use ratatui::text::Line;
use readmekit_core::assemble::assemble;
use readmekit_core::catalog::{BlockTemplate, Catalog, Category};
use readmekit_core::composition::{BlockId, BlockInstance, Change, Composition};
use readmekit_core::config::{Config, ThemeVariant};
use readmekit_core::error::{CompositionError, CompositionResult};
use readmekit_core::export::{self, ExportReport, ExportSink, FileSink};
use readmekit_core::outline::{self, Heading};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[cfg(feature = "clipboard")]
use readmekit_core::export::ClipboardSink;

use crate::render::{PreviewCache, RenderKey};
use crate::theme::Theme;

/// Which list receives navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Catalog,
    Composition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Transient message shown in the status bar
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Option<Instant>,
}

/// A block picked up for reordering.
///
/// Nothing is committed to the composition until the grab is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grab {
    pub id: BlockId,
    pub origin: usize,
    pub target: usize,
}

/// Main application state
pub struct App {
    pub config: Config,
    pub catalog: Catalog,
    pub composition: Composition,
    pub theme: Theme,
    pub theme_variant: ThemeVariant,
    pub focus: Focus,
    pub category_filter: Option<Category>,
    pub catalog_selected: usize,
    pub block_selected: usize,
    pub grab: Option<Grab>,
    pub show_help: bool,
    pub show_outline: bool,
    pub should_quit: bool,
    pub preview_scroll: usize,
    pub status: Option<StatusMessage>,
    pub output_dir: PathBuf,
    changes: Receiver<Change>,
    preview: PreviewCache,
    #[cfg(feature = "clipboard")]
    clipboard: ClipboardSink,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, catalog: Catalog) -> Self {
        let mut composition = Composition::new();
        let changes = composition.subscribe();
        let theme_variant = config.theme;
        let show_outline = config.preview.outline;

        Self {
            config,
            catalog,
            composition,
            theme: Theme::for_variant(theme_variant),
            theme_variant,
            focus: Focus::Catalog,
            category_filter: None,
            catalog_selected: 0,
            block_selected: 0,
            grab: None,
            show_help: false,
            show_outline,
            should_quit: false,
            preview_scroll: 0,
            status: None,
            output_dir: PathBuf::from("."),
            changes,
            preview: PreviewCache::new(),
            #[cfg(feature = "clipboard")]
            clipboard: ClipboardSink::new(),
        }
    }

    /// Directory the README is saved into
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    // --- catalog pane ---

    /// Templates shown under the current category filter
    pub fn visible_templates(&self) -> Vec<&BlockTemplate> {
        self.catalog.list_templates(self.category_filter)
    }

    pub fn selected_template(&self) -> Option<&BlockTemplate> {
        self.visible_templates().get(self.catalog_selected).copied()
    }

    /// Cycle the filter: all, then each category present in the catalog
    pub fn cycle_category(&mut self) {
        let categories = self.catalog.categories();
        self.category_filter = match self.category_filter {
            None => categories.first().copied(),
            Some(current) => categories
                .iter()
                .position(|&c| c == current)
                .and_then(|idx| categories.get(idx + 1).copied()),
        };
        self.catalog_selected = 0;
    }

    /// Append the highlighted template to the document
    pub fn add_selected_template(&mut self) -> Option<BlockId> {
        let template = self.selected_template()?.clone();
        let id = self.composition.add_block(&template);
        self.block_selected = self.composition.len().saturating_sub(1);
        Some(id)
    }

    // --- composition pane ---

    pub fn selected_block(&self) -> Option<&BlockInstance> {
        self.composition.block_at(self.block_selected)
    }

    /// Zero-based lines of the assembled document that come from the selected block
    pub fn selected_block_lines(&self) -> Option<Range<usize>> {
        let selected = self.selected_block()?;
        let mut start = 0;
        for index in 0..self.composition.len() {
            let block = self.composition.block_at(index)?;
            let newlines = block.content.matches('\n').count();
            if block.id == selected.id {
                return Some(start..start + newlines.max(1));
            }
            start += newlines;
        }
        None
    }

    /// Blocks in display order, with a grabbed block shown at its pending target
    pub fn display_blocks(&self) -> Vec<&BlockInstance> {
        let mut blocks: Vec<&BlockInstance> =
            (0..self.composition.len()).filter_map(|i| self.composition.block_at(i)).collect();

        if let Some(grab) = self.grab {
            if grab.origin < blocks.len() && grab.target < blocks.len() {
                let block = blocks.remove(grab.origin);
                blocks.insert(grab.target, block);
            }
        }
        blocks
    }

    pub fn remove_selected_block(&mut self) -> CompositionResult<()> {
        let id = self.selected_id()?;
        self.composition.remove_block(id)?;
        self.block_selected = self
            .block_selected
            .min(self.composition.len().saturating_sub(1));
        Ok(())
    }

    /// Move the selected block one step up (`-1`) or down (`1`).
    ///
    /// Moving past either end does nothing.
    pub fn move_selected_block(&mut self, delta: isize) -> CompositionResult<()> {
        let id = self.selected_id()?;
        let Some(target) = self.block_selected.checked_add_signed(delta) else {
            return Ok(());
        };
        if target >= self.composition.len() {
            return Ok(());
        }

        self.composition.move_block(id, target)?;
        self.block_selected = target;
        Ok(())
    }

    pub fn reset_selected_block(&mut self) -> CompositionResult<()> {
        let id = self.selected_id()?;
        self.composition.reset_block_content(id)
    }

    /// Replace a block's content with text from the editor
    pub fn set_block_content(&mut self, id: BlockId, content: String) -> CompositionResult<()> {
        self.composition.update_block_content(id, content)
    }

    fn selected_id(&self) -> CompositionResult<BlockId> {
        self.selected_block()
            .map(|b| b.id)
            .ok_or(CompositionError::OutOfRange {
                index: self.block_selected,
                len: self.composition.len(),
            })
    }

    // --- keyboard drag ---

    pub fn begin_grab(&mut self) {
        if let Some(id) = self.selected_block().map(|b| b.id) {
            self.grab = Some(Grab {
                id,
                origin: self.block_selected,
                target: self.block_selected,
            });
        }
    }

    pub fn grab_move(&mut self, delta: isize) {
        let len = self.composition.len();
        if let Some(grab) = self.grab.as_mut() {
            if let Some(target) = grab.target.checked_add_signed(delta) {
                if target < len {
                    grab.target = target;
                }
            }
        }
    }

    /// Drop the grabbed block at its pending position as one move
    pub fn commit_grab(&mut self) -> CompositionResult<()> {
        let Some(grab) = self.grab.take() else {
            return Ok(());
        };
        self.composition.move_block(grab.id, grab.target)?;
        self.block_selected = grab.target;
        Ok(())
    }

    /// Abandon the gesture; the composition is untouched
    pub fn cancel_grab(&mut self) {
        if let Some(grab) = self.grab.take() {
            self.block_selected = grab.origin;
        }
    }

    // --- navigation ---

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Catalog => Focus::Composition,
            Focus::Composition => Focus::Catalog,
        };
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Catalog => {
                let len = self.visible_templates().len();
                if self.catalog_selected + 1 < len {
                    self.catalog_selected += 1;
                }
            }
            Focus::Composition => {
                if self.block_selected + 1 < self.composition.len() {
                    self.block_selected += 1;
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Catalog => self.catalog_selected = self.catalog_selected.saturating_sub(1),
            Focus::Composition => self.block_selected = self.block_selected.saturating_sub(1),
        }
    }

    pub fn scroll_preview(&mut self, delta: isize, viewport_height: usize) {
        let max = self.preview_line_count().saturating_sub(viewport_height.max(1));
        self.preview_scroll = self.preview_scroll.saturating_add_signed(delta).min(max);
    }

    /// React to composition changes since the last call.
    ///
    /// Returns true when anything changed.
    pub fn process_changes(&mut self) -> bool {
        let mut changed = false;
        for change in self.changes.try_iter() {
            log::trace!("composition rev {}: {:?}", change.rev, change.event);
            changed = true;
        }

        if changed {
            self.block_selected = self
                .block_selected
                .min(self.composition.len().saturating_sub(1));
            if let Some(grab) = self.grab {
                if self.composition.position(grab.id) != Some(grab.origin) {
                    self.grab = None;
                }
            }
            let max = self.preview_line_count().saturating_sub(1);
            self.preview_scroll = self.preview_scroll.min(max);
        }
        changed
    }

    // --- preview ---

    /// Assembled README for the current state
    pub fn markdown(&self) -> String {
        assemble(&self.composition.snapshot())
    }

    pub fn outline(&self) -> Vec<Heading> {
        outline::extract_headings(&self.markdown())
    }

    /// Styled preview, rendered at most once per revision and theme
    pub fn preview_lines(&mut self) -> &[Line<'static>] {
        let key = RenderKey {
            rev: self.composition.rev(),
            theme: self.theme_variant,
        };
        let composition = &self.composition;
        self.preview
            .lines(key, &self.theme, || assemble(&composition.snapshot()))
    }

    fn preview_line_count(&mut self) -> usize {
        self.preview_lines().len()
    }

    // --- export ---

    /// Export the current document; failures become a status message only
    pub fn export_to(&mut self, sink: &mut dyn ExportSink, success: &str) -> Option<ExportReport> {
        match export::export(&self.composition.snapshot(), sink) {
            Ok(report) => {
                let expires = Duration::from_millis(self.config.export.notice_ms);
                self.set_timed_message(success.to_string(), StatusKind::Success, expires);
                Some(report)
            }
            Err(e) => {
                self.set_error_message(format!("Export failed: {}", e));
                None
            }
        }
    }

    /// Copy the document to the system clipboard
    #[cfg(feature = "clipboard")]
    pub fn copy_to_clipboard(&mut self) -> Option<ExportReport> {
        let mut clipboard = std::mem::take(&mut self.clipboard);
        let report = self.export_to(&mut clipboard, "Copied");
        self.clipboard = clipboard;
        report
    }

    #[cfg(not(feature = "clipboard"))]
    pub fn copy_to_clipboard(&mut self) -> Option<ExportReport> {
        self.set_error_message("Clipboard support not compiled in");
        None
    }

    /// Path the README is saved to
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.config.export.filename)
    }

    /// Save the document as a file in the output directory
    pub fn save(&mut self) -> Option<ExportReport> {
        let path = self.output_path();
        let mut sink = FileSink::new(&path);
        let message = format!("Saved {}", display_name(&path));
        self.export_to(&mut sink, &message)
    }

    // --- misc ---

    pub fn toggle_theme(&mut self) {
        self.theme_variant = self.theme_variant.toggled();
        self.theme = Theme::for_variant(self.theme_variant);
    }

    pub fn toggle_outline(&mut self) {
        self.show_outline = !self.show_outline;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_info_message(&mut self, text: impl Into<String>) {
        self.set_message(text.into(), StatusKind::Info, None);
    }

    pub fn set_success_message(&mut self, text: impl Into<String>) {
        self.set_message(text.into(), StatusKind::Success, None);
    }

    pub fn set_error_message(&mut self, text: impl Into<String>) {
        self.set_message(text.into(), StatusKind::Error, None);
    }

    fn set_timed_message(&mut self, text: String, kind: StatusKind, after: Duration) {
        self.set_message(text, kind, Some(Instant::now() + after));
    }

    fn set_message(&mut self, text: String, kind: StatusKind, expires_at: Option<Instant>) {
        self.status = Some(StatusMessage {
            text,
            kind,
            expires_at,
        });
    }

    pub fn clear_status_message(&mut self) {
        self.status = None;
    }

    /// Drop a timed message once its deadline has passed
    pub fn expire_status(&mut self, now: Instant) {
        if self
            .status
            .as_ref()
            .and_then(|s| s.expires_at)
            .is_some_and(|deadline| now >= deadline)
        {
            self.status = None;
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(names: &[&str]) -> App {
        let catalog = Catalog::from_templates(
            names
                .iter()
                .map(|n| BlockTemplate::new(*n, Category::Project, format!("## {}\n\n", n))),
        );
        App::new(Config::default(), catalog)
    }

    #[test]
    fn test_add_selects_new_block() {
        let mut app = app_with(&["A", "B"]);
        app.select_next();
        let id = app.add_selected_template().unwrap();

        assert_eq!(app.selected_block().map(|b| b.id), Some(id));
        assert_eq!(app.selected_block().map(|b| b.name()), Some("B"));
    }

    #[test]
    fn test_move_past_ends_is_noop() {
        let mut app = app_with(&["A"]);
        app.add_selected_template();
        let rev = app.composition.rev();

        app.move_selected_block(-1).unwrap();
        app.move_selected_block(1).unwrap();
        assert_eq!(app.composition.rev(), rev);
    }

    #[test]
    fn test_remove_on_empty_composition_is_an_error() {
        let mut app = app_with(&["A"]);
        assert!(app.remove_selected_block().is_err());
    }

    #[test]
    fn test_grab_preview_order() {
        let mut app = app_with(&["A", "B", "C"]);
        for _ in 0..3 {
            app.add_selected_template();
            app.select_next();
        }
        app.focus = Focus::Composition;
        app.block_selected = 0;
        app.begin_grab();
        app.grab_move(1);
        app.grab_move(1);
        app.grab_move(1);

        let names: Vec<_> = app.display_blocks().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        // Not committed yet
        assert_eq!(app.composition.block_at(0).map(|b| b.name()), Some("A"));
    }

    #[test]
    fn test_selected_block_lines_track_outline() {
        let mut app = app_with(&["A", "B", "C"]);
        for _ in 0..3 {
            app.add_selected_template();
            app.select_next();
        }
        app.block_selected = 1;

        // Each block is "## X\n\n": two lines
        assert_eq!(app.selected_block_lines(), Some(2..4));
        let outline = app.outline();
        let current: Vec<_> = outline
            .iter()
            .filter(|h| app.selected_block_lines().is_some_and(|r| r.contains(&h.line)))
            .map(|h| h.text.as_str())
            .collect();
        assert_eq!(current, vec!["B"]);
    }

    #[test]
    fn test_selected_block_lines_empty() {
        let app = app_with(&["A"]);
        assert_eq!(app.selected_block_lines(), None);
    }

    #[test]
    fn test_expire_status() {
        let mut app = app_with(&[]);
        app.set_timed_message("Copied".to_string(), StatusKind::Success, Duration::from_millis(10));
        let start = Instant::now();

        app.expire_status(start);
        assert!(app.status.is_some());

        app.expire_status(start + Duration::from_secs(1));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_cycle_category() {
        let mut app = app_with(&["A"]);
        app.catalog.merge(Catalog::from_templates(vec![BlockTemplate::new(
            "Me",
            Category::Personal,
            "# Me\n",
        )]));

        assert_eq!(app.visible_templates().len(), 2);
        app.cycle_category();
        assert_eq!(app.category_filter, Some(Category::Project));
        app.cycle_category();
        assert_eq!(app.category_filter, Some(Category::Personal));
        assert_eq!(app.visible_templates().len(), 1);
        app.cycle_category();
        assert_eq!(app.category_filter, None);
    }
}
