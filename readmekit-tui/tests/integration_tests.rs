//! Integration tests for readmekit-tui
//!
//! These tests exercise the full application flow end-to-end without a
//! terminal: picking blocks, reordering, editing, exporting and previewing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use readmekit_core::export::ExportSink;
use readmekit_core::{BlockTemplate, Catalog, Category, Config, SinkError};
use readmekit_tui::app::{Focus, StatusKind};
use readmekit_tui::input::{handle_input, Action};
use readmekit_tui::App;
use tempfile::TempDir;

const VIEWPORT: usize = 20;

/// Catalog with a few small blocks in a known order
fn test_catalog() -> Catalog {
    Catalog::from_templates(vec![
        BlockTemplate::new("Title", Category::Project, "# Title\n"),
        BlockTemplate::new("Install", Category::Project, "## Install\n"),
        BlockTemplate::new("License", Category::Project, "## License\n"),
        BlockTemplate::new("About Me", Category::Personal, "## About Me\n"),
    ])
}

fn create_test_app() -> App {
    App::new(Config::default(), test_catalog())
}

fn press(app: &mut App, code: KeyCode) -> Action {
    handle_input(app, KeyEvent::new(code, KeyModifiers::NONE), VIEWPORT)
        .expect("input handling failed")
}

fn press_all(app: &mut App, codes: &[KeyCode]) {
    for &code in codes {
        press(app, code);
    }
}

/// Add Title, Install and License in catalog order
fn app_with_three_blocks() -> App {
    let mut app = create_test_app();
    press_all(
        &mut app,
        &[
            KeyCode::Char('a'),
            KeyCode::Char('j'),
            KeyCode::Char('a'),
            KeyCode::Char('j'),
            KeyCode::Char('a'),
        ],
    );
    app.process_changes();
    app
}

struct FailingSink;

impl ExportSink for FailingSink {
    fn describe(&self) -> String {
        "nowhere".to_string()
    }

    fn export(&mut self, _markdown: &str) -> Result<(), SinkError> {
        Err(SinkError::Rejected("sink is broken".to_string()))
    }
}

#[test]
fn integration_app_initialization() {
    let app = create_test_app();

    assert!(!app.should_quit);
    assert!(!app.show_help);
    assert!(app.composition.is_empty());
    assert_eq!(app.focus, Focus::Catalog);
    assert_eq!(app.visible_templates().len(), 4);
    assert_eq!(app.markdown(), "");
}

#[test]
fn integration_add_blocks_in_order() {
    let app = app_with_three_blocks();

    assert_eq!(app.markdown(), "# Title\n## Install\n## License\n");
    assert_eq!(app.composition.rev(), 3);
    assert_eq!(app.selected_block().map(|b| b.name()), Some("License"));
}

#[test]
fn integration_same_template_twice_gets_distinct_ids() {
    let mut app = create_test_app();
    press_all(&mut app, &[KeyCode::Enter, KeyCode::Enter]);

    let ids = app.composition.ids();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(app.markdown(), "# Title\n# Title\n");
}

#[test]
fn integration_move_with_shift_keys() {
    let mut app = app_with_three_blocks();
    press_all(
        &mut app,
        &[KeyCode::Tab, KeyCode::Char('K'), KeyCode::Char('K')],
    );

    assert_eq!(app.markdown(), "## License\n# Title\n## Install\n");
    assert_eq!(app.block_selected, 0);

    // Already at the top: nothing changes
    let rev = app.composition.rev();
    press(&mut app, KeyCode::Char('K'));
    assert_eq!(app.composition.rev(), rev);
}

#[test]
fn integration_grab_commits_one_move() {
    let mut app = app_with_three_blocks();
    press_all(&mut app, &[KeyCode::Tab, KeyCode::Char('m')]);
    let rev = app.composition.rev();

    press_all(&mut app, &[KeyCode::Char('k'), KeyCode::Char('k')]);
    // Pending target is only a preview
    assert_eq!(app.composition.rev(), rev);
    assert_eq!(
        app.display_blocks().iter().map(|b| b.name()).collect::<Vec<_>>(),
        vec!["License", "Title", "Install"]
    );

    press(&mut app, KeyCode::Enter);
    assert!(app.grab.is_none());
    assert_eq!(app.composition.rev(), rev + 1);
    assert_eq!(app.markdown(), "## License\n# Title\n## Install\n");
}

#[test]
fn integration_grab_cancel_leaves_composition_untouched() {
    let mut app = app_with_three_blocks();
    let before = app.composition.snapshot();

    press_all(
        &mut app,
        &[
            KeyCode::Tab,
            KeyCode::Char('m'),
            KeyCode::Char('k'),
            KeyCode::Char('k'),
            KeyCode::Esc,
        ],
    );

    assert!(app.grab.is_none());
    assert_eq!(app.composition.snapshot(), before);
    assert_eq!(app.block_selected, 2);
}

#[test]
fn integration_remove_block() {
    let mut app = app_with_three_blocks();
    press_all(&mut app, &[KeyCode::Tab, KeyCode::Char('k'), KeyCode::Char('d')]);
    app.process_changes();

    assert_eq!(app.markdown(), "# Title\n## License\n");
    assert_eq!(app.selected_block().map(|b| b.name()), Some("License"));

    // Removing the rest clamps the selection
    press_all(&mut app, &[KeyCode::Char('d'), KeyCode::Char('d')]);
    app.process_changes();
    assert!(app.composition.is_empty());
    assert_eq!(app.block_selected, 0);

    // Nothing left to remove
    press(&mut app, KeyCode::Char('d'));
    assert_eq!(
        app.status.as_ref().map(|s| (s.kind, s.text.as_str())),
        Some((StatusKind::Info, "No block selected"))
    );
}

#[test]
fn integration_edit_and_reset_block() {
    let mut app = app_with_three_blocks();
    press(&mut app, KeyCode::Tab);

    let Action::EditBlock(id) = press(&mut app, KeyCode::Char('e')) else {
        panic!("expected an edit request");
    };
    app.set_block_content(id, "## License\n\nMIT\n".to_string())
        .expect("block exists");
    assert_eq!(app.markdown(), "# Title\n## Install\n## License\n\nMIT\n");
    assert!(app.selected_block().is_some_and(|b| b.is_modified()));

    press(&mut app, KeyCode::Char('r'));
    assert_eq!(app.markdown(), "# Title\n## Install\n## License\n");
}

#[test]
fn integration_category_filter() {
    let mut app = create_test_app();

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.category_filter, Some(Category::Project));
    assert_eq!(app.visible_templates().len(), 3);

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.category_filter, Some(Category::Personal));
    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.markdown(), "## About Me\n");

    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.category_filter, None);
}

#[test]
fn integration_save_readme() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_three_blocks().with_output_dir(dir.path());

    press(&mut app, KeyCode::Char('w'));

    let written = std::fs::read_to_string(dir.path().join("README.md")).expect("README written");
    assert_eq!(written, "# Title\n## Install\n## License\n");
    assert_eq!(
        app.status.as_ref().map(|s| (s.kind, s.text.as_str())),
        Some((StatusKind::Success, "Saved README.md"))
    );
    assert!(app.status.as_ref().is_some_and(|s| s.expires_at.is_some()));
}

#[test]
fn integration_save_to_missing_directory_fails_softly() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut app = app_with_three_blocks().with_output_dir(dir.path().join("missing"));
    let before = app.composition.snapshot();

    assert!(app.save().is_none());
    assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
    assert_eq!(app.composition.snapshot(), before);
}

#[test]
fn integration_failing_sink_keeps_composition() {
    let mut app = app_with_three_blocks();
    let before = app.composition.snapshot();

    let report = app.export_to(&mut FailingSink, "Copied");

    assert!(report.is_none());
    assert_eq!(app.composition.snapshot(), before);
    let status = app.status.as_ref().expect("status message set");
    assert_eq!(status.kind, StatusKind::Error);
    assert!(status.text.contains("sink is broken"));
}

#[test]
fn integration_preview_follows_revision() {
    let mut app = app_with_three_blocks();

    let first: Vec<String> = app.preview_lines().iter().map(|l| l.to_string()).collect();
    assert_eq!(first, vec!["# Title", "", "## Install", "", "## License"]);

    press_all(&mut app, &[KeyCode::Tab, KeyCode::Char('d')]);
    assert!(app.process_changes());

    let second: Vec<String> = app.preview_lines().iter().map(|l| l.to_string()).collect();
    assert_eq!(second, vec!["# Title", "", "## Install"]);

    // Nothing new since the last drain
    assert!(!app.process_changes());
}

#[test]
fn integration_theme_toggle_keeps_document() {
    let mut app = app_with_three_blocks();
    let markdown = app.markdown();

    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.theme_variant, readmekit_core::config::ThemeVariant::Light);
    assert!(!app.preview_lines().is_empty());
    assert_eq!(app.markdown(), markdown);
}

#[test]
fn integration_outline() {
    let app = app_with_three_blocks();
    let outline = app.outline();

    let texts: Vec<_> = outline.iter().map(|h| (h.level, h.text.as_str())).collect();
    assert_eq!(texts, vec![(1, "Title"), (2, "Install"), (2, "License")]);
    assert_eq!(outline[1].anchor, "install");
}

#[test]
fn integration_help_swallows_keys() {
    let mut app = app_with_three_blocks();
    let rev = app.composition.rev();

    press(&mut app, KeyCode::Char('?'));
    assert!(app.show_help);
    press_all(&mut app, &[KeyCode::Tab, KeyCode::Char('d')]);
    assert_eq!(app.composition.rev(), rev);

    press(&mut app, KeyCode::Esc);
    assert!(!app.show_help);
}

#[test]
fn integration_quit() {
    let mut app = create_test_app();
    assert_eq!(press(&mut app, KeyCode::Char('q')), Action::Quit);
    assert!(app.should_quit);
}
