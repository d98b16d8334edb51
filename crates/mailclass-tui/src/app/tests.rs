use super::*;
use crate::action::Action;
use crate::tui_event::BackendEvent;

use mailclass_core::{
    ClassificationResult, ClassifyError, Provider, RequestState, SelectedFile, SelectionSource,
};

/// Create a minimal App for testing (no backend listener).
fn test_app() -> App {
    App::new(
        ClassificationOptions::default(),
        Theme::hacker(),
        "http://localhost:8000".to_string(),
    )
}

/// App wired to a channel so sent commands can be inspected.
fn wired_app() -> (App, mpsc::UnboundedReceiver<BackendCommand>) {
    let mut app = test_app();
    let (tx, rx) = mpsc::unbounded_channel();
    app.backend_cmd_tx = Some(tx);
    (app, rx)
}

fn select(app: &mut App, name: &str) {
    let _ = app.selection.select_file(
        SelectionSource::Picker,
        SelectedFile::from_bytes(name, b"Bom dia".to_vec()),
    );
}

fn verdict(category: &str) -> ClassificationResult {
    ClassificationResult {
        category: category.to_string(),
        confidence: 0.91,
        suggested_reply: "Obrigado!".to_string(),
        language: "pt".to_string(),
        preview: "Bom dia".to_string(),
        provider: None,
    }
}

// ── Submission ─────────────────────────────────────────────────

#[test]
fn submit_without_file_shows_error_and_sends_nothing() {
    let (mut app, mut rx) = wired_app();
    app.update(Action::Submit);
    assert_eq!(app.orchestrator.error(), Some(&ClassifyError::NoFileSelected));
    assert!(rx.try_recv().is_err());
}

#[test]
fn submit_with_bad_extension_sends_nothing() {
    let (mut app, mut rx) = wired_app();
    select(&mut app, "mail.docx");
    assert!(app.selection.validation_issue().is_some());

    app.update(Action::DrillIn);
    assert!(matches!(
        app.orchestrator.error(),
        Some(ClassifyError::InvalidExtension { .. })
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn submit_sends_current_options() {
    let (mut app, mut rx) = wired_app();
    select(&mut app, "mail.TXT");
    app.update(Action::ToggleStemming);
    app.update(Action::CycleProvider);
    app.update(Action::Submit);

    assert!(app.orchestrator.is_loading());
    match rx.try_recv() {
        Ok(BackendCommand::Classify(pending)) => {
            assert_eq!(pending.file.name, "mail.TXT");
            assert!(pending.options.stemming_enabled);
            assert_eq!(pending.options.provider, Provider::HuggingFace);
        }
        other => panic!("expected Classify, got {other:?}"),
    }
}

#[test]
fn submit_is_ignored_while_loading() {
    let (mut app, mut rx) = wired_app();
    select(&mut app, "a.pdf");
    app.update(Action::Submit);
    let generation = app.orchestrator.generation();

    app.update(Action::Submit);
    assert_eq!(app.orchestrator.generation(), generation);
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
}

#[test]
fn backend_result_lands_in_success() {
    let mut app = test_app();
    select(&mut app, "a.pdf");
    app.update(Action::Submit);
    let generation = app.orchestrator.generation();

    app.handle_backend_event(BackendEvent::Classified {
        generation,
        outcome: Ok(verdict("Produtivo")),
    });
    assert_eq!(app.orchestrator.result().unwrap().category, "Produtivo");
}

#[test]
fn backend_failure_message_is_shown() {
    let mut app = test_app();
    select(&mut app, "a.pdf");
    app.update(Action::Submit);
    let generation = app.orchestrator.generation();

    app.handle_backend_event(BackendEvent::Classified {
        generation,
        outcome: Err(ClassifyError::server_rejected(503, "")),
    });
    assert!(app.orchestrator.error_message().unwrap().contains("503"));
}

#[test]
fn cancel_returns_to_idle_and_drops_late_result() {
    let (mut app, mut rx) = wired_app();
    select(&mut app, "a.pdf");
    app.update(Action::Submit);
    let generation = app.orchestrator.generation();
    let _ = rx.try_recv();

    app.update(Action::CancelRequest);
    assert_eq!(app.orchestrator.state(), &RequestState::Idle);
    assert!(matches!(rx.try_recv(), Ok(BackendCommand::Cancel)));

    app.handle_backend_event(BackendEvent::Classified {
        generation,
        outcome: Ok(verdict("Produtivo")),
    });
    assert_eq!(app.orchestrator.state(), &RequestState::Idle);
}

#[test]
fn cancel_when_idle_sends_nothing() {
    let (mut app, mut rx) = wired_app();
    app.update(Action::CancelRequest);
    assert!(rx.try_recv().is_err());
    assert!(app.notice.is_none());
}

#[test]
fn closed_listener_fails_the_submission() {
    let (mut app, rx) = wired_app();
    drop(rx);
    select(&mut app, "a.pdf");
    app.update(Action::Submit);
    assert!(matches!(
        app.orchestrator.error(),
        Some(ClassifyError::NetworkFailure(_))
    ));
}

// ── File slot ──────────────────────────────────────────────────

#[test]
fn remove_clears_file_and_picker_choice() {
    let mut app = test_app();
    select(&mut app, "a.pdf");
    app.file_picker.chosen = Some(PathBuf::from("/tmp/a.pdf"));

    app.update(Action::RemoveFile);
    assert!(!app.selection.has_file());
    assert!(app.file_picker.chosen.is_none());
}

#[test]
fn dropped_path_is_selected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chamado.pdf");
    std::fs::write(&path, b"%PDF-1.4").unwrap();

    let mut app = test_app();
    app.update(Action::DropPath(format!("'{}'\n", path.display())));
    let file = app.selection.selected().unwrap();
    assert_eq!(file.name, "chamado.pdf");
    assert_eq!(file.size_bytes, 8);
}

#[test]
fn drop_uses_first_openable_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.pdf");
    std::fs::write(&first, b"a").unwrap();
    std::fs::write(&second, b"b").unwrap();

    let mut app = test_app();
    app.update(Action::DropPath(format!(
        "{}\n{}",
        first.display(),
        second.display()
    )));
    assert_eq!(app.selection.selected().unwrap().name, "first.txt");
}

#[test]
fn empty_drop_keeps_current_file() {
    let mut app = test_app();
    select(&mut app, "a.pdf");
    app.update(Action::DropPath("  \n".to_string()));
    assert_eq!(app.selection.selected().unwrap().name, "a.pdf");
}

#[test]
fn missing_dropped_path_sets_notice() {
    let mut app = test_app();
    select(&mut app, "a.pdf");
    app.update(Action::DropPath("/definitely/not/here.pdf".to_string()));
    assert!(app.notice.is_some());
    assert_eq!(app.selection.selected().unwrap().name, "a.pdf");
}

// ── File picker ────────────────────────────────────────────────

#[test]
fn picker_lists_dirs_first_and_flags_accepted_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("inbox")).unwrap();
    std::fs::write(dir.path().join("b.TXT"), b"x").unwrap();
    std::fs::write(dir.path().join("a.docx"), b"x").unwrap();
    std::fs::write(dir.path().join(".hidden.pdf"), b"x").unwrap();

    let picker = FilePickerState::in_dir(dir.path().to_path_buf());
    let names: Vec<&str> = picker.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["..", "inbox", "a.docx", "b.TXT"]);
    assert!(!picker.entries[2].is_accepted);
    assert!(picker.entries[3].is_accepted);
}

#[test]
fn picking_a_file_selects_it_and_returns_to_form() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mail.pdf"), b"%PDF").unwrap();

    let mut app = test_app();
    app.file_picker = FilePickerState::in_dir(dir.path().to_path_buf());
    app.screen = Screen::FilePicker;

    // Skip ".." and land on the file
    app.update(Action::MoveDown);
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.selection.selected().unwrap().name, "mail.pdf");
    assert!(app.file_picker.chosen.is_some());
}

#[test]
fn picking_unaccepted_file_keeps_it_with_issue() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mail.eml"), b"From: a").unwrap();

    let mut app = test_app();
    app.file_picker = FilePickerState::in_dir(dir.path().to_path_buf());
    app.screen = Screen::FilePicker;
    app.update(Action::MoveDown);
    app.update(Action::Select);

    assert_eq!(app.selection.selected().unwrap().name, "mail.eml");
    assert!(matches!(
        app.selection.validation_issue(),
        Some(ClassifyError::InvalidExtension { .. })
    ));
}

#[test]
fn drill_in_enters_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("inbox")).unwrap();
    std::fs::write(dir.path().join("inbox").join("x.txt"), b"x").unwrap();

    let mut app = test_app();
    app.file_picker = FilePickerState::in_dir(dir.path().to_path_buf());
    app.screen = Screen::FilePicker;
    app.update(Action::MoveDown);
    app.update(Action::DrillIn);

    assert_eq!(app.screen, Screen::FilePicker);
    assert_eq!(app.file_picker.current_dir, dir.path().join("inbox"));
    assert!(app.file_picker.entries.iter().any(|e| e.name == "x.txt"));
}

#[test]
fn esc_leaves_picker_without_changing_selection() {
    let mut app = test_app();
    select(&mut app, "a.pdf");
    app.update(Action::OpenPicker);
    assert_eq!(app.screen, Screen::FilePicker);

    app.update(Action::NavigateBack);
    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.selection.selected().unwrap().name, "a.pdf");
}

// ── Overlays ───────────────────────────────────────────────────

#[test]
fn quit_requires_confirmation() {
    let mut app = test_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);

    app.update(Action::NavigateBack);
    assert!(!app.confirm_quit);

    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn help_swallows_other_actions() {
    let mut app = test_app();
    app.update(Action::ToggleHelp);
    assert!(app.show_help);

    app.update(Action::ToggleStemming);
    assert!(!app.options.stemming_enabled);

    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}

#[test]
fn theme_cycles() {
    let mut app = test_app();
    app.update(Action::CycleTheme);
    assert_eq!(app.theme.name, "modern");
    app.update(Action::CycleTheme);
    assert_eq!(app.theme.name, "hacker");
}
