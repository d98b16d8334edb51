use mailclass_core::{ClassifyError, SelectedFile, SelectionSource};

use super::util::{osc52_copy, parse_dropped_paths};
use super::{App, Screen};
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                _ => {}
            }
            return false;
        }

        // Help overlay swallows everything but close/quit
        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => {
                    self.show_help = false;
                }
                Action::Quit => {
                    self.show_help = false;
                    self.confirm_quit = true;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                _ => {}
            }
            return false;
        }

        match self.screen {
            Screen::Main => self.handle_main_action(action),
            Screen::FilePicker => self.handle_file_picker_action(action),
        }
        self.should_quit
    }

    fn handle_main_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::OpenPicker => {
                self.file_picker.refresh_entries();
                self.screen = Screen::FilePicker;
            }
            Action::RemoveFile => {
                self.selection.remove_file(&mut self.file_picker);
                self.notice = None;
            }
            Action::DropPath(text) => {
                self.drop_paths(&text);
            }
            Action::ToggleStemming => {
                self.options.toggle_stemming();
            }
            Action::CycleProvider => {
                self.options.cycle_provider();
            }
            Action::Submit | Action::DrillIn => {
                self.submit();
            }
            Action::CancelRequest => {
                if self.orchestrator.cancel() {
                    if let Some(tx) = &self.backend_cmd_tx {
                        let _ = tx.send(BackendCommand::Cancel);
                    }
                    self.notice = Some("Requisição cancelada.".to_string());
                }
            }
            Action::CopyToClipboard => {
                if let Some(result) = self.orchestrator.result() {
                    osc52_copy(&result.suggested_reply);
                    self.notice = Some("Resposta copiada.".to_string());
                }
            }
            Action::MoveDown => {
                if self.orchestrator.result().is_some() {
                    self.result_scroll = self.result_scroll.saturating_add(1);
                }
            }
            Action::MoveUp => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
            }
            Action::PageDown => {
                if self.orchestrator.result().is_some() {
                    let page = self.visible_rows.max(1) as u16;
                    self.result_scroll = self.result_scroll.saturating_add(page);
                }
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1) as u16;
                self.result_scroll = self.result_scroll.saturating_sub(page);
            }
            Action::GoTop => {
                self.result_scroll = 0;
            }
            Action::CycleTheme => {
                self.theme = self.theme.next();
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(16);
            }
            _ => {}
        }
    }

    /// Start a submission and hand it to the backend listener.
    ///
    /// Ignored while a request is already in flight.
    pub(super) fn submit(&mut self) {
        if self.orchestrator.is_loading() {
            return;
        }
        self.notice = None;
        self.result_scroll = 0;

        // A validation failure has already been recorded as the Failure state.
        let Ok(pending) = self
            .orchestrator
            .begin_submit(&self.selection, &self.options)
        else {
            return;
        };

        let generation = pending.generation;
        if let Some(tx) = &self.backend_cmd_tx
            && tx.send(BackendCommand::Classify(pending)).is_err()
        {
            tracing::error!("backend listener is gone");
            self.orchestrator
                .complete(generation, Err(ClassifyError::network("")));
        }
    }

    /// Treat pasted text as a drop of one or more paths. Only the first
    /// openable file is used; an empty drop is ignored.
    pub(super) fn drop_paths(&mut self, text: &str) {
        let paths = parse_dropped_paths(text);
        if paths.is_empty() {
            return;
        }

        let mut files = Vec::new();
        for path in &paths {
            match SelectedFile::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "dropped path unusable");
                }
            }
        }
        if files.is_empty() {
            self.notice = Some(format!(
                "Não foi possível abrir {}",
                paths[0].display()
            ));
            return;
        }

        self.notice = None;
        self.file_picker.chosen = None;
        let _ = self
            .selection
            .select_from_payload(SelectionSource::DragDrop, files);
        self.screen = Screen::Main;
    }

    /// Apply an event from the backend listener.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Classified {
                generation,
                outcome,
            } => {
                self.orchestrator.complete(generation, outcome);
            }
        }
    }
}
