use mailclass_core::{SelectedFile, SelectionSource};

use super::{App, Screen};
use crate::action::Action;

impl App {
    /// Handle input while on the file picker screen.
    pub(super) fn handle_file_picker_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.confirm_quit = true;
            }
            Action::NavigateBack => {
                self.screen = Screen::Main;
            }
            Action::MoveDown => {
                let max = self.file_picker.entries.len().saturating_sub(1);
                if self.file_picker.cursor < max {
                    self.file_picker.cursor += 1;
                }
            }
            Action::MoveUp => {
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                let max = self.file_picker.entries.len().saturating_sub(1);
                self.file_picker.cursor = (self.file_picker.cursor + page).min(max);
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                self.file_picker.cursor = self.file_picker.cursor.saturating_sub(page);
            }
            Action::GoTop => {
                self.file_picker.cursor = 0;
            }
            Action::GoBottom => {
                self.file_picker.cursor = self.file_picker.entries.len().saturating_sub(1);
            }
            Action::DrillIn => {
                // Enter on a directory opens it, on a file picks it
                if !self.file_picker.enter_directory() {
                    self.pick_current_entry();
                }
            }
            Action::Select => {
                self.pick_current_entry();
            }
            Action::DropPath(text) => {
                self.drop_paths(&text);
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                self.visible_rows = (h as usize).saturating_sub(8);
            }
            _ => {}
        }
    }

    /// Put the file under the cursor in the selection slot and return to the form.
    ///
    /// Files outside the whitelist are still taken; the form shows the problem.
    fn pick_current_entry(&mut self) {
        let Some(entry) = self.file_picker.current_entry().cloned() else {
            return;
        };
        if entry.is_dir {
            return;
        }

        match SelectedFile::from_path(&entry.path) {
            Ok(file) => {
                let _ = self.selection.select_file(SelectionSource::Picker, file);
                self.file_picker.chosen = Some(entry.path);
                self.notice = None;
                self.screen = Screen::Main;
            }
            Err(e) => {
                tracing::warn!(path = %entry.path.display(), error = %e, "cannot pick file");
                self.notice = Some(format!("Não foi possível abrir {}: {}", entry.name, e));
            }
        }
    }
}
