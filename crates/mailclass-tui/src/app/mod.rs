mod update;
mod update_file_picker;
mod util;

use std::path::PathBuf;

use tokio::sync::mpsc;

use mailclass_core::{
    ClassificationOptions, FileInputWidget, FileSelectionManager, RequestOrchestrator,
    validate_file_name,
};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Main,
    FilePicker,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<FileEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
    /// Path last picked from this widget, cleared on reset.
    pub chosen: Option<PathBuf>,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// Name passes the .pdf/.txt whitelist.
    pub is_accepted: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(current_dir)
    }

    pub fn in_dir(current_dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
            chosen: None,
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        if let Some(parent) = self.current_dir.parent() {
            entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_accepted: false,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files/dirs
                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(FileEntry {
                        name,
                        path,
                        is_dir: true,
                        is_accepted: false,
                    });
                } else {
                    let is_accepted = validate_file_name(&name).is_ok();
                    files.push(FileEntry {
                        name,
                        path,
                        is_dir: false,
                        is_accepted,
                    });
                }
            }

            dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

            entries.extend(dirs);
            entries.extend(files);
        } else {
            tracing::warn!(dir = %self.current_dir.display(), "cannot read directory");
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }

    pub fn is_chosen(&self, path: &PathBuf) -> bool {
        self.chosen.as_ref() == Some(path)
    }
}

impl FileInputWidget for FilePickerState {
    fn reset(&mut self) {
        self.chosen = None;
        self.cursor = 0;
    }
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub selection: FileSelectionManager,
    pub options: ClassificationOptions,
    pub orchestrator: RequestOrchestrator,
    pub file_picker: FilePickerState,
    pub theme: Theme,
    /// Backend address, shown in the header.
    pub base_url: String,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// Scroll offset of the result panel.
    pub result_scroll: u16,
    /// Height of the visible list area (set on resize, used for page up/down).
    pub visible_rows: usize,
    /// One-line feedback that is not part of the request lifecycle.
    pub notice: Option<String>,
    /// Channel to send commands to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(options: ClassificationOptions, theme: Theme, base_url: String) -> Self {
        Self {
            screen: Screen::Main,
            selection: FileSelectionManager::new(),
            options,
            orchestrator: RequestOrchestrator::new(),
            file_picker: FilePickerState::new(),
            theme,
            base_url,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            result_scroll: 0,
            visible_rows: 20,
            notice: None,
            backend_cmd_tx: None,
        }
    }

    // update(), submit(), drop_paths() and handle_backend_event() are in update.rs

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen {
            Screen::Main => crate::view::main_form::render_in(f, self, area),
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme, self.orchestrator.is_loading());
        }
    }
}

#[cfg(test)]
mod tests;
