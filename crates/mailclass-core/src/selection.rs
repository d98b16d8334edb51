//! Tracking of the single document chosen for classification.
//!
//! Selection never rejects a file. The extension check runs here too, so a
//! front end can flag a bad file immediately, but the authoritative gate is
//! the orchestrator at submission time. Both call [`validate_file_name`].

use std::io;
use std::path::{Path, PathBuf};

use crate::ClassifyError;

/// Suffixes accepted by the backend, compared case-insensitively.
pub const ACCEPTED_EXTENSIONS: &[&str] = &[".pdf", ".txt"];

/// Check a file name against the extension whitelist.
pub fn validate_file_name(name: &str) -> Result<(), ClassifyError> {
    let lower = name.to_lowercase();
    if ACCEPTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        Ok(())
    } else {
        Err(ClassifyError::InvalidExtension {
            name: name.to_string(),
        })
    }
}

/// Where the bytes of a selected file come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// Read from disk when the request is built.
    OnDisk(PathBuf),
    /// Already in memory (e.g. a dropped payload).
    InMemory(Vec<u8>),
}

/// A document descriptor. Replaced wholesale on every new selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    /// Lowercased extension without the dot, if the name has one.
    pub extension: Option<String>,
    pub contents: FileContents,
}

impl SelectedFile {
    /// Describe a file on disk from its metadata. The file is not read.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            extension: extension_of(&name),
            name,
            size_bytes: metadata.len(),
            contents: FileContents::OnDisk(path.to_path_buf()),
        })
    }

    /// Describe an in-memory payload.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            extension: extension_of(&name),
            size_bytes: bytes.len() as u64,
            name,
            contents: FileContents::InMemory(bytes),
        }
    }

    pub fn is_accepted(&self) -> bool {
        validate_file_name(&self.name).is_ok()
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.contents {
            FileContents::OnDisk(p) => Some(p),
            FileContents::InMemory(_) => None,
        }
    }

    /// Raw document bytes for the request body.
    pub async fn read_bytes(&self) -> Result<Vec<u8>, ClassifyError> {
        match &self.contents {
            FileContents::InMemory(bytes) => Ok(bytes.clone()),
            FileContents::OnDisk(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|e| ClassifyError::FileUnreadable {
                        name: self.name.clone(),
                        reason: e.to_string(),
                    })
            }
        }
    }

    /// MIME type for the multipart part, derived from the extension.
    pub fn mime_type(&self) -> &'static str {
        match self.extension.as_deref() {
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

/// Text after the last dot, matching the suffix rule of the whitelist, so a
/// bare `.pdf` still has the `pdf` extension.
fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// How the file reached the selection slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    DragDrop,
    Picker,
}

/// The widget a file was picked from. Reset on removal so picking the same
/// file again registers as a change.
pub trait FileInputWidget {
    fn reset(&mut self);
}

impl FileInputWidget for () {
    fn reset(&mut self) {}
}

/// Holds at most one selected file.
#[derive(Debug, Clone, Default)]
pub struct FileSelectionManager {
    selected: Option<SelectedFile>,
    issue: Option<ClassifyError>,
}

impl FileSelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `candidate`, replacing any previous file.
    ///
    /// The file is kept even when its extension is not accepted; the returned
    /// result (also available via [`validation_issue`](Self::validation_issue))
    /// only reports it.
    pub fn select_file(
        &mut self,
        source: SelectionSource,
        candidate: SelectedFile,
    ) -> Result<(), ClassifyError> {
        let outcome = validate_file_name(&candidate.name);
        tracing::debug!(
            name = %candidate.name,
            size = candidate.size_bytes,
            ?source,
            accepted = outcome.is_ok(),
            "file selected"
        );
        self.issue = outcome.clone().err();
        self.selected = Some(candidate);
        outcome
    }

    /// Apply a payload carrying zero or more files; only the first is used.
    ///
    /// An empty drop is ignored. An empty picker payload means the picker was
    /// dismissed with nothing chosen and clears the slot.
    pub fn select_from_payload(
        &mut self,
        source: SelectionSource,
        candidates: impl IntoIterator<Item = SelectedFile>,
    ) -> Option<Result<(), ClassifyError>> {
        match candidates.into_iter().next() {
            Some(first) => Some(self.select_file(source, first)),
            None => {
                if source == SelectionSource::Picker {
                    self.selected = None;
                    self.issue = None;
                }
                None
            }
        }
    }

    /// Clear the stored file and reset the input widget.
    pub fn remove_file(&mut self, widget: &mut dyn FileInputWidget) -> Option<SelectedFile> {
        widget.reset();
        self.issue = None;
        let removed = self.selected.take();
        if let Some(ref file) = removed {
            tracing::debug!(name = %file.name, "file removed");
        }
        removed
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.selected.is_some()
    }

    /// The validation problem with the current file, if any.
    pub fn validation_issue(&self) -> Option<&ClassifyError> {
        self.issue.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingWidget {
        resets: usize,
    }

    impl FileInputWidget for CountingWidget {
        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn whitelist_is_case_insensitive_suffix() {
        for ok in ["mail.pdf", "MAIL.PDF", "notes.TxT", "a.b.c.txt", ".pdf"] {
            assert!(validate_file_name(ok).is_ok(), "{ok} should pass");
        }
        for bad in ["mail.doc", "mail.pdf.exe", "pdf", "mail", "mail.pd", ""] {
            assert!(
                matches!(
                    validate_file_name(bad),
                    Err(ClassifyError::InvalidExtension { .. })
                ),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn extension_follows_the_whitelist_suffix() {
        let bare = SelectedFile::from_bytes(".pdf", b"%PDF".to_vec());
        assert!(bare.is_accepted());
        assert_eq!(bare.extension.as_deref(), Some("pdf"));
        assert_eq!(bare.mime_type(), "application/pdf");

        let upper = SelectedFile::from_bytes("Caixa.TXT", Vec::new());
        assert_eq!(upper.mime_type(), "text/plain");

        assert_eq!(SelectedFile::from_bytes("mail", Vec::new()).extension, None);
        assert_eq!(SelectedFile::from_bytes("mail.", Vec::new()).extension, None);
    }

    #[test]
    fn select_keeps_invalid_file_but_reports_it() {
        let mut mgr = FileSelectionManager::new();
        let res = mgr.select_file(
            SelectionSource::Picker,
            SelectedFile::from_bytes("report.docx", b"x".to_vec()),
        );
        assert!(res.is_err());
        assert_eq!(mgr.selected().unwrap().name, "report.docx");
        assert!(mgr.validation_issue().is_some());
    }

    #[test]
    fn new_selection_replaces_wholesale() {
        let mut mgr = FileSelectionManager::new();
        mgr.select_file(
            SelectionSource::Picker,
            SelectedFile::from_bytes("bad.exe", vec![1, 2]),
        )
        .unwrap_err();
        mgr.select_file(
            SelectionSource::DragDrop,
            SelectedFile::from_bytes("good.txt", vec![1, 2, 3]),
        )
        .unwrap();
        let file = mgr.selected().unwrap();
        assert_eq!(file.name, "good.txt");
        assert_eq!(file.size_bytes, 3);
        assert_eq!(file.extension.as_deref(), Some("txt"));
        assert!(mgr.validation_issue().is_none());
    }

    #[test]
    fn remove_clears_and_resets_widget() {
        let mut mgr = FileSelectionManager::new();
        let mut widget = CountingWidget::default();
        mgr.select_file(
            SelectionSource::Picker,
            SelectedFile::from_bytes("a.pdf", vec![]),
        )
        .unwrap();
        let removed = mgr.remove_file(&mut widget);
        assert_eq!(removed.unwrap().name, "a.pdf");
        assert!(!mgr.has_file());
        assert_eq!(widget.resets, 1);

        // Removing again is harmless and still resets the widget.
        assert!(mgr.remove_file(&mut widget).is_none());
        assert_eq!(widget.resets, 2);
    }

    #[test]
    fn payload_uses_first_file_only() {
        let mut mgr = FileSelectionManager::new();
        let files = vec![
            SelectedFile::from_bytes("first.pdf", vec![]),
            SelectedFile::from_bytes("second.txt", vec![]),
        ];
        let res = mgr.select_from_payload(SelectionSource::DragDrop, files);
        assert!(matches!(res, Some(Ok(()))));
        assert_eq!(mgr.selected().unwrap().name, "first.pdf");
    }

    #[test]
    fn empty_drop_is_ignored_but_empty_picker_clears() {
        let mut mgr = FileSelectionManager::new();
        mgr.select_file(
            SelectionSource::Picker,
            SelectedFile::from_bytes("a.pdf", vec![]),
        )
        .unwrap();

        assert!(
            mgr.select_from_payload(SelectionSource::DragDrop, Vec::new())
                .is_none()
        );
        assert!(mgr.has_file());

        assert!(
            mgr.select_from_payload(SelectionSource::Picker, Vec::new())
                .is_none()
        );
        assert!(!mgr.has_file());
    }

    #[test]
    fn from_path_reads_metadata_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Email.PDF");
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "Email.PDF");
        assert_eq!(file.size_bytes, 13);
        assert_eq!(file.extension.as_deref(), Some("pdf"));
        assert_eq!(file.mime_type(), "application/pdf");
        assert_eq!(file.path(), Some(path.as_path()));
        assert!(file.is_accepted());
    }

    #[test]
    fn from_path_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SelectedFile::from_path(dir.path()).is_err());
    }

    #[tokio::test]
    async fn read_bytes_reports_vanished_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        std::fs::write(&path, b"hello").unwrap();
        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.read_bytes().await.unwrap(), b"hello");

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            file.read_bytes().await,
            Err(ClassifyError::FileUnreadable { name, .. }) if name == "gone.txt"
        ));
    }
}
