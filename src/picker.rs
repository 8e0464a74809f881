use log::error;
use std::path::{Path, PathBuf};

/// A PDF file offered for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfFileInfo {
    pub path: PathBuf,
    pub display_name: String,
}

/// Lists the PDF files the upload view offers. Only the extension is
/// checked, case-insensitively, like a file dialog's `.pdf` filter; whether
/// the bytes are actually a PDF is the service's problem.
pub struct PdfPicker {
    files: Vec<PdfFileInfo>,
    scan_directory: PathBuf,
}

impl PdfPicker {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let mut picker = Self {
            files: Vec::new(),
            scan_directory: directory.into(),
        };
        picker.refresh();
        picker
    }

    /// Rescans the directory. An unreadable directory yields an empty list;
    /// the upload view then shows its own empty state.
    pub fn refresh(&mut self) {
        self.files = Self::discover_pdfs_in_dir(&self.scan_directory);
        self.files.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        });
    }

    fn discover_pdfs_in_dir(dir: &Path) -> Vec<PdfFileInfo> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to read directory {}: {e}", dir.display());
                return Vec::new();
            }
        };

        entries
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }
                let path = entry.path();
                let extension = path.extension()?.to_str()?.to_lowercase();
                if extension != "pdf" {
                    return None;
                }
                let display_name = path.file_name()?.to_string_lossy().to_string();
                Some(PdfFileInfo { path, display_name })
            })
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&PdfFileInfo> {
        self.files.get(index)
    }

    pub fn files(&self) -> &[PdfFileInfo] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn scan_directory(&self) -> &Path {
        &self.scan_directory
    }
}
