//! The document-store seam: folders, files and the tabs inside spreadsheets.

use crate::error::ReconError;
use crate::grid::Grid;

pub const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// How the pipeline treats a file, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Readable and writable through the grid seam.
    NativeSpreadsheet,
    /// An office spreadsheet the store cannot open without conversion.
    ForeignSpreadsheet,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime {
            SPREADSHEET_MIME => Self::NativeSpreadsheet,
            XLSX_MIME | XLS_MIME => Self::ForeignSpreadsheet,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub mime: String,
}

impl FileEntry {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.mime)
    }
}

/// Enumeration calls return entries in the store's own listing order.
pub trait DocumentStore {
    type Sheet: Grid + Clone;

    fn folder_name(&self, folder_id: &str) -> Result<String, ReconError>;

    fn subfolders(&self, folder_id: &str) -> Result<Vec<FolderEntry>, ReconError>;

    fn files(&self, folder_id: &str) -> Result<Vec<FileEntry>, ReconError>;

    /// Create a folder under `parent_id` and return its id.
    fn create_folder(&mut self, parent_id: &str, name: &str) -> Result<String, ReconError>;

    /// Create a spreadsheet at the store root with one tab of `rows` x `cols`.
    fn create_spreadsheet(&mut self, name: &str, rows: usize, cols: usize) -> Result<String, ReconError>;

    fn move_file(&mut self, file_id: &str, folder_id: &str) -> Result<(), ReconError>;

    /// Copy a file into `folder_id` under a new name and return the copy's id.
    fn copy_file(&mut self, file_id: &str, folder_id: &str, new_name: &str) -> Result<String, ReconError>;

    /// Remove a file from its folder.
    fn trash_file(&mut self, file_id: &str) -> Result<(), ReconError>;

    fn rename_file(&mut self, file_id: &str, new_name: &str) -> Result<(), ReconError>;

    fn file_name(&self, file_id: &str) -> Result<String, ReconError>;

    fn sheet_names(&self, file_id: &str) -> Result<Vec<String>, ReconError>;

    fn sheet(&self, file_id: &str, sheet_name: &str) -> Result<&Self::Sheet, ReconError>;

    fn sheet_mut(&mut self, file_id: &str, sheet_name: &str) -> Result<&mut Self::Sheet, ReconError>;

    fn insert_sheet(&mut self, file_id: &str, name: &str) -> Result<(), ReconError>;

    fn delete_sheet(&mut self, file_id: &str, name: &str) -> Result<(), ReconError>;

    fn first_sheet_name(&self, file_id: &str) -> Result<String, ReconError> {
        self.sheet_names(file_id)?
            .into_iter()
            .next()
            .ok_or_else(|| ReconError::Store(format!("spreadsheet \"{file_id}\" has no sheets")))
    }

    fn sheet_exists(&self, file_id: &str, name: &str) -> bool {
        self.sheet_names(file_id)
            .map(|names| names.iter().any(|n| n == name))
            .unwrap_or(false)
    }

    /// Create the tab, or clear it if it already exists.
    fn reset_sheet(&mut self, file_id: &str, name: &str) -> Result<&mut Self::Sheet, ReconError> {
        if self.sheet_exists(file_id, name) {
            let sheet = self.sheet_mut(file_id, name)?;
            sheet.clear();
        } else {
            self.insert_sheet(file_id, name)?;
        }
        self.sheet_mut(file_id, name)
    }
}
